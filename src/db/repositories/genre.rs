use crate::entities::{genre, prelude::*};
use anyhow::Result;
use sea_orm::{DatabaseConnection, EntityTrait, QueryOrder, Set};

pub struct GenreRepository {
    conn: DatabaseConnection,
}

impl GenreRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn upsert(&self, name: &str, slug: &str) -> Result<()> {
        let active_model = genre::ActiveModel {
            slug: Set(slug.to_string()),
            name: Set(name.to_string()),
        };

        Genre::insert(active_model)
            .on_conflict(
                sea_orm::sea_query::OnConflict::column(genre::Column::Slug)
                    .update_columns([genre::Column::Name])
                    .to_owned(),
            )
            .exec_without_returning(&self.conn)
            .await?;

        Ok(())
    }

    pub async fn list(&self) -> Result<Vec<genre::Model>> {
        Ok(Genre::find()
            .order_by_asc(genre::Column::Name)
            .all(&self.conn)
            .await?)
    }
}
