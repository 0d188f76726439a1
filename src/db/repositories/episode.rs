use crate::entities::{episode, prelude::*};
use anyhow::Result;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set};

pub struct EpisodeRepository {
    conn: DatabaseConnection,
}

impl EpisodeRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Ensure placeholder rows 1..=count exist for an anime. Existing rows
    /// are left untouched, so re-running is a no-op.
    pub async fn materialize(&self, anime_id: i32, count: i32) -> Result<()> {
        for number in 1..=count {
            let active_model = episode::ActiveModel {
                anime_id: Set(anime_id),
                number: Set(number),
                title: Set(format!("Episode {number}")),
            };

            Episode::insert(active_model)
                .on_conflict(
                    sea_orm::sea_query::OnConflict::columns([
                        episode::Column::AnimeId,
                        episode::Column::Number,
                    ])
                    .do_nothing()
                    .to_owned(),
                )
                .exec_without_returning(&self.conn)
                .await?;
        }

        Ok(())
    }

    pub async fn list_for_anime(&self, anime_id: i32) -> Result<Vec<episode::Model>> {
        let rows = Episode::find()
            .filter(episode::Column::AnimeId.eq(anime_id))
            .order_by_asc(episode::Column::Number)
            .all(&self.conn)
            .await?;

        Ok(rows)
    }

    pub async fn get(&self, anime_id: i32, number: i32) -> Result<Option<episode::Model>> {
        Ok(Episode::find_by_id((anime_id, number)).one(&self.conn).await?)
    }
}
