use crate::entities::{anime, featured_anime, prelude::*};
use crate::models::Shelf;
use anyhow::Result;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set};
use tracing::info;

pub struct FeaturedRepository {
    conn: DatabaseConnection,
}

impl FeaturedRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Drop every shelf's rankings. Ingestion calls this once per run
    /// before rebuilding from the latest upstream snapshot.
    pub async fn clear_all(&self) -> Result<u64> {
        let result = FeaturedAnime::delete_many().exec(&self.conn).await?;
        info!("Cleared {} featured placements", result.rows_affected);
        Ok(result.rows_affected)
    }

    /// Upsert one ranked placement. A recurring (shelf, rank) pair
    /// overwrites the earlier row's anime reference.
    pub async fn place(&self, shelf: Shelf, rank: i32, anime_id: i32) -> Result<()> {
        let active_model = featured_anime::ActiveModel {
            shelf: Set(shelf.as_str().to_string()),
            rank: Set(rank),
            anime_id: Set(anime_id),
        };

        FeaturedAnime::insert(active_model)
            .on_conflict(
                sea_orm::sea_query::OnConflict::columns([
                    featured_anime::Column::Shelf,
                    featured_anime::Column::Rank,
                ])
                .update_columns([featured_anime::Column::AnimeId])
                .to_owned(),
            )
            .exec_without_returning(&self.conn)
            .await?;

        Ok(())
    }

    /// One shelf's anime in rank order.
    pub async fn list_shelf(&self, shelf: Shelf) -> Result<Vec<anime::Model>> {
        let rows = FeaturedAnime::find()
            .filter(featured_anime::Column::Shelf.eq(shelf.as_str()))
            .order_by_asc(featured_anime::Column::Rank)
            .find_also_related(anime::Entity)
            .all(&self.conn)
            .await?;

        Ok(rows.into_iter().filter_map(|(_, a)| a).collect())
    }
}
