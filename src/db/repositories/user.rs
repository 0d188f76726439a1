use crate::entities::{anime, favorite, prelude::*, user, watch_history};
use anyhow::Result;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use tracing::debug;

/// Well-known identity standing in for a real session model. All
/// favorite/history operations go through `guest_user_id` so a session
/// identifier could be threaded in later without touching call sites.
pub const GUEST_EMAIL: &str = "guest@animato.local";

pub struct UserRepository {
    conn: DatabaseConnection,
}

impl UserRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Fetch the guest user's id, creating the row on first use.
    pub async fn guest_user_id(&self) -> Result<i32> {
        let existing = User::find()
            .filter(user::Column::Email.eq(GUEST_EMAIL))
            .one(&self.conn)
            .await?;

        if let Some(row) = existing {
            return Ok(row.id);
        }

        let active_model = user::ActiveModel {
            email: Set(GUEST_EMAIL.to_string()),
            name: Set(Some("Guest".to_string())),
            ..Default::default()
        };

        let result = User::insert(active_model).exec(&self.conn).await?;
        debug!("Created guest user (id {})", result.last_insert_id);
        Ok(result.last_insert_id)
    }

    /// The guest user's id if the row already exists. Read paths use this
    /// so a query never creates the user as a side effect.
    pub async fn existing_guest_user_id(&self) -> Result<Option<i32>> {
        let existing = User::find()
            .filter(user::Column::Email.eq(GUEST_EMAIL))
            .one(&self.conn)
            .await?;

        Ok(existing.map(|row| row.id))
    }

    /// Flip the favorite state for (user, anime); returns the new state.
    pub async fn toggle_favorite(&self, user_id: i32, anime_id: i32) -> Result<bool> {
        let existing = Favorite::find_by_id((user_id, anime_id))
            .one(&self.conn)
            .await?;

        if existing.is_some() {
            Favorite::delete_by_id((user_id, anime_id))
                .exec(&self.conn)
                .await?;
            return Ok(false);
        }

        let active_model = favorite::ActiveModel {
            user_id: Set(user_id),
            anime_id: Set(anime_id),
            created_at: Set(chrono::Utc::now().to_rfc3339()),
        };
        Favorite::insert(active_model)
            .exec_without_returning(&self.conn)
            .await?;

        Ok(true)
    }

    pub async fn is_favorite(&self, user_id: i32, anime_id: i32) -> Result<bool> {
        Ok(Favorite::find_by_id((user_id, anime_id))
            .one(&self.conn)
            .await?
            .is_some())
    }

    pub async fn list_favorites(&self, user_id: i32) -> Result<Vec<anime::Model>> {
        let rows = Favorite::find()
            .filter(favorite::Column::UserId.eq(user_id))
            .find_also_related(anime::Entity)
            .all(&self.conn)
            .await?;

        Ok(rows.into_iter().filter_map(|(_, a)| a).collect())
    }

    /// Upsert watch progress keyed by (user, anime, episode number).
    pub async fn record_watch_progress(
        &self,
        user_id: i32,
        anime_id: i32,
        episode_number: i32,
        progress: f32,
        completed: bool,
    ) -> Result<()> {
        let active_model = watch_history::ActiveModel {
            user_id: Set(user_id),
            anime_id: Set(anime_id),
            episode_number: Set(episode_number),
            progress: Set(progress),
            completed: Set(completed),
            updated_at: Set(chrono::Utc::now().to_rfc3339()),
        };

        WatchHistory::insert(active_model)
            .on_conflict(
                sea_orm::sea_query::OnConflict::columns([
                    watch_history::Column::UserId,
                    watch_history::Column::AnimeId,
                    watch_history::Column::EpisodeNumber,
                ])
                .update_columns([
                    watch_history::Column::Progress,
                    watch_history::Column::Completed,
                    watch_history::Column::UpdatedAt,
                ])
                .to_owned(),
            )
            .exec_without_returning(&self.conn)
            .await?;

        Ok(())
    }

    pub async fn watch_history(&self, user_id: i32) -> Result<Vec<watch_history::Model>> {
        Ok(WatchHistory::find()
            .filter(watch_history::Column::UserId.eq(user_id))
            .all(&self.conn)
            .await?)
    }
}
