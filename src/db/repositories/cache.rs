use crate::entities::{api_cache, prelude::*};
use anyhow::Result;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};

/// Short-lived upstream response cache keyed by the call's own parameters.
/// Purely a performance layer: a miss (or an expired row) re-issues the
/// upstream call.
pub struct CacheRepository {
    conn: DatabaseConnection,
}

impl CacheRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn get(&self, key: &str) -> Result<Option<String>> {
        let now = chrono::Utc::now().to_rfc3339();

        // Opportunistic cleanup of expired entries; a background job would
        // also work, but this keeps the table bounded without one.
        let _ = ApiCache::delete_many()
            .filter(api_cache::Column::ExpiresAt.lt(&now))
            .exec(&self.conn)
            .await;

        let entry = ApiCache::find()
            .filter(api_cache::Column::CacheKey.eq(key))
            .filter(api_cache::Column::ExpiresAt.gt(&now))
            .one(&self.conn)
            .await?;

        Ok(entry.map(|e| e.payload))
    }

    pub async fn put(&self, key: &str, payload: &str, ttl_seconds: u64) -> Result<()> {
        let now = chrono::Utc::now();
        let ttl = i64::try_from(ttl_seconds).unwrap_or(i64::MAX);
        let expires_at = (now + chrono::Duration::seconds(ttl)).to_rfc3339();

        let active_model = api_cache::ActiveModel {
            cache_key: Set(key.to_string()),
            payload: Set(payload.to_string()),
            created_at: Set(now.to_rfc3339()),
            expires_at: Set(expires_at),
        };

        ApiCache::insert(active_model)
            .on_conflict(
                sea_orm::sea_query::OnConflict::column(api_cache::Column::CacheKey)
                    .update_columns([
                        api_cache::Column::Payload,
                        api_cache::Column::CreatedAt,
                        api_cache::Column::ExpiresAt,
                    ])
                    .to_owned(),
            )
            .exec_without_returning(&self.conn)
            .await?;

        Ok(())
    }
}
