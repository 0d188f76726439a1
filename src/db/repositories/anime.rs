use crate::entities::{anime, prelude::*};
use crate::ingest::normalize::NormalizedAnime;
use anyhow::Result;
use sea_orm::{
    ColumnTrait, Condition, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, QuerySelect,
    Set,
};
use tracing::debug;

pub struct AnimeRepository {
    conn: DatabaseConnection,
}

impl AnimeRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Idempotent upsert keyed by external id. On first creation the slug
    /// is set to the external id and never touched again; on update every
    /// display field is refreshed except the slug and the large poster,
    /// and the small poster only when the incoming URL is the thumbnail
    /// variant. Returns the row's internal id.
    pub async fn upsert(&self, item: &NormalizedAnime) -> Result<i32> {
        let active_model = anime::ActiveModel {
            external_id: Set(item.external_id.clone()),
            data_id: Set(item.data_id.clone()),
            title: Set(item.title.clone()),
            japanese_title: Set(item.japanese_title.clone()),
            description: Set(item.description.clone()),
            poster: Set(item.poster.clone()),
            poster_small: Set(item.poster_small.clone()),
            show_type: Set(item.show_type.clone()),
            duration: Set(item.duration.clone()),
            release_date: Set(item.release_date.clone()),
            quality: Set(item.quality.clone()),
            sub_count: Set(item.sub_count.clone()),
            dub_count: Set(item.dub_count.clone()),
            total_episodes: Set(item.total_episodes),
            adult_content: Set(item.adult_content),
            slug: Set(item.external_id.clone()),
            created_at: Set(chrono::Utc::now().to_rfc3339()),
            ..Default::default()
        };

        let mut update_columns = vec![
            anime::Column::Title,
            anime::Column::JapaneseTitle,
            anime::Column::Description,
            anime::Column::ShowType,
            anime::Column::Duration,
            anime::Column::ReleaseDate,
            anime::Column::Quality,
            anime::Column::SubCount,
            anime::Column::DubCount,
            anime::Column::TotalEpisodes,
            anime::Column::AdultContent,
        ];
        // Only a thumbnail URL may refresh the small variant; a hero URL
        // never clobbers it, and the large variant is create-only.
        if item.poster_small.is_some() {
            update_columns.push(anime::Column::PosterSmall);
        }

        Anime::insert(active_model)
            .on_conflict(
                sea_orm::sea_query::OnConflict::column(anime::Column::ExternalId)
                    .update_columns(update_columns)
                    .to_owned(),
            )
            .exec_without_returning(&self.conn)
            .await?;

        let row = Anime::find()
            .filter(anime::Column::ExternalId.eq(&item.external_id))
            .one(&self.conn)
            .await?
            .ok_or_else(|| anyhow::anyhow!("anime {} missing after upsert", item.external_id))?;

        debug!("Upserted anime: {} ({})", row.title, row.external_id);
        Ok(row.id)
    }

    pub async fn get(&self, id: i32) -> Result<Option<anime::Model>> {
        Ok(Anime::find_by_id(id).one(&self.conn).await?)
    }

    pub async fn get_by_slug(&self, slug: &str) -> Result<Option<anime::Model>> {
        Ok(Anime::find()
            .filter(anime::Column::Slug.eq(slug))
            .one(&self.conn)
            .await?)
    }

    pub async fn get_by_external_id(&self, external_id: &str) -> Result<Option<anime::Model>> {
        Ok(Anime::find()
            .filter(anime::Column::ExternalId.eq(external_id))
            .one(&self.conn)
            .await?)
    }

    /// Case-insensitive substring search over title and Japanese title.
    pub async fn search(&self, query: &str, limit: u64) -> Result<Vec<anime::Model>> {
        let rows = Anime::find()
            .filter(
                Condition::any()
                    .add(anime::Column::Title.contains(query))
                    .add(anime::Column::JapaneseTitle.contains(query)),
            )
            .order_by_asc(anime::Column::Title)
            .limit(limit)
            .all(&self.conn)
            .await?;

        Ok(rows)
    }

    pub async fn browse(&self, limit: u64) -> Result<Vec<anime::Model>> {
        let rows = Anime::find()
            .order_by_asc(anime::Column::Title)
            .limit(limit)
            .all(&self.conn)
            .await?;

        Ok(rows)
    }

    pub async fn list_all(&self) -> Result<Vec<anime::Model>> {
        Ok(Anime::find().all(&self.conn).await?)
    }
}
