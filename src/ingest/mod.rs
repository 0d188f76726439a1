use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::info;

use crate::clients::catalog::{CatalogClient, HomeResults};
use crate::db::Store;
use crate::models::Shelf;

pub mod normalize;

use normalize::{RawAnimeItem, explicit_rank, normalize_item, parse_count};

/// Episode count assumed when upstream gives no usable signal.
pub const DEFAULT_EPISODE_COUNT: i32 = 12;

/// Hard cap on materialized episode rows per anime, bounding batch cost
/// regardless of the true total.
pub const MAX_MATERIALIZED_EPISODES: i32 = 100;

const GENRES: [&str; 8] = [
    "Action",
    "Adventure",
    "Fantasy",
    "Comedy",
    "Drama",
    "Romance",
    "Sci-Fi",
    "Horror",
];

#[derive(Debug, Default, Clone, Copy)]
pub struct IngestStats {
    pub anime: usize,
    pub placements: usize,
}

/// Sequential batch ingestion: one run at a time (external scheduling).
/// The featured table is cleared and rebuilt from the latest snapshot, so
/// upstream failure partway through a run can leave shelves partially
/// populated until the next successful run.
pub struct Ingestor {
    store: Store,
    catalog: Arc<CatalogClient>,
}

impl Ingestor {
    #[must_use]
    pub const fn new(store: Store, catalog: Arc<CatalogClient>) -> Self {
        Self { store, catalog }
    }

    /// Full batch run against the live upstream. Any upstream or storage
    /// failure aborts the run with a surfaced error; there is no partial
    /// success reporting and no retry.
    pub async fn run(&self) -> Result<IngestStats> {
        info!("Fetching home listing from catalog API");
        let results = self
            .catalog
            .home()
            .await
            .context("Fetching catalog home listing")?;

        self.ingest(&results).await
    }

    /// Ingest an already-fetched home listing. Split from `run` so the
    /// batch semantics are exercisable without a live upstream.
    pub async fn ingest(&self, results: &HomeResults) -> Result<IngestStats> {
        self.store.clear_featured().await?;

        let mut stats = IngestStats::default();

        self.process_shelf(Shelf::Spotlight, &results.spotlights, &mut stats)
            .await?;
        self.process_shelf(Shelf::Trending, &results.trending, &mut stats)
            .await?;
        self.process_shelf(Shelf::TopToday, &results.top_ten.today, &mut stats)
            .await?;
        self.process_shelf(Shelf::TopWeek, &results.top_ten.week, &mut stats)
            .await?;
        self.process_shelf(Shelf::TopMonth, &results.top_ten.month, &mut stats)
            .await?;

        // Top-airing items enter the catalog but get no featured rows.
        for item in &results.top_airing {
            if let Some(normalized) = normalize_item(item) {
                self.store.upsert_anime(&normalized).await?;
            }
        }

        stats.anime = self.materialize_episodes().await?;
        self.seed_genres().await?;

        info!(
            "Seed done. Anime: {}, featured placements: {}",
            stats.anime, stats.placements
        );
        Ok(stats)
    }

    /// Normalize and store one shelf in upstream order. Rank comes from
    /// the item's explicit number when it parses, else the 1-based
    /// position; duplicate ranks overwrite the earlier placement.
    async fn process_shelf(
        &self,
        shelf: Shelf,
        items: &[RawAnimeItem],
        stats: &mut IngestStats,
    ) -> Result<()> {
        for (index, item) in items.iter().enumerate() {
            let Some(normalized) = normalize_item(item) else {
                continue;
            };

            let anime_id = self.store.upsert_anime(&normalized).await?;
            let position = i32::try_from(index + 1).unwrap_or(i32::MAX);
            let rank = explicit_rank(item).unwrap_or(position);

            self.store.feature_anime(shelf, rank, anime_id).await?;
            stats.placements += 1;
        }

        Ok(())
    }

    /// Ensure every known anime has placeholder episode rows 1..=N, where
    /// N is the inferred total, else the parsed sub count, else the
    /// default, always capped. Returns the catalog size.
    async fn materialize_episodes(&self) -> Result<usize> {
        let all = self.store.list_all_anime().await?;

        for anime in &all {
            let total = anime
                .total_episodes
                .or_else(|| parse_count(anime.sub_count.as_deref()))
                .unwrap_or(DEFAULT_EPISODE_COUNT);

            self.store
                .materialize_episodes(anime.id, total.min(MAX_MATERIALIZED_EPISODES))
                .await?;
        }

        Ok(all.len())
    }

    async fn seed_genres(&self) -> Result<()> {
        for name in GENRES {
            let slug = name
                .to_lowercase()
                .split_whitespace()
                .collect::<Vec<_>>()
                .join("-");
            self.store.upsert_genre(name, &slug).await?;
        }

        Ok(())
    }
}
