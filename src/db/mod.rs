use crate::entities::{anime, episode, genre, watch_history};
use crate::ingest::normalize::NormalizedAnime;
use crate::models::Shelf;
use anyhow::Result;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Statement};
use std::path::Path;
use std::time::Duration;
use tracing::info;

pub mod migrator;
pub mod repositories;

pub use repositories::user::GUEST_EMAIL;

#[derive(Clone)]
pub struct Store {
    pub conn: DatabaseConnection,
}

impl Store {
    pub async fn new(db_url: &str) -> Result<Self> {
        Self::with_pool_options(db_url, 5, 1).await
    }

    pub async fn with_pool_options(
        db_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self> {
        use sea_orm_migration::MigratorTrait;

        if !db_url.contains(":memory:") {
            let path_str = db_url.trim_start_matches("sqlite:");
            if let Some(parent) = Path::new(path_str).parent() {
                tokio::fs::create_dir_all(parent).await.ok();
            }
            if !Path::new(path_str).exists() {
                std::fs::File::create(path_str)?;
            }
        }

        let mut opt = ConnectOptions::new(db_url.to_string());
        opt.max_connections(max_connections)
            .min_connections(min_connections)
            .connect_timeout(Duration::from_secs(10))
            .acquire_timeout(Duration::from_secs(10))
            .idle_timeout(Duration::from_secs(300))
            .max_lifetime(Duration::from_secs(600))
            .sqlx_logging(false);

        let conn = Database::connect(opt).await?;

        migrator::Migrator::up(&conn, None).await?;

        info!(
            "Database connected & migrations applied (pool: {}-{})",
            min_connections, max_connections
        );

        Ok(Self { conn })
    }

    pub async fn ping(&self) -> Result<()> {
        let backend = self.conn.get_database_backend();
        self.conn
            .query_one(Statement::from_string(backend, "SELECT 1".to_string()))
            .await?;
        Ok(())
    }

    fn anime_repo(&self) -> repositories::anime::AnimeRepository {
        repositories::anime::AnimeRepository::new(self.conn.clone())
    }

    fn featured_repo(&self) -> repositories::featured::FeaturedRepository {
        repositories::featured::FeaturedRepository::new(self.conn.clone())
    }

    fn episode_repo(&self) -> repositories::episode::EpisodeRepository {
        repositories::episode::EpisodeRepository::new(self.conn.clone())
    }

    fn genre_repo(&self) -> repositories::genre::GenreRepository {
        repositories::genre::GenreRepository::new(self.conn.clone())
    }

    fn user_repo(&self) -> repositories::user::UserRepository {
        repositories::user::UserRepository::new(self.conn.clone())
    }

    fn cache_repo(&self) -> repositories::cache::CacheRepository {
        repositories::cache::CacheRepository::new(self.conn.clone())
    }

    pub async fn upsert_anime(&self, item: &NormalizedAnime) -> Result<i32> {
        self.anime_repo().upsert(item).await
    }

    pub async fn get_anime(&self, id: i32) -> Result<Option<anime::Model>> {
        self.anime_repo().get(id).await
    }

    pub async fn get_anime_by_slug(&self, slug: &str) -> Result<Option<anime::Model>> {
        self.anime_repo().get_by_slug(slug).await
    }

    pub async fn get_anime_by_external_id(
        &self,
        external_id: &str,
    ) -> Result<Option<anime::Model>> {
        self.anime_repo().get_by_external_id(external_id).await
    }

    pub async fn search_anime(&self, query: &str, limit: u64) -> Result<Vec<anime::Model>> {
        self.anime_repo().search(query, limit).await
    }

    pub async fn browse_anime(&self, limit: u64) -> Result<Vec<anime::Model>> {
        self.anime_repo().browse(limit).await
    }

    pub async fn list_all_anime(&self) -> Result<Vec<anime::Model>> {
        self.anime_repo().list_all().await
    }

    pub async fn clear_featured(&self) -> Result<u64> {
        self.featured_repo().clear_all().await
    }

    pub async fn feature_anime(&self, shelf: Shelf, rank: i32, anime_id: i32) -> Result<()> {
        self.featured_repo().place(shelf, rank, anime_id).await
    }

    pub async fn shelf(&self, shelf: Shelf) -> Result<Vec<anime::Model>> {
        self.featured_repo().list_shelf(shelf).await
    }

    pub async fn materialize_episodes(&self, anime_id: i32, count: i32) -> Result<()> {
        self.episode_repo().materialize(anime_id, count).await
    }

    pub async fn episodes_for_anime(&self, anime_id: i32) -> Result<Vec<episode::Model>> {
        self.episode_repo().list_for_anime(anime_id).await
    }

    pub async fn get_episode(&self, anime_id: i32, number: i32) -> Result<Option<episode::Model>> {
        self.episode_repo().get(anime_id, number).await
    }

    pub async fn upsert_genre(&self, name: &str, slug: &str) -> Result<()> {
        self.genre_repo().upsert(name, slug).await
    }

    pub async fn list_genres(&self) -> Result<Vec<genre::Model>> {
        self.genre_repo().list().await
    }

    pub async fn guest_user_id(&self) -> Result<i32> {
        self.user_repo().guest_user_id().await
    }

    pub async fn existing_guest_user_id(&self) -> Result<Option<i32>> {
        self.user_repo().existing_guest_user_id().await
    }

    pub async fn toggle_favorite(&self, user_id: i32, anime_id: i32) -> Result<bool> {
        self.user_repo().toggle_favorite(user_id, anime_id).await
    }

    pub async fn is_favorite(&self, user_id: i32, anime_id: i32) -> Result<bool> {
        self.user_repo().is_favorite(user_id, anime_id).await
    }

    pub async fn list_favorites(&self, user_id: i32) -> Result<Vec<anime::Model>> {
        self.user_repo().list_favorites(user_id).await
    }

    pub async fn record_watch_progress(
        &self,
        user_id: i32,
        anime_id: i32,
        episode_number: i32,
        progress: f32,
        completed: bool,
    ) -> Result<()> {
        self.user_repo()
            .record_watch_progress(user_id, anime_id, episode_number, progress, completed)
            .await
    }

    pub async fn watch_history(&self, user_id: i32) -> Result<Vec<watch_history::Model>> {
        self.user_repo().watch_history(user_id).await
    }

    pub async fn cache_get(&self, key: &str) -> Result<Option<String>> {
        self.cache_repo().get(key).await
    }

    pub async fn cache_put(&self, key: &str, payload: &str, ttl_seconds: u64) -> Result<()> {
        self.cache_repo().put(key, payload, ttl_seconds).await
    }
}
