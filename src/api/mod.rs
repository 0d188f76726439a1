use axum::{
    Router,
    http::HeaderValue,
    middleware,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::db::Store;
use crate::services::StreamResolver;
use crate::state::SharedState;

mod anime;
pub mod auth;
mod error;
mod favorites;
mod protected;
mod shelves;
mod types;
mod watch;

pub use error::ApiError;
pub use types::*;

use tokio::sync::RwLock;

#[derive(Clone)]
pub struct AppState {
    pub shared: Arc<SharedState>,

    pub start_time: std::time::Instant,
}

impl AppState {
    #[must_use]
    pub fn config(&self) -> &Arc<RwLock<Config>> {
        &self.shared.config
    }

    #[must_use]
    pub fn store(&self) -> &Store {
        &self.shared.store
    }

    #[must_use]
    pub fn resolver(&self) -> &Arc<StreamResolver> {
        &self.shared.resolver
    }
}

pub async fn create_app_state(shared: Arc<SharedState>) -> anyhow::Result<Arc<AppState>> {
    Ok(Arc::new(AppState {
        shared,
        start_time: std::time::Instant::now(),
    }))
}

pub async fn create_app_state_from_config(config: Config) -> anyhow::Result<Arc<AppState>> {
    let shared = Arc::new(SharedState::new(config).await?);
    create_app_state(shared).await
}

pub async fn router(state: Arc<AppState>) -> Router {
    let cors_origins = {
        let config = state.config().read().await;
        config.server.cors_allowed_origins.clone()
    };

    let protected_routes = Router::new()
        .route("/protected/ping", get(protected::ping))
        .route("/system/status", get(protected::system_status))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_api_key,
        ));

    let api_router = Router::new()
        .route("/home", get(shelves::home))
        .route("/shelves/{shelf}", get(shelves::shelf))
        .route("/anime", get(anime::browse))
        .route("/anime/search", get(anime::search))
        .route("/anime/{slug}", get(anime::get_by_slug))
        .route(
            "/anime/{id}/favorite",
            get(favorites::status).post(favorites::toggle),
        )
        .route("/favorites", get(favorites::list))
        .route("/genres", get(anime::genres))
        .route("/watch/progress", post(watch::record_progress))
        .route("/watch/{slug}/{number}", get(watch::watch_episode))
        .merge(protected_routes)
        .with_state(state.clone());

    let cors_layer = if cors_origins.contains(&"*".to_string()) {
        CorsLayer::new().allow_origin(Any)
    } else {
        let origins: Vec<HeaderValue> =
            cors_origins.iter().filter_map(|s| s.parse().ok()).collect();
        CorsLayer::new().allow_origin(origins)
    };

    Router::new()
        .nest("/api", api_router)
        .layer(cors_layer.allow_methods(Any).allow_headers(Any))
        .layer(TraceLayer::new_for_http())
}
