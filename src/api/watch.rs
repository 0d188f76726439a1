use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use std::sync::Arc;

use super::{ApiError, ApiResponse, AppState, ProgressRequest, WatchDto};
use crate::models::AudioTrack;

#[derive(Deserialize)]
pub struct WatchQuery {
    #[serde(default)]
    pub audio: Option<AudioTrack>,
}

/// Watch-page data plus the resolved embed URL. Resolution failure is not
/// an error: `embed_url` comes back null and the page renders a fallback.
pub async fn watch_episode(
    State(state): State<Arc<AppState>>,
    Path((slug, number)): Path<(String, i32)>,
    Query(params): Query<WatchQuery>,
) -> Result<Json<ApiResponse<WatchDto>>, ApiError> {
    let anime = state
        .store()
        .get_anime_by_slug(&slug)
        .await?
        .ok_or_else(|| ApiError::not_found("Anime", &slug))?;

    let episode = state
        .store()
        .get_episode(anime.id, number)
        .await?
        .ok_or_else(|| ApiError::not_found("Episode", number))?;

    let audio = params.audio.unwrap_or_default();
    let embed_url = state
        .resolver()
        .resolve(&anime.external_id, number, audio)
        .await;

    Ok(Json(ApiResponse::success(WatchDto {
        anime: anime.into(),
        episode: episode.into(),
        embed_url,
    })))
}

pub async fn record_progress(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ProgressRequest>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    let store = state.store();

    store
        .get_episode(req.anime_id, req.episode_number)
        .await?
        .ok_or_else(|| ApiError::not_found("Episode", req.episode_number))?;

    let user_id = store.guest_user_id().await?;
    store
        .record_watch_progress(
            user_id,
            req.anime_id,
            req.episode_number,
            req.progress,
            req.completed,
        )
        .await?;

    Ok(Json(ApiResponse::success(())))
}
