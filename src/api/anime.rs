use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use std::sync::Arc;

use super::{AnimeDetailDto, AnimeDto, ApiError, ApiResponse, AppState, GenreDto};

/// Browse page cap.
const BROWSE_LIMIT: u64 = 100;

/// Search result cap.
const SEARCH_LIMIT: u64 = 24;

#[derive(Deserialize)]
pub struct SearchQuery {
    pub q: String,
}

pub async fn browse(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Vec<AnimeDto>>>, ApiError> {
    let rows = state.store().browse_anime(BROWSE_LIMIT).await?;
    Ok(Json(ApiResponse::success(
        rows.into_iter().map(Into::into).collect(),
    )))
}

pub async fn search(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchQuery>,
) -> Result<Json<ApiResponse<Vec<AnimeDto>>>, ApiError> {
    let query = params.q.trim();
    if query.is_empty() {
        return Ok(Json(ApiResponse::success(Vec::new())));
    }

    let rows = state.store().search_anime(query, SEARCH_LIMIT).await?;
    Ok(Json(ApiResponse::success(
        rows.into_iter().map(Into::into).collect(),
    )))
}

pub async fn get_by_slug(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
) -> Result<Json<ApiResponse<AnimeDetailDto>>, ApiError> {
    let anime = state
        .store()
        .get_anime_by_slug(&slug)
        .await?
        .ok_or_else(|| ApiError::not_found("Anime", &slug))?;

    let episodes = state.store().episodes_for_anime(anime.id).await?;

    Ok(Json(ApiResponse::success(AnimeDetailDto {
        anime: anime.into(),
        episodes: episodes.into_iter().map(Into::into).collect(),
    })))
}

pub async fn genres(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Vec<GenreDto>>>, ApiError> {
    let rows = state.store().list_genres().await?;
    Ok(Json(ApiResponse::success(
        rows.into_iter().map(Into::into).collect(),
    )))
}
