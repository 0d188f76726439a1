use axum::{
    Json,
    extract::{Path, State},
};
use std::sync::Arc;

use super::{AnimeDto, ApiError, ApiResponse, AppState, FavoriteStateDto};

/// Toggle the guest user's favorite state for an anime; returns the new
/// state. Creates the guest user on first use.
pub async fn toggle(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<FavoriteStateDto>>, ApiError> {
    let store = state.store();

    let anime = store
        .get_anime(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Anime", id))?;

    let user_id = store.guest_user_id().await?;
    let favorite = store.toggle_favorite(user_id, anime.id).await?;

    Ok(Json(ApiResponse::success(FavoriteStateDto { favorite })))
}

/// Favorite state without creating the guest user as a side effect.
pub async fn status(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<FavoriteStateDto>>, ApiError> {
    let store = state.store();

    let favorite = match store.existing_guest_user_id().await? {
        Some(user_id) => store.is_favorite(user_id, id).await?,
        None => false,
    };

    Ok(Json(ApiResponse::success(FavoriteStateDto { favorite })))
}

pub async fn list(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Vec<AnimeDto>>>, ApiError> {
    let store = state.store();

    let rows = match store.existing_guest_user_id().await? {
        Some(user_id) => store.list_favorites(user_id).await?,
        None => Vec::new(),
    };

    Ok(Json(ApiResponse::success(
        rows.into_iter().map(Into::into).collect(),
    )))
}
