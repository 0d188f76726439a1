use axum::{
    Json,
    extract::{Path, State},
};
use std::sync::Arc;

use super::{AnimeDto, ApiError, ApiResponse, AppState, HomeDto};
use crate::models::Shelf;

pub async fn home(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<HomeDto>>, ApiError> {
    let store = state.store();

    let spotlight = store.shelf(Shelf::Spotlight).await?;
    let trending = store.shelf(Shelf::Trending).await?;
    let top_today = store.shelf(Shelf::TopToday).await?;
    let top_week = store.shelf(Shelf::TopWeek).await?;
    let top_month = store.shelf(Shelf::TopMonth).await?;

    let to_dtos = |rows: Vec<crate::entities::anime::Model>| -> Vec<AnimeDto> {
        rows.into_iter().map(Into::into).collect()
    };

    Ok(Json(ApiResponse::success(HomeDto {
        spotlight: to_dtos(spotlight),
        trending: to_dtos(trending),
        top_today: to_dtos(top_today),
        top_week: to_dtos(top_week),
        top_month: to_dtos(top_month),
    })))
}

pub async fn shelf(
    State(state): State<Arc<AppState>>,
    Path(shelf): Path<String>,
) -> Result<Json<ApiResponse<Vec<AnimeDto>>>, ApiError> {
    let shelf: Shelf = shelf
        .parse()
        .map_err(|e: crate::models::shelf::ParseShelfError| ApiError::validation(e.to_string()))?;

    let rows = state.store().shelf(shelf).await?;
    Ok(Json(ApiResponse::success(
        rows.into_iter().map(Into::into).collect(),
    )))
}
