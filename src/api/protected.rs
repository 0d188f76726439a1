use axum::{Json, extract::State};
use serde::Serialize;
use std::sync::Arc;

use super::{ApiResponse, AppState};

#[derive(Debug, Serialize)]
pub struct ProtectedPingDto {
    pub message: String,
    pub timestamp: String,
}

/// Example endpoint behind the API-key check.
pub async fn ping(State(_state): State<Arc<AppState>>) -> Json<ApiResponse<ProtectedPingDto>> {
    Json(ApiResponse::success(ProtectedPingDto {
        message: "Authenticated successfully. This data is protected.".to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
    }))
}

#[derive(Debug, Serialize)]
pub struct SystemStatusDto {
    pub version: String,
    pub uptime_seconds: u64,
}

pub async fn system_status(
    State(state): State<Arc<AppState>>,
) -> Json<ApiResponse<SystemStatusDto>> {
    Json(ApiResponse::success(SystemStatusDto {
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.start_time.elapsed().as_secs(),
    }))
}
