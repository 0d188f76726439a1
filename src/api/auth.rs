use axum::{
    extract::{Query, Request, State},
    middleware::Next,
    response::Response,
};
use serde::Deserialize;
use std::sync::Arc;

use super::{ApiError, AppState};

#[derive(Deserialize)]
pub struct ApiKeyQuery {
    #[serde(default)]
    api_key: Option<String>,
}

/// Shared-secret check for protected routes: `x-api-key` header, or the
/// `api_key` query parameter when the config allows it. Plain equality
/// against the configured key.
pub async fn require_api_key(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ApiKeyQuery>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let (expected, allow_query) = {
        let config = state.config().read().await;
        (
            config.security.api_key.clone(),
            config.server.allow_api_key_in_query,
        )
    };

    if expected.is_empty() {
        tracing::error!("security.api_key is not configured; rejecting request");
        return Err(ApiError::unauthorized("Missing or invalid API key"));
    }

    let header_key = request
        .headers()
        .get("x-api-key")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    let provided = header_key.or_else(|| {
        if allow_query {
            params.api_key.clone()
        } else {
            None
        }
    });

    if provided.as_deref() == Some(expected.as_str()) {
        Ok(next.run(request).await)
    } else {
        Err(ApiError::unauthorized("Missing or invalid API key"))
    }
}
