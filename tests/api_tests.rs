use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use std::sync::Arc;

use animato::api::AppState;
use animato::config::Config;
use animato::ingest::normalize::NormalizedAnime;
use http_body_util::BodyExt;
use tower::ServiceExt;

/// Default API key from `SecurityConfig::default`.
const DEFAULT_API_KEY: &str = "animato_default_api_key_please_regenerate";

async fn spawn_app_with_config(mut config: Config) -> (Router, Arc<AppState>) {
    config.general.database_path = "sqlite::memory:".to_string();
    // Unroutable upstream: any resolution attempt fails fast instead of
    // reaching the live aggregator from a test.
    config.upstream.base_url = "http://127.0.0.1:1".to_string();
    config.upstream.request_timeout_seconds = 1;

    let state = animato::api::create_app_state_from_config(config)
        .await
        .expect("Failed to create app state");
    (animato::api::router(state.clone()).await, state)
}

async fn spawn_app() -> (Router, Arc<AppState>) {
    spawn_app_with_config(Config::default()).await
}

fn sample_anime(external_id: &str, title: &str) -> NormalizedAnime {
    NormalizedAnime {
        external_id: external_id.to_string(),
        data_id: "1".to_string(),
        title: title.to_string(),
        japanese_title: None,
        description: None,
        poster: Some("https://img.example/hero.jpg".to_string()),
        poster_small: None,
        show_type: Some("TV".to_string()),
        duration: Some("24m".to_string()),
        release_date: None,
        quality: Some("HD".to_string()),
        sub_count: Some("12".to_string()),
        dub_count: None,
        total_episodes: Some(12),
        adult_content: false,
    }
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&body).unwrap()
}

#[tokio::test]
async fn test_protected_endpoint_requires_api_key() {
    let (app, _state) = spawn_app().await;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/protected/ping")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/protected/ping")
                .header("x-api-key", "wrong-key")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/protected/ping")
                .header("x-api-key", DEFAULT_API_KEY)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["success"], true);
    assert!(json["data"]["timestamp"].is_string());
}

#[tokio::test]
async fn test_api_key_in_query_is_config_gated() {
    let (app, _state) = spawn_app().await;

    // Disabled by default.
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri(format!("/api/protected/ping?api_key={DEFAULT_API_KEY}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let mut config = Config::default();
    config.server.allow_api_key_in_query = true;
    let (app, _state) = spawn_app_with_config(config).await;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri(format!("/api/protected/ping?api_key={DEFAULT_API_KEY}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_search_blank_query_returns_empty() {
    let (app, _state) = spawn_app().await;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/anime/search?q=%20%20")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_search_matches_title_substring() {
    let (app, state) = spawn_app().await;

    state
        .store()
        .upsert_anime(&sample_anime("solo-leveling-18718", "Solo Leveling"))
        .await
        .unwrap();
    state
        .store()
        .upsert_anime(&sample_anime("one-piece-100", "One Piece"))
        .await
        .unwrap();

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/anime/search?q=leveling")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let results = json["data"].as_array().unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0]["title"], "Solo Leveling");
}

#[tokio::test]
async fn test_anime_by_slug_and_404() {
    let (app, state) = spawn_app().await;

    let id = state
        .store()
        .upsert_anime(&sample_anime("solo-leveling-18718", "Solo Leveling"))
        .await
        .unwrap();
    state.store().materialize_episodes(id, 3).await.unwrap();

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/anime/solo-leveling-18718")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["data"]["slug"], "solo-leveling-18718");
    assert_eq!(json["data"]["episodes"].as_array().unwrap().len(), 3);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/anime/not-a-slug")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_unknown_shelf_is_rejected() {
    let (app, _state) = spawn_app().await;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/shelves/top_year")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_watch_degrades_to_null_embed_url_when_upstream_is_down() {
    let (app, state) = spawn_app().await;

    let id = state
        .store()
        .upsert_anime(&sample_anime("solo-leveling-18718", "Solo Leveling"))
        .await
        .unwrap();
    state.store().materialize_episodes(id, 12).await.unwrap();

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/watch/solo-leveling-18718/3?audio=dub")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["success"], true);
    assert_eq!(json["data"]["episode"]["number"], 3);
    assert!(json["data"]["embed_url"].is_null());

    // Unknown episode number is a 404, not a resolution failure.
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/watch/solo-leveling-18718/99")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_favorite_toggle_roundtrip() {
    let (app, state) = spawn_app().await;

    let id = state
        .store()
        .upsert_anime(&sample_anime("solo-leveling-18718", "Solo Leveling"))
        .await
        .unwrap();

    // No guest user yet: status is false and does not create one.
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri(format!("/api/anime/{id}/favorite"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let json = body_json(response).await;
    assert_eq!(json["data"]["favorite"], false);
    assert!(state.store().existing_guest_user_id().await.unwrap().is_none());

    let toggle = move |app: Router| async move {
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(format!("/api/anime/{id}/favorite"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        body_json(response).await
    };

    let json = toggle(app.clone()).await;
    assert_eq!(json["data"]["favorite"], true);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/favorites")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let json = body_json(response).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 1);

    let json = toggle(app.clone()).await;
    assert_eq!(json["data"]["favorite"], false);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/anime/9999/favorite")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_watch_progress_upserts() {
    let (app, state) = spawn_app().await;

    let id = state
        .store()
        .upsert_anime(&sample_anime("solo-leveling-18718", "Solo Leveling"))
        .await
        .unwrap();
    state.store().materialize_episodes(id, 12).await.unwrap();

    let post_progress = move |app: Router, progress: f32, completed: bool| async move {
        app.oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/watch/progress")
                .header("Content-Type", "application/json")
                .body(Body::from(
                    serde_json::json!({
                        "anime_id": id,
                        "episode_number": 1,
                        "progress": progress,
                        "completed": completed
                    })
                    .to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap()
    };

    let response = post_progress(app.clone(), 120.5, false).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = post_progress(app.clone(), 1400.0, true).await;
    assert_eq!(response.status(), StatusCode::OK);

    let user_id = state.store().existing_guest_user_id().await.unwrap().unwrap();
    let history = state.store().watch_history(user_id).await.unwrap();
    assert_eq!(history.len(), 1);
    assert!(history[0].completed);
    assert!((history[0].progress - 1400.0).abs() < f32::EPSILON);

    // Progress against an unmaterialized episode is rejected.
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/watch/progress")
                .header("Content-Type", "application/json")
                .body(Body::from(
                    serde_json::json!({
                        "anime_id": id,
                        "episode_number": 999,
                        "progress": 0.0
                    })
                    .to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_home_returns_all_shelves() {
    let (app, state) = spawn_app().await;

    let id = state
        .store()
        .upsert_anime(&sample_anime("solo-leveling-18718", "Solo Leveling"))
        .await
        .unwrap();
    state
        .store()
        .feature_anime(animato::models::Shelf::Trending, 1, id)
        .await
        .unwrap();

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/home")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["data"]["trending"].as_array().unwrap().len(), 1);
    assert_eq!(json["data"]["spotlight"].as_array().unwrap().len(), 0);
}
