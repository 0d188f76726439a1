use std::sync::Arc;

use animato::clients::catalog::{CatalogClient, HomeResults};
use animato::config::UpstreamConfig;
use animato::db::Store;
use animato::ingest::Ingestor;
use animato::models::Shelf;
use serde_json::json;

async fn spawn_ingestor() -> (Ingestor, Store) {
    let store = Store::new("sqlite::memory:").await.unwrap();
    let catalog = Arc::new(CatalogClient::new(&UpstreamConfig::default()).unwrap());
    (Ingestor::new(store.clone(), catalog), store)
}

fn fixture(value: serde_json::Value) -> HomeResults {
    serde_json::from_value(value).unwrap()
}

fn basic_home() -> HomeResults {
    fixture(json!({
        "spotlights": [
            {
                "id": "solo-leveling-18718",
                "data_id": "18718",
                "title": "Solo Leveling",
                "japanese_title": "Ore dake Level Up na Ken",
                "description": "Hunters defend humanity from monsters.",
                "poster": "https://img.example/solo-hero.jpg",
                "tvInfo": {
                    "showType": "TV",
                    "duration": "24m",
                    "episodeInfo": { "sub": "12", "dub": "12" }
                }
            }
        ],
        "trending": [
            {
                "id": "frieren-18542",
                "data_id": "18542",
                "title": "Frieren: Beyond Journey's End",
                "poster": "https://img.example/300x400/frieren.jpg",
                "tvInfo": { "episodeInfo": { "sub": "28" }, "sub": "99" },
                "number": "1"
            },
            {
                "id": "one-piece-100",
                "data_id": "100",
                "title": "One Piece",
                "tvInfo": { "eps": "250" },
                "number": "2"
            },
            {
                "id": "mushoku-tensei-17947",
                "data_id": "17947",
                "title": "Mushoku Tensei"
            }
        ],
        "topTen": {
            "today": [
                {
                    "id": "frieren-18542",
                    "data_id": "18542",
                    "title": "Frieren: Beyond Journey's End",
                    "number": "1"
                }
            ]
        },
        "topAiring": [
            {
                "id": "kaiju-no-8-19319",
                "data_id": "19319",
                "title": "Kaiju No. 8",
                "tvInfo": { "sub": "not-a-number" }
            }
        ]
    }))
}

#[tokio::test]
async fn ingestion_is_idempotent() {
    let (ingestor, store) = spawn_ingestor().await;
    let home = basic_home();

    ingestor.ingest(&home).await.unwrap();
    let first = store
        .get_anime_by_external_id("frieren-18542")
        .await
        .unwrap()
        .unwrap();
    let first_trending = store.shelf(Shelf::Trending).await.unwrap();
    let first_episode_count = store
        .episodes_for_anime(first.id)
        .await
        .unwrap()
        .len();

    ingestor.ingest(&home).await.unwrap();
    let second = store
        .get_anime_by_external_id("frieren-18542")
        .await
        .unwrap()
        .unwrap();
    let second_trending = store.shelf(Shelf::Trending).await.unwrap();
    let second_episode_count = store
        .episodes_for_anime(second.id)
        .await
        .unwrap()
        .len();

    assert_eq!(first, second);
    assert_eq!(first_episode_count, second_episode_count);
    assert_eq!(
        first_trending.iter().map(|a| a.id).collect::<Vec<_>>(),
        second_trending.iter().map(|a| a.id).collect::<Vec<_>>()
    );
}

#[tokio::test]
async fn nested_episode_info_beats_top_level_count() {
    let (ingestor, store) = spawn_ingestor().await;
    ingestor.ingest(&basic_home()).await.unwrap();

    let frieren = store
        .get_anime_by_external_id("frieren-18542")
        .await
        .unwrap()
        .unwrap();

    // episodeInfo.sub = "28" wins over the top-level sub = "99"
    assert_eq!(frieren.total_episodes, Some(28));
    assert_eq!(frieren.sub_count.as_deref(), Some("28"));
}

#[tokio::test]
async fn unknown_count_materializes_the_default_twelve() {
    let (ingestor, store) = spawn_ingestor().await;
    ingestor.ingest(&basic_home()).await.unwrap();

    let kaiju = store
        .get_anime_by_external_id("kaiju-no-8-19319")
        .await
        .unwrap()
        .unwrap();

    assert_eq!(kaiju.total_episodes, None);

    let episodes = store.episodes_for_anime(kaiju.id).await.unwrap();
    assert_eq!(episodes.len(), 12);
    assert_eq!(episodes.first().unwrap().title, "Episode 1");
}

#[tokio::test]
async fn episode_materialization_is_capped_at_one_hundred() {
    let (ingestor, store) = spawn_ingestor().await;
    ingestor.ingest(&basic_home()).await.unwrap();

    let one_piece = store
        .get_anime_by_external_id("one-piece-100")
        .await
        .unwrap()
        .unwrap();

    assert_eq!(one_piece.total_episodes, Some(250));

    let episodes = store.episodes_for_anime(one_piece.id).await.unwrap();
    assert_eq!(episodes.len(), 100);
    assert_eq!(episodes.last().unwrap().number, 100);
}

#[tokio::test]
async fn poster_url_fills_exactly_one_variant() {
    let (ingestor, store) = spawn_ingestor().await;
    ingestor.ingest(&basic_home()).await.unwrap();

    let frieren = store
        .get_anime_by_external_id("frieren-18542")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(
        frieren.poster_small.as_deref(),
        Some("https://img.example/300x400/frieren.jpg")
    );
    assert_eq!(frieren.poster, None);

    let solo = store
        .get_anime_by_external_id("solo-leveling-18718")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(solo.poster.as_deref(), Some("https://img.example/solo-hero.jpg"));
    assert_eq!(solo.poster_small, None);
}

#[tokio::test]
async fn hero_poster_update_does_not_clobber_thumbnail() {
    let (ingestor, store) = spawn_ingestor().await;
    ingestor.ingest(&basic_home()).await.unwrap();

    let update = fixture(json!({
        "trending": [
            {
                "id": "frieren-18542",
                "data_id": "18542",
                "title": "Frieren: Beyond Journey's End",
                "poster": "https://img.example/frieren-hero.jpg",
                "number": "1"
            }
        ]
    }));
    ingestor.ingest(&update).await.unwrap();

    let frieren = store
        .get_anime_by_external_id("frieren-18542")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(
        frieren.poster_small.as_deref(),
        Some("https://img.example/300x400/frieren.jpg")
    );
}

#[tokio::test]
async fn missing_rank_falls_back_to_list_position() {
    let (ingestor, store) = spawn_ingestor().await;
    ingestor.ingest(&basic_home()).await.unwrap();

    let trending = store.shelf(Shelf::Trending).await.unwrap();
    assert_eq!(trending.len(), 3);
    // Third trending item carries no explicit number; position 3 wins.
    assert_eq!(trending[2].external_id, "mushoku-tensei-17947");
}

#[tokio::test]
async fn slug_is_set_once_and_equals_external_id() {
    let (ingestor, store) = spawn_ingestor().await;
    ingestor.ingest(&basic_home()).await.unwrap();

    let solo = store
        .get_anime_by_external_id("solo-leveling-18718")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(solo.slug, "solo-leveling-18718");
}

#[tokio::test]
async fn top_airing_items_get_no_featured_rows() {
    let (ingestor, store) = spawn_ingestor().await;
    ingestor.ingest(&basic_home()).await.unwrap();

    let kaiju = store
        .get_anime_by_external_id("kaiju-no-8-19319")
        .await
        .unwrap();
    assert!(kaiju.is_some());

    for shelf in Shelf::ALL {
        let rows = store.shelf(shelf).await.unwrap();
        assert!(rows.iter().all(|a| a.external_id != "kaiju-no-8-19319"));
    }
}

#[tokio::test]
async fn second_run_fully_replaces_shelf_rankings() {
    let (ingestor, store) = spawn_ingestor().await;
    ingestor.ingest(&basic_home()).await.unwrap();

    let replacement = fixture(json!({
        "trending": [
            {
                "id": "dandadan-19619",
                "data_id": "19619",
                "title": "Dandadan",
                "number": "1"
            }
        ]
    }));
    ingestor.ingest(&replacement).await.unwrap();

    let trending = store.shelf(Shelf::Trending).await.unwrap();
    assert_eq!(trending.len(), 1);
    assert_eq!(trending[0].external_id, "dandadan-19619");

    // Other shelves were cleared too and not rebuilt by the second run.
    assert!(store.shelf(Shelf::Spotlight).await.unwrap().is_empty());

    // The catalog itself is never pruned by a shelf rebuild.
    assert!(store
        .get_anime_by_external_id("solo-leveling-18718")
        .await
        .unwrap()
        .is_some());
}

#[tokio::test]
async fn duplicate_rank_overwrites_earlier_placement() {
    let (ingestor, store) = spawn_ingestor().await;

    let home = fixture(json!({
        "trending": [
            { "id": "a-1", "data_id": "1", "title": "First", "number": "1" },
            { "id": "b-2", "data_id": "2", "title": "Second", "number": "1" }
        ]
    }));
    ingestor.ingest(&home).await.unwrap();

    let trending = store.shelf(Shelf::Trending).await.unwrap();
    assert_eq!(trending.len(), 1);
    assert_eq!(trending[0].external_id, "b-2");
}

#[tokio::test]
async fn genres_are_seeded_with_slugs() {
    let (ingestor, store) = spawn_ingestor().await;
    ingestor.ingest(&basic_home()).await.unwrap();

    let genres = store.list_genres().await.unwrap();
    assert_eq!(genres.len(), 8);
    assert!(genres.iter().any(|g| g.slug == "sci-fi" && g.name == "Sci-Fi"));
}
