use serde::{Deserialize, Serialize};

use crate::entities::{anime, episode, genre};

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub const fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AnimeDto {
    pub id: i32,
    pub slug: String,
    pub external_id: String,
    pub title: String,
    pub japanese_title: Option<String>,
    pub description: Option<String>,
    pub poster: Option<String>,
    pub poster_small: Option<String>,
    pub show_type: Option<String>,
    pub duration: Option<String>,
    pub release_date: Option<String>,
    pub quality: Option<String>,
    pub sub_count: Option<String>,
    pub dub_count: Option<String>,
    pub total_episodes: Option<i32>,
    pub adult_content: bool,
}

impl From<anime::Model> for AnimeDto {
    fn from(model: anime::Model) -> Self {
        Self {
            id: model.id,
            slug: model.slug,
            external_id: model.external_id,
            title: model.title,
            japanese_title: model.japanese_title,
            description: model.description,
            poster: model.poster,
            poster_small: model.poster_small,
            show_type: model.show_type,
            duration: model.duration,
            release_date: model.release_date,
            quality: model.quality,
            sub_count: model.sub_count,
            dub_count: model.dub_count,
            total_episodes: model.total_episodes,
            adult_content: model.adult_content,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct EpisodeDto {
    pub number: i32,
    pub title: String,
}

impl From<episode::Model> for EpisodeDto {
    fn from(model: episode::Model) -> Self {
        Self {
            number: model.number,
            title: model.title,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct GenreDto {
    pub name: String,
    pub slug: String,
}

impl From<genre::Model> for GenreDto {
    fn from(model: genre::Model) -> Self {
        Self {
            name: model.name,
            slug: model.slug,
        }
    }
}

/// All five homepage shelves in rank order.
#[derive(Debug, Serialize)]
pub struct HomeDto {
    pub spotlight: Vec<AnimeDto>,
    pub trending: Vec<AnimeDto>,
    pub top_today: Vec<AnimeDto>,
    pub top_week: Vec<AnimeDto>,
    pub top_month: Vec<AnimeDto>,
}

#[derive(Debug, Serialize)]
pub struct AnimeDetailDto {
    #[serde(flatten)]
    pub anime: AnimeDto,
    pub episodes: Vec<EpisodeDto>,
}

/// Watch-page payload. `embed_url` is None when resolution fails; the
/// caller renders a fallback instead of an error state.
#[derive(Debug, Serialize)]
pub struct WatchDto {
    pub anime: AnimeDto,
    pub episode: EpisodeDto,
    pub embed_url: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct FavoriteStateDto {
    pub favorite: bool,
}

#[derive(Debug, Deserialize)]
pub struct ProgressRequest {
    pub anime_id: i32,
    pub episode_number: i32,
    pub progress: f32,
    #[serde(default)]
    pub completed: bool,
}
