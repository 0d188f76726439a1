use serde::Deserialize;

/// Path marker identifying the list-thumbnail poster variant.
pub const THUMBNAIL_MARKER: &str = "300x400";

/// Nested episode-count block. Fields here take precedence over the same
/// fields on the surrounding TV-info block.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawEpisodeInfo {
    pub sub: Option<String>,
    pub dub: Option<String>,
    pub eps: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawTvInfo {
    #[serde(rename = "showType")]
    pub show_type: Option<String>,
    pub duration: Option<String>,
    #[serde(rename = "releaseDate")]
    pub release_date: Option<String>,
    pub quality: Option<String>,
    #[serde(rename = "episodeInfo")]
    pub episode_info: Option<RawEpisodeInfo>,
    pub sub: Option<String>,
    pub dub: Option<String>,
    pub eps: Option<String>,
}

/// One upstream catalog item as it arrives from any list context
/// (spotlight, trending, top-ten, top-airing). Field names follow the
/// upstream JSON exactly; unknown fields are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawAnimeItem {
    pub id: Option<String>,
    pub data_id: Option<String>,
    pub poster: Option<String>,
    pub title: Option<String>,
    pub japanese_title: Option<String>,
    pub description: Option<String>,
    #[serde(rename = "tvInfo")]
    pub tv_info: Option<RawTvInfo>,
    #[serde(rename = "adultContent")]
    pub adult_content: Option<bool>,
    /// Explicit rank within a ranked list; absent for spotlight/top-airing.
    pub number: Option<String>,
}

/// Canonical write shape produced by normalization, consumed by the
/// anime upsert.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedAnime {
    pub external_id: String,
    pub data_id: String,
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

/// Parse an upstream count field. Empty and non-numeric strings are
/// absent, never zero.
pub fn parse_count(raw: Option<&str>) -> Option<i32> {
    raw?.trim().parse::<i32>().ok()
}

fn pick<'a>(nested: Option<&'a String>, top: Option<&'a String>) -> Option<&'a str> {
    nested.or(top).map(String::as_str)
}

/// Infer the total episode count from a TV-info block.
///
/// Candidate fields are selected by presence (the nested episode-info block
/// wins over the top-level fields), then consulted in a fixed order:
/// combined eps, sub count, dub count. The first candidate that parses as
/// an integer wins; if none parse the total is unknown.
pub fn infer_total_episodes(tv: &RawTvInfo) -> Option<i32> {
    let ep_info = tv.episode_info.as_ref();

    let combined = pick(ep_info.and_then(|e| e.eps.as_ref()), tv.eps.as_ref());
    let sub = pick(ep_info.and_then(|e| e.sub.as_ref()), tv.sub.as_ref());
    let dub = pick(ep_info.and_then(|e| e.dub.as_ref()), tv.dub.as_ref());

    parse_count(combined)
        .or_else(|| parse_count(sub))
        .or_else(|| parse_count(dub))
}

/// Which poster column a single upstream URL belongs in. A URL whose path
/// carries the thumbnail dimension marker is the small/list variant;
/// anything else is the large/hero variant. One URL never fills both.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PosterVariant {
    Small(String),
    Large(String),
}

pub fn classify_poster(url: &str) -> PosterVariant {
    if url.contains(THUMBNAIL_MARKER) {
        PosterVariant::Small(url.to_string())
    } else {
        PosterVariant::Large(url.to_string())
    }
}

/// Parse an explicit rank field. Unparseable ranks degrade to the caller's
/// positional fallback, not an error.
pub fn explicit_rank(item: &RawAnimeItem) -> Option<i32> {
    parse_count(item.number.as_deref())
}

/// Convert one upstream item into the canonical write shape. Items missing
/// an external id or a title cannot be stored and yield `None`.
pub fn normalize_item(item: &RawAnimeItem) -> Option<NormalizedAnime> {
    let external_id = item.id.as_ref()?.clone();
    let title = item.title.as_ref()?.clone();

    let default_tv = RawTvInfo::default();
    let tv = item.tv_info.as_ref().unwrap_or(&default_tv);
    let ep_info = tv.episode_info.as_ref();

    let sub_count = pick(ep_info.and_then(|e| e.sub.as_ref()), tv.sub.as_ref());
    let dub_count = pick(ep_info.and_then(|e| e.dub.as_ref()), tv.dub.as_ref());

    let (poster, poster_small) = match item.poster.as_deref().map(classify_poster) {
        Some(PosterVariant::Small(url)) => (None, Some(url)),
        Some(PosterVariant::Large(url)) => (Some(url), None),
        None => (None, None),
    };

    Some(NormalizedAnime {
        external_id,
        data_id: item.data_id.clone().unwrap_or_default(),
        title,
        japanese_title: item.japanese_title.clone(),
        description: item.description.clone(),
        poster,
        poster_small,
        show_type: tv.show_type.clone(),
        duration: tv.duration.clone(),
        release_date: tv.release_date.clone(),
        quality: tv.quality.clone(),
        sub_count: sub_count.map(ToString::to_string),
        dub_count: dub_count.map(ToString::to_string),
        total_episodes: infer_total_episodes(tv),
        adult_content: item.adult_content.unwrap_or(false),
    })
}
