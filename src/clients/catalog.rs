use anyhow::Result;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::config::UpstreamConfig;
use crate::ingest::normalize::RawAnimeItem;
use crate::models::audio::AudioTrack;
use crate::services::stream::StreamSource;

/// Envelope returned by the aggregator's home endpoint.
#[derive(Debug, Deserialize)]
pub struct HomeEnvelope {
    #[serde(default)]
    pub success: bool,
    pub results: Option<HomeResults>,
}

#[derive(Debug, Default, Deserialize)]
pub struct HomeResults {
    #[serde(default)]
    pub spotlights: Vec<RawAnimeItem>,
    #[serde(default)]
    pub trending: Vec<RawAnimeItem>,
    #[serde(default, rename = "topTen")]
    pub top_ten: TopTen,
    #[serde(default, rename = "topAiring")]
    pub top_airing: Vec<RawAnimeItem>,
}

#[derive(Debug, Default, Deserialize)]
pub struct TopTen {
    #[serde(default)]
    pub today: Vec<RawAnimeItem>,
    #[serde(default)]
    pub week: Vec<RawAnimeItem>,
    #[serde(default)]
    pub month: Vec<RawAnimeItem>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EpisodeListEnvelope {
    pub results: Option<EpisodeListResults>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EpisodeListResults {
    #[serde(default)]
    pub episodes: Vec<EpisodeEntry>,
}

/// One entry of the upstream episode list. `episode_no` is the upstream's
/// own numbering, matched directly against the display episode number.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EpisodeEntry {
    pub episode_no: i32,
    pub id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StreamEnvelope {
    pub results: Option<StreamResults>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StreamResults {
    #[serde(rename = "streamingLink")]
    pub streaming_link: Option<StreamingLink>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StreamingLink {
    pub iframe: Option<String>,
}

#[derive(Clone)]
pub struct CatalogClient {
    client: Client,
    base_url: String,
}

impl CatalogClient {
    pub fn new(config: &UpstreamConfig) -> Result<Self> {
        // One shared client per process: connection pooling across the
        // seed run and all concurrent resolutions.
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.request_timeout_seconds.into()))
            .user_agent(concat!("Animato/", env!("CARGO_PKG_VERSION")))
            .pool_max_idle_per_host(10)
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to build HTTP client: {e}"))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Fetch the full home listing used by ingestion. A non-success
    /// envelope or missing results block is a hard error: the batch run
    /// has nothing trustworthy to work from.
    pub async fn home(&self) -> Result<HomeResults> {
        let url = format!("{}/api", self.base_url);
        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(anyhow::anyhow!("Catalog API error: {} - {}", status, body));
        }

        let envelope: HomeEnvelope = response.json().await?;
        if !envelope.success {
            return Err(anyhow::anyhow!("Catalog API reported failure"));
        }

        envelope
            .results
            .ok_or_else(|| anyhow::anyhow!("Catalog API response missing results"))
    }
}

#[async_trait]
impl StreamSource for CatalogClient {
    async fn episode_list(&self, external_id: &str) -> Result<EpisodeListEnvelope> {
        let url = format!("{}/api/episodes/{}", self.base_url, external_id);
        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(anyhow::anyhow!("Episode list error: {} - {}", status, body));
        }

        Ok(response.json().await?)
    }

    async fn stream_link(
        &self,
        episode_id: &str,
        server: &str,
        audio: AudioTrack,
    ) -> Result<StreamEnvelope> {
        let url = format!(
            "{}/api/stream?id={}&server={}&type={}",
            self.base_url,
            urlencoding::encode(episode_id),
            server,
            audio.as_str()
        );
        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(anyhow::anyhow!("Stream API error: {} - {}", status, body));
        }

        Ok(response.json().await?)
    }
}
