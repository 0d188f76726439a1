use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::clients::catalog::{EpisodeListEnvelope, StreamEnvelope};
use crate::config::UpstreamConfig;
use crate::db::Store;
use crate::models::AudioTrack;

/// The two upstream calls stream resolution depends on. `CatalogClient`
/// is the production implementation; tests substitute stubs.
#[async_trait]
pub trait StreamSource: Send + Sync {
    async fn episode_list(&self, external_id: &str) -> Result<EpisodeListEnvelope>;

    async fn stream_link(
        &self,
        episode_id: &str,
        server: &str,
        audio: AudioTrack,
    ) -> Result<StreamEnvelope>;
}

/// Resolves an anime's episode to a playable embed URL via a two-step
/// upstream chain. Every failure path collapses to `None`: the caller
/// renders a graceful fallback, never an error state.
///
/// The returned URL is opaque and passed through with no origin
/// validation; rendering it in a frame trusts the upstream entirely.
pub struct StreamResolver {
    source: Arc<dyn StreamSource>,
    store: Store,
    server: String,
    episodes_ttl: u64,
    stream_ttl: u64,
}

impl StreamResolver {
    #[must_use]
    pub fn new(source: Arc<dyn StreamSource>, store: Store, config: &UpstreamConfig) -> Self {
        Self {
            source,
            store,
            server: config.server.clone(),
            episodes_ttl: config.episodes_cache_seconds,
            stream_ttl: config.stream_cache_seconds,
        }
    }

    /// One-shot resolution, no retry. Both upstream calls are cached for
    /// a short window keyed by their own parameters.
    pub async fn resolve(
        &self,
        external_id: &str,
        episode_number: i32,
        audio: AudioTrack,
    ) -> Option<String> {
        match self.try_resolve(external_id, episode_number, audio).await {
            Ok(url) => url,
            Err(e) => {
                warn!(
                    "Stream resolution failed for {} ep {}: {}",
                    external_id, episode_number, e
                );
                None
            }
        }
    }

    async fn try_resolve(
        &self,
        external_id: &str,
        episode_number: i32,
        audio: AudioTrack,
    ) -> Result<Option<String>> {
        let episodes = self.cached_episode_list(external_id).await?;

        let Some(entry) = episodes
            .results
            .as_ref()
            .map(|r| r.episodes.as_slice())
            .unwrap_or_default()
            .iter()
            .find(|e| e.episode_no == episode_number)
        else {
            debug!(
                "No upstream episode entry for {} ep {}",
                external_id, episode_number
            );
            return Ok(None);
        };

        let envelope = self.cached_stream_link(&entry.id, audio).await?;

        Ok(envelope
            .results
            .and_then(|r| r.streaming_link)
            .and_then(|l| l.iframe))
    }

    async fn cached_episode_list(&self, external_id: &str) -> Result<EpisodeListEnvelope> {
        let key = format!("episodes:{external_id}");

        // Cache failures are performance losses, not resolution failures.
        if let Ok(Some(payload)) = self.store.cache_get(&key).await
            && let Ok(envelope) = serde_json::from_str(&payload)
        {
            debug!("Episode list cache hit for {}", external_id);
            return Ok(envelope);
        }

        let envelope = self.source.episode_list(external_id).await?;

        if let Ok(payload) = serde_json::to_string(&envelope) {
            let _ = self.store.cache_put(&key, &payload, self.episodes_ttl).await;
        }

        Ok(envelope)
    }

    async fn cached_stream_link(
        &self,
        episode_id: &str,
        audio: AudioTrack,
    ) -> Result<StreamEnvelope> {
        let key = format!("stream:{episode_id}:{}:{}", self.server, audio.as_str());

        if let Ok(Some(payload)) = self.store.cache_get(&key).await
            && let Ok(envelope) = serde_json::from_str(&payload)
        {
            debug!("Stream link cache hit for {}", episode_id);
            return Ok(envelope);
        }

        let envelope = self
            .source
            .stream_link(episode_id, &self.server, audio)
            .await?;

        if let Ok(payload) = serde_json::to_string(&envelope) {
            let _ = self.store.cache_put(&key, &payload, self.stream_ttl).await;
        }

        Ok(envelope)
    }
}
