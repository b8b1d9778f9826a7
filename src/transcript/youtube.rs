//! YouTube transcript backend.
//!
//! Wraps yt-transcript-rs for both fetch tiers. The direct client is built
//! once and reused; the proxied client is rebuilt per call so credential
//! changes between exchanges take effect.

use super::{ProxyCredentials, TranscriptEntry, TranscriptSource};
use crate::error::{Result, SnakkError};
use async_trait::async_trait;
use yt_transcript_rs::api::YouTubeTranscriptApi;
use yt_transcript_rs::proxies::GenericProxyConfig;

/// YouTube transcript source.
pub struct YoutubeTranscriptSource {
    api: YouTubeTranscriptApi,
    languages: Vec<String>,
}

impl YoutubeTranscriptSource {
    /// Create a source requesting transcripts in the given language order.
    pub fn new(languages: Vec<String>) -> Result<Self> {
        let api = YouTubeTranscriptApi::new(None, None, None)
            .map_err(|e| SnakkError::TranscriptSource(e.to_string()))?;

        Ok(Self { api, languages })
    }

    fn language_refs(&self) -> Vec<&str> {
        self.languages.iter().map(String::as_str).collect()
    }
}

#[async_trait]
impl TranscriptSource for YoutubeTranscriptSource {
    async fn fetch(&self, video_id: &str) -> Result<Vec<TranscriptEntry>> {
        let transcript = self
            .api
            .fetch_transcript(video_id, &self.language_refs(), false)
            .await
            .map_err(|e| SnakkError::TranscriptSource(e.to_string()))?;

        Ok(entries_from(transcript))
    }

    async fn fetch_via_proxy(
        &self,
        video_id: &str,
        proxy: &ProxyCredentials,
    ) -> Result<Vec<TranscriptEntry>> {
        let proxy_config =
            GenericProxyConfig::new(Some(proxy.http_url()), Some(proxy.https_url()))
                .map_err(|e| SnakkError::Config(format!("Invalid proxy configuration: {}", e)))?;

        let api = YouTubeTranscriptApi::new(None, Some(Box::new(proxy_config)), None)
            .map_err(|e| sanitized(e.to_string(), proxy))?;

        let transcript = api
            .fetch_transcript(video_id, &self.language_refs(), false)
            .await
            .map_err(|e| sanitized(e.to_string(), proxy))?;

        Ok(entries_from(transcript))
    }
}

fn entries_from(transcript: yt_transcript_rs::FetchedTranscript) -> Vec<TranscriptEntry> {
    transcript
        .snippets
        .into_iter()
        .map(|snippet| TranscriptEntry {
            start_seconds: snippet.start,
            text: snippet.text,
        })
        .collect()
}

/// Proxy URLs embed credentials; keep them out of surfaced errors.
fn sanitized(message: String, proxy: &ProxyCredentials) -> SnakkError {
    SnakkError::TranscriptSource(message.replace(&proxy.password, "***"))
}
