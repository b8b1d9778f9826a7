//! Two-tier transcript fetching.
//!
//! Always tries a direct fetch first; the proxy tier only runs after the
//! direct attempt has failed and only when a complete credential set is
//! configured. Every call is a fresh two-tier attempt, no caching.

use super::{format_transcript, ProxyCredentials, TranscriptSource};
use crate::error::{Result, SnakkError};
use regex::Regex;
use std::sync::Arc;
use tracing::{debug, warn};

/// Why both fetch tiers failed, one recorded error per attempt.
///
/// Keeps the causal chain inspectable instead of flattening it into
/// nested error text.
#[derive(Debug)]
pub struct FetchFailure {
    /// Error from the direct attempt.
    pub direct: String,
    /// Error from the proxy attempt, when one was made.
    pub proxied: Option<String>,
}

impl std::fmt::Display for FetchFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.proxied {
            None => write!(f, "{}. Proxy credentials not available.", self.direct),
            Some(proxy_err) => write!(f, "tried with and without proxy: {}", proxy_err),
        }
    }
}

/// Fetches and formats video transcripts with proxy fallback.
pub struct TranscriptFetcher {
    source: Arc<dyn TranscriptSource>,
    proxy: Option<ProxyCredentials>,
    video_id_regex: Regex,
}

impl TranscriptFetcher {
    /// Create a fetcher over the given backend.
    ///
    /// Proxy credentials are resolved by the caller once, at construction;
    /// `fetch` never reads the environment itself.
    pub fn new(source: Arc<dyn TranscriptSource>, proxy: Option<ProxyCredentials>) -> Self {
        // The ID is the first 11-character token following a v= query
        // marker or a path separator.
        let video_id_regex = Regex::new(r"(?:v=|/)([0-9A-Za-z_-]{11})").expect("Invalid regex");

        Self {
            source,
            proxy,
            video_id_regex,
        }
    }

    /// Extract a video ID from a URL, taking the first match.
    pub fn extract_video_id(&self, url: &str) -> Option<String> {
        self.video_id_regex
            .captures(url.trim())
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string())
    }

    /// Fetch the transcript for a video URL, formatted as "[MM:SS] text" lines.
    ///
    /// Fails with `InvalidInput` when no video ID can be extracted (no
    /// network call is made), or `TranscriptUnavailable` when both fetch
    /// tiers fail.
    pub async fn fetch(&self, url: &str) -> Result<String> {
        let video_id = self
            .extract_video_id(url)
            .ok_or_else(|| SnakkError::InvalidInput(format!("No video ID found in URL: {}", url)))?;

        debug!("Fetching transcript for video {}", video_id);

        let direct_err = match self.source.fetch(&video_id).await {
            Ok(entries) => return Ok(format_transcript(&entries)),
            Err(e) => e,
        };

        let Some(proxy) = &self.proxy else {
            return Err(SnakkError::TranscriptUnavailable(FetchFailure {
                direct: direct_err.to_string(),
                proxied: None,
            }));
        };

        warn!(
            "Direct fetch failed for {} ({}), retrying via proxy {}",
            video_id, direct_err, proxy
        );

        match self.source.fetch_via_proxy(&video_id, proxy).await {
            Ok(entries) => Ok(format_transcript(&entries)),
            Err(proxy_err) => Err(SnakkError::TranscriptUnavailable(FetchFailure {
                direct: direct_err.to_string(),
                proxied: Some(proxy_err.to_string()),
            })),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transcript::TranscriptEntry;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Outcome a mock tier is scripted to produce.
    type TierResult = std::result::Result<Vec<TranscriptEntry>, String>;

    /// Scripted backend that counts calls per tier.
    struct MockSource {
        direct: TierResult,
        proxied: TierResult,
        direct_calls: AtomicUsize,
        proxied_calls: AtomicUsize,
    }

    impl MockSource {
        fn new(direct: TierResult, proxied: TierResult) -> Self {
            Self {
                direct,
                proxied,
                direct_calls: AtomicUsize::new(0),
                proxied_calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl TranscriptSource for MockSource {
        async fn fetch(&self, _video_id: &str) -> Result<Vec<TranscriptEntry>> {
            self.direct_calls.fetch_add(1, Ordering::SeqCst);
            self.direct.clone().map_err(SnakkError::TranscriptSource)
        }

        async fn fetch_via_proxy(
            &self,
            _video_id: &str,
            _proxy: &ProxyCredentials,
        ) -> Result<Vec<TranscriptEntry>> {
            self.proxied_calls.fetch_add(1, Ordering::SeqCst);
            self.proxied.clone().map_err(SnakkError::TranscriptSource)
        }
    }

    fn entries(text: &str) -> Vec<TranscriptEntry> {
        vec![TranscriptEntry {
            start_seconds: 1.0,
            text: text.to_string(),
        }]
    }

    fn source_err(msg: &str) -> TierResult {
        Err(msg.to_string())
    }

    fn proxy() -> ProxyCredentials {
        ProxyCredentials {
            username: "user".to_string(),
            password: "secret".to_string(),
            host: "proxy.example.com:8080".to_string(),
        }
    }

    #[test]
    fn test_extract_video_id() {
        let fetcher = TranscriptFetcher::new(
            Arc::new(MockSource::new(Ok(vec![]), Ok(vec![]))),
            None,
        );

        assert_eq!(
            fetcher.extract_video_id("https://www.youtube.com/watch?v=dQw4w9WgXcQ"),
            Some("dQw4w9WgXcQ".to_string())
        );
        assert_eq!(
            fetcher.extract_video_id("https://youtu.be/dQw4w9WgXcQ?feature=shared"),
            Some("dQw4w9WgXcQ".to_string())
        );
        // First match wins.
        assert_eq!(
            fetcher.extract_video_id("https://youtu.be/dQw4w9WgXcQ?v=AAAAAAAAAAA"),
            Some("dQw4w9WgXcQ".to_string())
        );

        assert_eq!(fetcher.extract_video_id("https://example.com/short"), None);
        assert_eq!(fetcher.extract_video_id(""), None);
    }

    #[tokio::test]
    async fn test_invalid_url_makes_no_network_call() {
        let source = Arc::new(MockSource::new(Ok(entries("hi")), Ok(vec![])));
        let fetcher = TranscriptFetcher::new(Arc::clone(&source) as Arc<dyn TranscriptSource>, Some(proxy()));

        let err = fetcher.fetch("https://example.com/nope").await.unwrap_err();
        assert!(matches!(err, SnakkError::InvalidInput(_)));
        assert_eq!(source.direct_calls.load(Ordering::SeqCst), 0);
        assert_eq!(source.proxied_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_direct_success_skips_proxy() {
        let source = Arc::new(MockSource::new(Ok(entries("hello")), source_err("unused")));
        let fetcher = TranscriptFetcher::new(Arc::clone(&source) as Arc<dyn TranscriptSource>, Some(proxy()));

        let transcript = fetcher
            .fetch("https://www.youtube.com/watch?v=dQw4w9WgXcQ")
            .await
            .unwrap();

        assert_eq!(transcript, "[00:01] hello");
        assert_eq!(source.direct_calls.load(Ordering::SeqCst), 1);
        assert_eq!(source.proxied_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_direct_failure_without_credentials() {
        let source = Arc::new(MockSource::new(source_err("blocked by network"), Ok(vec![])));
        let fetcher = TranscriptFetcher::new(Arc::clone(&source) as Arc<dyn TranscriptSource>, None);

        let err = fetcher
            .fetch("https://www.youtube.com/watch?v=dQw4w9WgXcQ")
            .await
            .unwrap_err();

        let msg = err.to_string();
        assert!(msg.contains("blocked by network"));
        assert!(msg.contains("Proxy credentials not available"));

        let failure = match err {
            SnakkError::TranscriptUnavailable(failure) => failure,
            other => panic!("Expected TranscriptUnavailable, got {:?}", other),
        };
        assert!(failure.direct.contains("blocked by network"));
        assert!(failure.proxied.is_none());
        assert_eq!(source.proxied_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_proxy_fallback_returns_proxied_entries() {
        let source = Arc::new(MockSource::new(
            source_err("blocked by network"),
            Ok(entries("via proxy")),
        ));
        let fetcher = TranscriptFetcher::new(Arc::clone(&source) as Arc<dyn TranscriptSource>, Some(proxy()));

        let transcript = fetcher
            .fetch("https://www.youtube.com/watch?v=dQw4w9WgXcQ")
            .await
            .unwrap();

        assert_eq!(transcript, "[00:01] via proxy");
        assert_eq!(source.direct_calls.load(Ordering::SeqCst), 1);
        assert_eq!(source.proxied_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_both_tiers_failing_reports_proxy_error() {
        let source = Arc::new(MockSource::new(
            source_err("blocked by network"),
            source_err("proxy timed out"),
        ));
        let fetcher = TranscriptFetcher::new(Arc::clone(&source) as Arc<dyn TranscriptSource>, Some(proxy()));

        let err = fetcher
            .fetch("https://www.youtube.com/watch?v=dQw4w9WgXcQ")
            .await
            .unwrap_err();

        let msg = err.to_string();
        assert!(msg.contains("with and without proxy"));
        assert!(msg.contains("proxy timed out"));
        assert!(!msg.contains("secret"));

        let failure = match err {
            SnakkError::TranscriptUnavailable(failure) => failure,
            other => panic!("Expected TranscriptUnavailable, got {:?}", other),
        };
        assert!(failure.direct.contains("blocked by network"));
        assert_eq!(
            failure.proxied.as_deref(),
            Some("Transcript source error: proxy timed out")
        );
    }
}
