//! Snakk - Chat with YouTube videos
//!
//! A terminal chat agent that answers questions about YouTube videos by
//! fetching their transcripts on demand and streaming answers back as they
//! are generated.
//!
//! The name "Snakk" comes from the Norwegian word for "talk."
//!
//! # Overview
//!
//! Snakk allows you to:
//! - Chat about any YouTube video by pasting its URL
//! - Fetch timestamped transcripts, with a proxy fallback for blocked networks
//! - Turn video content into blog posts, social posts, or chapter lists
//!
//! # Architecture
//!
//! The library is organized into several modules:
//!
//! - `config` - Configuration and prompt documents
//! - `transcript` - Transcript fetching and formatting
//! - `agent` - Tools, the OpenAI runtime, and event aggregation
//! - `cli` - Terminal interface
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use snakk::config::Settings;
//! use snakk::transcript::{TranscriptFetcher, YoutubeTranscriptSource};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let settings = Settings::load()?;
//!     let source = Arc::new(YoutubeTranscriptSource::new(settings.transcript.languages.clone())?);
//!     let fetcher = TranscriptFetcher::new(source, settings.proxy_credentials());
//!
//!     let transcript = fetcher.fetch("https://www.youtube.com/watch?v=dQw4w9WgXcQ").await?;
//!     println!("{}", transcript);
//!
//!     Ok(())
//! }
//! ```

pub mod agent;
pub mod cli;
pub mod config;
pub mod error;
pub mod transcript;

pub use error::{Result, SnakkError};
