//! Transcript fetch command.

use crate::cli::Output;
use crate::config::Settings;
use crate::error::Result;
use crate::transcript::{TranscriptFetcher, YoutubeTranscriptSource};
use std::sync::Arc;

/// Fetch a transcript and print it, or write it to a file.
pub async fn run_transcript(url: &str, output: Option<String>, settings: Settings) -> Result<()> {
    let source = Arc::new(YoutubeTranscriptSource::new(
        settings.transcript.languages.clone(),
    )?);
    let fetcher = TranscriptFetcher::new(source, settings.proxy_credentials());

    let spinner = Output::spinner("Fetching transcript...");
    let result = fetcher.fetch(url).await;
    spinner.finish_and_clear();

    let transcript = result?;

    match output {
        Some(path) => {
            std::fs::write(&path, &transcript)?;
            Output::success(&format!("Transcript written to {}", path));
        }
        None => println!("{}", transcript),
    }

    Ok(())
}
