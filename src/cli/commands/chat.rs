//! Interactive chat command with streaming responses.

use crate::agent::aggregator::{status_line, tool_completed_line};
use crate::agent::{
    AgentEvent, ConversationHistory, EventAggregator, OpenAiRuntime, ToolContext, Turn,
};
use crate::cli::{preflight, Output};
use crate::config::{PromptStore, Settings};
use crate::error::Result;
use crate::transcript::{TranscriptFetcher, YoutubeTranscriptSource};
use console::style;
use futures::StreamExt;
use std::io::{self, BufRead, Write};
use std::sync::Arc;

/// Run the interactive chat command.
pub async fn run_chat(model: Option<String>, settings: Settings) -> Result<()> {
    preflight::check_api_key()?;

    let model = model.unwrap_or_else(|| settings.agent.model.clone());

    let prompts = Arc::new(PromptStore::new(settings.prompts.custom_dir.as_deref()));
    let source = Arc::new(YoutubeTranscriptSource::new(
        settings.transcript.languages.clone(),
    )?);
    let fetcher = Arc::new(TranscriptFetcher::new(source, settings.proxy_credentials()));
    let tools = Arc::new(ToolContext::new(fetcher, Arc::clone(&prompts)));

    let runtime = OpenAiRuntime::new(tools, &model, &prompts.system_instructions())
        .with_max_tool_iterations(settings.agent.max_tool_iterations);

    let mut history = ConversationHistory::new();

    println!("\n{}", style("Snakk").bold().cyan());
    println!(
        "{}\n",
        style("Paste a YouTube link and ask away. Type 'exit' to quit, 'clear' to reset the conversation.")
            .dim()
    );

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    loop {
        print!("{} ", style("You:").green().bold());
        stdout.flush()?;

        let mut input = String::new();
        if stdin.lock().read_line(&mut input)? == 0 {
            break;
        }

        let input = input.trim();

        if input.is_empty() {
            continue;
        }

        if input.eq_ignore_ascii_case("exit") || input.eq_ignore_ascii_case("quit") {
            Output::info("Goodbye!");
            break;
        }

        if input.eq_ignore_ascii_case("clear") {
            history.clear();
            Output::info("Conversation history cleared.");
            continue;
        }

        history.push(Turn::user(input));

        print!("\n{} ", style("Snakk:").cyan().bold());
        stdout.flush()?;

        match stream_exchange(&runtime, &mut history).await {
            Ok(_) => println!("\n"),
            Err(e) => {
                println!();
                Output::error(&format!("Error: {}", e));
            }
        }
    }

    Ok(())
}

/// Run one exchange, printing the answer as it streams.
///
/// Deltas are printed incrementally; the aggregator tracks the answer and
/// splices tool output into the history for the next exchange.
async fn stream_exchange(
    runtime: &OpenAiRuntime,
    history: &mut ConversationHistory,
) -> Result<String> {
    let mut events = runtime.run(history);
    let mut aggregator = EventAggregator::new(history);
    let mut stdout = io::stdout();

    while let Some(event) = events.next().await {
        let event = event?;
        match &event {
            AgentEvent::TextDelta(delta) => {
                print!("{}", delta);
            }
            AgentEvent::ToolCallStarted { name } => {
                print!("{}", style(status_line(name)).dim());
            }
            AgentEvent::ToolCallCompleted { .. } => {
                print!("{}", style(tool_completed_line()).dim());
            }
        }
        stdout.flush()?;
        aggregator.apply(event);
    }

    Ok(aggregator.finish())
}
