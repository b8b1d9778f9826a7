//! Streaming event aggregation for one exchange.
//!
//! Folds the runtime's event stream into the answer shown to the user and
//! splices tool outputs into the conversation history so the next exchange
//! sees them as prior context.

use super::{AgentEvent, ConversationHistory, Turn};
use crate::error::Result;
use futures::{Stream, StreamExt};

/// Marker suffixed to in-progress display snapshots.
const CURSOR: &str = "\u{258c}";

/// Status line for a started tool call.
pub fn status_line(tool_name: &str) -> String {
    match tool_name {
        "fetch_video_transcript" => "\n\n-- Fetching transcript...".to_string(),
        "fetch_instructions" => "\n\n-- Fetching instructions...".to_string(),
        other => format!("\n\n-- Calling {}...", other),
    }
}

/// Status line for a completed tool call.
pub fn tool_completed_line() -> &'static str {
    "\n\n-- Tool completed."
}

/// Accumulates one exchange's answer and history side effects.
///
/// Events must be applied in arrival order. Tool events never alter the
/// answer text; tool output lands in the history as a user-role turn,
/// which is how the model sees tool results on its next invocation.
pub struct EventAggregator<'a> {
    history: &'a mut ConversationHistory,
    answer: String,
}

impl<'a> EventAggregator<'a> {
    pub fn new(history: &'a mut ConversationHistory) -> Self {
        Self {
            history,
            answer: String::new(),
        }
    }

    /// Apply one event and return the display snapshot for it.
    pub fn apply(&mut self, event: AgentEvent) -> String {
        match event {
            AgentEvent::TextDelta(delta) => {
                self.answer.push_str(&delta);
                format!("{}{}", self.answer, CURSOR)
            }
            AgentEvent::ToolCallStarted { name } => {
                format!("{}{}{}", self.answer, status_line(&name), CURSOR)
            }
            AgentEvent::ToolCallCompleted { output } => {
                self.history
                    .push(Turn::user(format!("Tool output:\n{}", output)));
                format!("{}{}{}", self.answer, tool_completed_line(), CURSOR)
            }
        }
    }

    /// The partial answer accumulated so far, without the marker.
    pub fn answer(&self) -> &str {
        &self.answer
    }

    /// Finalize the exchange: record the assistant turn and return the
    /// finished answer.
    pub fn finish(self) -> String {
        self.history.push(Turn::assistant(self.answer.clone()));
        self.answer
    }
}

/// Drive an event stream through an aggregator.
///
/// `on_update` receives a display snapshot after every event. Stream
/// errors are returned as-is, without retrying; tool turns already
/// appended to the history stay in place.
pub async fn aggregate<S, F>(
    events: S,
    history: &mut ConversationHistory,
    mut on_update: F,
) -> Result<String>
where
    S: Stream<Item = Result<AgentEvent>>,
    F: FnMut(&str),
{
    futures::pin_mut!(events);

    let mut aggregator = EventAggregator::new(history);
    while let Some(event) = events.next().await {
        let snapshot = aggregator.apply(event?);
        on_update(&snapshot);
    }

    Ok(aggregator.finish())
}
