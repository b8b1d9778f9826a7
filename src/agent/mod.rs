//! Streaming chat agent over video transcripts.
//!
//! The runtime turns one invocation of the model into a stream of
//! [`AgentEvent`]s; the aggregator folds that stream into a displayable
//! answer and the conversation history for the next exchange.

pub mod aggregator;
mod runtime;
mod tools;

pub use aggregator::{aggregate, EventAggregator};
pub use runtime::OpenAiRuntime;
pub use tools::{parse_tool_call, tool_definitions, ToolCall, ToolContext};

use crate::error::Result;
use futures::Stream;
use std::pin::Pin;

/// Who produced a conversation turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Assistant,
}

/// One turn of the conversation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Turn {
    pub role: Role,
    pub content: String,
}

impl Turn {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Ordered conversation turns, appended to as exchanges progress.
///
/// Single-writer: one exchange at a time mutates the history.
#[derive(Debug, Default)]
pub struct ConversationHistory {
    turns: Vec<Turn>,
}

impl ConversationHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, turn: Turn) {
        self.turns.push(turn);
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn clear(&mut self) {
        self.turns.clear();
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }
}

/// Events produced by one agent invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AgentEvent {
    /// A partial-text chunk of the answer.
    TextDelta(String),
    /// The model started a tool invocation.
    ToolCallStarted { name: String },
    /// A tool invocation returned its output.
    ToolCallCompleted { output: String },
}

/// Stream of events for one exchange; ends when the answer is complete.
pub type AgentEventStream = Pin<Box<dyn Stream<Item = Result<AgentEvent>> + Send>>;
