//! OpenAI-backed agent runtime.
//!
//! Turns one invocation over the conversation history into a stream of
//! [`AgentEvent`]s: text deltas as they arrive from the model, tool
//! invocations it requests, and their outputs. Tool results are fed back
//! to the model as tool-role messages within the invocation; recording
//! them into the cross-exchange history is the aggregator's job.

use super::tools::{parse_tool_call, tool_definitions, ToolContext};
use super::{AgentEvent, AgentEventStream, ConversationHistory, Role};
use crate::error::{Result, SnakkError};
use async_openai::config::OpenAIConfig;
use async_openai::types::{
    ChatCompletionMessageToolCall, ChatCompletionMessageToolCallChunk,
    ChatCompletionRequestAssistantMessageArgs, ChatCompletionRequestMessage,
    ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestToolMessageArgs,
    ChatCompletionRequestUserMessageArgs, ChatCompletionToolType, CreateChatCompletionRequestArgs,
    FinishReason, FunctionCall,
};
use async_openai::Client;
use futures::StreamExt;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

/// Default timeout for OpenAI API requests (5 minutes).
const DEFAULT_TIMEOUT_SECS: u64 = 300;

/// Agent runtime driving streaming chat completions with tool calls.
pub struct OpenAiRuntime {
    client: Client<OpenAIConfig>,
    model: String,
    tools: Arc<ToolContext>,
    system_prompt: String,
    max_tool_iterations: usize,
}

impl OpenAiRuntime {
    /// Create a runtime with the given tool context, model, and system prompt.
    pub fn new(tools: Arc<ToolContext>, model: &str, system_prompt: &str) -> Self {
        Self {
            client: create_client(),
            model: model.to_string(),
            tools,
            system_prompt: system_prompt.to_string(),
            max_tool_iterations: 10,
        }
    }

    /// Set maximum tool-calling rounds within one invocation.
    pub fn with_max_tool_iterations(mut self, max: usize) -> Self {
        self.max_tool_iterations = max;
        self
    }

    /// Start one agent invocation over the current history.
    ///
    /// The returned stream ends when the model finishes its answer.
    /// Errors from the underlying API surface as stream items and end
    /// the stream.
    pub fn run(&self, history: &ConversationHistory) -> AgentEventStream {
        let client = self.client.clone();
        let model = self.model.clone();
        let tools = Arc::clone(&self.tools);
        let max_iterations = self.max_tool_iterations;
        let initial = build_messages(&self.system_prompt, history);

        Box::pin(async_stream::try_stream! {
            let mut messages = initial?;
            let mut iterations = 0;

            loop {
                iterations += 1;
                if iterations > max_iterations {
                    Err(SnakkError::Agent(format!(
                        "Agent exceeded maximum tool iterations ({})",
                        max_iterations
                    )))?;
                }

                debug!("Agent iteration {}, {} messages", iterations, messages.len());

                let request = CreateChatCompletionRequestArgs::default()
                    .model(&model)
                    .messages(messages.clone())
                    .tools(tool_definitions())
                    .build()
                    .map_err(|e| SnakkError::Agent(e.to_string()))?;

                let mut stream = client
                    .chat()
                    .create_stream(request)
                    .await
                    .map_err(|e| SnakkError::OpenAI(format!("Chat API error: {}", e)))?;

                let mut pending: BTreeMap<usize, PendingToolCall> = BTreeMap::new();
                let mut finished_with_tools = false;

                while let Some(result) = stream.next().await {
                    let response =
                        result.map_err(|e| SnakkError::OpenAI(format!("Stream error: {}", e)))?;

                    let Some(choice) = response.choices.first() else {
                        continue;
                    };

                    if let Some(text) = &choice.delta.content {
                        if !text.is_empty() {
                            yield AgentEvent::TextDelta(text.clone());
                        }
                    }

                    if let Some(chunks) = &choice.delta.tool_calls {
                        for chunk in chunks {
                            merge_tool_call_chunk(&mut pending, chunk);
                        }
                    }

                    if matches!(choice.finish_reason, Some(FinishReason::ToolCalls)) {
                        finished_with_tools = true;
                    }
                }

                if !finished_with_tools || pending.is_empty() {
                    break;
                }

                let calls: Vec<ChatCompletionMessageToolCall> = pending
                    .into_values()
                    .map(|p| ChatCompletionMessageToolCall {
                        id: p.id,
                        r#type: ChatCompletionToolType::Function,
                        function: FunctionCall {
                            name: p.name,
                            arguments: p.arguments,
                        },
                    })
                    .collect();

                let assistant_msg = ChatCompletionRequestAssistantMessageArgs::default()
                    .tool_calls(calls.clone())
                    .build()
                    .map_err(|e| SnakkError::Agent(e.to_string()))?;
                messages.push(assistant_msg.into());

                for call in &calls {
                    info!(
                        "Agent calling tool: {} with args: {}",
                        call.function.name, call.function.arguments
                    );
                    yield AgentEvent::ToolCallStarted {
                        name: call.function.name.clone(),
                    };

                    let output = match parse_tool_call(&call.function.name, &call.function.arguments)
                    {
                        Ok(tool) => match tools.execute(&tool).await {
                            Ok(output) => output,
                            Err(e) => format!("Tool error: {}", e),
                        },
                        Err(e) => format!("Failed to parse tool call: {}", e),
                    };

                    let tool_msg = ChatCompletionRequestToolMessageArgs::default()
                        .tool_call_id(&call.id)
                        .content(output.clone())
                        .build()
                        .map_err(|e| SnakkError::Agent(e.to_string()))?;
                    messages.push(tool_msg.into());

                    yield AgentEvent::ToolCallCompleted { output };
                }
            }
        })
    }
}

/// Create an OpenAI client with a request timeout to prevent hung calls.
fn create_client() -> Client<OpenAIConfig> {
    let http_client = reqwest::Client::builder()
        .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
        .build()
        .expect("Failed to create HTTP client");

    Client::with_config(OpenAIConfig::default()).with_http_client(http_client)
}

/// A tool call being assembled from stream chunks.
#[derive(Debug, Default)]
struct PendingToolCall {
    id: String,
    name: String,
    arguments: String,
}

/// Fold one stream chunk into the pending tool calls, keyed by index.
///
/// The ID and name arrive with the first chunk for a call; arguments
/// accumulate across chunks.
fn merge_tool_call_chunk(
    pending: &mut BTreeMap<usize, PendingToolCall>,
    chunk: &ChatCompletionMessageToolCallChunk,
) {
    let entry = pending.entry(chunk.index as usize).or_default();

    if let Some(id) = &chunk.id {
        entry.id = id.clone();
    }
    if let Some(function) = &chunk.function {
        if let Some(name) = &function.name {
            entry.name = name.clone();
        }
        if let Some(arguments) = &function.arguments {
            entry.arguments.push_str(arguments);
        }
    }
}

/// Build the request message list: system prompt first, then the history.
fn build_messages(
    system_prompt: &str,
    history: &ConversationHistory,
) -> Result<Vec<ChatCompletionRequestMessage>> {
    let mut messages: Vec<ChatCompletionRequestMessage> =
        vec![ChatCompletionRequestSystemMessageArgs::default()
            .content(system_prompt.to_string())
            .build()
            .map_err(|e| SnakkError::Agent(e.to_string()))?
            .into()];

    for turn in history.turns() {
        let message: ChatCompletionRequestMessage = match turn.role {
            Role::User => ChatCompletionRequestUserMessageArgs::default()
                .content(turn.content.clone())
                .build()
                .map_err(|e| SnakkError::Agent(e.to_string()))?
                .into(),
            Role::Assistant => ChatCompletionRequestAssistantMessageArgs::default()
                .content(turn.content.clone())
                .build()
                .map_err(|e| SnakkError::Agent(e.to_string()))?
                .into(),
        };
        messages.push(message);
    }

    Ok(messages)
}
