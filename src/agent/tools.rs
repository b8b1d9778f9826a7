//! Tool definitions and implementations for the chat agent.

use crate::config::{PromptStore, PROMPT_NAMES};
use crate::error::{Result, SnakkError};
use crate::transcript::TranscriptFetcher;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Available tools for the agent.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "name", rename_all = "snake_case")]
pub enum ToolCall {
    /// Fetch a timestamped transcript for a video URL.
    FetchVideoTranscript { url: String },

    /// Fetch task instructions by prompt name.
    FetchInstructions { prompt_name: String },
}

/// Tool execution context with access to the fetcher and prompt store.
pub struct ToolContext {
    pub fetcher: Arc<TranscriptFetcher>,
    pub prompts: Arc<PromptStore>,
}

impl ToolContext {
    /// Create a new tool context.
    pub fn new(fetcher: Arc<TranscriptFetcher>, prompts: Arc<PromptStore>) -> Self {
        Self { fetcher, prompts }
    }

    /// Execute a tool call and return the result as a string.
    pub async fn execute(&self, tool: &ToolCall) -> Result<String> {
        match tool {
            ToolCall::FetchVideoTranscript { url } => self.fetcher.fetch(url).await,
            ToolCall::FetchInstructions { prompt_name } => self.prompts.fetch(prompt_name),
        }
    }
}

/// Get OpenAI function/tool definitions for the agent.
pub fn tool_definitions() -> Vec<async_openai::types::ChatCompletionTool> {
    use async_openai::types::{ChatCompletionTool, ChatCompletionToolType, FunctionObject};

    vec![
        ChatCompletionTool {
            r#type: ChatCompletionToolType::Function,
            function: FunctionObject {
                name: "fetch_video_transcript".to_string(),
                description: Some(
                    "Extract a transcript with timestamps from a YouTube video URL, \
                    formatted with one '[MM:SS] text' entry per line."
                        .to_string(),
                ),
                parameters: Some(serde_json::json!({
                    "type": "object",
                    "properties": {
                        "url": {
                            "type": "string",
                            "description": "YouTube video URL"
                        }
                    },
                    "required": ["url"]
                })),
                strict: None,
            },
        },
        ChatCompletionTool {
            r#type: ChatCompletionToolType::Function,
            function: FunctionObject {
                name: "fetch_instructions".to_string(),
                description: Some(format!(
                    "Fetch instructions for a given prompt name. Available prompts: {}.",
                    PROMPT_NAMES.join(", ")
                )),
                parameters: Some(serde_json::json!({
                    "type": "object",
                    "properties": {
                        "prompt_name": {
                            "type": "string",
                            "description": "Name of the prompt to fetch instructions for",
                            "enum": PROMPT_NAMES
                        }
                    },
                    "required": ["prompt_name"]
                })),
                strict: None,
            },
        },
    ]
}

/// Parse a tool call from the OpenAI response format.
pub fn parse_tool_call(name: &str, arguments: &str) -> Result<ToolCall> {
    let args: serde_json::Value = serde_json::from_str(arguments)
        .map_err(|e| SnakkError::Agent(format!("Invalid tool arguments: {}", e)))?;

    match name {
        "fetch_video_transcript" => {
            let url = args["url"]
                .as_str()
                .ok_or_else(|| SnakkError::Agent("Missing 'url' argument".to_string()))?
                .to_string();
            Ok(ToolCall::FetchVideoTranscript { url })
        }
        "fetch_instructions" => {
            let prompt_name = args["prompt_name"]
                .as_str()
                .ok_or_else(|| SnakkError::Agent("Missing 'prompt_name' argument".to_string()))?
                .to_string();
            Ok(ToolCall::FetchInstructions { prompt_name })
        }
        _ => Err(SnakkError::Agent(format!("Unknown tool: {}", name))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_fetch_video_transcript() {
        let tool = parse_tool_call(
            "fetch_video_transcript",
            r#"{"url": "https://youtu.be/dQw4w9WgXcQ"}"#,
        )
        .unwrap();
        match tool {
            ToolCall::FetchVideoTranscript { url } => {
                assert_eq!(url, "https://youtu.be/dQw4w9WgXcQ");
            }
            _ => panic!("Expected FetchVideoTranscript tool"),
        }
    }

    #[test]
    fn test_parse_fetch_instructions() {
        let tool =
            parse_tool_call("fetch_instructions", r#"{"prompt_name": "write_blog_post"}"#).unwrap();
        match tool {
            ToolCall::FetchInstructions { prompt_name } => {
                assert_eq!(prompt_name, "write_blog_post");
            }
            _ => panic!("Expected FetchInstructions tool"),
        }
    }

    #[test]
    fn test_parse_unknown_tool() {
        let err = parse_tool_call("delete_video", r#"{}"#).unwrap_err();
        assert!(err.to_string().contains("Unknown tool"));
    }

    #[test]
    fn test_parse_missing_argument() {
        let err = parse_tool_call("fetch_video_transcript", r#"{}"#).unwrap_err();
        assert!(err.to_string().contains("url"));
    }

    #[test]
    fn test_tool_definitions_cover_both_tools() {
        let defs = tool_definitions();
        let names: Vec<_> = defs.iter().map(|d| d.function.name.as_str()).collect();
        assert_eq!(names, vec!["fetch_video_transcript", "fetch_instructions"]);
    }
}
