//! Prompt documents for Snakk.
//!
//! Prompts can be customized by placing Markdown files in the custom
//! prompts directory; built-in defaults are used otherwise.

use crate::error::{Result, SnakkError};
use std::path::PathBuf;

/// Names of the task prompt documents the agent can request.
pub const PROMPT_NAMES: &[&str] = &["write_blog_post", "write_social_post", "write_video_chapters"];

/// System instructions for the chat agent.
const SYSTEM_INSTRUCTIONS: &str = r#"You are a helpful assistant that answers questions about YouTube videos.

You have tools to fetch video transcripts and task instructions.

Guidelines:
- When the user shares a video URL, use 'fetch_video_transcript' to get its transcript before answering
- Transcript lines carry [MM:SS] timestamps; use them to point at specific moments in the video
- For writing tasks (blog post, social post, video chapters), first use 'fetch_instructions' with the matching prompt name and follow what it says
- Base your answers on the transcript content, not on outside knowledge about the video
- If a transcript cannot be fetched, say so plainly instead of guessing

Be conversational and concise. Remember context from earlier in the conversation."#;

const WRITE_BLOG_POST: &str = r#"Write a blog post based on the video transcript.

Structure:
- A short, punchy title
- An opening paragraph that hooks the reader without summarizing everything up front
- Body sections with descriptive subheadings, following the order of the video
- A closing paragraph with the key takeaway

Rules:
- Write in the voice of the video's presenter, but in polished prose
- Keep direct quotes sparing and verbatim
- Do not invent facts, numbers, or examples that are not in the transcript
- Target length: 600-900 words"#;

const WRITE_SOCIAL_POST: &str = r#"Write a short social media post promoting the video.

Rules:
- At most 280 characters
- Lead with the single most interesting idea from the transcript
- Conversational tone, no clickbait phrasing ("you won't believe...")
- End with 2-3 relevant hashtags
- Do not include a link placeholder; the caller appends the link"#;

const WRITE_VIDEO_CHAPTERS: &str = r#"Create a chapter list for the video from its transcript.

Format, one chapter per line:
MM:SS Chapter title

Rules:
- The first chapter must start at 00:00
- Use the transcript's [MM:SS] timestamps to place chapter starts at real topic transitions
- Chapter titles are 2-6 words, describing the content, not teasing it
- Aim for 5-12 chapters depending on video length
- Output only the chapter lines, nothing else"#;

/// Store of prompt documents, with optional on-disk overrides.
pub struct PromptStore {
    custom_dir: Option<PathBuf>,
}

impl PromptStore {
    /// Create a store, optionally backed by a custom prompt directory.
    pub fn new(custom_dir: Option<&str>) -> Self {
        Self {
            custom_dir: custom_dir.map(|d| PathBuf::from(shellexpand::tilde(d).to_string())),
        }
    }

    /// System instructions for the chat agent.
    pub fn system_instructions(&self) -> String {
        self.read_override("system_instructions")
            .unwrap_or_else(|| SYSTEM_INSTRUCTIONS.to_string())
    }

    /// Fetch a task prompt document by name.
    ///
    /// The name set is closed; unknown names fail with `PromptNotFound`.
    pub fn fetch(&self, prompt_name: &str) -> Result<String> {
        let default = match prompt_name {
            "write_blog_post" => WRITE_BLOG_POST,
            "write_social_post" => WRITE_SOCIAL_POST,
            "write_video_chapters" => WRITE_VIDEO_CHAPTERS,
            other => {
                return Err(SnakkError::PromptNotFound(format!(
                    "Unknown prompt '{}'. Available prompts: {}",
                    other,
                    PROMPT_NAMES.join(", ")
                )))
            }
        };

        if let Some(custom) = self.read_override(prompt_name) {
            return Ok(custom);
        }
        Ok(default.to_string())
    }

    /// Read `<custom_dir>/<name>.md` if the override exists.
    fn read_override(&self, name: &str) -> Option<String> {
        let dir = self.custom_dir.as_ref()?;
        let path = dir.join(format!("{}.md", name));
        if path.exists() {
            std::fs::read_to_string(&path).ok()
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_known_prompts_resolve() {
        let store = PromptStore::new(None);
        for name in PROMPT_NAMES {
            let text = store.fetch(name).unwrap();
            assert!(!text.is_empty(), "prompt '{}' is empty", name);
        }
    }

    #[test]
    fn test_unknown_prompt_fails() {
        let store = PromptStore::new(None);
        let err = store.fetch("write_haiku").unwrap_err();
        assert!(matches!(err, SnakkError::PromptNotFound(_)));
        // The message lists what is available.
        assert!(err.to_string().contains("write_blog_post"));
    }

    #[test]
    fn test_system_instructions_mention_tools() {
        let store = PromptStore::new(None);
        let instructions = store.system_instructions();
        assert!(instructions.contains("fetch_video_transcript"));
        assert!(instructions.contains("fetch_instructions"));
    }
}
