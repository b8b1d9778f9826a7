//! Configuration settings for Snakk.

use crate::transcript::ProxyCredentials;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct Settings {
    pub agent: AgentSettings,
    pub transcript: TranscriptSettings,
    pub proxy: ProxySettings,
    pub prompts: PromptSettings,
}


/// Chat agent settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentSettings {
    /// LLM model for response generation.
    pub model: String,
    /// Maximum tool-calling rounds within one exchange.
    pub max_tool_iterations: usize,
}

impl Default for AgentSettings {
    fn default() -> Self {
        Self {
            model: "gpt-4o-mini".to_string(),
            max_tool_iterations: 10,
        }
    }
}

/// Transcript fetching settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TranscriptSettings {
    /// Transcript languages to request, in preference order.
    pub languages: Vec<String>,
}

impl Default for TranscriptSettings {
    fn default() -> Self {
        Self {
            languages: vec!["en".to_string()],
        }
    }
}

/// Proxy credentials for the transcript fallback tier.
///
/// Environment variables (PROXY_USERNAME, PROXY_PASSWORD, PROXY_URL) take
/// precedence over these file-based values.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct ProxySettings {
    pub username: Option<String>,
    pub password: Option<String>,
    /// Proxy host and optional port, without a scheme.
    pub url: Option<String>,
}


/// Prompt customization settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct PromptSettings {
    /// Directory with Markdown prompt documents (overrides built-ins).
    pub custom_dir: Option<String>,
}


impl Settings {
    /// Load settings from the default configuration file.
    pub fn load() -> crate::error::Result<Self> {
        Self::load_from(None)
    }

    /// Load settings from a specific path, or default location if None.
    pub fn load_from(path: Option<&PathBuf>) -> crate::error::Result<Self> {
        let config_path = match path {
            Some(p) => p.clone(),
            None => Self::default_config_path(),
        };

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let settings: Settings = toml::from_str(&content)?;
            Ok(settings)
        } else {
            Ok(Settings::default())
        }
    }

    /// Get the default configuration file path.
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("snakk")
            .join("config.toml")
    }

    /// Resolve proxy credentials for transcript fetching.
    ///
    /// Environment variables win over the settings file. All three values
    /// are required together; a partial set counts as no proxy.
    pub fn proxy_credentials(&self) -> Option<ProxyCredentials> {
        let env = |key: &str| std::env::var(key).ok().filter(|v| !v.is_empty());

        ProxyCredentials::from_parts(
            env("PROXY_USERNAME").or_else(|| self.proxy.username.clone()),
            env("PROXY_PASSWORD").or_else(|| self.proxy.password.clone()),
            env("PROXY_URL").or_else(|| self.proxy.url.clone()),
        )
    }
}
