//! CLI command implementations.

mod chat;
mod config;
mod transcript;

pub use chat::run_chat;
pub use config::run_config;
pub use transcript::run_transcript;
