//! Configuration command.

use crate::cli::ConfigAction;
use crate::config::Settings;
use crate::error::{Result, SnakkError};

/// Run the config command.
pub fn run_config(action: &ConfigAction, settings: Settings) -> Result<()> {
    match action {
        ConfigAction::Show => {
            let content =
                toml::to_string_pretty(&settings).map_err(|e| SnakkError::Config(e.to_string()))?;
            println!("{}", content);
        }
        ConfigAction::Path => {
            println!("{}", Settings::default_config_path().display());
        }
    }

    Ok(())
}
