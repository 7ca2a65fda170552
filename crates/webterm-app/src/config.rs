//! Host configuration, loaded from an optional `webterm.toml`.

use std::path::Path;

use serde::Deserialize;
use webterm_types::error::Result;

/// Settings for the stdin/stdout host. Every field has a default, so a
/// partial (or absent) config file is fine.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WebtermConfig {
    /// Prompt printed before each input line.
    pub prompt: String,
    /// Banner printed once at startup; empty disables it.
    pub greeting: String,
    /// Command history capacity (oldest entries dropped first).
    pub history_capacity: usize,
}

impl Default for WebtermConfig {
    fn default() -> Self {
        Self {
            prompt: "user@webterm:$ ".to_string(),
            greeting: "Type 'help' for a list of commands.".to_string(),
            history_capacity: 100,
        }
    }
}

impl WebtermConfig {
    /// Load configuration from a TOML file. A missing file yields the
    /// defaults; a malformed file is an error.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&text)?)
    }
}
