//! Error types for webterm.

use std::io;

/// Errors produced by the webterm engine.
///
/// Display strings double as user-facing report lines: the dispatcher
/// writes `format!("{e}")` to the output sink and returns to the prompt.
#[derive(Debug, thiserror::Error)]
pub enum WebtermError {
    #[error("no such path: {0}")]
    PathNotFound(String),

    #[error("already exists: {0}")]
    NameCollision(String),

    #[error("{0}")]
    WrongNodeType(String),

    #[error("no addon named '{0}'")]
    AddonNotFound(String),

    #[error("addon '{0}' is still running; type 'exit' to leave it first")]
    AddonAlreadyActive(String),

    #[error("!{0}: event not found")]
    InvalidHistoryIndex(String),

    #[error("'{0}' is not recognized as a command; type 'help' for a list")]
    UnknownCommand(String),

    #[error("{0}")]
    Command(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, WebtermError>;
