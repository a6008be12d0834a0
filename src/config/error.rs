use std::path::PathBuf;
use thiserror::Error;

use crate::order::OrderError;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("required config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file '{path}': {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("failed to deserialize config: {0}")]
    DeserializeError(#[from] toml::de::Error),

    #[error("failed to order configuration sources: {0}")]
    Order(#[from] OrderError),

    #[error("unresolved placeholder '{name}' in '{location}'")]
    UnresolvedPlaceholder { name: String, location: String },

    #[error("empty placeholder in '{0}'")]
    InvalidPlaceholder(String),

    #[error("unclosed placeholder (missing '}}') in '{0}'")]
    UnclosedPlaceholder(String),

    #[error("environment source '{0}' has an empty separator")]
    EmptySeparator(String),
}
