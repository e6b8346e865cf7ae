use std::path::PathBuf;
use thiserror::Error;

use crate::ini::IniError;

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

    #[error("failed to parse config '{path}': {source}")]
    ParseError { path: PathBuf, source: IniError },

    #[error("failed to deserialize config: {0}")]
    DeserializeError(#[from] toml::de::Error),
}
