use std::path::PathBuf;

use reqwest::StatusCode;
use thiserror::Error;

use crate::config::{LINK_VAR, PASSWORD_VAR};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error(
        "Environment variables {} and {} are required. \
         Check that they are set in your .env file.",
        LINK_VAR,
        PASSWORD_VAR
    )]
    Missing,
}

#[derive(Debug, Error)]
pub enum DownloadError {
    #[error("chunk size must be at least one byte")]
    InvalidChunkSize,

    #[error("Authentication failed. Please check the password.")]
    Unauthorized,

    #[error("Failed to download. Status code: {}", .0.as_u16())]
    Status(StatusCode),

    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("failed to read response body: {0}")]
    Body(#[source] std::io::Error),

    #[error("failed to write {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl DownloadError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
