use std::path::PathBuf;

use compact_str::CompactString;
use thiserror::Error;

use crate::{client::ClientError, digest::DigestError};

pub type Result<T> = std::result::Result<T, ActivityError>;

#[derive(Debug, Error)]
pub enum ActivityError {
    #[error(transparent)]
    Client(#[from] ClientError),

    #[error(transparent)]
    Digest(#[from] DigestError),

    #[error("Failed to load configuration from {}: {message}", .path.display())]
    ConfigLoadError { path: PathBuf, message: String },

    #[error("Failed to initialize logging: {0}")]
    Logging(CompactString),
}

impl ActivityError {
    /// Create a configuration load error
    pub fn config_load_error(path: PathBuf, source: impl std::fmt::Display) -> Self {
        Self::ConfigLoadError { path, message: source.to_string() }
    }

    pub fn is_user_not_found(&self) -> bool {
        matches!(self, Self::Client(e) if e.is_user_not_found())
    }
}
