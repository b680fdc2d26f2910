//! Engine error types.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors surfaced by the fingerprinting engine and the manifest store.
#[derive(Debug, Error)]
pub enum FingerprintError {
    #[error("IO error on `{}`", .0.display())]
    Io(PathBuf, #[source] std::io::Error),

    #[error("invalid manifest JSON")]
    Json(#[from] serde_json::Error),
}

impl FingerprintError {
    /// Wrap an IO error with the path it happened on.
    pub fn io(path: impl AsRef<Path>, err: std::io::Error) -> Self {
        Self::Io(path.as_ref().to_path_buf(), err)
    }

    /// Path the failing operation touched, if any.
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Io(path, _) => Some(path),
            Self::Json(_) => None,
        }
    }
}

pub type Result<T, E = FingerprintError> = std::result::Result<T, E>;
