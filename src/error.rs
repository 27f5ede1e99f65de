//! Error types shared by the world, overlay and persistence layers.
//!
//! Generation itself is total and never produces an error; everything here
//! comes from parsing external input or touching the filesystem.

use std::path::PathBuf;

/// Result alias used throughout the crate
pub type WorldResult<T> = Result<T, WorldError>;

/// Errors surfaced to callers of the world API.
#[derive(Debug, thiserror::Error)]
pub enum WorldError {
    #[error("IO error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid coordinate key '{0}'")]
    InvalidKey(String),

    #[error("snapshot seed {found} does not match world seed {expected}")]
    SeedMismatch { expected: u64, found: u64 },

    #[error("snapshot version {found} is newer than supported version {supported}")]
    UnsupportedVersion { found: u32, supported: u32 },

    #[error("invalid record {key}: {reason}")]
    InvalidRecord { key: String, reason: String },
}

impl WorldError {
    /// Wrap an IO error with the path it happened on.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        WorldError::Io {
            path: path.into(),
            source,
        }
    }
}
