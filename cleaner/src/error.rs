//! Cleaner-specific error types

use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CleanerError {
    #[error("Failed to remove {}: {source}", .path.display())]
    Remove {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{failed} of {total} path(s) could not be removed")]
    Incomplete { failed: usize, total: usize },

    #[error("JSON serialization error: {0}")]
    JsonError(#[from] serde_json::Error),
}

pub type CleanerResult<T> = Result<T, CleanerError>;
