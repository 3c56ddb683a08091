//! Launcher-specific error types

use shared::SharedError;
use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LauncherError {
    #[error("Failed to spawn {label}: {source}")]
    SpawnFailed {
        label: String,
        #[source]
        source: io::Error,
    },

    #[error("{label} did not accept connections on {addr} after {attempts} attempts")]
    NodeNotReady {
        label: String,
        addr: String,
        attempts: u32,
    },

    #[error("Failed to signal {label} (pid {pid}): {message}")]
    SignalFailed {
        label: String,
        pid: u32,
        message: String,
    },

    #[error("Interrupted while {phase}")]
    Interrupted { phase: &'static str },

    #[error("Configuration error")]
    SharedError(#[from] SharedError),

    #[error("I/O error: {0}")]
    IoError(#[from] io::Error),
}

impl LauncherError {
    pub fn spawn(label: impl Into<String>, source: io::Error) -> Self {
        Self::SpawnFailed {
            label: label.into(),
            source,
        }
    }
}

pub type LauncherResult<T> = Result<T, LauncherError>;
