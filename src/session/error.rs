//! Error types for session persistence.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised when the session store cannot persist or remove the token.
///
/// Reading a missing or corrupted stored token is never an error; it is
/// treated as "no session".
#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Failed to persist token to {path}: {source}")]
    Persist {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to remove token at {path}: {source}")]
    Remove {
        path: PathBuf,
        source: std::io::Error,
    },
}
