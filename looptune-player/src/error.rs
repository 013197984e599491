//! Error types for looptune-player
//!
//! Structural store errors are kept in their own enum so store callers can
//! match on them without pulling in backend failures.

use std::path::PathBuf;
use thiserror::Error;

/// Structural errors from the circular store
///
/// Always non-fatal: the store is left unmutated when one is returned.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// Positional operation on a store with no tracks
    #[error("playlist is empty")]
    EmptyStore,

    /// Position outside the valid 1-based range for the operation
    #[error("position {position} out of range ({min}-{max})")]
    OutOfRange {
        position: usize,
        min: usize,
        max: usize,
    },
}

/// Main error type for looptune-player
#[derive(Error, Debug)]
pub enum Error {
    /// Store structure errors (empty store, bad position)
    #[error("Playlist error: {0}")]
    Store(#[from] StoreError),

    /// Decode backend could not open the source
    #[error("Cannot open {path}: {reason}")]
    BackendOpen { path: PathBuf, reason: String },

    /// Audio decoding errors
    #[error("Audio decode error: {0}")]
    Decode(String),

    /// Audio output device errors
    #[error("Audio output error: {0}")]
    AudioOutput(String),

    /// Playlist save/load errors
    #[error("Persistence error: {0}")]
    Persistence(String),

    /// Terminal input errors
    #[error("Input error: {0}")]
    Input(String),

    /// Bad caller-supplied argument (slot number, mode parameter)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// File I/O errors
    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience Result type using looptune-player Error
pub type Result<T> = std::result::Result<T, Error>;
