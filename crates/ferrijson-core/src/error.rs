//! Error types for all FerriJSON operations.

use std::io;
use thiserror::Error;

/// Top-level error type for FerriJSON operations.
///
/// Only persistence can fail: loading degrades to an empty record set and
/// condition parsing degrades to "matches nothing".
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Storage(#[from] StorageError),
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("failed to serialize records: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Error::Storage(StorageError::Io(err))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
