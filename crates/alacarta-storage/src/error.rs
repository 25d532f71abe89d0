use thiserror::Error;

/// Errors raised by a storage backend
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("invalid storage key {0:?}")]
    InvalidKey(String),

    #[error("storage quota exceeded writing {key:?}: {requested} bytes requested, {available} available")]
    QuotaExceeded {
        key: String,
        requested: usize,
        available: usize,
    },

    #[error("storage I/O failed for key {key:?}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },
}
