use thiserror::Error;

/// Errors that can occur while reading or writing flower names.
#[derive(Debug, Error)]
pub enum StorageError {
    /// A record with this normalized key already exists.
    #[error("name already reserved: {0}")]
    Conflict(String),

    /// The backend could not be reached, timed out, or refused the request.
    #[error("storage backend unavailable: {0}")]
    Unavailable(String),

    /// The backend answered with something we could not decode.
    #[error("malformed storage response: {0}")]
    Malformed(String),

    /// Any other backend failure (database errors and the like).
    #[error("storage backend error: {0}")]
    Backend(String),
}

impl StorageError {
    /// Whether repeating the same read could plausibly succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Unavailable(_))
    }
}
