use std::io;

/// Result type alias for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// No live record matched the lookup.
    #[error("record not found")]
    NotFound,

    /// Input rejected before it reached the database.
    #[error("{0}")]
    Validation(String),

    #[error(transparent)]
    Database(#[from] rusqlite::Error),

    #[error("database connection lock poisoned")]
    LockPoisoned,

    #[error(transparent)]
    Io(#[from] io::Error),

    #[error("could not determine a data directory for the database")]
    NoDataDir,
}

impl StoreError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// True for errors caused by the caller's input rather than the store.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::NotFound | Self::Validation(_))
    }
}
