//! Error types for autopress-core.

use thiserror::Error;

/// Result type alias using autopress-core Error
pub type Result<T> = std::result::Result<T, Error>;

/// Core error types for autopress operations
#[derive(Error, Debug)]
pub enum Error {
    // Database errors
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Database lock poisoned")]
    LockPoisoned,

    // Generation service errors
    #[error("HTTP client error: {0}")]
    HttpClient(String),
}

impl Error {
    /// Whether the error came from the article store rather than generation.
    pub fn is_persistence(&self) -> bool {
        matches!(self, Self::Database(_) | Self::LockPoisoned)
    }
}
