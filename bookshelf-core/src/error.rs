//! Error types for Bookshelf Core

use thiserror::Error;
use uuid::Uuid;

/// Result type alias using BookshelfError
pub type Result<T> = std::result::Result<T, BookshelfError>;

/// Top-level error type for all Bookshelf operations
#[derive(Debug, Error)]
pub enum BookshelfError {
    #[error("Search failed: {0}")]
    Search(#[from] SearchError),

    #[error("Persistence failed: {0}")]
    Persistence(#[from] StorageError),

    #[error("Validation rejected: {0}")]
    Validation(#[from] ValidationError),

    #[error("Book not found: {0}")]
    NotFound(Uuid),
}

/// Errors that occur while querying the external catalog
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("Request failed: {0}")]
    Transport(String),

    #[error("Catalog responded with status {0}")]
    Status(u16),

    #[error("Malformed response: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for SearchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            SearchError::Decode(err.to_string())
        } else if let Some(status) = err.status() {
            SearchError::Status(status.as_u16())
        } else {
            SearchError::Transport(err.to_string())
        }
    }
}

/// Errors that occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Backend error: {0}")]
    BackendError(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Corrupt library document: {0}")]
    Corrupt(String),

    #[error("Unsupported library schema version {0}")]
    UnsupportedVersion(u64),
}

/// Input rejected before it reaches the store
#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    #[error("Rating {0} is outside 0-5")]
    RatingOutOfRange(i64),

    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Invalid price: {0}")]
    InvalidPrice(f64),

    #[error("Cannot {action} a book that is {status}")]
    InvalidTransition {
        action: &'static str,
        status: &'static str,
    },

    #[error("Rating is only allowed once a book is finished")]
    RatingBeforeFinish,

    #[error("Finish date can only be edited on a finished book")]
    NotFinished,

    #[error("Finish date must be set exactly when a book is finished")]
    FinishDateMismatch,

    #[error("Unknown {kind}: {value}")]
    UnknownVariant { kind: &'static str, value: String },
}
