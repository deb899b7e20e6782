//! Bookshelf Core Library
//!
//! This crate provides the library model and reading-state logic for the Bookshelf
//! personal book tracker: a persisted book store, the reading-status state machine,
//! statistics rollups, and a client for searching an external book catalog.

pub mod catalog;
pub mod config;
pub mod error;
pub mod reading;
pub mod stats;
pub mod storage;
pub mod store;
pub mod types;

pub use catalog::{CatalogClient, CatalogSource, SearchOutcome, SearchSession};
pub use config::{CatalogConfig, Config};
pub use error::{BookshelfError, Result, SearchError, StorageError, ValidationError};
pub use reading::{FinishReading, NewBook, RatingPolicy, StartReading};
pub use stats::YearSummary;
pub use store::{BookQuery, BookStore, SortOrder, StoreEvent};
pub use types::{Book, CatalogCandidate, Format, Rating, Status};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_book_defaults() {
        let book = NewBook::new("Test Book", "Test Author");
        assert_eq!(book.title, "Test Book");
        assert!(book.start.is_none());
    }
}
