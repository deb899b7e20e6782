//! Core types for the Bookshelf library

mod book;
mod candidate;
mod rating;
mod status;

pub use book::{validate_price, Book};
pub use candidate::{secure_url, CatalogCandidate};
pub use rating::Rating;
pub use status::{Format, Status};
