//! External book catalog search
//!
//! [`CatalogClient`] talks to a Google Books compatible volumes API.
//! [`SearchSession`] sits in front of any [`CatalogSource`] and keeps the
//! result set a front end is currently showing.

mod client;
mod session;

pub use client::CatalogClient;
pub use session::{SearchOutcome, SearchSession};

use crate::error::SearchError;
use crate::types::CatalogCandidate;
use async_trait::async_trait;

/// Anything that can turn a free-text query into catalog candidates
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// Search the catalog. Blank queries return no results without any I/O.
    async fn search(&self, query: &str) -> Result<Vec<CatalogCandidate>, SearchError>;
}
