//! Displayed search results with last-write-wins semantics

use super::CatalogSource;
use crate::types::CatalogCandidate;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

/// What happened to a submitted query
#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome {
    /// Results were published; holds the number of candidates
    Published(usize),

    /// Blank query, results cleared without a request
    Cleared,

    /// The search failed and the results were cleared
    Failed(String),

    /// A newer query was submitted before this one completed
    Superseded,
}

#[derive(Debug, Default)]
struct Displayed {
    results: Vec<CatalogCandidate>,
    last_error: Option<String>,
}

/// Holds the result set a front end is showing
///
/// Every submission takes a new generation; a completion is only published
/// if no newer submission has started since.
pub struct SearchSession {
    source: Arc<dyn CatalogSource>,
    generation: AtomicU64,
    displayed: RwLock<Displayed>,
}

impl SearchSession {
    pub fn new(source: Arc<dyn CatalogSource>) -> Self {
        Self {
            source,
            generation: AtomicU64::new(0),
            displayed: RwLock::new(Displayed::default()),
        }
    }

    /// Run a query and publish its results unless it was overtaken
    pub async fn submit(&self, query: &str) -> SearchOutcome {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;

        if query.trim().is_empty() {
            return self
                .publish(generation, Vec::new(), None, SearchOutcome::Cleared)
                .await;
        }

        match self.source.search(query).await {
            Ok(results) => {
                let count = results.len();
                self.publish(generation, results, None, SearchOutcome::Published(count))
                    .await
            }
            Err(e) => {
                let message = e.to_string();
                tracing::warn!("Catalog search failed: {}", message);
                self.publish(
                    generation,
                    Vec::new(),
                    Some(message.clone()),
                    SearchOutcome::Failed(message),
                )
                .await
            }
        }
    }

    async fn publish(
        &self,
        generation: u64,
        results: Vec<CatalogCandidate>,
        last_error: Option<String>,
        outcome: SearchOutcome,
    ) -> SearchOutcome {
        let mut displayed = self.displayed.write().await;
        // Checked under the lock so an older completion cannot interleave
        if self.generation.load(Ordering::SeqCst) != generation {
            tracing::debug!("Discarding superseded search #{}", generation);
            return SearchOutcome::Superseded;
        }
        displayed.results = results;
        displayed.last_error = last_error;
        outcome
    }

    /// Currently displayed candidates
    pub async fn results(&self) -> Vec<CatalogCandidate> {
        self.displayed.read().await.results.clone()
    }

    /// Failure message of the last published search, if it failed
    pub async fn last_error(&self) -> Option<String> {
        self.displayed.read().await.last_error.clone()
    }

    /// Drop the displayed results, e.g. when the search view closes
    pub async fn clear(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        *self.displayed.write().await = Displayed::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SearchError;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::atomic::AtomicUsize;
    use tokio::sync::Notify;

    fn candidate(title: &str) -> CatalogCandidate {
        CatalogCandidate {
            external_id: title.to_lowercase(),
            title: title.to_string(),
            authors: vec!["Someone".to_string()],
            cover_url: None,
            published_date: None,
        }
    }

    /// Returns one candidate titled after the query; "slow" waits to be released
    #[derive(Default)]
    struct FakeSource {
        calls: AtomicUsize,
        started: Notify,
        release: Notify,
        failures: HashMap<&'static str, u16>,
    }

    #[async_trait]
    impl CatalogSource for FakeSource {
        async fn search(&self, query: &str) -> Result<Vec<CatalogCandidate>, SearchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if query == "slow" {
                self.started.notify_one();
                self.release.notified().await;
            }
            if let Some(status) = self.failures.get(query) {
                return Err(SearchError::Status(*status));
            }
            Ok(vec![candidate(query)])
        }
    }

    #[tokio::test]
    async fn test_publishes_results() {
        let session = SearchSession::new(Arc::new(FakeSource::default()));

        assert_eq!(session.submit("Dune").await, SearchOutcome::Published(1));
        assert_eq!(session.results().await, vec![candidate("Dune")]);

        // A new query replaces, never merges
        session.submit("Emma").await;
        assert_eq!(session.results().await, vec![candidate("Emma")]);
    }

    #[tokio::test]
    async fn test_blank_query_skips_source() {
        let source = Arc::new(FakeSource::default());
        let session = SearchSession::new(source.clone());

        session.submit("Dune").await;
        assert_eq!(session.submit("   ").await, SearchOutcome::Cleared);
        assert!(session.results().await.is_empty());
        assert_eq!(source.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_failure_clears_results() {
        let source = FakeSource {
            failures: HashMap::from([("broken", 500)]),
            ..FakeSource::default()
        };
        let session = SearchSession::new(Arc::new(source));

        session.submit("Dune").await;
        let outcome = session.submit("broken").await;

        assert!(matches!(outcome, SearchOutcome::Failed(ref msg) if msg.contains("500")));
        assert!(session.results().await.is_empty());
        assert!(session.last_error().await.is_some());

        session.submit("Dune").await;
        assert!(session.last_error().await.is_none());
    }

    #[tokio::test]
    async fn test_superseded_search_is_discarded() {
        let source = Arc::new(FakeSource::default());
        let session = Arc::new(SearchSession::new(source.clone()));

        let slow = {
            let session = session.clone();
            tokio::spawn(async move { session.submit("slow").await })
        };
        source.started.notified().await;

        assert_eq!(session.submit("fast").await, SearchOutcome::Published(1));

        source.release.notify_one();
        assert_eq!(slow.await.unwrap(), SearchOutcome::Superseded);
        assert_eq!(session.results().await, vec![candidate("fast")]);
    }

    #[tokio::test]
    async fn test_clear_discards_in_flight() {
        let source = Arc::new(FakeSource::default());
        let session = Arc::new(SearchSession::new(source.clone()));

        let slow = {
            let session = session.clone();
            tokio::spawn(async move { session.submit("slow").await })
        };
        source.started.notified().await;
        session.clear().await;
        source.release.notify_one();

        assert_eq!(slow.await.unwrap(), SearchOutcome::Superseded);
        assert!(session.results().await.is_empty());
    }
}
