//! Book entity store
//!
//! Owns every [`Book`] and persists the whole library as one JSON document
//! through a [`StorageProvider`]. A mutation is only visible in memory once
//! its commit succeeded; subscribers hear about it afterwards.

mod migrate;

pub use migrate::{migrate, LibraryDocument, Migration, CURRENT_VERSION};

use crate::config::Config;
use crate::error::{BookshelfError, Result, StorageError, ValidationError};
use crate::reading::{self, FinishReading, NewBook, RatingPolicy, StartReading};
use crate::stats::{self, YearSummary};
use crate::storage::{LocalStorage, StorageProvider};
use crate::types::{Book, Rating, Status};
use serde::Serialize;
use std::cmp::Reverse;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{broadcast, RwLock};
use uuid::Uuid;

/// Name of the library document inside the storage root
pub const LIBRARY_FILE: &str = "library.json";

/// Change notifications, sent after a successful commit
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreEvent {
    Created(Uuid),
    Updated(Uuid),
    Deleted(Uuid),
}

/// Result ordering for [`BookQuery`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    /// Most recently added first
    #[default]
    NewestFirst,
    OldestFirst,
    /// Case-insensitive by title
    Title,
}

/// Filter and ordering for [`BookStore::query`]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BookQuery {
    /// Exact status match
    pub status: Option<Status>,

    /// Case-insensitive substring of title or author
    pub text: Option<String>,

    pub sort: SortOrder,
}

impl BookQuery {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn with_status(status: Status) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    pub fn matching(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn sorted(mut self, sort: SortOrder) -> Self {
        self.sort = sort;
        self
    }

    fn matches(&self, book: &Book) -> bool {
        if self.status.is_some_and(|status| book.status() != status) {
            return false;
        }
        match self.text.as_deref().map(str::trim) {
            Some(text) if !text.is_empty() => {
                let needle = text.to_lowercase();
                book.title().to_lowercase().contains(&needle)
                    || book.author().to_lowercase().contains(&needle)
            }
            _ => true,
        }
    }
}

#[derive(Serialize)]
struct DocumentRef<'a> {
    version: u64,
    books: Vec<&'a Book>,
}

/// The single owner of the persisted book collection
pub struct BookStore {
    storage: Arc<dyn StorageProvider>,
    books: RwLock<HashMap<Uuid, Book>>,
    rating_policy: RatingPolicy,
    event_tx: broadcast::Sender<StoreEvent>,
}

impl BookStore {
    /// Load the library from `storage`, upgrading older documents
    pub async fn open(
        storage: Arc<dyn StorageProvider>,
        rating_policy: RatingPolicy,
    ) -> Result<Self> {
        let books = match storage.read(LIBRARY_FILE).await {
            Ok(bytes) => {
                let value: serde_json::Value =
                    serde_json::from_slice(&bytes).map_err(StorageError::from)?;
                let migration = migrate(value)?;
                if migration.upgraded() {
                    Self::persist(storage.as_ref(), migration.document.books.iter()).await?;
                }
                migration.document.books
            }
            Err(StorageError::NotFound(_)) => {
                tracing::debug!("No library document yet, starting empty");
                Vec::new()
            }
            Err(e) => return Err(e.into()),
        };

        tracing::debug!("Opened library with {} books", books.len());

        let (event_tx, _) = broadcast::channel(100);
        Ok(Self {
            storage,
            books: RwLock::new(books.into_iter().map(|b| (b.id(), b)).collect()),
            rating_policy,
            event_tx,
        })
    }

    /// Open the library stored under `config.data_dir`
    pub async fn open_local(config: &Config) -> Result<Self> {
        let storage = Arc::new(LocalStorage::new(&config.data_dir));
        Self::open(storage, config.rating_policy).await
    }

    pub fn rating_policy(&self) -> RatingPolicy {
        self.rating_policy
    }

    /// Subscribe to store change events
    pub fn subscribe(&self) -> broadcast::Receiver<StoreEvent> {
        self.event_tx.subscribe()
    }

    fn broadcast(&self, event: StoreEvent) {
        // Ignore errors (no subscribers)
        let _ = self.event_tx.send(event);
    }

    async fn persist<'a>(
        storage: &dyn StorageProvider,
        books: impl Iterator<Item = &'a Book>,
    ) -> std::result::Result<(), StorageError> {
        let mut books: Vec<&Book> = books.collect();
        books.sort_by_key(|b| (b.date_added(), b.id()));
        let document = DocumentRef {
            version: CURRENT_VERSION,
            books,
        };
        let data = serde_json::to_vec_pretty(&document)?;
        storage.write(LIBRARY_FILE, data).await
    }

    async fn commit(&self, books: &HashMap<Uuid, Book>) -> Result<()> {
        Self::persist(self.storage.as_ref(), books.values())
            .await
            .map_err(|e| {
                tracing::error!("Failed to commit library: {}", e);
                BookshelfError::from(e)
            })
    }

    /// Add a new book and commit it
    pub async fn create(&self, new_book: NewBook) -> Result<Book> {
        let book = reading::admit(new_book)?;
        let id = book.id();

        let mut books = self.books.write().await;
        books.insert(id, book.clone());
        if let Err(e) = self.commit(&books).await {
            books.remove(&id);
            return Err(e);
        }
        drop(books);

        tracing::info!("Added \"{}\" as {}", book.title(), book.status());
        self.broadcast(StoreEvent::Created(id));
        Ok(book)
    }

    /// Apply `mutator` to a copy of the book and commit the result
    ///
    /// The stored book is untouched if the mutator or the commit fails.
    pub async fn update<F>(&self, id: Uuid, mutator: F) -> Result<Book>
    where
        F: FnOnce(&mut Book) -> std::result::Result<(), ValidationError>,
    {
        let mut books = self.books.write().await;
        let previous = books.get(&id).cloned().ok_or(BookshelfError::NotFound(id))?;

        let mut working = previous.clone();
        mutator(&mut working)?;

        books.insert(id, working.clone());
        if let Err(e) = self.commit(&books).await {
            books.insert(id, previous);
            return Err(e);
        }
        drop(books);

        self.broadcast(StoreEvent::Updated(id));
        Ok(working)
    }

    /// Remove a book permanently
    pub async fn delete(&self, id: Uuid) -> Result<()> {
        let mut books = self.books.write().await;
        let removed = books.remove(&id).ok_or(BookshelfError::NotFound(id))?;
        if let Err(e) = self.commit(&books).await {
            books.insert(id, removed);
            return Err(e);
        }
        drop(books);

        tracing::info!("Deleted \"{}\"", removed.title());
        self.broadcast(StoreEvent::Deleted(id));
        Ok(())
    }

    /// Upcoming -> Reading
    pub async fn start_reading(&self, id: Uuid, start: StartReading) -> Result<Book> {
        self.update(id, |book| book.start_reading(start)).await
    }

    /// Reading -> Finished, using the configured rating policy
    pub async fn finish(&self, id: Uuid, finish: FinishReading) -> Result<Book> {
        let policy = self.rating_policy;
        self.update(id, |book| book.finish(finish, policy)).await
    }

    /// Set the rating, using the configured rating policy
    pub async fn rate(&self, id: Uuid, rating: Rating) -> Result<Book> {
        let policy = self.rating_policy;
        self.update(id, |book| book.rate(rating, policy)).await
    }

    pub async fn get(&self, id: Uuid) -> Result<Book> {
        self.books
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or(BookshelfError::NotFound(id))
    }

    /// Books matching `query`, in the requested order
    pub async fn query(&self, query: &BookQuery) -> Vec<Book> {
        let mut books: Vec<Book> = self
            .books
            .read()
            .await
            .values()
            .filter(|book| query.matches(book))
            .cloned()
            .collect();

        match query.sort {
            SortOrder::NewestFirst => books.sort_by_key(|b| (Reverse(b.date_added()), b.id())),
            SortOrder::OldestFirst => books.sort_by_key(|b| (b.date_added(), b.id())),
            SortOrder::Title => books.sort_by_cached_key(|b| (b.title().to_lowercase(), b.id())),
        }
        books
    }

    /// Every book, newest first
    pub async fn all(&self) -> Vec<Book> {
        self.query(&BookQuery::all()).await
    }

    pub async fn len(&self) -> usize {
        self.books.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.books.read().await.is_empty()
    }

    pub async fn yearly_finished_count(&self, year: i32) -> usize {
        stats::yearly_finished_count(&self.snapshot().await, year)
    }

    pub async fn monthly_finished_counts(&self, year: i32) -> [usize; 12] {
        stats::monthly_finished_counts(&self.snapshot().await, year)
    }

    pub async fn total_finished_count(&self) -> usize {
        stats::total_finished_count(&self.snapshot().await)
    }

    pub async fn finished_years(&self) -> Vec<i32> {
        stats::finished_years(&self.snapshot().await)
    }

    pub async fn year_summary(&self, year: i32) -> YearSummary {
        YearSummary::compute(&self.snapshot().await, year)
    }

    async fn snapshot(&self) -> Vec<Book> {
        self.books.read().await.values().cloned().collect()
    }
}
