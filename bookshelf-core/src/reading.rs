//! Reading-state machine
//!
//! Books move `Upcoming -> Reading -> Finished` and never back. Each
//! transition stamps the dates and defaults that go with it:
//!
//! | Transition            | Side effects                                      |
//! |-----------------------|---------------------------------------------------|
//! | added, not started    | no start date, price 0, physical format           |
//! | added started / start | start date (default now), format and price        |
//! | finish                | finish date (default now), optional rating        |

use crate::error::ValidationError;
use crate::types::{validate_price, Book, CatalogCandidate, Format, Rating, Status};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Details captured when a book is started
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StartReading {
    /// Defaults to now
    pub date: Option<DateTime<Utc>>,
    pub format: Format,
    pub price: f64,
}

/// Details captured when a book is finished
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FinishReading {
    /// Defaults to now
    pub date: Option<DateTime<Utc>>,
    pub rating: Option<Rating>,
}

/// Whether a rating may be given before the book is finished
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum RatingPolicy {
    /// Allowed at any status, only shown once finished
    #[default]
    AnyStatus,

    /// Rejected until the book is finished
    FinishedOnly,
}

/// A book about to be added to the library
#[derive(Debug, Clone, PartialEq)]
pub struct NewBook {
    pub title: String,
    pub author: String,
    pub cover_url: Option<String>,
    pub notes: Option<String>,

    /// Start reading immediately instead of queueing as upcoming
    pub start: Option<StartReading>,
}

impl NewBook {
    pub fn new(title: impl Into<String>, author: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            author: author.into(),
            cover_url: None,
            notes: None,
            start: None,
        }
    }

    pub fn with_cover_url(mut self, cover_url: impl Into<String>) -> Self {
        self.cover_url = Some(cover_url.into());
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    /// Add the book already in progress
    pub fn starting(mut self, start: StartReading) -> Self {
        self.start = Some(start);
        self
    }
}

impl From<&CatalogCandidate> for NewBook {
    fn from(candidate: &CatalogCandidate) -> Self {
        Self {
            title: candidate.title.clone(),
            author: candidate.author_line(),
            cover_url: candidate.cover_url.clone(),
            notes: None,
            start: None,
        }
    }
}

/// Build the initial entity for a new book
pub(crate) fn admit(new_book: NewBook) -> Result<Book, ValidationError> {
    let mut book = Book::new(new_book.title, new_book.author)?;
    book.set_cover_url(new_book.cover_url);
    book.set_notes(new_book.notes);

    if let Some(start) = new_book.start {
        book.start_reading(start)?;
    }

    Ok(book)
}

impl Book {
    /// Upcoming -> Reading
    pub fn start_reading(&mut self, start: StartReading) -> Result<(), ValidationError> {
        if self.status != Status::Upcoming {
            return Err(invalid("start", self.status));
        }
        let price = validate_price(start.price)?;

        self.status = Status::Reading;
        self.start_date = Some(start.date.unwrap_or_else(Utc::now));
        self.format = start.format;
        self.price = price;

        tracing::debug!("Book {} started reading", self.id);
        Ok(())
    }

    /// Reading -> Finished
    pub fn finish(
        &mut self,
        finish: FinishReading,
        policy: RatingPolicy,
    ) -> Result<(), ValidationError> {
        if self.status != Status::Reading {
            return Err(invalid("finish", self.status));
        }

        self.status = Status::Finished;
        self.date_finished = Some(finish.date.unwrap_or_else(Utc::now));
        if let Some(rating) = finish.rating {
            self.rate(rating, policy)?;
        }

        tracing::debug!("Book {} finished", self.id);
        Ok(())
    }

    /// Set the rating; never changes status
    pub fn rate(&mut self, rating: Rating, policy: RatingPolicy) -> Result<(), ValidationError> {
        if policy == RatingPolicy::FinishedOnly && self.status != Status::Finished {
            return Err(ValidationError::RatingBeforeFinish);
        }
        self.rating = rating;
        Ok(())
    }
}

fn invalid(action: &'static str, status: Status) -> ValidationError {
    ValidationError::InvalidTransition {
        action,
        status: status.as_str(),
    }
}
