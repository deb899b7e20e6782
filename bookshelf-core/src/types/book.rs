//! The persisted Book entity

use super::{Format, Rating, Status};
use crate::error::ValidationError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A book owned by the user
///
/// Status and the dates tied to it only change through the transitions in
/// [`crate::reading`]; everything else has a validated setter. Deserializing
/// checks the same invariants, so a current-schema record that breaks them is
/// rejected. Older documents must go through [`crate::store::migrate`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(try_from = "BookRecord")]
pub struct Book {
    pub(crate) id: Uuid,

    pub(crate) title: String,

    pub(crate) author: String,

    pub(crate) cover_url: Option<String>,

    pub(crate) date_added: DateTime<Utc>,

    pub(crate) status: Status,

    pub(crate) start_date: Option<DateTime<Utc>>,

    pub(crate) date_finished: Option<DateTime<Utc>>,

    pub(crate) format: Format,

    pub(crate) price: f64,

    pub(crate) rating: Rating,

    pub(crate) notes: Option<String>,
}

/// Unchecked wire form of [`Book`]
#[derive(Deserialize)]
struct BookRecord {
    id: Uuid,
    title: String,
    author: String,
    #[serde(default)]
    cover_url: Option<String>,
    date_added: DateTime<Utc>,
    #[serde(default)]
    status: Status,
    #[serde(default)]
    start_date: Option<DateTime<Utc>>,
    #[serde(default)]
    date_finished: Option<DateTime<Utc>>,
    #[serde(default)]
    format: Format,
    #[serde(default)]
    price: f64,
    #[serde(default)]
    rating: Rating,
    #[serde(default)]
    notes: Option<String>,
}

impl TryFrom<BookRecord> for Book {
    type Error = ValidationError;

    fn try_from(record: BookRecord) -> Result<Self, Self::Error> {
        let book = Self {
            id: record.id,
            title: record.title,
            author: record.author,
            cover_url: record.cover_url,
            date_added: record.date_added,
            status: record.status,
            start_date: record.start_date,
            date_finished: record.date_finished,
            format: record.format,
            price: record.price,
            rating: record.rating,
            notes: record.notes,
        };
        book.check_invariants()?;
        Ok(book)
    }
}

impl Book {
    /// Create an upcoming book stamped with the current time
    pub(crate) fn new(
        title: impl Into<String>,
        author: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            id: Uuid::new_v4(),
            title: required("title", title.into())?,
            author: required("author", author.into())?,
            cover_url: None,
            date_added: Utc::now(),
            status: Status::Upcoming,
            start_date: None,
            date_finished: None,
            format: Format::Physical,
            price: 0.0,
            rating: Rating::UNRATED,
            notes: None,
        })
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn author(&self) -> &str {
        &self.author
    }

    pub fn cover_url(&self) -> Option<&str> {
        self.cover_url.as_deref()
    }

    pub fn date_added(&self) -> DateTime<Utc> {
        self.date_added
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn start_date(&self) -> Option<DateTime<Utc>> {
        self.start_date
    }

    pub fn date_finished(&self) -> Option<DateTime<Utc>> {
        self.date_finished
    }

    pub fn format(&self) -> Format {
        self.format
    }

    pub fn price(&self) -> f64 {
        self.price
    }

    /// Stored rating, whatever the status
    pub fn rating(&self) -> Rating {
        self.rating
    }

    /// Rating as shown to the user: only finished, rated books have one
    pub fn visible_rating(&self) -> Option<Rating> {
        (self.status == Status::Finished && self.rating.is_rated()).then_some(self.rating)
    }

    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }

    pub fn set_title(&mut self, title: impl Into<String>) -> Result<(), ValidationError> {
        self.title = required("title", title.into())?;
        Ok(())
    }

    pub fn set_author(&mut self, author: impl Into<String>) -> Result<(), ValidationError> {
        self.author = required("author", author.into())?;
        Ok(())
    }

    pub fn set_cover_url(&mut self, cover_url: Option<String>) {
        self.cover_url = cover_url;
    }

    pub fn set_format(&mut self, format: Format) {
        self.format = format;
    }

    pub fn set_price(&mut self, price: f64) -> Result<(), ValidationError> {
        self.price = validate_price(price)?;
        Ok(())
    }

    /// Blank notes are stored as none
    pub fn set_notes(&mut self, notes: Option<String>) {
        self.notes = notes.filter(|n| !n.trim().is_empty());
    }

    /// Edit the start date without changing status
    pub fn set_start_date(&mut self, start_date: Option<DateTime<Utc>>) {
        self.start_date = start_date;
    }

    /// Move the finish date of a finished book
    pub fn set_date_finished(&mut self, date: DateTime<Utc>) -> Result<(), ValidationError> {
        if self.status != Status::Finished {
            return Err(ValidationError::NotFinished);
        }
        self.date_finished = Some(date);
        Ok(())
    }

    /// Check the invariants every persisted book satisfies
    pub(crate) fn check_invariants(&self) -> Result<(), ValidationError> {
        if self.title.trim().is_empty() {
            return Err(ValidationError::MissingField("title"));
        }
        if self.author.trim().is_empty() {
            return Err(ValidationError::MissingField("author"));
        }
        validate_price(self.price)?;
        if (self.status == Status::Finished) != self.date_finished.is_some() {
            return Err(ValidationError::FinishDateMismatch);
        }
        Ok(())
    }
}

/// Trim a required string field, rejecting blanks
pub(crate) fn required(field: &'static str, value: String) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(ValidationError::MissingField(field))
    } else {
        Ok(trimmed.to_string())
    }
}

/// Prices must be finite and not negative
pub fn validate_price(price: f64) -> Result<f64, ValidationError> {
    if price.is_finite() && price >= 0.0 {
        Ok(price)
    } else {
        Err(ValidationError::InvalidPrice(price))
    }
}
