//! Edit and delete command implementations

use super::{resolve_id, summary_line};
use anyhow::{bail, Result};
use bookshelf_core::{BookStore, Format};
use chrono::{DateTime, Utc};

/// Field changes requested on the command line
#[derive(Debug, Default)]
pub struct Edits {
    pub title: Option<String>,
    pub author: Option<String>,
    pub format: Option<Format>,
    pub price: Option<f64>,
    pub notes: Option<String>,
    pub start_date: Option<DateTime<Utc>>,
    pub finished_date: Option<DateTime<Utc>>,
}

impl Edits {
    fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.author.is_none()
            && self.format.is_none()
            && self.price.is_none()
            && self.notes.is_none()
            && self.start_date.is_none()
            && self.finished_date.is_none()
    }
}

/// Apply direct edits; never changes reading status
pub async fn edit(store: &BookStore, id: &str, edits: Edits) -> Result<()> {
    if edits.is_empty() {
        bail!("Nothing to edit, pass at least one field");
    }

    let id = resolve_id(store, id).await?;
    let book = store
        .update(id, |book| {
            if let Some(title) = edits.title {
                book.set_title(title)?;
            }
            if let Some(author) = edits.author {
                book.set_author(author)?;
            }
            if let Some(format) = edits.format {
                book.set_format(format);
            }
            if let Some(price) = edits.price {
                book.set_price(price)?;
            }
            if let Some(notes) = edits.notes {
                book.set_notes(Some(notes));
            }
            if let Some(start_date) = edits.start_date {
                book.set_start_date(Some(start_date));
            }
            if let Some(finished_date) = edits.finished_date {
                book.set_date_finished(finished_date)?;
            }
            Ok(())
        })
        .await?;

    println!("Updated {}", summary_line(&book));
    Ok(())
}

/// Remove a book permanently
pub async fn delete(store: &BookStore, id: &str) -> Result<()> {
    let id = resolve_id(store, id).await?;
    let book = store.get(id).await?;
    store.delete(id).await?;
    println!("Deleted {} by {}", book.title(), book.author());
    Ok(())
}
