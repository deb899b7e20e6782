//! Add command implementation

use super::summary_line;
use anyhow::{Context, Result};
use bookshelf_core::{BookStore, NewBook, StartReading};

/// Add a book by hand
pub async fn add(
    store: &BookStore,
    title: String,
    author: String,
    cover_url: Option<String>,
    notes: Option<String>,
    start: Option<StartReading>,
    json: bool,
) -> Result<()> {
    let new_book = NewBook {
        title,
        author,
        cover_url,
        notes,
        start,
    };

    let book = store
        .create(new_book)
        .await
        .context("Failed to save book")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&book)?);
    } else {
        println!("Added {}", summary_line(&book));
    }

    Ok(())
}
