//! List and show command implementations

use super::{resolve_id, summary_line};
use anyhow::Result;
use bookshelf_core::store::SortOrder;
use bookshelf_core::{BookQuery, BookStore, Status};

/// List books, optionally filtered by status or text
pub async fn list(
    store: &BookStore,
    status: Option<Status>,
    search: Option<String>,
    sort: SortOrder,
    json: bool,
) -> Result<()> {
    let query = BookQuery {
        status,
        text: search,
        sort,
    };
    let books = store.query(&query).await;

    if json {
        println!("{}", serde_json::to_string_pretty(&books)?);
        return Ok(());
    }

    if books.is_empty() {
        match status {
            Some(status) => println!("No {} books", status),
            None => println!("No books yet, add some with `bookshelf search`"),
        }
        return Ok(());
    }

    for book in &books {
        println!("{}", summary_line(book));
    }

    Ok(())
}

/// Display everything known about one book
pub async fn show(store: &BookStore, id: &str, json: bool) -> Result<()> {
    let id = resolve_id(store, id).await?;
    let book = store.get(id).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&book)?);
        return Ok(());
    }

    println!("Title:       {}", book.title());
    println!("Author:      {}", book.author());
    println!("Id:          {}", book.id());
    println!("Status:      {}", book.status());
    println!("Added:       {}", book.date_added().format("%Y-%m-%d"));
    if let Some(started) = book.start_date() {
        println!("Started:     {}", started.format("%Y-%m-%d"));
        println!("Format:      {}", book.format());
        println!("Price:       {:.2}", book.price());
    }
    if let Some(finished) = book.date_finished() {
        println!("Finished:    {}", finished.format("%Y-%m-%d"));
    }
    if let Some(rating) = book.visible_rating() {
        println!("Rating:      {}/5", rating.stars());
    }
    if let Some(cover) = book.cover_url() {
        println!("Cover:       {}", cover);
    }
    if let Some(notes) = book.notes() {
        println!("Notes:       {}", notes);
    }

    Ok(())
}
