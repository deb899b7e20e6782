//! Reading-state command implementations

use super::{resolve_id, summary_line};
use anyhow::Result;
use bookshelf_core::{BookStore, FinishReading, Rating, StartReading};
use chrono::{DateTime, Utc};

/// Move an upcoming book to reading
pub async fn start(store: &BookStore, id: &str, start: StartReading) -> Result<()> {
    let id = resolve_id(store, id).await?;
    let book = store.start_reading(id, start).await?;
    println!("Started {}", summary_line(&book));
    Ok(())
}

/// Move a book being read to finished
pub async fn finish(
    store: &BookStore,
    id: &str,
    date: Option<DateTime<Utc>>,
    rating: Option<Rating>,
) -> Result<()> {
    let id = resolve_id(store, id).await?;
    let book = store.finish(id, FinishReading { date, rating }).await?;
    println!("Finished {}", summary_line(&book));
    Ok(())
}

/// Set a book's star rating
pub async fn rate(store: &BookStore, id: &str, stars: Rating) -> Result<()> {
    let id = resolve_id(store, id).await?;
    let book = store.rate(id, stars).await?;

    if book.visible_rating().is_none() && stars.is_rated() {
        println!(
            "Rated {} {}/5 (shown once finished)",
            book.title(),
            stars.stars()
        );
    } else {
        println!("Rated {}", summary_line(&book));
    }
    Ok(())
}
