//! CLI command implementations

mod add;
mod edit;
mod list;
mod reading;
mod search;
mod stats;

pub use add::add;
pub use edit::{delete, edit, Edits};
pub use list::{list, show};
pub use reading::{finish, rate, start};
pub use search::search;
pub use stats::stats;

use anyhow::{bail, Context, Result};
use bookshelf_core::{Book, BookStore, Config};
use uuid::Uuid;

/// Open the library under the configured data directory
pub async fn open_store(config: &Config) -> Result<BookStore> {
    BookStore::open_local(config).await.with_context(|| {
        format!(
            "Failed to open library in {}",
            config.data_dir.display()
        )
    })
}

/// Accept a full id or an unambiguous prefix of one
async fn resolve_id(store: &BookStore, input: &str) -> Result<Uuid> {
    if let Ok(id) = Uuid::parse_str(input) {
        return Ok(id);
    }

    let prefix = input.trim().to_lowercase();
    if prefix.is_empty() {
        bail!("Book id must not be empty");
    }

    let matches: Vec<Uuid> = store
        .all()
        .await
        .iter()
        .map(Book::id)
        .filter(|id| id.to_string().starts_with(&prefix))
        .collect();

    match matches.as_slice() {
        [id] => Ok(*id),
        [] => bail!("No book with id {}", input),
        _ => bail!("Id prefix {} matches {} books", input, matches.len()),
    }
}

fn short_id(id: Uuid) -> String {
    id.to_string().chars().take(8).collect()
}

/// One-line summary used by list and search output
fn summary_line(book: &Book) -> String {
    let mut line = format!(
        "{}  {:<8}  {} by {}",
        short_id(book.id()),
        book.status(),
        book.title(),
        book.author()
    );
    if book.start_date().is_some() {
        line.push_str(&format!("  [{}, {:.2}]", book.format(), book.price()));
    }
    if let Some(rating) = book.visible_rating() {
        line.push_str(&format!("  {}/5", rating.stars()));
    }
    line
}
