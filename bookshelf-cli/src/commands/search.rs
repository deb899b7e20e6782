//! Search command implementation

use super::summary_line;
use anyhow::{bail, Context, Result};
use bookshelf_core::{
    BookStore, CatalogClient, Config, NewBook, SearchOutcome, SearchSession, StartReading,
};
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::Arc;
use std::time::Duration;

/// Search the catalog, optionally adding one of the results
pub async fn search(
    store: &BookStore,
    config: &Config,
    query: &str,
    add: Option<usize>,
    start: Option<StartReading>,
    json: bool,
) -> Result<()> {
    if query.trim().is_empty() {
        println!("Enter a title or author to search for");
        return Ok(());
    }

    let client = CatalogClient::new(&config.catalog).context("Failed to set up catalog client")?;
    let session = SearchSession::new(Arc::new(client));

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner} {msg}")
            .context("Invalid spinner template")?,
    );
    spinner.set_message(format!("Searching for {}...", query.trim()));
    spinner.enable_steady_tick(Duration::from_millis(100));

    let outcome = session.submit(query).await;
    spinner.finish_and_clear();

    if let SearchOutcome::Failed(message) = outcome {
        bail!("Search failed: {}", message);
    }
    let results = session.results().await;

    if let Some(n) = add {
        let candidate = n
            .checked_sub(1)
            .and_then(|i| results.get(i))
            .with_context(|| format!("No result number {} ({} results)", n, results.len()))?;

        let mut new_book = NewBook::from(candidate);
        new_book.start = start;
        let book = store
            .create(new_book)
            .await
            .context("Failed to save book")?;

        tracing::info!("Added {} from catalog entry {}", book.id(), candidate.external_id);
        if json {
            println!("{}", serde_json::to_string_pretty(&book)?);
        } else {
            println!("Added {}", summary_line(&book));
        }
        return Ok(());
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&results)?);
    } else if results.is_empty() {
        println!("No books found for {}", query.trim());
    } else {
        for (i, candidate) in results.iter().enumerate() {
            let year = candidate
                .published_date
                .as_deref()
                .map(|date| format!(" ({})", date.chars().take(4).collect::<String>()))
                .unwrap_or_default();
            println!(
                "{:>2}. {} by {}{}",
                i + 1,
                candidate.title,
                candidate.author_line(),
                year
            );
        }
    }

    Ok(())
}
