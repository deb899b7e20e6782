//! Stats command implementation

use anyhow::Result;
use bookshelf_core::BookStore;
use chrono::{Datelike, Utc};

const MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Show finished-book counts for a year
pub async fn stats(store: &BookStore, year: Option<i32>, json: bool) -> Result<()> {
    let year = year.unwrap_or_else(|| Utc::now().year());
    let summary = store.year_summary(year).await;

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    println!("Finished in {}: {}", summary.year, summary.finished);
    for (name, count) in MONTHS.iter().zip(summary.monthly) {
        println!("  {}  {:>3}  {}", name, count, "#".repeat(count));
    }
    println!("Finished all time: {}", summary.total_finished);

    let years = store.finished_years().await;
    if !years.is_empty() {
        let years: Vec<String> = years.iter().map(i32::to_string).collect();
        println!("Years with finished books: {}", years.join(", "));
    }

    Ok(())
}
