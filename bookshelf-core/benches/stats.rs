//! Statistics benchmarks

use bookshelf_core::stats::{monthly_finished_counts, total_finished_count, YearSummary};
use bookshelf_core::Book;
use criterion::{criterion_group, criterion_main, Criterion};
use serde_json::json;

/// A large library with a mix of statuses, built through the document format
fn library(size: usize) -> Vec<Book> {
    (0..size)
        .map(|i| {
            let year = 2015 + (i % 10);
            let month = 1 + (i % 12);
            let value = match i % 3 {
                0 => json!({
                    "id": uuid::Uuid::new_v4(),
                    "title": format!("Book {}", i),
                    "author": "Author",
                    "date_added": format!("{}-{:02}-01T00:00:00Z", year, month),
                    "status": "finished",
                    "start_date": format!("{}-{:02}-02T00:00:00Z", year, month),
                    "date_finished": format!("{}-{:02}-20T00:00:00Z", year, month),
                    "rating": i % 6
                }),
                1 => json!({
                    "id": uuid::Uuid::new_v4(),
                    "title": format!("Book {}", i),
                    "author": "Author",
                    "date_added": format!("{}-{:02}-01T00:00:00Z", year, month),
                    "status": "reading",
                    "start_date": format!("{}-{:02}-02T00:00:00Z", year, month)
                }),
                _ => json!({
                    "id": uuid::Uuid::new_v4(),
                    "title": format!("Book {}", i),
                    "author": "Author",
                    "date_added": format!("{}-{:02}-01T00:00:00Z", year, month)
                }),
            };
            serde_json::from_value(value).expect("valid book")
        })
        .collect()
}

fn stats_benchmark(c: &mut Criterion) {
    let books = library(10_000);

    c.bench_function("monthly_finished_counts_10k", |b| {
        b.iter(|| monthly_finished_counts(std::hint::black_box(&books), 2020))
    });

    c.bench_function("total_finished_count_10k", |b| {
        b.iter(|| total_finished_count(std::hint::black_box(&books)))
    });

    c.bench_function("year_summary_10k", |b| {
        b.iter(|| YearSummary::compute(std::hint::black_box(&books), 2020))
    });
}

criterion_group!(benches, stats_benchmark);
criterion_main!(benches);
