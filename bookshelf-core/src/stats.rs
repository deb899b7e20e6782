//! Finished-book rollups
//!
//! Everything here is recomputed from the full book list on each call.
//! Dates are grouped by their UTC calendar year and month.

use crate::types::{Book, Status};
use chrono::{DateTime, Datelike, Utc};
use serde::Serialize;
use std::collections::BTreeSet;

/// Finish dates of books that count as read
fn finish_dates(books: &[Book]) -> impl Iterator<Item = DateTime<Utc>> + '_ {
    books
        .iter()
        .filter(|book| book.status() == Status::Finished)
        .filter_map(Book::date_finished)
}

/// Books finished during `year`
pub fn yearly_finished_count(books: &[Book], year: i32) -> usize {
    finish_dates(books).filter(|date| date.year() == year).count()
}

/// Books finished per month of `year`, index 0 is January
pub fn monthly_finished_counts(books: &[Book], year: i32) -> [usize; 12] {
    let mut months = [0; 12];
    for date in finish_dates(books).filter(|date| date.year() == year) {
        months[date.month0() as usize] += 1;
    }
    months
}

/// Books finished, all time
pub fn total_finished_count(books: &[Book]) -> usize {
    finish_dates(books).count()
}

/// Years with at least one finished book, ascending
pub fn finished_years(books: &[Book]) -> Vec<i32> {
    finish_dates(books)
        .map(|date| date.year())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Rollups for one year, as shown on a statistics screen
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct YearSummary {
    pub year: i32,
    pub finished: usize,
    pub monthly: [usize; 12],
    pub total_finished: usize,
}

impl YearSummary {
    pub fn compute(books: &[Book], year: i32) -> Self {
        Self {
            year,
            finished: yearly_finished_count(books, year),
            monthly: monthly_finished_counts(books, year),
            total_finished: total_finished_count(books),
        }
    }
}
