//! Versioned library document and its upgrade path
//!
//! Version 0 is the legacy, unversioned shape: either a bare array of books
//! or `{ "books": [...] }`. Legacy books use camelCase keys (`dateAdded`,
//! `isRead`, ...) or snake_case ones, track a boolean `isRead`, store status
//! and format as display labels (`"Leídos"`, `"Físico"`), an empty string for
//! a missing cover, and may be missing `status`, `format`, `price`, `rating`
//! or even `id`.

use crate::error::StorageError;
use crate::types::Book;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::collections::HashSet;
use uuid::Uuid;

pub const CURRENT_VERSION: u64 = 1;

/// Legacy camelCase keys and their current names
const RENAMED_KEYS: [(&str, &str); 5] = [
    ("dateAdded", "date_added"),
    ("startDate", "start_date"),
    ("dateFinished", "date_finished"),
    ("isRead", "is_read"),
    ("coverUrl", "cover_url"),
];

type Step = fn(Value) -> Result<Value, StorageError>;

/// Upgrade functions, `STEPS[n]` takes version `n` to `n + 1`
const STEPS: [Step; CURRENT_VERSION as usize] = [v0_to_v1];

/// The persisted library document
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LibraryDocument {
    pub version: u64,
    pub books: Vec<Book>,
}

/// A document brought up to [`CURRENT_VERSION`]
#[derive(Debug)]
pub struct Migration {
    pub from_version: u64,
    pub document: LibraryDocument,
}

impl Migration {
    pub fn upgraded(&self) -> bool {
        self.from_version < CURRENT_VERSION
    }
}

/// Upgrade a raw document to the current schema and validate it
pub fn migrate(value: Value) -> Result<Migration, StorageError> {
    let mut value = match value {
        Value::Array(books) => json!({ "books": books }),
        Value::Object(_) => value,
        _ => return Err(corrupt("expected an object or array")),
    };

    let from_version = match value.get("version") {
        None => 0,
        Some(v) => v
            .as_u64()
            .ok_or_else(|| corrupt("version is not a non-negative integer"))?,
    };

    if from_version > CURRENT_VERSION {
        return Err(StorageError::UnsupportedVersion(from_version));
    }

    for step in STEPS.iter().skip(from_version as usize) {
        value = step(value)?;
    }
    if let Some(map) = value.as_object_mut() {
        map.insert("version".to_string(), json!(CURRENT_VERSION));
    }

    let document: LibraryDocument = serde_json::from_value(value)?;
    validate(&document)?;

    if from_version < CURRENT_VERSION {
        tracing::info!(
            "Migrated library document from version {} to {} ({} books)",
            from_version,
            CURRENT_VERSION,
            document.books.len()
        );
    }

    Ok(Migration {
        from_version,
        document,
    })
}

fn validate(document: &LibraryDocument) -> Result<(), StorageError> {
    let mut seen = HashSet::new();
    for book in &document.books {
        if !seen.insert(book.id()) {
            return Err(corrupt(format!("duplicate book id {}", book.id())));
        }
    }
    Ok(())
}

/// `is_read` flag -> `status` enum, legacy labels -> enums, clamp ratings
fn v0_to_v1(mut value: Value) -> Result<Value, StorageError> {
    let books = value
        .get_mut("books")
        .and_then(Value::as_array_mut)
        .ok_or_else(|| corrupt("missing books array"))?;

    for book in books.iter_mut() {
        let book = book
            .as_object_mut()
            .ok_or_else(|| corrupt("book entry is not an object"))?;
        upgrade_book_v0(book);
    }

    Ok(value)
}

fn upgrade_book_v0(book: &mut Map<String, Value>) {
    for (legacy, current) in RENAMED_KEYS {
        if let Some(v) = book.remove(legacy) {
            book.entry(current).or_insert(v);
        }
    }

    if !book.get("id").is_some_and(Value::is_string) {
        book.insert("id".to_string(), json!(Uuid::new_v4()));
    }

    let is_read = book
        .remove("is_read")
        .and_then(|v| v.as_bool())
        .unwrap_or(false);

    let label = book.get("status").and_then(Value::as_str);
    let status = match label.and_then(legacy_status) {
        Some(status) => status,
        None => {
            if let Some(label) = label {
                tracing::warn!("Unknown legacy status {:?}, inferring from dates", label);
            }
            if is_read {
                "finished"
            } else if is_set(book, "start_date") {
                "reading"
            } else {
                "upcoming"
            }
        }
    };

    if status == "finished" {
        if !is_set(book, "date_finished") {
            // Best available stand-in for an unrecorded finish date
            let added = book.get("date_added").cloned().unwrap_or(Value::Null);
            book.insert("date_finished".to_string(), added);
        }
    } else {
        book.remove("date_finished");
    }
    book.insert("status".to_string(), json!(status));

    if let Some(label) = book.get("format").and_then(Value::as_str) {
        match legacy_format(label) {
            Some(format) => {
                book.insert("format".to_string(), json!(format));
            }
            None => {
                tracing::warn!("Unknown legacy format {:?}, using physical", label);
                book.remove("format");
            }
        }
    }

    let rating = book.get("rating").and_then(|v| {
        v.as_i64()
            .or_else(|| v.as_f64().map(|stars| stars.round() as i64))
    });
    match rating {
        Some(rating) => {
            book.insert("rating".to_string(), json!(rating.clamp(0, 5)));
        }
        None => {
            book.remove("rating");
        }
    }

    for key in ["price", "cover_url", "notes"] {
        let blank = match book.get(key) {
            Some(Value::Null) => true,
            Some(Value::String(s)) => s.trim().is_empty(),
            _ => false,
        };
        if blank {
            book.remove(key);
        }
    }
}

/// Status labels written by earlier releases, in either language
fn legacy_status(label: &str) -> Option<&'static str> {
    match label.trim().to_lowercase().as_str() {
        "upcoming" | "próximos" | "proximos" => Some("upcoming"),
        "reading" | "leyendo" => Some("reading"),
        "finished" | "read" | "leídos" | "leidos" => Some("finished"),
        _ => None,
    }
}

fn legacy_format(label: &str) -> Option<&'static str> {
    match label.trim().to_lowercase().as_str() {
        "physical" | "físico" | "fisico" => Some("physical"),
        "digital" => Some("digital"),
        "audio" | "audiolibro" => Some("audio"),
        _ => None,
    }
}

fn is_set(book: &Map<String, Value>, key: &str) -> bool {
    book.get(key).is_some_and(|v| !v.is_null())
}

fn corrupt(message: impl Into<String>) -> StorageError {
    StorageError::Corrupt(message.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Format, Status};

    #[test]
    fn test_current_document_passes_through() {
        let value = json!({
            "version": 1,
            "books": [{
                "id": "6f1c3c1e-4c57-4a3e-9a53-5a0f4f3b8f10",
                "title": "Dune",
                "author": "Frank Herbert",
                "date_added": "2024-01-05T10:00:00Z",
                "status": "reading",
                "start_date": "2024-03-01T00:00:00Z",
                "format": "digital",
                "price": 9.99,
                "rating": 0
            }]
        });

        let migration = migrate(value).unwrap();
        assert!(!migration.upgraded());
        let book = &migration.document.books[0];
        assert_eq!(book.status(), Status::Reading);
        assert_eq!(book.format(), Format::Digital);
        assert!(book.notes().is_none());
    }

    #[test]
    fn test_legacy_array_upgrades() {
        let value = json!([
            {
                "title": "Dune",
                "author": "Frank Herbert",
                "date_added": "2023-06-01T08:00:00Z",
                "is_read": true,
                "format": "Audio",
                "rating": 9
            },
            {
                "title": "Emma",
                "author": "Jane Austen",
                "date_added": "2023-07-01T08:00:00Z",
                "is_read": false,
                "start_date": "2023-07-02T08:00:00Z",
                "date_finished": "2023-07-03T08:00:00Z"
            },
            {
                "title": "Ulysses",
                "author": "James Joyce",
                "date_added": "2023-08-01T08:00:00Z",
                "is_read": false,
                "price": null
            }
        ]);

        let migration = migrate(value).unwrap();
        assert_eq!(migration.from_version, 0);
        assert!(migration.upgraded());
        assert_eq!(migration.document.version, CURRENT_VERSION);

        let books = &migration.document.books;
        assert_eq!(books[0].status(), Status::Finished);
        assert_eq!(books[0].date_finished(), Some(books[0].date_added()));
        assert_eq!(books[0].format(), Format::Audio);
        assert_eq!(books[0].rating().stars(), 5);

        assert_eq!(books[1].status(), Status::Reading);
        assert!(books[1].date_finished().is_none());

        assert_eq!(books[2].status(), Status::Upcoming);
        assert_eq!(books[2].price(), 0.0);
        assert_ne!(books[0].id(), books[1].id());
    }

    #[test]
    fn test_legacy_capitalized_status() {
        let value = json!({
            "books": [{
                "id": "6f1c3c1e-4c57-4a3e-9a53-5a0f4f3b8f10",
                "title": "Dune",
                "author": "Frank Herbert",
                "date_added": "2023-06-01T08:00:00Z",
                "status": "Finished",
                "date_finished": "2023-09-01T08:00:00Z"
            }]
        });

        let book = &migrate(value).unwrap().document.books[0];
        assert_eq!(book.status(), Status::Finished);
        assert_eq!(
            book.date_finished().unwrap().to_rfc3339(),
            "2023-09-01T08:00:00+00:00"
        );
    }

    #[test]
    fn test_future_version_rejected() {
        let value = json!({ "version": 7, "books": [] });
        assert!(matches!(
            migrate(value),
            Err(StorageError::UnsupportedVersion(7))
        ));
    }

    #[test]
    fn test_inconsistent_book_rejected() {
        let value = json!({
            "version": 1,
            "books": [{
                "id": "6f1c3c1e-4c57-4a3e-9a53-5a0f4f3b8f10",
                "title": "Dune",
                "author": "Frank Herbert",
                "date_added": "2024-01-05T10:00:00Z",
                "status": "upcoming",
                "date_finished": "2024-02-01T00:00:00Z"
            }]
        });
        assert!(matches!(
            migrate(value),
            Err(StorageError::Serialization(_))
        ));
    }

    #[test]
    fn test_unknown_status_rejected() {
        let value = json!({
            "version": 1,
            "books": [{
                "id": "6f1c3c1e-4c57-4a3e-9a53-5a0f4f3b8f10",
                "title": "Dune",
                "author": "Frank Herbert",
                "date_added": "2024-01-05T10:00:00Z",
                "status": "abandoned"
            }]
        });
        assert!(matches!(
            migrate(value),
            Err(StorageError::Serialization(_))
        ));
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let book = json!({
            "id": "6f1c3c1e-4c57-4a3e-9a53-5a0f4f3b8f10",
            "title": "Dune",
            "author": "Frank Herbert",
            "date_added": "2024-01-05T10:00:00Z"
        });
        let value = json!({ "version": 1, "books": [book.clone(), book] });
        assert!(matches!(migrate(value), Err(StorageError::Corrupt(_))));
    }

    #[test]
    fn test_non_document_rejected() {
        assert!(matches!(migrate(json!("library")), Err(StorageError::Corrupt(_))));
    }

    #[test]
    fn test_labelled_camel_case_records_upgrade() {
        let value = json!([
            {
                "title": "Cien años de soledad",
                "author": "Gabriel García Márquez",
                "coverUrl": "",
                "dateAdded": "2023-02-01T08:00:00Z",
                "status": "Leídos",
                "startDate": "2023-02-03T08:00:00Z",
                "dateFinished": "2023-03-10T08:00:00Z",
                "isRead": true,
                "price": 18.5,
                "format": "Físico",
                "notes": "",
                "rating": 4.0
            },
            {
                "title": "Rayuela",
                "author": "Julio Cortázar",
                "coverUrl": "https://books.example/rayuela.jpg",
                "dateAdded": "2023-04-01T08:00:00Z",
                "status": "Leyendo",
                "startDate": "2023-04-02T08:00:00Z",
                "isRead": false,
                "price": 0.0,
                "format": "Audio",
                "notes": "Capítulo 7",
                "rating": 0
            },
            {
                "title": "Ficciones",
                "author": "Jorge Luis Borges",
                "coverUrl": "",
                "dateAdded": "2023-05-01T08:00:00Z",
                "status": "Próximos",
                "isRead": false,
                "price": 0.0,
                "format": "Digital",
                "rating": 2.6
            }
        ]);

        let migration = migrate(value).unwrap();
        let books = &migration.document.books;

        assert_eq!(books[0].status(), Status::Finished);
        assert_eq!(books[0].format(), Format::Physical);
        assert_eq!(books[0].rating().stars(), 4);
        assert_eq!(books[0].price(), 18.5);
        assert!(books[0].cover_url().is_none());
        assert!(books[0].notes().is_none());
        assert_eq!(
            books[0].date_finished().unwrap().to_rfc3339(),
            "2023-03-10T08:00:00+00:00"
        );

        assert_eq!(books[1].status(), Status::Reading);
        assert_eq!(books[1].format(), Format::Audio);
        assert_eq!(books[1].cover_url(), Some("https://books.example/rayuela.jpg"));
        assert_eq!(books[1].notes(), Some("Capítulo 7"));
        assert!(books[1].start_date().is_some());

        assert_eq!(books[2].status(), Status::Upcoming);
        assert_eq!(books[2].format(), Format::Digital);
        assert_eq!(books[2].rating().stars(), 3);
    }

    #[test]
    fn test_unknown_legacy_labels_fall_back() {
        let value = json!([{
            "title": "Dune",
            "author": "Frank Herbert",
            "dateAdded": "2023-06-01T08:00:00Z",
            "status": "Abandonado",
            "isRead": true,
            "format": "Rollo",
            "rating": 11.2
        }]);

        let book = &migrate(value).unwrap().document.books[0];
        assert_eq!(book.status(), Status::Finished);
        assert_eq!(book.format(), Format::Physical);
        assert_eq!(book.rating().stars(), 5);
    }
}
