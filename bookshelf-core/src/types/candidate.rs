//! Transient catalog search results

use serde::{Deserialize, Serialize};

/// A book found in the external catalog, not yet in the library
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CatalogCandidate {
    /// Identifier assigned by the catalog
    pub external_id: String,

    pub title: String,

    /// Ordered author list, may be empty
    pub authors: Vec<String>,

    /// Cover thumbnail, always https
    pub cover_url: Option<String>,

    /// Free-form publication date as reported by the catalog
    pub published_date: Option<String>,
}

impl CatalogCandidate {
    pub const UNKNOWN_AUTHOR: &'static str = "Unknown author";

    /// Authors joined for display, or a placeholder when none are known
    pub fn author_line(&self) -> String {
        if self.authors.is_empty() {
            Self::UNKNOWN_AUTHOR.to_string()
        } else {
            self.authors.join(", ")
        }
    }
}

/// Rewrite plain-http links to https
pub fn secure_url(url: &str) -> String {
    match url.strip_prefix("http://") {
        Some(rest) => format!("https://{}", rest),
        None => url.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(authors: &[&str]) -> CatalogCandidate {
        CatalogCandidate {
            external_id: "abc".to_string(),
            title: "Dune".to_string(),
            authors: authors.iter().map(|a| a.to_string()).collect(),
            cover_url: None,
            published_date: None,
        }
    }

    #[test]
    fn test_author_line() {
        assert_eq!(candidate(&[]).author_line(), "Unknown author");
        assert_eq!(
            candidate(&["Neil Gaiman", "Terry Pratchett"]).author_line(),
            "Neil Gaiman, Terry Pratchett"
        );
    }

    #[test]
    fn test_secure_url() {
        assert_eq!(
            secure_url("http://books.example/cover.jpg"),
            "https://books.example/cover.jpg"
        );
        assert_eq!(
            secure_url("https://books.example/cover.jpg"),
            "https://books.example/cover.jpg"
        );
    }
}
