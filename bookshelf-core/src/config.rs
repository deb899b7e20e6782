//! Runtime configuration read from the environment

use crate::reading::RatingPolicy;
use std::path::PathBuf;
use std::time::Duration;

pub const DATA_PATH_VAR: &str = "BOOKSHELF_DATA_PATH";
pub const CATALOG_URL_VAR: &str = "BOOKSHELF_CATALOG_URL";
pub const CATALOG_API_KEY_VAR: &str = "BOOKSHELF_CATALOG_API_KEY";
pub const CATALOG_TIMEOUT_VAR: &str = "BOOKSHELF_CATALOG_TIMEOUT_SECS";
pub const RATING_BEFORE_FINISH_VAR: &str = "BOOKSHELF_RATING_BEFORE_FINISH";

pub const DEFAULT_CATALOG_URL: &str = "https://www.googleapis.com/books";

/// Top-level configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory holding `library.json`
    pub data_dir: PathBuf,

    pub catalog: CatalogConfig,

    pub rating_policy: RatingPolicy,
}

/// External catalog connection settings
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogConfig {
    /// Base URL, `/v1/volumes` is appended
    pub base_url: String,

    /// Sent as the `key` query parameter when present
    pub api_key: Option<String>,

    /// Request timeout, transport default when unset
    pub timeout: Option<Duration>,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_CATALOG_URL.to_string(),
            api_key: None,
            timeout: None,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            catalog: CatalogConfig::default(),
            rating_policy: RatingPolicy::default(),
        }
    }
}

impl Config {
    /// Load configuration from `BOOKSHELF_*` environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let value = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let data_dir = value(DATA_PATH_VAR)
            .map(PathBuf::from)
            .unwrap_or_else(default_data_dir);

        let timeout = value(CATALOG_TIMEOUT_VAR).and_then(|raw| match raw.trim().parse::<u64>() {
            Ok(secs) => Some(Duration::from_secs(secs)),
            Err(_) => {
                tracing::warn!("Ignoring invalid {}: {}", CATALOG_TIMEOUT_VAR, raw);
                None
            }
        });

        let rating_policy = match value(RATING_BEFORE_FINISH_VAR).as_deref().map(str::trim) {
            None => RatingPolicy::default(),
            Some("1" | "true" | "yes") => RatingPolicy::AnyStatus,
            Some("0" | "false" | "no") => RatingPolicy::FinishedOnly,
            Some(other) => {
                tracing::warn!("Ignoring invalid {}: {}", RATING_BEFORE_FINISH_VAR, other);
                RatingPolicy::default()
            }
        };

        Self {
            data_dir,
            catalog: CatalogConfig {
                base_url: value(CATALOG_URL_VAR)
                    .unwrap_or_else(|| DEFAULT_CATALOG_URL.to_string()),
                api_key: value(CATALOG_API_KEY_VAR),
                timeout,
            },
            rating_policy,
        }
    }

    pub fn with_data_dir(mut self, data_dir: impl Into<PathBuf>) -> Self {
        self.data_dir = data_dir.into();
        self
    }
}

/// Platform data directory, or `./bookshelf_data` when none can be determined
pub fn default_data_dir() -> PathBuf {
    if let Some(proj_dirs) = directories::ProjectDirs::from("com", "bookshelf", "Bookshelf") {
        proj_dirs.data_dir().to_path_buf()
    } else {
        PathBuf::from("./bookshelf_data")
    }
}
