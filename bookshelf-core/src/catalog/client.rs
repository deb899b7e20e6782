//! HTTP client for the volumes search endpoint

use super::CatalogSource;
use crate::config::CatalogConfig;
use crate::error::SearchError;
use crate::types::{secure_url, CatalogCandidate};
use async_trait::async_trait;
use serde::Deserialize;

/// `GET {base}/v1/volumes?q=...&key=...`
#[derive(Debug, Clone)]
pub struct CatalogClient {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl CatalogClient {
    pub fn new(config: &CatalogConfig) -> Result<Self, SearchError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            http: builder.build()?,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        })
    }

    /// Request URL for an already trimmed query
    fn volumes_url(&self, query: &str) -> String {
        let mut url = format!(
            "{}/v1/volumes?q={}",
            self.base_url,
            urlencoding::encode(query)
        );
        if let Some(key) = &self.api_key {
            url.push_str("&key=");
            url.push_str(&urlencoding::encode(key));
        }
        url
    }
}

#[async_trait]
impl CatalogSource for CatalogClient {
    async fn search(&self, query: &str) -> Result<Vec<CatalogCandidate>, SearchError> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(Vec::new());
        }

        tracing::debug!("Searching catalog for {:?}", query);

        let response = self.http.get(self.volumes_url(query)).send().await?;
        let status = response.status();
        if !status.is_success() {
            tracing::warn!("Catalog search for {:?} failed with {}", query, status);
            return Err(SearchError::Status(status.as_u16()));
        }

        let body = response.bytes().await?;
        let candidates = parse_volumes(&body)?;

        tracing::debug!("Catalog returned {} candidates", candidates.len());
        Ok(candidates)
    }
}

#[derive(Debug, Deserialize)]
struct VolumesResponse {
    /// Absent when nothing matched
    items: Option<Vec<VolumeItem>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VolumeItem {
    id: String,
    volume_info: VolumeInfo,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VolumeInfo {
    #[serde(default)]
    title: String,
    authors: Option<Vec<String>>,
    published_date: Option<String>,
    image_links: Option<ImageLinks>,
}

#[derive(Debug, Deserialize)]
struct ImageLinks {
    thumbnail: Option<String>,
}

impl From<VolumeItem> for CatalogCandidate {
    fn from(item: VolumeItem) -> Self {
        let info = item.volume_info;
        Self {
            external_id: item.id,
            title: info.title.trim().to_string(),
            authors: info.authors.unwrap_or_default(),
            cover_url: info
                .image_links
                .and_then(|links| links.thumbnail)
                .filter(|url| !url.is_empty())
                .map(|url| secure_url(&url)),
            published_date: info.published_date,
        }
    }
}

/// Decode a volumes response body; untitled volumes are skipped
fn parse_volumes(body: &[u8]) -> Result<Vec<CatalogCandidate>, SearchError> {
    let response: VolumesResponse =
        serde_json::from_slice(body).map_err(|e| SearchError::Decode(e.to_string()))?;

    Ok(response
        .items
        .unwrap_or_default()
        .into_iter()
        .map(CatalogCandidate::from)
        .filter(|candidate| !candidate.title.is_empty())
        .collect())
}
