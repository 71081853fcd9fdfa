// src/ingest/types.rs
use chrono::{DateTime, Utc};

/// One article as fetched from a source, before dedup/filtering.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize, PartialEq, Eq)]
pub struct NewsItem {
    pub title: String,
    pub url: String,
    pub source: String, // e.g., "RIABiz", "NewsData"
    pub published_at: Option<DateTime<Utc>>,
    pub excerpt: String, // plain text, entity-decoded, truncated
}

/// Why a source produced nothing (or less than everything).
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("rate limited: {0}")]
    RateLimited(String),
    #[error("unauthorized: {0}")]
    Unauthorized(String),
    #[error("unreachable: {0}")]
    Unreachable(String),
    #[error("malformed payload: {0}")]
    Malformed(String),
}

#[async_trait::async_trait]
pub trait NewsSource: Send + Sync {
    async fn fetch(&self) -> Result<Vec<NewsItem>, FetchError>;
    fn name(&self) -> &str;
    /// Mandatory sources turn an authorization failure into a fatal error
    /// for the whole run; everything else degrades to a warning.
    fn mandatory(&self) -> bool {
        false
    }
}

/// Per-source outcome for the run log.
#[derive(Debug, Clone)]
pub struct SourceReport {
    pub name: String,
    pub fetched: usize,
    pub failed: bool,
}
