// src/ingest/providers/newsdata.rs
use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Deserialize;

use crate::ingest::clean_excerpt;
use crate::ingest::config::NewsQuery;
use crate::ingest::types::{FetchError, NewsItem, NewsSource};

/// NewsData.io source. Issues one GET per configured query.
///
/// Failure policy per query: 429 stops the remaining queries but keeps what
/// was already collected, a transport error or odd status skips just that
/// query. 401 fails the whole source; the source is mandatory, so a bad key
/// ends the run instead of silently producing an empty digest.
pub struct NewsDataSource {
    api_key: String,
    queries: Vec<NewsQuery>,
    client: reqwest::Client,
}

impl NewsDataSource {
    pub const ENDPOINT: &'static str = "https://newsdata.io/api/1/latest";

    pub fn new(api_key: String, queries: Vec<NewsQuery>, client: reqwest::Client) -> Self {
        Self {
            api_key,
            queries,
            client,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ApiResponse {
    #[serde(default)]
    status: String,
    #[serde(rename = "totalResults", default)]
    total_results: u64,
    #[serde(default)]
    results: Vec<ApiItem>,
}

#[derive(Debug, Deserialize)]
struct ApiItem {
    title: Option<String>,
    link: Option<String>,
    source_id: Option<String>,
    #[serde(rename = "pubDate")]
    pub_date: Option<String>,
    description: Option<String>,
}

/// The API emits `YYYY-MM-DD HH:MM:SS` in UTC without an offset; some
/// mirrors return RFC 3339.
fn parse_api_date(ts: &str) -> Option<DateTime<Utc>> {
    if let Ok(naive) = NaiveDateTime::parse_from_str(ts, "%Y-%m-%d %H:%M:%S") {
        return Some(naive.and_utc());
    }
    DateTime::parse_from_rfc3339(ts)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Parse one response body into items. Public so tests can run against
/// recorded payloads.
pub fn parse_response(body: &str) -> Result<Vec<NewsItem>, FetchError> {
    let data: ApiResponse =
        serde_json::from_str(body).map_err(|e| FetchError::Malformed(format!("newsdata: {e}")))?;
    tracing::debug!(
        status = %data.status,
        total = data.total_results,
        "newsdata response"
    );

    let mut out = Vec::with_capacity(data.results.len());
    for item in data.results {
        let title = item.title.as_deref().unwrap_or("").trim();
        let link = item.link.as_deref().unwrap_or("").trim();
        if title.is_empty() || link.is_empty() {
            tracing::debug!(title = %title, "skipping api item with missing title/link");
            continue;
        }
        let source = item
            .source_id
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| "NewsData.io".to_string());
        out.push(NewsItem {
            title: title.to_string(),
            url: link.to_string(),
            source,
            published_at: item.pub_date.as_deref().and_then(parse_api_date),
            excerpt: clean_excerpt(item.description.as_deref().unwrap_or("")),
        });
    }
    Ok(out)
}

#[async_trait]
impl NewsSource for NewsDataSource {
    async fn fetch(&self) -> Result<Vec<NewsItem>, FetchError> {
        let mut out = Vec::new();

        for query in &self.queries {
            let label: String = query.q.chars().take(60).collect();

            let mut params: Vec<(&str, &str)> = vec![
                ("apikey", self.api_key.as_str()),
                ("q", query.q.as_str()),
                ("language", query.language.as_str()),
            ];
            if let Some(country) = &query.country {
                params.push(("country", country.as_str()));
            }

            let resp = match self.client.get(Self::ENDPOINT).query(&params).send().await {
                Ok(r) => r,
                Err(e) => {
                    tracing::warn!(error = ?e, query = %label, "newsdata query failed");
                    continue;
                }
            };

            let status = resp.status();
            if status.as_u16() == 429 {
                tracing::warn!("newsdata rate limit hit, continuing with what we have");
                break;
            }
            if status.as_u16() == 401 {
                return Err(FetchError::Unauthorized(
                    "newsdata api key rejected (http 401), check NEWSDATA_API_KEY".to_string(),
                ));
            }
            if !status.is_success() {
                tracing::warn!(status = %status, query = %label, "newsdata query failed");
                continue;
            }

            let body = match resp.text().await {
                Ok(b) => b,
                Err(e) => {
                    tracing::warn!(error = ?e, query = %label, "newsdata body read failed");
                    continue;
                }
            };

            match parse_response(&body) {
                Ok(items) => {
                    if items.is_empty() {
                        tracing::info!(query = %label, "newsdata: 0 results");
                    }
                    out.extend(items);
                }
                Err(e) => {
                    tracing::warn!(error = ?e, query = %label, "newsdata parse failed");
                }
            }
        }

        tracing::info!(count = out.len(), "newsdata fetched");
        Ok(out)
    }

    fn name(&self) -> &str {
        "NewsData.io"
    }

    fn mandatory(&self) -> bool {
        true
    }
}
