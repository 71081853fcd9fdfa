// src/ingest/providers/rss.rs
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use quick_xml::de::from_str;
use serde::Deserialize;
use time::{format_description::well_known::Rfc2822, OffsetDateTime};

use crate::ingest::clean_excerpt;
use crate::ingest::config::FeedSpec;
use crate::ingest::types::{FetchError, NewsItem, NewsSource};

#[derive(Debug, Deserialize)]
struct Rss {
    channel: Channel,
}
#[derive(Debug, Deserialize)]
struct Channel {
    #[serde(rename = "item", default)]
    item: Vec<Item>,
}
#[derive(Debug, Deserialize)]
struct Item {
    title: Option<String>,
    link: Option<String>,
    #[serde(rename = "pubDate")]
    pub_date: Option<String>,
    description: Option<String>,
}

/// Feeds use RFC 2822 dates almost everywhere; a few emit RFC 3339.
/// Anything else stays `None` and the recency filter drops the item.
fn parse_rss_date(ts: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = OffsetDateTime::parse(ts, &Rfc2822) {
        return DateTime::from_timestamp(dt.unix_timestamp(), 0);
    }
    DateTime::parse_from_rfc3339(ts)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Feeds routinely embed HTML entities that are not valid XML; scrub the
/// common ones before strict parsing.
fn scrub_html_entities_for_xml(s: &str) -> String {
    s.replace("&nbsp;", " ")
        .replace("&ndash;", "-")
        .replace("&mdash;", "-")
        .replace("&ldquo;", "\"")
        .replace("&rdquo;", "\"")
        .replace("&lsquo;", "'")
        .replace("&rsquo;", "'")
}

/// Parse one feed body into items. Separated from the HTTP fetch so tests
/// can feed fixture XML straight in.
pub fn parse_feed(source: &str, xml: &str) -> Result<Vec<NewsItem>, FetchError> {
    let xml_clean = scrub_html_entities_for_xml(xml);
    let rss: Rss = from_str(&xml_clean)
        .map_err(|e| FetchError::Malformed(format!("{source}: {e}")))?;

    let mut out = Vec::with_capacity(rss.channel.item.len());
    for it in rss.channel.item {
        let title = it.title.as_deref().unwrap_or("").trim();
        let link = it.link.as_deref().unwrap_or("").trim();
        if title.is_empty() || link.is_empty() {
            tracing::debug!(source, "skipping feed item with missing title/link");
            continue;
        }
        out.push(NewsItem {
            title: title.to_string(),
            url: link.to_string(),
            source: source.to_string(),
            published_at: it.pub_date.as_deref().and_then(parse_rss_date),
            excerpt: clean_excerpt(it.description.as_deref().unwrap_or("")),
        });
    }
    Ok(out)
}

/// One configured RSS feed. Always soft: a broken feed costs its own items,
/// never the run.
pub struct RssFeedSource {
    name: String,
    url: String,
    client: reqwest::Client,
}

impl RssFeedSource {
    pub fn new(spec: &FeedSpec, client: reqwest::Client) -> Self {
        Self {
            name: spec.name.clone(),
            url: spec.url.clone(),
            client,
        }
    }
}

#[async_trait]
impl NewsSource for RssFeedSource {
    async fn fetch(&self) -> Result<Vec<NewsItem>, FetchError> {
        let resp = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| FetchError::Unreachable(format!("{}: {e}", self.name)))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(match status.as_u16() {
                401 | 403 => FetchError::Unauthorized(format!("{}: http {status}", self.name)),
                429 => FetchError::RateLimited(format!("{}: http {status}", self.name)),
                _ => FetchError::Unreachable(format!("{}: http {status}", self.name)),
            });
        }

        let body = resp
            .text()
            .await
            .map_err(|e| FetchError::Unreachable(format!("{}: body: {e}", self.name)))?;
        parse_feed(&self.name, &body)
    }

    fn name(&self) -> &str {
        &self.name
    }
}
