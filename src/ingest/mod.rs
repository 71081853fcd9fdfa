// src/ingest/mod.rs
pub mod config;
pub mod providers;
pub mod types;

use std::collections::HashSet;

use chrono::{DateTime, Utc};

use crate::dedup::{normalize_url, TrackingParams};
use crate::ingest::types::{FetchError, NewsItem, NewsSource, SourceReport};
use crate::recency::RecencyWindow;

/// Counters from one aggregation pass, for the run log.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PoolStats {
    pub fetched: usize,
    pub filtered_out: usize,
    pub deduped: usize,
    pub kept: usize,
}

/// Strip HTML down to a short plain-text excerpt: decode entities, drop
/// tags, collapse whitespace, cap at `EXCERPT_LIMIT` chars.
pub const EXCERPT_LIMIT: usize = 300;

pub fn clean_excerpt(raw_html: &str) -> String {
    let mut out = html_escape::decode_html_entities(raw_html).to_string();

    static RE_TAGS: once_cell::sync::OnceCell<regex::Regex> = once_cell::sync::OnceCell::new();
    let re_tags = RE_TAGS.get_or_init(|| regex::Regex::new(r"(?is)</?[^>]+>").unwrap());
    out = re_tags.replace_all(&out, " ").to_string();

    static RE_WS: once_cell::sync::OnceCell<regex::Regex> = once_cell::sync::OnceCell::new();
    let re_ws = RE_WS.get_or_init(|| regex::Regex::new(r"\s+").unwrap());
    out = re_ws.replace_all(&out, " ").trim().to_string();

    if out.chars().count() > EXCERPT_LIMIT {
        out = out.chars().take(EXCERPT_LIMIT).collect();
        out.push('…');
    }
    out
}

/// Recency-filter and dedup a fetched pool. Order in, order out: the first
/// occurrence of a URL wins and keeps its position.
pub fn aggregate(
    now: DateTime<Utc>,
    raw: Vec<NewsItem>,
    window: &RecencyWindow,
    tracking: &TrackingParams,
) -> (Vec<NewsItem>, PoolStats) {
    let mut stats = PoolStats {
        fetched: raw.len(),
        ..PoolStats::default()
    };

    let mut seen_urls: HashSet<String> = HashSet::new();
    let mut kept = Vec::with_capacity(raw.len());

    for item in raw {
        if !window.contains(item.published_at, now) {
            stats.filtered_out += 1;
            tracing::debug!(url = %item.url, published = ?item.published_at, "outside window");
            continue;
        }
        let key = normalize_url(&item.url, tracking);
        if !seen_urls.insert(key) {
            stats.deduped += 1;
            tracing::debug!(url = %item.url, "duplicate url");
            continue;
        }
        kept.push(item);
    }

    stats.kept = kept.len();
    (kept, stats)
}

/// Fetch every source once and aggregate the pool.
///
/// A failing source is logged and contributes zero items; the single fatal
/// case is an authorization failure on a source that declares itself
/// mandatory. Zero total items is a valid outcome.
pub async fn run_once(
    sources: &[Box<dyn NewsSource>],
    window: &RecencyWindow,
    tracking: &TrackingParams,
) -> anyhow::Result<(Vec<NewsItem>, Vec<SourceReport>, PoolStats)> {
    let mut raw = Vec::new();
    let mut reports = Vec::with_capacity(sources.len());

    for src in sources {
        match src.fetch().await {
            Ok(mut items) => {
                tracing::info!(source = src.name(), count = items.len(), "source fetched");
                reports.push(SourceReport {
                    name: src.name().to_string(),
                    fetched: items.len(),
                    failed: false,
                });
                raw.append(&mut items);
            }
            Err(e @ FetchError::Unauthorized(_)) if src.mandatory() => {
                return Err(anyhow::Error::new(e)
                    .context(format!("mandatory source '{}' rejected credentials", src.name())));
            }
            Err(e) => {
                tracing::warn!(error = ?e, source = src.name(), "source failed");
                reports.push(SourceReport {
                    name: src.name().to_string(),
                    fetched: 0,
                    failed: true,
                });
            }
        }
    }

    let now = Utc::now();
    let (kept, stats) = aggregate(now, raw, window, tracking);
    tracing::info!(
        fetched = stats.fetched,
        filtered_out = stats.filtered_out,
        deduped = stats.deduped,
        kept = stats.kept,
        "pool aggregated"
    );
    Ok((kept, reports, stats))
}
