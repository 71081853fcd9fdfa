//! # Classification
//! Batches the pool through an external classifier and validates what comes
//! back. Classification is best-effort by contract: a batch whose response
//! cannot be used costs that batch and nothing else, one attempt per batch,
//! no retries. The classifier also acts as the relevance filter: an item it
//! does not return was judged off-topic and is dropped.

pub mod openai;

use async_trait::async_trait;
use std::collections::HashMap;

use crate::categories::CategorySet;
use crate::dedup::{normalize_url, TrackingParams};
use crate::ingest::types::NewsItem;

pub const BATCH_SIZE: usize = 20;

/// One entry of a classifier response: the echoed article URL, a category
/// key, and the written summary.
#[derive(Debug, Clone)]
pub struct RawClassification {
    pub url: String,
    pub category: String,
    pub summary: String,
}

/// A pool item with its final category and summary.
#[derive(Debug, Clone)]
pub struct ClassifiedItem {
    pub item: NewsItem,
    pub category: String,
    pub summary: String,
}

#[async_trait]
pub trait Classifier: Send + Sync {
    async fn classify_batch(
        &self,
        batch: &[NewsItem],
        categories: &CategorySet,
    ) -> anyhow::Result<Vec<RawClassification>>;
}

/// Classify the whole pool in consecutive batches. Output keeps pool order;
/// batches are independent, so one bad response drops only its own items.
pub async fn classify_all(
    classifier: &dyn Classifier,
    items: &[NewsItem],
    categories: &CategorySet,
    tracking: &TrackingParams,
    batch_size: usize,
) -> Vec<ClassifiedItem> {
    let mut out = Vec::new();
    if items.is_empty() {
        return out;
    }

    for (idx, batch) in items.chunks(batch_size.max(1)).enumerate() {
        let batch_no = idx + 1;
        tracing::info!(batch = batch_no, size = batch.len(), "classifying batch");
        match classifier.classify_batch(batch, categories).await {
            Ok(raw) => out.extend(match_batch(batch, raw, categories, tracking)),
            Err(e) => {
                tracing::warn!(error = ?e, batch = batch_no, "batch classification failed, dropping batch");
            }
        }
    }
    out
}

/// Match response entries back to the submitted batch by normalized URL and
/// validate category keys. Submitted items the response does not cover are
/// dropped; response entries covering nothing we submitted are ignored.
fn match_batch(
    batch: &[NewsItem],
    raw: Vec<RawClassification>,
    categories: &CategorySet,
    tracking: &TrackingParams,
) -> Vec<ClassifiedItem> {
    let mut by_url: HashMap<String, RawClassification> = HashMap::new();
    for rc in raw {
        let key = normalize_url(&rc.url, tracking);
        // first entry wins if the response repeats a URL
        by_url.entry(key).or_insert(rc);
    }

    let mut out = Vec::with_capacity(batch.len());
    for item in batch {
        let key = normalize_url(&item.url, tracking);
        let rc = match by_url.remove(&key) {
            Some(rc) => rc,
            None => {
                tracing::warn!(url = %item.url, "item not classified, dropping");
                continue;
            }
        };
        if !categories.contains(&rc.category) {
            tracing::warn!(url = %item.url, category = %rc.category, "invalid category, dropping item");
            continue;
        }
        let summary = if rc.summary.trim().is_empty() {
            item.excerpt.clone()
        } else {
            rc.summary
        };
        out.push(ClassifiedItem {
            item: item.clone(),
            category: rc.category,
            summary,
        });
    }

    for rc in by_url.values() {
        tracing::warn!(url = %rc.url, "classifier returned a url we never sent, ignoring");
    }

    out
}
