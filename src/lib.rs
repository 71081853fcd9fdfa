// src/lib.rs
// Public library surface for the digest binaries and integration tests.

pub mod categories;
pub mod config;
pub mod dedup;
pub mod digest;
pub mod recency;
pub mod render;
pub mod run;

// Collection pipeline (providers, aggregation) and downstream stages
pub mod classify;
pub mod ingest;
pub mod notify;

// ---- Re-exports for stable public API ----
pub use crate::categories::CategorySet;
pub use crate::config::AppConfig;
pub use crate::digest::Digest;
pub use crate::ingest::types::{FetchError, NewsItem, NewsSource};
pub use crate::recency::RecencyWindow;
