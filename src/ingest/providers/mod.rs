// src/ingest/providers/mod.rs
pub mod newsdata;
pub mod rss;

use std::time::Duration;

/// Shared HTTP client for all sources. Feeds and the news API are both slow
/// on bad days; 15 s keeps a stuck source from eating the whole run.
pub fn http_client() -> reqwest::Client {
    reqwest::Client::builder()
        .user_agent(concat!("ria-news-digest/", env!("CARGO_PKG_VERSION")))
        .connect_timeout(Duration::from_secs(4))
        .timeout(Duration::from_secs(15))
        .build()
        .expect("reqwest client")
}
