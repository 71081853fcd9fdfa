//! # Run orchestration
//! One scheduled pass: collect → filter → classify → render → send. The
//! fetch-to-digest half lives in [`build_digest`] so tests can drive it with
//! stub sources and a stub classifier; email I/O stays in [`run`].

use anyhow::Result;
use chrono::Utc;
use tracing::{info, warn};

use crate::categories::CategorySet;
use crate::classify::openai::OpenAiClassifier;
use crate::classify::{classify_all, Classifier, BATCH_SIZE};
use crate::config::AppConfig;
use crate::dedup::TrackingParams;
use crate::digest::{assemble, Digest};
use crate::ingest;
use crate::ingest::config::SourcesConfig;
use crate::ingest::providers::http_client;
use crate::ingest::providers::newsdata::NewsDataSource;
use crate::ingest::providers::rss::RssFeedSource;
use crate::ingest::types::NewsSource;
use crate::notify::email::EmailSender;
use crate::notify::DigestEmail;
use crate::recency::RecencyWindow;
use crate::render::{render_digest_html, render_digest_text, subject_line};

/// Instantiate the fetch list: the NewsData API first when a key is
/// configured, then every RSS feed in declared order.
pub fn build_sources(
    sources: &SourcesConfig,
    newsdata_api_key: Option<&str>,
) -> Vec<Box<dyn NewsSource>> {
    let client = http_client();
    let mut out: Vec<Box<dyn NewsSource>> = Vec::new();

    match newsdata_api_key {
        Some(key) if !sources.queries.is_empty() => {
            out.push(Box::new(NewsDataSource::new(
                key.to_string(),
                sources.queries.clone(),
                client.clone(),
            )));
        }
        Some(_) => warn!("NewsData key set but no queries configured, skipping the API source"),
        None => {}
    }

    for feed in &sources.feeds {
        out.push(Box::new(RssFeedSource::new(feed, client.clone())));
    }
    out
}

/// Fetch, filter, classify, and bucket. An empty pool short-circuits past
/// the classifier entirely and yields an empty digest, which is still a
/// completed run.
pub async fn build_digest(
    sources: &[Box<dyn NewsSource>],
    classifier: &dyn Classifier,
    categories: &CategorySet,
    window: &RecencyWindow,
    tracking: &TrackingParams,
) -> Result<Digest> {
    let (pool, reports, _stats) = ingest::run_once(sources, window, tracking).await?;

    let failed: Vec<&str> = reports
        .iter()
        .filter(|r| r.failed)
        .map(|r| r.name.as_str())
        .collect();
    if !failed.is_empty() {
        warn!(sources = ?failed, "sources failed this run, digest covers the rest");
    }

    if pool.is_empty() {
        info!("nothing in the window, skipping classification");
        return Ok(assemble(Vec::new(), categories));
    }

    let classified = classify_all(classifier, &pool, categories, tracking, BATCH_SIZE).await;
    info!(
        classified = classified.len(),
        dropped = pool.len() - classified.len(),
        "classification finished"
    );

    let digest = assemble(classified, categories);
    for section in &digest.sections {
        info!(category = %section.key, count = section.items.len(), "section assembled");
    }
    Ok(digest)
}

/// A full scheduled run. `Ok` means the run completed, including the
/// "no news today" case; `Err` means the digest could not be produced
/// or delivered.
pub async fn run(config: &AppConfig) -> Result<()> {
    // 1) Category and source tables (repo file or embedded default)
    let categories = CategorySet::load_default()?;
    let sources_cfg = SourcesConfig::load_default()?;

    // 2) Fetch list; RSS-only when no API key is configured
    let sources = build_sources(&sources_cfg, config.newsdata_api_key.as_deref());
    if sources.is_empty() {
        warn!("no sources configured, the digest will be empty");
    }

    // 3) Collect and classify
    let classifier =
        OpenAiClassifier::new(config.openai_api_key.clone(), config.openai_model.clone());
    let window = config.window();
    let digest = build_digest(
        &sources,
        &classifier,
        &categories,
        &window,
        &sources_cfg.tracking,
    )
    .await?;

    // 4) Render and send; a delivery failure is fatal
    let now = Utc::now();
    let email = DigestEmail {
        subject: subject_line(!digest.is_empty(), now),
        html: render_digest_html(&digest, now, window.hours()),
        text: render_digest_text(&digest, now, window.hours()),
    };

    let sender = EmailSender::new(
        &config.smtp_host,
        config.smtp_user.clone(),
        config.smtp_pass.clone(),
        &config.from,
        &config.recipients,
    )?;
    sender.send_digest(&email).await?;

    info!(total = digest.total(), subject = %email.subject, "digest run complete");
    Ok(())
}
