//! Renders a sample digest (and the empty-state panel) to `.tmp/` for a
//! visual check in the browser, no SMTP involved.

use anyhow::{Context, Result};
use chrono::{Duration, Utc};

use ria_news_digest::categories::CategorySet;
use ria_news_digest::classify::ClassifiedItem;
use ria_news_digest::digest::assemble;
use ria_news_digest::ingest::types::NewsItem;
use ria_news_digest::recency::RecencyWindow;
use ria_news_digest::render::render_digest_html;

fn sample(
    title: &str,
    url: &str,
    source: &str,
    hours_ago: i64,
    category: &str,
    summary: &str,
) -> ClassifiedItem {
    ClassifiedItem {
        item: NewsItem {
            title: title.to_string(),
            url: url.to_string(),
            source: source.to_string(),
            published_at: Some(Utc::now() - Duration::hours(hours_ago)),
            excerpt: String::new(),
        },
        category: category.to_string(),
        summary: summary.to_string(),
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt().with_target(false).init();

    let categories = CategorySet::embedded();
    let now = Utc::now();

    let classified = vec![
        sample(
            "Mercer Advisors Acquires $500M Denver RIA",
            "https://example.com/mercer",
            "InvestmentNews",
            2,
            "acquisitions_ma",
            "Mercer Advisors announced the acquisition of a $500M AUM RIA firm \
             headquartered in Denver, Colorado. The deal expands Mercer's presence \
             in the Mountain West. For independent advisors, this signals continued \
             consolidation pressure as large aggregators accelerate their \
             buy-and-build strategies.",
        ),
        sample(
            "Morgan Stanley Team Takes $1.2B Book Independent",
            "https://example.com/ms",
            "ThinkAdvisor",
            4,
            "breakaway_advisors",
            "A four-advisor team managing $1.2B AUM departed Morgan Stanley to \
             launch their own RIA on the Schwab Advisor Services custodian \
             platform, citing greater flexibility and higher payout as primary \
             motivators.",
        ),
    ];

    std::fs::create_dir_all(".tmp").context("create .tmp")?;

    let digest = assemble(classified, &categories);
    let html = render_digest_html(&digest, now, RecencyWindow::DEFAULT_HOURS);
    std::fs::write(".tmp/preview.html", html).context("write preview")?;

    let empty = assemble(Vec::new(), &categories);
    let html = render_digest_html(&empty, now, RecencyWindow::DEFAULT_HOURS);
    std::fs::write(".tmp/preview_empty.html", html).context("write empty preview")?;

    println!("previews written to .tmp/preview.html and .tmp/preview_empty.html");
    Ok(())
}
