// tests/pipeline.rs
// Drives collect → classify → assemble with stub sources and a scripted
// classifier; no network involved.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::{Duration, Utc};

use ria_news_digest::categories::CategorySet;
use ria_news_digest::classify::{Classifier, RawClassification};
use ria_news_digest::dedup::TrackingParams;
use ria_news_digest::ingest::run_once;
use ria_news_digest::ingest::types::{FetchError, NewsItem, NewsSource};
use ria_news_digest::recency::RecencyWindow;
use ria_news_digest::run::build_digest;

fn item(title: &str, url: &str, age_hours: i64) -> NewsItem {
    NewsItem {
        title: title.to_string(),
        url: url.to_string(),
        source: "Stub".to_string(),
        published_at: Some(Utc::now() - Duration::hours(age_hours)),
        excerpt: format!("excerpt: {title}"),
    }
}

struct StubSource {
    name: &'static str,
    items: Vec<NewsItem>,
}

#[async_trait]
impl NewsSource for StubSource {
    async fn fetch(&self) -> Result<Vec<NewsItem>, FetchError> {
        Ok(self.items.clone())
    }
    fn name(&self) -> &str {
        self.name
    }
}

struct DownSource;

#[async_trait]
impl NewsSource for DownSource {
    async fn fetch(&self) -> Result<Vec<NewsItem>, FetchError> {
        Err(FetchError::Unreachable("connection refused".into()))
    }
    fn name(&self) -> &str {
        "DownFeed"
    }
}

/// 403 from a feed is soft; only the API source is mandatory.
struct ForbiddenFeed;

#[async_trait]
impl NewsSource for ForbiddenFeed {
    async fn fetch(&self) -> Result<Vec<NewsItem>, FetchError> {
        Err(FetchError::Unauthorized("http 403".into()))
    }
    fn name(&self) -> &str {
        "PaywalledFeed"
    }
}

struct BadKeySource;

#[async_trait]
impl NewsSource for BadKeySource {
    async fn fetch(&self) -> Result<Vec<NewsItem>, FetchError> {
        Err(FetchError::Unauthorized("api key rejected".into()))
    }
    fn name(&self) -> &str {
        "NewsData.io"
    }
    fn mandatory(&self) -> bool {
        true
    }
}

/// Echoes the scripted entries whose URL appears in the submitted batch and
/// counts invocations, so tests can assert the classifier was skipped.
struct ScriptedClassifier {
    script: Vec<RawClassification>,
    calls: AtomicUsize,
}

impl ScriptedClassifier {
    fn new(script: Vec<(&str, &str, &str)>) -> Self {
        Self {
            script: script
                .into_iter()
                .map(|(url, category, summary)| RawClassification {
                    url: url.to_string(),
                    category: category.to_string(),
                    summary: summary.to_string(),
                })
                .collect(),
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl Classifier for ScriptedClassifier {
    async fn classify_batch(
        &self,
        batch: &[NewsItem],
        _categories: &CategorySet,
    ) -> anyhow::Result<Vec<RawClassification>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .script
            .iter()
            .filter(|rc| batch.iter().any(|i| i.url == rc.url))
            .cloned()
            .collect())
    }
}

#[tokio::test]
async fn stale_and_cross_source_duplicate_items_never_reach_the_digest() {
    let fresh = "https://advisorhub.com/ubs-team-moves/";
    let deal = "https://riabiz.com/a/creative-planning-deal";
    let source_a = StubSource {
        name: "Source A",
        items: vec![
            item("Old news", "https://advisorhub.com/old-story/", 80),
            item("UBS Team Moves", fresh, 10),
            item("Creative Planning Deal", deal, 5),
        ],
    };
    // same story syndicated with a tracking param, fetched second
    let source_b = StubSource {
        name: "Source B",
        items: vec![item(
            "UBS Team Moves (newsletter copy)",
            "https://advisorhub.com/ubs-team-moves/?utm_source=x",
            9,
        )],
    };
    let classifier = ScriptedClassifier::new(vec![
        (fresh, "breakaway_advisors", "A UBS team went independent."),
        (deal, "acquisitions_ma", "Creative Planning bought an RIA."),
    ]);

    let sources: Vec<Box<dyn NewsSource>> = vec![Box::new(source_a), Box::new(source_b)];
    let digest = build_digest(
        &sources,
        &classifier,
        &CategorySet::embedded(),
        &RecencyWindow::default(),
        &TrackingParams::default(),
    )
    .await
    .expect("run completes");

    assert_eq!(digest.total(), 2);
    assert_eq!(classifier.calls.load(Ordering::SeqCst), 1);

    let breakaway = digest
        .sections
        .iter()
        .find(|s| s.key == "breakaway_advisors")
        .expect("section exists");
    assert_eq!(breakaway.items.len(), 1);
    assert_eq!(breakaway.items[0].item.title, "UBS Team Moves");
    assert_eq!(breakaway.items[0].summary, "A UBS team went independent.");

    let ma = digest
        .sections
        .iter()
        .find(|s| s.key == "acquisitions_ma")
        .expect("section exists");
    assert_eq!(ma.items.len(), 1);

    for quiet in ["funding_investment", "ai_wealthtech"] {
        let s = digest.sections.iter().find(|s| s.key == quiet).unwrap();
        assert!(s.items.is_empty());
    }
}

#[tokio::test]
async fn unreturned_items_are_dropped_as_off_topic() {
    let relevant = "https://riabiz.com/a/relevant";
    let source = StubSource {
        name: "Stub",
        items: vec![
            item("Relevant", relevant, 1),
            item("Celebrity gossip", "https://example.com/gossip", 1),
        ],
    };
    let classifier =
        ScriptedClassifier::new(vec![(relevant, "funding_investment", "Round closed.")]);

    let sources: Vec<Box<dyn NewsSource>> = vec![Box::new(source)];
    let digest = build_digest(
        &sources,
        &classifier,
        &CategorySet::embedded(),
        &RecencyWindow::default(),
        &TrackingParams::default(),
    )
    .await
    .expect("run completes");

    assert_eq!(digest.total(), 1);
}

#[tokio::test]
async fn failing_feeds_only_cost_their_own_items() {
    let kept = "https://advisorhub.com/kept";
    let sources: Vec<Box<dyn NewsSource>> = vec![
        Box::new(DownSource),
        Box::new(ForbiddenFeed),
        Box::new(StubSource {
            name: "Stub",
            items: vec![item("Kept", kept, 1)],
        }),
    ];
    let classifier = ScriptedClassifier::new(vec![(kept, "acquisitions_ma", "Deal.")]);

    let digest = build_digest(
        &sources,
        &classifier,
        &CategorySet::embedded(),
        &RecencyWindow::default(),
        &TrackingParams::default(),
    )
    .await
    .expect("soft failures never end the run");

    assert_eq!(digest.total(), 1);
}

#[tokio::test]
async fn per_source_reports_name_the_failures() {
    let sources: Vec<Box<dyn NewsSource>> = vec![
        Box::new(DownSource),
        Box::new(StubSource {
            name: "Stub",
            items: vec![item("Kept", "https://advisorhub.com/kept", 1)],
        }),
    ];

    let (pool, reports, _) = run_once(
        &sources,
        &RecencyWindow::default(),
        &TrackingParams::default(),
    )
    .await
    .expect("a down feed is a soft failure");

    assert_eq!(pool.len(), 1);
    assert_eq!(reports.len(), 2);
    assert!(reports[0].failed);
    assert_eq!(reports[0].name, "DownFeed");
    assert_eq!(reports[0].fetched, 0);
    assert!(!reports[1].failed);
    assert_eq!(reports[1].fetched, 1);
}

#[tokio::test]
async fn mandatory_source_auth_failure_ends_the_run() {
    let sources: Vec<Box<dyn NewsSource>> = vec![
        Box::new(BadKeySource),
        Box::new(StubSource {
            name: "Stub",
            items: vec![item("Never seen", "https://x.com/a", 1)],
        }),
    ];
    let classifier = ScriptedClassifier::new(vec![]);

    let err = build_digest(
        &sources,
        &classifier,
        &CategorySet::embedded(),
        &RecencyWindow::default(),
        &TrackingParams::default(),
    )
    .await
    .unwrap_err();

    assert!(err.to_string().contains("NewsData.io"));
    assert_eq!(classifier.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn empty_pool_skips_classification_and_still_yields_a_digest() {
    let sources: Vec<Box<dyn NewsSource>> = vec![Box::new(StubSource {
        name: "Stub",
        items: vec![],
    })];
    let classifier = ScriptedClassifier::new(vec![]);

    let digest = build_digest(
        &sources,
        &classifier,
        &CategorySet::embedded(),
        &RecencyWindow::default(),
        &TrackingParams::default(),
    )
    .await
    .expect("a quiet day is still a completed run");

    assert!(digest.is_empty());
    assert_eq!(digest.total(), 0);
    assert_eq!(classifier.calls.load(Ordering::SeqCst), 0);
}
