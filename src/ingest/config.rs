// src/ingest/config.rs
use anyhow::{anyhow, Context, Result};
use once_cell::sync::Lazy;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::dedup::TrackingParams;

const ENV_PATH: &str = "DIGEST_SOURCES_PATH";

static EMBEDDED: Lazy<SourcesConfig> = Lazy::new(|| {
    let raw = include_str!("../../config/sources.toml");
    SourcesConfig::from_toml(raw).expect("valid embedded sources.toml")
});

/// One RSS feed to poll.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct FeedSpec {
    pub name: String,
    pub url: String,
}

/// One NewsData.io query. Each becomes a separate API call.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct NewsQuery {
    pub q: String,
    #[serde(default = "default_language")]
    pub language: String,
    #[serde(default)]
    pub country: Option<String>,
}

fn default_language() -> String {
    "en".to_string()
}

/// Source declarations: which feeds and API queries feed the pool, plus the
/// tracking-parameter denylist used for URL dedup.
#[derive(Debug, Clone, Deserialize)]
pub struct SourcesConfig {
    #[serde(default)]
    pub feeds: Vec<FeedSpec>,
    #[serde(default)]
    pub queries: Vec<NewsQuery>,
    #[serde(default)]
    pub tracking: TrackingParams,
}

impl SourcesConfig {
    pub fn from_toml(s: &str) -> Result<Self> {
        let cfg: SourcesConfig = toml::from_str(s).context("parsing sources toml")?;
        for feed in &cfg.feeds {
            if feed.name.trim().is_empty() || feed.url.trim().is_empty() {
                return Err(anyhow!("feed with empty name or url"));
            }
        }
        for query in &cfg.queries {
            if query.q.trim().is_empty() {
                return Err(anyhow!("query with empty q"));
            }
        }
        Ok(cfg)
    }

    /// Compiled-in defaults.
    pub fn embedded() -> Self {
        EMBEDDED.clone()
    }

    /// Load from an explicit TOML file.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading sources from {}", path.display()))?;
        Self::from_toml(&content)
    }

    /// Load using env var + fallbacks:
    /// 1) $DIGEST_SOURCES_PATH
    /// 2) config/sources.toml
    /// 3) embedded defaults
    pub fn load_default() -> Result<Self> {
        if let Ok(p) = std::env::var(ENV_PATH) {
            let pb = PathBuf::from(p);
            if pb.exists() {
                return Self::load_from(&pb);
            }
            return Err(anyhow!("DIGEST_SOURCES_PATH points to non-existent path"));
        }
        let toml_p = PathBuf::from("config/sources.toml");
        if toml_p.exists() {
            return Self::load_from(&toml_p);
        }
        Ok(Self::embedded())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    #[test]
    fn embedded_defaults_carry_four_feeds_and_three_queries() {
        let cfg = SourcesConfig::embedded();
        let names: Vec<&str> = cfg.feeds.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "AdvisorHub",
                "RIABiz",
                "WealthManagement.com",
                "Financial Planning"
            ]
        );
        assert_eq!(cfg.queries.len(), 3);
        assert!(cfg.queries.iter().all(|q| q.language == "en"));
        // only the AI query is pinned to the US
        let pinned: Vec<&NewsQuery> =
            cfg.queries.iter().filter(|q| q.country.is_some()).collect();
        assert_eq!(pinned.len(), 1);
        assert!(pinned[0].q.contains("AI"));
    }

    #[test]
    fn missing_sections_default_to_empty() {
        let cfg = SourcesConfig::from_toml("").unwrap();
        assert!(cfg.feeds.is_empty());
        assert!(cfg.queries.is_empty());
        assert!(cfg.tracking.is_tracking("utm_source"));
    }

    #[test]
    fn blank_feed_rejected() {
        let toml = "[[feeds]]\nname = \"\"\nurl = \"https://x.com/feed\"\n";
        assert!(SourcesConfig::from_toml(toml).is_err());
    }

    #[serial_test::serial]
    #[test]
    fn load_default_prefers_env_then_file_then_embedded() {
        let old = env::current_dir().unwrap();
        let tmp = tempfile::tempdir().unwrap();
        env::set_current_dir(tmp.path()).unwrap();

        env::remove_var(ENV_PATH);

        // No files in temp CWD -> embedded defaults
        let cfg = SourcesConfig::load_default().unwrap();
        assert_eq!(cfg.feeds.len(), 4);

        // Env var wins
        let p = tmp.path().join("sources.toml");
        fs::write(&p, "[[feeds]]\nname = \"Only\"\nurl = \"https://only.example/rss\"\n").unwrap();
        env::set_var(ENV_PATH, p.display().to_string());
        let cfg2 = SourcesConfig::load_default().unwrap();
        assert_eq!(cfg2.feeds.len(), 1);
        assert!(cfg2.queries.is_empty());
        env::remove_var(ENV_PATH);

        env::set_current_dir(&old).unwrap();
    }
}
