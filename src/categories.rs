//! # Category table
//! The digest's editorial categories live in data, not code: each category
//! carries the key the classifier returns, the label and icon the email
//! shows, and the guidance sentence the classifier prompt embeds. Order in
//! the file is display order.
//!
//! Lookup ladder: `$DIGEST_CATEGORIES_PATH` → `config/categories.toml` →
//! the embedded defaults compiled into the binary.

use anyhow::{anyhow, Context, Result};
use once_cell::sync::Lazy;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

const ENV_PATH: &str = "DIGEST_CATEGORIES_PATH";

static EMBEDDED: Lazy<CategorySet> = Lazy::new(|| {
    let raw = include_str!("../config/categories.toml");
    CategorySet::from_toml(raw).expect("valid embedded categories.toml")
});

#[derive(Debug, Clone, Deserialize)]
pub struct Category {
    pub key: String,
    pub label: String,
    pub icon: String,
    pub guidance: String,
}

/// Ordered, key-unique set of categories.
#[derive(Debug, Clone)]
pub struct CategorySet {
    categories: Vec<Category>,
}

impl CategorySet {
    pub fn from_toml(s: &str) -> Result<Self> {
        #[derive(Deserialize)]
        struct File {
            categories: Vec<Category>,
        }
        let file: File = toml::from_str(s).context("parsing categories toml")?;
        Self::new(file.categories)
    }

    pub fn new(categories: Vec<Category>) -> Result<Self> {
        if categories.is_empty() {
            return Err(anyhow!("category table is empty"));
        }
        let mut seen = std::collections::BTreeSet::new();
        for c in &categories {
            if c.key.trim().is_empty() {
                return Err(anyhow!("category with empty key"));
            }
            if !seen.insert(c.key.as_str()) {
                return Err(anyhow!("duplicate category key: {}", c.key));
            }
        }
        Ok(Self { categories })
    }

    /// Compiled-in defaults.
    pub fn embedded() -> Self {
        EMBEDDED.clone()
    }

    /// Load from an explicit TOML file.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading categories from {}", path.display()))?;
        Self::from_toml(&content)
    }

    /// Load using env var + fallbacks:
    /// 1) $DIGEST_CATEGORIES_PATH
    /// 2) config/categories.toml
    /// 3) embedded defaults
    pub fn load_default() -> Result<Self> {
        if let Ok(p) = std::env::var(ENV_PATH) {
            let pb = PathBuf::from(p);
            if pb.exists() {
                return Self::load_from(&pb);
            }
            return Err(anyhow!("DIGEST_CATEGORIES_PATH points to non-existent path"));
        }
        let toml_p = PathBuf::from("config/categories.toml");
        if toml_p.exists() {
            return Self::load_from(&toml_p);
        }
        Ok(Self::embedded())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Category> {
        self.categories.iter()
    }

    pub fn get(&self, key: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.key == key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}
