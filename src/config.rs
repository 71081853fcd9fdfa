//! # Runtime configuration
//! Everything the run needs from the environment, validated up front so a
//! misconfigured cron job fails in one shot with every missing variable
//! named, not one per attempt.

use anyhow::{anyhow, Result};

use crate::recency::RecencyWindow;

pub const DEFAULT_SMTP_HOST: &str = "smtp.gmail.com";
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Ceiling for DIGEST_WINDOW_HOURS. A "recency" window wider than a year is
/// a misconfiguration, and huge values overflow duration math downstream.
pub const MAX_WINDOW_HOURS: i64 = 24 * 365;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub openai_api_key: String,
    pub openai_model: String,
    /// Absent = RSS-only mode (the API source is skipped entirely).
    pub newsdata_api_key: Option<String>,
    pub smtp_host: String,
    pub smtp_user: String,
    pub smtp_pass: String,
    pub from: String,
    pub recipients: Vec<String>,
    pub window_hours: i64,
    pub include_undated: bool,
}

fn env_nonempty(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl AppConfig {
    /// Required: OPENAI_API_KEY, SMTP_USER, SMTP_PASS, DIGEST_RECIPIENTS.
    /// Optional: NEWSDATA_API_KEY, SMTP_HOST, DIGEST_FROM, OPENAI_MODEL,
    /// DIGEST_WINDOW_HOURS, DIGEST_INCLUDE_UNDATED.
    pub fn from_env() -> Result<Self> {
        let mut missing = Vec::new();
        let mut require = |name: &'static str| {
            env_nonempty(name).unwrap_or_else(|| {
                missing.push(name);
                String::new()
            })
        };

        let openai_api_key = require("OPENAI_API_KEY");
        let smtp_user = require("SMTP_USER");
        let smtp_pass = require("SMTP_PASS");
        let recipients_raw = require("DIGEST_RECIPIENTS");

        if !missing.is_empty() {
            return Err(anyhow!(
                "missing required environment variables: {}",
                missing.join(", ")
            ));
        }

        let recipients: Vec<String> = recipients_raw
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();
        if recipients.is_empty() {
            return Err(anyhow!(
                "DIGEST_RECIPIENTS is set but contains no addresses"
            ));
        }

        let newsdata_api_key = env_nonempty("NEWSDATA_API_KEY");
        if newsdata_api_key.is_none() {
            tracing::warn!("NEWSDATA_API_KEY not set, running in RSS-only mode");
        }

        let window_hours = match env_nonempty("DIGEST_WINDOW_HOURS") {
            Some(v) => v
                .parse::<i64>()
                .map_err(|_| anyhow!("DIGEST_WINDOW_HOURS must be a number, got '{v}'"))?,
            None => RecencyWindow::DEFAULT_HOURS,
        };
        if !(1..=MAX_WINDOW_HOURS).contains(&window_hours) {
            return Err(anyhow!(
                "DIGEST_WINDOW_HOURS must be between 1 and {MAX_WINDOW_HOURS}, got {window_hours}"
            ));
        }

        let include_undated = matches!(
            env_nonempty("DIGEST_INCLUDE_UNDATED").as_deref(),
            Some("1") | Some("true") | Some("yes")
        );

        let from = env_nonempty("DIGEST_FROM")
            .unwrap_or_else(|| format!("RIA News Digest <{smtp_user}>"));

        Ok(Self {
            openai_api_key,
            openai_model: env_nonempty("OPENAI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            newsdata_api_key,
            smtp_host: env_nonempty("SMTP_HOST").unwrap_or_else(|| DEFAULT_SMTP_HOST.to_string()),
            smtp_user,
            smtp_pass,
            from,
            recipients,
            window_hours,
            include_undated,
        })
    }

    pub fn window(&self) -> RecencyWindow {
        RecencyWindow::new(self.window_hours).include_undated(self.include_undated)
    }
}
