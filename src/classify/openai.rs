// src/classify/openai.rs
//! OpenAI-backed classifier (Chat Completions, strict JSON mode). The
//! category list and per-category guidance come from the configured
//! `CategorySet`, so adding a category never touches this file.

use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use serde::Deserialize;

use super::{Classifier, RawClassification};
use crate::categories::CategorySet;
use crate::ingest::types::NewsItem;

const MAX_TOKENS: u32 = 4000;
const RAW_LOG_LIMIT: usize = 500;

pub struct OpenAiClassifier {
    http: reqwest::Client,
    api_key: String,
    model: String,
}

impl OpenAiClassifier {
    pub fn new(api_key: String, model: String) -> Self {
        let http = reqwest::Client::builder()
            .user_agent(concat!("ria-news-digest/", env!("CARGO_PKG_VERSION")))
            .connect_timeout(Duration::from_secs(4))
            // a full batch with summaries takes a while to generate
            .timeout(Duration::from_secs(60))
            .build()
            .expect("reqwest client");
        Self {
            http,
            api_key,
            model,
        }
    }
}

fn build_system_prompt(categories: &CategorySet) -> String {
    let mut category_lines = String::new();
    for c in categories.iter() {
        category_lines.push_str(&format!("   - {}: {}\n", c.key, c.guidance));
    }
    let keys: Vec<&str> = categories.iter().map(|c| c.key.as_str()).collect();
    let key_list = keys.join("|");

    format!(
        "You are the editorial assistant for a daily news digest serving independent RIA firms and breakaway advisors.\n\
         \n\
         Your job is to review news articles and:\n\
         1. FILTER: Keep only articles relevant to the US wealth management / RIA industry. Discard anything unrelated (general stock holdings announcements, unrelated M&A, international stories with no US wealth management angle).\n\
         2. CATEGORIZE: Assign each kept article to exactly one of these categories:\n\
         {category_lines}\
         3. SUMMARIZE: Write a 2-3 sentence summary in active voice. End with why it matters for independent advisors or how it shifts the competitive landscape.\n\
         \n\
         Return a JSON object with this exact structure:\n\
         {{\n\
           \"articles\": [\n\
             {{\n\
               \"url\": \"original article url\",\n\
               \"category\": \"{key_list}\",\n\
               \"summary\": \"2-3 sentence summary ending with why it matters for independent advisors.\"\n\
             }}\n\
           ]\n\
         }}\n\
         \n\
         Only include articles that are relevant. If none are relevant, return {{\"articles\": []}}.\n\
         Do not invent, hallucinate, or modify URLs."
    )
}

fn build_user_prompt(batch: &[NewsItem]) -> String {
    let mut lines = vec![
        "Review the following articles and process them per your instructions:".to_string(),
        String::new(),
    ];
    for (i, item) in batch.iter().enumerate() {
        lines.push(format!("{}. TITLE: {}", i + 1, item.title));
        lines.push(format!("   SOURCE: {}", item.source));
        if let Some(ts) = item.published_at {
            lines.push(format!("   DATE: {}", ts.to_rfc3339()));
        }
        lines.push(format!("   URL: {}", item.url));
        if !item.excerpt.is_empty() {
            lines.push(format!("   DESCRIPTION: {}", item.excerpt));
        }
        lines.push(String::new());
    }
    lines.join("\n")
}

fn truncate_for_log(s: &str) -> String {
    if s.chars().count() > RAW_LOG_LIMIT {
        s.chars().take(RAW_LOG_LIMIT).collect()
    } else {
        s.to_string()
    }
}

/// Parse the model's JSON into raw classifications. On invalid JSON the
/// error carries a truncated copy of the response so the run log shows what
/// actually came back.
pub fn parse_classification_json(content: &str) -> Result<Vec<RawClassification>> {
    #[derive(Deserialize)]
    struct Payload {
        #[serde(default)]
        articles: Vec<Entry>,
    }
    #[derive(Deserialize)]
    struct Entry {
        #[serde(default)]
        url: String,
        #[serde(default)]
        category: String,
        #[serde(default)]
        summary: String,
    }

    let payload: Payload = serde_json::from_str(content)
        .with_context(|| format!("invalid classifier JSON, raw: {}", truncate_for_log(content)))?;

    Ok(payload
        .articles
        .into_iter()
        .filter(|e| !e.url.trim().is_empty())
        .map(|e| RawClassification {
            url: e.url,
            category: e.category,
            summary: e.summary,
        })
        .collect())
}

#[async_trait]
impl Classifier for OpenAiClassifier {
    async fn classify_batch(
        &self,
        batch: &[NewsItem],
        categories: &CategorySet,
    ) -> Result<Vec<RawClassification>> {
        #[derive(serde::Serialize)]
        struct Msg<'a> {
            role: &'a str,
            content: &'a str,
        }
        #[derive(serde::Serialize)]
        struct ResponseFormat<'a> {
            #[serde(rename = "type")]
            kind: &'a str,
        }
        #[derive(serde::Serialize)]
        struct Req<'a> {
            model: &'a str,
            messages: Vec<Msg<'a>>,
            temperature: f32,
            max_tokens: u32,
            response_format: ResponseFormat<'a>,
        }
        #[derive(Deserialize)]
        struct Resp {
            choices: Vec<Choice>,
        }
        #[derive(Deserialize)]
        struct Choice {
            message: ChoiceMsg,
        }
        #[derive(Deserialize)]
        struct ChoiceMsg {
            content: String,
        }

        let system = build_system_prompt(categories);
        let user = build_user_prompt(batch);
        let req = Req {
            model: &self.model,
            messages: vec![
                Msg {
                    role: "system",
                    content: &system,
                },
                Msg {
                    role: "user",
                    content: &user,
                },
            ],
            temperature: 0.0,
            max_tokens: MAX_TOKENS,
            response_format: ResponseFormat {
                kind: "json_object",
            },
        };

        let resp = self
            .http
            .post("https://api.openai.com/v1/chat/completions")
            .bearer_auth(&self.api_key)
            .json(&req)
            .send()
            .await
            .context("classifier request")?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(anyhow!(
                "classifier http {status}: {}",
                truncate_for_log(&body)
            ));
        }

        let body: Resp = resp.json().await.context("classifier response body")?;
        let content = body
            .choices
            .first()
            .map(|c| c.message.content.as_str())
            .unwrap_or("");
        parse_classification_json(content)
    }
}
