//! # RIA News Digest entrypoint
//! One scheduled run per invocation: collect, classify, render, send.
//!
//! Exit code 0 covers every completed run, including "no news today";
//! exit code 1 means the run could not produce or deliver the digest.

use std::process::ExitCode;

use tracing::error;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use ria_news_digest::config::AppConfig;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("ria_news_digest=info,warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact())
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    // Load .env in local runs; a no-op when the scheduler injects real env.
    let _ = dotenvy::dotenv();
    init_tracing();

    let config = match AppConfig::from_env() {
        Ok(c) => c,
        Err(e) => {
            error!(error = ?e, "configuration error");
            return ExitCode::FAILURE;
        }
    };

    match ria_news_digest::run::run(&config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = ?e, "digest run failed");
            ExitCode::FAILURE
        }
    }
}
