//! Wiki Explorer - terminal client for a Wikipedia summarization service
//!
//! Load an article by URL, read its structured summary and hold a
//! question/answer dialog about it. The session state machine lives in
//! [`session`]; [`controller`] runs it against the HTTP backend.

mod client;
mod config;
mod controller;
mod conversation;
mod reveal;
mod session;
mod summary;
mod tui;

use client::{HttpBackend, LoggingBackend};
use config::ClientConfig;
use std::fs::OpenOptions;
use std::sync::Mutex;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = ClientConfig::from_env();

    // The terminal belongs to the UI, so logs go to a file
    if let Some(parent) = config.log_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&config.log_path)?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "wiki_explorer=info".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(false)
                .with_span_list(false)
                .with_writer(Mutex::new(log_file)),
        )
        .init();

    let http = HttpBackend::new(&config.api_url, config.request_timeout)?;
    tracing::info!(
        api_url = %http.base_url(),
        timeout = ?config.request_timeout,
        "Starting wiki explorer"
    );

    let backend = LoggingBackend::new(http);
    let shutdown = CancellationToken::new();
    let handle = controller::spawn_session(backend, shutdown.clone());

    let initial_url = std::env::args().nth(1);

    let result = tui::run(handle, initial_url, config.reveal_tick, config.reveal_step).await;
    shutdown.cancel();

    if let Err(e) = &result {
        tracing::error!(error = %e, "Terminal client exited with error");
    }
    tracing::info!("Shutting down");
    result.map_err(Into::into)
}
