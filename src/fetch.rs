//! Schedule document loading.
//!
//! The schedule is fetched exactly once at startup, from an HTTP(S) URL or
//! a local file, and the result is handed to the UI thread over a channel.
//! A failure is terminal: the app shows a static error view and never
//! retries.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use tokio::sync::mpsc;

use crate::models::Timetable;

/// Default schedule location when no argument is given.
pub const DEFAULT_SOURCE: &str = "timetable.json";

const HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Where the schedule document comes from.
#[derive(Debug, Clone)]
pub enum ScheduleSource {
    Url(String),
    File(PathBuf),
}

impl ScheduleSource {
    /// `http://`/`https://` arguments are URLs; anything else is a path.
    pub fn parse(arg: &str) -> Self {
        if arg.starts_with("http://") || arg.starts_with("https://") {
            Self::Url(arg.to_string())
        } else {
            Self::File(PathBuf::from(arg))
        }
    }

    pub fn describe(&self) -> String {
        match self {
            Self::Url(url) => url.clone(),
            Self::File(path) => path.display().to_string(),
        }
    }
}

impl std::fmt::Display for ScheduleSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.describe())
    }
}

/// Result of the one-shot fetch, sent to the main TUI thread.
#[derive(Debug)]
pub enum FetchMessage {
    Loaded(Timetable),
    Failed(String),
}

/// Load and parse the schedule document from the given source.
pub async fn load_schedule(source: &ScheduleSource) -> Result<Timetable> {
    match source {
        ScheduleSource::Url(url) => {
            let client = reqwest::Client::builder()
                .timeout(HTTP_TIMEOUT)
                .build()
                .context("Failed to create HTTP client")?;

            let response = client
                .get(url)
                .send()
                .await
                .with_context(|| format!("Failed to fetch schedule from {url}"))?;

            if !response.status().is_success() {
                bail!("Schedule fetch failed: HTTP {}", response.status());
            }

            response
                .json()
                .await
                .context("Failed to parse schedule document")
        }
        ScheduleSource::File(path) => {
            let contents = tokio::fs::read_to_string(path)
                .await
                .with_context(|| format!("Failed to read schedule file: {}", path.display()))?;
            serde_json::from_str(&contents)
                .with_context(|| format!("Failed to parse schedule file: {}", path.display()))
        }
    }
}

/// One-shot fetch worker. Runs on its own task so the terminal can come up
/// and show the loading view immediately.
pub async fn run_fetch_worker(source: ScheduleSource, tx: mpsc::Sender<FetchMessage>) {
    let message = match load_schedule(&source).await {
        Ok(timetable) => FetchMessage::Loaded(timetable),
        Err(e) => FetchMessage::Failed(format!("{e:#}")),
    };
    tx.send(message).await.ok();
}
