//! Shared helper functions for CLI commands.

use std::path::Path;

use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::config::{Config, Settings};
use crate::repository::DbContext;
use crate::services::{DownloadEvent, IndexEvent, PipelineContext};

/// Settings from `--config` or the discovered config file, then env.
pub async fn load_settings(config_path: Option<&Path>) -> anyhow::Result<Settings> {
    let config = match config_path {
        Some(path) => Config::load_from_path(path)
            .await
            .map_err(|e| anyhow::anyhow!("{}: {}", path.display(), e))?,
        None => Config::load().await,
    };
    Ok(config.settings())
}

/// Open the database, apply pending migrations and build the pipeline
/// context. Ctrl-C and SIGTERM request a cooperative shutdown.
pub async fn open_pipeline(settings: &Settings) -> anyhow::Result<PipelineContext> {
    let db = DbContext::from_url(&settings.database_url)?;
    db.migrate().await?;

    let ctx = settings.pipeline_context(db)?;
    ctx.shutdown.listen_for_signals();
    Ok(ctx)
}

pub fn progress_bar(message: &'static str) -> ProgressBar {
    let progress = ProgressBar::new(0);
    progress.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:30.cyan/blue}] {pos}/{len} {wide_msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("█▓░"),
    );
    progress.set_message(message);
    progress
}

fn report_failure(progress: &ProgressBar, what: &str, error: &str) {
    progress.suspend(|| {
        eprintln!("  {} {}: {}", style("✗").red(), what, error);
    });
}

/// Render download events until the sender is dropped.
pub fn spawn_download_progress(
    message: &'static str,
    mut rx: mpsc::Receiver<DownloadEvent>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let progress = progress_bar(message);
        while let Some(event) = rx.recv().await {
            match event {
                DownloadEvent::Progress { current, total, .. } => {
                    progress.set_length(total as u64);
                    progress.set_position(current as u64);
                }
                DownloadEvent::Started { url } => progress.set_message(url),
                DownloadEvent::Failed { url, error } => report_failure(&progress, &url, &error),
                DownloadEvent::Cached { .. }
                | DownloadEvent::Completed { .. }
                | DownloadEvent::Skipped { .. } => {}
            }
        }
        progress.finish_and_clear();
    })
}

/// Render index events until the sender is dropped.
pub fn spawn_index_progress(
    message: &'static str,
    mut rx: mpsc::Receiver<IndexEvent>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let progress = progress_bar(message);
        while let Some(event) = rx.recv().await {
            match event {
                IndexEvent::Progress { current, total, .. } => {
                    progress.set_length(total as u64);
                    progress.set_position(current as u64);
                }
                IndexEvent::Missing { url } => {
                    report_failure(&progress, &url, "could_not_find_file")
                }
                IndexEvent::Failed { url, error } => report_failure(&progress, &url, &error),
                IndexEvent::Indexed { .. } => {}
            }
        }
        progress.finish_and_clear();
    })
}

/// `✓ label: value` summary line.
pub fn print_count(label: &str, value: usize) {
    println!("  {} {}: {}", style("✓").green(), label, value);
}
