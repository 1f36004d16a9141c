//! Download commands.

use chrono::Utc;
use console::style;
use tokio::sync::mpsc;

use super::{selected_products, Product};
use crate::cli::helpers::{open_pipeline, print_count, spawn_download_progress};
use crate::config::Settings;
use crate::services::bulk::download_dataset;
use crate::services::{DownloadResult, Downloader};

fn print_result(result: &DownloadResult) {
    print_count("Downloaded", result.downloaded);
    print_count("Already cached", result.cached);
    print_count("Skipped", result.skipped);
    if result.failed > 0 {
        println!("  {} Failed: {}", style("✗").red(), result.failed);
    }
}

pub async fn cmd_download_index(settings: &Settings) -> anyhow::Result<()> {
    let ctx = open_pipeline(settings).await?;
    let downloader = Downloader::new(&ctx)?;
    println!("{} Downloading monthly index feeds", style("→").cyan());

    let (tx, rx) = mpsc::channel(100);
    let progress = spawn_download_progress("index feeds", rx);
    let result = downloader.download_index(tx).await;
    let _ = progress.await;
    print_result(&result?);
    if ctx.shutdown.is_triggered() {
        return Ok(());
    }

    println!("{} Downloading company ticker files", style("→").cyan());
    let (tx, rx) = mpsc::channel(100);
    let progress = spawn_download_progress("ticker files", rx);
    let result = downloader.download_tickers(tx).await;
    let _ = progress.await;

    print_result(&result?);
    Ok(())
}

pub async fn cmd_download_files(settings: &Settings) -> anyhow::Result<()> {
    let ctx = open_pipeline(settings).await?;
    let downloader = Downloader::new(&ctx)?;
    println!("{} Downloading filing files", style("→").cyan());

    let (tx, rx) = mpsc::channel(100);
    let progress = spawn_download_progress("filing files", rx);
    let result = downloader.download_files(tx).await;
    let _ = progress.await;

    print_result(&result?);
    Ok(())
}

pub async fn cmd_download_zips(settings: &Settings) -> anyhow::Result<()> {
    let ctx = open_pipeline(settings).await?;
    let downloader = Downloader::new(&ctx)?;
    println!("{} Downloading enclosure ZIPs", style("→").cyan());

    let (tx, rx) = mpsc::channel(100);
    let progress = spawn_download_progress("enclosure ZIPs", rx);
    let result = downloader.download_zips(tx).await;
    let _ = progress.await;

    print_result(&result?);
    Ok(())
}

/// Download the quarterly bulk data sets covered by the worklist.
pub async fn cmd_download_data(settings: &Settings, product: Option<Product>) -> anyhow::Result<()> {
    let ctx = open_pipeline(settings).await?;
    let downloader = Downloader::new(&ctx)?;
    let today = Utc::now().date_naive();

    let products = selected_products(settings, product);
    if products.is_empty() {
        println!("{} No bulk products enabled in index_mode", style("!").yellow());
        return Ok(());
    }

    for product in products {
        let dataset = product.dataset();
        println!(
            "{} Downloading {} bulk data",
            style("→").cyan(),
            dataset.data_type()
        );

        let (tx, rx) = mpsc::channel(100);
        let progress = spawn_download_progress(dataset.data_type(), rx);
        let result = download_dataset(&ctx, &downloader, dataset.as_ref(), today, tx).await;
        let _ = progress.await;

        print_result(&result?);
        if ctx.shutdown.is_triggered() {
            break;
        }
    }
    Ok(())
}
