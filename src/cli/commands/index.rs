//! Unzip and index commands.

use console::style;
use tokio::sync::mpsc;

use super::{selected_products, Product};
use crate::cli::helpers::{open_pipeline, print_count, spawn_index_progress};
use crate::config::Settings;
use crate::services::bulk::index_dataset;
use crate::services::tickers;
use crate::services::unzip::unzip_all;
use crate::services::{indexer, IndexResult};

fn print_result(result: &IndexResult) {
    print_count("Indexed", result.indexed);
    if result.zip_entries > 0 {
        print_count("ZIP entries", result.zip_entries);
    }
    if result.skipped > 0 {
        print_count("Skipped", result.skipped);
    }
    if result.missing > 0 {
        println!("  {} Missing locally: {}", style("!").yellow(), result.missing);
    }
    if result.corrupt > 0 {
        println!("  {} Corrupt archives: {}", style("✗").red(), result.corrupt);
    }
}

pub async fn cmd_unzip(settings: &Settings) -> anyhow::Result<()> {
    let ctx = open_pipeline(settings).await?;
    println!(
        "{} Unpacking enclosure ZIPs into {}",
        style("→").cyan(),
        ctx.unpacked_dir.display()
    );

    let result = unzip_all(&ctx).await?;
    print_count("Archives", result.archives);
    print_count("Entries written", result.written);
    if result.corrupt > 0 {
        println!("  {} Corrupt archives: {}", style("✗").red(), result.corrupt);
    }
    Ok(())
}

pub async fn cmd_index_files(settings: &Settings) -> anyhow::Result<()> {
    let ctx = open_pipeline(settings).await?;

    println!("{} Indexing company tickers", style("→").cyan());
    let tickers = tickers::update_all(&ctx).await?;
    print_count("New CIKs", tickers.ciks);
    print_count("Listings written", tickers.listings);

    println!("{} Indexing filing files", style("→").cyan());

    let (tx, rx) = mpsc::channel(100);
    let progress = spawn_index_progress("filing files", rx);
    let result = indexer::index_files(&ctx, tx).await;
    let _ = progress.await;

    print_result(&result?);
    Ok(())
}

pub async fn cmd_index_zips(settings: &Settings) -> anyhow::Result<()> {
    let ctx = open_pipeline(settings).await?;
    println!("{} Indexing enclosure ZIP contents", style("→").cyan());

    let (tx, rx) = mpsc::channel(100);
    let progress = spawn_index_progress("enclosure ZIPs", rx);
    let result = indexer::index_zip_contents(&ctx, tx).await;
    let _ = progress.await;

    print_result(&result?);
    Ok(())
}

/// Load the downloaded bulk data sets.
pub async fn cmd_index_data(settings: &Settings, product: Option<Product>) -> anyhow::Result<()> {
    let ctx = open_pipeline(settings).await?;

    let products = selected_products(settings, product);
    if products.is_empty() {
        println!("{} No bulk products enabled in index_mode", style("!").yellow());
        return Ok(());
    }

    for product in products {
        let dataset = product.dataset();
        println!("{} Loading {} bulk data", style("→").cyan(), dataset.data_type());

        let result = index_dataset(&ctx, dataset.as_ref()).await?;
        print_count("Archives", result.archives);
        print_count("Rows", result.rows);
        if ctx.shutdown.is_triggered() {
            break;
        }
    }
    Ok(())
}
