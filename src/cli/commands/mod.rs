//! CLI commands implementation.
//!
//! This module contains the CLI parser and dispatches to command-specific modules.

mod db;
mod download;
mod index;
mod stats;
mod worklist;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use super::helpers::load_settings;
use crate::config::Settings;
use crate::services::bulk::{BulkDataset, Fsds, Mfd};

/// Bulk data product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Product {
    /// Financial Statement Data Sets
    Fsds,
    /// Mutual Fund Prospectus Risk/Return Summary data
    Mfd,
}

impl Product {
    pub fn dataset(&self) -> Box<dyn BulkDataset> {
        match self {
            Product::Fsds => Box::new(Fsds),
            Product::Mfd => Box::new(Mfd),
        }
    }
}

#[derive(Parser)]
#[command(name = "edgar")]
#[command(about = "Mirror and index SEC EDGAR XBRL filings")]
#[command(version)]
pub struct Cli {
    /// Config file path (overrides auto-discovery)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Check if verbose mode is enabled (for early logging setup).
pub fn is_verbose() -> bool {
    std::env::args().any(|arg| arg == "-v" || arg == "--verbose")
}

#[derive(Subcommand)]
enum Commands {
    /// Choose which months are mirrored
    Worklist {
        #[command(subcommand)]
        command: WorklistCommands,
    },

    /// Fetch index feeds, filing files, enclosure ZIPs or bulk data
    Download {
        #[command(subcommand)]
        command: DownloadCommands,
    },

    /// Unpack downloaded enclosure ZIPs
    Unzip,

    /// Index downloaded filing files into the database
    Index {
        /// Index the contents of enclosure ZIPs instead of single files
        #[arg(long)]
        zip: bool,

        #[command(subcommand)]
        command: Option<IndexCommands>,
    },

    /// Show pipeline activity from the event log
    Stats {
        /// Group by hour instead of by day
        #[arg(long)]
        hourly: bool,
        /// Only the last N days
        #[arg(long, conflicts_with = "hourly")]
        days: Option<u32>,
    },

    /// Database management
    Db {
        #[command(subcommand)]
        command: DbCommands,
    },
}

#[derive(Subcommand)]
enum WorklistCommands {
    /// Mark a year (2021) or month (2021/05) for download
    Enable { date: String },
    /// Stop downloading a year or month
    Disable { date: String },
    /// List the months marked for download
    List {
        /// Newest month first
        #[arg(long)]
        desc: bool,
    },
}

#[derive(Subcommand)]
enum DownloadCommands {
    /// Monthly XBRL RSS feeds
    Index,
    /// Every file listed in the feeds
    Files,
    /// Per-filing enclosure ZIPs
    Zips,
    /// Quarterly bulk data sets
    Data {
        /// Only this product (defaults to the enabled index modes)
        #[arg(long, value_enum)]
        product: Option<Product>,
    },
}

#[derive(Subcommand)]
enum IndexCommands {
    /// Load downloaded bulk data sets
    Data {
        /// Only this product (defaults to the enabled index modes)
        #[arg(long, value_enum)]
        product: Option<Product>,
    },
}

#[derive(Subcommand)]
enum DbCommands {
    /// Apply pending schema migrations
    Migrate,
}

/// Run the CLI.
pub async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let settings = load_settings(cli.config.as_deref()).await?;

    match cli.command {
        Commands::Worklist { command } => match command {
            WorklistCommands::Enable { date } => {
                worklist::cmd_toggle(&settings, &date, true).await
            }
            WorklistCommands::Disable { date } => {
                worklist::cmd_toggle(&settings, &date, false).await
            }
            WorklistCommands::List { desc } => worklist::cmd_list(&settings, desc).await,
        },
        Commands::Download { command } => match command {
            DownloadCommands::Index => download::cmd_download_index(&settings).await,
            DownloadCommands::Files => download::cmd_download_files(&settings).await,
            DownloadCommands::Zips => download::cmd_download_zips(&settings).await,
            DownloadCommands::Data { product } => {
                download::cmd_download_data(&settings, product).await
            }
        },
        Commands::Unzip => index::cmd_unzip(&settings).await,
        Commands::Index { zip, command } => match command {
            Some(IndexCommands::Data { product }) => {
                index::cmd_index_data(&settings, product).await
            }
            None if zip => index::cmd_index_zips(&settings).await,
            None => index::cmd_index_files(&settings).await,
        },
        Commands::Stats { hourly, days } => stats::cmd_stats(&settings, hourly, days).await,
        Commands::Db { command } => match command {
            DbCommands::Migrate => db::cmd_migrate(&settings).await,
        },
    }
}

/// Products selected by `--product`, or every product enabled in the
/// index modes.
fn selected_products(settings: &Settings, product: Option<Product>) -> Vec<Product> {
    match product {
        Some(product) => vec![product],
        None => {
            let mut products = Vec::new();
            if settings.index_fsds {
                products.push(Product::Fsds);
            }
            if settings.index_mfd {
                products.push(Product::Mfd);
            }
            products
        }
    }
}
