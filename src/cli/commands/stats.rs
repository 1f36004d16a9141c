//! Event log statistics.

use console::style;

use crate::config::Settings;
use crate::cli::helpers::open_pipeline;
use crate::models::EventStats;

fn health_marker(stats: &EventStats) -> console::StyledObject<&'static str> {
    match stats.health() {
        2 => style("●").green(),
        1 => style("●").yellow(),
        _ => style("●").red(),
    }
}

/// Print downloaded, broken and indexed counts per day or hour.
pub async fn cmd_stats(settings: &Settings, hourly: bool, days: Option<u32>) -> anyhow::Result<()> {
    let ctx = open_pipeline(settings).await?;
    let events = ctx.db.events();

    let rows = match (hourly, days) {
        (true, _) => events.event_stats_by_hour().await?,
        (false, Some(days)) => events.last_days(days).await?,
        (false, None) => events.event_stats().await?,
    };
    let counts = events.download_counts().await?;

    println!(
        "{} Downloads: {} successful, {} failed",
        style("→").cyan(),
        counts.successful,
        counts.failed
    );

    if rows.is_empty() {
        println!("  No events recorded yet.");
        return Ok(());
    }

    println!(
        "\n  {:<18} {:>10} {:>8} {:>8}",
        if hourly { "Hour" } else { "Day" },
        "Downloaded",
        "Broken",
        "Indexed"
    );
    for row in &rows {
        println!(
            "{} {:<18} {:>10} {:>8} {:>8}",
            health_marker(row),
            row.period,
            row.files_downloaded,
            row.files_broken,
            row.files_indexed
        );
    }
    Ok(())
}
