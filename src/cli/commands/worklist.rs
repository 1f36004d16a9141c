//! Worklist commands.

use chrono::Utc;
use console::style;

use crate::cli::helpers::open_pipeline;
use crate::config::Settings;
use crate::models::Order;
use crate::services::schedule;
use crate::utils::dates::parse_year_month;

/// Enable or disable a year (`2021`) or a month (`2021/05`).
pub async fn cmd_toggle(settings: &Settings, date: &str, will_download: bool) -> anyhow::Result<()> {
    let (year, month) = parse_year_month(date)?;
    let ctx = open_pipeline(settings).await?;
    let today = Utc::now().date_naive();

    let months = schedule::toggle(&ctx.db, year, month, will_download, today).await?;
    if months.is_empty() {
        println!(
            "{} {} is outside the available range, nothing changed",
            style("!").yellow(),
            date
        );
        return Ok(());
    }

    let verb = if will_download { "Enabled" } else { "Disabled" };
    let months = months
        .iter()
        .map(|m| format!("{}/{:02}", year, m))
        .collect::<Vec<_>>()
        .join(", ");
    println!("{} {} {}", style("✓").green(), verb, months);
    Ok(())
}

/// Print the months marked for download.
pub async fn cmd_list(settings: &Settings, desc: bool) -> anyhow::Result<()> {
    let ctx = open_pipeline(settings).await?;
    let order = if desc { Order::Descending } else { Order::Ascending };
    let entries = ctx.db.worklist().list_downloadable(order).await?;

    if entries.is_empty() {
        println!("{} No months enabled. Try 'edgar worklist enable 2021'.", style("!").yellow());
        return Ok(());
    }

    println!("{} {} month(s) enabled", style("→").cyan(), entries.len());
    for entry in entries {
        println!(
            "  {}/{:02}  {}",
            entry.year,
            entry.month,
            style(entry.updated_at.format("%Y-%m-%d %H:%M")).dim()
        );
    }
    Ok(())
}
