//! Database management commands.

use console::style;

use crate::config::Settings;
use crate::repository::DbContext;

/// Run database migrations.
pub async fn cmd_migrate(settings: &Settings) -> anyhow::Result<()> {
    println!("{} Database migration", style("→").cyan());
    println!("  Database: {}", settings.display_database_url());

    let db = DbContext::from_url(&settings.database_url)?;
    db.migrate().await?;

    println!("{} Schema is up to date.", style("✓").green());
    Ok(())
}
