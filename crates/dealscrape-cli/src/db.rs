//! `db` command handlers. Every subcommand needs `DATABASE_URL`.

use anyhow::Context;
use clap::Subcommand;
use dealscrape_core::AppConfig;

/// Sub-commands available under `db`.
#[derive(Debug, Subcommand)]
pub enum DbCommands {
    /// Apply pending migrations
    Migrate,
    /// Check database connectivity
    Ping,
    /// Show the most recent scrape audit records
    RecentLogs {
        /// Maximum number of records to show
        #[arg(long, default_value = "20")]
        limit: i64,
    },
}

pub(crate) async fn run_db(config: &AppConfig, command: DbCommands) -> anyhow::Result<()> {
    let pool = dealscrape_db::connect_pool_from_config(config)
        .await
        .context("failed to connect to the audit database")?;

    match command {
        DbCommands::Migrate => {
            let applied = dealscrape_db::run_migrations(&pool).await?;
            println!("applied {applied} migration(s)");
        }
        DbCommands::Ping => {
            dealscrape_db::health_check(&pool).await?;
            println!("database ok");
        }
        DbCommands::RecentLogs { limit } => {
            let rows = dealscrape_db::list_recent_scrape_logs(&pool, limit).await?;
            if rows.is_empty() {
                println!("no scrape logs recorded");
            }
            for row in rows {
                println!(
                    "{}  {:<7}  {:<8}  {}",
                    row.created_at.format("%Y-%m-%d %H:%M:%S"),
                    if row.success { "ok" } else { "failed" },
                    row.source.as_deref().unwrap_or("-"),
                    row.url
                );
            }
        }
    }
    Ok(())
}
