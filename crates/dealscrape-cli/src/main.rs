mod db;
mod scrape;

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::db::DbCommands;

#[derive(Debug, Parser)]
#[command(name = "dealscrape-cli")]
#[command(about = "Scrape product pages into normalized deal records")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Scrape one or more product URLs and print the records as JSON
    Scrape {
        /// Product page URLs
        #[arg(required = true)]
        urls: Vec<String>,

        /// Pretty-print the JSON output
        #[arg(long)]
        pretty: bool,

        /// Maximum number of pages fetched at once
        #[arg(long, default_value = "4")]
        concurrency: usize,

        /// Also write the audit records to the database (requires `DATABASE_URL`)
        #[arg(long)]
        record: bool,
    },
    /// Report whether a URL passes the scrape-target guard
    CheckUrl {
        url: String,
    },
    /// Audit database maintenance
    Db {
        #[command(subcommand)]
        command: DbCommands,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let config = dealscrape_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    // Logs go to stderr so stdout stays parseable JSON.
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Some(Commands::Scrape {
            urls,
            pretty,
            concurrency,
            record,
        }) => {
            scrape::run_scrape(&config, urls, pretty, concurrency, record).await?;
            Ok(ExitCode::SUCCESS)
        }
        Some(Commands::CheckUrl { url }) => Ok(scrape::run_check_url(&config, &url)),
        Some(Commands::Db { command }) => {
            db::run_db(&config, command).await?;
            Ok(ExitCode::SUCCESS)
        }
        None => {
            println!("dealscrape-cli: run with --help for usage");
            Ok(ExitCode::SUCCESS)
        }
    }
}
