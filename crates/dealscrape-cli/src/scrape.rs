//! `scrape` and `check-url` command handlers.

use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use dealscrape_core::{AppConfig, ScrapedProduct};
use dealscrape_scraper::{MemoryAuditSink, ProductScraper, ScraperSettings, UrlGuard};
use futures::stream::{self, StreamExt};

/// Scrapes `urls` with at most `concurrency` fetches in flight and prints the
/// records in input order: a single object for one URL, an array otherwise.
pub(crate) async fn run_scrape(
    config: &AppConfig,
    urls: Vec<String>,
    pretty: bool,
    concurrency: usize,
    record: bool,
) -> anyhow::Result<()> {
    let audit = Arc::new(MemoryAuditSink::new());
    let scraper = ProductScraper::new(&ScraperSettings::from_app_config(config), audit.clone())
        .context("failed to build HTTP client")?;

    let products: Vec<ScrapedProduct> = stream::iter(urls.iter())
        .map(|url| scraper.scrape_product(url))
        .buffered(concurrency.max(1))
        .collect()
        .await;

    let output = render(&products, pretty)?;
    println!("{output}");

    let succeeded = products.iter().filter(|p| p.success).count();
    tracing::info!(
        total = products.len(),
        succeeded,
        failed = products.len() - succeeded,
        "scrape run complete"
    );

    if record {
        persist_audit_records(config, &audit).await?;
    }
    Ok(())
}

fn render(products: &[ScrapedProduct], pretty: bool) -> serde_json::Result<String> {
    match (products, pretty) {
        ([single], true) => serde_json::to_string_pretty(single),
        ([single], false) => serde_json::to_string(single),
        (all, true) => serde_json::to_string_pretty(all),
        (all, false) => serde_json::to_string(all),
    }
}

async fn persist_audit_records(
    config: &AppConfig,
    audit: &MemoryAuditSink,
) -> anyhow::Result<()> {
    let pool = dealscrape_db::connect_pool_from_config(config)
        .await
        .context("--record needs a reachable DATABASE_URL")?;
    let records = audit.records();
    for record in &records {
        dealscrape_db::insert_scrape_log(&pool, record).await?;
    }
    tracing::info!(count = records.len(), "audit records written");
    Ok(())
}

/// Prints whether `url` would be scraped. Exit status 1 when blocked.
pub(crate) fn run_check_url(config: &AppConfig, url: &str) -> ExitCode {
    let guard = UrlGuard::with_allowed_hosts(&config.scraper_allowed_hosts);
    if guard.is_blocked(url) {
        println!("blocked: {url}");
        ExitCode::FAILURE
    } else {
        println!("allowed: {url} ({})", dealscrape_scraper::detect_source(url));
        ExitCode::SUCCESS
    }
}
