//! Offline unit tests for dealscrape-db pool configuration and row types.
//! These tests do not require a live database connection.

use dealscrape_core::{AppConfig, Environment, ProductSource};
use dealscrape_db::{PoolConfig, ScrapeLogRow};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};

fn app_config(database_url: Option<&str>) -> AppConfig {
    AppConfig {
        database_url: database_url.map(str::to_string),
        env: Environment::Test,
        bind_addr: SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), 3000),
        log_level: "info".to_string(),
        db_max_connections: 42,
        db_min_connections: 7,
        db_acquire_timeout_secs: 9,
        scraper_request_timeout_secs: 10,
        scraper_user_agent: "ua".to_string(),
        scraper_max_retries: 2,
        scraper_retry_backoff_base_secs: 1,
        scraper_allowed_hosts: Vec::new(),
    }
}

#[test]
fn pool_config_from_app_config_uses_core_values() {
    let pool_config = PoolConfig::from_app_config(&app_config(Some("postgres://example")));
    assert_eq!(pool_config.max_connections, 42);
    assert_eq!(pool_config.min_connections, 7);
    assert_eq!(pool_config.acquire_timeout_secs, 9);
}

#[tokio::test]
async fn connect_without_database_url_is_a_typed_error() {
    let err = dealscrape_db::connect_pool_from_config(&app_config(None))
        .await
        .expect_err("no URL configured");
    assert!(matches!(err, dealscrape_db::DbError::MissingDatabaseUrl));
}

/// Compile-time smoke test: confirm that [`ScrapeLogRow`] has all expected
/// fields with the correct types. No database required.
#[test]
fn scrape_log_row_has_expected_fields() {
    use chrono::Utc;
    use uuid::Uuid;

    let row = ScrapeLogRow {
        id: 1_i64,
        public_id: Uuid::new_v4(),
        url: "https://www.amazon.com/dp/B0C1234567".to_string(),
        success: true,
        source: Some("amazon".to_string()),
        created_at: Utc::now(),
    };

    assert_eq!(row.id, 1);
    assert!(row.success);
    assert_eq!(row.product_source(), Some(ProductSource::Amazon));
}

#[test]
fn unknown_or_missing_source_maps_to_none() {
    use chrono::Utc;
    use uuid::Uuid;

    let mut row = ScrapeLogRow {
        id: 2,
        public_id: Uuid::new_v4(),
        url: "https://shop.example.com/p".to_string(),
        success: false,
        source: None,
        created_at: Utc::now(),
    };
    assert_eq!(row.product_source(), None);

    row.source = Some("ebay".to_string());
    assert_eq!(row.product_source(), None);
}
