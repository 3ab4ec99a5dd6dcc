mod app_config;
mod audit;
mod config;
mod products;

pub use app_config::{AppConfig, Environment};
pub use audit::{AuditSink, ScrapeAuditRecord};
pub use config::{load_app_config, load_app_config_from_env, DEFAULT_SCRAPER_USER_AGENT};
pub use products::{PartialExtraction, ProductSource, ScrapedProduct, MAX_DESCRIPTION_CHARS};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
