use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::products::{ProductSource, ScrapedProduct};

/// One entry in the append-only scrape log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScrapeAuditRecord {
    pub url: String,
    pub success: bool,
    /// Detected profile. `None` only when the scrape never produced a result.
    pub source: Option<ProductSource>,
    pub timestamp: DateTime<Utc>,
}

impl ScrapeAuditRecord {
    /// Audit entry for a completed scrape, timestamped now.
    #[must_use]
    pub fn from_result(url: &str, product: &ScrapedProduct) -> Self {
        Self {
            url: url.to_owned(),
            success: product.success,
            source: Some(product.source),
            timestamp: Utc::now(),
        }
    }

    /// Audit entry for a scrape that aborted before producing a record.
    #[must_use]
    pub fn aborted(url: &str) -> Self {
        Self {
            url: url.to_owned(),
            success: false,
            source: None,
            timestamp: Utc::now(),
        }
    }
}

/// Destination for scrape audit records.
///
/// `record` is fire-and-forget: implementations must not block the caller on
/// slow I/O and must swallow (and log) their own failures.
pub trait AuditSink: Send + Sync {
    fn record(&self, record: ScrapeAuditRecord);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_result_copies_outcome_and_source() {
        let product = ScrapedProduct {
            title: Some("Widget".to_string()),
            success: true,
            ..ScrapedProduct::failed(ProductSource::Shopify)
        };
        let record = ScrapeAuditRecord::from_result("https://shop.example.com/p/1", &product);
        assert_eq!(record.url, "https://shop.example.com/p/1");
        assert!(record.success);
        assert_eq!(record.source, Some(ProductSource::Shopify));
    }

    #[test]
    fn aborted_has_no_source() {
        let record = ScrapeAuditRecord::aborted("https://example.com");
        assert!(!record.success);
        assert!(record.source.is_none());
    }
}
