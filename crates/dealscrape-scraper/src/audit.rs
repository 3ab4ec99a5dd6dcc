//! In-process [`AuditSink`] implementations.
//!
//! The Postgres-backed sink lives in `dealscrape-db`.

use std::sync::{Mutex, PoisonError};

use dealscrape_core::{AuditSink, ScrapeAuditRecord};

/// Writes each record as a structured `info` event on the
/// `dealscrape::audit` target.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingAuditSink;

impl AuditSink for TracingAuditSink {
    fn record(&self, record: ScrapeAuditRecord) {
        tracing::info!(
            target: "dealscrape::audit",
            url = %record.url,
            success = record.success,
            source = record.source.map_or("unknown", |s| s.as_str()),
            timestamp = %record.timestamp,
            "scrape audited"
        );
    }
}

/// Keeps records in memory. Used by tests and the CLI summary.
#[derive(Debug, Default)]
pub struct MemoryAuditSink {
    records: Mutex<Vec<ScrapeAuditRecord>>,
}

impl MemoryAuditSink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything recorded so far, oldest first.
    #[must_use]
    pub fn records(&self) -> Vec<ScrapeAuditRecord> {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl AuditSink for MemoryAuditSink {
    fn record(&self, record: ScrapeAuditRecord) {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(record);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dealscrape_core::{ProductSource, ScrapedProduct};

    #[test]
    fn memory_sink_keeps_records_in_order() {
        let sink = MemoryAuditSink::new();
        sink.record(ScrapeAuditRecord::from_result(
            "https://a.example/1",
            &ScrapedProduct::failed(ProductSource::Amazon),
        ));
        sink.record(ScrapeAuditRecord::aborted("https://b.example/2"));

        let records = sink.records();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].url, "https://a.example/1");
        assert_eq!(records[0].source, Some(ProductSource::Amazon));
        assert_eq!(records[1].source, None);
        assert!(!records[1].success);
    }

    #[test]
    fn tracing_sink_accepts_records() {
        TracingAuditSink.record(ScrapeAuditRecord::aborted("https://c.example/3"));
    }
}
