//! The scrape pipeline: guard, detect, fetch, extract, merge, audit.

use std::sync::Arc;

use dealscrape_core::{AuditSink, ProductSource, ScrapeAuditRecord, ScrapedProduct};
use scraper::Html;

use crate::error::ScraperError;
use crate::extract::{jsonld, opengraph, page_title};
use crate::fetch::{HtmlFetcher, ScraperSettings};
use crate::guard::UrlGuard;
use crate::merge::merge;
use crate::source::{detect_source, site_extractor};

/// Scrapes product pages into [`ScrapedProduct`] records.
///
/// `Send + Sync`; share one instance behind an `Arc` across concurrent
/// requests.
pub struct ProductScraper {
    guard: UrlGuard,
    fetcher: HtmlFetcher,
    audit: Arc<dyn AuditSink>,
}

impl ProductScraper {
    /// # Errors
    ///
    /// Returns [`ScraperError::Http`] if the HTTP client cannot be built.
    pub fn new(
        settings: &ScraperSettings,
        audit: Arc<dyn AuditSink>,
    ) -> Result<Self, ScraperError> {
        let guard = UrlGuard::with_allowed_hosts(&settings.allowed_hosts);
        let fetcher = HtmlFetcher::new(settings, guard.clone())?;
        Ok(Self::from_parts(guard, fetcher, audit))
    }

    pub(crate) fn from_parts(
        guard: UrlGuard,
        fetcher: HtmlFetcher,
        audit: Arc<dyn AuditSink>,
    ) -> Self {
        Self {
            guard,
            fetcher,
            audit,
        }
    }

    #[must_use]
    pub fn guard(&self) -> &UrlGuard {
        &self.guard
    }

    /// Scrapes `url`. Never fails: problems surface as `success == false`.
    ///
    /// Exactly one audit record is emitted per call, after the result is
    /// known.
    pub async fn scrape_product(&self, url: &str) -> ScrapedProduct {
        let product = self.scrape_unaudited(url).await;
        tracing::info!(
            url,
            source = %product.source,
            success = product.success,
            "scrape finished"
        );
        self.audit.record(ScrapeAuditRecord::from_result(url, &product));
        product
    }

    async fn scrape_unaudited(&self, url: &str) -> ScrapedProduct {
        if self.guard.is_blocked(url) {
            tracing::warn!(url, "refusing to scrape blocked URL");
            return ScrapedProduct::failed(ProductSource::Generic);
        }

        let source = detect_source(url);
        match self.fetcher.fetch_html(url).await {
            Ok(html) => extract_product(&html, source),
            Err(err) => {
                tracing::warn!(url, %source, error = %err, "page fetch failed");
                ScrapedProduct::failed(source)
            }
        }
    }
}

/// Runs every extractor that applies to `source` over `html` and merges the
/// results.
#[must_use]
pub fn extract_product(html: &str, source: ProductSource) -> ScrapedProduct {
    let doc = Html::parse_document(html);
    let site = site_extractor(source).map(|extract| extract(&doc));
    let structured = jsonld::extract(&doc);
    let open_graph = opengraph::extract(&doc);
    let title = page_title(&doc);
    merge(
        site.as_ref(),
        &structured,
        &open_graph,
        title.as_deref(),
        source,
    )
}
