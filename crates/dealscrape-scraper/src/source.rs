//! Hostname → extraction profile lookup.
//!
//! Adding a marketplace means adding one [`SiteProfile`] to [`PROFILES`]; the
//! merger and pipeline pick it up without changes.

use dealscrape_core::{PartialExtraction, ProductSource};
use reqwest::Url;
use scraper::Html;

use crate::extract::{amazon, shopify};

/// A marketplace-specific extractor keyed by a hostname substring.
pub struct SiteProfile {
    pub source: ProductSource,
    /// Matched with `contains` against the lowercased hostname.
    pub host_pattern: &'static str,
    pub extract: fn(&Html) -> PartialExtraction,
}

/// Checked in order; the first matching pattern wins.
pub static PROFILES: &[SiteProfile] = &[
    SiteProfile {
        source: ProductSource::Amazon,
        host_pattern: "amazon",
        extract: amazon::extract,
    },
    SiteProfile {
        source: ProductSource::Shopify,
        host_pattern: "myshopify.com",
        extract: shopify::extract,
    },
];

/// Classifies `url` by hostname. Unknown hosts and unparsable URLs are
/// [`ProductSource::Generic`].
#[must_use]
pub fn detect_source(url: &str) -> ProductSource {
    let Some(host) = Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(str::to_ascii_lowercase))
    else {
        return ProductSource::Generic;
    };

    PROFILES
        .iter()
        .find(|profile| host.contains(profile.host_pattern))
        .map_or(ProductSource::Generic, |profile| profile.source)
}

/// The DOM extractor registered for `source`, if it has one.
#[must_use]
pub fn site_extractor(source: ProductSource) -> Option<fn(&Html) -> PartialExtraction> {
    PROFILES
        .iter()
        .find(|profile| profile.source == source)
        .map(|profile| profile.extract)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_amazon_across_regional_domains() {
        assert_eq!(
            detect_source("https://www.amazon.com/dp/B0C1234567"),
            ProductSource::Amazon
        );
        assert_eq!(
            detect_source("https://www.amazon.co.uk/gp/product/B0C1234567"),
            ProductSource::Amazon
        );
        assert_eq!(
            detect_source("https://SMILE.AMAZON.DE/dp/x"),
            ProductSource::Amazon
        );
    }

    #[test]
    fn detects_shopify_storefront_domain() {
        assert_eq!(
            detect_source("https://cann-drinks.myshopify.com/products/tonic"),
            ProductSource::Shopify
        );
    }

    #[test]
    fn unknown_hosts_are_generic() {
        assert_eq!(
            detect_source("https://www.bestbuy.com/site/widget"),
            ProductSource::Generic
        );
    }

    #[test]
    fn path_mentions_do_not_count() {
        assert_eq!(
            detect_source("https://example.com/amazon/deal"),
            ProductSource::Generic
        );
    }

    #[test]
    fn unparsable_url_is_generic() {
        assert_eq!(detect_source("not a url"), ProductSource::Generic);
    }

    #[test]
    fn every_site_specific_source_has_an_extractor() {
        assert!(site_extractor(ProductSource::Amazon).is_some());
        assert!(site_extractor(ProductSource::Shopify).is_some());
        assert!(site_extractor(ProductSource::Generic).is_none());
    }
}
