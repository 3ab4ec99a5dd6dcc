//! Open Graph fallback: the lowest-priority source for every field it covers.

use std::sync::LazyLock;

use dealscrape_core::PartialExtraction;
use scraper::{Html, Selector};

use super::{meta_content, selector};
use crate::price::parse_price;

static OG_TITLE_SEL: LazyLock<Selector> =
    LazyLock::new(|| selector(r#"meta[property="og:title"]"#));
static OG_IMAGE_SEL: LazyLock<Selector> =
    LazyLock::new(|| selector(r#"meta[property="og:image"]"#));
static OG_DESCRIPTION_SEL: LazyLock<Selector> =
    LazyLock::new(|| selector(r#"meta[property="og:description"]"#));
static PRODUCT_PRICE_SEL: LazyLock<Selector> =
    LazyLock::new(|| selector(r#"meta[property="product:price:amount"]"#));

#[must_use]
pub fn extract(doc: &Html) -> PartialExtraction {
    PartialExtraction {
        title: meta_content(doc, &OG_TITLE_SEL),
        image_url: meta_content(doc, &OG_IMAGE_SEL),
        price: meta_content(doc, &PRODUCT_PRICE_SEL).and_then(|text| parse_price(&text)),
        original_price: None,
        brand: None,
        description: meta_content(doc, &OG_DESCRIPTION_SEL),
    }
}
