//! Shopify storefront product pages.
//!
//! Covers Dawn (the default Online Store 2.0 theme) and the older
//! `product-single` themes. Shopify renders `og:price:amount` on every product
//! page regardless of theme, so it is preferred over the styled price nodes.

use std::sync::LazyLock;

use dealscrape_core::PartialExtraction;
use scraper::{Html, Selector};

use super::{
    first_text, meta_content, meta_description, select_text, selector, truncate_description,
};
use crate::price::parse_price;

static TITLE_SEL: LazyLock<Selector> = LazyLock::new(|| {
    selector(".product__title h1, h1.product__title, h1.product-single__title")
});
static OG_IMAGE_SEL: LazyLock<Selector> =
    LazyLock::new(|| selector(r#"meta[property="og:image"]"#));
static OG_PRICE_SEL: LazyLock<Selector> = LazyLock::new(|| {
    selector(r#"meta[property="og:price:amount"], meta[property="product:price:amount"]"#)
});
static SALE_PRICE_SEL: LazyLock<Selector> = LazyLock::new(|| selector(".price-item--sale"));
static REGULAR_PRICE_SEL: LazyLock<Selector> =
    LazyLock::new(|| selector(".price-item--regular"));
static COMPARE_AT_SEL: LazyLock<Selector> = LazyLock::new(|| {
    selector(
        ".price--on-sale .price__sale s.price-item--regular, .compare-at-price, .product-single__price--compare",
    )
});
static VENDOR_SEL: LazyLock<Selector> =
    LazyLock::new(|| selector(".product__vendor, .product-single__vendor"));
static SITE_NAME_SEL: LazyLock<Selector> =
    LazyLock::new(|| selector(r#"meta[property="og:site_name"]"#));
static DESCRIPTION_SEL: LazyLock<Selector> =
    LazyLock::new(|| selector(".product__description, .product-single__description"));

/// Extracts a Shopify product page.
#[must_use]
pub fn extract(doc: &Html) -> PartialExtraction {
    let title = first_text(doc, &TITLE_SEL);
    let image_url = meta_content(doc, &OG_IMAGE_SEL);

    let price = meta_content(doc, &OG_PRICE_SEL)
        .or_else(|| first_text(doc, &SALE_PRICE_SEL))
        .or_else(|| first_text(doc, &REGULAR_PRICE_SEL))
        .and_then(|text| parse_price(&text));

    let original_price = first_text(doc, &COMPARE_AT_SEL).and_then(|text| parse_price(&text));

    let brand = first_text(doc, &VENDOR_SEL).or_else(|| meta_content(doc, &SITE_NAME_SEL));

    let description = select_text(doc, &DESCRIPTION_SEL)
        .map(|text| truncate_description(&text))
        .or_else(|| meta_description(doc));

    PartialExtraction {
        title,
        image_url,
        price,
        original_price,
        brand,
        description,
    }
}
