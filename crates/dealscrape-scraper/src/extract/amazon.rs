//! Amazon product-detail pages.
//!
//! Amazon ships several generations of the detail-page template at once, so
//! most fields list a current selector followed by older fallbacks. Text-level
//! fallbacks apply before price parsing: an empty first match moves on to
//! the next selector.

use std::sync::LazyLock;

use dealscrape_core::PartialExtraction;
use scraper::{Html, Selector};

use super::{
    first_attr, first_text, meta_content, meta_description, select_text, selector,
    truncate_description,
};
use crate::price::parse_price;

static TITLE_SEL: LazyLock<Selector> = LazyLock::new(|| selector("#productTitle"));
static TITLE_LEGACY_SEL: LazyLock<Selector> = LazyLock::new(|| selector("h1#title span"));

static LANDING_IMAGE_SEL: LazyLock<Selector> = LazyLock::new(|| selector("#landingImage"));
static BOOK_IMAGE_SEL: LazyLock<Selector> = LazyLock::new(|| selector("#imgBlkFront"));
static OG_IMAGE_SEL: LazyLock<Selector> =
    LazyLock::new(|| selector(r#"meta[property="og:image"]"#));

static PRICE_OFFSCREEN_SEL: LazyLock<Selector> =
    LazyLock::new(|| selector(".a-price .a-offscreen"));
static PRICE_OUR_PRICE_SEL: LazyLock<Selector> =
    LazyLock::new(|| selector("#priceblock_ourprice"));
static PRICE_WHOLE_SEL: LazyLock<Selector> = LazyLock::new(|| selector(".a-price-whole"));

static LIST_PRICE_SEL: LazyLock<Selector> =
    LazyLock::new(|| selector(".a-text-price .a-offscreen"));
static BASIS_PRICE_SEL: LazyLock<Selector> =
    LazyLock::new(|| selector(".basisPrice .a-offscreen"));

static BYLINE_SEL: LazyLock<Selector> = LazyLock::new(|| selector("#bylineInfo"));
static FEATURE_BULLETS_SEL: LazyLock<Selector> =
    LazyLock::new(|| selector("#feature-bullets ul"));

/// Extracts an Amazon product-detail page.
#[must_use]
pub fn extract(doc: &Html) -> PartialExtraction {
    let title = select_text(doc, &TITLE_SEL).or_else(|| select_text(doc, &TITLE_LEGACY_SEL));

    let image_url = first_attr(doc, &LANDING_IMAGE_SEL, "src")
        .or_else(|| first_attr(doc, &BOOK_IMAGE_SEL, "src"))
        .or_else(|| meta_content(doc, &OG_IMAGE_SEL));

    let price = first_text(doc, &PRICE_OFFSCREEN_SEL)
        .or_else(|| select_text(doc, &PRICE_OUR_PRICE_SEL))
        .or_else(|| first_text(doc, &PRICE_WHOLE_SEL))
        .and_then(|text| parse_price(&text));

    let original_price = first_text(doc, &LIST_PRICE_SEL)
        .or_else(|| first_text(doc, &BASIS_PRICE_SEL))
        .and_then(|text| parse_price(&text));

    let brand = select_text(doc, &BYLINE_SEL).and_then(|byline| clean_byline(&byline));

    let description = select_text(doc, &FEATURE_BULLETS_SEL)
        .map(|bullets| truncate_description(&bullets))
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

/// Reduces a byline such as `"Visit the Anker Store"` or `"Brand: Anker"` to
/// the brand name.
fn clean_byline(byline: &str) -> Option<String> {
    let brand = if let Some(rest) = byline.strip_prefix("Visit the ") {
        rest.strip_suffix(" Store").unwrap_or(rest)
    } else if let Some(rest) = byline.strip_prefix("Brand: ") {
        rest
    } else {
        byline
    };
    super::non_empty(brand)
}
