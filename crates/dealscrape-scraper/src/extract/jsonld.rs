//! schema.org `Product` extraction from `<script type="application/ld+json">`.
//!
//! Every block is handled on its own: a block that fails to parse, or parses
//! but holds no `Product`, contributes nothing and the scan moves on. When
//! several blocks carry a product, the last one wins.

use std::sync::LazyLock;

use dealscrape_core::PartialExtraction;
use scraper::{Html, Selector};
use serde_json::Value;
use thiserror::Error;

use super::{non_empty, selector};
use crate::price::parse_price;

static LD_JSON_SEL: LazyLock<Selector> =
    LazyLock::new(|| selector(r#"script[type="application/ld+json"]"#));

#[derive(Debug, Error)]
enum BlockError {
    #[error("malformed JSON-LD block: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("no Product entry in JSON-LD block")]
    NoProduct,
}

/// Reads the embedded structured-data `Product`, if any.
///
/// Never fails: without a usable block the result is all-absent.
#[must_use]
pub fn extract(doc: &Html) -> PartialExtraction {
    doc.select(&LD_JSON_SEL)
        .map(|script| script.text().collect::<String>())
        .map(|raw| extract_block(&raw))
        .fold(PartialExtraction::default(), |acc, block| match block {
            Ok(partial) => partial,
            Err(err @ BlockError::Malformed(_)) => {
                tracing::debug!(error = %err, "skipping JSON-LD block");
                acc
            }
            Err(BlockError::NoProduct) => acc,
        })
}

fn extract_block(raw: &str) -> Result<PartialExtraction, BlockError> {
    let value: Value = serde_json::from_str(raw.trim())?;
    let product = find_product(&value).ok_or(BlockError::NoProduct)?;
    Ok(product_to_partial(product))
}

/// Finds the first `Product` among the top-level object, the elements of a
/// top-level array, and the entries of any `@graph` container.
fn find_product(value: &Value) -> Option<&Value> {
    let top_level: Vec<&Value> = match value {
        Value::Array(items) => items.iter().collect(),
        other => vec![other],
    };

    top_level
        .iter()
        .copied()
        .find(|item| is_product(item))
        .or_else(|| {
            top_level
                .iter()
                .copied()
                .filter_map(|item| item.get("@graph").and_then(Value::as_array))
                .flatten()
                .find(|item| is_product(item))
        })
}

/// `@type` may be a plain string or an array of strings.
fn is_product(item: &Value) -> bool {
    match item.get("@type") {
        Some(Value::String(s)) => s.eq_ignore_ascii_case("Product"),
        Some(Value::Array(types)) => types
            .iter()
            .filter_map(Value::as_str)
            .any(|s| s.eq_ignore_ascii_case("Product")),
        _ => false,
    }
}

fn product_to_partial(product: &Value) -> PartialExtraction {
    PartialExtraction {
        title: string_field(product, "name"),
        image_url: product.get("image").and_then(image_url),
        price: product.get("offers").and_then(offer_price),
        original_price: None,
        brand: product.get("brand").and_then(brand_name),
        description: string_field(product, "description"),
    }
}

fn string_field(item: &Value, key: &str) -> Option<String> {
    item.get(key).and_then(Value::as_str).and_then(non_empty)
}

/// `image` may be a URL string, an `ImageObject`, or an array of either.
fn image_url(image: &Value) -> Option<String> {
    match image {
        Value::String(url) => non_empty(url),
        Value::Array(images) => images.first().and_then(image_url),
        Value::Object(_) => string_field(image, "url"),
        _ => None,
    }
}

/// `brand` is usually a `Brand` object; some sites put the bare name.
fn brand_name(brand: &Value) -> Option<String> {
    match brand {
        Value::String(name) => non_empty(name),
        Value::Object(_) => string_field(brand, "name"),
        _ => None,
    }
}

/// Price of the first offer. `AggregateOffer` carries `lowPrice` instead of
/// `price`.
fn offer_price(offers: &Value) -> Option<f64> {
    let offer = match offers {
        Value::Array(list) => list.first()?,
        other => other,
    };
    let amount = offer.get("price").or_else(|| offer.get("lowPrice"))?;
    match amount {
        Value::Number(n) => parse_price(&n.to_string()),
        Value::String(s) => parse_price(s),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(blocks: &[&str]) -> Html {
        let scripts: String = blocks
            .iter()
            .map(|b| format!(r#"<script type="application/ld+json">{b}</script>"#))
            .collect();
        Html::parse_document(&format!("<html><head>{scripts}</head><body></body></html>"))
    }

    #[test]
    fn reads_single_product_object() {
        let doc = page(&[r#"{
            "@context": "https://schema.org",
            "@type": "Product",
            "name": "Cool Gadget",
            "description": "Does cool things.",
            "image": "https://cdn.example.com/gadget.jpg",
            "brand": {"@type": "Brand", "name": "Gizmo Co"},
            "offers": {"@type": "Offer", "price": 49.5, "priceCurrency": "USD"}
        }"#]);
        let partial = extract(&doc);
        assert_eq!(partial.title.as_deref(), Some("Cool Gadget"));
        assert_eq!(partial.description.as_deref(), Some("Does cool things."));
        assert_eq!(
            partial.image_url.as_deref(),
            Some("https://cdn.example.com/gadget.jpg")
        );
        assert_eq!(partial.brand.as_deref(), Some("Gizmo Co"));
        assert_eq!(partial.price, Some(49.5));
        assert_eq!(partial.original_price, None);
    }

    #[test]
    fn selects_the_product_entry_from_an_array() {
        let doc = page(&[r#"[
            {"@type": "BreadcrumbList", "name": "Breadcrumbs"},
            {"@type": "Product", "name": "The Product"},
            {"@type": "Organization", "name": "Shop Inc"}
        ]"#]);
        assert_eq!(extract(&doc).title.as_deref(), Some("The Product"));
    }

    #[test]
    fn no_product_entry_yields_all_absent() {
        let doc = page(&[r#"[
            {"@type": "BreadcrumbList", "name": "Breadcrumbs"},
            {"@type": "Organization", "name": "Shop Inc"}
        ]"#]);
        assert!(extract(&doc).is_empty());
    }

    #[test]
    fn malformed_block_is_skipped_and_scan_continues() {
        let doc = page(&[
            r#"{"@type": "Product", "name": "#,
            r#"{"@type": "Product", "name": "Survivor", "offers": {"price": "12.00"}}"#,
        ]);
        let partial = extract(&doc);
        assert_eq!(partial.title.as_deref(), Some("Survivor"));
        assert_eq!(partial.price, Some(12.0));
    }

    #[test]
    fn only_malformed_blocks_yield_all_absent() {
        let doc = page(&["not json at all", "{"]);
        assert!(extract(&doc).is_empty());
    }

    #[test]
    fn no_blocks_yield_all_absent() {
        let doc = Html::parse_document("<html><head><title>x</title></head></html>");
        assert!(extract(&doc).is_empty());
    }

    #[test]
    fn product_block_is_not_erased_by_later_non_product_block() {
        let doc = page(&[
            r#"{"@type": "Product", "name": "Kept"}"#,
            r#"{"@type": "WebSite", "name": "Shop"}"#,
        ]);
        assert_eq!(extract(&doc).title.as_deref(), Some("Kept"));
    }

    #[test]
    fn last_product_block_wins() {
        let doc = page(&[
            r#"{"@type": "Product", "name": "First", "brand": "Early"}"#,
            r#"{"@type": "Product", "name": "Second"}"#,
        ]);
        let partial = extract(&doc);
        assert_eq!(partial.title.as_deref(), Some("Second"));
        assert_eq!(partial.brand, None);
    }

    #[test]
    fn finds_product_inside_graph() {
        let doc = page(&[r#"{
            "@context": "https://schema.org",
            "@graph": [
                {"@type": "WebPage", "name": "Page"},
                {"@type": ["Product", "IndividualProduct"], "name": "Graph Item"}
            ]
        }"#]);
        assert_eq!(extract(&doc).title.as_deref(), Some("Graph Item"));
    }

    #[test]
    fn image_variants() {
        assert_eq!(
            image_url(&serde_json::json!(["https://a.example/1.jpg", "https://a.example/2.jpg"])),
            Some("https://a.example/1.jpg".to_string())
        );
        assert_eq!(
            image_url(&serde_json::json!({"@type": "ImageObject", "url": "https://a.example/o.jpg"})),
            Some("https://a.example/o.jpg".to_string())
        );
        assert_eq!(image_url(&serde_json::json!([])), None);
        assert_eq!(image_url(&serde_json::json!("")), None);
    }

    #[test]
    fn offer_price_variants() {
        assert_eq!(
            offer_price(&serde_json::json!([{"price": "1,299.00"}, {"price": "5"}])),
            Some(1299.0)
        );
        assert_eq!(
            offer_price(&serde_json::json!({"@type": "AggregateOffer", "lowPrice": 7.25})),
            Some(7.25)
        );
        assert_eq!(offer_price(&serde_json::json!({"price": null})), None);
        assert_eq!(offer_price(&serde_json::json!([])), None);
    }

    #[test]
    fn brand_as_plain_string() {
        assert_eq!(
            brand_name(&serde_json::json!("Acme")),
            Some("Acme".to_string())
        );
    }

    #[test]
    fn empty_strings_are_absent() {
        let doc = page(&[r#"{"@type": "Product", "name": "  ", "description": ""}"#]);
        let partial = extract(&doc);
        assert_eq!(partial.title, None);
        assert_eq!(partial.description, None);
    }
}
