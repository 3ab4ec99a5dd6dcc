//! Field-wise priority merge of extractor output into one [`ScrapedProduct`].
//!
//! Priority per field, highest first:
//!
//! | field            | site-specific | JSON-LD | Open Graph | `<title>` |
//! |------------------|:-------------:|:-------:|:----------:|:---------:|
//! | `title`          | 1             | 2       | 3          | 4         |
//! | `image_url`      | 1             | 2       | 3          |           |
//! | `price`          | 1             | 2       | 3          |           |
//! | `original_price` | 1             |         |            |           |
//! | `brand`          | 1             | 2       |            |           |
//! | `description`    | 1             | 2       | 3          |           |

use dealscrape_core::{PartialExtraction, ProductSource, ScrapedProduct};

use crate::extract::{non_empty, truncate_description};

/// Combines partial records into the final product.
///
/// Blank strings and non-finite or negative prices are treated as absent, so
/// a lower-priority source can still fill the field. `success` is `true`
/// exactly when a title survives.
#[must_use]
pub fn merge(
    site: Option<&PartialExtraction>,
    structured: &PartialExtraction,
    open_graph: &PartialExtraction,
    page_title: Option<&str>,
    source: ProductSource,
) -> ScrapedProduct {
    let title = first_text([
        site.and_then(|p| p.title.as_deref()),
        structured.title.as_deref(),
        open_graph.title.as_deref(),
        page_title,
    ]);
    let image_url = first_text([
        site.and_then(|p| p.image_url.as_deref()),
        structured.image_url.as_deref(),
        open_graph.image_url.as_deref(),
    ]);
    let price = first_price([site.and_then(|p| p.price), structured.price, open_graph.price]);
    let original_price = first_price([site.and_then(|p| p.original_price)]);
    let brand = first_text([
        site.and_then(|p| p.brand.as_deref()),
        structured.brand.as_deref(),
    ]);
    let description = first_text([
        site.and_then(|p| p.description.as_deref()),
        structured.description.as_deref(),
        open_graph.description.as_deref(),
    ])
    .map(|text| truncate_description(&text));

    let success = title.is_some();
    ScrapedProduct {
        title,
        image_url,
        price,
        original_price,
        brand,
        description,
        source,
        success,
    }
}

fn first_text<const N: usize>(candidates: [Option<&str>; N]) -> Option<String> {
    candidates.into_iter().flatten().find_map(non_empty)
}

fn first_price<const N: usize>(candidates: [Option<f64>; N]) -> Option<f64> {
    candidates
        .into_iter()
        .flatten()
        .find(|p| p.is_finite() && *p >= 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use dealscrape_core::MAX_DESCRIPTION_CHARS;

    fn partial(title: &str) -> PartialExtraction {
        PartialExtraction {
            title: Some(title.to_owned()),
            ..PartialExtraction::default()
        }
    }

    #[test]
    fn site_specific_title_beats_every_other_source() {
        let site = partial("Widget X");
        let product = merge(
            Some(&site),
            &partial("LD title"),
            &partial("OG title"),
            Some("Amazon.com: Widget X"),
            ProductSource::Amazon,
        );
        assert_eq!(product.title.as_deref(), Some("Widget X"));
        assert!(product.success);
        assert_eq!(product.source, ProductSource::Amazon);
    }

    #[test]
    fn fields_resolve_independently() {
        let site = PartialExtraction {
            title: Some("Widget X".to_owned()),
            price: Some(19.99),
            original_price: Some(29.99),
            ..PartialExtraction::default()
        };
        let structured = PartialExtraction {
            price: Some(21.0),
            brand: Some("Acme".to_owned()),
            image_url: Some("https://cdn.example.com/ld.jpg".to_owned()),
            ..PartialExtraction::default()
        };
        let open_graph = PartialExtraction {
            image_url: Some("https://cdn.example.com/og.jpg".to_owned()),
            description: Some("From OG".to_owned()),
            ..PartialExtraction::default()
        };
        let product = merge(
            Some(&site),
            &structured,
            &open_graph,
            None,
            ProductSource::Amazon,
        );
        assert_eq!(product.price, Some(19.99));
        assert_eq!(product.original_price, Some(29.99));
        assert_eq!(product.brand.as_deref(), Some("Acme"));
        assert_eq!(
            product.image_url.as_deref(),
            Some("https://cdn.example.com/ld.jpg")
        );
        assert_eq!(product.description.as_deref(), Some("From OG"));
    }

    #[test]
    fn open_graph_title_fills_generic_page() {
        let og = PartialExtraction {
            title: Some("Cool Gadget".to_owned()),
            image_url: Some("https://cdn.example.com/cool.png".to_owned()),
            ..PartialExtraction::default()
        };
        let product = merge(
            None,
            &PartialExtraction::default(),
            &og,
            None,
            ProductSource::Generic,
        );
        assert_eq!(product.title.as_deref(), Some("Cool Gadget"));
        assert_eq!(
            product.image_url.as_deref(),
            Some("https://cdn.example.com/cool.png")
        );
        assert!(product.success);
    }

    #[test]
    fn page_title_is_last_resort() {
        let product = merge(
            None,
            &PartialExtraction::default(),
            &PartialExtraction::default(),
            Some("Fallback"),
            ProductSource::Generic,
        );
        assert_eq!(product.title.as_deref(), Some("Fallback"));
        assert!(product.success);
    }

    #[test]
    fn no_title_anywhere_is_unsuccessful_but_keeps_other_fields() {
        let og = PartialExtraction {
            image_url: Some("https://cdn.example.com/x.png".to_owned()),
            ..PartialExtraction::default()
        };
        let product = merge(
            None,
            &PartialExtraction::default(),
            &og,
            None,
            ProductSource::Generic,
        );
        assert!(!product.success);
        assert_eq!(product.title, None);
        assert_eq!(
            product.image_url.as_deref(),
            Some("https://cdn.example.com/x.png")
        );
    }

    #[test]
    fn blank_strings_fall_through_to_next_source() {
        let site = partial("   ");
        let product = merge(
            Some(&site),
            &partial(""),
            &partial("Real Title"),
            None,
            ProductSource::Shopify,
        );
        assert_eq!(product.title.as_deref(), Some("Real Title"));
    }

    #[test]
    fn blank_page_title_is_not_success() {
        let product = merge(
            None,
            &PartialExtraction::default(),
            &PartialExtraction::default(),
            Some("  "),
            ProductSource::Generic,
        );
        assert!(!product.success);
        assert_eq!(product.title, None);
    }

    #[test]
    fn original_price_comes_only_from_site_extractor() {
        let structured = PartialExtraction {
            original_price: Some(99.0),
            ..PartialExtraction::default()
        };
        let product = merge(
            None,
            &structured,
            &PartialExtraction::default(),
            None,
            ProductSource::Generic,
        );
        assert_eq!(product.original_price, None);
    }

    #[test]
    fn brand_ignores_open_graph() {
        let og = PartialExtraction {
            brand: Some("OG Brand".to_owned()),
            ..PartialExtraction::default()
        };
        let product = merge(
            None,
            &PartialExtraction::default(),
            &og,
            None,
            ProductSource::Generic,
        );
        assert_eq!(product.brand, None);
    }

    #[test]
    fn zero_price_is_a_real_price() {
        let site = PartialExtraction {
            price: Some(0.0),
            ..PartialExtraction::default()
        };
        let structured = PartialExtraction {
            price: Some(5.0),
            ..PartialExtraction::default()
        };
        let product = merge(
            Some(&site),
            &structured,
            &PartialExtraction::default(),
            None,
            ProductSource::Amazon,
        );
        assert_eq!(product.price, Some(0.0));
    }

    #[test]
    fn non_finite_price_falls_through() {
        let site = PartialExtraction {
            price: Some(f64::NAN),
            ..PartialExtraction::default()
        };
        let og = PartialExtraction {
            price: Some(12.5),
            ..PartialExtraction::default()
        };
        let product = merge(
            Some(&site),
            &PartialExtraction::default(),
            &og,
            None,
            ProductSource::Amazon,
        );
        assert_eq!(product.price, Some(12.5));
    }

    #[test]
    fn description_is_truncated() {
        let structured = PartialExtraction {
            description: Some("x".repeat(MAX_DESCRIPTION_CHARS * 2)),
            ..PartialExtraction::default()
        };
        let product = merge(
            None,
            &structured,
            &PartialExtraction::default(),
            None,
            ProductSource::Generic,
        );
        assert_eq!(
            product.description.map(|d| d.chars().count()),
            Some(MAX_DESCRIPTION_CHARS)
        );
    }

    #[test]
    fn merge_is_deterministic() {
        let site = partial("Widget X");
        let og = PartialExtraction {
            price: Some(3.5),
            ..PartialExtraction::default()
        };
        let a = merge(
            Some(&site),
            &PartialExtraction::default(),
            &og,
            Some("t"),
            ProductSource::Amazon,
        );
        let b = merge(
            Some(&site),
            &PartialExtraction::default(),
            &og,
            Some("t"),
            ProductSource::Amazon,
        );
        assert_eq!(a, b);
    }
}
