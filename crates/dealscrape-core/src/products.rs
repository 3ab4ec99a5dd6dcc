use serde::{Deserialize, Serialize};

/// Upper bound on `description` length, in characters.
pub const MAX_DESCRIPTION_CHARS: usize = 500;

/// Extraction profile selected from the target hostname.
///
/// `Amazon` and `Shopify` have hand-tuned DOM extractors; every other host is
/// `Generic` and relies on structured data and Open Graph tags alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProductSource {
    Amazon,
    Shopify,
    Generic,
}

impl ProductSource {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ProductSource::Amazon => "amazon",
            ProductSource::Shopify => "shopify",
            ProductSource::Generic => "generic",
        }
    }
}

impl std::fmt::Display for ProductSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ProductSource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "amazon" => Ok(ProductSource::Amazon),
            "shopify" => Ok(ProductSource::Shopify),
            "generic" => Ok(ProductSource::Generic),
            other => Err(format!("unknown product source \"{other}\"")),
        }
    }
}

/// Fields recovered by one extractor. Any of them may be absent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PartialExtraction {
    pub title: Option<String>,
    pub image_url: Option<String>,
    pub price: Option<f64>,
    pub original_price: Option<f64>,
    pub brand: Option<String>,
    pub description: Option<String>,
}

impl PartialExtraction {
    /// `true` when no field was recovered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// The normalized product record handed back to callers.
///
/// `success` is `true` exactly when `title` holds a non-empty string; every
/// other field is best-effort.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrapedProduct {
    pub title: Option<String>,
    pub image_url: Option<String>,
    pub price: Option<f64>,
    pub original_price: Option<f64>,
    pub brand: Option<String>,
    pub description: Option<String>,
    pub source: ProductSource,
    pub success: bool,
}

impl ScrapedProduct {
    /// A failed record with every field absent.
    #[must_use]
    pub fn failed(source: ProductSource) -> Self {
        Self {
            title: None,
            image_url: None,
            price: None,
            original_price: None,
            brand: None,
            description: None,
            source,
            success: false,
        }
    }
}
