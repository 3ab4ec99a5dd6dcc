use std::sync::LazyLock;

use regex::Regex;

static NUMERAL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+\.?\d*").expect("valid numeral regex"));

/// Parses the first decimal numeral out of free-form price text.
///
/// Thousands separators (`,`) are removed first, so `"$1,249.00"` yields
/// `1249.0`. Returns `None` when the text holds no digits or the numeral does
/// not fit a finite `f64`. Never negative: a leading `-` is not part of the
/// match.
#[must_use]
pub fn parse_price(text: &str) -> Option<f64> {
    let cleaned = text.replace(',', "");
    let numeral = NUMERAL_RE.find(&cleaned)?;
    numeral
        .as_str()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
}
