//! HTML extractors. Each one is a pure function over an already-parsed
//! document and returns a [`PartialExtraction`](dealscrape_core::PartialExtraction).

pub mod amazon;
pub mod jsonld;
pub mod opengraph;
pub mod shopify;

use std::sync::LazyLock;

use dealscrape_core::MAX_DESCRIPTION_CHARS;
use scraper::{Html, Selector};

static TITLE_SEL: LazyLock<Selector> = LazyLock::new(|| selector("title"));
static META_DESCRIPTION_SEL: LazyLock<Selector> =
    LazyLock::new(|| selector(r#"meta[name="description"]"#));

/// Compiles a selector literal. Only called with constants from this crate.
pub(crate) fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("valid CSS selector")
}

/// Text of every match concatenated, whitespace-collapsed.
pub(crate) fn select_text(doc: &Html, sel: &Selector) -> Option<String> {
    let raw: String = doc.select(sel).flat_map(|el| el.text()).collect();
    non_empty(&collapse_whitespace(&raw))
}

/// Text of the first match only, whitespace-collapsed.
pub(crate) fn first_text(doc: &Html, sel: &Selector) -> Option<String> {
    let el = doc.select(sel).next()?;
    let raw: String = el.text().collect();
    non_empty(&collapse_whitespace(&raw))
}

/// Attribute of the first match, trimmed.
pub(crate) fn first_attr(doc: &Html, sel: &Selector, attr: &str) -> Option<String> {
    doc.select(sel)
        .next()
        .and_then(|el| el.value().attr(attr))
        .and_then(non_empty)
}

/// `content` of the first matching `<meta>` tag.
pub(crate) fn meta_content(doc: &Html, sel: &Selector) -> Option<String> {
    first_attr(doc, sel, "content")
}

/// `<meta name="description">`, shared by the site-specific extractors.
pub(crate) fn meta_description(doc: &Html) -> Option<String> {
    meta_content(doc, &META_DESCRIPTION_SEL)
}

/// Trimmed `<title>` text, used as the last resort for the product title.
#[must_use]
pub fn page_title(doc: &Html) -> Option<String> {
    first_text(doc, &TITLE_SEL)
}

pub(crate) fn non_empty(s: &str) -> Option<String> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_owned())
    }
}

pub(crate) fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Cuts `s` to [`MAX_DESCRIPTION_CHARS`] characters.
pub(crate) fn truncate_description(s: &str) -> String {
    s.chars().take(MAX_DESCRIPTION_CHARS).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_title_is_trimmed() {
        let doc = Html::parse_document(
            "<html><head><title>\n  Cool Gadget | Shop \n</title></head></html>",
        );
        assert_eq!(page_title(&doc).as_deref(), Some("Cool Gadget | Shop"));
    }

    #[test]
    fn page_title_empty_is_none() {
        let doc = Html::parse_document("<html><head><title>   </title></head></html>");
        assert_eq!(page_title(&doc), None);
    }

    #[test]
    fn select_text_concatenates_matches() {
        let doc =
            Html::parse_document("<h1 id=\"title\"><span>Big</span> <span>Box</span></h1>");
        let sel = selector("h1#title span");
        assert_eq!(select_text(&doc, &sel).as_deref(), Some("BigBox"));
        assert_eq!(first_text(&doc, &sel).as_deref(), Some("Big"));
    }

    #[test]
    fn first_attr_skips_blank_values() {
        let doc = Html::parse_document(r#"<img id="landingImage" src="  ">"#);
        let sel = selector("#landingImage");
        assert_eq!(first_attr(&doc, &sel, "src"), None);
    }

    #[test]
    fn truncate_description_counts_chars_not_bytes() {
        let long = "é".repeat(MAX_DESCRIPTION_CHARS + 20);
        let cut = truncate_description(&long);
        assert_eq!(cut.chars().count(), MAX_DESCRIPTION_CHARS);
    }

    #[test]
    fn collapse_whitespace_joins_lines() {
        assert_eq!(collapse_whitespace("  a \n\t b  c "), "a b c");
    }
}
