//! Product number extraction from listing links.
//!
//! Product tiles link to `/<locale>/<kind>/<number>`, e.g. `/de/p/5010123456`.
//! Everything after the second path segment is the number the detail
//! endpoint expects.

use std::sync::LazyLock;

use regex::Regex;

static PRODUCT_LINK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\s*/[a-z]+/[a-z]+/(.*)").expect("valid regex"));

/// Extracts the product number from a product link.
///
/// Returns `None` when the link does not have the expected shape or the
/// trailing segment is blank.
#[must_use]
pub fn extract_product_number(link: &str) -> Option<String> {
    let number = PRODUCT_LINK_RE
        .captures(link)
        .and_then(|cap| cap.get(1))
        .map(|m| m.as_str().trim())?;

    if number.is_empty() {
        return None;
    }
    Some(number.to_owned())
}

/// Resolves every link to a product number, skipping links that do not
/// resolve. Order is preserved.
#[must_use]
pub fn resolve_product_numbers(links: &[String]) -> Vec<String> {
    links
        .iter()
        .filter_map(|link| {
            let number = extract_product_number(link);
            if number.is_none() {
                tracing::debug!(link = %link, "could not extract product number from link");
            }
            number
        })
        .collect()
}
