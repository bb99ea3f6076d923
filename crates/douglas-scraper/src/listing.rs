//! Link extraction from rendered category listing pages.
//!
//! Parsing is synchronous: [`scraper::Html`] is not `Send`, so callers parse a
//! fetched body to owned strings before the next `.await`.

use douglas_core::config::{DEFAULT_PAGINATION_SELECTOR, DEFAULT_PRODUCT_LINK_SELECTOR};
use scraper::{Html, Selector};

use crate::error::ScraperError;

/// Compiled CSS selectors used to read a listing page.
#[derive(Debug, Clone)]
pub struct ListingSelectors {
    product_link: Selector,
    pagination: Selector,
}

impl ListingSelectors {
    /// Compiles both selectors.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::InvalidSelector`] naming the first selector that
    /// does not parse.
    pub fn parse(product_link: &str, pagination: &str) -> Result<Self, ScraperError> {
        Ok(Self {
            product_link: compile(product_link)?,
            pagination: compile(pagination)?,
        })
    }
}

impl Default for ListingSelectors {
    fn default() -> Self {
        Self::parse(DEFAULT_PRODUCT_LINK_SELECTOR, DEFAULT_PAGINATION_SELECTOR)
            .expect("default listing selectors are valid")
    }
}

fn compile(selector: &str) -> Result<Selector, ScraperError> {
    Selector::parse(selector).map_err(|e| ScraperError::InvalidSelector {
        selector: selector.to_owned(),
        reason: format!("{e:?}"),
    })
}

/// Links found on one listing page, in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListingPage {
    pub product_links: Vec<String>,
    pub pagination_paths: Vec<String>,
}

impl ListingPage {
    /// Parses `html` and collects the `href` of every anchor matching each
    /// selector. Anchors without an `href` (or with a blank one) are ignored.
    #[must_use]
    pub fn parse(html: &str, selectors: &ListingSelectors) -> Self {
        let document = Html::parse_document(html);
        Self {
            product_links: hrefs(&document, &selectors.product_link),
            pagination_paths: hrefs(&document, &selectors.pagination),
        }
    }
}

fn hrefs(document: &Html, selector: &Selector) -> Vec<String> {
    document
        .select(selector)
        .filter_map(|anchor| anchor.value().attr("href"))
        .map(str::trim)
        .filter(|href| !href.is_empty())
        .map(str::to_owned)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const CATEGORY_PAGE: &str = r#"
        <html><body>
          <div class="product-grid">
            <a class="link link--no-decoration product-tile__main-link" href="/de/p/5010123456">Maske A</a>
            <a class="link link--no-decoration product-tile__main-link" href="/de/p/5010654321">Maske B</a>
            <a class="link link--no-decoration product-tile__main-link">kein Link</a>
            <a class="link product-tile__secondary" href="/de/p/ignored">Wunschliste</a>
          </div>
          <nav>
            <a class="link link--no-decoration pagination-title__option-link active" href="/de/c/gesichtsmasken/120308?page=2">2</a>
            <a class="link link--no-decoration pagination-title__option-link" href="/de/c/gesichtsmasken/120308?page=3">3</a>
          </nav>
        </body></html>
    "#;

    #[test]
    fn extracts_product_and_pagination_links() {
        let page = ListingPage::parse(CATEGORY_PAGE, &ListingSelectors::default());
        assert_eq!(page.product_links, vec!["/de/p/5010123456", "/de/p/5010654321"]);
        assert_eq!(
            page.pagination_paths,
            vec!["/de/c/gesichtsmasken/120308?page=2"]
        );
    }

    #[test]
    fn page_without_matches_is_empty() {
        let page = ListingPage::parse(
            "<html><body><p>Keine Produkte</p></body></html>",
            &ListingSelectors::default(),
        );
        assert_eq!(page, ListingPage::default());
    }

    #[test]
    fn custom_selectors_are_applied() {
        let selectors = ListingSelectors::parse("a.tile", "nav a").unwrap();
        let html = r#"<a class="tile" href="/de/p/1"></a><nav><a href="?page=2"></a><a href=" "></a></nav>"#;
        let page = ListingPage::parse(html, &selectors);
        assert_eq!(page.product_links, vec!["/de/p/1"]);
        assert_eq!(page.pagination_paths, vec!["?page=2"]);
    }

    #[test]
    fn invalid_selector_is_reported() {
        let err = ListingSelectors::parse("a[", DEFAULT_PAGINATION_SELECTOR).unwrap_err();
        assert!(
            matches!(err, ScraperError::InvalidSelector { ref selector, .. } if selector == "a["),
            "expected InvalidSelector, got: {err:?}"
        );
    }
}
