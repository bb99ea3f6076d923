//! Category traversal for `DouglasClient`: the category page plus one level
//! of pagination pages.

use std::collections::HashSet;

use reqwest::Url;

use crate::error::ScraperError;
use crate::listing::{ListingPage, ListingSelectors};

use super::{join_url, DouglasClient};

/// Insertion-ordered set of product links.
#[derive(Default)]
struct LinkSet {
    seen: HashSet<String>,
    links: Vec<String>,
}

impl LinkSet {
    fn extend(&mut self, links: Vec<String>) {
        for link in links {
            if self.seen.insert(link.clone()) {
                self.links.push(link);
            }
        }
    }
}

impl DouglasClient {
    /// Collects product links from a category page and every page its
    /// pagination links point to.
    ///
    /// Pagination pages are visited once each and are not searched for
    /// further pagination. A pagination page that fails to load or yields no
    /// products is logged and skipped. Duplicate links keep their first
    /// position.
    ///
    /// A category page that fails with a skippable error yields an empty
    /// list.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::InvalidUrl`] if `category_path` does not
    /// resolve against the base URL. Other non-skippable errors from
    /// [`Self::fetch_page_html`] are propagated.
    pub async fn collect_product_links(
        &self,
        category_path: &str,
        selectors: &ListingSelectors,
    ) -> Result<Vec<String>, ScraperError> {
        let category_url = self.page_url(category_path)?;

        let first_page = match self.fetch_listing(&category_url, selectors).await {
            Ok(page) => page,
            Err(e) if e.is_skippable() => {
                tracing::warn!(url = %category_url, error = %e, "category page fetch failed");
                return Ok(Vec::new());
            }
            Err(e) => return Err(e),
        };

        if first_page.product_links.is_empty() {
            tracing::warn!(url = %category_url, "unable to find products on category page");
        }

        let mut links = LinkSet::default();
        links.extend(first_page.product_links);

        let targets = pagination_targets(&category_url, &first_page.pagination_paths);
        tracing::info!(
            url = %category_url,
            products = links.links.len(),
            pagination_pages = targets.len(),
            "category page parsed"
        );

        for target in targets {
            match self.fetch_listing(&target, selectors).await {
                Ok(page) if page.product_links.is_empty() => {
                    tracing::warn!(url = %target, "unable to find products on pagination page");
                }
                Ok(page) => {
                    tracing::debug!(
                        url = %target,
                        products = page.product_links.len(),
                        "pagination page parsed"
                    );
                    links.extend(page.product_links);
                }
                Err(e) if e.is_skippable() => {
                    tracing::warn!(url = %target, error = %e, "pagination page fetch failed");
                }
                Err(e) => return Err(e),
            }
        }

        Ok(links.links)
    }

    async fn fetch_listing(
        &self,
        url: &Url,
        selectors: &ListingSelectors,
    ) -> Result<ListingPage, ScraperError> {
        let html = self.fetch_page_html(url).await?;
        Ok(ListingPage::parse(&html, selectors))
    }
}

/// Resolves pagination hrefs against the category URL, dropping duplicates,
/// the category page itself, and hrefs that do not resolve.
fn pagination_targets(category_url: &Url, hrefs: &[String]) -> Vec<Url> {
    let mut seen: HashSet<Url> = HashSet::new();
    seen.insert(category_url.clone());

    let mut targets = Vec::new();
    for href in hrefs {
        match join_url(category_url, href) {
            Ok(url) => {
                if seen.insert(url.clone()) {
                    targets.push(url);
                }
            }
            Err(e) => {
                tracing::debug!(href = %href, error = %e, "skipping unresolvable pagination link");
            }
        }
    }
    targets
}

#[cfg(test)]
mod tests {
    use super::*;

    fn category() -> Url {
        Url::parse("https://www.douglas.de/de/c/gesichtsmasken/120308").unwrap()
    }

    #[test]
    fn link_set_keeps_first_position() {
        let mut set = LinkSet::default();
        set.extend(vec!["/de/p/1".into(), "/de/p/2".into()]);
        set.extend(vec!["/de/p/2".into(), "/de/p/3".into(), "/de/p/1".into()]);
        assert_eq!(set.links, vec!["/de/p/1", "/de/p/2", "/de/p/3"]);
    }

    #[test]
    fn pagination_targets_resolve_relative_to_category() {
        let hrefs = vec![
            "?page=2".to_owned(),
            "/de/c/gesichtsmasken/120308?page=3".to_owned(),
        ];
        let targets: Vec<String> = pagination_targets(&category(), &hrefs)
            .into_iter()
            .map(String::from)
            .collect();
        assert_eq!(
            targets,
            vec![
                "https://www.douglas.de/de/c/gesichtsmasken/120308?page=2",
                "https://www.douglas.de/de/c/gesichtsmasken/120308?page=3",
            ]
        );
    }

    #[test]
    fn pagination_targets_drop_duplicates_and_self() {
        let hrefs = vec![
            "/de/c/gesichtsmasken/120308".to_owned(),
            "?page=2".to_owned(),
            "/de/c/gesichtsmasken/120308?page=2".to_owned(),
        ];
        let targets = pagination_targets(&category(), &hrefs);
        assert_eq!(targets.len(), 1);
        assert_eq!(targets[0].query(), Some("page=2"));
    }
}
