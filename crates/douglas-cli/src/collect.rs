//! Scrape pipeline for one category run.
//!
//! Homepage, category listing, product details, mapping, workbook. Fetch
//! failures for individual pages and records are logged and skipped rather
//! than propagated, so a partial scrape still produces a workbook.

use std::time::Duration;

use anyhow::Context;
use douglas_core::{AppConfig, ProductRow};
use douglas_scraper::{
    normalize_product, resolve_product_numbers, DouglasClient, ListingSelectors,
};

use crate::export;

const PROGRESS_LOG_EVERY: usize = 25;

/// Counts reported at the end of a run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub(crate) struct CollectSummary {
    pub links_found: usize,
    pub records_fetched: usize,
    pub rows_written: usize,
}

/// Runs the full pipeline and writes the workbook unless `dry_run` is set.
///
/// # Errors
///
/// Returns an error if a selector or URL in `config` is invalid, a detail
/// record is not valid JSON, or the workbook cannot be written. Network
/// failures are logged and skipped.
pub(crate) async fn run_collect(
    config: &AppConfig,
    dry_run: bool,
) -> anyhow::Result<CollectSummary> {
    let (rows, mut summary) = scrape_rows(config).await?;

    if dry_run {
        tracing::info!(rows = rows.len(), "dry run: workbook not written");
    } else {
        export::write_workbook(&rows, &config.output_path, &config.sheet_name)?;
        summary.rows_written = rows.len();
    }

    tracing::info!(
        links_found = summary.links_found,
        records_fetched = summary.records_fetched,
        rows_written = summary.rows_written,
        "collect run complete"
    );
    Ok(summary)
}

/// Fetches and maps every product in the configured category.
///
/// The returned summary has `rows_written` left at zero.
pub(crate) async fn scrape_rows(
    config: &AppConfig,
) -> anyhow::Result<(Vec<ProductRow>, CollectSummary)> {
    let selectors =
        ListingSelectors::parse(&config.product_link_selector, &config.pagination_selector)?;
    let client = DouglasClient::from_config(config)?;

    match client.fetch_homepage(&config.home_path).await {
        Ok(()) => {}
        Err(e) if e.is_skippable() => {
            tracing::warn!(
                error = %e,
                "homepage fetch failed; continuing without session cookies"
            );
        }
        Err(e) => return Err(e.into()),
    }

    let links = client
        .collect_product_links(&config.category_path, &selectors)
        .await?;
    tracing::info!(
        category = %config.category_path,
        links = links.len(),
        "product links collected"
    );

    let numbers = resolve_product_numbers(&links);
    let mut summary = CollectSummary {
        links_found: links.len(),
        ..CollectSummary::default()
    };
    let mut rows = Vec::with_capacity(numbers.len());

    for (idx, number) in numbers.iter().enumerate() {
        if idx > 0 && config.inter_request_delay_ms > 0 {
            tokio::time::sleep(Duration::from_millis(config.inter_request_delay_ms)).await;
        }

        match client.fetch_product_detail(number).await {
            Ok(Some(detail)) => {
                summary.records_fetched += 1;
                rows.push(normalize_product(&detail));
            }
            Ok(None) => {
                tracing::warn!(product = %number, "empty product detail record; skipping");
            }
            Err(e) if e.is_skippable() => {
                tracing::warn!(
                    product = %number,
                    error = %e,
                    "product detail fetch failed; skipping"
                );
            }
            Err(e) => {
                return Err(e).with_context(|| format!("aborting run at product {number}"));
            }
        }

        if (idx + 1) % PROGRESS_LOG_EVERY == 0 {
            tracing::info!(
                done = idx + 1,
                total = numbers.len(),
                "product details progress"
            );
        }
    }

    Ok((rows, summary))
}

#[cfg(test)]
#[path = "collect_test.rs"]
mod tests;
