//! Field mapping from a raw [`ProductDetail`] document to a flat
//! [`douglas_core::ProductRow`].
//!
//! Every output field is filled only when the source carries a usable value;
//! nothing here fails on a missing or oddly typed key.

use douglas_core::{Metric, ProductDetailEntry, ProductRow};
use serde_json::Value;

use crate::types::{present, value_as_f64, value_as_metric, value_as_str, ProductDetail};

const NBSP: char = '\u{a0}';

/// Maps one product detail record into one output row.
#[must_use]
pub fn normalize_product(detail: &ProductDetail) -> ProductRow {
    let (final_price, original_price, discount_percentage) = normalize_price(detail);
    let (product_features, product_details) = normalize_classifications(detail);

    ProductRow {
        ean: owned(value_as_str(detail.get("ean"))),
        product_name: product_name(detail),
        product_description: owned(value_as_str(detail.get("description"))),
        product_details,
        product_features,
        variant_name: owned(value_as_str(detail.get("name"))),
        product_image_link: owned(value_as_str(
            detail
                .get("productApplicationImage")
                .and_then(|image| image.get("url")),
        )),
        final_price,
        original_price,
        discount_percentage,
        rating: value_as_metric(detail.get("ratingStars")),
        number_of_reviews: number_of_reviews(detail.get("numberOfReviews")),
        is_available: availability(detail),
    }
}

/// `None` when the record has no stock object at all; otherwise whether the
/// stock level is positive.
fn availability(detail: &ProductDetail) -> Option<bool> {
    let stock = detail.get("stock")?;
    Some(value_as_f64(stock.get("stockLevel")).is_some_and(|level| level > 0.0))
}

fn product_name(detail: &ProductDetail) -> Option<String> {
    let brand_line = value_as_str(detail.get("brandLine").and_then(|b| b.get("name")))?;
    let base_name = value_as_str(detail.get("baseProductName"))?;
    Some(format!("{brand_line}{base_name}"))
}

/// Whole counts (including `12.0` and `"12"`) become numbers; anything else
/// present is kept as text.
fn number_of_reviews(value: Option<&Value>) -> Option<Metric> {
    match present(value)? {
        Value::Number(n) => match n.as_f64() {
            Some(count) if count >= 0.0 && count.fract() == 0.0 => Some(Metric::Number(count)),
            _ => Some(Metric::Text(n.to_string())),
        },
        Value::String(raw) => Some(match raw.trim().parse::<u64>() {
            #[allow(clippy::cast_precision_loss)]
            Ok(count) => Metric::Number(count as f64),
            Err(_) => Metric::Text(raw.clone()),
        }),
        _ => None,
    }
}

/// Returns `(final_price, original_price, discount_percentage)`.
///
/// The secondary fields are only read when a formatted current price exists.
fn normalize_price(detail: &ProductDetail) -> (Option<String>, Option<String>, Option<Metric>) {
    let Some(price) = detail.get("price") else {
        return (None, None, None);
    };
    let Some(formatted) = value_as_str(price.get("formattedValue")) else {
        return (None, None, None);
    };

    (
        Some(strip_nbsp(formatted)),
        value_as_str(price.get("formattedOriginalValue")).map(strip_nbsp),
        value_as_metric(price.get("discountPercentage")),
    )
}

/// Returns `(product_features, product_details)`.
///
/// Both are `Some` whenever the record has a non-empty classification list.
/// The last feature carrying a product-label list supplies the features; the
/// label lists are not merged.
fn normalize_classifications(
    detail: &ProductDetail,
) -> (Option<Vec<String>>, Option<Vec<ProductDetailEntry>>) {
    let Some(groups) = detail.get("classifications").and_then(Value::as_array) else {
        return (None, None);
    };

    let mut labels: Vec<String> = Vec::new();
    let mut details: Vec<ProductDetailEntry> = Vec::new();

    for group in groups {
        let Some(features) = present(group.get("features")).and_then(Value::as_array) else {
            continue;
        };

        for feature in features {
            if let Some(label_list) = present(feature.get("productLabel")).and_then(Value::as_array)
            {
                labels = label_list
                    .iter()
                    .filter_map(|label| scalar_to_string(label.get("value")))
                    .collect();
            }

            let Some(name) = value_as_str(feature.get("name")) else {
                tracing::debug!(?feature, "skipping classification feature without a name");
                continue;
            };
            let value = feature
                .get("featureValues")
                .and_then(Value::as_array)
                .map(|values| {
                    values
                        .iter()
                        .filter_map(|v| scalar_to_string(v.get("value")))
                        .collect::<Vec<_>>()
                        .join(",")
                })
                .unwrap_or_default();

            details.push(ProductDetailEntry {
                name: name.to_owned(),
                value,
            });
        }
    }

    (Some(labels), Some(details))
}

fn scalar_to_string(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn strip_nbsp(raw: &str) -> String {
    raw.replace(NBSP, "")
}

fn owned(value: Option<&str>) -> Option<String> {
    value.map(str::to_owned)
}

#[cfg(test)]
#[path = "normalize_test.rs"]
mod tests;
