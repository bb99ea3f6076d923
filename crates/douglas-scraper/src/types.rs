//! Response types for the douglas.de product detail endpoint
//! (`/api/v2/products/<number>?fields=FULL`).
//!
//! ## Observed shape
//!
//! The document is large and loosely structured; only a handful of keys are
//! read. Any of them may be absent, `null`, or an empty string/object.
//!
//! ```text
//! {
//!   "ean": "3614273069243",
//!   "name": "50 ml",                          // variant name
//!   "baseProductName": "Hydra Zen Maske",
//!   "brandLine": { "name": "Lancôme" },
//!   "description": "...",
//!   "ratingStars": 4.5,
//!   "numberOfReviews": 12,
//!   "stock": { "stockLevel": 7, "stockLevelStatus": "inStock" },
//!   "price": {
//!     "formattedValue": "39,95 €",
//!     "formattedOriginalValue": "49,95 €",
//!     "discountPercentage": 20
//!   },
//!   "productApplicationImage": { "url": "https://media.douglas.de/..." },
//!   "classifications": [
//!     { "features": [
//!       { "name": "Hauttyp",
//!         "featureValues": [{ "value": "Trockene Haut" }],
//!         "productLabel": [{ "value": "Vegan" }] }
//!     ] }
//!   ]
//! }
//! ```
//!
//! Because the shape drifts between products, the record is kept as a
//! [`serde_json::Value`] and read through presence checks rather than a
//! derived struct: a field of an unexpected type reads as absent instead of
//! failing the whole record.

use douglas_core::Metric;
use serde_json::Value;

/// One product detail document as returned by the detail endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductDetail(Value);

impl ProductDetail {
    /// Wraps a parsed response body.
    ///
    /// Returns `None` for `null`, non-object bodies and `{}`: the endpoint
    /// answers some unknown numbers with an empty document, which carries no
    /// row worth writing.
    #[must_use]
    pub fn from_value(value: Value) -> Option<Self> {
        match &value {
            Value::Object(map) if !map.is_empty() => Some(Self(value)),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_value(&self) -> &Value {
        &self.0
    }

    /// Looks up a top-level key, treating falsy values as absent.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        present(self.0.get(key))
    }
}

/// Filters out the values a record uses to mean "not set": `null`, `false`,
/// `0`, `""`, `[]` and `{}`.
pub(crate) fn present(value: Option<&Value>) -> Option<&Value> {
    value.filter(|v| is_truthy(v))
}

pub(crate) fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

/// Reads a present string value.
pub(crate) fn value_as_str(value: Option<&Value>) -> Option<&str> {
    present(value).and_then(Value::as_str)
}

/// Reads a present numeric value. Numeric strings such as `"4.5"` are accepted.
pub(crate) fn value_as_f64(value: Option<&Value>) -> Option<f64> {
    present(value).and_then(|v| {
        v.as_f64()
            .or_else(|| v.as_str().and_then(|raw| raw.trim().parse::<f64>().ok()))
    })
}

/// Reads a present number, keeping strings that do not parse as raw text.
pub(crate) fn value_as_metric(value: Option<&Value>) -> Option<Metric> {
    match present(value)? {
        Value::Number(n) => n.as_f64().map(Metric::Number),
        Value::String(raw) => Some(
            raw.trim()
                .parse::<f64>()
                .map_or_else(|_| Metric::Text(raw.clone()), Metric::Number),
        ),
        _ => None,
    }
}
