use serde::{Deserialize, Serialize};

/// One output column, in spreadsheet order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    Ean,
    ProductName,
    ProductDescription,
    ProductDetails,
    ProductFeatures,
    VariantName,
    ProductImageLink,
    FinalPrice,
    OriginalPrice,
    DiscountPercentage,
    Rating,
    NumberOfReviews,
    IsAvailable,
}

impl Column {
    /// All columns in the fixed header order.
    pub const ALL: [Column; 13] = [
        Column::Ean,
        Column::ProductName,
        Column::ProductDescription,
        Column::ProductDetails,
        Column::ProductFeatures,
        Column::VariantName,
        Column::ProductImageLink,
        Column::FinalPrice,
        Column::OriginalPrice,
        Column::DiscountPercentage,
        Column::Rating,
        Column::NumberOfReviews,
        Column::IsAvailable,
    ];

    /// Header text written in the first spreadsheet row.
    #[must_use]
    pub fn header(self) -> &'static str {
        match self {
            Column::Ean => "ean",
            Column::ProductName => "product_name",
            Column::ProductDescription => "product_description",
            Column::ProductDetails => "product_details",
            Column::ProductFeatures => "product_features",
            Column::VariantName => "variant_name",
            Column::ProductImageLink => "product_image_link",
            Column::FinalPrice => "final_price",
            Column::OriginalPrice => "original_price",
            Column::DiscountPercentage => "discount_percentage",
            Column::Rating => "rating",
            Column::NumberOfReviews => "number_of_reviews",
            Column::IsAvailable => "is_available",
        }
    }

    /// Zero-based position of this column in [`Column::ALL`].
    #[must_use]
    pub fn index(self) -> usize {
        self as usize
    }
}

/// A single `feature name -> comma-joined values` pair from the product's
/// classification groups.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductDetailEntry {
    pub name: String,
    pub value: String,
}

/// A product detail record flattened into spreadsheet columns.
///
/// Every field is optional: `None` means the source record did not carry the
/// value, which is different from `Some(false)` or an empty list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductRow {
    pub ean: Option<String>,
    /// Brand line name immediately followed by the base product name.
    pub product_name: Option<String>,
    pub product_description: Option<String>,
    pub product_details: Option<Vec<ProductDetailEntry>>,
    /// Values of the last product-label list found in the classifications.
    pub product_features: Option<Vec<String>>,
    pub variant_name: Option<String>,
    pub product_image_link: Option<String>,
    /// Formatted current price with non-breaking spaces removed, e.g. `"24,95€"`.
    pub final_price: Option<String>,
    pub original_price: Option<String>,
    pub discount_percentage: Option<Metric>,
    pub rating: Option<Metric>,
    pub number_of_reviews: Option<Metric>,
    pub is_available: Option<bool>,
}

/// A numeric field as the record carried it: the number when it parses,
/// otherwise the raw text (e.g. `"4,5"` or `"20%"`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Metric {
    Number(f64),
    Text(String),
}

impl Metric {
    #[must_use]
    pub fn to_cell(&self) -> CellValue {
        match self {
            Metric::Number(n) => CellValue::Number(*n),
            Metric::Text(s) => CellValue::Text(s.clone()),
        }
    }
}

/// A typed spreadsheet cell value.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Text(String),
    Number(f64),
    Bool(bool),
}

impl ProductRow {
    /// `true` only when the record explicitly reported no stock.
    #[must_use]
    pub fn is_out_of_stock(&self) -> bool {
        self.is_available == Some(false)
    }

    /// Renders the value for `column`, or `None` when the row has no value
    /// for it and the cell should stay blank.
    ///
    /// Features are joined with `",\n"`; details become one `"name - value"`
    /// line per entry.
    #[must_use]
    pub fn cell(&self, column: Column) -> Option<CellValue> {
        let text = |v: &Option<String>| v.clone().map(CellValue::Text);
        match column {
            Column::Ean => text(&self.ean),
            Column::ProductName => text(&self.product_name),
            Column::ProductDescription => text(&self.product_description),
            Column::ProductDetails => self.product_details.as_ref().map(|details| {
                CellValue::Text(
                    details
                        .iter()
                        .map(|d| format!("{} - {}", d.name, d.value))
                        .collect::<Vec<_>>()
                        .join("\n"),
                )
            }),
            Column::ProductFeatures => self
                .product_features
                .as_ref()
                .map(|features| CellValue::Text(features.join(",\n"))),
            Column::VariantName => text(&self.variant_name),
            Column::ProductImageLink => text(&self.product_image_link),
            Column::FinalPrice => text(&self.final_price),
            Column::OriginalPrice => text(&self.original_price),
            Column::DiscountPercentage => self.discount_percentage.as_ref().map(Metric::to_cell),
            Column::Rating => self.rating.as_ref().map(Metric::to_cell),
            Column::NumberOfReviews => self.number_of_reviews.as_ref().map(Metric::to_cell),
            Column::IsAvailable => self.is_available.map(CellValue::Bool),
        }
    }

    /// Iterates the populated cells in column order.
    pub fn cells(&self) -> impl Iterator<Item = (Column, CellValue)> + '_ {
        Column::ALL
            .into_iter()
            .filter_map(move |column| self.cell(column).map(|value| (column, value)))
    }
}
