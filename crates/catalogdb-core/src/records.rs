use serde::Serialize;

/// One row of the raw catalog export, after header normalization.
///
/// Text cells are carried verbatim. An empty cell in `title`, `category` or
/// `size` is represented as `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRecord {
    pub barcode_number: String,
    pub barcode_formats: String,
    pub title: Option<String>,
    pub category: Option<String>,
    pub size: Option<String>,
}

/// A catalog product decomposed into the fixed delivery columns.
///
/// Every field is always present; an empty string means "no value applies".
/// Field order matches [`NormalizedRecord::COLUMNS`] and is the column order of
/// the `products` table, deliverable CSVs and uploaded sheets.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NormalizedRecord {
    /// Verbatim `barcode_number`.
    pub product_id: String,
    /// Verbatim `barcode_formats`.
    pub upc_ean: String,
    pub brand: String,
    pub product_name: String,
    /// Up to the first three path segments, joined by `" > "`.
    pub category: String,
    /// Remaining path segments, joined by `" > "`.
    pub subcategory: String,
    /// Raw size followed by any size tokens lifted out of the title.
    pub size: String,
}

impl NormalizedRecord {
    pub const COLUMNS: [&'static str; 7] = [
        "product_id",
        "upc_ean",
        "brand",
        "product_name",
        "category",
        "subcategory",
        "size",
    ];

    /// Returns the field values in [`Self::COLUMNS`] order.
    #[must_use]
    pub fn values(&self) -> [&str; 7] {
        [
            self.product_id.as_str(),
            self.upc_ean.as_str(),
            self.brand.as_str(),
            self.product_name.as_str(),
            self.category.as_str(),
            self.subcategory.as_str(),
            self.size.as_str(),
        ]
    }
}
