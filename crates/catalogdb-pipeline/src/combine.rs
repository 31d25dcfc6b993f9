//! Merges size information from the title fields and the raw `size` column.

use crate::size_tokens::extract_size_tokens;

/// Brand and product name with size tokens removed, plus the combined size.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SizedFields {
    pub brand: String,
    pub product_name: String,
    pub size: String,
}

/// Lifts size tokens out of `brand` and `product_name` and combines them with
/// the raw size column.
///
/// A non-blank raw size comes first (trimmed), followed by the extracted
/// tokens from the brand and then the product name.
#[must_use]
pub fn combine_size(brand: &str, product_name: &str, raw_size: Option<&str>) -> SizedFields {
    let (brand, size_from_brand) = extract_size_tokens(brand);
    let (product_name, size_from_product) = extract_size_tokens(product_name);

    let extracted = join_non_empty(&[
        size_from_brand.as_str(),
        size_from_product.as_str(),
    ]);
    let raw_size = raw_size.map(str::trim).unwrap_or_default();

    let size = if raw_size.is_empty() {
        extracted
    } else {
        join_non_empty(&[raw_size, extracted.as_str()])
    };

    SizedFields {
        brand,
        product_name,
        size,
    }
}

fn join_non_empty(parts: &[&str]) -> String {
    parts
        .iter()
        .filter(|part| !part.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join(" ")
}
