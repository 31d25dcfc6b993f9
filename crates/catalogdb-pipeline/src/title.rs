//! Brand / product-name split of a free-text title.

/// Number of leading title words treated as the brand.
const BRAND_WORDS: usize = 2;

/// Splits a title into `(brand, product_name)`.
///
/// The brand is the first two whitespace-separated words (or all of them when
/// the title is shorter); the product name is everything after. Absent or
/// blank titles yield two empty strings.
#[must_use]
pub fn split_title(title: Option<&str>) -> (String, String) {
    let words: Vec<&str> = title.unwrap_or_default().split_whitespace().collect();
    let split_at = words.len().min(BRAND_WORDS);
    let (brand, rest) = words.split_at(split_at);
    (brand.join(" "), rest.join(" "))
}
