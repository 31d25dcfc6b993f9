//! Hierarchical category path split.

/// Path segments kept in the top-level category.
const CATEGORY_DEPTH: usize = 3;

const SEPARATOR: &str = " > ";

/// Splits a `>`-delimited category path into `(category, subcategory)`.
///
/// Segments are trimmed. The first three form the category and any further
/// segments form the subcategory, each re-joined with `" > "`. A path with no
/// `>` is a single segment. Absent input yields two empty strings.
#[must_use]
pub fn split_category(path: Option<&str>) -> (String, String) {
    let Some(path) = path else {
        return (String::new(), String::new());
    };

    let segments: Vec<&str> = path.split('>').map(str::trim).collect();
    let split_at = segments.len().min(CATEGORY_DEPTH);
    let (category, subcategory) = segments.split_at(split_at);

    (category.join(SEPARATOR), subcategory.join(SEPARATOR))
}
