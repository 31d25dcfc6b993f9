//! Category allow-list filter.

use catalogdb_core::RawRecord;

/// Substrings that mark a category as in scope. Matched against the
/// lower-cased category text.
pub const ALLOWED_CATEGORY_KEYWORDS: [&str; 4] =
    ["beauty", "personal care", "cosmetics", "skincare"];

/// Returns `true` when the category text contains any allow-listed keyword,
/// ignoring case. Absent categories are never in scope.
#[must_use]
pub fn is_allowed_category(category: Option<&str>) -> bool {
    let Some(category) = category else {
        return false;
    };
    let lower = category.to_lowercase();
    ALLOWED_CATEGORY_KEYWORDS
        .iter()
        .any(|keyword| lower.contains(keyword))
}

/// Keeps only the records whose category is in scope, preserving order.
#[must_use]
pub fn filter_records(records: Vec<RawRecord>) -> Vec<RawRecord> {
    records
        .into_iter()
        .filter(|record| is_allowed_category(record.category.as_deref()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record_with_category(barcode: &str, category: Option<&str>) -> RawRecord {
        RawRecord {
            barcode_number: barcode.to_string(),
            category: category.map(str::to_string),
            ..RawRecord::default()
        }
    }

    #[test]
    fn keeps_beauty_category() {
        assert!(is_allowed_category(Some("Health > Beauty > Skincare")));
    }

    #[test]
    fn rejects_unrelated_category() {
        assert!(!is_allowed_category(Some("Electronics > Audio")));
    }

    #[test]
    fn match_is_case_insensitive() {
        assert!(is_allowed_category(Some("HEALTH > PERSONAL CARE")));
        assert!(is_allowed_category(Some("cosmetics")));
    }

    #[test]
    fn match_is_substring_based() {
        assert!(is_allowed_category(Some("Skincare Sets & Kits")));
        assert!(is_allowed_category(Some("Health & Beauty")));
    }

    #[test]
    fn keyword_must_appear_contiguously() {
        assert!(!is_allowed_category(Some("Personal > Care")));
    }

    #[test]
    fn absent_category_is_rejected() {
        assert!(!is_allowed_category(None));
    }

    #[test]
    fn filter_records_preserves_order() {
        let records = vec![
            record_with_category("1", Some("Health > Beauty > Skincare")),
            record_with_category("2", Some("Electronics > Audio")),
            record_with_category("3", None),
            record_with_category("4", Some("Personal Care > Oral Care")),
        ];
        let kept: Vec<String> = filter_records(records)
            .into_iter()
            .map(|r| r.barcode_number)
            .collect();
        assert_eq!(kept, vec!["1".to_string(), "4".to_string()]);
    }
}
