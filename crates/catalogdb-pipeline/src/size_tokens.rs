//! Size-token extraction from free text.
//!
//! Text is split on whitespace, adjacent words that together describe a
//! quantity are merged into one token, and every resulting token is classified
//! once against a single anchored pattern. Size tokens are lifted out; all
//! other tokens stay in the cleaned text, in their original order.

use std::sync::LazyLock;

use regex::Regex;

/// Words that open a `<word> of <number>` packaging phrase.
const PHRASE_KEYWORDS: [&str; 4] = ["pack", "case", "set", "box"];

/// Recognized units, matched case-insensitively.
const UNIT: &str = r"(?:oz\.?|lb\.?|g|grams?|kg|gm|ml|l|liter|litre|fl\.?\s*oz\.?|syringes|shots|bottles?|count|ct|pcs?|pieces?|set|kit|jar|trays?)";

const NUMBER: &str = r"\d+(?:\.\d+)?";

static SIZE_TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(?i)^(?:{NUMBER}\s*{UNIT}(?:\s*\(.*?\))?|(?:pack|case|set|box)_of_{NUMBER}|x\s*{NUMBER}|{NUMBER}\s*x)$"
    ))
    .expect("valid size token regex")
});

static BARE_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&format!(r"^{NUMBER}$")).expect("valid number regex"));

static BARE_UNIT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&format!(r"(?i)^{UNIT}$")).expect("valid unit regex"));

static QUANTITY_WITH_UNIT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"(?i)^{NUMBER}\s*{UNIT}$")).expect("valid quantity regex")
});

static PARENTHETICAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\(.*\)$").expect("valid parenthetical regex"));

/// Splits `text` into `(cleaned_text, extracted_size)`.
///
/// Both halves are single-space joined and keep the relative order the tokens
/// had in `text`. Every token ends up in exactly one half. Empty or
/// whitespace-only input yields two empty strings.
///
/// ```
/// use catalogdb_pipeline::extract_size_tokens;
///
/// let (cleaned, size) = extract_size_tokens("Pack of 2 Razors");
/// assert_eq!(cleaned, "Razors");
/// assert_eq!(size, "Pack_of_2");
/// ```
#[must_use]
pub fn extract_size_tokens(text: &str) -> (String, String) {
    let raw_tokens: Vec<&str> = text.split_whitespace().collect();
    if raw_tokens.is_empty() {
        return (String::new(), String::new());
    }

    let (size_tokens, kept_tokens): (Vec<String>, Vec<String>) = merge_phrases(&raw_tokens)
        .into_iter()
        .partition(|token| is_size_token(token));

    (kept_tokens.join(" "), size_tokens.join(" "))
}

/// Returns `true` when the whole token reads as a size description.
#[must_use]
pub fn is_size_token(token: &str) -> bool {
    SIZE_TOKEN.is_match(token.trim())
}

/// Left-to-right cursor scan that collapses multi-word quantities into one
/// token. Merges are greedy and never overlap.
fn merge_phrases(tokens: &[&str]) -> Vec<String> {
    let mut merged = Vec::with_capacity(tokens.len());
    let mut cursor = 0;

    while cursor < tokens.len() {
        let window = &tokens[cursor..];

        if let Some(phrase) = packaging_phrase(window) {
            merged.push(phrase);
            cursor += 3;
            continue;
        }

        if let Some(consumed) = quantity_span(window) {
            merged.push(window[..consumed].join(" "));
            cursor += consumed;
            continue;
        }

        merged.push(window[0].to_owned());
        cursor += 1;
    }

    merged
}

/// `Pack of 2` → `Pack_of_2`. The keyword and count keep their spelling;
/// `of` is always lower-cased.
fn packaging_phrase(window: &[&str]) -> Option<String> {
    let [keyword, of, count, ..] = window else {
        return None;
    };

    let is_keyword = PHRASE_KEYWORDS
        .iter()
        .any(|k| keyword.eq_ignore_ascii_case(k));

    if is_keyword && of.eq_ignore_ascii_case("of") && BARE_NUMBER.is_match(count) {
        Some(format!("{keyword}_of_{count}"))
    } else {
        None
    }
}

/// Number of tokens at the head of `window` that spell one quantity with a
/// unit: `12 oz`, `8 fl oz`, or an already-joined `12oz`, each optionally
/// followed by a parenthetical such as `(355ml)`. Returns `None` for a single
/// token that needs no merging.
///
/// A number never claims the keyword of a following packaging phrase, so
/// `3 Set of 2` leaves `Set of 2` to be merged on its own.
fn quantity_span(window: &[&str]) -> Option<usize> {
    let head = *window.first()?;

    let mut consumed = if QUANTITY_WITH_UNIT.is_match(head) {
        1
    } else if BARE_NUMBER.is_match(head) {
        let rest = &window[1..];
        if packaging_phrase(rest).is_some() {
            return None;
        }
        1 + unit_span(rest)?
    } else {
        return None;
    };

    if window
        .get(consumed)
        .is_some_and(|next| PARENTHETICAL.is_match(next))
    {
        consumed += 1;
    }

    (consumed > 1).then_some(consumed)
}

/// Number of leading tokens (one or two) that together form a unit.
fn unit_span(window: &[&str]) -> Option<usize> {
    match window {
        [first, ..] if BARE_UNIT.is_match(first) => Some(1),
        [first, second, ..] if BARE_UNIT.is_match(&format!("{first} {second}")) => Some(2),
        _ => None,
    }
}

#[cfg(test)]
#[path = "size_tokens_test.rs"]
mod tests;
