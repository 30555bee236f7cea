//! Raw registry cell → canonical value conversion.
//!
//! Every raw value is trimmed first; blank always becomes `None`.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

const COORDINATE_DECIMALS: usize = 5;

static WORD_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\p{Alphabetic}+").expect("valid word regex"));

/// Normalization rule applied to one registry column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Decimal coordinate rounded to 5 places; unparsable input is dropped.
    Numeric,
    /// Title-cased free text (names, operators, counties).
    Titled,
    /// Trimmed text passed through as-is.
    Plain,
}

/// Canonical value produced by [`normalize`].
#[derive(Debug, Clone, PartialEq)]
pub enum NormalizedValue {
    Number(f64),
    Text(String),
}

impl NormalizedValue {
    pub fn into_number(self) -> Option<f64> {
        match self {
            Self::Number(value) => Some(value),
            Self::Text(_) => None,
        }
    }

    pub fn into_text(self) -> Option<String> {
        match self {
            Self::Text(value) => Some(value),
            Self::Number(_) => None,
        }
    }
}

/// Normalizes `raw` according to `kind`. A missing cell is treated as blank.
pub fn normalize(raw: Option<&str>, kind: FieldKind) -> Option<NormalizedValue> {
    let trimmed = raw.unwrap_or_default().trim();
    match kind {
        FieldKind::Numeric => normalize_coordinate(trimmed).map(NormalizedValue::Number),
        FieldKind::Titled => normalize_titled(trimmed).map(NormalizedValue::Text),
        FieldKind::Plain => normalize_plain(trimmed).map(NormalizedValue::Text),
    }
}

/// Parses a decimal coordinate and rounds it to 5 places.
///
/// Returns `None` for blank, unparsable or non-finite input.
pub fn normalize_coordinate(raw: &str) -> Option<f64> {
    let value = raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())?;
    round_to(value, COORDINATE_DECIMALS)
}

pub fn normalize_titled(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(title_case(trimmed))
}

pub fn normalize_plain(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Capitalizes each run of letters and lower-cases the rest of it.
///
/// Any non-letter (digit, apostrophe, hyphen, space) starts a new word, so
/// `"O'NEIL 3RD-A"` becomes `"O'Neil 3Rd-A"`. Non-ASCII letters stay inside
/// their word: `"MUÑOZ"` becomes `"Muñoz"`.
pub fn title_case(value: &str) -> String {
    WORD_RE
        .replace_all(value, |caps: &Captures<'_>| {
            let mut chars = caps[0].chars();
            let mut titled = String::with_capacity(caps[0].len());
            if let Some(first) = chars.next() {
                titled.extend(first.to_uppercase());
            }
            titled.extend(chars.flat_map(char::to_lowercase));
            titled
        })
        .into_owned()
}

/// Rounds the exact binary value to `decimals` places, ties to even.
///
/// `30.318595` is stored just below the tie, so it rounds to `30.31859`.
fn round_to(value: f64, decimals: usize) -> Option<f64> {
    format!("{value:.decimals$}").parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coordinate_rounds_to_five_decimals() {
        assert_eq!(normalize_coordinate("35.123456"), Some(35.12346));
        assert_eq!(normalize_coordinate(" -97.5 "), Some(-97.5));
        assert_eq!(normalize_coordinate("-97.0000049"), Some(-97.0));
    }

    #[test]
    fn coordinate_rounding_uses_exact_binary_value() {
        assert_eq!(normalize_coordinate("30.318595"), Some(30.31859));
        assert_eq!(normalize_coordinate("-51.452005"), Some(-51.452));
        assert_eq!(normalize_coordinate("-0.0000001"), Some(-0.0));
    }

    #[test]
    fn malformed_coordinates_are_dropped() {
        assert_eq!(normalize_coordinate(""), None);
        assert_eq!(normalize_coordinate("   "), None);
        assert_eq!(normalize_coordinate("N35.1"), None);
        assert_eq!(normalize_coordinate("inf"), None);
        assert_eq!(normalize_coordinate("NaN"), None);
    }

    #[test]
    fn title_case_splits_on_any_non_letter() {
        assert_eq!(title_case("SMITH 1-24H"), "Smith 1-24H");
        assert_eq!(title_case("o'neil 3rd unit"), "O'Neil 3Rd Unit");
        assert_eq!(title_case("CAMINO NATURAL RESOURCES LLC"), "Camino Natural Resources Llc");
    }

    #[test]
    fn title_case_keeps_non_ascii_letters_in_the_word() {
        assert_eq!(title_case("MUÑOZ RANCH"), "Muñoz Ranch");
        assert_eq!(title_case("élan 2-b"), "Élan 2-B");
    }

    #[test]
    fn titled_and_plain_blank_become_none() {
        assert_eq!(normalize_titled("  "), None);
        assert_eq!(normalize_plain(""), None);
        assert_eq!(normalize_plain(" 5N "), Some("5N".to_string()));
        assert_eq!(normalize_plain("nE"), Some("nE".to_string()));
    }

    #[test]
    fn missing_cell_is_treated_as_blank() {
        assert_eq!(normalize(None, FieldKind::Plain), None);
        assert_eq!(normalize(None, FieldKind::Numeric), None);
    }

    #[test]
    fn normalization_is_idempotent() {
        let cases = [
            ("  GRADY  ", FieldKind::Titled),
            ("35.123456", FieldKind::Numeric),
            ("bogus", FieldKind::Numeric),
            (" 12 ", FieldKind::Plain),
        ];
        for (raw, kind) in cases {
            assert_eq!(normalize(Some(raw), kind), normalize(Some(raw), kind));
        }
        let once = normalize(Some("  GRADY  "), FieldKind::Titled)
            .and_then(NormalizedValue::into_text)
            .unwrap();
        let twice = normalize(Some(&once), FieldKind::Titled)
            .and_then(NormalizedValue::into_text)
            .unwrap();
        assert_eq!(once, twice);
    }
}
