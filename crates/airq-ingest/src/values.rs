//! Cell-level conversions for Polars `AnyValue`s.
//!
//! Source exports mark "no measurement" in many ways. These helpers decide
//! whether a single cell is one of the recognised sentinels and turn the rest
//! into plain strings and numbers.

use polars::prelude::AnyValue;

/// Text values treated as "no data". Matching is exact.
pub const TEXT_SENTINELS: [&str; 8] = ["", " ", "nan", "NaN", "NAN", "null", "None", "NA"];

/// Numeric value treated as "no data".
pub const NUMERIC_SENTINEL: f64 = -999.0;

/// Returns true if `value` is one of the text sentinels, or text spelling the
/// numeric sentinel (`-999`, `-999.0`).
///
/// # Examples
///
/// ```
/// use airq_ingest::is_missing_text;
///
/// assert!(is_missing_text("NaN"));
/// assert!(is_missing_text("-999"));
/// assert!(!is_missing_text("nAn"));
/// assert!(!is_missing_text(" -999"));
/// assert!(!is_missing_text("42"));
/// ```
pub fn is_missing_text(value: &str) -> bool {
    TEXT_SENTINELS.contains(&value)
        || value
            .parse::<f64>()
            .is_ok_and(|number| number == NUMERIC_SENTINEL)
}

/// Returns true if a cell holds no usable measurement marker-wise.
pub fn is_missing_value(value: &AnyValue<'_>) -> bool {
    match value {
        AnyValue::Null => true,
        AnyValue::String(s) => is_missing_text(s),
        AnyValue::StringOwned(s) => is_missing_text(s.as_str()),
        AnyValue::Float32(v) => v.is_nan() || f64::from(*v) == NUMERIC_SENTINEL,
        AnyValue::Float64(v) => v.is_nan() || *v == NUMERIC_SENTINEL,
        AnyValue::Int8(_) | AnyValue::UInt8(_) | AnyValue::UInt16(_) => false,
        AnyValue::Int16(v) => i64::from(*v) == -999,
        AnyValue::Int32(v) => i64::from(*v) == -999,
        AnyValue::Int64(v) => *v == -999,
        _ => false,
    }
}

/// Converts a cell to a `String`; `Null` becomes the empty string.
pub fn any_to_string(value: AnyValue<'_>) -> String {
    match value {
        AnyValue::Null => String::new(),
        AnyValue::Int8(v) => v.to_string(),
        AnyValue::Int16(v) => v.to_string(),
        AnyValue::Int32(v) => v.to_string(),
        AnyValue::Int64(v) => v.to_string(),
        AnyValue::UInt8(v) => v.to_string(),
        AnyValue::UInt16(v) => v.to_string(),
        AnyValue::UInt32(v) => v.to_string(),
        AnyValue::UInt64(v) => v.to_string(),
        AnyValue::Float32(v) => format_numeric(f64::from(v)),
        AnyValue::Float64(v) => format_numeric(v),
        AnyValue::String(s) => s.to_string(),
        AnyValue::StringOwned(s) => s.to_string(),
        other => other.to_string(),
    }
}

/// Formats a float without a trailing `.0`.
pub fn format_numeric(v: f64) -> String {
    if v.fract() == 0.0 && v.is_finite() {
        format!("{v:.0}")
    } else {
        v.to_string()
    }
}

/// Converts a cell to `f64`; text is trimmed and parsed.
pub fn any_to_f64(value: AnyValue<'_>) -> Option<f64> {
    match value {
        AnyValue::Null => None,
        AnyValue::Int8(v) => Some(f64::from(v)),
        AnyValue::Int16(v) => Some(f64::from(v)),
        AnyValue::Int32(v) => Some(f64::from(v)),
        AnyValue::Int64(v) => Some(v as f64),
        AnyValue::UInt8(v) => Some(f64::from(v)),
        AnyValue::UInt16(v) => Some(f64::from(v)),
        AnyValue::UInt32(v) => Some(f64::from(v)),
        AnyValue::UInt64(v) => Some(v as f64),
        AnyValue::Float32(v) => Some(f64::from(v)),
        AnyValue::Float64(v) => Some(v),
        AnyValue::String(s) => parse_f64(s),
        AnyValue::StringOwned(s) => parse_f64(s.as_str()),
        _ => None,
    }
}

/// Parses trimmed text as a finite `f64`.
pub fn parse_f64(value: &str) -> Option<f64> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Rounds a concentration to a whole number, ties to even.
pub fn round_concentration(value: f64) -> Option<i64> {
    value.is_finite().then(|| value.round_ties_even() as i64)
}

/// Reads a pollutant cell as a whole-number concentration.
///
/// Sentinels, non-numeric text, and non-finite values yield `None`.
pub fn parse_pollutant(value: AnyValue<'_>) -> Option<i64> {
    if is_missing_value(&value) {
        return None;
    }
    any_to_f64(value).and_then(round_concentration)
}

/// Text flavour of [`parse_pollutant`].
pub fn parse_pollutant_text(value: &str) -> Option<i64> {
    if is_missing_text(value) {
        return None;
    }
    parse_f64(value).and_then(round_concentration)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sentinels_are_exact() {
        for sentinel in TEXT_SENTINELS {
            assert!(is_missing_text(sentinel), "{sentinel:?}");
        }
        assert!(!is_missing_text("Nan"));
        assert!(!is_missing_text("none"));
        assert!(!is_missing_text("  "));
        assert!(!is_missing_text("N/A"));
    }

    #[test]
    fn test_numeric_sentinel() {
        assert!(is_missing_value(&AnyValue::Int64(-999)));
        assert!(is_missing_value(&AnyValue::Int32(-999)));
        assert!(is_missing_value(&AnyValue::Float64(-999.0)));
        assert!(is_missing_value(&AnyValue::Float64(f64::NAN)));
        assert!(is_missing_value(&AnyValue::Null));
        assert!(!is_missing_value(&AnyValue::Int64(-998)));
        assert!(!is_missing_value(&AnyValue::Float64(0.0)));
        assert!(is_missing_text("-999.0"));
    }

    #[test]
    fn test_parse_pollutant() {
        assert_eq!(parse_pollutant(AnyValue::String("42")), Some(42));
        assert_eq!(parse_pollutant(AnyValue::String(" 41.6 ")), Some(42));
        assert_eq!(parse_pollutant(AnyValue::Float64(12.5)), Some(12));
        assert_eq!(parse_pollutant(AnyValue::Float64(13.5)), Some(14));
        assert_eq!(parse_pollutant(AnyValue::Int64(-999)), None);
        assert_eq!(parse_pollutant(AnyValue::String("NA")), None);
        assert_eq!(parse_pollutant(AnyValue::String("점검중")), None);
        assert_eq!(parse_pollutant(AnyValue::String("inf")), None);
    }

    #[test]
    fn test_non_numeric_text_is_absent_but_not_a_sentinel() {
        assert!(!is_missing_value(&AnyValue::String("점검중")));
        assert_eq!(parse_pollutant(AnyValue::String("점검중")), None);
        assert_eq!(parse_pollutant_text("점검중"), None);
    }

    #[test]
    fn test_any_to_string() {
        assert_eq!(any_to_string(AnyValue::Null), "");
        assert_eq!(any_to_string(AnyValue::Int32(42)), "42");
        assert_eq!(any_to_string(AnyValue::Float64(42.0)), "42");
        assert_eq!(any_to_string(AnyValue::Float64(1.5)), "1.5");
        assert_eq!(any_to_string(AnyValue::String("중구")), "중구");
    }

    #[test]
    fn test_text_pollutant() {
        assert_eq!(parse_pollutant_text("18"), Some(18));
        assert_eq!(parse_pollutant_text("-999"), None);
        assert_eq!(parse_pollutant_text(""), None);
    }
}
