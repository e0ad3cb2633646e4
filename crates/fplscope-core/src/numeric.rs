// Lenient decimal parsing for bootstrap fields that arrive as either strings
// or numbers ("form": "5.2", "selected_by_percent": "31.4", "expected_goals": 2.0).
//
// Every decimal read goes through `parse_numeric_or_zero`. Missing, null,
// empty and unparseable values all collapse to 0.0, so a literal "0" and an
// absent field are indistinguishable downstream. Integer stats get the same
// treatment through the count adapters.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Parse a JSON value as a decimal, defaulting to 0.0.
///
/// - Numbers pass through.
/// - Strings are read by their leading decimal prefix, so `"3.5 pts"` is 3.5
///   and `"n/a"` is 0.0.
/// - Null, booleans, arrays, objects and non-finite results are 0.0.
pub fn parse_numeric_or_zero(raw: &Value) -> f64 {
    parse_numeric(raw).unwrap_or(0.0)
}

/// Like [`parse_numeric_or_zero`] but keeps "no usable value" as `None`.
/// A parsed zero is `Some(0.0)`.
pub fn parse_numeric(raw: &Value) -> Option<f64> {
    let parsed = match raw {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => parse_decimal_prefix(s),
        _ => None,
    };
    finite(parsed)
}

/// String form of [`parse_numeric_or_zero`].
pub fn parse_str_or_zero(raw: &str) -> f64 {
    finite(parse_decimal_prefix(raw)).unwrap_or(0.0)
}

/// Whole-number reading of a JSON value. Fractions are truncated toward zero.
pub fn parse_count(raw: &Value) -> Option<i64> {
    // `as` saturates at the i64 bounds
    parse_numeric(raw).map(|v| v.trunc() as i64)
}

fn finite(value: Option<f64>) -> Option<f64> {
    match value {
        // -0.0 is folded into 0.0
        Some(v) if v == 0.0 => Some(0.0),
        Some(v) if v.is_finite() => Some(v),
        _ => None,
    }
}

/// Extract the longest leading decimal literal from `raw`.
///
/// Accepts an optional sign, digits with an optional fractional part, and an
/// optional exponent. Leading whitespace is skipped. Returns `None` when no
/// digit is found before the first non-numeric character.
fn parse_decimal_prefix(raw: &str) -> Option<f64> {
    let s = raw.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        end = 1;
    }

    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut digits = end - int_start;

    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        digits += frac_end - frac_start;
        end = frac_end;
    }

    if digits == 0 {
        return None;
    }

    if end < bytes.len() && matches!(bytes[end], b'e' | b'E') {
        let mut exp_end = end + 1;
        if exp_end < bytes.len() && matches!(bytes[exp_end], b'+' | b'-') {
            exp_end += 1;
        }
        let exp_digits = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        // "2e" and "2e+" keep only the mantissa
        if exp_end > exp_digits {
            end = exp_end;
        }
    }

    s[..end].parse::<f64>().ok()
}

// ---------------------------------------------------------------------------
// Serde adapters
// ---------------------------------------------------------------------------

/// `deserialize_with` adapter for decimal fields. Pair with `#[serde(default)]`
/// so an absent key also yields 0.0.
pub fn deserialize_numeric_or_zero<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(raw.as_ref().map(parse_numeric_or_zero).unwrap_or(0.0))
}

/// `deserialize_with` adapter for decimal fields whose presence matters.
/// Absent, null and unparseable values are `None`; a reported zero is
/// `Some(0.0)`.
pub fn deserialize_optional_numeric<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(raw.as_ref().and_then(parse_numeric))
}

/// `deserialize_with` adapter for integer stat fields (minutes, bonus, ...).
/// Missing, null, unparseable and out-of-range values are 0, so a bad cell
/// never costs the whole row. Pair with `#[serde(default)]`.
pub fn deserialize_count_or_zero<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: TryFrom<i64> + Default,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(raw
        .as_ref()
        .and_then(parse_count)
        .and_then(|n| T::try_from(n).ok())
        .unwrap_or_default())
}

/// `deserialize_with` adapter for optional integer fields such as
/// `penalties_order`. Anything that is not a usable in-range number is `None`.
pub fn deserialize_optional_count<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: TryFrom<i64>,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(raw
        .as_ref()
        .and_then(parse_count)
        .and_then(|n| T::try_from(n).ok()))
}
