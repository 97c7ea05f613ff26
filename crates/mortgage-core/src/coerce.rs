//! Free-text to Decimal coercion for form fields.
//!
//! Form fields arrive exactly as typed. The rules are deliberately forgiving: a leading `$`,
//! thousands separators and a trailing `%` are tolerated, the longest leading numeric prefix is
//! taken (so `"20%"` and `"12abc"` both read as numbers), and anything else becomes zero.
//! Results are never negative.

use std::str::FromStr;

use rust_decimal::Decimal;
use tracing::debug;

/// Coerce form text into a non-negative Decimal. Anything unparsable becomes zero.
pub fn coerce(text: &str) -> Decimal {
    parse_number(text).map(non_negative).unwrap_or(Decimal::ZERO)
}

/// Same as [`coerce`], emitting a debug event naming the field whenever the
/// typed text could not be used as-is.
pub fn coerce_field(field: &str, text: &str) -> Decimal {
    match parse_number(text) {
        Some(value) if value.is_sign_negative() && !value.is_zero() => {
            debug!(field, text, "negative value clamped to zero");
            Decimal::ZERO
        }
        Some(value) => non_negative(value),
        None => {
            if !text.trim().is_empty() {
                debug!(field, text, "unparsable value defaulted to zero");
            }
            Decimal::ZERO
        }
    }
}

/// Parse the numeric content of form text, keeping its sign.
///
/// Returns `None` when no leading number can be found or the number does not
/// fit in a Decimal.
pub fn parse_number(text: &str) -> Option<Decimal> {
    let trimmed = text.trim();
    let trimmed = trimmed.strip_prefix('$').unwrap_or(trimmed);
    let cleaned: String = trimmed.chars().filter(|c| *c != ',').collect();

    let prefix = numeric_prefix(&cleaned);
    if prefix.is_empty() {
        return None;
    }
    let prefix = prefix.strip_prefix('+').unwrap_or(prefix);

    if prefix.contains(['e', 'E']) {
        Decimal::from_scientific(prefix).ok()
    } else {
        Decimal::from_str(prefix).ok()
    }
}

/// Clamp to zero, folding negative zero into plain zero.
pub(crate) fn non_negative(value: Decimal) -> Decimal {
    if value.is_sign_negative() {
        Decimal::ZERO
    } else {
        value
    }
}

/// Longest prefix of `s` shaped like `[+-]?digits[.digits][e[+-]digits]`.
fn numeric_prefix(s: &str) -> &str {
    let bytes = s.as_bytes();
    let mut i = 0;

    if matches!(bytes.first(), Some(b'+' | b'-')) {
        i = 1;
    }

    let int_start = i;
    while i < bytes.len() && bytes[i].is_ascii_digit() {
        i += 1;
    }
    let mut digits = i - int_start;

    if i < bytes.len() && bytes[i] == b'.' {
        let frac_start = i + 1;
        let mut j = frac_start;
        while j < bytes.len() && bytes[j].is_ascii_digit() {
            j += 1;
        }
        if j > frac_start {
            digits += j - frac_start;
            i = j;
        }
    }

    if digits == 0 {
        return "";
    }

    let mut end = i;
    if i < bytes.len() && (bytes[i] == b'e' || bytes[i] == b'E') {
        let mut j = i + 1;
        if j < bytes.len() && matches!(bytes[j], b'+' | b'-') {
            j += 1;
        }
        let exp_start = j;
        while j < bytes.len() && bytes[j].is_ascii_digit() {
            j += 1;
        }
        if j > exp_start {
            end = j;
        }
    }

    &s[..end]
}
