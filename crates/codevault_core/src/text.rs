//! Shared text normalization helpers.

/// Keep an optional string only when it has visible characters.
///
/// # Returns
/// `None` when the input is missing, empty or whitespace-only; otherwise the
/// input unchanged, surrounding whitespace included.
pub fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|raw| !raw.trim().is_empty())
}

/// Parse the leading decimal integer of `raw`.
///
/// Leading whitespace and a single sign are accepted; parsing stops at the
/// first non-digit, so `"90s"` yields 90 and `"1.5"` yields 1. Values beyond
/// the `i64` range saturate.
///
/// # Returns
/// `None` when no digit follows the optional sign.
pub fn parse_leading_int(raw: &str) -> Option<i64> {
    let trimmed = raw.trim_start();
    let (negative, digits) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let mut value: i64 = 0;
    let mut seen_digit = false;
    for byte in digits.bytes() {
        if !byte.is_ascii_digit() {
            break;
        }
        seen_digit = true;
        let digit = i64::from(byte - b'0');
        value = value.saturating_mul(10).saturating_add(digit);
    }

    if !seen_digit {
        return None;
    }
    Some(if negative { -value } else { value })
}
