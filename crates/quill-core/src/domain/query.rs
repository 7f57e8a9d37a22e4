//! Permissive coercion of query-string input.

/// Largest limit a count coerces to; SQL row limits are signed 64-bit.
pub const MAX_COUNT: u64 = i64::MAX as u64;

/// Coerce a raw `count` parameter into a row limit.
///
/// Parses an optional sign and the leading run of digits, ignoring anything
/// after it (`"5abc"` is 5). Missing, non-numeric, and negative input all
/// coerce to 0. Large values saturate at [`MAX_COUNT`].
pub fn coerce_count(raw: Option<&str>) -> u64 {
    let Some(raw) = raw else {
        return 0;
    };

    let trimmed = raw.trim_start();
    let (negative, digits) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let mut count: u64 = 0;
    let mut seen_digit = false;
    for byte in digits.bytes().take_while(u8::is_ascii_digit) {
        seen_digit = true;
        count = count
            .saturating_mul(10)
            .saturating_add(u64::from(byte - b'0'))
            .min(MAX_COUNT);
    }

    if negative && seen_digit { 0 } else { count }
}
