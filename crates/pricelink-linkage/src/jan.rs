//! JAN/EAN-13 check-digit arithmetic.

/// Numeric value of an ASCII or full-width (`０`-`９`) decimal digit.
fn digit_value(c: char) -> Option<u32> {
    match c {
        '0'..='9' => c.to_digit(10),
        '\u{FF10}'..='\u{FF19}' => Some(u32::from(c) - 0xFF10),
        _ => None,
    }
}

fn digit_values(text: &str, len: usize) -> Option<Vec<u32>> {
    let digits: Vec<u32> = text.chars().map(digit_value).collect::<Option<_>>()?;
    (digits.len() == len).then_some(digits)
}

fn weighted_check_digit(body: &[u32]) -> u8 {
    let sum: u32 = body
        .iter()
        .enumerate()
        .map(|(i, &digit)| if i % 2 == 0 { digit } else { digit * 3 })
        .sum();
    // Always below 10.
    u8::try_from((10 - sum % 10) % 10).unwrap_or_default()
}

/// Computes the check digit for the first 12 digits of a JAN/EAN-13 code.
///
/// Digits at even (0-indexed) positions carry weight 1, odd positions weight
/// 3; the check digit is `(10 - sum % 10) % 10`.
///
/// Returns `None` unless `first12` is exactly 12 digits, ASCII or full-width.
#[must_use]
pub fn check_digit(first12: &str) -> Option<u8> {
    digit_values(first12, 12).map(|body| weighted_check_digit(&body))
}

/// Returns `true` if `code` is exactly 13 digits (ASCII or full-width, mixed
/// freely) whose last digit is the check digit of the first 12.
#[must_use]
pub fn is_valid_jan(code: &str) -> bool {
    let Some(digits) = digit_values(code, 13) else {
        return false;
    };
    u32::from(weighted_check_digit(&digits[..12])) == digits[12]
}
