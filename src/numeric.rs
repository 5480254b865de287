/**
 * Parsing and display of comma-grouped decimal strings.
 *
 * Parsing never fails: the empty string means zero and anything without
 * a leading number comes back as NaN, which the arithmetic carries along
 * and the formatters render as an empty string.
 */
const GROUP_SEPARATOR: char = ',';
const DISPLAY_FRACTION_DIGITS: usize = 3;
const AMOUNT_FRACTION_DIGITS: usize = 2;

/// Strips group separators; empty input is zero, otherwise the leading number is taken.
pub fn parse_number(raw: &str) -> f64 {
    let cleaned = strip_separators(raw);
    if cleaned.is_empty() {
        return 0.0;
    }
    parse_leading_float(&cleaned)
}

/// Like `parse_number` but without the empty-means-zero default.
pub fn parse_number_or_nan(raw: &str) -> f64 {
    parse_leading_float(&strip_separators(raw))
}

/// Whole-string numeric parse: surrounding whitespace is allowed, empty is zero,
/// trailing garbage makes the whole thing invalid.
pub fn parse_exact(raw: &str) -> Option<f64> {
    let text = raw.trim();
    if text.is_empty() {
        return Some(0.0);
    }
    if let Some((value, len)) = leading_infinity(text) {
        return (len == text.len()).then(|| value);
    }
    match decimal_literal_len(text) {
        Some(len) if len == text.len() => text.parse().ok(),
        _ => None,
    }
}

pub fn strip_separators(raw: &str) -> String {
    raw.replace(GROUP_SEPARATOR, "")
}

/**
 * Longest-prefix float parse. Leading whitespace is skipped, then an
 * optional sign and either `Infinity` or digits with an optional fraction
 * and exponent. An exponent marker not followed by digits is left out of
 * the prefix rather than invalidating it.
 */
pub fn parse_leading_float(text: &str) -> f64 {
    let text = text.trim_start();
    if let Some((value, _)) = leading_infinity(text) {
        return value;
    }
    match decimal_literal_len(text) {
        Some(len) => text[..len].parse().unwrap_or(f64::NAN),
        None => f64::NAN,
    }
}

fn leading_infinity(text: &str) -> Option<(f64, usize)> {
    let (sign, unsigned) = match text.as_bytes().first() {
        Some(b'-') => (-1.0, &text[1..]),
        Some(b'+') => (1.0, &text[1..]),
        _ => (1.0, text),
    };
    const INFINITY: &str = "Infinity";
    unsigned.starts_with(INFINITY).then(|| {
        (
            sign * f64::INFINITY,
            text.len() - unsigned.len() + INFINITY.len(),
        )
    })
}

fn decimal_literal_len(text: &str) -> Option<usize> {
    let bytes = text.as_bytes();
    let count_digits = |from: usize| {
        bytes[from..]
            .iter()
            .take_while(|b| b.is_ascii_digit())
            .count()
    };

    let mut end = match bytes.first() {
        Some(b'+' | b'-') => 1,
        _ => 0,
    };
    let integer_digits = count_digits(end);
    end += integer_digits;

    let mut fraction_digits = 0;
    if bytes.get(end) == Some(&b'.') {
        fraction_digits = count_digits(end + 1);
        if integer_digits + fraction_digits > 0 {
            end += 1 + fraction_digits;
        }
    }
    if integer_digits + fraction_digits == 0 {
        return None;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exponent_end = end + 1;
        if matches!(bytes.get(exponent_end), Some(b'+' | b'-')) {
            exponent_end += 1;
        }
        let exponent_digits = count_digits(exponent_end);
        if exponent_digits > 0 {
            end = exponent_end + exponent_digits;
        }
    }
    Some(end)
}

/// Grouped thousands, up to three fraction digits, no trailing zeros.
/// Non-finite values render as an empty string.
pub fn format_number(value: f64) -> String {
    format_grouped(value, DISPLAY_FRACTION_DIGITS)
}

/// Record and summary display: rounded to cents, then grouped.
/// Only a strictly negative value keeps its sign, so `-0.0` shows as `0`
/// while `-0.0001` shows as `-0`.
pub fn format_amount(value: f64) -> String {
    let value = if value == 0.0 { 0.0 } else { value };
    format_grouped(value, AMOUNT_FRACTION_DIGITS)
}

/// Digits rendered past the rounding position. A finite f64 large enough to
/// reach a displayed tie never lies closer than 1e-24 to it, so the digit
/// right after the rounding position is always exact.
const GUARD_DIGITS: usize = 32;

/**
 * Rounds half away from zero on the decimal expansion of `value`, then
 * groups the integer part. The sign follows `is_sign_negative`, so values
 * that round to zero from below render as `-0`.
 */
fn format_grouped(value: f64, max_fraction_digits: usize) -> String {
    if !value.is_finite() {
        return String::new();
    }
    let expanded = format!("{:.*}", max_fraction_digits + GUARD_DIGITS, value.abs());
    let (integer, fraction) = expanded
        .split_once('.')
        .unwrap_or((expanded.as_str(), ""));

    let mut digits: Vec<u8> = integer
        .bytes()
        .chain(fraction.bytes().take(max_fraction_digits))
        .collect();
    if matches!(fraction.as_bytes().get(max_fraction_digits), Some(b'5'..=b'9')) {
        round_up(&mut digits);
    }
    let split = digits.len() - max_fraction_digits;
    let (integer, fraction) = digits.split_at(split);
    let integer = String::from_utf8_lossy(integer);
    let fraction = String::from_utf8_lossy(fraction);
    let fraction = fraction.trim_end_matches('0');

    let mut output = String::with_capacity(integer.len() + integer.len() / 3 + fraction.len() + 2);
    if value.is_sign_negative() {
        output.push('-');
    }
    output.push_str(&group_thousands(&integer));
    if !fraction.is_empty() {
        output.push('.');
        output.push_str(fraction);
    }
    output
}

/// Adds one unit in the last place of an ASCII digit string.
fn round_up(digits: &mut Vec<u8>) {
    for digit in digits.iter_mut().rev() {
        if *digit == b'9' {
            *digit = b'0';
        } else {
            *digit += 1;
            return;
        }
    }
    digits.insert(0, b'1');
}

fn group_thousands(digits: &str) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (position, digit) in digits.chars().enumerate() {
        if position > 0 && (digits.len() - position) % 3 == 0 {
            grouped.push(GROUP_SEPARATOR);
        }
        grouped.push(digit);
    }
    grouped
}
