//! Character-class, length and checksum validators for record fields.
//!
//! All character classes are ASCII, and the empty string never passes a
//! class check.

/// Weights applied to each group of three routing digits.
const ROUTING_WEIGHTS: [u32; 3] = [3, 7, 1];

fn class_check(value: &str, max_len: usize, class: impl Fn(char) -> bool) -> bool {
    !value.is_empty() && value.len() <= max_len && value.chars().all(class)
}

/// Only decimal digits, at most `max_len` of them.
pub fn numeric_only(value: &str, max_len: usize) -> bool {
    class_check(value, max_len, |c| c.is_ascii_digit())
}

/// Only printable characters (space included), at most `max_len`.
pub fn alphameric_only(value: &str, max_len: usize) -> bool {
    class_check(value, max_len, |c| c == ' ' || c.is_ascii_graphic())
}

/// Only letters and digits, at most `max_len`.
pub fn alpha_numeric_only(value: &str, max_len: usize) -> bool {
    class_check(value, max_len, |c| c.is_ascii_alphanumeric())
}

/// Only letters, at most `max_len`.
pub fn alpha_only(value: &str, max_len: usize) -> bool {
    class_check(value, max_len, |c| c.is_ascii_alphabetic())
}

/// Rejects a decimal whose third or later fractional digit is nonzero.
///
/// Over-precision made only of zeros is accepted: `1.2300` passes while
/// `1.235` and `1.2301` do not. Anything without a fractional part passes.
pub fn valid_decimal(value: &str) -> bool {
    match value.trim().split_once('.') {
        Some((_, fraction)) => {
            let digits: Vec<char> = fraction.chars().collect();
            let all_digits = digits.iter().all(|c| c.is_ascii_digit());
            !(all_digits && digits.len() > 2 && digits[2..].iter().any(|c| *c != '0'))
        }
        None => true,
    }
}

fn weighted_sum(digits: &[u32]) -> u32 {
    digits
        .iter()
        .zip(ROUTING_WEIGHTS.iter().cycle())
        .map(|(d, w)| d * w)
        .sum()
}

fn to_digits(value: &str) -> Vec<u32> {
    value.chars().filter_map(|c| c.to_digit(10)).collect()
}

/// Nine digits whose 3-7-1 weighted sum is nonzero and divisible by 10.
///
/// ```
/// use nacha_file::validate::valid_routing_number;
///
/// assert!(valid_routing_number("021000021"));
/// assert!(!valid_routing_number("123456789"));
/// ```
pub fn valid_routing_number(value: &str) -> bool {
    if value.len() != 9 || !numeric_only(value, 9) {
        return false;
    }
    let sum = weighted_sum(&to_digits(value));
    sum != 0 && sum % 10 == 0
}

/// Computes the ninth digit that completes an 8-digit routing prefix.
///
/// Returns `None` unless `prefix` is exactly 8 digits.
pub fn routing_check_digit(prefix: &str) -> Option<u32> {
    if prefix.len() != 8 || !numeric_only(prefix, 8) {
        return None;
    }
    let sum = weighted_sum(&to_digits(prefix));
    Some((10 - sum % 10) % 10)
}
