//! Fixed-width field formatting.
//!
//! Both formatters are total: oversized input is cut to the field width
//! without error, so callers validate magnitude and length beforehand.

use std::fmt::Display;

/// Uppercases `value` and left-justifies it in a space-padded field of `width`.
///
/// ```
/// use nacha_file::format::format_text;
///
/// assert_eq!(format_text("acme", 6), "ACME  ");
/// assert_eq!(format_text("overlong", 4), "OVER");
/// ```
pub fn format_text(value: &str, width: usize) -> String {
    let upper = value.to_uppercase();
    let mut field: String = upper.chars().take(width).collect();
    let len = field.chars().count();
    field.extend(std::iter::repeat(' ').take(width - len));
    field
}

/// Right-justifies a number in a zero-padded field of `width`.
///
/// Grouping and decimal punctuation (`,` and `.`) are dropped from the
/// textual form first. When the digits are wider than the field only the
/// rightmost `width` characters are kept.
///
/// ```
/// use nacha_file::format::format_number;
///
/// assert_eq!(format_number(1234.5, 10), "0000012345");
/// assert_eq!(format_number("1234567890", 9), "234567890");
/// ```
pub fn format_number<T: Display>(value: T, width: usize) -> String {
    let digits: Vec<char> = value
        .to_string()
        .chars()
        .filter(|c| *c != '.' && *c != ',')
        .collect();

    if digits.len() >= width {
        digits[digits.len() - width..].iter().collect()
    } else {
        let mut field = "0".repeat(width - digits.len());
        field.extend(digits);
        field
    }
}

/// A run of `width` spaces.
pub fn blank(width: usize) -> String {
    " ".repeat(width)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_text_pads_and_uppercases() {
        let field = format_text("acme corp", 23);
        assert_eq!(field, format!("ACME CORP{}", " ".repeat(14)));
        assert_eq!(field.len(), 23);
    }

    #[test]
    fn test_format_text_truncates() {
        assert_eq!(format_text("021000021", 8), "02100002");
        assert_eq!(format_text("", 3), "   ");
    }

    #[test]
    fn test_format_number_strips_punctuation() {
        assert_eq!(format_number(1234.5, 10), "0000012345");
        assert_eq!(format_number("1,234.56", 8), "00123456");
    }

    #[test]
    fn test_format_number_keeps_low_order_digits() {
        assert_eq!(format_number(12_345_678_901_u64, 10), "2345678901");
        assert_eq!(format_number(7, 7), "0000007");
        assert_eq!(format_number(0, 3), "000");
    }

    #[test]
    fn test_blank() {
        assert_eq!(blank(0), "");
        assert_eq!(blank(4), "    ");
    }
}
