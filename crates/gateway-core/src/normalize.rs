//! # Input Normalization
//!
//! Pure helpers applied to raw operator input as it is typed. Display
//! formatting (card number grouping) is cosmetic and is stripped again before
//! anything is validated or forwarded.

/// Keep ASCII digits only, at most `max` of them
pub fn digits_only(raw: &str, max: usize) -> String {
    raw.chars().filter(char::is_ascii_digit).take(max).collect()
}

/// Group digits in blocks of four separated by a single space
///
/// `"4111111111111111"` → `"4111 1111 1111 1111"`
pub fn group_digits(digits: &str) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 4);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && i % 4 == 0 {
            grouped.push(' ');
        }
        grouped.push(c);
    }
    grouped
}

/// Strip whitespace separators from a displayed value
pub fn strip_spaces(display: &str) -> String {
    display.chars().filter(|c| !c.is_whitespace()).collect()
}

/// True when non-empty and made of ASCII digits only
pub fn is_all_digits(value: &str) -> bool {
    !value.is_empty() && value.bytes().all(|b| b.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_digits_only() {
        assert_eq!(digits_only("12a34b56", 6), "123456");
        assert_eq!(digits_only("4111-1111-1111-1111-9999", 16), "4111111111111111");
        assert_eq!(digits_only("abc", 4), "");
        assert_eq!(digits_only("٣٤٥", 4), "");
    }

    #[test]
    fn test_group_digits() {
        assert_eq!(group_digits("4111111111111111"), "4111 1111 1111 1111");
        assert_eq!(group_digits("41111"), "4111 1");
        assert_eq!(group_digits("4111"), "4111");
        assert_eq!(group_digits(""), "");
    }

    #[test]
    fn test_strip_spaces() {
        assert_eq!(strip_spaces("4111 1111 1111 1111"), "4111111111111111");
    }

    #[test]
    fn test_is_all_digits() {
        assert!(is_all_digits("0612"));
        assert!(!is_all_digits(""));
        assert!(!is_all_digits("12a"));
    }
}
