//! Shared format checks for values that arrive over the wire.

use once_cell::sync::Lazy;
use regex::Regex;

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9+_.-]+@[A-Za-z0-9.-]+$").expect("email pattern compiles")
});

static PIB_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]{9}$").expect("pib pattern compiles"));

/// True when `s` has the `local@domain` shape accepted for contact addresses.
pub fn is_valid_email(s: &str) -> bool {
    EMAIL_RE.is_match(s)
}

/// True when `s` is a tax identification number of exactly nine ASCII digits.
pub fn is_valid_pib(s: &str) -> bool {
    PIB_RE.is_match(s)
}

/// True when the string is empty or only whitespace.
pub fn is_blank(s: &str) -> bool {
    s.trim().is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_shapes() {
        assert!(is_valid_email("ana@vrtic.rs"));
        assert!(is_valid_email("a.b+c@x"));
        assert!(!is_valid_email("no-at-sign"));
        assert!(!is_valid_email("two@@signs.rs"));
        assert!(!is_valid_email("space in@x.rs"));
    }

    #[test]
    fn pib_requires_nine_digits() {
        assert!(is_valid_pib("123456789"));
        assert!(!is_valid_pib("12345678"));
        assert!(!is_valid_pib("1234567890"));
        assert!(!is_valid_pib("12345678a"));
        // Unicode digits from other scripts are not accepted
        assert!(!is_valid_pib("١٢٣٤٥٦٧٨٩"));
        assert!(!is_valid_pib("１２３４５６７８９"));
    }

    #[test]
    fn blank_detection() {
        assert!(is_blank(""));
        assert!(is_blank("   "));
        assert!(!is_blank(" x "));
    }
}
