// Strict validation for string-transported numerics
//
// Payload numbers arrive as strings. A string is numeric only if it matches
// the strict pattern; anything else (signs, exponents, whitespace, empty) is
// treated as absent by the callers — never as zero and never as an error.
// Every aggregate goes through these two functions so the validation rule
// cannot drift between queries.

use regex::Regex;
use std::sync::LazyLock;

static DECIMAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]+(\.[0-9]+)?$").expect("decimal pattern is valid"));

static COUNT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]+$").expect("count pattern is valid"));

/// Parse a strict non-negative decimal (`^[0-9]+(\.[0-9]+)?$`)
pub fn parse_strict_decimal(s: &str) -> Option<f64> {
    if !DECIMAL.is_match(s) {
        return None;
    }
    s.parse::<f64>().ok()
}

/// Parse a strict non-negative integer (`^[0-9]+$`), used for follower counts
pub fn parse_strict_count(s: &str) -> Option<u64> {
    if !COUNT.is_match(s) {
        return None;
    }
    s.parse::<u64>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_decimals() {
        assert_eq!(parse_strict_decimal("0"), Some(0.0));
        assert_eq!(parse_strict_decimal("7"), Some(7.0));
        assert_eq!(parse_strict_decimal("10.50"), Some(10.5));
        assert_eq!(parse_strict_decimal("123.456"), Some(123.456));
    }

    #[test]
    fn test_invalid_decimals_are_absent() {
        for s in ["", "abc", "-5", "+5", "1.", ".5", "1.2.3", "1e3", " 7", "7 ", "NaN"] {
            assert_eq!(parse_strict_decimal(s), None, "{s:?} must not validate");
        }
    }

    #[test]
    fn test_valid_counts() {
        assert_eq!(parse_strict_count("0"), Some(0));
        assert_eq!(parse_strict_count("1000"), Some(1000));
    }

    #[test]
    fn test_invalid_counts_are_absent() {
        for s in ["", "not-a-number", "-1", "10.5", "1e3", " 3"] {
            assert_eq!(parse_strict_count(s), None, "{s:?} must not validate");
        }
    }
}
