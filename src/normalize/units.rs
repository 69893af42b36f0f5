//! Numeric reads of computed-style strings.
//!
//! Computed values carry units (`"12px"`, `"90deg"`) or keywords (`"auto"`, `"normal"`). These
//! helpers read the longest numeric prefix the same way the browser's `parseFloat`/`parseInt` do,
//! returning `None` where those would yield `NaN`.

use once_cell::sync::Lazy;
use regex::Regex;

static FLOAT_PREFIX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[+-]?(?:Infinity|(?:\d+\.?\d*|\.\d+)(?:[eE][+-]?\d+)?)")
        .expect("float prefix pattern is valid")
});

static INT_PREFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[+-]?\d+").expect("int prefix pattern is valid"));

pub fn parse_float(value: &str) -> Option<f64> {
    let matched = FLOAT_PREFIX.find(value.trim_start())?.as_str();
    match matched.trim_start_matches(['+', '-']) {
        "Infinity" if matched.starts_with('-') => Some(f64::NEG_INFINITY),
        "Infinity" => Some(f64::INFINITY),
        _ => matched.parse::<f64>().ok(),
    }
}

pub fn parse_int(value: &str) -> Option<i64> {
    INT_PREFIX
        .find(value.trim_start())
        .and_then(|m| m.as_str().parse::<i64>().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_float_reads_numeric_prefix() {
        assert_eq!(parse_float("12px"), Some(12.0));
        assert_eq!(parse_float("  -1.5em"), Some(-1.5));
        assert_eq!(parse_float(".5"), Some(0.5));
        assert_eq!(parse_float("1e2px"), Some(100.0));
        assert_eq!(parse_float("normal"), None);
        assert_eq!(parse_float(""), None);
        assert_eq!(parse_float("Infinity"), Some(f64::INFINITY));
    }

    #[test]
    fn test_parse_int_truncates() {
        assert_eq!(parse_int("400"), Some(400));
        assert_eq!(parse_int("1.9"), Some(1));
        assert_eq!(parse_int("-3"), Some(-3));
        assert_eq!(parse_int("auto"), None);
    }
}
