use once_cell::sync::Lazy;
use regex::Regex;

use super::units::parse_float;
use crate::models::Filters;

static FILTER_FUNCTION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"([a-zA-Z-]+)\(([^)]*)\)").expect("filter function pattern is valid")
});

/// Reads the recognised functions of a computed `filter` value.
///
/// Unknown functions and arguments without a leading number are skipped; `None` when nothing
/// was recognised.
pub fn parse_filters(filter: &str) -> Option<Filters> {
    if filter.is_empty() || filter == "none" {
        return None;
    }

    let mut filters = Filters::default();
    for captures in FILTER_FUNCTION.captures_iter(filter) {
        let Some(value) = parse_float(&captures[2]) else {
            continue;
        };
        let slot = match &captures[1] {
            "invert" => &mut filters.invert,
            "brightness" => &mut filters.brightness,
            "contrast" => &mut filters.contrast,
            "saturate" => &mut filters.saturate,
            "hue-rotate" => &mut filters.hue_rotate,
            "blur" => &mut filters.blur,
            "grayscale" => &mut filters.grayscale,
            "sepia" => &mut filters.sepia,
            "opacity" => &mut filters.opacity,
            _ => continue,
        };
        *slot = Some(value);
    }

    if filters.is_empty() {
        None
    } else {
        Some(filters)
    }
}
