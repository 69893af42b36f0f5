use once_cell::sync::Lazy;
use regex::Regex;

use super::units::parse_float;

/// A CSS colour reduced to a 6-digit lowercase hex string (no `#`) plus an optional alpha.
///
/// Both fields are `None` for fully transparent input, which callers treat as "no colour"
/// rather than black.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ColorValue {
    pub hex: Option<String>,
    pub opacity: Option<f64>,
}

impl ColorValue {
    pub fn is_absent(&self) -> bool {
        self.hex.is_none() && self.opacity.is_none()
    }
}

static ALPHA_FUNCTION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"rgba?\(([^)]+)\)|hsla?\(([^)]+)\)").expect("alpha colour pattern is valid")
});

/// Converts a computed CSS colour string into hex plus opacity.
///
/// `rgba()`/`hsla()` keep their alpha as `opacity` and resolve the remaining channels as the
/// opaque `rgb()`/`hsl()` equivalent. `#hex` passes through unchanged. Anything else goes through
/// a full CSS colour parse; strings that do not parse yield an absent colour.
pub fn color_to_hex(color: &str) -> ColorValue {
    if color.is_empty() || color == "transparent" {
        return ColorValue::default();
    }

    if color.starts_with("rgba(") || color.starts_with("hsla(") {
        if let Some(value) = split_alpha(color) {
            return value;
        }
    }

    if color.starts_with("rgb(") || color.starts_with("hsl(") {
        return ColorValue {
            hex: canonical_hex(color),
            opacity: None,
        };
    }

    if let Some(hex) = color.strip_prefix('#') {
        return ColorValue {
            hex: Some(hex.to_string()),
            opacity: None,
        };
    }

    ColorValue {
        hex: canonical_hex(color),
        opacity: None,
    }
}

/// Resolves a four-component colour function. Returns `None` when fewer than four components
/// are present so the caller can fall back to a plain parse. A zero alpha is absent, whatever
/// the channels.
fn split_alpha(color: &str) -> Option<ColorValue> {
    let captures = ALPHA_FUNCTION.captures(color)?;
    let values = captures.get(1).or_else(|| captures.get(2))?.as_str();
    let parts: Vec<&str> = values.split(',').map(str::trim).collect();
    if parts.len() < 4 {
        return None;
    }

    let opacity = parse_float(parts[3]).filter(|alpha| alpha.is_finite());
    if opacity == Some(0.0) {
        return Some(ColorValue::default());
    }

    let function = if color.starts_with("rgba") { "rgb" } else { "hsl" };
    let opaque = format!("{}({})", function, parts[..3].join(","));
    Some(ColorValue {
        hex: canonical_hex(&opaque),
        opacity,
    })
}

fn canonical_hex(color: &str) -> Option<String> {
    match csscolorparser::parse(color) {
        Ok(parsed) => {
            let [r, g, b, _] = parsed.to_rgba8();
            Some(format!("{:02x}{:02x}{:02x}", r, g, b))
        }
        Err(err) => {
            log::debug!("Unparseable colour '{}': {}", color, err);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transparent_is_absent() {
        assert!(color_to_hex("rgba(0, 0, 0, 0)").is_absent());
        assert!(color_to_hex("rgba(0,0,0,0)").is_absent());
        assert!(color_to_hex("rgba(255, 255, 255, 0)").is_absent());
        assert!(color_to_hex("hsla(120, 50%, 50%, 0.0)").is_absent());
        assert!(color_to_hex("transparent").is_absent());
        assert!(color_to_hex("").is_absent());
    }

    #[test]
    fn test_opaque_rgb() {
        assert_eq!(
            color_to_hex("rgb(255, 0, 0)"),
            ColorValue {
                hex: Some("ff0000".to_string()),
                opacity: None
            }
        );
    }

    #[test]
    fn test_rgba_keeps_alpha() {
        let value = color_to_hex("rgba(10, 20, 30, 0.5)");
        assert_eq!(value.hex.as_deref(), Some("0a141e"));
        assert_eq!(value.opacity, Some(0.5));
    }

    #[test]
    fn test_hsla_resolves_through_hsl() {
        let value = color_to_hex("hsla(0, 100%, 50%, 0.25)");
        assert_eq!(value.hex.as_deref(), Some("ff0000"));
        assert_eq!(value.opacity, Some(0.25));
    }

    #[test]
    fn test_unparseable_alpha_is_absent() {
        let value = color_to_hex("rgba(0, 0, 255, oops)");
        assert_eq!(value.hex.as_deref(), Some("0000ff"));
        assert_eq!(value.opacity, None);
    }

    #[test]
    fn test_hex_passthrough_and_keywords() {
        assert_eq!(color_to_hex("#ABCDEF").hex.as_deref(), Some("ABCDEF"));
        assert_eq!(color_to_hex("white").hex.as_deref(), Some("ffffff"));
        assert!(color_to_hex("not-a-colour").is_absent());
    }

    #[test]
    fn test_conversion_is_idempotent() {
        for input in ["rgb(1, 2, 3)", "rgba(200, 100, 50, 0.3)", "navy", "#123456"] {
            assert_eq!(color_to_hex(input), color_to_hex(input));
        }
    }
}
