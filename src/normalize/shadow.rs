use once_cell::sync::Lazy;
use regex::Regex;

use super::color::color_to_hex;
use super::units::parse_float;
use crate::models::Shadow;

static COLOR_FUNCTION_START: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(rgba?|hsla?)\s*\(").expect("colour function pattern is valid")
});

/// The pieces of one shadow layer, before interpretation.
#[derive(Debug, Default, PartialEq)]
struct ShadowTokens {
    numbers: Vec<f64>,
    colors: Vec<String>,
    inset: bool,
}

impl ShadowTokens {
    fn color(&self) -> Option<String> {
        if self.colors.is_empty() {
            None
        } else {
            Some(self.colors.join(" "))
        }
    }

    fn nonzero_count(&self) -> usize {
        self.numbers.iter().filter(|value| **value != 0.0).count()
    }

    fn has_visible_color(&self) -> bool {
        self.color().map_or(false, |color| {
            let value = color_to_hex(&color);
            value.hex.as_deref().map_or(false, |hex| hex != "000000") && value.opacity != Some(0.0)
        })
    }
}

/// Splits a `box-shadow` list on commas that are not inside a colour function.
fn split_layers(box_shadow: &str) -> Vec<String> {
    let mut layers = Vec::new();
    let mut current = String::new();
    let mut depth = 0i32;

    for ch in box_shadow.chars() {
        match ch {
            '(' => depth += 1,
            ')' => depth -= 1,
            ',' if depth == 0 => {
                layers.push(current.trim().to_string());
                current.clear();
                continue;
            }
            _ => {}
        }
        current.push(ch);
    }

    if !current.trim().is_empty() {
        layers.push(current.trim().to_string());
    }
    layers
}

fn parens_closed(text: &str) -> bool {
    text.matches('(').count() <= text.matches(')').count()
}

fn tokenize(layer: &str) -> ShadowTokens {
    let mut tokens = ShadowTokens::default();
    let mut pending_color: Option<String> = None;

    for part in layer.split(' ').map(str::trim).filter(|p| !p.is_empty()) {
        if let Some(mut color) = pending_color.take() {
            color.push(' ');
            color.push_str(part);
            if parens_closed(&color) {
                tokens.colors.push(color);
            } else {
                pending_color = Some(color);
            }
            continue;
        }

        if part.eq_ignore_ascii_case("inset") {
            tokens.inset = true;
            continue;
        }

        if COLOR_FUNCTION_START.is_match(part) {
            if parens_closed(part) {
                tokens.colors.push(part.to_string());
            } else {
                pending_color = Some(part.to_string());
            }
            continue;
        }

        match parse_float(part) {
            Some(value) => tokens.numbers.push(value),
            None => tokens.colors.push(part.to_string()),
        }
    }

    // unterminated colour function
    if let Some(color) = pending_color {
        tokens.colors.push(color);
    }
    tokens
}

/// Picks the most visually significant layer of a computed `box-shadow` and describes it.
///
/// A layer scores one point per nonzero length and two more for a visible (non-black,
/// non-transparent) colour; only layers with a nonzero length or a visible colour compete, and
/// the first of equally scored layers wins. With no competitor the first layer is used.
/// Returns `None` when the chosen layer lacks two offsets or a resolvable colour.
pub fn parse_box_shadow(box_shadow: &str) -> Option<Shadow> {
    if box_shadow.is_empty() || box_shadow == "none" {
        return None;
    }

    let layers = split_layers(box_shadow);
    let mut selected: Option<ShadowTokens> = None;
    let mut best_score: i64 = -1;

    for layer in &layers {
        let tokens = tokenize(layer);
        let nonzero = tokens.nonzero_count();
        let visible = tokens.has_visible_color();
        let score = nonzero as i64 + if visible { 2 } else { 0 };
        if (nonzero > 0 || visible) && score > best_score {
            best_score = score;
            selected = Some(tokens);
        }
    }

    let tokens = selected.or_else(|| layers.first().map(|layer| tokenize(layer)))?;
    if tokens.numbers.len() < 2 {
        return None;
    }

    let color = color_to_hex(&tokens.color()?);
    let hex = color.hex?;

    let offset_x = tokens.numbers[0];
    let offset_y = tokens.numbers[1];
    Some(Shadow {
        offset: Some([offset_x, offset_y]),
        color: Some(hex),
        opacity: color.opacity,
        radius: Some(tokens.numbers.get(2).copied().unwrap_or(0.0)),
        angle: Some(offset_y.atan2(offset_x).to_degrees()),
        spread: Some(tokens.numbers.get(3).copied().unwrap_or(0.0)),
        inset: Some(tokens.inset),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_ignores_commas_inside_colours() {
        let layers = split_layers("rgba(0, 0, 0, 0.1) 0px 1px 2px 0px, rgb(255, 0, 0) 1px 1px 0px 0px");
        assert_eq!(layers.len(), 2);
        assert_eq!(layers[1], "rgb(255, 0, 0) 1px 1px 0px 0px");
    }

    #[test]
    fn test_selects_visible_layer() {
        let shadow =
            parse_box_shadow("0px 0px 0px rgba(0,0,0,0), 2px 4px 6px rgba(10,20,30,0.5)").unwrap();
        assert_eq!(shadow.offset, Some([2.0, 4.0]));
        assert_eq!(shadow.radius, Some(6.0));
        assert_eq!(shadow.spread, Some(0.0));
        assert_eq!(shadow.color.as_deref(), Some("0a141e"));
        assert_eq!(shadow.opacity, Some(0.5));
        assert_eq!(shadow.inset, Some(false));
        let expected_angle = 4f64.atan2(2.0).to_degrees();
        assert!((shadow.angle.unwrap() - expected_angle).abs() < 1e-9);
    }

    #[test]
    fn test_browser_order_with_spaced_colour() {
        let shadow = parse_box_shadow("rgba(0, 0, 0, 0.25) 0px 4px 12px 2px inset").unwrap();
        assert_eq!(shadow.offset, Some([0.0, 4.0]));
        assert_eq!(shadow.radius, Some(12.0));
        assert_eq!(shadow.spread, Some(2.0));
        assert_eq!(shadow.color.as_deref(), Some("000000"));
        assert_eq!(shadow.opacity, Some(0.25));
        assert_eq!(shadow.inset, Some(true));
    }

    #[test]
    fn test_fully_transparent_layer_is_no_shadow() {
        assert_eq!(parse_box_shadow("2px 2px 4px rgba(0,0,0,0)"), None);
        assert_eq!(parse_box_shadow("rgba(0, 0, 0, 0) 2px 2px 4px 0px"), None);
    }

    #[test]
    fn test_first_layer_wins_ties() {
        let shadow = parse_box_shadow("red 1px 1px, blue 1px 1px").unwrap();
        assert_eq!(shadow.color.as_deref(), Some("ff0000"));
    }

    #[test]
    fn test_falls_back_to_first_layer() {
        let shadow = parse_box_shadow("black 0px 0px, rgb(0, 0, 0) 0px 0px").unwrap();
        assert_eq!(shadow.offset, Some([0.0, 0.0]));
        assert_eq!(shadow.color.as_deref(), Some("000000"));
    }

    #[test]
    fn test_shadow_without_colour_is_discarded() {
        assert_eq!(parse_box_shadow("2px 2px 4px"), None);
        assert_eq!(parse_box_shadow("none"), None);
        assert_eq!(parse_box_shadow("red 2px"), None);
    }
}
