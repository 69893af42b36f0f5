//! Resolves one DOM node's computed style into an [`ElementAttributes`] record.
//!
//! Everything here is a pure function of a [`NodeSnapshot`]; nothing touches the browser.

use once_cell::sync::Lazy;
use regex::Regex;

use super::constants::{LINE_HEIGHT_FACTOR, REPLACED_TAGS};
use crate::models::{
    Background, Border, ComputedStyle, ElementAttributes, Font, NodeSnapshot, ObjectFit, Position,
    RawRect, Shape, Spacing, TextAlign,
};
use crate::normalize::{color_to_hex, parse_box_shadow, parse_filters, parse_float, parse_int};

static BACKGROUND_URL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"url\(['"]?([^'"]+)['"]?\)"#).expect("background url pattern is valid")
});

// --- Geometry ---

fn finite_or_zero(value: Option<f64>) -> f64 {
    value.filter(|v| v.is_finite()).unwrap_or(0.0)
}

pub fn parse_position(rect: &RawRect) -> Position {
    Position {
        left: finite_or_zero(rect.left),
        top: finite_or_zero(rect.top),
        width: finite_or_zero(rect.width),
        height: finite_or_zero(rect.height),
    }
}

/// Expands a computed `border-radius` shorthand to four corners and clamps it to `position`.
///
/// The expansion follows CSS corner mirroring: `a` → `a a a a`, `a b` → `a b a b`,
/// `a b c` → `a b c b`. Elliptical or otherwise unparseable values yield `None`.
pub fn parse_border_radius(border_radius: &str, position: &Position) -> Option<[f64; 4]> {
    let border_radius = border_radius.trim();
    if border_radius.is_empty() || border_radius == "0px" {
        return None;
    }

    let parts = border_radius
        .split_whitespace()
        .map(parse_float)
        .collect::<Option<Vec<f64>>>()?;

    let radii = match parts.as_slice() {
        [a] => [*a, *a, *a, *a],
        [a, b] => [*a, *b, *a, *b],
        [a, b, c] => [*a, *b, *c, *b],
        [a, b, c, d] => [*a, *b, *c, *d],
        _ => return None,
    };

    Some(clamp_border_radius(radii, position.width, position.height))
}

/// Clamps each corner into `[0, width / 2]` (top-left, bottom-right) or `[0, height / 2]`
/// (top-right, bottom-left).
pub fn clamp_border_radius(radii: [f64; 4], width: f64, height: f64) -> [f64; 4] {
    let max_x = (width / 2.0).max(0.0);
    let max_y = (height / 2.0).max(0.0);

    let mut clamped = radii;
    for (index, radius) in clamped.iter_mut().enumerate() {
        let max = if index % 2 == 0 { max_x } else { max_y };
        *radius = radius.min(max).max(0.0);
    }
    clamped
}

/// Images whose four corners are all exactly 50 are exported as circles.
pub fn parse_shape(tag_name: &str, border_radius: Option<&[f64; 4]>) -> Option<Shape> {
    if tag_name != "img" {
        return None;
    }
    match border_radius {
        Some(radii) if radii.iter().all(|radius| *radius == 50.0) => Some(Shape::Circle),
        _ => Some(Shape::Rectangle),
    }
}

// --- Paint ---

pub fn parse_background(style: &ComputedStyle) -> Option<Background> {
    let color = color_to_hex(&style.background_color);
    if color.is_absent() {
        return None;
    }
    Some(Background {
        color: color.hex,
        opacity: color.opacity,
    })
}

pub fn parse_background_image(style: &ComputedStyle) -> Option<String> {
    if style.background_image.is_empty() || style.background_image == "none" {
        return None;
    }
    BACKGROUND_URL
        .captures(&style.background_image)
        .map(|captures| captures[1].to_string())
}

/// A zero-width border carries no visual signal, whatever its colour.
pub fn parse_border(style: &ComputedStyle) -> Option<Border> {
    let width = parse_float(&style.border_width);
    if width == Some(0.0) {
        return None;
    }

    let color = color_to_hex(&style.border_color);
    if color.is_absent() && width.is_none() {
        return None;
    }
    Some(Border {
        color: color.hex,
        width,
        opacity: color.opacity,
    })
}

// --- Text ---

pub fn parse_font(style: &ComputedStyle) -> Option<Font> {
    let name = if style.font_family == "initial" {
        None
    } else {
        style
            .font_family
            .split(',')
            .next()
            .map(|family| family.trim().replace(['\'', '"'], ""))
            .filter(|family| !family.is_empty())
    };

    let italic = style.font_style == "italic";
    let font = Font {
        name,
        size: parse_float(&style.font_size),
        weight: parse_int(&style.font_weight),
        color: color_to_hex(&style.color).hex,
        italic: Some(italic),
    };

    if font.name.is_none()
        && font.size.is_none()
        && font.weight.is_none()
        && font.color.is_none()
        && !italic
    {
        return None;
    }
    Some(font)
}

/// A node is multiline when its text has explicit breaks, its box is taller than two estimated
/// lines, or its content overflows vertically.
pub fn is_multiline(snapshot: &NodeSnapshot) -> bool {
    let text = snapshot.text_content.as_deref().unwrap_or_default();
    let has_line_breaks = text.contains('\n') || text.contains('\r');

    let single_line_height = parse_float(&snapshot.style.line_height)
        .or_else(|| parse_float(&snapshot.style.font_size).map(|size| size * LINE_HEIGHT_FACTOR));
    let wraps = single_line_height.map_or(false, |line| snapshot.offset_height > line * 2.0);

    let overflows = snapshot.scroll_height > snapshot.client_height;

    has_line_breaks || wraps || overflows
}

/// Single-line nodes never report a line height, so the renderer keeps natural sizing.
pub fn parse_line_height(snapshot: &NodeSnapshot) -> Option<f64> {
    let line_height = snapshot.style.line_height.as_str();
    if line_height.is_empty() || line_height == "normal" || !is_multiline(snapshot) {
        return None;
    }
    parse_float(line_height)
}

pub fn parse_text_align(style: &ComputedStyle) -> Option<TextAlign> {
    match style.text_align.as_str() {
        "center" => Some(TextAlign::Center),
        "right" | "end" => Some(TextAlign::Right),
        "justify" => Some(TextAlign::Justify),
        _ => None,
    }
}

fn inner_text(snapshot: &NodeSnapshot) -> Option<String> {
    if !snapshot.has_only_text_nodes {
        return None;
    }
    snapshot
        .text_content
        .clone()
        .filter(|text| !text.is_empty())
}

// --- Box model ---

/// Reports per-side lengths unless all four are exactly zero.
pub fn parse_spacing(top: &str, bottom: &str, left: &str, right: &str) -> Option<Spacing> {
    let spacing = Spacing {
        top: parse_float(top),
        bottom: parse_float(bottom),
        left: parse_float(left),
        right: parse_float(right),
    };
    let zero = Some(0.0);
    if spacing.top == zero && spacing.bottom == zero && spacing.left == zero && spacing.right == zero
    {
        return None;
    }
    Some(spacing)
}

pub fn parse_object_fit(tag_name: &str, style: &ComputedStyle) -> Option<ObjectFit> {
    if !REPLACED_TAGS.contains(&tag_name) {
        return None;
    }
    match style.object_fit.as_str() {
        "contain" => Some(ObjectFit::Contain),
        "cover" => Some(ObjectFit::Cover),
        "fill" => Some(ObjectFit::Fill),
        _ => None,
    }
}

// --- Entry point ---

/// Builds the attribute record for one node. Nodes are never marked for screenshot here; the
/// tree walker decides that.
pub fn extract_attributes(snapshot: &NodeSnapshot) -> ElementAttributes {
    let style = &snapshot.style;
    let tag_name = snapshot.tag_name.to_lowercase();
    let position = parse_position(&snapshot.rect);
    let border_radius = parse_border_radius(&style.border_radius, &position);

    let image_src = snapshot
        .src
        .clone()
        .filter(|src| !src.is_empty())
        .or_else(|| parse_background_image(style));

    ElementAttributes {
        id: snapshot.id.clone().filter(|id| !id.is_empty()),
        class_name: snapshot.class_name.clone().filter(|class| !class.is_empty()),
        inner_text: inner_text(snapshot),
        opacity: parse_float(&style.opacity),
        background: parse_background(style),
        border: parse_border(style),
        shadow: parse_box_shadow(&style.box_shadow),
        font: parse_font(style),
        position,
        margin: parse_spacing(
            &style.margin_top,
            &style.margin_bottom,
            &style.margin_left,
            &style.margin_right,
        ),
        padding: parse_spacing(
            &style.padding_top,
            &style.padding_bottom,
            &style.padding_left,
            &style.padding_right,
        ),
        z_index: parse_int(&style.z_index).unwrap_or(0),
        text_align: parse_text_align(style),
        line_height: parse_line_height(snapshot),
        shape: parse_shape(&tag_name, border_radius.as_ref()),
        border_radius,
        image_src,
        object_fit: parse_object_fit(&tag_name, style),
        text_wrap: style.white_space != "nowrap",
        filters: parse_filters(&style.filter),
        should_screenshot: false,
        tag_name,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn position(width: f64, height: f64) -> Position {
        Position {
            left: 0.0,
            top: 0.0,
            width,
            height,
        }
    }

    fn snapshot(tag: &str) -> NodeSnapshot {
        NodeSnapshot {
            tag_name: tag.to_uppercase(),
            rect: RawRect {
                left: Some(10.0),
                top: Some(20.0),
                width: Some(200.0),
                height: Some(100.0),
            },
            has_only_text_nodes: true,
            style: ComputedStyle {
                font_family: "\"Inter\", sans-serif".to_string(),
                font_size: "16px".to_string(),
                font_weight: "400".to_string(),
                font_style: "normal".to_string(),
                color: "rgb(0, 0, 0)".to_string(),
                background_color: "rgba(0, 0, 0, 0)".to_string(),
                border_width: "0px".to_string(),
                border_color: "rgb(0, 0, 0)".to_string(),
                border_radius: "0px".to_string(),
                box_shadow: "none".to_string(),
                filter: "none".to_string(),
                line_height: "normal".to_string(),
                margin_top: "0px".to_string(),
                margin_bottom: "0px".to_string(),
                margin_left: "0px".to_string(),
                margin_right: "0px".to_string(),
                padding_top: "0px".to_string(),
                padding_bottom: "0px".to_string(),
                padding_left: "0px".to_string(),
                padding_right: "0px".to_string(),
                z_index: "auto".to_string(),
                text_align: "start".to_string(),
                object_fit: "fill".to_string(),
                white_space: "normal".to_string(),
                opacity: "1".to_string(),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    #[test]
    fn test_defaults_are_absent() {
        let attrs = extract_attributes(&snapshot("div"));
        assert_eq!(attrs.tag_name, "div");
        assert_eq!(attrs.background, None);
        assert_eq!(attrs.border, None);
        assert_eq!(attrs.shadow, None);
        assert_eq!(attrs.margin, None);
        assert_eq!(attrs.padding, None);
        assert_eq!(attrs.text_align, None);
        assert_eq!(attrs.line_height, None);
        assert_eq!(attrs.border_radius, None);
        assert_eq!(attrs.object_fit, None);
        assert_eq!(attrs.shape, None);
        assert_eq!(attrs.z_index, 0);
        assert_eq!(attrs.opacity, Some(1.0));
        assert!(attrs.text_wrap);
        assert!(!attrs.should_screenshot);
        assert_eq!(
            attrs.position,
            Position {
                left: 10.0,
                top: 20.0,
                width: 200.0,
                height: 100.0
            }
        );
    }

    #[test]
    fn test_font_strips_quotes_and_reads_numbers() {
        let font = extract_attributes(&snapshot("p")).font.unwrap();
        assert_eq!(font.name.as_deref(), Some("Inter"));
        assert_eq!(font.size, Some(16.0));
        assert_eq!(font.weight, Some(400));
        assert_eq!(font.color.as_deref(), Some("000000"));
        assert_eq!(font.italic, Some(false));
    }

    #[test]
    fn test_initial_font_family_has_no_name() {
        let mut node = snapshot("p");
        node.style.font_family = "initial".to_string();
        assert_eq!(extract_attributes(&node).font.unwrap().name, None);
    }

    #[test]
    fn test_non_finite_rect_is_zero() {
        let mut node = snapshot("div");
        node.rect.width = None;
        node.rect.left = Some(f64::INFINITY);
        let attrs = extract_attributes(&node);
        assert_eq!(attrs.position.width, 0.0);
        assert_eq!(attrs.position.left, 0.0);
        assert!(!attrs.position.has_area());
    }

    #[test]
    fn test_zero_width_border_is_absent_even_with_colour() {
        let mut node = snapshot("div");
        node.style.border_color = "rgb(255, 0, 0)".to_string();
        assert_eq!(extract_attributes(&node).border, None);

        node.style.border_width = "2px".to_string();
        let border = extract_attributes(&node).border.unwrap();
        assert_eq!(border.width, Some(2.0));
        assert_eq!(border.color.as_deref(), Some("ff0000"));
    }

    #[test]
    fn test_background_and_image_url() {
        let mut node = snapshot("div");
        node.style.background_color = "rgba(255, 255, 255, 0.8)".to_string();
        node.style.background_image = "url(\"https://cdn.example/bg.png\")".to_string();
        let attrs = extract_attributes(&node);
        let background = attrs.background.unwrap();
        assert_eq!(background.color.as_deref(), Some("ffffff"));
        assert_eq!(background.opacity, Some(0.8));
        assert_eq!(attrs.image_src.as_deref(), Some("https://cdn.example/bg.png"));
    }

    #[test]
    fn test_img_src_wins_over_background_image() {
        let mut node = snapshot("img");
        node.src = Some("https://cdn.example/photo.jpg".to_string());
        node.style.background_image = "url(other.png)".to_string();
        node.style.object_fit = "cover".to_string();
        let attrs = extract_attributes(&node);
        assert_eq!(attrs.image_src.as_deref(), Some("https://cdn.example/photo.jpg"));
        assert_eq!(attrs.object_fit, Some(ObjectFit::Cover));
        assert_eq!(attrs.shape, Some(Shape::Rectangle));
    }

    #[test]
    fn test_border_radius_expansion() {
        let pos = position(400.0, 400.0);
        assert_eq!(parse_border_radius("8px", &pos), Some([8.0; 4]));
        assert_eq!(
            parse_border_radius("1px 2px", &pos),
            Some([1.0, 2.0, 1.0, 2.0])
        );
        assert_eq!(
            parse_border_radius("1px 2px 3px", &pos),
            Some([1.0, 2.0, 3.0, 2.0])
        );
        assert_eq!(
            parse_border_radius("1px 2px 3px 4px", &pos),
            Some([1.0, 2.0, 3.0, 4.0])
        );
        assert_eq!(parse_border_radius("0px", &pos), None);
        assert_eq!(parse_border_radius("10px / 5px", &pos), None);
    }

    #[test]
    fn test_border_radius_clamped_to_half_box() {
        let radii = parse_border_radius("100px", &position(60.0, 20.0)).unwrap();
        assert_eq!(radii, [30.0, 10.0, 30.0, 10.0]);
        for (index, radius) in radii.iter().enumerate() {
            let limit = if index % 2 == 0 { 30.0 } else { 10.0 };
            assert!(*radius >= 0.0 && *radius <= limit);
        }
        assert_eq!(clamp_border_radius([-4.0, 1.0, 1.0, 1.0], 10.0, 10.0)[0], 0.0);
    }

    #[test]
    fn test_circle_shape_requires_exactly_fifty() {
        let mut node = snapshot("img");
        node.style.border_radius = "50px 50px 50px 50px".to_string();
        assert_eq!(extract_attributes(&node).shape, Some(Shape::Circle));

        node.style.border_radius = "50px 50px 49px 50px".to_string();
        assert_eq!(extract_attributes(&node).shape, Some(Shape::Rectangle));

        node.tag_name = "div".to_string();
        assert_eq!(extract_attributes(&node).shape, None);
    }

    #[test]
    fn test_line_height_only_for_multiline() {
        let mut node = snapshot("p");
        node.style.line_height = "24px".to_string();
        node.offset_height = 24.0;
        node.text_content = Some("one line".to_string());
        assert_eq!(extract_attributes(&node).line_height, None);

        node.offset_height = 72.0;
        assert_eq!(extract_attributes(&node).line_height, Some(24.0));

        node.offset_height = 24.0;
        node.text_content = Some("first\nsecond".to_string());
        assert_eq!(extract_attributes(&node).line_height, Some(24.0));

        node.text_content = Some("overflowing".to_string());
        node.scroll_height = 48.0;
        node.client_height = 24.0;
        assert_eq!(extract_attributes(&node).line_height, Some(24.0));
    }

    #[test]
    fn test_multiline_estimate_uses_font_size_when_line_height_is_normal() {
        let mut node = snapshot("p");
        node.offset_height = 40.0;
        assert!(is_multiline(&node));
        node.offset_height = 38.0;
        assert!(!is_multiline(&node));
    }

    #[test]
    fn test_spacing_reported_when_any_side_is_set() {
        let mut node = snapshot("div");
        node.style.padding_left = "12px".to_string();
        let padding = extract_attributes(&node).padding.unwrap();
        assert_eq!(padding.left, Some(12.0));
        assert_eq!(padding.top, Some(0.0));
    }

    #[test]
    fn test_inner_text_requires_text_only_children() {
        let mut node = snapshot("span");
        node.text_content = Some("Hello".to_string());
        assert_eq!(extract_attributes(&node).inner_text.as_deref(), Some("Hello"));
        node.has_only_text_nodes = false;
        assert_eq!(extract_attributes(&node).inner_text, None);
    }

    #[test]
    fn test_misc_style_fields() {
        let mut node = snapshot("div");
        node.style.text_align = "center".to_string();
        node.style.z_index = "5".to_string();
        node.style.white_space = "nowrap".to_string();
        node.style.filter = "grayscale(1)".to_string();
        node.style.opacity = "0.4".to_string();
        let attrs = extract_attributes(&node);
        assert_eq!(attrs.text_align, Some(TextAlign::Center));
        assert_eq!(attrs.z_index, 5);
        assert!(!attrs.text_wrap);
        assert_eq!(attrs.filters.unwrap().grayscale, Some(1.0));
        assert_eq!(attrs.opacity, Some(0.4));
    }
}
