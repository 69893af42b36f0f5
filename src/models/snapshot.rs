//! Raw, uninterpreted data read from one live DOM node.
//!
//! The browser side only collects strings and numbers; all CSS interpretation happens in
//! [`crate::extractor::attributes`].

use serde::{Deserialize, Serialize};

/// `getBoundingClientRect()` values. Non-finite numbers arrive as `null`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RawRect {
    pub left: Option<f64>,
    pub top: Option<f64>,
    pub width: Option<f64>,
    pub height: Option<f64>,
}

/// The subset of `getComputedStyle()` the extractor reads, as the browser reports it.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ComputedStyle {
    pub color: String,
    pub background_color: String,
    pub background_image: String,
    pub border_color: String,
    pub border_width: String,
    pub border_radius: String,
    pub box_shadow: String,
    pub filter: String,
    pub font_family: String,
    pub font_size: String,
    pub font_weight: String,
    pub font_style: String,
    pub line_height: String,
    pub margin_top: String,
    pub margin_bottom: String,
    pub margin_left: String,
    pub margin_right: String,
    pub padding_top: String,
    pub padding_bottom: String,
    pub padding_left: String,
    pub padding_right: String,
    pub z_index: String,
    pub text_align: String,
    pub object_fit: String,
    pub white_space: String,
    pub opacity: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NodeSnapshot {
    pub tag_name: String,
    pub id: Option<String>,
    pub class_name: Option<String>,
    pub rect: RawRect,
    pub text_content: Option<String>,
    /// No child of the node is an element node.
    pub has_only_text_nodes: bool,
    /// The node's `src` property, when it has a string one (`img`, `video`, `iframe`).
    pub src: Option<String>,
    pub offset_height: f64,
    pub scroll_height: f64,
    pub client_height: f64,
    pub style: ComputedStyle,
}
