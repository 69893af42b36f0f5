use serde::{Deserialize, Serialize};

use crate::models::attributes::ElementAttributes;

/// One slide's extraction output.
///
/// `elements` is in paint order: descending z-index, shallower nodes first on ties. It never
/// contains zero-area nodes or `style`/`script`/`meta`/`link`/`path` tags, and every position is
/// relative to the slide root.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlideAttributesResult {
    pub elements: Vec<ElementAttributes>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub speaker_note: Option<String>,
}

/// All slides of one presentation, in document order.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PresentationAttributes {
    pub slides: Vec<SlideAttributesResult>,
}
