//! Walks a slide's DOM and turns it into a flat, ordered list of positioned elements.
//!
//! Each level of the recursion receives an immutable [`InheritedContext`] from its parent and
//! returns its own results; the slide root then infers the background, drops structural
//! wrappers and orders everything for painting.

use futures::future::{BoxFuture, FutureExt};
use log::{debug, info};

use super::attributes::{clamp_border_radius, extract_attributes};
use super::constants::{
    DEFAULT_SLIDE_HEIGHT, DEFAULT_SLIDE_WIDTH, IGNORED_TAGS, INLINE_FORMATTING_TAGS,
};
use crate::dom::DomNode;
use crate::errors::Result;
use crate::models::{Background, ElementAttributes, Font, Position};

/// A walked node, with its handle kept while it still has to be rasterized.
#[derive(Debug)]
pub struct WalkedElement<N> {
    pub attributes: ElementAttributes,
    /// Nesting level below the slide root, 0 for its direct children. Every level counts, so
    /// among equal z-indexes a grandchild is listed after any child, even one visited later.
    pub depth: usize,
    pub handle: Option<N>,
}

/// A slide after the tree walk, before rasterization.
#[derive(Debug)]
pub struct WalkedSlide<N> {
    pub elements: Vec<WalkedElement<N>>,
    pub background_color: Option<String>,
}

/// Visual values an ancestor hands down to descendants that do not set their own.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InheritedContext {
    pub font: Option<Font>,
    pub background: Option<Background>,
    pub border_radius: Option<[f64; 4]>,
    pub z_index: Option<i64>,
    pub opacity: Option<f64>,
}

impl InheritedContext {
    /// Seeds the context from the slide root. Border radius is not inherited from the root.
    pub fn from_root(root: &ElementAttributes) -> Self {
        InheritedContext {
            font: root.font.clone(),
            background: root.background.clone(),
            border_radius: None,
            z_index: Some(root.z_index),
            opacity: root.opacity,
        }
    }

    /// Fills in what `attributes` leaves unset.
    ///
    /// Fonts only reach nodes with visible text. Backgrounds only reach nodes that have a
    /// shadow but no background of their own. Inherited radii are re-clamped to the node's box.
    pub fn apply(&self, attributes: &mut ElementAttributes) {
        if attributes.font.is_none() && attributes.has_text() {
            attributes.font = self.font.clone();
        }
        if attributes.background.is_none() && attributes.shadow.is_some() {
            attributes.background = self.background.clone();
        }
        if attributes.border_radius.is_none() {
            attributes.border_radius = self.border_radius.map(|radii| {
                clamp_border_radius(radii, attributes.position.width, attributes.position.height)
            });
        }
        if attributes.z_index == 0 {
            if let Some(z_index) = self.z_index {
                attributes.z_index = z_index;
            }
        }
        if attributes.opacity.map_or(true, |opacity| opacity == 1.0) && self.opacity.is_some() {
            attributes.opacity = self.opacity;
        }
    }

    /// The context for the children of a node with the given (already inherited) attributes.
    pub fn descend(&self, attributes: &ElementAttributes) -> Self {
        InheritedContext {
            font: attributes.font.clone().or_else(|| self.font.clone()),
            background: attributes
                .background
                .clone()
                .or_else(|| self.background.clone()),
            border_radius: attributes.border_radius.or(self.border_radius),
            z_index: if attributes.z_index != 0 {
                Some(attributes.z_index)
            } else {
                self.z_index
            },
            opacity: attributes.opacity.or(self.opacity),
        }
    }
}

/// The slide rectangle, falling back to the default slide size when the root has no extent.
fn slide_rect(root: &Position) -> Position {
    Position {
        left: root.left,
        top: root.top,
        width: if root.width > 0.0 {
            root.width
        } else {
            DEFAULT_SLIDE_WIDTH
        },
        height: if root.height > 0.0 {
            root.height
        } else {
            DEFAULT_SLIDE_HEIGHT
        },
    }
}

/// A paragraph whose descendants are all inline formatting is exported as one text run.
async fn is_inline_paragraph<N: DomNode>(node: &N) -> Result<bool> {
    let tags = node.descendant_tag_names().await?;
    Ok(!tags.is_empty()
        && tags
            .iter()
            .all(|tag| INLINE_FORMATTING_TAGS.contains(&tag.as_str())))
}

fn walk_level<'a, N: DomNode>(
    node: &'a N,
    root: Position,
    depth: usize,
    inherited: InheritedContext,
) -> BoxFuture<'a, Result<Vec<WalkedElement<N>>>> {
    async move {
        let mut results: Vec<WalkedElement<N>> = Vec::new();

        for child in node.children().await? {
            let snapshot = child.snapshot().await?;
            let mut attributes = extract_attributes(&snapshot);
            if IGNORED_TAGS.contains(&attributes.tag_name.as_str()) {
                continue;
            }

            inherited.apply(&mut attributes);
            attributes.position = attributes.position.relative_to(&root);

            if !attributes.position.has_area() {
                debug!("Pruning zero-area <{}> at depth {}", attributes.tag_name, depth);
                continue;
            }

            if attributes.tag_name == "p" && is_inline_paragraph(&child).await? {
                attributes.inner_text = Some(child.inner_html().await?);
                results.push(WalkedElement {
                    attributes,
                    depth,
                    handle: None,
                });
                continue;
            }

            let rasterize = attributes.is_rasterizable_tag();
            attributes.should_screenshot = rasterize;
            // canvas and table content is opaque to the walk
            let recurse = !rasterize || attributes.tag_name == "svg";

            let next = inherited.descend(&attributes);
            let index = results.len();
            results.push(WalkedElement {
                attributes,
                depth,
                handle: None,
            });

            if recurse {
                let nested = walk_level(&child, root, depth + 1, next).await?;
                results.extend(nested);
            }
            if rasterize {
                results[index].handle = Some(child);
            }
        }

        Ok(results)
    }
    .boxed()
}

/// Root-level keep rule: visible nodes that are not full-bleed wrappers, plus all media.
fn keep_at_root(attributes: &ElementAttributes, root: &Position) -> bool {
    let has_visual_properties = attributes.background_color().is_some()
        || attributes.has_border_color()
        || attributes.has_shadow_color()
        || attributes.has_text();
    let has_special_content = attributes.image_src.is_some() || attributes.is_rasterizable_tag();

    (has_visual_properties && !attributes.position.occupies(root)) || has_special_content
}

/// Walks one slide root and returns its elements in paint order.
///
/// Unmeasurable nodes are dropped rather than reported; only failures of the browser calls
/// themselves are returned as errors.
pub async fn walk_slide<N: DomNode>(root: &N) -> Result<WalkedSlide<N>> {
    let root_attributes = extract_attributes(&root.snapshot().await?);
    let root_rect = slide_rect(&root_attributes.position);
    let inherited = InheritedContext::from_root(&root_attributes);

    let mut elements = walk_level(root, root_rect, 0, inherited.clone()).await?;
    let walked = elements.len();

    let background_color = elements
        .iter()
        .filter(|element| element.attributes.position.occupies(&root_rect))
        .find_map(|element| element.attributes.background_color().map(str::to_string))
        .or_else(|| inherited.background.and_then(|background| background.color));

    elements.retain(|element| keep_at_root(&element.attributes, &root_rect));

    // stable: equal keys keep traversal order
    elements.sort_by(|a, b| {
        b.attributes
            .z_index
            .cmp(&a.attributes.z_index)
            .then(a.depth.cmp(&b.depth))
    });

    if let Some(color) = &background_color {
        for element in elements.iter_mut() {
            let attributes = &mut element.attributes;
            if attributes.has_shadow_color() && attributes.background_color().is_none() {
                attributes.background = Some(Background {
                    color: Some(color.clone()),
                    opacity: None,
                });
            }
        }
    }

    info!(
        "Walked slide {}x{}: kept {} of {} elements",
        root_rect.width,
        root_rect.height,
        elements.len(),
        walked
    );

    Ok(WalkedSlide {
        elements,
        background_color,
    })
}
