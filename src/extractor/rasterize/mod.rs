//! Turns nodes flagged for rasterization into PNG files on disk.
//!
//! SVG nodes are rendered from their markup with `resvg`; everything else is captured from the
//! page while all unrelated elements are hidden.

mod error;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use log::{debug, warn};
use resvg::tiny_skia::{Pixmap, Transform};
use resvg::usvg::{self, fontdb::Database};
use tokio::sync::Mutex;
use uuid::Uuid;

pub use error::RasterizeError;

use super::walker::{WalkedElement, WalkedSlide};
use crate::dom::DomNode;
use crate::errors::{ExtractError, Result};
use crate::models::{ElementAttributes, ObjectFit, SlideAttributesResult};

/// Renders SVG markup into a PNG of `width` x `height` pixels (rounded, at least 1px each).
pub fn render_svg_png(
    markup: &str,
    width: f64,
    height: f64,
    fontdb: Arc<Database>,
) -> std::result::Result<Vec<u8>, RasterizeError> {
    let options = usvg::Options {
        fontdb,
        ..Default::default()
    };
    let tree = usvg::Tree::from_str(markup, &options)?;

    let width = (width.round() as u32).max(1);
    let height = (height.round() as u32).max(1);
    let mut pixmap = Pixmap::new(width, height).ok_or(RasterizeError::PixmapSize(width, height))?;

    let size = tree.size();
    let transform = Transform::from_scale(
        width as f32 / size.width(),
        height as f32 / size.height(),
    );
    resvg::render(&tree, transform, &mut pixmap.as_mut());

    pixmap
        .encode_png()
        .map_err(|e| RasterizeError::Encode(e.to_string()))
}

/// Writes rasterized nodes into one output directory.
pub struct Rasterizer {
    output_dir: PathBuf,
    fontdb: Arc<Database>,
    // A page has a single opacity state; two isolations must never overlap.
    isolation: Mutex<()>,
}

impl Rasterizer {
    /// The directory is created on first write. System fonts are loaded once, here.
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        let mut fontdb = Database::new();
        fontdb.load_system_fonts();
        debug!("Loaded {} font faces for SVG rendering", fontdb.len());
        Rasterizer {
            output_dir: output_dir.into(),
            fontdb: Arc::new(fontdb),
            isolation: Mutex::new(()),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Rasterizes `node` and returns the path of the written PNG.
    pub async fn rasterize<N: DomNode>(
        &self,
        attributes: &ElementAttributes,
        node: &N,
    ) -> Result<PathBuf> {
        let png = if attributes.tag_name == "svg" {
            let markup = node.svg_markup().await?;
            let position = attributes.position;
            let fontdb = Arc::clone(&self.fontdb);
            tokio::task::spawn_blocking(move || {
                render_svg_png(&markup, position.width, position.height, fontdb)
            })
            .await
            .map_err(RasterizeError::from)??
        } else {
            self.capture_isolated(node).await?
        };

        if png.is_empty() {
            return Err(ExtractError::EmptyCapture(attributes.tag_name.clone()));
        }

        tokio::fs::create_dir_all(&self.output_dir).await?;
        let path = self.output_dir.join(format!("{}.png", Uuid::new_v4()));
        tokio::fs::write(&path, &png).await?;
        debug!(
            "Rasterized <{}> ({} bytes) to {}",
            attributes.tag_name,
            png.len(),
            path.display()
        );
        Ok(path)
    }

    /// Captures `node` alone. Restoration is attempted whatever happened before it.
    async fn capture_isolated<N: DomNode>(&self, node: &N) -> Result<Vec<u8>> {
        let _guard = self.isolation.lock().await;

        let capture = match node.isolate().await {
            Ok(()) => node.screenshot_png().await,
            Err(e) => Err(e),
        };
        let restored = node.restore_isolation().await;
        if let (Err(e), Err(_)) = (&restored, &capture) {
            warn!("Restoring page opacity failed after a failed capture: {}", e);
        }

        let png = capture?;
        restored?;
        Ok(png)
    }
}

/// Rasterizes every flagged element of a walked slide and assembles the final record.
///
/// Rasterized elements end up with `imageSrc` pointing at the PNG, `objectFit: cover` and the
/// screenshot flag cleared. A flagged element without a node is an error, never an element
/// without its image.
pub async fn finalize_slide<N: DomNode>(
    walked: WalkedSlide<N>,
    rasterizer: &Rasterizer,
    speaker_note: Option<String>,
) -> Result<SlideAttributesResult> {
    let mut elements = Vec::with_capacity(walked.elements.len());

    for WalkedElement {
        mut attributes,
        handle,
        ..
    } in walked.elements
    {
        if attributes.should_screenshot {
            let node = handle
                .ok_or_else(|| ExtractError::MissingNodeHandle(attributes.tag_name.clone()))?;
            let path = rasterizer.rasterize(&attributes, &node).await?;
            attributes.image_src = Some(path.to_string_lossy().into_owned());
            attributes.object_fit = Some(ObjectFit::Cover);
            attributes.should_screenshot = false;
        }
        elements.push(attributes);
    }

    Ok(SlideAttributesResult {
        elements,
        background_color: walked.background_color,
        speaker_note,
    })
}
