//! Extraction of a flat presentation model from rendered slides.
//!
//! [`walker::walk_slide`] reads one slide into positioned, inherited and ordered element
//! records. [`rasterize::finalize_slide`] then replaces nodes that cannot be expressed as
//! attributes with PNG files.

pub mod attributes;
pub mod constants;
pub mod rasterize;
pub mod walker;

pub use attributes::extract_attributes;
pub use rasterize::{finalize_slide, render_svg_png, RasterizeError, Rasterizer};
pub use walker::{walk_slide, InheritedContext, WalkedElement, WalkedSlide};
