//! Extracts a flat, positioned presentation model from slides rendered in a headless browser.
//!
//! Each slide's DOM is walked into [`models::ElementAttributes`] records (geometry, colours,
//! fonts, shadows, filters), with vector and tabular content rasterized to PNG files. The
//! result is ready for conversion into an office presentation format.

pub mod config;
pub mod dom;
pub mod errors;
pub mod extractor;
pub mod models;
pub mod normalize;
pub mod session;

pub use config::ExtractorConfig;
pub use errors::{ExtractError, Result};
pub use extractor::{finalize_slide, walk_slide, Rasterizer};
pub use models::{ElementAttributes, PresentationAttributes, SlideAttributesResult};
pub use session::{extract_presentation, extract_presentation_by_id, BrowserSession};
