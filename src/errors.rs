use thiserror::Error;

use crate::extractor::rasterize::RasterizeError;

/// Represents errors that can occur while extracting slide attributes from a rendered presentation.
#[derive(Error, Debug)]
pub enum ExtractError {
    /// Error originating from the browser automation layer (`chromiumoxide`).
    #[error("Browser automation failed: {0}")]
    Browser(#[from] chromiumoxide::error::CdpError),

    /// A browser-side script returned data that could not be deserialized.
    #[error("Failed to deserialize data returned by the page: {0}")]
    JsonDeserialization(#[from] serde_json::Error),

    /// A browser-side script returned no value where one was expected.
    #[error("Page script returned no value: {0}")]
    MissingScriptValue(String),

    /// The request did not name a presentation.
    #[error("Presentation ID not found")]
    MissingPresentationId,

    /// The rendered page has no slide container.
    #[error("Presentation slides not found")]
    SlidesNotFound,

    /// Navigation or extraction exceeded the configured time budget.
    #[error("Timed out after {0} seconds: {1}")]
    Timeout(u64, String),

    /// An element capture produced no image data.
    #[error("Failed to screenshot element <{0}>")]
    EmptyCapture(String),

    /// An element was flagged for rasterization but its node was no longer available.
    #[error("No node to rasterize for element <{0}>")]
    MissingNodeHandle(String),

    /// Vector rasterization of an SVG node failed.
    #[error("Rasterization error: {0}")]
    Rasterize(#[from] RasterizeError),

    /// An error related to configuration, usually a missing environment variable.
    #[error("Configuration error: {0}")]
    Config(String),

    /// An I/O error occurred, often while writing screenshots.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

impl ExtractError {
    /// Whether the error was caused by the caller's input rather than by the pipeline.
    /// Callers map these to a client error instead of an internal one.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            ExtractError::MissingPresentationId | ExtractError::SlidesNotFound | ExtractError::Config(_)
        )
    }
}

/// A type alias for `Result<T, ExtractError>` for convenience within the crate.
pub type Result<T> = std::result::Result<T, ExtractError>;
