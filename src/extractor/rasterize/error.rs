use thiserror::Error;

/// Errors raised while turning SVG markup into a PNG.
#[derive(Error, Debug)]
pub enum RasterizeError {
    #[error("SVG markup could not be parsed: {0}")]
    Parse(#[from] resvg::usvg::Error),
    #[error("Cannot allocate a {0}x{1} pixmap")]
    PixmapSize(u32, u32),
    #[error("PNG encoding failed: {0}")]
    Encode(String),
    #[error("Rasterization task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}
