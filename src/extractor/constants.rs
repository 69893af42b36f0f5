//! Defines constants used throughout the extraction process.

// Slide size assumed when the slide root cannot be measured (px).
pub const DEFAULT_SLIDE_WIDTH: f64 = 1280.0;
pub const DEFAULT_SLIDE_HEIGHT: f64 = 720.0;

// Single-line height estimate when `line-height` is `normal`.
pub const LINE_HEIGHT_FACTOR: f64 = 1.2;

/// Tags that never contribute to the rendered slide.
pub const IGNORED_TAGS: &[&str] = &["style", "script", "link", "meta", "path"];

/// Formatting tags a paragraph may contain and still be exported as a single text run.
pub const INLINE_FORMATTING_TAGS: &[&str] = &["strong", "u", "em", "code", "s"];

/// Tags whose content is drawn as a bitmap, so `object-fit` applies to them.
pub const REPLACED_TAGS: &[&str] = &["img", "video", "canvas", "svg", "iframe", "object", "embed"];

// Page structure of the render-only presentation view.
pub const SLIDES_WRAPPER_SELECTOR: &str = "#presentation-slides-wrapper";
pub const SLIDE_SELECTOR: &str = ":scope > div > div";
pub const SPEAKER_NOTE_SELECTOR: &str = "[data-speaker-note]";
pub const SPEAKER_NOTE_ATTRIBUTE: &str = "data-speaker-note";

// The view renders its slides client-side after load; readiness is polled at this interval (ms).
pub const SLIDES_READY_POLL_MS: u64 = 250;
