pub mod attributes;
pub mod slide;
pub mod snapshot;

pub use attributes::{
    Background, Border, ElementAttributes, Filters, Font, ObjectFit, Position, Shadow, Shape,
    Spacing, TextAlign,
};
pub use slide::{PresentationAttributes, SlideAttributesResult};
pub use snapshot::{ComputedStyle, NodeSnapshot, RawRect};
