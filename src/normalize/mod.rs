//! Pure conversions from computed-style strings to structured values.
//!
//! Malformed input never errors here: it normalizes to `None`, which downstream code reads as
//! "no value".

pub mod color;
pub mod filter;
pub mod shadow;
pub mod units;

pub use color::{color_to_hex, ColorValue};
pub use filter::parse_filters;
pub use shadow::parse_box_shadow;
pub use units::{parse_float, parse_int};
