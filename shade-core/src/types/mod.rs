//! Value types shared across Shade crates.

pub mod color;

pub use color::{Color, MIN_TEXT_CONTRAST_RATIO};
