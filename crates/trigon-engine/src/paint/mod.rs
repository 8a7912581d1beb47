//! Color values used by render passes.

mod color;

pub use color::Color;
