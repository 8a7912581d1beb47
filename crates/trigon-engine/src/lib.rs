//! Trigon engine crate.
//!
//! Owns the platform + GPU runtime pieces used by the view layer: device and
//! surface, window loop, shader library, pipelines and the triangle renderer.

pub mod core;
pub mod device;
pub mod logging;
pub mod paint;
pub mod render;
pub mod shader;
pub mod time;
pub mod window;
