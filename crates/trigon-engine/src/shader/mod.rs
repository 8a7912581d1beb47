//! Shader library: WGSL source validated up front, entry points resolved by name.
//!
//! The entry point names are the contract between the engine and its shaders.

mod error;
mod library;

pub use error::ShaderError;
pub use library::{ShaderFunction, ShaderLibrary, Stage, FRAGMENT_MAIN, TRANSFORM, VERTEX_MAIN};
