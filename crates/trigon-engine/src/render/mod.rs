//! GPU rendering subsystem.
//!
//! The triangle renderer owns its pipelines and vertex buffer; the device and
//! the per-frame target are handed in by the caller.
//!
//! Convention:
//! - vertex positions are already in clip space (no viewport transform)
//! - each frame is planned first ([`FramePlan`]) and then encoded verbatim

mod pipeline;
mod plan;
mod renderer;
mod target;
mod vertex;

pub use pipeline::{
    ComputePipelineDesc, ComputePipelineState, PipelineError, RenderPipelineDesc,
    RenderPipelineState,
};
pub use plan::{
    Dispatch, DrawCall, FramePlan, FramePlanner, FrameStats, Pass, RendererState, Submission,
    MAX_WORKGROUP_SIZE,
};
pub use renderer::{FrameOutcome, RendererConfig, TriangleRenderer, DEFAULT_ROTATION_STEP};
pub use target::{FrameTarget, OffscreenTarget};
pub use vertex::{Vertex, VertexBuffer, TRIANGLE};
