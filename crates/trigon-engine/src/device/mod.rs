//! GPU device + surface management.
//!
//! This module is responsible for:
//! - creating the wgpu Instance/Adapter/Device/Queue once and owning them
//! - creating & configuring the Surface (swapchain)
//! - acquiring swapchain images for the frame renderer

mod context;
mod error;
mod frame;
mod gpu;
mod init;
mod surface;

pub use context::GpuContext;
pub use error::{DeviceError, SurfaceErrorAction};
pub use frame::SurfaceFrame;
pub use gpu::Gpu;
pub use init::GpuInit;
