//! Triangle view.
//!
//! Demo layer over `trigon-engine`: a single window that draws one triangle per
//! display refresh, optionally rotating it on the GPU first.

mod config;
mod view;

pub use config::{Variant, ViewConfig};
pub use view::TriangleView;

use anyhow::Result;
use trigon_engine::device::GpuInit;
use trigon_engine::window::Runtime;

/// Opens the view window and runs until it is closed.
pub fn run(config: ViewConfig) -> Result<()> {
    let runtime = config.runtime_config();
    let gpu_init = GpuInit {
        preferred_format: config.format,
        ..GpuInit::default()
    };

    Runtime::run(runtime, gpu_init, TriangleView::new(config))
}
