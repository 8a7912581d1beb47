use anyhow::Result;

use trigon_engine::core::{App, AppControl, FrameCtx};
use trigon_engine::device::Gpu;
use trigon_engine::render::{FrameOutcome, TriangleRenderer};
use trigon_engine::shader::ShaderLibrary;

use crate::config::ViewConfig;

/// Frames between frame-rate log lines.
const FPS_LOG_INTERVAL: u64 = 600;

/// The view: builds the renderer once the device exists and draws on every refresh.
pub struct TriangleView {
    config: ViewConfig,
    renderer: Option<TriangleRenderer>,
    warned_not_drawing: bool,
}

impl TriangleView {
    pub fn new(config: ViewConfig) -> Self {
        Self {
            config,
            renderer: None,
            warned_not_drawing: false,
        }
    }

    pub fn config(&self) -> &ViewConfig {
        &self.config
    }

    pub fn renderer(&self) -> Option<&TriangleRenderer> {
        self.renderer.as_ref()
    }

    /// Whether frames are being drawn.
    pub fn is_drawing(&self) -> bool {
        self.renderer.as_ref().is_some_and(TriangleRenderer::is_ready)
    }

    fn warn_not_drawing(&mut self) {
        if !self.warned_not_drawing {
            log::warn!("renderer unavailable; the view will not draw");
            self.warned_not_drawing = true;
        }
    }
}

impl App for TriangleView {
    fn on_gpu_ready(&mut self, gpu: &Gpu<'_>) -> Result<()> {
        // A bad library leaves the view open but blank, like a failed pipeline.
        let library = match ShaderLibrary::triangle() {
            Ok(library) => library,
            Err(err) => {
                log::error!("loading shader library failed: {err}");
                return Ok(());
            }
        };

        let config = self.config.renderer_config(gpu.surface_format());
        self.renderer = Some(TriangleRenderer::new(gpu.context(), &library, config));

        log::info!(
            "{:?} triangle view ready ({:?})",
            self.config.variant,
            gpu.surface_format()
        );
        Ok(())
    }

    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        if !self.is_drawing() {
            self.warn_not_drawing();
            return AppControl::Continue;
        }
        let Some(renderer) = self.renderer.as_mut() else {
            return AppControl::Continue;
        };

        let target = ctx.acquire_target();
        if renderer.render(ctx.gpu.context(), target) == FrameOutcome::Rendered
            && ctx.time.frame_index % FPS_LOG_INTERVAL == 0
        {
            log::debug!(
                "frame {}: {:.2} ms, {:.1} fps, {:?}",
                ctx.time.frame_index,
                ctx.time.dt * 1000.0,
                ctx.time.fps,
                renderer.stats()
            );
        }

        AppControl::Continue
    }
}
