use winit::window::{Window, WindowId};

use crate::device::{Gpu, SurfaceErrorAction, SurfaceFrame};
use crate::render::FrameTarget;
use crate::time::FrameTime;
use crate::window::RuntimeCtx;

/// Per-window handles and immutable window metadata.
pub struct WindowCtx<'a> {
    pub id: WindowId,
    pub window: &'a Window,
}

/// Per-frame context passed to `core::App::on_frame`.
///
/// Lifetimes:
/// - `'a` is the duration of the callback invocation
/// - `'w` is the window-borrow lifetime carried by `Gpu<'w>`
pub struct FrameCtx<'a, 'w> {
    pub window: WindowCtx<'a>,
    pub gpu: &'a mut Gpu<'w>,
    pub time: FrameTime,
    pub runtime: &'a mut RuntimeCtx,
}

impl<'a, 'w> FrameCtx<'a, 'w> {
    /// Acquires this frame's swapchain image.
    ///
    /// Returns `None` when no image is available this tick; the caller should skip
    /// the frame. A fatal surface error additionally requests runtime exit.
    pub fn acquire_target(&mut self) -> Option<WindowFrame<'a>> {
        match self.gpu.acquire() {
            Ok(frame) => Some(WindowFrame {
                window: self.window.window,
                frame,
            }),
            Err(err) => {
                log::debug!("surface image unavailable: {err}");
                if self.gpu.handle_surface_error(err) == SurfaceErrorAction::Fatal {
                    log::error!("surface lost beyond recovery; exiting");
                    self.runtime.exit();
                }
                None
            }
        }
    }
}

/// Swapchain image of a window; notifies the window right before presenting.
pub struct WindowFrame<'a> {
    window: &'a Window,
    frame: SurfaceFrame,
}

impl FrameTarget for WindowFrame<'_> {
    fn color_view(&self) -> &wgpu::TextureView {
        self.frame.color_view()
    }

    fn present(self) {
        self.window.pre_present_notify();
        self.frame.present();
    }
}
