use wgpu::SurfaceError;
use winit::dpi::PhysicalSize;
use winit::window::Window;

use super::surface;
use super::{DeviceError, GpuContext, GpuInit, SurfaceErrorAction, SurfaceFrame};

/// Window-bound GPU state: the surface, its configuration and the owned [`GpuContext`].
///
/// - creates the Surface (swapchain) and the device compatible with it
/// - keeps the surface configured across resizes
/// - acquires swapchain images for the frame renderer
pub struct Gpu<'w> {
    /// Surface bound to the window.
    ///
    /// Surface lifetime is tied to the window; the runtime keeps the window alive
    /// for as long as this value exists.
    surface: wgpu::Surface<'w>,

    /// Device and queue, created once.
    context: GpuContext,

    /// Active surface configuration.
    config: wgpu::SurfaceConfiguration,

    /// Current drawable size in physical pixels.
    size: PhysicalSize<u32>,
}

impl<'w> Gpu<'w> {
    /// Creates a GPU context bound to a window.
    ///
    /// Adapter/device acquisition is asynchronous under wgpu.
    pub async fn new(window: &'w Window, init: GpuInit) -> Result<Self, DeviceError> {
        let size = window.inner_size();
        if size.width == 0 || size.height == 0 {
            return Err(DeviceError::ZeroSize {
                width: size.width,
                height: size.height,
            });
        }

        let instance = GpuContext::create_instance();
        let surface = instance.create_surface(window)?;
        let context = GpuContext::new(&instance, Some(&surface), &init).await?;

        let caps = surface.get_capabilities(context.adapter());
        let format = surface::choose_surface_format(&caps.formats, init.preferred_format)
            .ok_or(DeviceError::NoSurfaceFormat)?;
        let alpha_mode = surface::choose_alpha_mode(&caps.alpha_modes, init.alpha_mode);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: size.width,
            height: size.height,
            present_mode: init.present_mode,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: init.desired_maximum_frame_latency,
        };

        surface.configure(context.device(), &config);
        log::debug!("surface configured: {format:?} {}x{}", size.width, size.height);

        Ok(Self {
            surface,
            context,
            config,
            size,
        })
    }

    /// Returns the owned device/queue context.
    pub fn context(&self) -> &GpuContext {
        &self.context
    }

    /// Returns the active surface format.
    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.config.format
    }

    /// Reconfigures the surface after a resize.
    pub fn resize(&mut self, new_size: PhysicalSize<u32>) {
        surface::apply_resize(
            &self.surface,
            self.context.device(),
            &mut self.config,
            &mut self.size,
            new_size,
        );
    }

    /// Acquires the next swapchain image.
    pub fn acquire(&self) -> Result<SurfaceFrame, SurfaceError> {
        let surface_texture = self.surface.get_current_texture()?;
        let view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        Ok(SurfaceFrame {
            surface_texture,
            view,
        })
    }

    /// Converts a `SurfaceError` into a higher-level action.
    pub fn handle_surface_error(&mut self, err: SurfaceError) -> SurfaceErrorAction {
        surface::map_surface_error(
            &self.surface,
            self.context.device(),
            &self.config,
            self.size,
            err,
        )
    }
}
