use winit::dpi::LogicalSize;

use trigon_engine::paint::Color;
use trigon_engine::render::{RendererConfig, Vertex, DEFAULT_ROTATION_STEP, TRIANGLE};
use trigon_engine::window::RuntimeConfig;

/// Side of the square frame the view always opens with.
pub const FRAME_SIZE: f64 = 500.0;

/// Which pipeline set the view builds.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Variant {
    /// Vertex/fragment pair only.
    Static,
    /// Compute pre-pass rotates the vertices before every draw.
    Rotating,
}

/// View construction parameters.
#[derive(Debug, Clone)]
pub struct ViewConfig {
    /// Requested width in pixels. The window is opened at [`FRAME_SIZE`] regardless.
    pub width: u32,
    /// Requested height in pixels. The window is opened at [`FRAME_SIZE`] regardless.
    pub height: u32,
    pub title: String,
    pub variant: Variant,
    pub format: wgpu::TextureFormat,
    pub clear: Color,
    pub vertices: Vec<Vertex>,
    /// Radians per frame, used by [`Variant::Rotating`].
    pub rotation_step: f32,
}

impl ViewConfig {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            title: "Triangle".to_string(),
            variant: Variant::Static,
            format: wgpu::TextureFormat::Bgra8Unorm,
            clear: Color::rgba(0.8, 0.0, 0.0, 1.0),
            vertices: TRIANGLE.to_vec(),
            rotation_step: DEFAULT_ROTATION_STEP,
        }
    }

    pub fn with_variant(mut self, variant: Variant) -> Self {
        self.variant = variant;
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn runtime_config(&self) -> RuntimeConfig {
        if f64::from(self.width) != FRAME_SIZE || f64::from(self.height) != FRAME_SIZE {
            log::debug!(
                "requested {}x{} view; opening the fixed {FRAME_SIZE}x{FRAME_SIZE} frame",
                self.width,
                self.height
            );
        }

        RuntimeConfig {
            title: self.title.clone(),
            initial_size: LogicalSize::new(FRAME_SIZE, FRAME_SIZE),
            resizable: false,
        }
    }

    /// Renderer parameters for the surface format actually negotiated.
    pub fn renderer_config(&self, format: wgpu::TextureFormat) -> RendererConfig {
        RendererConfig {
            vertices: self.vertices.clone(),
            format,
            clear: self.clear,
            rotation_step: match self.variant {
                Variant::Static => None,
                Variant::Rotating => Some(self.rotation_step),
            },
        }
    }
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self::new(500, 500)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn requested_size_does_not_change_frame() {
        let cfg = ViewConfig::new(1024, 300).runtime_config();
        assert_eq!(cfg.initial_size, LogicalSize::new(500.0, 500.0));
        assert!(!cfg.resizable);
    }

    #[test]
    fn defaults_match_view_contract() {
        let cfg = ViewConfig::default();
        assert_eq!((cfg.width, cfg.height), (500, 500));
        assert_eq!(cfg.format, wgpu::TextureFormat::Bgra8Unorm);
        assert_eq!(cfg.clear, Color::rgba(0.8, 0.0, 0.0, 1.0));
        assert_eq!(cfg.vertices.len(), 3);
        assert_eq!(cfg.variant, Variant::Static);
    }

    #[test]
    fn only_rotating_variant_enables_compute() {
        let format = wgpu::TextureFormat::Bgra8Unorm;

        let fixed = ViewConfig::default().renderer_config(format);
        assert_eq!(fixed.rotation_step, None);

        let rotating = ViewConfig::default()
            .with_variant(Variant::Rotating)
            .renderer_config(format);
        assert_eq!(rotating.rotation_step, Some(DEFAULT_ROTATION_STEP));
        assert_eq!(rotating.vertices, TRIANGLE.to_vec());
    }

    #[test]
    fn renderer_uses_negotiated_format() {
        let rc = ViewConfig::default().renderer_config(wgpu::TextureFormat::Rgba8Unorm);
        assert_eq!(rc.format, wgpu::TextureFormat::Rgba8Unorm);
    }
}
