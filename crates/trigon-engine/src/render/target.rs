use crate::device::SurfaceFrame;

/// A presentable image handed to the renderer for one frame.
pub trait FrameTarget {
    /// View the render pass draws into.
    fn color_view(&self) -> &wgpu::TextureView;

    /// Shows the image. Called after the frame's command buffers are submitted.
    fn present(self);
}

impl FrameTarget for SurfaceFrame {
    fn color_view(&self) -> &wgpu::TextureView {
        &self.view
    }

    fn present(self) {
        self.surface_texture.present();
    }
}

/// Texture target with no window behind it.
pub struct OffscreenTarget {
    texture: wgpu::Texture,
    view: wgpu::TextureView,
}

impl OffscreenTarget {
    pub fn new(device: &wgpu::Device, format: wgpu::TextureFormat, width: u32, height: u32) -> Self {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("trigon offscreen target"),
            size: wgpu::Extent3d {
                width: width.max(1),
                height: height.max(1),
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::COPY_SRC,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        Self { texture, view }
    }

    pub fn texture(&self) -> &wgpu::Texture {
        &self.texture
    }
}

impl FrameTarget for &OffscreenTarget {
    fn color_view(&self) -> &wgpu::TextureView {
        &self.view
    }

    fn present(self) {}
}
