/// Represents a single acquired swapchain image.
///
/// This object is short-lived and must be presented (or dropped) promptly. Holding
/// the surface texture prevents acquisition of subsequent frames.
pub struct SurfaceFrame {
    pub surface_texture: wgpu::SurfaceTexture,
    pub view: wgpu::TextureView,
}
