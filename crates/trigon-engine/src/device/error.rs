/// Errors raised while acquiring the GPU device or binding it to a window.
#[derive(Debug, thiserror::Error)]
pub enum DeviceError {
    /// No adapter matched the request; there is no GPU to render with.
    #[error("no suitable GPU adapter available: {0}")]
    Unavailable(#[from] wgpu::RequestAdapterError),

    #[error("failed to create wgpu device/queue: {0}")]
    RequestDevice(#[from] wgpu::RequestDeviceError),

    #[error("failed to create wgpu surface: {0}")]
    CreateSurface(#[from] wgpu::CreateSurfaceError),

    #[error("surface reports no supported formats")]
    NoSurfaceFormat,

    #[error("window has zero size ({width}x{height})")]
    ZeroSize { width: u32, height: u32 },
}

/// High-level response after a surface error.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum SurfaceErrorAction {
    /// Surface was reconfigured; rendering may resume next frame.
    Reconfigured,
    /// Transient error; skip the current frame.
    SkipFrame,
    /// Fatal error (commonly OOM); terminate gracefully.
    Fatal,
}
