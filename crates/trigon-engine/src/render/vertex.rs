use bytemuck::{Pod, Zeroable};
use wgpu::util::DeviceExt;

/// Homogeneous vertex position (x, y, z, w).
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub pos: [f32; 4],
}

impl Vertex {
    const ATTRS: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![0 => Float32x4];

    #[inline]
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { pos: [x, y, z, 1.0] }
    }

    /// One `Float32x4` attribute at location 0, advanced per vertex.
    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }
}

/// The triangle drawn by the view.
pub const TRIANGLE: [Vertex; 3] = [
    Vertex::new(-1.0, -1.0, 0.0),
    Vertex::new(1.0, -0.9, 0.0),
    Vertex::new(1.0, 1.0, 0.0),
];

/// Device buffer holding the vertex array.
///
/// Written once at creation. The compute pass may rewrite it in place, so it is
/// usable both as a vertex buffer and as a storage buffer.
pub struct VertexBuffer {
    buffer: wgpu::Buffer,
    count: u32,
}

impl VertexBuffer {
    /// Allocates a buffer sized to `vertices` and copies them into it.
    ///
    /// `vertices` must not be empty.
    pub fn new(device: &wgpu::Device, vertices: &[Vertex]) -> Self {
        debug_assert!(!vertices.is_empty());

        let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("trigon vertex buffer"),
            contents: bytemuck::cast_slice(vertices),
            usage: wgpu::BufferUsages::VERTEX
                | wgpu::BufferUsages::STORAGE
                | wgpu::BufferUsages::COPY_DST,
        });

        Self {
            buffer,
            count: vertices.len() as u32,
        }
    }

    pub fn buffer(&self) -> &wgpu::Buffer {
        &self.buffer
    }

    /// Number of vertices uploaded; draw calls use exactly this count.
    pub fn count(&self) -> u32 {
        self.count
    }
}
