use crate::shader::{ShaderError, ShaderLibrary, Stage};

/// Errors raised while building the renderer's pipelines and buffers.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error(transparent)]
    Shader(#[from] ShaderError),

    #[error("vertex data is empty")]
    EmptyVertexData,

    #[error("{count} vertices exceed the device's compute dispatch limits")]
    TooManyVertices { count: u32 },

    /// The device rejected an object the shader library accepted.
    #[error("device rejected {label}: {message}")]
    Device { label: String, message: String },
}

/// Runs `create` inside a validation error scope.
///
/// Errors raised by wgpu while `create` runs are returned instead of reaching the
/// device's uncaptured-error handler, which panics.
pub(super) fn validated<T>(
    device: &wgpu::Device,
    label: &str,
    create: impl FnOnce() -> T,
) -> Result<T, PipelineError> {
    let scope = device.push_error_scope(wgpu::ErrorFilter::Validation);
    let value = create();
    match pollster::block_on(scope.pop()) {
        None => Ok(value),
        Some(err) => Err(PipelineError::Device {
            label: label.to_string(),
            message: err.to_string(),
        }),
    }
}

/// Render pipeline configuration: shader stages, output format, vertex layout.
pub struct RenderPipelineDesc<'a> {
    pub label: &'a str,
    pub vertex_entry: &'a str,
    pub fragment_entry: &'a str,
    pub format: wgpu::TextureFormat,
    pub vertex_layout: wgpu::VertexBufferLayout<'a>,
}

/// Compiled render pipeline, built once and reused every frame.
pub struct RenderPipelineState {
    pipeline: wgpu::RenderPipeline,
    topology: wgpu::PrimitiveTopology,
}

impl RenderPipelineState {
    /// Resolves the entry points in `library` and compiles the pipeline.
    ///
    /// Entry points are checked before any wgpu call so that a missing function is
    /// reported by name. Anything the device itself rejects comes back as
    /// [`PipelineError::Device`].
    pub fn new(
        device: &wgpu::Device,
        library: &ShaderLibrary,
        module: &wgpu::ShaderModule,
        desc: &RenderPipelineDesc<'_>,
    ) -> Result<Self, PipelineError> {
        let vertex = library.function(desc.vertex_entry, Stage::Vertex)?;
        let fragment = library.function(desc.fragment_entry, Stage::Fragment)?;
        let topology = wgpu::PrimitiveTopology::TriangleList;

        let pipeline = validated(device, desc.label, || {
            let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some(desc.label),
                bind_group_layouts: &[],
                immediate_size: 0,
            });

            device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some(desc.label),
                layout: Some(&pipeline_layout),

                vertex: wgpu::VertexState {
                    module,
                    entry_point: Some(vertex.name()),
                    compilation_options: Default::default(),
                    buffers: std::slice::from_ref(&desc.vertex_layout),
                },

                fragment: Some(wgpu::FragmentState {
                    module,
                    entry_point: Some(fragment.name()),
                    compilation_options: Default::default(),
                    targets: &[Some(wgpu::ColorTargetState {
                        format: desc.format,
                        blend: None,
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                }),

                primitive: wgpu::PrimitiveState {
                    topology,
                    strip_index_format: None,
                    front_face: wgpu::FrontFace::Ccw,
                    cull_mode: None,
                    polygon_mode: wgpu::PolygonMode::Fill,
                    unclipped_depth: false,
                    conservative: false,
                },

                depth_stencil: None,
                multisample: wgpu::MultisampleState::default(),
                multiview_mask: None,
                cache: None,
            })
        })?;

        Ok(Self { pipeline, topology })
    }

    pub fn pipeline(&self) -> &wgpu::RenderPipeline {
        &self.pipeline
    }

    pub fn topology(&self) -> wgpu::PrimitiveTopology {
        self.topology
    }
}

/// Compute pipeline configuration: one kernel plus its override constants.
pub struct ComputePipelineDesc<'a> {
    pub label: &'a str,
    pub entry: &'a str,
    pub constants: &'a [(&'a str, f64)],
}

/// Compiled compute pipeline and the layout of its storage binding.
pub struct ComputePipelineState {
    pipeline: wgpu::ComputePipeline,
    bind_group_layout: wgpu::BindGroupLayout,
}

impl ComputePipelineState {
    pub fn new(
        device: &wgpu::Device,
        library: &ShaderLibrary,
        module: &wgpu::ShaderModule,
        desc: &ComputePipelineDesc<'_>,
    ) -> Result<Self, PipelineError> {
        let kernel = library.function(desc.entry, Stage::Compute)?;

        let (pipeline, bind_group_layout) = validated(device, desc.label, || {
            let pipeline = device.create_compute_pipeline(&wgpu::ComputePipelineDescriptor {
                label: Some(desc.label),
                layout: None,
                module,
                entry_point: Some(kernel.name()),
                compilation_options: wgpu::PipelineCompilationOptions {
                    constants: desc.constants,
                    ..Default::default()
                },
                cache: None,
            });

            // Layout derived from the kernel: group 0 holds the vertex storage buffer.
            let bind_group_layout = pipeline.get_bind_group_layout(0);
            (pipeline, bind_group_layout)
        })?;

        Ok(Self {
            pipeline,
            bind_group_layout,
        })
    }

    pub fn pipeline(&self) -> &wgpu::ComputePipeline {
        &self.pipeline
    }

    /// Binds `buffer` as the kernel's storage buffer at binding 0.
    pub fn bind_storage(
        &self,
        device: &wgpu::Device,
        buffer: &wgpu::Buffer,
    ) -> Result<wgpu::BindGroup, PipelineError> {
        let label = "trigon compute bind group";
        validated(device, label, || {
            device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some(label),
                layout: &self.bind_group_layout,
                entries: &[wgpu::BindGroupEntry {
                    binding: 0,
                    resource: buffer.as_entire_binding(),
                }],
            })
        })
    }
}
