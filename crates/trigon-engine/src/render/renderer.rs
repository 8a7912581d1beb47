use crate::device::GpuContext;
use crate::paint::Color;
use crate::shader::{ShaderLibrary, FRAGMENT_MAIN, TRANSFORM, VERTEX_MAIN};

use super::pipeline::{
    ComputePipelineDesc, ComputePipelineState, PipelineError, RenderPipelineDesc,
    RenderPipelineState, validated,
};
use super::plan::{
    Dispatch, FramePlan, FramePlanner, FrameStats, Pass, RendererState, Submission,
};
use super::target::FrameTarget;
use super::vertex::{Vertex, VertexBuffer, TRIANGLE};

/// Default radians the rotation kernel turns the triangle per frame.
pub const DEFAULT_ROTATION_STEP: f32 = 0.01;

/// Renderer construction parameters.
#[derive(Debug, Clone)]
pub struct RendererConfig {
    /// Vertex data uploaded once at construction.
    pub vertices: Vec<Vertex>,
    /// Output pixel format of the render pipeline.
    pub format: wgpu::TextureFormat,
    /// Render pass clear color.
    pub clear: Color,
    /// Radians per frame for the compute pre-pass; `None` disables it.
    pub rotation_step: Option<f32>,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            vertices: TRIANGLE.to_vec(),
            format: wgpu::TextureFormat::Bgra8Unorm,
            clear: Color::rgba(0.8, 0.0, 0.0, 1.0),
            rotation_step: None,
        }
    }
}

/// Result of one [`TriangleRenderer::render`] call.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum FrameOutcome {
    /// Command buffers were submitted and the target presented.
    Rendered,
    /// No target this tick; nothing was recorded.
    Skipped,
    /// Initialization failed; the renderer does not draw.
    Disabled,
}

struct ComputeStage {
    state: ComputePipelineState,
    bind_group: wgpu::BindGroup,
    dispatch: Dispatch,
}

/// GPU objects that exist only when initialization succeeded.
struct Resources {
    vertices: VertexBuffer,
    render: RenderPipelineState,
    compute: Option<ComputeStage>,
}

/// Draws the triangle once per frame, optionally rotating it on the GPU first.
///
/// The renderer owns its pipelines and vertex buffer but not the device; the
/// caller hands in the [`GpuContext`] and a [`FrameTarget`] every frame.
pub struct TriangleRenderer {
    planner: FramePlanner,
    resources: Option<Resources>,
    error: Option<PipelineError>,
}

impl TriangleRenderer {
    /// Builds pipelines and uploads the vertex data.
    ///
    /// Never fails: if a pipeline cannot be built the error is logged, kept in
    /// [`error`](Self::error), and the renderer is left disabled.
    pub fn new(ctx: &GpuContext, library: &ShaderLibrary, config: RendererConfig) -> Self {
        match build(ctx, library, &config) {
            Ok(resources) => {
                let planner = FramePlanner::new(
                    resources.vertices.count(),
                    config.clear,
                    resources.compute.as_ref().map(|stage| stage.dispatch),
                );
                log::debug!(
                    "triangle renderer ready: {} vertices, compute {:?}",
                    planner.vertex_count(),
                    planner.compute_dispatch()
                );
                Self {
                    planner,
                    resources: Some(resources),
                    error: None,
                }
            }
            Err(err) => {
                log::error!("creating pipeline state for `{}` failed: {err}", library.label());
                Self {
                    planner: FramePlanner::disabled(),
                    resources: None,
                    error: Some(err),
                }
            }
        }
    }

    pub fn state(&self) -> RendererState {
        self.planner.state()
    }

    pub fn is_ready(&self) -> bool {
        self.state() == RendererState::Ready
    }

    /// The initialization error of a disabled renderer.
    pub fn error(&self) -> Option<&PipelineError> {
        self.error.as_ref()
    }

    pub fn stats(&self) -> FrameStats {
        self.planner.stats()
    }

    pub fn planner(&self) -> &FramePlanner {
        &self.planner
    }

    /// Renders one frame into `target`.
    ///
    /// With no target the call returns [`FrameOutcome::Skipped`] without recording
    /// or submitting anything. Otherwise the frame's command buffers (compute first,
    /// when enabled) are submitted in one ordered batch and the target is presented.
    pub fn render<T: FrameTarget>(&mut self, ctx: &GpuContext, target: Option<T>) -> FrameOutcome {
        let Some(resources) = self.resources.as_ref() else {
            return FrameOutcome::Disabled;
        };
        let Some(target) = target else {
            log::trace!("no presentable target; frame skipped");
            return FrameOutcome::Skipped;
        };
        let Some(plan) = self.planner.plan(true) else {
            return FrameOutcome::Disabled;
        };

        let command_buffers = encode(ctx.device(), resources, &plan, target.color_view());
        ctx.queue().submit(command_buffers);
        target.present();

        self.planner.record(&plan);
        FrameOutcome::Rendered
    }
}

fn build(
    ctx: &GpuContext,
    library: &ShaderLibrary,
    config: &RendererConfig,
) -> Result<Resources, PipelineError> {
    if config.vertices.is_empty() {
        return Err(PipelineError::EmptyVertexData);
    }

    let device = ctx.device();
    let module = validated(device, library.label(), || library.create_module(device))?;

    let render = RenderPipelineState::new(
        device,
        library,
        &module,
        &RenderPipelineDesc {
            label: "trigon triangle pipeline",
            vertex_entry: VERTEX_MAIN,
            fragment_entry: FRAGMENT_MAIN,
            format: config.format,
            vertex_layout: Vertex::layout(),
        },
    )?;

    let vertices = VertexBuffer::new(device, &config.vertices);

    let compute = match config.rotation_step {
        Some(step) => {
            let count = vertices.count();
            let limit = device.limits().max_compute_workgroups_per_dimension;
            let dispatch = Dispatch::for_elements(count, limit)
                .ok_or(PipelineError::TooManyVertices { count })?;
            let constants = [
                ("WORKGROUP_SIZE", dispatch.workgroup_size[0] as f64),
                ("ROTATION_STEP", step as f64),
            ];
            let state = ComputePipelineState::new(
                device,
                library,
                &module,
                &ComputePipelineDesc {
                    label: "trigon transform pipeline",
                    entry: TRANSFORM,
                    constants: &constants,
                },
            )?;
            let bind_group = state.bind_storage(device, vertices.buffer())?;
            Some(ComputeStage {
                state,
                bind_group,
                dispatch,
            })
        }
        None => None,
    };

    Ok(Resources {
        vertices,
        render,
        compute,
    })
}

fn encode(
    device: &wgpu::Device,
    resources: &Resources,
    plan: &FramePlan,
    view: &wgpu::TextureView,
) -> Vec<wgpu::CommandBuffer> {
    plan.submissions()
        .iter()
        .map(|submission| encode_submission(device, resources, submission, view))
        .collect()
}

fn encode_submission(
    device: &wgpu::Device,
    resources: &Resources,
    submission: &Submission,
    view: &wgpu::TextureView,
) -> wgpu::CommandBuffer {
    let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
        label: Some(submission.label),
    });

    match &submission.pass {
        Pass::Compute(dispatch) => {
            let Some(compute) = resources.compute.as_ref() else {
                log::warn!("compute pass planned without a compute pipeline");
                return encoder.finish();
            };

            let mut cpass = encoder.begin_compute_pass(&wgpu::ComputePassDescriptor {
                label: Some(submission.label),
                timestamp_writes: None,
            });
            cpass.set_pipeline(compute.state.pipeline());
            cpass.set_bind_group(0, &compute.bind_group, &[]);
            let [x, y, z] = dispatch.workgroups;
            cpass.dispatch_workgroups(x, y, z);
        }

        Pass::Render { clear, draw } => {
            let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some(submission.label),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(clear.to_wgpu()),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });

            debug_assert_eq!(draw.topology, resources.render.topology());
            rpass.set_pipeline(resources.render.pipeline());
            rpass.set_vertex_buffer(0, resources.vertices.buffer().slice(..));
            rpass.draw(draw.vertices.clone(), draw.instances.clone());
        }
    }

    encoder.finish()
}
