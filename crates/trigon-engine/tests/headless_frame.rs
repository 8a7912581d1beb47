//! End-to-end frames rendered into an offscreen texture.
//!
//! Every test returns early when the machine has no usable adapter, so the suite
//! stays green on GPU-less CI.

use trigon_engine::device::{GpuContext, GpuInit};
use trigon_engine::render::{
    FrameOutcome, FrameStats, OffscreenTarget, PipelineError, RendererConfig, TriangleRenderer,
};
use trigon_engine::shader::{ShaderError, ShaderLibrary, FRAGMENT_MAIN};

const FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Bgra8Unorm;

/// Readback edge; 64 BGRA texels fill one 256-byte aligned row.
const SIDE: u32 = 64;
const ROW_BYTES: u32 = SIDE * 4;

/// Default clear color (0.8, 0, 0, 1) as stored in a BGRA texel.
const CLEAR_BGRA: [u8; 4] = [0, 0, 204, 255];
const WHITE: [u8; 4] = [255; 4];

/// Right of the diagonal, inside the triangle.
const INSIDE: (u32, u32) = (60, 32);
/// Left of the diagonal; the half-turned triangle covers it.
const OUTSIDE: (u32, u32) = (3, 32);

fn context() -> Option<GpuContext> {
    match pollster::block_on(GpuContext::headless(&GpuInit::default())) {
        Ok(ctx) => Some(ctx),
        Err(err) => {
            eprintln!("skipping: {err}");
            None
        }
    }
}

fn supports_compute(ctx: &GpuContext) -> bool {
    ctx.adapter()
        .get_downlevel_capabilities()
        .flags
        .contains(wgpu::DownlevelFlags::COMPUTE_SHADERS)
}

/// Copies the target back to host memory as tightly packed BGRA rows.
fn read_pixels(ctx: &GpuContext, target: &OffscreenTarget) -> Vec<u8> {
    let device = ctx.device();
    let readback = device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("readback"),
        size: (ROW_BYTES * SIDE) as u64,
        usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::MAP_READ,
        mapped_at_creation: false,
    });

    let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
        label: Some("readback"),
    });
    encoder.copy_texture_to_buffer(
        target.texture().as_image_copy(),
        wgpu::TexelCopyBufferInfo {
            buffer: &readback,
            layout: wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(ROW_BYTES),
                rows_per_image: Some(SIDE),
            },
        },
        wgpu::Extent3d {
            width: SIDE,
            height: SIDE,
            depth_or_array_layers: 1,
        },
    );
    ctx.queue().submit(std::iter::once(encoder.finish()));

    let slice = readback.slice(..);
    let (sender, receiver) = std::sync::mpsc::channel();
    slice.map_async(wgpu::MapMode::Read, move |result| {
        sender.send(result).unwrap();
    });
    device.poll(wgpu::PollType::wait_indefinitely()).unwrap();
    receiver.recv().unwrap().unwrap();

    let pixels = slice.get_mapped_range().to_vec();
    readback.unmap();
    pixels
}

fn texel(pixels: &[u8], (x, y): (u32, u32)) -> [u8; 4] {
    let at = (y * ROW_BYTES + x * 4) as usize;
    pixels[at..at + 4].try_into().unwrap()
}

#[test]
fn static_frame_submits_one_draw_of_three_vertices() {
    let Some(ctx) = context() else { return };
    let library = ShaderLibrary::triangle().unwrap();

    let mut renderer = TriangleRenderer::new(&ctx, &library, RendererConfig::default());
    assert!(renderer.is_ready());
    assert!(renderer.error().is_none());

    let target = OffscreenTarget::new(ctx.device(), FORMAT, 500, 500);
    assert_eq!(renderer.render(&ctx, Some(&target)), FrameOutcome::Rendered);

    assert_eq!(
        renderer.stats(),
        FrameStats {
            frames: 1,
            command_buffers: 1,
            draw_calls: 1,
            dispatches: 0,
        }
    );
    let plan = renderer.planner().plan(true).unwrap();
    assert_eq!(plan.draw_calls().next().unwrap().vertex_count(), 3);
}

#[test]
fn rotating_frame_submits_compute_before_render() {
    let Some(ctx) = context() else { return };
    if !supports_compute(&ctx) {
        eprintln!("skipping: adapter has no compute shaders");
        return;
    }
    let library = ShaderLibrary::triangle().unwrap();

    let config = RendererConfig {
        rotation_step: Some(0.05),
        ..RendererConfig::default()
    };
    let mut renderer = TriangleRenderer::new(&ctx, &library, config);
    assert!(renderer.is_ready());

    let dispatch = renderer.planner().compute_dispatch().unwrap();
    assert_eq!(dispatch.workgroups, [1, 1, 1]);
    assert_eq!(dispatch.workgroup_size, [3, 1, 1]);

    let target = OffscreenTarget::new(ctx.device(), FORMAT, 500, 500);
    for _ in 0..3 {
        assert_eq!(renderer.render(&ctx, Some(&target)), FrameOutcome::Rendered);
    }

    assert_eq!(
        renderer.stats(),
        FrameStats {
            frames: 3,
            command_buffers: 6,
            draw_calls: 3,
            dispatches: 3,
        }
    );
}

#[test]
fn missing_target_skips_without_submitting() {
    let Some(ctx) = context() else { return };
    let library = ShaderLibrary::triangle().unwrap();

    let mut renderer = TriangleRenderer::new(&ctx, &library, RendererConfig::default());
    let before = renderer.stats();

    assert_eq!(
        renderer.render::<&OffscreenTarget>(&ctx, None),
        FrameOutcome::Skipped
    );
    assert_eq!(renderer.stats(), before);
    assert!(renderer.is_ready());
}

#[test]
fn missing_fragment_entry_disables_renderer() {
    let Some(ctx) = context() else { return };
    let library = ShaderLibrary::from_wgsl(
        "no-fragment",
        r#"
@vertex
fn vertex_main(@location(0) position: vec4<f32>) -> @builtin(position) vec4<f32> {
    return position;
}
"#,
    )
    .unwrap();

    let mut renderer = TriangleRenderer::new(&ctx, &library, RendererConfig::default());
    assert!(!renderer.is_ready());
    match renderer.error() {
        Some(PipelineError::Shader(ShaderError::MissingEntryPoint { name, .. })) => {
            assert_eq!(name, FRAGMENT_MAIN);
        }
        other => panic!("unexpected init result: {other:?}"),
    }

    let target = OffscreenTarget::new(ctx.device(), FORMAT, 500, 500);
    assert_eq!(renderer.render(&ctx, Some(&target)), FrameOutcome::Disabled);
    assert_eq!(renderer.stats(), FrameStats::default());
}

#[test]
fn empty_vertex_data_disables_renderer() {
    let Some(ctx) = context() else { return };
    let library = ShaderLibrary::triangle().unwrap();

    let config = RendererConfig {
        vertices: Vec::new(),
        ..RendererConfig::default()
    };
    let renderer = TriangleRenderer::new(&ctx, &library, config);
    assert!(!renderer.is_ready());
    assert!(matches!(renderer.error(), Some(PipelineError::EmptyVertexData)));
}

#[test]
fn static_frame_draws_white_triangle_on_clear_color() {
    let Some(ctx) = context() else { return };
    let library = ShaderLibrary::triangle().unwrap();

    let mut renderer = TriangleRenderer::new(&ctx, &library, RendererConfig::default());
    let target = OffscreenTarget::new(ctx.device(), FORMAT, SIDE, SIDE);
    assert_eq!(renderer.render(&ctx, Some(&target)), FrameOutcome::Rendered);

    let pixels = read_pixels(&ctx, &target);
    assert_eq!(texel(&pixels, INSIDE), WHITE);
    assert_eq!(texel(&pixels, OUTSIDE), CLEAR_BGRA);
}

#[test]
fn half_turn_moves_triangle_across_the_diagonal() {
    let Some(ctx) = context() else { return };
    if !supports_compute(&ctx) {
        eprintln!("skipping: adapter has no compute shaders");
        return;
    }
    let library = ShaderLibrary::triangle().unwrap();

    let config = RendererConfig {
        rotation_step: Some(std::f32::consts::PI),
        ..RendererConfig::default()
    };
    let mut renderer = TriangleRenderer::new(&ctx, &library, config);
    let target = OffscreenTarget::new(ctx.device(), FORMAT, SIDE, SIDE);
    assert_eq!(renderer.render(&ctx, Some(&target)), FrameOutcome::Rendered);

    // The kernel runs before the draw, so the first frame already shows the turn.
    let pixels = read_pixels(&ctx, &target);
    assert_eq!(texel(&pixels, INSIDE), CLEAR_BGRA);
    assert_eq!(texel(&pixels, OUTSIDE), WHITE);
}

#[test]
fn device_rejected_layout_disables_renderer() {
    let Some(ctx) = context() else { return };
    // Parses and validates, but the pipeline has no layout for group 0.
    let library = ShaderLibrary::from_wgsl(
        "unbound-uniform",
        r#"
@group(0) @binding(0)
var<uniform> offset: vec4<f32>;

@vertex
fn vertex_main(@location(0) position: vec4<f32>) -> @builtin(position) vec4<f32> {
    return position + offset;
}

@fragment
fn fragment_main() -> @location(0) vec4<f32> {
    return vec4<f32>(1.0, 1.0, 1.0, 1.0);
}
"#,
    )
    .unwrap();

    let mut renderer = TriangleRenderer::new(&ctx, &library, RendererConfig::default());
    assert!(!renderer.is_ready());
    match renderer.error() {
        Some(PipelineError::Device { label, .. }) => assert_eq!(label, "trigon triangle pipeline"),
        other => panic!("unexpected init result: {other:?}"),
    }

    let target = OffscreenTarget::new(ctx.device(), FORMAT, SIDE, SIDE);
    assert_eq!(renderer.render(&ctx, Some(&target)), FrameOutcome::Disabled);
    assert_eq!(renderer.stats(), FrameStats::default());
}
