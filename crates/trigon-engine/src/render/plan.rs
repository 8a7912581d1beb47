//! Per-frame command planning.
//!
//! A [`FramePlan`] describes, without touching the GPU, which command buffers a
//! frame submits and what each one records. The renderer encodes plans as-is, so
//! frame-level guarantees (one draw of the uploaded vertex count, compute before
//! render, nothing submitted without a target) are checked here.

use std::ops::Range;

use crate::paint::Color;

/// Upper bound on threads per workgroup used for element-wise kernels.
pub const MAX_WORKGROUP_SIZE: u32 = 64;

/// Workgroup grid for a compute dispatch.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct Dispatch {
    pub workgroups: [u32; 3],
    pub workgroup_size: [u32; 3],
}

impl Dispatch {
    /// One thread per element: `min(count, MAX_WORKGROUP_SIZE)` threads per group and
    /// as many groups as needed to cover `count`.
    ///
    /// Groups are laid out along x until `max_groups_per_dim`, then wrap into y.
    /// Returns `None` for `count == 0` or when even the y dimension would overflow.
    pub fn for_elements(count: u32, max_groups_per_dim: u32) -> Option<Self> {
        if count == 0 || max_groups_per_dim == 0 {
            return None;
        }

        let size = count.min(MAX_WORKGROUP_SIZE);
        let groups = count.div_ceil(size);
        let (x, y) = if groups <= max_groups_per_dim {
            (groups, 1)
        } else {
            (max_groups_per_dim, groups.div_ceil(max_groups_per_dim))
        };
        if y > max_groups_per_dim {
            return None;
        }

        Some(Self {
            workgroups: [x, y, 1],
            workgroup_size: [size, 1, 1],
        })
    }

    /// Total number of kernel invocations.
    pub fn invocations(&self) -> u64 {
        let groups: u64 = self.workgroups.iter().map(|&g| g as u64).product();
        let size: u64 = self.workgroup_size.iter().map(|&s| s as u64).product();
        groups * size
    }
}

/// A single non-indexed draw.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct DrawCall {
    pub topology: wgpu::PrimitiveTopology,
    pub vertices: Range<u32>,
    pub instances: Range<u32>,
}

impl DrawCall {
    /// One instance of a triangle list covering `vertex_count` vertices.
    pub fn triangles(vertex_count: u32) -> Self {
        Self {
            topology: wgpu::PrimitiveTopology::TriangleList,
            vertices: 0..vertex_count,
            instances: 0..1,
        }
    }

    pub fn vertex_count(&self) -> u32 {
        self.vertices.len() as u32
    }

    pub fn instance_count(&self) -> u32 {
        self.instances.len() as u32
    }
}

/// The single pass recorded into one command buffer.
#[derive(Debug, Clone, PartialEq)]
pub enum Pass {
    /// Rewrites the vertex buffer in place.
    Compute(Dispatch),
    /// Clears the target and draws from the vertex buffer.
    Render { clear: Color, draw: DrawCall },
}

/// One command buffer of a frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Submission {
    pub label: &'static str,
    pub pass: Pass,
    /// Index of the submission whose writes this one reads.
    pub after: Option<usize>,
}

/// Ordered command buffers for one frame, submitted as a single batch.
#[derive(Debug, Clone, PartialEq)]
pub struct FramePlan {
    submissions: Vec<Submission>,
}

impl FramePlan {
    pub fn submissions(&self) -> &[Submission] {
        &self.submissions
    }

    pub fn command_buffers(&self) -> usize {
        self.submissions.len()
    }

    pub fn draw_calls(&self) -> impl Iterator<Item = &DrawCall> {
        self.submissions.iter().filter_map(|s| match &s.pass {
            Pass::Render { draw, .. } => Some(draw),
            Pass::Compute(_) => None,
        })
    }

    pub fn dispatches(&self) -> impl Iterator<Item = &Dispatch> {
        self.submissions.iter().filter_map(|s| match &s.pass {
            Pass::Compute(d) => Some(d),
            Pass::Render { .. } => None,
        })
    }
}

/// Whether the renderer may draw.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum RendererState {
    /// Pipelines and buffers exist; frames are drawn.
    Ready,
    /// Initialization failed; frames are never drawn.
    Disabled,
}

/// Counters over submitted frames.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct FrameStats {
    pub frames: u64,
    pub command_buffers: u64,
    pub draw_calls: u64,
    pub dispatches: u64,
}

/// Builds a [`FramePlan`] per display refresh.
#[derive(Debug, Clone)]
pub struct FramePlanner {
    state: RendererState,
    vertex_count: u32,
    clear: Color,
    compute: Option<Dispatch>,
    stats: FrameStats,
}

impl FramePlanner {
    /// Planner for a renderer with `vertex_count` uploaded vertices.
    ///
    /// When `compute` is set every frame starts with that dispatch.
    pub fn new(vertex_count: u32, clear: Color, compute: Option<Dispatch>) -> Self {
        Self {
            state: RendererState::Ready,
            vertex_count,
            clear,
            compute,
            stats: FrameStats::default(),
        }
    }

    /// Planner that never produces a frame.
    pub fn disabled() -> Self {
        Self {
            state: RendererState::Disabled,
            vertex_count: 0,
            clear: Color::transparent(),
            compute: None,
            stats: FrameStats::default(),
        }
    }

    pub fn state(&self) -> RendererState {
        self.state
    }

    pub fn stats(&self) -> FrameStats {
        self.stats
    }

    /// The per-frame compute dispatch, if this planner rotates vertices.
    pub fn compute_dispatch(&self) -> Option<Dispatch> {
        self.compute
    }

    pub fn vertex_count(&self) -> u32 {
        self.vertex_count
    }

    /// Plans the next frame.
    ///
    /// Returns `None` when no presentable target is available or the renderer is
    /// disabled. This method does not mutate the planner.
    pub fn plan(&self, target_available: bool) -> Option<FramePlan> {
        if !target_available || self.state == RendererState::Disabled {
            return None;
        }

        let mut submissions = Vec::with_capacity(2);

        if let Some(dispatch) = self.compute {
            submissions.push(Submission {
                label: "trigon transform",
                pass: Pass::Compute(dispatch),
                after: None,
            });
        }

        let after = submissions.len().checked_sub(1);
        submissions.push(Submission {
            label: "trigon triangle",
            pass: Pass::Render {
                clear: self.clear,
                draw: DrawCall::triangles(self.vertex_count),
            },
            after,
        });

        Some(FramePlan { submissions })
    }

    /// Records a plan that has been submitted.
    pub fn record(&mut self, plan: &FramePlan) {
        self.stats.frames += 1;
        self.stats.command_buffers += plan.command_buffers() as u64;
        self.stats.draw_calls += plan.draw_calls().count() as u64;
        self.stats.dispatches += plan.dispatches().count() as u64;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: Color = Color::rgba(0.8, 0.0, 0.0, 1.0);

    /// `max_compute_workgroups_per_dimension` of `wgpu::Limits::default()`.
    const LIMIT: u32 = 65535;

    fn rotating(count: u32) -> FramePlanner {
        FramePlanner::new(count, RED, Dispatch::for_elements(count, LIMIT))
    }

    // ── dispatch sizing ───────────────────────────────────────────────────

    #[test]
    fn three_vertices_dispatch_one_group_of_three() {
        let d = Dispatch::for_elements(3, LIMIT).unwrap();
        assert_eq!(d.workgroups, [1, 1, 1]);
        assert_eq!(d.workgroup_size, [3, 1, 1]);
        assert_eq!(d.invocations(), 3);
    }

    #[test]
    fn dispatch_follows_vertex_count() {
        for count in [1, 4, 63, 64, 65, 128, 1000] {
            let d = Dispatch::for_elements(count, LIMIT).unwrap();
            assert!(d.invocations() >= count as u64, "count {count} not covered");
            // No whole workgroup is wasted.
            assert!(d.invocations() - (count as u64) < d.workgroup_size[0] as u64);
            assert!(d.workgroup_size[0] <= MAX_WORKGROUP_SIZE);
        }
    }

    #[test]
    fn large_counts_use_full_workgroups() {
        let d = Dispatch::for_elements(65, LIMIT).unwrap();
        assert_eq!(d.workgroups, [2, 1, 1]);
        assert_eq!(d.workgroup_size, [64, 1, 1]);
    }

    #[test]
    fn zero_elements_have_no_dispatch() {
        assert_eq!(Dispatch::for_elements(0, LIMIT), None);
    }

    #[test]
    fn groups_wrap_into_y_past_the_dimension_limit() {
        // 10 groups of 64 with at most 4 groups per dimension.
        let d = Dispatch::for_elements(640, 4).unwrap();
        assert_eq!(d.workgroups, [4, 3, 1]);
        assert_eq!(d.workgroup_size, [64, 1, 1]);
        assert!(d.invocations() >= 640);
    }

    #[test]
    fn dispatch_beyond_both_dimensions_is_refused() {
        // 17 groups cannot fit in a 4x4 grid.
        assert_eq!(Dispatch::for_elements(64 * 17, 4), None);
        assert!(Dispatch::for_elements(64 * 16, 4).is_some());
    }

    // ── plans ─────────────────────────────────────────────────────────────

    #[test]
    fn static_frame_is_one_command_buffer_with_one_draw() {
        let planner = FramePlanner::new(3, RED, None);
        let plan = planner.plan(true).unwrap();

        assert_eq!(plan.command_buffers(), 1);
        assert_eq!(plan.dispatches().count(), 0);

        let draws: Vec<_> = plan.draw_calls().collect();
        assert_eq!(draws.len(), 1);
        assert_eq!(draws[0].vertex_count(), 3);
        assert_eq!(draws[0].instance_count(), 1);
        assert_eq!(draws[0].topology, wgpu::PrimitiveTopology::TriangleList);
    }

    #[test]
    fn render_pass_clears_to_configured_color() {
        let plan = FramePlanner::new(3, RED, None).plan(true).unwrap();
        match &plan.submissions()[0].pass {
            Pass::Render { clear, .. } => assert_eq!(*clear, RED),
            other => panic!("expected render pass, got {other:?}"),
        }
    }

    #[test]
    fn rotating_frame_runs_compute_before_render() {
        let plan = rotating(3).plan(true).unwrap();
        let subs = plan.submissions();

        assert_eq!(subs.len(), 2);
        assert_eq!(subs[0].pass, Pass::Compute(Dispatch::for_elements(3, LIMIT).unwrap()));
        assert_eq!(subs[0].after, None);
        assert!(matches!(subs[1].pass, Pass::Render { .. }));
        assert_eq!(subs[1].after, Some(0));

        assert_eq!(plan.draw_calls().count(), 1);
        assert_eq!(plan.dispatches().count(), 1);
    }

    #[test]
    fn draw_uses_uploaded_vertex_count() {
        for count in [3, 6, 99] {
            let plan = rotating(count).plan(true).unwrap();
            let draw = plan.draw_calls().next().unwrap();
            assert_eq!(draw.vertex_count(), count);
            let dispatch = plan.dispatches().next().unwrap();
            assert!(dispatch.invocations() >= count as u64);
        }
    }

    // ── skipping ──────────────────────────────────────────────────────────

    #[test]
    fn no_target_means_no_plan_and_no_state_change() {
        let planner = rotating(3);
        let before = planner.stats();

        assert_eq!(planner.plan(false), None);
        assert_eq!(planner.plan(false), None);

        assert_eq!(planner.stats(), before);
        assert_eq!(planner.state(), RendererState::Ready);
    }

    #[test]
    fn disabled_planner_never_draws() {
        let planner = FramePlanner::disabled();
        assert_eq!(planner.state(), RendererState::Disabled);
        assert_eq!(planner.plan(true), None);
        assert_eq!(planner.stats(), FrameStats::default());
    }

    #[test]
    fn record_accumulates_submitted_work() {
        let mut planner = rotating(3);
        for _ in 0..4 {
            let plan = planner.plan(true).unwrap();
            planner.record(&plan);
        }

        assert_eq!(
            planner.stats(),
            FrameStats {
                frames: 4,
                command_buffers: 8,
                draw_calls: 4,
                dispatches: 4,
            }
        );
    }
}
