//! Per-frame rendering driver.
//!
//! The GPU side is an external collaborator reached through [`Renderer`]:
//! positions are uploaded once as a shared vertex buffer, then every frame
//! issues one indexed draw per selected `(Segment, IndexView)` pair.

use glam::{Mat4, Vec2, Vec3};
use pointlod_core::{Camera, ClosestPosition, OptimizerConfig, Result, Viewport};
use pointlod_optimizer::{PointCloudOptimizer, SelectedView};

/// The rendering backend that owns the GPU buffers.
pub trait Renderer {
    /// Uploads the shared vertex buffer. Called once before the first draw.
    fn upload_positions(&mut self, positions: &[Vec3]) -> Result<()>;

    /// Called at the start of every rendered frame, before any draw.
    fn begin_frame(&mut self, _viewport: Viewport) -> Result<()> {
        Ok(())
    }

    /// Draws the chosen view of a visible segment from the shared vertex buffer.
    fn draw_indexed(&mut self, draw: &SelectedView<'_>) -> Result<()>;
}

/// Counters for one rendered frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    /// Number of draw calls issued.
    pub draw_calls: usize,
    /// Number of points drawn.
    pub rendered_points: usize,
    /// Number of segments skipped as invisible.
    pub culled_segments: usize,
}

/// A point cloud optimized for level-of-detail rendering.
///
/// Wraps a [`PointCloudOptimizer`] with the nominal point size and the upload
/// state of its vertex buffer.
#[derive(Debug)]
pub struct OptimizedPointMesh {
    optimizer: PointCloudOptimizer,
    target_pixel_size: f32,
    uploaded: bool,
    last_frame: FrameStats,
}

impl OptimizedPointMesh {
    /// Wraps an optimizer, built or not.
    pub fn new(optimizer: PointCloudOptimizer) -> Self {
        Self {
            optimizer,
            target_pixel_size: 1.0,
            uploaded: false,
            last_frame: FrameStats::default(),
        }
    }

    /// Optimizes `positions` and wraps the result.
    pub fn from_positions(positions: Vec<Vec3>, config: OptimizerConfig) -> Result<Self> {
        Ok(Self::new(PointCloudOptimizer::optimize(positions, config)?))
    }

    /// Returns the wrapped optimizer.
    #[must_use]
    pub fn optimizer(&self) -> &PointCloudOptimizer {
        &self.optimizer
    }

    /// Returns the nominal on-screen point spacing in pixels.
    #[must_use]
    pub fn target_pixel_size(&self) -> f32 {
        self.target_pixel_size
    }

    /// Sets the nominal on-screen point spacing in pixels.
    ///
    /// Larger values select coarser views. The value is checked on the next
    /// frame.
    pub fn set_target_pixel_size(&mut self, size: f32) {
        self.target_pixel_size = size;
    }

    /// Returns the counters of the last rendered frame.
    #[must_use]
    pub fn last_frame_stats(&self) -> FrameStats {
        self.last_frame
    }

    /// Renders one frame for the given view-projection matrix.
    ///
    /// Does nothing when the optimizer has not been built.
    pub fn render_frame(
        &mut self,
        renderer: &mut dyn Renderer,
        view_projection: Mat4,
        viewport: Viewport,
    ) -> Result<FrameStats> {
        if !self.optimizer.is_built() {
            log::debug!("skipping frame: point cloud not optimized");
            self.last_frame = FrameStats::default();
            return Ok(self.last_frame);
        }

        if !self.uploaded {
            renderer.upload_positions(self.optimizer.positions()?)?;
            self.uploaded = true;
        }
        renderer.begin_frame(viewport)?;

        let selection =
            self.optimizer
                .select_visible_views(view_projection, viewport, self.target_pixel_size)?;

        let mut stats = FrameStats {
            culled_segments: selection.stats().culled_segments,
            ..FrameStats::default()
        };
        for selected in selection.iter() {
            renderer.draw_indexed(selected)?;
            stats.draw_calls += 1;
            stats.rendered_points += selected.view.len();
        }

        self.last_frame = stats;
        Ok(stats)
    }

    /// Renders one frame as seen by `camera`.
    pub fn render_camera(
        &mut self,
        renderer: &mut dyn Renderer,
        camera: &Camera,
        viewport: Viewport,
    ) -> Result<FrameStats> {
        self.render_frame(renderer, camera.view_projection_matrix(), viewport)
    }

    /// Returns the position closest to the camera ray through `pixel`.
    ///
    /// Returns `Ok(None)` when no position lies within `max_distance` of the
    /// ray or no ray exists for the pixel.
    pub fn pick(
        &self,
        camera: &Camera,
        viewport: Viewport,
        pixel: Vec2,
        max_distance: f32,
    ) -> Result<Option<ClosestPosition>> {
        crate::pick::pick_closest(&self.optimizer, camera, viewport, pixel, max_distance)
    }

    /// Releases the optimizer's data. The mesh draws nothing afterwards.
    pub fn dispose(&mut self) {
        self.optimizer.dispose();
        self.uploaded = false;
        self.last_frame = FrameStats::default();
    }
}
