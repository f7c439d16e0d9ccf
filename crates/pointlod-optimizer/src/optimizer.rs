//! The point-cloud optimizer and its lifecycle.

use glam::{Mat4, Vec3};
use pointlod_core::{
    BoundingVolume, ClosestPosition, OptimizerConfig, PointLodError, Ray, Result, Viewport,
};
use rayon::prelude::*;

use crate::partition::partition_ranges;
use crate::query::closest_position;
use crate::segment::Segment;
use crate::selection::{select_views, FrameParams, Selection};

/// Lifecycle state of a [`PointCloudOptimizer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptimizerState {
    /// No successful build yet.
    Uninitialized,
    /// Segments are built and queries may run.
    Built,
    /// Data has been released; the optimizer cannot be used again.
    Disposed,
}

/// Everything produced by a successful build.
#[derive(Debug)]
struct OptimizedPoints {
    positions: Vec<Vec3>,
    bounds: BoundingVolume,
    segments: Vec<Segment>,
    config: OptimizerConfig,
}

#[derive(Debug)]
enum Inner {
    Uninitialized,
    Built(OptimizedPoints),
    Disposed,
}

/// Splits a static point cloud into segments with reduced-density index views
/// and picks, every frame, which view of each visible segment to draw.
///
/// Built data is immutable, so a built optimizer can be shared across threads
/// and queried concurrently.
#[derive(Debug)]
pub struct PointCloudOptimizer {
    inner: Inner,
}

impl PointCloudOptimizer {
    /// Creates an optimizer with no data.
    pub fn new() -> Self {
        Self {
            inner: Inner::Uninitialized,
        }
    }

    /// Creates an optimizer and builds it from `positions`, computing bounds.
    pub fn optimize(positions: Vec<Vec3>, config: OptimizerConfig) -> Result<Self> {
        let mut optimizer = Self::new();
        optimizer.build(positions, None, config)?;
        Ok(optimizer)
    }

    /// Partitions `positions` into segments and builds their view ladders.
    ///
    /// `bounds` is computed from the positions when `None`. Building a built
    /// optimizer replaces its data. On error the optimizer is left
    /// uninitialized.
    pub fn build(
        &mut self,
        positions: Vec<Vec3>,
        bounds: Option<BoundingVolume>,
        config: OptimizerConfig,
    ) -> Result<()> {
        if matches!(self.inner, Inner::Disposed) {
            return Err(PointLodError::Disposed);
        }
        self.inner = Inner::Uninitialized;

        match Self::build_points(positions, bounds, config) {
            Ok(points) => {
                log::info!(
                    "optimized {} positions into {} segments ({} views, {} indices)",
                    points.positions.len(),
                    points.segments.len(),
                    points.segments.iter().map(|s| s.views().len()).sum::<usize>(),
                    points.segments.iter().map(Segment::total_index_count).sum::<usize>()
                );
                self.inner = Inner::Built(points);
                Ok(())
            }
            Err(err) => {
                log::warn!("point cloud optimization rejected: {err}");
                Err(err)
            }
        }
    }

    fn build_points(
        positions: Vec<Vec3>,
        bounds: Option<BoundingVolume>,
        config: OptimizerConfig,
    ) -> Result<OptimizedPoints> {
        config.validate_for(positions.len())?;
        if u32::try_from(positions.len()).is_err() {
            return Err(PointLodError::InvalidConfiguration(format!(
                "{} positions exceed the 32-bit index range",
                positions.len()
            )));
        }

        let bounds = match bounds {
            Some(bounds) => bounds,
            None => BoundingVolume::from_points(&positions).ok_or_else(|| {
                PointLodError::InvalidConfiguration("positions contain no finite point".to_string())
            })?,
        };

        let ranges = partition_ranges(positions.len(), config.segment_count);
        let segments: Vec<Segment> = if config.parallel_build {
            ranges
                .into_par_iter()
                .enumerate()
                .map(|(id, range)| Segment::build(id, &positions, range, &config))
                .collect()
        } else {
            ranges
                .into_iter()
                .enumerate()
                .map(|(id, range)| Segment::build(id, &positions, range, &config))
                .collect()
        };

        Ok(OptimizedPoints {
            positions,
            bounds,
            segments,
            config,
        })
    }

    /// Returns the lifecycle state.
    #[must_use]
    pub fn state(&self) -> OptimizerState {
        match self.inner {
            Inner::Uninitialized => OptimizerState::Uninitialized,
            Inner::Built(_) => OptimizerState::Built,
            Inner::Disposed => OptimizerState::Disposed,
        }
    }

    /// Returns true once a build has succeeded and before disposal.
    #[must_use]
    pub fn is_built(&self) -> bool {
        matches!(self.inner, Inner::Built(_))
    }

    fn built(&self) -> Result<&OptimizedPoints> {
        match &self.inner {
            Inner::Built(points) => Ok(points),
            Inner::Uninitialized => Err(PointLodError::NotInitialized),
            Inner::Disposed => Err(PointLodError::Disposed),
        }
    }

    /// Returns the optimized positions, in their original order.
    pub fn positions(&self) -> Result<&[Vec3]> {
        Ok(&self.built()?.positions)
    }

    /// Returns the bounds of the whole position set.
    pub fn bounds(&self) -> Result<BoundingVolume> {
        Ok(self.built()?.bounds)
    }

    /// Returns the segments in index order.
    pub fn segments(&self) -> Result<&[Segment]> {
        Ok(&self.built()?.segments)
    }

    /// Returns the configuration the optimizer was built with.
    pub fn config(&self) -> Result<&OptimizerConfig> {
        Ok(&self.built()?.config)
    }

    /// Returns the number of indices over all views of all segments.
    pub fn total_index_count(&self) -> Result<usize> {
        Ok(self
            .built()?
            .segments
            .iter()
            .map(Segment::total_index_count)
            .sum())
    }

    /// Chooses the view to draw for every segment visible under `view_projection`.
    ///
    /// Segments entirely outside the clip volume are dropped (unless culling
    /// is disabled). For the rest, the coarsest view whose point spacing
    /// projects to at most `target_pixel_size` pixels is chosen. The result
    /// is in segment order and identical for identical inputs.
    pub fn select_visible_views(
        &self,
        view_projection: Mat4,
        viewport: Viewport,
        target_pixel_size: f32,
    ) -> Result<Selection<'_>> {
        let points = self.built()?;
        if !(target_pixel_size.is_finite() && target_pixel_size > 0.0) {
            return Err(PointLodError::InvalidConfiguration(format!(
                "target_pixel_size must be positive and finite, got {target_pixel_size}"
            )));
        }

        let params = FrameParams {
            view_projection,
            viewport,
            target_pixel_size,
            frustum_culling: points.config.frustum_culling,
        };
        let selection = select_views(&points.segments, &params, points.config.parallel_selection);

        let stats = selection.stats();
        log::debug!(
            "selected {}/{} segments, {} indices",
            stats.visible_segments,
            stats.total_segments,
            stats.selected_indices
        );
        Ok(selection)
    }

    /// Returns the position closest to `ray` within `max_distance`, or `None`.
    pub fn closest_index(&self, ray: &Ray, max_distance: f32) -> Result<Option<ClosestPosition>> {
        let points = self.built()?;
        if !(max_distance.is_finite() && max_distance >= 0.0) {
            return Err(PointLodError::InvalidConfiguration(format!(
                "max_distance must be non-negative and finite, got {max_distance}"
            )));
        }
        Ok(closest_position(
            &points.positions,
            &points.segments,
            ray,
            max_distance,
        ))
    }

    /// Releases all data. Every later call returns [`PointLodError::Disposed`].
    pub fn dispose(&mut self) {
        if !matches!(self.inner, Inner::Disposed) {
            self.inner = Inner::Disposed;
            log::info!("point cloud optimizer disposed");
        }
    }
}

impl Default for PointCloudOptimizer {
    fn default() -> Self {
        Self::new()
    }
}
