//! Segments and their level-of-detail ladders.

use std::collections::HashSet;
use std::ops::Range;

use glam::Vec3;
use pointlod_core::{BoundingVolume, OptimizerConfig};

use crate::index_view::IndexView;

/// A contiguous range of the position set with its own bounds and views.
///
/// Views are ordered from full density (index 0) to coarsest, with strictly
/// decreasing index counts.
#[derive(Debug, Clone)]
pub struct Segment {
    id: usize,
    range: Range<usize>,
    bounds: BoundingVolume,
    views: Vec<IndexView>,
}

impl Segment {
    /// Builds the segment covering `range` of `positions`.
    ///
    /// `range` must be non-empty, lie within `positions` and end at or below
    /// `u32::MAX`.
    pub fn build(
        id: usize,
        positions: &[Vec3],
        range: Range<usize>,
        config: &OptimizerConfig,
    ) -> Self {
        let slice = &positions[range.clone()];
        let bounds = BoundingVolume::from_points(slice)
            .unwrap_or_else(|| BoundingVolume::new(Vec3::ZERO, Vec3::ZERO));
        let views = build_views(positions, range.clone(), &bounds, config);

        log::debug!(
            "segment {id}: {} points, {} views, coarsest {} indices",
            range.len(),
            views.len(),
            views.last().map_or(0, IndexView::len)
        );

        Self {
            id,
            range,
            bounds,
            views,
        }
    }

    /// Returns the ordinal of this segment within its optimizer.
    #[must_use]
    pub fn id(&self) -> usize {
        self.id
    }

    /// Returns the index range covered by this segment.
    #[must_use]
    pub fn range(&self) -> Range<usize> {
        self.range.clone()
    }

    /// Returns the number of positions in this segment.
    #[must_use]
    pub fn len(&self) -> usize {
        self.range.len()
    }

    /// Returns true if the segment covers no positions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.range.is_empty()
    }

    /// Returns the bounding volume of the segment's positions.
    #[must_use]
    pub fn bounds(&self) -> &BoundingVolume {
        &self.bounds
    }

    /// Returns all views, finest first.
    #[must_use]
    pub fn views(&self) -> &[IndexView] {
        &self.views
    }

    /// Returns the view at `level` (0 = full density).
    #[must_use]
    pub fn view(&self, level: usize) -> Option<&IndexView> {
        self.views.get(level)
    }

    /// Returns the full-density view.
    #[must_use]
    pub fn full_view(&self) -> &IndexView {
        &self.views[0]
    }

    /// Returns the level of the coarsest view.
    #[must_use]
    pub fn coarsest_level(&self) -> usize {
        self.views.len() - 1
    }

    /// Returns the coarsest view.
    #[must_use]
    pub fn coarsest_view(&self) -> &IndexView {
        &self.views[self.coarsest_level()]
    }

    /// Returns the number of indices over all views.
    #[must_use]
    pub fn total_index_count(&self) -> usize {
        self.views.iter().map(IndexView::len).sum()
    }
}

/// Builds the view ladder of one segment.
///
/// Each rung doubles the pixel scale and keeps the first index per grid cell
/// of the previous rung. Grids are anchored at `bounds.min`, so a coarse cell
/// is exactly the union of eight finer cells and reducing the previous rung
/// gives the same result as reducing the full segment.
#[allow(clippy::cast_possible_truncation)]
fn build_views(
    positions: &[Vec3],
    range: Range<usize>,
    bounds: &BoundingVolume,
    config: &OptimizerConfig,
) -> Vec<IndexView> {
    let full: Vec<u32> = (range.start as u32..range.end as u32).collect();
    let mut views = vec![IndexView::full(full)];

    let max_extent = bounds.max_extent();
    let mut pixel_scale = 1.0_f32;

    while let Some(last) = views.last() {
        if views.len() >= config.max_views_per_segment
            || last.len() <= config.indices_number_threshold
            || last.len() <= 1
        {
            break;
        }

        let cell = max_extent * pixel_scale / config.reference_resolution;
        let reduced = reduce_to_grid(positions, last.indices(), bounds.min, cell);
        let covers_segment = cell >= max_extent;

        if reduced.len() < last.len() {
            views.push(IndexView::new(reduced, cell, pixel_scale));
        }
        if covers_segment {
            break;
        }
        pixel_scale *= 2.0;
    }

    views
}

/// Keeps the first index of each occupied grid cell, preserving order.
#[allow(clippy::cast_possible_truncation)]
fn reduce_to_grid(positions: &[Vec3], indices: &[u32], origin: Vec3, cell: f32) -> Vec<u32> {
    let mut occupied: HashSet<(i64, i64, i64)> = HashSet::with_capacity(indices.len() / 2);
    let mut kept = Vec::new();

    for &index in indices {
        let key = if cell > 0.0 {
            let c = ((positions[index as usize] - origin) / cell).floor();
            (c.x as i64, c.y as i64, c.z as i64)
        } else {
            (0, 0, 0)
        };
        if occupied.insert(key) {
            kept.push(index);
        }
    }

    kept
}
