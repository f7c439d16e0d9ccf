//! Per-frame choice of which view to draw for each visible segment.

use glam::{Mat4, Vec2};
use pointlod_core::{BoundingVolume, Viewport};
use rayon::prelude::*;

use crate::index_view::IndexView;
use crate::segment::Segment;

/// Clip-space `w` below which a corner counts as on or behind the eye.
const MIN_CLIP_W: f32 = 1e-6;

/// One draw decided by [`select_views`]: a segment and the view to draw it with.
#[derive(Debug, Clone, Copy)]
pub struct SelectedView<'a> {
    /// The visible segment.
    pub segment: &'a Segment,
    /// The chosen view of that segment.
    pub view: &'a IndexView,
    /// Ladder level of the chosen view (0 = full density).
    pub level: usize,
}

/// Counters describing one selection pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SelectionStats {
    /// Number of segments considered.
    pub total_segments: usize,
    /// Number of segments that produced a draw.
    pub visible_segments: usize,
    /// Number of segments dropped by frustum culling.
    pub culled_segments: usize,
    /// Sum of the index counts of all chosen views.
    pub selected_indices: usize,
}

/// The draws chosen for one frame, in segment order.
#[derive(Debug, Clone, Default)]
pub struct Selection<'a> {
    views: Vec<SelectedView<'a>>,
    stats: SelectionStats,
}

impl<'a> Selection<'a> {
    /// Returns the chosen draws.
    #[must_use]
    pub fn views(&self) -> &[SelectedView<'a>] {
        &self.views
    }

    /// Returns the counters for this pass.
    #[must_use]
    pub fn stats(&self) -> SelectionStats {
        self.stats
    }

    /// Returns the number of draws.
    #[must_use]
    pub fn len(&self) -> usize {
        self.views.len()
    }

    /// Returns true if nothing is to be drawn.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.views.is_empty()
    }

    /// Returns `(segment id, level)` pairs, handy for comparing frames.
    #[must_use]
    pub fn levels(&self) -> Vec<(usize, usize)> {
        self.views.iter().map(|s| (s.segment.id(), s.level)).collect()
    }

    /// Returns an iterator over the chosen draws.
    pub fn iter(&self) -> std::slice::Iter<'_, SelectedView<'a>> {
        self.views.iter()
    }
}

impl<'a> IntoIterator for Selection<'a> {
    type Item = SelectedView<'a>;
    type IntoIter = std::vec::IntoIter<SelectedView<'a>>;

    fn into_iter(self) -> Self::IntoIter {
        self.views.into_iter()
    }
}

impl<'s, 'a> IntoIterator for &'s Selection<'a> {
    type Item = &'s SelectedView<'a>;
    type IntoIter = std::slice::Iter<'s, SelectedView<'a>>;

    fn into_iter(self) -> Self::IntoIter {
        self.views.iter()
    }
}

/// Per-frame inputs shared by every segment.
#[derive(Debug, Clone, Copy)]
pub struct FrameParams {
    /// Combined view-projection matrix.
    pub view_projection: Mat4,
    /// Render target size.
    pub viewport: Viewport,
    /// Nominal on-screen point spacing in pixels.
    pub target_pixel_size: f32,
    /// Whether segments outside the clip volume are dropped.
    pub frustum_culling: bool,
}

/// Chooses a view for each visible segment.
///
/// Output order follows `segments` whether or not `parallel` is set.
pub fn select_views<'a>(
    segments: &'a [Segment],
    params: &FrameParams,
    parallel: bool,
) -> Selection<'a> {
    let mut stats = SelectionStats {
        total_segments: segments.len(),
        ..SelectionStats::default()
    };

    if params.viewport.is_empty() {
        stats.culled_segments = segments.len();
        return Selection {
            views: Vec::new(),
            stats,
        };
    }

    let views: Vec<SelectedView<'a>> = if parallel {
        segments
            .par_iter()
            .filter_map(|segment| select_for_segment(segment, params))
            .collect()
    } else {
        segments
            .iter()
            .filter_map(|segment| select_for_segment(segment, params))
            .collect()
    };

    stats.visible_segments = views.len();
    stats.culled_segments = segments.len() - views.len();
    stats.selected_indices = views.iter().map(|s| s.view.len()).sum();

    Selection { views, stats }
}

fn select_for_segment<'a>(segment: &'a Segment, params: &FrameParams) -> Option<SelectedView<'a>> {
    if params.frustum_culling && segment.bounds().is_outside_clip_volume(&params.view_projection)
    {
        return None;
    }

    let level = match pixels_per_unit(segment.bounds(), &params.view_projection, params.viewport)
    {
        Some(scale) => choose_level(segment.views(), scale, params.target_pixel_size),
        None => 0,
    };

    Some(SelectedView {
        segment,
        view: &segment.views()[level],
        level,
    })
}

/// Estimates how many pixels one world unit of the volume covers on screen.
///
/// The projected diagonal of the volume's screen rectangle is divided by its
/// world diagonal. Returns `None` when a corner is on or behind the eye, in
/// which case the volume may cover the whole screen. A volume with zero
/// diagonal yields zero.
pub fn pixels_per_unit(
    bounds: &BoundingVolume,
    view_projection: &Mat4,
    viewport: Viewport,
) -> Option<f32> {
    let mut min = Vec2::splat(f32::INFINITY);
    let mut max = Vec2::splat(f32::NEG_INFINITY);

    for corner in bounds.clip_corners(view_projection) {
        if corner.w <= MIN_CLIP_W {
            return None;
        }
        let ndc = Vec2::new(corner.x / corner.w, corner.y / corner.w);
        let pixel = viewport.ndc_to_pixel(ndc);
        min = min.min(pixel);
        max = max.max(pixel);
    }

    let world_diagonal = bounds.diagonal();
    if world_diagonal <= 0.0 {
        return Some(0.0);
    }
    Some((max - min).length() / world_diagonal)
}

/// Returns the coarsest level whose on-screen spacing fits `target_pixel_size`.
///
/// Levels are scanned from coarsest to finest, so among views with equal
/// spacing the one with fewer indices wins. Level 0 always fits.
pub fn choose_level(views: &[IndexView], pixels_per_unit: f32, target_pixel_size: f32) -> usize {
    views
        .iter()
        .enumerate()
        .rev()
        .find(|(_, view)| view.projected_spacing(pixels_per_unit) <= target_pixel_size)
        .map_or(0, |(level, _)| level)
}
