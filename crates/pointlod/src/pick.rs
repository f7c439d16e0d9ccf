//! Screen-space picking of optimized positions.

use glam::Vec2;
use pointlod_core::{Camera, ClosestPosition, Result, Viewport};
use pointlod_optimizer::PointCloudOptimizer;

/// Returns the position closest to the camera ray through `pixel`.
///
/// `pixel` is in viewport coordinates with the origin at the top-left corner.
/// Returns `Ok(None)` when the pixel has no ray (empty viewport or degenerate
/// camera) or no position lies within `max_distance` of it.
pub fn pick_closest(
    optimizer: &PointCloudOptimizer,
    camera: &Camera,
    viewport: Viewport,
    pixel: Vec2,
    max_distance: f32,
) -> Result<Option<ClosestPosition>> {
    let Some(ray) = camera.screen_ray(viewport, pixel) else {
        log::debug!("no pick ray for pixel {pixel:?}");
        return Ok(None);
    };
    optimizer.closest_index(&ray, max_distance)
}
