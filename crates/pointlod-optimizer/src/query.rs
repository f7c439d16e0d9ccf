//! Nearest-position queries against a ray.

use glam::Vec3;
use pointlod_core::{ClosestPosition, Ray};

use crate::segment::Segment;

/// Relative rounding slack of the ray/point distance, in units of `f32::EPSILON`.
const ROUNDING_ULPS: f32 = 16.0;

/// Finds the position closest to `ray` within `max_distance`.
///
/// Segments whose bounds, grown by `max_distance`, are missed by the ray are
/// skipped; a point within `max_distance` of the ray lies inside that grown
/// box. Distances are accepted up to a rounding slack proportional to the
/// magnitudes involved, so a ray built through a position hits it even with
/// `max_distance` zero. Non-finite positions are never returned. Ties keep
/// the lowest index.
pub fn closest_position(
    positions: &[Vec3],
    segments: &[Segment],
    ray: &Ray,
    max_distance: f32,
) -> Option<ClosestPosition> {
    let origin_scale = ray.origin.length();
    let mut best: Option<(usize, f32)> = None;

    for segment in segments {
        let bounds = segment.bounds();
        let reach = ray.origin.distance(bounds.center()) + bounds.diagonal();
        let extent = bounds.min.abs().max(bounds.max.abs()).length();
        let slack = rounding_slack(origin_scale + reach + extent);
        if bounds
            .inflate(max_distance + slack)
            .intersects_ray(ray)
            .is_none()
        {
            continue;
        }

        for index in segment.range() {
            let position = positions[index];
            if !position.is_finite() {
                continue;
            }
            let limit = max_distance
                + rounding_slack(origin_scale + ray.origin.distance(position) + position.length());
            let distance_sq = ray.distance_squared(position);
            if distance_sq > limit * limit {
                continue;
            }
            if best.map_or(true, |(_, best_sq)| distance_sq < best_sq) {
                best = Some((index, distance_sq));
            }
        }
    }

    best.map(|(index, distance_sq)| {
        let position = positions[index];
        ClosestPosition::new(index, position, distance_sq.sqrt(), ray.closest_t(position))
    })
}

fn rounding_slack(scale: f32) -> f32 {
    ROUNDING_ULPS * f32::EPSILON * scale
}
