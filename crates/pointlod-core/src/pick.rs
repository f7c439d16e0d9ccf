//! Nearest-position query results.

use glam::Vec3;

/// The position closest to a query ray.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClosestPosition {
    /// Index of the position in the optimized position set.
    pub index: usize,

    /// World position of the point.
    pub position: Vec3,

    /// Perpendicular distance from the point to the ray.
    pub distance: f32,

    /// Ray parameter of the closest approach (depth along the ray).
    pub ray_t: f32,
}

impl ClosestPosition {
    /// Creates a new query result.
    pub fn new(index: usize, position: Vec3, distance: f32, ray_t: f32) -> Self {
        Self {
            index,
            position,
            distance,
            ray_t,
        }
    }
}
