//! Rays for picking.

use glam::Vec3;

/// A half-line starting at `origin` and extending along `direction`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    /// Start point of the ray.
    pub origin: Vec3,
    /// Unit direction of the ray.
    pub direction: Vec3,
}

impl Ray {
    /// Creates a ray. The direction is normalized.
    ///
    /// A zero direction stays zero, in which case the ray degenerates to its
    /// origin point.
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize_or_zero(),
        }
    }

    /// Creates a ray from `origin` through `target`.
    pub fn through(origin: Vec3, target: Vec3) -> Self {
        Self::new(origin, target - origin)
    }

    /// Returns the point at parameter `t`.
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }

    /// Returns the parameter of the closest point on the ray to `point`.
    ///
    /// Points behind the origin clamp to `t = 0`.
    pub fn closest_t(&self, point: Vec3) -> f32 {
        (point - self.origin).dot(self.direction).max(0.0)
    }

    /// Returns the squared perpendicular distance from `point` to the ray.
    pub fn distance_squared(&self, point: Vec3) -> f32 {
        self.at(self.closest_t(point)).distance_squared(point)
    }

    /// Returns the perpendicular distance from `point` to the ray.
    pub fn distance(&self, point: Vec3) -> f32 {
        self.distance_squared(point).sqrt()
    }
}
