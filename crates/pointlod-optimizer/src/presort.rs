//! Z-order presorting for spatial locality.
//!
//! The optimizer splits positions by array order, so segments are only
//! compact in space when nearby points are nearby in the array. Sorting along
//! a Morton curve before building gives that locality.

use glam::Vec3;
use pointlod_core::BoundingVolume;
use rayon::prelude::*;

/// Bits per axis of the Morton grid (1024 cells per axis).
const MORTON_BITS: u32 = 10;

/// Returns a permutation ordering `positions` along a 3D Morton curve over `bounds`.
///
/// The sort is stable: points in the same grid cell keep their input order.
/// Positions outside `bounds` are clamped to its faces.
pub fn morton_order(positions: &[Vec3], bounds: &BoundingVolume) -> Vec<usize> {
    let codes: Vec<u32> = positions
        .par_iter()
        .map(|&p| morton_code(p, bounds))
        .collect();

    let mut order: Vec<usize> = (0..positions.len()).collect();
    order.par_sort_by_key(|&i| codes[i]);
    order
}

/// Returns `positions` rearranged by `order`.
pub fn reorder(positions: &[Vec3], order: &[usize]) -> Vec<Vec3> {
    order.iter().map(|&i| positions[i]).collect()
}

/// Sorts positions along a Morton curve over their own bounds.
///
/// Returns the sorted positions and the permutation that produced them, so
/// per-point attributes can be reordered the same way.
pub fn sort_by_morton(positions: &[Vec3]) -> (Vec<Vec3>, Vec<usize>) {
    let Some(bounds) = BoundingVolume::from_points(positions) else {
        return (positions.to_vec(), (0..positions.len()).collect());
    };
    let order = morton_order(positions, &bounds);
    (reorder(positions, &order), order)
}

/// Computes the 30-bit Morton code of `p` on the grid over `bounds`.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn morton_code(p: Vec3, bounds: &BoundingVolume) -> u32 {
    let max_cell = ((1u32 << MORTON_BITS) - 1) as f32;
    let extents = bounds.extents().max(Vec3::splat(f32::MIN_POSITIVE));
    let normalized = ((p - bounds.min) / extents).clamp(Vec3::ZERO, Vec3::ONE);
    let cell = (normalized * max_cell).floor();

    spread_bits(cell.x as u32) | (spread_bits(cell.y as u32) << 1) | (spread_bits(cell.z as u32) << 2)
}

/// Inserts two zero bits between each of the low 10 bits of `v`.
fn spread_bits(v: u32) -> u32 {
    let mut x = v & 0x0000_03ff;
    x = (x | (x << 16)) & 0x0300_00ff;
    x = (x | (x << 8)) & 0x0300_f00f;
    x = (x | (x << 4)) & 0x030c_30c3;
    x = (x | (x << 2)) & 0x0924_9249;
    x
}
