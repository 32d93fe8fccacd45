//! Per-tick spatial hashing for neighbor queries.
//!
//! Buckets a flat array of positions into grid cells keyed by a mixed integer
//! hash. Rebuilt from scratch each tick per query context (flocking, weapon
//! targeting and projectile collision each build their own table with their
//! own cell size), so there is no stale-neighbor state to invalidate.

use crate::math::Vec2;
use std::collections::HashMap;

/// Multi-valued map from cell hash to indices into the caller's per-tick
/// position array.
///
/// Queries are a 2D box sweep over grid cells, not a radial search: callers
/// that need a tight radius post-filter by squared distance.
#[derive(Debug)]
pub struct SpatialHash {
    cell_size: f32,
    buckets: HashMap<u64, Vec<usize>>,
}

/// Integer grid coordinates of a world position.
#[inline]
fn grid_coords(pos: Vec2, cell_size: f32) -> (i32, i32) {
    (
        (pos.x / cell_size).floor() as i32,
        (pos.y / cell_size).floor() as i32,
    )
}

/// Mix two grid integers into a single bucket key.
///
/// Adjacent cells must land in unrelated buckets, so both axes are multiplied
/// by large odd constants before an xor-shift finalizer.
#[inline]
fn mix_cell_key(gx: i32, gy: i32) -> u64 {
    let mut h = (gx as u32 as u64).wrapping_mul(0x9e37_79b9_7f4a_7c15)
        ^ (gy as u32 as u64).wrapping_mul(0xc2b2_ae3d_27d4_eb4f);
    h ^= h >> 29;
    h = h.wrapping_mul(0xbf58_476d_1ce4_e5b9);
    h ^= h >> 32;
    h
}

impl SpatialHash {
    /// Bucket every position by its grid cell. Index `i` of the result refers
    /// back to `positions[i]`.
    pub fn build(cell_size: f32, positions: &[Vec2]) -> Self {
        let mut buckets: HashMap<u64, Vec<usize>> = HashMap::with_capacity(positions.len());
        for (index, pos) in positions.iter().enumerate() {
            let (gx, gy) = grid_coords(*pos, cell_size);
            buckets.entry(mix_cell_key(gx, gy)).or_default().push(index);
        }
        Self { cell_size, buckets }
    }

    /// Hash of the cell containing `pos`. Exposed for tests and debugging.
    #[inline]
    pub fn cell_key(&self, pos: Vec2) -> u64 {
        let (gx, gy) = grid_coords(pos, self.cell_size);
        mix_cell_key(gx, gy)
    }

    /// Append the indices of every entry whose cell lies within
    /// `search_radius` cells of the cell containing `pos`.
    ///
    /// Sweeps integer cell offsets over `[-R, R]` on both axes. No distance
    /// filtering, no dedup, no self-exclusion: callers post-filter.
    pub fn collect_neighbors(&self, pos: Vec2, search_radius: i32, out: &mut Vec<usize>) {
        let (cx, cy) = grid_coords(pos, self.cell_size);
        for dx in -search_radius..=search_radius {
            for dy in -search_radius..=search_radius {
                if let Some(bucket) = self.buckets.get(&mix_cell_key(cx + dx, cy + dy)) {
                    out.extend_from_slice(bucket);
                }
            }
        }
    }

    /// Convenience wrapper returning a fresh vector.
    pub fn neighbors(&self, pos: Vec2, search_radius: i32) -> Vec<usize> {
        let mut out = Vec::new();
        self.collect_neighbors(pos, search_radius, &mut out);
        out
    }

    /// Total entries bucketed.
    pub fn len(&self) -> usize {
        self.buckets.values().map(|b| b.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }
}
