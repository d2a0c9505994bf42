//! Room boundary normalization and ear-clipping triangulation.
//!
//! Boundary rings from the backend may repeat the closing point, contain
//! consecutive duplicates, or be wound either way. [`normalize_ring`] cleans
//! the ring, [`ear_clip`] triangulates it. Both are total functions: malformed
//! input produces an empty or partial result, never a panic, so a bad room
//! polygon cannot take down the scene.

use glam::Vec2;

/// Tolerance for duplicate-point collapse during normalization.
const DUPLICATE_EPSILON: f32 = 1e-6;

/// Tolerance for the convexity and point-in-triangle tests.
const GEOM_EPSILON: f32 = 1e-9;

/// Cross product of `(a - o)` and `(b - o)`; positive when `o→a→b` turns left.
#[inline]
fn cross(o: Vec2, a: Vec2, b: Vec2) -> f32 {
    (a.x - o.x) * (b.y - o.y) - (a.y - o.y) * (b.x - o.x)
}

/// Twice the signed area of the ring; positive for counter-clockwise winding.
#[must_use]
pub fn signed_area(ring: &[Vec2]) -> f32 {
    let n = ring.len();
    let mut area = 0.0;
    for i in 0..n {
        let a = ring[i];
        let b = ring[(i + 1) % n];
        area += a.x * b.y - b.x * a.y;
    }
    area * 0.5
}

/// Cleans a boundary ring: collapses consecutive duplicate points and drops a
/// trailing point that repeats the first.
///
/// A ring reduced below 3 points is untriangulatable; callers skip it.
#[must_use]
pub fn normalize_ring(points: &[Vec2]) -> Vec<Vec2> {
    let mut cleaned: Vec<Vec2> = Vec::with_capacity(points.len());
    for &p in points {
        if cleaned.last().is_none_or(|last| last.distance_squared(p) > DUPLICATE_EPSILON) {
            cleaned.push(p);
        }
    }
    if cleaned.len() >= 2 && cleaned[0].distance_squared(cleaned[cleaned.len() - 1]) <= DUPLICATE_EPSILON {
        cleaned.pop();
    }
    cleaned
}

/// Point-in-triangle test for a counter-clockwise triangle, tolerant of
/// points sitting on (or epsilon-outside) an edge.
fn point_in_triangle(p: Vec2, a: Vec2, b: Vec2, c: Vec2) -> bool {
    cross(a, b, p) >= -GEOM_EPSILON
        && cross(b, c, p) >= -GEOM_EPSILON
        && cross(c, a, p) >= -GEOM_EPSILON
}

/// Triangulates a normalized simple ring by ear clipping.
///
/// Accepts either winding: a clockwise ring is reversed internally and the
/// emitted indices are remapped back to the caller's ordering. The search is
/// bounded by `n²` iterations; on malformed (e.g. self-intersecting) input
/// the triangles found so far are returned, possibly none.
#[must_use]
pub fn ear_clip(ring: &[Vec2]) -> Vec<[u32; 3]> {
    let n = ring.len();
    if n < 3 {
        return Vec::new();
    }

    let reversed = signed_area(ring) < 0.0;
    let ccw: Vec<Vec2> = if reversed {
        ring.iter().rev().copied().collect()
    } else {
        ring.to_vec()
    };

    let mut indices: Vec<usize> = (0..n).collect();
    let mut triangles: Vec<[u32; 3]> = Vec::with_capacity(n - 2);

    let mut guard = 0;
    while indices.len() > 3 && guard < n * n {
        guard += 1;
        let mut ear_found = false;

        for pos in 0..indices.len() {
            let prev = indices[(pos + indices.len() - 1) % indices.len()];
            let curr = indices[pos];
            let next = indices[(pos + 1) % indices.len()];

            let (pa, pb, pc) = (ccw[prev], ccw[curr], ccw[next]);

            // Ear candidates must be convex within the CCW ring.
            if cross(pa, pb, pc) <= GEOM_EPSILON {
                continue;
            }

            let contains_other = indices.iter().any(|&other| {
                other != prev
                    && other != curr
                    && other != next
                    && point_in_triangle(ccw[other], pa, pb, pc)
            });
            if contains_other {
                continue;
            }

            triangles.push([prev as u32, curr as u32, next as u32]);
            indices.remove(pos);
            ear_found = true;
            break;
        }

        if !ear_found {
            // No ear within tolerance: self-intersecting or collinear mess.
            // Return the partial fan rather than spinning.
            log::warn!("ear clipping stalled after {} triangles ({n} vertices)", triangles.len());
            break;
        }
    }

    if indices.len() == 3 {
        triangles.push([indices[0] as u32, indices[1] as u32, indices[2] as u32]);
    }

    if reversed {
        let last = (n - 1) as u32;
        for tri in &mut triangles {
            *tri = [last - tri[0], last - tri[1], last - tri[2]];
        }
    }

    triangles
}

/// Area covered by a set of triangles over a ring (for validation).
#[must_use]
pub fn triangles_area(ring: &[Vec2], triangles: &[[u32; 3]]) -> f32 {
    triangles
        .iter()
        .map(|t| {
            let (a, b, c) = (ring[t[0] as usize], ring[t[1] as usize], ring[t[2] as usize]);
            cross(a, b, c).abs() * 0.5
        })
        .sum()
}
