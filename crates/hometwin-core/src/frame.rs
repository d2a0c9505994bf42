//! Conversion between backend world coordinates and render coordinates.
//!
//! The backend authors geometry with the third component as "up" (Z-up) and
//! the first two components spanning the floor plan. The renderer is Y-up.
//! The mapping is `render = (x - ox, z - oz, y - oy)` where `(ox, oy, oz)` is
//! the world offset carried in the mesh metadata.
//!
//! Mesh vertices arrive already centered by the backend and only need the
//! whole-scene axis remap ([`remap_axes`]); the offset is applied to the data
//! that arrives in absolute backend coordinates: room polygons (horizontal
//! components only) and sensor locations (full conversion plus lift).

use glam::{Vec2, Vec3};

/// Vertical lift applied to overlays and markers so they never z-fight the floor.
pub const SURFACE_LIFT: f32 = 0.02;

/// Remaps a backend Z-up point to render Y-up without translation.
///
/// Used for mesh vertices, which the backend has already translated to the
/// scene origin. Applying the world offset here as well would double it.
#[inline]
#[must_use]
pub fn remap_axes(p: Vec3) -> Vec3 {
    Vec3::new(p.x, p.z, p.y)
}

/// Converts a backend point to render coordinates, applying the world offset.
#[inline]
#[must_use]
pub fn to_render(p: Vec3, offset: Vec3) -> Vec3 {
    Vec3::new(p.x - offset.x, p.z - offset.z, p.y - offset.y)
}

/// [`to_render`] with an extra vertical lift, for markers and overlays.
#[inline]
#[must_use]
pub fn to_render_lifted(p: Vec3, offset: Vec3, lift: f32) -> Vec3 {
    to_render(p, offset) + Vec3::new(0.0, lift, 0.0)
}

/// Inverse of [`to_render`]: recovers the backend point from a render point.
#[inline]
#[must_use]
pub fn from_render(p: Vec3, offset: Vec3) -> Vec3 {
    Vec3::new(p.x + offset.x, p.z + offset.y, p.y + offset.z)
}

/// Translates a 2D floor-plan point by the horizontal world offset.
///
/// Room polygons stay two-dimensional until the overlay mesh is built, so
/// only the plan components of the offset apply.
#[inline]
#[must_use]
pub fn plan_offset(p: Vec2, offset: Vec3) -> Vec2 {
    Vec2::new(p.x - offset.x, p.y - offset.y)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    #[test]
    fn test_axis_remap_swaps_up() {
        let p = Vec3::new(1.0, 2.0, 3.0);
        assert_eq!(remap_axes(p), Vec3::new(1.0, 3.0, 2.0));
    }

    #[test]
    fn test_to_render_applies_offset_once() {
        let p = Vec3::new(4.0, 2.0, 1.0);
        let offset = Vec3::new(1.0, 1.0, 0.5);
        let r = to_render(p, offset);
        assert_relative_eq!(r.x, 3.0);
        assert_relative_eq!(r.y, 0.5);
        assert_relative_eq!(r.z, 1.0);
    }

    #[test]
    fn test_lift_only_moves_up() {
        let p = Vec3::new(2.0, 1.5, 0.0);
        let offset = Vec3::ZERO;
        let plain = to_render(p, offset);
        let lifted = to_render_lifted(p, offset, SURFACE_LIFT);
        assert_relative_eq!(lifted.x, plain.x);
        assert_relative_eq!(lifted.z, plain.z);
        assert_relative_eq!(lifted.y, plain.y + SURFACE_LIFT);
    }

    #[test]
    fn test_round_trip() {
        let p = Vec3::new(-3.25, 7.5, 2.8);
        let offset = Vec3::new(1.5, -2.0, 0.25);
        let back = to_render(from_render(p, offset), offset);
        assert_relative_eq!(back.x, p.x, epsilon = 1e-5);
        assert_relative_eq!(back.y, p.y, epsilon = 1e-5);
        assert_relative_eq!(back.z, p.z, epsilon = 1e-5);
    }

    proptest! {
        #[test]
        fn prop_round_trip(
            px in -1e4f32..1e4, py in -1e4f32..1e4, pz in -1e4f32..1e4,
            ox in -1e4f32..1e4, oy in -1e4f32..1e4, oz in -1e4f32..1e4,
        ) {
            let p = Vec3::new(px, py, pz);
            let offset = Vec3::new(ox, oy, oz);
            let back = to_render(from_render(p, offset), offset);
            prop_assert!((back - p).abs().max_element() < 1e-2);
        }
    }
}
