//! Screen-ray construction and triangle intersection for room picking.

use glam::{Vec2, Vec3, Vec4};
use hometwin_render::CameraRig;

/// Builds a world-space ray through a surface-local pointer position.
///
/// `pos` is in pixels relative to the render surface's top-left corner.
pub(crate) fn screen_ray(
    pos: Vec2,
    surface_width: f32,
    surface_height: f32,
    camera: &CameraRig,
) -> Option<(Vec3, Vec3)> {
    if surface_width <= 0.0 || surface_height <= 0.0 {
        return None;
    }

    let ndc_x = (pos.x / (surface_width / 2.0)) - 1.0;
    let ndc_y = 1.0 - (pos.y / (surface_height / 2.0));

    let inv_view_proj = camera.view_projection_matrix().inverse();

    // NDC depth range [0, 1]
    let near = inv_view_proj * Vec4::new(ndc_x, ndc_y, 0.0, 1.0);
    let far = inv_view_proj * Vec4::new(ndc_x, ndc_y, 1.0, 1.0);

    if near.w.abs() < 1e-6 || far.w.abs() < 1e-6 {
        return None;
    }

    let ray_origin = near.truncate() / near.w;
    let ray_far = far.truncate() / far.w;
    let ray_dir = (ray_far - ray_origin).normalize_or_zero();
    if ray_dir.length_squared() < 1e-12 {
        return None;
    }

    Some((ray_origin, ray_dir))
}

/// Möller–Trumbore ray/triangle intersection. Returns the ray parameter of
/// the hit, if any.
pub(crate) fn ray_intersect_triangle(
    ray_origin: Vec3,
    ray_dir: Vec3,
    v0: Vec3,
    v1: Vec3,
    v2: Vec3,
) -> Option<f32> {
    let eps = 1e-6;
    let edge1 = v1 - v0;
    let edge2 = v2 - v0;
    let h = ray_dir.cross(edge2);
    let a = edge1.dot(h);
    if a.abs() < eps {
        return None;
    }
    let f = 1.0 / a;
    let s = ray_origin - v0;
    let u = f * s.dot(h);
    if !(0.0..=1.0).contains(&u) {
        return None;
    }
    let q = s.cross(edge1);
    let v = f * ray_dir.dot(q);
    if v < 0.0 || u + v > 1.0 {
        return None;
    }
    let t = f * edge2.dot(q);
    if t > eps {
        Some(t)
    } else {
        None
    }
}
