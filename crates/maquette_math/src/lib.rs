//! # maquette_math - Picking and Dragging Geometry
//!
//! Geometry primitives the editor core needs to turn pointer input into
//! 3D manipulation:
//! - Rays for picking
//! - Planes for drag-surface intersection
//! - Axis-aligned bounding boxes for hit testing
//! - Grid snapping helpers

pub mod bounds;
pub mod intersect;
pub mod plane;
pub mod ray;

pub use bounds::Aabb;
pub use intersect::{ray_aabb, ray_plane};
pub use plane::Plane;
pub use ray::Ray;

/// Numerical tolerance shared by the intersection tests.
pub const EPSILON: f32 = 1e-6;

/// Snap a scalar to the nearest multiple of `step`.
///
/// A non-positive step disables snapping.
#[inline]
pub fn snap(value: f32, step: f32) -> f32 {
    if step > 0.0 {
        (value / step).round() * step
    } else {
        value
    }
}

/// Snap each component of a vector to the nearest multiple of `step`.
#[inline]
pub fn snap_vec3(value: glam::Vec3, step: f32) -> glam::Vec3 {
    glam::Vec3::new(snap(value.x, step), snap(value.y, step), snap(value.z, step))
}

pub mod prelude {
    pub use crate::{ray_aabb, ray_plane, snap, snap_vec3, Aabb, Plane, Ray};
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    #[test]
    fn test_snap() {
        assert_eq!(snap(1.3, 0.5), 1.5);
        assert_eq!(snap(1.2, 0.5), 1.0);
        assert_eq!(snap(-0.3, 1.0), 0.0);
        // Disabled snapping passes values through
        assert_eq!(snap(1.3, 0.0), 1.3);
    }

    #[test]
    fn test_snap_vec3() {
        let snapped = snap_vec3(Vec3::new(0.4, 1.6, -2.4), 1.0);
        assert_eq!(snapped, Vec3::new(0.0, 2.0, -2.0));
    }
}
