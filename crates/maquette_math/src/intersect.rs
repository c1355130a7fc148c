//! Ray intersection tests used by picking and drag-plane resolution.

use glam::Vec3;

use crate::bounds::Aabb;
use crate::plane::Plane;
use crate::ray::Ray;
use crate::EPSILON;

/// Ray-AABB intersection using the slab method.
///
/// Returns the distance along the ray to the entry point (or the exit point
/// when the origin is inside the box), or `None` on a miss.
pub fn ray_aabb(ray: &Ray, aabb: &Aabb) -> Option<f32> {
    // Division by a zero component yields +-inf, which the min/max folding
    // handles correctly.
    let inv = Vec3::new(
        1.0 / ray.direction.x,
        1.0 / ray.direction.y,
        1.0 / ray.direction.z,
    );

    let t1 = (aabb.min.x - ray.origin.x) * inv.x;
    let t2 = (aabb.max.x - ray.origin.x) * inv.x;
    let t3 = (aabb.min.y - ray.origin.y) * inv.y;
    let t4 = (aabb.max.y - ray.origin.y) * inv.y;
    let t5 = (aabb.min.z - ray.origin.z) * inv.z;
    let t6 = (aabb.max.z - ray.origin.z) * inv.z;

    let tmin = t1.min(t2).max(t3.min(t4)).max(t5.min(t6));
    let tmax = t1.max(t2).min(t3.max(t4)).min(t5.max(t6));

    // tmax < 0: box entirely behind the origin. tmin > tmax: miss.
    if tmax < 0.0 || tmin > tmax {
        None
    } else {
        Some(if tmin < 0.0 { tmax } else { tmin })
    }
}

/// Ray-plane intersection.
///
/// Returns the intersection point, or `None` when the ray is parallel to the
/// plane or the plane lies behind the ray origin.
pub fn ray_plane(ray: &Ray, plane: &Plane) -> Option<Vec3> {
    let denom = plane.normal.dot(ray.direction);
    if denom.abs() < EPSILON {
        return None;
    }

    let t = -(plane.normal.dot(ray.origin) + plane.distance) / denom;
    if t < 0.0 {
        return None;
    }

    Some(ray.at(t))
}
