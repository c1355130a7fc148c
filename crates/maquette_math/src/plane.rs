//! Infinite plane, used as the drag surface during pointer manipulation.

use glam::Vec3;

/// A plane in constant-normal form: `dot(normal, p) + distance = 0`.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Plane {
    /// Plane normal (unit vector)
    pub normal: Vec3,
    /// Signed distance from the origin along the normal
    pub distance: f32,
}

impl Plane {
    /// Create a plane from a (possibly unnormalized) normal and distance.
    #[inline]
    pub fn new(normal: Vec3, distance: f32) -> Self {
        let len = normal.length();
        if len > 1e-10 {
            Self {
                normal: normal / len,
                distance: distance / len,
            }
        } else {
            Self {
                normal: Vec3::Y,
                distance: 0.0,
            }
        }
    }

    /// Create a plane containing `point` with the given normal.
    pub fn from_point_normal(point: Vec3, normal: Vec3) -> Self {
        let normal = normal.normalize_or_zero();
        Self {
            normal,
            distance: -normal.dot(point),
        }
    }

    /// Signed distance from a point to the plane.
    #[inline]
    pub fn signed_distance(&self, point: Vec3) -> f32 {
        self.normal.dot(point) + self.distance
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_point_normal() {
        let plane = Plane::from_point_normal(Vec3::new(0.0, 2.0, 0.0), Vec3::Y);
        assert!(plane.signed_distance(Vec3::new(5.0, 2.0, -3.0)).abs() < 0.001);
        assert!((plane.signed_distance(Vec3::new(0.0, 3.0, 0.0)) - 1.0).abs() < 0.001);
    }

    #[test]
    fn test_new_normalizes() {
        let plane = Plane::new(Vec3::new(0.0, 4.0, 0.0), 8.0);
        assert!((plane.normal.length() - 1.0).abs() < 0.001);
        assert!((plane.distance - 2.0).abs() < 0.001);
    }
}
