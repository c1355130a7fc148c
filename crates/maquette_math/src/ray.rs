//! 3D ray for picking queries.

use glam::Vec3;

/// A ray with a normalized direction.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Ray {
    /// Ray origin point
    pub origin: Vec3,
    /// Ray direction (normalized on construction)
    pub direction: Vec3,
}

impl Ray {
    /// Create a new ray; the direction is normalized.
    #[inline]
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize_or_zero(),
        }
    }

    /// Create a ray passing through two points.
    #[inline]
    pub fn from_points(start: Vec3, end: Vec3) -> Self {
        Self::new(start, end - start)
    }

    /// Point at distance `t` along the ray.
    #[inline]
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }

    /// Check that the direction survived normalization.
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.direction.length_squared() > 1e-10
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_normalized() {
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, 10.0));
        assert!((ray.direction.length() - 1.0).abs() < 0.001);
    }

    #[test]
    fn test_from_points() {
        let ray = Ray::from_points(Vec3::ZERO, Vec3::new(0.0, 5.0, 0.0));
        assert_eq!(ray.origin, Vec3::ZERO);
        assert!((ray.direction.y - 1.0).abs() < 0.001);
    }

    #[test]
    fn test_at() {
        let ray = Ray::new(Vec3::new(1.0, 0.0, 0.0), Vec3::Z);
        let point = ray.at(3.0);
        assert!((point.z - 3.0).abs() < 0.001);
        assert!((point.x - 1.0).abs() < 0.001);
    }

    #[test]
    fn test_zero_direction_invalid() {
        let ray = Ray::new(Vec3::ZERO, Vec3::ZERO);
        assert!(!ray.is_valid());
    }
}
