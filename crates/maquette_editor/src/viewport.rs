//! Viewport rectangle and camera projection.
//!
//! Converts between screen pixels, normalized device coordinates, and world
//! space: pick rays for the interaction controller and world-to-screen
//! projection for the contextual-menu anchor.

use glam::{Mat4, Vec2, Vec3, Vec4, Vec4Swizzles};

use maquette_math::Ray;

use crate::core::state::EditorCamera;

/// Vertical field of view in radians (at zoom 1.0).
pub const FOV_Y: f32 = 75.0 * std::f32::consts::PI / 180.0;
/// Near clip distance.
pub const NEAR: f32 = 0.1;
/// Far clip distance.
pub const FAR: f32 = 1000.0;

/// Viewport rectangle in screen pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            width: 1280.0,
            height: 720.0,
        }
    }
}

impl Viewport {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.width = width;
        self.height = height;
    }

    pub fn aspect(&self) -> f32 {
        if self.height > 0.0 {
            self.width / self.height
        } else {
            1.0
        }
    }

    /// Screen pixels to normalized device coordinates ([-1, 1], y up).
    pub fn to_ndc(&self, screen: Vec2) -> Vec2 {
        Vec2::new(
            ((screen.x - self.x) / self.width) * 2.0 - 1.0,
            -(((screen.y - self.y) / self.height) * 2.0 - 1.0),
        )
    }

    /// Normalized device coordinates to screen pixels.
    pub fn to_screen(&self, ndc: Vec2) -> Vec2 {
        Vec2::new(
            (ndc.x * 0.5 + 0.5) * self.width + self.x,
            (-ndc.y * 0.5 + 0.5) * self.height + self.y,
        )
    }

    pub fn contains(&self, screen: Vec2) -> bool {
        screen.x >= self.x
            && screen.x <= self.x + self.width
            && screen.y >= self.y
            && screen.y <= self.y + self.height
    }
}

/// View matrix for the editor camera.
pub fn view_matrix(camera: &EditorCamera) -> Mat4 {
    Mat4::look_at_rh(camera.position, camera.target, Vec3::Y)
}

/// Projection matrix; zoom narrows the field of view.
pub fn projection_matrix(camera: &EditorCamera, aspect: f32) -> Mat4 {
    let zoom = if camera.zoom > 0.0 { camera.zoom } else { 1.0 };
    let fov = 2.0 * ((FOV_Y * 0.5).tan() / zoom).atan();
    Mat4::perspective_rh(fov, aspect, NEAR, FAR)
}

/// Build the pick ray through a normalized device coordinate.
pub fn pick_ray(camera: &EditorCamera, viewport: &Viewport, ndc: Vec2) -> Ray {
    let view_proj = projection_matrix(camera, viewport.aspect()) * view_matrix(camera);
    let inverse = view_proj.inverse();

    let near = unproject(&inverse, ndc, 0.0);
    let far = unproject(&inverse, ndc, 1.0);
    Ray::from_points(near, far)
}

/// Project a world position to normalized device coordinates. Returns `None`
/// for points behind the camera.
pub fn world_to_ndc(camera: &EditorCamera, aspect: f32, world: Vec3) -> Option<Vec2> {
    let view_proj = projection_matrix(camera, aspect) * view_matrix(camera);
    let clip = view_proj * world.extend(1.0);
    if clip.w <= NEAR * 0.5 {
        return None;
    }
    Some(clip.xy() / clip.w)
}

/// Project a world position to screen pixels.
pub fn world_to_screen(camera: &EditorCamera, viewport: &Viewport, world: Vec3) -> Option<Vec2> {
    world_to_ndc(camera, viewport.aspect(), world).map(|ndc| viewport.to_screen(ndc))
}

fn unproject(inverse_view_proj: &Mat4, ndc: Vec2, depth: f32) -> Vec3 {
    let clip = Vec4::new(ndc.x, ndc.y, depth, 1.0);
    let world = *inverse_view_proj * clip;
    world.xyz() / world.w
}

#[cfg(test)]
mod tests {
    use super::*;

    fn camera_at(position: Vec3) -> EditorCamera {
        EditorCamera {
            position,
            target: Vec3::ZERO,
            zoom: 1.0,
        }
    }

    #[test]
    fn test_ndc_round_trip() {
        let viewport = Viewport::new(0.0, 0.0, 800.0, 600.0);
        let screen = Vec2::new(200.0, 450.0);
        let back = viewport.to_screen(viewport.to_ndc(screen));
        assert!((back - screen).length() < 0.001);
    }

    #[test]
    fn test_center_pixel_is_ndc_origin() {
        let viewport = Viewport::new(0.0, 0.0, 800.0, 600.0);
        let ndc = viewport.to_ndc(Vec2::new(400.0, 300.0));
        assert!(ndc.length() < 0.001);
    }

    #[test]
    fn test_center_ray_points_at_target() {
        let viewport = Viewport::default();
        let camera = camera_at(Vec3::new(0.0, 0.0, 5.0));

        let ray = pick_ray(&camera, &viewport, Vec2::ZERO);

        assert!(ray.is_valid());
        assert!(ray.direction.z < -0.99);
        assert!(ray.direction.x.abs() < 0.01);
        assert!(ray.direction.y.abs() < 0.01);
    }

    #[test]
    fn test_target_projects_to_viewport_center() {
        let viewport = Viewport::new(0.0, 0.0, 800.0, 600.0);
        let camera = camera_at(Vec3::new(0.0, 0.0, 5.0));

        let screen = world_to_screen(&camera, &viewport, Vec3::ZERO).unwrap();
        assert!((screen - Vec2::new(400.0, 300.0)).length() < 0.5);
    }

    #[test]
    fn test_point_behind_camera_does_not_project() {
        let viewport = Viewport::default();
        let camera = camera_at(Vec3::new(0.0, 0.0, 5.0));

        assert!(world_to_screen(&camera, &viewport, Vec3::new(0.0, 0.0, 20.0)).is_none());
    }

    #[test]
    fn test_pick_ray_through_projected_point() {
        // Projecting a world point and casting back through the projection
        // must produce a ray that passes near the point.
        let viewport = Viewport::new(0.0, 0.0, 800.0, 600.0);
        let camera = camera_at(Vec3::new(4.0, 3.0, 6.0));
        let world = Vec3::new(0.5, 1.0, -0.5);

        let ndc = world_to_ndc(&camera, viewport.aspect(), world).unwrap();
        let ray = pick_ray(&camera, &viewport, ndc);

        let to_point = world - ray.origin;
        let along = to_point.dot(ray.direction);
        let closest = ray.at(along);
        assert!((closest - world).length() < 0.01);
    }
}
