use glam::{Mat4, Quat, Vec2, Vec3, Vec4};

use crate::util::math::degree_to_radian;

/// Supplies the eye position and one ray direction per pixel.
///
/// Directions are row-major and must match the frame buffer size of the
/// renderer they are handed to.
pub trait RaySource {
    fn position(&self) -> Vec3;
    fn ray_directions(&self) -> &[Vec3];
}

/// Perspective camera caching the world-space direction of every pixel.
#[derive(Debug, Clone)]
pub struct Camera {
    position: Vec3,
    forward_direction: Vec3,

    vertical_fov: f32,
    near_clip: f32,
    far_clip: f32,

    projection: Mat4,
    view: Mat4,
    inverse_projection: Mat4,
    inverse_view: Mat4,

    ray_directions: Vec<Vec3>,
    viewport_width: u32,
    viewport_height: u32,
}

impl Camera {
    pub const UP: Vec3 = Vec3::Y;
    /// Used instead of [`Camera::UP`] when looking straight up or down.
    pub const FALLBACK_UP: Vec3 = Vec3::NEG_Z;

    /// `vertical_fov` is in degrees.
    pub fn new(vertical_fov: f32, near_clip: f32, far_clip: f32) -> Self {
        let mut camera = Self {
            position: Vec3::new(0.0, 0.0, 6.0),
            forward_direction: Vec3::NEG_Z,
            vertical_fov,
            near_clip,
            far_clip,
            projection: Mat4::IDENTITY,
            view: Mat4::IDENTITY,
            inverse_projection: Mat4::IDENTITY,
            inverse_view: Mat4::IDENTITY,
            ray_directions: Vec::new(),
            viewport_width: 0,
            viewport_height: 0,
        };
        camera.recalculate_view();
        camera
    }

    /// Returns `true` when the viewport changed and directions were rebuilt.
    pub fn resize(&mut self, width: u32, height: u32) -> bool {
        if width == self.viewport_width && height == self.viewport_height {
            return false;
        }

        self.viewport_width = width;
        self.viewport_height = height;

        self.recalculate_projection();
        self.recalculate_ray_directions();
        true
    }

    /// Move the eye to `position` and aim it at `target`. The two must differ.
    pub fn look_at(&mut self, position: Vec3, target: Vec3) {
        self.position = position;
        self.forward_direction = (target - position).normalize();

        self.recalculate_view();
        self.recalculate_ray_directions();
    }

    /// Rotate the eye around the vertical axis passing through `target`.
    pub fn orbit(&mut self, angle: f32, target: Vec3) {
        let offset = Quat::from_rotation_y(angle) * (self.position - target);
        self.look_at(target + offset, target);
    }

    pub fn forward_direction(&self) -> Vec3 {
        self.forward_direction
    }

    pub fn viewport(&self) -> (u32, u32) {
        (self.viewport_width, self.viewport_height)
    }

    fn recalculate_projection(&mut self) {
        if self.viewport_width == 0 || self.viewport_height == 0 {
            return;
        }
        let aspect = self.viewport_width as f32 / self.viewport_height as f32;
        self.projection = Mat4::perspective_rh(
            degree_to_radian(self.vertical_fov),
            aspect,
            self.near_clip,
            self.far_clip,
        );
        self.inverse_projection = self.projection.inverse();
    }

    fn recalculate_view(&mut self) {
        self.view = Mat4::look_at_rh(
            self.position,
            self.position + self.forward_direction,
            self.up_direction(),
        );
        self.inverse_view = self.view.inverse();
    }

    fn up_direction(&self) -> Vec3 {
        if self.forward_direction.cross(Self::UP).length_squared() < 1e-8 {
            Self::FALLBACK_UP
        } else {
            Self::UP
        }
    }

    fn recalculate_ray_directions(&mut self) {
        let width = self.viewport_width;
        let height = self.viewport_height;

        self.ray_directions.clear();
        self.ray_directions.reserve(width as usize * height as usize);

        for y in 0..height {
            for x in 0..width {
                // Pixel centre in NDC, row 0 at the top of the image.
                let coord = Vec2::new(
                    (x as f32 + 0.5) / width as f32,
                    (y as f32 + 0.5) / height as f32,
                ) * 2.0
                    - 1.0;

                let target = self.inverse_projection * Vec4::new(coord.x, -coord.y, 1.0, 1.0);
                let direction = self
                    .inverse_view
                    .transform_vector3((target.truncate() / target.w).normalize());
                self.ray_directions.push(direction);
            }
        }
        tracing::trace!(width, height, "recalculated camera ray directions");
    }
}

impl RaySource for Camera {
    fn position(&self) -> Vec3 {
        self.position
    }

    fn ray_directions(&self) -> &[Vec3] {
        &self.ray_directions
    }
}
