use std::time::Instant;

use glam::{Vec3, Vec4};
use rayon::prelude::*;

use crate::camera::RaySource;
use crate::framebuffer::FrameBuffer;
use crate::ray::Ray;
use crate::scene::{Scene, Sphere};
use crate::texture::{RenderTarget, Texture};
use crate::util::color;

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    /// Direction the single directional light travels in.
    pub light_direction: Vec3,
    /// Color of rays that hit nothing.
    pub background: Vec4,
    /// Render rows in parallel. Output is identical to the sequential scan.
    pub multithreaded: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            light_direction: Vec3::new(-1.0, -1.0, -1.0).normalize(),
            background: Vec4::new(0.0, 0.0, 0.0, 1.0),
            multithreaded: false,
        }
    }
}

/// Nearest accepted intersection along a ray.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitPayload {
    pub hit_distance: f32,
    pub sphere_index: usize,
}

/// Near root of the ray/sphere quadratic, if it lies in front of the ray.
///
/// The far root is never considered, so rays starting inside a sphere miss
/// it. The direction need not be unit length; a zero direction yields a NaN
/// root which is rejected like any other miss.
pub fn intersect(ray: &Ray, sphere: &Sphere) -> Option<f32> {
    // (bx^2 + by^2 + bz^2)t^2 + (2(axbx + ayby + azbz))t + (ax^2 + ay^2 + az^2 - r^2) = 0
    // where
    // a = ray origin relative to the sphere
    // b = ray direction
    // r = radius
    // t = hit distance
    let origin = ray.origin - sphere.position;

    let a = ray.direction.dot(ray.direction);
    let b = 2.0 * origin.dot(ray.direction);
    let c = origin.dot(origin) - sphere.radius * sphere.radius;

    // b^2 - 4ac
    let discriminant = b * b - 4.0 * a * c;
    if discriminant < 0.0 {
        return None;
    }

    let closest_t = (-b - discriminant.sqrt()) / (2.0 * a);
    (closest_t > 0.0).then_some(closest_t)
}

/// Scan every sphere in order and keep the nearest hit.
///
/// Ties keep the sphere found first.
pub fn closest_hit(ray: &Ray, scene: &Scene) -> Option<HitPayload> {
    let mut closest: Option<HitPayload> = None;
    let mut hit_distance = f32::MAX;

    for (sphere_index, sphere) in scene.spheres.iter().enumerate() {
        let Some(t) = intersect(ray, sphere) else {
            continue;
        };
        if t < hit_distance {
            hit_distance = t;
            closest = Some(HitPayload {
                hit_distance,
                sphere_index,
            });
        }
    }

    closest
}

/// Lambertian shading of a hit under one directional light.
///
/// # Panics
///
/// If the hit sphere's material index is out of range for `scene`.
pub fn shade(ray: &Ray, scene: &Scene, hit: &HitPayload, light_direction: Vec3) -> Vec4 {
    let sphere = &scene.spheres[hit.sphere_index];

    // Work in the sphere's frame so the hit point is also the normal.
    let origin = ray.origin - sphere.position;
    let hit_point = origin + ray.direction * hit.hit_distance;
    let normal = hit_point.normalize();

    let intensity = normal.dot(-light_direction).max(0.0); // == cos(angle)

    let albedo = scene.materials[sphere.material_index].albedo;
    (albedo * intensity).extend(1.0)
}

/// Unclamped color seen along `ray`.
pub fn trace_ray(ray: &Ray, scene: &Scene, settings: &Settings) -> Vec4 {
    match closest_hit(ray, scene) {
        Some(hit) => shade(ray, scene, &hit, settings.light_direction),
        None => settings.background,
    }
}

fn per_pixel(ray: &Ray, scene: &Scene, settings: &Settings) -> u32 {
    color::convert_rgba(color::clamp(trace_ray(ray, scene, settings)))
}

/// Renders scenes into an owned frame buffer and publishes each finished
/// frame to a [`RenderTarget`].
#[derive(Debug)]
pub struct Renderer<T: RenderTarget = Texture> {
    settings: Settings,
    final_image: Option<T>,
    image_data: FrameBuffer,
}

impl<T: RenderTarget> Default for Renderer<T> {
    fn default() -> Self {
        Self::new(Settings::default())
    }
}

impl<T: RenderTarget> Renderer<T> {
    pub fn new(settings: Settings) -> Self {
        Self {
            settings,
            final_image: None,
            image_data: FrameBuffer::default(),
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn settings_mut(&mut self) -> &mut Settings {
        &mut self.settings
    }

    /// Last published frame, available after the first resize.
    pub fn final_image(&self) -> Option<&T> {
        self.final_image.as_ref()
    }

    pub fn frame_buffer(&self) -> &FrameBuffer {
        &self.image_data
    }

    /// Size the frame buffer and the target. Same-size requests do nothing.
    pub fn on_resize(&mut self, width: u32, height: u32) {
        match self.final_image.as_mut() {
            Some(image) => {
                // No resize necessary
                if image.width() == width && image.height() == height {
                    return;
                }
                image.resize(width, height);
            }
            None => self.final_image = Some(T::create(width, height)),
        }

        self.image_data.resize(width, height);
        tracing::debug!(width, height, "resized frame buffer");
    }

    /// Render every pixel of `scene` as seen by `camera`, then publish.
    ///
    /// `camera` must provide exactly one direction per frame buffer pixel.
    /// Debug builds assert this; release builds leave pixels without a
    /// direction as they were, in both sequential and parallel mode.
    /// The scene must satisfy [`Scene::validate`]; it is not re-checked here.
    pub fn render(&mut self, scene: &Scene, camera: &impl RaySource) {
        let Some(final_image) = self.final_image.as_mut() else {
            tracing::warn!("render called before the first resize, skipping");
            return;
        };

        let width = self.image_data.width() as usize;
        let height = self.image_data.height() as usize;
        let directions = camera.ray_directions();
        // Both paths walk rows pairwise with the directions, so a short
        // direction list leaves the trailing pixels untouched in either mode.
        debug_assert_eq!(directions.len(), width * height);

        let span = tracing::debug_span!(
            "render",
            width,
            height,
            spheres = scene.spheres.len()
        );
        let _enter = span.enter();
        let started = Instant::now();

        let origin = camera.position();
        let settings = &self.settings;
        let data = self.image_data.data_mut();
        let render_row = |row: &mut [u32], row_directions: &[Vec3]| {
            for (pixel, direction) in row.iter_mut().zip(row_directions) {
                *pixel = per_pixel(&Ray::new(origin, *direction), scene, settings);
            }
        };

        // Chunking by a zero width panics, so empty buffers skip the scan.
        if settings.multithreaded && !data.is_empty() {
            data.par_chunks_mut(width)
                .zip(directions.par_chunks(width))
                .for_each(|(row, row_directions)| render_row(row, row_directions));
        } else if !data.is_empty() {
            for (row, row_directions) in data.chunks_mut(width).zip(directions.chunks(width)) {
                render_row(row, row_directions);
            }
        }

        final_image.set_data(self.image_data.data());
        tracing::debug!(elapsed_ms = started.elapsed().as_secs_f32() * 1000.0, "frame rendered");
    }
}
