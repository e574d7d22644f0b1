use std::path::{Path, PathBuf};

use glam::Vec3;
use serde::Deserialize;

use crate::camera::Camera;
use crate::error::{Error, Result};
use crate::renderer::Settings;
use crate::scene::{Material, Scene, Sphere};

/// Everything the viewer needs to produce an image, usually read from TOML.
///
/// Omitted sections fall back to the stock scene at 800x600.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub render: RenderConfig,
    pub camera: CameraConfig,
    pub light: LightConfig,
    pub materials: Vec<MaterialConfig>,
    pub spheres: Vec<SphereConfig>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RenderConfig {
    pub width: u32,
    pub height: u32,
    pub frames: u32,
    pub multithreaded: bool,
    pub output: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CameraConfig {
    pub position: [f32; 3],
    pub target: [f32; 3],
    /// Degrees.
    pub vertical_fov: f32,
    pub near_clip: f32,
    pub far_clip: f32,
    pub orbit_degrees_per_frame: f32,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LightConfig {
    pub direction: [f32; 3],
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MaterialConfig {
    pub albedo: [f32; 3],
    #[serde(default = "default_roughness")]
    pub roughness: f32,
    #[serde(default)]
    pub metallic: f32,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SphereConfig {
    pub position: [f32; 3],
    pub radius: f32,
    pub material: usize,
}

const fn default_roughness() -> f32 {
    1.0
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            frames: 1,
            multithreaded: false,
            output: PathBuf::from("output.png"),
        }
    }
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            position: [0.0, 0.0, 6.0],
            target: [0.0, 0.0, 0.0],
            vertical_fov: 45.0,
            near_clip: 0.1,
            far_clip: 100.0,
            orbit_degrees_per_frame: 0.0,
        }
    }
}

impl Default for LightConfig {
    fn default() -> Self {
        Self {
            direction: [-1.0, -1.0, -1.0],
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        let scene = Scene::default_scene();
        Self {
            render: RenderConfig::default(),
            camera: CameraConfig::default(),
            light: LightConfig::default(),
            materials: scene
                .materials
                .iter()
                .map(|material| MaterialConfig {
                    albedo: material.albedo.to_array(),
                    roughness: material.roughness,
                    metallic: material.metallic,
                })
                .collect(),
            spheres: scene
                .spheres
                .iter()
                .map(|sphere| SphereConfig {
                    position: sphere.position.to_array(),
                    radius: sphere.radius,
                    material: sphere.material_index,
                })
                .collect(),
        }
    }
}

impl Config {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!(path = %path.display(), "loaded config");
        Self::from_toml_str(&raw)
    }

    pub fn from_toml_str(raw: &str) -> Result<Self> {
        Ok(toml::from_str(raw)?)
    }

    pub fn validate(&self) -> Result<()> {
        if self.render.width == 0 || self.render.height == 0 {
            return Err(Error::InvalidConfig(
                "width and height must be positive".into(),
            ));
        }
        if self.render.frames == 0 {
            return Err(Error::InvalidConfig("frames must be at least 1".into()));
        }

        let light = Vec3::from_array(self.light.direction);
        if !light.is_finite() || light.length_squared() == 0.0 {
            return Err(Error::InvalidConfig(
                "light direction must be finite and non-zero".into(),
            ));
        }

        let position = Vec3::from_array(self.camera.position);
        let target = Vec3::from_array(self.camera.target);
        if !position.is_finite() || !target.is_finite() {
            return Err(Error::InvalidConfig(
                "camera vectors must contain finite values".into(),
            ));
        }
        if position.distance(target) < 1e-4 {
            return Err(Error::InvalidConfig(
                "camera position must differ from its target".into(),
            ));
        }
        if !(self.camera.vertical_fov > 0.0 && self.camera.vertical_fov < 180.0) {
            return Err(Error::InvalidConfig(format!(
                "vertical_fov must be in (0, 180), got {}",
                self.camera.vertical_fov
            )));
        }
        if !(self.camera.near_clip > 0.0 && self.camera.near_clip < self.camera.far_clip) {
            return Err(Error::InvalidConfig(
                "clip planes must satisfy 0 < near_clip < far_clip".into(),
            ));
        }

        self.scene().validate()
    }

    pub fn scene(&self) -> Scene {
        Scene {
            materials: self
                .materials
                .iter()
                .map(|material| Material {
                    albedo: Vec3::from_array(material.albedo),
                    roughness: material.roughness,
                    metallic: material.metallic,
                })
                .collect(),
            spheres: self
                .spheres
                .iter()
                .map(|sphere| Sphere {
                    position: Vec3::from_array(sphere.position),
                    radius: sphere.radius,
                    material_index: sphere.material,
                })
                .collect(),
        }
    }

    pub fn settings(&self) -> Settings {
        Settings {
            light_direction: Vec3::from_array(self.light.direction).normalize(),
            multithreaded: self.render.multithreaded,
            ..Default::default()
        }
    }

    /// Camera aimed as configured; it still needs a viewport size.
    pub fn camera(&self) -> Camera {
        let mut camera = Camera::new(
            self.camera.vertical_fov,
            self.camera.near_clip,
            self.camera.far_clip,
        );
        camera.look_at(
            Vec3::from_array(self.camera.position),
            Vec3::from_array(self.camera.target),
        );
        camera
    }

    pub fn camera_target(&self) -> Vec3 {
        Vec3::from_array(self.camera.target)
    }
}
