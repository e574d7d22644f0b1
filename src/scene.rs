use glam::Vec3;

use crate::error::{Error, Result};

#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    pub albedo: Vec3,
    pub roughness: f32,
    pub metallic: f32,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            albedo: Vec3::ONE,
            roughness: 1.0,
            metallic: 0.0,
        }
    }
}

impl Material {
    pub fn with_albedo(albedo: Vec3) -> Self {
        Self {
            albedo,
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Sphere {
    pub position: Vec3,
    pub radius: f32,

    /// Index into [`Scene::materials`]. Must be in range when rendering.
    pub material_index: usize,
}

impl Default for Sphere {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            radius: 0.5,
            material_index: 0,
        }
    }
}

/// Spheres and the materials they reference, in scan order.
#[derive(Debug, Clone, Default)]
pub struct Scene {
    pub spheres: Vec<Sphere>,
    pub materials: Vec<Material>,
}

impl Scene {
    /// The stock scene: a pink unit sphere resting on a large blue one.
    pub fn default_scene() -> Self {
        let mut scene = Self::default();
        let pink = scene.add_material(Material::with_albedo(Vec3::new(1.0, 0.0, 1.0)));
        let blue = scene.add_material(Material {
            albedo: Vec3::new(0.2, 0.3, 1.0),
            roughness: 0.1,
            ..Default::default()
        });

        scene.add_sphere(Sphere {
            position: Vec3::ZERO,
            radius: 1.0,
            material_index: pink,
        });
        scene.add_sphere(Sphere {
            position: Vec3::new(0.0, -101.0, 0.0),
            radius: 100.0,
            material_index: blue,
        });
        scene
    }

    /// Append a material and return its index.
    pub fn add_material(&mut self, material: Material) -> usize {
        self.materials.push(material);
        self.materials.len() - 1
    }

    pub fn add_sphere(&mut self, sphere: Sphere) {
        self.spheres.push(sphere);
    }

    /// Check the invariants the renderer relies on without checking itself.
    pub fn validate(&self) -> Result<()> {
        for (index, sphere) in self.spheres.iter().enumerate() {
            if !sphere.radius.is_finite() || sphere.radius <= 0.0 {
                return Err(Error::InvalidScene(format!(
                    "sphere {index} has non-positive radius {}",
                    sphere.radius
                )));
            }
            if !sphere.position.is_finite() {
                return Err(Error::InvalidScene(format!(
                    "sphere {index} has a non-finite position"
                )));
            }
            if sphere.material_index >= self.materials.len() {
                return Err(Error::InvalidScene(format!(
                    "sphere {index} references material {} but the scene has {}",
                    sphere.material_index,
                    self.materials.len()
                )));
            }
        }
        Ok(())
    }
}
