mod camera;
mod color;
mod light;
mod material;

pub use camera::{Camera, Projection};
pub use color::Rgb;
pub use light::LightSource;
pub use material::Material;

use slotmap::SlotMap;

use crate::error::ConfigurationError;
use crate::mesh::Mesh;

slotmap::new_key_type! {
    /// Unique identifier for a part in a scene.
    pub struct PartId;
}

/// A named mesh with the material shared by all its faces.
#[derive(Debug, Clone)]
pub struct Part {
    pub name: String,
    pub mesh: Mesh,
    pub material: Material,
}

impl Part {
    #[must_use]
    pub fn new(name: impl Into<String>, mesh: Mesh, material: Material) -> Self {
        Self {
            name: name.into(),
            mesh,
            material,
        }
    }
}

/// Parts, camera and lights of one render.
///
/// A render borrows the scene immutably, so it cannot change while a render
/// is in progress. Parts are kept in insertion order.
#[derive(Debug, Clone)]
pub struct Scene {
    parts: SlotMap<PartId, Part>,
    camera: Camera,
    lights: Vec<LightSource>,
}

impl Scene {
    /// Creates an empty scene seen through `camera`.
    #[must_use]
    pub fn new(camera: Camera) -> Self {
        Self {
            parts: SlotMap::with_key(),
            camera,
            lights: Vec::new(),
        }
    }

    /// Inserts a part and returns its ID.
    pub fn add_part(&mut self, part: Part) -> PartId {
        self.parts.insert(part)
    }

    pub fn add_light(&mut self, light: LightSource) {
        self.lights.push(light);
    }

    pub fn set_camera(&mut self, camera: Camera) {
        self.camera = camera;
    }

    #[must_use]
    pub fn part(&self, id: PartId) -> Option<&Part> {
        self.parts.get(id)
    }

    /// Iterates over parts in insertion order.
    pub fn parts(&self) -> impl Iterator<Item = (PartId, &Part)> {
        self.parts.iter()
    }

    #[must_use]
    pub fn part_count(&self) -> usize {
        self.parts.len()
    }

    #[must_use]
    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    #[must_use]
    pub fn lights(&self) -> &[LightSource] {
        &self.lights
    }

    /// Checks the camera, that at least one part exists, and every material.
    ///
    /// # Errors
    ///
    /// Returns the first `ConfigurationError` found.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        self.camera.validate()?;
        if self.parts.is_empty() {
            return Err(ConfigurationError::EmptyScene);
        }
        for (_, part) in &self.parts {
            part.material.validate()?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::math::Point3;
    use crate::mesh::Vertex;

    fn triangle_mesh() -> Mesh {
        Mesh::new(
            vec![
                Vertex::new(Point3::new(0.0, 0.0, 0.0)),
                Vertex::new(Point3::new(1.0, 0.0, 0.0)),
                Vertex::new(Point3::new(0.0, 1.0, 0.0)),
            ],
            vec![[0, 1, 2]],
            Vec::new(),
        )
        .unwrap()
    }

    #[test]
    fn parts_iterate_in_insertion_order() {
        let mut scene = Scene::new(Camera::new(Point3::new(0.0, 0.0, 3.0), Point3::origin()));
        let a = scene.add_part(Part::new("a", triangle_mesh(), Material::default()));
        let b = scene.add_part(Part::new("b", triangle_mesh(), Material::default()));
        let ids: Vec<PartId> = scene.parts().map(|(id, _)| id).collect();
        assert_eq!(ids, vec![a, b]);
        assert_eq!(scene.part(b).unwrap().name, "b");
    }

    #[test]
    fn validate_reports_bad_material() {
        let mut scene = Scene::new(Camera::new(Point3::new(0.0, 0.0, 3.0), Point3::origin()));
        let material = Material {
            ks: -0.5,
            ..Material::default()
        };
        scene.add_part(Part::new("bad", triangle_mesh(), material));
        assert!(matches!(
            scene.validate(),
            Err(ConfigurationError::InvalidMaterial { field: "ks", .. })
        ));
    }

    #[test]
    fn empty_scene_is_invalid() {
        let scene = Scene::new(Camera::new(Point3::new(0.0, 0.0, 3.0), Point3::origin()));
        assert_eq!(scene.validate(), Err(ConfigurationError::EmptyScene));
    }
}
