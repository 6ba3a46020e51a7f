use crate::error::GeometryError;
use crate::math::{Point3, Vector3, TOLERANCE};
use crate::mesh::Mesh;
use crate::scene::{LightSource, Material, Rgb};

use super::project::Eye;

/// Phong illumination of flat faces.
///
/// The ambient term `ka * base` is counted once. Each light adds
/// `kd * max(0, N.L) * light` and, while the diffuse term is positive,
/// `ks * max(0, R.V)^shininess * light`. With no lights the material's base
/// color is returned unchanged.
#[derive(Debug, Clone, Copy)]
pub struct Shader<'a> {
    lights: &'a [LightSource],
    eye: Eye,
}

impl<'a> Shader<'a> {
    #[must_use]
    pub fn new(lights: &'a [LightSource], eye: Eye) -> Self {
        Self { lights, eye }
    }

    /// Shades face `face` of `mesh`.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::DegenerateFace` if the face has no normal.
    pub fn shade_face(
        &self,
        mesh: &Mesh,
        face: usize,
        material: &Material,
    ) -> Result<Rgb, GeometryError> {
        let normal = mesh.faces()[face]
            .normal()
            .ok_or(GeometryError::DegenerateFace { face })?;
        let centroid = mesh.face_centroid(face);
        Ok(Rgb::from_channels(self.illuminate(normal, &centroid, material)))
    }

    /// Raw channel intensities at `point`, clamped to `[0, 255]`.
    #[must_use]
    pub fn illuminate(&self, normal: &Vector3, point: &Point3, material: &Material) -> [f64; 3] {
        let base = material.color.channels();
        if self.lights.is_empty() {
            return base;
        }

        let to_eye = self.eye.direction_from(point);
        let mut out = base.map(|c| material.ka * c);
        for light in self.lights {
            let Some(to_light) = (light.position - point).try_normalize(TOLERANCE) else {
                continue;
            };
            let diffuse = normal.dot(&to_light).max(0.0);
            let specular = if diffuse > 0.0 {
                let reflected = normal * (2.0 * diffuse) - to_light;
                reflected.dot(&to_eye).max(0.0).powf(material.shininess)
            } else {
                0.0
            };
            let weight = material.kd * diffuse + material.ks * specular;
            for (channel, lc) in out.iter_mut().zip(light.color.channels()) {
                *channel += weight * lc;
            }
        }
        out.map(|c| if c.is_nan() { 0.0 } else { c.clamp(0.0, 255.0) })
    }
}
