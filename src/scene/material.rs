use crate::error::ConfigurationError;

use super::Rgb;

/// Phong surface properties shared by all faces of a part.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    /// Ambient coefficient in `[0, 1]`.
    pub ka: f64,
    /// Diffuse coefficient in `[0, 1]`.
    pub kd: f64,
    /// Specular coefficient in `[0, 1]`.
    pub ks: f64,
    /// Specular exponent, `>= 0`.
    pub shininess: f64,
    /// Base color of the surface.
    pub color: Rgb,
    /// Fill opacity in `[0, 1]`; 1 is fully opaque.
    pub opacity: f64,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            ka: 0.4,
            kd: 0.5,
            ks: 0.1,
            shininess: 8.0,
            color: Rgb::new(180, 180, 180),
            opacity: 1.0,
        }
    }
}

impl Material {
    /// Creates an opaque material with the given coefficients and base color.
    #[must_use]
    pub fn new(ka: f64, kd: f64, ks: f64, shininess: f64, color: Rgb) -> Self {
        Self {
            ka,
            kd,
            ks,
            shininess,
            color,
            opacity: 1.0,
        }
    }

    #[must_use]
    pub fn with_opacity(mut self, opacity: f64) -> Self {
        self.opacity = opacity;
        self
    }

    /// Checks coefficient ranges.
    ///
    /// # Errors
    ///
    /// Returns `ConfigurationError::InvalidMaterial` naming the first field
    /// outside its range.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        for (field, value) in [
            ("ka", self.ka),
            ("kd", self.kd),
            ("ks", self.ks),
            ("opacity", self.opacity),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigurationError::InvalidMaterial { field, value });
            }
        }
        if !(self.shininess >= 0.0 && self.shininess.is_finite()) {
            return Err(ConfigurationError::InvalidMaterial {
                field: "shininess",
                value: self.shininess,
            });
        }
        Ok(())
    }
}
