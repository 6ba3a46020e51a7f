use std::f64::consts::PI;

use crate::error::ConfigurationError;
use crate::math::{Point3, Vector3, TOLERANCE};

/// How camera space is flattened onto the view plane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Projection {
    /// Orthographic projection; `height` is the vertical extent of the view
    /// volume that maps to `[-1, 1]`.
    Parallel { height: f64 },
    /// Perspective projection with a vertical field of view in radians.
    Perspective { fov_y: f64 },
}

impl Default for Projection {
    /// Parallel projection preserving world units.
    fn default() -> Self {
        Self::Parallel { height: 2.0 }
    }
}

/// A viewpoint looking from `position` towards `target`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub position: Point3,
    pub target: Point3,
    pub up: Vector3,
    pub projection: Projection,
}

impl Camera {
    /// Creates a parallel-projection camera.
    ///
    /// The up vector is world +Z, or +Y when looking along the Z axis.
    #[must_use]
    pub fn new(position: Point3, target: Point3) -> Self {
        let view = target - position;
        let up = if view.cross(&Vector3::z()).norm() <= TOLERANCE * view.norm().max(1.0) {
            Vector3::y()
        } else {
            Vector3::z()
        };
        Self {
            position,
            target,
            up,
            projection: Projection::default(),
        }
    }

    #[must_use]
    pub fn with_up(mut self, up: Vector3) -> Self {
        self.up = up;
        self
    }

    #[must_use]
    pub fn with_projection(mut self, projection: Projection) -> Self {
        self.projection = projection;
        self
    }

    /// Unit vector from the camera towards its target.
    ///
    /// # Errors
    ///
    /// Returns `ConfigurationError::DegenerateCamera` if position and target
    /// coincide.
    pub fn view_direction(&self) -> Result<Vector3, ConfigurationError> {
        let view = self.target - self.position;
        let len = view.norm();
        if len < TOLERANCE || !len.is_finite() {
            return Err(ConfigurationError::DegenerateCamera);
        }
        Ok(view / len)
    }

    /// Checks the camera before any projection work.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigurationError` for a camera whose position equals its
    /// target, an up vector that is zero or parallel to the view, or
    /// out-of-range projection parameters.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        let view = self.view_direction()?;
        let up_len = self.up.norm();
        if up_len < TOLERANCE || view.cross(&(self.up / up_len)).norm() < TOLERANCE {
            return Err(ConfigurationError::DegenerateUpVector);
        }
        match self.projection {
            Projection::Parallel { height } if !(height > 0.0 && height.is_finite()) => Err(
                ConfigurationError::InvalidProjection(format!("view height {height} must be positive")),
            ),
            Projection::Perspective { fov_y } if !(fov_y > 0.0 && fov_y < PI) => {
                Err(ConfigurationError::InvalidProjection(format!(
                    "field of view {fov_y} must lie in (0, pi)"
                )))
            }
            _ => Ok(()),
        }
    }
}
