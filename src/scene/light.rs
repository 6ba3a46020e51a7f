use crate::math::Point3;

use super::Rgb;

/// A point light.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightSource {
    /// Position in world space.
    pub position: Point3,
    /// Emitted color.
    pub color: Rgb,
}

impl LightSource {
    /// Creates a white light at `position`.
    #[must_use]
    pub fn new(position: Point3) -> Self {
        Self {
            position,
            color: Rgb::WHITE,
        }
    }

    #[must_use]
    pub fn with_color(mut self, color: Rgb) -> Self {
        self.color = color;
        self
    }
}
