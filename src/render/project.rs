use crate::error::ConfigurationError;
use crate::math::{Matrix4, Point2, Point3, Vector2, Vector3, TOLERANCE};
use crate::scene::{Camera, Projection};

/// A point mapped onto the view plane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectedPoint {
    /// View-plane coordinates.
    pub screen: Point2,
    /// Camera-space z; more negative is farther from the camera.
    pub depth: f64,
}

/// Where shading looks from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Eye {
    /// Parallel projection: unit vector pointing towards the viewer.
    Direction(Vector3),
    /// Perspective projection: the camera position.
    Position(Point3),
}

impl Eye {
    /// Unit vector from `point` towards the viewer.
    #[must_use]
    pub fn direction_from(&self, point: &Point3) -> Vector3 {
        match self {
            Self::Direction(d) => *d,
            Self::Position(p) => (p - point).try_normalize(TOLERANCE).unwrap_or_else(Vector3::z),
        }
    }
}

/// Maps world coordinates to the view plane of a camera.
///
/// Camera space is right-handed with the camera at the origin looking down
/// -Z. Parallel projection scales camera `(x, y)` by `2 / height`;
/// perspective divides by `-z` and by `tan(fov_y / 2)`.
#[derive(Debug, Clone)]
pub struct Projector {
    view: Matrix4,
    projection: Projection,
    position: Point3,
    view_direction: Vector3,
}

impl Projector {
    /// Builds the view transform for `camera`.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigurationError` if the camera is degenerate; no
    /// projection work happens in that case.
    pub fn new(camera: &Camera) -> Result<Self, ConfigurationError> {
        camera.validate()?;
        Ok(Self {
            view: Matrix4::look_at_rh(&camera.position, &camera.target, &camera.up),
            projection: camera.projection,
            position: camera.position,
            view_direction: camera.view_direction()?,
        })
    }

    /// Transforms a world point into camera space.
    #[must_use]
    pub fn to_camera(&self, point: &Point3) -> Point3 {
        self.view.transform_point(point)
    }

    /// Projects a world point.
    ///
    /// Returns `None` for points at or behind the eye of a perspective
    /// camera.
    #[must_use]
    pub fn project(&self, point: &Point3) -> Option<ProjectedPoint> {
        self.project_camera(&self.to_camera(point))
    }

    /// Projects a point that is already in camera space.
    #[must_use]
    pub fn project_camera(&self, p: &Point3) -> Option<ProjectedPoint> {
        let screen = match self.projection {
            Projection::Parallel { height } => Point2::new(p.x, p.y) * (2.0 / height),
            Projection::Perspective { fov_y } => {
                if -p.z <= TOLERANCE {
                    return None;
                }
                let f = 1.0 / (0.5 * fov_y).tan();
                Point2::new(p.x / -p.z, p.y / -p.z) * f
            }
        };
        Some(ProjectedPoint {
            screen,
            depth: p.z,
        })
    }

    /// Camera-space ray `(origin, direction)` through a view-plane point.
    #[must_use]
    pub fn view_ray(&self, screen: &Point2) -> (Point3, Vector3) {
        match self.projection {
            Projection::Parallel { height } => {
                let s = 0.5 * height;
                (
                    Point3::new(screen.x * s, screen.y * s, 0.0),
                    -Vector3::z(),
                )
            }
            Projection::Perspective { fov_y } => {
                let t = (0.5 * fov_y).tan();
                (Point3::origin(), Vector3::new(screen.x * t, screen.y * t, -1.0))
            }
        }
    }

    /// Projects a world direction without translation, as seen on the view
    /// plane. Used for the coordinate-system glyph.
    #[must_use]
    pub fn project_direction(&self, direction: &Vector3) -> Vector2 {
        let v = self.view.transform_vector(direction);
        Vector2::new(v.x, v.y)
    }

    /// Vector from the camera towards `point`, used for facing tests.
    #[must_use]
    pub fn view_vector_to(&self, point: &Point3) -> Vector3 {
        match self.projection {
            Projection::Parallel { .. } => self.view_direction,
            Projection::Perspective { .. } => point - self.position,
        }
    }

    /// Viewer location for shading.
    #[must_use]
    pub fn eye(&self) -> Eye {
        match self.projection {
            Projection::Parallel { .. } => Eye::Direction(-self.view_direction),
            Projection::Perspective { .. } => Eye::Position(self.position),
        }
    }
}
