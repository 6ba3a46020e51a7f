use crate::math::{Point3, Vector3};

/// A mesh vertex as produced by the geometry source.
#[derive(Debug, Clone, PartialEq)]
pub struct Vertex {
    /// The 3D position of the vertex.
    pub position: Point3,
    /// Optional surface normal at the vertex.
    pub normal: Option<Vector3>,
}

impl Vertex {
    /// Creates a vertex without a normal.
    #[must_use]
    pub fn new(position: Point3) -> Self {
        Self {
            position,
            normal: None,
        }
    }

    /// Creates a vertex carrying a surface normal.
    #[must_use]
    pub fn with_normal(position: Point3, normal: Vector3) -> Self {
        Self {
            position,
            normal: Some(normal),
        }
    }
}

impl From<Point3> for Vertex {
    fn from(position: Point3) -> Self {
        Self::new(position)
    }
}
