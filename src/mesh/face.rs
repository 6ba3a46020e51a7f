use crate::math::Vector3;

/// A triangular face of a mesh.
///
/// The normal is computed when the owning [`Mesh`](super::Mesh) is built and
/// is `None` for degenerate (zero-area) triangles.
#[derive(Debug, Clone, PartialEq)]
pub struct Face {
    vertices: [usize; 3],
    normal: Option<Vector3>,
}

impl Face {
    pub(super) fn new(vertices: [usize; 3], normal: Option<Vector3>) -> Self {
        Self { vertices, normal }
    }

    /// Vertex indices in winding order.
    #[must_use]
    pub fn vertices(&self) -> [usize; 3] {
        self.vertices
    }

    /// Outward unit normal, or `None` if the face is degenerate.
    #[must_use]
    pub fn normal(&self) -> Option<&Vector3> {
        self.normal.as_ref()
    }

    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        self.normal.is_none()
    }

    /// Returns `true` if `a` and `b` are both corners of this face.
    #[must_use]
    pub fn has_side(&self, a: usize, b: usize) -> bool {
        self.vertices.contains(&a) && self.vertices.contains(&b)
    }
}
