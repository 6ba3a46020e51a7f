use crate::error::GeometryError;

/// Curve continuity of an edge in the source geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Continuity {
    /// The edge continues a smooth surface (tangent continuous).
    Smooth,
    /// The edge is a crease in the source geometry.
    Sharp,
}

/// Faces bordering an edge.
///
/// A mesh edge always borders one face (boundary of an open surface) or two
/// faces (interior edge).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Adjacency {
    Boundary(usize),
    Interior(usize, usize),
}

impl Adjacency {
    /// Builds the adjacency from a raw face list, or `None` when the list
    /// does not hold exactly one or two faces.
    #[must_use]
    pub fn from_faces(faces: &[usize]) -> Option<Self> {
        match *faces {
            [f] => Some(Self::Boundary(f)),
            [f0, f1] => Some(Self::Interior(f0, f1)),
            _ => None,
        }
    }

    /// Iterates over the adjacent face indices.
    pub fn faces(&self) -> impl Iterator<Item = usize> {
        let (first, second) = match *self {
            Self::Boundary(f) => (f, None),
            Self::Interior(f0, f1) => (f0, Some(f1)),
        };
        std::iter::once(first).chain(second)
    }

    #[must_use]
    pub fn contains(&self, face: usize) -> bool {
        self.faces().any(|f| f == face)
    }
}

/// An unordered vertex pair with its bordering faces.
#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    /// The two vertex indices.
    pub vertices: [usize; 2],
    /// The faces sharing this edge.
    pub adjacency: Adjacency,
    /// Continuity flag precomputed by the geometry source.
    pub continuity: Continuity,
}

impl Edge {
    /// Creates an edge with a known adjacency.
    #[must_use]
    pub fn new(vertices: [usize; 2], adjacency: Adjacency, continuity: Continuity) -> Self {
        Self {
            vertices,
            adjacency,
            continuity,
        }
    }

    /// Creates edge number `index` from a raw list of adjacent faces.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::InvalidAdjacency` if `faces` does not hold
    /// exactly one or two entries.
    pub fn from_adjacent_faces(
        index: usize,
        vertices: [usize; 2],
        faces: &[usize],
        continuity: Continuity,
    ) -> Result<Self, GeometryError> {
        let adjacency = Adjacency::from_faces(faces).ok_or(GeometryError::InvalidAdjacency {
            edge: index,
            count: faces.len(),
        })?;
        Ok(Self::new(vertices, adjacency, continuity))
    }

    /// Returns `true` if the edge borders a single face.
    #[must_use]
    pub fn is_boundary(&self) -> bool {
        matches!(self.adjacency, Adjacency::Boundary(_))
    }
}
