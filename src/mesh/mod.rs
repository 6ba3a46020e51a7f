mod edge;
mod face;
mod vertex;

pub use edge::{Adjacency, Continuity, Edge};
pub use face::Face;
pub use vertex::Vertex;

use std::collections::HashMap;

use crate::error::GeometryError;
use crate::math::{triangle_normal, Point3, Vector3};

/// Dihedral angles below this (radians) count as coplanar when deriving edges.
const FLAT_ANGLE: f64 = 1e-6;

/// Options for deriving the edge list from triangle adjacency.
///
/// By default interior edges are left [`Continuity::Smooth`], so the render
/// parameter `sharp_angle` alone decides which creases read as sharp.
#[derive(Debug, Clone, Copy, Default)]
pub struct EdgeDerivation {
    /// Interior edges whose dihedral angle exceeds this (radians) are
    /// flagged [`Continuity::Sharp`], which makes them sharp wires at any
    /// `sharp_angle`. `None` flags no interior edge.
    pub crease_angle: Option<f64>,
    /// Keep interior edges between coplanar faces (triangulation diagonals).
    pub include_flat: bool,
}

/// A triangulated surface handed over by the geometry source.
///
/// Construction validates every index and the edge/face adjacency; a mesh
/// that exists is structurally sound. Degenerate faces are allowed and are
/// skipped at render time.
#[derive(Debug, Clone)]
pub struct Mesh {
    vertices: Vec<Vertex>,
    faces: Vec<Face>,
    edges: Vec<Edge>,
}

impl Mesh {
    /// Builds a mesh from vertices, face index triples and classified edges.
    ///
    /// Face normals follow the winding order; when all three vertices carry
    /// normals that disagree with the winding, the face normal is flipped.
    ///
    /// # Errors
    ///
    /// Returns a `GeometryError` if an index is out of range, an interior
    /// edge names the same face twice, or an edge is not a side of one of
    /// its adjacent faces.
    pub fn new(
        vertices: Vec<Vertex>,
        faces: Vec<[usize; 3]>,
        edges: Vec<Edge>,
    ) -> Result<Self, GeometryError> {
        let faces = build_faces(&vertices, faces)?;

        for (index, edge) in edges.iter().enumerate() {
            let [a, b] = edge.vertices;
            check_index("vertex", a, vertices.len())?;
            check_index("vertex", b, vertices.len())?;
            if a == b {
                return Err(GeometryError::DegenerateEdge { edge: index });
            }
            if let Adjacency::Interior(f0, f1) = edge.adjacency {
                if f0 == f1 {
                    return Err(GeometryError::InvalidAdjacency {
                        edge: index,
                        count: 1,
                    });
                }
            }
            for face in edge.adjacency.faces() {
                check_index("face", face, faces.len())?;
                if !faces[face].has_side(a, b) {
                    return Err(GeometryError::EdgeNotOnFace { edge: index, face });
                }
            }
        }

        Ok(Self {
            vertices,
            faces,
            edges,
        })
    }

    /// Builds a mesh and derives its edges from shared triangle sides.
    ///
    /// Sides used by one face become boundary edges (flagged sharp); sides
    /// used by two faces become interior edges, flagged sharp only above
    /// [`EdgeDerivation::crease_angle`].
    /// Edges appear in order of first use by the faces.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::InvalidAdjacency` if a side is shared by more
    /// than two faces (non-manifold input), or any error of [`Mesh::new`].
    pub fn with_derived_edges(
        vertices: Vec<Vertex>,
        faces: Vec<[usize; 3]>,
        derivation: EdgeDerivation,
    ) -> Result<Self, GeometryError> {
        let built = build_faces(&vertices, faces)?;

        let mut order: Vec<(usize, usize)> = Vec::new();
        let mut sides: HashMap<(usize, usize), Vec<usize>> = HashMap::new();
        for (face_index, face) in built.iter().enumerate() {
            let [v0, v1, v2] = face.vertices();
            for (a, b) in [(v0, v1), (v1, v2), (v2, v0)] {
                if a == b {
                    continue;
                }
                let key = (a.min(b), a.max(b));
                let users = sides.entry(key).or_insert_with(|| {
                    order.push(key);
                    Vec::new()
                });
                users.push(face_index);
            }
        }

        let mut edges = Vec::with_capacity(order.len());
        for key in order {
            let users = &sides[&key];
            let index = edges.len();
            let adjacency =
                Adjacency::from_faces(users).ok_or(GeometryError::InvalidAdjacency {
                    edge: index,
                    count: users.len(),
                })?;
            let continuity = match adjacency {
                Adjacency::Boundary(_) => Continuity::Sharp,
                Adjacency::Interior(f0, f1) => {
                    match dihedral_angle(built[f0].normal(), built[f1].normal()) {
                        Some(angle) if angle < FLAT_ANGLE && !derivation.include_flat => continue,
                        Some(angle) if derivation.crease_angle.is_some_and(|crease| angle > crease) => {
                            Continuity::Sharp
                        }
                        _ => Continuity::Smooth,
                    }
                }
            };
            edges.push(Edge::new([key.0, key.1], adjacency, continuity));
        }

        Ok(Self {
            vertices,
            faces: built,
            edges,
        })
    }

    #[must_use]
    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    #[must_use]
    pub fn faces(&self) -> &[Face] {
        &self.faces
    }

    #[must_use]
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Corner positions of face `index`.
    #[must_use]
    pub fn face_points(&self, index: usize) -> [Point3; 3] {
        self.faces[index]
            .vertices()
            .map(|v| self.vertices[v].position)
    }

    /// Centroid of face `index`.
    #[must_use]
    pub fn face_centroid(&self, index: usize) -> Point3 {
        let [a, b, c] = self.face_points(index);
        Point3::from((a.coords + b.coords + c.coords) / 3.0)
    }

    /// Dihedral angle (radians) across edge `index`, or `None` for boundary
    /// edges and edges next to a degenerate face.
    #[must_use]
    pub fn edge_dihedral(&self, index: usize) -> Option<f64> {
        match self.edges[index].adjacency {
            Adjacency::Boundary(_) => None,
            Adjacency::Interior(f0, f1) => {
                dihedral_angle(self.faces[f0].normal(), self.faces[f1].normal())
            }
        }
    }
}

/// Angle between two face normals, or `None` if either is missing.
#[must_use]
pub fn dihedral_angle(n0: Option<&Vector3>, n1: Option<&Vector3>) -> Option<f64> {
    let (n0, n1) = (n0?, n1?);
    Some(n0.dot(n1).clamp(-1.0, 1.0).acos())
}

fn check_index(kind: &'static str, index: usize, len: usize) -> Result<(), GeometryError> {
    if index < len {
        Ok(())
    } else {
        Err(GeometryError::IndexOutOfRange { kind, index, len })
    }
}

fn build_faces(vertices: &[Vertex], faces: Vec<[usize; 3]>) -> Result<Vec<Face>, GeometryError> {
    faces
        .into_iter()
        .map(|indices| {
            for &v in &indices {
                check_index("vertex", v, vertices.len())?;
            }
            let [a, b, c] = indices.map(|v| &vertices[v]);
            let normal = triangle_normal(&a.position, &b.position, &c.position)
                .map(|n| orient_by_vertex_normals(n, [a, b, c]));
            Ok(Face::new(indices, normal))
        })
        .collect()
}

fn orient_by_vertex_normals(normal: Vector3, corners: [&Vertex; 3]) -> Vector3 {
    let mut sum = Vector3::zeros();
    for corner in corners {
        match corner.normal {
            Some(n) => sum += n,
            None => return normal,
        }
    }
    if sum.dot(&normal) < 0.0 {
        -normal
    } else {
        normal
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::FRAC_PI_2;

    fn quad_vertices() -> Vec<Vertex> {
        vec![
            Vertex::new(Point3::new(0.0, 0.0, 0.0)),
            Vertex::new(Point3::new(1.0, 0.0, 0.0)),
            Vertex::new(Point3::new(1.0, 1.0, 0.0)),
            Vertex::new(Point3::new(0.0, 1.0, 0.0)),
        ]
    }

    #[test]
    fn new_computes_face_normals() {
        let mesh = Mesh::new(quad_vertices(), vec![[0, 1, 2], [0, 2, 3]], Vec::new()).unwrap();
        for face in mesh.faces() {
            assert_relative_eq!(*face.normal().unwrap(), Vector3::z(), epsilon = 1e-12);
        }
    }

    #[test]
    fn vertex_normals_flip_inverted_winding() {
        let up = Vector3::z();
        let vertices = vec![
            Vertex::with_normal(Point3::new(0.0, 0.0, 0.0), up),
            Vertex::with_normal(Point3::new(1.0, 0.0, 0.0), up),
            Vertex::with_normal(Point3::new(0.0, 1.0, 0.0), up),
        ];
        let mesh = Mesh::new(vertices, vec![[0, 2, 1]], Vec::new()).unwrap();
        assert_relative_eq!(*mesh.faces()[0].normal().unwrap(), up, epsilon = 1e-12);
    }

    #[test]
    fn collinear_face_is_degenerate_but_accepted() {
        let vertices = vec![
            Vertex::new(Point3::new(0.0, 0.0, 0.0)),
            Vertex::new(Point3::new(0.5, 0.0, 0.0)),
            Vertex::new(Point3::new(1.0, 0.0, 0.0)),
        ];
        let mesh = Mesh::new(vertices, vec![[0, 1, 2]], Vec::new()).unwrap();
        assert!(mesh.faces()[0].is_degenerate());
    }

    #[test]
    fn face_index_out_of_range_is_rejected() {
        let err = Mesh::new(quad_vertices(), vec![[0, 1, 7]], Vec::new()).unwrap_err();
        assert_eq!(
            err,
            GeometryError::IndexOutOfRange {
                kind: "vertex",
                index: 7,
                len: 4
            }
        );
    }

    #[test]
    fn edge_must_lie_on_adjacent_face() {
        let edges = vec![Edge::new([1, 3], Adjacency::Boundary(0), Continuity::Sharp)];
        let err = Mesh::new(quad_vertices(), vec![[0, 1, 2]], edges).unwrap_err();
        assert_eq!(err, GeometryError::EdgeNotOnFace { edge: 0, face: 0 });
    }

    #[test]
    fn derived_edges_drop_flat_diagonal() {
        let mesh = Mesh::with_derived_edges(
            quad_vertices(),
            vec![[0, 1, 2], [0, 2, 3]],
            EdgeDerivation::default(),
        )
        .unwrap();
        assert_eq!(mesh.edges().len(), 4);
        assert!(mesh.edges().iter().all(Edge::is_boundary));
    }

    #[test]
    fn derived_edges_keep_flat_diagonal_on_request() {
        let mesh = Mesh::with_derived_edges(
            quad_vertices(),
            vec![[0, 1, 2], [0, 2, 3]],
            EdgeDerivation {
                include_flat: true,
                ..EdgeDerivation::default()
            },
        )
        .unwrap();
        assert_eq!(mesh.edges().len(), 5);
        let diagonal = mesh.edges().iter().position(|e| !e.is_boundary()).unwrap();
        assert_eq!(mesh.edges()[diagonal].continuity, Continuity::Smooth);
        assert_relative_eq!(mesh.edge_dihedral(diagonal).unwrap(), 0.0, epsilon = 1e-9);
    }

    fn fold_vertices() -> Vec<Vertex> {
        vec![
            Vertex::new(Point3::new(0.0, 0.0, 0.0)),
            Vertex::new(Point3::new(1.0, 0.0, 0.0)),
            Vertex::new(Point3::new(0.0, 1.0, 0.0)),
            Vertex::new(Point3::new(0.0, 0.0, 1.0)),
        ]
    }

    fn fold_edge(mesh: &Mesh) -> usize {
        mesh.edges()
            .iter()
            .position(|e| e.vertices == [0, 1])
            .unwrap()
    }

    #[test]
    fn derived_fold_is_flagged_above_crease_angle() {
        // Two faces meeting at a right angle along the 0-1 side.
        let mesh = Mesh::with_derived_edges(
            fold_vertices(),
            vec![[0, 1, 2], [0, 3, 1]],
            EdgeDerivation {
                crease_angle: Some(25_f64.to_radians()),
                ..EdgeDerivation::default()
            },
        )
        .unwrap();
        let fold = fold_edge(&mesh);
        assert_eq!(mesh.edges()[fold].continuity, Continuity::Sharp);
        assert_relative_eq!(mesh.edge_dihedral(fold).unwrap(), FRAC_PI_2, epsilon = 1e-9);
    }

    #[test]
    fn derived_fold_is_smooth_by_default() {
        let mesh = Mesh::with_derived_edges(
            fold_vertices(),
            vec![[0, 1, 2], [0, 3, 1]],
            EdgeDerivation::default(),
        )
        .unwrap();
        assert_eq!(mesh.edges()[fold_edge(&mesh)].continuity, Continuity::Smooth);
    }

    #[test]
    fn micro_scale_cube_keeps_faces_and_feature_edges() {
        let vertices: Vec<Vertex> = [
            (0.0, 0.0, 0.0),
            (1.0, 0.0, 0.0),
            (1.0, 1.0, 0.0),
            (0.0, 1.0, 0.0),
            (0.0, 0.0, 1.0),
            (1.0, 0.0, 1.0),
            (1.0, 1.0, 1.0),
            (0.0, 1.0, 1.0),
        ]
        .into_iter()
        .map(|(x, y, z)| Vertex::new(Point3::new(x, y, z) * 1e-6))
        .collect();
        let faces = vec![
            [0, 2, 1],
            [0, 3, 2],
            [4, 5, 6],
            [4, 6, 7],
            [0, 1, 5],
            [0, 5, 4],
            [3, 7, 6],
            [3, 6, 2],
            [0, 4, 7],
            [0, 7, 3],
            [1, 2, 6],
            [1, 6, 5],
        ];
        let mesh = Mesh::with_derived_edges(vertices, faces, EdgeDerivation::default()).unwrap();
        assert!(mesh.faces().iter().all(|f| !f.is_degenerate()));
        assert_eq!(mesh.edges().len(), 12);
    }

    #[test]
    fn interior_edge_on_one_face_is_rejected() {
        let edges = vec![Edge::new([0, 1], Adjacency::Interior(0, 0), Continuity::Smooth)];
        let err = Mesh::new(quad_vertices(), vec![[0, 1, 2]], edges).unwrap_err();
        assert_eq!(err, GeometryError::InvalidAdjacency { edge: 0, count: 1 });
    }

    #[test]
    fn non_manifold_side_is_fatal() {
        let vertices = vec![
            Vertex::new(Point3::new(0.0, 0.0, 0.0)),
            Vertex::new(Point3::new(1.0, 0.0, 0.0)),
            Vertex::new(Point3::new(0.0, 1.0, 0.0)),
            Vertex::new(Point3::new(0.0, -1.0, 0.0)),
            Vertex::new(Point3::new(0.0, 0.0, 1.0)),
        ];
        let err = Mesh::with_derived_edges(
            vertices,
            vec![[0, 1, 2], [1, 0, 3], [0, 1, 4]],
            EdgeDerivation::default(),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            GeometryError::InvalidAdjacency { count: 3, .. }
        ));
    }
}
