//! Shared meshes and setup for the integration tests.

#![allow(dead_code, clippy::unwrap_used)]

use std::f64::consts::PI;

use cadvector::math::{Point3, Vector3};
use cadvector::mesh::{EdgeDerivation, Mesh, Vertex};
use tracing_subscriber::EnvFilter;

/// Installs a test subscriber once; filtered with `RUST_LOG`.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub fn cube_vertices() -> Vec<Vertex> {
    [
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
    .map(|(x, y, z)| Point3::new(x, y, z).into())
    .collect()
}

/// Twelve outward-wound triangles of the unit cube.
pub fn cube_faces() -> Vec<[usize; 3]> {
    vec![
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
    ]
}

/// Unit cube with its 12 feature edges; triangulation diagonals are dropped.
pub fn unit_cube() -> Mesh {
    Mesh::with_derived_edges(cube_vertices(), cube_faces(), EdgeDerivation::default()).unwrap()
}

/// Regular octahedron with vertices on the unit axes.
pub fn octahedron() -> Mesh {
    let vertices = [
        Vector3::x(),
        -Vector3::x(),
        Vector3::y(),
        -Vector3::y(),
        Vector3::z(),
        -Vector3::z(),
    ]
    .into_iter()
    .map(|v| Point3::from(v).into())
    .collect();
    let faces = vec![
        [0, 2, 4],
        [2, 1, 4],
        [1, 3, 4],
        [3, 0, 4],
        [2, 0, 5],
        [1, 2, 5],
        [3, 1, 5],
        [0, 3, 5],
    ];
    Mesh::with_derived_edges(vertices, faces, EdgeDerivation::default()).unwrap()
}

/// Latitude/longitude sphere of unit radius with vertex normals.
pub fn uv_sphere(lat: usize, lon: usize) -> Mesh {
    #[allow(clippy::cast_precision_loss)]
    let angle = |i: usize, n: usize, span: f64| span * i as f64 / n as f64;
    let on_sphere = |p: Point3| Vertex::with_normal(p, p.coords);

    let mut vertices = vec![on_sphere(Point3::new(0.0, 0.0, 1.0))];
    for r in 1..lat {
        let theta = angle(r, lat, PI);
        for j in 0..lon {
            let phi = angle(j, lon, 2.0 * PI);
            vertices.push(on_sphere(Point3::new(
                theta.sin() * phi.cos(),
                theta.sin() * phi.sin(),
                theta.cos(),
            )));
        }
    }
    let south = vertices.len();
    vertices.push(on_sphere(Point3::new(0.0, 0.0, -1.0)));

    let idx = |r: usize, j: usize| 1 + (r - 1) * lon + j % lon;
    let mut faces = Vec::new();
    for j in 0..lon {
        faces.push([0, idx(1, j), idx(1, j + 1)]);
        for r in 1..lat - 1 {
            faces.push([idx(r, j), idx(r + 1, j), idx(r + 1, j + 1)]);
            faces.push([idx(r, j), idx(r + 1, j + 1), idx(r, j + 1)]);
        }
        faces.push([idx(lat - 1, j), south, idx(lat - 1, j + 1)]);
    }
    Mesh::with_derived_edges(vertices, faces, EdgeDerivation::default()).unwrap()
}
