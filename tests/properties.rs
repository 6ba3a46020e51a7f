//! Invariants of the render and composition pipeline.

#![allow(clippy::unwrap_used)]

mod common;

use std::collections::HashMap;

use cadvector::illustrate::{CoordSystemStyle, EdgeLayering, Image, ImageConfig, LineStyle};
use cadvector::math::{Point3, Vector3};
use cadvector::mesh::{Adjacency, EdgeDerivation, Mesh};
use cadvector::render::{EdgeClass, EdgeRef, Render, RenderParams, RenderResult};
use cadvector::scene::{Camera, LightSource, Material, Part, Rgb, Scene};

fn render(scene: &Scene) -> RenderResult {
    common::init_tracing();
    Render::new(RenderParams::default()).execute(scene).unwrap()
}

fn lit_scene(camera: Camera, mesh: Mesh) -> Scene {
    let mut scene = Scene::new(camera);
    scene.add_part(Part::new("part", mesh, Material::default()));
    scene.add_light(LightSource::new(Point3::new(4.0, -3.0, 6.0)));
    scene
}

/// Edges whose adjacent faces face opposite ways, by direct inspection.
fn brute_force_silhouette(mesh: &Mesh, view: &Vector3) -> usize {
    let back = |f: usize| mesh.faces()[f].normal().unwrap().dot(view) >= 0.0;
    mesh.edges()
        .iter()
        .filter(|e| match e.adjacency {
            Adjacency::Boundary(_) => true,
            Adjacency::Interior(f0, f1) => back(f0) != back(f1),
        })
        .count()
}

#[test]
fn convex_outline_matches_brute_force() {
    let positions = [
        Point3::new(3.0, 1.7, 0.9),
        Point3::new(-2.2, 0.4, 3.1),
        Point3::new(0.3, -4.0, 1.2),
        Point3::new(1.1, 2.3, -2.9),
    ];
    for mesh in [common::octahedron(), common::unit_cube()] {
        for position in positions {
            let target = Point3::new(0.1, 0.2, 0.05);
            let view = (target - position).normalize();
            let expected = brute_force_silhouette(&mesh, &view);
            let result = render(&lit_scene(Camera::new(position, target), mesh.clone()));
            assert_eq!(
                result.edges_of(EdgeClass::VisibleOutline).count(),
                expected,
                "camera at {position}"
            );
        }
    }
}

#[test]
fn smooth_sphere_has_no_sharp_wires() {
    let sphere = common::uv_sphere(16, 32);
    for position in [Point3::new(3.0, 2.0, 1.0), Point3::new(-1.0, 0.5, -4.0)] {
        let result = render(&lit_scene(Camera::new(position, Point3::origin()), sphere.clone()));
        assert_eq!(result.edges_of(EdgeClass::VisibleSharpWire).count(), 0);
        assert!(result.edges_of(EdgeClass::VisibleOutline).count() > 0);
        assert!(result.edges_of(EdgeClass::VisibleSmoothWire).count() > 0);
    }
}

/// A square facing the corner camera, centred on the view axis at `along`
/// and shifted sideways by `shift`.
fn screen_square(along: f64, shift: f64, half: f64) -> Mesh {
    let u = Vector3::new(1.0, -1.0, 0.0).normalize();
    let v = Vector3::new(1.0, 1.0, -2.0).normalize();
    let c = Point3::new(0.5, 0.5, 0.5) + Vector3::repeat(along) + u * shift;
    Mesh::with_derived_edges(
        vec![
            (c - u * half - v * half).into(),
            (c + u * half - v * half).into(),
            (c + u * half + v * half).into(),
            (c - u * half + v * half).into(),
        ],
        vec![[0, 1, 2], [0, 2, 3]],
        EdgeDerivation::default(),
    )
    .unwrap()
}

fn classes(result: &RenderResult) -> HashMap<EdgeRef, EdgeClass> {
    result.edges().iter().map(|e| (e.edge, e.class)).collect()
}

#[test]
fn adding_an_occluder_never_reveals_edges() {
    let camera = Camera::new(Point3::new(2.0, 2.0, 2.0), Point3::new(0.5, 0.5, 0.5));
    let mut scene = Scene::new(camera);
    scene.add_part(Part::new("cube", common::unit_cube(), Material::default()));
    let before = classes(&render(&scene));

    for (shift, half) in [(0.4, 0.3), (0.0, 2.0), (-0.2, 0.1)] {
        let mut occluded = scene.clone();
        occluded.add_part(Part::new(
            "plate",
            screen_square(1.1, shift, half),
            Material::default(),
        ));
        let after = classes(&render(&occluded));
        for (edge, class) in &before {
            if *class == EdgeClass::Hidden {
                assert_eq!(after[edge], EdgeClass::Hidden, "edge {edge:?} was revealed");
            }
        }
        if half > 1.0 {
            // A plate covering the whole cube hides every cube edge.
            assert!(before.keys().all(|edge| after[edge] == EdgeClass::Hidden));
        }
    }
}

#[test]
fn occluder_behind_the_model_changes_nothing() {
    let camera = Camera::new(Point3::new(2.0, 2.0, 2.0), Point3::new(0.5, 0.5, 0.5));
    let mut scene = Scene::new(camera);
    scene.add_part(Part::new("cube", common::unit_cube(), Material::default()));
    let before = classes(&render(&scene));
    scene.add_part(Part::new(
        "backdrop",
        screen_square(-3.0, 0.0, 3.0),
        Material::default(),
    ));
    let after = classes(&render(&scene));
    for (edge, class) in &before {
        assert_eq!(after[edge], *class);
    }
}

#[test]
fn svg_output_is_idempotent() {
    let mut scene = lit_scene(
        Camera::new(Point3::new(2.0, 3.0, 1.5), Point3::new(0.5, 0.5, 0.5)),
        common::unit_cube(),
    );
    scene.add_light(LightSource::new(Point3::new(-2.0, 5.0, 1.0)).with_color(Rgb::new(255, 200, 160)));
    let result = render(&scene);

    for layering in [EdgeLayering::Interleaved, EdgeLayering::OnTop] {
        let config = ImageConfig::default()
            .with_margins(10.0, 10.0)
            .with_layering(layering)
            .with_coord_system(CoordSystemStyle::new(25.0).unwrap())
            .with_line_style(
                EdgeClass::Hidden,
                LineStyle::new(0.5, Rgb::new(128, 128, 128))
                    .unwrap()
                    .with_dash(vec![4.0, 2.0])
                    .unwrap(),
            );
        let image = Image::new(result.clone(), config.clone()).unwrap();
        let first = image.to_svg();
        assert_eq!(first, image.to_svg());
        assert_eq!(first, Image::new(result.clone(), config).unwrap().to_svg());

        let path = std::env::temp_dir().join(format!("cadvector-idempotent-{layering:?}.svg"));
        image.write(&path).unwrap();
        let written = std::fs::read_to_string(&path).unwrap();
        image.write(&path).unwrap();
        assert_eq!(written, std::fs::read_to_string(&path).unwrap());
        assert_eq!(written, first);
        let _ = std::fs::remove_file(&path);
    }
}

#[test]
fn parallel_render_matches_sequential() {
    let scene = lit_scene(
        Camera::new(Point3::new(3.0, 2.0, 1.0), Point3::origin()),
        common::uv_sphere(12, 24),
    );
    let par = render(&scene);
    let seq = Render::new(RenderParams {
        parallel: false,
        ..RenderParams::default()
    })
    .execute(&scene)
    .unwrap();
    assert_eq!(par.faces(), seq.faces());
    assert_eq!(par.edges(), seq.edges());
}
