pub mod classify;
pub mod project;
pub mod shade;
pub mod visibility;

pub use classify::{EdgeClass, EdgeClassifier, EdgeFacing};
pub use project::{Eye, ProjectedPoint, Projector};
pub use shade::Shader;
pub use visibility::{Facing, Occluder, OcclusionTest};

use std::f64::consts::PI;

use rayon::prelude::*;
use tracing::{debug, info_span, warn};

use crate::error::{ConfigurationError, GeometryError, Result};
use crate::math::{Bounds2, Point2, Point3, Vector2, Vector3, TOLERANCE};
use crate::mesh::Mesh;
use crate::scene::{Part, PartId, Rgb, Scene};

/// Parameters controlling a render.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderParams {
    /// Dihedral angle (radians) above which a visible interior edge is a
    /// sharp wire. Edges flagged [`Continuity::Sharp`](crate::mesh::Continuity)
    /// by the mesh are sharp wires regardless.
    pub sharp_angle: f64,
    /// Interior sample points per edge for the occlusion test.
    pub occlusion_samples: usize,
    /// Run per-face and per-edge work on the rayon thread pool.
    pub parallel: bool,
}

impl Default for RenderParams {
    fn default() -> Self {
        Self {
            sharp_angle: 25_f64.to_radians(),
            occlusion_samples: 3,
            parallel: true,
        }
    }
}

impl RenderParams {
    /// # Errors
    ///
    /// Returns `ConfigurationError::InvalidRenderParams` if the sharp angle
    /// lies outside `[0, pi]` or no occlusion samples are requested.
    pub fn validate(&self) -> std::result::Result<(), ConfigurationError> {
        if !(0.0..=PI).contains(&self.sharp_angle) {
            return Err(ConfigurationError::InvalidRenderParams(format!(
                "sharp angle {} is outside [0, pi]",
                self.sharp_angle
            )));
        }
        if self.occlusion_samples == 0 {
            return Err(ConfigurationError::InvalidRenderParams(
                "at least one occlusion sample is required".to_owned(),
            ));
        }
        Ok(())
    }
}

/// A face of a scene part.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FaceRef {
    pub part: PartId,
    pub face: usize,
}

/// An edge of a scene part.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EdgeRef {
    pub part: PartId,
    pub edge: usize,
}

/// A front-facing face ready for drawing.
#[derive(Debug, Clone, PartialEq)]
pub struct ShadedFace {
    pub face: FaceRef,
    /// Corners on the view plane, in winding order.
    pub screen: [Point2; 3],
    /// Depth of the farthest corner.
    pub depth: f64,
    pub color: Rgb,
    /// Fill opacity taken from the part's material.
    pub opacity: f64,
}

/// A projected edge with its drawing category.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassifiedEdge {
    pub edge: EdgeRef,
    /// Mesh vertex indices of the endpoints.
    pub vertices: [usize; 2],
    /// Endpoints on the view plane.
    pub screen: [Point2; 2],
    /// Depth of the nearest endpoint.
    pub depth: f64,
    pub class: EdgeClass,
}

/// An element left out of the render, with the reason.
#[derive(Debug, Clone, PartialEq)]
pub enum SkippedElement {
    Face(FaceRef, GeometryError),
    Edge(EdgeRef, GeometryError),
}

impl SkippedElement {
    #[must_use]
    pub fn reason(&self) -> &GeometryError {
        match self {
            Self::Face(_, e) | Self::Edge(_, e) => e,
        }
    }
}

/// A world axis as seen on the view plane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisGlyph {
    pub label: &'static str,
    /// Projection of the unit axis vector.
    pub direction: Vector2,
}

/// Output of one render call.
///
/// Faces and edges are ordered back to front.
#[derive(Debug, Clone, Default)]
pub struct RenderResult {
    faces: Vec<ShadedFace>,
    edges: Vec<ClassifiedEdge>,
    culled: Vec<FaceRef>,
    skipped: Vec<SkippedElement>,
    axes: Vec<AxisGlyph>,
}

impl RenderResult {
    /// Shaded front faces, farthest first.
    #[must_use]
    pub fn faces(&self) -> &[ShadedFace] {
        &self.faces
    }

    /// Every classified edge, farthest first.
    #[must_use]
    pub fn edges(&self) -> &[ClassifiedEdge] {
        &self.edges
    }

    /// Edges of one class, farthest first.
    pub fn edges_of(&self, class: EdgeClass) -> impl Iterator<Item = &ClassifiedEdge> {
        self.edges.iter().filter(move |e| e.class == class)
    }

    /// Back-facing faces, in scene order.
    #[must_use]
    pub fn culled(&self) -> &[FaceRef] {
        &self.culled
    }

    /// Faces and edges left out, with the reason.
    #[must_use]
    pub fn skipped(&self) -> &[SkippedElement] {
        &self.skipped
    }

    /// World axes as seen on the view plane, for the coordinate glyph.
    #[must_use]
    pub fn axes(&self) -> &[AxisGlyph] {
        &self.axes
    }

    /// View-plane extent of all drawn faces and edges.
    #[must_use]
    pub fn bounds(&self) -> Option<Bounds2> {
        let face_points = self.faces.iter().flat_map(|f| f.screen.iter());
        let edge_points = self.edges.iter().flat_map(|e| e.screen.iter());
        Bounds2::from_points(face_points.chain(edge_points))
    }
}

/// Per-face outcome of projection, culling and shading.
#[derive(Debug, Clone)]
enum FaceState {
    Skipped(GeometryError),
    Culled(Option<Occluder>),
    Shaded(ShadedFace, Option<Occluder>),
}

impl FaceState {
    fn facing(&self) -> Option<Facing> {
        match self {
            Self::Skipped(_) => None,
            Self::Culled(_) => Some(Facing::Back),
            Self::Shaded(..) => Some(Facing::Front),
        }
    }

    fn occluder(&self) -> Option<&Occluder> {
        match self {
            Self::Skipped(_) => None,
            Self::Culled(o) | Self::Shaded(_, o) => o.as_ref(),
        }
    }
}

/// One part after projection and shading.
struct PartFrame<'s> {
    index: usize,
    id: PartId,
    part: &'s Part,
    camera: Vec<Point3>,
    projected: Vec<Option<ProjectedPoint>>,
    faces: Vec<FaceState>,
}

/// Renders a scene into ordered, shaded and classified view-plane
/// primitives.
pub struct Render {
    params: RenderParams,
}

impl Render {
    /// Creates a new `Render` operation.
    #[must_use]
    pub fn new(params: RenderParams) -> Self {
        Self { params }
    }

    /// Executes the render.
    ///
    /// Degenerate faces and elements behind a perspective eye are skipped
    /// and listed in [`RenderResult::skipped`].
    ///
    /// # Errors
    ///
    /// Returns a `ConfigurationError` for an invalid camera, material or
    /// parameter set. No partial result is produced.
    pub fn execute(&self, scene: &Scene) -> Result<RenderResult> {
        let _span = info_span!(
            "render",
            parts = scene.part_count(),
            lights = scene.lights().len()
        )
        .entered();

        self.params.validate()?;
        scene.validate()?;
        let projector = Projector::new(scene.camera())?;
        let shader = Shader::new(scene.lights(), projector.eye());

        let frames: Vec<PartFrame<'_>> = scene
            .parts()
            .enumerate()
            .map(|(index, (id, part))| self.frame(index, id, part, &projector, &shader))
            .collect();
        debug!(
            vertices = frames.iter().map(|f| f.camera.len()).sum::<usize>(),
            faces = frames.iter().map(|f| f.faces.len()).sum::<usize>(),
            "projected and shaded"
        );

        let mut result = RenderResult::default();
        let mut occluders = Vec::new();
        for frame in &frames {
            for (face, state) in frame.faces.iter().enumerate() {
                let face_ref = FaceRef {
                    part: frame.id,
                    face,
                };
                if let Some(occluder) = state.occluder() {
                    occluders.push(occluder.clone());
                }
                match state {
                    FaceState::Skipped(err) => {
                        warn!(part = %frame.part.name, face, error = %err, "skipping face");
                        result.skipped.push(SkippedElement::Face(face_ref, err.clone()));
                    }
                    FaceState::Culled(_) => result.culled.push(face_ref),
                    FaceState::Shaded(shaded, _) => result.faces.push(shaded.clone()),
                }
            }
        }
        debug!(
            shaded = result.faces.len(),
            culled = result.culled.len(),
            occluders = occluders.len(),
            "faces resolved"
        );

        let test = OcclusionTest::new(&occluders, &projector, self.params.occlusion_samples);
        let classifier = EdgeClassifier::new(self.params.sharp_angle);
        for frame in &frames {
            let edges = self.map_indexed(frame.part.mesh.edges().len(), |edge| {
                classify_edge(frame, edge, &test, &classifier)
            });
            for (edge, outcome) in edges.into_iter().enumerate() {
                match outcome {
                    Ok(classified) => result.edges.push(classified),
                    Err(err) => {
                        warn!(part = %frame.part.name, edge, error = %err, "skipping edge");
                        let edge_ref = EdgeRef {
                            part: frame.id,
                            edge,
                        };
                        result.skipped.push(SkippedElement::Edge(edge_ref, err));
                    }
                }
            }
        }

        visibility::sort_back_to_front(&mut result.faces, |f| f.depth);
        visibility::sort_back_to_front(&mut result.edges, |e| e.depth);
        result.axes = axis_glyphs(&projector);

        debug!(
            outline = result.edges_of(EdgeClass::VisibleOutline).count(),
            sharp = result.edges_of(EdgeClass::VisibleSharpWire).count(),
            smooth = result.edges_of(EdgeClass::VisibleSmoothWire).count(),
            hidden = result.edges_of(EdgeClass::Hidden).count(),
            skipped = result.skipped.len(),
            "edges classified"
        );
        Ok(result)
    }

    fn frame<'s>(
        &self,
        index: usize,
        id: PartId,
        part: &'s Part,
        projector: &Projector,
        shader: &Shader<'_>,
    ) -> PartFrame<'s> {
        let mesh = &part.mesh;
        let camera = self.map_indexed(mesh.vertices().len(), |v| {
            projector.to_camera(&mesh.vertices()[v].position)
        });
        let projected = self.map_indexed(camera.len(), |v| projector.project_camera(&camera[v]));
        let faces = self.map_indexed(mesh.faces().len(), |face| {
            let corners = mesh.faces()[face].vertices();
            let screen = match corner_screens(&projected, corners) {
                Ok(screen) => screen,
                Err(err) => return FaceState::Skipped(err),
            };
            let Some(normal) = mesh.faces()[face].normal() else {
                return FaceState::Skipped(GeometryError::DegenerateFace { face });
            };
            let occluder = Occluder::new(index, face, corners.map(|v| camera[v]), screen);
            let view = projector.view_vector_to(&mesh.face_centroid(face));
            if Facing::of(normal, &view) == Facing::Back {
                return FaceState::Culled(occluder);
            }
            match shader.shade_face(mesh, face, &part.material) {
                Ok(color) => FaceState::Shaded(
                    ShadedFace {
                        face: FaceRef { part: id, face },
                        screen,
                        depth: corners
                            .iter()
                            .map(|&v| camera[v].z)
                            .fold(f64::INFINITY, f64::min),
                        color,
                        opacity: part.material.opacity,
                    },
                    occluder,
                ),
                Err(err) => FaceState::Skipped(err),
            }
        });
        PartFrame {
            index,
            id,
            part,
            camera,
            projected,
            faces,
        }
    }

    /// Maps `0..len` in index order, on the thread pool when enabled.
    fn map_indexed<R, F>(&self, len: usize, f: F) -> Vec<R>
    where
        R: Send,
        F: Fn(usize) -> R + Sync + Send,
    {
        if self.params.parallel {
            (0..len).into_par_iter().map(f).collect()
        } else {
            (0..len).map(f).collect()
        }
    }
}

fn corner_screens<const N: usize>(
    projected: &[Option<ProjectedPoint>],
    corners: [usize; N],
) -> std::result::Result<[Point2; N], GeometryError> {
    let mut screen = [Point2::origin(); N];
    for (slot, vertex) in screen.iter_mut().zip(corners) {
        *slot = projected[vertex]
            .ok_or(GeometryError::BehindCamera { vertex })?
            .screen;
    }
    Ok(screen)
}

fn classify_edge(
    frame: &PartFrame<'_>,
    index: usize,
    test: &OcclusionTest<'_>,
    classifier: &EdgeClassifier,
) -> std::result::Result<ClassifiedEdge, GeometryError> {
    let mesh: &Mesh = &frame.part.mesh;
    let edge = &mesh.edges()[index];
    let [a, b] = edge.vertices;
    let screen = corner_screens(&frame.projected, edge.vertices)?;
    let (pa, pb) = (&frame.camera[a], &frame.camera[b]);

    let hidden = test.is_hidden(frame.index, &edge.adjacency, pa, pb);
    let facing = EdgeFacing::from_adjacency(&edge.adjacency, |f| frame.faces[f].facing());
    let class = classifier.classify(facing, mesh.edge_dihedral(index), edge.continuity, hidden);

    Ok(ClassifiedEdge {
        edge: EdgeRef {
            part: frame.id,
            edge: index,
        },
        vertices: edge.vertices,
        screen,
        depth: pa.z.max(pb.z),
        class,
    })
}

fn axis_glyphs(projector: &Projector) -> Vec<AxisGlyph> {
    [("x", Vector3::x()), ("y", Vector3::y()), ("z", Vector3::z())]
        .into_iter()
        .filter_map(|(label, axis)| {
            let direction = projector.project_direction(&axis);
            (direction.norm() > TOLERANCE).then_some(AxisGlyph { label, direction })
        })
        .collect()
}
