use crate::math::{triangle_2d, triangle_normal, Bounds2, Point2, Point3, Vector3, TOLERANCE};
use crate::mesh::Adjacency;

use super::project::Projector;

/// Barycentric slack for the inclusive point-in-triangle test.
const COVER_EPSILON: f64 = 1e-9;

/// Depth slack when comparing an occluder against an edge point, relative to
/// the edge's own extent and distance from the camera.
const DEPTH_EPSILON: f64 = 1e-7;

/// Orientation of a face relative to the viewer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Facing {
    Front,
    Back,
}

impl Facing {
    /// Back-facing when `normal . view >= 0`, where `view` points from the
    /// camera towards the face. Edge-on faces are back-facing.
    #[must_use]
    pub fn of(normal: &Vector3, view: &Vector3) -> Self {
        if normal.dot(view) >= 0.0 {
            Self::Back
        } else {
            Self::Front
        }
    }
}

/// Stable sort from farthest to nearest; `depth` is camera-space z.
///
/// Elements with equal depth keep their relative order.
pub fn sort_back_to_front<T, F>(items: &mut [T], depth: F)
where
    F: Fn(&T) -> f64,
{
    items.sort_by(|a, b| depth(a).total_cmp(&depth(b)));
}

/// Parameters `k / (n + 1)` for `n` interior samples along an edge.
#[allow(clippy::cast_precision_loss)]
pub fn sample_parameters(samples: usize) -> impl Iterator<Item = f64> {
    let step = 1.0 / (samples + 1) as f64;
    (1..=samples).map(move |k| k as f64 * step)
}

/// A projected face that can hide edges behind it.
#[derive(Debug, Clone)]
pub struct Occluder {
    part: usize,
    face: usize,
    screen: [Point2; 3],
    bounds: Bounds2,
    origin: Point3,
    normal: Vector3,
}

impl Occluder {
    /// Builds an occluder from camera-space corners and their projections.
    ///
    /// Returns `None` if the corners do not span a plane.
    #[must_use]
    pub fn new(part: usize, face: usize, camera: [Point3; 3], screen: [Point2; 3]) -> Option<Self> {
        let [a, b, c] = camera;
        let normal = triangle_normal(&a, &b, &c)?;
        let bounds = Bounds2::from_points(&screen)?;
        Some(Self {
            part,
            face,
            screen,
            bounds,
            origin: a,
            normal,
        })
    }

    /// Camera-space depth of this face's plane along a view ray, if the
    /// ray is not parallel to it.
    fn depth_along(&self, origin: &Point3, direction: &Vector3) -> Option<f64> {
        let denom = self.normal.dot(direction);
        if denom.abs() < TOLERANCE {
            return None;
        }
        let t = self.normal.dot(&(self.origin - origin)) / denom;
        Some(origin.z + t * direction.z)
    }

    fn covers(&self, screen: &Point2) -> bool {
        let [a, b, c] = &self.screen;
        screen.x >= self.bounds.min.x - COVER_EPSILON
            && screen.x <= self.bounds.max.x + COVER_EPSILON
            && screen.y >= self.bounds.min.y - COVER_EPSILON
            && screen.y <= self.bounds.max.y + COVER_EPSILON
            && triangle_2d::contains(screen, a, b, c, COVER_EPSILON)
    }
}

/// Point-sampled edge occlusion against a fixed set of faces.
///
/// An edge is hidden when every interior sample is covered by a face that
/// is nearer to the camera and not adjacent to the edge. Both front and
/// back faces occlude.
#[derive(Debug, Clone, Copy)]
pub struct OcclusionTest<'a> {
    occluders: &'a [Occluder],
    projector: &'a Projector,
    samples: usize,
}

impl<'a> OcclusionTest<'a> {
    #[must_use]
    pub fn new(occluders: &'a [Occluder], projector: &'a Projector, samples: usize) -> Self {
        Self {
            occluders,
            projector,
            samples,
        }
    }

    /// Tests the edge `a -> b` (camera space) of part `part`.
    #[must_use]
    pub fn is_hidden(&self, part: usize, adjacency: &Adjacency, a: &Point3, b: &Point3) -> bool {
        let extent = (b - a).norm().max(a.z.abs()).max(b.z.abs());
        let slack = DEPTH_EPSILON * extent;
        sample_parameters(self.samples).all(|t| {
            let p = a + (b - a) * t;
            self.is_point_hidden(part, adjacency, &p, slack)
        })
    }

    fn is_point_hidden(&self, part: usize, adjacency: &Adjacency, p: &Point3, slack: f64) -> bool {
        let Some(projected) = self.projector.project_camera(p) else {
            return false;
        };
        let (origin, direction) = self.projector.view_ray(&projected.screen);
        let limit = p.z + slack;
        self.occluders.iter().any(|occ| {
            !(occ.part == part && adjacency.contains(occ.face))
                && occ.covers(&projected.screen)
                && occ
                    .depth_along(&origin, &direction)
                    .is_some_and(|depth| depth > limit)
        })
    }
}
