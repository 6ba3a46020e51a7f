use super::{Point2, TOLERANCE};

/// Signed area of the triangle `(a, b, c)` in the view plane.
///
/// Positive for counter-clockwise, negative for clockwise.
#[must_use]
pub fn signed_area(a: &Point2, b: &Point2, c: &Point2) -> f64 {
    0.5 * ((b.x - a.x) * (c.y - a.y) - (c.x - a.x) * (b.y - a.y))
}

/// Barycentric coordinates of `p` with respect to the triangle `(a, b, c)`.
///
/// Returns `None` when the triangle is degenerate in the view plane (seen
/// edge-on). Degeneracy is judged against the squared longest side, so the
/// result does not depend on the view-plane scale.
#[must_use]
pub fn barycentric(p: &Point2, a: &Point2, b: &Point2, c: &Point2) -> Option<[f64; 3]> {
    let area = signed_area(a, b, c);
    let longest = (b - a)
        .norm_squared()
        .max((c - b).norm_squared())
        .max((a - c).norm_squared());
    if area.abs() <= TOLERANCE * longest {
        return None;
    }
    let w0 = signed_area(p, b, c) / area;
    let w1 = signed_area(a, p, c) / area;
    Some([w0, w1, 1.0 - w0 - w1])
}

/// Inclusive point-in-triangle test.
///
/// Points on an edge or vertex count as covered, within `eps` in barycentric
/// units. Edge-on triangles cover nothing.
#[must_use]
pub fn contains(p: &Point2, a: &Point2, b: &Point2, c: &Point2, eps: f64) -> bool {
    barycentric(p, a, b, c).is_some_and(|w| w.iter().all(|&wi| wi >= -eps))
}
