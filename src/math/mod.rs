pub mod bounds_2d;
pub mod triangle_2d;

pub use bounds_2d::Bounds2;

/// 2D point type (view plane).
pub type Point2 = nalgebra::Point2<f64>;

/// 3D point type.
pub type Point3 = nalgebra::Point3<f64>;

/// 2D vector type.
pub type Vector2 = nalgebra::Vector2<f64>;

/// 3D vector type.
pub type Vector3 = nalgebra::Vector3<f64>;

/// 4x4 transformation matrix.
pub type Matrix4 = nalgebra::Matrix4<f64>;

/// Global geometric tolerance for floating-point comparisons.
pub const TOLERANCE: f64 = 1e-10;

/// Returns the unit normal of the triangle `(a, b, c)` following the
/// right-hand rule, or `None` when the triangle is (near) collinear.
///
/// The cross product is compared against the product of the two spanning
/// side lengths, so only the shape of the triangle matters, not its size.
#[must_use]
pub fn triangle_normal(a: &Point3, b: &Point3, c: &Point3) -> Option<Vector3> {
    let (ab, ac) = (b - a, c - a);
    let n = ab.cross(&ac);
    let len = n.norm();
    if len <= TOLERANCE * ab.norm() * ac.norm() || !len.is_finite() {
        None
    } else {
        Some(n / len)
    }
}
