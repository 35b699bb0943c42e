pub mod intersect_2d;
pub mod polygon_2d;

/// 2D point type.
pub type Point2 = nalgebra::Point2<f64>;

/// 2D vector type.
pub type Vector2 = nalgebra::Vector2<f64>;

/// Global geometric tolerance for floating-point comparisons.
pub const TOLERANCE: f64 = 1e-9;

/// `a == b` under tolerance.
#[must_use]
pub fn eq(a: f64, b: f64) -> bool {
    (a - b).abs() < TOLERANCE
}

/// `a == 0` under tolerance.
#[must_use]
pub fn eq_0(a: f64) -> bool {
    a.abs() < TOLERANCE
}

/// `a < b` under tolerance.
#[must_use]
pub fn lt(a: f64, b: f64) -> bool {
    a < b - TOLERANCE
}

/// `a > b` under tolerance.
#[must_use]
pub fn gt(a: f64, b: f64) -> bool {
    a > b + TOLERANCE
}

/// Point equality under tolerance, componentwise.
#[must_use]
pub fn points_equal(a: &Point2, b: &Point2) -> bool {
    eq(a.x, b.x) && eq(a.y, b.y)
}
