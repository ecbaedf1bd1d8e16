use xs_core::Point;

/// Manhattan (L1) distance between two points.
#[inline]
pub fn manhattan(a: Point, b: Point) -> i32 {
    (a.x - b.x).abs() + (a.y - b.y).abs()
}

/// Chebyshev (L∞) distance between two points.
#[inline]
pub fn chebyshev(a: Point, b: Point) -> i32 {
    (a.x - b.x).abs().max((a.y - b.y).abs())
}

/// Scaled, truncated Manhattan estimate:
/// `floor(|dx| * 1.5) + floor(|dy| * 1.5)`.
///
/// Each axis is scaled and truncated toward zero separately, so a single
/// orthogonal step costs 1 and a single diagonal step costs 2. Computed in
/// integers, which is exact for every `i32` input the grid can produce.
#[inline]
pub fn heuristic(a: Point, b: Point) -> i32 {
    scaled((a.x - b.x).abs()) + scaled((a.y - b.y).abs())
}

#[inline]
fn scaled(d: i32) -> i32 {
    d * 3 / 2
}
