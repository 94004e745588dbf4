use npcpath_core::{Point, Point3};

/// Chebyshev (L∞) distance between two points, saturating at `i32::MAX`.
#[inline]
pub fn chebyshev(a: Point, b: Point) -> i32 {
    let d = a.x.abs_diff(b.x).max(a.y.abs_diff(b.y));
    i32::try_from(d).unwrap_or(i32::MAX)
}

/// Whether `b` lies within `range` cells of `a` on both horizontal axes.
///
/// Elevation is ignored.
#[inline]
pub fn in_range(a: Point3, b: Point3, range: i32) -> bool {
    chebyshev(a.xy(), b.xy()) <= range
}
