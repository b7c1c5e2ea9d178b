//! Vector helpers on `ultraviolet::Vec2`
//!
//! Coordinate comparison in the drawer is always tolerance-based: atom moves
//! arrive from interactive dragging and carry floating-point noise, so exact
//! equality would produce spurious no-op changes.

use ultraviolet::Vec2;

/// Tolerance for coordinate equality.
///
/// Two coordinates closer than this (per axis) are considered the same
/// on-screen position.
pub const COORD_EPS: f32 = 1e-4;

/// Check whether two points are equal within [`COORD_EPS`] on both axes.
#[inline]
pub fn coords_equal(a: Vec2, b: Vec2) -> bool {
    (a.x - b.x).abs() < COORD_EPS && (a.y - b.y).abs() < COORD_EPS
}

/// Unit perpendicular of the direction from `a` to `b`.
///
/// Returns `None` when the two points coincide (within [`COORD_EPS`]), since
/// the direction is undefined there.
pub fn perpendicular(a: Vec2, b: Vec2) -> Option<Vec2> {
    let d = b - a;
    let len = d.mag();
    if len < COORD_EPS {
        return None;
    }
    Some(Vec2::new(-d.y / len, d.x / len))
}

/// Centroid of a point set. Returns the origin for an empty set.
pub fn centroid(points: &[Vec2]) -> Vec2 {
    if points.is_empty() {
        return Vec2::zero();
    }
    let sum = points.iter().fold(Vec2::zero(), |acc, p| acc + *p);
    sum / points.len() as f32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coords_equal_tolerance() {
        let a = Vec2::new(1.0, 2.0);
        let b = Vec2::new(1.0 + COORD_EPS * 0.5, 2.0);
        let c = Vec2::new(1.0 + COORD_EPS * 10.0, 2.0);
        assert!(coords_equal(a, b));
        assert!(!coords_equal(a, c));
    }

    #[test]
    fn test_perpendicular() {
        let p = perpendicular(Vec2::new(0.0, 0.0), Vec2::new(2.0, 0.0)).unwrap();
        assert!(coords_equal(p, Vec2::new(0.0, 1.0)));
        assert!(perpendicular(Vec2::zero(), Vec2::zero()).is_none());
    }

    #[test]
    fn test_centroid() {
        let pts = [
            Vec2::new(0.0, 0.0),
            Vec2::new(2.0, 0.0),
            Vec2::new(2.0, 2.0),
            Vec2::new(0.0, 2.0),
        ];
        assert!(coords_equal(centroid(&pts), Vec2::new(1.0, 1.0)));
    }
}
