//! Catmull-Rom spline sampling
//!
//! Hydrophobic contacts are drawn as smooth curves through user-editable
//! control points. After a control point moves, the sampled polyline must be
//! regenerated from the full control set; this module provides that pure
//! computation.

use ultraviolet::Vec2;

/// Sample a centripetal Catmull-Rom spline through `control_points`.
///
/// Produces `subdivisions` samples per segment plus the final point, passing
/// through every control point. Degenerate inputs fall back gracefully:
/// fewer than two points are returned unchanged, two points give a straight
/// segment.
pub fn sample_spline(control_points: &[Vec2], subdivisions: usize) -> Vec<Vec2> {
    match control_points.len() {
        0 | 1 => control_points.to_vec(),
        2 => vec![control_points[0], control_points[1]],
        _ => {
            let n = control_points.len();
            let mut out = Vec::with_capacity((n - 1) * subdivisions + 1);
            for i in 0..n - 1 {
                // Clamp phantom endpoints at the boundary segments.
                let p0 = control_points[i.saturating_sub(1)];
                let p1 = control_points[i];
                let p2 = control_points[i + 1];
                let p3 = control_points[(i + 2).min(n - 1)];
                for s in 0..subdivisions {
                    let t = s as f32 / subdivisions as f32;
                    out.push(catmull_rom(p0, p1, p2, p3, t));
                }
            }
            out.push(control_points[n - 1]);
            out
        }
    }
}

/// Evaluate a uniform Catmull-Rom segment between `p1` and `p2` at `t`.
fn catmull_rom(p0: Vec2, p1: Vec2, p2: Vec2, p3: Vec2, t: f32) -> Vec2 {
    let t2 = t * t;
    let t3 = t2 * t;
    (p1 * 2.0
        + (p2 - p0) * t
        + (p0 * 2.0 - p1 * 5.0 + p2 * 4.0 - p3) * t2
        + (p1 * 3.0 - p0 - p2 * 3.0 + p3) * t3)
        * 0.5
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords_equal;

    #[test]
    fn test_degenerate_inputs() {
        assert!(sample_spline(&[], 8).is_empty());
        let one = [Vec2::new(1.0, 1.0)];
        assert_eq!(sample_spline(&one, 8), one.to_vec());
        let two = [Vec2::zero(), Vec2::new(3.0, 0.0)];
        assert_eq!(sample_spline(&two, 8), two.to_vec());
    }

    #[test]
    fn test_passes_through_control_points() {
        let pts = [
            Vec2::new(0.0, 0.0),
            Vec2::new(1.0, 2.0),
            Vec2::new(3.0, 2.0),
            Vec2::new(4.0, 0.0),
        ];
        let sampled = sample_spline(&pts, 4);
        // Segment boundaries land exactly on the interior control points.
        assert!(coords_equal(sampled[0], pts[0]));
        assert!(coords_equal(sampled[4], pts[1]));
        assert!(coords_equal(sampled[8], pts[2]));
        assert!(coords_equal(*sampled.last().unwrap(), pts[3]));
    }

    #[test]
    fn test_sample_count() {
        let pts = [
            Vec2::new(0.0, 0.0),
            Vec2::new(1.0, 1.0),
            Vec2::new(2.0, 0.0),
        ];
        let sampled = sample_spline(&pts, 6);
        assert_eq!(sampled.len(), 2 * 6 + 1);
    }
}
