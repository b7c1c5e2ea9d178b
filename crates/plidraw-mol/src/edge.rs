//! Edge (bond) data structure
//!
//! Edges reference their endpoint atoms by id. Besides the chemical type
//! they cache their draw geometry: endpoints trimmed back from the atom
//! labels, and for double/aromatic bonds an offset inner line.

use plidraw_geom::{perpendicular, Vec2};
use serde::{Deserialize, Serialize};

use crate::atom::ATOM_DRAW_RADIUS;
use crate::index::{AtomId, EdgeId};

/// Offset of the inner (second) line of a double or aromatic bond.
pub const INNER_LINE_OFFSET: f32 = 0.18;

/// Fraction trimmed off each end of an inner line.
pub const INNER_LINE_TRIM: f32 = 0.15;

/// Edge type, including the stereo wedge variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EdgeType {
    Single,
    Double,
    Aromatic,
    StereoFront,
    StereoBack,
    StereoFrontReverse,
    StereoBackReverse,
}

impl EdgeType {
    /// Whether this is any stereo wedge variant.
    #[inline]
    pub fn is_stereo(&self) -> bool {
        matches!(
            self,
            EdgeType::StereoFront
                | EdgeType::StereoBack
                | EdgeType::StereoFrontReverse
                | EdgeType::StereoBackReverse
        )
    }

    /// Whether this edge type draws a second, offset line.
    #[inline]
    pub fn has_inner_line(&self) -> bool {
        matches!(self, EdgeType::Double | EdgeType::Aromatic)
    }

    /// The stereo variant after mirroring.
    ///
    /// Wedge direction encodes relative depth, not absolute position, so a
    /// mirror operation must swap forward and reverse variants even when the
    /// endpoint coordinates are unchanged. Plain types are untouched.
    /// Self-inverse: `flipped(flipped(t)) == t`.
    pub fn flipped(&self) -> EdgeType {
        match self {
            EdgeType::StereoFront => EdgeType::StereoFrontReverse,
            EdgeType::StereoFrontReverse => EdgeType::StereoFront,
            EdgeType::StereoBack => EdgeType::StereoBackReverse,
            EdgeType::StereoBackReverse => EdgeType::StereoBack,
            other => *other,
        }
    }
}

/// The inner (second) line of a double or aromatic bond.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InnerLine {
    pub from: Vec2,
    pub to: Vec2,
}

/// Computed draw geometry of an edge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgeGeometry {
    pub draw_from: Vec2,
    pub draw_to: Vec2,
    pub inner: Option<InnerLine>,
}

/// An edge (bond) of one structure.
#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    /// Id, unique within the owning structure.
    pub id: EdgeId,

    /// Endpoint atom ids (weak references, not ownership).
    pub from: AtomId,
    pub to: AtomId,

    /// Chemical/draw type.
    pub kind: EdgeType,

    /// Disabled edges are logically removed; skipped by every consumer.
    pub enabled: bool,

    /// Draw endpoint near `from`, trimmed back from the atom label.
    pub draw_from: Vec2,

    /// Draw endpoint near `to`.
    pub draw_to: Vec2,

    /// Inner line for double/aromatic edges.
    pub inner: Option<InnerLine>,
}

impl Edge {
    pub fn new(id: EdgeId, from: AtomId, to: AtomId, kind: EdgeType) -> Self {
        Edge {
            id,
            from,
            to,
            kind,
            enabled: true,
            draw_from: Vec2::zero(),
            draw_to: Vec2::zero(),
            inner: None,
        }
    }

    /// Whether the edge touches the given atom.
    #[inline]
    pub fn contains(&self, atom: AtomId) -> bool {
        self.from == atom || self.to == atom
    }

    /// The endpoint opposite to `atom`, if `atom` is an endpoint.
    pub fn other(&self, atom: AtomId) -> Option<AtomId> {
        if self.from == atom {
            Some(self.to)
        } else if self.to == atom {
            Some(self.from)
        } else {
            None
        }
    }

    /// Install freshly computed draw geometry.
    pub fn set_geometry(&mut self, geometry: EdgeGeometry) {
        self.draw_from = geometry.draw_from;
        self.draw_to = geometry.draw_to;
        self.inner = geometry.inner;
    }

    /// The current draw geometry (for snapshotting before a change).
    pub fn geometry(&self) -> EdgeGeometry {
        EdgeGeometry {
            draw_from: self.draw_from,
            draw_to: self.draw_to,
            inner: self.inner,
        }
    }
}

/// Compute the draw geometry of an edge from its endpoint positions.
///
/// Endpoints are trimmed back by the atom label radius when the bond is long
/// enough. For double/aromatic edges an inner line is placed parallel at
/// [`INNER_LINE_OFFSET`]; `inner_side` biases which side it lands on - for
/// ring bonds this is the ring center, pulling the inner line into the ring.
pub fn compute_edge_geometry(
    from_pos: Vec2,
    to_pos: Vec2,
    kind: EdgeType,
    inner_side: Option<Vec2>,
) -> EdgeGeometry {
    let dir = to_pos - from_pos;
    let len = dir.mag();

    let (draw_from, draw_to) = if len > 2.0 * ATOM_DRAW_RADIUS {
        let unit = dir / len;
        (
            from_pos + unit * ATOM_DRAW_RADIUS,
            to_pos - unit * ATOM_DRAW_RADIUS,
        )
    } else {
        (from_pos, to_pos)
    };

    let inner = if kind.has_inner_line() {
        perpendicular(from_pos, to_pos).map(|mut normal| {
            if let Some(target) = inner_side {
                // Point the offset toward the ring center.
                let mid = (from_pos + to_pos) * 0.5;
                if (target - mid).dot(normal) < 0.0 {
                    normal = -normal;
                }
            }
            let seg = draw_to - draw_from;
            let a = draw_from + seg * INNER_LINE_TRIM + normal * INNER_LINE_OFFSET;
            let b = draw_to - seg * INNER_LINE_TRIM + normal * INNER_LINE_OFFSET;
            InnerLine { from: a, to: b }
        })
    } else {
        None
    };

    EdgeGeometry {
        draw_from,
        draw_to,
        inner,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use plidraw_geom::coords_equal;

    #[test]
    fn test_flip_is_self_inverse() {
        for t in [
            EdgeType::Single,
            EdgeType::Double,
            EdgeType::Aromatic,
            EdgeType::StereoFront,
            EdgeType::StereoBack,
            EdgeType::StereoFrontReverse,
            EdgeType::StereoBackReverse,
        ] {
            assert_eq!(t.flipped().flipped(), t);
        }
        assert_eq!(EdgeType::StereoFront.flipped(), EdgeType::StereoFrontReverse);
        assert_eq!(EdgeType::Single.flipped(), EdgeType::Single);
    }

    #[test]
    fn test_edge_other() {
        let e = Edge::new(EdgeId::new(0), AtomId::new(1), AtomId::new(2), EdgeType::Single);
        assert_eq!(e.other(AtomId::new(1)), Some(AtomId::new(2)));
        assert_eq!(e.other(AtomId::new(2)), Some(AtomId::new(1)));
        assert_eq!(e.other(AtomId::new(3)), None);
    }

    #[test]
    fn test_geometry_trims_endpoints() {
        let g = compute_edge_geometry(
            Vec2::zero(),
            Vec2::new(10.0, 0.0),
            EdgeType::Single,
            None,
        );
        assert!(coords_equal(g.draw_from, Vec2::new(ATOM_DRAW_RADIUS, 0.0)));
        assert!(coords_equal(g.draw_to, Vec2::new(10.0 - ATOM_DRAW_RADIUS, 0.0)));
        assert!(g.inner.is_none());
    }

    #[test]
    fn test_short_edge_not_trimmed() {
        let g = compute_edge_geometry(
            Vec2::zero(),
            Vec2::new(0.5, 0.0),
            EdgeType::Single,
            None,
        );
        assert!(coords_equal(g.draw_from, Vec2::zero()));
        assert!(coords_equal(g.draw_to, Vec2::new(0.5, 0.0)));
    }

    #[test]
    fn test_inner_line_faces_ring_center() {
        let center_above = Some(Vec2::new(5.0, 3.0));
        let g = compute_edge_geometry(
            Vec2::zero(),
            Vec2::new(10.0, 0.0),
            EdgeType::Aromatic,
            center_above,
        );
        let inner = g.inner.unwrap();
        assert!(inner.from.y > 0.0 && inner.to.y > 0.0);

        let center_below = Some(Vec2::new(5.0, -3.0));
        let g = compute_edge_geometry(
            Vec2::zero(),
            Vec2::new(10.0, 0.0),
            EdgeType::Aromatic,
            center_below,
        );
        let inner = g.inner.unwrap();
        assert!(inner.from.y < 0.0 && inner.to.y < 0.0);
    }
}
