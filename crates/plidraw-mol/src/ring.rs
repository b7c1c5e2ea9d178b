//! Rings and fused-ring systems
//!
//! A ring is an ordered atom cycle with a derived edge list and a computed
//! center; a ring system aggregates fused rings (sharing atoms or edges)
//! into one geometric unit with a shared center.

use plidraw_geom::Vec2;

use crate::index::{AtomId, EdgeId, RingId, RingSystemId};

/// A ring of one structure.
#[derive(Debug, Clone, PartialEq)]
pub struct Ring {
    pub id: RingId,

    /// Ordered atom cycle.
    pub atoms: Vec<AtomId>,

    /// Edge between `atoms[i]` and `atoms[(i + 1) % len]`, derived when the
    /// ring is registered.
    pub edges: Vec<EdgeId>,

    /// Aromatic rings render an inner line per edge instead of Kekulé
    /// double bonds.
    pub aromatic: bool,

    /// Geometric center, kept consistent with member atom coordinates.
    pub center: Vec2,
}

impl Ring {
    /// Whether the ring contains the given atom.
    #[inline]
    pub fn contains_atom(&self, atom: AtomId) -> bool {
        self.atoms.contains(&atom)
    }
}

/// A fused-ring aggregate with a shared center.
#[derive(Debug, Clone, PartialEq)]
pub struct RingSystem {
    pub id: RingSystemId,

    /// Member rings.
    pub rings: Vec<RingId>,

    /// Distinct atoms across all member rings.
    pub atoms: Vec<AtomId>,

    /// Geometric center over the distinct member atoms.
    pub center: Vec2,
}

impl RingSystem {
    /// Whether any member ring contains the given atom.
    #[inline]
    pub fn contains_atom(&self, atom: AtomId) -> bool {
        self.atoms.contains(&atom)
    }
}
