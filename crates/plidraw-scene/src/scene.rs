//! The scene
//!
//! A [`Scene`] aggregates structures, annotations, intermolecular
//! connections and the global boundary tracker. Structures are never erased
//! while a batch may still reference them: removal retires a structure from
//! the "in use" set, and only the revert of its add erases the data.

use ahash::{AHashMap, AHashSet};
use plidraw_geom::{BoundaryTracker, Bounds, Vec2};
use plidraw_mol::{AnnotationId, AtomId, Rgb, Structure, StructureId};

use crate::interaction::{
    AffectedConnections, ConnectionStore, InteractionMode,
};

/// A free text annotation placed in the scene.
#[derive(Debug, Clone, PartialEq)]
pub struct Annotation {
    pub id: AnnotationId,
    pub coords: Vec2,
    pub text: String,
    pub color: Rgb,
}

/// The full drawing state one user action operates on.
#[derive(Debug, Clone, Default)]
pub struct Scene {
    structures: AHashMap<StructureId, Structure>,
    /// Structures that are live. Retired ids stay in `structures` so stale
    /// references within a batch resolve to skippable data.
    in_use: AHashSet<StructureId>,

    annotations: AHashMap<AnnotationId, Annotation>,

    /// All intermolecular connections plus the per-structure index.
    pub connections: ConnectionStore,

    /// Global bounding box over every live structure.
    pub boundary: BoundaryTracker,

    /// Current interaction mode (mirror modes widen affected-connection
    /// queries).
    pub interaction_mode: InteractionMode,
}

impl Scene {
    pub fn new() -> Self {
        Scene::default()
    }

    // =========================================================================
    // Structures
    // =========================================================================

    /// A live structure by id.
    pub fn structure(&self, id: StructureId) -> Option<&Structure> {
        if self.in_use.contains(&id) {
            self.structures.get(&id)
        } else {
            None
        }
    }

    /// A live structure by id, mutably.
    pub fn structure_mut(&mut self, id: StructureId) -> Option<&mut Structure> {
        if self.in_use.contains(&id) {
            self.structures.get_mut(&id)
        } else {
            None
        }
    }

    /// Raw access ignoring the in-use set; change replay uses this so
    /// ordering within a batch cannot hide data from apply/revert.
    pub fn structure_raw_mut(&mut self, id: StructureId) -> Option<&mut Structure> {
        self.structures.get_mut(&id)
    }

    /// Whether a structure is live.
    #[inline]
    pub fn is_in_use(&self, id: StructureId) -> bool {
        self.in_use.contains(&id)
    }

    /// Iterate over live structures.
    pub fn structures(&self) -> impl Iterator<Item = &Structure> {
        self.in_use.iter().filter_map(|id| self.structures.get(id))
    }

    /// Number of live structures.
    pub fn structure_count(&self) -> usize {
        self.in_use.len()
    }

    /// Insert a structure and mark it live. Replaces any retired structure
    /// with the same id.
    pub fn insert_structure(&mut self, structure: Structure) {
        let id = structure.id;
        self.structures.insert(id, structure);
        self.in_use.insert(id);
    }

    /// Retire a structure (logical removal; data stays for stale refs).
    pub fn retire_structure(&mut self, id: StructureId) {
        self.in_use.remove(&id);
    }

    /// Revive a retired structure.
    pub fn revive_structure(&mut self, id: StructureId) {
        if self.structures.contains_key(&id) {
            self.in_use.insert(id);
        }
    }

    /// Erase a structure entirely (revert of its add).
    pub fn erase_structure(&mut self, id: StructureId) {
        self.in_use.remove(&id);
        self.structures.remove(&id);
    }

    // =========================================================================
    // Annotations
    // =========================================================================

    #[inline]
    pub fn annotation(&self, id: AnnotationId) -> Option<&Annotation> {
        self.annotations.get(&id)
    }

    #[inline]
    pub fn annotation_mut(&mut self, id: AnnotationId) -> Option<&mut Annotation> {
        self.annotations.get_mut(&id)
    }

    pub fn insert_annotation(&mut self, annotation: Annotation) {
        self.annotations.insert(annotation.id, annotation);
    }

    pub fn remove_annotation(&mut self, id: AnnotationId) -> Option<Annotation> {
        self.annotations.remove(&id)
    }

    pub fn annotations(&self) -> impl Iterator<Item = &Annotation> {
        self.annotations.values()
    }

    // =========================================================================
    // Affected-connection queries
    // =========================================================================

    /// Which connections a move of `moved` atoms in `structure` affects.
    ///
    /// In a mirror mode every connection of the structure counts as
    /// affected. Otherwise distances and generic interactions are always
    /// fully affected (their endpoints are atom-anchored and cheap to
    /// refresh), while atom-pair interactions, pi-stackings and cation-pi
    /// stackings are matched precisely against the moved set.
    pub fn affected_connections(
        &self,
        structure: StructureId,
        moved: &AHashSet<AtomId>,
    ) -> AffectedConnections {
        if self.interaction_mode.is_mirror() {
            return self.connections.all_of_structure(structure);
        }

        let mut out = AffectedConnections::default();
        let Some(index) = self.connections.index_of(structure) else {
            return out;
        };
        out.distances.extend(&index.distances);
        out.interactions.extend(&index.interactions);

        for &id in &index.atom_pairs {
            if let Some(p) = self.connections.atom_pair(id) {
                let hit = (p.from.structure == structure && moved.contains(&p.from.atom))
                    || (p.to.structure == structure && moved.contains(&p.to.atom));
                if hit {
                    out.atom_pairs.insert(id);
                }
            }
        }
        for &id in &index.pi_stackings {
            if let Some(p) = self.connections.pi_stacking(id) {
                if self.ring_hits(&p.from, structure, moved) || self.ring_hits(&p.to, structure, moved)
                {
                    out.pi_stackings.insert(id);
                }
            }
        }
        for &id in &index.cation_pis {
            if let Some(c) = self.connections.cation_pi(id) {
                let cation_hit =
                    c.cation.structure == structure && moved.contains(&c.cation.atom);
                if cation_hit || self.ring_hits(&c.ring, structure, moved) {
                    out.cation_pis.insert(id);
                }
            }
        }
        out
    }

    fn ring_hits(
        &self,
        ring_ref: &crate::interaction::RingRef,
        structure: StructureId,
        moved: &AHashSet<AtomId>,
    ) -> bool {
        ring_ref.structure == structure
            && self
                .structures
                .get(&structure)
                .and_then(|s| s.ring(ring_ref.ring))
                .is_some_and(|r| r.atoms.iter().any(|a| moved.contains(a)))
    }

    // =========================================================================
    // Connection endpoint geometry
    // =========================================================================

    fn atom_coords(&self, r: &crate::interaction::AtomRef) -> Option<Vec2> {
        self.structures
            .get(&r.structure)
            .and_then(|s| s.atom(r.atom))
            .map(|a| a.coords)
    }

    fn ring_center(&self, r: &crate::interaction::RingRef) -> Option<Vec2> {
        self.structures
            .get(&r.structure)
            .and_then(|s| s.ring(r.ring))
            .map(|ring| ring.center)
    }

    /// Fresh endpoints of a distance, from current atom coordinates.
    pub fn distance_endpoints(&self, id: plidraw_mol::DistanceId) -> Option<(Vec2, Vec2)> {
        let d = self.connections.distance(id)?;
        Some((self.atom_coords(&d.from)?, self.atom_coords(&d.to)?))
    }

    /// Fresh endpoints of a generic interaction.
    pub fn interaction_endpoints(&self, id: plidraw_mol::InteractionId) -> Option<(Vec2, Vec2)> {
        let i = self.connections.interaction(id)?;
        Some((self.atom_coords(&i.from)?, self.atom_coords(&i.to)?))
    }

    /// Fresh endpoints of an atom-pair interaction.
    pub fn atom_pair_endpoints(&self, id: plidraw_mol::AtomPairId) -> Option<(Vec2, Vec2)> {
        let p = self.connections.atom_pair(id)?;
        Some((self.atom_coords(&p.from)?, self.atom_coords(&p.to)?))
    }

    /// Fresh endpoints of a pi-stacking (ring center to ring center).
    pub fn pi_stacking_endpoints(&self, id: plidraw_mol::PiStackingId) -> Option<(Vec2, Vec2)> {
        let p = self.connections.pi_stacking(id)?;
        Some((self.ring_center(&p.from)?, self.ring_center(&p.to)?))
    }

    /// Fresh endpoints of a cation-pi stacking (cation to ring center).
    pub fn cation_pi_endpoints(&self, id: plidraw_mol::CationPiId) -> Option<(Vec2, Vec2)> {
        let c = self.connections.cation_pi(id)?;
        Some((self.atom_coords(&c.cation)?, self.ring_center(&c.ring)?))
    }

    // =========================================================================
    // Boundaries
    // =========================================================================

    /// Fresh cover of every live structure's bounds.
    pub fn compute_global_bounds(&self) -> Bounds {
        let mut b = Bounds::EMPTY;
        for s in self.structures() {
            b.union(s.boundary.bounds());
        }
        b
    }
}
