//! Intermolecular connections
//!
//! Distances, interactions, atom-pair interactions, pi-stackings, cation-pi
//! stackings and hydrophobic contacts link atoms (or rings) across two
//! structures. They are not owned by either structure; the
//! [`ConnectionStore`] owns them and keeps a per-structure index so the
//! propagation engine can answer "which connections does a moved atom set
//! affect" without scanning everything.

use ahash::{AHashMap, AHashSet};
use plidraw_geom::{sample_spline, Vec2};
use plidraw_mol::{
    AtomId, AtomPairId, CationPiId, DistanceId, HydrophobicContactId, InteractionId, PiStackingId,
    RingId, StructureId,
};
use serde::{Deserialize, Serialize};

/// Samples per spline segment for hydrophobic contact curves.
pub const SPLINE_SUBDIVISIONS: usize = 8;

/// The interaction mode the drawer is currently in.
///
/// Mirror modes change global orientation broadly, so every connection of a
/// structure counts as affected by any move while one is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum InteractionMode {
    #[default]
    Movement,
    Rotation,
    BondMirror,
    LineMirror,
}

impl InteractionMode {
    /// Whether this is one of the mirroring modes.
    #[inline]
    pub fn is_mirror(&self) -> bool {
        matches!(self, InteractionMode::BondMirror | InteractionMode::LineMirror)
    }
}

/// Reference to an atom of a specific structure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AtomRef {
    pub structure: StructureId,
    pub atom: AtomId,
}

/// Reference to a ring of a specific structure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RingRef {
    pub structure: StructureId,
    pub ring: RingId,
}

/// A plain measured distance between two atoms.
#[derive(Debug, Clone, PartialEq)]
pub struct Distance {
    pub id: DistanceId,
    pub from: AtomRef,
    pub to: AtomRef,
    pub draw_from: Vec2,
    pub draw_to: Vec2,
}

/// A generic (typed elsewhere) interaction between two atoms.
#[derive(Debug, Clone, PartialEq)]
pub struct Interaction {
    pub id: InteractionId,
    pub from: AtomRef,
    pub to: AtomRef,
    pub draw_from: Vec2,
    pub draw_to: Vec2,
}

/// A specific atom-pair interaction (e.g. hydrogen bond).
#[derive(Debug, Clone, PartialEq)]
pub struct AtomPairInteraction {
    pub id: AtomPairId,
    pub from: AtomRef,
    pub to: AtomRef,
    pub draw_from: Vec2,
    pub draw_to: Vec2,
}

/// A pi-stacking between two rings, drawn between the ring centers.
#[derive(Debug, Clone, PartialEq)]
pub struct PiStacking {
    pub id: PiStackingId,
    pub from: RingRef,
    pub to: RingRef,
    pub draw_from: Vec2,
    pub draw_to: Vec2,
}

/// A cation-pi stacking between a charged atom and a ring.
#[derive(Debug, Clone, PartialEq)]
pub struct CationPiStacking {
    pub id: CationPiId,
    pub cation: AtomRef,
    pub ring: RingRef,
    pub draw_from: Vec2,
    pub draw_to: Vec2,
}

/// A hydrophobic contact: a user-editable spline hugging one structure.
#[derive(Debug, Clone, PartialEq)]
pub struct HydrophobicContact {
    pub id: HydrophobicContactId,
    pub structure: StructureId,
    pub control_points: Vec<Vec2>,
    /// Sampled curve, regenerated whenever a control point moves.
    pub curve: Vec<Vec2>,
}

impl HydrophobicContact {
    pub fn new(id: HydrophobicContactId, structure: StructureId, control_points: Vec<Vec2>) -> Self {
        let curve = sample_spline(&control_points, SPLINE_SUBDIVISIONS);
        HydrophobicContact {
            id,
            structure,
            control_points,
            curve,
        }
    }

    /// Regenerate the sampled curve from the control points.
    pub fn resample(&mut self) {
        self.curve = sample_spline(&self.control_points, SPLINE_SUBDIVISIONS);
    }
}

/// Ids of connections affected by a coordinate change, per kind.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AffectedConnections {
    pub distances: AHashSet<DistanceId>,
    pub interactions: AHashSet<InteractionId>,
    pub atom_pairs: AHashSet<AtomPairId>,
    pub pi_stackings: AHashSet<PiStackingId>,
    pub cation_pis: AHashSet<CationPiId>,
}

impl AffectedConnections {
    pub fn is_empty(&self) -> bool {
        self.distances.is_empty()
            && self.interactions.is_empty()
            && self.atom_pairs.is_empty()
            && self.pi_stackings.is_empty()
            && self.cation_pis.is_empty()
    }

    /// Union another affected set into this one.
    pub fn union(&mut self, other: &AffectedConnections) {
        self.distances.extend(&other.distances);
        self.interactions.extend(&other.interactions);
        self.atom_pairs.extend(&other.atom_pairs);
        self.pi_stackings.extend(&other.pi_stackings);
        self.cation_pis.extend(&other.cation_pis);
    }
}

/// Per-structure index into the connection store.
#[derive(Debug, Clone, Default)]
pub struct ConnectionIndex {
    pub distances: AHashSet<DistanceId>,
    pub interactions: AHashSet<InteractionId>,
    pub atom_pairs: AHashSet<AtomPairId>,
    pub pi_stackings: AHashSet<PiStackingId>,
    pub cation_pis: AHashSet<CationPiId>,
    pub hydrophobic_contacts: AHashSet<HydrophobicContactId>,
}

/// A batch of full connection values, used as the payload of add/remove
/// change units so both directions can be replayed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConnectionBatch {
    pub distances: Vec<Distance>,
    pub interactions: Vec<Interaction>,
    pub atom_pairs: Vec<AtomPairInteraction>,
    pub pi_stackings: Vec<PiStacking>,
    pub cation_pis: Vec<CationPiStacking>,
    pub hydrophobic_contacts: Vec<HydrophobicContact>,
}

impl ConnectionBatch {
    pub fn is_empty(&self) -> bool {
        self.distances.is_empty()
            && self.interactions.is_empty()
            && self.atom_pairs.is_empty()
            && self.pi_stackings.is_empty()
            && self.cation_pis.is_empty()
            && self.hydrophobic_contacts.is_empty()
    }
}

/// Owner of all intermolecular connections plus the per-structure index.
#[derive(Debug, Clone, Default)]
pub struct ConnectionStore {
    distances: AHashMap<DistanceId, Distance>,
    interactions: AHashMap<InteractionId, Interaction>,
    atom_pairs: AHashMap<AtomPairId, AtomPairInteraction>,
    pi_stackings: AHashMap<PiStackingId, PiStacking>,
    cation_pis: AHashMap<CationPiId, CationPiStacking>,
    hydrophobic_contacts: AHashMap<HydrophobicContactId, HydrophobicContact>,
    by_structure: AHashMap<StructureId, ConnectionIndex>,
}

impl ConnectionStore {
    pub fn new() -> Self {
        ConnectionStore::default()
    }

    fn index_mut(&mut self, structure: StructureId) -> &mut ConnectionIndex {
        self.by_structure.entry(structure).or_default()
    }

    /// The connection index of a structure, if it has any connections.
    pub fn index_of(&self, structure: StructureId) -> Option<&ConnectionIndex> {
        self.by_structure.get(&structure)
    }

    // =========================================================================
    // Insert / Remove
    // =========================================================================

    pub fn insert_distance(&mut self, d: Distance) {
        self.index_mut(d.from.structure).distances.insert(d.id);
        self.index_mut(d.to.structure).distances.insert(d.id);
        self.distances.insert(d.id, d);
    }

    pub fn insert_interaction(&mut self, i: Interaction) {
        self.index_mut(i.from.structure).interactions.insert(i.id);
        self.index_mut(i.to.structure).interactions.insert(i.id);
        self.interactions.insert(i.id, i);
    }

    pub fn insert_atom_pair(&mut self, p: AtomPairInteraction) {
        self.index_mut(p.from.structure).atom_pairs.insert(p.id);
        self.index_mut(p.to.structure).atom_pairs.insert(p.id);
        self.atom_pairs.insert(p.id, p);
    }

    pub fn insert_pi_stacking(&mut self, p: PiStacking) {
        self.index_mut(p.from.structure).pi_stackings.insert(p.id);
        self.index_mut(p.to.structure).pi_stackings.insert(p.id);
        self.pi_stackings.insert(p.id, p);
    }

    pub fn insert_cation_pi(&mut self, c: CationPiStacking) {
        self.index_mut(c.cation.structure).cation_pis.insert(c.id);
        self.index_mut(c.ring.structure).cation_pis.insert(c.id);
        self.cation_pis.insert(c.id, c);
    }

    pub fn insert_hydrophobic_contact(&mut self, h: HydrophobicContact) {
        self.index_mut(h.structure).hydrophobic_contacts.insert(h.id);
        self.hydrophobic_contacts.insert(h.id, h);
    }

    /// Insert every connection of a batch.
    pub fn insert_batch(&mut self, batch: &ConnectionBatch) {
        for d in &batch.distances {
            self.insert_distance(d.clone());
        }
        for i in &batch.interactions {
            self.insert_interaction(i.clone());
        }
        for p in &batch.atom_pairs {
            self.insert_atom_pair(p.clone());
        }
        for p in &batch.pi_stackings {
            self.insert_pi_stacking(p.clone());
        }
        for c in &batch.cation_pis {
            self.insert_cation_pi(c.clone());
        }
        for h in &batch.hydrophobic_contacts {
            self.insert_hydrophobic_contact(h.clone());
        }
    }

    pub fn remove_distance(&mut self, id: DistanceId) -> Option<Distance> {
        let d = self.distances.remove(&id)?;
        self.index_mut(d.from.structure).distances.remove(&id);
        self.index_mut(d.to.structure).distances.remove(&id);
        Some(d)
    }

    pub fn remove_interaction(&mut self, id: InteractionId) -> Option<Interaction> {
        let i = self.interactions.remove(&id)?;
        self.index_mut(i.from.structure).interactions.remove(&id);
        self.index_mut(i.to.structure).interactions.remove(&id);
        Some(i)
    }

    pub fn remove_atom_pair(&mut self, id: AtomPairId) -> Option<AtomPairInteraction> {
        let p = self.atom_pairs.remove(&id)?;
        self.index_mut(p.from.structure).atom_pairs.remove(&id);
        self.index_mut(p.to.structure).atom_pairs.remove(&id);
        Some(p)
    }

    pub fn remove_pi_stacking(&mut self, id: PiStackingId) -> Option<PiStacking> {
        let p = self.pi_stackings.remove(&id)?;
        self.index_mut(p.from.structure).pi_stackings.remove(&id);
        self.index_mut(p.to.structure).pi_stackings.remove(&id);
        Some(p)
    }

    pub fn remove_cation_pi(&mut self, id: CationPiId) -> Option<CationPiStacking> {
        let c = self.cation_pis.remove(&id)?;
        self.index_mut(c.cation.structure).cation_pis.remove(&id);
        self.index_mut(c.ring.structure).cation_pis.remove(&id);
        Some(c)
    }

    pub fn remove_hydrophobic_contact(
        &mut self,
        id: HydrophobicContactId,
    ) -> Option<HydrophobicContact> {
        let h = self.hydrophobic_contacts.remove(&id)?;
        self.index_mut(h.structure).hydrophobic_contacts.remove(&id);
        Some(h)
    }

    /// Remove every connection of a batch (the inverse of
    /// [`ConnectionStore::insert_batch`]).
    pub fn remove_batch(&mut self, batch: &ConnectionBatch) {
        for d in &batch.distances {
            self.remove_distance(d.id);
        }
        for i in &batch.interactions {
            self.remove_interaction(i.id);
        }
        for p in &batch.atom_pairs {
            self.remove_atom_pair(p.id);
        }
        for p in &batch.pi_stackings {
            self.remove_pi_stacking(p.id);
        }
        for c in &batch.cation_pis {
            self.remove_cation_pi(c.id);
        }
        for h in &batch.hydrophobic_contacts {
            self.remove_hydrophobic_contact(h.id);
        }
    }

    // =========================================================================
    // Lookup
    // =========================================================================

    #[inline]
    pub fn distance(&self, id: DistanceId) -> Option<&Distance> {
        self.distances.get(&id)
    }

    #[inline]
    pub fn distance_mut(&mut self, id: DistanceId) -> Option<&mut Distance> {
        self.distances.get_mut(&id)
    }

    #[inline]
    pub fn interaction(&self, id: InteractionId) -> Option<&Interaction> {
        self.interactions.get(&id)
    }

    #[inline]
    pub fn interaction_mut(&mut self, id: InteractionId) -> Option<&mut Interaction> {
        self.interactions.get_mut(&id)
    }

    #[inline]
    pub fn atom_pair(&self, id: AtomPairId) -> Option<&AtomPairInteraction> {
        self.atom_pairs.get(&id)
    }

    #[inline]
    pub fn atom_pair_mut(&mut self, id: AtomPairId) -> Option<&mut AtomPairInteraction> {
        self.atom_pairs.get_mut(&id)
    }

    #[inline]
    pub fn pi_stacking(&self, id: PiStackingId) -> Option<&PiStacking> {
        self.pi_stackings.get(&id)
    }

    #[inline]
    pub fn pi_stacking_mut(&mut self, id: PiStackingId) -> Option<&mut PiStacking> {
        self.pi_stackings.get_mut(&id)
    }

    #[inline]
    pub fn cation_pi(&self, id: CationPiId) -> Option<&CationPiStacking> {
        self.cation_pis.get(&id)
    }

    #[inline]
    pub fn cation_pi_mut(&mut self, id: CationPiId) -> Option<&mut CationPiStacking> {
        self.cation_pis.get_mut(&id)
    }

    #[inline]
    pub fn hydrophobic_contact(&self, id: HydrophobicContactId) -> Option<&HydrophobicContact> {
        self.hydrophobic_contacts.get(&id)
    }

    #[inline]
    pub fn hydrophobic_contact_mut(
        &mut self,
        id: HydrophobicContactId,
    ) -> Option<&mut HydrophobicContact> {
        self.hydrophobic_contacts.get_mut(&id)
    }

    /// Every connection id involving a structure, as an affected set.
    pub fn all_of_structure(&self, structure: StructureId) -> AffectedConnections {
        let mut out = AffectedConnections::default();
        if let Some(index) = self.by_structure.get(&structure) {
            out.distances.extend(&index.distances);
            out.interactions.extend(&index.interactions);
            out.atom_pairs.extend(&index.atom_pairs);
            out.pi_stackings.extend(&index.pi_stackings);
            out.cation_pis.extend(&index.cation_pis);
        }
        out
    }

    /// Extract the full values of every connection involving a structure
    /// (used as a removal payload).
    pub fn batch_of_structure(&self, structure: StructureId) -> ConnectionBatch {
        let mut batch = ConnectionBatch::default();
        let Some(index) = self.by_structure.get(&structure) else {
            return batch;
        };
        batch.distances = index
            .distances
            .iter()
            .filter_map(|id| self.distances.get(id).cloned())
            .collect();
        batch.interactions = index
            .interactions
            .iter()
            .filter_map(|id| self.interactions.get(id).cloned())
            .collect();
        batch.atom_pairs = index
            .atom_pairs
            .iter()
            .filter_map(|id| self.atom_pairs.get(id).cloned())
            .collect();
        batch.pi_stackings = index
            .pi_stackings
            .iter()
            .filter_map(|id| self.pi_stackings.get(id).cloned())
            .collect();
        batch.cation_pis = index
            .cation_pis
            .iter()
            .filter_map(|id| self.cation_pis.get(id).cloned())
            .collect();
        batch.hydrophobic_contacts = index
            .hydrophobic_contacts
            .iter()
            .filter_map(|id| self.hydrophobic_contacts.get(id).cloned())
            .collect();
        batch
    }
}
