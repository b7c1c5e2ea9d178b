//! Structure graph store
//!
//! A [`Structure`] owns the atoms, edges, rings and ring systems of one
//! connected molecular unit (ligand, residue, water) and exposes the
//! neighbor and membership queries the propagation engine relies on.
//! Everything is keyed by stable ids; adjacency and ring-membership indices
//! are maintained on structural edits only, never on coordinate edits.

use ahash::AHashMap;
use plidraw_geom::{centroid, BoundaryTracker, Bounds, Vec2};
use smallvec::SmallVec;

use crate::atom::{Atom, Orientation};
use crate::edge::{compute_edge_geometry, Edge, EdgeType};
use crate::error::{MolError, MolResult};
use crate::index::{AtomId, EdgeId, RingId, RingSystemId, StructureId};
use crate::ring::{Ring, RingSystem};

/// Margin added around a structure's bounds by the circle representation.
pub const CIRCLE_MARGIN: f32 = 1.0;

/// How a structure is depicted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Representation {
    /// Full structural formula.
    Default,
    /// Collapsed to a circle (used for distant residues); geometry follows
    /// the structure's bounds.
    Circle { center: Vec2, radius: f32 },
}

/// One structure of the scene.
#[derive(Debug, Clone)]
pub struct Structure {
    /// Scene-unique id.
    pub id: StructureId,

    /// Display name (e.g. ligand code or residue label).
    pub name: String,

    atoms: AHashMap<AtomId, Atom>,
    edges: AHashMap<EdgeId, Edge>,

    /// Per-atom incident edge ids. Four slots cover almost every atom.
    adjacency: AHashMap<AtomId, SmallVec<[EdgeId; 4]>>,

    rings: AHashMap<RingId, Ring>,
    ring_systems: AHashMap<RingSystemId, RingSystem>,

    /// Per-atom ring membership.
    atom_rings: AHashMap<AtomId, SmallVec<[RingId; 2]>>,

    /// This structure's own bounding box over enabled atoms' draw limits.
    pub boundary: BoundaryTracker,

    /// Depiction mode.
    pub representation: Representation,

    /// Immutable clone captured at add time, for reset.
    original: Option<Box<Structure>>,
}

impl Structure {
    /// Create an empty structure.
    pub fn new(id: StructureId, name: impl Into<String>) -> Self {
        Structure {
            id,
            name: name.into(),
            atoms: AHashMap::new(),
            edges: AHashMap::new(),
            adjacency: AHashMap::new(),
            rings: AHashMap::new(),
            ring_systems: AHashMap::new(),
            atom_rings: AHashMap::new(),
            boundary: BoundaryTracker::new(),
            representation: Representation::Default,
            original: None,
        }
    }

    // =========================================================================
    // Atom Operations
    // =========================================================================

    /// Add an atom. Fails on a duplicate id.
    pub fn add_atom(&mut self, atom: Atom) -> MolResult<AtomId> {
        let id = atom.id;
        if self.atoms.contains_key(&id) {
            return Err(MolError::DuplicateAtom(id.as_u32()));
        }
        self.boundary.include(&atom.draw_limits);
        self.atoms.insert(id, atom);
        self.adjacency.entry(id).or_default();
        Ok(id)
    }

    /// Get an atom by id.
    #[inline]
    pub fn atom(&self, id: AtomId) -> Option<&Atom> {
        self.atoms.get(&id)
    }

    /// Get a mutable atom by id.
    #[inline]
    pub fn atom_mut(&mut self, id: AtomId) -> Option<&mut Atom> {
        self.atoms.get_mut(&id)
    }

    /// Get an atom only if it exists and is enabled.
    ///
    /// The silent-skip helper: disabled atoms are logically removed but may
    /// still be referenced by stale ids within a batch.
    #[inline]
    pub fn enabled_atom(&self, id: AtomId) -> Option<&Atom> {
        self.atoms.get(&id).filter(|a| a.enabled)
    }

    /// Number of atoms, including disabled ones.
    #[inline]
    pub fn atom_count(&self) -> usize {
        self.atoms.len()
    }

    /// Iterate over all atoms.
    pub fn atoms(&self) -> impl Iterator<Item = &Atom> {
        self.atoms.values()
    }

    /// Iterate over enabled atoms.
    pub fn enabled_atoms(&self) -> impl Iterator<Item = &Atom> {
        self.atoms.values().filter(|a| a.enabled)
    }

    // =========================================================================
    // Edge Operations
    // =========================================================================

    /// Add an edge between two existing atoms and compute its draw geometry.
    pub fn add_edge(&mut self, id: EdgeId, from: AtomId, to: AtomId, kind: EdgeType) -> MolResult<EdgeId> {
        if self.edges.contains_key(&id) {
            return Err(MolError::DuplicateEdge(id.as_u32()));
        }
        if from == to {
            return Err(MolError::SelfLoop(id.as_u32(), from.as_u32()));
        }
        for endpoint in [from, to] {
            if !self.atoms.contains_key(&endpoint) {
                return Err(MolError::UnknownEndpoint {
                    edge: id.as_u32(),
                    atom: endpoint.as_u32(),
                });
            }
        }

        let mut edge = Edge::new(id, from, to, kind);
        let from_pos = self.atoms[&from].coords;
        let to_pos = self.atoms[&to].coords;
        edge.set_geometry(compute_edge_geometry(from_pos, to_pos, kind, None));

        self.edges.insert(id, edge);
        self.adjacency.entry(from).or_default().push(id);
        self.adjacency.entry(to).or_default().push(id);
        Ok(id)
    }

    /// Get an edge by id.
    #[inline]
    pub fn edge(&self, id: EdgeId) -> Option<&Edge> {
        self.edges.get(&id)
    }

    /// Get a mutable edge by id.
    #[inline]
    pub fn edge_mut(&mut self, id: EdgeId) -> Option<&mut Edge> {
        self.edges.get_mut(&id)
    }

    /// Number of edges, including disabled ones.
    #[inline]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Iterate over all edges.
    pub fn edges(&self) -> impl Iterator<Item = &Edge> {
        self.edges.values()
    }

    /// Ids of edges incident to an atom.
    pub fn edges_at(&self, atom: AtomId) -> &[EdgeId] {
        self.adjacency
            .get(&atom)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    /// Enabled neighbor atoms of an atom.
    pub fn neighbors(&self, atom: AtomId) -> Vec<AtomId> {
        let mut out = Vec::new();
        for &edge_id in self.edges_at(atom) {
            if let Some(edge) = self.edges.get(&edge_id) {
                if !edge.enabled {
                    continue;
                }
                if let Some(other) = edge.other(atom) {
                    if self.enabled_atom(other).is_some() {
                        out.push(other);
                    }
                }
            }
        }
        out
    }

    /// Find the edge between two atoms, if any.
    pub fn find_edge(&self, a: AtomId, b: AtomId) -> Option<EdgeId> {
        self.edges_at(a)
            .iter()
            .copied()
            .find(|&e| self.edges.get(&e).is_some_and(|edge| edge.contains(b)))
    }

    /// Whether an edge with both endpoints enabled.
    pub fn edge_is_live(&self, id: EdgeId) -> bool {
        self.edges.get(&id).is_some_and(|e| {
            e.enabled
                && self.enabled_atom(e.from).is_some()
                && self.enabled_atom(e.to).is_some()
        })
    }

    // =========================================================================
    // Ring Operations
    // =========================================================================

    /// Register a ring from an ordered atom cycle.
    ///
    /// Derives the edge list from consecutive atom pairs, computes the
    /// center, indexes membership, and re-offsets the inner lines of member
    /// double/aromatic edges toward the ring center.
    pub fn add_ring(&mut self, id: RingId, atoms: Vec<AtomId>, aromatic: bool) -> MolResult<RingId> {
        if self.rings.contains_key(&id) {
            return Err(MolError::DuplicateRing(id.as_u32()));
        }
        for &atom in &atoms {
            if !self.atoms.contains_key(&atom) {
                return Err(MolError::UnknownRingAtom {
                    ring: id.as_u32(),
                    atom: atom.as_u32(),
                });
            }
        }
        let n = atoms.len();
        let mut edges = Vec::with_capacity(n);
        for i in 0..n {
            let a = atoms[i];
            let b = atoms[(i + 1) % n];
            let edge = self.find_edge(a, b).ok_or(MolError::BrokenRing {
                ring: id.as_u32(),
                a: a.as_u32(),
                b: b.as_u32(),
            })?;
            edges.push(edge);
        }

        let center = self.centroid_of(&atoms);
        for &atom in &atoms {
            self.atom_rings.entry(atom).or_default().push(id);
        }
        let ring = Ring {
            id,
            atoms,
            edges: edges.clone(),
            aromatic,
            center,
        };
        self.rings.insert(id, ring);

        // Ring membership decides the inner-line side of member edges.
        for edge_id in edges {
            self.reposition_edge(edge_id);
        }
        Ok(id)
    }

    /// Get a ring by id.
    #[inline]
    pub fn ring(&self, id: RingId) -> Option<&Ring> {
        self.rings.get(&id)
    }

    /// Get a mutable ring by id.
    #[inline]
    pub fn ring_mut(&mut self, id: RingId) -> Option<&mut Ring> {
        self.rings.get_mut(&id)
    }

    /// Iterate over all rings.
    pub fn rings(&self) -> impl Iterator<Item = &Ring> {
        self.rings.values()
    }

    /// Ids of rings containing an atom.
    pub fn rings_containing(&self, atom: AtomId) -> &[RingId] {
        self.atom_rings
            .get(&atom)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    /// Centroid over current coordinates of the given atoms.
    pub fn centroid_of(&self, atoms: &[AtomId]) -> Vec2 {
        let points: Vec<Vec2> = atoms
            .iter()
            .filter_map(|id| self.atoms.get(id).map(|a| a.coords))
            .collect();
        centroid(&points)
    }

    /// Recompute a ring's center from current atom coordinates.
    pub fn ring_center_of(&self, ring: RingId) -> Option<Vec2> {
        self.rings.get(&ring).map(|r| self.centroid_of(&r.atoms))
    }

    // =========================================================================
    // Ring Systems
    // =========================================================================

    /// Rebuild fused-ring systems from scratch.
    ///
    /// Rings sharing at least one atom belong to the same system. Called
    /// once after all rings of a structure are registered.
    pub fn rebuild_ring_systems(&mut self) {
        self.ring_systems.clear();

        let ring_ids: Vec<RingId> = self.rings.keys().copied().collect();
        let mut assigned: AHashMap<RingId, bool> = AHashMap::new();
        let mut next_system = 0u32;

        for &start in &ring_ids {
            if assigned.get(&start).copied().unwrap_or(false) {
                continue;
            }
            // Flood fill over the shared-atom relation.
            let mut members = vec![start];
            assigned.insert(start, true);
            let mut stack = vec![start];
            while let Some(current) = stack.pop() {
                let current_atoms = self.rings[&current].atoms.clone();
                for &other in &ring_ids {
                    if assigned.get(&other).copied().unwrap_or(false) {
                        continue;
                    }
                    let shares = self.rings[&other]
                        .atoms
                        .iter()
                        .any(|a| current_atoms.contains(a));
                    if shares {
                        assigned.insert(other, true);
                        members.push(other);
                        stack.push(other);
                    }
                }
            }

            let mut atoms: Vec<AtomId> = Vec::new();
            for ring in &members {
                for &atom in &self.rings[ring].atoms {
                    if !atoms.contains(&atom) {
                        atoms.push(atom);
                    }
                }
            }
            let center = self.centroid_of(&atoms);
            let id = RingSystemId::new(next_system);
            next_system += 1;
            self.ring_systems.insert(
                id,
                RingSystem {
                    id,
                    rings: members,
                    atoms,
                    center,
                },
            );
        }
    }

    /// Get a ring system by id.
    #[inline]
    pub fn ring_system(&self, id: RingSystemId) -> Option<&RingSystem> {
        self.ring_systems.get(&id)
    }

    /// Get a mutable ring system by id.
    #[inline]
    pub fn ring_system_mut(&mut self, id: RingSystemId) -> Option<&mut RingSystem> {
        self.ring_systems.get_mut(&id)
    }

    /// Iterate over all ring systems.
    pub fn ring_systems(&self) -> impl Iterator<Item = &RingSystem> {
        self.ring_systems.values()
    }

    /// Ids of ring systems containing any of the given atoms.
    pub fn ring_systems_containing(&self, atoms: &[AtomId]) -> Vec<RingSystemId> {
        self.ring_systems
            .values()
            .filter(|rs| atoms.iter().any(|a| rs.contains_atom(*a)))
            .map(|rs| rs.id)
            .collect()
    }

    // =========================================================================
    // Geometry Maintenance
    // =========================================================================

    /// Recompute one edge's draw geometry from current atom positions.
    ///
    /// Ring membership of the edge decides the inner-line side.
    pub fn reposition_edge(&mut self, id: EdgeId) {
        let Some(edge) = self.edges.get(&id) else {
            return;
        };
        let (from, to, kind) = (edge.from, edge.to, edge.kind);
        let (Some(a), Some(b)) = (self.atoms.get(&from), self.atoms.get(&to)) else {
            return;
        };
        let inner_side = self.inner_side_of(id);
        let geometry = compute_edge_geometry(a.coords, b.coords, kind, inner_side);
        if let Some(edge) = self.edges.get_mut(&id) {
            edge.set_geometry(geometry);
        }
    }

    /// The ring center guiding an edge's inner line, if the edge is a ring
    /// member.
    pub fn inner_side_of(&self, edge: EdgeId) -> Option<Vec2> {
        self.rings
            .values()
            .find(|r| r.edges.contains(&edge))
            .map(|r| r.center)
    }

    /// The preferred implicit-hydrogen side for an atom: the side pointing
    /// away from the dominant neighbor direction.
    pub fn preferred_hydrogen_orientation(&self, atom: AtomId) -> Orientation {
        let Some(a) = self.atoms.get(&atom) else {
            return Orientation::default();
        };
        let neighbors = self.neighbors(atom);
        if neighbors.is_empty() {
            return Orientation::default();
        }
        let mut sum = Vec2::zero();
        for n in &neighbors {
            if let Some(nb) = self.atoms.get(n) {
                sum += nb.coords - a.coords;
            }
        }
        if sum.mag_sq() < 1e-8 {
            return Orientation::default();
        }
        if sum.x.abs() >= sum.y.abs() {
            if sum.x > 0.0 {
                Orientation::Left
            } else {
                Orientation::Right
            }
        } else if sum.y > 0.0 {
            Orientation::Down
        } else {
            Orientation::Up
        }
    }

    /// The preferred residue-label side for an atom. Label anchors only use
    /// the horizontal sides.
    pub fn preferred_label_side(&self, atom: AtomId) -> Orientation {
        match self.preferred_hydrogen_orientation(atom) {
            Orientation::Up | Orientation::Down => {
                let Some(a) = self.atoms.get(&atom) else {
                    return Orientation::Right;
                };
                let mut sum_x = 0.0;
                for n in self.neighbors(atom) {
                    if let Some(nb) = self.atoms.get(&n) {
                        sum_x += nb.coords.x - a.coords.x;
                    }
                }
                if sum_x > 0.0 {
                    Orientation::Left
                } else {
                    Orientation::Right
                }
            }
            horizontal => horizontal,
        }
    }

    /// Fresh cover of all enabled atoms' draw limits.
    pub fn compute_draw_bounds(&self) -> Bounds {
        let mut b = Bounds::EMPTY;
        for atom in self.enabled_atoms() {
            b.union(&atom.draw_limits);
        }
        b
    }

    /// Rescan the boundary tracker from scratch, clearing shrink hints.
    pub fn rescan_boundary(&mut self) {
        let bounds = self.compute_draw_bounds();
        self.boundary = BoundaryTracker::from_bounds(bounds);
    }

    /// Circle geometry derived from current bounds, when the structure uses
    /// the circle representation.
    pub fn circle_from_bounds(&self) -> Option<(Vec2, f32)> {
        match self.representation {
            Representation::Default => None,
            Representation::Circle { .. } => {
                let b = self.boundary.bounds();
                if b.is_empty() {
                    return None;
                }
                let radius = (b.width().powi(2) + b.height().powi(2)).sqrt() * 0.5 + CIRCLE_MARGIN;
                Some((b.center(), radius))
            }
        }
    }

    // =========================================================================
    // Original Snapshot
    // =========================================================================

    /// Capture the immutable "original" clone used for reset. Called once
    /// right after the structure is added to the scene.
    pub fn snapshot_original(&mut self) {
        let mut clone = self.clone();
        clone.original = None;
        self.original = Some(Box::new(clone));
    }

    /// The add-time snapshot, if captured.
    pub fn original(&self) -> Option<&Structure> {
        self.original.as_deref()
    }
}
