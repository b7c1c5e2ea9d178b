//! Coordinate propagation
//!
//! Moving atoms is never a local edit: incident edges need new trimmed
//! endpoints, stereo wedges may flip under mirrors, implicit hydrogens and
//! residue labels can swap sides, ring and ring-system centers shift, draw
//! limits and boundaries grow or shrink, and intermolecular connections
//! anchored to the moved atoms must follow. [`apply_coordinate_changes`]
//! runs these consequences in dependency order, mutates the scene eagerly
//! and returns every mutation as an already-applied [`SceneChange`] ready
//! for the history log.

use ahash::{AHashMap, AHashSet};
use log::debug;
use plidraw_geom::{coords_equal, Bounds, Extreme, Vec2};
use plidraw_history::ChangeUnit;
use plidraw_mol::{
    compute_edge_geometry, AtomId, EdgeId, InnerLine, RingId, StructureId,
};

use crate::change::SceneChange;
use crate::interaction::AffectedConnections;
use crate::scene::Scene;

/// Inner-line states of an edge repositioned earlier in the same update.
/// `old` is the line before the batch, `new` the one the reposition chose
/// against the stale ring center.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgeInnerCases {
    pub old: Option<InnerLine>,
    pub new: Option<InnerLine>,
}

/// Everything one structure's coordinate update produced.
#[derive(Debug, Default)]
pub struct CoordinateUpdate {
    /// Applied changes, in application order.
    pub changes: Vec<SceneChange>,
    /// Connections whose endpoints must be refreshed.
    pub affected: AffectedConnections,
}

fn record(scene: &mut Scene, changes: &mut Vec<SceneChange>, change: SceneChange) {
    change.apply(scene);
    changes.push(change);
}

/// Apply new coordinates to atoms of one structure and propagate all
/// derived state. `is_flip` marks the update as coming from a mirror
/// interaction, which inverts the wedge direction of stereo bonds whose
/// endpoints moved.
///
/// Atoms whose new position matches the current one within tolerance are
/// ignored entirely, so echoing current coordinates back produces no
/// changes and no history entry.
pub fn apply_coordinate_changes(
    scene: &mut Scene,
    structure_id: StructureId,
    new_coords: &AHashMap<AtomId, Vec2>,
    is_flip: bool,
) -> CoordinateUpdate {
    let mut update = CoordinateUpdate::default();

    // Phase 1: tolerance-compare and move. Collect the atoms that really
    // moved, their pre-move draw limits, and the incident edges to
    // reposition (and, under a flip, the stereo edges to invert).
    let mut really_moved: AHashSet<AtomId> = AHashSet::new();
    let mut old_limits: AHashMap<AtomId, Bounds> = AHashMap::new();
    let mut reposition: AHashSet<EdgeId> = AHashSet::new();
    let mut flip_edges: AHashSet<EdgeId> = AHashSet::new();
    {
        let Some(s) = scene.structure(structure_id) else {
            debug!("coordinate change for unknown structure {structure_id}");
            return update;
        };
        let mut moves: Vec<SceneChange> = Vec::new();
        for (&atom_id, &target) in new_coords {
            let Some(atom) = s.enabled_atom(atom_id) else {
                continue;
            };
            // Wedge direction encodes depth, not position: a mirror flips
            // stereo bonds at every supplied atom, moved or not. An atom
            // on the mirror axis keeps its coordinates but its wedges
            // still invert.
            if is_flip {
                for &edge_id in s.edges_at(atom_id) {
                    if let Some(edge) = s.edge(edge_id) {
                        if edge.enabled && edge.kind.is_stereo() {
                            flip_edges.insert(edge_id);
                        }
                    }
                }
            }
            if coords_equal(atom.coords, target) {
                continue;
            }
            really_moved.insert(atom_id);
            old_limits.insert(atom_id, atom.draw_limits);
            for &edge_id in s.edges_at(atom_id) {
                reposition.insert(edge_id);
            }
            moves.push(SceneChange::MoveAtom {
                structure: structure_id,
                atom: atom_id,
                old: atom.coords,
                new: target,
            });
        }
        for change in moves {
            record(scene, &mut update.changes, change);
        }
    }
    if really_moved.is_empty() && flip_edges.is_empty() {
        return update;
    }
    debug!(
        "structure {structure_id}: {} atoms moved, {} edges to reposition",
        really_moved.len(),
        reposition.len()
    );

    // Phase 2: invert mirrored stereo wedges.
    let mut flip_edges: Vec<EdgeId> = flip_edges.into_iter().collect();
    flip_edges.sort_unstable();
    for edge_id in flip_edges {
        record(
            scene,
            &mut update.changes,
            SceneChange::ToggleStereo {
                structure: structure_id,
                edge: edge_id,
            },
        );
    }

    // Phase 3: recompute draw geometry of live edges touching moved atoms.
    // Inner-line edges keep their before/after states for phase 6, which
    // revisits them once ring centers are fresh.
    let mut inner_cases: AHashMap<EdgeId, EdgeInnerCases> = AHashMap::new();
    {
        let mut repositions: Vec<SceneChange> = Vec::new();
        let Some(s) = scene.structure(structure_id) else {
            return update;
        };
        let mut edges: Vec<EdgeId> = reposition.into_iter().collect();
        edges.sort_unstable();
        for edge_id in edges {
            if !s.edge_is_live(edge_id) {
                continue;
            }
            let Some(edge) = s.edge(edge_id) else {
                continue;
            };
            let (Some(a), Some(b)) = (s.atom(edge.from), s.atom(edge.to)) else {
                continue;
            };
            let old = edge.geometry();
            let new = compute_edge_geometry(a.coords, b.coords, edge.kind, s.inner_side_of(edge_id));
            if new == old {
                continue;
            }
            if edge.kind.has_inner_line() {
                inner_cases.insert(
                    edge_id,
                    EdgeInnerCases {
                        old: old.inner,
                        new: new.inner,
                    },
                );
            }
            repositions.push(SceneChange::RepositionEdge {
                structure: structure_id,
                edge: edge_id,
                old,
                new,
            });
        }
        for change in repositions {
            record(scene, &mut update.changes, change);
        }
    }

    // Phase 4: re-anchor implicit hydrogens of moved atoms and their
    // neighbors. The preferred side is recorded even when it matches the
    // current one so undo restores every inspected atom.
    let orientation_targets = moved_and_neighbors(scene, structure_id, &really_moved);
    {
        let mut orientations: Vec<SceneChange> = Vec::new();
        let Some(s) = scene.structure(structure_id) else {
            return update;
        };
        for &atom_id in &orientation_targets {
            let Some(atom) = s.enabled_atom(atom_id) else {
                continue;
            };
            if atom.implicit_hydrogens == 0 {
                continue;
            }
            orientations.push(SceneChange::SetHydrogenOrientation {
                structure: structure_id,
                atom: atom_id,
                old: atom.hydrogen_orientation,
                new: s.preferred_hydrogen_orientation(atom_id),
            });
        }
        for change in orientations {
            record(scene, &mut update.changes, change);
        }
    }

    // Phase 5: re-anchor residue labels the same way. Only protein-side
    // atoms carrying a residue name have a label anchor; plain element
    // labels never grow one.
    {
        let mut sides: Vec<SceneChange> = Vec::new();
        let Some(s) = scene.structure(structure_id) else {
            return update;
        };
        for &atom_id in &orientation_targets {
            let Some(atom) = s.enabled_atom(atom_id) else {
                continue;
            };
            if atom.residue_label.is_none() {
                continue;
            }
            sides.push(SceneChange::SetLabelSide {
                structure: structure_id,
                atom: atom_id,
                old: atom.label_side,
                new: Some(s.preferred_label_side(atom_id)),
            });
        }
        for change in sides {
            record(scene, &mut update.changes, change);
        }
    }

    // Phase 6: aromatic rings containing moved atoms. Shift the ring
    // center first, then settle each member edge's inner line against it.
    // Edges repositioned in phase 3 chose their line before the center
    // moved, so they are revisited here through the recorded cases.
    let mut aromatic_rings: Vec<RingId> = Vec::new();
    let mut plain_rings: Vec<RingId> = Vec::new();
    {
        let Some(s) = scene.structure(structure_id) else {
            return update;
        };
        for ring in s.rings() {
            if !really_moved.iter().any(|a| ring.contains_atom(*a)) {
                continue;
            }
            if ring.aromatic {
                aromatic_rings.push(ring.id);
            } else {
                plain_rings.push(ring.id);
            }
        }
        aromatic_rings.sort_unstable();
        plain_rings.sort_unstable();
    }
    for ring_id in aromatic_rings {
        let mut batch: Vec<SceneChange> = Vec::new();
        {
            let Some(s) = scene.structure(structure_id) else {
                continue;
            };
            let Some(ring) = s.ring(ring_id) else { continue };
            let Some(new_center) = s.ring_center_of(ring_id) else {
                continue;
            };
            if ring.center != new_center {
                batch.push(SceneChange::SetRingCenter {
                    structure: structure_id,
                    ring: ring_id,
                    old: ring.center,
                    new: new_center,
                });
            }
            for &edge_id in &ring.edges {
                if !s.edge_is_live(edge_id) {
                    continue;
                }
                let Some(edge) = s.edge(edge_id) else { continue };
                if !edge.kind.has_inner_line() {
                    continue;
                }
                let (Some(a), Some(b)) = (s.atom(edge.from), s.atom(edge.to)) else {
                    continue;
                };
                let settled =
                    compute_edge_geometry(a.coords, b.coords, edge.kind, Some(new_center)).inner;
                // The pre-batch line comes from the phase-3 case when the
                // edge was repositioned, from the edge itself otherwise.
                let old = match inner_cases.get(&edge_id) {
                    Some(cases) => cases.new,
                    None => edge.inner,
                };
                if settled != old {
                    batch.push(SceneChange::AromaticInner {
                        structure: structure_id,
                        edge: edge_id,
                        old,
                        new: settled,
                    });
                }
            }
        }
        for change in batch {
            record(scene, &mut update.changes, change);
        }
    }

    // Phase 7: centers of non-aromatic rings containing moved atoms.
    for ring_id in plain_rings {
        let change = {
            let Some(s) = scene.structure(structure_id) else {
                continue;
            };
            let Some(ring) = s.ring(ring_id) else { continue };
            let Some(new_center) = s.ring_center_of(ring_id) else {
                continue;
            };
            if ring.center == new_center {
                continue;
            }
            SceneChange::SetRingCenter {
                structure: structure_id,
                ring: ring_id,
                old: ring.center,
                new: new_center,
            }
        };
        record(scene, &mut update.changes, change);
    }

    // Phase 8: centers of ring systems containing moved atoms.
    {
        let mut centers: Vec<SceneChange> = Vec::new();
        let Some(s) = scene.structure(structure_id) else {
            return update;
        };
        let moved: Vec<AtomId> = really_moved.iter().copied().collect();
        let mut systems = s.ring_systems_containing(&moved);
        systems.sort_unstable();
        for system_id in systems {
            let Some(system) = s.ring_system(system_id) else {
                continue;
            };
            let new_center = s.centroid_of(&system.atoms);
            if system.center != new_center {
                centers.push(SceneChange::SetRingSystemCenter {
                    structure: structure_id,
                    system: system_id,
                    old: system.center,
                    new: new_center,
                });
            }
        }
        for change in centers {
            record(scene, &mut update.changes, change);
        }
    }

    // Phase 9: refresh draw limits of moved atoms and feed the extreme
    // deltas into the structure and global boundary trackers. Growth is
    // taken immediately; shrinks only set rescan hints.
    {
        let mut moved: Vec<AtomId> = really_moved.iter().copied().collect();
        moved.sort_unstable();
        for atom_id in moved {
            record(
                scene,
                &mut update.changes,
                SceneChange::RecomputeDrawLimits {
                    structure: structure_id,
                    atom: atom_id,
                },
            );
            let Some(s) = scene.structure_mut(structure_id) else {
                continue;
            };
            let Some(atom) = s.atom(atom_id) else { continue };
            let new_limits = atom.draw_limits;
            let old = old_limits
                .get(&atom_id)
                .copied()
                .unwrap_or(new_limits);
            for which in Extreme::ALL {
                s.boundary
                    .update_extreme(which, old.extreme(which), new_limits.extreme(which));
            }
            for which in Extreme::ALL {
                scene
                    .boundary
                    .update_extreme(which, old.extreme(which), new_limits.extreme(which));
            }
        }
    }

    // Phase 10: which intermolecular connections must follow.
    update.affected = scene.affected_connections(structure_id, &really_moved);
    update
}

/// The moved atoms plus every enabled neighbor of a moved atom.
fn moved_and_neighbors(
    scene: &Scene,
    structure_id: StructureId,
    moved: &AHashSet<AtomId>,
) -> Vec<AtomId> {
    let Some(s) = scene.structure(structure_id) else {
        return Vec::new();
    };
    let mut out: AHashSet<AtomId> = moved.clone();
    for &atom in moved {
        out.extend(s.neighbors(atom));
    }
    let mut out: Vec<AtomId> = out.into_iter().collect();
    out.sort_unstable();
    out
}
