//! Removal resolution
//!
//! Removals never erase molecular data: atoms and edges are disabled so a
//! later undo can re-enable them in place, and whole structures are retired
//! from the live set. Each requested removal fans out into consequences,
//! all applied eagerly and returned as change units: incident edges of a
//! removed atom go down with it, a carbon left without any live bond is
//! cleaned up, connections anchored to removed elements disappear, and the
//! boundary trackers are told which extremes may have shrunk.

use ahash::AHashMap;
use log::debug;
use plidraw_geom::Extreme;
use plidraw_history::ChangeUnit;
use plidraw_mol::{AtomId, EdgeId, StructureId};

use crate::change::SceneChange;
use crate::interaction::ConnectionBatch;
use crate::request::RemoveRequest;
use crate::scene::Scene;

fn record(scene: &mut Scene, changes: &mut Vec<SceneChange>, change: SceneChange) {
    change.apply(scene);
    changes.push(change);
}

/// Resolve a removal request into applied change units.
pub fn resolve_removals(scene: &mut Scene, request: &RemoveRequest) -> Vec<SceneChange> {
    let mut changes = Vec::new();

    remove_structures(scene, request, &mut changes);
    remove_atoms_and_edges(scene, request, &mut changes);
    remove_annotations(scene, request, &mut changes);
    remove_listed_connections(scene, request, &mut changes);

    changes
}

fn remove_structures(scene: &mut Scene, request: &RemoveRequest, changes: &mut Vec<SceneChange>) {
    for &structure_id in &request.structures {
        let Some(s) = scene.structure(structure_id) else {
            debug!("removal of unknown structure {structure_id}");
            continue;
        };
        let bounds = *s.boundary.bounds();

        let batch = scene.connections.batch_of_structure(structure_id);
        if !batch.is_empty() {
            record(
                scene,
                changes,
                SceneChange::RemoveConnections {
                    batch: Box::new(batch),
                },
            );
        }
        record(scene, changes, SceneChange::RemoveStructure {
            structure: structure_id,
        });
        for which in Extreme::ALL {
            scene.boundary.note_removed(which, bounds.extreme(which));
        }
    }
}

fn remove_atoms_and_edges(
    scene: &mut Scene,
    request: &RemoveRequest,
    changes: &mut Vec<SceneChange>,
) {
    // Group explicit atom and edge removals per structure so cleanup and
    // connection pruning run once per structure.
    let mut atoms_by_structure: AHashMap<StructureId, Vec<AtomId>> = AHashMap::new();
    for &(structure, atom) in &request.atoms {
        atoms_by_structure.entry(structure).or_default().push(atom);
    }
    let mut edges_by_structure: AHashMap<StructureId, Vec<EdgeId>> = AHashMap::new();
    for &(structure, edge) in &request.edges {
        edges_by_structure.entry(structure).or_default().push(edge);
    }
    let mut structure_ids: Vec<StructureId> = atoms_by_structure
        .keys()
        .chain(edges_by_structure.keys())
        .copied()
        .collect();
    structure_ids.sort_unstable();
    structure_ids.dedup();

    for structure_id in structure_ids {
        let mut removed_atoms: Vec<AtomId> = Vec::new();

        // Explicit atoms plus their incident edges.
        for atom_id in atoms_by_structure.remove(&structure_id).unwrap_or_default() {
            let Some(s) = scene.structure(structure_id) else {
                continue;
            };
            let Some(atom) = s.enabled_atom(atom_id) else {
                continue;
            };
            let limits = atom.draw_limits;
            let incident: Vec<EdgeId> = s
                .edges_at(atom_id)
                .iter()
                .copied()
                .filter(|&e| s.edge(e).is_some_and(|edge| edge.enabled))
                .collect();

            record(scene, changes, SceneChange::SetAtomEnabled {
                structure: structure_id,
                atom: atom_id,
                on_apply: false,
            });
            removed_atoms.push(atom_id);
            note_atom_removed(scene, structure_id, limits);

            for edge_id in incident {
                record(scene, changes, SceneChange::SetEdgeEnabled {
                    structure: structure_id,
                    edge: edge_id,
                    on_apply: false,
                });
            }
        }

        // Explicit edges.
        for edge_id in edges_by_structure.remove(&structure_id).unwrap_or_default() {
            let enabled = scene
                .structure(structure_id)
                .and_then(|s| s.edge(edge_id))
                .is_some_and(|e| e.enabled);
            if !enabled {
                continue;
            }
            record(scene, changes, SceneChange::SetEdgeEnabled {
                structure: structure_id,
                edge: edge_id,
                on_apply: false,
            });
        }

        removed_atoms.extend(cleanup_bare_carbons(scene, structure_id, changes));

        if !removed_atoms.is_empty() {
            prune_connections_of_atoms(scene, structure_id, &removed_atoms, changes);
        }
    }
}

/// Disable carbons left without a single live bond by this removal round.
/// Plain carbon vertices only exist as bond junctions; heteroatoms and
/// carbons carrying implicit hydrogens stay.
fn cleanup_bare_carbons(
    scene: &mut Scene,
    structure_id: StructureId,
    changes: &mut Vec<SceneChange>,
) -> Vec<AtomId> {
    let mut bare: Vec<AtomId> = Vec::new();
    if let Some(s) = scene.structure(structure_id) {
        for atom in s.enabled_atoms() {
            if !atom.element.is_carbon() || atom.implicit_hydrogens > 0 {
                continue;
            }
            let has_live_edge = s.edges_at(atom.id).iter().any(|&e| s.edge_is_live(e));
            let has_any_edge = !s.edges_at(atom.id).is_empty();
            if has_any_edge && !has_live_edge {
                bare.push(atom.id);
            }
        }
        bare.sort_unstable();
    }
    for &atom_id in &bare {
        let limits = scene
            .structure(structure_id)
            .and_then(|s| s.atom(atom_id))
            .map(|a| a.draw_limits);
        record(scene, changes, SceneChange::SetAtomEnabled {
            structure: structure_id,
            atom: atom_id,
            on_apply: false,
        });
        if let Some(limits) = limits {
            note_atom_removed(scene, structure_id, limits);
        }
    }
    bare
}

fn note_atom_removed(scene: &mut Scene, structure_id: StructureId, limits: plidraw_geom::Bounds) {
    if let Some(s) = scene.structure_mut(structure_id) {
        for which in Extreme::ALL {
            s.boundary.note_removed(which, limits.extreme(which));
        }
    }
    for which in Extreme::ALL {
        scene.boundary.note_removed(which, limits.extreme(which));
    }
}

/// Remove every connection referencing one of the removed atoms, or a ring
/// that contained one of them.
fn prune_connections_of_atoms(
    scene: &mut Scene,
    structure_id: StructureId,
    removed: &[AtomId],
    changes: &mut Vec<SceneChange>,
) {
    let mut batch = ConnectionBatch::default();
    {
        let Some(index) = scene.connections.index_of(structure_id) else {
            return;
        };
        let hit_atom = |a: &crate::interaction::AtomRef| {
            a.structure == structure_id && removed.contains(&a.atom)
        };
        let hit_ring = |r: &crate::interaction::RingRef| {
            r.structure == structure_id
                && scene
                    .structure(structure_id)
                    .and_then(|s| s.ring(r.ring))
                    .is_some_and(|ring| removed.iter().any(|a| ring.contains_atom(*a)))
        };

        for &id in &index.distances {
            if let Some(d) = scene.connections.distance(id) {
                if hit_atom(&d.from) || hit_atom(&d.to) {
                    batch.distances.push(d.clone());
                }
            }
        }
        for &id in &index.interactions {
            if let Some(i) = scene.connections.interaction(id) {
                if hit_atom(&i.from) || hit_atom(&i.to) {
                    batch.interactions.push(i.clone());
                }
            }
        }
        for &id in &index.atom_pairs {
            if let Some(p) = scene.connections.atom_pair(id) {
                if hit_atom(&p.from) || hit_atom(&p.to) {
                    batch.atom_pairs.push(p.clone());
                }
            }
        }
        for &id in &index.pi_stackings {
            if let Some(p) = scene.connections.pi_stacking(id) {
                if hit_ring(&p.from) || hit_ring(&p.to) {
                    batch.pi_stackings.push(p.clone());
                }
            }
        }
        for &id in &index.cation_pis {
            if let Some(c) = scene.connections.cation_pi(id) {
                if hit_atom(&c.cation) || hit_ring(&c.ring) {
                    batch.cation_pis.push(c.clone());
                }
            }
        }
    }
    if !batch.is_empty() {
        debug!(
            "structure {structure_id}: pruning {} connections after atom removal",
            batch.distances.len()
                + batch.interactions.len()
                + batch.atom_pairs.len()
                + batch.pi_stackings.len()
                + batch.cation_pis.len()
        );
        record(scene, changes, SceneChange::RemoveConnections {
            batch: Box::new(batch),
        });
    }
}

fn remove_annotations(scene: &mut Scene, request: &RemoveRequest, changes: &mut Vec<SceneChange>) {
    for &id in &request.annotations {
        let Some(annotation) = scene.annotation(id).cloned() else {
            continue;
        };
        record(scene, changes, SceneChange::RemoveAnnotation { annotation });
    }
}

fn remove_listed_connections(
    scene: &mut Scene,
    request: &RemoveRequest,
    changes: &mut Vec<SceneChange>,
) {
    let mut batch = ConnectionBatch::default();
    for &id in &request.atom_pair_interactions {
        if let Some(p) = scene.connections.atom_pair(id) {
            batch.atom_pairs.push(p.clone());
        }
    }
    for &id in &request.pi_stackings {
        if let Some(p) = scene.connections.pi_stacking(id) {
            batch.pi_stackings.push(p.clone());
        }
    }
    for &id in &request.cation_pi_stackings {
        if let Some(c) = scene.connections.cation_pi(id) {
            batch.cation_pis.push(c.clone());
        }
    }
    for &id in &request.hydrophobic_contacts {
        if let Some(h) = scene.connections.hydrophobic_contact(id) {
            batch.hydrophobic_contacts.push(h.clone());
        }
    }
    if !batch.is_empty() {
        record(scene, changes, SceneChange::RemoveConnections {
            batch: Box::new(batch),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use plidraw_geom::Vec2;
    use plidraw_mol::{Atom, EdgeType, Element, Structure};

    /// O(0) - C(1) - C(2) - N(3); atom 2 is a bare carbon junction.
    fn chain() -> Scene {
        let mut s = Structure::new(StructureId::new(1), "chain");
        let elements = [
            Element::Oxygen,
            Element::Carbon,
            Element::Carbon,
            Element::Nitrogen,
        ];
        for (i, e) in elements.into_iter().enumerate() {
            s.add_atom(Atom::new(
                AtomId::new(i as u32),
                e,
                Vec2::new(i as f32 * 2.0, 0.0),
            ))
            .unwrap();
        }
        for i in 0..3u32 {
            s.add_edge(
                EdgeId::new(i),
                AtomId::new(i),
                AtomId::new(i + 1),
                EdgeType::Single,
            )
            .unwrap();
        }
        s.rescan_boundary();
        let mut scene = Scene::new();
        scene.insert_structure(s);
        scene
    }

    #[test]
    fn test_atom_removal_disables_incident_edges() {
        let mut scene = chain();
        let request = RemoveRequest {
            atoms: vec![(StructureId::new(1), AtomId::new(3))],
            ..Default::default()
        };
        let changes = resolve_removals(&mut scene, &request);
        assert!(!changes.is_empty());

        let s = scene.structure(StructureId::new(1)).unwrap();
        assert!(!s.atom(AtomId::new(3)).unwrap().enabled);
        assert!(!s.edge(EdgeId::new(2)).unwrap().enabled);
        // Atom 2 still holds a live bond to atom 1, so it stays.
        assert!(s.atom(AtomId::new(2)).unwrap().enabled);
    }

    #[test]
    fn test_bare_carbon_cleanup() {
        let mut scene = chain();
        // Removing 1 and 3 strips every live bond from carbon 2.
        let request = RemoveRequest {
            atoms: vec![
                (StructureId::new(1), AtomId::new(1)),
                (StructureId::new(1), AtomId::new(3)),
            ],
            ..Default::default()
        };
        resolve_removals(&mut scene, &request);

        let s = scene.structure(StructureId::new(1)).unwrap();
        assert!(!s.atom(AtomId::new(2)).unwrap().enabled);
        // Oxygen 0 lost its bonds too but is not a bare carbon.
        assert!(s.atom(AtomId::new(0)).unwrap().enabled);
        assert!(s.boundary.needs_rescan());
    }

    #[test]
    fn test_removals_revert_in_place() {
        let mut scene = chain();
        let request = RemoveRequest {
            atoms: vec![(StructureId::new(1), AtomId::new(0))],
            ..Default::default()
        };
        let changes = resolve_removals(&mut scene, &request);
        for change in changes.iter().rev() {
            change.revert(&mut scene);
        }
        let s = scene.structure(StructureId::new(1)).unwrap();
        assert!(s.atom(AtomId::new(0)).unwrap().enabled);
        assert!(s.edge(EdgeId::new(0)).unwrap().enabled);
    }

    #[test]
    fn test_structure_removal_retires_and_flags_rescan() {
        let mut scene = chain();
        scene.boundary = plidraw_geom::BoundaryTracker::from_bounds(
            *scene
                .structure(StructureId::new(1))
                .unwrap()
                .boundary
                .bounds(),
        );
        let request = RemoveRequest {
            structures: vec![StructureId::new(1)],
            ..Default::default()
        };
        let changes = resolve_removals(&mut scene, &request);
        assert!(changes
            .iter()
            .any(|c| matches!(c, SceneChange::RemoveStructure { .. })));
        assert!(scene.structure(StructureId::new(1)).is_none());
        assert!(scene.boundary.needs_rescan());
    }
}
