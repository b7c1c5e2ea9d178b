//! Scene change units
//!
//! Every mutation the editor records is one [`SceneChange`] variant carrying
//! the data for both directions of replay. The history log replays them
//! through [`ChangeUnit`]: revert for undo, apply for redo. Variants resolve
//! their targets at replay time and silently skip anything a later step
//! already removed, so partially stale steps never panic.

use plidraw_geom::{Bounds, Vec2};
use plidraw_history::ChangeUnit;
use plidraw_mol::{
    AnnotationId, AtomId, EdgeGeometry, EdgeId, InnerLine, Orientation, Representation, Rgb,
    RingId, RingSystemId, Structure, StructureId,
};

use crate::interaction::ConnectionBatch;
use crate::scene::{Annotation, Scene};

/// Which connection a [`SceneChange::RepositionConnection`] targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConnectionTarget {
    Distance(plidraw_mol::DistanceId),
    Interaction(plidraw_mol::InteractionId),
    AtomPair(plidraw_mol::AtomPairId),
    PiStacking(plidraw_mol::PiStackingId),
    CationPi(plidraw_mol::CationPiId),
}

/// One recorded mutation of the scene.
#[derive(Debug, Clone)]
pub enum SceneChange {
    /// Move an atom; also refreshes its draw limits so replay in either
    /// direction leaves them consistent with the coordinates.
    MoveAtom {
        structure: StructureId,
        atom: AtomId,
        old: Vec2,
        new: Vec2,
    },
    /// Flip a stereo edge's wedge direction. Self-inverse.
    ToggleStereo {
        structure: StructureId,
        edge: EdgeId,
    },
    /// Replace an edge's draw geometry (trimmed endpoints plus inner line).
    RepositionEdge {
        structure: StructureId,
        edge: EdgeId,
        old: EdgeGeometry,
        new: EdgeGeometry,
    },
    /// Replace only the inner line of an aromatic edge.
    AromaticInner {
        structure: StructureId,
        edge: EdgeId,
        old: Option<InnerLine>,
        new: Option<InnerLine>,
    },
    SetHydrogenOrientation {
        structure: StructureId,
        atom: AtomId,
        old: Orientation,
        new: Orientation,
    },
    SetLabelSide {
        structure: StructureId,
        atom: AtomId,
        old: Option<Orientation>,
        new: Option<Orientation>,
    },
    SetRingCenter {
        structure: StructureId,
        ring: RingId,
        old: Vec2,
        new: Vec2,
    },
    SetRingSystemCenter {
        structure: StructureId,
        system: RingSystemId,
        old: Vec2,
        new: Vec2,
    },
    /// Recompute an atom's draw limits from its current state. Idempotent,
    /// the same in both directions.
    RecomputeDrawLimits {
        structure: StructureId,
        atom: AtomId,
    },
    SetAtomColor {
        structure: StructureId,
        atom: AtomId,
        old: Rgb,
        new: Rgb,
    },
    /// Flip an atom's enabled flag; `on_apply` is the state after apply.
    SetAtomEnabled {
        structure: StructureId,
        atom: AtomId,
        on_apply: bool,
    },
    SetEdgeEnabled {
        structure: StructureId,
        edge: EdgeId,
        on_apply: bool,
    },
    /// Insert a full structure. Revert erases it from the scene entirely.
    AddStructure { structure: Box<Structure> },
    /// Retire a structure from the live set; revert revives it.
    RemoveStructure { structure: StructureId },
    AddAnnotation { annotation: Annotation },
    RemoveAnnotation { annotation: Annotation },
    MoveAnnotation {
        annotation: AnnotationId,
        old: Vec2,
        new: Vec2,
    },
    /// Move one control point of a hydrophobic contact and resample its
    /// curve.
    MoveSplinePoint {
        contact: plidraw_mol::HydrophobicContactId,
        index: usize,
        old: Vec2,
        new: Vec2,
    },
    AddConnections { batch: Box<ConnectionBatch> },
    RemoveConnections { batch: Box<ConnectionBatch> },
    RepositionConnection {
        target: ConnectionTarget,
        old: (Vec2, Vec2),
        new: (Vec2, Vec2),
    },
    SetStructureCircle {
        structure: StructureId,
        old: Option<(Vec2, f32)>,
        new: Option<(Vec2, f32)>,
    },
    /// Replace a structure's tracked bounds (after growth or a rescan).
    SetStructureBounds {
        structure: StructureId,
        old: Bounds,
        new: Bounds,
    },
    /// Replace the scene-wide bounds.
    SetGlobalBounds { old: Bounds, new: Bounds },
}

impl SceneChange {
    fn move_atom(scene: &mut Scene, structure: StructureId, atom: AtomId, to: Vec2) {
        if let Some(s) = scene.structure_raw_mut(structure) {
            if let Some(a) = s.atom_mut(atom) {
                a.coords = to;
                a.recompute_draw_limits();
            }
        }
    }

    fn set_connection_endpoints(scene: &mut Scene, target: ConnectionTarget, ends: (Vec2, Vec2)) {
        let c = &mut scene.connections;
        match target {
            ConnectionTarget::Distance(id) => {
                if let Some(d) = c.distance_mut(id) {
                    d.draw_from = ends.0;
                    d.draw_to = ends.1;
                }
            }
            ConnectionTarget::Interaction(id) => {
                if let Some(i) = c.interaction_mut(id) {
                    i.draw_from = ends.0;
                    i.draw_to = ends.1;
                }
            }
            ConnectionTarget::AtomPair(id) => {
                if let Some(p) = c.atom_pair_mut(id) {
                    p.draw_from = ends.0;
                    p.draw_to = ends.1;
                }
            }
            ConnectionTarget::PiStacking(id) => {
                if let Some(p) = c.pi_stacking_mut(id) {
                    p.draw_from = ends.0;
                    p.draw_to = ends.1;
                }
            }
            ConnectionTarget::CationPi(id) => {
                if let Some(cp) = c.cation_pi_mut(id) {
                    cp.draw_from = ends.0;
                    cp.draw_to = ends.1;
                }
            }
        }
    }

    fn set_circle(scene: &mut Scene, structure: StructureId, circle: Option<(Vec2, f32)>) {
        if let Some(s) = scene.structure_raw_mut(structure) {
            s.representation = match circle {
                Some((center, radius)) => Representation::Circle { center, radius },
                None => Representation::Default,
            };
        }
    }

    fn move_spline_point(
        scene: &mut Scene,
        contact: plidraw_mol::HydrophobicContactId,
        index: usize,
        to: Vec2,
    ) {
        if let Some(h) = scene.connections.hydrophobic_contact_mut(contact) {
            if let Some(p) = h.control_points.get_mut(index) {
                *p = to;
                h.resample();
            }
        }
    }
}

impl ChangeUnit for SceneChange {
    type Target = Scene;

    fn apply(&self, scene: &mut Scene) {
        match self {
            SceneChange::MoveAtom {
                structure, atom, new, ..
            } => Self::move_atom(scene, *structure, *atom, *new),
            SceneChange::ToggleStereo { structure, edge } => {
                if let Some(s) = scene.structure_raw_mut(*structure) {
                    if let Some(e) = s.edge_mut(*edge) {
                        e.kind = e.kind.flipped();
                    }
                }
            }
            SceneChange::RepositionEdge {
                structure, edge, new, ..
            } => {
                if let Some(s) = scene.structure_raw_mut(*structure) {
                    if let Some(e) = s.edge_mut(*edge) {
                        e.set_geometry(*new);
                    }
                }
            }
            SceneChange::AromaticInner {
                structure, edge, new, ..
            } => {
                if let Some(s) = scene.structure_raw_mut(*structure) {
                    if let Some(e) = s.edge_mut(*edge) {
                        e.inner = *new;
                    }
                }
            }
            SceneChange::SetHydrogenOrientation {
                structure, atom, new, ..
            } => {
                if let Some(s) = scene.structure_raw_mut(*structure) {
                    if let Some(a) = s.atom_mut(*atom) {
                        a.hydrogen_orientation = *new;
                        a.recompute_draw_limits();
                    }
                }
            }
            SceneChange::SetLabelSide {
                structure, atom, new, ..
            } => {
                if let Some(s) = scene.structure_raw_mut(*structure) {
                    if let Some(a) = s.atom_mut(*atom) {
                        a.label_side = *new;
                        a.recompute_draw_limits();
                    }
                }
            }
            SceneChange::SetRingCenter {
                structure, ring, new, ..
            } => {
                if let Some(s) = scene.structure_raw_mut(*structure) {
                    if let Some(r) = s.ring_mut(*ring) {
                        r.center = *new;
                    }
                }
            }
            SceneChange::SetRingSystemCenter {
                structure, system, new, ..
            } => {
                if let Some(s) = scene.structure_raw_mut(*structure) {
                    if let Some(rs) = s.ring_system_mut(*system) {
                        rs.center = *new;
                    }
                }
            }
            SceneChange::RecomputeDrawLimits { structure, atom } => {
                if let Some(s) = scene.structure_raw_mut(*structure) {
                    if let Some(a) = s.atom_mut(*atom) {
                        a.recompute_draw_limits();
                    }
                }
            }
            SceneChange::SetAtomColor {
                structure, atom, new, ..
            } => {
                if let Some(s) = scene.structure_raw_mut(*structure) {
                    if let Some(a) = s.atom_mut(*atom) {
                        a.color = *new;
                    }
                }
            }
            SceneChange::SetAtomEnabled {
                structure,
                atom,
                on_apply,
            } => {
                if let Some(s) = scene.structure_raw_mut(*structure) {
                    if let Some(a) = s.atom_mut(*atom) {
                        a.enabled = *on_apply;
                    }
                }
            }
            SceneChange::SetEdgeEnabled {
                structure,
                edge,
                on_apply,
            } => {
                if let Some(s) = scene.structure_raw_mut(*structure) {
                    if let Some(e) = s.edge_mut(*edge) {
                        e.enabled = *on_apply;
                    }
                }
            }
            SceneChange::AddStructure { structure } => {
                scene.insert_structure((**structure).clone());
            }
            SceneChange::RemoveStructure { structure } => {
                scene.retire_structure(*structure);
            }
            SceneChange::AddAnnotation { annotation } => {
                scene.insert_annotation(annotation.clone());
            }
            SceneChange::RemoveAnnotation { annotation } => {
                scene.remove_annotation(annotation.id);
            }
            SceneChange::MoveAnnotation { annotation, new, .. } => {
                if let Some(a) = scene.annotation_mut(*annotation) {
                    a.coords = *new;
                }
            }
            SceneChange::MoveSplinePoint {
                contact, index, new, ..
            } => Self::move_spline_point(scene, *contact, *index, *new),
            SceneChange::AddConnections { batch } => {
                scene.connections.insert_batch(batch);
            }
            SceneChange::RemoveConnections { batch } => {
                scene.connections.remove_batch(batch);
            }
            SceneChange::RepositionConnection { target, new, .. } => {
                Self::set_connection_endpoints(scene, *target, *new);
            }
            SceneChange::SetStructureCircle {
                structure, new, ..
            } => Self::set_circle(scene, *structure, *new),
            SceneChange::SetStructureBounds {
                structure, new, ..
            } => {
                if let Some(s) = scene.structure_raw_mut(*structure) {
                    s.boundary = plidraw_geom::BoundaryTracker::from_bounds(*new);
                }
            }
            SceneChange::SetGlobalBounds { new, .. } => {
                scene.boundary = plidraw_geom::BoundaryTracker::from_bounds(*new);
            }
        }
    }

    fn revert(&self, scene: &mut Scene) {
        match self {
            SceneChange::MoveAtom {
                structure, atom, old, ..
            } => Self::move_atom(scene, *structure, *atom, *old),
            // A double flip is the identity, so revert is apply.
            SceneChange::ToggleStereo { .. } => self.apply(scene),
            SceneChange::RepositionEdge {
                structure, edge, old, ..
            } => {
                if let Some(s) = scene.structure_raw_mut(*structure) {
                    if let Some(e) = s.edge_mut(*edge) {
                        e.set_geometry(*old);
                    }
                }
            }
            SceneChange::AromaticInner {
                structure, edge, old, ..
            } => {
                if let Some(s) = scene.structure_raw_mut(*structure) {
                    if let Some(e) = s.edge_mut(*edge) {
                        e.inner = *old;
                    }
                }
            }
            SceneChange::SetHydrogenOrientation {
                structure, atom, old, ..
            } => {
                if let Some(s) = scene.structure_raw_mut(*structure) {
                    if let Some(a) = s.atom_mut(*atom) {
                        a.hydrogen_orientation = *old;
                        a.recompute_draw_limits();
                    }
                }
            }
            SceneChange::SetLabelSide {
                structure, atom, old, ..
            } => {
                if let Some(s) = scene.structure_raw_mut(*structure) {
                    if let Some(a) = s.atom_mut(*atom) {
                        a.label_side = *old;
                        a.recompute_draw_limits();
                    }
                }
            }
            SceneChange::SetRingCenter {
                structure, ring, old, ..
            } => {
                if let Some(s) = scene.structure_raw_mut(*structure) {
                    if let Some(r) = s.ring_mut(*ring) {
                        r.center = *old;
                    }
                }
            }
            SceneChange::SetRingSystemCenter {
                structure, system, old, ..
            } => {
                if let Some(s) = scene.structure_raw_mut(*structure) {
                    if let Some(rs) = s.ring_system_mut(*system) {
                        rs.center = *old;
                    }
                }
            }
            SceneChange::RecomputeDrawLimits { .. } => self.apply(scene),
            SceneChange::SetAtomColor {
                structure, atom, old, ..
            } => {
                if let Some(s) = scene.structure_raw_mut(*structure) {
                    if let Some(a) = s.atom_mut(*atom) {
                        a.color = *old;
                    }
                }
            }
            SceneChange::SetAtomEnabled {
                structure,
                atom,
                on_apply,
            } => {
                if let Some(s) = scene.structure_raw_mut(*structure) {
                    if let Some(a) = s.atom_mut(*atom) {
                        a.enabled = !*on_apply;
                    }
                }
            }
            SceneChange::SetEdgeEnabled {
                structure,
                edge,
                on_apply,
            } => {
                if let Some(s) = scene.structure_raw_mut(*structure) {
                    if let Some(e) = s.edge_mut(*edge) {
                        e.enabled = !*on_apply;
                    }
                }
            }
            SceneChange::AddStructure { structure } => {
                scene.erase_structure(structure.id);
            }
            SceneChange::RemoveStructure { structure } => {
                scene.revive_structure(*structure);
            }
            SceneChange::AddAnnotation { annotation } => {
                scene.remove_annotation(annotation.id);
            }
            SceneChange::RemoveAnnotation { annotation } => {
                scene.insert_annotation(annotation.clone());
            }
            SceneChange::MoveAnnotation { annotation, old, .. } => {
                if let Some(a) = scene.annotation_mut(*annotation) {
                    a.coords = *old;
                }
            }
            SceneChange::MoveSplinePoint {
                contact, index, old, ..
            } => Self::move_spline_point(scene, *contact, *index, *old),
            SceneChange::AddConnections { batch } => {
                scene.connections.remove_batch(batch);
            }
            SceneChange::RemoveConnections { batch } => {
                scene.connections.insert_batch(batch);
            }
            SceneChange::RepositionConnection { target, old, .. } => {
                Self::set_connection_endpoints(scene, *target, *old);
            }
            SceneChange::SetStructureCircle {
                structure, old, ..
            } => Self::set_circle(scene, *structure, *old),
            SceneChange::SetStructureBounds {
                structure, old, ..
            } => {
                if let Some(s) = scene.structure_raw_mut(*structure) {
                    s.boundary = plidraw_geom::BoundaryTracker::from_bounds(*old);
                }
            }
            SceneChange::SetGlobalBounds { old, .. } => {
                scene.boundary = plidraw_geom::BoundaryTracker::from_bounds(*old);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use plidraw_mol::{Atom, EdgeType, Element};

    fn one_atom_scene() -> Scene {
        let mut s = Structure::new(StructureId::new(1), "m");
        s.add_atom(Atom::new(AtomId::new(0), Element::Nitrogen, Vec2::new(1.0, 2.0)))
            .unwrap();
        s.add_atom(Atom::new(AtomId::new(1), Element::Carbon, Vec2::new(3.0, 2.0)))
            .unwrap();
        s.add_edge(
            EdgeId::new(0),
            AtomId::new(0),
            AtomId::new(1),
            EdgeType::StereoFront,
        )
        .unwrap();
        let mut scene = Scene::new();
        scene.insert_structure(s);
        scene
    }

    #[test]
    fn test_move_atom_roundtrip_restores_draw_limits() {
        let mut scene = one_atom_scene();
        let before = scene
            .structure(StructureId::new(1))
            .unwrap()
            .atom(AtomId::new(0))
            .unwrap()
            .clone();

        let change = SceneChange::MoveAtom {
            structure: StructureId::new(1),
            atom: AtomId::new(0),
            old: Vec2::new(1.0, 2.0),
            new: Vec2::new(10.0, -4.0),
        };
        change.apply(&mut scene);
        let moved = scene
            .structure(StructureId::new(1))
            .unwrap()
            .atom(AtomId::new(0))
            .unwrap();
        assert_eq!(moved.coords, Vec2::new(10.0, -4.0));
        assert_ne!(moved.draw_limits, before.draw_limits);

        change.revert(&mut scene);
        let back = scene
            .structure(StructureId::new(1))
            .unwrap()
            .atom(AtomId::new(0))
            .unwrap();
        assert_eq!(back.coords, before.coords);
        assert_eq!(back.draw_limits, before.draw_limits);
    }

    #[test]
    fn test_toggle_stereo_is_self_inverse() {
        let mut scene = one_atom_scene();
        let change = SceneChange::ToggleStereo {
            structure: StructureId::new(1),
            edge: EdgeId::new(0),
        };
        change.apply(&mut scene);
        assert_eq!(
            scene
                .structure(StructureId::new(1))
                .unwrap()
                .edge(EdgeId::new(0))
                .unwrap()
                .kind,
            EdgeType::StereoFrontReverse
        );
        change.revert(&mut scene);
        assert_eq!(
            scene
                .structure(StructureId::new(1))
                .unwrap()
                .edge(EdgeId::new(0))
                .unwrap()
                .kind,
            EdgeType::StereoFront
        );
    }

    #[test]
    fn test_stale_reference_is_skipped() {
        let mut scene = one_atom_scene();
        let change = SceneChange::MoveAtom {
            structure: StructureId::new(7),
            atom: AtomId::new(0),
            old: Vec2::zero(),
            new: Vec2::new(1.0, 1.0),
        };
        // Unknown structure: no panic, no effect.
        change.apply(&mut scene);
        change.revert(&mut scene);
    }

    #[test]
    fn test_add_structure_revert_erases() {
        let mut scene = Scene::new();
        let s = {
            let mut s = Structure::new(StructureId::new(4), "x");
            s.add_atom(Atom::new(AtomId::new(0), Element::Oxygen, Vec2::zero()))
                .unwrap();
            s
        };
        let change = SceneChange::AddStructure {
            structure: Box::new(s),
        };
        change.apply(&mut scene);
        assert_eq!(scene.structure_count(), 1);
        change.revert(&mut scene);
        assert_eq!(scene.structure_count(), 0);
        assert!(scene.structure_raw_mut(StructureId::new(4)).is_none());
    }
}
