//! End-to-end editing tests: requests in, history steps out, undo/redo
//! restoring earlier states exactly.

use ahash::AHashMap;
use plidraw_geom::Vec2;
use plidraw_history::ActionTags;
use plidraw_mol::{
    Atom, AtomId, EdgeId, EdgeType, Element, PiStackingId, RingId, Structure, StructureId,
};
use plidraw_scene::{
    AddRequest, ColorChange, CoordinateChanges, Drawer, InteractionMode, PiStacking,
    RemoveRequest, RingRef, SceneChange, SceneChangeRequest,
};

fn benzene(id: u32, offset: Vec2) -> Structure {
    let mut s = Structure::new(StructureId::new(id), format!("benzene-{id}"));
    for i in 0..6u32 {
        let angle = std::f32::consts::FRAC_PI_3 * i as f32;
        let coords = offset + Vec2::new(angle.cos(), angle.sin()) * 1.4;
        s.add_atom(Atom::new(AtomId::new(i), Element::Carbon, coords))
            .unwrap();
    }
    for i in 0..6u32 {
        s.add_edge(
            EdgeId::new(i),
            AtomId::new(i),
            AtomId::new((i + 1) % 6),
            EdgeType::Aromatic,
        )
        .unwrap();
    }
    s.add_ring(RingId::new(0), (0..6).map(AtomId::new).collect(), true)
        .unwrap();
    s.rebuild_ring_systems();
    s
}

fn add_request(structures: Vec<Structure>) -> SceneChangeRequest {
    SceneChangeRequest {
        add: Some(AddRequest {
            structures,
            ..Default::default()
        }),
        ..Default::default()
    }
}

fn move_request(structure: u32, moves: &[(u32, Vec2)]) -> SceneChangeRequest {
    let mut request = SceneChangeRequest::new();
    request.coordinate_changes.insert(
        StructureId::new(structure),
        CoordinateChanges {
            new_coordinates: moves
                .iter()
                .map(|&(a, c)| (AtomId::new(a), c))
                .collect(),
            is_flip: false,
        },
    );
    request
}

#[test]
fn noop_request_records_nothing() {
    let mut drawer = Drawer::new();
    drawer.apply_scene_changes(&add_request(vec![benzene(1, Vec2::zero())]));
    assert!(drawer.can_undo());

    // Echoing current coordinates back is a no-op.
    let current = drawer
        .scene()
        .structure(StructureId::new(1))
        .unwrap()
        .atom(AtomId::new(0))
        .unwrap()
        .coords;
    let tags = drawer.apply_scene_changes(&move_request(1, &[(0, current)]));
    assert!(tags.is_empty());
    // Only the add is undoable.
    drawer.undo().unwrap();
    assert!(!drawer.can_undo());
}

#[test]
fn add_move_undo_twice_empties_the_scene() {
    let mut drawer = Drawer::new();
    let tags = drawer.apply_scene_changes(&add_request(vec![benzene(1, Vec2::zero())]));
    assert!(tags.contains(ActionTags::ADD));

    let tags = drawer.apply_scene_changes(&move_request(1, &[(0, Vec2::new(5.0, 5.0))]));
    assert!(tags.contains(ActionTags::SCENE_CHANGE));

    drawer.undo().unwrap();
    drawer.undo().unwrap();
    assert_eq!(drawer.scene().structure_count(), 0);
    assert!(!drawer.can_undo());

    drawer.redo().unwrap();
    drawer.redo().unwrap();
    assert_eq!(drawer.scene().structure_count(), 1);
    assert_eq!(
        drawer
            .scene()
            .structure(StructureId::new(1))
            .unwrap()
            .atom(AtomId::new(0))
            .unwrap()
            .coords,
        Vec2::new(5.0, 5.0)
    );
}

#[test]
fn undo_redo_roundtrip_is_bit_identical() {
    let mut drawer = Drawer::new();
    drawer.apply_scene_changes(&add_request(vec![benzene(1, Vec2::zero())]));

    let coords_before: AHashMap<AtomId, Vec2> = drawer
        .scene()
        .structure(StructureId::new(1))
        .unwrap()
        .atoms()
        .map(|a| (a.id, a.coords))
        .collect();
    let bounds_before = *drawer
        .scene()
        .structure(StructureId::new(1))
        .unwrap()
        .boundary
        .bounds();
    let global_before = *drawer.scene().boundary.bounds();
    let center_before = drawer
        .scene()
        .structure(StructureId::new(1))
        .unwrap()
        .ring(RingId::new(0))
        .unwrap()
        .center;

    drawer.apply_scene_changes(&move_request(
        1,
        &[(0, Vec2::new(8.0, -3.0)), (1, Vec2::new(9.0, -2.0))],
    ));
    drawer.undo().unwrap();

    let s = drawer.scene().structure(StructureId::new(1)).unwrap();
    for atom in s.atoms() {
        assert_eq!(atom.coords, coords_before[&atom.id], "atom {}", atom.id);
    }
    assert_eq!(*s.boundary.bounds(), bounds_before);
    assert_eq!(*drawer.scene().boundary.bounds(), global_before);
    assert_eq!(s.ring(RingId::new(0)).unwrap().center, center_before);
    assert!(drawer.can_redo());
}

#[test]
fn mirror_flip_is_self_inverse() {
    let mut drawer = Drawer::new();
    let mut s = Structure::new(StructureId::new(1), "wedge");
    s.add_atom(Atom::new(AtomId::new(0), Element::Carbon, Vec2::zero()))
        .unwrap();
    s.add_atom(Atom::new(AtomId::new(1), Element::Carbon, Vec2::new(2.0, 0.0)))
        .unwrap();
    s.add_edge(
        EdgeId::new(0),
        AtomId::new(0),
        AtomId::new(1),
        EdgeType::StereoBack,
    )
    .unwrap();
    drawer.apply_scene_changes(&add_request(vec![s]));

    let mut flip = move_request(1, &[(1, Vec2::new(2.0, 2.0))]);
    flip.coordinate_changes
        .get_mut(&StructureId::new(1))
        .unwrap()
        .is_flip = true;
    drawer.apply_scene_changes(&flip);
    assert_eq!(
        drawer
            .scene()
            .structure(StructureId::new(1))
            .unwrap()
            .edge(EdgeId::new(0))
            .unwrap()
            .kind,
        EdgeType::StereoBackReverse
    );

    // Mirror back: the wedge returns to its original direction.
    let mut flip_back = move_request(1, &[(1, Vec2::new(2.0, 0.0))]);
    flip_back
        .coordinate_changes
        .get_mut(&StructureId::new(1))
        .unwrap()
        .is_flip = true;
    drawer.apply_scene_changes(&flip_back);
    assert_eq!(
        drawer
            .scene()
            .structure(StructureId::new(1))
            .unwrap()
            .edge(EdgeId::new(0))
            .unwrap()
            .kind,
        EdgeType::StereoBack
    );
}

#[test]
fn boundary_grows_on_move_and_tightens_after_removal() {
    let mut drawer = Drawer::new();
    drawer.apply_scene_changes(&add_request(vec![benzene(1, Vec2::zero())]));

    drawer.apply_scene_changes(&move_request(1, &[(0, Vec2::new(20.0, 0.0))]));
    let grown = *drawer
        .scene()
        .structure(StructureId::new(1))
        .unwrap()
        .boundary
        .bounds();
    assert!(grown.x_max >= 20.0);

    // Removing the far-out atom triggers a rescan that tightens x_max.
    let request = SceneChangeRequest {
        remove: Some(RemoveRequest {
            atoms: vec![(StructureId::new(1), AtomId::new(0))],
            ..Default::default()
        }),
        ..Default::default()
    };
    let tags = drawer.apply_scene_changes(&request);
    assert!(tags.contains(ActionTags::REMOVE));
    let tightened = *drawer
        .scene()
        .structure(StructureId::new(1))
        .unwrap()
        .boundary
        .bounds();
    assert!(tightened.x_max < grown.x_max);
    assert_eq!(*drawer.scene().boundary.bounds(), tightened);

    // Undo restores the grown bounds exactly.
    drawer.undo().unwrap();
    assert_eq!(
        *drawer
            .scene()
            .structure(StructureId::new(1))
            .unwrap()
            .boundary
            .bounds(),
        grown
    );
}

#[test]
fn aromatic_ring_move_updates_center_and_inner_lines() {
    let mut drawer = Drawer::new();
    drawer.apply_scene_changes(&add_request(vec![benzene(1, Vec2::zero())]));
    let center_before = drawer
        .scene()
        .structure(StructureId::new(1))
        .unwrap()
        .ring(RingId::new(0))
        .unwrap()
        .center;

    drawer.apply_scene_changes(&move_request(1, &[(0, Vec2::new(3.0, 1.0))]));

    let s = drawer.scene().structure(StructureId::new(1)).unwrap();
    let ring = s.ring(RingId::new(0)).unwrap();
    assert_ne!(ring.center, center_before);
    // The ring system follows its only ring.
    let system = s.ring_systems().next().unwrap();
    assert_eq!(system.center, ring.center);
    // Inner lines of the moved atom's edges sit on the ring side.
    for &edge_id in &ring.edges {
        let edge = s.edge(edge_id).unwrap();
        assert!(edge.inner.is_some(), "edge {edge_id} lost its inner line");
    }
}

#[test]
fn bond_mirror_repositions_every_pi_stacking() {
    let mut drawer = Drawer::new();
    drawer.apply_scene_changes(&add_request(vec![
        benzene(1, Vec2::zero()),
        benzene(2, Vec2::new(10.0, 0.0)),
        benzene(3, Vec2::new(0.0, 10.0)),
    ]));
    for (i, target) in [2u32, 3, 2].into_iter().enumerate() {
        drawer.scene_mut().connections.insert_pi_stacking(PiStacking {
            id: PiStackingId::new(i as u32),
            from: RingRef {
                structure: StructureId::new(1),
                ring: RingId::new(0),
            },
            to: RingRef {
                structure: StructureId::new(target),
                ring: RingId::new(0),
            },
            draw_from: Vec2::zero(),
            draw_to: Vec2::zero(),
        });
    }
    drawer.scene_mut().interaction_mode = InteractionMode::BondMirror;

    // Mirror mode drags every connection of the structure along, no
    // matter which atom moved.
    drawer.apply_scene_changes(&move_request(1, &[(4, Vec2::new(-4.0, -4.0))]));

    for i in 0..3u32 {
        let p = drawer
            .scene()
            .connections
            .pi_stacking(PiStackingId::new(i))
            .unwrap();
        assert_ne!((p.draw_from, p.draw_to), (Vec2::zero(), Vec2::zero()));
    }
}

#[test]
fn recolor_records_color_tag_and_skips_invalid_hex() {
    let mut drawer = Drawer::new();
    drawer.apply_scene_changes(&add_request(vec![benzene(1, Vec2::zero())]));

    let request = SceneChangeRequest {
        color_changes: vec![
            ColorChange {
                structure: StructureId::new(1),
                atom: AtomId::new(0),
                color: "#ff0000".into(),
            },
            ColorChange {
                structure: StructureId::new(1),
                atom: AtomId::new(1),
                color: "not-a-color".into(),
            },
        ],
        ..Default::default()
    };
    let tags = drawer.apply_scene_changes(&request);
    assert_eq!(tags, ActionTags::COLOR_CHANGE);

    let s = drawer.scene().structure(StructureId::new(1)).unwrap();
    assert_eq!(s.atom(AtomId::new(0)).unwrap().color.to_hex(), "#ff0000");
    assert_eq!(
        s.atom(AtomId::new(1)).unwrap().color,
        Element::Carbon.default_color()
    );

    drawer.undo().unwrap();
    let s = drawer.scene().structure(StructureId::new(1)).unwrap();
    assert_eq!(
        s.atom(AtomId::new(0)).unwrap().color,
        Element::Carbon.default_color()
    );
}

#[test]
fn reset_structure_restores_add_time_layout() {
    let mut drawer = Drawer::new();
    drawer.apply_scene_changes(&add_request(vec![benzene(1, Vec2::zero())]));
    let original: AHashMap<AtomId, Vec2> = drawer
        .scene()
        .structure(StructureId::new(1))
        .unwrap()
        .atoms()
        .map(|a| (a.id, a.coords))
        .collect();

    drawer.apply_scene_changes(&move_request(
        1,
        &[(0, Vec2::new(7.0, 7.0)), (3, Vec2::new(-7.0, 2.0))],
    ));
    let tags = drawer.reset_structure(StructureId::new(1)).unwrap();
    assert!(tags.contains(ActionTags::SCENE_CHANGE));

    let s = drawer.scene().structure(StructureId::new(1)).unwrap();
    for atom in s.atoms() {
        assert_eq!(atom.coords, original[&atom.id]);
    }

    // The reset itself is one undoable step.
    drawer.undo().unwrap();
    assert_eq!(
        drawer
            .scene()
            .structure(StructureId::new(1))
            .unwrap()
            .atom(AtomId::new(0))
            .unwrap()
            .coords,
        Vec2::new(7.0, 7.0)
    );
}

#[test]
fn redo_tail_is_dropped_after_a_new_step() {
    let mut drawer = Drawer::new();
    drawer.apply_scene_changes(&add_request(vec![benzene(1, Vec2::zero())]));
    drawer.apply_scene_changes(&move_request(1, &[(0, Vec2::new(5.0, 0.0))]));
    drawer.undo().unwrap();
    assert!(drawer.can_redo());

    drawer.apply_scene_changes(&move_request(1, &[(0, Vec2::new(0.0, 5.0))]));
    assert!(!drawer.can_redo());
    assert!(drawer.redo().is_err());
}

#[test]
fn remove_structure_then_undo_revives_connections() {
    let mut drawer = Drawer::new();
    drawer.apply_scene_changes(&add_request(vec![
        benzene(1, Vec2::zero()),
        benzene(2, Vec2::new(10.0, 0.0)),
    ]));
    drawer.scene_mut().connections.insert_pi_stacking(PiStacking {
        id: PiStackingId::new(0),
        from: RingRef {
            structure: StructureId::new(1),
            ring: RingId::new(0),
        },
        to: RingRef {
            structure: StructureId::new(2),
            ring: RingId::new(0),
        },
        draw_from: Vec2::zero(),
        draw_to: Vec2::new(10.0, 0.0),
    });

    let request = SceneChangeRequest {
        remove: Some(RemoveRequest {
            structures: vec![StructureId::new(2)],
            ..Default::default()
        }),
        ..Default::default()
    };
    drawer.apply_scene_changes(&request);
    assert_eq!(drawer.scene().structure_count(), 1);
    assert!(drawer
        .scene()
        .connections
        .pi_stacking(PiStackingId::new(0))
        .is_none());

    drawer.undo().unwrap();
    assert_eq!(drawer.scene().structure_count(), 2);
    assert!(drawer
        .scene()
        .connections
        .pi_stacking(PiStackingId::new(0))
        .is_some());
}

#[test]
fn history_steps_carry_applied_changes() {
    // The recorded step holds the same changes the scene already shows;
    // a manual replay over a fresh clone must land in the same state.
    let mut drawer = Drawer::new();
    drawer.apply_scene_changes(&add_request(vec![benzene(1, Vec2::zero())]));

    let before = drawer.scene().clone();
    drawer.apply_scene_changes(&move_request(1, &[(2, Vec2::new(6.0, 6.0))]));

    let mut replayed = before;
    if let Some(step) = drawer_last_step(&drawer) {
        use plidraw_history::ChangeUnit;
        for change in step {
            change.apply(&mut replayed);
        }
    }
    assert_eq!(
        replayed
            .structure(StructureId::new(1))
            .unwrap()
            .atom(AtomId::new(2))
            .unwrap()
            .coords,
        drawer
            .scene()
            .structure(StructureId::new(1))
            .unwrap()
            .atom(AtomId::new(2))
            .unwrap()
            .coords
    );
}

fn drawer_last_step(drawer: &Drawer) -> Option<&[SceneChange]> {
    drawer.last_step().map(|s| s.changes())
}
