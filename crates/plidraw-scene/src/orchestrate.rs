//! The drawer
//!
//! [`Drawer`] owns the scene and its history and turns one
//! [`SceneChangeRequest`] into one undoable history step. Requests are
//! processed in a fixed order so later stages see the effects of earlier
//! ones: adds first, then removals, then per-structure coordinate
//! propagation, then boundary and circle upkeep, spline and annotation
//! moves, connection repositioning, recolors, and the global boundary.
//! Every stage applies its changes immediately and only records them;
//! committing the step never replays anything.

use ahash::AHashMap;
use log::{debug, warn};
use plidraw_geom::{BoundaryTracker, Bounds};
use plidraw_history::{ActionTags, ChangeUnit, HistoryLog, HistoryStep};
use plidraw_mol::{Rgb, StructureId};

use crate::change::{ConnectionTarget, SceneChange};
use crate::error::{SceneError, SceneResult};
use crate::interaction::AffectedConnections;
use crate::propagate::apply_coordinate_changes;
use crate::remove::resolve_removals;
use crate::request::SceneChangeRequest;
use crate::scene::Scene;

/// The interaction drawer: scene state plus undo/redo history.
#[derive(Debug, Default)]
pub struct Drawer {
    scene: Scene,
    history: HistoryLog<SceneChange>,
}

impl Drawer {
    pub fn new() -> Self {
        Drawer::default()
    }

    #[inline]
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Mutable scene access for setup (loading a fresh diagram, switching
    /// interaction modes). Edits made here bypass the history.
    #[inline]
    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    #[inline]
    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    #[inline]
    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// The most recently applied step, if any.
    pub fn last_step(&self) -> Option<&HistoryStep<SceneChange>> {
        self.history.last_applied()
    }

    /// Process one user action. Returns the tags of the recorded step;
    /// empty tags mean the request was a no-op and nothing was recorded.
    pub fn apply_scene_changes(&mut self, request: &SceneChangeRequest) -> ActionTags {
        let mut step: HistoryStep<SceneChange> = HistoryStep::new();

        // Structure bounds before the batch, for boundary diffing at the
        // end. Structures added by this batch have no entry and diff
        // against their own fresh bounds.
        let mut bounds_before: AHashMap<StructureId, Bounds> = AHashMap::new();
        for s in self.scene.structures() {
            bounds_before.insert(s.id, *s.boundary.bounds());
        }
        let global_before = *self.scene.boundary.bounds();

        self.apply_adds(request, &mut step);
        self.apply_removals(request, &mut step);
        let affected = self.apply_coordinates(request, &mut step);
        self.refresh_boundaries(&bounds_before, &mut step);
        self.apply_spline_moves(request, &mut step);
        self.apply_annotation_moves(request, &mut step);
        self.reposition_connections(&affected, &mut step);
        self.apply_recolors(request, &mut step);
        self.refresh_global_boundary(global_before, &mut step);

        let tags = step.tags();
        self.history.commit(step);
        tags
    }

    /// Undo the last recorded step.
    pub fn undo(&mut self) -> SceneResult<ActionTags> {
        let step = self.history.undo(&mut self.scene)?;
        Ok(step.tags())
    }

    /// Redo the last undone step.
    pub fn redo(&mut self) -> SceneResult<ActionTags> {
        let step = self.history.redo(&mut self.scene)?;
        Ok(step.tags())
    }

    /// Move every atom of a structure back to its original layout, as one
    /// undoable step.
    pub fn reset_structure(&mut self, id: StructureId) -> SceneResult<ActionTags> {
        let original_coords: AHashMap<_, _> = {
            let s = self
                .scene
                .structure(id)
                .ok_or(SceneError::StructureNotFound(id))?;
            let original = s.original().ok_or(SceneError::NoOriginal(id))?;
            original.atoms().map(|a| (a.id, a.coords)).collect()
        };
        let mut request = SceneChangeRequest::new();
        request.coordinate_changes.insert(
            id,
            crate::request::CoordinateChanges {
                new_coordinates: original_coords,
                is_flip: false,
            },
        );
        Ok(self.apply_scene_changes(&request))
    }

    // =========================================================================
    // Stages
    // =========================================================================

    fn apply_adds(&mut self, request: &SceneChangeRequest, step: &mut HistoryStep<SceneChange>) {
        let Some(add) = &request.add else { return };

        let mut added: Vec<StructureId> = Vec::new();
        for structure in &add.structures {
            if self.scene.is_in_use(structure.id) {
                warn!("skipping add of duplicate structure {}", structure.id);
                continue;
            }
            let mut structure = structure.clone();
            structure.rescan_boundary();
            structure.snapshot_original();
            added.push(structure.id);
            let added_bounds = *structure.boundary.bounds();
            let change = SceneChange::AddStructure {
                structure: Box::new(structure),
            };
            change.apply(&mut self.scene);
            self.scene.boundary.include(&added_bounds);
            step.push(change, ActionTags::ADD);
        }
        // Circle geometry depends on the structure's own bounds only, so
        // it can settle as soon as all adds are in.
        for id in added {
            let circle = self
                .scene
                .structure(id)
                .and_then(|s| s.circle_from_bounds());
            if let Some(circle) = circle {
                let change = SceneChange::SetStructureCircle {
                    structure: id,
                    old: None,
                    new: Some(circle),
                };
                change.apply(&mut self.scene);
                step.push(change, ActionTags::ADD);
            }
        }

        for annotation in &add.annotations {
            let change = SceneChange::AddAnnotation {
                annotation: annotation.clone(),
            };
            change.apply(&mut self.scene);
            step.push(change, ActionTags::ADD | ActionTags::ANNOTATION_CHANGE);
        }
        if !add.connections.is_empty() {
            let change = SceneChange::AddConnections {
                batch: Box::new(add.connections.clone()),
            };
            change.apply(&mut self.scene);
            step.push(change, ActionTags::ADD);
        }
    }

    fn apply_removals(
        &mut self,
        request: &SceneChangeRequest,
        step: &mut HistoryStep<SceneChange>,
    ) {
        let Some(remove) = &request.remove else { return };
        if remove.is_empty() {
            return;
        }
        let annotation_removals = !remove.annotations.is_empty();
        let changes = resolve_removals(&mut self.scene, remove);
        if changes.is_empty() {
            return;
        }
        let mut tags = ActionTags::REMOVE;
        if annotation_removals {
            tags |= ActionTags::ANNOTATION_CHANGE;
        }
        step.extend(changes, tags);
    }

    fn apply_coordinates(
        &mut self,
        request: &SceneChangeRequest,
        step: &mut HistoryStep<SceneChange>,
    ) -> AffectedConnections {
        let mut affected = AffectedConnections::default();
        let mut structure_ids: Vec<StructureId> =
            request.coordinate_changes.keys().copied().collect();
        structure_ids.sort_unstable();
        for structure_id in structure_ids {
            let changes = &request.coordinate_changes[&structure_id];
            let update = apply_coordinate_changes(
                &mut self.scene,
                structure_id,
                &changes.new_coordinates,
                changes.is_flip,
            );
            if update.changes.is_empty() {
                continue;
            }
            affected.union(&update.affected);
            step.extend(update.changes, ActionTags::SCENE_CHANGE);
        }
        affected
    }

    /// Rescan structures whose tracker flagged a possible shrink, then
    /// record every structure whose bounds differ from the pre-batch
    /// snapshot, together with the matching circle update.
    fn refresh_boundaries(
        &mut self,
        bounds_before: &AHashMap<StructureId, Bounds>,
        step: &mut HistoryStep<SceneChange>,
    ) {
        let ids: Vec<StructureId> = self.scene.structures().map(|s| s.id).collect();
        for id in ids {
            let needs_rescan = self
                .scene
                .structure(id)
                .is_some_and(|s| s.boundary.needs_rescan());
            if needs_rescan {
                debug!("rescanning boundary of structure {id}");
                if let Some(s) = self.scene.structure_mut(id) {
                    s.rescan_boundary();
                }
            }
            let Some(s) = self.scene.structure(id) else {
                continue;
            };
            let new = *s.boundary.bounds();
            let old = bounds_before.get(&id).copied().unwrap_or(new);
            if new != old {
                // Already in effect; record the transition for replay.
                step.push(
                    SceneChange::SetStructureBounds {
                        structure: id,
                        old,
                        new,
                    },
                    ActionTags::SCENE_CHANGE,
                );
                self.refresh_circle(id, step);
            }
        }
    }

    fn refresh_circle(&mut self, id: StructureId, step: &mut HistoryStep<SceneChange>) {
        let Some(s) = self.scene.structure(id) else {
            return;
        };
        let plidraw_mol::Representation::Circle { center, radius } = s.representation else {
            return;
        };
        let Some(new) = s.circle_from_bounds() else {
            return;
        };
        if new == (center, radius) {
            return;
        }
        let change = SceneChange::SetStructureCircle {
            structure: id,
            old: Some((center, radius)),
            new: Some(new),
        };
        change.apply(&mut self.scene);
        step.push(change, ActionTags::SCENE_CHANGE);
    }

    fn apply_spline_moves(
        &mut self,
        request: &SceneChangeRequest,
        step: &mut HistoryStep<SceneChange>,
    ) {
        for m in &request.spline_coordinate_changes {
            let old = self
                .scene
                .connections
                .hydrophobic_contact(m.contact)
                .and_then(|h| h.control_points.get(m.index).copied());
            let Some(old) = old else {
                warn!("spline move for unknown contact {} point {}", m.contact, m.index);
                continue;
            };
            if plidraw_geom::coords_equal(old, m.coords) {
                continue;
            }
            let change = SceneChange::MoveSplinePoint {
                contact: m.contact,
                index: m.index,
                old,
                new: m.coords,
            };
            change.apply(&mut self.scene);
            step.push(change, ActionTags::SPLINE_CHANGE);
        }
    }

    fn apply_annotation_moves(
        &mut self,
        request: &SceneChangeRequest,
        step: &mut HistoryStep<SceneChange>,
    ) {
        for m in &request.annotation_coordinate_changes {
            let Some(a) = self.scene.annotation(m.annotation) else {
                warn!("move for unknown annotation {}", m.annotation);
                continue;
            };
            if plidraw_geom::coords_equal(a.coords, m.coords) {
                continue;
            }
            let change = SceneChange::MoveAnnotation {
                annotation: m.annotation,
                old: a.coords,
                new: m.coords,
            };
            change.apply(&mut self.scene);
            step.push(change, ActionTags::ANNOTATION_CHANGE);
        }
    }

    fn reposition_connections(
        &mut self,
        affected: &AffectedConnections,
        step: &mut HistoryStep<SceneChange>,
    ) {
        let mut moves: Vec<(ConnectionTarget, (plidraw_geom::Vec2, plidraw_geom::Vec2), (plidraw_geom::Vec2, plidraw_geom::Vec2))> =
            Vec::new();
        for &id in &affected.distances {
            if let (Some(d), Some(new)) = (
                self.scene.connections.distance(id),
                self.scene.distance_endpoints(id),
            ) {
                moves.push((ConnectionTarget::Distance(id), (d.draw_from, d.draw_to), new));
            }
        }
        for &id in &affected.interactions {
            if let (Some(i), Some(new)) = (
                self.scene.connections.interaction(id),
                self.scene.interaction_endpoints(id),
            ) {
                moves.push((
                    ConnectionTarget::Interaction(id),
                    (i.draw_from, i.draw_to),
                    new,
                ));
            }
        }
        for &id in &affected.atom_pairs {
            if let (Some(p), Some(new)) = (
                self.scene.connections.atom_pair(id),
                self.scene.atom_pair_endpoints(id),
            ) {
                moves.push((ConnectionTarget::AtomPair(id), (p.draw_from, p.draw_to), new));
            }
        }
        for &id in &affected.pi_stackings {
            if let (Some(p), Some(new)) = (
                self.scene.connections.pi_stacking(id),
                self.scene.pi_stacking_endpoints(id),
            ) {
                moves.push((
                    ConnectionTarget::PiStacking(id),
                    (p.draw_from, p.draw_to),
                    new,
                ));
            }
        }
        for &id in &affected.cation_pis {
            if let (Some(c), Some(new)) = (
                self.scene.connections.cation_pi(id),
                self.scene.cation_pi_endpoints(id),
            ) {
                moves.push((ConnectionTarget::CationPi(id), (c.draw_from, c.draw_to), new));
            }
        }
        for (target, old, new) in moves {
            if old == new {
                continue;
            }
            let change = SceneChange::RepositionConnection { target, old, new };
            change.apply(&mut self.scene);
            step.push(change, ActionTags::SCENE_CHANGE);
        }
    }

    fn apply_recolors(
        &mut self,
        request: &SceneChangeRequest,
        step: &mut HistoryStep<SceneChange>,
    ) {
        for recolor in &request.color_changes {
            let Some(new) = Rgb::from_hex(&recolor.color) else {
                warn!("skipping recolor with invalid color {:?}", recolor.color);
                continue;
            };
            let old = self
                .scene
                .structure(recolor.structure)
                .and_then(|s| s.atom(recolor.atom))
                .map(|a| a.color);
            let Some(old) = old else { continue };
            if old == new {
                continue;
            }
            let change = SceneChange::SetAtomColor {
                structure: recolor.structure,
                atom: recolor.atom,
                old,
                new,
            };
            change.apply(&mut self.scene);
            step.push(change, ActionTags::COLOR_CHANGE);
        }
    }

    fn refresh_global_boundary(&mut self, before: Bounds, step: &mut HistoryStep<SceneChange>) {
        if self.scene.boundary.needs_rescan() {
            debug!("rescanning global boundary");
            let fresh = self.scene.compute_global_bounds();
            self.scene.boundary = BoundaryTracker::from_bounds(fresh);
        }
        let new = *self.scene.boundary.bounds();
        if new != before {
            step.push(
                SceneChange::SetGlobalBounds { old: before, new },
                ActionTags::SCENE_CHANGE,
            );
        }
    }
}
