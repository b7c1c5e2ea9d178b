//! Edit requests
//!
//! External callers describe one user action as a [`SceneChangeRequest`]:
//! coordinate updates per structure, color recolors, spline and annotation
//! moves, and optional add/remove sections. The coordinate-facing parts
//! deserialize straight from JSON so a frontend can hand batches over the
//! wire; the add section carries fully built values and stays native.

use ahash::AHashMap;
use plidraw_geom::Vec2;
use plidraw_mol::{
    AnnotationId, AtomId, AtomPairId, CationPiId, EdgeId, HydrophobicContactId, PiStackingId,
    Structure, StructureId,
};
use serde::{Deserialize, Serialize};

use crate::interaction::ConnectionBatch;
use crate::scene::Annotation;

/// New coordinates for some atoms of one structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CoordinateChanges {
    pub new_coordinates: AHashMap<AtomId, Vec2>,
    /// Whether this update came from a mirror interaction; flips the wedge
    /// direction of stereo bonds incident to moved atoms.
    #[serde(default)]
    pub is_flip: bool,
}

/// Recolor one atom. The color is a hex string (`"#rrggbb"`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColorChange {
    pub structure: StructureId,
    pub atom: AtomId,
    pub color: String,
}

/// Move one control point of a hydrophobic contact spline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SplinePointChange {
    pub contact: HydrophobicContactId,
    pub index: usize,
    pub coords: Vec2,
}

/// Move one annotation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnnotationMove {
    pub annotation: AnnotationId,
    pub coords: Vec2,
}

/// Elements to remove from the scene.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RemoveRequest {
    #[serde(default)]
    pub structures: Vec<StructureId>,
    #[serde(default)]
    pub atoms: Vec<(StructureId, AtomId)>,
    #[serde(default)]
    pub edges: Vec<(StructureId, EdgeId)>,
    #[serde(default)]
    pub annotations: Vec<AnnotationId>,
    #[serde(default)]
    pub atom_pair_interactions: Vec<AtomPairId>,
    #[serde(default)]
    pub pi_stackings: Vec<PiStackingId>,
    #[serde(default)]
    pub cation_pi_stackings: Vec<CationPiId>,
    #[serde(default)]
    pub hydrophobic_contacts: Vec<HydrophobicContactId>,
}

impl RemoveRequest {
    pub fn is_empty(&self) -> bool {
        self.structures.is_empty()
            && self.atoms.is_empty()
            && self.edges.is_empty()
            && self.annotations.is_empty()
            && self.atom_pair_interactions.is_empty()
            && self.pi_stackings.is_empty()
            && self.cation_pi_stackings.is_empty()
            && self.hydrophobic_contacts.is_empty()
    }
}

/// Elements to add to the scene, already built.
#[derive(Debug, Clone, Default)]
pub struct AddRequest {
    pub structures: Vec<Structure>,
    pub annotations: Vec<Annotation>,
    pub connections: ConnectionBatch,
}

impl AddRequest {
    pub fn is_empty(&self) -> bool {
        self.structures.is_empty() && self.annotations.is_empty() && self.connections.is_empty()
    }
}

/// One full user action against the scene.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SceneChangeRequest {
    #[serde(default)]
    pub color_changes: Vec<ColorChange>,
    #[serde(default)]
    pub coordinate_changes: AHashMap<StructureId, CoordinateChanges>,
    #[serde(default)]
    pub spline_coordinate_changes: Vec<SplinePointChange>,
    #[serde(default)]
    pub annotation_coordinate_changes: Vec<AnnotationMove>,
    #[serde(default)]
    pub remove: Option<RemoveRequest>,
    /// Built values cannot travel as JSON; adds are attached natively.
    #[serde(skip)]
    pub add: Option<AddRequest>,
}

impl SceneChangeRequest {
    pub fn new() -> Self {
        SceneChangeRequest::default()
    }

    pub fn is_empty(&self) -> bool {
        self.color_changes.is_empty()
            && self.coordinate_changes.is_empty()
            && self.spline_coordinate_changes.is_empty()
            && self.annotation_coordinate_changes.is_empty()
            && self.remove.as_ref().is_none_or(RemoveRequest::is_empty)
            && self.add.as_ref().is_none_or(AddRequest::is_empty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_from_json() {
        let json = r##"{
            "coordinate_changes": {
                "3": {
                    "new_coordinates": {
                        "0": { "x": 1.5, "y": -2.0 },
                        "4": { "x": 0.0, "y": 0.25 }
                    },
                    "is_flip": true
                }
            },
            "color_changes": [
                { "structure": 3, "atom": 0, "color": "#ff0080" }
            ]
        }"##;
        let req: SceneChangeRequest = serde_json::from_str(json).unwrap();
        assert!(!req.is_empty());
        let changes = &req.coordinate_changes[&StructureId::new(3)];
        assert!(changes.is_flip);
        assert_eq!(
            changes.new_coordinates[&AtomId::new(0)],
            Vec2::new(1.5, -2.0)
        );
        assert_eq!(req.color_changes[0].color, "#ff0080");
    }

    #[test]
    fn test_empty_request() {
        let req: SceneChangeRequest = serde_json::from_str("{}").unwrap();
        assert!(req.is_empty());
    }
}
