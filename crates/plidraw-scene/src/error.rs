//! Error types for the scene crate

use thiserror::Error;

use plidraw_history::HistoryError;
use plidraw_mol::StructureId;

/// Scene-level errors.
///
/// Stale references inside a batch are never errors (they are silently
/// skipped); this type covers genuine precondition failures of the public
/// entry points.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SceneError {
    /// Structure id not present in the scene
    #[error("Structure not found: {0}")]
    StructureNotFound(StructureId),

    /// A structure with this id already exists
    #[error("Structure already exists: {0}")]
    StructureExists(StructureId),

    /// Reset requested for a structure without an add-time snapshot
    #[error("Structure {0} has no original snapshot")]
    NoOriginal(StructureId),

    /// Undo/redo precondition failure
    #[error(transparent)]
    History(#[from] HistoryError),
}

/// Result type for scene operations.
pub type SceneResult<T> = Result<T, SceneError>;
