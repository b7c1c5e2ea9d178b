//! plidraw scene editing
//!
//! The top crate of the drawer: it owns the [`Scene`] (structures,
//! annotations, intermolecular connections, global boundary), resolves
//! user edits into replayable [`SceneChange`] units, and keeps the undo
//! history.
//!
//! - [`scene`] - the aggregate state and affected-connection queries
//! - [`interaction`] - intermolecular connection types and their store
//! - [`change`] - the change units the history replays
//! - [`request`] - the serde-facing batch request records
//! - [`propagate`] - coordinate propagation for one structure
//! - [`remove`] - removal resolution (disable, cleanup, prune)
//! - [`orchestrate`] - the [`Drawer`] tying one request to one history
//!   step
//!
//! The editing entry point is [`Drawer::apply_scene_changes`]; everything
//! it does lands in the history as one step and replays through
//! [`Drawer::undo`] and [`Drawer::redo`].

pub mod change;
pub mod error;
pub mod interaction;
pub mod orchestrate;
pub mod propagate;
pub mod remove;
pub mod request;
pub mod scene;

pub use change::{ConnectionTarget, SceneChange};
pub use error::{SceneError, SceneResult};
pub use interaction::{
    AffectedConnections, AtomPairInteraction, AtomRef, CationPiStacking, ConnectionBatch,
    ConnectionStore, Distance, HydrophobicContact, Interaction, InteractionMode, PiStacking,
    RingRef, SPLINE_SUBDIVISIONS,
};
pub use orchestrate::Drawer;
pub use propagate::{apply_coordinate_changes, CoordinateUpdate, EdgeInnerCases};
pub use remove::resolve_removals;
pub use request::{
    AddRequest, AnnotationMove, ColorChange, CoordinateChanges, RemoveRequest,
    SceneChangeRequest, SplinePointChange,
};
pub use scene::{Annotation, Scene};
