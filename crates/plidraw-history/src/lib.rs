//! plidraw history engine
//!
//! Command-pattern undo/redo over reversible change units:
//!
//! - [`ChangeUnit`] - a reversible primitive mutation with independent
//!   apply/revert behavior, applied to a target the log is generic over
//! - [`HistoryStep`] - one atomic, undoable batch of change units produced
//!   by a single user action, tagged with [`ActionTags`]
//! - [`HistoryLog`] - the step sequence with an undo/redo cursor
//!
//! Changes are data, not closures: the concrete change type is a tagged
//! union supplied by the consumer, and apply/revert is a single interpreter
//! dispatching on it. That keeps every variant exhaustively unit-testable.

mod log;
mod step;

pub use log::{HistoryError, HistoryLog, HistoryResult};
pub use step::{ActionTags, HistoryStep};

/// A reversible unit of mutation.
///
/// Invariant: `apply` and `revert` must be inverse operations on the
/// target's observable state. They may be distinct functions - the aromatic
/// inner-line update applies a forward payload and reverts a backward one -
/// but most variants simply set new/old values.
///
/// Implementations must not re-enter the history log from inside apply or
/// revert; history mutation is strictly sequential within one user action.
pub trait ChangeUnit {
    /// The state the change mutates (for plidraw, the scene).
    type Target;

    /// Apply the forward effect.
    fn apply(&self, target: &mut Self::Target);

    /// Undo the forward effect.
    fn revert(&self, target: &mut Self::Target);
}
