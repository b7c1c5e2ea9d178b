//! The history log
//!
//! An ordered sequence of committed steps plus a cursor partitioning applied
//! from not-yet-applied (undone) steps. Committing truncates the redo tail,
//! so redo is only ever valid immediately after one or more undos with no
//! intervening commit.

use thiserror::Error;

use crate::step::HistoryStep;
use crate::ChangeUnit;

/// Precondition failures of the history log.
///
/// These are raised before any change unit is touched; the log and target
/// are never left partially mutated by a rejected call.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum HistoryError {
    /// Undo called with no applied step
    #[error("Nothing to undo")]
    NothingToUndo,

    /// Redo called with no undone step
    #[error("Nothing to redo")]
    NothingToRedo,
}

/// Result type for history operations.
pub type HistoryResult<T> = Result<T, HistoryError>;

/// Undo/redo log over steps of change units.
#[derive(Debug, Clone)]
pub struct HistoryLog<C> {
    steps: Vec<HistoryStep<C>>,
    /// Number of applied steps; steps at `cursor..` are undone.
    cursor: usize,
}

impl<C> Default for HistoryLog<C> {
    fn default() -> Self {
        HistoryLog {
            steps: Vec::new(),
            cursor: 0,
        }
    }
}

impl<C> HistoryLog<C> {
    pub fn new() -> Self {
        HistoryLog::default()
    }

    /// Whether an undo is currently possible.
    #[inline]
    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    /// Whether a redo is currently possible.
    #[inline]
    pub fn can_redo(&self) -> bool {
        self.cursor < self.steps.len()
    }

    /// Total number of stored steps (applied and undone).
    #[inline]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// The most recently applied step.
    pub fn last_applied(&self) -> Option<&HistoryStep<C>> {
        self.cursor.checked_sub(1).and_then(|i| self.steps.get(i))
    }

    /// Commit a step whose changes have already been applied eagerly.
    ///
    /// Truncates any undone-but-not-redone tail. Empty steps are rejected by
    /// the caller (the orchestrator never records them); committing one here
    /// would make undo a surprising no-op, so it is ignored.
    pub fn commit(&mut self, step: HistoryStep<C>) {
        if step.is_empty() {
            return;
        }
        self.steps.truncate(self.cursor);
        self.steps.push(step);
        self.cursor += 1;
    }
}

impl<C: ChangeUnit> HistoryLog<C> {
    /// Undo the most recent applied step, reverting its changes in strict
    /// reverse order.
    pub fn undo(&mut self, target: &mut C::Target) -> HistoryResult<&HistoryStep<C>> {
        if self.cursor == 0 {
            return Err(HistoryError::NothingToUndo);
        }
        self.cursor -= 1;
        let step = &self.steps[self.cursor];
        for change in step.changes().iter().rev() {
            change.revert(target);
        }
        Ok(step)
    }

    /// Re-apply the most recently undone step in original order.
    pub fn redo(&mut self, target: &mut C::Target) -> HistoryResult<&HistoryStep<C>> {
        if self.cursor >= self.steps.len() {
            return Err(HistoryError::NothingToRedo);
        }
        let step = &self.steps[self.cursor];
        for change in step.changes() {
            change.apply(target);
        }
        self.cursor += 1;
        Ok(step)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ActionTags;

    /// Minimal change unit over a vec of counters.
    struct SetValue {
        slot: usize,
        old: i64,
        new: i64,
    }

    impl ChangeUnit for SetValue {
        type Target = Vec<i64>;

        fn apply(&self, target: &mut Vec<i64>) {
            target[self.slot] = self.new;
        }

        fn revert(&self, target: &mut Vec<i64>) {
            target[self.slot] = self.old;
        }
    }

    fn step_setting(slot: usize, old: i64, new: i64) -> HistoryStep<SetValue> {
        let mut step = HistoryStep::new();
        step.push(SetValue { slot, old, new }, ActionTags::SCENE_CHANGE);
        step
    }

    #[test]
    fn test_undo_redo_roundtrip() {
        let mut target = vec![0, 0];
        let mut log = HistoryLog::new();

        target[0] = 5;
        log.commit(step_setting(0, 0, 5));
        target[1] = 7;
        log.commit(step_setting(1, 0, 7));

        log.undo(&mut target).unwrap();
        assert_eq!(target, vec![5, 0]);
        log.undo(&mut target).unwrap();
        assert_eq!(target, vec![0, 0]);

        log.redo(&mut target).unwrap();
        log.redo(&mut target).unwrap();
        assert_eq!(target, vec![5, 7]);
    }

    #[test]
    fn test_preconditions_touch_nothing() {
        let mut target = vec![1];
        let mut log: HistoryLog<SetValue> = HistoryLog::new();
        assert_eq!(log.undo(&mut target).err(), Some(HistoryError::NothingToUndo));
        assert_eq!(log.redo(&mut target).err(), Some(HistoryError::NothingToRedo));
        assert_eq!(target, vec![1]);
    }

    #[test]
    fn test_commit_truncates_redo_tail() {
        let mut target = vec![0];
        let mut log = HistoryLog::new();

        target[0] = 1;
        log.commit(step_setting(0, 0, 1));
        target[0] = 2;
        log.commit(step_setting(0, 1, 2));

        log.undo(&mut target).unwrap();
        assert_eq!(target, vec![1]);
        assert!(log.can_redo());

        // A new commit invalidates the redo tail.
        target[0] = 9;
        log.commit(step_setting(0, 1, 9));
        assert!(!log.can_redo());
        assert_eq!(log.redo(&mut target).err(), Some(HistoryError::NothingToRedo));
        assert_eq!(log.len(), 2);
    }

    #[test]
    fn test_reverse_order_revert() {
        // Two changes to the same slot in one step: revert must run in
        // reverse order to restore the initial value.
        let mut target = vec![0];
        let mut log = HistoryLog::new();

        let mut step = HistoryStep::new();
        step.push(SetValue { slot: 0, old: 0, new: 3 }, ActionTags::SCENE_CHANGE);
        step.push(SetValue { slot: 0, old: 3, new: 8 }, ActionTags::SCENE_CHANGE);
        target[0] = 8;
        log.commit(step);

        log.undo(&mut target).unwrap();
        assert_eq!(target, vec![0]);
        log.redo(&mut target).unwrap();
        assert_eq!(target, vec![8]);
    }

    #[test]
    fn test_empty_step_not_recorded() {
        let mut log: HistoryLog<SetValue> = HistoryLog::new();
        log.commit(HistoryStep::new());
        assert!(log.is_empty());
        assert!(!log.can_undo());
    }
}
