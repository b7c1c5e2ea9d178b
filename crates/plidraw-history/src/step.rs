//! History steps and action tags

use bitflags::bitflags;

bitflags! {
    /// Semantic tags of a history step.
    ///
    /// Tags describe which categories of change a user action produced; they
    /// drive external notification only, never replay logic. The absence of
    /// a tag means that category of change did not occur in the step.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct ActionTags: u32 {
        /// Geometry or structural change (moves, flips, boundary updates)
        const SCENE_CHANGE = 0x01;
        /// Atom/edge recoloring
        const COLOR_CHANGE = 0x02;
        /// Elements added to the scene
        const ADD = 0x04;
        /// Elements removed from the scene
        const REMOVE = 0x08;
        /// Hydrophobic-contact control point change
        const SPLINE_CHANGE = 0x10;
        /// Annotation move
        const ANNOTATION_CHANGE = 0x20;
    }
}

/// One atomic, undoable batch of change units.
///
/// Invariant: applying all changes in order reproduces the step's effect;
/// reverting them in reverse order fully undoes it.
#[derive(Debug, Clone)]
pub struct HistoryStep<C> {
    changes: Vec<C>,
    tags: ActionTags,
}

impl<C> Default for HistoryStep<C> {
    fn default() -> Self {
        HistoryStep {
            changes: Vec::new(),
            tags: ActionTags::empty(),
        }
    }
}

impl<C> HistoryStep<C> {
    /// Create an empty step.
    pub fn new() -> Self {
        HistoryStep::default()
    }

    /// Append one change.
    pub fn push(&mut self, change: C, tags: ActionTags) {
        self.changes.push(change);
        self.tags |= tags;
    }

    /// Append many changes under one tag set.
    pub fn extend(&mut self, changes: impl IntoIterator<Item = C>, tags: ActionTags) {
        let before = self.changes.len();
        self.changes.extend(changes);
        if self.changes.len() > before {
            self.tags |= tags;
        }
    }

    /// Whether the step carries no changes. Empty steps are never committed.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    /// Number of change units.
    #[inline]
    pub fn len(&self) -> usize {
        self.changes.len()
    }

    /// The accumulated action tags.
    #[inline]
    pub fn tags(&self) -> ActionTags {
        self.tags
    }

    /// The change units in application order.
    #[inline]
    pub fn changes(&self) -> &[C] {
        &self.changes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tags_accumulate() {
        let mut step: HistoryStep<i32> = HistoryStep::new();
        assert!(step.is_empty());
        step.push(1, ActionTags::SCENE_CHANGE);
        step.push(2, ActionTags::COLOR_CHANGE);
        assert_eq!(step.len(), 2);
        assert_eq!(
            step.tags(),
            ActionTags::SCENE_CHANGE | ActionTags::COLOR_CHANGE
        );
    }

    #[test]
    fn test_extend_empty_adds_no_tag() {
        let mut step: HistoryStep<i32> = HistoryStep::new();
        step.extend(std::iter::empty(), ActionTags::REMOVE);
        assert!(step.tags().is_empty());
    }
}
