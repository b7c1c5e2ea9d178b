//! Axis-aligned bounding boxes and boundary tracking
//!
//! A [`Bounds`] is a plain rectangle. A [`BoundaryTracker`] wraps one and
//! supports the drawer's incremental update protocol: moving a single atom
//! can grow an extreme immediately, but shrinking one can only be detected
//! lazily - the true new extreme requires a rescan over all elements, which
//! is deferred until a full recompute pass. The tracker therefore records a
//! [`ShrinkHint`] per extreme instead of silently holding a stale value.

use serde::{Deserialize, Serialize};
use ultraviolet::Vec2;

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub x_min: f32,
    pub x_max: f32,
    pub y_min: f32,
    pub y_max: f32,
}

impl Default for Bounds {
    fn default() -> Self {
        Bounds::EMPTY
    }
}

impl Bounds {
    /// The empty box: every include/union fixes it up.
    pub const EMPTY: Bounds = Bounds {
        x_min: f32::INFINITY,
        x_max: f32::NEG_INFINITY,
        y_min: f32::INFINITY,
        y_max: f32::NEG_INFINITY,
    };

    /// Create a box from explicit extremes.
    pub fn new(x_min: f32, x_max: f32, y_min: f32, y_max: f32) -> Self {
        Bounds {
            x_min,
            x_max,
            y_min,
            y_max,
        }
    }

    /// A zero-size box at a single point.
    pub fn at_point(p: Vec2) -> Self {
        Bounds::new(p.x, p.x, p.y, p.y)
    }

    /// Whether any point has been included yet.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.x_min > self.x_max || self.y_min > self.y_max
    }

    #[inline]
    pub fn width(&self) -> f32 {
        if self.is_empty() {
            0.0
        } else {
            self.x_max - self.x_min
        }
    }

    #[inline]
    pub fn height(&self) -> f32 {
        if self.is_empty() {
            0.0
        } else {
            self.y_max - self.y_min
        }
    }

    /// Center of the box. Origin for an empty box.
    pub fn center(&self) -> Vec2 {
        if self.is_empty() {
            Vec2::zero()
        } else {
            Vec2::new(
                (self.x_min + self.x_max) * 0.5,
                (self.y_min + self.y_max) * 0.5,
            )
        }
    }

    /// Grow to include a point.
    pub fn include_point(&mut self, p: Vec2) {
        self.x_min = self.x_min.min(p.x);
        self.x_max = self.x_max.max(p.x);
        self.y_min = self.y_min.min(p.y);
        self.y_max = self.y_max.max(p.y);
    }

    /// Grow to include another box.
    pub fn union(&mut self, other: &Bounds) {
        if other.is_empty() {
            return;
        }
        self.x_min = self.x_min.min(other.x_min);
        self.x_max = self.x_max.max(other.x_max);
        self.y_min = self.y_min.min(other.y_min);
        self.y_max = self.y_max.max(other.y_max);
    }

    /// Whether `other` fits fully inside this box.
    pub fn contains(&self, other: &Bounds) -> bool {
        !self.is_empty()
            && !other.is_empty()
            && self.x_min <= other.x_min
            && self.x_max >= other.x_max
            && self.y_min <= other.y_min
            && self.y_max >= other.y_max
    }

    /// Build a box covering an iterator of boxes.
    ///
    /// This is the pure rescan used when a tracker reports a possible shrink.
    pub fn covering<'a>(boxes: impl Iterator<Item = &'a Bounds>) -> Bounds {
        let mut out = Bounds::EMPTY;
        for b in boxes {
            out.union(b);
        }
        out
    }

    /// Read one extreme.
    #[inline]
    pub fn extreme(&self, which: Extreme) -> f32 {
        match which {
            Extreme::XMin => self.x_min,
            Extreme::XMax => self.x_max,
            Extreme::YMin => self.y_min,
            Extreme::YMax => self.y_max,
        }
    }

    fn extreme_mut(&mut self, which: Extreme) -> &mut f32 {
        match which {
            Extreme::XMin => &mut self.x_min,
            Extreme::XMax => &mut self.x_max,
            Extreme::YMin => &mut self.y_min,
            Extreme::YMax => &mut self.y_max,
        }
    }
}

/// One of the four tracked extremes of a bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Extreme {
    XMin,
    XMax,
    YMin,
    YMax,
}

impl Extreme {
    pub const ALL: [Extreme; 4] = [Extreme::XMin, Extreme::XMax, Extreme::YMin, Extreme::YMax];

    /// Whether the tracked value is a maximum (`true` for x_max/y_max) or a
    /// minimum.
    #[inline]
    pub fn largest_is_lim(&self) -> bool {
        matches!(self, Extreme::XMax | Extreme::YMax)
    }

    fn index(&self) -> usize {
        match self {
            Extreme::XMin => 0,
            Extreme::XMax => 1,
            Extreme::YMin => 2,
            Extreme::YMax => 3,
        }
    }

    /// Is `candidate` strictly more extreme than `current` for this extreme?
    #[inline]
    fn more_extreme(&self, candidate: f32, current: f32) -> bool {
        if self.largest_is_lim() {
            candidate > current
        } else {
            candidate < current
        }
    }
}

/// Shrink state of one tracked extreme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ShrinkHint {
    /// The stored value is the true extreme.
    #[default]
    Stable,
    /// The element that held the extreme moved inward or was removed; the
    /// true extreme is unknown until a rescan.
    MaybeShrunk,
}

/// Bounding-box tracker with directional monotonic update.
///
/// Guarantee: after a batch of single-element updates the tracker either
/// holds the correct new extreme or is flagged [`ShrinkHint::MaybeShrunk`]
/// for that extreme. It never silently holds a stale value.
#[derive(Debug, Clone, Default)]
pub struct BoundaryTracker {
    bounds: Bounds,
    hints: [ShrinkHint; 4],
}

impl BoundaryTracker {
    pub fn new() -> Self {
        BoundaryTracker::default()
    }

    /// Start tracking from known bounds.
    pub fn from_bounds(bounds: Bounds) -> Self {
        BoundaryTracker {
            bounds,
            hints: [ShrinkHint::Stable; 4],
        }
    }

    /// The currently tracked bounds.
    ///
    /// Only trustworthy for extremes whose hint is [`ShrinkHint::Stable`].
    #[inline]
    pub fn bounds(&self) -> &Bounds {
        &self.bounds
    }

    #[inline]
    pub fn hint(&self, which: Extreme) -> ShrinkHint {
        self.hints[which.index()]
    }

    /// Whether any extreme is flagged for a full rescan.
    pub fn needs_rescan(&self) -> bool {
        self.hints.iter().any(|h| *h == ShrinkHint::MaybeShrunk)
    }

    /// Incremental update for one extreme after an element moved.
    ///
    /// - If `new_val` is strictly more extreme than the stored value, the
    ///   stored value is updated immediately.
    /// - If `old_val` held the stored extreme and `new_val` is less extreme,
    ///   the extreme may have shrunk: flag it, defer the rescan.
    /// - Otherwise the move cannot affect this extreme.
    ///
    /// Returns `true` when the stored value or hint changed.
    pub fn update_extreme(&mut self, which: Extreme, old_val: f32, new_val: f32) -> bool {
        let current = self.bounds.extreme(which);
        if which.more_extreme(new_val, current) {
            *self.bounds.extreme_mut(which) = new_val;
            return true;
        }
        if old_val == current && which.more_extreme(current, new_val) {
            self.hints[which.index()] = ShrinkHint::MaybeShrunk;
            return true;
        }
        false
    }

    /// Flag an extreme for rescan if the removed value held it.
    ///
    /// Used by the removal path, where there is no new value.
    pub fn note_removed(&mut self, which: Extreme, old_val: f32) -> bool {
        if old_val == self.bounds.extreme(which) {
            self.hints[which.index()] = ShrinkHint::MaybeShrunk;
            return true;
        }
        false
    }

    /// Grow the tracked box to include newly added geometry.
    pub fn include(&mut self, b: &Bounds) {
        self.bounds.union(b);
    }

    /// Replace the tracked bounds with a freshly computed cover and clear
    /// every shrink hint. `boxes` must enumerate all live elements.
    pub fn rescan_from<'a>(&mut self, boxes: impl Iterator<Item = &'a Bounds>) {
        self.bounds = Bounds::covering(boxes);
        self.hints = [ShrinkHint::Stable; 4];
    }

    /// Reset to the empty state.
    pub fn clear(&mut self) {
        self.bounds = Bounds::EMPTY;
        self.hints = [ShrinkHint::Stable; 4];
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds_include_and_union() {
        let mut b = Bounds::EMPTY;
        assert!(b.is_empty());
        b.include_point(Vec2::new(1.0, 2.0));
        b.include_point(Vec2::new(-1.0, 5.0));
        assert_eq!(b, Bounds::new(-1.0, 1.0, 2.0, 5.0));

        let mut c = Bounds::at_point(Vec2::new(10.0, 0.0));
        c.union(&b);
        assert_eq!(c, Bounds::new(-1.0, 10.0, 0.0, 5.0));
        assert!(c.contains(&b));
        assert!(!b.contains(&c));
    }

    #[test]
    fn test_tracker_grow_is_immediate() {
        let mut t = BoundaryTracker::from_bounds(Bounds::new(0.0, 10.0, 0.0, 10.0));
        // An element at x = 10 moves out to x = 12.
        assert!(t.update_extreme(Extreme::XMax, 10.0, 12.0));
        assert_eq!(t.bounds().x_max, 12.0);
        assert_eq!(t.hint(Extreme::XMax), ShrinkHint::Stable);
    }

    #[test]
    fn test_tracker_shrink_is_deferred() {
        let mut t = BoundaryTracker::from_bounds(Bounds::new(0.0, 10.0, 0.0, 10.0));
        // The element holding x_max moves inward: value must not change yet,
        // but the hint must be set.
        assert!(t.update_extreme(Extreme::XMax, 10.0, 4.0));
        assert_eq!(t.bounds().x_max, 10.0);
        assert_eq!(t.hint(Extreme::XMax), ShrinkHint::MaybeShrunk);
        assert!(t.needs_rescan());
    }

    #[test]
    fn test_tracker_interior_move_is_noop() {
        let mut t = BoundaryTracker::from_bounds(Bounds::new(0.0, 10.0, 0.0, 10.0));
        assert!(!t.update_extreme(Extreme::XMax, 3.0, 5.0));
        assert_eq!(t.bounds().x_max, 10.0);
        assert!(!t.needs_rescan());
    }

    #[test]
    fn test_tracker_min_direction() {
        let mut t = BoundaryTracker::from_bounds(Bounds::new(0.0, 10.0, 0.0, 10.0));
        assert!(t.update_extreme(Extreme::XMin, 5.0, -2.0));
        assert_eq!(t.bounds().x_min, -2.0);
        // Now the element at the minimum moves inward.
        assert!(t.update_extreme(Extreme::XMin, -2.0, 1.0));
        assert_eq!(t.hint(Extreme::XMin), ShrinkHint::MaybeShrunk);
    }

    #[test]
    fn test_tracker_rescan() {
        let mut t = BoundaryTracker::from_bounds(Bounds::new(0.0, 10.0, 0.0, 10.0));
        t.update_extreme(Extreme::XMax, 10.0, 4.0);
        let remaining = [
            Bounds::new(0.0, 4.0, 0.0, 3.0),
            Bounds::new(1.0, 6.0, 1.0, 10.0),
        ];
        t.rescan_from(remaining.iter());
        assert_eq!(*t.bounds(), Bounds::new(0.0, 6.0, 0.0, 10.0));
        assert!(!t.needs_rescan());
    }

    #[test]
    fn test_note_removed() {
        let mut t = BoundaryTracker::from_bounds(Bounds::new(0.0, 10.0, 0.0, 10.0));
        assert!(!t.note_removed(Extreme::XMax, 5.0));
        assert!(t.note_removed(Extreme::XMax, 10.0));
        assert_eq!(t.hint(Extreme::XMax), ShrinkHint::MaybeShrunk);
    }
}
