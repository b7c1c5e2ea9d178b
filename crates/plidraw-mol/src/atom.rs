//! Atom data structure
//!
//! Atoms carry their 2D coordinates, draw state (color, label, implicit
//! hydrogen placement) and a cached per-atom draw bounding box. The box is
//! what feeds the structure and scene boundary trackers, so it must be
//! recomputed whenever anything affecting the atom's visual footprint
//! changes (position, hydrogen count, hydrogen side, label side).

use plidraw_geom::{Bounds, Vec2};
use serde::{Deserialize, Serialize};

use crate::element::Element;
use crate::index::AtomId;

/// Half-width of a one-character atom label in scene units.
pub const ATOM_DRAW_RADIUS: f32 = 0.4;

/// Extra footprint on the side where implicit hydrogens are drawn.
pub const HYDROGEN_EXTENT: f32 = 0.5;

/// Extra footprint on the side carrying a residue label anchor.
pub const LABEL_EXTENT: f32 = 0.7;

/// RGB draw color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Rgb { r, g, b }
    }

    /// Parse a `#rrggbb` hex string (leading `#` optional).
    pub fn from_hex(s: &str) -> Option<Rgb> {
        let s = s.strip_prefix('#').unwrap_or(s);
        if s.len() != 6 {
            return None;
        }
        let r = u8::from_str_radix(&s[0..2], 16).ok()?;
        let g = u8::from_str_radix(&s[2..4], 16).ok()?;
        let b = u8::from_str_radix(&s[4..6], 16).ok()?;
        Some(Rgb { r, g, b })
    }

    /// Format as a `#rrggbb` hex string.
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl std::fmt::Display for Rgb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

/// Placement side for implicit hydrogens and label anchors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Orientation {
    #[default]
    Right,
    Left,
    Up,
    Down,
}

impl Orientation {
    /// The opposite side.
    pub fn opposite(&self) -> Orientation {
        match self {
            Orientation::Right => Orientation::Left,
            Orientation::Left => Orientation::Right,
            Orientation::Up => Orientation::Down,
            Orientation::Down => Orientation::Up,
        }
    }

    /// Unit offset vector for this side (y grows upward).
    pub fn offset(&self) -> Vec2 {
        match self {
            Orientation::Right => Vec2::new(1.0, 0.0),
            Orientation::Left => Vec2::new(-1.0, 0.0),
            Orientation::Up => Vec2::new(0.0, 1.0),
            Orientation::Down => Vec2::new(0.0, -1.0),
        }
    }

    /// Whether this is a horizontal side.
    #[inline]
    pub fn is_horizontal(&self) -> bool {
        matches!(self, Orientation::Left | Orientation::Right)
    }
}

/// An atom of one structure.
///
/// Owned exclusively by its [`Structure`](crate::Structure); referenced
/// elsewhere by [`AtomId`] only.
#[derive(Debug, Clone, PartialEq)]
pub struct Atom {
    /// Id, unique within the owning structure.
    pub id: AtomId,

    /// 2D position in scene coordinates.
    pub coords: Vec2,

    /// Disabled atoms are logically removed but may still be referenced by
    /// stale ids within a batch; every consumer must skip them.
    pub enabled: bool,

    /// Chemical element.
    pub element: Element,

    /// Drawn text label (element symbol).
    pub label: String,

    /// Residue name for protein-side anchor atoms (e.g. "TYR 183"). Only
    /// atoms carrying one get a label anchor and side handling.
    pub residue_label: Option<String>,

    /// Draw color.
    pub color: Rgb,

    /// Number of implicit hydrogens drawn next to the label.
    pub implicit_hydrogens: u8,

    /// Committed side on which implicit hydrogens are drawn.
    pub hydrogen_orientation: Orientation,

    /// Side of the residue label anchor, if the atom carries one.
    pub label_side: Option<Orientation>,

    /// Cached draw bounding box ("global draw limits") in scene coordinates.
    pub draw_limits: Bounds,
}

impl Atom {
    /// Create an enabled atom at a position, labeled by its element symbol.
    pub fn new(id: AtomId, element: Element, coords: Vec2) -> Self {
        let mut atom = Atom {
            id,
            coords,
            enabled: true,
            element,
            label: element.symbol().to_string(),
            residue_label: None,
            color: element.default_color(),
            implicit_hydrogens: 0,
            hydrogen_orientation: Orientation::default(),
            label_side: None,
            draw_limits: Bounds::EMPTY,
        };
        atom.recompute_draw_limits();
        atom
    }

    /// Recompute the cached draw bounding box from current state.
    ///
    /// The footprint covers the label text around the position, the implicit
    /// hydrogen label on its side, and the residue label anchor on its side.
    /// Deterministic: calling it twice in a row is a no-op.
    pub fn recompute_draw_limits(&mut self) {
        let half_w = ATOM_DRAW_RADIUS * self.label.chars().count().max(1) as f32;
        let mut b = Bounds::new(
            self.coords.x - half_w,
            self.coords.x + half_w,
            self.coords.y - ATOM_DRAW_RADIUS,
            self.coords.y + ATOM_DRAW_RADIUS,
        );
        if self.implicit_hydrogens > 0 {
            let side = self.coords + self.hydrogen_orientation.offset() * (half_w + HYDROGEN_EXTENT);
            b.include_point(side);
        }
        if let Some(side) = self.label_side {
            let anchor = self.coords + side.offset() * (half_w + LABEL_EXTENT);
            b.include_point(anchor);
        }
        self.draw_limits = b;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rgb_hex_roundtrip() {
        let c = Rgb::from_hex("#1a2b3c").unwrap();
        assert_eq!(c, Rgb::new(0x1a, 0x2b, 0x3c));
        assert_eq!(c.to_hex(), "#1a2b3c");
        assert_eq!(Rgb::from_hex("ff0000"), Some(Rgb::new(255, 0, 0)));
        assert_eq!(Rgb::from_hex("#xyz"), None);
    }

    #[test]
    fn test_orientation_opposite() {
        assert_eq!(Orientation::Left.opposite(), Orientation::Right);
        assert_eq!(Orientation::Up.opposite(), Orientation::Down);
    }

    #[test]
    fn test_draw_limits_follow_position() {
        let mut atom = Atom::new(AtomId::new(0), Element::Oxygen, Vec2::new(1.0, 2.0));
        let before = atom.draw_limits;
        atom.coords = Vec2::new(5.0, 2.0);
        atom.recompute_draw_limits();
        assert_eq!(atom.draw_limits.x_min, before.x_min + 4.0);
        assert_eq!(atom.draw_limits.y_max, before.y_max);
    }

    #[test]
    fn test_draw_limits_include_hydrogen_side() {
        let mut atom = Atom::new(AtomId::new(0), Element::Nitrogen, Vec2::zero());
        let plain = atom.draw_limits;
        atom.implicit_hydrogens = 1;
        atom.hydrogen_orientation = Orientation::Left;
        atom.recompute_draw_limits();
        assert!(atom.draw_limits.x_min < plain.x_min);
        assert_eq!(atom.draw_limits.x_max, plain.x_max);
    }

    #[test]
    fn test_recompute_is_idempotent() {
        let mut atom = Atom::new(AtomId::new(3), Element::Carbon, Vec2::new(-2.0, 7.5));
        atom.implicit_hydrogens = 2;
        atom.recompute_draw_limits();
        let first = atom.draw_limits;
        atom.recompute_draw_limits();
        assert_eq!(atom.draw_limits, first);
    }
}
