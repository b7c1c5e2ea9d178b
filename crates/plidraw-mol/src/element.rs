//! Chemical elements
//!
//! A compact element enum covering the species that actually occur in 2D
//! protein-ligand depictions, with symbol round-trip and default draw
//! colors.

use crate::atom::Rgb;
use serde::{Deserialize, Serialize};

/// Chemical element of an atom.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Element {
    #[default]
    Unknown,
    Hydrogen,
    Carbon,
    Nitrogen,
    Oxygen,
    Fluorine,
    Phosphorus,
    Sulfur,
    Chlorine,
    Bromine,
    Iodine,
    /// Metal or other species rendered generically.
    Other,
}

impl Element {
    /// Parse an element symbol (case-sensitive standard notation).
    pub fn from_symbol(symbol: &str) -> Option<Element> {
        Some(match symbol {
            "H" => Element::Hydrogen,
            "C" => Element::Carbon,
            "N" => Element::Nitrogen,
            "O" => Element::Oxygen,
            "F" => Element::Fluorine,
            "P" => Element::Phosphorus,
            "S" => Element::Sulfur,
            "Cl" => Element::Chlorine,
            "Br" => Element::Bromine,
            "I" => Element::Iodine,
            _ => return None,
        })
    }

    /// The element symbol used as the drawn atom label.
    pub fn symbol(&self) -> &'static str {
        match self {
            Element::Unknown => "?",
            Element::Hydrogen => "H",
            Element::Carbon => "C",
            Element::Nitrogen => "N",
            Element::Oxygen => "O",
            Element::Fluorine => "F",
            Element::Phosphorus => "P",
            Element::Sulfur => "S",
            Element::Chlorine => "Cl",
            Element::Bromine => "Br",
            Element::Iodine => "I",
            Element::Other => "X",
        }
    }

    /// Default CPK-style draw color.
    pub fn default_color(&self) -> Rgb {
        match self {
            Element::Hydrogen => Rgb::new(0xff, 0xff, 0xff),
            Element::Carbon => Rgb::new(0x33, 0x33, 0x33),
            Element::Nitrogen => Rgb::new(0x30, 0x50, 0xf8),
            Element::Oxygen => Rgb::new(0xff, 0x0d, 0x0d),
            Element::Fluorine => Rgb::new(0x90, 0xe0, 0x50),
            Element::Phosphorus => Rgb::new(0xff, 0x80, 0x00),
            Element::Sulfur => Rgb::new(0xff, 0xff, 0x30),
            Element::Chlorine => Rgb::new(0x1f, 0xf0, 0x1f),
            Element::Bromine => Rgb::new(0xa6, 0x29, 0x29),
            Element::Iodine => Rgb::new(0x94, 0x00, 0x94),
            Element::Unknown | Element::Other => Rgb::new(0x80, 0x80, 0x80),
        }
    }

    /// Check if this element is carbon.
    #[inline]
    pub fn is_carbon(&self) -> bool {
        *self == Element::Carbon
    }

    /// Check if this element is hydrogen.
    #[inline]
    pub fn is_hydrogen(&self) -> bool {
        *self == Element::Hydrogen
    }
}

impl std::fmt::Display for Element {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.symbol())
    }
}
