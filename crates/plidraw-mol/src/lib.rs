//! plidraw structure graph store
//!
//! This crate provides the chemical-graph data model for the 2D interaction
//! drawer:
//!
//! - [`Atom`] - position, enable flag, element, draw state, cached draw
//!   limits
//! - [`Edge`] - bond connectivity, stereo variants, cached draw geometry
//! - [`Ring`] / [`RingSystem`] - cycles and fused aggregates with centers
//! - [`Structure`] - arena-style owner of the above with neighbor and
//!   membership queries
//!
//! # Architecture
//!
//! Elements are keyed by stable ids ([`AtomId`], [`EdgeId`], ...) supplied
//! by the input data. Removal never reuses ids: atoms and edges carry an
//! `enabled` flag, and consumers silently skip disabled or missing elements,
//! because a batch may legitimately reference elements it removed a phase
//! earlier.
//!
//! # Example
//!
//! ```rust
//! use plidraw_mol::{Atom, AtomId, EdgeId, EdgeType, Element, Structure, StructureId};
//! use plidraw_geom::Vec2;
//!
//! let mut s = Structure::new(StructureId::new(1), "ethanol");
//! s.add_atom(Atom::new(AtomId::new(0), Element::Carbon, Vec2::new(0.0, 0.0))).unwrap();
//! s.add_atom(Atom::new(AtomId::new(1), Element::Oxygen, Vec2::new(3.0, 0.0))).unwrap();
//! s.add_edge(EdgeId::new(0), AtomId::new(0), AtomId::new(1), EdgeType::Single).unwrap();
//!
//! assert_eq!(s.neighbors(AtomId::new(0)), vec![AtomId::new(1)]);
//! ```

mod atom;
mod edge;
mod element;
mod error;
mod index;
mod ring;
mod structure;

pub use atom::{Atom, Orientation, Rgb, ATOM_DRAW_RADIUS, HYDROGEN_EXTENT, LABEL_EXTENT};
pub use edge::{
    compute_edge_geometry, Edge, EdgeGeometry, EdgeType, InnerLine, INNER_LINE_OFFSET,
    INNER_LINE_TRIM,
};
pub use element::Element;
pub use error::{MolError, MolResult};
pub use index::{
    AnnotationId, AtomId, AtomPairId, CationPiId, DistanceId, EdgeId, HydrophobicContactId,
    InteractionId, PiStackingId, RingId, RingSystemId, StructureId,
};
pub use ring::{Ring, RingSystem};
pub use structure::{Representation, Structure, CIRCLE_MARGIN};
