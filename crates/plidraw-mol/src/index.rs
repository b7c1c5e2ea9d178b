//! Type-safe id wrappers
//!
//! Provides newtype wrappers around ids to prevent accidentally mixing atom
//! ids with edge ids or connection ids. Ids are stable handles assigned by
//! the input data, not array positions: elements live in id-keyed maps and
//! survive holes left by removals.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Macro to generate type-safe id types with common implementations.
/// This eliminates code duplication across the dozen id types the drawer
/// deals with.
macro_rules! define_id {
    (
        $(#[$meta:meta])*
        $name:ident, $debug_name:literal
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
        #[repr(transparent)]
        #[serde(transparent)]
        pub struct $name(pub u32);

        impl $name {
            /// Create a new id
            #[inline]
            pub const fn new(id: u32) -> Self {
                $name(id)
            }

            /// Get the raw u32 value
            #[inline]
            pub const fn as_u32(&self) -> u32 {
                self.0
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", $debug_name, self.0)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<u32> for $name {
            #[inline]
            fn from(id: u32) -> Self {
                $name(id)
            }
        }

        impl From<$name> for u32 {
            #[inline]
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

define_id!(
    /// Id of an atom, unique within its structure.
    AtomId,
    "AtomId"
);

define_id!(
    /// Id of an edge (bond), unique within its structure.
    EdgeId,
    "EdgeId"
);

define_id!(
    /// Id of a ring within a structure.
    RingId,
    "RingId"
);

define_id!(
    /// Id of a fused-ring system within a structure.
    RingSystemId,
    "RingSystemId"
);

define_id!(
    /// Id of a structure, unique within the scene.
    StructureId,
    "StructureId"
);

define_id!(
    /// Id of a free text annotation in the scene.
    AnnotationId,
    "AnnotationId"
);

define_id!(
    /// Id of a distance connection.
    DistanceId,
    "DistanceId"
);

define_id!(
    /// Id of a generic interaction connection.
    InteractionId,
    "InteractionId"
);

define_id!(
    /// Id of an atom-pair interaction.
    AtomPairId,
    "AtomPairId"
);

define_id!(
    /// Id of a pi-stacking connection.
    PiStackingId,
    "PiStackingId"
);

define_id!(
    /// Id of a cation-pi stacking connection.
    CationPiId,
    "CationPiId"
);

define_id!(
    /// Id of a hydrophobic contact (spline) in the scene.
    HydrophobicContactId,
    "HydrophobicContactId"
);
