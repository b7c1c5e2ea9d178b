//! Error types for structure graph operations

use thiserror::Error;

/// Errors that can occur when building or mutating a structure graph.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MolError {
    /// An atom with this id already exists in the structure
    #[error("Duplicate atom id {0}")]
    DuplicateAtom(u32),

    /// An edge with this id already exists in the structure
    #[error("Duplicate edge id {0}")]
    DuplicateEdge(u32),

    /// Edge endpoint refers to an unknown atom
    #[error("Edge {edge} references unknown atom {atom}")]
    UnknownEndpoint { edge: u32, atom: u32 },

    /// Edge connects an atom to itself
    #[error("Edge {0} is a self-loop on atom {1}")]
    SelfLoop(u32, u32),

    /// A ring references an unknown atom
    #[error("Ring {ring} references unknown atom {atom}")]
    UnknownRingAtom { ring: u32, atom: u32 },

    /// Two consecutive ring atoms are not connected by an edge
    #[error("Ring {ring} has no edge between atoms {a} and {b}")]
    BrokenRing { ring: u32, a: u32, b: u32 },

    /// A ring with this id already exists in the structure
    #[error("Duplicate ring id {0}")]
    DuplicateRing(u32),
}

/// Result type for structure graph operations.
pub type MolResult<T> = Result<T, MolError>;
