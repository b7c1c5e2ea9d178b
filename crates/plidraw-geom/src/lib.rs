//! plidraw 2D geometry utilities
//!
//! This crate provides the pure-geometry building blocks for the 2D
//! interaction drawer:
//!
//! - [`point`] - vector helpers on `ultraviolet::Vec2` (tolerance-based
//!   comparison, perpendiculars, centroids)
//! - [`bounds`] - axis-aligned bounding boxes and the [`BoundaryTracker`]
//!   with lazy shrink detection
//! - [`spline`] - Catmull-Rom sampling for contact curves
//!
//! Everything here is side-effect free; mutable state is confined to the
//! [`BoundaryTracker`], which callers own exclusively.

mod bounds;
mod point;
mod spline;

pub use bounds::{Bounds, BoundaryTracker, Extreme, ShrinkHint};
pub use point::{centroid, coords_equal, perpendicular, COORD_EPS};
pub use spline::sample_spline;

/// Re-export the 2D vector type used throughout plidraw.
pub use ultraviolet::Vec2;
