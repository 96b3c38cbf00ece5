//! Prelude module for convenient imports
//!
//! This module re-exports the most commonly used types from the crate.
//! Users can import everything they need with:
//!
//! ```
//! use gridhash::prelude::*;
//! ```

pub use crate::aabb::{Aabb, Rect, overlaps};
pub use crate::grid_hash::{GridHash, GridHashError};
