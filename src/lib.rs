//! # gridhash - Uniform-Grid Spatial Hash
//!
//! A Rust library providing a fixed-capacity uniform-grid spatial hash for
//! broad-phase collision-candidate queries over axis-aligned bounding
//! boxes (AABBs).
//!
//! ## Features
//!
//! - **Counting-Sort Population**: O(N) full rebuild per frame into two flat arrays
//! - **Bounded Memory**: all storage fixed at construction, no allocation while populating
//! - **Candidate Queries**: yields possible overlaps; the caller runs the exact test
//! - **Duplicate Suppression**: an optional query variant that yields each candidate once
//!
//! ## Quick Start
//!
//! ```rust
//! use gridhash::prelude::*;
//!
//! // One ball per frame snapshot; ids are what we store in the grid.
//! struct Ball { id: u32, x: f64, y: f64, r: f64 }
//!
//! impl Aabb for Ball {
//!     fn x(&self) -> f64 { self.x - self.r }
//!     fn y(&self) -> f64 { self.y - self.r }
//!     fn w(&self) -> f64 { 2.0 * self.r }
//!     fn h(&self) -> f64 { 2.0 * self.r }
//! }
//!
//! # fn main() -> Result<(), GridHashError> {
//! // Cell spacing 10, room for 64 (ball, cell) memberships.
//! let mut grid = GridHash::new(10.0, 64)?;
//!
//! let balls = vec![
//!     Ball { id: 0, x: 1.0, y: 1.0, r: 1.0 },
//!     Ball { id: 1, x: 2.5, y: 1.5, r: 1.0 },
//!     Ball { id: 2, x: 40.0, y: 40.0, r: 1.0 },
//! ];
//!
//! // Rebuild the index for this frame, storing ball ids.
//! grid.populate_with(&balls, |ball| ball.id)?;
//!
//! // Which balls might overlap ball 0? (ball 0 itself is a candidate too)
//! let mut candidates = Vec::new();
//! grid.query_unique(&balls[0], |&id| candidates.push(id));
//! candidates.sort();
//! assert_eq!(candidates, vec![0, 1]);
//! # Ok(())
//! # }
//! ```
//!
//! ## How It Works
//!
//! Space is cut into square cells of side `spacing`. Population records,
//! for every entity, one membership per cell its AABB overlaps, bucketing
//! memberships with a counting sort: count per bucket, prefix-sum the
//! counts into offsets, scatter values into one flat entry array. A cell
//! coordinate pair is folded into the bucket table by a fixed hash, so the
//! grid is unbounded in world space while memory stays fixed.
//!
//! A query walks the buckets of the cells its probe overlaps and yields
//! every value stored there. That set can contain duplicates and strangers
//! (two cells may hash to one bucket) but never misses a value whose entity
//! shares a cell with the probe - the caller's exact overlap test does the
//! final filtering, exactly as with any broad phase.

pub mod aabb;
pub mod grid_hash;
pub mod prelude;

pub use aabb::{Aabb, Rect, overlaps};
pub use grid_hash::{GridHash, GridHashError};
