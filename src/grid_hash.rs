//! Fixed-capacity uniform-grid spatial hash, rebuilt from scratch each frame.
//!
//! Population is a counting sort over (entity, cell) memberships: count per
//! bucket, prefix-sum the counts into offsets, then scatter values into one
//! flat entry array. Queries walk the buckets of the cells a probe overlaps
//! and hand every stored value to a visitor. Distinct cells may hash to the
//! same bucket; that only adds false positives, which the caller's exact
//! overlap test filters out anyway.

use std::hash::Hash;

use rustc_hash::FxHashSet;
use thiserror::Error;

use crate::aabb::Aabb;

/// Errors reported by [`GridHash`] construction and population.
#[derive(Clone, Debug, PartialEq, Error)]
#[non_exhaustive]
pub enum GridHashError {
    /// `spacing` or `max_entries` was not strictly positive at construction.
    #[error("invalid configuration: spacing {spacing} and max_entries {max_entries} must both be positive")]
    InvalidConfiguration {
        /// Requested cell edge length.
        spacing: f64,
        /// Requested membership capacity.
        max_entries: usize,
    },
    /// The input would produce more (entity, cell) memberships than fit.
    #[error("capacity exceeded: input needs {required} cell memberships, capacity is {max_entries}")]
    CapacityExceeded {
        /// Memberships the rejected input would occupy.
        required: usize,
        /// Fixed capacity of the structure.
        max_entries: usize,
    },
    /// An entity had a negative extent or a non-finite field.
    #[error("malformed entity at index {index}: {reason}")]
    MalformedEntity {
        /// Position of the offending entity in the input slice.
        index: usize,
        /// What was wrong with it.
        reason: &'static str,
    },
}

/// Uniform-grid spatial hash over axis-aligned bounding boxes.
///
/// One instance answers "which stored values might overlap this AABB" in
/// roughly constant time per probe. It is a per-frame acceleration index:
/// the caller rebuilds it with [`populate`](Self::populate) or
/// [`populate_with`](Self::populate_with) from a full snapshot of the live
/// entities, then issues any number of read-only queries against that
/// snapshot. Queries between a rebuild's start and finish are not supported;
/// keep population and queries strictly sequential on one instance.
///
/// All storage is allocated at construction and never grows. An entity
/// occupies one entry per grid cell its AABB overlaps, so `max_entries`
/// bounds the total of those memberships, not the entity count.
#[derive(Clone, Debug)]
pub struct GridHash<T> {
    /// World-unit edge length of one square grid cell
    spacing: f64,
    /// Capacity for (entity, cell) memberships in one population
    max_entries: usize,
    /// Bucket table size, `2 * max_entries` to thin out hash collisions
    pub(crate) cell_count: usize,
    /// `cell_starts[i]..cell_starts[i + 1]` is bucket `i`'s entry range
    pub(crate) cell_starts: Vec<usize>,
    /// Stored values, grouped contiguously by bucket; `None` is unoccupied
    pub(crate) cell_entries: Vec<Option<T>>,
}

impl<T> GridHash<T> {
    /// Creates a grid with the given cell spacing and membership capacity.
    ///
    /// # Errors
    ///
    /// Returns [`GridHashError::InvalidConfiguration`] unless `spacing` is
    /// finite and strictly positive and `max_entries` is nonzero.
    pub fn new(spacing: f64, max_entries: usize) -> Result<Self, GridHashError> {
        if !spacing.is_finite() || spacing <= 0.0 || max_entries == 0 {
            return Err(GridHashError::InvalidConfiguration { spacing, max_entries });
        }
        let cell_count = max_entries * 2;
        Ok(GridHash {
            spacing,
            max_entries,
            cell_count,
            cell_starts: vec![0; cell_count + 1],
            cell_entries: std::iter::repeat_with(|| None).take(max_entries).collect(),
        })
    }

    /// Rebuilds the index from `entities`, storing `transform(&entity)` for
    /// each (entity, overlapped-cell) membership.
    ///
    /// `transform` runs exactly once per membership, so an entity spanning
    /// four cells is transformed four times. Use it to store lightweight
    /// ids instead of whole entities. Within a bucket, entries end up in
    /// reverse input order; queries make no ordering promise.
    ///
    /// The call is atomic: on error nothing has been modified and earlier
    /// query results remain valid.
    ///
    /// # Errors
    ///
    /// [`GridHashError::MalformedEntity`] if an entity has a negative
    /// extent or a non-finite coordinate, [`GridHashError::CapacityExceeded`]
    /// if the input needs more memberships than `max_entries`.
    pub fn populate_with<E, F>(
        &mut self,
        entities: &[E],
        mut transform: F,
    ) -> Result<(), GridHashError>
    where
        E: Aabb,
        F: FnMut(&E) -> T,
    {
        let spacing = self.spacing;
        let cell_count = self.cell_count;

        // Validate the whole input before touching any state, so a failed
        // call leaves the previous population intact.
        let mut required: u128 = 0;
        for (index, entity) in entities.iter().enumerate() {
            if entity.w() < 0.0 || entity.h() < 0.0 {
                return Err(GridHashError::MalformedEntity { index, reason: "negative extent" });
            }
            let Some(range) = CellRange::of(entity, spacing) else {
                return Err(GridHashError::MalformedEntity {
                    index,
                    reason: "non-finite coordinates",
                });
            };
            required = required.saturating_add(range.span());
        }
        if required > self.max_entries as u128 {
            return Err(GridHashError::CapacityExceeded {
                required: usize::try_from(required).unwrap_or(usize::MAX),
                max_entries: self.max_entries,
            });
        }

        // Clear
        self.cell_starts.fill(0);
        self.cell_entries.fill_with(|| None);

        // Count: one increment per overlapped cell. An entity spanning
        // several cells is a member of every one of them.
        let starts = &mut self.cell_starts;
        for entity in entities {
            if let Some(range) = CellRange::of(entity, spacing) {
                each_bucket(range, cell_count, |bucket| starts[bucket] += 1);
            }
        }

        // Prefix-sum: cell_starts[i] becomes the end offset of bucket i.
        // The scatter pass walks each bucket back down to its start offset.
        let mut running = 0;
        for start in &mut starts[..cell_count] {
            running += *start;
            *start = running;
        }
        starts[cell_count] = running;

        // Scatter: decrementing from the bucket end needs no secondary
        // cursor array, at the cost of reverse order within a bucket.
        let entries = &mut self.cell_entries;
        for entity in entities {
            if let Some(range) = CellRange::of(entity, spacing) {
                each_bucket(range, cell_count, |bucket| {
                    starts[bucket] -= 1;
                    entries[starts[bucket]] = Some(transform(entity));
                });
            }
        }

        Ok(())
    }

    /// Yields every stored value in every bucket that a cell overlapped by
    /// `probe` hashes to.
    ///
    /// Every value whose entity shares at least one grid cell with `probe`
    /// is yielded at least once. Values may repeat (multi-cell entities,
    /// bucket collisions) and unrelated values may appear (bucket
    /// collisions); the caller's exact overlap test filters both. A probe
    /// with non-finite coordinates or negative extent yields nothing, and a
    /// probe spanning at least as many cells as the bucket table holds
    /// visits each bucket exactly once rather than enumerating cells.
    pub fn query<'g, P, F>(&'g self, probe: &P, mut visit: F)
    where
        P: Aabb,
        F: FnMut(&'g T),
    {
        let Some(range) = CellRange::of(probe, self.spacing) else {
            return;
        };
        if range.span() >= self.cell_count as u128 {
            for bucket in 0..self.cell_count {
                self.visit_bucket(bucket, &mut visit);
            }
        } else {
            each_bucket(range, self.cell_count, |bucket| {
                self.visit_bucket(bucket, &mut visit);
            });
        }
    }

    /// Like [`query`](Self::query), but yields each distinct value exactly
    /// once, at the cost of one transient hash set per call.
    pub fn query_unique<'g, P, F>(&'g self, probe: &P, mut visit: F)
    where
        P: Aabb,
        T: Eq + Hash,
        F: FnMut(&'g T),
    {
        let mut seen: FxHashSet<&T> = FxHashSet::default();
        self.query(probe, |value| {
            if seen.insert(value) {
                visit(value);
            }
        });
    }

    /// Number of (entity, cell) memberships stored by the last population.
    pub fn len(&self) -> usize {
        self.cell_starts[self.cell_count]
    }

    /// Returns whether the grid holds no memberships.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// World-unit edge length of one grid cell.
    pub fn spacing(&self) -> f64 {
        self.spacing
    }

    /// Total membership capacity of one population call.
    pub fn max_entries(&self) -> usize {
        self.max_entries
    }

    // --- Private helpers ---

    fn visit_bucket<'g, F>(&'g self, bucket: usize, visit: &mut F)
    where
        F: FnMut(&'g T),
    {
        let range = self.cell_starts[bucket]..self.cell_starts[bucket + 1];
        for entry in &self.cell_entries[range] {
            if let Some(value) = entry {
                visit(value);
            }
        }
    }
}

impl<E: Aabb + Copy> GridHash<E> {
    /// Rebuilds the index from `entities`, storing each entity itself.
    ///
    /// Equivalent to [`populate_with`](Self::populate_with) with an identity
    /// transform; see there for semantics and atomicity.
    ///
    /// # Errors
    ///
    /// Same as [`populate_with`](Self::populate_with).
    pub fn populate(&mut self, entities: &[E]) -> Result<(), GridHashError> {
        self.populate_with(entities, |entity| *entity)
    }
}

/// Inclusive rectangle of grid cell coordinates overlapped by an AABB.
#[derive(Clone, Copy, Debug)]
struct CellRange {
    x0: i64,
    y0: i64,
    x1: i64,
    y1: i64,
}

impl CellRange {
    /// Cell rectangle covering `aabb`, or `None` when a corner coordinate
    /// is non-finite.
    fn of<A: Aabb>(aabb: &A, spacing: f64) -> Option<CellRange> {
        Some(CellRange {
            x0: cell_coord(aabb.x(), spacing)?,
            y0: cell_coord(aabb.y(), spacing)?,
            x1: cell_coord(aabb.x() + aabb.w(), spacing)?,
            y1: cell_coord(aabb.y() + aabb.h(), spacing)?,
        })
    }

    /// Number of cells in the rectangle; zero when it is inverted.
    fn span(&self) -> u128 {
        let w = self.x1.saturating_sub(self.x0).saturating_add(1).max(0) as u128;
        let h = self.y1.saturating_sub(self.y0).saturating_add(1).max(0) as u128;
        w * h
    }
}

/// Floor cell coordinate of a world coordinate.
///
/// Flooring keeps negative coordinates consistent: -1.0 at spacing 32 lands
/// in cell -1, where truncation would fold it into cell 0.
#[inline]
fn cell_coord(v: f64, spacing: f64) -> Option<i64> {
    let c = (v / spacing).floor();
    if c.is_finite() { Some(c as i64) } else { None }
}

/// Folds a cell coordinate pair into a bucket index.
///
/// Fixed multiplicative/XOR hash; the absolute-value fold is known to bias
/// some residues, which costs locality, never correctness.
#[inline]
fn bucket_index(cx: i64, cy: i64, cell_count: usize) -> usize {
    let h = cx.wrapping_mul(9_283_711) ^ cy.wrapping_mul(689_287_499);
    (h.unsigned_abs() % cell_count as u64) as usize
}

/// Calls `f` with the bucket index of every cell in `range`, once per cell.
fn each_bucket(range: CellRange, cell_count: usize, mut f: impl FnMut(usize)) {
    for cy in range.y0..=range.y1 {
        for cx in range.x0..=range.x1 {
            f(bucket_index(cx, cy, cell_count));
        }
    }
}
