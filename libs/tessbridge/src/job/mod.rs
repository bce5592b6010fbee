//! # Job Store
//!
//! Holds finished tessellation results until the caller collects them.
//!
//! ## Lifecycle
//!
//! ```text
//! tessellate ─→ insert (fresh JobId) ─→ pending ─→ remove ─→ gone
//! ```
//!
//! Ids come from a counter that only moves forward, so an id is never
//! reused and a collected id stays unknown forever.

use std::collections::HashMap;
use std::fmt;

use config::constants::{TESS_POLYGON_SIZE, TESS_VERTEX_SIZE};
use serde::Serialize;

use crate::error::{Result, TessError};

// =============================================================================
// JOB ID
// =============================================================================

/// Identifier of a stored tessellation result.
///
/// Ids are non-negative and fit in an `i32`, so they cross the C ABI
/// unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct JobId(u32);

impl JobId {
    /// Largest id the store hands out.
    pub const MAX: JobId = JobId(i32::MAX as u32);

    /// Wraps a raw id.
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// The raw id.
    #[inline]
    pub const fn get(self) -> u32 {
        self.0
    }

    /// Converts an id received over the C ABI. Negative values have no job.
    pub fn from_raw(raw: i32) -> Option<Self> {
        u32::try_from(raw).ok().map(Self)
    }

    /// The id as the C ABI reports it.
    #[inline]
    pub fn to_raw(self) -> i32 {
        i32::try_from(self.0).unwrap_or(i32::MAX)
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// =============================================================================
// JOB
// =============================================================================

/// Element counts of a tessellation result.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TessellationCounts {
    /// Number of output vertices
    pub vertex_count: usize,
    /// Number of output normals (equal to `vertex_count`)
    pub normal_count: usize,
    /// Number of triangle indices (3 per triangle)
    pub index_count: usize,
}

impl TessellationCounts {
    /// Floats needed for the position buffer.
    #[inline]
    pub fn position_len(&self) -> usize {
        self.vertex_count * TESS_VERTEX_SIZE
    }

    /// Floats needed for the normal buffer.
    #[inline]
    pub fn normal_len(&self) -> usize {
        self.normal_count * TESS_VERTEX_SIZE
    }

    /// Number of triangles.
    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.index_count / TESS_POLYGON_SIZE
    }
}

/// A finished tessellation result.
///
/// ## Memory Layout
///
/// - `positions`: [x0, y0, z0, x1, y1, z1, ...]
/// - `normals`: one normal per vertex, same layout
/// - `indices`: [i0, i1, i2, ...] - 3 per triangle, each `< vertex_count`
#[derive(Debug, Default, PartialEq)]
pub struct TessellationJob {
    /// Flat vertex positions
    pub positions: Vec<f32>,
    /// Flat per-vertex normals
    pub normals: Vec<f32>,
    /// Triangle indices
    pub indices: Vec<u32>,
}

impl TessellationJob {
    /// Element counts of this result.
    pub fn counts(&self) -> TessellationCounts {
        TessellationCounts {
            vertex_count: self.positions.len() / TESS_VERTEX_SIZE,
            normal_count: self.normals.len() / TESS_VERTEX_SIZE,
            index_count: self.indices.len(),
        }
    }

    /// Copies the result into caller-sized buffers.
    ///
    /// Destinations may be larger than needed; the tail is left untouched.
    ///
    /// # Errors
    ///
    /// Returns [`TessError::BufferTooSmall`] before writing anything if any
    /// destination is too short.
    pub fn copy_into(&self, positions: &mut [f32], normals: &mut [f32], indices: &mut [u32]) -> Result<()> {
        check_capacity("position", self.positions.len(), positions.len())?;
        check_capacity("normal", self.normals.len(), normals.len())?;
        check_capacity("index", self.indices.len(), indices.len())?;

        positions[..self.positions.len()].copy_from_slice(&self.positions);
        normals[..self.normals.len()].copy_from_slice(&self.normals);
        indices[..self.indices.len()].copy_from_slice(&self.indices);
        Ok(())
    }
}

fn check_capacity(buffer: &'static str, required: usize, provided: usize) -> Result<()> {
    if provided < required {
        return Err(TessError::BufferTooSmall {
            buffer,
            required,
            provided,
        });
    }
    Ok(())
}

// =============================================================================
// STORE
// =============================================================================

/// Pending tessellation results keyed by job id.
///
/// The store itself is not synchronized; [`TessellationService`](crate::TessellationService)
/// owns one behind a mutex.
#[derive(Debug, Default)]
pub struct JobStore {
    /// Results awaiting collection
    jobs: HashMap<JobId, TessellationJob>,
    /// Next id to hand out
    next_id: u32,
}

impl JobStore {
    /// Creates an empty store whose first id is 0.
    pub fn new() -> Self {
        Self::default()
    }

    /// Files a result under a fresh id.
    ///
    /// # Errors
    ///
    /// Returns [`TessError::JobIdsExhausted`] once [`JobId::MAX`] has been
    /// issued.
    pub fn insert(&mut self, job: TessellationJob) -> Result<JobId> {
        let id = JobId(self.next_id);
        if id > JobId::MAX {
            return Err(TessError::JobIdsExhausted);
        }
        self.next_id += 1;
        self.jobs.insert(id, job);
        Ok(id)
    }

    /// Looks up a pending result.
    pub fn get(&self, id: JobId) -> Option<&TessellationJob> {
        self.jobs.get(&id)
    }

    /// Removes a pending result, retiring its id.
    pub fn remove(&mut self, id: JobId) -> Option<TessellationJob> {
        self.jobs.remove(&id)
    }

    /// Returns true if `id` is awaiting collection.
    pub fn contains(&self, id: JobId) -> bool {
        self.jobs.contains_key(&id)
    }

    /// Number of results awaiting collection.
    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    /// Returns true if nothing awaits collection.
    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    /// Number of ids handed out so far.
    pub fn issued(&self) -> u32 {
        self.next_id
    }
}
