//! # Error Types
//!
//! Errors raised while indexing a mesh.
//!
//! A mesh whose normals could not be retrieved is *not* an error: it comes
//! back as an [`IndexedMesh`](crate::IndexedMesh) with `is_valid() == false`.
//! The variants here cover malformed collaborator data that would otherwise
//! be read out of bounds.

use thiserror::Error;

/// Errors that can occur while indexing a corner stream.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MeshIndexError {
    /// A corner refers to a control point that does not exist.
    #[error("Corner {corner} references control point {index}, but the mesh has {count} control points")]
    ControlPointOutOfRange {
        /// Position of the offending corner in the corner stream
        corner: usize,
        /// Control-point index as delivered by the collaborator
        index: i64,
        /// Number of control points available
        count: usize,
    },

    /// The corner stream is longer than a `u32` index buffer can address.
    #[error("Too many corners: {count} (max: {max})")]
    TooManyCorners {
        /// Number of corners supplied
        count: usize,
        /// Largest supported corner count
        max: usize,
    },
}

impl MeshIndexError {
    /// Creates a control-point range error.
    pub fn out_of_range(corner: usize, index: i64, count: usize) -> Self {
        Self::ControlPointOutOfRange {
            corner,
            index,
            count,
        }
    }
}

/// Result type alias for indexing operations.
pub type Result<T> = std::result::Result<T, MeshIndexError>;
