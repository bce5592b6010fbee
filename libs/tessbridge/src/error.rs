//! # Error Types
//!
//! Errors raised by the triangulation engine and the tessellation service.
//!
//! ## Error Policy
//!
//! - Engine failures are reported as [`EngineError`] and wrapped by the
//!   service in [`TessError::TriangulationFailed`]
//! - "Nothing to triangulate" and "triangulation failed" stay distinct;
//!   [`TessError::is_no_output`] gives the single-signal view
//! - Nothing is inserted into the job store on any error

use thiserror::Error;

use crate::job::JobId;

// =============================================================================
// ENGINE ERRORS
// =============================================================================

/// Errors reported by a [`TriangulationEngine`](crate::TriangulationEngine).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    /// A coordinate is not finite or exceeds the accepted magnitude.
    #[error("Input vertex {vertex} has coordinate {value}, outside the accepted range ±{limit}")]
    InvalidCoordinate {
        /// Global input vertex index
        vertex: u32,
        /// Offending coordinate value
        value: f32,
        /// Largest accepted magnitude
        limit: f32,
    },

    /// A hole could not be connected to its enclosing boundary.
    #[error("No visible bridge from hole contour {contour} to its boundary")]
    NoBridge {
        /// Index of the hole contour in the input
        contour: usize,
    },

    /// Ear clipping stalled on a polygon that has no ear.
    #[error("Ear clipping stalled with {remaining} vertices left")]
    NoEar {
        /// Vertices left in the polygon when clipping stopped
        remaining: usize,
    },
}

// =============================================================================
// SERVICE ERRORS
// =============================================================================

/// Errors that can occur while tessellating or collecting results.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TessError {
    /// The flat input arrays are inconsistent with the contour counts.
    #[error("Invalid contour input: {0}")]
    InvalidInput(String),

    /// No contour has enough vertices to triangulate.
    #[error("No contour with at least 3 vertices")]
    NoValidContour,

    /// The triangulation engine rejected the input.
    #[error("Triangulation failed: {0}")]
    TriangulationFailed(#[from] EngineError),

    /// The job id was never issued or has already been collected.
    #[error("Unknown tessellation job {0}")]
    UnknownJob(JobId),

    /// A destination buffer cannot hold the job's data.
    #[error("{buffer} buffer too small: need {required} elements, got {provided}")]
    BufferTooSmall {
        /// Which buffer was undersized
        buffer: &'static str,
        /// Elements the job needs
        required: usize,
        /// Elements the caller supplied
        provided: usize,
    },

    /// Every representable job id has been handed out.
    #[error("Job ids exhausted")]
    JobIdsExhausted,
}

impl TessError {
    /// Creates an invalid input error.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    /// Returns true for the failures that mean "no job was produced from
    /// valid input": nothing to triangulate, or triangulation failed.
    pub fn is_no_output(&self) -> bool {
        matches!(self, Self::NoValidContour | Self::TriangulationFailed(_))
    }
}

/// Result type alias for tessellation operations.
pub type Result<T> = std::result::Result<T, TessError>;
