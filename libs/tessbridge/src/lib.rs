//! # Tessellation Bridge
//!
//! Triangulates polygon contours and hands the results out through a
//! pull-based job protocol: `tessellate` files a result under a job id and
//! reports its sizes, `collect_result` copies it into caller buffers once.
//!
//! ## Architecture
//!
//! ```text
//! ContourSet → TriangulationEngine → normal lookup → JobStore → collect
//! ```
//!
//! Contours combine under the even-odd rule, so a contour inside another
//! cuts a hole and a contour inside that hole fills again. Output normals
//! are copied from the input vertex each output vertex came from.
//!
//! ## Usage
//!
//! ```rust
//! use tessbridge::{ContourSet, TessError, TessellationService};
//!
//! let positions = [0.0_f32, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0];
//! let normals = [0.0_f32, 0.0, 1.0].repeat(3);
//! let contours = ContourSet::new(&positions, &normals, &[3]).unwrap();
//!
//! let service = TessellationService::new();
//! let ticket = service.tessellate(&contours).unwrap();
//! let job = service.take_result(ticket.job_id).unwrap();
//! assert_eq!(job.indices.len(), 3);
//!
//! // A job can only be retrieved once
//! assert_eq!(service.take_result(ticket.job_id).unwrap_err(), TessError::UnknownJob(ticket.job_id));
//! ```

pub mod contour;
pub mod engine;
pub mod error;
pub mod job;
pub mod normals;
pub mod service;

pub use contour::{Contour, ContourSet};
pub use engine::{EarClipEngine, TriangulationEngine, TriangulationOutput};
pub use error::{EngineError, Result, TessError};
pub use job::{JobId, JobStore, TessellationCounts, TessellationJob};
pub use service::{TessellationService, TessellationTicket};
