//! # Config Crate
//!
//! Centralized configuration constants for the geometry bridge: the mesh
//! indexer, the tessellator and the C ABI surface all read their limits and
//! defaults from here.
//!
//! ## Usage
//!
//! ```rust
//! use config::constants::{GlobalConfig, MIN_CONTOUR_VERTICES, NO_JOB_ID};
//!
//! // Contours below this vertex count are skipped by the tessellator
//! let counts = [2, 3, 4];
//! let usable = counts.iter().filter(|&&c| c >= MIN_CONTOUR_VERTICES).count();
//! assert_eq!(usable, 2);
//!
//! // The ABI reports "no job" with a negative sentinel
//! assert!(NO_JOB_ID < 0);
//!
//! let cfg = GlobalConfig::default();
//! assert!(cfg.include_normals);
//! ```
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: All constants defined once, used everywhere
//! - **No Dependencies**: Plain `const` items and one validated struct
//! - **ABI Stable**: Sentinels match what native callers already expect

pub mod constants;
