//! Centralized configuration values shared across the geometry bridge crates.
//!
//! Each public item in this module documents its purpose and provides a minimal
//! usage example so that downstream crates can remain declarative and avoid
//! scattering literals.

use std::fmt;

// =============================================================================
// TESSELLATION CONSTANTS
// =============================================================================

/// Minimum number of vertices a contour needs before it is handed to the
/// triangulation engine. Shorter contours are skipped as degenerate.
///
/// # Examples
/// ```
/// use config::constants::MIN_CONTOUR_VERTICES;
/// let contour_len = 2;
/// assert!(contour_len < MIN_CONTOUR_VERTICES);
/// ```
pub const MIN_CONTOUR_VERTICES: usize = 3;

/// Number of vertices per output element. The tessellator only ever emits
/// triangles.
///
/// # Examples
/// ```
/// use config::constants::TESS_POLYGON_SIZE;
/// let indices = [0u32, 1, 2, 0, 2, 3];
/// assert_eq!(indices.len() / TESS_POLYGON_SIZE, 2);
/// ```
pub const TESS_POLYGON_SIZE: usize = 3;

/// Number of float components per vertex in the flat position and normal
/// arrays exchanged with callers.
///
/// # Examples
/// ```
/// use config::constants::TESS_VERTEX_SIZE;
/// let positions = [0.0f32; 12];
/// assert_eq!(positions.len() / TESS_VERTEX_SIZE, 4);
/// ```
pub const TESS_VERTEX_SIZE: usize = 3;

/// Largest coordinate magnitude accepted by the triangulation engine.
///
/// Beyond 2^23 single-precision floats can no longer represent every
/// integer, and orientation tests on projected coordinates lose meaning.
///
/// # Examples
/// ```
/// use config::constants::MAX_VALID_COORD;
/// assert!(1.0e6_f32 < MAX_VALID_COORD);
/// assert!(1.0e7_f32 > MAX_VALID_COORD);
/// ```
pub const MAX_VALID_COORD: f32 = (1u32 << 23) as f32;

/// Job identifier reported across the C ABI when a tessellation produced no
/// job (no usable contour, or the triangulation engine failed).
///
/// # Examples
/// ```
/// use config::constants::NO_JOB_ID;
/// let job_id: i32 = NO_JOB_ID;
/// assert!(job_id < 0);
/// ```
pub const NO_JOB_ID: i32 = -1;

// =============================================================================
// INDEXING CONSTANTS
// =============================================================================

/// Whether mesh indexing keys vertices on their normal as well as their
/// position when the caller does not say otherwise.
///
/// # Examples
/// ```
/// use config::constants::DEFAULT_INCLUDE_NORMALS;
/// let user_choice: Option<bool> = None;
/// assert!(user_choice.unwrap_or(DEFAULT_INCLUDE_NORMALS));
/// ```
pub const DEFAULT_INCLUDE_NORMALS: bool = true;

/// Number of float components per indexed vertex position or normal.
///
/// # Examples
/// ```
/// use config::constants::COMPONENTS_PER_VERTEX;
/// let vertex_count = 8;
/// assert_eq!(vertex_count * COMPONENTS_PER_VERTEX, 24);
/// ```
pub const COMPONENTS_PER_VERTEX: usize = 3;

/// Immutable snapshot of configuration settings that can be shared between
/// the indexer and the tessellator.
///
/// # Examples
/// ```
/// use config::constants::GlobalConfig;
/// let config = GlobalConfig::default();
/// assert!(config.max_coordinate > 0.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlobalConfig {
    /// Whether indexed vertices are distinguished by normal as well as position.
    pub include_normals: bool,
    /// Largest absolute coordinate the triangulation engine accepts.
    pub max_coordinate: f32,
}

impl GlobalConfig {
    /// Builds a configuration enforcing strict validation of the supplied
    /// coordinate limit.
    ///
    /// # Examples
    /// ```
    /// use config::constants::GlobalConfig;
    /// let cfg = GlobalConfig::new(false, 1.0e5).expect("valid config");
    /// assert!(!cfg.include_normals);
    /// ```
    pub fn new(include_normals: bool, max_coordinate: f32) -> Result<Self, ConfigError> {
        if !max_coordinate.is_finite() || max_coordinate <= 0.0 {
            return Err(ConfigError::InvalidCoordinateLimit(max_coordinate));
        }
        if max_coordinate > MAX_VALID_COORD {
            return Err(ConfigError::CoordinateLimitTooLarge(max_coordinate));
        }
        Ok(Self {
            include_normals,
            max_coordinate,
        })
    }
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            include_normals: DEFAULT_INCLUDE_NORMALS,
            max_coordinate: MAX_VALID_COORD,
        }
    }
}

/// Error returned when invalid configuration values are provided.
#[derive(Debug, PartialEq)]
pub enum ConfigError {
    /// Raised when the coordinate limit is zero, negative or not finite.
    InvalidCoordinateLimit(f32),
    /// Raised when the coordinate limit exceeds what f32 orientation tests support.
    CoordinateLimitTooLarge(f32),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidCoordinateLimit(value) => {
                write!(f, "max_coordinate must be positive and finite: {value}")
            }
            ConfigError::CoordinateLimitTooLarge(value) => {
                write!(f, "max_coordinate must be <= {MAX_VALID_COORD}: {value}")
            }
        }
    }
}

impl std::error::Error for ConfigError {}
