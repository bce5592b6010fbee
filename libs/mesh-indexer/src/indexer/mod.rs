//! # Mesh Indexer
//!
//! Builds an [`IndexedMesh`] from a [`MeshSource`] in a single pass over the
//! corner stream.
//!
//! ## Algorithm
//!
//! 1. If normals are required and the source cannot supply one per corner,
//!    return an invalid, empty mesh.
//! 2. For each corner in source order, resolve its position (and normal),
//!    convert to `f32` and build its [`VertexKey`](crate::VertexKey).
//! 3. First occurrence of a key appends a vertex; every corner emits the
//!    index assigned to its key.
//!
//! The output has one index per corner and one vertex per distinct key.

use config::constants::{COMPONENTS_PER_VERTEX, DEFAULT_INCLUDE_NORMALS};
use config::constants::GlobalConfig;
use glam::{DVec3, Vec3};
use log::{debug, warn};

use crate::error::{MeshIndexError, Result};
use crate::key::VertexTable;
use crate::source::MeshSource;
use crate::stats::DedupStats;

// =============================================================================
// OPTIONS
// =============================================================================

/// Caller-chosen indexing mode.
///
/// Ignoring normals trades shading quality for size: corners that share a
/// position but not a normal collapse into one vertex and no normal buffer
/// is produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexingOptions {
    /// Key vertices on normals as well as positions.
    pub include_normals: bool,
}

impl IndexingOptions {
    /// Options that keep per-corner normals.
    pub const fn with_normals() -> Self {
        Self {
            include_normals: true,
        }
    }

    /// Options that drop normals and dedupe on position only.
    pub const fn ignore_normals() -> Self {
        Self {
            include_normals: false,
        }
    }
}

impl Default for IndexingOptions {
    fn default() -> Self {
        Self {
            include_normals: DEFAULT_INCLUDE_NORMALS,
        }
    }
}

impl From<&GlobalConfig> for IndexingOptions {
    fn from(config: &GlobalConfig) -> Self {
        Self {
            include_normals: config.include_normals,
        }
    }
}

// =============================================================================
// INDEXED MESH
// =============================================================================

/// Deduplicated, indexed mesh.
///
/// The mesh exclusively owns its buffers. It is deliberately not `Clone`:
/// release it once with [`free_mesh`] (or let it drop), or move the buffers
/// out with [`IndexedMesh::into_buffers`].
///
/// ## Memory Layout
///
/// - `positions`: [x0, y0, z0, x1, y1, z1, ...] - 3 floats per vertex
/// - `normals`: [nx0, ny0, nz0, ...] - 3 floats per vertex, if present
/// - `indices`: one entry per source corner, each `< vertex_count`
#[derive(Debug, Default, PartialEq)]
pub struct IndexedMesh {
    valid: bool,
    positions: Vec<f32>,
    normals: Option<Vec<f32>>,
    indices: Vec<u32>,
}

/// Buffers moved out of an [`IndexedMesh`].
#[derive(Debug, Default, PartialEq)]
pub struct MeshBuffers {
    /// Flat vertex positions
    pub positions: Vec<f32>,
    /// Flat vertex normals, if the mesh was indexed with normals
    pub normals: Option<Vec<f32>>,
    /// One vertex index per source corner
    pub indices: Vec<u32>,
}

impl IndexedMesh {
    /// An invalid mesh with empty buffers.
    pub(crate) fn invalid() -> Self {
        Self::default()
    }

    /// Returns false if required normals could not be retrieved.
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.valid
    }

    /// Number of distinct output vertices.
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.positions.len() / COMPONENTS_PER_VERTEX
    }

    /// Number of indices (equal to the number of source corners).
    #[inline]
    pub fn index_count(&self) -> usize {
        self.indices.len()
    }

    /// Returns true if the mesh carries a normal buffer.
    #[inline]
    pub fn has_normals(&self) -> bool {
        self.normals.is_some()
    }

    /// Flat position buffer.
    #[inline]
    pub fn positions(&self) -> &[f32] {
        &self.positions
    }

    /// Flat normal buffer, if present.
    #[inline]
    pub fn normals(&self) -> Option<&[f32]> {
        self.normals.as_deref()
    }

    /// Index buffer.
    #[inline]
    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    /// Iterates vertex positions as vectors.
    pub fn vertices(&self) -> impl Iterator<Item = Vec3> + '_ {
        self.positions
            .chunks_exact(COMPONENTS_PER_VERTEX)
            .map(Vec3::from_slice)
    }

    /// Iterates vertex normals as vectors (empty without a normal buffer).
    pub fn normal_vectors(&self) -> impl Iterator<Item = Vec3> + '_ {
        self.normals
            .as_deref()
            .unwrap_or_default()
            .chunks_exact(COMPONENTS_PER_VERTEX)
            .map(Vec3::from_slice)
    }

    /// Deduplication statistics for this mesh.
    pub fn stats(&self) -> DedupStats {
        DedupStats::new(self.index_count(), self.vertex_count())
    }

    /// Moves the buffers out, consuming the mesh.
    pub fn into_buffers(self) -> MeshBuffers {
        MeshBuffers {
            positions: self.positions,
            normals: self.normals,
            indices: self.indices,
        }
    }
}

/// Releases an indexed mesh.
///
/// Taking the mesh by value is what makes a second release impossible to
/// write.
pub fn free_mesh(mesh: IndexedMesh) {
    drop(mesh);
}

// =============================================================================
// INDEXING
// =============================================================================

/// Indexes one mesh.
///
/// # Errors
///
/// Returns [`MeshIndexError::ControlPointOutOfRange`] if a corner refers to
/// a control point outside the pool, and [`MeshIndexError::TooManyCorners`]
/// if the corner stream cannot be addressed with `u32` indices.
///
/// Missing normals are not an error: the returned mesh is simply invalid.
///
/// ## Example
///
/// ```rust
/// use glam::DVec3;
/// use mesh_indexer::{index_mesh, IndexingOptions, RawMesh};
///
/// let points = [DVec3::ZERO, DVec3::X, DVec3::Y];
/// let corners = [0, 1, 2];
///
/// // Normals requested but not available
/// let mesh = index_mesh(&RawMesh::new(&points, &corners, None), IndexingOptions::with_normals()).unwrap();
/// assert!(!mesh.is_valid());
///
/// // Position-only indexing never needs normals
/// let mesh = index_mesh(&RawMesh::new(&points, &corners, None), IndexingOptions::ignore_normals()).unwrap();
/// assert!(mesh.is_valid());
/// assert_eq!(mesh.vertex_count(), 3);
/// ```
pub fn index_mesh<S: MeshSource + ?Sized>(source: &S, options: IndexingOptions) -> Result<IndexedMesh> {
    let corners = source.polygon_vertices();
    let control_points = source.control_points();

    if corners.len() > u32::MAX as usize {
        return Err(MeshIndexError::TooManyCorners {
            count: corners.len(),
            max: u32::MAX as usize,
        });
    }

    let normals = if options.include_normals {
        match source.polygon_vertex_normals() {
            Some(normals) if normals.len() == corners.len() => Some(normals),
            Some(normals) => {
                warn!(
                    "normal array has {} entries for {} corners; mesh marked invalid",
                    normals.len(),
                    corners.len()
                );
                return Ok(IndexedMesh::invalid());
            }
            None => {
                warn!("per-corner normals unavailable; mesh marked invalid");
                return Ok(IndexedMesh::invalid());
            }
        }
    } else {
        None
    };

    let mut table = VertexTable::with_capacity(options.include_normals, control_points.len());
    let mut indices = Vec::with_capacity(corners.len());

    for (corner, &cp_index) in corners.iter().enumerate() {
        let position = resolve_control_point(control_points, corner, cp_index)?;
        let normal = normals.map(|n| n[corner].as_vec3());
        indices.push(table.insert(position, normal));
    }

    let (positions, normals) = table.into_buffers();
    let mesh = IndexedMesh {
        valid: true,
        positions,
        normals,
        indices,
    };

    debug!(
        "indexed {} corners into {} vertices (normals {})",
        mesh.index_count(),
        mesh.vertex_count(),
        if options.include_normals { "kept" } else { "ignored" }
    );

    Ok(mesh)
}

/// Fetches the single-precision position of the control point used by `corner`.
fn resolve_control_point(control_points: &[DVec3], corner: usize, cp_index: i32) -> Result<Vec3> {
    usize::try_from(cp_index)
        .ok()
        .and_then(|i| control_points.get(i))
        .map(|p| p.as_vec3())
        .ok_or_else(|| MeshIndexError::out_of_range(corner, i64::from(cp_index), control_points.len()))
}
