//! # Batch Indexing
//!
//! Indexes many independent meshes in parallel. Each mesh is indexed on its
//! own; no state is shared between them, so results are identical to calling
//! [`index_mesh`] in a loop.

use rayon::prelude::*;

use crate::error::Result;
use crate::indexer::{index_mesh, IndexedMesh, IndexingOptions};
use crate::source::MeshSource;

/// Indexes every source in parallel, returning results in input order.
///
/// ## Example
///
/// ```rust
/// use glam::DVec3;
/// use mesh_indexer::{index_meshes, IndexingOptions, MeshData};
///
/// let meshes = vec![
///     MeshData::new(vec![DVec3::ZERO, DVec3::X, DVec3::Y], vec![0, 1, 2], None),
///     MeshData::new(vec![DVec3::ZERO], vec![0, 0, 0], None),
/// ];
/// let results = index_meshes(&meshes, IndexingOptions::ignore_normals());
/// assert_eq!(results.len(), 2);
/// assert_eq!(results[1].as_ref().unwrap().vertex_count(), 1);
/// ```
pub fn index_meshes<S>(sources: &[S], options: IndexingOptions) -> Vec<Result<IndexedMesh>>
where
    S: MeshSource + Sync,
{
    sources
        .par_iter()
        .map(|source| index_mesh(source, options))
        .collect()
}
