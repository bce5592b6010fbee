//! # Mesh Indexer
//!
//! Converts the flattened, per-polygon-corner attribute streams delivered by a
//! scene SDK into a deduplicated, indexed vertex buffer ready for rendering.
//!
//! ## Architecture
//!
//! ```text
//! MeshSource → index_mesh → VertexTable → IndexedMesh
//! ```
//!
//! Two corners collapse into one output vertex if and only if their position
//! (and, when requested, their normal) compare exactly equal after conversion
//! to `f32`. There is no epsilon welding.
//!
//! ## Usage
//!
//! ```rust
//! use glam::DVec3;
//! use mesh_indexer::{index_mesh, free_mesh, IndexingOptions, RawMesh};
//!
//! let points = [DVec3::ZERO, DVec3::X, DVec3::Y, DVec3::new(1.0, 1.0, 0.0)];
//! let corners = [0, 1, 2, 2, 1, 3];
//! let normals = [DVec3::Z; 6];
//!
//! let source = RawMesh::new(&points, &corners, Some(&normals));
//! let mesh = index_mesh(&source, IndexingOptions::default()).unwrap();
//!
//! assert!(mesh.is_valid());
//! assert_eq!(mesh.vertex_count(), 4);
//! assert_eq!(mesh.index_count(), 6);
//! free_mesh(mesh);
//! ```

pub mod batch;
pub mod error;
pub mod indexer;
pub mod key;
pub mod source;
pub mod stats;

pub use batch::index_meshes;
pub use error::{MeshIndexError, Result};
pub use indexer::{free_mesh, index_mesh, IndexedMesh, IndexingOptions, MeshBuffers};
pub use key::{VertexKey, VertexTable};
pub use source::{MeshData, MeshSource, RawMesh};
pub use stats::{DedupComparison, DedupStats};
