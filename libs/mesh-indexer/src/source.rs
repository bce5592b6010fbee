//! # Mesh Sources
//!
//! The indexer does not read any file format itself. A scene SDK binding
//! exposes each mesh through [`MeshSource`]: the control-point pool, the
//! per-polygon-corner control-point indices, and (if the SDK can produce
//! them) one normal per polygon corner.

use glam::DVec3;

/// Raw per-corner mesh data as delivered by a scene SDK.
///
/// All arrays are in SDK order. `polygon_vertices()[i]` is the control point
/// used by corner `i`; `polygon_vertex_normals()[i]` is that corner's normal.
pub trait MeshSource {
    /// Control-point position pool.
    fn control_points(&self) -> &[DVec3];

    /// Control-point index of every polygon corner, in source order.
    fn polygon_vertices(&self) -> &[i32];

    /// One normal per polygon corner, or `None` if the SDK failed to
    /// produce them.
    fn polygon_vertex_normals(&self) -> Option<&[DVec3]>;

    /// Number of polygon corners.
    fn polygon_vertex_count(&self) -> usize {
        self.polygon_vertices().len()
    }
}

/// Borrowed view over SDK-owned arrays.
///
/// ## Example
///
/// ```rust
/// use glam::DVec3;
/// use mesh_indexer::{MeshSource, RawMesh};
///
/// let points = [DVec3::ZERO, DVec3::X, DVec3::Y];
/// let corners = [0, 1, 2];
/// let mesh = RawMesh::new(&points, &corners, None);
/// assert_eq!(mesh.polygon_vertex_count(), 3);
/// assert!(mesh.polygon_vertex_normals().is_none());
/// ```
#[derive(Debug, Clone, Copy)]
pub struct RawMesh<'a> {
    control_points: &'a [DVec3],
    polygon_vertices: &'a [i32],
    normals: Option<&'a [DVec3]>,
}

impl<'a> RawMesh<'a> {
    /// Wraps borrowed SDK arrays.
    pub fn new(
        control_points: &'a [DVec3],
        polygon_vertices: &'a [i32],
        normals: Option<&'a [DVec3]>,
    ) -> Self {
        Self {
            control_points,
            polygon_vertices,
            normals,
        }
    }
}

impl MeshSource for RawMesh<'_> {
    fn control_points(&self) -> &[DVec3] {
        self.control_points
    }

    fn polygon_vertices(&self) -> &[i32] {
        self.polygon_vertices
    }

    fn polygon_vertex_normals(&self) -> Option<&[DVec3]> {
        self.normals
    }
}

/// Owned mesh arrays, for callers that copy out of the SDK before indexing
/// (for example to index many meshes in parallel).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshData {
    /// Control-point position pool
    pub control_points: Vec<DVec3>,
    /// Control-point index per polygon corner
    pub polygon_vertices: Vec<i32>,
    /// Normal per polygon corner, if available
    pub normals: Option<Vec<DVec3>>,
}

impl MeshData {
    /// Creates owned mesh data.
    pub fn new(
        control_points: Vec<DVec3>,
        polygon_vertices: Vec<i32>,
        normals: Option<Vec<DVec3>>,
    ) -> Self {
        Self {
            control_points,
            polygon_vertices,
            normals,
        }
    }

    /// Borrows the data as a [`RawMesh`].
    pub fn as_raw(&self) -> RawMesh<'_> {
        RawMesh::new(
            &self.control_points,
            &self.polygon_vertices,
            self.normals.as_deref(),
        )
    }
}

impl MeshSource for MeshData {
    fn control_points(&self) -> &[DVec3] {
        &self.control_points
    }

    fn polygon_vertices(&self) -> &[i32] {
        &self.polygon_vertices
    }

    fn polygon_vertex_normals(&self) -> Option<&[DVec3]> {
        self.normals.as_deref()
    }
}
