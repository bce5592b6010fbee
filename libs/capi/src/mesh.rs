//! # Mesh Export
//!
//! `mesh_get_geometry_data` indexes one mesh and returns a boxed
//! [`ExportableMesh`]; `mesh_clean_memory` releases it and its buffers.

use std::ptr;

use config::constants::COMPONENTS_PER_VERTEX;
use glam::DVec3;
use log::warn;
use mesh_indexer::{index_mesh, IndexedMesh, IndexingOptions, MeshData};

use crate::buffers::{borrow, into_raw, release};

/// Indexed mesh as seen from C.
///
/// `vertex_count` and `index_count` are element counts: the position and
/// normal buffers hold `3 * vertex_count` floats, the index buffer holds
/// `index_count` entries. Empty buffers are null, and so is the normal
/// buffer when normals were ignored. An invalid mesh has no buffers.
#[repr(C)]
#[derive(Debug)]
pub struct ExportableMesh {
    /// `1` for a usable mesh, `0` if requested normals were unavailable.
    /// Four bytes wide so it reads as a Win32 `BOOL`.
    pub valid: i32,
    /// Number of distinct vertices
    pub vertex_count: i32,
    /// Number of indices (one per source corner)
    pub index_count: i32,
    /// Flat positions `[x, y, z, ...]`
    pub vertex_position_data: *mut f32,
    /// Flat normals `[nx, ny, nz, ...]`, or null
    pub vertex_normal_data: *mut f32,
    /// Vertex indices
    pub index_data: *mut u32,
}

impl ExportableMesh {
    /// Hands the mesh buffers over to C. Fails if a count exceeds `i32`.
    fn from_indexed(mesh: IndexedMesh) -> Option<Self> {
        let valid = i32::from(mesh.is_valid());
        let vertex_count = i32::try_from(mesh.vertex_count()).ok()?;
        let index_count = i32::try_from(mesh.index_count()).ok()?;
        let buffers = mesh.into_buffers();
        Some(Self {
            valid,
            vertex_count,
            index_count,
            vertex_position_data: into_raw(buffers.positions),
            vertex_normal_data: buffers.normals.map_or(ptr::null_mut(), into_raw),
            index_data: into_raw(buffers.indices),
        })
    }

    /// Frees the buffers.
    ///
    /// # Safety
    ///
    /// The pointers and counts must be exactly as produced by
    /// [`ExportableMesh::from_indexed`].
    unsafe fn release_buffers(&self) {
        let floats = self.vertex_count as usize * COMPONENTS_PER_VERTEX;
        release(self.vertex_position_data, floats);
        release(self.vertex_normal_data, floats);
        release(self.index_data, self.index_count as usize);
    }
}

/// Indexes one mesh into a deduplicated vertex buffer.
///
/// - `control_points`: `3 * control_point_count` doubles
/// - `polygon_vertices`: `polygon_vertex_count` control-point indices, one
///   per polygon corner
/// - `normals`: `3 * polygon_vertex_count` doubles, one normal per corner,
///   or null if the source has none
///
/// With `include_normals` set and `normals` null the result is a mesh with
/// `valid == 0`. Returns null for negative counts, null arrays with
/// non-zero counts, or corners referencing missing control points.
///
/// The returned mesh must be released with [`mesh_clean_memory`].
///
/// # Safety
///
/// Every non-null pointer must reference the number of elements stated
/// above for the duration of the call.
#[no_mangle]
pub unsafe extern "C" fn mesh_get_geometry_data(
    control_points: *const f64,
    control_point_count: i32,
    polygon_vertices: *const i32,
    polygon_vertex_count: i32,
    normals: *const f64,
    include_normals: bool,
) -> *mut ExportableMesh {
    let (Ok(point_count), Ok(corner_count)) = (
        usize::try_from(control_point_count),
        usize::try_from(polygon_vertex_count),
    ) else {
        warn!("negative count passed to mesh_get_geometry_data");
        return ptr::null_mut();
    };
    let Some(points) = borrow(control_points, point_count * COMPONENTS_PER_VERTEX) else {
        return ptr::null_mut();
    };
    let Some(corners) = borrow(polygon_vertices, corner_count) else {
        return ptr::null_mut();
    };
    let corner_normals = if normals.is_null() {
        None
    } else {
        borrow(normals, corner_count * COMPONENTS_PER_VERTEX).map(to_vectors)
    };

    let data = MeshData::new(to_vectors(points), corners.to_vec(), corner_normals);
    let options = if include_normals {
        IndexingOptions::with_normals()
    } else {
        IndexingOptions::ignore_normals()
    };

    match index_mesh(&data, options) {
        Ok(mesh) => match ExportableMesh::from_indexed(mesh) {
            Some(exported) => Box::into_raw(Box::new(exported)),
            None => {
                warn!("indexed mesh too large for 32-bit counts");
                ptr::null_mut()
            }
        },
        Err(err) => {
            warn!("mesh_get_geometry_data: {err}");
            ptr::null_mut()
        }
    }
}

/// Releases a mesh returned by [`mesh_get_geometry_data`]. Null is ignored.
///
/// # Safety
///
/// `mesh` must be null or a pointer returned by [`mesh_get_geometry_data`]
/// that has not been released yet, with its fields unmodified.
#[no_mangle]
pub unsafe extern "C" fn mesh_clean_memory(mesh: *mut ExportableMesh) {
    if mesh.is_null() {
        return;
    }
    let mesh = Box::from_raw(mesh);
    mesh.release_buffers();
}

fn to_vectors(flat: &[f64]) -> Vec<DVec3> {
    flat.chunks_exact(COMPONENTS_PER_VERTEX)
        .map(DVec3::from_slice)
        .collect()
}
