//! C-facing entry points for mesh indexing and contour tessellation.
//!
//! This crate is compiled to a `cdylib` and loaded by native hosts (C, C#
//! P/Invoke). Rust tests link the `rlib` and call the same `extern "C"`
//! functions directly.
//!
//! ```
//! use geometry_capi::{collect_result, tessellate, COLLECT_OK};
//!
//! let vertices = [0.0_f32, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0];
//! let normals = [0.0_f32, 0.0, 1.0].repeat(3);
//! let counts = [3_i32];
//! let (mut v, mut n, mut i) = (0_i32, 0_i32, 0_i32);
//!
//! let job = unsafe {
//!     tessellate(vertices.as_ptr(), normals.as_ptr(), counts.as_ptr(), 1, &mut v, &mut n, &mut i)
//! };
//! assert!(job >= 0);
//! assert_eq!((v, n, i), (9, 9, 3));
//!
//! let mut positions = vec![0.0_f32; v as usize];
//! let mut out_normals = vec![0.0_f32; n as usize];
//! let mut indices = vec![0_u32; i as usize];
//! let status = unsafe {
//!     collect_result(
//!         job,
//!         positions.as_mut_ptr(), v,
//!         out_normals.as_mut_ptr(), n,
//!         indices.as_mut_ptr(), i,
//!     )
//! };
//! assert_eq!(status, COLLECT_OK);
//! ```

mod buffers;
pub mod mesh;
pub mod tess;

pub use mesh::{mesh_clean_memory, mesh_get_geometry_data, ExportableMesh};
pub use tess::{
    collect_result, tessellate, tessellation_pending_jobs, COLLECT_BUFFER_TOO_SMALL,
    COLLECT_INVALID_ARGUMENT, COLLECT_OK, COLLECT_UNKNOWN_JOB,
};

/// Installs an `env_logger` logger driven by `RUST_LOG`.
///
/// Safe to call more than once; later calls, or calls after the host
/// installed another logger, do nothing.
///
/// # Examples
/// ```no_run
/// // From C, once at startup:
/// // geometry_init_logging();
/// ```
#[no_mangle]
pub extern "C" fn geometry_init_logging() {
    let _ = env_logger::try_init();
}

#[cfg(test)]
mod tests;
