//! Tests for the C entry points, called through their Rust signatures.
//!
//! The tessellation service is process-wide and tests run in parallel, so
//! nothing here asserts exact job ids or global pending counts.

use std::ptr;
use std::slice;

use super::*;
use crate::tess::service;
use config::constants::NO_JOB_ID;

// =============================================================================
// MESH EXPORT
// =============================================================================

/// Two triangles sharing an edge, corners listed per polygon.
const POINTS: [f64; 12] = [0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 1.0, 1.0, 0.0];
const CORNERS: [i32; 6] = [0, 1, 2, 2, 1, 3];

fn up_normals() -> Vec<f64> {
    [0.0, 0.0, 1.0].repeat(CORNERS.len())
}

#[test]
fn test_mesh_export_shares_vertices() {
    let normals = up_normals();
    unsafe {
        let mesh = mesh_get_geometry_data(
            POINTS.as_ptr(),
            4,
            CORNERS.as_ptr(),
            6,
            normals.as_ptr(),
            true,
        );
        assert!(!mesh.is_null());
        let m = &*mesh;
        assert_eq!(m.valid, 1);
        assert_eq!(m.vertex_count, 4);
        assert_eq!(m.index_count, 6);

        let positions = slice::from_raw_parts(m.vertex_position_data, 12);
        let out_normals = slice::from_raw_parts(m.vertex_normal_data, 12);
        let indices = slice::from_raw_parts(m.index_data, 6);
        assert_eq!(indices, &[0, 1, 2, 2, 1, 3]);
        assert_eq!(&positions[9..12], &[1.0, 1.0, 0.0]);
        assert!(out_normals.chunks_exact(3).all(|n| n == [0.0, 0.0, 1.0]));

        mesh_clean_memory(mesh);
    }
}

#[test]
fn test_mesh_export_without_normals_requested() {
    unsafe {
        let mesh = mesh_get_geometry_data(POINTS.as_ptr(), 4, CORNERS.as_ptr(), 6, ptr::null(), false);
        assert!(!mesh.is_null());
        assert_eq!((*mesh).valid, 1);
        assert_eq!((*mesh).vertex_count, 4);
        assert!((*mesh).vertex_normal_data.is_null());
        mesh_clean_memory(mesh);
    }
}

#[test]
fn test_mesh_export_missing_normals_is_invalid() {
    unsafe {
        let mesh = mesh_get_geometry_data(POINTS.as_ptr(), 4, CORNERS.as_ptr(), 6, ptr::null(), true);
        assert!(!mesh.is_null());
        let m = &*mesh;
        assert_eq!(m.valid, 0);
        assert_eq!(m.vertex_count, 0);
        assert_eq!(m.index_count, 0);
        assert!(m.vertex_position_data.is_null());
        assert!(m.vertex_normal_data.is_null());
        assert!(m.index_data.is_null());
        mesh_clean_memory(mesh);
    }
}

#[test]
fn test_mesh_export_rejects_bad_arguments() {
    let bad_corners = [0, 1, 9];
    let normals = up_normals();
    unsafe {
        // Corner references a missing control point
        assert!(mesh_get_geometry_data(POINTS.as_ptr(), 4, bad_corners.as_ptr(), 3, normals.as_ptr(), true).is_null());
        assert!(mesh_get_geometry_data(POINTS.as_ptr(), -1, CORNERS.as_ptr(), 6, ptr::null(), false).is_null());
        assert!(mesh_get_geometry_data(ptr::null(), 4, CORNERS.as_ptr(), 6, ptr::null(), false).is_null());
    }
}

#[test]
fn test_mesh_valid_flag_is_four_bytes() {
    // Hosts marshal the flag as a 32-bit BOOL
    assert_eq!(std::mem::size_of::<i32>(), 4);
    assert_eq!(std::mem::offset_of!(ExportableMesh, vertex_count), 4);
}

#[test]
fn test_mesh_clean_memory_accepts_null() {
    unsafe { mesh_clean_memory(ptr::null_mut()) };
}

// =============================================================================
// TESSELLATION
// =============================================================================

struct Lengths {
    vertex: i32,
    normal: i32,
    index: i32,
}

fn run_tessellate(vertices: &[f32], normals: &[f32], counts: &[i32]) -> (i32, Lengths) {
    let mut lengths = Lengths {
        vertex: -7,
        normal: -7,
        index: -7,
    };
    let job = unsafe {
        tessellate(
            vertices.as_ptr(),
            normals.as_ptr(),
            counts.as_ptr(),
            counts.len() as i32,
            &mut lengths.vertex,
            &mut lengths.normal,
            &mut lengths.index,
        )
    };
    (job, lengths)
}

fn square(size: f32, offset: f32) -> Vec<f32> {
    let (lo, hi) = (offset, offset + size);
    vec![lo, lo, 0.0, hi, lo, 0.0, hi, hi, 0.0, lo, hi, 0.0]
}

#[test]
fn test_tessellate_then_collect() {
    let vertices = square(1.0, 0.0);
    let normals = [0.0, 0.0, 1.0].repeat(4);
    let (job, lengths) = run_tessellate(&vertices, &normals, &[4]);
    assert!(job >= 0);
    assert_eq!((lengths.vertex, lengths.normal, lengths.index), (12, 12, 6));

    let mut positions = vec![0.0_f32; 12];
    let mut out_normals = vec![0.0_f32; 12];
    let mut indices = vec![0_u32; 6];
    let status = unsafe {
        collect_result(
            job,
            positions.as_mut_ptr(),
            12,
            out_normals.as_mut_ptr(),
            12,
            indices.as_mut_ptr(),
            6,
        )
    };
    assert_eq!(status, COLLECT_OK);
    assert_eq!(positions, vertices);
    assert_eq!(out_normals, normals);
    assert!(indices.iter().all(|&i| i < 4));

    // Retired after one collection
    let again = unsafe {
        collect_result(
            job,
            positions.as_mut_ptr(),
            12,
            out_normals.as_mut_ptr(),
            12,
            indices.as_mut_ptr(),
            6,
        )
    };
    assert_eq!(again, COLLECT_UNKNOWN_JOB);
}

#[test]
fn test_tessellate_square_with_hole() {
    let mut vertices = square(4.0, 0.0);
    vertices.extend(square(2.0, 1.0));
    let normals = [0.0, 0.0, 1.0].repeat(8);
    let (job, lengths) = run_tessellate(&vertices, &normals, &[4, 4]);
    assert!(job >= 0);
    assert_eq!(lengths.vertex, 24);
    assert_eq!(lengths.index, 24);
    assert!(service().take_result(tessbridge::JobId::new(job as u32)).is_ok());
}

#[test]
fn test_tessellate_failure_returns_sentinel() {
    // Only a two-vertex contour
    let vertices = [0.0, 0.0, 0.0, 1.0, 0.0, 0.0];
    let normals = [0.0; 6];
    let (job, lengths) = run_tessellate(&vertices, &normals, &[2]);
    assert_eq!(job, NO_JOB_ID);
    assert_eq!(lengths.vertex, -7);

    // Not finite
    let broken = [0.0, 0.0, 0.0, f32::NAN, 0.0, 0.0, 0.0, 1.0, 0.0];
    let (job, _) = run_tessellate(&broken, &[0.0; 9], &[3]);
    assert_eq!(job, NO_JOB_ID);

    // Negative count
    let (job, _) = run_tessellate(&broken, &[0.0; 9], &[-3]);
    assert_eq!(job, NO_JOB_ID);
}

#[test]
fn test_tessellate_self_intersecting_contour() {
    let bow_tie = [0.0, 0.0, 0.0, 2.0, 2.0, 0.0, 2.0, 0.0, 0.0, 0.0, 2.0, 0.0];
    let normals = [0.0, 0.0, 1.0].repeat(4);
    let (job, lengths) = run_tessellate(&bow_tie, &normals, &[4]);
    assert!(job >= 0);
    // Four input vertices plus the crossing, two triangles
    assert_eq!((lengths.vertex, lengths.normal, lengths.index), (15, 15, 6));
    assert!(service().take_result(tessbridge::JobId::new(job as u32)).is_ok());
}

#[test]
fn test_tessellate_accepts_null_out_params() {
    let vertices = square(1.0, 5.0);
    let normals = [0.0; 12];
    let counts = [4];
    let job = unsafe {
        tessellate(
            vertices.as_ptr(),
            normals.as_ptr(),
            counts.as_ptr(),
            1,
            ptr::null_mut(),
            ptr::null_mut(),
            ptr::null_mut(),
        )
    };
    assert!(job >= 0);
    assert!(service().counts(tessbridge::JobId::new(job as u32)).is_some());
    assert!(service().take_result(tessbridge::JobId::new(job as u32)).is_ok());
}

#[test]
fn test_short_buffer_keeps_job_for_retry() {
    let vertices = square(1.0, 2.0);
    let normals = [0.0, 1.0, 0.0].repeat(4);
    let (job, _) = run_tessellate(&vertices, &normals, &[4]);
    assert!(job >= 0);

    let mut positions = vec![0.0_f32; 12];
    let mut out_normals = vec![0.0_f32; 12];
    let mut indices = vec![0_u32; 6];
    let status = unsafe {
        collect_result(
            job,
            positions.as_mut_ptr(),
            12,
            out_normals.as_mut_ptr(),
            12,
            indices.as_mut_ptr(),
            5,
        )
    };
    assert_eq!(status, COLLECT_BUFFER_TOO_SMALL);

    let status = unsafe {
        collect_result(
            job,
            positions.as_mut_ptr(),
            12,
            out_normals.as_mut_ptr(),
            12,
            indices.as_mut_ptr(),
            6,
        )
    };
    assert_eq!(status, COLLECT_OK);
}

#[test]
fn test_collect_rejects_bad_arguments() {
    let mut buffer = [0.0_f32; 3];
    let mut indices = [0_u32; 3];
    unsafe {
        assert_eq!(
            collect_result(NO_JOB_ID, buffer.as_mut_ptr(), 3, buffer.as_mut_ptr(), 3, indices.as_mut_ptr(), 3),
            COLLECT_UNKNOWN_JOB
        );
        assert_eq!(
            collect_result(0, ptr::null_mut(), 3, ptr::null_mut(), 3, indices.as_mut_ptr(), 3),
            COLLECT_INVALID_ARGUMENT
        );
        assert_eq!(
            collect_result(0, buffer.as_mut_ptr(), -1, buffer.as_mut_ptr(), 3, indices.as_mut_ptr(), 3),
            COLLECT_INVALID_ARGUMENT
        );
    }
}

#[test]
fn test_pending_jobs_is_non_negative() {
    assert!(tessellation_pending_jobs() >= 0);
}

#[test]
fn test_logging_init_is_idempotent() {
    geometry_init_logging();
    geometry_init_logging();
}
