//! # Tessellation Export
//!
//! C entry points over one process-wide [`TessellationService`].
//!
//! `tessellate` returns a job id and reports buffer sizes through out
//! parameters; the host allocates and calls `collect_result`, which fills
//! the buffers and retires the job. Out-parameter sizes are float counts
//! for the position and normal buffers and index counts for the index
//! buffer, i.e. exactly the buffer lengths to allocate.

use std::sync::OnceLock;

use config::constants::{NO_JOB_ID, TESS_VERTEX_SIZE};
use log::{debug, warn};
use tessbridge::{ContourSet, JobId, TessError, TessellationCounts, TessellationService};

use crate::buffers::{borrow, borrow_mut, write_out};

/// `collect_result` succeeded.
pub const COLLECT_OK: i32 = 0;
/// The job id was never issued or was already collected.
pub const COLLECT_UNKNOWN_JOB: i32 = -1;
/// A buffer is shorter than the job's counts; the job is kept.
pub const COLLECT_BUFFER_TOO_SMALL: i32 = -2;
/// A length was negative or a buffer pointer was null.
pub const COLLECT_INVALID_ARGUMENT: i32 = -3;

static SERVICE: OnceLock<TessellationService> = OnceLock::new();

/// The shared service, created on first use.
pub fn service() -> &'static TessellationService {
    SERVICE.get_or_init(TessellationService::new)
}

/// Triangulates a set of contours and stores the result.
///
/// - `vertices`, `normals`: `3 * N` floats each, where `N` is the sum of
///   the contour vertex counts
/// - `contour_vertex_counts`: `contour_count` entries
///
/// On success returns a non-negative job id and writes the required
/// position, normal and index buffer lengths through the non-null out
/// pointers. On failure, including input with no usable contour, returns
/// `NO_JOB_ID` (-1) and leaves the out parameters untouched.
///
/// # Safety
///
/// Every non-null input pointer must reference the number of elements
/// stated above; every non-null out pointer must be valid for a write.
#[no_mangle]
pub unsafe extern "C" fn tessellate(
    vertices: *const f32,
    normals: *const f32,
    contour_vertex_counts: *const i32,
    contour_count: i32,
    out_vertex_count: *mut i32,
    out_normal_count: *mut i32,
    out_index_count: *mut i32,
) -> i32 {
    let Ok(contour_count) = usize::try_from(contour_count) else {
        warn!("tessellate: negative contour count {contour_count}");
        return NO_JOB_ID;
    };
    let Some(counts) = borrow(contour_vertex_counts, contour_count) else {
        warn!("tessellate: null contour counts");
        return NO_JOB_ID;
    };
    let Some(floats) = total_floats(counts) else {
        warn!("tessellate: invalid contour vertex counts");
        return NO_JOB_ID;
    };
    let (Some(positions), Some(normals)) = (borrow(vertices, floats), borrow(normals, floats)) else {
        warn!("tessellate: null vertex or normal array");
        return NO_JOB_ID;
    };

    let ticket = ContourSet::from_raw(positions, normals, counts, contour_count)
        .and_then(|contours| service().tessellate(&contours));
    match ticket {
        Ok(ticket) => match abi_lengths(ticket.counts) {
            Some([vertex_len, normal_len, index_len]) => {
                write_out(out_vertex_count, vertex_len);
                write_out(out_normal_count, normal_len);
                write_out(out_index_count, index_len);
                ticket.job_id.to_raw()
            }
            None => {
                warn!("tessellate: job {} too large for 32-bit counts", ticket.job_id);
                // Nothing can collect it through the ABI
                let _ = service().take_result(ticket.job_id);
                NO_JOB_ID
            }
        },
        Err(err) if err.is_no_output() => {
            debug!("tessellate: no output ({err})");
            NO_JOB_ID
        }
        Err(err) => {
            warn!("tessellate: {err}");
            NO_JOB_ID
        }
    }
}

/// Copies a stored result into host buffers and retires the job.
///
/// Buffer lengths are element counts and must be at least the values
/// `tessellate` reported. Returns [`COLLECT_OK`] or one of the
/// `COLLECT_*` error codes. A job survives a [`COLLECT_BUFFER_TOO_SMALL`]
/// failure and may be collected again.
///
/// # Safety
///
/// Each buffer pointer must be valid for writes of its stated length.
#[no_mangle]
pub unsafe extern "C" fn collect_result(
    job_id: i32,
    out_vertex_buffer: *mut f32,
    vertex_buffer_len: i32,
    out_normal_buffer: *mut f32,
    normal_buffer_len: i32,
    out_index_buffer: *mut u32,
    index_buffer_len: i32,
) -> i32 {
    let Some(job_id) = JobId::from_raw(job_id) else {
        return COLLECT_UNKNOWN_JOB;
    };
    let (Ok(vertex_len), Ok(normal_len), Ok(index_len)) = (
        usize::try_from(vertex_buffer_len),
        usize::try_from(normal_buffer_len),
        usize::try_from(index_buffer_len),
    ) else {
        return COLLECT_INVALID_ARGUMENT;
    };
    let (Some(positions), Some(normals), Some(indices)) = (
        borrow_mut(out_vertex_buffer, vertex_len),
        borrow_mut(out_normal_buffer, normal_len),
        borrow_mut(out_index_buffer, index_len),
    ) else {
        return COLLECT_INVALID_ARGUMENT;
    };

    match service().collect_result(job_id, positions, normals, indices) {
        Ok(_) => COLLECT_OK,
        Err(TessError::UnknownJob(_)) => COLLECT_UNKNOWN_JOB,
        Err(err @ TessError::BufferTooSmall { .. }) => {
            warn!("collect_result: {err}");
            COLLECT_BUFFER_TOO_SMALL
        }
        Err(err) => {
            warn!("collect_result: {err}");
            COLLECT_INVALID_ARGUMENT
        }
    }
}

/// Number of tessellation results awaiting collection.
#[no_mangle]
pub extern "C" fn tessellation_pending_jobs() -> i32 {
    i32::try_from(service().pending_jobs()).unwrap_or(i32::MAX)
}

fn total_floats(counts: &[i32]) -> Option<usize> {
    counts
        .iter()
        .try_fold(0usize, |total, &count| total.checked_add(usize::try_from(count).ok()?))?
        .checked_mul(TESS_VERTEX_SIZE)
}

fn abi_lengths(counts: TessellationCounts) -> Option<[i32; 3]> {
    Some([
        i32::try_from(counts.position_len()).ok()?,
        i32::try_from(counts.normal_len()).ok()?,
        i32::try_from(counts.index_count).ok()?,
    ])
}
