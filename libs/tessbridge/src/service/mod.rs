//! # Tessellation Service
//!
//! Runs triangulation jobs and hands results out on request.
//!
//! ## Protocol
//!
//! ```text
//! tessellate(contours) ─→ TessellationTicket { job_id, counts }
//!                                  │
//!        caller allocates buffers from counts
//!                                  ↓
//! collect_result(job_id, positions, normals, indices) ─→ job retired
//! ```
//!
//! Triangulation runs outside the store lock; only id allocation, insertion
//! and removal take it. A shared service is `Send + Sync`.

use config::constants::{GlobalConfig, TESS_VERTEX_SIZE};
use log::{debug, warn};
use parking_lot::Mutex;
use serde::Serialize;

use crate::contour::{Contour, ContourSet};
use crate::engine::{EarClipEngine, TriangulationEngine, TriangulationOutput};
use crate::error::{Result, TessError};
use crate::job::{JobId, JobStore, TessellationCounts, TessellationJob};
use crate::normals::resolve_normal;

/// Receipt for a stored tessellation result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TessellationTicket {
    /// Id to collect the result with
    pub job_id: JobId,
    /// Sizes of the stored buffers
    pub counts: TessellationCounts,
}

/// Tessellator plus the store of uncollected results.
///
/// ## Example
///
/// ```rust
/// use tessbridge::{ContourSet, TessellationService};
///
/// let positions = [0.0_f32, 0.0, 0.0, 1.0, 0.0, 0.0, 1.0, 1.0, 0.0, 0.0, 1.0, 0.0];
/// let normals = [0.0_f32, 0.0, 1.0].repeat(4);
/// let contours = ContourSet::new(&positions, &normals, &[4]).unwrap();
///
/// let service = TessellationService::new();
/// let ticket = service.tessellate(&contours).unwrap();
///
/// let mut out_positions = vec![0.0_f32; ticket.counts.position_len()];
/// let mut out_normals = vec![0.0_f32; ticket.counts.normal_len()];
/// let mut out_indices = vec![0_u32; ticket.counts.index_count];
/// service
///     .collect_result(ticket.job_id, &mut out_positions, &mut out_normals, &mut out_indices)
///     .unwrap();
/// assert_eq!(out_indices.len(), 6);
/// assert_eq!(service.pending_jobs(), 0);
/// ```
#[derive(Debug)]
pub struct TessellationService<E = EarClipEngine> {
    engine: E,
    store: Mutex<JobStore>,
}

impl TessellationService<EarClipEngine> {
    /// Creates a service with the built-in ear-clipping engine.
    pub fn new() -> Self {
        Self::with_engine(EarClipEngine::new())
    }

    /// Creates a service whose engine uses the limits in `config`.
    pub fn with_config(config: &GlobalConfig) -> Self {
        Self::with_engine(EarClipEngine::with_config(config))
    }
}

impl Default for TessellationService<EarClipEngine> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: TriangulationEngine> TessellationService<E> {
    /// Creates a service around a custom engine.
    pub fn with_engine(engine: E) -> Self {
        Self {
            engine,
            store: Mutex::new(JobStore::new()),
        }
    }

    /// The triangulation engine.
    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Triangulates `contours` and stores the result under a fresh job id.
    ///
    /// Contours with fewer than three vertices are skipped. Output normals
    /// are looked up from the input vertex each output vertex came from;
    /// synthesized vertices get a zero normal. Triangles with an undefined
    /// corner are dropped.
    ///
    /// # Errors
    ///
    /// - [`TessError::NoValidContour`] if every contour is degenerate
    /// - [`TessError::TriangulationFailed`] if the engine rejects the input
    /// - [`TessError::JobIdsExhausted`] if no id is left
    ///
    /// No job is stored on error.
    pub fn tessellate(&self, contours: &ContourSet<'_>) -> Result<TessellationTicket> {
        let surviving: Vec<Contour<'_>> = contours
            .contours()
            .filter(|contour| {
                if contour.is_degenerate() {
                    warn!(
                        "skipping contour {} with {} vertices",
                        contour.index(),
                        contour.len()
                    );
                }
                !contour.is_degenerate()
            })
            .collect();
        if surviving.is_empty() {
            return Err(TessError::NoValidContour);
        }

        let output = self.engine.triangulate(&surviving)?;
        let job = build_job(&output, contours);
        let counts = job.counts();

        let job_id = self.store.lock().insert(job)?;
        debug!(
            "job {job_id}: {} contours -> {} vertices, {} triangles",
            surviving.len(),
            counts.vertex_count,
            counts.triangle_count()
        );
        Ok(TessellationTicket { job_id, counts })
    }

    /// Copies a stored result into caller buffers and retires the job.
    ///
    /// Buffers must hold at least `position_len()`, `normal_len()` and
    /// `index_count` elements of the job's counts.
    ///
    /// # Errors
    ///
    /// - [`TessError::UnknownJob`] if the id was never issued or already collected
    /// - [`TessError::BufferTooSmall`] if a buffer is short; the job stays
    ///   stored and can be collected again
    pub fn collect_result(
        &self,
        job_id: JobId,
        positions: &mut [f32],
        normals: &mut [f32],
        indices: &mut [u32],
    ) -> Result<TessellationCounts> {
        let mut store = self.store.lock();
        let job = store.get(job_id).ok_or(TessError::UnknownJob(job_id))?;
        job.copy_into(positions, normals, indices)?;
        let counts = job.counts();
        store.remove(job_id);
        debug!("job {job_id} collected");
        Ok(counts)
    }

    /// Moves a stored result out and retires the job.
    ///
    /// # Errors
    ///
    /// Returns [`TessError::UnknownJob`] if the id was never issued or
    /// already collected.
    pub fn take_result(&self, job_id: JobId) -> Result<TessellationJob> {
        let job = self
            .store
            .lock()
            .remove(job_id)
            .ok_or(TessError::UnknownJob(job_id))?;
        debug!("job {job_id} taken");
        Ok(job)
    }

    /// Counts of a stored result, without collecting it.
    pub fn counts(&self, job_id: JobId) -> Option<TessellationCounts> {
        self.store.lock().get(job_id).map(TessellationJob::counts)
    }

    /// Number of results awaiting collection.
    pub fn pending_jobs(&self) -> usize {
        self.store.lock().len()
    }
}

/// Assembles the stored buffers from raw engine output.
fn build_job(output: &TriangulationOutput, contours: &ContourSet<'_>) -> TessellationJob {
    let vertex_count = output.vertex_count();
    let mut positions = Vec::with_capacity(vertex_count * TESS_VERTEX_SIZE);
    let mut normals = Vec::with_capacity(vertex_count * TESS_VERTEX_SIZE);

    for (i, vertex) in output.vertices.iter().enumerate() {
        let origin = output.vertex_origins.get(i).copied().flatten();
        positions.extend_from_slice(&vertex.to_array());
        normals.extend_from_slice(&resolve_normal(contours, origin).to_array());
    }

    let complete: Vec<[u32; 3]> = output
        .complete_triangles()
        .filter(|t| t.iter().all(|&i| (i as usize) < vertex_count))
        .collect();
    let dropped = output.triangles.len() - complete.len();
    if dropped > 0 {
        debug!("dropped {dropped} triangles with undefined corners");
    }

    TessellationJob {
        positions,
        normals,
        indices: complete.into_iter().flatten().collect(),
    }
}
