//! # Contour Input
//!
//! Borrowed view over the flat tessellation input: one position array and
//! one normal array (3 floats per vertex each, all contours back to back)
//! plus the number of vertices in every contour.
//!
//! Vertices are numbered globally across all contours, degenerate contours
//! included. That global number is what the engine reports as a vertex
//! origin and what normal lookup resolves.

use config::constants::{MIN_CONTOUR_VERTICES, TESS_VERTEX_SIZE};
use glam::Vec3;

use crate::error::{Result, TessError};

/// One contour inside a [`ContourSet`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contour<'a> {
    index: usize,
    first_vertex: usize,
    positions: &'a [f32],
    normals: &'a [f32],
}

impl<'a> Contour<'a> {
    /// Position of this contour in the input.
    #[inline]
    pub fn index(&self) -> usize {
        self.index
    }

    /// Global index of this contour's first vertex.
    #[inline]
    pub fn first_vertex(&self) -> usize {
        self.first_vertex
    }

    /// Number of vertices.
    #[inline]
    pub fn len(&self) -> usize {
        self.positions.len() / TESS_VERTEX_SIZE
    }

    /// Returns true if the contour has no vertices.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Returns true if the contour has too few vertices to enclose an area.
    #[inline]
    pub fn is_degenerate(&self) -> bool {
        self.len() < MIN_CONTOUR_VERTICES
    }

    /// Vertex positions in contour order.
    pub fn points(&self) -> impl Iterator<Item = Vec3> + 'a {
        self.positions
            .chunks_exact(TESS_VERTEX_SIZE)
            .map(Vec3::from_slice)
    }

    /// Normal of the vertex at `local` within this contour.
    pub fn normal(&self, local: usize) -> Option<Vec3> {
        let start = local.checked_mul(TESS_VERTEX_SIZE)?;
        self.normals
            .get(start..start + TESS_VERTEX_SIZE)
            .map(Vec3::from_slice)
    }
}

/// Validated flat contour input.
///
/// ## Example
///
/// ```rust
/// use tessbridge::ContourSet;
///
/// let positions = [0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0];
/// let normals = [0.0, 0.0, 1.0, 0.0, 0.0, 1.0, 0.0, 0.0, 1.0];
/// let set = ContourSet::new(&positions, &normals, &[3]).unwrap();
/// assert_eq!(set.vertex_count(), 3);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ContourSet<'a> {
    positions: &'a [f32],
    normals: &'a [f32],
    counts: Vec<usize>,
    offsets: Vec<usize>,
}

impl<'a> ContourSet<'a> {
    /// Creates a contour set from flat arrays.
    ///
    /// # Errors
    ///
    /// Returns [`TessError::InvalidInput`] unless both arrays hold exactly
    /// `3 * Σ counts` floats, or if the total vertex count does not fit in
    /// a `u32`.
    pub fn new(positions: &'a [f32], normals: &'a [f32], counts: &[usize]) -> Result<Self> {
        let mut offsets = Vec::with_capacity(counts.len());
        let mut total = 0usize;
        for &count in counts {
            offsets.push(total);
            total = total
                .checked_add(count)
                .ok_or_else(|| TessError::invalid_input("vertex count overflows"))?;
        }
        if total > u32::MAX as usize {
            return Err(TessError::invalid_input(format!(
                "{total} vertices exceed the u32 index range"
            )));
        }

        let expected = total * TESS_VERTEX_SIZE;
        if positions.len() != expected {
            return Err(TessError::invalid_input(format!(
                "position array holds {} floats, contours need {expected}",
                positions.len()
            )));
        }
        if normals.len() != expected {
            return Err(TessError::invalid_input(format!(
                "normal array holds {} floats, contours need {expected}",
                normals.len()
            )));
        }

        Ok(Self {
            positions,
            normals,
            counts: counts.to_vec(),
            offsets,
        })
    }

    /// Creates a contour set from signed counts and an explicit contour count,
    /// as delivered across the C ABI.
    ///
    /// # Errors
    ///
    /// Returns [`TessError::InvalidInput`] if `contour_count` exceeds
    /// `counts.len()`, if any used count is negative, or for the reasons
    /// listed on [`ContourSet::new`].
    pub fn from_raw(
        positions: &'a [f32],
        normals: &'a [f32],
        counts: &[i32],
        contour_count: usize,
    ) -> Result<Self> {
        let used = counts.get(..contour_count).ok_or_else(|| {
            TessError::invalid_input(format!(
                "contour count {contour_count} exceeds {} vertex counts",
                counts.len()
            ))
        })?;
        let counts = used
            .iter()
            .enumerate()
            .map(|(contour, &count)| {
                usize::try_from(count).map_err(|_| {
                    TessError::invalid_input(format!("contour {contour} has negative vertex count {count}"))
                })
            })
            .collect::<Result<Vec<usize>>>()?;
        Self::new(positions, normals, &counts)
    }

    /// Number of contours, degenerate ones included.
    #[inline]
    pub fn contour_count(&self) -> usize {
        self.counts.len()
    }

    /// Total number of input vertices.
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.positions.len() / TESS_VERTEX_SIZE
    }

    /// Vertex count of every contour, in input order.
    #[inline]
    pub fn counts(&self) -> &[usize] {
        &self.counts
    }

    /// Returns the contour at `index`.
    pub fn contour(&self, index: usize) -> Option<Contour<'a>> {
        let first_vertex = *self.offsets.get(index)?;
        let count = self.counts[index];
        let range = first_vertex * TESS_VERTEX_SIZE..(first_vertex + count) * TESS_VERTEX_SIZE;
        Some(Contour {
            index,
            first_vertex,
            positions: &self.positions[range.clone()],
            normals: &self.normals[range],
        })
    }

    /// Iterates all contours in input order.
    pub fn contours(&self) -> impl Iterator<Item = Contour<'a>> + '_ {
        (0..self.contour_count()).filter_map(move |index| self.contour(index))
    }
}
