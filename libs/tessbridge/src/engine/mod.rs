//! # Triangulation Engines
//!
//! The seam between the tessellation service and the algorithm that turns
//! contours into triangles.
//!
//! An engine receives the non-degenerate contours (each knowing the global
//! number of its first vertex) and returns:
//!
//! - the output vertices,
//! - for every output vertex, the global input vertex it came from, or
//!   `None` if the engine synthesized it,
//! - triangles as triples of output vertex indices, where `None` marks an
//!   undefined corner.
//!
//! Contours are combined with the even-odd rule: a point is filled if a ray
//! from it crosses the contours an odd number of times.

mod ear_clip;
mod overlay;
mod planar;

pub use ear_clip::EarClipEngine;

use glam::Vec3;

use crate::contour::Contour;
use crate::error::EngineError;

/// Raw engine output, before normal lookup and triangle filtering.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TriangulationOutput {
    /// Output vertex positions
    pub vertices: Vec<Vec3>,
    /// Global input vertex of every output vertex (`None` if synthesized)
    pub vertex_origins: Vec<Option<u32>>,
    /// Triangles as output vertex indices (`None` if undefined)
    pub triangles: Vec<[Option<u32>; 3]>,
}

impl TriangulationOutput {
    /// Number of output vertices.
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Iterates the triangles whose three corners are defined.
    pub fn complete_triangles(&self) -> impl Iterator<Item = [u32; 3]> + '_ {
        self.triangles.iter().filter_map(|&[a, b, c]| Some([a?, b?, c?]))
    }
}

/// Polygon triangulation algorithm with even-odd winding.
pub trait TriangulationEngine: Send + Sync {
    /// Triangulates the union of `contours` under the even-odd rule.
    ///
    /// `contours` holds at least one contour and every contour has at least
    /// three vertices.
    ///
    /// # Errors
    ///
    /// Returns an [`EngineError`] if the input cannot be triangulated.
    fn triangulate(&self, contours: &[Contour<'_>]) -> Result<TriangulationOutput, EngineError>;
}

#[cfg(test)]
mod tests;
