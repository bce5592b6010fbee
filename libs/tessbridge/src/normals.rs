//! # Normal Lookup
//!
//! Maps a tessellated vertex back to the normal of the input vertex it came
//! from. The origin is a global vertex number; it is resolved by walking the
//! contour vertex counts, subtracting each count from the remainder until
//! the remainder falls inside a contour.

use glam::Vec3;
use log::warn;

use crate::contour::ContourSet;

/// Location of a global vertex number within the contours.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VertexSlot {
    /// Contour holding the vertex
    pub contour: usize,
    /// Vertex position within that contour
    pub local: usize,
}

/// Finds the contour and local position of global vertex `origin`.
///
/// Returns `None` if `origin` is past the last contour.
///
/// ```rust
/// use tessbridge::normals::{locate_vertex, VertexSlot};
///
/// assert_eq!(locate_vertex(&[2, 3], 3), Some(VertexSlot { contour: 1, local: 1 }));
/// assert_eq!(locate_vertex(&[2, 3], 5), None);
/// ```
pub fn locate_vertex(counts: &[usize], origin: usize) -> Option<VertexSlot> {
    let mut remaining = origin;
    for (contour, &count) in counts.iter().enumerate() {
        if remaining < count {
            return Some(VertexSlot {
                contour,
                local: remaining,
            });
        }
        remaining -= count;
    }
    None
}

/// Normal for a tessellated vertex.
///
/// Vertices synthesized by the engine have no origin and get a zero normal.
pub fn resolve_normal(contours: &ContourSet<'_>, origin: Option<u32>) -> Vec3 {
    let Some(origin) = origin else {
        return Vec3::ZERO;
    };
    let normal = locate_vertex(contours.counts(), origin as usize).and_then(|slot| {
        contours
            .contour(slot.contour)
            .and_then(|contour| contour.normal(slot.local))
    });
    match normal {
        Some(normal) => normal,
        None => {
            warn!("tessellated vertex origin {origin} is outside the input; using zero normal");
            Vec3::ZERO
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_locate_walks_contour_counts() {
        let counts = [3, 0, 2, 4];
        assert_eq!(locate_vertex(&counts, 0), Some(VertexSlot { contour: 0, local: 0 }));
        assert_eq!(locate_vertex(&counts, 3), Some(VertexSlot { contour: 2, local: 0 }));
        assert_eq!(locate_vertex(&counts, 8), Some(VertexSlot { contour: 3, local: 3 }));
        assert_eq!(locate_vertex(&counts, 9), None);
        assert_eq!(locate_vertex(&[], 0), None);
    }

    #[test]
    fn test_resolve_after_degenerate_contour() {
        // Contour 0 has two vertices, contour 1 is a triangle
        let positions = [0.0; 15];
        let normals = [
            9.0, 9.0, 9.0, 9.0, 9.0, 9.0, //
            1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0,
        ];
        let set = ContourSet::new(&positions, &normals, &[2, 3]).unwrap();

        assert_eq!(resolve_normal(&set, Some(2)), Vec3::X);
        assert_eq!(resolve_normal(&set, Some(4)), Vec3::Z);
        assert_eq!(resolve_normal(&set, None), Vec3::ZERO);
        assert_eq!(resolve_normal(&set, Some(99)), Vec3::ZERO);
    }
}
