//! # Ear-Clipping Engine
//!
//! Triangulates contours under the even-odd rule.
//!
//! ## Algorithm
//!
//! 1. Reject coordinates that are not finite or exceed the configured limit
//! 2. Project every contour along the dominant axis of the combined Newell
//!    normal
//! 3. Drop repeated points and contours that enclose no area
//! 4. Resolve crossing, touching and overlapping edges into loops that
//!    never cross (see `overlay`)
//! 5. Classify contours by nesting depth: even depth fills, odd depth is a
//!    hole in its innermost container
//! 6. Orient boundaries counter-clockwise and holes clockwise, then bridge
//!    each hole into its boundary through a mutually visible vertex pair
//! 7. Clip ears with exact orientation tests
//!
//! Output vertices are the referenced input vertices in input order,
//! followed by any crossing vertices, and every triangle turns
//! counter-clockwise around the projection normal.

use config::constants::{GlobalConfig, MAX_VALID_COORD, MIN_CONTOUR_VERTICES};
use glam::{DVec2, DVec3};
use log::trace;

use super::overlay::{resolve, Arena, Loop};
use super::planar::{
    in_triangle, is_collinear, locally_inside, locate, newell_normal, orient, segments_conflict,
    signed_area, Location, Projection,
};
use super::{TriangulationEngine, TriangulationOutput};
use crate::contour::Contour;
use crate::error::EngineError;

/// Built-in triangulation engine.
///
/// Handles non-convex contours, holes, islands inside holes and
/// self-intersecting input. Where two edges cross, a new vertex is added
/// with no input origin; its position interpolates both edges.
///
/// ## Example
///
/// ```rust
/// use tessbridge::{ContourSet, EarClipEngine, TriangulationEngine};
///
/// // Concave "L"
/// let positions = [
///     0.0, 0.0, 0.0, 2.0, 0.0, 0.0, 2.0, 1.0, 0.0,
///     1.0, 1.0, 0.0, 1.0, 2.0, 0.0, 0.0, 2.0, 0.0,
/// ];
/// let normals = [0.0; 18];
/// let set = ContourSet::new(&positions, &normals, &[6]).unwrap();
/// let contours: Vec<_> = set.contours().collect();
///
/// let output = EarClipEngine::new().triangulate(&contours).unwrap();
/// assert_eq!(output.triangles.len(), 4);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EarClipEngine {
    max_coordinate: f32,
}

impl EarClipEngine {
    /// Creates an engine accepting coordinates up to `MAX_VALID_COORD`.
    pub fn new() -> Self {
        Self {
            max_coordinate: MAX_VALID_COORD,
        }
    }

    /// Creates an engine with the coordinate limit from `config`.
    pub fn with_config(config: &GlobalConfig) -> Self {
        Self {
            max_coordinate: config.max_coordinate,
        }
    }

    /// Largest accepted absolute coordinate.
    pub fn max_coordinate(&self) -> f32 {
        self.max_coordinate
    }

    fn validate(&self, contours: &[Contour<'_>]) -> Result<(), EngineError> {
        for contour in contours {
            for (local, point) in contour.points().enumerate() {
                let bad = point
                    .to_array()
                    .into_iter()
                    .find(|v| !v.is_finite() || v.abs() > self.max_coordinate);
                if let Some(value) = bad {
                    return Err(EngineError::InvalidCoordinate {
                        vertex: (contour.first_vertex() + local) as u32,
                        value,
                        limit: self.max_coordinate,
                    });
                }
            }
        }
        Ok(())
    }
}

impl Default for EarClipEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl TriangulationEngine for EarClipEngine {
    fn triangulate(&self, contours: &[Contour<'_>]) -> Result<TriangulationOutput, EngineError> {
        self.validate(contours)?;

        let projection = Projection::along(plane_normal(contours));
        let mut arena = Arena::default();
        let cleaned = build_loops(contours, projection, &mut arena);
        let added = arena.points.len();
        let loops: Vec<Loop> = resolve(&cleaned, &mut arena)
            .into_iter()
            .filter(|lp| {
                lp.vertices.len() >= MIN_CONTOUR_VERTICES && !is_collinear(&arena.ring_points(&lp.vertices))
            })
            .collect();
        if arena.points.len() > added {
            trace!("{} crossing vertices added", arena.points.len() - added);
        }

        let nesting = classify(&loops, &arena);
        let mut triangles = Vec::new();
        for (i, boundary) in loops.iter().enumerate() {
            if nesting[i].depth % 2 == 1 {
                continue;
            }
            let ring = oriented(&boundary.vertices, &arena, true);
            let holes: Vec<Loop> = loops
                .iter()
                .enumerate()
                .filter(|&(j, _)| nesting[j].parent == Some(i) && nesting[j].depth % 2 == 1)
                .map(|(_, hole)| Loop {
                    contour: hole.contour,
                    vertices: oriented(&hole.vertices, &arena, false),
                })
                .collect();
            trace!(
                "contour {}: depth {}, {} holes",
                boundary.contour,
                nesting[i].depth,
                holes.len()
            );

            let ring = bridge_holes(ring, holes, &arena)?;
            clip_ears(&ring, &arena, &mut triangles)?;
        }

        Ok(assemble(&triangles, &arena))
    }
}

// =============================================================================
// PREPARATION
// =============================================================================

#[derive(Debug, Clone, Copy)]
struct Nesting {
    depth: usize,
    parent: Option<usize>,
}

/// Normal of the plane the contours are projected onto.
fn plane_normal(contours: &[Contour<'_>]) -> DVec3 {
    let normals: Vec<DVec3> = contours
        .iter()
        .map(|c| newell_normal(&c.points().collect::<Vec<_>>()))
        .collect();
    let total: DVec3 = normals.iter().copied().sum();
    if total != DVec3::ZERO {
        return total;
    }
    // Opposing loops cancelled out; fall back to the largest single loop
    normals
        .into_iter()
        .filter(|n| *n != DVec3::ZERO)
        .max_by(|a, b| a.length_squared().total_cmp(&b.length_squared()))
        .unwrap_or_else(|| spanning_normal(contours))
}

/// Normal of the first non-degenerate corner fan, for loops whose area
/// cancels (a symmetric bow-tie).
fn spanning_normal(contours: &[Contour<'_>]) -> DVec3 {
    contours
        .iter()
        .find_map(|c| {
            let points: Vec<DVec3> = c.points().map(|p| p.as_dvec3()).collect();
            let &origin = points.first()?;
            points.windows(2).find_map(|w| {
                let n = (w[0] - origin).cross(w[1] - origin);
                (n != DVec3::ZERO).then_some(n)
            })
        })
        .unwrap_or(DVec3::Z)
}

fn build_loops(contours: &[Contour<'_>], projection: Projection, arena: &mut Arena) -> Vec<Loop> {
    let mut loops = Vec::with_capacity(contours.len());
    for contour in contours {
        let mut vertices: Vec<usize> = Vec::with_capacity(contour.len());
        for (local, position) in contour.points().enumerate() {
            let point = projection.project(position);
            if vertices.last().is_some_and(|&last| arena.points[last] == point) {
                continue;
            }
            let origin = (contour.first_vertex() + local) as u32;
            vertices.push(arena.push(point, position, Some(origin)));
        }
        while vertices.len() > 1 && arena.points[vertices[0]] == arena.points[vertices[vertices.len() - 1]] {
            vertices.pop();
        }

        if vertices.len() < MIN_CONTOUR_VERTICES || is_collinear(&arena.ring_points(&vertices)) {
            trace!("contour {} encloses no area; dropped", contour.index());
            continue;
        }
        loops.push(Loop {
            contour: contour.index(),
            vertices,
        });
    }
    loops
}

/// Nesting depth and innermost container of every loop.
fn classify(loops: &[Loop], arena: &Arena) -> Vec<Nesting> {
    let rings: Vec<Vec<DVec2>> = loops.iter().map(|lp| arena.ring_points(&lp.vertices)).collect();
    let containers: Vec<Vec<usize>> = (0..rings.len())
        .map(|k| {
            (0..rings.len())
                .filter(|&j| j != k && contains(&rings[j], &rings[k]))
                .collect()
        })
        .collect();

    containers
        .iter()
        .map(|outer| Nesting {
            depth: outer.len(),
            parent: outer.iter().copied().max_by_key(|&j| containers[j].len()),
        })
        .collect()
}

/// Returns true if `inner` lies inside `outer`. The loops do not cross, so
/// one vertex or edge midpoint off the boundary decides.
fn contains(outer: &[DVec2], inner: &[DVec2]) -> bool {
    let midpoints = inner
        .iter()
        .enumerate()
        .map(|(i, &p)| (p + inner[(i + 1) % inner.len()]) * 0.5);
    for p in inner.iter().copied().chain(midpoints) {
        match locate(p, outer) {
            Location::Inside => return true,
            Location::Outside => return false,
            Location::Boundary => {}
        }
    }
    false
}

/// Copy of `vertices` turning counter-clockwise (or clockwise).
fn oriented(vertices: &[usize], arena: &Arena, ccw: bool) -> Vec<usize> {
    let mut vertices = vertices.to_vec();
    if (signed_area(&arena.ring_points(&vertices)) > 0.0) != ccw {
        vertices.reverse();
    }
    vertices
}

// =============================================================================
// HOLE BRIDGING
// =============================================================================

/// Merges every hole into `ring` through a pair of duplicated bridge vertices.
fn bridge_holes(mut ring: Vec<usize>, mut holes: Vec<Loop>, arena: &Arena) -> Result<Vec<usize>, EngineError> {
    let leftmost = |hole: &Loop| {
        hole.vertices
            .iter()
            .map(|&v| arena.points[v].x)
            .fold(f64::INFINITY, f64::min)
    };
    holes.sort_by(|a, b| leftmost(a).total_cmp(&leftmost(b)));

    for h in 0..holes.len() {
        let hole = &holes[h].vertices;
        let mut blockers = ring_edges(&ring);
        for other in &holes[h..] {
            blockers.extend(ring_edges(&other.vertices));
        }

        let mut candidates = Vec::with_capacity(hole.len() * ring.len());
        for (hi, &hv) in hole.iter().enumerate() {
            for (ri, &rv) in ring.iter().enumerate() {
                candidates.push((arena.points[hv].distance_squared(arena.points[rv]), hi, ri));
            }
        }
        candidates.sort_by(|a, b| a.0.total_cmp(&b.0));

        let bridge = candidates
            .iter()
            .find(|&&(_, hi, ri)| bridge_visible(&ring, ri, hole, hi, &blockers, arena))
            .map(|&(_, hi, ri)| (hi, ri));
        let Some((hi, ri)) = bridge else {
            return Err(EngineError::NoBridge {
                contour: holes[h].contour,
            });
        };

        let mut merged = Vec::with_capacity(ring.len() + hole.len() + 2);
        merged.extend_from_slice(&ring[..=ri]);
        merged.extend_from_slice(&hole[hi..]);
        merged.extend_from_slice(&hole[..=hi]);
        merged.extend_from_slice(&ring[ri..]);
        ring = merged;
    }
    Ok(ring)
}

fn ring_edges(ring: &[usize]) -> Vec<(usize, usize)> {
    (0..ring.len())
        .map(|i| (ring[i], ring[(i + 1) % ring.len()]))
        .collect()
}

fn bridge_visible(
    ring: &[usize],
    ri: usize,
    hole: &[usize],
    hi: usize,
    blockers: &[(usize, usize)],
    arena: &Arena,
) -> bool {
    let pt = |v: usize| arena.points[v];
    let around = |lp: &[usize], i: usize| {
        let n = lp.len();
        (pt(lp[(i + n - 1) % n]), pt(lp[i]), pt(lp[(i + 1) % n]))
    };
    let (rp, r, rn) = around(ring, ri);
    let (hp, h, hn) = around(hole, hi);

    r != h
        && locally_inside(rp, r, rn, h)
        && locally_inside(hp, h, hn, r)
        && blockers
            .iter()
            .all(|&(c, d)| !segments_conflict(h, r, pt(c), pt(d)))
}

// =============================================================================
// EAR CLIPPING
// =============================================================================

/// Clips `ring` (counter-clockwise, holes already bridged) into triangles of
/// arena indices.
fn clip_ears(ring: &[usize], arena: &Arena, triangles: &mut Vec<[usize; 3]>) -> Result<(), EngineError> {
    let n = ring.len();
    if n < 3 {
        return Ok(());
    }
    let pt = |slot: usize| arena.points[ring[slot]];
    let mut prev: Vec<usize> = (0..n).map(|i| (i + n - 1) % n).collect();
    let mut next: Vec<usize> = (0..n).map(|i| (i + 1) % n).collect();

    let mut remaining = n;
    let mut current = 0;
    let mut stalled = 0;

    while remaining > 3 {
        let (a, b, c) = (prev[current], current, next[current]);
        if is_ear(a, b, c, &prev, &next, &pt) {
            triangles.push([ring[a], ring[b], ring[c]]);
            next[a] = c;
            prev[c] = a;
            remaining -= 1;
            current = c;
            stalled = 0;
            continue;
        }

        current = c;
        stalled += 1;
        if stalled < remaining {
            continue;
        }

        // A full lap without an ear: drop one flat vertex and retry
        let mut slot = current;
        let flat = (0..remaining).find_map(|_| {
            let found = orient(pt(prev[slot]), pt(slot), pt(next[slot])) == 0.0;
            let here = slot;
            slot = next[slot];
            found.then_some(here)
        });
        let Some(flat) = flat else {
            return Err(EngineError::NoEar { remaining });
        };
        trace!("removing flat vertex {:?} after a stalled lap", arena.origins[ring[flat]]);
        let (a, c) = (prev[flat], next[flat]);
        next[a] = c;
        prev[c] = a;
        remaining -= 1;
        current = c;
        stalled = 0;
    }

    let (a, b, c) = (prev[current], current, next[current]);
    if orient(pt(a), pt(b), pt(c)) > 0.0 {
        triangles.push([ring[a], ring[b], ring[c]]);
    }
    Ok(())
}

/// Returns true if `a, b, c` is a convex corner whose triangle holds no
/// reflex vertex of the remaining polygon.
fn is_ear(a: usize, b: usize, c: usize, prev: &[usize], next: &[usize], pt: &impl Fn(usize) -> DVec2) -> bool {
    let (pa, pb, pc) = (pt(a), pt(b), pt(c));
    if orient(pa, pb, pc) <= 0.0 {
        return false;
    }

    let mut slot = next[c];
    while slot != a {
        let p = pt(slot);
        if p != pa
            && p != pc
            && in_triangle(pa, pb, pc, p)
            && orient(pt(prev[slot]), p, pt(next[slot])) <= 0.0
        {
            return false;
        }
        slot = next[slot];
    }
    true
}

// =============================================================================
// OUTPUT
// =============================================================================

/// Renumbers the referenced arena vertices in arena order.
fn assemble(triangles: &[[usize; 3]], arena: &Arena) -> TriangulationOutput {
    let mut used: Vec<usize> = triangles.iter().flatten().copied().collect();
    used.sort_unstable();
    used.dedup();

    let slot = |v: usize| used.binary_search(&v).ok().map(|i| i as u32);
    TriangulationOutput {
        vertices: used.iter().map(|&v| arena.positions[v]).collect(),
        vertex_origins: used.iter().map(|&v| arena.origins[v]).collect(),
        triangles: triangles.iter().map(|t| t.map(&slot)).collect(),
    }
}
