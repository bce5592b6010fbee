//! # Even-Odd Overlay
//!
//! Turns cleaned contour loops, which may cross, touch or overlap, into
//! loops that bound the even-odd filled region and never cross.
//!
//! ## Steps
//!
//! 1. Split every edge where another edge crosses it or ends on it; a
//!    proper crossing adds a vertex with no input origin
//! 2. Cancel edges that coincide an even number of times
//! 3. Orient each remaining edge so the filled side is on its left
//! 4. Walk the edges into loops, turning clockwise-first at every vertex
//!
//! Every edge left after step 2 separates regions of opposite parity, so
//! the traced loops have the same even-odd interior as the input. Loops
//! may share vertices, e.g. the two lobes of a bow-tie.

use std::collections::{HashMap, HashSet};
use std::f64::consts::TAU;

use glam::{DVec2, Vec3};

use super::planar::{boxes_overlap, opposite, orient, strictly_within};

// =============================================================================
// ARENA
// =============================================================================

/// Every projected vertex, indexed by insertion order.
#[derive(Debug, Default)]
pub(super) struct Arena {
    pub(super) points: Vec<DVec2>,
    pub(super) positions: Vec<Vec3>,
    /// Global input vertex, `None` for intersection vertices
    pub(super) origins: Vec<Option<u32>>,
}

impl Arena {
    pub(super) fn push(&mut self, point: DVec2, position: Vec3, origin: Option<u32>) -> usize {
        self.points.push(point);
        self.positions.push(position);
        self.origins.push(origin);
        self.points.len() - 1
    }

    pub(super) fn ring_points(&self, vertices: &[usize]) -> Vec<DVec2> {
        vertices.iter().map(|&v| self.points[v]).collect()
    }
}

/// A closed loop of arena indices.
#[derive(Debug, Clone)]
pub(super) struct Loop {
    /// Input contour the loop starts on
    pub(super) contour: usize,
    pub(super) vertices: Vec<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Edge {
    from: usize,
    to: usize,
    contour: usize,
}

/// Resolves `loops` into non-crossing loops with the same even-odd interior.
pub(super) fn resolve(loops: &[Loop], arena: &mut Arena) -> Vec<Loop> {
    let edges: Vec<Edge> = loops
        .iter()
        .flat_map(|lp| {
            let n = lp.vertices.len();
            (0..n).map(move |i| Edge {
                from: lp.vertices[i],
                to: lp.vertices[(i + 1) % n],
                contour: lp.contour,
            })
        })
        .collect();

    let pieces = split_edges(&edges, arena);
    let nodes = coincident_nodes(arena);
    let kept = cancel_pairs(pieces, &nodes);
    let oriented = orient_edges(&kept, arena);
    trace_loops(&oriented, &nodes, arena)
}

// =============================================================================
// SPLITTING
// =============================================================================

/// Cuts edges at crossings, touching endpoints and overlap ends.
fn split_edges(edges: &[Edge], arena: &mut Arena) -> Vec<Edge> {
    let mut cuts: Vec<Vec<(f64, usize)>> = vec![Vec::new(); edges.len()];
    let lo: Vec<f64> = edges
        .iter()
        .map(|e| arena.points[e.from].x.min(arena.points[e.to].x))
        .collect();
    let hi: Vec<f64> = edges
        .iter()
        .map(|e| arena.points[e.from].x.max(arena.points[e.to].x))
        .collect();
    let mut order: Vec<usize> = (0..edges.len()).collect();
    order.sort_by(|&i, &j| lo[i].total_cmp(&lo[j]));

    for (k, &i) in order.iter().enumerate() {
        for &j in order[k + 1..].iter().take_while(|&&j| lo[j] <= hi[i]) {
            let (e, f) = (edges[i], edges[j]);
            let (a, b) = (arena.points[e.from], arena.points[e.to]);
            let (c, d) = (arena.points[f.from], arena.points[f.to]);
            if !boxes_overlap(a, b, c, d) {
                continue;
            }
            let o1 = orient(a, b, c);
            let o2 = orient(a, b, d);
            let o3 = orient(c, d, a);
            let o4 = orient(c, d, b);

            if opposite(o1, o2) && opposite(o3, o4) {
                let t = o3 / (o3 - o4);
                let u = o1 / (o1 - o2);
                // Both edges vote for the 3D position
                let along_e = arena.positions[e.from].lerp(arena.positions[e.to], t as f32);
                let along_f = arena.positions[f.from].lerp(arena.positions[f.to], u as f32);
                let v = arena.push(a + (b - a) * t, (along_e + along_f) * 0.5, None);
                cuts[i].push((t, v));
                cuts[j].push((u, v));
                continue;
            }

            let mut touch = |edge: usize, s: DVec2, t: DVec2, vertex: usize, o: f64| {
                let p = arena.points[vertex];
                if o == 0.0 && strictly_within(s, t, p) {
                    cuts[edge].push(((p - s).dot(t - s) / (t - s).length_squared(), vertex));
                }
            };
            touch(i, a, b, f.from, o1);
            touch(i, a, b, f.to, o2);
            touch(j, c, d, e.from, o3);
            touch(j, c, d, e.to, o4);
        }
    }

    let mut pieces = Vec::with_capacity(edges.len());
    for (edge, mut cut) in edges.iter().zip(cuts) {
        cut.sort_by(|x, y| x.0.total_cmp(&y.0));
        let mut from = edge.from;
        for (_, v) in cut.into_iter().chain(std::iter::once((1.0, edge.to))) {
            if arena.points[v] != arena.points[from] {
                pieces.push(Edge {
                    from,
                    to: v,
                    contour: edge.contour,
                });
                from = v;
            }
        }
    }
    pieces
}

/// Maps every arena vertex to the first vertex at the same point.
fn coincident_nodes(arena: &Arena) -> Vec<usize> {
    let mut first: HashMap<[u64; 2], usize> = HashMap::new();
    arena
        .points
        .iter()
        .enumerate()
        .map(|(v, p)| {
            // Adding zero folds -0.0 onto +0.0
            let key = [(p.x + 0.0).to_bits(), (p.y + 0.0).to_bits()];
            *first.entry(key).or_insert(v)
        })
        .collect()
}

/// Keeps one copy of every edge that occurs an odd number of times.
fn cancel_pairs(edges: Vec<Edge>, nodes: &[usize]) -> Vec<Edge> {
    let key = |e: &Edge| {
        let (p, q) = (nodes[e.from], nodes[e.to]);
        (p.min(q), p.max(q))
    };
    let mut counts: HashMap<(usize, usize), usize> = HashMap::new();
    for e in &edges {
        *counts.entry(key(e)).or_default() += 1;
    }
    let mut seen = HashSet::new();
    edges
        .into_iter()
        .filter(|e| {
            let k = key(e);
            counts.get(&k).is_some_and(|n| n % 2 == 1) && seen.insert(k)
        })
        .collect()
}

// =============================================================================
// ORIENTATION & TRACING
// =============================================================================

/// Flips edges as needed so the filled side of each lies on its left.
fn orient_edges(edges: &[Edge], arena: &Arena) -> Vec<Edge> {
    let segments: Vec<(DVec2, DVec2)> = edges
        .iter()
        .map(|e| (arena.points[e.from], arena.points[e.to]))
        .collect();

    edges
        .iter()
        .zip(&segments)
        .enumerate()
        .map(|(i, (&edge, &(a, b)))| {
            let mid = (a + b) * 0.5;
            let d = b - a;
            let keep = if d.y != 0.0 {
                // Left is +x when heading down
                (d.y < 0.0) == filled_beyond(mid, i, &segments, false)
            } else {
                // Left is +y when heading right
                (d.x > 0.0) == filled_beyond(mid, i, &segments, true)
            };
            if keep {
                edge
            } else {
                Edge {
                    from: edge.to,
                    to: edge.from,
                    ..edge
                }
            }
        })
        .collect()
}

/// Even-odd parity just past `m` along +x (+y when `vertical`), counting
/// every segment except `skip`.
fn filled_beyond(m: DVec2, skip: usize, segments: &[(DVec2, DVec2)], vertical: bool) -> bool {
    let frame = |p: DVec2| if vertical { DVec2::new(p.y, p.x) } else { p };
    let m = frame(m);
    segments
        .iter()
        .enumerate()
        .filter(|&(i, _)| i != skip)
        .fold(false, |inside, (_, &(a, b))| {
            let (a, b) = (frame(a), frame(b));
            let crosses = (a.y > m.y) != (b.y > m.y) && (b.y > a.y) == (orient(a, b, m) > 0.0);
            inside ^ crosses
        })
}

/// Angle swept turning clockwise from direction `from` to direction `to`,
/// in `(0, 2π]`.
fn clockwise_sweep(from: DVec2, to: DVec2) -> f64 {
    let sweep = from.y.atan2(from.x) - to.y.atan2(to.x);
    if sweep <= 0.0 {
        sweep + TAU
    } else {
        sweep
    }
}

fn trace_loops(edges: &[Edge], nodes: &[usize], arena: &Arena) -> Vec<Loop> {
    let mut outgoing: HashMap<usize, Vec<usize>> = HashMap::new();
    for (i, e) in edges.iter().enumerate() {
        outgoing.entry(nodes[e.from]).or_default().push(i);
    }

    let mut used = vec![false; edges.len()];
    let mut loops = Vec::new();
    for start in 0..edges.len() {
        if used[start] {
            continue;
        }
        let mut vertices = Vec::new();
        let mut current = start;
        loop {
            used[current] = true;
            vertices.push(edges[current].from);

            let here = arena.points[edges[current].to];
            let back = arena.points[edges[current].from] - here;
            let next = outgoing
                .get(&nodes[edges[current].to])
                .into_iter()
                .flatten()
                .copied()
                .filter(|&k| !used[k] || k == start)
                .min_by(|&x, &y| {
                    let sweep = |k: usize| clockwise_sweep(back, arena.points[edges[k].to] - here);
                    sweep(x).total_cmp(&sweep(y))
                });
            match next {
                Some(k) if k != start => current = k,
                _ => break,
            }
        }
        split_pinches(edges[start].contour, &vertices, nodes, &mut loops);
    }
    loops
}

/// Splits a walk that passes one point twice (a hole touching its
/// boundary) into simple loops.
fn split_pinches(contour: usize, walk: &[usize], nodes: &[usize], loops: &mut Vec<Loop>) {
    let mut path: Vec<usize> = Vec::with_capacity(walk.len());
    let mut seen: HashMap<usize, usize> = HashMap::new();
    for &v in walk {
        if let Some(&at) = seen.get(&nodes[v]) {
            let vertices: Vec<usize> = path.drain(at..).collect();
            for u in &vertices {
                seen.remove(&nodes[*u]);
            }
            loops.push(Loop { contour, vertices });
        }
        seen.insert(nodes[v], path.len());
        path.push(v);
    }
    loops.push(Loop { contour, vertices: path });
}
