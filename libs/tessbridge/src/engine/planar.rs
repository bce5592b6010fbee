//! Planar geometry for the ear-clipping engine.
//!
//! Contours are projected by dropping the dominant axis of their combined
//! Newell normal. The projected coordinates are the input floats themselves,
//! so collinearity survives projection exactly and every orientation test
//! below is exact.

use glam::{DVec2, DVec3, Vec3};
use robust::Coord;

/// Orientation of `c` relative to the directed line `a → b`: positive when
/// `a, b, c` turn counter-clockwise, zero when collinear.
#[inline]
pub(crate) fn orient(a: DVec2, b: DVec2, c: DVec2) -> f64 {
    robust::orient2d(
        Coord { x: a.x, y: a.y },
        Coord { x: b.x, y: b.y },
        Coord { x: c.x, y: c.y },
    )
}

/// Twice the area vector of a closed loop.
pub(crate) fn newell_normal(points: &[Vec3]) -> DVec3 {
    let mut normal = DVec3::ZERO;
    for (i, p) in points.iter().enumerate() {
        let q = points[(i + 1) % points.len()];
        normal += p.as_dvec3().cross(q.as_dvec3());
    }
    normal
}

/// Axis-dropping projection onto the plane most aligned with a normal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Projection {
    s: usize,
    t: usize,
    flip: bool,
}

impl Projection {
    /// Projection for which loops turning counter-clockwise around `normal`
    /// come out counter-clockwise in 2D.
    pub(crate) fn along(normal: DVec3) -> Self {
        let abs = normal.abs();
        let axis = if abs.x > abs.y && abs.x > abs.z {
            0
        } else if abs.y > abs.z {
            1
        } else {
            2
        };
        Self {
            s: (axis + 1) % 3,
            t: (axis + 2) % 3,
            flip: normal[axis] < 0.0,
        }
    }

    #[inline]
    pub(crate) fn project(&self, p: Vec3) -> DVec2 {
        let t = f64::from(p[self.t]);
        DVec2::new(f64::from(p[self.s]), if self.flip { -t } else { t })
    }
}

/// Twice the signed area of a loop (positive when counter-clockwise).
pub(crate) fn signed_area(points: &[DVec2]) -> f64 {
    let mut area = 0.0;
    for (i, p) in points.iter().enumerate() {
        let q = points[(i + 1) % points.len()];
        area += p.perp_dot(q);
    }
    area
}

/// Returns true if every point lies on one line.
pub(crate) fn is_collinear(points: &[DVec2]) -> bool {
    let Some((&a, rest)) = points.split_first() else {
        return true;
    };
    let Some(&b) = rest.iter().find(|&&p| p != a) else {
        return true;
    };
    points.iter().all(|&p| orient(a, b, p) == 0.0)
}

pub(crate) fn boxes_overlap(a: DVec2, b: DVec2, c: DVec2, d: DVec2) -> bool {
    a.max(b).cmpge(c.min(d)).all() && c.max(d).cmpge(a.min(b)).all()
}

/// For `p` collinear with `a, b`: true if `p` is on the closed segment.
#[inline]
fn within(a: DVec2, b: DVec2, p: DVec2) -> bool {
    p.cmpge(a.min(b)).all() && p.cmple(a.max(b)).all()
}

/// For `p` collinear with `a, b`: true if `p` is strictly between them.
#[inline]
pub(crate) fn strictly_within(a: DVec2, b: DVec2, p: DVec2) -> bool {
    p != a && p != b && within(a, b, p)
}

#[inline]
pub(crate) fn opposite(u: f64, v: f64) -> bool {
    (u > 0.0 && v < 0.0) || (u < 0.0 && v > 0.0)
}

/// Returns true if segments `a–b` and `c–d` share any point other than a
/// common endpoint.
pub(crate) fn segments_conflict(a: DVec2, b: DVec2, c: DVec2, d: DVec2) -> bool {
    if !boxes_overlap(a, b, c, d) {
        return false;
    }
    let o1 = orient(a, b, c);
    let o2 = orient(a, b, d);
    let o3 = orient(c, d, a);
    let o4 = orient(c, d, b);

    if o1 == 0.0 && o2 == 0.0 {
        return collinear_overlap(a, b, c, d);
    }
    if opposite(o1, o2) && opposite(o3, o4) {
        return true;
    }
    (o1 == 0.0 && strictly_within(a, b, c))
        || (o2 == 0.0 && strictly_within(a, b, d))
        || (o3 == 0.0 && strictly_within(c, d, a))
        || (o4 == 0.0 && strictly_within(c, d, b))
}

/// Positive-length overlap of two collinear segments.
fn collinear_overlap(a: DVec2, b: DVec2, c: DVec2, d: DVec2) -> bool {
    let extent = (b - a).abs();
    let axis = if extent.x >= extent.y { 0 } else { 1 };
    let (a0, a1) = (a[axis].min(b[axis]), a[axis].max(b[axis]));
    let (c0, c1) = (c[axis].min(d[axis]), c[axis].max(d[axis]));
    a1.min(c1) > a0.max(c0)
}

/// Where a point lies relative to a closed loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Location {
    Inside,
    Outside,
    Boundary,
}

/// Crossing-number point location with exact edge tests.
pub(crate) fn locate(p: DVec2, ring: &[DVec2]) -> Location {
    let mut inside = false;
    for (i, &a) in ring.iter().enumerate() {
        let b = ring[(i + 1) % ring.len()];
        let o = orient(a, b, p);
        if o == 0.0 && within(a, b, p) {
            return Location::Boundary;
        }
        if (a.y > p.y) != (b.y > p.y) && (b.y > a.y) == (o > 0.0) {
            inside = !inside;
        }
    }
    if inside {
        Location::Inside
    } else {
        Location::Outside
    }
}

/// Returns true if `p` lies inside or on the counter-clockwise triangle `a, b, c`.
#[inline]
pub(crate) fn in_triangle(a: DVec2, b: DVec2, c: DVec2, p: DVec2) -> bool {
    orient(a, b, p) >= 0.0 && orient(b, c, p) >= 0.0 && orient(c, a, p) >= 0.0
}

/// Returns true if the direction from `v` to `target` enters the region on
/// the left of the boundary `prev → v → next`.
pub(crate) fn locally_inside(prev: DVec2, v: DVec2, next: DVec2, target: DVec2) -> bool {
    let left_of_incoming = orient(prev, v, target) > 0.0;
    let left_of_outgoing = orient(v, next, target) > 0.0;
    if orient(prev, v, next) > 0.0 {
        left_of_incoming && left_of_outgoing
    } else {
        left_of_incoming || left_of_outgoing
    }
}
