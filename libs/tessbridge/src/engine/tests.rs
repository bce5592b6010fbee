//! # Engine Tests
//!
//! Tests for the ear-clipping engine.

use super::*;
use crate::contour::ContourSet;
use approx::assert_relative_eq;
use config::constants::GlobalConfig;

/// Owned flat input for building a [`ContourSet`].
struct Input {
    positions: Vec<f32>,
    normals: Vec<f32>,
    counts: Vec<usize>,
}

impl Input {
    fn new(contours: &[&[[f32; 2]]]) -> Self {
        let lifted: Vec<Vec<[f32; 3]>> = contours
            .iter()
            .map(|c| c.iter().map(|&[x, y]| [x, y, 0.0]).collect())
            .collect();
        let refs: Vec<&[[f32; 3]]> = lifted.iter().map(Vec::as_slice).collect();
        Self::new_3d(&refs)
    }

    fn new_3d(contours: &[&[[f32; 3]]]) -> Self {
        let positions: Vec<f32> = contours.iter().flat_map(|c| c.iter().flatten().copied()).collect();
        Self {
            normals: vec![0.0; positions.len()],
            positions,
            counts: contours.iter().map(|c| c.len()).collect(),
        }
    }

    fn triangulate_with(&self, engine: &EarClipEngine) -> Result<TriangulationOutput, EngineError> {
        let set = ContourSet::new(&self.positions, &self.normals, &self.counts).unwrap();
        let contours: Vec<_> = set.contours().filter(|c| !c.is_degenerate()).collect();
        engine.triangulate(&contours)
    }

    fn triangulate(&self) -> Result<TriangulationOutput, EngineError> {
        self.triangulate_with(&EarClipEngine::new())
    }
}

fn corners(output: &TriangulationOutput) -> Vec<[Vec3; 3]> {
    output
        .complete_triangles()
        .map(|t| t.map(|i| output.vertices[i as usize]))
        .collect()
}

fn total_area(output: &TriangulationOutput) -> f32 {
    corners(output)
        .iter()
        .map(|[a, b, c]| (*b - *a).cross(*c - *a).length() * 0.5)
        .sum()
}

/// Strict interior test in the XY plane, for either winding.
fn covers(output: &TriangulationOutput, x: f32, y: f32) -> bool {
    let p = Vec3::new(x, y, 0.0);
    corners(output).iter().any(|[a, b, c]| {
        let side = |u: Vec3, v: Vec3| (v - u).cross(p - u).z;
        let sides = [side(*a, *b), side(*b, *c), side(*c, *a)];
        sides.iter().all(|&s| s > 0.0) || sides.iter().all(|&s| s < 0.0)
    })
}

fn all_ccw_around(output: &TriangulationOutput, normal: Vec3) -> bool {
    corners(output)
        .iter()
        .all(|[a, b, c]| (*b - *a).cross(*c - *a).dot(normal) > 0.0)
}

const SQUARE: [[f32; 2]; 4] = [[0.0, 0.0], [4.0, 0.0], [4.0, 4.0], [0.0, 4.0]];
const INNER: [[f32; 2]; 4] = [[1.0, 1.0], [3.0, 1.0], [3.0, 3.0], [1.0, 3.0]];

// =============================================================================
// SIMPLE POLYGONS
// =============================================================================

#[test]
fn test_triangle() {
    let output = Input::new(&[&[[0.0, 0.0], [1.0, 0.0], [0.0, 1.0]]]).triangulate().unwrap();
    assert_eq!(output.vertex_count(), 3);
    assert_eq!(output.vertex_origins, vec![Some(0), Some(1), Some(2)]);
    assert_eq!(output.triangles.len(), 1);
}

#[test]
fn test_quad() {
    let output = Input::new(&[&SQUARE]).triangulate().unwrap();
    assert_eq!(output.vertex_count(), 4);
    assert_eq!(output.triangles.len(), 2);
    assert_relative_eq!(total_area(&output), 16.0);
    assert!(all_ccw_around(&output, Vec3::Z));
}

#[test]
fn test_clockwise_quad_faces_its_own_normal() {
    let mut square = SQUARE;
    square.reverse();
    let output = Input::new(&[&square]).triangulate().unwrap();
    assert_eq!(output.triangles.len(), 2);
    assert!(all_ccw_around(&output, Vec3::NEG_Z));
}

#[test]
fn test_concave_l_shape() {
    let l_shape = [[0.0, 0.0], [2.0, 0.0], [2.0, 1.0], [1.0, 1.0], [1.0, 2.0], [0.0, 2.0]];
    let output = Input::new(&[&l_shape]).triangulate().unwrap();
    assert_eq!(output.triangles.len(), 4);
    assert_relative_eq!(total_area(&output), 3.0);
    assert!(!covers(&output, 1.5, 1.5));
    assert!(all_ccw_around(&output, Vec3::Z));
}

#[test]
fn test_star() {
    let star: Vec<[f32; 2]> = (0..10)
        .map(|i| {
            let angle = i as f32 * std::f32::consts::PI / 5.0;
            let radius = if i % 2 == 0 { 4.0 } else { 1.5 };
            [radius * angle.cos(), radius * angle.sin()]
        })
        .collect();
    let output = Input::new(&[&star]).triangulate().unwrap();
    assert_eq!(output.triangles.len(), 8);
    assert_relative_eq!(
        total_area(&output),
        30.0 * (std::f32::consts::PI / 5.0).sin(),
        epsilon = 1e-4
    );
    assert!(all_ccw_around(&output, Vec3::Z));
}

#[test]
fn test_vertical_wall() {
    let wall = [[0.0, 0.0, 0.0], [0.0, 0.0, 2.0], [1.0, 0.0, 2.0], [1.0, 0.0, 0.0]];
    let output = Input::new_3d(&[&wall]).triangulate().unwrap();
    assert_eq!(output.triangles.len(), 2);
    assert_relative_eq!(total_area(&output), 2.0);
    assert!(all_ccw_around(&output, Vec3::Y));
}

// =============================================================================
// EVEN-ODD WINDING
// =============================================================================

#[test]
fn test_square_with_hole() {
    let output = Input::new(&[&SQUARE, &INNER]).triangulate().unwrap();
    assert_eq!(output.vertex_count(), 8);
    assert_eq!(output.triangles.len(), 8);
    assert_relative_eq!(total_area(&output), 12.0);
    assert!(!covers(&output, 2.0, 2.0));
    assert!(covers(&output, 0.5, 2.0));
    assert!(all_ccw_around(&output, Vec3::Z));
}

#[test]
fn test_hole_orientation_does_not_matter() {
    let mut inner = INNER;
    inner.reverse();
    let output = Input::new(&[&SQUARE, &inner]).triangulate().unwrap();
    assert_eq!(output.triangles.len(), 8);
    assert_relative_eq!(total_area(&output), 12.0);
}

#[test]
fn test_hole_listed_first() {
    let output = Input::new(&[&INNER, &SQUARE]).triangulate().unwrap();
    assert_relative_eq!(total_area(&output), 12.0);
    // Origins follow input numbering: the hole owns 0..4
    assert_eq!(output.vertex_origins[0], Some(0));
    assert_eq!(output.vertex_origins[7], Some(7));
}

#[test]
fn test_island_inside_hole() {
    let outer = [[0.0, 0.0], [10.0, 0.0], [10.0, 10.0], [0.0, 10.0]];
    let hole = [[2.0, 2.0], [8.0, 2.0], [8.0, 8.0], [2.0, 8.0]];
    let island = [[4.0, 4.0], [6.0, 4.0], [6.0, 6.0], [4.0, 6.0]];
    let output = Input::new(&[&outer, &hole, &island]).triangulate().unwrap();

    assert_relative_eq!(total_area(&output), 100.0 - 36.0 + 4.0);
    assert!(covers(&output, 1.0, 5.0));
    assert!(!covers(&output, 3.0, 5.0));
    assert!(covers(&output, 5.0, 4.5));
}

#[test]
fn test_two_holes() {
    let outer = [[0.0, 0.0], [10.0, 0.0], [10.0, 4.0], [0.0, 4.0]];
    let left = [[1.0, 1.0], [3.0, 1.0], [3.0, 3.0], [1.0, 3.0]];
    let right = [[6.0, 1.0], [8.0, 1.0], [8.0, 3.0], [6.0, 3.0]];
    let output = Input::new(&[&outer, &left, &right]).triangulate().unwrap();

    assert_eq!(output.triangles.len(), 12 + 2 * 2 - 2);
    assert_relative_eq!(total_area(&output), 40.0 - 8.0);
    assert!(!covers(&output, 2.0, 2.0));
    assert!(!covers(&output, 7.0, 2.0));
}

#[test]
fn test_disjoint_contours() {
    let right: Vec<[f32; 2]> = SQUARE.iter().map(|&[x, y]| [x + 10.0, y]).collect();
    let output = Input::new(&[&SQUARE, &right]).triangulate().unwrap();
    assert_eq!(output.triangles.len(), 4);
    assert_relative_eq!(total_area(&output), 32.0);
}

#[test]
fn test_contours_touching_at_a_vertex() {
    let a = [[0.0, 0.0], [2.0, 0.0], [1.0, 1.0]];
    let b = [[1.0, 1.0], [2.0, 2.0], [0.0, 2.0]];
    let output = Input::new(&[&a, &b]).triangulate().unwrap();
    assert_eq!(output.triangles.len(), 2);
    assert_eq!(output.vertex_count(), 6);
}

// =============================================================================
// SELF-INTERSECTING INPUT
// =============================================================================

#[test]
fn test_bow_tie_splits_at_the_crossing() {
    let bow_tie = [[0.0, 0.0], [2.0, 2.0], [2.0, 0.0], [0.0, 2.0]];
    let output = Input::new(&[&bow_tie]).triangulate().unwrap();

    assert_eq!(output.triangles.len(), 2);
    assert_relative_eq!(total_area(&output), 2.0);
    assert!(covers(&output, 0.5, 1.0));
    assert!(covers(&output, 1.5, 1.0));
    assert!(!covers(&output, 1.0, 0.5));
    assert!(!covers(&output, 1.0, 1.5));

    // Four input vertices, then the crossing
    assert_eq!(output.vertex_count(), 5);
    assert_eq!(output.vertex_origins, vec![Some(0), Some(1), Some(2), Some(3), None]);
    assert_eq!(output.vertices[4], Vec3::new(1.0, 1.0, 0.0));
    // Both lobes meet at the crossing
    assert!(output.complete_triangles().all(|t| t.contains(&4)));
}

#[test]
fn test_overlapping_contours_fill_the_difference() {
    let shifted: Vec<[f32; 2]> = SQUARE.iter().map(|&[x, y]| [x + 2.0, y + 2.0]).collect();
    let output = Input::new(&[&SQUARE, &shifted]).triangulate().unwrap();

    assert_relative_eq!(total_area(&output), 24.0);
    assert!(covers(&output, 1.0, 1.0));
    assert!(covers(&output, 5.0, 5.0));
    assert!(!covers(&output, 3.0, 3.0));
    assert!(all_ccw_around(&output, Vec3::Z));

    assert_eq!(output.triangles.len(), 8);
    assert_eq!(output.vertex_count(), 10);
    let crossings: Vec<Vec3> = output
        .vertices
        .iter()
        .zip(&output.vertex_origins)
        .filter(|(_, origin)| origin.is_none())
        .map(|(&v, _)| v)
        .collect();
    assert_eq!(crossings.len(), 2);
    assert!(crossings.contains(&Vec3::new(4.0, 2.0, 0.0)));
    assert!(crossings.contains(&Vec3::new(2.0, 4.0, 0.0)));
}

#[test]
fn test_overlapping_squares_of_unit_offset() {
    let a = [[0.0, 0.0], [2.0, 0.0], [2.0, 2.0], [0.0, 2.0]];
    let b = [[1.0, 1.0], [3.0, 1.0], [3.0, 3.0], [1.0, 3.0]];
    let output = Input::new(&[&a, &b]).triangulate().unwrap();

    assert_relative_eq!(total_area(&output), 6.0);
    assert!(covers(&output, 0.5, 0.5));
    assert!(covers(&output, 2.5, 2.5));
    assert!(!covers(&output, 1.5, 1.5));
    assert_eq!(output.vertex_origins.iter().filter(|o| o.is_none()).count(), 2);
}

#[test]
fn test_identical_contours_cancel() {
    let output = Input::new(&[&SQUARE, &SQUARE]).triangulate().unwrap();
    assert!(output.triangles.is_empty());
    assert!(output.vertices.is_empty());
}

#[test]
fn test_t_junction_keeps_both_triangles() {
    // `b` touches the middle of `a`'s bottom edge from below
    let a = [[0.0, 0.0], [4.0, 0.0], [2.0, 2.0]];
    let b = [[2.0, 0.0], [3.0, -2.0], [1.0, -2.0]];
    let output = Input::new(&[&a, &b]).triangulate().unwrap();

    assert_relative_eq!(total_area(&output), 6.0);
    assert!(covers(&output, 2.0, 1.0));
    assert!(covers(&output, 2.0, -1.0));
    assert!(!covers(&output, 3.5, -0.5));
    assert!(all_ccw_around(&output, Vec3::Z));

    // The junction reuses `b`'s vertex; nothing is synthesized
    assert_eq!(output.triangles.len(), 3);
    assert_eq!(output.vertex_count(), 6);
    assert!(output.vertex_origins.iter().all(Option::is_some));
}

// =============================================================================
// DEGENERATE AND INVALID INPUT
// =============================================================================

#[test]
fn test_collinear_contour_yields_nothing() {
    let line = [[0.0, 0.0], [1.0, 1.0], [2.0, 2.0]];
    let output = Input::new(&[&line]).triangulate().unwrap();
    assert!(output.triangles.is_empty());
    assert!(output.vertices.is_empty());
}

#[test]
fn test_repeated_points_are_skipped() {
    let square = [[0.0, 0.0], [0.0, 0.0], [4.0, 0.0], [4.0, 4.0], [0.0, 4.0], [0.0, 0.0]];
    let output = Input::new(&[&square]).triangulate().unwrap();
    assert_eq!(output.triangles.len(), 2);
    assert_eq!(output.vertex_origins, vec![Some(0), Some(2), Some(3), Some(4)]);
}

#[test]
fn test_collinear_vertex_on_edge() {
    let square = [[0.0, 0.0], [2.0, 0.0], [4.0, 0.0], [4.0, 4.0], [0.0, 4.0]];
    let output = Input::new(&[&square]).triangulate().unwrap();
    assert_relative_eq!(total_area(&output), 16.0);
    assert!(all_ccw_around(&output, Vec3::Z));
}

#[test]
fn test_invalid_coordinates() {
    let nan = [[0.0, 0.0], [f32::NAN, 0.0], [0.0, 1.0]];
    let err = Input::new(&[&nan]).triangulate().unwrap_err();
    assert!(matches!(err, EngineError::InvalidCoordinate { vertex: 1, .. }));

    let far = [[0.0, 0.0], [500.0, 0.0], [0.0, 1.0]];
    let engine = EarClipEngine::with_config(&GlobalConfig::new(true, 100.0).unwrap());
    let err = Input::new(&[&far]).triangulate_with(&engine).unwrap_err();
    assert_eq!(
        err,
        EngineError::InvalidCoordinate {
            vertex: 1,
            value: 500.0,
            limit: 100.0
        }
    );
    assert!(Input::new(&[&far]).triangulate().is_ok());
}

#[test]
fn test_complete_triangles_skips_undefined_corners() {
    let output = TriangulationOutput {
        vertices: vec![Vec3::ZERO; 3],
        vertex_origins: vec![Some(0), None, Some(1)],
        triangles: vec![[Some(0), Some(1), Some(2)], [Some(0), None, Some(2)]],
    };
    assert_eq!(output.complete_triangles().collect::<Vec<_>>(), vec![[0, 1, 2]]);
}
