use approx::assert_relative_eq;
use bsp_solid::region::signed_area;
use bsp_solid::region::Contour;
use bsp_solid::{Location, OutlineExtractor, Polyhedron, simplify_loop};
use nalgebra::{Point2, Point3, Vector3};

const TOL: f64 = 1e-10;

fn unit_cube() -> Polyhedron {
    Polyhedron::cuboid(Point3::origin(), Point3::new(1.0, 1.0, 1.0), TOL).unwrap()
}

fn l_prism() -> Polyhedron {
    let outline = [
        Point2::new(0.0, 0.0),
        Point2::new(2.0, 0.0),
        Point2::new(2.0, 1.0),
        Point2::new(1.0, 1.0),
        Point2::new(1.0, 2.0),
        Point2::new(0.0, 2.0),
    ];
    Polyhedron::prism(&outline, 1.0, TOL).unwrap()
}

/// Viewing axes `(u, v)` such that `u × v` is the unit vector along `w`.
fn axes_for(w: Vector3<f64>) -> (Vector3<f64>, Vector3<f64>) {
    let w = w.normalize();
    let helper = if w.x.abs() < 0.9 { Vector3::x() } else { Vector3::y() };
    let u = helper.cross(&w).normalize();
    let v = w.cross(&u);
    (u, v)
}

/// Square ring: the box `[0, 3]² × [0, 1]` with the square hole `[1, 2]²`
/// bored through along `z`.
fn ring() -> Polyhedron {
    let square = |lo: f64, hi: f64, z: f64| {
        [
            Point3::new(lo, lo, z),
            Point3::new(hi, lo, z),
            Point3::new(hi, hi, z),
            Point3::new(lo, hi, z),
        ]
    };
    // Outer bottom, inner bottom, outer top, inner top.
    let vertices: Vec<Point3<f64>> = [
        square(0.0, 3.0, 0.0),
        square(1.0, 2.0, 0.0),
        square(0.0, 3.0, 1.0),
        square(1.0, 2.0, 1.0),
    ]
    .concat();

    let mut facets = Vec::new();
    for i in 0..4_usize {
        let j = (i + 1) % 4;
        facets.push([8 + i, 8 + j, 12 + j, 12 + i]);
        facets.push([4 + i, 4 + j, j, i]);
        facets.push([i, j, 8 + j, 8 + i]);
        facets.push([4 + j, 4 + i, 12 + i, 12 + j]);
    }
    Polyhedron::from_vertices_and_facets(&vertices, &facets, TOL).unwrap()
}

fn total_area(loops: &[Contour]) -> f64 {
    loops.iter().map(|l| signed_area(l.points())).sum()
}

fn sorted_lengths(loops: &[Contour]) -> Vec<usize> {
    let mut lengths: Vec<usize> = loops.iter().map(Contour::len).collect();
    lengths.sort_unstable_by(|a, b| b.cmp(a));
    lengths
}

#[test]
fn cube_along_face_normal_is_a_square() {
    let extractor = OutlineExtractor::new(Vector3::x(), Vector3::y()).unwrap();
    let loops = extractor.outline_of(&unit_cube());

    assert_eq!(loops.len(), 1);
    assert_eq!(loops[0].len(), 4);
    assert_relative_eq!(total_area(&loops), 1.0, epsilon = 1e-6);
    assert!(!loops[0].is_open());
    for p in loops[0].points() {
        let near_corner = [0.0, 1.0].iter().any(|x| (p.x - x).abs() < 1e-6)
            && [0.0, 1.0].iter().any(|y| (p.y - y).abs() < 1e-6);
        assert!(near_corner, "unexpected vertex {p:?}");
    }
}

#[test]
fn cube_seen_from_below_is_counter_clockwise() {
    // u × v = -z
    let extractor = OutlineExtractor::new(Vector3::y(), Vector3::x()).unwrap();
    let loops = extractor.outline_of(&unit_cube());

    assert_eq!(loops.len(), 1);
    assert_eq!(loops[0].len(), 4);
    assert_relative_eq!(total_area(&loops), 1.0, epsilon = 1e-6);
}

#[test]
fn cube_along_diagonal_is_a_hexagon() {
    let w = Vector3::new(1.0, 1.0, 1.0) / 3.0_f64.sqrt();
    let u = Vector3::new(1.0, -1.0, 0.0) / 2.0_f64.sqrt();
    let v = w.cross(&u);
    let extractor = OutlineExtractor::new(u, v).unwrap();
    let loops = extractor.outline_of(&unit_cube());

    assert_eq!(loops.len(), 1);
    assert_eq!(loops[0].len(), 6);
    assert_relative_eq!(total_area(&loops), 3.0_f64.sqrt(), epsilon = 1e-6);

    // The two corners on the diagonal project to the centre of the hexagon.
    let centre = Point2::new(0.0, 0.0);
    let radius = (2.0_f64 / 3.0).sqrt();
    for p in loops[0].points() {
        assert_relative_eq!((p - centre).norm(), radius, epsilon = 1e-6);
    }
}

#[test]
fn cube_outline_area_matches_projection() {
    for w in [
        Vector3::new(1.0, 2.0, 3.0),
        Vector3::new(-0.3, 0.2, 1.0),
        Vector3::new(0.5, -1.0, -0.25),
    ] {
        let (u, v) = axes_for(w);
        let extractor = OutlineExtractor::new(u, v).unwrap();
        let loops = extractor.outline_of(&unit_cube());

        let w = w.normalize();
        assert_eq!(loops.len(), 1);
        assert_eq!(loops[0].len(), 6);
        assert_relative_eq!(total_area(&loops), w.x.abs() + w.y.abs() + w.z.abs(), epsilon = 1e-6);
    }
}

#[test]
fn l_prism_along_its_axis() {
    let extractor = OutlineExtractor::new(Vector3::x(), Vector3::y()).unwrap();
    let loops = extractor.outline_of(&l_prism());

    assert_eq!(loops.len(), 1);
    assert_eq!(loops[0].len(), 6);
    assert_relative_eq!(total_area(&loops), 3.0, epsilon = 1e-6);
}

#[test]
fn l_prism_from_the_side() {
    let extractor = OutlineExtractor::new(Vector3::y(), Vector3::z()).unwrap();
    let loops = extractor.outline_of(&l_prism());

    assert_eq!(loops.len(), 1);
    assert_eq!(loops[0].len(), 4);
    assert_relative_eq!(total_area(&loops), 2.0, epsilon = 1e-6);
}

#[test]
fn l_prism_seen_obliquely() {
    // The L swept along (0.3, 0.2): a reflex corner survives.
    let w = Vector3::new(0.3, 0.2, 1.0);
    let (u, v) = axes_for(w);
    let extractor = OutlineExtractor::new(u, v).unwrap();
    let loops = extractor.outline_of(&l_prism());

    assert_eq!(sorted_lengths(&loops), vec![8]);
    assert_relative_eq!(total_area(&loops), 4.0 / w.norm(), epsilon = 1e-6);
}

#[test]
fn ring_along_its_axis_has_a_hole() {
    let extractor = OutlineExtractor::new(Vector3::x(), Vector3::y()).unwrap();
    let loops = extractor.outline_of(&ring());

    assert_eq!(sorted_lengths(&loops), vec![4, 4]);
    assert_relative_eq!(total_area(&loops), 8.0, epsilon = 1e-6);
    let hole = loops.iter().find(|l| signed_area(l.points()) < 0.0).unwrap();
    assert_relative_eq!(signed_area(hole.points()), -1.0, epsilon = 1e-6);
}

#[test]
fn ring_seen_obliquely() {
    // The hole shrinks to the overlap of its two ends.
    let w = Vector3::new(0.2, 0.1, 1.0);
    let (u, v) = axes_for(w);
    let extractor = OutlineExtractor::new(u, v).unwrap();
    let loops = extractor.outline_of(&ring());

    assert_eq!(sorted_lengths(&loops), vec![6, 4]);
    assert_relative_eq!(total_area(&loops), (9.9 - 0.72) / w.norm(), epsilon = 1e-6);
}

#[test]
fn outline_simplification_is_idempotent() {
    let (u, v) = axes_for(Vector3::new(0.4, 0.7, 1.0));
    let extractor = OutlineExtractor::new(u, v).unwrap();
    for solid in [unit_cube(), l_prism(), ring()] {
        for l in extractor.outline_of(&solid) {
            let mut again = l.points().to_vec();
            simplify_loop(&mut again, 1e-6);
            assert_eq!(again, l.points());
        }
    }
}

#[test]
fn l_prism_classification() {
    let solid = l_prism();
    assert_eq!(solid.classify(&Point3::new(0.5, 0.5, 0.5)), Location::Inside);
    assert_eq!(solid.classify(&Point3::new(1.5, 1.5, 0.5)), Location::Outside);
    assert_eq!(solid.classify(&Point3::new(2.0, 0.5, 0.5)), Location::Boundary);
}
