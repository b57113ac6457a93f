//! Solids bounded by planar polygons.

use std::collections::HashMap;

use nalgebra::{Point2, Point3};
use tracing::debug;

use crate::bsp::{BoundaryTree, Location};
use crate::config::check_tolerance;
use crate::error::{GeometryError, Result};
use crate::sub_plane::SubPlane;

/// A closed solid described by its boundary tree.
#[derive(Debug, Clone)]
pub struct Polyhedron {
    tree: BoundaryTree,
    tolerance: f64,
}

impl Polyhedron {
    /// Builds a solid from a shared vertex list and facets indexing it.
    ///
    /// Every facet lists its vertex indices counter-clockwise when seen
    /// from outside the solid. Facets may be non-convex.
    ///
    /// # Errors
    /// The boundary is checked before the tree is built:
    /// - every facet has at least 3 vertices, all in range
    /// - no two vertices are closer than `tolerance`
    /// - the vertices of each facet lie on a common plane
    /// - every directed edge is matched by exactly one opposite edge, so
    ///   the boundary is closed and consistently oriented
    pub fn from_vertices_and_facets<F: AsRef<[usize]>>(
        vertices: &[Point3<f64>],
        facets: &[F],
        tolerance: f64,
    ) -> Result<Self> {
        let sub_planes = boundary_facets(vertices, facets, tolerance).inspect_err(|e| {
            debug!(error = %e, "rejected polyhedron boundary");
        })?;
        debug!(
            vertices = vertices.len(),
            facets = sub_planes.len(),
            "validated polyhedron boundary"
        );

        Ok(Self {
            tree: BoundaryTree::from_facets(sub_planes),
            tolerance,
        })
    }

    /// Builds the axis-aligned box spanning `min` to `max`.
    pub fn cuboid(min: Point3<f64>, max: Point3<f64>, tolerance: f64) -> Result<Self> {
        let (x0, y0, z0) = (min.x, min.y, min.z);
        let (x1, y1, z1) = (max.x, max.y, max.z);
        let vertices = [
            Point3::new(x0, y0, z0),
            Point3::new(x1, y0, z0),
            Point3::new(x1, y1, z0),
            Point3::new(x0, y1, z0),
            Point3::new(x0, y0, z1),
            Point3::new(x1, y0, z1),
            Point3::new(x1, y1, z1),
            Point3::new(x0, y1, z1),
        ];
        let facets = [
            [0, 3, 2, 1],
            [4, 5, 6, 7],
            [0, 1, 5, 4],
            [3, 7, 6, 2],
            [0, 4, 7, 3],
            [1, 2, 6, 5],
        ];
        Self::from_vertices_and_facets(&vertices, &facets, tolerance)
    }

    /// Extrudes a simple counter-clockwise outline along `z`, from 0 to `height`.
    ///
    /// The outline may be non-convex.
    pub fn prism(outline: &[Point2<f64>], height: f64, tolerance: f64) -> Result<Self> {
        let n = outline.len();
        let vertices: Vec<Point3<f64>> = [0.0, height]
            .iter()
            .flat_map(|&z| outline.iter().map(move |p| Point3::new(p.x, p.y, z)))
            .collect();

        let mut facets = Vec::with_capacity(n + 2);
        facets.push((0..n).rev().collect::<Vec<_>>());
        facets.push((n..2 * n).collect());
        for i in 0..n {
            let j = (i + 1) % n;
            facets.push(vec![i, j, j + n, i + n]);
        }
        Self::from_vertices_and_facets(&vertices, &facets, tolerance)
    }

    #[inline]
    pub fn tree(&self) -> &BoundaryTree {
        &self.tree
    }

    #[inline]
    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    /// Locates `point` relative to the solid.
    pub fn classify(&self, point: &Point3<f64>) -> Location {
        self.tree.classify(point)
    }
}

fn boundary_facets<F: AsRef<[usize]>>(
    vertices: &[Point3<f64>],
    facets: &[F],
    tolerance: f64,
) -> Result<Vec<SubPlane>> {
    check_tolerance(tolerance)?;

    for (first, a) in vertices.iter().enumerate() {
        for (offset, b) in vertices[first + 1..].iter().enumerate() {
            if (b - a).norm() <= tolerance {
                return Err(GeometryError::CloseVertices {
                    first,
                    second: first + 1 + offset,
                });
            }
        }
    }

    let mut sub_planes = Vec::with_capacity(facets.len());
    for (facet, indices) in facets.iter().enumerate() {
        let indices = indices.as_ref();
        if indices.len() < 3 {
            return Err(GeometryError::TooFewVertices {
                facet,
                count: indices.len(),
            });
        }
        if let Some(&index) = indices.iter().find(|&&i| i >= vertices.len()) {
            return Err(GeometryError::VertexIndexOutOfRange { facet, index });
        }

        let points: Vec<Point3<f64>> = indices.iter().map(|&i| vertices[i]).collect();
        let sub_plane = SubPlane::from_polygon(&points, tolerance)?;
        if let Some(&vertex) = indices
            .iter()
            .find(|&&i| !sub_plane.plane().contains(&vertices[i]))
        {
            return Err(GeometryError::OutOfPlane { facet, vertex });
        }
        sub_planes.push(sub_plane);
    }

    check_edges(facets)?;
    Ok(sub_planes)
}

/// Checks that each directed edge appears once and its reverse once.
fn check_edges<F: AsRef<[usize]>>(facets: &[F]) -> Result<()> {
    let edges = |indices: &[usize]| -> Vec<(usize, usize)> {
        let n = indices.len();
        (0..n).map(|i| (indices[i], indices[(i + 1) % n])).collect()
    };

    let mut owners: HashMap<(usize, usize), usize> = HashMap::new();
    for (facet, indices) in facets.iter().enumerate() {
        for (start, end) in edges(indices.as_ref()) {
            if owners.insert((start, end), facet).is_some() {
                return Err(GeometryError::FacetOrientationMismatch { start, end });
            }
        }
    }

    for indices in facets {
        for (start, end) in edges(indices.as_ref()) {
            if !owners.contains_key(&(end, start)) {
                return Err(GeometryError::EdgeConnectedToOneFacet { start, end });
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOL: f64 = 1e-10;

    fn unit_cube_parts() -> (Vec<Point3<f64>>, Vec<Vec<usize>>) {
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
            Point3::new(0.0, 0.0, 1.0),
            Point3::new(1.0, 0.0, 1.0),
            Point3::new(1.0, 1.0, 1.0),
            Point3::new(0.0, 1.0, 1.0),
        ];
        let facets = vec![
            vec![0, 3, 2, 1],
            vec![4, 5, 6, 7],
            vec![0, 1, 5, 4],
            vec![3, 7, 6, 2],
            vec![0, 4, 7, 3],
            vec![1, 2, 6, 5],
        ];
        (vertices, facets)
    }

    #[test]
    fn cuboid_classification() {
        let solid =
            Polyhedron::cuboid(Point3::new(-1.0, 0.0, 2.0), Point3::new(1.0, 3.0, 4.0), TOL).unwrap();
        assert_eq!(solid.tree().facet_count(), 6);
        assert_eq!(solid.tolerance(), TOL);
        assert_eq!(solid.classify(&Point3::new(0.0, 1.5, 3.0)), Location::Inside);
        assert_eq!(solid.classify(&Point3::new(0.0, 1.5, 1.0)), Location::Outside);
        assert_eq!(solid.classify(&Point3::new(1.0, 1.5, 3.0)), Location::Boundary);
    }

    #[test]
    fn cube_from_parts_matches_cuboid() {
        let (vertices, facets) = unit_cube_parts();
        let solid = Polyhedron::from_vertices_and_facets(&vertices, &facets, TOL).unwrap();
        assert_eq!(solid.classify(&Point3::new(0.5, 0.5, 0.5)), Location::Inside);
        assert_eq!(solid.classify(&Point3::new(0.5, 0.5, 1.5)), Location::Outside);
    }

    #[test]
    fn non_convex_prism() {
        let outline = [
            Point2::new(0.0, 0.0),
            Point2::new(2.0, 0.0),
            Point2::new(2.0, 1.0),
            Point2::new(1.0, 1.0),
            Point2::new(1.0, 2.0),
            Point2::new(0.0, 2.0),
        ];
        let solid = Polyhedron::prism(&outline, 1.0, TOL).unwrap();
        assert!(solid.tree().collect_facets().len() >= 8);

        assert_eq!(solid.classify(&Point3::new(0.5, 1.5, 0.5)), Location::Inside);
        assert_eq!(solid.classify(&Point3::new(1.5, 0.5, 0.5)), Location::Inside);
        assert_eq!(solid.classify(&Point3::new(1.5, 1.5, 0.5)), Location::Outside);
        assert_eq!(solid.classify(&Point3::new(1.0, 1.5, 0.5)), Location::Boundary);
        assert_eq!(solid.classify(&Point3::new(0.5, 0.5, 1.0)), Location::Boundary);
    }

    #[test]
    fn rejects_bad_tolerance() {
        let (vertices, facets) = unit_cube_parts();
        assert_eq!(
            Polyhedron::from_vertices_and_facets(&vertices, &facets, 0.0).unwrap_err(),
            GeometryError::InvalidTolerance(0.0)
        );
    }

    #[test]
    fn rejects_small_facets() {
        let (vertices, mut facets) = unit_cube_parts();
        facets[2] = vec![0, 1];
        assert_eq!(
            Polyhedron::from_vertices_and_facets(&vertices, &facets, TOL).unwrap_err(),
            GeometryError::TooFewVertices { facet: 2, count: 2 }
        );
    }

    #[test]
    fn rejects_unknown_vertices() {
        let (vertices, mut facets) = unit_cube_parts();
        facets[1][2] = 8;
        assert_eq!(
            Polyhedron::from_vertices_and_facets(&vertices, &facets, TOL).unwrap_err(),
            GeometryError::VertexIndexOutOfRange { facet: 1, index: 8 }
        );
    }

    #[test]
    fn rejects_close_vertices() {
        let (mut vertices, facets) = unit_cube_parts();
        vertices[5] = Point3::new(0.0, 1.0, 1e-12);
        assert_eq!(
            Polyhedron::from_vertices_and_facets(&vertices, &facets, TOL).unwrap_err(),
            GeometryError::CloseVertices { first: 3, second: 5 }
        );
    }

    #[test]
    fn rejects_warped_facets() {
        let (mut vertices, facets) = unit_cube_parts();
        vertices[6] = Point3::new(1.0, 1.0, 1.5);
        let err = Polyhedron::from_vertices_and_facets(&vertices, &facets, TOL).unwrap_err();
        assert!(matches!(err, GeometryError::OutOfPlane { facet: 1, .. }), "{err}");
    }

    #[test]
    fn rejects_open_boundary() {
        let (vertices, mut facets) = unit_cube_parts();
        facets.remove(1);
        assert_eq!(
            Polyhedron::from_vertices_and_facets(&vertices, &facets, TOL).unwrap_err(),
            GeometryError::EdgeConnectedToOneFacet { start: 5, end: 4 }
        );
    }

    #[test]
    fn rejects_flipped_facets() {
        let (vertices, mut facets) = unit_cube_parts();
        facets[1].reverse();
        assert_eq!(
            Polyhedron::from_vertices_and_facets(&vertices, &facets, TOL).unwrap_err(),
            GeometryError::FacetOrientationMismatch { start: 5, end: 4 }
        );
    }

    #[test]
    fn prism_needs_a_polygon() {
        let outline = [Point2::new(0.0, 0.0), Point2::new(1.0, 0.0)];
        assert!(Polyhedron::prism(&outline, 1.0, TOL).is_err());
        let square = [
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(1.0, 1.0),
            Point2::new(0.0, 1.0),
        ];
        assert!(Polyhedron::prism(&square, 0.0, TOL).is_err());
    }

    #[test]
    fn rejects_degenerate_cuboid() {
        let result = Polyhedron::cuboid(Point3::origin(), Point3::new(1.0, 1.0, 0.0), TOL);
        assert!(result.is_err());
    }
}
