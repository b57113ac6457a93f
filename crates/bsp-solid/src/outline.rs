//! Silhouette extraction.
//!
//! The outline of a solid seen along `w = u × v` is the union of the
//! projections of its boundary facets onto the `(u, v)` viewing plane.
//! Facets that are edge-on to the view are skipped; every other facet is
//! projected with its loops wound counter-clockwise in the view, then
//! unioned into the running outline. Near-duplicate and collinear vertices
//! left over by the union are removed at the end.
//!
//! Facets reaching infinity give open contours. Their end edges are
//! half-lines, cut where they leave the region's far frame and beyond the
//! perpendicular through their finite vertex (see [`PolygonRegion`]).

use nalgebra::{Point2, Vector3};
use tracing::{debug, trace};

use crate::bsp::{BoundaryNode, BoundaryTree, BspVisitor, VisitOrder};
use crate::config::{AXES_ORTHONORMALITY_THRESHOLD, KernelConfig};
use crate::error::{GeometryError, Result};
use crate::polyhedron::Polyhedron;
use crate::region::{Contour, PolygonRegion};
use crate::sub_plane::SubPlane;

/// Projects solids onto a viewing plane.
#[derive(Debug, Clone)]
pub struct OutlineExtractor {
    u: Vector3<f64>,
    v: Vector3<f64>,
    w: Vector3<f64>,
    config: KernelConfig,
}

impl OutlineExtractor {
    /// Creates an extractor for the viewing plane spanned by `u` and `v`.
    ///
    /// # Errors
    /// Returns [`GeometryError::NonOrthogonalAxes`] unless `u` and `v` are
    /// orthogonal unit vectors.
    pub fn new(u: Vector3<f64>, v: Vector3<f64>) -> Result<Self> {
        Self::with_config(u, v, &KernelConfig::default())
    }

    pub fn with_config(u: Vector3<f64>, v: Vector3<f64>, config: &KernelConfig) -> Result<Self> {
        config.validate()?;
        let orthonormal = (u.norm() - 1.0).abs() <= AXES_ORTHONORMALITY_THRESHOLD
            && (v.norm() - 1.0).abs() <= AXES_ORTHONORMALITY_THRESHOLD
            && u.dot(&v).abs() <= AXES_ORTHONORMALITY_THRESHOLD;
        if !orthonormal {
            return Err(GeometryError::NonOrthogonalAxes);
        }

        Ok(Self {
            u,
            v,
            w: u.cross(&v),
            config: *config,
        })
    }

    /// Viewing direction `u × v`.
    #[inline]
    pub fn view_direction(&self) -> Vector3<f64> {
        self.w
    }

    /// Outline contours of the solid described by `tree`.
    ///
    /// Closed loops read with wraparound. Outer loops are counter-clockwise
    /// in the `(u, v)` frame, holes clockwise. Open contours come from
    /// unbounded facets. The tree's own tolerance is used when it has one.
    pub fn outline(&self, tree: &BoundaryTree) -> Vec<Contour> {
        self.extract(tree, self.tolerance_for(tree))
    }

    /// Outline contours of `solid`, at the tolerance it was built with.
    pub fn outline_of(&self, solid: &Polyhedron) -> Vec<Contour> {
        self.extract(solid.tree(), solid.tolerance())
    }

    fn tolerance_for(&self, tree: &BoundaryTree) -> f64 {
        tree.root()
            .map_or(self.config.tolerance, |root| root.cut().tolerance())
    }

    fn extract(&self, tree: &BoundaryTree, tolerance: f64) -> Vec<Contour> {
        let projector = self.project(tree, tolerance);

        let mut contours = projector.aggregate.into_contours();
        let before: usize = contours.iter().map(Contour::len).sum();
        for contour in &mut contours {
            match contour {
                Contour::Closed(points) => simplify_loop(points, self.config.collinearity_threshold),
                Contour::Open(points) => simplify_chain(points, self.config.collinearity_threshold),
            }
        }
        let after: usize = contours.iter().map(Contour::len).sum();

        debug!(
            projected = projector.projected,
            edge_on = projector.edge_on,
            contours = contours.len(),
            removed = before - after,
            "extracted outline"
        );
        contours
    }

    fn project(&self, tree: &BoundaryTree, tolerance: f64) -> Projector<'_> {
        let mut projector = Projector {
            extractor: self,
            tolerance,
            aggregate: PolygonRegion::empty(tolerance),
            projected: 0,
            edge_on: 0,
        };
        tree.visit(&mut projector);
        projector
    }
}

/// Accumulates facet projections while walking a boundary tree.
struct Projector<'a> {
    extractor: &'a OutlineExtractor,
    tolerance: f64,
    aggregate: PolygonRegion,
    projected: usize,
    edge_on: usize,
}

impl Projector<'_> {
    fn add_contribution(&mut self, facet: &SubPlane, reversed: bool) {
        let plane = facet.plane();
        let scal = plane.normal().dot(&self.extractor.w);
        if scal.abs() <= self.extractor.config.edge_on_threshold {
            trace!(scal, "skipped edge-on facet");
            self.edge_on += 1;
            return;
        }

        let tolerance = self.tolerance;
        let flip = (scal < 0.0) ^ reversed;
        let contours: Vec<Contour> = facet
            .region()
            .contours()
            .into_iter()
            .map(|contour| {
                let contour = if flip { contour.reversed() } else { contour };
                let mut projected: Vec<Point2<f64>> = Vec::with_capacity(contour.len());
                for p in contour.points() {
                    let q = self.project(&plane.to_space(p).coords);
                    // Chain ends only carry directions and are never merged.
                    let repeated = !contour.is_open()
                        && projected.last().is_some_and(|last| (q - last).norm() <= tolerance);
                    if !repeated {
                        projected.push(q);
                    }
                }
                if !contour.is_open()
                    && projected.len() > 1
                    && (projected[0] - projected[projected.len() - 1]).norm() <= tolerance
                {
                    projected.pop();
                }
                contour.with_points(projected)
            })
            .collect();

        let candidate = PolygonRegion::from_contours(contours, tolerance);
        self.aggregate = self.aggregate.union(&candidate);
        self.projected += 1;
    }

    fn project(&self, point: &Vector3<f64>) -> Point2<f64> {
        Point2::new(point.dot(&self.extractor.u), point.dot(&self.extractor.v))
    }
}

impl BspVisitor for Projector<'_> {
    fn visit_order(&mut self, _node: &BoundaryNode) -> VisitOrder {
        VisitOrder::MinusSubPlus
    }

    fn visit_internal(&mut self, node: &BoundaryNode) {
        let attribute = node.attribute();
        if let Some(facet) = attribute.plus_outside() {
            self.add_contribution(facet, false);
        }
        if let Some(facet) = attribute.plus_inside() {
            self.add_contribution(facet, true);
        }
    }
}

/// Diagonal of the bounding box of `points`.
fn extent(points: &[Point2<f64>]) -> f64 {
    let Some(first) = points.first() else {
        return 0.0;
    };
    let (min, max) = points
        .iter()
        .fold((*first, *first), |(min, max), p| (min.inf(p), max.sup(p)));
    (max - min).norm()
}

/// True when `current` sits on a straight run from `previous` to `next`.
fn is_straight(
    previous: Point2<f64>,
    current: Point2<f64>,
    next: Point2<f64>,
    threshold: f64,
) -> bool {
    let d1 = current - previous;
    let d2 = next - current;
    d1.perp(&d2).abs() <= threshold * d1.norm() * d2.norm() && d1.dot(&d2) >= 0.0
}

/// Removes redundant vertices from a closed loop.
///
/// A vertex goes when it lies within `threshold` times the loop extent of
/// the vertex kept before it, which folds the near-duplicates left by the
/// union. It also goes when the edges before and after it are collinear
/// (`|d1 × d2| <= threshold * |d1| * |d2|`) and point the same way
/// (`d1 · d2 >= 0`). Cusps are kept. Sweeps are repeated until nothing
/// changes, so a second call is a no-op. Loops with fewer than 3 vertices
/// are left alone.
pub fn simplify_loop(points: &mut Vec<Point2<f64>>, threshold: f64) {
    loop {
        let n = points.len();
        if n < 3 {
            return;
        }
        let merge = threshold * extent(points);

        let mut write = 0;
        for read in 0..n {
            let previous = if write == 0 { points[n - 1] } else { points[write - 1] };
            let current = points[read];
            let next = points[(read + 1) % n];
            if (current - previous).norm() <= merge || is_straight(previous, current, next, threshold) {
                continue;
            }
            points[write] = current;
            write += 1;
        }

        if write == n {
            return;
        }
        points.truncate(write);
    }
}

/// Removes redundant interior vertices from an open chain.
///
/// Same rules as [`simplify_loop`], without wraparound. The two end points
/// give the directions of the infinite edges and are always kept.
pub fn simplify_chain(points: &mut Vec<Point2<f64>>, threshold: f64) {
    loop {
        let n = points.len();
        if n < 3 {
            return;
        }
        let merge = threshold * extent(&points[1..n - 1]);

        let mut write = 1;
        for read in 1..n - 1 {
            let previous = points[write - 1];
            let current = points[read];
            let next = points[read + 1];
            let merged = write > 1 && (current - previous).norm() <= merge;
            if merged || is_straight(previous, current, next, threshold) {
                continue;
            }
            points[write] = current;
            write += 1;
        }
        points[write] = points[n - 1];
        write += 1;

        if write == n {
            return;
        }
        points.truncate(write);
    }
}
