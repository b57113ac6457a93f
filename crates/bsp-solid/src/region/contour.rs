//! Boundary contours of 2D regions.

use nalgebra::Point2;

/// One boundary component of a region.
///
/// Interiors lie on the left of the direction of travel, so a bounded
/// region has counter-clockwise outer loops and clockwise holes.
#[derive(Debug, Clone, PartialEq)]
pub enum Contour {
    /// A cycle read with wraparound.
    Closed(Vec<Point2<f64>>),
    /// A chain going to infinity at both ends.
    ///
    /// The first and last points only give the direction of the two end
    /// edges: the first edge is the half-line on `(p0, p1)` that ends at
    /// `p1`, the last one the half-line on `(pn-2, pn-1)` that starts at
    /// `pn-2`. A chain of two points is a whole line.
    Open(Vec<Point2<f64>>),
}

impl Contour {
    #[inline]
    pub fn points(&self) -> &[Point2<f64>] {
        match self {
            Contour::Closed(points) | Contour::Open(points) => points,
        }
    }

    #[inline]
    pub fn points_mut(&mut self) -> &mut Vec<Point2<f64>> {
        match self {
            Contour::Closed(points) | Contour::Open(points) => points,
        }
    }

    pub fn into_points(self) -> Vec<Point2<f64>> {
        match self {
            Contour::Closed(points) | Contour::Open(points) => points,
        }
    }

    #[inline]
    pub fn is_open(&self) -> bool {
        matches!(self, Contour::Open(_))
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.points().len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points().is_empty()
    }

    /// Returns the contour traversed backwards. An open chain stays open,
    /// with its direction points still at both ends.
    pub fn reversed(&self) -> Self {
        let points = self.points().iter().rev().copied().collect();
        match self {
            Contour::Closed(_) => Contour::Closed(points),
            Contour::Open(_) => Contour::Open(points),
        }
    }

    /// Same kind of contour over other points.
    pub(crate) fn with_points(&self, points: Vec<Point2<f64>>) -> Self {
        match self {
            Contour::Closed(_) => Contour::Closed(points),
            Contour::Open(_) => Contour::Open(points),
        }
    }
}
