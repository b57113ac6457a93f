//! Oriented lines in 3D space.

use nalgebra::{Point3, Vector3};

use crate::config::{PARALLEL_LINES_THRESHOLD, check_tolerance};
use crate::error::{GeometryError, Result};
use crate::vector;

/// An oriented line in 3D space.
///
/// The line is stored as a unit `direction` and the point `origin` closest to
/// the 3D origin (so `origin · direction = 0`). Abscissa 0 along the line
/// corresponds to `origin`.
#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    direction: Vector3<f64>,
    origin: Point3<f64>,
    tolerance: f64,
}

impl Line {
    /// Builds the line going from `p1` to `p2`.
    ///
    /// # Errors
    /// Returns [`GeometryError::ZeroNorm`] if the two points are identical
    /// and [`GeometryError::InvalidTolerance`] unless `tolerance` is finite
    /// and positive.
    pub fn new(p1: Point3<f64>, p2: Point3<f64>, tolerance: f64) -> Result<Self> {
        check_tolerance(tolerance)?;
        let (direction, origin) = Self::frame(&p1, &p2)?;
        Ok(Self {
            direction,
            origin,
            tolerance,
        })
    }

    /// Builds the line through `point` along `direction`.
    ///
    /// # Errors
    /// Returns [`GeometryError::ZeroNorm`] if `direction` is the zero vector.
    pub fn from_point_and_direction(
        point: Point3<f64>,
        direction: Vector3<f64>,
        tolerance: f64,
    ) -> Result<Self> {
        Self::new(point, point + direction, tolerance)
    }

    /// Refits the line in place so it goes from `p1` to `p2`, keeping its tolerance.
    ///
    /// On error the line is left untouched.
    pub fn reset(&mut self, p1: Point3<f64>, p2: Point3<f64>) -> Result<()> {
        let (direction, origin) = Self::frame(&p1, &p2)?;
        self.direction = direction;
        self.origin = origin;
        Ok(())
    }

    /// Returns a new line through `p1` and `p2` with this line's tolerance.
    pub fn with_points(&self, p1: Point3<f64>, p2: Point3<f64>) -> Result<Self> {
        Self::new(p1, p2, self.tolerance)
    }

    fn frame(p1: &Point3<f64>, p2: &Point3<f64>) -> Result<(Vector3<f64>, Point3<f64>)> {
        let delta = p2 - p1;
        let norm2 = delta.norm_squared();
        if norm2 == 0.0 {
            return Err(GeometryError::ZeroNorm);
        }
        let direction = delta / norm2.sqrt();
        let origin = p1 - delta * (p1.coords.dot(&delta) / norm2);
        Ok((direction, origin))
    }

    /// Returns the unit direction of the line.
    #[inline]
    pub fn direction(&self) -> Vector3<f64> {
        self.direction
    }

    /// Returns the point of the line closest to the 3D origin.
    #[inline]
    pub fn origin(&self) -> Point3<f64> {
        self.origin
    }

    /// Returns the coincidence tolerance.
    #[inline]
    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    /// Returns a line covering the same points with the opposite direction.
    pub fn revert(&self) -> Self {
        Self {
            direction: -self.direction,
            origin: self.origin,
            tolerance: self.tolerance,
        }
    }

    /// Signed abscissa of the projection of `point` on the line.
    #[inline]
    pub fn abscissa(&self, point: &Point3<f64>) -> f64 {
        (point - self.origin).dot(&self.direction)
    }

    /// Point of the line at abscissa `a`.
    #[inline]
    pub fn point_at(&self, a: f64) -> Point3<f64> {
        self.origin + self.direction * a
    }

    /// Maps a 3D point to its 1D coordinate on the line.
    #[inline]
    pub fn to_sub_space(&self, point: &Point3<f64>) -> f64 {
        self.abscissa(point)
    }

    /// Maps a 1D coordinate back to 3D.
    #[inline]
    pub fn to_space(&self, abscissa: f64) -> Point3<f64> {
        self.point_at(abscissa)
    }

    /// Checks whether `point` lies on the line within tolerance.
    pub fn contains(&self, point: &Point3<f64>) -> bool {
        self.distance(point) < self.tolerance
    }

    /// Distance between `point` and the line.
    pub fn distance(&self, point: &Point3<f64>) -> f64 {
        let d = point - self.origin;
        let n = d - self.direction * d.dot(&self.direction);
        n.norm()
    }

    /// Shortest distance between this line and `other`.
    pub fn distance_to_line(&self, other: &Line) -> f64 {
        let normal = self.direction.cross(&other.direction);
        let n = normal.norm();
        if n < PARALLEL_LINES_THRESHOLD {
            return self.distance(&other.origin);
        }
        let offset = (other.origin - self.origin).dot(&normal) / n;
        offset.abs()
    }

    /// Point of this line closest to `other`.
    ///
    /// For parallel lines every point is equally close; the line origin is
    /// returned.
    pub fn closest_point(&self, other: &Line) -> Point3<f64> {
        let cos = self.direction.dot(&other.direction);
        let n = 1.0 - cos * cos;
        if n < PARALLEL_LINES_THRESHOLD {
            return self.origin;
        }

        let delta = other.origin - self.origin;
        let a = delta.dot(&self.direction);
        let b = delta.dot(&other.direction);
        self.origin + self.direction * ((a - b * cos) / n)
    }

    /// Intersection point with `other`, if the lines meet within tolerance.
    pub fn intersection(&self, other: &Line) -> Option<Point3<f64>> {
        let closest = self.closest_point(other);
        other.contains(&closest).then_some(closest)
    }

    /// Checks whether both lines cover the same points, whatever their orientation.
    pub fn is_similar_to(&self, other: &Line) -> bool {
        let angle = vector::angle(&self.direction, &other.direction);
        (angle < self.tolerance || angle > std::f64::consts::PI - self.tolerance)
            && self.contains(&other.origin)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    const TOL: f64 = 1e-10;

    fn line(a: [f64; 3], b: [f64; 3]) -> Line {
        Line::new(Point3::from(a), Point3::from(b), TOL).unwrap()
    }

    #[test]
    fn coincident_points_are_rejected() {
        let p = Point3::new(1.0, 2.0, 3.0);
        assert_eq!(Line::new(p, p, TOL), Err(GeometryError::ZeroNorm));
    }

    #[test]
    fn unusable_tolerance_is_rejected() {
        let (p1, p2) = (Point3::origin(), Point3::new(1.0, 0.0, 0.0));
        assert_eq!(Line::new(p1, p2, 0.0), Err(GeometryError::InvalidTolerance(0.0)));
        assert!(Line::new(p1, p2, -1e-10).is_err());
        assert!(Line::new(p1, p2, f64::NAN).is_err());
        assert!(Line::from_point_and_direction(p1, Vector3::y(), f64::INFINITY).is_err());
    }

    #[test]
    fn frame_invariants() {
        let l = line([1.0, 2.0, 3.0], [4.0, -1.0, 2.0]);
        assert_relative_eq!(l.direction().norm(), 1.0, epsilon = 1e-14);
        assert_abs_diff_eq!(l.origin().coords.dot(&l.direction()), 0.0, epsilon = 1e-14);
    }

    #[test]
    fn contains_defining_points() {
        let p1 = Point3::new(0.0, 0.0, 1.0);
        let p2 = Point3::new(1.0, 0.0, 1.0);
        let l = Line::new(p1, p2, TOL).unwrap();
        assert!(l.distance(&p1) < TOL);
        assert!(l.distance(&p2) < TOL);
        assert!(l.contains(&Point3::new(0.5, 0.0, 1.0)));
        assert!(!l.contains(&Point3::new(0.5, 0.5, 1.0)));
    }

    #[test]
    fn abscissa_round_trip() {
        let l = line([0.0, 0.0, 1.0], [1.0, 1.0, 2.0]);
        for a in [-3.5, 0.0, 0.25, 7.0] {
            assert_relative_eq!(l.abscissa(&l.point_at(a)), a, epsilon = 1e-12);
            assert_relative_eq!(l.to_sub_space(&l.to_space(a)), a, epsilon = 1e-12);
        }
        assert_abs_diff_eq!(l.abscissa(&l.origin()), 0.0);
    }

    #[test]
    fn distance_to_point() {
        let l = line([0.0, 0.0, 0.0], [1.0, 0.0, 0.0]);
        assert_relative_eq!(l.distance(&Point3::new(5.0, 3.0, 4.0)), 5.0);
    }

    #[test]
    fn distance_between_skew_lines() {
        let l1 = line([0.0, 0.0, 0.0], [1.0, 0.0, 0.0]);
        let l2 = line([0.0, 0.0, 2.0], [0.0, 1.0, 2.0]);
        assert_relative_eq!(l1.distance_to_line(&l2), 2.0, epsilon = 1e-12);
    }

    #[test]
    fn distance_between_parallel_lines() {
        let l1 = line([0.0, 0.0, 0.0], [1.0, 0.0, 0.0]);
        let l2 = line([4.0, 3.0, 0.0], [9.0, 3.0, 0.0]);
        assert_relative_eq!(l1.distance_to_line(&l2), 3.0, epsilon = 1e-12);
    }

    #[test]
    fn closest_point_on_skew_lines() {
        let l1 = line([0.0, 0.0, 0.0], [1.0, 0.0, 0.0]);
        let l2 = line([2.0, -1.0, 1.0], [2.0, 1.0, 1.0]);
        let p = l1.closest_point(&l2);
        assert_relative_eq!(p, Point3::new(2.0, 0.0, 0.0), epsilon = 1e-12);
    }

    #[test]
    fn closest_point_of_parallel_lines_is_origin() {
        let l1 = line([0.0, 1.0, 0.0], [1.0, 1.0, 0.0]);
        let l2 = line([0.0, 2.0, 0.0], [1.0, 2.0, 0.0]);
        assert_eq!(l1.closest_point(&l2), l1.origin());
    }

    #[test]
    fn crossing_lines_intersect() {
        let x = Point3::new(1.0, 2.0, 3.0);
        let l1 = Line::new(x, x + Vector3::new(1.0, 1.0, 0.0), TOL).unwrap();
        let l2 = Line::new(x + Vector3::new(0.0, -2.0, 5.0), x, TOL).unwrap();
        let i = l1.intersection(&l2).unwrap();
        assert!((i - x).norm() < 1e-9);
    }

    #[test]
    fn parallel_lines_do_not_intersect() {
        let l1 = line([0.0, 0.0, 0.0], [1.0, 0.0, 0.0]);
        let l2 = line([0.0, 1.0, 0.0], [1.0, 1.0, 0.0]);
        assert!(l1.intersection(&l2).is_none());
    }

    #[test]
    fn skew_lines_do_not_intersect() {
        let l1 = line([0.0, 0.0, 0.0], [1.0, 0.0, 0.0]);
        let l2 = line([0.0, 0.0, 1.0], [0.0, 1.0, 1.0]);
        assert!(l1.intersection(&l2).is_none());
    }

    #[test]
    fn similarity_ignores_orientation() {
        let l1 = line([0.0, 0.0, 0.0], [1.0, 1.0, 1.0]);
        let l2 = line([3.0, 3.0, 3.0], [-2.0, -2.0, -2.0]);
        let l3 = line([0.0, 0.0, 1.0], [1.0, 1.0, 2.0]);
        assert!(l1.is_similar_to(&l2));
        assert!(l1.is_similar_to(&l1.revert()));
        assert!(!l1.is_similar_to(&l3));
    }

    #[test]
    fn revert_keeps_points() {
        let l = line([1.0, 0.0, 0.0], [1.0, 1.0, 0.0]);
        let r = l.revert();
        assert_eq!(r.direction(), -l.direction());
        assert_eq!(r.origin(), l.origin());
        assert_relative_eq!(r.abscissa(&l.point_at(2.0)), -2.0, epsilon = 1e-12);
    }

    #[test]
    fn reset_refits_in_place() {
        let mut l = line([0.0, 0.0, 0.0], [1.0, 0.0, 0.0]);
        let copy = l.clone();
        l.reset(Point3::new(0.0, 1.0, 0.0), Point3::new(0.0, 1.0, 1.0)).unwrap();
        assert_relative_eq!(l.direction(), Vector3::z(), epsilon = 1e-14);
        assert_relative_eq!(l.origin(), Point3::new(0.0, 1.0, 0.0), epsilon = 1e-14);
        assert_eq!(l.tolerance(), TOL);
        // The copy is independent.
        assert_eq!(copy.direction(), Vector3::x());

        let p = Point3::new(2.0, 2.0, 2.0);
        assert!(l.reset(p, p).is_err());
        assert_relative_eq!(l.direction(), Vector3::z(), epsilon = 1e-14);
    }

    #[test]
    fn from_point_and_direction_matches_two_points() {
        let p = Point3::new(1.0, 2.0, 3.0);
        let d = Vector3::new(0.0, 2.0, 0.0);
        let a = Line::from_point_and_direction(p, d, TOL).unwrap();
        let b = a.with_points(p, p + d).unwrap();
        assert_eq!(a, b);
        assert!(Line::from_point_and_direction(p, Vector3::zeros(), TOL).is_err());
    }
}
