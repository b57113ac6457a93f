//! Oriented lines in a plane's 2D frame.

use nalgebra::{Point2, Vector2};

use crate::error::{GeometryError, Result};
use crate::plane::Side;

/// An oriented line in 2D.
///
/// The plus side is the right-hand side when walking along the direction,
/// so a counter-clockwise loop has its interior on the minus side of each
/// of its edges.
#[derive(Debug, Clone, PartialEq)]
pub struct Line2D {
    origin: Point2<f64>,
    direction: Vector2<f64>,
    tolerance: f64,
}

impl Line2D {
    /// Builds the line going from `p` to `q`.
    ///
    /// # Errors
    /// Returns [`GeometryError::ZeroNorm`] if the points are identical.
    pub fn new(p: Point2<f64>, q: Point2<f64>, tolerance: f64) -> Result<Self> {
        let delta = q - p;
        let norm = delta.norm();
        if norm == 0.0 {
            return Err(GeometryError::ZeroNorm);
        }
        Ok(Self {
            origin: p,
            direction: delta / norm,
            tolerance,
        })
    }

    /// Builds the line through `p` making `angle` radians with the x axis.
    pub fn from_point_and_angle(p: Point2<f64>, angle: f64, tolerance: f64) -> Self {
        let (sin, cos) = angle.sin_cos();
        Self {
            origin: p,
            direction: Vector2::new(cos, sin),
            tolerance,
        }
    }

    #[inline]
    pub fn origin(&self) -> Point2<f64> {
        self.origin
    }

    #[inline]
    pub fn direction(&self) -> Vector2<f64> {
        self.direction
    }

    #[inline]
    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    /// Angle of the direction with the x axis, in `(-π, π]`.
    pub fn angle(&self) -> f64 {
        self.direction.y.atan2(self.direction.x)
    }

    /// Returns the same line with the opposite orientation.
    pub fn reverse(&self) -> Self {
        Self {
            origin: self.origin,
            direction: -self.direction,
            tolerance: self.tolerance,
        }
    }

    /// Signed distance of `point` from the line, positive on the right-hand side.
    #[inline]
    pub fn offset(&self, point: &Point2<f64>) -> f64 {
        let d = point - self.origin;
        d.x * self.direction.y - d.y * self.direction.x
    }

    /// Signed position of the projection of `point` along the line.
    #[inline]
    pub fn abscissa(&self, point: &Point2<f64>) -> f64 {
        (point - self.origin).dot(&self.direction)
    }

    /// Point at abscissa `a`.
    #[inline]
    pub fn point_at(&self, a: f64) -> Point2<f64> {
        self.origin + self.direction * a
    }

    pub fn classify_point(&self, point: &Point2<f64>) -> Side {
        let offset = self.offset(point);
        if offset > self.tolerance {
            Side::Plus
        } else if offset < -self.tolerance {
            Side::Minus
        } else {
            Side::Hyperplane
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::FRAC_PI_2;

    const TOL: f64 = 1e-10;

    #[test]
    fn rejects_coincident_points() {
        let p = Point2::new(1.0, 1.0);
        assert_eq!(Line2D::new(p, p, TOL), Err(GeometryError::ZeroNorm));
    }

    #[test]
    fn plus_side_is_on_the_right() {
        let line = Line2D::new(Point2::new(0.0, 0.0), Point2::new(2.0, 0.0), TOL).unwrap();
        assert_relative_eq!(line.offset(&Point2::new(5.0, -3.0)), 3.0);
        assert_eq!(line.classify_point(&Point2::new(1.0, -1.0)), Side::Plus);
        assert_eq!(line.classify_point(&Point2::new(1.0, 1.0)), Side::Minus);
        assert_eq!(line.classify_point(&Point2::new(-4.0, 0.0)), Side::Hyperplane);

        let reversed = line.reverse();
        assert_eq!(reversed.classify_point(&Point2::new(1.0, 1.0)), Side::Plus);
    }

    #[test]
    fn angle_and_abscissa() {
        let line = Line2D::from_point_and_angle(Point2::new(1.0, 1.0), FRAC_PI_2, TOL);
        assert_relative_eq!(line.angle(), FRAC_PI_2);
        assert_relative_eq!(line.point_at(2.0), Point2::new(1.0, 3.0), epsilon = 1e-12);
        assert_relative_eq!(line.abscissa(&Point2::new(7.0, -1.0)), -2.0, epsilon = 1e-12);
    }
}
