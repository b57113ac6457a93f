//! Oriented planes in 3D space.

use nalgebra::{Point2, Point3, Rotation3, Vector3};

use crate::config::{
    DETERMINANT_THRESHOLD, LINE_PLANE_PARALLEL_THRESHOLD, NORMAL_NORM_THRESHOLD,
    SIMILAR_ANGLE_THRESHOLD, check_tolerance,
};
use crate::error::{GeometryError, Result};
use crate::line::Line;
use crate::vector;

/// Position of geometry relative to an oriented hyperplane.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    /// Entirely on the side the normal points to
    Plus,
    /// Entirely on the side opposite to the normal
    Minus,
    /// Parts on both sides
    Both,
    /// Lying on the hyperplane (within tolerance)
    Hyperplane,
}

/// An oriented plane in 3D space.
///
/// The plane is the set of points `p` with `p · w + origin_offset = 0`.
/// It carries an orthonormal right-handed frame `(u, v, w)` used to express
/// in-plane geometry in 2D coordinates; `origin` is the foot of the
/// perpendicular from the 3D origin and maps to `(0, 0)`.
#[derive(Debug, Clone, PartialEq)]
pub struct Plane {
    origin_offset: f64,
    origin: Point3<f64>,
    u: Vector3<f64>,
    v: Vector3<f64>,
    w: Vector3<f64>,
    tolerance: f64,
}

impl Plane {
    /// Creates the plane through the 3D origin with the given normal.
    ///
    /// # Errors
    /// Returns [`GeometryError::DegenerateNormal`] if `normal` is (nearly) zero
    /// and [`GeometryError::InvalidTolerance`] for a tolerance that is not
    /// finite and positive.
    pub fn new(normal: Vector3<f64>, tolerance: f64) -> Result<Self> {
        let w = unit_normal(&normal)?;
        Self::with_frame(w, 0.0, tolerance)
    }

    /// Creates the plane through `point` with the given normal.
    pub fn from_point_and_normal(
        point: Point3<f64>,
        normal: Vector3<f64>,
        tolerance: f64,
    ) -> Result<Self> {
        let w = unit_normal(&normal)?;
        let origin_offset = -point.coords.dot(&w);
        Self::with_frame(w, origin_offset, tolerance)
    }

    /// Creates the plane through three points.
    ///
    /// The normal follows the right-hand rule: `(p2 - p1) × (p3 - p1)`.
    ///
    /// # Errors
    /// Returns [`GeometryError::DegenerateNormal`] if the points are collinear.
    pub fn from_three_points(
        p1: Point3<f64>,
        p2: Point3<f64>,
        p3: Point3<f64>,
        tolerance: f64,
    ) -> Result<Self> {
        let normal = (p2 - p1).cross(&(p3 - p1));
        Self::from_point_and_normal(p1, normal, tolerance)
    }

    fn with_frame(w: Vector3<f64>, origin_offset: f64, tolerance: f64) -> Result<Self> {
        check_tolerance(tolerance)?;
        let u = vector::orthogonal(&w)?;
        Ok(Self {
            origin_offset,
            origin: Point3::from(w * -origin_offset),
            u,
            v: w.cross(&u),
            w,
            tolerance,
        })
    }

    /// Moves the plane in place so it goes through `point` with the given normal.
    ///
    /// The in-plane frame is recomputed. On error the plane is left untouched.
    pub fn reset(&mut self, point: Point3<f64>, normal: Vector3<f64>) -> Result<()> {
        *self = Self::from_point_and_normal(point, normal, self.tolerance)?;
        Ok(())
    }

    /// Flips the orientation in place, keeping the same set of points.
    ///
    /// `u` and `v` are swapped so the frame stays right-handed.
    pub fn revert_self(&mut self) {
        std::mem::swap(&mut self.u, &mut self.v);
        self.w = -self.w;
        self.origin_offset = -self.origin_offset;
    }

    /// Returns a copy with the opposite orientation.
    pub fn reverted(&self) -> Self {
        let mut plane = self.clone();
        plane.revert_self();
        plane
    }

    /// Returns the unit normal `w`.
    #[inline]
    pub fn normal(&self) -> Vector3<f64> {
        self.w
    }

    /// Returns the point of the plane closest to the 3D origin.
    #[inline]
    pub fn origin(&self) -> Point3<f64> {
        self.origin
    }

    /// Returns the signed offset of the 3D origin from the plane.
    #[inline]
    pub fn origin_offset(&self) -> f64 {
        self.origin_offset
    }

    /// Returns the first in-plane axis.
    #[inline]
    pub fn u(&self) -> Vector3<f64> {
        self.u
    }

    /// Returns the second in-plane axis.
    #[inline]
    pub fn v(&self) -> Vector3<f64> {
        self.v
    }

    /// Returns the coincidence tolerance.
    #[inline]
    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    /// Signed offset of `point` from the plane, positive on the normal side.
    #[inline]
    pub fn offset(&self, point: &Point3<f64>) -> f64 {
        point.coords.dot(&self.w) + self.origin_offset
    }

    /// Offset of a parallel plane relative to this one.
    ///
    /// The result is meaningless if the planes are not parallel.
    pub fn plane_offset(&self, other: &Plane) -> f64 {
        if self.same_orientation_as(other) {
            self.origin_offset - other.origin_offset
        } else {
            self.origin_offset + other.origin_offset
        }
    }

    /// Checks whether `point` lies on the plane within tolerance.
    pub fn contains(&self, point: &Point3<f64>) -> bool {
        self.offset(point).abs() < self.tolerance
    }

    /// Classifies which side of the plane a point lies on.
    pub fn classify_point(&self, point: &Point3<f64>) -> Side {
        let offset = self.offset(point);
        if offset > self.tolerance {
            Side::Plus
        } else if offset < -self.tolerance {
            Side::Minus
        } else {
            Side::Hyperplane
        }
    }

    /// Checks whether the normals point to the same half-space.
    #[inline]
    pub fn same_orientation_as(&self, other: &Plane) -> bool {
        self.w.dot(&other.w) > 0.0
    }

    /// Checks whether both planes cover the same points, whatever their orientation.
    pub fn is_similar_to(&self, other: &Plane) -> bool {
        let angle = vector::angle(&self.w, &other.w);
        (angle < SIMILAR_ANGLE_THRESHOLD
            && (self.origin_offset - other.origin_offset).abs() < self.tolerance)
            || (angle > std::f64::consts::PI - SIMILAR_ANGLE_THRESHOLD
                && (self.origin_offset + other.origin_offset).abs() < self.tolerance)
    }

    /// Maps a 3D point to in-plane `(u, v)` coordinates.
    ///
    /// Points off the plane are projected orthogonally.
    #[inline]
    pub fn to_sub_space(&self, point: &Point3<f64>) -> Point2<f64> {
        Point2::new(point.coords.dot(&self.u), point.coords.dot(&self.v))
    }

    /// Maps in-plane coordinates back to the 3D point on the plane.
    #[inline]
    pub fn to_space(&self, point: &Point2<f64>) -> Point3<f64> {
        self.point_at(point, 0.0)
    }

    /// Maps in-plane coordinates to the 3D point lying `offset` away from the plane.
    pub fn point_at(&self, in_plane: &Point2<f64>, offset: f64) -> Point3<f64> {
        Point3::from(
            self.u * in_plane.x + self.v * in_plane.y + self.w * (offset - self.origin_offset),
        )
    }

    /// Projects a point onto the plane (finds the closest point on the plane).
    #[inline]
    pub fn project(&self, point: &Point3<f64>) -> Point3<f64> {
        point - self.w * self.offset(point)
    }

    /// Returns the rotated plane.
    ///
    /// The in-plane axes are carried through the rotation rather than
    /// recomputed, so 2D coordinates stay continuous.
    pub fn rotate(&self, center: &Point3<f64>, rotation: &Rotation3<f64>) -> Self {
        let origin = center + rotation * (self.origin - center);
        let w = rotation * self.w;
        Self {
            origin_offset: -origin.coords.dot(&w),
            origin: Point3::from(w * origin.coords.dot(&w)),
            u: rotation * self.u,
            v: rotation * self.v,
            w,
            tolerance: self.tolerance,
        }
    }

    /// Returns the translated plane with the same in-plane axes.
    pub fn translate(&self, translation: &Vector3<f64>) -> Self {
        let origin_offset = self.origin_offset - translation.dot(&self.w);
        Self {
            origin_offset,
            origin: Point3::from(self.w * -origin_offset),
            u: self.u,
            v: self.v,
            w: self.w,
            tolerance: self.tolerance,
        }
    }

    /// Point where `line` crosses the plane, or `None` if they are parallel.
    pub fn intersection_with_line(&self, line: &Line) -> Option<Point3<f64>> {
        let direction = line.direction();
        let dot = self.w.dot(&direction);
        if dot.abs() < LINE_PLANE_PARALLEL_THRESHOLD {
            return None;
        }
        let point = line.origin();
        let k = -(self.origin_offset + self.w.dot(&point.coords)) / dot;
        Some(point + direction * k)
    }

    /// Line shared by both planes, or `None` if they are parallel.
    ///
    /// The line is oriented along `self.normal() × other.normal()`.
    pub fn intersection(&self, other: &Plane) -> Option<Line> {
        let direction = self.w.cross(&other.w);
        if direction.norm() < self.tolerance {
            return None;
        }
        let third = Plane::new(direction, self.tolerance).ok()?;
        let point = Plane::intersection_of(self, other, &third)?;
        Line::from_point_and_direction(point, direction, self.tolerance).ok()
    }

    /// Single point shared by three planes, or `None` if there is no unique one.
    pub fn intersection_of(p1: &Plane, p2: &Plane, p3: &Plane) -> Option<Point3<f64>> {
        let (a1, b1, c1, d1) = (p1.w.x, p1.w.y, p1.w.z, p1.origin_offset);
        let (a2, b2, c2, d2) = (p2.w.x, p2.w.y, p2.w.z, p2.origin_offset);
        let (a3, b3, c3, d3) = (p3.w.x, p3.w.y, p3.w.z, p3.origin_offset);

        // Cofactors of the first row
        let a23 = b2 * c3 - b3 * c2;
        let b23 = c2 * a3 - c3 * a2;
        let c23 = a2 * b3 - a3 * b2;
        let determinant = a1 * a23 + b1 * b23 + c1 * c23;
        if determinant.abs() < DETERMINANT_THRESHOLD {
            return None;
        }

        let r = 1.0 / determinant;
        Some(Point3::new(
            (-a23 * d1 - (c1 * b3 - c3 * b1) * d2 - (c2 * b1 - c1 * b2) * d3) * r,
            (-b23 * d1 - (c3 * a1 - c1 * a3) * d2 - (c1 * a2 - c2 * a1) * d3) * r,
            (-c23 * d1 - (b1 * a3 - b3 * a1) * d2 - (b2 * a1 - b1 * a2) * d3) * r,
        ))
    }
}

fn unit_normal(normal: &Vector3<f64>) -> Result<Vector3<f64>> {
    let norm = normal.norm();
    if norm < NORMAL_NORM_THRESHOLD {
        return Err(GeometryError::DegenerateNormal { norm });
    }
    Ok(normal / norm)
}
