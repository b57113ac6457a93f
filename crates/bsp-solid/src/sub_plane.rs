//! Bounded planar facets and their splitting by planes.

use nalgebra::{Point2, Point3, Vector3};

use crate::error::Result;
use crate::plane::{Plane, Side};
use crate::region::{Line2D, PolygonRegion};

/// A bounded facet: a plane restricted to a 2D region of its `(u, v)` frame.
///
/// The tolerance is the plane's.
#[derive(Debug, Clone, PartialEq)]
pub struct SubPlane {
    plane: Plane,
    region: PolygonRegion,
}

/// Result of splitting a facet by a plane.
#[derive(Debug, Clone, PartialEq)]
pub struct SplitSubPlane {
    plus: Option<SubPlane>,
    minus: Option<SubPlane>,
}

impl SubPlane {
    /// Creates a facet from a plane and a region in that plane's frame.
    pub fn new(plane: Plane, region: PolygonRegion) -> Self {
        Self { plane, region }
    }

    /// Creates a facet from a closed polygon of coplanar 3D vertices.
    ///
    /// The plane normal is computed with Newell's method, so it follows the
    /// counter-clockwise winding of the polygon even when the polygon is not
    /// convex. The vertices are assumed to lie on a common plane.
    ///
    /// # Errors
    /// Fails if the polygon has no area (collinear or too few vertices).
    pub fn from_polygon(vertices: &[Point3<f64>], tolerance: f64) -> Result<Self> {
        let n = vertices.len();
        let mut normal = Vector3::zeros();
        for i in 0..n {
            let a = vertices[i];
            let b = vertices[(i + 1) % n];
            normal += a.coords.cross(&b.coords);
        }

        let anchor = vertices.first().copied().unwrap_or_else(Point3::origin);
        let plane = Plane::from_point_and_normal(anchor, normal, tolerance)?;
        let outline: Vec<Point2<f64>> = vertices.iter().map(|p| plane.to_sub_space(p)).collect();
        let region = PolygonRegion::new(vec![outline], tolerance);
        Ok(Self { plane, region })
    }

    /// Returns the supporting plane.
    #[inline]
    pub fn plane(&self) -> &Plane {
        &self.plane
    }

    /// Returns the region in the plane's `(u, v)` frame.
    #[inline]
    pub fn region(&self) -> &PolygonRegion {
        &self.region
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.region.is_empty()
    }

    /// Unsigned area of the facet.
    pub fn area(&self) -> f64 {
        self.region.area().abs()
    }

    /// Closed boundary loops of the facet mapped back to 3D.
    ///
    /// Open chains of unbounded facets are not included.
    pub fn vertices(&self) -> Vec<Vec<Point3<f64>>> {
        self.region
            .loops()
            .iter()
            .map(|l| l.iter().map(|p| self.plane.to_space(p)).collect())
            .collect()
    }

    /// Rewrites the facet on `plane`, which must cover the same points.
    ///
    /// Loop order is preserved in 3D, so if `plane` has the opposite
    /// orientation the loops change winding in the new frame.
    pub fn reexpressed_in(&self, plane: &Plane) -> SubPlane {
        let region = self
            .region
            .map_points(|p| plane.to_sub_space(&self.plane.to_space(p)));
        SubPlane {
            plane: plane.clone(),
            region,
        }
    }

    /// Splits the facet into the parts strictly on each side of `other`.
    ///
    /// If the facet lies on `other` (within tolerance) both parts are `None`.
    pub fn split(&self, other: &Plane) -> SplitSubPlane {
        let this = &self.plane;
        let tolerance = this.tolerance();

        let Some(inter) = other.intersection(this) else {
            // Parallel planes.
            let global = other.plane_offset(this);
            return if global < -tolerance {
                SplitSubPlane::new(None, Some(self.clone()))
            } else if global > tolerance {
                SplitSubPlane::new(Some(self.clone()), None)
            } else {
                SplitSubPlane::new(None, None)
            };
        };

        // The intersection line in the facet frame, oriented so its
        // right-hand side is the plus side of `other`.
        let mut p = this.to_sub_space(&inter.point_at(0.0));
        let mut q = this.to_sub_space(&inter.point_at(1.0));
        let cross = inter.direction().cross(&this.normal());
        if cross.dot(&other.normal()) < 0.0 {
            std::mem::swap(&mut p, &mut q);
        }

        let (Ok(plus_line), Ok(minus_line)) =
            (Line2D::new(p, q, tolerance), Line2D::new(q, p, tolerance))
        else {
            return SplitSubPlane::new(None, None);
        };

        let wrap = |region: PolygonRegion| SubPlane {
            plane: this.clone(),
            region,
        };
        SplitSubPlane::new(
            self.region.clip(&plus_line).map(wrap),
            self.region.clip(&minus_line).map(wrap),
        )
    }

    /// Position of the facet relative to `other`.
    pub fn side(&self, other: &Plane) -> Side {
        self.split(other).side()
    }
}

impl SplitSubPlane {
    pub fn new(plus: Option<SubPlane>, minus: Option<SubPlane>) -> Self {
        Self { plus, minus }
    }

    /// Part on the plus side of the splitting plane.
    #[inline]
    pub fn plus(&self) -> Option<&SubPlane> {
        self.plus.as_ref()
    }

    /// Part on the minus side of the splitting plane.
    #[inline]
    pub fn minus(&self) -> Option<&SubPlane> {
        self.minus.as_ref()
    }

    pub fn into_parts(self) -> (Option<SubPlane>, Option<SubPlane>) {
        (self.plus, self.minus)
    }

    /// Summarises which parts exist.
    pub fn side(&self) -> Side {
        match (&self.plus, &self.minus) {
            (Some(_), Some(_)) => Side::Both,
            (Some(_), None) => Side::Plus,
            (None, Some(_)) => Side::Minus,
            (None, None) => Side::Hyperplane,
        }
    }
}
