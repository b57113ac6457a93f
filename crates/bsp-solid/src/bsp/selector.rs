//! Cut selection strategies for boundary tree construction.
//!
//! The choice of cut affects tree balance and the number of facet splits
//! during construction. Different strategies offer different trade-offs
//! between build time and tree quality.

use crate::sub_plane::SubPlane;

/// Strategy for selecting which facet's plane becomes the next cut.
pub trait PlaneSelector {
    /// Returns the index of the facet to split with.
    ///
    /// Returns `None` if the slice is empty. The index must be in range.
    fn select(&self, facets: &[SubPlane]) -> Option<usize>;
}

/// Selects the first facet in the list.
///
/// The simplest and fastest selector, but the tree shape depends entirely
/// on input order.
#[derive(Debug, Clone, Copy, Default)]
pub struct FirstFacet;

impl PlaneSelector for FirstFacet {
    fn select(&self, facets: &[SubPlane]) -> Option<usize> {
        (!facets.is_empty()).then_some(0)
    }
}

/// Selects the facet with the largest area.
///
/// Large facets cut away the most boundary at once, which tends to keep
/// the tree shallow on architectural solids.
#[derive(Debug, Clone, Copy, Default)]
pub struct LargestFacet;

impl PlaneSelector for LargestFacet {
    fn select(&self, facets: &[SubPlane]) -> Option<usize> {
        facets
            .iter()
            .enumerate()
            .max_by(|(_, a), (_, b)| a.area().total_cmp(&b.area()))
            .map(|(i, _)| i)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Point3;

    fn square(z: f64, size: f64) -> SubPlane {
        SubPlane::from_polygon(
            &[
                Point3::new(0.0, 0.0, z),
                Point3::new(size, 0.0, z),
                Point3::new(size, size, z),
                Point3::new(0.0, size, z),
            ],
            1e-10,
        )
        .unwrap()
    }

    #[test]
    fn empty_list() {
        assert!(FirstFacet.select(&[]).is_none());
        assert!(LargestFacet.select(&[]).is_none());
    }

    #[test]
    fn first_facet() {
        let facets = vec![square(0.0, 1.0), square(1.0, 3.0)];
        assert_eq!(FirstFacet.select(&facets), Some(0));
    }

    #[test]
    fn largest_facet() {
        let facets = vec![square(0.0, 1.0), square(1.0, 3.0), square(2.0, 2.0)];
        assert_eq!(LargestFacet.select(&facets), Some(1));
    }
}
