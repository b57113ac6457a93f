//! Boundary tree nodes and their attributes.

use crate::plane::Plane;
use crate::region::PolygonRegion;
use crate::sub_plane::SubPlane;

/// Boundary facets lying on a node's cut plane.
///
/// Both contributions are expressed on the cut plane itself. Their loops
/// wind counter-clockwise about the solid's outward normal:
/// - `plus_outside`: the solid is on the minus side, so the loops are
///   counter-clockwise in the cut frame
/// - `plus_inside`: the solid is on the plus side, so the loops are
///   clockwise in the cut frame
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BoundaryAttribute {
    plus_outside: Option<SubPlane>,
    plus_inside: Option<SubPlane>,
}

impl BoundaryAttribute {
    pub fn new(plus_outside: Option<SubPlane>, plus_inside: Option<SubPlane>) -> Self {
        Self {
            plus_outside,
            plus_inside,
        }
    }

    /// Merges the facets lying on `cut` into one attribute.
    ///
    /// `outside` holds the facets oriented like `cut`, `inside` those
    /// oriented against it. Each group is rewritten in the cut frame and
    /// unioned.
    pub fn from_coplanar(cut: &Plane, outside: &[SubPlane], inside: &[SubPlane]) -> Self {
        let merge = |facets: &[SubPlane]| -> Option<PolygonRegion> {
            let merged = facets
                .iter()
                .map(|f| f.reexpressed_in(cut).region().clone())
                .reduce(|acc, r| acc.union(&r))?
                .normalized();
            (!merged.is_empty()).then_some(merged)
        };

        let plus_outside = merge(outside).map(|r| SubPlane::new(cut.clone(), r));
        let plus_inside = merge(inside).map(|r| SubPlane::new(cut.clone(), r.reversed()));
        Self::new(plus_outside, plus_inside)
    }

    /// Facet whose outward normal agrees with the cut normal.
    #[inline]
    pub fn plus_outside(&self) -> Option<&SubPlane> {
        self.plus_outside.as_ref()
    }

    /// Facet whose outward normal opposes the cut normal.
    #[inline]
    pub fn plus_inside(&self) -> Option<&SubPlane> {
        self.plus_inside.as_ref()
    }

    /// Iterates over the present contributions, outside first.
    pub fn facets(&self) -> impl Iterator<Item = &SubPlane> {
        self.plus_outside.iter().chain(self.plus_inside.iter())
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.plus_outside.is_none() && self.plus_inside.is_none()
    }

    pub fn facet_count(&self) -> usize {
        self.facets().count()
    }
}

/// An internal node of the boundary tree.
///
/// A missing child is a leaf cell: the plus side of the cut is outside the
/// solid, the minus side inside.
#[derive(Debug, Clone)]
pub struct BoundaryNode {
    cut: Plane,
    attribute: BoundaryAttribute,
    plus: Option<Box<BoundaryNode>>,
    minus: Option<Box<BoundaryNode>>,
}

impl BoundaryNode {
    /// Creates a node with no boundary facets and no children.
    pub fn new(cut: Plane) -> Self {
        Self::with_attribute(cut, BoundaryAttribute::default())
    }

    pub fn with_attribute(cut: Plane, attribute: BoundaryAttribute) -> Self {
        Self {
            cut,
            attribute,
            plus: None,
            minus: None,
        }
    }

    /// The plane splitting this node's cell.
    #[inline]
    pub fn cut(&self) -> &Plane {
        &self.cut
    }

    #[inline]
    pub fn attribute(&self) -> &BoundaryAttribute {
        &self.attribute
    }

    /// Subtree on the plus side of the cut.
    #[inline]
    pub fn plus(&self) -> Option<&BoundaryNode> {
        self.plus.as_deref()
    }

    /// Subtree on the minus side of the cut.
    #[inline]
    pub fn minus(&self) -> Option<&BoundaryNode> {
        self.minus.as_deref()
    }

    #[inline]
    pub fn set_plus(&mut self, node: Option<BoundaryNode>) {
        self.plus = node.map(Box::new);
    }

    #[inline]
    pub fn set_minus(&mut self, node: Option<BoundaryNode>) {
        self.minus = node.map(Box::new);
    }

    /// Checks whether both sides of the cut are leaf cells.
    #[inline]
    pub fn is_leaf(&self) -> bool {
        self.plus.is_none() && self.minus.is_none()
    }

    /// Number of boundary facets in this subtree.
    pub fn facet_count(&self) -> usize {
        self.attribute.facet_count()
            + self.plus.as_ref().map_or(0, |n| n.facet_count())
            + self.minus.as_ref().map_or(0, |n| n.facet_count())
    }

    /// Depth of this subtree (1 for a node with no children).
    pub fn depth(&self) -> usize {
        let plus_depth = self.plus.as_ref().map_or(0, |n| n.depth());
        let minus_depth = self.minus.as_ref().map_or(0, |n| n.depth());
        1 + plus_depth.max(minus_depth)
    }
}
