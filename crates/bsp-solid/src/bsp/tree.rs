//! Boundary tree container and construction.

use nalgebra::Point3;
use tracing::{debug, trace};

use crate::plane::{Plane, Side};
use crate::sub_plane::SubPlane;

use super::node::{BoundaryAttribute, BoundaryNode};
use super::selector::{FirstFacet, PlaneSelector};
use super::visitor::{BspVisitor, Cell, CollectingVisitor, VisitOrder};

/// Position of a point relative to the solid described by a tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Location {
    Inside,
    Outside,
    Boundary,
}

/// A binary space partition whose nodes carry the boundary of a solid.
///
/// Every internal node splits its cell with a cut plane and stores the
/// boundary facets lying on that cut. Missing children are leaf cells: a
/// missing plus child is outside the solid, a missing minus child inside.
///
/// # Construction
///
/// Trees are built from the outward-oriented facets of a closed solid using
/// a [`PlaneSelector`] to choose the cuts:
///
/// ```ignore
/// use bsp_solid::bsp::{BoundaryTree, LargestFacet};
///
/// let facets: Vec<SubPlane> = /* ... */;
/// let tree = BoundaryTree::build(facets, &LargestFacet);
/// ```
///
/// # Traversal
///
/// [`visit`](BoundaryTree::visit) walks the tree depth-first, letting the
/// visitor choose at each node whether the node or either subtree comes
/// first.
#[derive(Debug, Clone, Default)]
pub struct BoundaryTree {
    root: Option<BoundaryNode>,
}

impl BoundaryTree {
    /// Creates an empty tree, which has no boundary and no inside.
    pub fn new() -> Self {
        Self { root: None }
    }

    /// Builds a tree from the boundary facets of a closed solid.
    ///
    /// Facet loops must wind counter-clockwise about the solid's outward
    /// normal. Facets crossing a cut are split; facets lying on a cut
    /// become that node's attribute.
    pub fn build<S: PlaneSelector>(facets: Vec<SubPlane>, selector: &S) -> Self {
        let count = facets.len();
        let tree = Self {
            root: build_node(facets, selector),
        };
        debug!(
            facets = count,
            boundary_facets = tree.facet_count(),
            depth = tree.depth(),
            "built boundary tree"
        );
        tree
    }

    /// Builds a tree using the default selector ([`FirstFacet`]).
    pub fn from_facets(facets: Vec<SubPlane>) -> Self {
        Self::build(facets, &FirstFacet)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    #[inline]
    pub fn root(&self) -> Option<&BoundaryNode> {
        self.root.as_ref()
    }

    /// Number of boundary facets stored in node attributes.
    ///
    /// Coplanar input facets merged into one attribute count once, and a
    /// facet split by a cut counts once per piece.
    pub fn facet_count(&self) -> usize {
        self.root.as_ref().map_or(0, |n| n.facet_count())
    }

    /// Maximum depth of the tree (0 for an empty tree).
    pub fn depth(&self) -> usize {
        self.root.as_ref().map_or(0, |n| n.depth())
    }

    /// Walks the whole tree with `visitor`.
    ///
    /// An empty tree is a single outside cell.
    pub fn visit<V: BspVisitor>(&self, visitor: &mut V) {
        walk_side(self.root.as_ref(), Cell::Outside, visitor);
    }

    /// Collects every boundary facet, in minus-node-plus order.
    pub fn collect_facets(&self) -> Vec<SubPlane> {
        let mut visitor = CollectingVisitor::new();
        self.visit(&mut visitor);
        visitor.into_facets()
    }

    /// Locates `point` relative to the solid.
    pub fn classify(&self, point: &Point3<f64>) -> Location {
        classify_side(self.root.as_ref(), Cell::Outside, point)
    }
}

/// Recursively builds a node from a list of facets.
fn build_node<S: PlaneSelector>(mut facets: Vec<SubPlane>, selector: &S) -> Option<BoundaryNode> {
    let index = selector.select(&facets)?;
    if index >= facets.len() {
        return None;
    }

    let splitter = facets.swap_remove(index);
    let cut = splitter.plane().clone();

    let mut outside = vec![splitter];
    let mut inside = Vec::new();
    let mut plus_list = Vec::new();
    let mut minus_list = Vec::new();

    for facet in facets {
        let split = facet.split(&cut);
        if split.side() == Side::Hyperplane {
            if is_coplanar(&facet, &cut) {
                if facet.plane().same_orientation_as(&cut) {
                    outside.push(facet);
                } else {
                    inside.push(facet);
                }
            } else {
                trace!(area = facet.area(), "dropped degenerate facet");
            }
            continue;
        }

        let (plus, minus) = split.into_parts();
        plus_list.extend(plus);
        minus_list.extend(minus);
    }

    let attribute = BoundaryAttribute::from_coplanar(&cut, &outside, &inside);
    let mut node = BoundaryNode::with_attribute(cut, attribute);
    node.set_plus(build_node(plus_list, selector));
    node.set_minus(build_node(minus_list, selector));

    Some(node)
}

fn is_coplanar(facet: &SubPlane, cut: &Plane) -> bool {
    cut.intersection(facet.plane()).is_none()
}

#[derive(Clone, Copy)]
enum Step {
    Plus,
    Minus,
    Sub,
}

impl VisitOrder {
    fn steps(self) -> [Step; 3] {
        use Step::*;
        match self {
            VisitOrder::PlusMinusSub => [Plus, Minus, Sub],
            VisitOrder::PlusSubMinus => [Plus, Sub, Minus],
            VisitOrder::MinusPlusSub => [Minus, Plus, Sub],
            VisitOrder::MinusSubPlus => [Minus, Sub, Plus],
            VisitOrder::SubPlusMinus => [Sub, Plus, Minus],
            VisitOrder::SubMinusPlus => [Sub, Minus, Plus],
        }
    }
}

fn walk<V: BspVisitor>(node: &BoundaryNode, visitor: &mut V) {
    for step in visitor.visit_order(node).steps() {
        match step {
            Step::Plus => walk_side(node.plus(), Cell::Outside, visitor),
            Step::Minus => walk_side(node.minus(), Cell::Inside, visitor),
            Step::Sub => visitor.visit_internal(node),
        }
    }
}

fn walk_side<V: BspVisitor>(child: Option<&BoundaryNode>, leaf: Cell, visitor: &mut V) {
    match child {
        Some(node) => walk(node, visitor),
        None => visitor.visit_leaf(leaf),
    }
}

fn classify_side(child: Option<&BoundaryNode>, leaf: Cell, point: &Point3<f64>) -> Location {
    let Some(node) = child else {
        return match leaf {
            Cell::Inside => Location::Inside,
            Cell::Outside => Location::Outside,
        };
    };

    match node.cut().classify_point(point) {
        Side::Plus => classify_side(node.plus(), Cell::Outside, point),
        Side::Minus => classify_side(node.minus(), Cell::Inside, point),
        _ => {
            // On the cut: the point is on the boundary unless both sides agree.
            let plus = classify_side(node.plus(), Cell::Outside, point);
            let minus = classify_side(node.minus(), Cell::Inside, point);
            if plus == minus { plus } else { Location::Boundary }
        }
    }
}
