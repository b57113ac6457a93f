//! Visitor pattern for boundary tree traversal.
//!
//! Visitors allow custom processing of nodes during traversal without
//! coupling the walk to specific use cases.

use super::node::BoundaryNode;
use crate::sub_plane::SubPlane;

/// Order in which a node's cut and its two subtrees are visited.
///
/// `Sub` stands for the node itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisitOrder {
    PlusMinusSub,
    PlusSubMinus,
    MinusPlusSub,
    MinusSubPlus,
    SubPlusMinus,
    SubMinusPlus,
}

/// Leaf cell of the partition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cell {
    Inside,
    Outside,
}

/// Visitor for processing nodes during boundary tree traversal.
///
/// Implement this trait to define custom behavior when walking the tree.
/// Only [`visit_internal`](BspVisitor::visit_internal) is required.
pub trait BspVisitor {
    /// Chooses the order for `node`. Defaults to minus, node, plus.
    fn visit_order(&mut self, _node: &BoundaryNode) -> VisitOrder {
        VisitOrder::MinusSubPlus
    }

    /// Called once for every internal node.
    fn visit_internal(&mut self, node: &BoundaryNode);

    /// Called once for every leaf cell.
    fn visit_leaf(&mut self, _cell: Cell) {}
}

/// A visitor that collects the boundary facets of every node it visits.
#[derive(Debug, Default)]
pub struct CollectingVisitor {
    collected: Vec<SubPlane>,
}

impl CollectingVisitor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn into_facets(self) -> Vec<SubPlane> {
        self.collected
    }

    pub fn facets(&self) -> &[SubPlane] {
        &self.collected
    }
}

impl BspVisitor for CollectingVisitor {
    fn visit_internal(&mut self, node: &BoundaryNode) {
        self.collected.extend(node.attribute().facets().cloned());
    }
}

/// A visitor that calls a closure for each internal node.
pub struct FnVisitor<F>
where
    F: FnMut(&BoundaryNode),
{
    func: F,
}

impl<F> FnVisitor<F>
where
    F: FnMut(&BoundaryNode),
{
    pub fn new(func: F) -> Self {
        Self { func }
    }
}

impl<F> BspVisitor for FnVisitor<F>
where
    F: FnMut(&BoundaryNode),
{
    fn visit_internal(&mut self, node: &BoundaryNode) {
        (self.func)(node);
    }
}
