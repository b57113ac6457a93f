//! Binary space partition carrying the boundary of a solid.
//!
//! This module provides a BSP tree whose internal nodes each store the
//! boundary facets lying on their cut plane. The tree enables:
//!
//! - Inside/outside/boundary classification of points
//! - Ordered depth-first traversal with visitor-chosen order, used by the
//!   outline extraction
//!
//! # Example
//!
//! ```ignore
//! use bsp_solid::bsp::{BoundaryTree, CollectingVisitor, Location};
//! use nalgebra::Point3;
//!
//! let facets: Vec<SubPlane> = /* outward-oriented faces of a solid */;
//! let tree = BoundaryTree::from_facets(facets);
//!
//! assert_eq!(tree.classify(&Point3::new(0.5, 0.5, 0.5)), Location::Inside);
//!
//! let mut visitor = CollectingVisitor::new();
//! tree.visit(&mut visitor);
//! let boundary = visitor.into_facets();
//! ```
//!
//! # Architecture
//!
//! - [`BoundaryTree`]: the container holding the root node
//! - [`BoundaryNode`]: a cut plane, its [`BoundaryAttribute`] and two subtrees
//! - [`PlaneSelector`]: strategy trait for choosing cuts
//! - [`BspVisitor`]: visitor trait for custom traversal behavior

mod node;
mod selector;
mod tree;
mod visitor;

pub use node::{BoundaryAttribute, BoundaryNode};
pub use selector::{FirstFacet, LargestFacet, PlaneSelector};
pub use tree::{BoundaryTree, Location};
pub use visitor::{BspVisitor, Cell, CollectingVisitor, FnVisitor, VisitOrder};
