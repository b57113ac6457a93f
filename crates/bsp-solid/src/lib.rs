//! Boundary-represented solids and their silhouettes.
//!
//! Oriented lines and planes, planar facets that can be split by planes,
//! a BSP tree holding the boundary of a solid, and extraction of the 2D
//! outline of that solid seen along any direction.

pub mod bsp;
pub mod config;
pub mod error;
pub mod line;
pub mod outline;
pub mod plane;
pub mod polyhedron;
pub mod region;
pub mod sub_plane;
pub mod vector;

pub use bsp::{BoundaryTree, Location};
pub use config::KernelConfig;
pub use error::{GeometryError, Result};
pub use line::Line;
pub use outline::{OutlineExtractor, simplify_chain, simplify_loop};
pub use plane::{Plane, Side};
pub use polyhedron::Polyhedron;
pub use region::{Contour, Line2D, PolygonRegion};
pub use sub_plane::{SplitSubPlane, SubPlane};
