//! Error types for geometric construction.

use thiserror::Error;

/// Result type for kernel operations.
pub type Result<T> = std::result::Result<T, GeometryError>;

/// Errors raised when the input to a constructor is degenerate.
///
/// Geometric non-existence (parallel planes, lines that do not meet, ...)
/// is never an error: those operations return `Option`.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeometryError {
    #[error("zero norm: direction vector or defining points coincide")]
    ZeroNorm,

    #[error("plane normal is degenerate (norm {norm:e})")]
    DegenerateNormal { norm: f64 },

    #[error("tolerance must be finite and strictly positive, got {0}")]
    InvalidTolerance(f64),

    #[error("viewing axes must be orthogonal unit vectors")]
    NonOrthogonalAxes,

    #[error("facet {facet} has only {count} vertices")]
    TooFewVertices { facet: usize, count: usize },

    #[error("facet {facet} references vertex {index} which does not exist")]
    VertexIndexOutOfRange { facet: usize, index: usize },

    #[error("vertices {first} and {second} are closer than the tolerance")]
    CloseVertices { first: usize, second: usize },

    #[error("vertex {vertex} of facet {facet} is out of the facet plane")]
    OutOfPlane { facet: usize, vertex: usize },

    #[error("edge {start} -> {end} is connected to one facet only")]
    EdgeConnectedToOneFacet { start: usize, end: usize },

    #[error("edge {start} -> {end} is traversed in the same direction by two facets")]
    FacetOrientationMismatch { start: usize, end: usize },
}
