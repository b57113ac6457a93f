//! Numeric thresholds and kernel configuration.
//!
//! The thresholds below have distinct geometric meanings and are
//! deliberately kept as separate constants. Only [`KernelConfig::tolerance`]
//! is caller-supplied; it is the coincidence tolerance propagated into every
//! line, plane and facet derived from a solid.

use crate::error::{GeometryError, Result};

/// Default coincidence tolerance.
pub const DEFAULT_TOLERANCE: f64 = 1e-10;

/// Plane normals shorter than this are rejected.
pub const NORMAL_NORM_THRESHOLD: f64 = 1e-10;

/// `|normal · direction|` below this means a line is parallel to a plane.
pub const LINE_PLANE_PARALLEL_THRESHOLD: f64 = 1e-10;

/// Three planes whose coefficient determinant is below this share no unique point.
pub const DETERMINANT_THRESHOLD: f64 = 1e-10;

/// Angle (radians) under which two plane normals count as parallel for similarity.
pub const SIMILAR_ANGLE_THRESHOLD: f64 = 1e-10;

/// Below this, two line directions are treated as parallel.
pub const PARALLEL_LINES_THRESHOLD: f64 = f64::EPSILON;

/// Facets with `|normal · view|` at or below this are edge-on and skipped.
pub const EDGE_ON_THRESHOLD: f64 = 1e-3;

/// Relative cross-product bound for collinear outline vertices.
pub const COLLINEARITY_THRESHOLD: f64 = 1e-6;

/// Viewing axes must be unit length and orthogonal to within this.
pub const AXES_ORTHONORMALITY_THRESHOLD: f64 = 1e-6;

/// Tunable parameters of the kernel.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct KernelConfig {
    /// Coincidence tolerance for points, lines and planes.
    pub tolerance: f64,
    /// Outline extraction skips facets with `|normal · view|` at or below this.
    pub edge_on_threshold: f64,
    /// Relative threshold used when removing collinear outline vertices.
    pub collinearity_threshold: f64,
}

impl Default for KernelConfig {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE,
            edge_on_threshold: EDGE_ON_THRESHOLD,
            collinearity_threshold: COLLINEARITY_THRESHOLD,
        }
    }
}

impl KernelConfig {
    /// Sets the coincidence tolerance.
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Sets the edge-on rejection threshold.
    pub fn with_edge_on_threshold(mut self, threshold: f64) -> Self {
        self.edge_on_threshold = threshold;
        self
    }

    /// Sets the collinearity threshold.
    pub fn with_collinearity_threshold(mut self, threshold: f64) -> Self {
        self.collinearity_threshold = threshold;
        self
    }

    /// Checks that every value is usable.
    pub fn validate(&self) -> Result<()> {
        check_tolerance(self.tolerance)?;
        for value in [self.edge_on_threshold, self.collinearity_threshold] {
            if !value.is_finite() || value < 0.0 {
                return Err(GeometryError::InvalidTolerance(value));
            }
        }
        Ok(())
    }
}

/// Rejects tolerances that are not finite and strictly positive.
pub(crate) fn check_tolerance(tolerance: f64) -> Result<()> {
    if tolerance.is_finite() && tolerance > 0.0 {
        Ok(())
    } else {
        Err(GeometryError::InvalidTolerance(tolerance))
    }
}
