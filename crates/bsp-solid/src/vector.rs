//! Vector helpers missing from nalgebra.

use nalgebra::Vector3;

use crate::error::{GeometryError, Result};

/// Angular separation of two vectors, in `[0, π]`.
///
/// Near 0 and π the arc-cosine loses precision, so the angle is recovered
/// from the cross product norm instead. Returns 0 if either vector is zero.
pub fn angle(v1: &Vector3<f64>, v2: &Vector3<f64>) -> f64 {
    let norm_product = v1.norm() * v2.norm();
    if norm_product == 0.0 {
        return 0.0;
    }

    let dot = v1.dot(v2);
    let threshold = norm_product * 0.9999;
    if dot < -threshold || dot > threshold {
        let sin = v1.cross(v2).norm() / norm_product;
        if dot >= 0.0 {
            sin.asin()
        } else {
            std::f64::consts::PI - sin.asin()
        }
    } else {
        (dot / norm_product).acos()
    }
}

/// Builds a unit vector orthogonal to `v`.
///
/// The choice is arbitrary but deterministic: the component with the
/// smallest magnitude is zeroed so the result is well conditioned.
pub fn orthogonal(v: &Vector3<f64>) -> Result<Vector3<f64>> {
    let threshold = 0.6 * v.norm();
    if threshold == 0.0 {
        return Err(GeometryError::ZeroNorm);
    }

    if v.x.abs() <= threshold {
        let inverse = 1.0 / (v.y * v.y + v.z * v.z).sqrt();
        Ok(Vector3::new(0.0, inverse * v.z, -inverse * v.y))
    } else if v.y.abs() <= threshold {
        let inverse = 1.0 / (v.x * v.x + v.z * v.z).sqrt();
        Ok(Vector3::new(-inverse * v.z, 0.0, inverse * v.x))
    } else {
        let inverse = 1.0 / (v.x * v.x + v.y * v.y).sqrt();
        Ok(Vector3::new(inverse * v.y, -inverse * v.x, 0.0))
    }
}
