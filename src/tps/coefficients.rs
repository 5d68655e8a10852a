//! Solved warp coefficients and single-point evaluation.

use super::kernel::radial_basis_function_3d;
use crate::float_types::{Real, is_finite_point};
use nalgebra::{Point3, Vector3};
use std::fmt::{Display, Formatter};

/// One `wi * U(||ci - p||)` term of the warp.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TpsNonAffineTerm3D {
    pub weight: Vector3<Real>,
    pub control_point: Point3<Real>,
}

impl TpsNonAffineTerm3D {
    pub const fn new(weight: Vector3<Real>, control_point: Point3<Real>) -> Self {
        TpsNonAffineTerm3D {
            weight,
            control_point,
        }
    }
}

impl Display for TpsNonAffineTerm3D {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "TpsNonAffineTerm3D{{weight = {}, control_point = {}}}",
            self.weight.transpose(),
            self.control_point
        )
    }
}

/// Coefficients of `f(p) = a1 + a2*p.x + a3*p.y + a4*p.z + SUM{ wi * U(||ci - p||) }`.
///
/// Each `aN` holds the X, Y and Z output coefficients together, so one
/// evaluation produces all three output coordinates. The default value is
/// the identity warp.
///
/// Equality is exact. It exists so a cache can tell whether a re-solve
/// actually changed anything; it is not a numerical tolerance check.
#[derive(Debug, Clone, PartialEq)]
pub struct TpsCoefficients3D {
    pub a1: Vector3<Real>,
    pub a2: Vector3<Real>,
    pub a3: Vector3<Real>,
    pub a4: Vector3<Real>,
    pub non_affine_terms: Vec<TpsNonAffineTerm3D>,
}

impl Default for TpsCoefficients3D {
    fn default() -> Self {
        Self::identity()
    }
}

impl TpsCoefficients3D {
    /// `f(p) = p`: zero translation, unit linear map and no weights.
    pub fn identity() -> Self {
        TpsCoefficients3D {
            a1: Vector3::zeros(),
            a2: Vector3::x(),
            a3: Vector3::y(),
            a4: Vector3::z(),
            non_affine_terms: Vec::new(),
        }
    }

    pub fn is_identity(&self) -> bool {
        *self == Self::identity()
    }

    /// Evaluate `f(p)`: the fully-warped position of `p`.
    pub fn warp_point(&self, p: &Point3<Real>) -> Point3<Real> {
        let mut rv = self.a1 + self.a2 * p.x + self.a3 * p.y + self.a4 * p.z;
        for term in &self.non_affine_terms {
            rv += term.weight * radial_basis_function_3d(&term.control_point, p);
        }
        Point3::from(rv)
    }

    /// `f(p) - p`: the affine part applied to `[1, p]` plus the weighted
    /// kernel terms, minus the identity.
    pub fn displacement(&self, p: &Point3<Real>) -> Vector3<Real> {
        self.warp_point(p) - p
    }

    /// `lerp(p, f(p), blending_factor)`.
    ///
    /// The blending factor is not clamped: values outside `[0, 1]`
    /// exaggerate or invert the warp. A point with a non-finite coordinate
    /// is returned unchanged.
    #[inline]
    pub fn warp_point_blended(&self, p: &Point3<Real>, blending_factor: Real) -> Point3<Real> {
        if !is_finite_point(p) {
            return *p;
        }
        p + (self.warp_point(p) - p) * blending_factor
    }
}

impl Display for TpsCoefficients3D {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "TpsCoefficients3D{{a1 = {}, a2 = {}, a3 = {}, a4 = {}",
            self.a1.transpose(),
            self.a2.transpose(),
            self.a3.transpose(),
            self.a4.transpose()
        )?;
        for (i, term) in self.non_affine_terms.iter().enumerate() {
            write!(f, ", w{} = {}", i, term)?;
        }
        write!(f, "}}")
    }
}
