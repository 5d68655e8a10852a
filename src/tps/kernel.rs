//! The radial basis function `U` of the warp.

use crate::float_types::Real;
use nalgebra::Point3;

/// `U(||control_point - p||)` with `U(r) = r`.
///
/// This is the 3D biharmonic kernel (Gunz, Mitteroecker & Bookstein,
/// "Semilandmarks in Three Dimensions"), used in place of Bookstein's 2D
/// `r² log r²`. It is symmetric and conditionally positive-definite of order
/// one in 3D, which together with the affine terms makes the landmark system
/// solvable for any set of distinct landmarks.
#[inline]
pub fn radial_basis_function_3d(control_point: &Point3<Real>, p: &Point3<Real>) -> Real {
    (control_point - p).norm()
}

/// f64 variant used while assembling the linear system.
#[inline]
pub(crate) fn radial_basis_function_3d_f64(a: [f64; 3], b: [f64; 3]) -> f64 {
    let dx = a[0] - b[0];
    let dy = a[1] - b[1];
    let dz = a[2] - b[2];
    (dx * dx + dy * dy + dz * dz).sqrt()
}
