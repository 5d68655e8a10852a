//! Warp evaluation over point sets and meshes.
//!
//! The free functions use [`ParallelWarpOps`] when the `parallel` feature is
//! enabled and [`SerialWarpOps`] otherwise. Both give bit-identical results.

pub mod serial;
pub mod traits;

#[cfg(feature = "parallel")]
pub mod parallel;

// Re-export core types
pub use serial::SerialWarpOps;
pub use traits::WarpOps;

#[cfg(feature = "parallel")]
pub use parallel::ParallelWarpOps;

use crate::float_types::Real;
use crate::mesh::Mesh;
use crate::tps::TpsCoefficients3D;
use nalgebra::Point3;

#[cfg(not(feature = "parallel"))]
const DEFAULT_OPS: SerialWarpOps = SerialWarpOps::new();
#[cfg(feature = "parallel")]
const DEFAULT_OPS: ParallelWarpOps = ParallelWarpOps::new();

/// Warp a copy of `points` with the default evaluator.
pub fn warp_points(
    coefs: &TpsCoefficients3D,
    points: &[Point3<Real>],
    blending_factor: Real,
) -> Vec<Point3<Real>> {
    DEFAULT_OPS.warp_points(coefs, points, blending_factor)
}

/// Warp `points` in place with the default evaluator.
pub fn warp_points_in_place(
    coefs: &TpsCoefficients3D,
    points: &mut [Point3<Real>],
    blending_factor: Real,
) {
    DEFAULT_OPS.warp_points_in_place(coefs, points, blending_factor);
}

/// Copy `mesh` and warp its vertex positions with the default evaluator.
pub fn warp_mesh(coefs: &TpsCoefficients3D, mesh: &Mesh, blending_factor: Real) -> Mesh {
    let _span = tracing::debug_span!(
        "tps_warp_mesh",
        vertices = mesh.num_vertices(),
        terms = coefs.non_affine_terms.len()
    )
    .entered();
    DEFAULT_OPS.warp_mesh(coefs, mesh, blending_factor)
}
