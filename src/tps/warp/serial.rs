//! Single-threaded warp evaluation.

use super::traits::WarpOps;
use crate::float_types::Real;
use crate::tps::TpsCoefficients3D;
use nalgebra::Point3;

/// Serial implementation of `WarpOps`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SerialWarpOps;

impl SerialWarpOps {
    pub const fn new() -> Self {
        Self
    }
}

impl WarpOps for SerialWarpOps {
    fn warp_points_in_place(
        &self,
        coefs: &TpsCoefficients3D,
        points: &mut [Point3<Real>],
        blending_factor: Real,
    ) {
        let _span = tracing::trace_span!("warp_points_serial", points = points.len()).entered();
        for p in points.iter_mut() {
            *p = coefs.warp_point_blended(p, blending_factor);
        }
    }
}
