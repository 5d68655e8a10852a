//! Parallel warp evaluation.

use super::traits::WarpOps;
use crate::float_types::Real;
use crate::tps::TpsCoefficients3D;
use nalgebra::Point3;
use rayon::prelude::*;

/// Fewest points handed to one rayon task. Below this the per-task overhead
/// outweighs the evaluation cost for typical landmark counts.
pub const MIN_POINTS_PER_TASK: usize = 8192;

/// Parallel implementation of `WarpOps`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ParallelWarpOps;

impl ParallelWarpOps {
    pub const fn new() -> Self {
        Self
    }
}

impl WarpOps for ParallelWarpOps {
    fn warp_points_in_place(
        &self,
        coefs: &TpsCoefficients3D,
        points: &mut [Point3<Real>],
        blending_factor: Real,
    ) {
        let _span = tracing::trace_span!("warp_points_parallel", points = points.len()).entered();
        points
            .par_iter_mut()
            .with_min_len(MIN_POINTS_PER_TASK)
            .for_each(|p| *p = coefs.warp_point_blended(p, blending_factor));
    }
}
