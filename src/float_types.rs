// Scalar used for every coordinate, selected by the f32/f64 feature
#[cfg(feature = "f32")]
pub type Real = f32;
#[cfg(feature = "f64")]
pub type Real = f64;

use core::str::FromStr;
use std::sync::OnceLock;

/// Set once, on first read: by [`set_tolerance`] if it ran earlier, otherwise
/// from the build-time `TPSWARP_TOLERANCE` variable, otherwise from the
/// precision default.
static TOLERANCE_CELL: OnceLock<Real> = OnceLock::new();

#[inline]
const fn default_tolerance() -> Real {
    #[cfg(feature = "f32")]
    {
        1e-5
    }
    #[cfg(feature = "f64")]
    {
        1e-9
    }
}

/// Absolute geometric tolerance.
///
/// Landmark sources closer than this are coincident, and accumulated
/// normals shorter than this are replaced by the fallback normal.
pub fn tolerance() -> Real {
    *TOLERANCE_CELL.get_or_init(|| {
        option_env!("TPSWARP_TOLERANCE")
            .and_then(|value| Real::from_str(value).ok())
            .map_or_else(default_tolerance, |value| value.max(Real::EPSILON))
    })
}

/// Override the tolerance, clamped to at least `Real::EPSILON`.
///
/// Only the first call counts, and only if it happens before anything has
/// read [`tolerance`]; once the value is fixed this is a no-op. Returns
/// `true` if the override took effect.
pub fn set_tolerance(value: Real) -> bool {
    TOLERANCE_CELL.set(value.max(Real::EPSILON)).is_ok()
}

// Pi
/// Archimedes' constant (π)
#[cfg(feature = "f32")]
pub const PI: Real = core::f32::consts::PI;
/// Archimedes' constant (π)
#[cfg(feature = "f64")]
pub const PI: Real = core::f64::consts::PI;

// Tau
/// The full circle constant (τ)
#[cfg(feature = "f32")]
pub const TAU: Real = core::f32::consts::TAU;
/// The full circle constant (τ)
#[cfg(feature = "f64")]
pub const TAU: Real = core::f64::consts::TAU;

/// Returns `true` if every component of `p` is finite.
#[inline]
pub fn is_finite_point(p: &nalgebra::Point3<Real>) -> bool {
    p.x.is_finite() && p.y.is_finite() && p.z.is_finite()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tolerance_is_fixed_after_first_read() {
        let current = tolerance();
        assert!(current >= Real::EPSILON);
        assert!(!set_tolerance(current * 10.0));
        assert_eq!(tolerance(), current);
    }
}
