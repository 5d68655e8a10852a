//! Warp errors

use crate::float_types::Real;
use nalgebra::Point3;
use std::fmt::Display;

/// All the possible issues the solver and cache can report.
///
/// None of these escape the [`TpsResultCache`](crate::cache::TpsResultCache)
/// accessors: the cache recovers locally and exposes them as warnings.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum WarpError {
    /// (SingularSystem) The landmark system has no usable solution
    SingularSystem(String),
    /// (DegenerateInput) A coordinate or parameter is NaN or infinite
    DegenerateInput(String, Option<Point3<Real>>),
}

impl WarpError {
    /// `true` for [`WarpError::SingularSystem`]
    pub const fn is_singular_system(&self) -> bool {
        matches!(self, WarpError::SingularSystem(_))
    }

    /// `true` for [`WarpError::DegenerateInput`]
    pub const fn is_degenerate_input(&self) -> bool {
        matches!(self, WarpError::DegenerateInput(..))
    }
}

impl Display for WarpError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WarpError::SingularSystem(str) => write!(f, "(SingularSystem) {}", str),
            WarpError::DegenerateInput(str, opoint) => {
                if let Some(opoint) = opoint {
                    write!(f, "(DegenerateInput) {} at: {}", str, opoint)
                } else {
                    write!(f, "(DegenerateInput) {}", str)
                }
            },
        }
    }
}
