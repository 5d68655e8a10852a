//! Thin-plate-spline (TPS) warping in 3D.
//!
//! A TPS warp is a linear combination
//!
//! ```text
//! f(p) = a1 + a2*p.x + a3*p.y + a4*p.z + SUM{ wi * U(||ci - p||) }
//! ```
//!
//! whose coefficients are solved from landmark pairs so that every landmark
//! source maps exactly onto its destination while bending as little as
//! possible elsewhere. [`solver`] produces the coefficients and [`warp`]
//! evaluates them over points and meshes.

pub mod coefficients;
pub mod kernel;
pub mod landmark;
pub mod solver;
pub mod warp;

pub use coefficients::{TpsCoefficients3D, TpsNonAffineTerm3D};
pub use landmark::{LandmarkPair3D, NamedLandmarkPair3D, TpsCoefficientSolverInputs3D};
pub use solver::calc_coefficients;
pub use warp::{WarpOps, warp_mesh, warp_points, warp_points_in_place};
