//! Landmark-driven **thin-plate-spline (TPS)** warping of meshes and point sets.
//!
//! Given pairs of corresponding 3D landmarks, [`tps::calc_coefficients`] solves
//! for the smooth deformation that carries every source landmark onto its
//! destination, and [`tps::warp_mesh`] / [`tps::warp_points`] apply it (with an
//! unclamped blending factor) to vertex buffers and loose points.
//! [`TpsResultCache`] keeps those results up to date against an editable
//! [`TpsDocument`], re-solving and re-warping only what an edit invalidated.
//!
//! # Features
//! #### Default
//! - **f64**: use f64 as Real
//!
//! #### Optional
//! - **f32**: use f32 as Real, this conflicts with f64
//! - **parallel**: use rayon to evaluate the warp over large point sets

#![forbid(unsafe_code)]
#![warn(clippy::missing_const_for_fn, clippy::approx_constant, clippy::all)]

pub mod cache;
pub mod document;
pub mod errors;
pub mod float_types;
pub mod mesh;
pub mod tps;

#[cfg(any(all(feature = "f64", feature = "f32"), not(any(feature = "f64", feature = "f32"))))]
compile_error!("Either 'f64' or 'f32' feature must be specified, but not both");

pub use cache::{CacheStats, TpsResultCache};
pub use document::TpsDocument;
pub use errors::WarpError;
pub use mesh::Mesh;
pub use tps::{LandmarkPair3D, TpsCoefficientSolverInputs3D, TpsCoefficients3D};
