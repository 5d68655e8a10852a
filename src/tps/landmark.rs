//! Landmark correspondences and the solver's input bundle.

use crate::float_types::{Real, is_finite_point};
use nalgebra::Point3;
use std::fmt::{Display, Formatter};

/// A (source, destination) point correspondence.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LandmarkPair3D {
    pub source: Point3<Real>,
    pub destination: Point3<Real>,
}

impl LandmarkPair3D {
    pub const fn new(source: Point3<Real>, destination: Point3<Real>) -> Self {
        LandmarkPair3D {
            source,
            destination,
        }
    }

    /// `true` if both points have only finite coordinates.
    #[inline]
    pub fn is_finite(&self) -> bool {
        is_finite_point(&self.source) && is_finite_point(&self.destination)
    }

    /// `destination - source`
    #[inline]
    pub fn displacement(&self) -> nalgebra::Vector3<Real> {
        self.destination - self.source
    }
}

impl Display for LandmarkPair3D {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "LandmarkPair3D{{source = {}, destination = {}}}",
            self.source, self.destination
        )
    }
}

/// A landmark pair that remembers the name it has in its document, for
/// exporters that label their output.
#[derive(Debug, Clone, PartialEq)]
pub struct NamedLandmarkPair3D {
    pub pair: LandmarkPair3D,
    pub name: String,
}

/// Everything the coefficient solver reads.
///
/// `landmarks` is the row order of the linear system, so two inputs with the
/// same pairs in a different order compare unequal.
#[derive(Debug, Clone, PartialEq)]
pub struct TpsCoefficientSolverInputs3D {
    pub landmarks: Vec<LandmarkPair3D>,
    pub apply_affine_translation: bool,
    pub apply_affine_scale: bool,
    pub apply_affine_rotation: bool,
    pub apply_non_affine_warp: bool,
}

impl Default for TpsCoefficientSolverInputs3D {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl TpsCoefficientSolverInputs3D {
    /// Inputs with every part of the warp switched on.
    pub const fn new(landmarks: Vec<LandmarkPair3D>) -> Self {
        TpsCoefficientSolverInputs3D {
            landmarks,
            apply_affine_translation: true,
            apply_affine_scale: true,
            apply_affine_rotation: true,
            apply_non_affine_warp: true,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.landmarks.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.landmarks.is_empty()
    }
}

impl FromIterator<LandmarkPair3D> for TpsCoefficientSolverInputs3D {
    fn from_iter<I: IntoIterator<Item = LandmarkPair3D>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl Display for TpsCoefficientSolverInputs3D {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "TpsCoefficientSolverInputs3D{{landmarks = [")?;
        let mut delimiter = "";
        for landmark in &self.landmarks {
            write!(f, "{}{}", delimiter, landmark)?;
            delimiter = ", ";
        }
        write!(f, "]}}")
    }
}
