//! The warp document: the editor-owned input of [`TpsResultCache`](crate::cache::TpsResultCache).
//!
//! The surrounding editor (and its undo history) owns and mutates a
//! `TpsDocument`; the cache only ever reads it. Fields the cache needs to
//! watch cheaply are wrapped in [`Versioned`], so mutate them through
//! [`Versioned::get_mut`] or [`Versioned::set`].

use crate::float_types::{Real, is_finite_point};
use crate::mesh::Mesh;
use crate::tps::LandmarkPair3D;
use nalgebra::Point3;
use std::fmt::{Display, Formatter};
use std::sync::atomic::{AtomicU64, Ordering};

pub mod edit;
pub mod lookup;
pub mod versioned;

pub use versioned::{Revision, Versioned};

static NEXT_UID: AtomicU64 = AtomicU64::new(1);

/// Process-unique identifier of a document element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Uid(u64);

impl Uid {
    pub fn new() -> Self {
        Uid(NEXT_UID.fetch_add(1, Ordering::Relaxed))
    }
}

impl Default for Uid {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for Uid {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Which side of a landmark pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputIdentifier {
    Source,
    Destination,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementType {
    Landmark,
    NonParticipatingLandmark,
}

/// Addresses one editable point in a document. Non-participating landmarks
/// only exist on the source side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ElementId {
    pub uid: Uid,
    pub element_type: ElementType,
    pub input: InputIdentifier,
}

impl ElementId {
    pub const fn landmark(uid: Uid, input: InputIdentifier) -> Self {
        ElementId {
            uid,
            element_type: ElementType::Landmark,
            input,
        }
    }

    pub const fn non_participating_landmark(uid: Uid) -> Self {
        ElementId {
            uid,
            element_type: ElementType::NonParticipatingLandmark,
            input: InputIdentifier::Source,
        }
    }
}

/// A named landmark that may have a source location, a destination location,
/// both, or (transiently, while editing) neither.
#[derive(Debug, Clone, PartialEq)]
pub struct TpsDocumentLandmarkPair {
    pub uid: Uid,
    pub name: String,
    pub maybe_source_location: Option<Point3<Real>>,
    pub maybe_destination_location: Option<Point3<Real>>,
}

impl TpsDocumentLandmarkPair {
    pub fn new(name: impl Into<String>) -> Self {
        TpsDocumentLandmarkPair {
            uid: Uid::new(),
            name: name.into(),
            maybe_source_location: None,
            maybe_destination_location: None,
        }
    }

    pub fn with_locations(
        name: impl Into<String>,
        source: Option<Point3<Real>>,
        destination: Option<Point3<Real>>,
    ) -> Self {
        TpsDocumentLandmarkPair {
            maybe_source_location: source,
            maybe_destination_location: destination,
            ..Self::new(name)
        }
    }

    pub const fn location(&self, input: InputIdentifier) -> Option<Point3<Real>> {
        match input {
            InputIdentifier::Source => self.maybe_source_location,
            InputIdentifier::Destination => self.maybe_destination_location,
        }
    }

    pub fn location_mut(&mut self, input: InputIdentifier) -> &mut Option<Point3<Real>> {
        match input {
            InputIdentifier::Source => &mut self.maybe_source_location,
            InputIdentifier::Destination => &mut self.maybe_destination_location,
        }
    }

    pub const fn is_fully_paired(&self) -> bool {
        self.maybe_source_location.is_some() && self.maybe_destination_location.is_some()
    }

    pub const fn has_source_or_destination_location(&self) -> bool {
        self.maybe_source_location.is_some() || self.maybe_destination_location.is_some()
    }

    /// The pair as solver input: `Some` only if both locations are assigned
    /// and every coordinate is finite.
    pub fn try_extract_landmark_pair(&self) -> Option<LandmarkPair3D> {
        match (self.maybe_source_location, self.maybe_destination_location) {
            (Some(source), Some(destination))
                if is_finite_point(&source) && is_finite_point(&destination) =>
            {
                Some(LandmarkPair3D::new(source, destination))
            },
            _ => None,
        }
    }
}

/// A point that is carried along by the warp without influencing it.
#[derive(Debug, Clone, PartialEq)]
pub struct TpsDocumentNonParticipatingLandmark {
    pub uid: Uid,
    pub name: String,
    pub location: Point3<Real>,
}

impl TpsDocumentNonParticipatingLandmark {
    pub fn new(name: impl Into<String>, location: Point3<Real>) -> Self {
        TpsDocumentNonParticipatingLandmark {
            uid: Uid::new(),
            name: name.into(),
            location,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TpsDocument {
    pub source_mesh: Versioned<Mesh>,
    pub destination_mesh: Versioned<Mesh>,
    pub landmark_pairs: Versioned<Vec<TpsDocumentLandmarkPair>>,
    pub non_participating_landmarks: Versioned<Vec<TpsDocumentNonParticipatingLandmark>>,

    /// `0` leaves the source untouched, `1` applies the full warp; other
    /// values extrapolate.
    pub blending_factor: Real,

    /// Recompute normals of the warped mesh after every warp.
    pub recalculate_normals: bool,

    pub apply_affine_translation: bool,
    pub apply_affine_scale: bool,
    pub apply_affine_rotation: bool,
    pub apply_non_affine_warp: bool,
}

impl Default for TpsDocument {
    fn default() -> Self {
        TpsDocument {
            source_mesh: Versioned::default(),
            destination_mesh: Versioned::default(),
            landmark_pairs: Versioned::default(),
            non_participating_landmarks: Versioned::default(),
            blending_factor: 1.0,
            recalculate_normals: false,
            apply_affine_translation: true,
            apply_affine_scale: true,
            apply_affine_rotation: true,
            apply_non_affine_warp: true,
        }
    }
}

impl TpsDocument {
    pub fn new(source_mesh: Mesh, destination_mesh: Mesh) -> Self {
        TpsDocument {
            source_mesh: Versioned::new(source_mesh),
            destination_mesh: Versioned::new(destination_mesh),
            ..Default::default()
        }
    }
}
