//! Read-only queries over a [`TpsDocument`].

use super::{
    ElementId, ElementType, InputIdentifier, TpsDocument, TpsDocumentLandmarkPair,
    TpsDocumentNonParticipatingLandmark, Uid,
};
use crate::errors::WarpError;
use crate::float_types::{Real, is_finite_point};
use crate::tps::{LandmarkPair3D, NamedLandmarkPair3D, TpsCoefficientSolverInputs3D};
use nalgebra::Point3;
use std::collections::HashSet;

impl TpsDocument {
    pub fn find_landmark_pair(&self, uid: Uid) -> Option<&TpsDocumentLandmarkPair> {
        self.landmark_pairs.iter().find(|p| p.uid == uid)
    }

    /// Mutable lookup. Bumps the landmark revision only if the pair exists.
    pub fn find_landmark_pair_mut(&mut self, uid: Uid) -> Option<&mut TpsDocumentLandmarkPair> {
        let idx = self.landmark_pairs.iter().position(|p| p.uid == uid)?;
        self.landmark_pairs.get_mut().get_mut(idx)
    }

    pub fn find_landmark_pair_by_name(&self, name: &str) -> Option<&TpsDocumentLandmarkPair> {
        self.landmark_pairs.iter().find(|p| p.name == name)
    }

    pub fn find_non_participating_landmark(
        &self,
        uid: Uid,
    ) -> Option<&TpsDocumentNonParticipatingLandmark> {
        self.non_participating_landmarks.iter().find(|p| p.uid == uid)
    }

    pub fn find_non_participating_landmark_by_name(
        &self,
        name: &str,
    ) -> Option<&TpsDocumentNonParticipatingLandmark> {
        self.non_participating_landmarks.iter().find(|p| p.name == name)
    }

    pub fn contains_element_with_name(&self, name: &str) -> bool {
        self.find_landmark_pair_by_name(name).is_some()
            || self.find_non_participating_landmark_by_name(name).is_some()
    }

    /// Location of a landmark side or of a non-participating landmark
    /// (`input` is ignored for the latter).
    pub fn find_landmark_location(
        &self,
        uid: Uid,
        input: InputIdentifier,
        element_type: ElementType,
    ) -> Option<Point3<Real>> {
        match element_type {
            ElementType::Landmark => self.find_landmark_pair(uid)?.location(input),
            ElementType::NonParticipatingLandmark => {
                self.find_non_participating_landmark(uid).map(|npl| npl.location)
            },
        }
    }

    /// Name of the element `id` points at, if it exists. A landmark side
    /// without a location does not exist as an element.
    pub fn element_name(&self, id: &ElementId) -> Option<&str> {
        match id.element_type {
            ElementType::Landmark => self
                .find_landmark_pair(id.uid)
                .filter(|p| p.location(id.input).is_some())
                .map(|p| p.name.as_str()),
            ElementType::NonParticipatingLandmark => self
                .find_non_participating_landmark(id.uid)
                .map(|npl| npl.name.as_str()),
        }
    }

    /// Both sides of every landmark pair, then every non-participating landmark.
    pub fn all_element_ids(&self) -> Vec<ElementId> {
        let mut rv =
            Vec::with_capacity(2 * self.landmark_pairs.len() + self.non_participating_landmarks.len());
        for lm in self.landmark_pairs.iter() {
            rv.push(ElementId::landmark(lm.uid, InputIdentifier::Source));
            rv.push(ElementId::landmark(lm.uid, InputIdentifier::Destination));
        }
        for npl in self.non_participating_landmarks.iter() {
            rv.push(ElementId::non_participating_landmark(npl.uid));
        }
        rv
    }

    pub fn count_landmarks_for_input(&self, input: InputIdentifier) -> usize {
        self.landmark_pairs
            .iter()
            .filter(|p| p.location(input).is_some())
            .count()
    }

    pub fn count_fully_paired(&self) -> usize {
        self.landmark_pairs.iter().filter(|p| p.is_fully_paired()).count()
    }

    /// Fully-paired, finite landmarks in document order.
    pub fn landmark_pairs_3d(&self) -> Vec<LandmarkPair3D> {
        self.landmark_pairs
            .iter()
            .filter_map(TpsDocumentLandmarkPair::try_extract_landmark_pair)
            .collect()
    }

    /// Like [`TpsDocument::landmark_pairs_3d`], keeping each pair's name.
    pub fn named_landmark_pairs(&self) -> Vec<NamedLandmarkPair3D> {
        self.landmark_pairs
            .iter()
            .filter_map(|p| {
                p.try_extract_landmark_pair().map(|pair| NamedLandmarkPair3D {
                    pair,
                    name: p.name.clone(),
                })
            })
            .collect()
    }

    /// Everything the solver needs: the usable landmarks plus the document's
    /// affine/non-affine switches.
    pub fn solver_inputs(&self) -> TpsCoefficientSolverInputs3D {
        TpsCoefficientSolverInputs3D {
            landmarks: self.landmark_pairs_3d(),
            apply_affine_translation: self.apply_affine_translation,
            apply_affine_scale: self.apply_affine_scale,
            apply_affine_rotation: self.apply_affine_rotation,
            apply_non_affine_warp: self.apply_non_affine_warp,
        }
    }

    /// Source locations of the non-participating landmarks, in document order.
    pub fn non_participating_locations(&self) -> Vec<Point3<Real>> {
        self.non_participating_landmarks
            .iter()
            .map(|npl| npl.location)
            .collect()
    }

    /// One warning per fully-paired landmark that is left out of the solve
    /// because of a non-finite coordinate.
    pub fn degenerate_landmark_warnings(&self) -> Vec<WarpError> {
        self.landmark_pairs
            .iter()
            .filter(|p| p.is_fully_paired() && p.try_extract_landmark_pair().is_none())
            .map(|p| {
                let offending = [p.maybe_source_location, p.maybe_destination_location]
                    .into_iter()
                    .flatten()
                    .find(|loc| !is_finite_point(loc));
                WarpError::DegenerateInput(
                    format!("landmark '{}' has a non-finite coordinate and is left out of the warp", p.name),
                    offending,
                )
            })
            .collect()
    }

    /// `landmark_0`, `landmark_1`, ...: the first name no landmark pair uses.
    pub fn next_landmark_name(&self) -> String {
        next_unique_name(self.landmark_pairs.iter().map(|p| p.name.as_str()), "landmark_")
    }

    /// `datapoint_0`, `datapoint_1`, ...: the first name no non-participating
    /// landmark uses.
    pub fn next_non_participating_landmark_name(&self) -> String {
        next_unique_name(
            self.non_participating_landmarks.iter().map(|p| p.name.as_str()),
            "datapoint_",
        )
    }
}

fn next_unique_name<'a>(existing: impl Iterator<Item = &'a str>, prefix: &str) -> String {
    let taken: HashSet<&str> = existing.collect();
    let mut i = 0usize;
    loop {
        let name = format!("{}{}", prefix, i);
        if !taken.contains(name.as_str()) {
            return name;
        }
        i += 1;
    }
}
