//! Editing operations on a [`TpsDocument`].
//!
//! Each operation locates its target with a read-only search first, so a
//! call that changes nothing leaves the revisions (and therefore any cache
//! built on them) alone.

use super::{
    ElementId, ElementType, InputIdentifier, TpsDocument, TpsDocumentLandmarkPair,
    TpsDocumentNonParticipatingLandmark, Uid,
};
use crate::float_types::Real;
use nalgebra::{Point3, Vector3};

impl TpsDocument {
    /// Place one side of a landmark and return the uid of the pair it landed in.
    ///
    /// With a `suggested_name`, the pair with that name gets its `input` side
    /// overwritten (or is created). Without one, the location fills the first
    /// pair that has no `input` location yet, so landmarks placed on the source
    /// and destination meshes pair up in placement order; if every pair
    /// already has one, a new half-assigned pair with a generated name is added.
    pub fn add_landmark_to_input(
        &mut self,
        input: InputIdentifier,
        position: Point3<Real>,
        suggested_name: Option<&str>,
    ) -> Uid {
        let existing = match suggested_name {
            Some(name) => self.landmark_pairs.iter().position(|p| p.name == name),
            None => self
                .landmark_pairs
                .iter()
                .position(|p| p.location(input).is_none()),
        };

        if let Some(idx) = existing {
            let pair = &mut self.landmark_pairs.get_mut()[idx];
            *pair.location_mut(input) = Some(position);
            return pair.uid;
        }

        let name = match suggested_name {
            Some(name) => name.to_string(),
            None => self.next_landmark_name(),
        };
        let mut pair = TpsDocumentLandmarkPair::new(name);
        *pair.location_mut(input) = Some(position);
        let uid = pair.uid;
        self.landmark_pairs.get_mut().push(pair);
        uid
    }

    /// Add a non-participating landmark, or move the one called
    /// `suggested_name` if it already exists.
    pub fn add_non_participating_landmark(
        &mut self,
        location: Point3<Real>,
        suggested_name: Option<&str>,
    ) -> Uid {
        if let Some(name) = suggested_name {
            if let Some(idx) = self
                .non_participating_landmarks
                .iter()
                .position(|p| p.name == name)
            {
                let npl = &mut self.non_participating_landmarks.get_mut()[idx];
                npl.location = location;
                return npl.uid;
            }
        }

        let name = match suggested_name {
            Some(name) => name.to_string(),
            None => self.next_non_participating_landmark_name(),
        };
        let npl = TpsDocumentNonParticipatingLandmark::new(name, location);
        let uid = npl.uid;
        self.non_participating_landmarks.get_mut().push(npl);
        uid
    }

    /// Move an element by `translation`. Returns `false` if the element (or,
    /// for a landmark, that side's location) does not exist.
    pub fn translate_element(&mut self, id: &ElementId, translation: &Vector3<Real>) -> bool {
        match id.element_type {
            ElementType::Landmark => {
                let Some(idx) = self
                    .landmark_pairs
                    .iter()
                    .position(|p| p.uid == id.uid && p.location(id.input).is_some())
                else {
                    return false;
                };
                if let Some(pos) = self.landmark_pairs.get_mut()[idx].location_mut(id.input) {
                    *pos += translation;
                }
                true
            },
            ElementType::NonParticipatingLandmark => {
                let Some(idx) = self
                    .non_participating_landmarks
                    .iter()
                    .position(|p| p.uid == id.uid)
                else {
                    return false;
                };
                self.non_participating_landmarks.get_mut()[idx].location += translation;
                true
            },
        }
    }

    /// Delete an element.
    ///
    /// For a landmark this clears only the addressed side; once neither side
    /// has a location left the pair itself is removed.
    pub fn delete_element(&mut self, id: &ElementId) -> bool {
        match id.element_type {
            ElementType::Landmark => {
                let Some(idx) = self.landmark_pairs.iter().position(|p| p.uid == id.uid) else {
                    return false;
                };
                let pairs = self.landmark_pairs.get_mut();
                *pairs[idx].location_mut(id.input) = None;
                if !pairs[idx].has_source_or_destination_location() {
                    pairs.remove(idx);
                }
                true
            },
            ElementType::NonParticipatingLandmark => self.remove_non_participating_landmark(id.uid),
        }
    }

    /// Delete a whole landmark pair or non-participating landmark by uid.
    pub fn delete_element_by_uid(&mut self, uid: Uid) -> bool {
        if let Some(idx) = self.landmark_pairs.iter().position(|p| p.uid == uid) {
            self.landmark_pairs.get_mut().remove(idx);
            return true;
        }
        self.remove_non_participating_landmark(uid)
    }

    fn remove_non_participating_landmark(&mut self, uid: Uid) -> bool {
        match self
            .non_participating_landmarks
            .iter()
            .position(|p| p.uid == uid)
        {
            Some(idx) => {
                self.non_participating_landmarks.get_mut().remove(idx);
                true
            },
            None => false,
        }
    }
}
