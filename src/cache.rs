//! Pull-based memoisation of a document's warp results.
//!
//! ```text
//! landmark extraction -> coefficients -> { warped mesh, warped non-participating points }
//! ```
//!
//! Each accessor brings every stage up to date with the document it is given
//! and recomputes only the stages whose inputs changed. Both outputs are
//! always produced by the same pass from the same coefficients.

use crate::document::{Revision, TpsDocument};
use crate::errors::WarpError;
use crate::float_types::Real;
use crate::mesh::Mesh;
use crate::tps::{TpsCoefficientSolverInputs3D, TpsCoefficients3D, calc_coefficients, warp};
use nalgebra::Point3;

/// How often each stage of a [`TpsResultCache`] has actually run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Landmark pairs re-read from a document
    pub landmark_extractions: usize,
    /// Coefficient solves attempted (successful or not)
    pub coefficient_solves: usize,
    /// Passes that recomputed both outputs
    pub output_recomputes: usize,
}

/// Solver switches as last seen on a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct SolverSwitches {
    translation: bool,
    scale: bool,
    rotation: bool,
    non_affine: bool,
}

impl SolverSwitches {
    const fn of(doc: &TpsDocument) -> Self {
        SolverSwitches {
            translation: doc.apply_affine_translation,
            scale: doc.apply_affine_scale,
            rotation: doc.apply_affine_rotation,
            non_affine: doc.apply_non_affine_warp,
        }
    }
}

/// Cached warp results for one document (typically one per open editor tab).
///
/// Not synchronised: each cache is owned by one caller and every accessor
/// takes `&mut self`. Returned references are valid until the next accessor
/// call; copy them if a stable snapshot is needed.
///
/// Failures never escape the accessors. A singular landmark system keeps the
/// last good coefficients. A non-finite blending factor keeps the last good
/// outputs, or shows the unwarped source mesh and points if there are none
/// matching the document yet. Both are reported through
/// [`TpsResultCache::warnings`].
#[derive(Debug, Clone)]
pub struct TpsResultCache {
    landmarks_revision: Option<Revision>,
    cached_switches: Option<SolverSwitches>,
    cached_inputs: TpsCoefficientSolverInputs3D,
    cached_coefficients: TpsCoefficients3D,

    source_mesh_revision: Option<Revision>,
    cached_source_mesh: Mesh,

    non_participating_revision: Option<Revision>,
    cached_non_participating_locations: Vec<Point3<Real>>,

    cached_blending_factor: Real,
    cached_recalculate_normals: bool,

    cached_result_mesh: Mesh,
    cached_result_non_participating_locations: Vec<Point3<Real>>,
    has_outputs: bool,

    solver_warning: Option<WarpError>,
    input_warnings: Vec<WarpError>,
    blending_warning: Option<WarpError>,

    stats: CacheStats,
}

impl Default for TpsResultCache {
    fn default() -> Self {
        Self::new()
    }
}

impl TpsResultCache {
    pub fn new() -> Self {
        TpsResultCache {
            landmarks_revision: None,
            cached_switches: None,
            cached_inputs: TpsCoefficientSolverInputs3D::default(),
            cached_coefficients: TpsCoefficients3D::identity(),
            source_mesh_revision: None,
            cached_source_mesh: Mesh::new(),
            non_participating_revision: None,
            cached_non_participating_locations: Vec::new(),
            cached_blending_factor: 1.0,
            cached_recalculate_normals: false,
            cached_result_mesh: Mesh::new(),
            cached_result_non_participating_locations: Vec::new(),
            has_outputs: false,
            solver_warning: None,
            input_warnings: Vec::new(),
            blending_warning: None,
            stats: CacheStats::default(),
        }
    }

    /// The source mesh of `doc`, warped by its landmarks.
    pub fn get_warped_mesh(&mut self, doc: &TpsDocument) -> &Mesh {
        self.update(doc);
        &self.cached_result_mesh
    }

    /// The non-participating landmarks of `doc`, warped by its landmarks, in
    /// document order.
    pub fn get_warped_non_participating_landmark_locations(
        &mut self,
        doc: &TpsDocument,
    ) -> &[Point3<Real>] {
        self.update(doc);
        &self.cached_result_non_participating_locations
    }

    /// Bring the cache up to date with `doc`. Returns `true` if the outputs
    /// were recomputed.
    pub fn update(&mut self, doc: &TpsDocument) -> bool {
        let coefficients_changed = self.update_coefficients(doc);
        let mesh_changed = self.update_source_mesh(doc);
        let points_changed = self.update_non_participating_locations(doc);
        let blending_changed = self.cached_blending_factor.to_bits() != doc.blending_factor.to_bits();
        let normals_changed = self.cached_recalculate_normals != doc.recalculate_normals;

        if self.has_outputs
            && !(coefficients_changed
                || mesh_changed
                || points_changed
                || blending_changed
                || normals_changed)
        {
            return false;
        }

        self.cached_blending_factor = doc.blending_factor;
        self.cached_recalculate_normals = doc.recalculate_normals;

        if !doc.blending_factor.is_finite() {
            self.blending_warning = Some(WarpError::DegenerateInput(
                format!("blending factor {} is not finite", doc.blending_factor),
                None,
            ));
            if self.has_outputs && !(mesh_changed || points_changed) {
                tracing::warn!(blending_factor = ?doc.blending_factor, "keeping previous warp: blending factor is not finite");
                return false;
            }
            // previous outputs would not match the document's mesh or points
            tracing::warn!(blending_factor = ?doc.blending_factor, "showing unwarped inputs: blending factor is not finite");
            self.recompute_outputs(0.0);
            return true;
        }
        self.blending_warning = None;

        self.recompute_outputs(doc.blending_factor);
        true
    }

    fn recompute_outputs(&mut self, blending_factor: Real) {
        let _span = tracing::debug_span!("tps_result_cache_recompute", blending_factor).entered();

        let mut mesh =
            warp::warp_mesh(&self.cached_coefficients, &self.cached_source_mesh, blending_factor);
        if self.cached_recalculate_normals {
            mesh.recalculate_normals();
        }
        self.cached_result_mesh = mesh;

        self.cached_result_non_participating_locations = warp::warp_points(
            &self.cached_coefficients,
            &self.cached_non_participating_locations,
            blending_factor,
        );

        self.has_outputs = true;
        self.stats.output_recomputes += 1;
    }

    /// Returns `true` if the cached coefficients changed.
    fn update_coefficients(&mut self, doc: &TpsDocument) -> bool {
        let switches = SolverSwitches::of(doc);
        if self.landmarks_revision == Some(doc.landmark_pairs.revision())
            && self.cached_switches == Some(switches)
        {
            return false;
        }
        self.landmarks_revision = Some(doc.landmark_pairs.revision());
        self.cached_switches = Some(switches);

        self.stats.landmark_extractions += 1;
        self.input_warnings = doc.degenerate_landmark_warnings();
        for warning in &self.input_warnings {
            tracing::warn!(%warning, "landmark left out of the warp");
        }

        let inputs = doc.solver_inputs();
        if inputs == self.cached_inputs {
            tracing::debug!("landmark edit did not change solver inputs");
            return false;
        }
        self.cached_inputs = inputs;

        self.stats.coefficient_solves += 1;
        match calc_coefficients(&self.cached_inputs) {
            Ok(coefficients) => {
                self.solver_warning = None;
                if coefficients == self.cached_coefficients {
                    false
                } else {
                    self.cached_coefficients = coefficients;
                    true
                }
            },
            Err(err) => {
                tracing::warn!(error = %err, "keeping previous coefficients");
                self.solver_warning = Some(err);
                false
            },
        }
    }

    /// Returns `true` if the cached source mesh changed.
    fn update_source_mesh(&mut self, doc: &TpsDocument) -> bool {
        let revision = doc.source_mesh.revision();
        if self.source_mesh_revision == Some(revision) {
            return false;
        }
        self.source_mesh_revision = Some(revision);

        if *doc.source_mesh == self.cached_source_mesh {
            return false;
        }
        self.cached_source_mesh = (*doc.source_mesh).clone();
        true
    }

    /// Returns `true` if the cached non-participating source locations changed.
    fn update_non_participating_locations(&mut self, doc: &TpsDocument) -> bool {
        let revision = doc.non_participating_landmarks.revision();
        if self.non_participating_revision == Some(revision) {
            return false;
        }
        self.non_participating_revision = Some(revision);

        let locations = doc.non_participating_locations();
        if locations == self.cached_non_participating_locations {
            return false;
        }
        self.cached_non_participating_locations = locations;
        true
    }

    /// Coefficients behind the current outputs.
    pub const fn coefficients(&self) -> &TpsCoefficients3D {
        &self.cached_coefficients
    }

    /// Solver inputs as last extracted from a document.
    pub const fn solver_inputs(&self) -> &TpsCoefficientSolverInputs3D {
        &self.cached_inputs
    }

    /// Validation warnings from the most recent update of each stage, for the
    /// UI to surface.
    pub fn warnings(&self) -> impl Iterator<Item = &WarpError> {
        self.solver_warning
            .iter()
            .chain(self.input_warnings.iter())
            .chain(self.blending_warning.iter())
    }

    pub const fn stats(&self) -> CacheStats {
        self.stats
    }
}
