//! Coefficient solver.
//!
//! Based on the Bookstein thin-plate-spline formulation:
//!
//! 1. Build the matrix
//!
//!    ```text
//!    L = | K   P |
//!        | PT  0 |
//!    ```
//!
//!    where `K[i][j] = U(||pi - pj||)` over the landmark sources, `P` is the
//!    `n × 4` matrix of rows `[1, x, y, z]`, `PT` its transpose and `0` a
//!    4 × 4 zero block.
//! 2. Solve `L * [W; A] = [V; 0]` for all three output dimensions at once,
//!    where `V` holds the landmark displacements `destination - source`.
//! 3. Add the identity to the affine part so the result maps positions to
//!    positions.
//!
//! The sources are centred on their centroid before assembly and the system
//! is solved with a rank-revealing SVD, returning the minimum-norm solution.
//! With fewer than four landmarks (or coplanar ones) `P` has rank below four
//! and `L` is singular; the minimum-norm solution is then the least-bending
//! warp, and a single pair becomes a pure translation. Centring keeps that
//! choice independent of where the landmarks sit in space.

use super::coefficients::{TpsCoefficients3D, TpsNonAffineTerm3D};
use super::kernel::radial_basis_function_3d_f64;
use super::landmark::{LandmarkPair3D, TpsCoefficientSolverInputs3D};
use crate::errors::WarpError;
use crate::float_types::{Real, tolerance};
use nalgebra::{DMatrix, Point3, Vector3};

/// Singular values below `largest * SVD_RELATIVE_RANK_TOLERANCE` are treated
/// as zero.
const SVD_RELATIVE_RANK_TOLERANCE: f64 = 1e-12;

/// Solve the warp coefficients for `inputs`.
///
/// - No landmarks: the identity warp (not an error).
/// - Pairs with a NaN or infinite coordinate are skipped.
/// - Two sources closer than [`tolerance`], or closer than a millionth of the
///   source bounding-box diagonal, make the system (nearly) singular and
///   return [`WarpError::SingularSystem`], as does a failed factorization.
///
/// The affine/non-affine switches of `inputs` are applied to the solved
/// coefficients.
pub fn calc_coefficients(
    inputs: &TpsCoefficientSolverInputs3D,
) -> Result<TpsCoefficients3D, WarpError> {
    let _span =
        tracing::debug_span!("tps_calc_coefficients", landmarks = inputs.landmarks.len())
            .entered();

    let landmarks: Vec<(usize, &LandmarkPair3D)> = inputs
        .landmarks
        .iter()
        .enumerate()
        .filter(|(i, lm)| {
            let keep = lm.is_finite();
            if !keep {
                tracing::warn!(index = *i, "skipping landmark pair with a non-finite coordinate");
            }
            keep
        })
        .collect();

    if landmarks.is_empty() {
        return Ok(TpsCoefficients3D::identity());
    }

    check_distinct_sources(&landmarks)?;

    let solution = solve_displacement_system(&landmarks)?;
    let mut rv = to_position_coefficients(&landmarks, &solution);
    apply_switches(&mut rv, inputs);
    Ok(rv)
}

/// Sources closer than this fraction of the source bounding-box diagonal are
/// treated as coincident. Closer pairs still solve, but with weights that
/// grow like `1 / distance` and swamp the rest of the warp.
const MIN_RELATIVE_SOURCE_SEPARATION: f64 = 1e-6;

/// Distance at or below which two sources count as coincident: the absolute
/// [`tolerance`] or the relative separation limit, whichever is larger.
fn coincidence_threshold(landmarks: &[(usize, &LandmarkPair3D)]) -> f64 {
    let mut mins = [f64::INFINITY; 3];
    let mut maxs = [f64::NEG_INFINITY; 3];
    for (_, lm) in landmarks {
        let s = to_f64(&lm.source);
        for k in 0..3 {
            mins[k] = mins[k].min(s[k]);
            maxs[k] = maxs[k].max(s[k]);
        }
    }
    let diagonal = radial_basis_function_3d_f64(mins, maxs);
    (tolerance() as f64).max(diagonal * MIN_RELATIVE_SOURCE_SEPARATION)
}

fn check_distinct_sources(landmarks: &[(usize, &LandmarkPair3D)]) -> Result<(), WarpError> {
    let eps = coincidence_threshold(landmarks);
    for (a, &(i, lhs)) in landmarks.iter().enumerate() {
        for &(j, rhs) in &landmarks[a + 1..] {
            let distance = radial_basis_function_3d_f64(to_f64(&lhs.source), to_f64(&rhs.source));
            if distance <= eps {
                return Err(WarpError::SingularSystem(format!(
                    "landmarks {} and {} have (nearly) the same source location {}",
                    i, j, lhs.source
                )));
            }
        }
    }
    Ok(())
}

#[inline]
fn to_f64(p: &Point3<Real>) -> [f64; 3] {
    [p.x as f64, p.y as f64, p.z as f64]
}

fn source_centroid(landmarks: &[(usize, &LandmarkPair3D)]) -> [f64; 3] {
    let mut sum = [0.0f64; 3];
    for (_, lm) in landmarks {
        let s = to_f64(&lm.source);
        sum[0] += s[0];
        sum[1] += s[1];
        sum[2] += s[2];
    }
    let n = landmarks.len() as f64;
    [sum[0] / n, sum[1] / n, sum[2] / n]
}

/// Returns the `(n + 4) × 3` solution `[W; B]` of the centred displacement
/// system, with one column per output dimension.
fn solve_displacement_system(
    landmarks: &[(usize, &LandmarkPair3D)],
) -> Result<(DMatrix<f64>, [f64; 3]), WarpError> {
    let n = landmarks.len();
    let dim = n + 4;
    let centroid = source_centroid(landmarks);

    let centred: Vec<[f64; 3]> = landmarks
        .iter()
        .map(|(_, lm)| {
            let s = to_f64(&lm.source);
            [s[0] - centroid[0], s[1] - centroid[1], s[2] - centroid[2]]
        })
        .collect();

    let mut l = DMatrix::<f64>::zeros(dim, dim);

    // K (upper-left), symmetric with a zero diagonal
    for row in 0..n {
        for col in (row + 1)..n {
            let u = radial_basis_function_3d_f64(centred[row], centred[col]);
            l[(row, col)] = u;
            l[(col, row)] = u;
        }
    }

    // P (upper-right) and PT (bottom-left); the bottom-right block stays zero
    for (row, q) in centred.iter().enumerate() {
        let p_row = [1.0, q[0], q[1], q[2]];
        for (k, &v) in p_row.iter().enumerate() {
            l[(row, n + k)] = v;
            l[(n + k, row)] = v;
        }
    }

    let mut rhs = DMatrix::<f64>::zeros(dim, 3);
    for (row, (_, lm)) in landmarks.iter().enumerate() {
        let d = lm.displacement();
        rhs[(row, 0)] = d.x as f64;
        rhs[(row, 1)] = d.y as f64;
        rhs[(row, 2)] = d.z as f64;
    }

    // A full SVD is O((n + 4)^3) with a large constant: a few ms at 100
    // landmarks, most of a second at 600. An LU or symmetric-indefinite
    // factorization would be several times faster but cannot return the
    // minimum-norm solution for rank-deficient systems (n < 4, coplanar).
    let svd = l.try_svd(true, true, f64::EPSILON, 0).ok_or_else(|| {
        WarpError::SingularSystem("singular value decomposition did not converge".to_string())
    })?;

    let largest = svd.singular_values.max();
    if !largest.is_finite() || largest <= 0.0 {
        return Err(WarpError::SingularSystem(
            "landmark system has no finite non-zero singular value".to_string(),
        ));
    }

    let solution = svd
        .solve(&rhs, largest * SVD_RELATIVE_RANK_TOLERANCE)
        .map_err(|err| WarpError::SingularSystem(err.to_string()))?;

    if solution.iter().any(|v| !v.is_finite()) {
        return Err(WarpError::SingularSystem(
            "solution contains non-finite coefficients".to_string(),
        ));
    }

    tracing::trace!(rank = svd.rank(largest * SVD_RELATIVE_RANK_TOLERANCE), dim, "solved landmark system");

    Ok((solution, centroid))
}

/// Undo the centring and add the identity, giving coefficients that map world
/// positions to world positions.
fn to_position_coefficients(
    landmarks: &[(usize, &LandmarkPair3D)],
    (solution, centroid): &(DMatrix<f64>, [f64; 3]),
) -> TpsCoefficients3D {
    let n = landmarks.len();
    let row = |r: usize| Vector3::new(solution[(r, 0)], solution[(r, 1)], solution[(r, 2)]);

    let b0 = row(n);
    let b1 = row(n + 1);
    let b2 = row(n + 2);
    let b3 = row(n + 3);

    // d(p) = b0 + B * (p - c)  =>  constant term is b0 - B * c
    let a1 = b0 - b1 * centroid[0] - b2 * centroid[1] - b3 * centroid[2];

    let to_real = |v: Vector3<f64>| Vector3::new(v.x as Real, v.y as Real, v.z as Real);

    let non_affine_terms = landmarks
        .iter()
        .enumerate()
        .map(|(i, (_, lm))| TpsNonAffineTerm3D::new(to_real(row(i)), lm.source))
        .collect();

    TpsCoefficients3D {
        a1: to_real(a1),
        a2: Vector3::x() + to_real(b1),
        a3: Vector3::y() + to_real(b2),
        a4: Vector3::z() + to_real(b3),
        non_affine_terms,
    }
}

fn apply_switches(coefs: &mut TpsCoefficients3D, inputs: &TpsCoefficientSolverInputs3D) {
    if !inputs.apply_affine_translation {
        coefs.a1 = Vector3::zeros();
    }
    if !inputs.apply_affine_scale {
        for column in [&mut coefs.a2, &mut coefs.a3, &mut coefs.a4] {
            if let Some(unit) = column.try_normalize(Real::EPSILON) {
                *column = unit;
            }
        }
    }
    if !inputs.apply_affine_rotation {
        coefs.a2 = Vector3::new(coefs.a2.norm(), 0.0, 0.0);
        coefs.a3 = Vector3::new(0.0, coefs.a3.norm(), 0.0);
        coefs.a4 = Vector3::new(0.0, 0.0, coefs.a4.norm());
    }
    if !inputs.apply_non_affine_warp {
        coefs.non_affine_terms.clear();
    }
}
