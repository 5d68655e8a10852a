//! Per-vertex normal recalculation.

use super::Mesh;
use crate::float_types::{Real, tolerance};
use nalgebra::{Point3, Vector3};

impl Mesh {
    /// Recompute per-vertex normals from the current positions.
    ///
    /// Each triangle contributes its unnormalized face normal (length is twice
    /// the triangle area) to its three corners, so larger faces weigh more.
    /// Vertices with no usable contribution fall back to +Z.
    ///
    /// This is O(V + F) and never happens implicitly: warping a mesh leaves the
    /// previous normals in place.
    pub fn recalculate_normals(&mut self) {
        let mut accumulated = vec![Vector3::<Real>::zeros(); self.num_vertices()];

        for [a, b, c] in self.triangles() {
            let face = area_weighted_normal(&self.vertices()[a], &self.vertices()[b], &self.vertices()[c]);
            if face.iter().all(|v| v.is_finite()) {
                accumulated[a] += face;
                accumulated[b] += face;
                accumulated[c] += face;
            }
        }

        let eps = tolerance();
        for normal in &mut accumulated {
            let norm = normal.norm();
            if norm > eps {
                *normal /= norm;
            } else {
                *normal = Vector3::z();
            }
        }

        // length always matches the vertex count
        let _ = self.set_normals(accumulated);
    }
}

/// Face normal of triangle `abc` scaled by twice its area (counter-clockwise
/// winding faces the viewer).
#[inline]
pub fn area_weighted_normal(a: &Point3<Real>, b: &Point3<Real>, c: &Point3<Real>) -> Vector3<Real> {
    (b - a).cross(&(c - a))
}
