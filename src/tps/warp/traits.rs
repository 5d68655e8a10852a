//! Traits for warp evaluation.

use crate::float_types::Real;
use crate::mesh::Mesh;
use crate::tps::TpsCoefficients3D;
use nalgebra::Point3;

/// Applies solved coefficients to point sets and meshes.
///
/// Every point is evaluated independently, so implementations are free to
/// split the work however they like; all of them must produce the same
/// result as [`TpsCoefficients3D::warp_point_blended`] per point.
pub trait WarpOps {
    /// Warp `points` in place.
    fn warp_points_in_place(
        &self,
        coefs: &TpsCoefficients3D,
        points: &mut [Point3<Real>],
        blending_factor: Real,
    );

    /// Warp a copy of `points`, preserving order.
    fn warp_points(
        &self,
        coefs: &TpsCoefficients3D,
        points: &[Point3<Real>],
        blending_factor: Real,
    ) -> Vec<Point3<Real>> {
        let mut rv = points.to_vec();
        self.warp_points_in_place(coefs, &mut rv, blending_factor);
        rv
    }

    /// Copy `mesh` and warp its position buffer.
    ///
    /// Indices, sub-meshes, texture coordinates and normals are copied as-is.
    /// Call [`Mesh::recalculate_normals`] on the result if shading matters.
    fn warp_mesh(&self, coefs: &TpsCoefficients3D, mesh: &Mesh, blending_factor: Real) -> Mesh {
        let mut rv = mesh.clone();
        self.warp_points_in_place(coefs, rv.vertices_mut(), blending_factor);
        rv
    }
}
