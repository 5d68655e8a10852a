//! Test support library
//! Provides fixtures and tolerance helpers shared by the integration tests.
#![allow(dead_code)]

use nalgebra::{Point3, Vector3};
use tpswarp::{
    TpsDocument,
    document::InputIdentifier,
    float_types::Real,
    mesh::Mesh,
    tps::LandmarkPair3D,
};

/// Tolerance for comparisons that go through a landmark solve.
#[cfg(feature = "f64")]
pub const TOL: Real = 1e-6;
#[cfg(feature = "f32")]
pub const TOL: Real = 2e-3;

/// Quick helper to compare floating-point results with an acceptable tolerance.
pub fn approx_eq(a: Real, b: Real, eps: Real) -> bool {
    (a - b).abs() < eps
}

pub fn assert_point_near(actual: &Point3<Real>, expected: &Point3<Real>, eps: Real) {
    assert!(
        (actual - expected).norm() < eps,
        "expected {} but got {} (distance {})",
        expected,
        actual,
        (actual - expected).norm()
    );
}

pub fn p(x: Real, y: Real, z: Real) -> Point3<Real> {
    Point3::new(x, y, z)
}

/// A smooth, clearly non-affine deformation used to generate destinations.
pub fn bend(s: &Point3<Real>) -> Point3<Real> {
    s + Vector3::new(0.1 * (3.0 * s.y).sin(), 0.05 * s.x * s.z, 0.1 * s.z * s.z)
}

/// Ten non-coplanar sources spread over the unit cube, mapped through [`bend`].
pub fn scattered_pairs() -> Vec<LandmarkPair3D> {
    let sources = [
        p(0.0, 0.0, 0.0),
        p(1.0, 0.0, 0.0),
        p(0.0, 1.0, 0.0),
        p(0.0, 0.0, 1.0),
        p(1.0, 1.0, 0.0),
        p(1.0, 0.0, 1.0),
        p(0.0, 1.0, 1.0),
        p(1.0, 1.0, 1.0),
        p(0.5, 0.25, 0.75),
        p(0.2, 0.8, 0.4),
    ];
    sources
        .iter()
        .map(|s| LandmarkPair3D::new(*s, bend(s)))
        .collect()
}

/// Query points that are not landmarks.
pub fn query_points() -> Vec<Point3<Real>> {
    vec![
        p(0.3, 0.3, 0.3),
        p(-1.0, 2.0, 0.5),
        p(5.0, 0.0, 0.0),
        p(0.9, 0.1, 0.6),
        p(10.0, -10.0, 10.0),
    ]
}

/// A document over a UV sphere whose landmark pairs are `pairs`, named
/// `landmark_0`, `landmark_1`, ...
pub fn document_with_pairs(pairs: &[LandmarkPair3D]) -> TpsDocument {
    let mut doc = TpsDocument::new(Mesh::sphere(1.0, 16, 8), Mesh::new());
    for pair in pairs {
        doc.add_landmark_to_input(InputIdentifier::Source, pair.source, None);
        doc.add_landmark_to_input(InputIdentifier::Destination, pair.destination, None);
    }
    doc
}

/// `true` if both meshes have bit-identical position buffers.
pub fn same_vertex_bits(a: &Mesh, b: &Mesh) -> bool {
    a.num_vertices() == b.num_vertices()
        && a
            .vertices()
            .iter()
            .zip(b.vertices())
            .all(|(u, v)| u.coords.iter().zip(v.coords.iter()).all(|(x, y)| x.to_bits() == y.to_bits()))
}
