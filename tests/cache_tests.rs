use nalgebra::Vector3;
use tpswarp::{
    CacheStats, TpsDocument, TpsResultCache,
    document::{ElementId, InputIdentifier},
    float_types::Real,
    mesh::Mesh,
    tps::{LandmarkPair3D, warp_mesh, warp_points},
};

mod support;

use crate::support::{document_with_pairs, p, same_vertex_bits, scattered_pairs};

fn stats(extractions: usize, solves: usize, recomputes: usize) -> CacheStats {
    CacheStats {
        landmark_extractions: extractions,
        coefficient_solves: solves,
        output_recomputes: recomputes,
    }
}

/// A warmed-up cache over a sphere document with the scattered landmarks
/// and two non-participating landmarks.
fn warmed_up() -> (TpsDocument, TpsResultCache) {
    let mut doc = document_with_pairs(&scattered_pairs());
    doc.add_non_participating_landmark(p(0.1, 0.2, 0.3), None);
    doc.add_non_participating_landmark(p(-0.5, 0.5, 0.0), None);
    let mut cache = TpsResultCache::new();
    cache.get_warped_mesh(&doc);
    assert_eq!(cache.stats(), stats(1, 1, 1));
    (doc, cache)
}

#[test]
fn repeated_reads_hit_the_cache() {
    let (doc, mut cache) = warmed_up();
    let first = cache.get_warped_mesh(&doc).clone();
    let second = cache.get_warped_mesh(&doc).clone();
    let points = cache.get_warped_non_participating_landmark_locations(&doc).to_vec();

    assert!(same_vertex_bits(&first, &second));
    assert_eq!(points.len(), 2);
    assert_eq!(cache.stats(), stats(1, 1, 1));
    assert_eq!(cache.warnings().count(), 0);
}

#[test]
fn outputs_come_from_the_cached_coefficients() {
    let (doc, mut cache) = warmed_up();
    let mesh = cache.get_warped_mesh(&doc).clone();
    let points = cache.get_warped_non_participating_landmark_locations(&doc).to_vec();

    let coefs = cache.coefficients();
    assert_eq!(coefs.non_affine_terms.len(), 10);
    assert_eq!(mesh, warp_mesh(coefs, &doc.source_mesh, doc.blending_factor));
    assert_eq!(
        points,
        warp_points(coefs, &doc.non_participating_locations(), doc.blending_factor)
    );
}

#[test]
fn blending_change_rewarps_without_solving() {
    let (mut doc, mut cache) = warmed_up();
    doc.blending_factor = 0.0;

    let mesh = cache.get_warped_mesh(&doc).clone();
    assert!(same_vertex_bits(&mesh, &doc.source_mesh));
    assert_eq!(
        cache.get_warped_non_participating_landmark_locations(&doc),
        doc.non_participating_locations().as_slice()
    );
    assert_eq!(cache.stats(), stats(1, 1, 2));
}

#[test]
fn renaming_a_landmark_does_not_resolve() {
    let (mut doc, mut cache) = warmed_up();
    let before = cache.get_warped_mesh(&doc).clone();

    let uid = doc.landmark_pairs[0].uid;
    doc.find_landmark_pair_mut(uid).unwrap().name = "nose".to_string();

    let after = cache.get_warped_mesh(&doc).clone();
    assert!(same_vertex_bits(&before, &after));
    assert_eq!(cache.stats(), stats(2, 1, 1));
}

#[test]
fn half_assigned_landmark_does_not_resolve() {
    let (mut doc, mut cache) = warmed_up();
    doc.add_landmark_to_input(InputIdentifier::Source, p(3.0, 3.0, 3.0), None);
    assert_eq!(doc.count_landmarks_for_input(InputIdentifier::Source), 11);

    cache.get_warped_mesh(&doc);
    assert_eq!(cache.stats(), stats(2, 1, 1));
    assert_eq!(cache.solver_inputs().len(), 10);
}

#[test]
fn moving_a_landmark_resolves_and_rewarps() {
    let (mut doc, mut cache) = warmed_up();
    let before = cache.get_warped_mesh(&doc).clone();

    let uid = doc.landmark_pairs[4].uid;
    let id = ElementId::landmark(uid, InputIdentifier::Destination);
    assert!(doc.translate_element(&id, &Vector3::new(0.0, 0.5, 0.0)));

    let after = cache.get_warped_mesh(&doc).clone();
    assert!(!same_vertex_bits(&before, &after));
    assert_eq!(cache.stats(), stats(2, 2, 2));
}

#[test]
fn switch_change_resolves() {
    let (mut doc, mut cache) = warmed_up();
    doc.apply_non_affine_warp = false;

    cache.get_warped_mesh(&doc);
    assert!(cache.coefficients().non_affine_terms.is_empty());
    assert_eq!(cache.stats(), stats(2, 2, 2));
}

#[test]
fn replacing_the_source_mesh_with_an_equal_one_is_a_hit() {
    let (mut doc, mut cache) = warmed_up();
    let same = (*doc.source_mesh).clone();
    doc.source_mesh.set(same);

    cache.get_warped_mesh(&doc);
    assert_eq!(cache.stats(), stats(1, 1, 1));
}

#[test]
fn new_source_mesh_rewarps_without_solving() {
    let (mut doc, mut cache) = warmed_up();
    doc.source_mesh.set(Mesh::cube(1.0));

    let mesh = cache.get_warped_mesh(&doc);
    assert_eq!(mesh.num_vertices(), 8);
    assert_eq!(cache.stats(), stats(1, 1, 2));
}

#[test]
fn destination_mesh_is_not_an_input() {
    let (mut doc, mut cache) = warmed_up();
    doc.destination_mesh.set(Mesh::cube(3.0));

    cache.get_warped_mesh(&doc);
    assert_eq!(cache.stats(), stats(1, 1, 1));
}

#[test]
fn non_participating_edits_rewarp_both_outputs_together() {
    let (mut doc, mut cache) = warmed_up();
    doc.add_non_participating_landmark(p(0.0, 0.0, 2.0), Some("tip"));

    let points = cache.get_warped_non_participating_landmark_locations(&doc).to_vec();
    assert_eq!(points.len(), 3);
    assert_eq!(cache.stats(), stats(1, 1, 2));

    // the mesh read right after comes from the same pass
    cache.get_warped_mesh(&doc);
    assert_eq!(cache.stats(), stats(1, 1, 2));
}

#[test]
fn toggling_normal_recalculation_rewarps() {
    let (mut doc, mut cache) = warmed_up();
    let plain = cache.get_warped_mesh(&doc).clone();
    assert_eq!(plain.normals(), doc.source_mesh.normals());

    doc.recalculate_normals = true;
    let shaded = cache.get_warped_mesh(&doc).clone();
    assert!(same_vertex_bits(&plain, &shaded));
    assert_ne!(shaded.normals(), doc.source_mesh.normals());
    assert_eq!(cache.stats(), stats(1, 1, 2));
}

#[test]
fn singular_edit_keeps_the_last_good_warp() {
    let (mut doc, mut cache) = warmed_up();
    let good = cache.get_warped_mesh(&doc).clone();
    let good_coefficients = cache.coefficients().clone();

    let duplicate = scattered_pairs()[2].source;
    let uid = doc.add_landmark_to_input(InputIdentifier::Source, duplicate, Some("dupe"));
    doc.add_landmark_to_input(InputIdentifier::Destination, p(5.0, 5.0, 5.0), Some("dupe"));

    let kept = cache.get_warped_mesh(&doc).clone();
    assert!(same_vertex_bits(&good, &kept));
    assert_eq!(*cache.coefficients(), good_coefficients);
    assert_eq!(cache.stats(), stats(2, 2, 1));
    assert!(cache.warnings().any(|w| w.is_singular_system()));

    // asking again neither re-solves nor clears the warning
    cache.get_warped_mesh(&doc);
    assert_eq!(cache.stats(), stats(2, 2, 1));
    assert_eq!(cache.warnings().count(), 1);

    assert!(doc.delete_element_by_uid(uid));
    cache.get_warped_mesh(&doc);
    assert_eq!(cache.warnings().count(), 0);
    assert_eq!(*cache.coefficients(), good_coefficients);
    assert_eq!(cache.stats(), stats(3, 3, 1));
}

#[test]
fn non_finite_landmark_is_reported_and_left_out() {
    let (mut doc, mut cache) = warmed_up();
    doc.add_landmark_to_input(InputIdentifier::Source, p(Real::NAN, 0.0, 0.0), Some("bad"));
    doc.add_landmark_to_input(InputIdentifier::Destination, p(1.0, 1.0, 1.0), Some("bad"));

    cache.get_warped_mesh(&doc);
    let warnings: Vec<_> = cache.warnings().collect();
    assert_eq!(warnings.len(), 1);
    assert!(warnings[0].is_degenerate_input());
    assert!(warnings[0].to_string().contains("'bad'"));
    assert_eq!(cache.solver_inputs().len(), 10);
    assert_eq!(cache.stats(), stats(2, 1, 1));
}

#[test]
fn non_finite_blending_factor_keeps_previous_outputs() {
    let (mut doc, mut cache) = warmed_up();
    let good = cache.get_warped_mesh(&doc).clone();

    doc.blending_factor = Real::NAN;
    let kept = cache.get_warped_mesh(&doc).clone();
    assert!(same_vertex_bits(&good, &kept));
    assert!(cache.warnings().any(|w| w.is_degenerate_input()));
    assert_eq!(cache.stats(), stats(1, 1, 1));

    doc.blending_factor = 0.5;
    cache.get_warped_mesh(&doc);
    assert_eq!(cache.warnings().count(), 0);
    assert_eq!(cache.stats(), stats(1, 1, 2));
}

#[test]
fn restoring_an_undo_snapshot_restores_the_outputs() {
    let (mut doc, mut cache) = warmed_up();
    let original = cache.get_warped_mesh(&doc).clone();
    let snapshot = doc.clone();

    let uid = doc.landmark_pairs[1].uid;
    doc.translate_element(
        &ElementId::landmark(uid, InputIdentifier::Source),
        &Vector3::new(0.2, 0.0, 0.0),
    );
    let edited = cache.get_warped_mesh(&doc).clone();
    assert!(!same_vertex_bits(&original, &edited));

    doc = snapshot;
    let restored = cache.get_warped_mesh(&doc).clone();
    assert!(same_vertex_bits(&original, &restored));
}

#[test]
fn document_without_landmarks_is_the_identity() {
    let doc = TpsDocument::new(Mesh::sphere(1.0, 8, 4), Mesh::new());
    let mut cache = TpsResultCache::new();

    let mesh = cache.get_warped_mesh(&doc).clone();
    assert_eq!(mesh, *doc.source_mesh);
    assert!(cache.coefficients().is_identity());
    assert_eq!(cache.stats(), stats(1, 0, 1));
}

#[test]
fn single_landmark_translates_everything() {
    let doc = document_with_pairs(&[LandmarkPair3D::new(p(0.0, 1.0, 0.0), p(0.0, 1.5, 0.0))]);
    let mut cache = TpsResultCache::new();

    let mesh = cache.get_warped_mesh(&doc).clone();
    for (w, v) in mesh.vertices().iter().zip(doc.source_mesh.vertices()) {
        assert!((w - (v + Vector3::new(0.0, 0.5, 0.0))).norm() < 1e-4);
    }
}

#[test]
fn non_finite_blending_factor_on_a_fresh_cache_shows_the_unwarped_inputs() {
    let mut doc = TpsDocument::new(Mesh::cube(1.0), Mesh::new());
    doc.add_landmark_to_input(InputIdentifier::Source, p(0.0, 0.0, 0.0), None);
    doc.add_landmark_to_input(InputIdentifier::Destination, p(1.0, 0.0, 0.0), None);
    doc.add_non_participating_landmark(p(0.5, 0.5, 0.5), None);
    doc.blending_factor = Real::NAN;
    let mut cache = TpsResultCache::new();

    let mesh = cache.get_warped_mesh(&doc).clone();
    assert!(same_vertex_bits(&mesh, &doc.source_mesh));
    assert_eq!(
        cache.get_warped_non_participating_landmark_locations(&doc),
        [p(0.5, 0.5, 0.5)].as_slice()
    );
    assert!(cache.warnings().any(|w| w.is_degenerate_input()));
    assert_eq!(cache.stats(), stats(1, 1, 1));
}

#[test]
fn points_added_under_a_non_finite_blending_factor_are_still_returned() {
    let (mut doc, mut cache) = warmed_up();
    doc.blending_factor = Real::INFINITY;
    cache.get_warped_mesh(&doc);
    assert_eq!(cache.stats(), stats(1, 1, 1));

    doc.add_non_participating_landmark(p(0.0, 0.0, 2.0), Some("tip"));
    let points = cache.get_warped_non_participating_landmark_locations(&doc).to_vec();
    assert_eq!(points, doc.non_participating_locations());
    assert!(cache.warnings().any(|w| w.is_degenerate_input()));
    assert_eq!(cache.stats(), stats(1, 1, 2));

    doc.source_mesh.set(Mesh::cube(2.0));
    let mesh = cache.get_warped_mesh(&doc).clone();
    assert!(same_vertex_bits(&mesh, &doc.source_mesh));
    assert_eq!(cache.stats(), stats(1, 1, 3));
}
