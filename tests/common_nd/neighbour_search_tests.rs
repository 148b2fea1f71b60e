// SPDX-FileCopyrightText: 2025-2026 Carlson Büth <code@cbueth.de>
//
// SPDX-License-Identifier: MIT OR Apache-2.0

use infodynamics::InfoError;
use infodynamics::estimators::approaches::common_nd::neighbour_search::{NeighbourSearchIndex, Norm};
use rstest::rstest;

use crate::test_helpers::generate_uniform_data;

/// Indices of the k nearest samples to `i` by brute force, ties to the lower index.
fn brute_force_knn(data: &[f64], i: usize, k: usize, window: usize) -> Vec<usize> {
    let mut candidates: Vec<(f64, usize)> = (0..data.len())
        .filter(|&j| j != i && i.abs_diff(j) > window)
        .map(|j| ((data[i] - data[j]).abs(), j))
        .collect();
    candidates.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));
    candidates.into_iter().take(k).map(|(_, j)| j).collect()
}

#[rstest]
#[case(1, 0)]
#[case(4, 0)]
#[case(5, 3)]
#[case(10, 7)]
fn k_nearest_matches_brute_force(#[case] k: usize, #[case] window: usize) {
    let data: Vec<f64> = generate_uniform_data(300, 1, 11).column(0).to_vec();
    let index = NeighbourSearchIndex::new(&data).unwrap();
    for i in [0, 1, 57, 150, 298, 299] {
        let found = index.k_nearest(k, i, window).unwrap();
        assert_eq!(found.len(), k);
        let indices: Vec<usize> = found.iter().map(|n| n.index).collect();
        assert_eq!(indices, brute_force_knn(&data, i, k, window), "query {i}");
        assert!(found.windows(2).all(|w| w[0].distance <= w[1].distance));
        assert!(found.iter().all(|n| n.index.abs_diff(i) > window));
    }
}

#[test]
fn k_nearest_breaks_ties_by_lower_index() {
    let data = [0.0, 1.0, 1.0, 2.0, 1.0];
    let index = NeighbourSearchIndex::new(&data).unwrap();
    let two: Vec<usize> = index.k_nearest(2, 1, 0).unwrap().iter().map(|n| n.index).collect();
    assert_eq!(two, vec![2, 4]);
    let three: Vec<usize> = index.k_nearest(3, 1, 0).unwrap().iter().map(|n| n.index).collect();
    assert_eq!(three, vec![2, 4, 0]);
}

#[test]
fn k_nearest_needs_enough_samples_outside_window() {
    let data = [0.0, 0.1, 0.2, 0.3, 0.4];
    let index = NeighbourSearchIndex::new(&data).unwrap();
    assert!(matches!(index.k_nearest(3, 2, 1), Err(InfoError::InsufficientData { .. })));
    assert!(matches!(index.k_nearest(0, 2, 0), Err(InfoError::Configuration { .. })));
    assert_eq!(index.k_nearest(2, 2, 1).unwrap().len(), 2);
}

#[test]
fn construction_rejects_short_or_non_finite_data() {
    assert!(matches!(NeighbourSearchIndex::new(&[1.0]), Err(InfoError::InsufficientData { .. })));
    assert!(matches!(NeighbourSearchIndex::new(&[1.0, f64::NAN]), Err(InfoError::Configuration { .. })));
}

#[test]
fn count_within_r_respects_edge_inclusion() {
    let data = [0.0, 0.5, 1.0, 1.5, 3.0];
    let index = NeighbourSearchIndex::new(&data).unwrap();
    assert_eq!(index.count_within_r(0, 1.0, false), 1);
    assert_eq!(index.count_within_r(0, 1.0, true), 2);
    assert_eq!(index.count_within_r_excluding(0, 2.0, 1, true), 2);
    assert_eq!(index.count_within_r(4, 1.0, true), 0);
}

#[test]
fn count_within_r_of_value_counts_points_around_an_outside_value() {
    let data = [0.0, 0.5, 1.0, 1.5, 3.0];
    let index = NeighbourSearchIndex::new(&data).unwrap();
    assert_eq!(index.count_within_r_of_value(1.25, 0.25, true), 2);
    assert_eq!(index.count_within_r_of_value(1.25, 0.25, false), 0);
    assert_eq!(index.count_within_r_of_value(10.0, 1.0, true), 0);
}

#[test]
fn masked_count_only_admits_flagged_samples() {
    let data = [0.0, 0.5, 1.0, 1.5, 3.0];
    let index = NeighbourSearchIndex::new(&data).unwrap();
    let mask = [true, false, true, true, true];
    assert_eq!(index.count_within_r_masked(2, 0.5, 0, true, &mask), 1);
    assert_eq!(index.count_within_r_masked(2, 0.5, 0, false, &mask), 0);
    // Sample 3 falls inside the window once it covers one step.
    assert_eq!(index.count_within_r_masked(2, 0.5, 1, true, &mask), 0);
    let all = [true; 5];
    assert_eq!(
        index.count_within_r_masked(2, 0.5, 0, true, &all),
        index.count_within_r_excluding(2, 0.5, 0, true)
    );
}

#[test]
fn find_within_r_returns_original_indices() {
    let data = [0.0, 0.5, 1.0, 1.5, 3.0];
    let index = NeighbourSearchIndex::new(&data).unwrap();
    let mut found: Vec<usize> = index.find_within_r(2, 0.5, 0, true).iter().map(|n| n.index).collect();
    found.sort_unstable();
    assert_eq!(found, vec![1, 3]);
    assert!(index.find_within_r(2, 0.5, 1, true).is_empty());
}

#[test]
fn nearest_neighbour_and_ranks() {
    let data = [3.0, 0.0, 2.0, 0.5];
    let index = NeighbourSearchIndex::new(&data).unwrap();
    assert_eq!(index.find_nearest(1).index, 3);
    assert_eq!(index.find_nearest(0).index, 2);
    assert_eq!(index.rank_of(0), 3);
    assert_eq!(index.index_at_rank(0), 1);
    assert_eq!(index.value(2), 2.0);
}

#[test]
fn one_sided_rank_counts() {
    let data = [0.0, 0.5, 1.0, 1.5, 3.0];
    let index = NeighbourSearchIndex::new(&data).unwrap();
    // Below sample 3 (1.5) within 0.5: 1.0; above it: 3.0.
    assert_eq!(index.count_within_r_or_larger(3, 0.5, true), 2);
    // Below sample 3 outside 0.5: 0.0 and 0.5.
    assert_eq!(index.count_smaller_and_outside_r(3, 0.5, true), 2);
}

#[test]
fn squared_euclidean_norm_uses_squared_radii() {
    let data = [0.0, 1.0, 2.0, 4.0];
    let index = NeighbourSearchIndex::new(&data).unwrap().with_norm(Norm::EuclideanSquared);
    assert_eq!(index.norm(), Norm::EuclideanSquared);
    assert_eq!(index.count_within_r(0, 4.0, true), 2);
    assert_eq!(index.count_within_r_of_value(3.0, 1.0, true), 2);
    assert_eq!(index.k_nearest(1, 3, 0).unwrap()[0].distance, 4.0);
}
