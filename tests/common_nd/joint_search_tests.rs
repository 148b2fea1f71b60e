// SPDX-FileCopyrightText: 2025-2026 Carlson Büth <code@cbueth.de>
//
// SPDX-License-Identifier: MIT OR Apache-2.0

use infodynamics::InfoError;
use infodynamics::estimators::approaches::common_nd::joint_search::JointSearcher;
use ndarray::{Array2, array};
use rstest::rstest;

use crate::test_helpers::generate_gaussian_data;

fn max_norm(data: &Array2<f64>, columns: &[usize], a: usize, b: usize) -> f64 {
    columns
        .iter()
        .map(|&c| (data[[a, c]] - data[[b, c]]).abs())
        .fold(0.0, f64::max)
}

fn brute_force_knn(data: &Array2<f64>, columns: &[usize], i: usize, k: usize, window: usize) -> Vec<(usize, f64)> {
    let mut candidates: Vec<(usize, f64)> = (0..data.nrows())
        .filter(|&j| j != i && i.abs_diff(j) > window)
        .map(|j| (j, max_norm(data, columns, i, j)))
        .collect();
    candidates.sort_by(|a, b| a.1.total_cmp(&b.1).then(a.0.cmp(&b.0)));
    candidates.truncate(k);
    candidates
}

#[rstest]
#[case(&[0], 3, 0)]
#[case(&[0, 1], 4, 0)]
#[case(&[0, 1, 2], 4, 5)]
#[case(&[1, 2], 1, 2)]
fn k_nearest_matches_brute_force(#[case] groups: &[usize], #[case] k: usize, #[case] window: usize) {
    let data = generate_gaussian_data(200, 4, 5);
    let searcher = JointSearcher::new(data.view(), &[1, 2, 1]).unwrap();
    let space = searcher.subspace(groups);
    for i in [0, 13, 99, 199] {
        let found = searcher.k_nearest(&space, k, i, window).unwrap();
        let expected = brute_force_knn(&data, space.columns(), i, k, window);
        let got: Vec<(usize, f64)> = found.iter().map(|n| (n.index, n.distance)).collect();
        assert_eq!(got, expected, "query {i}");
    }
}

#[test]
fn counts_match_brute_force() {
    let data = generate_gaussian_data(150, 3, 9);
    let searcher = JointSearcher::new(data.view(), &[2, 1]).unwrap();
    let space = searcher.full();
    let r = 0.6;
    for i in [0, 42, 149] {
        for inclusive in [false, true] {
            let expected = (0..data.nrows())
                .filter(|&j| j != i && i.abs_diff(j) > 1)
                .filter(|&j| {
                    let d = max_norm(&data, space.columns(), i, j);
                    if inclusive { d <= r } else { d < r }
                })
                .count();
            assert_eq!(searcher.count_within_r(&space, i, r, inclusive, 1, None), expected);
            assert_eq!(searcher.find_within_r(&space, i, r, inclusive, 1).len(), expected);
        }
    }
}

#[test]
fn mask_excludes_samples_from_counts() {
    let data = array![[0.0, 0.0], [0.1, 0.1], [0.2, 0.2], [5.0, 5.0]];
    let searcher = JointSearcher::new(data.view(), &[1, 1]).unwrap();
    let space = searcher.full();
    assert_eq!(searcher.count_within_r(&space, 0, 0.5, true, 0, None), 2);
    let mask = [true, false, true, true];
    assert_eq!(searcher.count_within_r(&space, 0, 0.5, true, 0, Some(&mask)), 1);
}

#[rstest]
#[case(0, false)]
#[case(2, true)]
#[case(3, false)]
fn single_column_counts_match_brute_force(#[case] window: usize, #[case] inclusive: bool) {
    let data = generate_gaussian_data(120, 3, 21);
    let searcher = JointSearcher::new(data.view(), &[1, 2]).unwrap();
    let space = searcher.subspace(&[0]);
    let mask: Vec<bool> = (0..data.nrows()).map(|j| j % 3 != 1).collect();
    let r = 0.4;
    for i in [0, 57, 119] {
        let within = |j: usize| {
            let d = max_norm(&data, space.columns(), i, j);
            j != i && i.abs_diff(j) > window && if inclusive { d <= r } else { d < r }
        };
        let expected = (0..data.nrows()).filter(|&j| within(j)).count();
        let expected_masked = (0..data.nrows()).filter(|&j| within(j) && mask[j]).count();
        assert_eq!(searcher.count_within_r(&space, i, r, inclusive, window, None), expected);
        assert_eq!(searcher.count_within_r(&space, i, r, inclusive, window, Some(&mask)), expected_masked);
    }
}

#[test]
fn group_distances_are_per_group_max_norms() {
    let data = array![[0.0, 1.0, 2.0], [0.5, -1.0, 2.25]];
    let searcher = JointSearcher::new(data.view(), &[2, 1]).unwrap();
    assert_eq!(searcher.num_groups(), 2);
    assert_eq!(searcher.group_distances(0, 1), vec![2.0, 0.25]);
    assert_eq!(searcher.group_distance(1, 0, 1), 0.25);
    assert_eq!(searcher.subspace(&[1]).columns(), &[2]);
    assert_eq!(searcher.full().dims(), 3);
}

#[test]
fn group_dims_must_cover_columns() {
    let data = generate_gaussian_data(10, 3, 1);
    assert!(matches!(JointSearcher::new(data.view(), &[1, 1]), Err(InfoError::Configuration { .. })));
    assert!(matches!(JointSearcher::new(data.view(), &[3, 0]), Err(InfoError::Configuration { .. })));
    assert_eq!(JointSearcher::new(data.view(), &[3]).unwrap().len(), 10);
}
