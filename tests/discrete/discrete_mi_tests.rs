// SPDX-FileCopyrightText: 2025-2026 Carlson Büth <code@cbueth.de>
//
// SPDX-License-Identifier: MIT OR Apache-2.0

use infodynamics::estimators::approaches::discrete::{DiscreteMutualInformation, MutualInformationDiscrete};
use infodynamics::estimators::mutual_information::MutualInformation;
use infodynamics::estimators::significance::{analytic_test, generate_permutations, permutation_test};
use infodynamics::estimators::traits::{AnalyticNull, GlobalValue, LocalValues, SurrogateMeasure};
use infodynamics::{InfoError, PValuePolicy};
use ndarray::{Array1, array};

use crate::test_helpers::{SeedableRng, StdRng, assert_abs_diff_eq, random_symbols};

#[test]
fn identical_binary_series_share_one_bit() {
    let x = array![0, 1, 0, 1, 1, 0, 0, 1];
    let mi = MutualInformation::new_discrete(x.clone(), x, 0).unwrap();
    assert_abs_diff_eq!(mi.global_value(), 2.0f64.ln(), epsilon = 1e-12);
    assert!(mi.local_values().iter().all(|&v| (v - 2.0f64.ln()).abs() < 1e-12));
}

#[test]
fn balanced_independent_table_has_zero_mi() {
    let mi = DiscreteMutualInformation::new(array![0, 0, 1, 1], array![0, 1, 0, 1]).unwrap();
    assert_abs_diff_eq!(mi.global_value(), 0.0, epsilon = 1e-12);
}

#[test]
fn mi_is_symmetric() {
    let x = random_symbols(1000, 3, 1);
    let y: Array1<i32> = x.iter().zip(random_symbols(1000, 2, 2).iter()).map(|(a, b)| (a + b) % 4).collect();
    let xy = DiscreteMutualInformation::new(x.clone(), y.clone()).unwrap();
    let yx = DiscreteMutualInformation::new(y, x).unwrap();
    assert_abs_diff_eq!(xy.global_value(), yx.global_value(), epsilon = 1e-12);
}

#[test]
fn independent_series_have_near_zero_mi() {
    let mi = DiscreteMutualInformation::new(random_symbols(20_000, 4, 3), random_symbols(20_000, 4, 4)).unwrap();
    assert_abs_diff_eq!(mi.global_value(), 0.0, epsilon = 0.002);
}

#[test]
fn states_matrix_with_time_lag() {
    // Pairs (col0[t-1], col1[t]) for t >= 1: (0,0) (1,1) (0,0) (1,1) (0,0).
    let states = array![[0, 1], [1, 0], [0, 1], [1, 0], [0, 1], [1, 0]];
    let mut calc = MutualInformationDiscrete::new(2, 2, 1).unwrap();
    let locals = calc.compute_local_from_states(states.view(), 0, 1).unwrap();
    assert_eq!(calc.observations(), 5);
    let (l0, l1) = (-(0.6f64).ln(), -(0.4f64).ln());
    let expected = [0.0, l0, l1, l0, l1, l0];
    for (got, want) in locals.iter().zip(expected) {
        assert_abs_diff_eq!(*got, want, epsilon = 1e-12);
    }
    let h = -(0.6f64 * 0.6f64.ln() + 0.4 * 0.4f64.ln());
    assert_abs_diff_eq!(calc.compute_average_local_of_observations(), h, epsilon = 1e-12);
}

#[test]
fn observations_accumulate_until_initialised() {
    let mut calc = MutualInformationDiscrete::new(2, 2, 0).unwrap();
    calc.add_observations(array![0, 1].view(), array![0, 1].view()).unwrap();
    calc.add_observations(array![0, 1].view(), array![1, 0].view()).unwrap();
    assert_eq!(calc.observations(), 4);
    assert_abs_diff_eq!(calc.global_value(), 0.0, epsilon = 1e-12);
    calc.initialise();
    assert_eq!(calc.observations(), 0);
    assert_eq!(calc.global_value(), 0.0);
}

#[test]
fn local_lookups_reject_unknown_pairs() {
    let mut calc = MutualInformationDiscrete::new(3, 2, 0).unwrap();
    calc.add_observations(array![0, 1].view(), array![0, 1].view()).unwrap();
    assert!(calc.compute_local_from_previous_observations(0, 0).is_ok());
    assert!(matches!(calc.compute_local_from_previous_observations(2, 0), Err(InfoError::Configuration { .. })));
    assert!(matches!(calc.compute_local_from_previous_observations(0, 5), Err(InfoError::Configuration { .. })));
}

#[test]
fn invalid_inputs_are_rejected() {
    assert!(MutualInformationDiscrete::new(0, 2, 0).is_err());
    let mut calc = MutualInformationDiscrete::new(2, 2, 0).unwrap();
    assert!(calc.add_observations(array![0, 2].view(), array![0, 1].view()).is_err());
    assert!(calc.add_observations(array![0, 1, 0].view(), array![0, 1].view()).is_err());
    let mut lagged = MutualInformationDiscrete::new(2, 2, 3).unwrap();
    assert!(matches!(
        lagged.add_observations(array![0, 1, 0].view(), array![0, 1, 0].view()),
        Err(InfoError::InsufficientData { .. })
    ));
    assert!(DiscreteMutualInformation::new(array![0, 1], array![0, 1, 1]).is_err());
}

#[test]
fn sparse_symbol_codes_use_distinct_alphabets() {
    let independent =
        DiscreteMutualInformation::new(array![0, 200_000, 0, 200_000], array![0, 200_000, 200_000, 0]).unwrap();
    assert_abs_diff_eq!(independent.global_value(), 0.0, epsilon = 1e-12);
    assert_eq!(independent.counts().bases(), (2, 2));
    assert_eq!(independent.degrees_of_freedom(), 1);

    let x = array![7, -3, 200_000, 7, -3, 200_000];
    let y = array![100, 5, 5, 100, 5, 5];
    let sparse = DiscreteMutualInformation::new(x, y).unwrap();
    let dense = DiscreteMutualInformation::new(array![0, 1, 2, 0, 1, 2], array![1, 0, 0, 1, 0, 0]).unwrap();
    let h_y = 3.0f64.ln() - 2.0 / 3.0 * 2.0f64.ln();
    assert_abs_diff_eq!(sparse.global_value(), h_y, epsilon = 1e-12);
    assert_abs_diff_eq!(sparse.global_value(), dense.global_value(), epsilon = 1e-12);
    assert_eq!(sparse.local_values(), dense.local_values());
    // (distinct x - 1)(distinct y - 1)
    assert_eq!(sparse.degrees_of_freedom(), 2);
}

#[test]
fn analytic_null_degrees_of_freedom() {
    let mut calc = MutualInformationDiscrete::new(2, 3, 0).unwrap();
    calc.add_observations(array![0, 1, 0, 1].view(), array![0, 1, 2, 2].view()).unwrap();
    assert_eq!(calc.degrees_of_freedom(), 2);
    assert_eq!(calc.null_observations(), 4);
}

#[test]
fn permutation_null_matches_analytic_mean() {
    let mi = DiscreteMutualInformation::new(random_symbols(2000, 4, 8), random_symbols(2000, 4, 9)).unwrap();
    let analytic = analytic_test(&mi).unwrap();
    assert_abs_diff_eq!(analytic.mean(), 9.0 / 4000.0, epsilon = 1e-15);
    let orderings = generate_permutations(mi.num_observations(), 200, &mut StdRng::seed_from_u64(1));
    let empirical = permutation_test(&mi, &orderings, PValuePolicy::GreaterOrEqual).unwrap();
    assert_abs_diff_eq!(empirical.mean(), analytic.mean(), epsilon = 5e-4);
}

#[test]
fn dependent_series_are_significant() {
    let x = random_symbols(500, 2, 21);
    let noise = random_symbols(500, 10, 22);
    let y: Array1<i32> = x.iter().zip(noise.iter()).map(|(&a, &n)| if n == 0 { 1 - a } else { a }).collect();
    let mi = DiscreteMutualInformation::new(x, y).unwrap();
    let orderings = generate_permutations(500, 50, &mut StdRng::seed_from_u64(2));
    let null = permutation_test(&mi, &orderings, PValuePolicy::PlusOne).unwrap();
    assert_abs_diff_eq!(null.p_value(), 1.0 / 51.0, epsilon = 1e-12);
    assert!(analytic_test(&mi).unwrap().p_value() < 1e-6);
}
