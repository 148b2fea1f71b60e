// SPDX-FileCopyrightText: 2025-2026 Carlson Büth <code@cbueth.de>
//
// SPDX-License-Identifier: MIT OR Apache-2.0

use infodynamics::InfoError;
use infodynamics::estimators::approaches::discrete::DiscreteEntropy;
use infodynamics::estimators::entropy::Entropy;
use infodynamics::estimators::traits::{GlobalValue, LocalValues};
use ndarray::{Array1, array};
use rstest::rstest;

use crate::test_helpers::{assert_abs_diff_eq, random_symbols};

#[rstest]
#[case(array![0, 0, 0, 0], 0.0)]
#[case(array![0, 0, 1, 1], 2.0f64.ln())]
#[case(array![0, 1, 2, 3], 4.0f64.ln())]
#[case(array![7, 7, 7, -2], -(0.75f64 * 0.75f64.ln() + 0.25 * 0.25f64.ln()))]
fn plug_in_entropy(#[case] data: Array1<i32>, #[case] expected: f64) {
    let h = Entropy::new_discrete(data).unwrap();
    assert_abs_diff_eq!(h.global_value(), expected, epsilon = 1e-12);
    assert_abs_diff_eq!(h.global_from_local(), expected, epsilon = 1e-12);
}

#[test]
fn local_values_are_surprisals() {
    let h = DiscreteEntropy::new(array![0, 0, 0, 1]).unwrap();
    let locals = h.local_values();
    assert_abs_diff_eq!(locals[0], -(0.75f64).ln(), epsilon = 1e-12);
    assert_abs_diff_eq!(locals[3], 4.0f64.ln(), epsilon = 1e-12);
    assert_eq!(h.support_size(), 2);
}

#[test]
fn multivariate_symbols_use_joint_states() {
    let rows = array![[0, 1], [1, 0], [0, 1], [1, 1]];
    let h = DiscreteEntropy::new(rows).unwrap();
    assert_eq!(h.support_size(), 3);
    let expected = -(0.5f64 * 0.5f64.ln() + 2.0 * 0.25 * 0.25f64.ln());
    assert_abs_diff_eq!(h.global_value(), expected, epsilon = 1e-12);
}

#[test]
fn uniform_symbols_approach_log_alphabet() {
    let h = DiscreteEntropy::new(random_symbols(20_000, 8, 5)).unwrap();
    assert_abs_diff_eq!(h.global_value(), 8.0f64.ln(), epsilon = 0.01);
}

#[test]
fn empty_data_is_rejected() {
    let result = DiscreteEntropy::new(Array1::<i32>::zeros(0));
    assert!(matches!(result, Err(InfoError::InsufficientData { .. })));
}
