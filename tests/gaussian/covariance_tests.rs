// SPDX-FileCopyrightText: 2025-2026 Carlson Büth <code@cbueth.de>
//
// SPDX-License-Identifier: MIT OR Apache-2.0

use infodynamics::InfoError;
use infodynamics::estimators::approaches::gaussian::Covariance;
use ndarray::{Array2, array};
use rstest::rstest;

use crate::test_helpers::{assert_abs_diff_eq, generate_gaussian_data};

#[test]
fn sample_covariance_uses_unbiased_denominator() {
    let data = array![[1.0, 2.0], [3.0, 6.0], [5.0, 7.0]];
    let cov = Covariance::from_samples(data.view()).unwrap();
    let m = cov.to_array2();
    assert_abs_diff_eq!(m[(0, 0)], 4.0, epsilon = 1e-12);
    assert_abs_diff_eq!(m[(1, 1)], 7.0, epsilon = 1e-12);
    assert_abs_diff_eq!(m[(0, 1)], 5.0, epsilon = 1e-12);
    assert_abs_diff_eq!(m[(1, 0)], 5.0, epsilon = 1e-12);
    assert_eq!(cov.observations(), 3);
    assert_eq!(cov.dims(), 2);
}

#[test]
fn supplied_matrix_matches_sample_estimate() {
    let data = generate_gaussian_data(400, 3, 14);
    let from_samples = Covariance::from_samples(data.view()).unwrap();
    let from_matrix = Covariance::from_matrix(from_samples.to_array2().view(), 400).unwrap();
    let all = [0, 1, 2];
    assert_abs_diff_eq!(from_samples.log_det(&all).unwrap(), from_matrix.log_det(&all).unwrap(), epsilon = 1e-12);
}

#[test]
fn log_det_of_diagonal_matrix() {
    let m = array![[2.0, 0.0, 0.0], [0.0, 3.0, 0.0], [0.0, 0.0, 5.0]];
    let cov = Covariance::from_matrix(m.view(), 10).unwrap();
    assert_abs_diff_eq!(cov.log_det(&[0, 1, 2]).unwrap(), 30.0f64.ln(), epsilon = 1e-12);
    assert_abs_diff_eq!(cov.log_det(&[2, 0]).unwrap(), 10.0f64.ln(), epsilon = 1e-12);
    assert_eq!(cov.log_det(&[]).unwrap(), 0.0);
    assert!(matches!(cov.log_det(&[3]), Err(InfoError::InvalidCovariance(_))));
}

#[rstest]
#[case::not_square(Array2::from_elem((2, 3), 0.5))]
#[case::asymmetric(array![[1.0, 0.5], [0.4, 1.0]])]
#[case::not_positive_definite(array![[1.0, 2.0], [2.0, 1.0]])]
#[case::singular(array![[1.0, 1.0], [1.0, 1.0]])]
#[case::non_finite(array![[1.0, f64::NAN], [f64::NAN, 1.0]])]
fn invalid_matrices_are_rejected(#[case] matrix: Array2<f64>) {
    assert!(matches!(Covariance::from_matrix(matrix.view(), 100), Err(InfoError::InvalidCovariance(_))));
}

#[test]
fn too_few_observations() {
    let m = array![[1.0]];
    assert!(matches!(Covariance::from_matrix(m.view(), 1), Err(InfoError::InsufficientData { .. })));
    let data = array![[1.0, 2.0]];
    assert!(matches!(Covariance::from_samples(data.view()), Err(InfoError::InsufficientData { .. })));
}
