// SPDX-FileCopyrightText: 2025-2026 Carlson Büth <code@cbueth.de>
//
// SPDX-License-Identifier: MIT OR Apache-2.0

use infodynamics::InfoError;
use infodynamics::TeEmbedding;
use infodynamics::estimators::approaches::kernel::{KernelEntropy, KernelMutualInformation, KernelParams};
use infodynamics::estimators::entropy::Entropy;
use infodynamics::estimators::mutual_information::MutualInformation;
use infodynamics::estimators::traits::{GlobalValue, LocalValues, SurrogateMeasure};
use infodynamics::estimators::transfer_entropy::TransferEntropy;
use ndarray::{Array1, Array2};
use rstest::rstest;

use crate::test_helpers::{assert_abs_diff_eq, correlated_pair, coupled_series, generate_uniform_data};

#[test]
fn entropy_locals_from_hand_counted_boxes() {
    let data = Array1::from(vec![0.0, 0.1, 0.2, 1.0, 5.0]);
    let h = KernelEntropy::new(data, KernelParams::new(0.15)).unwrap();
    let counts = [2.0, 3.0, 2.0, 1.0, 1.0];
    let expected: Vec<f64> = counts.iter().map(|&c: &f64| -(c / 5.0f64).ln() + 0.3f64.ln()).collect();
    let locals = h.local_values();
    for (got, want) in locals.iter().zip(&expected) {
        assert_abs_diff_eq!(*got, *want, epsilon = 1e-12);
    }
    assert_abs_diff_eq!(h.global_value(), expected.iter().sum::<f64>() / 5.0, epsilon = 1e-12);
}

#[test]
fn exclusion_window_shrinks_admissible_totals() {
    let data = Array1::from(vec![0.0, 0.1, 0.2, 1.0, 5.0]);
    let h = KernelEntropy::new(data, KernelParams::new(0.15).with_exclusion_window(1)).unwrap();
    // Neighbours at lag 1 no longer count; totals are 4, 3, 3, 3, 4.
    let totals = [4.0, 3.0, 3.0, 3.0, 4.0];
    for (got, total) in h.local_values().iter().zip(totals) {
        assert_abs_diff_eq!(*got, -(1.0f64 / total).ln() + 0.3f64.ln(), epsilon = 1e-12);
    }
}

#[test]
fn entropy_of_uniform_cube_is_near_zero() {
    let data = generate_uniform_data(4000, 2, 6);
    let h = Entropy::new_kernel(data, 0.05).unwrap();
    // Edge effects bias the box estimate upwards by a few percent.
    assert_abs_diff_eq!(h.global_value(), 0.0, epsilon = 0.1);
}

#[rstest]
#[case(vec![0.0, 0.0, 1.0, 1.0], vec![0.0, 0.0, 1.0, 1.0], std::f64::consts::LN_2)]
#[case(vec![0.0, 0.0, 1.0, 1.0], vec![0.0, 1.0, 0.0, 1.0], 0.0)]
fn mi_of_separated_clusters(#[case] x: Vec<f64>, #[case] y: Vec<f64>, #[case] expected: f64) {
    let mi = KernelMutualInformation::new(Array1::from(x), Array1::from(y), KernelParams::new(0.5)).unwrap();
    assert_abs_diff_eq!(mi.global_value(), expected, epsilon = 1e-12);
}

#[test]
fn mi_grows_with_correlation() {
    let (x0, y0) = correlated_pair(1500, 0.0, 8);
    let (x1, y1) = correlated_pair(1500, 0.8, 8);
    let weak = MutualInformation::new_kernel(x0, y0, 0.3, 0).unwrap().global_value();
    let strong = MutualInformation::new_kernel(x1, y1, 0.3, 0).unwrap().global_value();
    assert!(strong > weak + 0.3, "weak {weak}, strong {strong}");
}

#[test]
fn cmi_with_empty_conditioning_equals_mi() {
    let (x, y) = correlated_pair(400, 0.5, 2);
    let mi = MutualInformation::new_kernel(x.clone(), y.clone(), 0.4, 0).unwrap();
    let cmi = MutualInformation::new_cmi_kernel(x, y, Array2::<f64>::zeros((400, 0)), 0.4).unwrap();
    assert_eq!(mi.local_values(), cmi.local_values());
}

#[test]
fn te_detects_coupling_direction() {
    let (source, destination) = coupled_series(2000, 0.8, 10);
    let forward = TransferEntropy::new_kernel(source.clone(), destination.clone(), TeEmbedding::new(1, 1), 0.3)
        .unwrap()
        .global_value();
    let backward = TransferEntropy::new_kernel(destination, source, TeEmbedding::new(1, 1), 0.3)
        .unwrap()
        .global_value();
    assert!(forward > 0.1, "forward {forward}");
    assert!(forward > backward + 0.08, "forward {forward}, backward {backward}");
}

#[test]
fn surrogates_reorder_only_the_source() {
    let (x, y) = correlated_pair(300, 0.9, 4);
    let mi = KernelMutualInformation::new(x, y, KernelParams::new(0.3)).unwrap();
    let identity: Vec<usize> = (0..300).collect();
    assert_eq!(mi.with_source_ordering(&identity).unwrap(), mi.observed());
    let reversed: Vec<usize> = (0..300).rev().collect();
    assert!(mi.with_source_ordering(&reversed).unwrap() < mi.observed());
}

#[rstest]
#[case(0.0)]
#[case(-1.0)]
#[case(f64::NAN)]
fn invalid_widths_are_rejected(#[case] width: f64) {
    let data = Array1::from(vec![0.0, 1.0, 2.0]);
    assert!(matches!(KernelEntropy::new(data, KernelParams::new(width)), Err(InfoError::Configuration { .. })));
}
