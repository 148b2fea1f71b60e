// SPDX-FileCopyrightText: 2025-2026 Carlson Büth <code@cbueth.de>
//
// SPDX-License-Identifier: MIT OR Apache-2.0

use infodynamics::estimators::active_information::ActiveInformation;
use infodynamics::estimators::approaches::discrete::{DiscreteConditionalMutualInformation, DiscreteTransferEntropy};
use infodynamics::estimators::mutual_information::MutualInformation;
use infodynamics::estimators::traits::{AnalyticNull, GlobalValue, LocalValues, SurrogateMeasure};
use infodynamics::estimators::transfer_entropy::TransferEntropy;
use infodynamics::{ConditionalEmbedding, Embedding, TeEmbedding};
use ndarray::{Array1, Array2, array};

use crate::test_helpers::{assert_abs_diff_eq, random_symbols};

#[test]
fn common_cause_is_explained_away() {
    let z = random_symbols(1000, 2, 1);
    let cmi = MutualInformation::new_cmi_discrete(z.clone(), z.clone(), z.clone()).unwrap();
    assert_abs_diff_eq!(cmi.global_value(), 0.0, epsilon = 1e-12);
    let mi = MutualInformation::new_discrete(z.clone(), z, 0).unwrap();
    assert!(mi.global_value() > 0.6);
}

#[test]
fn empty_conditioning_equals_mi() {
    let x = random_symbols(400, 3, 4);
    let y: Array1<i32> = x.iter().zip(random_symbols(400, 2, 5).iter()).map(|(a, b)| a * b).collect();
    let mi = MutualInformation::new_discrete(x.clone(), y.clone(), 0).unwrap();
    let cmi = DiscreteConditionalMutualInformation::new(x, y, Array2::<i32>::zeros((400, 0))).unwrap();
    assert_abs_diff_eq!(cmi.global_value(), mi.global_value(), epsilon = 1e-12);
}

#[test]
fn cmi_degrees_of_freedom_use_observed_states() {
    let x = array![0, 1, 0, 1, 0, 1, 0, 1];
    let y = array![0, 1, 2, 0, 1, 2, 0, 1];
    let z = array![3, 3, 5, 5, 7, 7, 9, 9];
    let cmi = DiscreteConditionalMutualInformation::new(x, y, z).unwrap();
    assert_eq!(cmi.alphabet_sizes(), [2, 3, 4]);
    assert_eq!(cmi.degrees_of_freedom(), 8);
}

#[test]
fn te_of_copied_symbols() {
    let source = random_symbols(5000, 2, 10);
    let mut destination = Array1::zeros(5000);
    for t in 1..5000 {
        destination[t] = source[t - 1];
    }
    let forward = TransferEntropy::new_discrete(source.clone(), destination.clone(), TeEmbedding::new(1, 1)).unwrap();
    assert_abs_diff_eq!(forward.global_value(), 2.0f64.ln(), epsilon = 0.01);
    assert_abs_diff_eq!(forward.global_value(), forward.global_from_local(), epsilon = 1e-12);
    let backward = TransferEntropy::new_discrete(destination, source, TeEmbedding::new(1, 1)).unwrap();
    assert_abs_diff_eq!(backward.global_value(), 0.0, epsilon = 0.01);
}

#[test]
fn conditioning_on_the_source_itself_removes_transfer() {
    let source = random_symbols(2000, 2, 12);
    let mut destination = Array1::zeros(2000);
    for t in 1..2000 {
        destination[t] = source[t - 1];
    }
    let embedding = TeEmbedding::new(1, 1).with_conditional(ConditionalEmbedding::new(1, 1, 1));
    let cte = TransferEntropy::new_cte_discrete(source.clone(), destination, vec![source], embedding).unwrap();
    assert_abs_diff_eq!(cte.global_value(), 0.0, epsilon = 1e-12);
}

#[test]
fn surrogates_shuffle_only_the_source_past() {
    let source = random_symbols(1000, 2, 3);
    let mut destination = Array1::zeros(1000);
    for t in 1..1000 {
        destination[t] = source[t - 1];
    }
    let te = DiscreteTransferEntropy::new(source, destination, TeEmbedding::new(1, 1)).unwrap();
    let n = te.num_observations();
    assert_eq!(n, 999);
    let identity: Vec<usize> = (0..n).collect();
    assert_eq!(te.with_source_ordering(&identity).unwrap(), te.observed());
    let shifted: Vec<usize> = (0..n).map(|i| (i + 1) % n).collect();
    assert!(te.with_source_ordering(&shifted).unwrap() < 0.05);
    assert_eq!(te.degrees_of_freedom(), 2);
}

#[test]
fn ais_of_periodic_series() {
    let series: Array1<i32> = (0..101).map(|t| t % 2).collect();
    let ais = ActiveInformation::new_discrete(series, Embedding::new(1, 1)).unwrap();
    assert_abs_diff_eq!(ais.global_value(), 2.0f64.ln(), epsilon = 1e-12);
    let longer = ActiveInformation::new_discrete(random_symbols(3000, 3, 6), Embedding::new(2, 2)).unwrap();
    assert_abs_diff_eq!(longer.global_value(), 0.0, epsilon = 0.02);
}

#[test]
fn te_with_sparse_symbol_codes_matches_dense_codes() {
    let dense_source = random_symbols(2000, 3, 21);
    let sparse_source = dense_source.mapv(|s| [-40, 9, 1_000_000][s as usize]);
    let mut destination = Array1::zeros(2000);
    for t in 1..2000 {
        destination[t] = dense_source[t - 1] % 2;
    }
    let sparse_destination = destination.mapv(|s: i32| s * 70_000);
    let dense = TransferEntropy::new_discrete(dense_source, destination, TeEmbedding::new(1, 1)).unwrap();
    let sparse = TransferEntropy::new_discrete(sparse_source, sparse_destination, TeEmbedding::new(1, 1)).unwrap();
    assert_abs_diff_eq!(sparse.global_value(), dense.global_value(), epsilon = 1e-12);
    // (3 - 1)(2 - 1) * 2 destination past states
    assert_eq!(sparse.degrees_of_freedom(), 4);
}
