// SPDX-FileCopyrightText: 2025-2026 Carlson Büth <code@cbueth.de>
//
// SPDX-License-Identifier: MIT OR Apache-2.0

use infodynamics::estimators::active_information::ActiveInformation;
use infodynamics::estimators::approaches::kraskov::{KraskovTransferEntropy, KsgParams};
use infodynamics::estimators::significance::{generate_permutations, permutation_test};
use infodynamics::estimators::traits::{GlobalValue, LocalValues};
use infodynamics::estimators::transfer_entropy::TransferEntropy;
use infodynamics::{ConditionalEmbedding, Embedding, InfoError, KsgAlgorithm, PValuePolicy, TeEmbedding};
use rstest::rstest;

use crate::test_helpers::{
    SeedableRng, StdRng, ar1_series, assert_abs_diff_eq, coupled_series, gaussian_mi, generate_gaussian_data,
};

#[rstest]
#[case(KsgAlgorithm::One)]
#[case(KsgAlgorithm::Two)]
fn te_detects_coupling_direction(#[case] algorithm: KsgAlgorithm) {
    let (source, destination) = coupled_series(2000, 0.8, 7);
    let forward = TransferEntropy::new_kraskov(source.clone(), destination.clone(), TeEmbedding::new(1, 1), 4, algorithm)
        .unwrap()
        .global_value();
    let backward = TransferEntropy::new_kraskov(destination, source, TeEmbedding::new(1, 1), 4, algorithm)
        .unwrap()
        .global_value();
    // I(x_t; y_{t+1}) = 0.5 ln(1 + c^2)
    assert_abs_diff_eq!(forward, 0.5 * (1.64f64).ln(), epsilon = 0.06);
    assert_abs_diff_eq!(backward, 0.0, epsilon = 0.04);
}

#[test]
fn te_locals_cover_every_embedded_sample() {
    let (source, destination) = coupled_series(500, 0.5, 1);
    let embedding = TeEmbedding::new(3, 2).with_source(2, 2);
    let te = KraskovTransferEntropy::new(source, destination, embedding, KsgParams::new(4)).unwrap();
    // First next index is max((3-1)*1 + 1, (2-1)*2 + 1) = 3.
    assert_eq!(te.local_values().len(), 497);
    assert_abs_diff_eq!(te.global_value(), te.global_from_local(), epsilon = 1e-12);
}

#[test]
fn conditioning_on_an_unrelated_series_keeps_transfer() {
    let (source, destination) = coupled_series(2000, 0.8, 5);
    let unrelated = generate_gaussian_data(2000, 1, 99).column(0).to_owned();
    let te = TransferEntropy::new_kraskov(source.clone(), destination.clone(), TeEmbedding::new(1, 1), 4, KsgAlgorithm::One)
        .unwrap()
        .global_value();
    let embedding = TeEmbedding::new(1, 1).with_conditional(ConditionalEmbedding::new(1, 1, 1));
    let cte = TransferEntropy::new_cte_kraskov(source, destination, vec![unrelated], embedding, 4, KsgAlgorithm::One)
        .unwrap()
        .global_value();
    assert_abs_diff_eq!(cte, te, epsilon = 0.06);
}

#[test]
fn conditional_series_must_match_embeddings() {
    let (source, destination) = coupled_series(200, 0.8, 5);
    let result = TransferEntropy::new_cte_kraskov(
        source.clone(),
        destination,
        vec![source],
        TeEmbedding::new(1, 1),
        4,
        KsgAlgorithm::One,
    );
    assert!(matches!(result, Err(InfoError::Configuration { .. })));
}

#[test]
fn coupled_te_is_significant_and_reproducible() {
    let (source, destination) = coupled_series(600, 0.8, 3);
    let te = KraskovTransferEntropy::new(source, destination, TeEmbedding::new(1, 1), KsgParams::new(4)).unwrap();
    let orderings = generate_permutations(599, 25, &mut StdRng::seed_from_u64(11));
    let first = permutation_test(&te, &orderings, PValuePolicy::GreaterOrEqual).unwrap();
    let second = permutation_test(&te, &orderings, PValuePolicy::GreaterOrEqual).unwrap();
    assert_eq!(first, second);
    assert_eq!(first.p_value(), 0.0);
    assert_eq!(first.num_draws(), 25);
}

#[test]
fn ais_of_ar1_process() {
    let series = ar1_series(3000, 0.8, 13);
    let ais = ActiveInformation::new_kraskov(series, Embedding::new(1, 1), 4, KsgAlgorithm::One).unwrap();
    assert_abs_diff_eq!(ais.global_value(), gaussian_mi(0.8), epsilon = 0.06);
}

#[test]
fn ais_of_white_noise_is_near_zero() {
    let series = generate_gaussian_data(2000, 1, 4);
    let ais = ActiveInformation::new_kraskov(series, Embedding::new(2, 1), 4, KsgAlgorithm::Two).unwrap();
    assert_abs_diff_eq!(ais.global_value(), 0.0, epsilon = 0.05);
}
