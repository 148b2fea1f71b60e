// SPDX-FileCopyrightText: 2025-2026 Carlson Büth <code@cbueth.de>
//
// SPDX-License-Identifier: MIT OR Apache-2.0

use infodynamics::estimators::auto_embed::{candidate_embeddings, select_embedding};
use infodynamics::{AutoEmbed, BiasCorrection, Calculator, Embedding, EstimatorConfig, InfoError, MeasureKind};
use ndarray::Array1;

use crate::test_helpers::generate_gaussian_data;

/// `destination[t] = 0.8 destination[t - 2] + 0.8 source[t - 2] + noise`.
fn lag_two_system(size: usize, seed: u64) -> (Array1<f64>, Array1<f64>) {
    let noise = generate_gaussian_data(size, 2, seed);
    let source = noise.column(0).to_owned();
    let mut destination = noise.column(1).to_owned();
    for t in 2..size {
        destination[t] += 0.8 * destination[t - 2] + 0.8 * source[t - 2];
    }
    (source, destination)
}

#[test]
fn candidates_start_with_the_trivial_embedding() {
    let candidates = candidate_embeddings(3, 2);
    let expected = vec![
        Embedding::new(1, 1),
        Embedding::new(2, 1),
        Embedding::new(2, 2),
        Embedding::new(3, 1),
        Embedding::new(3, 2),
    ];
    assert_eq!(candidates, expected);
    assert!(candidate_embeddings(0, 3).is_empty());
}

#[test]
fn selection_keeps_the_first_of_equal_scores() {
    let candidates = candidate_embeddings(2, 2);
    let (best, score) = select_embedding(&candidates, |_, e| Ok(if e.history == 2 { 1.0 } else { 0.0 })).unwrap();
    assert_eq!(best, Embedding::new(2, 1));
    assert_eq!(score, 1.0);
    assert!(select_embedding(&[], |_, _| Ok(0.0)).is_err());
    let failing = select_embedding(&candidates, |i, _| {
        if i == 1 { Err(InfoError::NotEstimated) } else { Ok(0.0) }
    });
    assert_eq!(failing.unwrap_err(), InfoError::NotEstimated);
}

#[test]
fn gaussian_search_finds_lag_two_dependencies() {
    let (source, destination) = lag_two_system(3000, 12);
    let auto = AutoEmbed { max_history: 2, max_delay: 2, bias: BiasCorrection::Analytic };
    let config = EstimatorConfig::gaussian(MeasureKind::TransferEntropy).with_auto_embed(auto);
    let mut calc = Calculator::configure(config).unwrap();
    let te = calc.estimate(source, destination, &[]).unwrap();
    let selected = calc.selected_embedding().unwrap();
    assert_eq!(selected.destination, Embedding::new(2, 1));
    assert_eq!(selected.source, Embedding::new(2, 1));
    assert!(te > 0.1);
}

#[test]
fn kraskov_search_without_bias_correction() {
    let (_, destination) = lag_two_system(1500, 3);
    let auto = AutoEmbed { max_history: 2, max_delay: 1, bias: BiasCorrection::None };
    let config = EstimatorConfig::kraskov(MeasureKind::ActiveInformationStorage, 4).with_auto_embed(auto);
    let mut calc = Calculator::configure(config).unwrap();
    calc.estimate(Array1::<f64>::zeros(0), destination, &[]).unwrap();
    assert_eq!(calc.selected_embedding().unwrap().destination, Embedding::new(2, 1));
}

#[test]
fn surrogate_bias_correction_is_seeded() {
    let (source, destination) = lag_two_system(600, 8);
    let auto = AutoEmbed { max_history: 2, max_delay: 1, bias: BiasCorrection::Surrogates(5) };
    let config = EstimatorConfig::kernel(MeasureKind::TransferEntropy, 0.5).with_auto_embed(auto).with_seed(4);
    let mut first = Calculator::configure(config.clone()).unwrap();
    let mut second = Calculator::configure(config).unwrap();
    let a = first.estimate(source.clone(), destination.clone(), &[]).unwrap();
    let b = second.estimate(source, destination, &[]).unwrap();
    assert_eq!(a, b);
    assert_eq!(first.selected_embedding(), second.selected_embedding());
}

#[test]
fn invalid_searches_are_rejected() {
    let analytic = AutoEmbed { max_history: 2, max_delay: 1, bias: BiasCorrection::Analytic };
    let kraskov = EstimatorConfig::kraskov(MeasureKind::TransferEntropy, 4).with_auto_embed(analytic);
    assert!(Calculator::configure(kraskov).is_err());
    let mi = EstimatorConfig::gaussian(MeasureKind::MutualInformation).with_auto_embed(analytic);
    assert!(Calculator::configure(mi).is_err());
    let empty = AutoEmbed { max_history: 0, max_delay: 1, bias: BiasCorrection::None };
    assert!(Calculator::configure(EstimatorConfig::gaussian(MeasureKind::TransferEntropy).with_auto_embed(empty)).is_err());
}
