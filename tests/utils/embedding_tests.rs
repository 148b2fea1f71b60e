// SPDX-FileCopyrightText: 2025-2026 Carlson Büth <code@cbueth.de>
//
// SPDX-License-Identifier: MIT OR Apache-2.0

use infodynamics::estimators::utils::embedding::{
    ais_observations, embed, first_next_index, lagged_pairs, te_observations,
};
use infodynamics::{ConditionalEmbedding, Embedding, InfoError, TeEmbedding};
use ndarray::{Array2, array};
use rstest::rstest;

fn ramp(n: usize) -> Array2<i32> {
    Array2::from_shape_fn((n, 1), |(t, _)| t as i32)
}

#[test]
fn past_vectors_are_oldest_first() {
    let series = ramp(10);
    let past = embed(series.view(), Embedding::new(3, 2), 1, 5..7);
    assert_eq!(past, array![[0, 2, 4], [1, 3, 5]]);
}

#[test]
fn multivariate_past_keeps_dimensions_together() {
    let series = Array2::from_shape_fn((6, 2), |(t, d)| (10 * t + d) as i32);
    let past = embed(series.view(), Embedding::new(2, 1), 1, 2..3);
    assert_eq!(past, array![[0, 1, 10, 11]]);
}

#[rstest]
#[case(Embedding::new(1, 1), 1, 1)]
#[case(Embedding::new(3, 1), 1, 3)]
#[case(Embedding::new(3, 2), 1, 5)]
#[case(Embedding::new(2, 4), 3, 7)]
fn first_usable_index(#[case] embedding: Embedding, #[case] lag: usize, #[case] expected: usize) {
    assert_eq!(first_next_index(embedding, lag), expected);
}

#[test]
fn ais_pairs_past_with_next() {
    let obs = ais_observations(ramp(8).view(), Embedding::new(2, 2)).unwrap();
    assert_eq!(obs.next.column(0).to_vec(), vec![3, 4, 5, 6, 7]);
    assert_eq!(obs.past.row(0).to_vec(), vec![0, 2]);
    assert_eq!(obs.past.row(4).to_vec(), vec![4, 6]);

    let short = ais_observations(ramp(3).view(), Embedding::new(2, 2));
    assert!(matches!(short, Err(InfoError::InsufficientData { .. })));
    assert!(ais_observations(ramp(5).view(), Embedding::new(0, 1)).is_err());
}

#[test]
fn te_alignment_with_source_delay() {
    let source = ramp(10) * 100;
    let destination = ramp(10);
    let embedding = TeEmbedding::new(2, 1).with_source_delay(3);
    let obs = te_observations(source.view(), destination.view(), &[], &embedding).unwrap();
    // start = max(1 + 1, 0 + 3)
    assert_eq!(obs.len(), 7);
    assert_eq!(obs.dest_next.column(0).to_vec(), (3..10).collect::<Vec<_>>());
    assert_eq!(obs.dest_past.row(0).to_vec(), vec![1, 2]);
    assert_eq!(obs.source_past.row(0).to_vec(), vec![0]);
    assert!(obs.conditionals.is_empty());
    assert_eq!(obs.conditioning().unwrap(), obs.dest_past);
}

#[test]
fn conditionals_can_push_the_start_later() {
    let source = ramp(12);
    let destination = ramp(12);
    let conditional = ramp(12) * -1;
    let embedding = TeEmbedding::new(1, 1).with_conditional(ConditionalEmbedding::new(2, 3, 2));
    let obs = te_observations(source.view(), destination.view(), &[conditional.view()], &embedding).unwrap();
    // conditional: span 3 + lag 2
    assert_eq!(obs.dest_next[(0, 0)], 5);
    assert_eq!(obs.conditionals[0].row(0).to_vec(), vec![0, -3]);
    assert_eq!(obs.conditioning().unwrap().row(0).to_vec(), vec![4, 0, -3]);
    assert_eq!(obs.len(), 7);
}

#[test]
fn te_rejects_mismatched_inputs() {
    let series = ramp(10);
    let embedding = TeEmbedding::new(1, 1);
    let extra = te_observations(series.view(), series.view(), &[series.view()], &embedding);
    assert!(matches!(extra, Err(InfoError::Configuration { .. })));

    let shorter = ramp(9);
    assert!(te_observations(series.view(), shorter.view(), &[], &embedding).is_err());

    let long_history = TeEmbedding::new(10, 1);
    assert!(matches!(
        te_observations(series.view(), series.view(), &[], &long_history),
        Err(InfoError::InsufficientData { .. })
    ));
}

#[test]
fn lagged_pairs_shift_the_second_series() {
    let x = ramp(6);
    let y = ramp(6) * 10;
    let (xs, ys) = lagged_pairs(x.view(), y.view(), 2).unwrap();
    assert_eq!(xs.column(0).to_vec(), vec![0, 1, 2, 3]);
    assert_eq!(ys.column(0).to_vec(), vec![20, 30, 40, 50]);

    let (same_x, same_y) = lagged_pairs(x.view(), y.view(), 0).unwrap();
    assert_eq!(same_x, x);
    assert_eq!(same_y, y);
    assert!(lagged_pairs(x.view(), y.view(), 6).is_err());
}
