// SPDX-FileCopyrightText: 2025-2026 Carlson Büth <code@cbueth.de>
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Slicing of time series into the role variables of AIS, MI and TE.
//!
//! Series are `samples x dimensions` arrays. Past vectors are laid out oldest
//! first: for a history `k` with delay `tau` ending at time `t`, the columns
//! hold `x[t-(k-1)tau], ..., x[t-tau], x[t]` (each expanded over the series
//! dimensions). Insertion order is preserved; nothing here permutes data.

use ndarray::{Array2, ArrayView2, Axis};
use std::ops::Range;

use crate::config::{Embedding, TeEmbedding};
use crate::error::{InfoError, Result};

/// Embedded past vectors whose most recent element sits `lag` steps before
/// each index in `next_indices`.
pub fn embed<T: Clone + Default>(
    series: ArrayView2<'_, T>,
    embedding: Embedding,
    lag: usize,
    next_indices: Range<usize>,
) -> Array2<T> {
    let dims = series.ncols();
    let k = embedding.history;
    let mut out = Array2::default((next_indices.len(), k * dims));
    for (row, next) in next_indices.enumerate() {
        let latest = next - lag;
        for j in 0..k {
            let t = latest - j * embedding.delay;
            for d in 0..dims {
                out[(row, (k - 1 - j) * dims + d)] = series[(t, d)].clone();
            }
        }
    }
    out
}

fn check_lengths(context: &'static str, lengths: &[usize]) -> Result<usize> {
    let n = lengths.first().copied().unwrap_or(0);
    if let Some(&bad) = lengths.iter().find(|&&l| l != n) {
        return Err(InfoError::config(
            context,
            format!("series must have equal observation counts ({n} vs {bad})"),
        ));
    }
    Ok(n)
}

/// Role variables of active information storage.
#[derive(Debug, Clone)]
pub struct AisObservations<T> {
    pub past: Array2<T>,
    pub next: Array2<T>,
}

/// First usable "next" index for an embedding whose latest value is `lag` steps back.
pub fn first_next_index(embedding: Embedding, lag: usize) -> usize {
    embedding.span() + lag
}

/// Past embedding (history `k`, delay `tau`) against the next value.
pub fn ais_observations<T: Clone + Default>(
    series: ArrayView2<'_, T>,
    embedding: Embedding,
) -> Result<AisObservations<T>> {
    embedding.validate("embedding")?;
    let n = series.nrows();
    let start = first_next_index(embedding, 1);
    if start >= n {
        return Err(InfoError::insufficient("active information storage embedding", start, n));
    }
    let past = embed(series, embedding, 1, start..n);
    let next = series.slice(ndarray::s![start..n, ..]).to_owned();
    Ok(AisObservations { past, next })
}

/// Role variables of (conditional) transfer entropy.
#[derive(Debug, Clone)]
pub struct TeObservations<T> {
    pub source_past: Array2<T>,
    pub dest_past: Array2<T>,
    pub dest_next: Array2<T>,
    /// One embedded array per conditioning series, in input order.
    pub conditionals: Vec<Array2<T>>,
}

impl<T> TeObservations<T> {
    pub fn len(&self) -> usize {
        self.dest_next.nrows()
    }

    pub fn is_empty(&self) -> bool {
        self.dest_next.nrows() == 0
    }
}

impl<T: Clone> TeObservations<T> {
    /// Destination past followed by every conditional past, column-wise.
    pub fn conditioning(&self) -> Result<Array2<T>> {
        let mut parts = vec![self.dest_past.view()];
        parts.extend(self.conditionals.iter().map(|c| c.view()));
        ndarray::concatenate(Axis(1), &parts).map_err(|e| InfoError::config("conditional_embeddings", e.to_string()))
    }
}

/// Slice source, destination and conditioning series for TE.
///
/// The destination's next value is `y[t+1]`, its past ends at `y[t]`; the
/// source past ends at `x[t+1-source_delay]` and each conditional past at
/// `z[t+1-lag]`. `conditionals` pairs up with `embedding.conditionals`.
pub fn te_observations<T: Clone + Default>(
    source: ArrayView2<'_, T>,
    destination: ArrayView2<'_, T>,
    conditionals: &[ArrayView2<'_, T>],
    embedding: &TeEmbedding,
) -> Result<TeObservations<T>> {
    embedding.validate()?;
    if conditionals.len() != embedding.conditionals.len() {
        return Err(InfoError::config(
            "conditional_embeddings",
            format!(
                "{} conditioning series supplied for {} conditional embeddings",
                conditionals.len(),
                embedding.conditionals.len()
            ),
        ));
    }
    let mut lengths = vec![source.nrows(), destination.nrows()];
    lengths.extend(conditionals.iter().map(|c| c.nrows()));
    let n = check_lengths("series", &lengths)?;

    let start = embedding
        .conditionals
        .iter()
        .map(|cond| first_next_index(cond.embedding, cond.lag))
        .fold(
            first_next_index(embedding.destination, 1).max(first_next_index(embedding.source, embedding.source_delay)),
            usize::max,
        );
    if start >= n {
        return Err(InfoError::insufficient("transfer entropy embedding", start, n));
    }

    Ok(TeObservations {
        source_past: embed(source, embedding.source, embedding.source_delay, start..n),
        dest_past: embed(destination, embedding.destination, 1, start..n),
        dest_next: destination.slice(ndarray::s![start..n, ..]).to_owned(),
        conditionals: conditionals
            .iter()
            .zip(&embedding.conditionals)
            .map(|(series, cond)| embed(*series, cond.embedding, cond.lag, start..n))
            .collect(),
    })
}

/// Pairs `(x[t - time_diff], y[t])` for mutual information with a lag.
pub fn lagged_pairs<T: Clone + Default>(
    x: ArrayView2<'_, T>,
    y: ArrayView2<'_, T>,
    time_diff: usize,
) -> Result<(Array2<T>, Array2<T>)> {
    let n = check_lengths("series", &[x.nrows(), y.nrows()])?;
    if time_diff >= n {
        return Err(InfoError::insufficient(format!("mutual information with time_diff {time_diff}"), time_diff, n));
    }
    let x_part = x.slice(ndarray::s![0..n - time_diff, ..]).to_owned();
    let y_part = y.slice(ndarray::s![time_diff..n, ..]).to_owned();
    Ok((x_part, y_part))
}
