// SPDX-FileCopyrightText: 2025-2026 Carlson Büth <code@cbueth.de>
//
// SPDX-License-Identifier: MIT OR Apache-2.0

use kiddo::{ImmutableKdTree, SquaredEuclidean};
use ndarray::{Array1, Array2, ArrayView2, Axis, concatenate};
use rand::Rng;
use std::num::NonZeroUsize;

use super::neighbour_search::{NeighbourSearchIndex, Norm};
use crate::error::{InfoError, Result};

/// Continuous input accepted by every continuous estimator.
///
/// One-dimensional data is a single variable observed over time; two-dimensional
/// data has rows = samples (time) and columns = dimensions.
#[derive(Debug, Clone)]
pub enum ContinuousData {
    OneDimensional(Array1<f64>),
    TwoDimensional(Array2<f64>),
}

impl ContinuousData {
    /// Samples x dimensions view of the data.
    pub fn into_array2(self) -> Array2<f64> {
        match self {
            ContinuousData::OneDimensional(a) => a.insert_axis(Axis(1)),
            ContinuousData::TwoDimensional(a) => a,
        }
    }
}

impl From<Array1<f64>> for ContinuousData {
    fn from(array: Array1<f64>) -> Self {
        ContinuousData::OneDimensional(array)
    }
}

impl From<Array2<f64>> for ContinuousData {
    fn from(array: Array2<f64>) -> Self {
        ContinuousData::TwoDimensional(array)
    }
}

/// Shared N-D dataset container with KD-tree for fast Euclidean neighbour queries.
pub struct NdDataset<const K: usize> {
    pub points: Vec<[f64; K]>,
    pub n: usize,
    pub tree: ImmutableKdTree<f64, K>,
}

impl<const K: usize> NdDataset<K> {
    pub fn from_points(points: Vec<[f64; K]>) -> Self {
        let n = points.len();
        let tree = ImmutableKdTree::new_from_slice(&points);
        Self { points, n, tree }
    }

    pub fn from_array2(data: ArrayView2<'_, f64>) -> Result<Self> {
        if data.ncols() != K {
            return Err(InfoError::config(
                "data",
                format!("expected {K} columns, got {}", data.ncols()),
            ));
        }
        let points = data
            .axis_iter(Axis(0))
            .map(|row| {
                let mut p = [0.0; K];
                for (dst, src) in p.iter_mut().zip(row.iter()) {
                    *dst = *src;
                }
                p
            })
            .collect();
        Ok(Self::from_points(points))
    }

    /// Euclidean distance to the k-th neighbour of every point (self excluded).
    pub fn kth_neighbor_radii_euclidean(&self, k: usize) -> Result<Vec<f64>> {
        if k == 0 {
            return Err(InfoError::config("k", "neighbour count must be >= 1"));
        }
        if k >= self.n {
            return Err(InfoError::insufficient("Euclidean k-nearest-neighbour radii", k, self.n));
        }
        if K == 1 {
            let values: Vec<f64> = self.points.iter().map(|p| p[0]).collect();
            let index = NeighbourSearchIndex::new(&values)?.with_norm(Norm::EuclideanSquared);
            return (0..self.n)
                .map(|i| {
                    let neighbours = index.k_nearest(k, i, 0)?;
                    Ok(neighbours.last().map_or(0.0, |nn| nn.distance.sqrt()))
                })
                .collect();
        }
        // Query k+1 neighbours (including self) and take position k.
        let query = NonZeroUsize::new(k + 1).unwrap_or(NonZeroUsize::MIN);
        let radii = self
            .points
            .iter()
            .map(|p| {
                let neigh = self.tree.nearest_n::<SquaredEuclidean>(p, query);
                neigh.get(k).map(|nn| nn.distance.sqrt()).unwrap_or(0.0)
            })
            .collect();
        Ok(radii)
    }
}

/// Concatenate role arrays (each samples x dims) column-wise into one joint array.
pub fn stack_columns(parts: &[ArrayView2<'_, f64>]) -> Result<Array2<f64>> {
    if parts.is_empty() {
        return Err(InfoError::config("series", "at least one variable is required"));
    }
    let n = parts[0].nrows();
    if let Some(bad) = parts.iter().find(|p| p.nrows() != n) {
        return Err(InfoError::config(
            "series",
            format!("variables have mismatched observation counts ({n} vs {})", bad.nrows()),
        ));
    }
    concatenate(Axis(1), parts).map_err(|e| InfoError::config("series", e.to_string()))
}

/// Reorder the rows of `data` so that row `i` of the result is row `ordering[i]`.
pub fn reorder_rows(data: ArrayView2<'_, f64>, ordering: &[usize]) -> Array2<f64> {
    data.select(Axis(0), ordering)
}

/// Z-score every column in place. Constant columns are centred only.
pub fn normalise_columns(data: &mut Array2<f64>) {
    for mut col in data.columns_mut() {
        let n = col.len() as f64;
        if n < 2.0 {
            continue;
        }
        let mean = col.sum() / n;
        let var = col.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / (n - 1.0);
        let std = var.sqrt();
        if std > 0.0 {
            col.mapv_inplace(|v| (v - mean) / std);
        } else {
            col.mapv_inplace(|v| v - mean);
        }
    }
}

/// Add uniform noise in `[0, level)` to every entry, breaking exact ties between samples.
pub fn add_noise<R: Rng + ?Sized>(data: &mut Array2<f64>, level: f64, rng: &mut R) {
    if level <= 0.0 {
        return;
    }
    data.mapv_inplace(|v| v + level * rng.r#gen::<f64>());
}

/// Like [`add_noise`], but each column's amplitude is `level` times the
/// column's sample standard deviation, matching the noise a normalised
/// column would receive. Constant columns get `level` unscaled.
pub fn add_scaled_noise<R: Rng + ?Sized>(data: &mut Array2<f64>, level: f64, rng: &mut R) {
    if level <= 0.0 {
        return;
    }
    let scales: Vec<f64> = data
        .columns()
        .into_iter()
        .map(|col| {
            let n = col.len() as f64;
            if n < 2.0 {
                return 1.0;
            }
            let mean = col.sum() / n;
            let std = (col.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / (n - 1.0)).sqrt();
            if std > 0.0 { std } else { 1.0 }
        })
        .collect();
    for ((_, col), v) in data.indexed_iter_mut() {
        *v += level * scales[col] * rng.r#gen::<f64>();
    }
}
