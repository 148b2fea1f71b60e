// SPDX-FileCopyrightText: 2025-2026 Carlson Büth <code@cbueth.de>
//
// SPDX-License-Identifier: MIT OR Apache-2.0

use ndarray::{Array1, Array2};

use super::{KsgParams, digamma, local_terms, mean_of};
use crate::error::{InfoError, Result};
use crate::estimators::approaches::common_nd::dataset::{ContinuousData, NdDataset};
use crate::estimators::approaches::common_nd::joint_search::JointSearcher;
use crate::estimators::traits::{GlobalValue, LocalValues, OptionalLocalValues};

/// Kozachenko–Leonenko differential entropy under the max-norm, using the
/// sort-based neighbour search (so the exclusion window applies).
///
/// h_i = ψ(N) - ψ(k) + d ln(2 ε_i), where ε_i is the max-norm distance to the
/// k-th neighbour and `2^d` the volume of the unit max-norm ball.
#[derive(Debug, Clone)]
pub struct KraskovEntropy {
    params: KsgParams,
    dims: usize,
    locals: Array1<f64>,
}

impl KraskovEntropy {
    pub fn new(data: impl Into<ContinuousData>, params: KsgParams) -> Result<Self> {
        let data = data.into().into_array2();
        let locals = entropy_locals(&data, params)?;
        Ok(Self { params, dims: data.ncols(), locals })
    }

    pub fn params(&self) -> KsgParams {
        self.params
    }

    pub fn dims(&self) -> usize {
        self.dims
    }
}

fn entropy_locals(data: &Array2<f64>, params: KsgParams) -> Result<Array1<f64>> {
    let n = data.nrows();
    params.validate(n)?;
    if data.ncols() == 0 {
        return Err(InfoError::config("data", "entropy needs at least one dimension"));
    }
    let searcher = JointSearcher::new(data.view(), &[data.ncols()])?;
    let space = searcher.full();
    let d = data.ncols() as f64;
    let constant = digamma(n as f64) - digamma(params.k as f64);
    local_terms(
        n,
        || (),
        |_, i| {
            let neighbours = searcher.k_nearest(&space, params.k, i, params.exclusion_window)?;
            let eps = neighbours[params.k - 1].distance;
            if eps <= 0.0 {
                return Err(InfoError::NumericDegeneracy { context: "Kraskov entropy radius", sample: i });
            }
            Ok(constant + d * (2.0 * eps).ln())
        },
    )
}

impl GlobalValue for KraskovEntropy {
    fn global_value(&self) -> f64 {
        mean_of(&self.locals)
    }
}

impl LocalValues for KraskovEntropy {
    fn local_values(&self) -> Array1<f64> {
        self.locals.clone()
    }
}

impl OptionalLocalValues for KraskovEntropy {
    fn supports_local(&self) -> bool {
        true
    }
    fn local_values_opt(&self) -> std::result::Result<Array1<f64>, &'static str> {
        Ok(self.local_values())
    }
}

/// Volume of the unit m-ball in R^m: π^{m/2} / Γ(m/2 + 1).
pub fn unit_ball_volume(m: usize) -> f64 {
    use statrs::function::gamma::gamma;
    let m_f = m as f64;
    std::f64::consts::PI.powf(m_f / 2.0) / gamma(m_f / 2.0 + 1.0)
}

/// Kozachenko–Leonenko (KL) differential entropy estimator (Euclidean metric,
/// KD-tree backed, no exclusion window).
///
/// H_hat = ψ(N) - ψ(k) + ln(V_m) + (m/N) Σ_i ln(ρ_k,i)
/// where V_m is the m-dimensional unit-ball volume and ρ_k,i the distance to the
/// k-th nearest neighbour of point i (self excluded).
pub struct KozachenkoLeonenkoEntropy<const K: usize> {
    pub nd: NdDataset<K>,
    pub k: usize,
    locals: Array1<f64>,
}

impl<const K: usize> KozachenkoLeonenkoEntropy<K> {
    /// Construct from 2D data (rows = samples, cols = dimensions).
    pub fn new(data: Array2<f64>, k: usize) -> Result<Self> {
        let nd = NdDataset::<K>::from_array2(data.view())?;
        Self::from_dataset(nd, k)
    }

    /// Construct from a vector of K-dimensional points (already materialised).
    pub fn from_points(points: Vec<[f64; K]>, k: usize) -> Result<Self> {
        Self::from_dataset(NdDataset::from_points(points), k)
    }

    fn from_dataset(nd: NdDataset<K>, k: usize) -> Result<Self> {
        let radii = nd.kth_neighbor_radii_euclidean(k)?;
        let n_f = nd.n as f64;
        let constant = digamma(n_f) - digamma(k as f64) + unit_ball_volume(K).ln();
        let locals = radii
            .iter()
            .enumerate()
            .map(|(i, &r)| {
                if r > 0.0 {
                    Ok(constant + (K as f64) * r.ln())
                } else {
                    Err(InfoError::NumericDegeneracy { context: "Kozachenko-Leonenko entropy radius", sample: i })
                }
            })
            .collect::<Result<Vec<f64>>>()?;
        Ok(Self { nd, k, locals: Array1::from(locals) })
    }
}

impl<const K: usize> GlobalValue for KozachenkoLeonenkoEntropy<K> {
    fn global_value(&self) -> f64 {
        mean_of(&self.locals)
    }
}

impl<const K: usize> LocalValues for KozachenkoLeonenkoEntropy<K> {
    fn local_values(&self) -> Array1<f64> {
        self.locals.clone()
    }
}
