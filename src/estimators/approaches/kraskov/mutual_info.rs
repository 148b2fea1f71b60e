// SPDX-FileCopyrightText: 2025-2026 Carlson Büth <code@cbueth.de>
//
// SPDX-License-Identifier: MIT OR Apache-2.0

use ndarray::{Array1, Array2, ArrayView2};

use super::{KsgParams, digamma, local_terms, mean_of};
use crate::config::KsgAlgorithm;
use crate::error::{InfoError, Result};
use crate::estimators::approaches::common_nd::dataset::{ContinuousData, reorder_rows, stack_columns};
use crate::estimators::approaches::common_nd::joint_search::JointSearcher;
use crate::estimators::traits::{
    GlobalValue, LocalValues, MutualInformationEstimator, OptionalLocalValues, SurrogateMeasure,
};
use crate::estimators::utils::embedding::lagged_pairs;

/// KSG mutual information I(X; Y) between two (possibly multivariate) variables.
///
/// The surrogate variable is `X`: significance tests reorder its rows while `Y`
/// stays fixed.
#[derive(Debug, Clone)]
pub struct KraskovMutualInformation {
    x: Array2<f64>,
    y: Array2<f64>,
    params: KsgParams,
    locals: Array1<f64>,
}

impl KraskovMutualInformation {
    pub fn new(x: impl Into<ContinuousData>, y: impl Into<ContinuousData>, params: KsgParams) -> Result<Self> {
        Self::with_time_diff(x, y, 0, params)
    }

    /// Pairs `x[t - time_diff]` with `y[t]`.
    pub fn with_time_diff(
        x: impl Into<ContinuousData>,
        y: impl Into<ContinuousData>,
        time_diff: usize,
        params: KsgParams,
    ) -> Result<Self> {
        let (x, y) = lagged_pairs(x.into().into_array2().view(), y.into().into_array2().view(), time_diff)?;
        let locals = mi_locals(x.view(), y.view(), params)?;
        Ok(Self { x, y, params, locals })
    }

    pub fn params(&self) -> KsgParams {
        self.params
    }
}

/// Local KSG MI values of every sample.
pub(crate) fn mi_locals(x: ArrayView2<'_, f64>, y: ArrayView2<'_, f64>, params: KsgParams) -> Result<Array1<f64>> {
    let n = x.nrows();
    if y.nrows() != n {
        return Err(InfoError::config(
            "series",
            format!("variables have mismatched observation counts ({n} vs {})", y.nrows()),
        ));
    }
    params.validate(n)?;
    let joint = stack_columns(&[x.view(), y.view()])?;
    let searcher = JointSearcher::new(joint.view(), &[x.ncols(), y.ncols()])?;
    let full = searcher.full();
    let x_space = searcher.subspace(&[0]);
    let y_space = searcher.subspace(&[1]);
    let (k, window) = (params.k, params.exclusion_window);
    let psi_k = digamma(k as f64);
    let psi_n = digamma(n as f64);

    match params.algorithm {
        KsgAlgorithm::One => local_terms(
            n,
            || (),
            |_, i| {
                let neighbours = searcher.k_nearest(&full, k, i, window)?;
                let eps = neighbours[k - 1].distance;
                let n_x = searcher.count_within_r(&x_space, i, eps, false, window, None);
                let n_y = searcher.count_within_r(&y_space, i, eps, false, window, None);
                Ok(psi_k + psi_n - digamma((n_x + 1) as f64) - digamma((n_y + 1) as f64))
            },
        ),
        KsgAlgorithm::Two => {
            let inv_k = 1.0 / k as f64;
            local_terms(
                n,
                || (),
                |_, i| {
                    let neighbours = searcher.k_nearest(&full, k, i, window)?;
                    let (mut eps_x, mut eps_y) = (0.0f64, 0.0f64);
                    for nb in &neighbours {
                        eps_x = eps_x.max(searcher.group_distance(0, i, nb.index));
                        eps_y = eps_y.max(searcher.group_distance(1, i, nb.index));
                    }
                    let n_x = searcher.count_within_r(&x_space, i, eps_x, true, window, None);
                    let n_y = searcher.count_within_r(&y_space, i, eps_y, true, window, None);
                    Ok(psi_k - inv_k + psi_n - digamma(n_x as f64) - digamma(n_y as f64))
                },
            )
        }
    }
}

impl GlobalValue for KraskovMutualInformation {
    fn global_value(&self) -> f64 {
        mean_of(&self.locals)
    }
}

impl LocalValues for KraskovMutualInformation {
    fn local_values(&self) -> Array1<f64> {
        self.locals.clone()
    }
}

impl OptionalLocalValues for KraskovMutualInformation {
    fn supports_local(&self) -> bool {
        true
    }
    fn local_values_opt(&self) -> std::result::Result<Array1<f64>, &'static str> {
        Ok(self.local_values())
    }
}

impl MutualInformationEstimator for KraskovMutualInformation {}

impl SurrogateMeasure for KraskovMutualInformation {
    fn num_observations(&self) -> usize {
        self.x.nrows()
    }

    fn observed(&self) -> f64 {
        self.global_value()
    }

    fn with_source_ordering(&self, ordering: &[usize]) -> Result<f64> {
        let x = reorder_rows(self.x.view(), ordering);
        Ok(mean_of(&mi_locals(x.view(), self.y.view(), self.params)?))
    }
}
