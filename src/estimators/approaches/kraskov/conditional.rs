// SPDX-FileCopyrightText: 2025-2026 Carlson Büth <code@cbueth.de>
//
// SPDX-License-Identifier: MIT OR Apache-2.0

use ndarray::{Array1, Array2, ArrayView2};

use super::mutual_info::mi_locals;
use super::{KsgParams, digamma, local_terms, mean_of};
use crate::config::KsgAlgorithm;
use crate::error::{InfoError, Result};
use crate::estimators::approaches::common_nd::dataset::{ContinuousData, reorder_rows, stack_columns};
use crate::estimators::approaches::common_nd::joint_search::JointSearcher;
use crate::estimators::traits::{
    ConditionalMutualInformationEstimator, GlobalValue, LocalValues, OptionalLocalValues, SurrogateMeasure,
};

/// KSG conditional mutual information I(X; Y | Z).
///
/// The samples that are neighbours of sample i in the conditioning space form a
/// mask; the X and Y marginal counts only admit samples inside that mask.
/// With no conditioning columns the estimate equals [`KraskovMutualInformation`](super::KraskovMutualInformation).
#[derive(Debug, Clone)]
pub struct KraskovConditionalMutualInformation {
    x: Array2<f64>,
    y: Array2<f64>,
    z: Array2<f64>,
    params: KsgParams,
    locals: Array1<f64>,
}

impl KraskovConditionalMutualInformation {
    /// `z` may have zero columns.
    pub fn new(
        x: impl Into<ContinuousData>,
        y: impl Into<ContinuousData>,
        z: impl Into<ContinuousData>,
        params: KsgParams,
    ) -> Result<Self> {
        let (x, y, z) = (x.into().into_array2(), y.into().into_array2(), z.into().into_array2());
        let locals = cmi_locals(x.view(), y.view(), z.view(), params)?;
        Ok(Self { x, y, z, params, locals })
    }

    pub fn params(&self) -> KsgParams {
        self.params
    }
}

/// Samples flagged in a reusable mask, cleared again after each query.
struct NeighbourMask {
    flags: Vec<bool>,
    set: Vec<usize>,
}

impl NeighbourMask {
    fn new(n: usize) -> Self {
        Self { flags: vec![false; n], set: Vec::new() }
    }

    fn fill(&mut self, indices: impl IntoIterator<Item = usize>) {
        for j in indices {
            self.flags[j] = true;
            self.set.push(j);
        }
    }

    fn clear(&mut self) {
        for j in self.set.drain(..) {
            self.flags[j] = false;
        }
    }
}

pub(crate) fn cmi_locals(
    x: ArrayView2<'_, f64>,
    y: ArrayView2<'_, f64>,
    z: ArrayView2<'_, f64>,
    params: KsgParams,
) -> Result<Array1<f64>> {
    let n = x.nrows();
    if y.nrows() != n || z.nrows() != n {
        return Err(InfoError::config(
            "series",
            format!("variables have mismatched observation counts ({n}, {}, {})", y.nrows(), z.nrows()),
        ));
    }
    if z.ncols() == 0 {
        return mi_locals(x, y, params);
    }
    params.validate(n)?;
    let joint = stack_columns(&[x.view(), y.view(), z.view()])?;
    let searcher = JointSearcher::new(joint.view(), &[x.ncols(), y.ncols(), z.ncols()])?;
    let full = searcher.full();
    let x_space = searcher.subspace(&[0]);
    let y_space = searcher.subspace(&[1]);
    let z_space = searcher.subspace(&[2]);
    let (k, window) = (params.k, params.exclusion_window);
    let psi_k = digamma(k as f64);

    match params.algorithm {
        KsgAlgorithm::One => local_terms(
            n,
            || NeighbourMask::new(n),
            |mask, i| {
                let neighbours = searcher.k_nearest(&full, k, i, window)?;
                let eps = neighbours[k - 1].distance;
                let z_neighbours = searcher.find_within_r(&z_space, i, eps, false, window);
                let n_z = z_neighbours.len();
                mask.fill(z_neighbours.iter().map(|nb| nb.index));
                let n_xz = searcher.count_within_r(&x_space, i, eps, false, window, Some(&mask.flags));
                let n_yz = searcher.count_within_r(&y_space, i, eps, false, window, Some(&mask.flags));
                mask.clear();
                Ok(psi_k - digamma((n_xz + 1) as f64) - digamma((n_yz + 1) as f64) + digamma((n_z + 1) as f64))
            },
        ),
        KsgAlgorithm::Two => {
            let two_inv_k = 2.0 / k as f64;
            local_terms(
                n,
                || NeighbourMask::new(n),
                |mask, i| {
                    let neighbours = searcher.k_nearest(&full, k, i, window)?;
                    let (mut eps_x, mut eps_y, mut eps_z) = (0.0f64, 0.0f64, 0.0f64);
                    for nb in &neighbours {
                        let d = searcher.group_distances(i, nb.index);
                        eps_x = eps_x.max(d[0]);
                        eps_y = eps_y.max(d[1]);
                        eps_z = eps_z.max(d[2]);
                    }
                    let z_neighbours = searcher.find_within_r(&z_space, i, eps_z, true, window);
                    let n_z = z_neighbours.len();
                    mask.fill(z_neighbours.iter().map(|nb| nb.index));
                    let n_xz = searcher.count_within_r(&x_space, i, eps_x, true, window, Some(&mask.flags));
                    let n_yz = searcher.count_within_r(&y_space, i, eps_y, true, window, Some(&mask.flags));
                    mask.clear();
                    let (n_xz, n_yz) = (n_xz as f64, n_yz as f64);
                    Ok(psi_k - two_inv_k + digamma(n_z as f64) - digamma(n_xz) + 1.0 / n_xz - digamma(n_yz)
                        + 1.0 / n_yz)
                },
            )
        }
    }
}

impl GlobalValue for KraskovConditionalMutualInformation {
    fn global_value(&self) -> f64 {
        mean_of(&self.locals)
    }
}

impl LocalValues for KraskovConditionalMutualInformation {
    fn local_values(&self) -> Array1<f64> {
        self.locals.clone()
    }
}

impl OptionalLocalValues for KraskovConditionalMutualInformation {
    fn supports_local(&self) -> bool {
        true
    }
    fn local_values_opt(&self) -> std::result::Result<Array1<f64>, &'static str> {
        Ok(self.local_values())
    }
}

impl ConditionalMutualInformationEstimator for KraskovConditionalMutualInformation {}

impl SurrogateMeasure for KraskovConditionalMutualInformation {
    fn num_observations(&self) -> usize {
        self.x.nrows()
    }

    fn observed(&self) -> f64 {
        self.global_value()
    }

    fn with_source_ordering(&self, ordering: &[usize]) -> Result<f64> {
        let x = reorder_rows(self.x.view(), ordering);
        Ok(mean_of(&cmi_locals(x.view(), self.y.view(), self.z.view(), self.params)?))
    }
}
