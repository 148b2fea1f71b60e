// SPDX-FileCopyrightText: 2025-2026 Carlson Büth <code@cbueth.de>
//
// SPDX-License-Identifier: MIT OR Apache-2.0

use ndarray::{Array1, Array2, ArrayView2, Zip};

use super::{KernelParams, admissible, box_counts};
use crate::config::{Embedding, TeEmbedding};
use crate::error::{InfoError, Result};
use crate::estimators::approaches::common_nd::dataset::{ContinuousData, reorder_rows, stack_columns};
use crate::estimators::approaches::common_nd::joint_search::JointSearcher;
use crate::estimators::approaches::kraskov::mean_of;
use crate::estimators::traits::{
    ConditionalMutualInformationEstimator, GlobalValue, LocalValues, MutualInformationEstimator,
    OptionalLocalValues, SurrogateMeasure, TransferEntropyEstimator,
};
use crate::estimators::utils::embedding::{ais_observations, lagged_pairs, te_observations};

fn admissible_counts(n: usize, window: usize) -> Array1<f64> {
    Array1::from_iter((0..n).map(|i| admissible(n, i, window) as f64))
}

fn entropy_locals(data: ArrayView2<'_, f64>, params: KernelParams) -> Result<Array1<f64>> {
    let n = data.nrows();
    params.validate(n)?;
    if data.ncols() == 0 {
        return Err(InfoError::config("data", "entropy needs at least one dimension"));
    }
    let searcher = JointSearcher::new(data, &[data.ncols()])?;
    let counts = box_counts(&searcher, &[searcher.full()], params)?;
    let log_volume = data.ncols() as f64 * (2.0 * params.width).ln();
    let totals = admissible_counts(n, params.exclusion_window);
    Ok(Zip::from(&counts[0]).and(&totals).map_collect(|&c, &t| -(c / t).ln() + log_volume))
}

fn mi_locals(x: ArrayView2<'_, f64>, y: ArrayView2<'_, f64>, params: KernelParams) -> Result<Array1<f64>> {
    let n = x.nrows();
    params.validate(n)?;
    let joint = stack_columns(&[x.view(), y.view()])?;
    let searcher = JointSearcher::new(joint.view(), &[x.ncols(), y.ncols()])?;
    let spaces = [searcher.full(), searcher.subspace(&[0]), searcher.subspace(&[1])];
    let counts = box_counts(&searcher, &spaces, params)?;
    let totals = admissible_counts(n, params.exclusion_window);
    Ok(Zip::from(&counts[0])
        .and(&counts[1])
        .and(&counts[2])
        .and(&totals)
        .map_collect(|&c_xy, &c_x, &c_y, &t| (c_xy * t / (c_x * c_y)).ln()))
}

fn cmi_locals(
    x: ArrayView2<'_, f64>,
    y: ArrayView2<'_, f64>,
    z: ArrayView2<'_, f64>,
    params: KernelParams,
) -> Result<Array1<f64>> {
    if z.ncols() == 0 {
        return mi_locals(x, y, params);
    }
    params.validate(x.nrows())?;
    let joint = stack_columns(&[x.view(), y.view(), z.view()])?;
    let searcher = JointSearcher::new(joint.view(), &[x.ncols(), y.ncols(), z.ncols()])?;
    let spaces = [
        searcher.full(),
        searcher.subspace(&[0, 2]),
        searcher.subspace(&[1, 2]),
        searcher.subspace(&[2]),
    ];
    let counts = box_counts(&searcher, &spaces, params)?;
    Ok(Zip::from(&counts[0])
        .and(&counts[1])
        .and(&counts[2])
        .and(&counts[3])
        .map_collect(|&c_xyz, &c_xz, &c_yz, &c_z| (c_xyz * c_z / (c_xz * c_yz)).ln()))
}

/// Box-kernel differential entropy.
#[derive(Debug, Clone)]
pub struct KernelEntropy {
    params: KernelParams,
    locals: Array1<f64>,
}

impl KernelEntropy {
    pub fn new(data: impl Into<ContinuousData>, params: KernelParams) -> Result<Self> {
        let data = data.into().into_array2();
        let locals = entropy_locals(data.view(), params)?;
        Ok(Self { params, locals })
    }

    pub fn params(&self) -> KernelParams {
        self.params
    }
}

/// Box-kernel mutual information I(X; Y), surrogates reorder `X`.
#[derive(Debug, Clone)]
pub struct KernelMutualInformation {
    x: Array2<f64>,
    y: Array2<f64>,
    params: KernelParams,
    locals: Array1<f64>,
}

impl KernelMutualInformation {
    pub fn new(x: impl Into<ContinuousData>, y: impl Into<ContinuousData>, params: KernelParams) -> Result<Self> {
        Self::with_time_diff(x, y, 0, params)
    }

    /// Pairs `x[t - time_diff]` with `y[t]`.
    pub fn with_time_diff(
        x: impl Into<ContinuousData>,
        y: impl Into<ContinuousData>,
        time_diff: usize,
        params: KernelParams,
    ) -> Result<Self> {
        let (x, y) = lagged_pairs(x.into().into_array2().view(), y.into().into_array2().view(), time_diff)?;
        let locals = mi_locals(x.view(), y.view(), params)?;
        Ok(Self { x, y, params, locals })
    }
}

/// Box-kernel conditional mutual information I(X; Y | Z), surrogates reorder `X`.
#[derive(Debug, Clone)]
pub struct KernelConditionalMutualInformation {
    x: Array2<f64>,
    y: Array2<f64>,
    z: Array2<f64>,
    params: KernelParams,
    locals: Array1<f64>,
}

impl KernelConditionalMutualInformation {
    pub fn new(
        x: impl Into<ContinuousData>,
        y: impl Into<ContinuousData>,
        z: impl Into<ContinuousData>,
        params: KernelParams,
    ) -> Result<Self> {
        let (x, y, z) = (x.into().into_array2(), y.into().into_array2(), z.into().into_array2());
        if y.nrows() != x.nrows() || z.nrows() != x.nrows() {
            return Err(InfoError::config("series", "variables have mismatched observation counts"));
        }
        let locals = cmi_locals(x.view(), y.view(), z.view(), params)?;
        Ok(Self { x, y, z, params, locals })
    }
}

/// Box-kernel active information storage, surrogates reorder the past vectors.
#[derive(Debug, Clone)]
pub struct KernelActiveInformation {
    past: Array2<f64>,
    next: Array2<f64>,
    params: KernelParams,
    locals: Array1<f64>,
}

impl KernelActiveInformation {
    pub fn new(series: impl Into<ContinuousData>, embedding: Embedding, params: KernelParams) -> Result<Self> {
        let series = series.into().into_array2();
        let obs = ais_observations(series.view(), embedding)?;
        let locals = mi_locals(obs.past.view(), obs.next.view(), params)?;
        Ok(Self { past: obs.past, next: obs.next, params, locals })
    }
}

/// Box-kernel (conditional) transfer entropy, surrogates reorder the source past.
#[derive(Debug, Clone)]
pub struct KernelTransferEntropy {
    source_past: Array2<f64>,
    dest_next: Array2<f64>,
    conditioning: Array2<f64>,
    params: KernelParams,
    locals: Array1<f64>,
}

impl KernelTransferEntropy {
    pub fn new(
        source: impl Into<ContinuousData>,
        destination: impl Into<ContinuousData>,
        embedding: TeEmbedding,
        params: KernelParams,
    ) -> Result<Self> {
        Self::with_conditionals(source, destination, Vec::<ContinuousData>::new(), embedding, params)
    }

    pub fn with_conditionals(
        source: impl Into<ContinuousData>,
        destination: impl Into<ContinuousData>,
        conditionals: Vec<impl Into<ContinuousData>>,
        embedding: TeEmbedding,
        params: KernelParams,
    ) -> Result<Self> {
        let source = source.into().into_array2();
        let destination = destination.into().into_array2();
        let conditionals: Vec<Array2<f64>> = conditionals.into_iter().map(|c| c.into().into_array2()).collect();
        let views: Vec<_> = conditionals.iter().map(|c| c.view()).collect();
        let obs = te_observations(source.view(), destination.view(), &views, &embedding)?;
        let conditioning = obs.conditioning()?;
        let locals = cmi_locals(obs.source_past.view(), obs.dest_next.view(), conditioning.view(), params)?;
        Ok(Self { source_past: obs.source_past, dest_next: obs.dest_next, conditioning, params, locals })
    }
}

impl SurrogateMeasure for KernelMutualInformation {
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

impl SurrogateMeasure for KernelConditionalMutualInformation {
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

impl SurrogateMeasure for KernelActiveInformation {
    fn num_observations(&self) -> usize {
        self.past.nrows()
    }
    fn observed(&self) -> f64 {
        self.global_value()
    }
    fn with_source_ordering(&self, ordering: &[usize]) -> Result<f64> {
        let past = reorder_rows(self.past.view(), ordering);
        Ok(mean_of(&mi_locals(past.view(), self.next.view(), self.params)?))
    }
}

impl SurrogateMeasure for KernelTransferEntropy {
    fn num_observations(&self) -> usize {
        self.source_past.nrows()
    }
    fn observed(&self) -> f64 {
        self.global_value()
    }
    fn with_source_ordering(&self, ordering: &[usize]) -> Result<f64> {
        let source_past = reorder_rows(self.source_past.view(), ordering);
        let locals = cmi_locals(source_past.view(), self.dest_next.view(), self.conditioning.view(), self.params)?;
        Ok(mean_of(&locals))
    }
}

macro_rules! impl_local_traits {
    ($($estimator:ty),* $(,)?) => {
        $(
            impl GlobalValue for $estimator {
                fn global_value(&self) -> f64 {
                    mean_of(&self.locals)
                }
            }

            impl LocalValues for $estimator {
                fn local_values(&self) -> Array1<f64> {
                    self.locals.clone()
                }
            }

            impl OptionalLocalValues for $estimator {
                fn supports_local(&self) -> bool {
                    true
                }
                fn local_values_opt(&self) -> std::result::Result<Array1<f64>, &'static str> {
                    Ok(self.local_values())
                }
            }
        )*
    };
}

impl_local_traits!(
    KernelEntropy,
    KernelMutualInformation,
    KernelConditionalMutualInformation,
    KernelActiveInformation,
    KernelTransferEntropy,
);

impl MutualInformationEstimator for KernelMutualInformation {}
impl ConditionalMutualInformationEstimator for KernelConditionalMutualInformation {}
impl TransferEntropyEstimator for KernelTransferEntropy {}
