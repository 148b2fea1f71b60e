// SPDX-FileCopyrightText: 2025-2026 Carlson Büth <code@cbueth.de>
//
// SPDX-License-Identifier: MIT OR Apache-2.0

use ndarray::{Array1, Array2, ArrayView2, Axis};
use std::f64::consts::PI;

use super::covariance::{Covariance, column_means};
use crate::config::{Embedding, TeEmbedding};
use crate::error::{InfoError, Result};
use crate::estimators::approaches::common_nd::dataset::{ContinuousData, stack_columns};
use crate::estimators::traits::{
    AnalyticNull, ConditionalMutualInformationEstimator, GlobalValue, MutualInformationEstimator,
    OptionalLocalValues, SurrogateMeasure, TransferEntropyEstimator,
};
use crate::estimators::utils::embedding::{ais_observations, lagged_pairs, te_observations};

const NO_SAMPLES: &str = "local values need raw samples; this estimator was built from a covariance";

fn centred(samples: &Array2<f64>) -> Array2<f64> {
    let means = column_means(samples.view());
    samples - &means.insert_axis(Axis(0))
}

/// Gaussian differential entropy ½ (d ln 2πe + ln|Σ|).
#[derive(Debug, Clone)]
pub struct GaussianEntropy {
    covariance: Covariance,
    value: f64,
    locals: Option<Array1<f64>>,
}

impl GaussianEntropy {
    pub fn new(data: impl Into<ContinuousData>) -> Result<Self> {
        let data = data.into().into_array2();
        let covariance = Covariance::from_samples(data.view())?;
        let all: Vec<usize> = (0..covariance.dims()).collect();
        let locals = covariance.local_entropies(centred(&data).view(), &all)?;
        let mut estimator = Self::from_covariance(covariance)?;
        estimator.locals = Some(locals);
        Ok(estimator)
    }

    pub fn from_covariance(covariance: Covariance) -> Result<Self> {
        let all: Vec<usize> = (0..covariance.dims()).collect();
        let d = covariance.dims() as f64;
        let value = 0.5 * (d * (1.0 + (2.0 * PI).ln()) + covariance.log_det(&all)?);
        Ok(Self { covariance, value, locals: None })
    }

    pub fn covariance(&self) -> &Covariance {
        &self.covariance
    }
}

impl GlobalValue for GaussianEntropy {
    fn global_value(&self) -> f64 {
        self.value
    }
}

impl OptionalLocalValues for GaussianEntropy {
    fn supports_local(&self) -> bool {
        self.locals.is_some()
    }
    fn local_values_opt(&self) -> std::result::Result<Array1<f64>, &'static str> {
        self.locals.clone().ok_or(NO_SAMPLES)
    }
}

/// Gaussian conditional mutual information I(X; Y | Z); `Z` may be empty.
///
/// Built from samples it keeps them for local values and surrogates (which
/// reorder the `X` rows and re-estimate the covariance). Built from a
/// covariance only the global value and the analytic null are available.
#[derive(Debug, Clone)]
pub struct GaussianConditionalMutualInformation {
    samples: Option<Array2<f64>>,
    covariance: Covariance,
    dims: [usize; 3],
    bias_correction: bool,
    raw_value: f64,
    locals: Option<Array1<f64>>,
}

impl GaussianConditionalMutualInformation {
    pub fn new(
        x: impl Into<ContinuousData>,
        y: impl Into<ContinuousData>,
        z: impl Into<ContinuousData>,
        bias_correction: bool,
    ) -> Result<Self> {
        let (x, y, z) = (x.into().into_array2(), y.into().into_array2(), z.into().into_array2());
        Self::from_parts(x.view(), y.view(), z.view(), bias_correction)
    }

    pub(crate) fn from_parts(
        x: ArrayView2<'_, f64>,
        y: ArrayView2<'_, f64>,
        z: ArrayView2<'_, f64>,
        bias_correction: bool,
    ) -> Result<Self> {
        let dims = [x.ncols(), y.ncols(), z.ncols()];
        let samples = if dims[2] == 0 { stack_columns(&[x.view(), y.view()])? } else { stack_columns(&[x.view(), y.view(), z.view()])? };
        let covariance = Covariance::from_samples(samples.view())?;
        let mut estimator = Self::from_covariance(covariance, dims, bias_correction)?;
        let groups = estimator.groups();
        let c = centred(&samples);
        let h = |indices: &[usize]| estimator.covariance.local_entropies(c.view(), indices);
        let mut locals = h(&groups.xz)? + h(&groups.yz)? - h(&groups.z)? - h(&groups.xyz)?;
        if bias_correction {
            let bias = estimator.bias();
            locals.mapv_inplace(|v| v - bias);
        }
        estimator.locals = Some(locals);
        estimator.samples = Some(samples);
        Ok(estimator)
    }

    /// From a covariance over `[X | Y | Z]` with the given dimension split.
    pub fn from_covariance(covariance: Covariance, dims: [usize; 3], bias_correction: bool) -> Result<Self> {
        if dims[0] == 0 || dims[1] == 0 {
            return Err(InfoError::config("dims", "both related variables need at least one dimension"));
        }
        if dims.iter().sum::<usize>() != covariance.dims() {
            return Err(InfoError::InvalidCovariance(format!(
                "dimension split {dims:?} does not match a {}-dimensional covariance",
                covariance.dims()
            )));
        }
        let mut estimator = Self {
            samples: None,
            covariance,
            dims,
            bias_correction,
            raw_value: 0.0,
            locals: None,
        };
        estimator.raw_value = estimator.raw_value_of(&estimator.covariance)?;
        Ok(estimator)
    }

    fn groups(&self) -> Groups {
        Groups::new(self.dims)
    }

    fn raw_value_of(&self, covariance: &Covariance) -> Result<f64> {
        let g = self.groups();
        Ok(0.5
            * (covariance.log_det(&g.xz)? + covariance.log_det(&g.yz)?
                - covariance.log_det(&g.z)?
                - covariance.log_det(&g.xyz)?))
    }

    /// Mean of the analytic null, `d_X d_Y / 2N` nats.
    pub fn bias(&self) -> f64 {
        (self.dims[0] * self.dims[1]) as f64 / (2.0 * self.covariance.observations() as f64)
    }

    pub fn bias_corrected(&self) -> bool {
        self.bias_correction
    }

    /// The estimate before any bias correction.
    pub fn raw_value(&self) -> f64 {
        self.raw_value
    }

    pub fn covariance(&self) -> &Covariance {
        &self.covariance
    }

    pub fn has_samples(&self) -> bool {
        self.samples.is_some()
    }
}

struct Groups {
    xz: Vec<usize>,
    yz: Vec<usize>,
    z: Vec<usize>,
    xyz: Vec<usize>,
}

impl Groups {
    fn new([dx, dy, dz]: [usize; 3]) -> Self {
        let x = 0..dx;
        let y = dx..dx + dy;
        let z: Vec<usize> = (dx + dy..dx + dy + dz).collect();
        Self {
            xz: x.clone().chain(z.iter().copied()).collect(),
            yz: y.clone().chain(z.iter().copied()).collect(),
            xyz: (0..dx + dy + dz).collect(),
            z,
        }
    }
}

impl GlobalValue for GaussianConditionalMutualInformation {
    fn global_value(&self) -> f64 {
        if self.bias_correction { self.raw_value - self.bias() } else { self.raw_value }
    }
}

impl OptionalLocalValues for GaussianConditionalMutualInformation {
    fn supports_local(&self) -> bool {
        self.locals.is_some()
    }
    fn local_values_opt(&self) -> std::result::Result<Array1<f64>, &'static str> {
        self.locals.clone().ok_or(NO_SAMPLES)
    }
}

impl AnalyticNull for GaussianConditionalMutualInformation {
    fn observed_statistic(&self) -> f64 {
        self.raw_value
    }
    fn degrees_of_freedom(&self) -> usize {
        self.dims[0] * self.dims[1]
    }
    fn null_observations(&self) -> usize {
        self.covariance.observations()
    }
}

impl SurrogateMeasure for GaussianConditionalMutualInformation {
    fn num_observations(&self) -> usize {
        self.covariance.observations()
    }

    fn observed(&self) -> f64 {
        self.global_value()
    }

    fn with_source_ordering(&self, ordering: &[usize]) -> Result<f64> {
        let samples = self.samples.as_ref().ok_or(InfoError::Unsupported {
            operation: "permutation significance from a supplied covariance",
            approach: "gaussian",
        })?;
        let dx = self.dims[0];
        let mut reordered = samples.clone();
        for (row, &source_row) in ordering.iter().enumerate() {
            for c in 0..dx {
                reordered[(row, c)] = samples[(source_row, c)];
            }
        }
        let raw = self.raw_value_of(&Covariance::from_samples(reordered.view())?)?;
        Ok(if self.bias_correction { raw - self.bias() } else { raw })
    }
}

impl ConditionalMutualInformationEstimator for GaussianConditionalMutualInformation {}

/// Delegate the shared measure traits of a wrapper to its inner CMI.
macro_rules! delegate_to_cmi {
    ($($wrapper:ty),* $(,)?) => {
        $(
            impl $wrapper {
                pub fn inner(&self) -> &GaussianConditionalMutualInformation {
                    &self.inner
                }

                pub fn has_samples(&self) -> bool {
                    self.inner.has_samples()
                }

                pub fn bias_corrected(&self) -> bool {
                    self.inner.bias_corrected()
                }
            }

            impl GlobalValue for $wrapper {
                fn global_value(&self) -> f64 {
                    self.inner.global_value()
                }
            }

            impl OptionalLocalValues for $wrapper {
                fn supports_local(&self) -> bool {
                    self.inner.supports_local()
                }
                fn local_values_opt(&self) -> std::result::Result<Array1<f64>, &'static str> {
                    self.inner.local_values_opt()
                }
            }

            impl AnalyticNull for $wrapper {
                fn observed_statistic(&self) -> f64 {
                    self.inner.observed_statistic()
                }
                fn degrees_of_freedom(&self) -> usize {
                    self.inner.degrees_of_freedom()
                }
                fn null_observations(&self) -> usize {
                    self.inner.null_observations()
                }
            }

            impl SurrogateMeasure for $wrapper {
                fn num_observations(&self) -> usize {
                    self.inner.num_observations()
                }
                fn observed(&self) -> f64 {
                    self.inner.observed()
                }
                fn with_source_ordering(&self, ordering: &[usize]) -> Result<f64> {
                    self.inner.with_source_ordering(ordering)
                }
            }
        )*
    };
}

/// Gaussian mutual information I(X; Y), with an optional lag `time_diff` of `X`.
#[derive(Debug, Clone)]
pub struct GaussianMutualInformation {
    inner: GaussianConditionalMutualInformation,
}

impl GaussianMutualInformation {
    pub fn new(x: impl Into<ContinuousData>, y: impl Into<ContinuousData>, bias_correction: bool) -> Result<Self> {
        Self::with_time_diff(x, y, 0, bias_correction)
    }

    pub fn with_time_diff(
        x: impl Into<ContinuousData>,
        y: impl Into<ContinuousData>,
        time_diff: usize,
        bias_correction: bool,
    ) -> Result<Self> {
        let (x, y) = lagged_pairs(x.into().into_array2().view(), y.into().into_array2().view(), time_diff)?;
        let z = Array2::<f64>::zeros((x.nrows(), 0));
        let inner = GaussianConditionalMutualInformation::from_parts(x.view(), y.view(), z.view(), bias_correction)?;
        Ok(Self { inner })
    }

    /// From a covariance over `[X | Y]` with `dims = [d_X, d_Y]`.
    pub fn from_covariance(covariance: Covariance, dims: [usize; 2], bias_correction: bool) -> Result<Self> {
        let inner =
            GaussianConditionalMutualInformation::from_covariance(covariance, [dims[0], dims[1], 0], bias_correction)?;
        Ok(Self { inner })
    }
}

/// Gaussian active information storage I(X_past; X_next).
#[derive(Debug, Clone)]
pub struct GaussianActiveInformation {
    inner: GaussianConditionalMutualInformation,
}

impl GaussianActiveInformation {
    pub fn new(series: impl Into<ContinuousData>, embedding: Embedding, bias_correction: bool) -> Result<Self> {
        let series = series.into().into_array2();
        let obs = ais_observations(series.view(), embedding)?;
        let z = Array2::<f64>::zeros((obs.next.nrows(), 0));
        let inner =
            GaussianConditionalMutualInformation::from_parts(obs.past.view(), obs.next.view(), z.view(), bias_correction)?;
        Ok(Self { inner })
    }
}

/// Gaussian (conditional) transfer entropy I(X_past; Y_next | Y_past, Z_past).
///
/// The analytic null has `d_source_past · d_dest` degrees of freedom.
#[derive(Debug, Clone)]
pub struct GaussianTransferEntropy {
    inner: GaussianConditionalMutualInformation,
}

impl GaussianTransferEntropy {
    pub fn new(
        source: impl Into<ContinuousData>,
        destination: impl Into<ContinuousData>,
        embedding: TeEmbedding,
        bias_correction: bool,
    ) -> Result<Self> {
        Self::with_conditionals(source, destination, Vec::<ContinuousData>::new(), embedding, bias_correction)
    }

    pub fn with_conditionals(
        source: impl Into<ContinuousData>,
        destination: impl Into<ContinuousData>,
        conditionals: Vec<impl Into<ContinuousData>>,
        embedding: TeEmbedding,
        bias_correction: bool,
    ) -> Result<Self> {
        let source = source.into().into_array2();
        let destination = destination.into().into_array2();
        let conditionals: Vec<Array2<f64>> = conditionals.into_iter().map(|c| c.into().into_array2()).collect();
        let views: Vec<_> = conditionals.iter().map(|c| c.view()).collect();
        let obs = te_observations(source.view(), destination.view(), &views, &embedding)?;
        let conditioning = obs.conditioning()?;
        let inner = GaussianConditionalMutualInformation::from_parts(
            obs.source_past.view(),
            obs.dest_next.view(),
            conditioning.view(),
            bias_correction,
        )?;
        Ok(Self { inner })
    }
}

delegate_to_cmi!(GaussianMutualInformation, GaussianActiveInformation, GaussianTransferEntropy);

impl MutualInformationEstimator for GaussianMutualInformation {}
impl TransferEntropyEstimator for GaussianTransferEntropy {}
