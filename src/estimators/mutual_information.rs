// SPDX-FileCopyrightText: 2025-2026 Carlson Büth <code@cbueth.de>
//
// SPDX-License-Identifier: MIT OR Apache-2.0

use ndarray::Array1;

use crate::config::KsgAlgorithm;
use crate::error::Result;
use crate::estimators::approaches::common_nd::dataset::ContinuousData;
use crate::estimators::approaches::discrete::DiscreteData;
use crate::estimators::approaches::gaussian::Covariance;
use crate::estimators::approaches::kernel::KernelParams;
use crate::estimators::approaches::kraskov::KsgParams;
use crate::estimators::approaches::{discrete, gaussian, kernel, kraskov};

/// Mutual information and conditional mutual information estimators.
///
/// `time_diff` lags the first variable: observations pair `x[t - time_diff]`
/// with `y[t]`.
pub struct MutualInformation;

impl MutualInformation {
    /// Create a plug-in discrete MI estimator over two symbol series.
    pub fn new_discrete(x: Array1<i32>, y: Array1<i32>, time_diff: usize) -> Result<discrete::DiscreteMutualInformation> {
        discrete::DiscreteMutualInformation::with_time_diff(x, y, time_diff)
    }

    /// Create a KSG estimator with `k` neighbours and the given algorithm.
    pub fn new_kraskov(
        x: impl Into<ContinuousData>,
        y: impl Into<ContinuousData>,
        k: usize,
        algorithm: KsgAlgorithm,
        time_diff: usize,
    ) -> Result<kraskov::KraskovMutualInformation> {
        kraskov::KraskovMutualInformation::with_time_diff(x, y, time_diff, KsgParams::new(k).with_algorithm(algorithm))
    }

    /// Create a box-kernel MI estimator with kernel half width `width`.
    pub fn new_kernel(
        x: impl Into<ContinuousData>,
        y: impl Into<ContinuousData>,
        width: f64,
        time_diff: usize,
    ) -> Result<kernel::KernelMutualInformation> {
        kernel::KernelMutualInformation::with_time_diff(x, y, time_diff, KernelParams::new(width))
    }

    /// Create a Gaussian MI estimator from samples.
    pub fn new_gaussian(
        x: impl Into<ContinuousData>,
        y: impl Into<ContinuousData>,
        time_diff: usize,
        bias_correction: bool,
    ) -> Result<gaussian::GaussianMutualInformation> {
        gaussian::GaussianMutualInformation::with_time_diff(x, y, time_diff, bias_correction)
    }

    /// Create a Gaussian MI estimator from a covariance over `[X | Y]`.
    pub fn gaussian_from_covariance(
        covariance: Covariance,
        dims: [usize; 2],
        bias_correction: bool,
    ) -> Result<gaussian::GaussianMutualInformation> {
        gaussian::GaussianMutualInformation::from_covariance(covariance, dims, bias_correction)
    }

    /// Create a plug-in discrete CMI estimator I(X; Y | Z).
    pub fn new_cmi_discrete(
        x: impl Into<DiscreteData>,
        y: impl Into<DiscreteData>,
        z: impl Into<DiscreteData>,
    ) -> Result<discrete::DiscreteConditionalMutualInformation> {
        discrete::DiscreteConditionalMutualInformation::new(x, y, z)
    }

    /// Create a KSG CMI estimator; an empty `z` reduces to MI.
    pub fn new_cmi_kraskov(
        x: impl Into<ContinuousData>,
        y: impl Into<ContinuousData>,
        z: impl Into<ContinuousData>,
        k: usize,
        algorithm: KsgAlgorithm,
    ) -> Result<kraskov::KraskovConditionalMutualInformation> {
        kraskov::KraskovConditionalMutualInformation::new(x, y, z, KsgParams::new(k).with_algorithm(algorithm))
    }

    /// Create a box-kernel CMI estimator.
    pub fn new_cmi_kernel(
        x: impl Into<ContinuousData>,
        y: impl Into<ContinuousData>,
        z: impl Into<ContinuousData>,
        width: f64,
    ) -> Result<kernel::KernelConditionalMutualInformation> {
        kernel::KernelConditionalMutualInformation::new(x, y, z, KernelParams::new(width))
    }

    /// Create a Gaussian CMI estimator from samples.
    pub fn new_cmi_gaussian(
        x: impl Into<ContinuousData>,
        y: impl Into<ContinuousData>,
        z: impl Into<ContinuousData>,
        bias_correction: bool,
    ) -> Result<gaussian::GaussianConditionalMutualInformation> {
        gaussian::GaussianConditionalMutualInformation::new(x, y, z, bias_correction)
    }

    /// Create a Gaussian CMI estimator from a covariance over `[X | Y | Z]`.
    pub fn cmi_gaussian_from_covariance(
        covariance: Covariance,
        dims: [usize; 3],
        bias_correction: bool,
    ) -> Result<gaussian::GaussianConditionalMutualInformation> {
        gaussian::GaussianConditionalMutualInformation::from_covariance(covariance, dims, bias_correction)
    }
}
