// SPDX-FileCopyrightText: 2025-2026 Carlson Büth <code@cbueth.de>
//
// SPDX-License-Identifier: MIT OR Apache-2.0

use ndarray::Array2;

use crate::error::Result;
use crate::estimators::approaches::common_nd::dataset::ContinuousData;
use crate::estimators::approaches::discrete::DiscreteData;
use crate::estimators::approaches::gaussian::Covariance;
use crate::estimators::approaches::kernel::KernelParams;
use crate::estimators::approaches::kraskov::KsgParams;
use crate::estimators::approaches::{discrete, gaussian, kernel, kraskov};
pub use crate::estimators::traits::{GlobalValue, LocalValues};

/// Entropy estimation methods for various data types
///
/// This struct provides static methods for creating entropy estimators
/// for different types of data and estimation approaches. All values are in nats.
pub struct Entropy;

impl Entropy {
    /// Creates a plug-in entropy estimator for symbolic data
    ///
    /// # Arguments
    ///
    /// * `data` - Symbols, one per time step (1D) or one vector per time step (2D)
    ///
    /// # Returns
    ///
    /// A discrete entropy estimator, or an error for empty data
    pub fn new_discrete(data: impl Into<DiscreteData>) -> Result<discrete::DiscreteEntropy> {
        discrete::DiscreteEntropy::new(data)
    }

    /// Creates a box-kernel entropy estimator
    ///
    /// # Arguments
    ///
    /// * `data` - Input data (1D or 2D, rows are samples)
    /// * `width` - Half side of the max-norm box, in data units
    pub fn new_kernel(data: impl Into<ContinuousData>, width: f64) -> Result<kernel::KernelEntropy> {
        kernel::KernelEntropy::new(data, KernelParams::new(width))
    }

    /// Creates a max-norm Kozachenko–Leonenko entropy estimator with `k` neighbours
    pub fn new_kraskov(data: impl Into<ContinuousData>, k: usize) -> Result<kraskov::KraskovEntropy> {
        kraskov::KraskovEntropy::new(data, KsgParams::new(k))
    }

    /// Creates a Euclidean Kozachenko–Leonenko entropy estimator over `K`-dimensional data
    ///
    /// # Arguments
    ///
    /// * `data` - Two-dimensional array with exactly `K` columns
    /// * `k` - Number of nearest neighbours
    pub fn nd_kozachenko_leonenko<const K: usize>(
        data: Array2<f64>,
        k: usize,
    ) -> Result<kraskov::KozachenkoLeonenkoEntropy<K>> {
        kraskov::KozachenkoLeonenkoEntropy::new(data, k)
    }

    /// Creates a Gaussian entropy estimator from samples
    pub fn new_gaussian(data: impl Into<ContinuousData>) -> Result<gaussian::GaussianEntropy> {
        gaussian::GaussianEntropy::new(data)
    }

    /// Creates a Gaussian entropy estimator from a validated covariance
    pub fn gaussian_from_covariance(covariance: Covariance) -> Result<gaussian::GaussianEntropy> {
        gaussian::GaussianEntropy::from_covariance(covariance)
    }
}
