// SPDX-FileCopyrightText: 2025-2026 Carlson Büth <code@cbueth.de>
//
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::config::{KsgAlgorithm, TeEmbedding};
use crate::error::Result;
use crate::estimators::approaches::common_nd::dataset::ContinuousData;
use crate::estimators::approaches::discrete::DiscreteData;
use crate::estimators::approaches::kernel::KernelParams;
use crate::estimators::approaches::kraskov::KsgParams;
use crate::estimators::approaches::{discrete, gaussian, kernel, kraskov};

/// Transfer entropy and conditional transfer entropy estimators.
///
/// The [`TeEmbedding`] fixes destination and source histories and delays, the
/// source-destination lag and one embedding per conditioning series.
pub struct TransferEntropy;

impl TransferEntropy {
    /// Create a plug-in discrete transfer entropy estimator.
    pub fn new_discrete(
        source: impl Into<DiscreteData>,
        destination: impl Into<DiscreteData>,
        embedding: TeEmbedding,
    ) -> Result<discrete::DiscreteTransferEntropy> {
        discrete::DiscreteTransferEntropy::new(source, destination, embedding)
    }

    /// Create a KSG transfer entropy estimator.
    pub fn new_kraskov(
        source: impl Into<ContinuousData>,
        destination: impl Into<ContinuousData>,
        embedding: TeEmbedding,
        k: usize,
        algorithm: KsgAlgorithm,
    ) -> Result<kraskov::KraskovTransferEntropy> {
        kraskov::KraskovTransferEntropy::new(source, destination, embedding, KsgParams::new(k).with_algorithm(algorithm))
    }

    /// Create a box-kernel transfer entropy estimator.
    pub fn new_kernel(
        source: impl Into<ContinuousData>,
        destination: impl Into<ContinuousData>,
        embedding: TeEmbedding,
        width: f64,
    ) -> Result<kernel::KernelTransferEntropy> {
        kernel::KernelTransferEntropy::new(source, destination, embedding, KernelParams::new(width))
    }

    /// Create a Gaussian transfer entropy estimator.
    pub fn new_gaussian(
        source: impl Into<ContinuousData>,
        destination: impl Into<ContinuousData>,
        embedding: TeEmbedding,
        bias_correction: bool,
    ) -> Result<gaussian::GaussianTransferEntropy> {
        gaussian::GaussianTransferEntropy::new(source, destination, embedding, bias_correction)
    }

    /// Create a plug-in discrete conditional transfer entropy estimator.
    pub fn new_cte_discrete(
        source: impl Into<DiscreteData>,
        destination: impl Into<DiscreteData>,
        conditionals: Vec<impl Into<DiscreteData>>,
        embedding: TeEmbedding,
    ) -> Result<discrete::DiscreteTransferEntropy> {
        discrete::DiscreteTransferEntropy::with_conditionals(source, destination, conditionals, embedding)
    }

    /// Create a KSG conditional transfer entropy estimator.
    pub fn new_cte_kraskov(
        source: impl Into<ContinuousData>,
        destination: impl Into<ContinuousData>,
        conditionals: Vec<impl Into<ContinuousData>>,
        embedding: TeEmbedding,
        k: usize,
        algorithm: KsgAlgorithm,
    ) -> Result<kraskov::KraskovTransferEntropy> {
        let params = KsgParams::new(k).with_algorithm(algorithm);
        kraskov::KraskovTransferEntropy::with_conditionals(source, destination, conditionals, embedding, params)
    }

    /// Create a box-kernel conditional transfer entropy estimator.
    pub fn new_cte_kernel(
        source: impl Into<ContinuousData>,
        destination: impl Into<ContinuousData>,
        conditionals: Vec<impl Into<ContinuousData>>,
        embedding: TeEmbedding,
        width: f64,
    ) -> Result<kernel::KernelTransferEntropy> {
        kernel::KernelTransferEntropy::with_conditionals(source, destination, conditionals, embedding, KernelParams::new(width))
    }

    /// Create a Gaussian conditional transfer entropy estimator.
    pub fn new_cte_gaussian(
        source: impl Into<ContinuousData>,
        destination: impl Into<ContinuousData>,
        conditionals: Vec<impl Into<ContinuousData>>,
        embedding: TeEmbedding,
        bias_correction: bool,
    ) -> Result<gaussian::GaussianTransferEntropy> {
        gaussian::GaussianTransferEntropy::with_conditionals(source, destination, conditionals, embedding, bias_correction)
    }
}
