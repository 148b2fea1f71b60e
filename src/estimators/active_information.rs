// SPDX-FileCopyrightText: 2025-2026 Carlson Büth <code@cbueth.de>
//
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::config::{Embedding, KsgAlgorithm};
use crate::error::Result;
use crate::estimators::approaches::common_nd::dataset::ContinuousData;
use crate::estimators::approaches::discrete::DiscreteData;
use crate::estimators::approaches::kernel::KernelParams;
use crate::estimators::approaches::kraskov::KsgParams;
use crate::estimators::approaches::{discrete, gaussian, kernel, kraskov};

/// Active information storage: I(x_past; x_next) for a past window of
/// `history` values spaced `delay` apart.
pub struct ActiveInformation;

impl ActiveInformation {
    pub fn new_discrete(series: impl Into<DiscreteData>, embedding: Embedding) -> Result<discrete::DiscreteActiveInformation> {
        discrete::DiscreteActiveInformation::new(series, embedding)
    }

    pub fn new_kraskov(
        series: impl Into<ContinuousData>,
        embedding: Embedding,
        k: usize,
        algorithm: KsgAlgorithm,
    ) -> Result<kraskov::KraskovActiveInformation> {
        kraskov::KraskovActiveInformation::new(series, embedding, KsgParams::new(k).with_algorithm(algorithm))
    }

    pub fn new_kernel(
        series: impl Into<ContinuousData>,
        embedding: Embedding,
        width: f64,
    ) -> Result<kernel::KernelActiveInformation> {
        kernel::KernelActiveInformation::new(series, embedding, KernelParams::new(width))
    }

    pub fn new_gaussian(
        series: impl Into<ContinuousData>,
        embedding: Embedding,
        bias_correction: bool,
    ) -> Result<gaussian::GaussianActiveInformation> {
        gaussian::GaussianActiveInformation::new(series, embedding, bias_correction)
    }
}
