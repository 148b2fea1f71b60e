// SPDX-FileCopyrightText: 2025-2026 Carlson Büth <code@cbueth.de>
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! # Box-kernel estimation
//!
//! The probability of the neighbourhood of sample i is estimated by counting
//! the samples whose max-norm distance to it is at most the kernel width ε
//! (the half side of the box), the sample itself included:
//!
//! p̂(x_i) = c_i / N_i
//!
//! where `N_i` is the number of samples admitted by the dynamic exclusion
//! window (all of them when the window is 0). Differential entropy divides by
//! the box volume (2ε)^d:
//!
//! ĥ(x_i) = -ln( c_i / (N_i (2ε)^d) )
//!
//! and MI, CMI, AIS and TE are log ratios of such counts, in which the
//! volumes cancel. Widths are in the units of the (usually normalised) data.

pub mod box_kernel;

pub use box_kernel::{
    KernelActiveInformation, KernelConditionalMutualInformation, KernelEntropy, KernelMutualInformation,
    KernelTransferEntropy,
};

use ndarray::Array1;

use crate::error::{InfoError, Result};
use crate::estimators::approaches::common_nd::joint_search::{JointSearcher, Subspace};
use crate::estimators::approaches::kraskov::local_terms;

/// Kernel width and exclusion window shared by the box-kernel estimators.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KernelParams {
    pub width: f64,
    pub exclusion_window: usize,
}

impl KernelParams {
    pub fn new(width: f64) -> Self {
        Self { width, exclusion_window: 0 }
    }

    pub fn with_exclusion_window(mut self, exclusion_window: usize) -> Self {
        self.exclusion_window = exclusion_window;
        self
    }

    pub(crate) fn validate(&self, n: usize) -> Result<()> {
        if !self.width.is_finite() || self.width <= 0.0 {
            return Err(InfoError::config("kernel_width", format!("must be finite and > 0, got {}", self.width)));
        }
        if n == 0 {
            return Err(InfoError::insufficient("box-kernel estimation", 0, n));
        }
        Ok(())
    }
}

/// Samples admitted around `i` by the exclusion window, `i` itself included.
pub(crate) fn admissible(n: usize, i: usize, window: usize) -> usize {
    let lower = i.saturating_sub(window);
    let upper = (i + window).min(n - 1);
    n - (upper - lower)
}

/// Per-sample box counts (self included) in each of `spaces`.
pub(crate) fn box_counts(searcher: &JointSearcher, spaces: &[Subspace], params: KernelParams) -> Result<Vec<Array1<f64>>> {
    let n = searcher.len();
    spaces
        .iter()
        .map(|space| {
            local_terms(
                n,
                || (),
                |_, i| Ok((searcher.count_within_r(space, i, params.width, true, params.exclusion_window, None) + 1) as f64),
            )
        })
        .collect()
}
