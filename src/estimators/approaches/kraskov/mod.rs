// SPDX-FileCopyrightText: 2025-2026 Carlson Büth <code@cbueth.de>
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! # Kraskov (KSG) nearest-neighbour estimators
//!
//! For every sample the K nearest neighbours are found in the full joint space
//! under the max-norm, giving a radius ε_i. Neighbours are then counted within
//! ε_i in marginal (or conditioning-gated) subspaces and the digamma
//! corrections of those counts are averaged over the samples.
//!
//! ## Algorithms
//!
//! - **Algorithm 1**: marginal counts strictly inside the joint radius,
//!   `I = ψ(k) + ψ(N) - <ψ(n_x + 1) + ψ(n_y + 1)>`.
//! - **Algorithm 2**: marginal counts within the per-variable radii spanned by
//!   the K neighbours (edge inclusive),
//!   `I = ψ(k) - 1/k + ψ(N) - <ψ(n_x) + ψ(n_y)>`.
//!
//! Conditional MI restricts the marginal counts to the samples that are
//! neighbours in the conditioning space, so conditioning gates which samples
//! count rather than being subtracted as a separate estimate.
//!
//! Every neighbour search of one estimate honours the same dynamic correlation
//! exclusion window. All values are in nats and every estimator computes its
//! local values eagerly; the global value is their mean.

pub mod active_info;
pub mod conditional;
pub mod entropy;
pub mod mutual_info;
pub mod transfer_entropy;

pub use active_info::KraskovActiveInformation;
pub use conditional::KraskovConditionalMutualInformation;
pub use entropy::{KozachenkoLeonenkoEntropy, KraskovEntropy};
pub use mutual_info::KraskovMutualInformation;
pub use transfer_entropy::KraskovTransferEntropy;

use ndarray::Array1;
#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::config::KsgAlgorithm;
use crate::error::{InfoError, Result};

/// Neighbour count, algorithm and exclusion window shared by every KSG estimator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KsgParams {
    pub k: usize,
    pub algorithm: KsgAlgorithm,
    pub exclusion_window: usize,
}

impl KsgParams {
    pub fn new(k: usize) -> Self {
        Self { k, algorithm: KsgAlgorithm::One, exclusion_window: 0 }
    }

    pub fn with_algorithm(mut self, algorithm: KsgAlgorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    pub fn with_exclusion_window(mut self, exclusion_window: usize) -> Self {
        self.exclusion_window = exclusion_window;
        self
    }

    /// Check `k` against the number of observations `n`.
    pub(crate) fn validate(&self, n: usize) -> Result<()> {
        if self.k == 0 {
            return Err(InfoError::config("k", "neighbour count must be >= 1"));
        }
        if self.k >= n {
            return Err(InfoError::config(
                "k",
                format!("neighbour count {} must be below the {n} observations", self.k),
            ));
        }
        if n <= self.k + 2 * self.exclusion_window {
            return Err(InfoError::insufficient(
                format!("{}-nearest-neighbour search with exclusion window {}", self.k, self.exclusion_window),
                self.k + 2 * self.exclusion_window,
                n,
            ));
        }
        Ok(())
    }
}

impl Default for KsgParams {
    fn default() -> Self {
        Self::new(4)
    }
}

#[inline]
pub(crate) fn digamma(x: f64) -> f64 {
    statrs::function::gamma::digamma(x)
}

/// Evaluate `term` for every sample, in parallel when the `parallel` feature is
/// on. `init` creates per-worker scratch state; results keep sample order.
pub(crate) fn local_terms<S, I, F>(n: usize, init: I, term: F) -> Result<Array1<f64>>
where
    S: Send,
    I: Fn() -> S + Sync + Send,
    F: Fn(&mut S, usize) -> Result<f64> + Sync + Send,
{
    #[cfg(feature = "parallel")]
    let values: Vec<f64> = (0..n)
        .into_par_iter()
        .map_init(init, |scratch, i| term(scratch, i))
        .collect::<Result<_>>()?;

    #[cfg(not(feature = "parallel"))]
    let values: Vec<f64> = {
        let mut scratch = init();
        (0..n).map(|i| term(&mut scratch, i)).collect::<Result<_>>()?
    };

    Ok(Array1::from(values))
}

/// Mean of local values, 0 when there are none.
pub(crate) fn mean_of(locals: &Array1<f64>) -> f64 {
    locals.mean().unwrap_or(0.0)
}
