// SPDX-FileCopyrightText: 2025-2026 Carlson Büth <code@cbueth.de>
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Null distributions for any measure, by surrogate permutation or analytically.
//!
//! Permutation mode reorders only the source variable: destination and
//! conditioning variables stay fixed. Orderings are drawn up front from a
//! caller-supplied generator, so the draws are identical whether or not the
//! surrogates are evaluated in parallel (feature `parallel`).
//!
//! All values are held in nats; [`NullDistribution::in_units`] selects the
//! units the accessors report in.

use rand::Rng;
use rand::seq::SliceRandom;
#[cfg(feature = "parallel")]
use rayon::prelude::*;
use statrs::distribution::{ChiSquared, ContinuousCDF};
use tracing::{debug, warn};

use crate::config::{PValuePolicy, Units};
use crate::error::{InfoError, Result};
use crate::estimators::traits::{AnalyticNull, SurrogateMeasure};

/// Below this many permutations an empirical p-value is too coarse to trust.
pub const MIN_RECOMMENDED_PERMUTATIONS: usize = 20;

/// How a null distribution is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignificanceMode {
    /// Recompute the measure on `count` random reorderings of the source.
    Permutation { count: usize },
    /// Parametric chi-square null (Gaussian and discrete estimators only).
    Analytic,
}

/// Reference distribution of a measure under the null hypothesis of no
/// relationship between source and destination.
#[derive(Debug, Clone, PartialEq)]
pub enum NullDistribution {
    Empirical {
        actual: f64,
        draws: Vec<f64>,
        p_value: f64,
        units: Units,
    },
    ChiSquare {
        actual: f64,
        degrees_of_freedom: usize,
        observations: usize,
        p_value: f64,
        units: Units,
    },
}

impl NullDistribution {
    fn units(&self) -> Units {
        match self {
            NullDistribution::Empirical { units, .. } | NullDistribution::ChiSquare { units, .. } => *units,
        }
    }

    /// Report values in `units` from now on.
    pub fn in_units(mut self, target: Units) -> Self {
        match &mut self {
            NullDistribution::Empirical { units, .. } | NullDistribution::ChiSquare { units, .. } => *units = target,
        }
        self
    }

    /// The measure on the original data.
    pub fn actual_value(&self) -> f64 {
        let actual = match self {
            NullDistribution::Empirical { actual, .. } | NullDistribution::ChiSquare { actual, .. } => *actual,
        };
        self.units().from_nats(actual)
    }

    /// One-sided probability of a null value at least as large as the actual one.
    pub fn p_value(&self) -> f64 {
        match self {
            NullDistribution::Empirical { p_value, .. } | NullDistribution::ChiSquare { p_value, .. } => *p_value,
        }
    }

    /// Null draws in report units; empty for the analytic null.
    pub fn draws(&self) -> Vec<f64> {
        match self {
            NullDistribution::Empirical { draws, units, .. } => draws.iter().map(|&d| units.from_nats(d)).collect(),
            NullDistribution::ChiSquare { .. } => Vec::new(),
        }
    }

    /// Mean of the null distribution: the expected bias of the estimator
    /// when there is no relationship.
    pub fn mean(&self) -> f64 {
        let mean = match self {
            NullDistribution::Empirical { draws, .. } => {
                if draws.is_empty() {
                    0.0
                } else {
                    draws.iter().sum::<f64>() / draws.len() as f64
                }
            }
            NullDistribution::ChiSquare { degrees_of_freedom, observations, .. } => {
                *degrees_of_freedom as f64 / (2.0 * *observations as f64)
            }
        };
        self.units().from_nats(mean)
    }

    /// Variance of the null distribution (sample variance for empirical draws).
    pub fn variance(&self) -> f64 {
        let variance = match self {
            NullDistribution::Empirical { draws, .. } => {
                let n = draws.len();
                if n < 2 {
                    0.0
                } else {
                    let mean = draws.iter().sum::<f64>() / n as f64;
                    draws.iter().map(|d| (d - mean) * (d - mean)).sum::<f64>() / (n - 1) as f64
                }
            }
            // Var[X / 2N] for X ~ chi2(dof) is 2 dof / (2N)^2.
            NullDistribution::ChiSquare { degrees_of_freedom, observations, .. } => {
                let n = *observations as f64;
                *degrees_of_freedom as f64 / (2.0 * n * n)
            }
        };
        let scale = self.units().from_nats(1.0);
        variance * scale * scale
    }

    pub fn std_dev(&self) -> f64 {
        self.variance().sqrt()
    }

    /// Distance of the actual value from the null mean in null standard deviations.
    ///
    /// With a degenerate null (zero spread) the score is 0 when the actual
    /// value sits on the null mean and `None` otherwise.
    pub fn z_score(&self) -> Option<f64> {
        let distance = self.actual_value() - self.mean();
        let std_dev = self.std_dev();
        if std_dev > 0.0 {
            return Some(distance / std_dev);
        }
        if distance == 0.0 {
            return Some(0.0);
        }
        warn!(actual = self.actual_value(), mean = self.mean(), "null distribution has zero spread; no z-score");
        None
    }

    /// Number of null draws (0 for the analytic null).
    pub fn num_draws(&self) -> usize {
        match self {
            NullDistribution::Empirical { draws, .. } => draws.len(),
            NullDistribution::ChiSquare { .. } => 0,
        }
    }
}

/// `count` independent uniformly random orderings of `0..n` (not guaranteed distinct).
pub fn generate_permutations<R: Rng + ?Sized>(n: usize, count: usize, rng: &mut R) -> Vec<Vec<usize>> {
    (0..count)
        .map(|_| {
            let mut ordering: Vec<usize> = (0..n).collect();
            ordering.shuffle(rng);
            ordering
        })
        .collect()
}

/// Empirical p-value of `actual` against `draws` under `policy`.
pub fn empirical_p_value(actual: f64, draws: &[f64], policy: PValuePolicy) -> f64 {
    let at_least = draws.iter().filter(|&&d| d >= actual).count();
    match policy {
        PValuePolicy::GreaterOrEqual => {
            if draws.is_empty() {
                1.0
            } else {
                at_least as f64 / draws.len() as f64
            }
        }
        PValuePolicy::PlusOne => (at_least + 1) as f64 / (draws.len() + 1) as f64,
    }
}

/// Evaluate `measure` on every ordering and compare against its observed value.
pub fn permutation_test<M: SurrogateMeasure + ?Sized>(
    measure: &M,
    orderings: &[Vec<usize>],
    policy: PValuePolicy,
) -> Result<NullDistribution> {
    let n = measure.num_observations();
    if orderings.is_empty() {
        return Err(InfoError::config("permutations", "at least one permutation is required"));
    }
    if let Some(bad) = orderings.iter().find(|o| o.len() != n) {
        return Err(InfoError::config(
            "permutations",
            format!("ordering of length {} does not match {n} observations", bad.len()),
        ));
    }
    if orderings.len() < MIN_RECOMMENDED_PERMUTATIONS {
        warn!(
            permutations = orderings.len(),
            "p-value computed from fewer than {MIN_RECOMMENDED_PERMUTATIONS} permutations"
        );
    }

    #[cfg(feature = "parallel")]
    let draws: Vec<f64> = orderings
        .par_iter()
        .map(|ordering| measure.with_source_ordering(ordering))
        .collect::<Result<_>>()?;

    #[cfg(not(feature = "parallel"))]
    let draws: Vec<f64> = orderings
        .iter()
        .map(|ordering| measure.with_source_ordering(ordering))
        .collect::<Result<_>>()?;

    let actual = measure.observed();
    let p_value = empirical_p_value(actual, &draws, policy);
    debug!(permutations = draws.len(), actual, p_value, "permutation test complete");
    Ok(NullDistribution::Empirical {
        actual,
        draws,
        p_value,
        units: Units::Nats,
    })
}

/// Chi-square null of `2 N I` with the measure's degrees of freedom.
pub fn analytic_test<M: AnalyticNull + ?Sized>(measure: &M) -> Result<NullDistribution> {
    let dof = measure.degrees_of_freedom();
    let observations = measure.null_observations();
    if dof == 0 {
        return Err(InfoError::config("degrees_of_freedom", "analytic null needs at least one degree of freedom"));
    }
    if observations == 0 {
        return Err(InfoError::insufficient("analytic null distribution", 0, 0));
    }
    let actual = measure.observed_statistic();
    let chi2 = ChiSquared::new(dof as f64).map_err(|e| InfoError::config("degrees_of_freedom", e.to_string()))?;
    let statistic = (2.0 * observations as f64 * actual).max(0.0);
    let p_value = 1.0 - chi2.cdf(statistic);
    debug!(dof, observations, actual, p_value, "analytic chi-square test complete");
    Ok(NullDistribution::ChiSquare {
        actual,
        degrees_of_freedom: dof,
        observations,
        p_value,
        units: Units::Nats,
    })
}
