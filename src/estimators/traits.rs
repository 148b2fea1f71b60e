// SPDX-FileCopyrightText: 2025-2026 Carlson Büth <code@cbueth.de>
//
// SPDX-License-Identifier: MIT OR Apache-2.0

use ndarray::Array1;

use crate::error::Result;

pub trait GlobalValue {
    /// Return the global value of the measure, in nats.
    fn global_value(&self) -> f64;
}

pub trait LocalValues: GlobalValue {
    /// Return the local (per-observation) values of the measure, in nats.
    fn local_values(&self) -> Array1<f64>;

    /// Derive the global value as the mean of the local values.
    fn global_from_local(&self) -> f64 {
        self.local_values().mean().unwrap_or(0.0)
    }
}

/// Optional interface for estimators that may not support local values.
///
/// Estimators that do support local values return `supports_local() = true`
/// and provide them via `Ok(Array1<f64>)`. Estimators that do not return
/// `supports_local() = false` and an `Err` with a brief reason.
pub trait OptionalLocalValues {
    fn supports_local(&self) -> bool;
    fn local_values_opt(&self) -> std::result::Result<Array1<f64>, &'static str>;
}

/// A measure that can be recomputed after reordering its source variable
/// while every other role variable stays fixed.
///
/// Implementors are shared read-only across surrogate evaluations, hence `Sync`.
pub trait SurrogateMeasure: Sync {
    /// Number of source rows an ordering must permute.
    fn num_observations(&self) -> usize;

    /// The measure (nats) on the original ordering.
    fn observed(&self) -> f64;

    /// The measure (nats) with source row `i` replaced by source row `ordering[i]`.
    fn with_source_ordering(&self, ordering: &[usize]) -> Result<f64>;
}

/// A measure with a parametric chi-square null under independence: `2 N I`
/// (with `I` in nats) is chi-square distributed with `degrees_of_freedom` dof.
pub trait AnalyticNull {
    fn observed_statistic(&self) -> f64;
    fn degrees_of_freedom(&self) -> usize;
    fn null_observations(&self) -> usize;
}

/// Marker trait for mutual information estimator instances.
pub trait MutualInformationEstimator: GlobalValue + OptionalLocalValues {}

/// Marker trait for conditional mutual information estimator instances.
pub trait ConditionalMutualInformationEstimator: GlobalValue + OptionalLocalValues {}

/// Marker trait for (conditional) transfer entropy estimator instances.
pub trait TransferEntropyEstimator: GlobalValue + OptionalLocalValues {}
