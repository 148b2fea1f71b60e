// SPDX-FileCopyrightText: 2025-2026 Carlson Büth <code@cbueth.de>
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error taxonomy shared by every estimator.
//!
//! Errors abort the current estimate or significance test and carry enough
//! context (role series, parameter) to diagnose the call. Nothing is retried.

use thiserror::Error;

/// Errors raised while configuring estimators, estimating measures or
/// building null distributions.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InfoError {
    /// Invalid embedding or neighbour parameters, mismatched series lengths.
    #[error("invalid configuration for `{parameter}`: {reason}")]
    Configuration {
        parameter: &'static str,
        reason: String,
    },

    /// Too few observations for the requested neighbour count or exclusion window.
    #[error("insufficient data for {context}: need more than {required} observations, got {available}")]
    InsufficientData {
        context: String,
        required: usize,
        available: usize,
    },

    /// Covariance matrix that is asymmetric, wrongly dimensioned or not positive-definite.
    #[error("invalid covariance matrix: {0}")]
    InvalidCovariance(String),

    /// A distance radius of zero where a logarithm of the radius is required.
    #[error("numeric degeneracy in {context} at sample {sample}")]
    NumericDegeneracy { context: &'static str, sample: usize },

    /// `test_significance` requested before any `estimate` on the current configuration.
    #[error("no estimate has been computed on the current configuration")]
    NotEstimated,

    /// The measure/approach combination does not offer the requested operation.
    #[error("{operation} is not supported by the {approach} approach")]
    Unsupported {
        operation: &'static str,
        approach: &'static str,
    },
}

impl InfoError {
    pub(crate) fn config(parameter: &'static str, reason: impl Into<String>) -> Self {
        InfoError::Configuration {
            parameter,
            reason: reason.into(),
        }
    }

    pub(crate) fn insufficient(context: impl Into<String>, required: usize, available: usize) -> Self {
        InfoError::InsufficientData {
            context: context.into(),
            required,
            available,
        }
    }
}

pub type Result<T> = std::result::Result<T, InfoError>;
