// SPDX-FileCopyrightText: 2025-2026 Carlson Büth <code@cbueth.de>
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! # Linear-Gaussian estimators
//!
//! Closed-form measures under a joint-Gaussian assumption, from raw samples
//! (the covariance is estimated internally) or from a supplied covariance plus
//! observation count:
//!
//! - H(X) = ½ (d ln 2πe + ln|Σ_X|)
//! - I(X; Y) = ½ (ln|Σ_X| + ln|Σ_Y| - ln|Σ_XY|)
//! - I(X; Y | Z) = ½ (ln|Σ_XZ| + ln|Σ_YZ| - ln|Σ_Z| - ln|Σ_XYZ|)
//!
//! Log-determinants come from Cholesky factors, so a covariance that is not
//! positive-definite is rejected before any determinant is used.
//!
//! Under independence `2 N I` (in nats) is chi-square distributed with
//! `d_X · d_Y` degrees of freedom, which gives the analytic null and the
//! optional bias correction (subtracting its mean `d_X d_Y / 2N`).

pub mod covariance;
pub mod estimators;

pub use covariance::Covariance;
pub use estimators::{
    GaussianActiveInformation, GaussianConditionalMutualInformation, GaussianEntropy, GaussianMutualInformation,
    GaussianTransferEntropy,
};
