// SPDX-FileCopyrightText: 2025-2026 Carlson Büth <code@cbueth.de>
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! # Plug-in estimators for symbolic data
//!
//! Probabilities are empirical frequencies over a finite alphabet, so every
//! estimate is a plug-in sum over the observed support. Cells with zero joint
//! or marginal probability contribute nothing.
//!
//! - [`DiscreteEntropy`]: H = -Σ p ln p, local -ln p(x).
//! - [`MutualInformationDiscrete`]: accumulating joint and marginal count
//!   tables over `(x[t - time_diff], y[t])` pairs, with local values from the
//!   counts, a states-matrix convenience, a permutation null that reuses the
//!   marginal counts, and a chi-square null with `(b1 - 1)(b2 - 1)` dof.
//! - [`DiscreteMutualInformation`]: the same over two series, with locals.
//! - [`DiscreteConditionalMutualInformation`], [`DiscreteActiveInformation`]
//!   and [`DiscreteTransferEntropy`]: entropy sums over compact joint codes of
//!   the (embedded) role variables.

pub mod conditional;
pub mod discrete_utils;
pub mod mle;
pub mod mutual_info;

pub use conditional::{DiscreteActiveInformation, DiscreteConditionalMutualInformation, DiscreteTransferEntropy};
pub use discrete_utils::DiscreteData;
pub use mle::DiscreteEntropy;
pub use mutual_info::{DiscreteMutualInformation, MutualInformationDiscrete};
