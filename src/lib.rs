// SPDX-FileCopyrightText: 2025-2026 Carlson Büth <code@cbueth.de>
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! # infodynamics
//!
//! Estimators of information dynamics between time series: entropy, mutual
//! information, conditional mutual information, active information storage
//! and (conditional) transfer entropy, with permutation and analytic
//! significance testing.
//!
//! ## Quick Start
//!
//! ```rust
//! use infodynamics::estimators::transfer_entropy::TransferEntropy;
//! use infodynamics::estimators::traits::GlobalValue;
//! use infodynamics::{KsgAlgorithm, TeEmbedding};
//! use ndarray::Array1;
//!
//! let source = Array1::from_iter((0..400).map(|t| (t as f64 * 0.37).sin()));
//! let destination = Array1::from_iter((0..400).map(|t| (t as f64 * 0.37 - 0.37).sin() + 0.1 * (t as f64 * 1.3).cos()));
//! let te = TransferEntropy::new_kraskov(source, destination, TeEmbedding::new(1, 1), 4, KsgAlgorithm::One)
//!     .unwrap()
//!     .global_value();
//! assert!(te.is_finite());
//! ```
//!
//! ## Features
//!
//! | Measure | Kraskov (KSG) | Box kernel | Gaussian | Discrete |
//! |---------|---------------|------------|----------|----------|
//! | Entropy | ✅ | ✅ | ✅ | ✅ |
//! | Mutual Information | ✅ | ✅ | ✅ | ✅ |
//! | Conditional Mutual Information | ✅ | ✅ | ✅ | ✅ |
//! | Active Information Storage | ✅ | ✅ | ✅ | ✅ |
//! | (Conditional) Transfer Entropy | ✅ | ✅ | ✅ | ✅ |
//! | Analytic null | | | ✅ | ✅ |
//!
//! ## Estimation Approaches
//!
//! ### Kraskov (KSG)
//! Nearest-neighbour estimation under the max-norm on sorted per-column
//! indices, algorithms 1 and 2, with conditioning that gates the marginal
//! counts and a dynamic correlation exclusion window.
//!
//! ### Box kernel
//! Fixed-width max-norm box counts on (normalised) data.
//!
//! ### Gaussian
//! Log-determinant formulas from raw samples or from a supplied covariance,
//! with a chi-square analytic null and optional bias correction.
//!
//! ### Discrete
//! Plug-in estimates from frequency counts over finite alphabets.
//!
//! ## Architecture
//!
//! 1. **Calculator**: [`Calculator`] selects an estimator from an
//!    [`EstimatorConfig`], estimates, and tests significance.
//! 2. **Public API Layer**: Factory types (`Entropy`, `MutualInformation`,
//!    `TransferEntropy`, `ActiveInformation`)
//! 3. **Estimation Approaches**: Kraskov, kernel, Gaussian, discrete
//! 4. **Core Infrastructure**: neighbour search, embedding, shared traits and
//!    the significance engine
//!
//! ## Feature Flags
//!
//! - `parallel` (default): evaluate local terms and surrogates on the rayon pool
//!
//! All values are computed in nats; the calculator converts to bits when
//! configured with [`Units::Bits`].

pub mod config;
pub mod error;
pub mod estimators;

pub use config::{
    Approach, AutoEmbed, BiasCorrection, ConditionalEmbedding, Embedding, EstimatorConfig, KsgAlgorithm,
    MeasureKind, PValuePolicy, TeEmbedding, Units,
};
pub use error::{InfoError, Result};
pub use estimators::calculator::{Calculator, Series};
pub use estimators::significance::{NullDistribution, SignificanceMode};
