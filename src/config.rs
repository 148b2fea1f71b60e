// SPDX-FileCopyrightText: 2025-2026 Carlson Büth <code@cbueth.de>
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Validated estimator configuration.
//!
//! Every tunable of a [`Calculator`](crate::estimators::calculator::Calculator)
//! is an enumerated field here; there are no string-keyed properties. Use the
//! approach constructors ([`EstimatorConfig::kraskov`], [`EstimatorConfig::gaussian`],
//! [`EstimatorConfig::kernel`], [`EstimatorConfig::discrete`]) and refine with the
//! `with_*` builders, then call [`EstimatorConfig::validate`] (which
//! `Calculator::configure` does for you).

use crate::error::{InfoError, Result};

/// Logarithm base of reported values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Units {
    #[default]
    Nats,
    Bits,
}

impl Units {
    /// Convert a value computed in nats into these units.
    pub fn from_nats(self, value: f64) -> f64 {
        match self {
            Units::Nats => value,
            Units::Bits => value / std::f64::consts::LN_2,
        }
    }

    /// Convert a value in these units back into nats.
    pub fn to_nats(self, value: f64) -> f64 {
        match self {
            Units::Nats => value,
            Units::Bits => value * std::f64::consts::LN_2,
        }
    }
}

/// Kraskov–Stögbauer–Grassberger algorithm variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KsgAlgorithm {
    /// Marginal counts strictly inside the joint K-th neighbour radius.
    #[default]
    One,
    /// Marginal counts within per-variable radii spanned by the K neighbours.
    Two,
}

/// Estimator family, selected once at configuration time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Approach {
    Kraskov { k: usize, algorithm: KsgAlgorithm },
    Kernel { width: f64 },
    Gaussian { bias_correction: bool },
    Discrete,
}

impl Approach {
    pub fn name(&self) -> &'static str {
        match self {
            Approach::Kraskov { .. } => "kraskov",
            Approach::Kernel { .. } => "kernel",
            Approach::Gaussian { .. } => "gaussian",
            Approach::Discrete => "discrete",
        }
    }
}

/// Measure computed by a calculator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeasureKind {
    Entropy,
    MutualInformation,
    ConditionalMutualInformation,
    ActiveInformationStorage,
    TransferEntropy,
}

/// History length and delay of a past-window embedding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Embedding {
    pub history: usize,
    pub delay: usize,
}

impl Embedding {
    pub fn new(history: usize, delay: usize) -> Self {
        Self { history, delay }
    }

    /// Time steps spanned by the embedding vector, minus one.
    pub fn span(&self) -> usize {
        (self.history - 1) * self.delay
    }

    pub(crate) fn validate(&self, parameter: &'static str) -> Result<()> {
        if self.history == 0 {
            return Err(InfoError::config(parameter, "history length must be >= 1"));
        }
        if self.delay == 0 {
            return Err(InfoError::config(parameter, "embedding delay must be >= 1"));
        }
        Ok(())
    }
}

impl Default for Embedding {
    fn default() -> Self {
        Self { history: 1, delay: 1 }
    }
}

/// Embedding of one conditioning series for conditional transfer entropy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConditionalEmbedding {
    pub embedding: Embedding,
    /// Delay from the conditional's most recent value to the destination's next value.
    pub lag: usize,
}

impl ConditionalEmbedding {
    pub fn new(history: usize, delay: usize, lag: usize) -> Self {
        Self { embedding: Embedding::new(history, delay), lag }
    }
}

impl Default for ConditionalEmbedding {
    fn default() -> Self {
        Self { embedding: Embedding::default(), lag: 1 }
    }
}

/// Embedding of every role variable of a (conditional) transfer entropy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeEmbedding {
    pub destination: Embedding,
    pub source: Embedding,
    /// Source-destination lag `u`: the most recent source value used is `t + 1 - u`.
    pub source_delay: usize,
    pub conditionals: Vec<ConditionalEmbedding>,
}

impl TeEmbedding {
    /// Destination history `k` and source history `l`, unit delays and lag.
    pub fn new(dest_history: usize, source_history: usize) -> Self {
        Self {
            destination: Embedding::new(dest_history, 1),
            source: Embedding::new(source_history, 1),
            ..Self::default()
        }
    }

    pub fn with_destination(mut self, history: usize, delay: usize) -> Self {
        self.destination = Embedding::new(history, delay);
        self
    }

    pub fn with_source(mut self, history: usize, delay: usize) -> Self {
        self.source = Embedding::new(history, delay);
        self
    }

    pub fn with_source_delay(mut self, source_delay: usize) -> Self {
        self.source_delay = source_delay;
        self
    }

    pub fn with_conditional(mut self, conditional: ConditionalEmbedding) -> Self {
        self.conditionals.push(conditional);
        self
    }

    pub(crate) fn validate(&self) -> Result<()> {
        self.destination.validate("destination_embedding")?;
        self.source.validate("source_embedding")?;
        if self.source_delay == 0 {
            return Err(InfoError::config("source_delay", "must be >= 1"));
        }
        for cond in &self.conditionals {
            cond.embedding.validate("conditional_embeddings")?;
            if cond.lag == 0 {
                return Err(InfoError::config("conditional_embeddings", "conditional lag must be >= 1"));
            }
        }
        Ok(())
    }
}

impl Default for TeEmbedding {
    fn default() -> Self {
        Self {
            destination: Embedding::default(),
            source: Embedding::default(),
            source_delay: 1,
            conditionals: Vec::new(),
        }
    }
}

/// How the bias of a candidate embedding is removed during auto-embedding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BiasCorrection {
    /// Use the raw measure (appropriate for the already bias-corrected Kraskov estimators).
    None,
    /// Subtract the mean of the analytic (chi-square) null distribution.
    Analytic,
    /// Subtract the mean of this many surrogate draws.
    Surrogates(usize),
}

/// Automatic selection of destination (and source) embedding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AutoEmbed {
    pub max_history: usize,
    pub max_delay: usize,
    pub bias: BiasCorrection,
}

/// Rule turning surrogate counts into a p-value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PValuePolicy {
    /// Fraction of surrogates with a value >= the observed one (may be exactly 0).
    #[default]
    GreaterOrEqual,
    /// (count + 1) / (permutations + 1); never 0.
    PlusOne,
}

/// Complete configuration of one calculator.
#[derive(Debug, Clone, PartialEq)]
pub struct EstimatorConfig {
    pub approach: Approach,
    pub measure: MeasureKind,
    pub destination_embedding: Embedding,
    pub source_embedding: Embedding,
    /// Source-destination lag `u`: the most recent source value used is `t + 1 - u`.
    pub source_delay: usize,
    pub conditional_embeddings: Vec<ConditionalEmbedding>,
    /// Lag of the first MI variable relative to the second.
    pub time_diff: usize,
    /// Dynamic correlation exclusion window in time steps (0 disables it).
    pub exclusion_window: usize,
    pub units: Units,
    /// Z-score every continuous column before estimation.
    pub normalise: bool,
    /// Amplitude of uniform noise added to continuous data to break ties.
    pub noise_level: f64,
    pub seed: u64,
    pub auto_embed: Option<AutoEmbed>,
    pub p_value_policy: PValuePolicy,
}

impl EstimatorConfig {
    fn with_approach(approach: Approach, measure: MeasureKind) -> Self {
        Self {
            approach,
            measure,
            destination_embedding: Embedding::default(),
            source_embedding: Embedding::default(),
            source_delay: 1,
            conditional_embeddings: Vec::new(),
            time_diff: 0,
            exclusion_window: 0,
            units: Units::Nats,
            normalise: true,
            noise_level: 1e-8,
            seed: 0,
            auto_embed: None,
            p_value_policy: PValuePolicy::GreaterOrEqual,
        }
    }

    /// Kraskov (KSG) nearest-neighbour estimator with `k` neighbours, algorithm 1.
    pub fn kraskov(measure: MeasureKind, k: usize) -> Self {
        Self::with_approach(Approach::Kraskov { k, algorithm: KsgAlgorithm::One }, measure)
    }

    /// Box-kernel estimator with the given kernel width (in normalised units when normalising).
    pub fn kernel(measure: MeasureKind, width: f64) -> Self {
        Self::with_approach(Approach::Kernel { width }, measure)
    }

    /// Linear-Gaussian estimator.
    pub fn gaussian(measure: MeasureKind) -> Self {
        let mut config = Self::with_approach(Approach::Gaussian { bias_correction: false }, measure);
        config.noise_level = 0.0;
        config
    }

    /// Plug-in estimator for symbolic data.
    pub fn discrete(measure: MeasureKind) -> Self {
        let mut config = Self::with_approach(Approach::Discrete, measure);
        config.normalise = false;
        config.noise_level = 0.0;
        config
    }

    pub fn with_algorithm(mut self, algorithm: KsgAlgorithm) -> Self {
        if let Approach::Kraskov { k, .. } = self.approach {
            self.approach = Approach::Kraskov { k, algorithm };
        }
        self
    }

    pub fn with_bias_correction(mut self, bias_correction: bool) -> Self {
        if let Approach::Gaussian { .. } = self.approach {
            self.approach = Approach::Gaussian { bias_correction };
        }
        self
    }

    pub fn with_destination_embedding(mut self, history: usize, delay: usize) -> Self {
        self.destination_embedding = Embedding::new(history, delay);
        self
    }

    pub fn with_source_embedding(mut self, history: usize, delay: usize) -> Self {
        self.source_embedding = Embedding::new(history, delay);
        self
    }

    pub fn with_source_delay(mut self, source_delay: usize) -> Self {
        self.source_delay = source_delay;
        self
    }

    pub fn with_conditional(mut self, conditional: ConditionalEmbedding) -> Self {
        self.conditional_embeddings.push(conditional);
        self
    }

    pub fn with_time_diff(mut self, time_diff: usize) -> Self {
        self.time_diff = time_diff;
        self
    }

    pub fn with_exclusion_window(mut self, exclusion_window: usize) -> Self {
        self.exclusion_window = exclusion_window;
        self
    }

    pub fn with_units(mut self, units: Units) -> Self {
        self.units = units;
        self
    }

    pub fn with_normalise(mut self, normalise: bool) -> Self {
        self.normalise = normalise;
        self
    }

    pub fn with_noise_level(mut self, noise_level: f64) -> Self {
        self.noise_level = noise_level;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_auto_embed(mut self, auto_embed: AutoEmbed) -> Self {
        self.auto_embed = Some(auto_embed);
        self
    }

    pub fn with_p_value_policy(mut self, policy: PValuePolicy) -> Self {
        self.p_value_policy = policy;
        self
    }

    /// The role-variable embedding described by this configuration.
    pub fn te_embedding(&self) -> TeEmbedding {
        TeEmbedding {
            destination: self.destination_embedding,
            source: self.source_embedding,
            source_delay: self.source_delay,
            conditionals: self.conditional_embeddings.clone(),
        }
    }

    /// Reject parameter combinations that no estimator can honour.
    pub fn validate(&self) -> Result<()> {
        match self.approach {
            Approach::Kraskov { k, .. } => {
                if k == 0 {
                    return Err(InfoError::config("k", "neighbour count must be >= 1"));
                }
            }
            Approach::Kernel { width } => {
                if !width.is_finite() || width <= 0.0 {
                    return Err(InfoError::config("kernel_width", format!("must be finite and > 0, got {width}")));
                }
            }
            Approach::Gaussian { .. } | Approach::Discrete => {}
        }
        if !self.noise_level.is_finite() || self.noise_level < 0.0 {
            return Err(InfoError::config("noise_level", "must be finite and >= 0"));
        }
        self.te_embedding().validate()?;
        if let Some(auto) = &self.auto_embed {
            if auto.max_history == 0 || auto.max_delay == 0 {
                return Err(InfoError::config("auto_embed", "search ranges must be non-empty"));
            }
            if !matches!(self.measure, MeasureKind::ActiveInformationStorage | MeasureKind::TransferEntropy) {
                return Err(InfoError::config("auto_embed", "only active information storage and transfer entropy are embedded"));
            }
            let analytic_capable = matches!(self.approach, Approach::Gaussian { .. } | Approach::Discrete);
            if auto.bias == BiasCorrection::Analytic && !analytic_capable {
                return Err(InfoError::config(
                    "auto_embed",
                    format!("analytic bias correction is unavailable for the {} approach", self.approach.name()),
                ));
            }
            if auto.bias == BiasCorrection::Surrogates(0) {
                return Err(InfoError::config("auto_embed", "surrogate bias correction needs at least one surrogate"));
            }
        }
        Ok(())
    }
}
