// SPDX-FileCopyrightText: 2025-2026 Carlson Büth <code@cbueth.de>
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! One configurable entry point over every approach and measure.
//!
//! A [`Calculator`] is configured once with an [`EstimatorConfig`]; the
//! approach/measure pair selects a concrete estimator at estimation time.
//! Each call to [`Calculator::estimate`] replaces the previous estimate, and
//! [`Calculator::test_significance`] builds a null distribution for the most
//! recent one.
//!
//! ```no_run
//! use infodynamics::{Calculator, EstimatorConfig, MeasureKind, SignificanceMode};
//! use ndarray::Array1;
//! use rand::SeedableRng;
//!
//! let source = Array1::from_iter((0..500).map(|t| (t as f64 * 0.3).sin()));
//! let destination = Array1::from_iter((0..500).map(|t| (t as f64 * 0.3 - 0.3).sin()));
//! let config = EstimatorConfig::kraskov(MeasureKind::TransferEntropy, 4);
//! let mut calc = Calculator::configure(config).unwrap();
//! let te = calc.estimate(source, destination, &[]).unwrap();
//! let mut rng = rand_xoshiro::Xoshiro256PlusPlus::seed_from_u64(7);
//! let null = calc.test_significance(SignificanceMode::Permutation { count: 100 }, &mut rng).unwrap();
//! println!("TE = {te:.4} nats, p = {:.3}", null.p_value());
//! ```

use ndarray::{Array1, Array2, ArrayView2, Axis, concatenate};
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;
use tracing::{debug, warn};

use crate::config::{Approach, AutoEmbed, EstimatorConfig, MeasureKind, TeEmbedding};
use crate::error::{InfoError, Result};
use crate::estimators::approaches::common_nd::dataset::{add_noise, add_scaled_noise, normalise_columns};
use crate::estimators::approaches::discrete::discrete_utils::compact_codes;
use crate::estimators::approaches::discrete::{
    DiscreteActiveInformation, DiscreteConditionalMutualInformation, DiscreteEntropy, DiscreteMutualInformation,
    DiscreteTransferEntropy,
};
use crate::estimators::approaches::gaussian::{
    Covariance, GaussianActiveInformation, GaussianConditionalMutualInformation, GaussianEntropy,
    GaussianMutualInformation, GaussianTransferEntropy,
};
use crate::estimators::approaches::kernel::{
    KernelActiveInformation, KernelConditionalMutualInformation, KernelEntropy, KernelMutualInformation,
    KernelParams, KernelTransferEntropy,
};
use crate::estimators::approaches::kraskov::{
    KraskovActiveInformation, KraskovConditionalMutualInformation, KraskovEntropy, KraskovMutualInformation,
    KraskovTransferEntropy, KsgParams,
};
use crate::estimators::auto_embed::{bias_of, candidate_embeddings, select_embedding};
use crate::estimators::significance::{
    NullDistribution, SignificanceMode, analytic_test, generate_permutations, permutation_test,
};
use crate::estimators::traits::{AnalyticNull, GlobalValue, OptionalLocalValues, SurrogateMeasure};

/// A time series handed to the calculator: real-valued or symbolic, rows are
/// time steps and columns are dimensions.
#[derive(Debug, Clone, PartialEq)]
pub enum Series {
    Continuous(Array2<f64>),
    Discrete(Array2<i32>),
}

impl Series {
    pub fn len(&self) -> usize {
        match self {
            Series::Continuous(a) => a.nrows(),
            Series::Discrete(a) => a.nrows(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Real-valued view of the series; symbols are cast.
    fn into_continuous(self) -> Array2<f64> {
        match self {
            Series::Continuous(a) => a,
            Series::Discrete(a) => a.mapv(f64::from),
        }
    }

    fn into_discrete(self, role: &'static str) -> Result<Array2<i32>> {
        match self {
            Series::Discrete(a) => Ok(a),
            Series::Continuous(_) => Err(InfoError::config(role, "the discrete approach needs symbolic (i32) series")),
        }
    }
}

impl From<Array1<f64>> for Series {
    fn from(a: Array1<f64>) -> Self {
        Series::Continuous(a.insert_axis(Axis(1)))
    }
}

impl From<Array2<f64>> for Series {
    fn from(a: Array2<f64>) -> Self {
        Series::Continuous(a)
    }
}

impl From<Array1<i32>> for Series {
    fn from(a: Array1<i32>) -> Self {
        Series::Discrete(a.insert_axis(Axis(1)))
    }
}

impl From<Array2<i32>> for Series {
    fn from(a: Array2<i32>) -> Self {
        Series::Discrete(a)
    }
}

/// Capabilities shared by every concrete estimator the calculator can hold.
pub(crate) trait Measure: GlobalValue + OptionalLocalValues + Send + Sync {
    fn approach_name(&self) -> &'static str;

    fn surrogates(&self) -> Option<&dyn SurrogateMeasure> {
        None
    }

    fn analytic(&self) -> Option<&dyn AnalyticNull> {
        None
    }

    /// Whether the analytic null mean is already subtracted from the global value.
    fn analytic_bias_removed(&self) -> bool {
        false
    }
}

macro_rules! impl_measure {
    (plain $name:literal: $($t:ty),* $(,)?) => {
        $(impl Measure for $t {
            fn approach_name(&self) -> &'static str {
                $name
            }
        })*
    };
    (surrogate analytic $name:literal: $($t:ty),* $(,)?) => {
        $(impl Measure for $t {
            fn approach_name(&self) -> &'static str {
                $name
            }
            fn surrogates(&self) -> Option<&dyn SurrogateMeasure> {
                Some(self)
            }
            fn analytic(&self) -> Option<&dyn AnalyticNull> {
                Some(self)
            }
        })*
    };
    (surrogate $name:literal: $($t:ty),* $(,)?) => {
        $(impl Measure for $t {
            fn approach_name(&self) -> &'static str {
                $name
            }
            fn surrogates(&self) -> Option<&dyn SurrogateMeasure> {
                Some(self)
            }
        })*
    };
    (gaussian: $($t:ty),* $(,)?) => {
        $(impl Measure for $t {
            fn approach_name(&self) -> &'static str {
                "gaussian"
            }
            fn surrogates(&self) -> Option<&dyn SurrogateMeasure> {
                self.has_samples().then_some(self as &dyn SurrogateMeasure)
            }
            fn analytic(&self) -> Option<&dyn AnalyticNull> {
                Some(self)
            }
            fn analytic_bias_removed(&self) -> bool {
                self.bias_corrected()
            }
        })*
    };
}

impl_measure!(plain "kraskov": KraskovEntropy);
impl_measure!(plain "kernel": KernelEntropy);
impl_measure!(plain "gaussian": GaussianEntropy);
impl_measure!(plain "discrete": DiscreteEntropy);
impl_measure!(surrogate "kraskov":
    KraskovMutualInformation,
    KraskovConditionalMutualInformation,
    KraskovActiveInformation,
    KraskovTransferEntropy,
);
impl_measure!(surrogate "kernel":
    KernelMutualInformation,
    KernelConditionalMutualInformation,
    KernelActiveInformation,
    KernelTransferEntropy,
);
impl_measure!(surrogate analytic "discrete":
    DiscreteMutualInformation,
    DiscreteConditionalMutualInformation,
    DiscreteActiveInformation,
    DiscreteTransferEntropy,
);
impl_measure!(gaussian:
    GaussianMutualInformation,
    GaussianConditionalMutualInformation,
    GaussianActiveInformation,
    GaussianTransferEntropy,
);

/// Role series after preprocessing.
struct Roles<T> {
    source: Option<Array2<T>>,
    destination: Array2<T>,
    conditioning: Vec<Array2<T>>,
}

impl<T: Clone> Roles<T> {
    fn source(&self) -> Result<ArrayView2<'_, T>> {
        self.source
            .as_ref()
            .map(|s| s.view())
            .ok_or_else(|| InfoError::config("source", "this measure needs a source series"))
    }

    /// Every conditioning series side by side; zero columns when there are none.
    fn stacked_conditioning(&self) -> Result<Array2<T>> {
        if self.conditioning.is_empty() {
            return Array2::from_shape_vec((self.destination.nrows(), 0), Vec::new())
                .map_err(|e| InfoError::config("conditioning", e.to_string()));
        }
        let views: Vec<_> = self.conditioning.iter().map(|c| c.view()).collect();
        concatenate(Axis(1), &views).map_err(|e| InfoError::config("conditioning", e.to_string()))
    }
}

/// Data of the current estimate, kept for auto-embedding searches.
enum Prepared {
    Continuous(Roles<f64>),
    Discrete(Roles<i32>),
}

/// Configurable estimator over the closed set of approaches and measures.
pub struct Calculator {
    config: EstimatorConfig,
    measure: Option<Box<dyn Measure>>,
    selected_embedding: Option<TeEmbedding>,
}

impl std::fmt::Debug for Calculator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Calculator")
            .field("config", &self.config)
            .field("estimated", &self.measure.is_some())
            .field("selected_embedding", &self.selected_embedding)
            .finish()
    }
}

impl Calculator {
    /// Validate `config` and create a calculator with no estimate yet.
    pub fn configure(config: EstimatorConfig) -> Result<Self> {
        config.validate()?;
        debug!(approach = config.approach.name(), measure = ?config.measure, "calculator configured");
        Ok(Self { config, measure: None, selected_embedding: None })
    }

    pub fn config(&self) -> &EstimatorConfig {
        &self.config
    }

    /// Estimate the configured measure, in the configured units.
    ///
    /// Entropy and active information storage use `destination` only. MI is
    /// I(source; destination); CMI conditions on every `conditioning` series
    /// jointly; TE pairs `conditioning` with the conditional embeddings.
    pub fn estimate(
        &mut self,
        source: impl Into<Series>,
        destination: impl Into<Series>,
        conditioning: &[Series],
    ) -> Result<f64> {
        self.measure = None;
        self.selected_embedding = None;
        let prepared = self.prepare(source.into(), destination.into(), conditioning)?;

        let embedding = match self.config.auto_embed {
            Some(auto) => self.auto_embedding(&prepared, auto)?,
            None => self.config.te_embedding(),
        };
        let measure = build_measure(&self.config, self.config.measure, &prepared, &embedding)?;
        let value = measure.global_value();
        debug!(
            measure = ?self.config.measure,
            approach = self.config.approach.name(),
            observations = observations_of(&prepared),
            value,
            "estimate complete"
        );
        self.measure = Some(measure);
        if matches!(self.config.measure, MeasureKind::ActiveInformationStorage | MeasureKind::TransferEntropy) {
            self.selected_embedding = Some(embedding);
        }
        Ok(self.config.units.from_nats(value))
    }

    /// Gaussian estimate from a covariance over the concatenated variables.
    ///
    /// `dims` splits the covariance: ignored for entropy, `[d_X, d_Y]` for MI
    /// and AIS (past, next), `[d_X, d_Y, d_Z]` for CMI and TE (source past,
    /// destination next, conditioning).
    pub fn estimate_from_covariance(
        &mut self,
        covariance: ArrayView2<'_, f64>,
        observations: usize,
        dims: &[usize],
    ) -> Result<f64> {
        let Approach::Gaussian { bias_correction } = self.config.approach else {
            return Err(InfoError::Unsupported {
                operation: "estimation from a covariance matrix",
                approach: self.config.approach.name(),
            });
        };
        self.measure = None;
        self.selected_embedding = None;
        let covariance = Covariance::from_matrix(covariance, observations)?;
        let measure: Box<dyn Measure> = match (self.config.measure, dims) {
            (MeasureKind::Entropy, _) => Box::new(GaussianEntropy::from_covariance(covariance)?),
            (MeasureKind::MutualInformation | MeasureKind::ActiveInformationStorage, &[dx, dy]) => {
                Box::new(GaussianMutualInformation::from_covariance(covariance, [dx, dy], bias_correction)?)
            }
            (MeasureKind::ConditionalMutualInformation | MeasureKind::TransferEntropy, &[dx, dy, dz]) => Box::new(
                GaussianConditionalMutualInformation::from_covariance(covariance, [dx, dy, dz], bias_correction)?,
            ),
            (measure, _) => {
                return Err(InfoError::config(
                    "dims",
                    format!("{} dimension groups do not describe a {measure:?} covariance", dims.len()),
                ));
            }
        };
        let value = measure.global_value();
        debug!(measure = ?self.config.measure, observations, value, "estimate from covariance complete");
        self.measure = Some(measure);
        Ok(self.config.units.from_nats(value))
    }

    /// Null distribution of the most recent estimate.
    pub fn test_significance<R: Rng + ?Sized>(&self, mode: SignificanceMode, rng: &mut R) -> Result<NullDistribution> {
        let measure = self.measure.as_deref().ok_or(InfoError::NotEstimated)?;
        let null = match mode {
            SignificanceMode::Permutation { count } => {
                let Some(surrogates) = measure.surrogates() else {
                    if matches!(self.config.approach, Approach::Gaussian { .. }) {
                        warn!("permutation test requested for a Gaussian estimate built from a covariance only");
                    }
                    return Err(InfoError::Unsupported {
                        operation: "permutation significance",
                        approach: measure.approach_name(),
                    });
                };
                let orderings = generate_permutations(surrogates.num_observations(), count, rng);
                permutation_test(surrogates, &orderings, self.config.p_value_policy)?
            }
            SignificanceMode::Analytic => {
                let analytic = measure.analytic().ok_or(InfoError::Unsupported {
                    operation: "analytic significance",
                    approach: measure.approach_name(),
                })?;
                analytic_test(analytic)?
            }
        };
        debug!(?mode, draws = null.num_draws(), p_value = null.p_value(), "significance test complete");
        Ok(null.in_units(self.config.units))
    }

    /// Local values of the most recent estimate, in the configured units.
    pub fn local_values(&self) -> Result<Array1<f64>> {
        let measure = self.measure.as_deref().ok_or(InfoError::NotEstimated)?;
        let locals = measure.local_values_opt().map_err(|_| InfoError::Unsupported {
            operation: "local values",
            approach: measure.approach_name(),
        })?;
        Ok(locals.mapv(|v| self.config.units.from_nats(v)))
    }

    /// The most recent estimate in the configured units.
    pub fn last_value(&self) -> Option<f64> {
        self.measure.as_ref().map(|m| self.config.units.from_nats(m.global_value()))
    }

    /// Embedding used by the most recent AIS or TE estimate.
    pub fn selected_embedding(&self) -> Option<&TeEmbedding> {
        self.selected_embedding.as_ref()
    }

    fn prepare(&self, source: Series, destination: Series, conditioning: &[Series]) -> Result<Prepared> {
        let needs_source = matches!(
            self.config.measure,
            MeasureKind::MutualInformation | MeasureKind::ConditionalMutualInformation | MeasureKind::TransferEntropy
        );
        if let Approach::Discrete = self.config.approach {
            return Ok(Prepared::Discrete(Roles {
                source: if needs_source { Some(source.into_discrete("source")?) } else { None },
                destination: destination.into_discrete("destination")?,
                conditioning: conditioning
                    .iter()
                    .map(|c| c.clone().into_discrete("conditioning"))
                    .collect::<Result<_>>()?,
            }));
        }

        let mut roles = Roles {
            source: needs_source.then(|| source.into_continuous()),
            destination: destination.into_continuous(),
            conditioning: conditioning.iter().map(|c| c.clone().into_continuous()).collect(),
        };
        // Entropy is not scale invariant, so it is never normalised.
        let normalise = self.config.normalise && self.config.measure != MeasureKind::Entropy;
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(self.config.seed);
        let arrays = roles
            .source
            .iter_mut()
            .chain(std::iter::once(&mut roles.destination))
            .chain(roles.conditioning.iter_mut());
        for array in arrays {
            if normalise {
                normalise_columns(array);
                add_noise(array, self.config.noise_level, &mut rng);
            } else {
                add_scaled_noise(array, self.config.noise_level, &mut rng);
            }
        }
        Ok(Prepared::Continuous(roles))
    }

    fn auto_embedding(&self, prepared: &Prepared, auto: AutoEmbed) -> Result<TeEmbedding> {
        let mut embedding = self.config.te_embedding();
        let candidates = candidate_embeddings(auto.max_history, auto.max_delay);
        let seed = self.config.seed;

        let (destination, ais) = select_embedding(&candidates, |index, candidate| {
            let trial = TeEmbedding { destination: candidate, ..embedding.clone() };
            let measure = build_measure(&self.config, MeasureKind::ActiveInformationStorage, prepared, &trial)?;
            Ok(measure.global_value() - bias_of(measure.as_ref(), auto.bias, seed.wrapping_add(index as u64))?)
        })?;
        debug!(history = destination.history, delay = destination.delay, score = ais, "destination embedding selected");
        embedding.destination = destination;

        if self.config.measure == MeasureKind::TransferEntropy {
            let (source, te) = select_embedding(&candidates, |index, candidate| {
                let trial = TeEmbedding { source: candidate, ..embedding.clone() };
                let measure = build_measure(&self.config, MeasureKind::TransferEntropy, prepared, &trial)?;
                Ok(measure.global_value() - bias_of(measure.as_ref(), auto.bias, seed.wrapping_add(index as u64))?)
            })?;
            debug!(history = source.history, delay = source.delay, score = te, "source embedding selected");
            embedding.source = source;
        }
        Ok(embedding)
    }
}

fn observations_of(prepared: &Prepared) -> usize {
    match prepared {
        Prepared::Continuous(r) => r.destination.nrows(),
        Prepared::Discrete(r) => r.destination.nrows(),
    }
}

/// Instantiate the concrete estimator for an approach/measure pair.
fn build_measure(
    config: &EstimatorConfig,
    measure: MeasureKind,
    prepared: &Prepared,
    embedding: &TeEmbedding,
) -> Result<Box<dyn Measure>> {
    match prepared {
        Prepared::Discrete(roles) => build_discrete(config, measure, roles, embedding),
        Prepared::Continuous(roles) => match config.approach {
            Approach::Kraskov { k, algorithm } => {
                let params = KsgParams::new(k).with_algorithm(algorithm).with_exclusion_window(config.exclusion_window);
                build_kraskov(config, measure, roles, embedding, params)
            }
            Approach::Kernel { width } => {
                let params = KernelParams::new(width).with_exclusion_window(config.exclusion_window);
                build_kernel(config, measure, roles, embedding, params)
            }
            Approach::Gaussian { bias_correction } => build_gaussian(config, measure, roles, embedding, bias_correction),
            Approach::Discrete => Err(InfoError::config("approach", "discrete approach received continuous data")),
        },
    }
}

fn build_kraskov(
    config: &EstimatorConfig,
    measure: MeasureKind,
    roles: &Roles<f64>,
    embedding: &TeEmbedding,
    params: KsgParams,
) -> Result<Box<dyn Measure>> {
    let destination = roles.destination.clone();
    Ok(match measure {
        MeasureKind::Entropy => Box::new(KraskovEntropy::new(destination, params)?),
        MeasureKind::MutualInformation => Box::new(KraskovMutualInformation::with_time_diff(
            roles.source()?.to_owned(),
            destination,
            config.time_diff,
            params,
        )?),
        MeasureKind::ConditionalMutualInformation => Box::new(KraskovConditionalMutualInformation::new(
            roles.source()?.to_owned(),
            destination,
            roles.stacked_conditioning()?,
            params,
        )?),
        MeasureKind::ActiveInformationStorage => {
            Box::new(KraskovActiveInformation::new(destination, embedding.destination, params)?)
        }
        MeasureKind::TransferEntropy => Box::new(KraskovTransferEntropy::with_conditionals(
            roles.source()?.to_owned(),
            destination,
            roles.conditioning.clone(),
            embedding.clone(),
            params,
        )?),
    })
}

fn build_kernel(
    config: &EstimatorConfig,
    measure: MeasureKind,
    roles: &Roles<f64>,
    embedding: &TeEmbedding,
    params: KernelParams,
) -> Result<Box<dyn Measure>> {
    let destination = roles.destination.clone();
    Ok(match measure {
        MeasureKind::Entropy => Box::new(KernelEntropy::new(destination, params)?),
        MeasureKind::MutualInformation => Box::new(KernelMutualInformation::with_time_diff(
            roles.source()?.to_owned(),
            destination,
            config.time_diff,
            params,
        )?),
        MeasureKind::ConditionalMutualInformation => Box::new(KernelConditionalMutualInformation::new(
            roles.source()?.to_owned(),
            destination,
            roles.stacked_conditioning()?,
            params,
        )?),
        MeasureKind::ActiveInformationStorage => {
            Box::new(KernelActiveInformation::new(destination, embedding.destination, params)?)
        }
        MeasureKind::TransferEntropy => Box::new(KernelTransferEntropy::with_conditionals(
            roles.source()?.to_owned(),
            destination,
            roles.conditioning.clone(),
            embedding.clone(),
            params,
        )?),
    })
}

fn build_gaussian(
    config: &EstimatorConfig,
    measure: MeasureKind,
    roles: &Roles<f64>,
    embedding: &TeEmbedding,
    bias_correction: bool,
) -> Result<Box<dyn Measure>> {
    let destination = roles.destination.clone();
    Ok(match measure {
        MeasureKind::Entropy => Box::new(GaussianEntropy::new(destination)?),
        MeasureKind::MutualInformation => Box::new(GaussianMutualInformation::with_time_diff(
            roles.source()?.to_owned(),
            destination,
            config.time_diff,
            bias_correction,
        )?),
        MeasureKind::ConditionalMutualInformation => Box::new(GaussianConditionalMutualInformation::new(
            roles.source()?.to_owned(),
            destination,
            roles.stacked_conditioning()?,
            bias_correction,
        )?),
        MeasureKind::ActiveInformationStorage => {
            Box::new(GaussianActiveInformation::new(destination, embedding.destination, bias_correction)?)
        }
        MeasureKind::TransferEntropy => Box::new(GaussianTransferEntropy::with_conditionals(
            roles.source()?.to_owned(),
            destination,
            roles.conditioning.clone(),
            embedding.clone(),
            bias_correction,
        )?),
    })
}

fn build_discrete(
    config: &EstimatorConfig,
    measure: MeasureKind,
    roles: &Roles<i32>,
    embedding: &TeEmbedding,
) -> Result<Box<dyn Measure>> {
    let destination = roles.destination.clone();
    Ok(match measure {
        MeasureKind::Entropy => Box::new(DiscreteEntropy::new(destination)?),
        MeasureKind::MutualInformation => {
            let x = compact_codes(roles.source()?)?;
            let y = compact_codes(destination.view())?;
            Box::new(DiscreteMutualInformation::with_time_diff(x, y, config.time_diff)?)
        }
        MeasureKind::ConditionalMutualInformation => Box::new(DiscreteConditionalMutualInformation::new(
            roles.source()?.to_owned(),
            destination,
            roles.stacked_conditioning()?,
        )?),
        MeasureKind::ActiveInformationStorage => {
            Box::new(DiscreteActiveInformation::new(destination, embedding.destination)?)
        }
        MeasureKind::TransferEntropy => Box::new(DiscreteTransferEntropy::with_conditionals(
            roles.source()?.to_owned(),
            destination,
            roles.conditioning.clone(),
            embedding.clone(),
        )?),
    })
}
