// SPDX-FileCopyrightText: 2025-2026 Carlson Büth <code@cbueth.de>
//
// SPDX-License-Identifier: MIT OR Apache-2.0

use ndarray::{Array1, Array2};

use super::discrete_utils::{DiscreteData, alphabet_size, compact_codes, count_frequencies, joint_codes};
use crate::config::{Embedding, TeEmbedding};
use crate::error::{InfoError, Result};
use crate::estimators::traits::{
    AnalyticNull, ConditionalMutualInformationEstimator, GlobalValue, LocalValues, OptionalLocalValues,
    SurrogateMeasure, TransferEntropyEstimator,
};
use crate::estimators::utils::embedding::{ais_observations, te_observations};

/// Local `-ln p` of every code.
fn local_entropies(codes: &Array1<i32>) -> Array1<f64> {
    let counts = count_frequencies(codes.view());
    let n = codes.len() as f64;
    codes.mapv(|c| -(counts.get(&c).copied().unwrap_or(0) as f64 / n).ln())
}

/// i(x; y | z) = h(x, z) + h(y, z) - h(z) - h(x, y, z), per sample.
fn cmi_locals(x: &Array1<i32>, y: &Array1<i32>, z: &Array1<i32>) -> Result<Array1<f64>> {
    let xz = joint_codes(&[x, z])?;
    let yz = joint_codes(&[y, z])?;
    let xyz = joint_codes(&[x, y, z])?;
    Ok(local_entropies(&xz) + local_entropies(&yz) - local_entropies(z) - local_entropies(&xyz))
}

/// Plug-in conditional mutual information I(X; Y | Z) of symbolic data,
/// by entropy summation over compact joint codes.
///
/// Multidimensional variables are reduced to one joint code per sample. An
/// empty `Z` (no columns) yields the plug-in mutual information.
#[derive(Debug, Clone)]
pub struct DiscreteConditionalMutualInformation {
    x: Array1<i32>,
    y: Array1<i32>,
    z: Array1<i32>,
    locals: Array1<f64>,
}

impl DiscreteConditionalMutualInformation {
    pub fn new(x: impl Into<DiscreteData>, y: impl Into<DiscreteData>, z: impl Into<DiscreteData>) -> Result<Self> {
        let (x, y, z) = (x.into().into_array2(), y.into().into_array2(), z.into().into_array2());
        Self::from_arrays(&x, &y, &z)
    }

    pub(crate) fn from_arrays(x: &Array2<i32>, y: &Array2<i32>, z: &Array2<i32>) -> Result<Self> {
        let n = x.nrows();
        if y.nrows() != n || z.nrows() != n {
            return Err(InfoError::config("series", "variables have mismatched observation counts"));
        }
        if n == 0 {
            return Err(InfoError::insufficient("discrete conditional mutual information", 0, 0));
        }
        let (x, y, z) = (compact_codes(x.view())?, compact_codes(y.view())?, compact_codes(z.view())?);
        let locals = cmi_locals(&x, &y, &z)?;
        Ok(Self { x, y, z, locals })
    }

    /// Distinct joint states of X, Y and Z.
    pub fn alphabet_sizes(&self) -> [usize; 3] {
        [alphabet_size(&self.x), alphabet_size(&self.y), alphabet_size(&self.z)]
    }
}

impl GlobalValue for DiscreteConditionalMutualInformation {
    fn global_value(&self) -> f64 {
        self.locals.mean().unwrap_or(0.0)
    }
}

impl LocalValues for DiscreteConditionalMutualInformation {
    fn local_values(&self) -> Array1<f64> {
        self.locals.clone()
    }
}

impl OptionalLocalValues for DiscreteConditionalMutualInformation {
    fn supports_local(&self) -> bool {
        true
    }
    fn local_values_opt(&self) -> std::result::Result<Array1<f64>, &'static str> {
        Ok(self.local_values())
    }
}

impl SurrogateMeasure for DiscreteConditionalMutualInformation {
    fn num_observations(&self) -> usize {
        self.x.len()
    }

    fn observed(&self) -> f64 {
        self.global_value()
    }

    fn with_source_ordering(&self, ordering: &[usize]) -> Result<f64> {
        let x = Array1::from_iter(ordering.iter().map(|&i| self.x[i]));
        Ok(cmi_locals(&x, &self.y, &self.z)?.mean().unwrap_or(0.0))
    }
}

impl AnalyticNull for DiscreteConditionalMutualInformation {
    fn observed_statistic(&self) -> f64 {
        self.global_value()
    }
    /// (|X| - 1)(|Y| - 1)|Z|
    fn degrees_of_freedom(&self) -> usize {
        let [x, y, z] = self.alphabet_sizes();
        x.saturating_sub(1) * y.saturating_sub(1) * z.max(1)
    }
    fn null_observations(&self) -> usize {
        self.x.len()
    }
}

impl ConditionalMutualInformationEstimator for DiscreteConditionalMutualInformation {}

macro_rules! delegate_to_cmi {
    ($($wrapper:ty),* $(,)?) => {
        $(
            impl $wrapper {
                pub fn inner(&self) -> &DiscreteConditionalMutualInformation {
                    &self.inner
                }
            }

            impl GlobalValue for $wrapper {
                fn global_value(&self) -> f64 {
                    self.inner.global_value()
                }
            }

            impl LocalValues for $wrapper {
                fn local_values(&self) -> Array1<f64> {
                    self.inner.local_values()
                }
            }

            impl OptionalLocalValues for $wrapper {
                fn supports_local(&self) -> bool {
                    true
                }
                fn local_values_opt(&self) -> std::result::Result<Array1<f64>, &'static str> {
                    Ok(self.inner.local_values())
                }
            }

            impl SurrogateMeasure for $wrapper {
                fn num_observations(&self) -> usize {
                    self.inner.num_observations()
                }
                fn observed(&self) -> f64 {
                    self.inner.observed()
                }
                fn with_source_ordering(&self, ordering: &[usize]) -> Result<f64> {
                    self.inner.with_source_ordering(ordering)
                }
            }

            impl AnalyticNull for $wrapper {
                fn observed_statistic(&self) -> f64 {
                    self.inner.observed_statistic()
                }
                fn degrees_of_freedom(&self) -> usize {
                    self.inner.degrees_of_freedom()
                }
                fn null_observations(&self) -> usize {
                    self.inner.null_observations()
                }
            }
        )*
    };
}

/// Plug-in active information storage I(X_past; X_next) of a symbol series.
#[derive(Debug, Clone)]
pub struct DiscreteActiveInformation {
    inner: DiscreteConditionalMutualInformation,
}

impl DiscreteActiveInformation {
    pub fn new(series: impl Into<DiscreteData>, embedding: Embedding) -> Result<Self> {
        let series = series.into().into_array2();
        let obs = ais_observations(series.view(), embedding)?;
        let z = Array2::<i32>::zeros((obs.next.nrows(), 0));
        let inner = DiscreteConditionalMutualInformation::from_arrays(&obs.past, &obs.next, &z)?;
        Ok(Self { inner })
    }
}

/// Plug-in (conditional) transfer entropy of symbol series, surrogates reorder
/// the source past.
#[derive(Debug, Clone)]
pub struct DiscreteTransferEntropy {
    inner: DiscreteConditionalMutualInformation,
}

impl DiscreteTransferEntropy {
    pub fn new(source: impl Into<DiscreteData>, destination: impl Into<DiscreteData>, embedding: TeEmbedding) -> Result<Self> {
        Self::with_conditionals(source, destination, Vec::<DiscreteData>::new(), embedding)
    }

    pub fn with_conditionals(
        source: impl Into<DiscreteData>,
        destination: impl Into<DiscreteData>,
        conditionals: Vec<impl Into<DiscreteData>>,
        embedding: TeEmbedding,
    ) -> Result<Self> {
        let source = source.into().into_array2();
        let destination = destination.into().into_array2();
        let conditionals: Vec<Array2<i32>> = conditionals.into_iter().map(|c| c.into().into_array2()).collect();
        let views: Vec<_> = conditionals.iter().map(|c| c.view()).collect();
        let obs = te_observations(source.view(), destination.view(), &views, &embedding)?;
        let conditioning = obs.conditioning()?;
        let inner = DiscreteConditionalMutualInformation::from_arrays(&obs.source_past, &obs.dest_next, &conditioning)?;
        Ok(Self { inner })
    }
}

delegate_to_cmi!(DiscreteActiveInformation, DiscreteTransferEntropy);

impl TransferEntropyEstimator for DiscreteTransferEntropy {}
