// SPDX-FileCopyrightText: 2025-2026 Carlson Büth <code@cbueth.de>
//
// SPDX-License-Identifier: MIT OR Apache-2.0

use ndarray::{Array1, Array2};

use super::conditional::cmi_locals;
use super::{KsgParams, mean_of};
use crate::config::TeEmbedding;
use crate::error::Result;
use crate::estimators::approaches::common_nd::dataset::{ContinuousData, reorder_rows};
use crate::estimators::traits::{
    GlobalValue, LocalValues, OptionalLocalValues, SurrogateMeasure, TransferEntropyEstimator,
};
use crate::estimators::utils::embedding::te_observations;

/// KSG (conditional) transfer entropy
/// `TE(X -> Y | Z) = I(X_past; Y_next | Y_past, Z_past)`.
///
/// Every constituent neighbour search shares the same exclusion window.
/// Surrogates reorder the source past against fixed destination and
/// conditioning variables.
#[derive(Debug, Clone)]
pub struct KraskovTransferEntropy {
    source_past: Array2<f64>,
    dest_next: Array2<f64>,
    conditioning: Array2<f64>,
    embedding: TeEmbedding,
    params: KsgParams,
    locals: Array1<f64>,
}

impl KraskovTransferEntropy {
    pub fn new(
        source: impl Into<ContinuousData>,
        destination: impl Into<ContinuousData>,
        embedding: TeEmbedding,
        params: KsgParams,
    ) -> Result<Self> {
        Self::with_conditionals(source, destination, Vec::<ContinuousData>::new(), embedding, params)
    }

    /// Conditional TE; `conditionals` pair up with `embedding.conditionals`.
    pub fn with_conditionals(
        source: impl Into<ContinuousData>,
        destination: impl Into<ContinuousData>,
        conditionals: Vec<impl Into<ContinuousData>>,
        embedding: TeEmbedding,
        params: KsgParams,
    ) -> Result<Self> {
        let source = source.into().into_array2();
        let destination = destination.into().into_array2();
        let conditionals: Vec<Array2<f64>> = conditionals.into_iter().map(|c| c.into().into_array2()).collect();
        let views: Vec<_> = conditionals.iter().map(|c| c.view()).collect();
        let obs = te_observations(source.view(), destination.view(), &views, &embedding)?;
        let conditioning = obs.conditioning()?;
        let locals = cmi_locals(obs.source_past.view(), obs.dest_next.view(), conditioning.view(), params)?;
        Ok(Self {
            source_past: obs.source_past,
            dest_next: obs.dest_next,
            conditioning,
            embedding,
            params,
            locals,
        })
    }

    pub fn embedding(&self) -> &TeEmbedding {
        &self.embedding
    }

    pub fn params(&self) -> KsgParams {
        self.params
    }
}

impl GlobalValue for KraskovTransferEntropy {
    fn global_value(&self) -> f64 {
        mean_of(&self.locals)
    }
}

impl LocalValues for KraskovTransferEntropy {
    fn local_values(&self) -> Array1<f64> {
        self.locals.clone()
    }
}

impl OptionalLocalValues for KraskovTransferEntropy {
    fn supports_local(&self) -> bool {
        true
    }
    fn local_values_opt(&self) -> std::result::Result<Array1<f64>, &'static str> {
        Ok(self.local_values())
    }
}

impl TransferEntropyEstimator for KraskovTransferEntropy {}

impl SurrogateMeasure for KraskovTransferEntropy {
    fn num_observations(&self) -> usize {
        self.source_past.nrows()
    }

    fn observed(&self) -> f64 {
        self.global_value()
    }

    fn with_source_ordering(&self, ordering: &[usize]) -> Result<f64> {
        let source_past = reorder_rows(self.source_past.view(), ordering);
        let locals = cmi_locals(source_past.view(), self.dest_next.view(), self.conditioning.view(), self.params)?;
        Ok(mean_of(&locals))
    }
}
