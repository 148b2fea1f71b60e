// SPDX-FileCopyrightText: 2025-2026 Carlson Büth <code@cbueth.de>
//
// SPDX-License-Identifier: MIT OR Apache-2.0

use ndarray::{Array1, Array2};

use super::mutual_info::mi_locals;
use super::{KsgParams, mean_of};
use crate::config::Embedding;
use crate::error::Result;
use crate::estimators::approaches::common_nd::dataset::{ContinuousData, reorder_rows};
use crate::estimators::traits::{GlobalValue, LocalValues, OptionalLocalValues, SurrogateMeasure};
use crate::estimators::utils::embedding::ais_observations;

/// Active information storage: KSG MI between the embedded past of a series and its next value.
///
/// Surrogates reorder the past vectors against fixed next values.
#[derive(Debug, Clone)]
pub struct KraskovActiveInformation {
    past: Array2<f64>,
    next: Array2<f64>,
    embedding: Embedding,
    params: KsgParams,
    locals: Array1<f64>,
}

impl KraskovActiveInformation {
    pub fn new(series: impl Into<ContinuousData>, embedding: Embedding, params: KsgParams) -> Result<Self> {
        let series = series.into().into_array2();
        let obs = ais_observations(series.view(), embedding)?;
        let locals = mi_locals(obs.past.view(), obs.next.view(), params)?;
        Ok(Self { past: obs.past, next: obs.next, embedding, params, locals })
    }

    pub fn embedding(&self) -> Embedding {
        self.embedding
    }
}

impl GlobalValue for KraskovActiveInformation {
    fn global_value(&self) -> f64 {
        mean_of(&self.locals)
    }
}

impl LocalValues for KraskovActiveInformation {
    fn local_values(&self) -> Array1<f64> {
        self.locals.clone()
    }
}

impl OptionalLocalValues for KraskovActiveInformation {
    fn supports_local(&self) -> bool {
        true
    }
    fn local_values_opt(&self) -> std::result::Result<Array1<f64>, &'static str> {
        Ok(self.local_values())
    }
}

impl SurrogateMeasure for KraskovActiveInformation {
    fn num_observations(&self) -> usize {
        self.past.nrows()
    }

    fn observed(&self) -> f64 {
        self.global_value()
    }

    fn with_source_ordering(&self, ordering: &[usize]) -> Result<f64> {
        let past = reorder_rows(self.past.view(), ordering);
        Ok(mean_of(&mi_locals(past.view(), self.next.view(), self.params)?))
    }
}
