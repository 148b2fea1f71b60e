// SPDX-FileCopyrightText: 2025-2026 Carlson Büth <code@cbueth.de>
//
// SPDX-License-Identifier: MIT OR Apache-2.0

use ndarray::Array1;
use std::collections::HashMap;

use super::discrete_utils::{DiscreteData, compact_codes, count_frequencies};
use crate::error::{InfoError, Result};
use crate::estimators::traits::{GlobalValue, LocalValues, OptionalLocalValues};

/// Plug-in (maximum likelihood) Shannon entropy of symbolic data, in nats.
///
/// H = -Σ p_i ln p_i with p_i = n_i/N; each sample contributes the local
/// value -ln p(x). Multidimensional symbols are reduced to joint codes first.
#[derive(Debug, Clone)]
pub struct DiscreteEntropy {
    codes: Array1<i32>,
    counts: HashMap<i32, usize>,
}

impl DiscreteEntropy {
    pub fn new(data: impl Into<DiscreteData>) -> Result<Self> {
        let codes = match data.into() {
            DiscreteData::OneDimensional(a) => a,
            DiscreteData::TwoDimensional(a) => compact_codes(a.view())?,
        };
        if codes.is_empty() {
            return Err(InfoError::insufficient("discrete entropy", 0, 0));
        }
        let counts = count_frequencies(codes.view());
        Ok(Self { codes, counts })
    }

    /// Number of distinct symbols observed.
    pub fn support_size(&self) -> usize {
        self.counts.len()
    }

    fn probability(&self, symbol: i32) -> f64 {
        let count = self.counts.get(&symbol).copied().unwrap_or(0);
        count as f64 / self.codes.len() as f64
    }
}

impl GlobalValue for DiscreteEntropy {
    fn global_value(&self) -> f64 {
        let n = self.codes.len() as f64;
        -self
            .counts
            .values()
            .map(|&cnt| cnt as f64 / n)
            .filter(|&p| p > 0.0)
            .map(|p| p * p.ln())
            .sum::<f64>()
    }
}

impl LocalValues for DiscreteEntropy {
    fn local_values(&self) -> Array1<f64> {
        self.codes.mapv(|v| -self.probability(v).ln())
    }
}

impl OptionalLocalValues for DiscreteEntropy {
    fn supports_local(&self) -> bool {
        true
    }
    fn local_values_opt(&self) -> std::result::Result<Array1<f64>, &'static str> {
        Ok(self.local_values())
    }
}
