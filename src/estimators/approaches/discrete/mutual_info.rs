// SPDX-FileCopyrightText: 2025-2026 Carlson Büth <code@cbueth.de>
//
// SPDX-License-Identifier: MIT OR Apache-2.0

use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis};

use super::discrete_utils::{alphabet_size, check_alphabet, reduce_joint_space_compact};
use crate::error::{InfoError, Result};
use crate::estimators::traits::{
    AnalyticNull, GlobalValue, LocalValues, MutualInformationEstimator, OptionalLocalValues, SurrogateMeasure,
};

/// Count-based plug-in mutual information between two symbol streams, in nats.
///
/// Observations pair `var1[t - time_diff]` with `var2[t]` and are accumulated
/// into joint and marginal count tables, so several streams can be added
/// before the estimate is read. Symbols of the first variable must lie in
/// `0..base1`, those of the second in `0..base2`.
#[derive(Debug, Clone)]
pub struct MutualInformationDiscrete {
    base1: usize,
    base2: usize,
    time_diff: usize,
    joint_count: Array2<usize>,
    i_count: Vec<usize>,
    j_count: Vec<usize>,
    observations: usize,
}

impl MutualInformationDiscrete {
    pub fn new(base1: usize, base2: usize, time_diff: usize) -> Result<Self> {
        if base1 == 0 || base2 == 0 {
            return Err(InfoError::config("base", "alphabet sizes must be >= 1"));
        }
        Ok(Self {
            base1,
            base2,
            time_diff,
            joint_count: Array2::zeros((base1, base2)),
            i_count: vec![0; base1],
            j_count: vec![0; base2],
            observations: 0,
        })
    }

    /// Clear all counts.
    pub fn initialise(&mut self) {
        self.joint_count.fill(0);
        self.i_count.fill(0);
        self.j_count.fill(0);
        self.observations = 0;
    }

    pub fn bases(&self) -> (usize, usize) {
        (self.base1, self.base2)
    }

    pub fn time_diff(&self) -> usize {
        self.time_diff
    }

    pub fn observations(&self) -> usize {
        self.observations
    }

    fn check_pair_lengths(&self, len1: usize, len2: usize) -> Result<()> {
        if len1 != len2 {
            return Err(InfoError::config(
                "series",
                format!("both variables need the same number of observations ({len1} vs {len2})"),
            ));
        }
        if len1 <= self.time_diff {
            return Err(InfoError::insufficient(
                format!("discrete mutual information with time_diff {}", self.time_diff),
                self.time_diff,
                len1,
            ));
        }
        Ok(())
    }

    fn record(&mut self, i: usize, j: usize) {
        self.joint_count[(i, j)] += 1;
        self.i_count[i] += 1;
        self.j_count[j] += 1;
        self.observations += 1;
    }

    /// Add the pairs `(var1[t - time_diff], var2[t])`.
    pub fn add_observations(&mut self, var1: ArrayView1<'_, i32>, var2: ArrayView1<'_, i32>) -> Result<()> {
        self.check_pair_lengths(var1.len(), var2.len())?;
        check_alphabet(var1, self.base1, "var1")?;
        check_alphabet(var2, self.base2, "var2")?;
        for t in self.time_diff..var1.len() {
            self.record(var1[t - self.time_diff] as usize, var2[t] as usize);
        }
        Ok(())
    }

    /// Add the pairs `(states[t - time_diff][i_col], states[t][j_col])` of a
    /// `time x variables` states matrix.
    pub fn add_observations_from_states(&mut self, states: ArrayView2<'_, i32>, i_col: usize, j_col: usize) -> Result<()> {
        let (var1, var2) = self.state_columns(states, i_col, j_col)?;
        self.add_observations(var1, var2)
    }

    fn state_columns<'a>(
        &self,
        states: ArrayView2<'a, i32>,
        i_col: usize,
        j_col: usize,
    ) -> Result<(ArrayView1<'a, i32>, ArrayView1<'a, i32>)> {
        let cols = states.ncols();
        if i_col >= cols || j_col >= cols {
            return Err(InfoError::config("states", format!("column ({i_col}, {j_col}) outside {cols} columns")));
        }
        Ok((states.index_axis_move(Axis(1), i_col), states.index_axis_move(Axis(1), j_col)))
    }

    /// Plug-in MI over the joint support; cells with a zero joint or marginal
    /// probability contribute nothing.
    pub fn compute_average_local_of_observations(&self) -> f64 {
        plug_in(&self.joint_count, &self.i_count, &self.j_count, self.observations)
    }

    /// Local MI `ln(p(i, j) / (p(i) p(j)))` of one pair under the current counts.
    pub fn compute_local_from_previous_observations(&self, val1: i32, val2: i32) -> Result<f64> {
        if val1 < 0 || val1 as usize >= self.base1 || val2 < 0 || val2 as usize >= self.base2 {
            return Err(InfoError::config("symbol", format!("pair ({val1}, {val2}) outside the alphabets")));
        }
        let (i, j) = (val1 as usize, val2 as usize);
        if self.joint_count[(i, j)] == 0 {
            return Err(InfoError::config("symbol", format!("pair ({val1}, {val2}) was never observed")));
        }
        Ok(self.local_unchecked(i, j))
    }

    fn local_unchecked(&self, i: usize, j: usize) -> f64 {
        let joint = self.joint_count[(i, j)] as f64;
        (joint * self.observations as f64 / (self.i_count[i] as f64 * self.j_count[j] as f64)).ln()
    }

    /// Local MI of every pair `(var1[t - time_diff], var2[t])`; one value per pair.
    pub fn compute_local_series_from_previous_observations(
        &self,
        var1: ArrayView1<'_, i32>,
        var2: ArrayView1<'_, i32>,
    ) -> Result<Array1<f64>> {
        self.check_pair_lengths(var1.len(), var2.len())?;
        (self.time_diff..var1.len())
            .map(|t| self.compute_local_from_previous_observations(var1[t - self.time_diff], var2[t]))
            .collect::<Result<Vec<_>>>()
            .map(Array1::from)
    }

    /// Local MI for each row of a states matrix; the first `time_diff` rows have no
    /// pair and report 0.
    pub fn compute_local_from_previous_states(
        &self,
        states: ArrayView2<'_, i32>,
        i_col: usize,
        j_col: usize,
    ) -> Result<Array1<f64>> {
        let (var1, var2) = self.state_columns(states, i_col, j_col)?;
        let paired = self.compute_local_series_from_previous_observations(var1, var2)?;
        let mut locals = Array1::zeros(states.nrows());
        locals.slice_mut(ndarray::s![self.time_diff..]).assign(&paired);
        Ok(locals)
    }

    /// Reset, count the states matrix, and return its local values.
    pub fn compute_local_from_states(&mut self, states: ArrayView2<'_, i32>, i_col: usize, j_col: usize) -> Result<Array1<f64>> {
        self.initialise();
        self.add_observations_from_states(states, i_col, j_col)?;
        self.compute_local_from_previous_states(states, i_col, j_col)
    }

    /// Marginal symbol sequences rebuilt from the counts, each sorted by symbol.
    fn sorted_marginals(&self) -> (Vec<usize>, Vec<usize>) {
        let expand = |counts: &[usize]| -> Vec<usize> {
            counts
                .iter()
                .enumerate()
                .flat_map(|(symbol, &count)| std::iter::repeat(symbol).take(count))
                .collect()
        };
        (expand(&self.i_count), expand(&self.j_count))
    }
}

fn plug_in(joint_count: &Array2<usize>, i_count: &[usize], j_count: &[usize], observations: usize) -> f64 {
    if observations == 0 {
        return 0.0;
    }
    let n = observations as f64;
    let mut mi = 0.0;
    for ((i, j), &count) in joint_count.indexed_iter() {
        let joint = count as f64 / n;
        let p_i = i_count[i] as f64 / n;
        let p_j = j_count[j] as f64 / n;
        if joint * p_i * p_j > 0.0 {
            mi += joint * (joint / (p_i * p_j)).ln();
        }
    }
    mi
}

impl GlobalValue for MutualInformationDiscrete {
    fn global_value(&self) -> f64 {
        self.compute_average_local_of_observations()
    }
}

impl SurrogateMeasure for MutualInformationDiscrete {
    fn num_observations(&self) -> usize {
        self.observations
    }

    fn observed(&self) -> f64 {
        self.compute_average_local_of_observations()
    }

    /// The marginal counts are permutation invariant and reused; only the joint
    /// table is rebuilt from the reordered first-variable symbols.
    fn with_source_ordering(&self, ordering: &[usize]) -> Result<f64> {
        if ordering.len() != self.observations {
            return Err(InfoError::config(
                "permutations",
                format!("ordering of length {} does not match {} observations", ordering.len(), self.observations),
            ));
        }
        let (i_values, j_values) = self.sorted_marginals();
        let mut joint = Array2::<usize>::zeros((self.base1, self.base2));
        for (t, &source) in ordering.iter().enumerate() {
            joint[(i_values[source], j_values[t])] += 1;
        }
        Ok(plug_in(&joint, &self.i_count, &self.j_count, self.observations))
    }
}

impl AnalyticNull for MutualInformationDiscrete {
    fn observed_statistic(&self) -> f64 {
        self.compute_average_local_of_observations()
    }
    fn degrees_of_freedom(&self) -> usize {
        (self.base1 - 1) * (self.base2 - 1)
    }
    fn null_observations(&self) -> usize {
        self.observations
    }
}

/// Plug-in mutual information of two symbol series, with local values.
///
/// Symbols may be any `i32` values; each series is recoded to `0..distinct`
/// so the count table and the analytic degrees of freedom follow the number of
/// distinct symbols, not their magnitude.
#[derive(Debug, Clone)]
pub struct DiscreteMutualInformation {
    counts: MutualInformationDiscrete,
    locals: Array1<f64>,
}

impl DiscreteMutualInformation {
    pub fn new(x: Array1<i32>, y: Array1<i32>) -> Result<Self> {
        Self::with_time_diff(x, y, 0)
    }

    pub fn with_time_diff(x: Array1<i32>, y: Array1<i32>, time_diff: usize) -> Result<Self> {
        let x = reduce_joint_space_compact(&[x.view()])?;
        let y = reduce_joint_space_compact(&[y.view()])?;
        let mut counts =
            MutualInformationDiscrete::new(alphabet_size(&x).max(1), alphabet_size(&y).max(1), time_diff)?;
        counts.add_observations(x.view(), y.view())?;
        let locals = counts.compute_local_series_from_previous_observations(x.view(), y.view())?;
        Ok(Self { counts, locals })
    }

    pub fn counts(&self) -> &MutualInformationDiscrete {
        &self.counts
    }
}

impl GlobalValue for DiscreteMutualInformation {
    fn global_value(&self) -> f64 {
        self.counts.compute_average_local_of_observations()
    }
}

impl LocalValues for DiscreteMutualInformation {
    fn local_values(&self) -> Array1<f64> {
        self.locals.clone()
    }
}

impl OptionalLocalValues for DiscreteMutualInformation {
    fn supports_local(&self) -> bool {
        true
    }
    fn local_values_opt(&self) -> std::result::Result<Array1<f64>, &'static str> {
        Ok(self.local_values())
    }
}

impl SurrogateMeasure for DiscreteMutualInformation {
    fn num_observations(&self) -> usize {
        self.counts.num_observations()
    }
    fn observed(&self) -> f64 {
        self.counts.observed()
    }
    fn with_source_ordering(&self, ordering: &[usize]) -> Result<f64> {
        self.counts.with_source_ordering(ordering)
    }
}

impl AnalyticNull for DiscreteMutualInformation {
    fn observed_statistic(&self) -> f64 {
        self.counts.observed_statistic()
    }
    fn degrees_of_freedom(&self) -> usize {
        self.counts.degrees_of_freedom()
    }
    fn null_observations(&self) -> usize {
        self.counts.null_observations()
    }
}

impl MutualInformationEstimator for DiscreteMutualInformation {}
