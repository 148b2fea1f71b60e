// SPDX-FileCopyrightText: 2025-2026 Carlson Büth <code@cbueth.de>
//
// SPDX-License-Identifier: MIT OR Apache-2.0

use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis};
use std::collections::HashMap;

use crate::error::{InfoError, Result};

/// Symbolic input: one symbol per time step, or one symbol vector per time step.
#[derive(Debug, Clone, PartialEq)]
pub enum DiscreteData {
    OneDimensional(Array1<i32>),
    TwoDimensional(Array2<i32>),
}

impl DiscreteData {
    pub fn into_array2(self) -> Array2<i32> {
        match self {
            DiscreteData::OneDimensional(a) => a.insert_axis(Axis(1)),
            DiscreteData::TwoDimensional(a) => a,
        }
    }
}

impl From<Array1<i32>> for DiscreteData {
    fn from(a: Array1<i32>) -> Self {
        DiscreteData::OneDimensional(a)
    }
}

impl From<Array2<i32>> for DiscreteData {
    fn from(a: Array2<i32>) -> Self {
        DiscreteData::TwoDimensional(a)
    }
}

/// Count the occurrences of each symbol.
/// Uses a dense vector for small non-negative ranges, otherwise falls back to HashMap.
pub fn count_frequencies(data: ArrayView1<'_, i32>) -> HashMap<i32, usize> {
    match data.as_slice() {
        Some(slice) => count_frequencies_slice(slice),
        None => count_frequencies_slice(&data.to_vec()),
    }
}

/// Count frequencies from a raw slice of i32 values with an optimized dense mode.
pub fn count_frequencies_slice(data: &[i32]) -> HashMap<i32, usize> {
    let (Some(&min_v), Some(&max_v)) = (data.iter().min(), data.iter().max()) else {
        return HashMap::new();
    };

    // Range limit balances memory and speed.
    const MAX_DENSE_RANGE: i32 = 4096;
    if min_v >= 0 && max_v - min_v <= MAX_DENSE_RANGE {
        let mut dense = vec![0usize; (max_v - min_v) as usize + 1];
        for &v in data {
            dense[(v - min_v) as usize] += 1;
        }
        return dense
            .iter()
            .enumerate()
            .filter(|&(_, &cnt)| cnt != 0)
            .map(|(i, &cnt)| (min_v + i as i32, cnt))
            .collect();
    }

    let mut frequency_map = HashMap::new();
    for &value in data {
        *frequency_map.entry(value).or_insert(0) += 1;
    }
    frequency_map
}

/// Reduce code arrays (aligned by index) into a single compact joint code space.
///
/// Each position's tuple of codes maps to a unique id in `0..distinct`,
/// assigned in order of first occurrence.
pub fn reduce_joint_space_compact(code_arrays: &[ArrayView1<'_, i32>]) -> Result<Array1<i32>> {
    let Some(first) = code_arrays.first() else {
        return Ok(Array1::zeros(0));
    };
    let len = first.len();
    if let Some(bad) = code_arrays.iter().find(|a| a.len() != len) {
        return Err(InfoError::config(
            "series",
            format!("symbol arrays must have equal lengths ({len} vs {})", bad.len()),
        ));
    }
    let mut map: HashMap<Vec<i32>, i32> = HashMap::new();
    let mut out = Vec::with_capacity(len);
    for i in 0..len {
        let key: Vec<i32> = code_arrays.iter().map(|arr| arr[i]).collect();
        let next_id = map.len();
        let id = match map.get(&key) {
            Some(&id) => id,
            None => {
                let id = i32::try_from(next_id)
                    .map_err(|_| InfoError::config("series", "too many distinct joint symbols for i32 codes"))?;
                map.insert(key, id);
                id
            }
        };
        out.push(id);
    }
    Ok(Array1::from(out))
}

/// Compact code per row of a `samples x dimensions` symbol array; all zeros
/// (a single joint state) when there are no columns.
pub fn compact_codes(data: ArrayView2<'_, i32>) -> Result<Array1<i32>> {
    if data.ncols() == 0 {
        return Ok(Array1::zeros(data.nrows()));
    }
    let columns: Vec<ArrayView1<'_, i32>> = data.axis_iter(Axis(1)).collect();
    reduce_joint_space_compact(&columns)
}

/// Joint compact codes of several code arrays.
pub(crate) fn joint_codes(parts: &[&Array1<i32>]) -> Result<Array1<i32>> {
    let views: Vec<ArrayView1<'_, i32>> = parts.iter().map(|p| p.view()).collect();
    reduce_joint_space_compact(&views)
}

/// Number of distinct values in a compact code array.
pub(crate) fn alphabet_size(codes: &Array1<i32>) -> usize {
    codes.iter().max().map_or(0, |&m| m as usize + 1)
}

/// Reject symbols outside `0..base`.
pub(crate) fn check_alphabet(data: ArrayView1<'_, i32>, base: usize, parameter: &'static str) -> Result<()> {
    match data.iter().find(|&&v| v < 0 || v as usize >= base) {
        Some(&bad) => Err(InfoError::config(parameter, format!("symbol {bad} outside the alphabet 0..{base}"))),
        None => Ok(()),
    }
}
