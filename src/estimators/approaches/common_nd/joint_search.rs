// SPDX-FileCopyrightText: 2025-2026 Carlson Büth <code@cbueth.de>
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Max-norm searches over joint spaces composed of per-column
//! [`NeighbourSearchIndex`]es.
//!
//! The joint distance between two samples is the largest per-column distance.
//! Because it is never smaller than the distance in any single column, a search
//! can walk one pivot column's sorted order outwards and stop in a direction as
//! soon as the pivot distance alone exceeds the radius of interest.

use std::collections::BinaryHeap;
use std::cmp::Ordering;

use ndarray::ArrayView2;

use super::neighbour_search::{Neighbour, NeighbourSearchIndex};
use crate::error::{InfoError, Result};

/// A set of columns of a [`JointSearcher`], built from one or more variable groups.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subspace {
    columns: Vec<usize>,
}

impl Subspace {
    pub fn columns(&self) -> &[usize] {
        &self.columns
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn dims(&self) -> usize {
        self.columns.len()
    }
}

#[derive(Debug, Clone, Copy)]
struct Candidate(Neighbour);

impl PartialEq for Candidate {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Candidate {}

impl PartialOrd for Candidate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Candidate {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.cmp_key(&other.0)
    }
}

/// Joint-space searcher over the columns of a samples × dimensions array,
/// partitioned into variable groups (e.g. source past, destination past,
/// destination next).
#[derive(Debug, Clone)]
pub struct JointSearcher {
    columns: Vec<Vec<f64>>,
    indices: Vec<NeighbourSearchIndex>,
    groups: Vec<std::ops::Range<usize>>,
    n: usize,
}

impl JointSearcher {
    /// Build per-column indices. `group_dims` must sum to the number of columns.
    pub fn new(data: ArrayView2<'_, f64>, group_dims: &[usize]) -> Result<Self> {
        let total: usize = group_dims.iter().sum();
        if total != data.ncols() {
            return Err(InfoError::config(
                "group_dims",
                format!("groups span {total} columns but data has {}", data.ncols()),
            ));
        }
        if group_dims.iter().any(|&d| d == 0) {
            return Err(InfoError::config("group_dims", "every variable group needs at least one column"));
        }
        let columns: Vec<Vec<f64>> = data.columns().into_iter().map(|c| c.to_vec()).collect();
        let indices = columns
            .iter()
            .map(|c| NeighbourSearchIndex::new(c))
            .collect::<Result<Vec<_>>>()?;
        let mut groups = Vec::with_capacity(group_dims.len());
        let mut start = 0;
        for &d in group_dims {
            groups.push(start..start + d);
            start += d;
        }
        Ok(Self { columns, indices, groups, n: data.nrows() })
    }

    pub fn len(&self) -> usize {
        self.n
    }

    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    pub fn num_groups(&self) -> usize {
        self.groups.len()
    }

    /// Index over a single column, for univariate fast paths.
    pub(crate) fn column_index(&self, column: usize) -> &NeighbourSearchIndex {
        &self.indices[column]
    }

    /// Subspace spanned by the given variable groups.
    pub fn subspace(&self, groups: &[usize]) -> Subspace {
        let columns = groups.iter().flat_map(|&g| self.groups[g].clone()).collect();
        Subspace { columns }
    }

    /// Subspace spanned by every group.
    pub fn full(&self) -> Subspace {
        Subspace { columns: (0..self.columns.len()).collect() }
    }

    #[inline]
    fn distance(&self, columns: &[usize], a: usize, b: usize) -> f64 {
        let mut max = 0.0f64;
        for &c in columns {
            let d = (self.columns[c][a] - self.columns[c][b]).abs();
            if d > max {
                max = d;
            }
        }
        max
    }

    /// Max-norm distance between samples `a` and `b` within each variable group.
    pub fn group_distances(&self, a: usize, b: usize) -> Vec<f64> {
        self.groups
            .iter()
            .map(|g| {
                let cols: Vec<usize> = g.clone().collect();
                self.distance(&cols, a, b)
            })
            .collect()
    }

    /// Max-norm distance between samples `a` and `b` restricted to one group.
    pub fn group_distance(&self, group: usize, a: usize, b: usize) -> f64 {
        let mut max = 0.0f64;
        for c in self.groups[group].clone() {
            let d = (self.columns[c][a] - self.columns[c][b]).abs();
            if d > max {
                max = d;
            }
        }
        max
    }

    /// The `k` nearest neighbours of `index` in `space`, ascending by distance
    /// with ties going to the lower original index, excluding the query and all
    /// samples within `exclusion_window` time steps.
    pub fn k_nearest(&self, space: &Subspace, k: usize, index: usize, exclusion_window: usize) -> Result<Vec<Neighbour>> {
        if space.is_empty() {
            return Err(InfoError::config("subspace", "k-nearest-neighbour search needs at least one column"));
        }
        if space.dims() == 1 {
            return self.column_index(space.columns[0]).k_nearest(k, index, exclusion_window);
        }
        if k == 0 {
            return Err(InfoError::config("k", "neighbour count must be >= 1"));
        }
        if self.n <= k + 2 * exclusion_window {
            return Err(InfoError::insufficient(
                format!("{k}-nearest-neighbour search with exclusion window {exclusion_window}"),
                k + 2 * exclusion_window,
                self.n,
            ));
        }

        let pivot = &self.indices[space.columns[0]];
        let rank = pivot.rank_of(index);
        let value = pivot.value(index);
        let mut heap: BinaryHeap<Candidate> = BinaryHeap::with_capacity(k + 1);

        let mut lower = rank.checked_sub(1);
        let mut upper = (rank + 1 < self.n).then_some(rank + 1);

        loop {
            let gap = |pos: Option<usize>| pos.map(|p| (pivot.value(pivot.index_at_rank(p)) - value).abs());
            let (gap_lower, gap_upper) = (gap(lower), gap(upper));
            let (pos, from_upper) = match (gap_lower, gap_upper) {
                (None, None) => break,
                (Some(_), None) => (lower, false),
                (None, Some(_)) => (upper, true),
                (Some(gl), Some(gu)) => {
                    if gu < gl { (upper, true) } else { (lower, false) }
                }
            };
            let Some(pos) = pos else { break };
            let pivot_gap = (if from_upper { gap_upper } else { gap_lower }).unwrap_or(f64::INFINITY);

            // Every remaining sample on either side is at least this far away.
            if heap.len() == k && heap.peek().is_some_and(|worst| pivot_gap > worst.0.distance) {
                break;
            }

            let j = pivot.index_at_rank(pos);
            if index.abs_diff(j) > exclusion_window {
                let cand = Candidate(Neighbour { index: j, distance: self.distance(&space.columns, index, j) });
                if heap.len() < k {
                    heap.push(cand);
                } else if heap.peek().is_some_and(|worst| cand < *worst) {
                    heap.pop();
                    heap.push(cand);
                }
            }

            if from_upper {
                upper = (pos + 1 < self.n).then_some(pos + 1);
            } else {
                lower = pos.checked_sub(1);
            }
        }

        if heap.len() < k {
            return Err(InfoError::insufficient(
                format!("{k}-nearest-neighbour search outside exclusion window {exclusion_window}"),
                k,
                heap.len(),
            ));
        }
        Ok(heap.into_sorted_vec().into_iter().map(|c| c.0).collect())
    }

    /// Walk the pivot column of `space` outwards from `index`, invoking `hit` for
    /// every sample within `r` (joint max-norm) that passes `accept`.
    fn walk<A, H>(&self, space: &Subspace, index: usize, r: f64, inclusive: bool, mut accept: A, mut hit: H)
    where
        A: FnMut(usize) -> bool,
        H: FnMut(usize, f64),
    {
        let pivot = &self.indices[space.columns[0]];
        let rank = pivot.rank_of(index);
        let value = pivot.value(index);
        let inside = |d: f64| if inclusive { d <= r } else { d < r };
        let mut visit = |pos: usize| -> bool {
            let j = pivot.index_at_rank(pos);
            if !inside((pivot.value(j) - value).abs()) {
                return false;
            }
            if accept(j) {
                let d = self.distance(&space.columns, index, j);
                if inside(d) {
                    hit(j, d);
                }
            }
            true
        };
        for pos in (0..rank).rev() {
            if !visit(pos) {
                break;
            }
        }
        for pos in rank + 1..self.n {
            if !visit(pos) {
                break;
            }
        }
    }

    /// Count samples within `r` of `index` in `space`, skipping the exclusion
    /// window and, when given, samples whose `mask` entry is false.
    pub fn count_within_r(
        &self,
        space: &Subspace,
        index: usize,
        r: f64,
        inclusive: bool,
        exclusion_window: usize,
        mask: Option<&[bool]>,
    ) -> usize {
        if space.is_empty() {
            // Every admissible sample is within any radius of an empty space.
            return (0..self.n)
                .filter(|&j| j != index && index.abs_diff(j) > exclusion_window && mask.is_none_or(|m| m[j]))
                .count();
        }
        if let [column] = space.columns() {
            let univariate = self.column_index(*column);
            return match mask {
                Some(mask) => univariate.count_within_r_masked(index, r, exclusion_window, inclusive, mask),
                None => univariate.count_within_r_excluding(index, r, exclusion_window, inclusive),
            };
        }
        let mut count = 0;
        self.walk(
            space,
            index,
            r,
            inclusive,
            |j| index.abs_diff(j) > exclusion_window && mask.is_none_or(|m| m[j]),
            |_, _| count += 1,
        );
        count
    }

    /// Samples within `r` of `index` in `space`, outside the exclusion window.
    pub fn find_within_r(
        &self,
        space: &Subspace,
        index: usize,
        r: f64,
        inclusive: bool,
        exclusion_window: usize,
    ) -> Vec<Neighbour> {
        let mut found = Vec::new();
        if space.is_empty() {
            return (0..self.n)
                .filter(|&j| j != index && index.abs_diff(j) > exclusion_window)
                .map(|j| Neighbour { index: j, distance: 0.0 })
                .collect();
        }
        self.walk(
            space,
            index,
            r,
            inclusive,
            |j| index.abs_diff(j) > exclusion_window,
            |j, d| found.push(Neighbour { index: j, distance: d }),
        );
        found
    }
}
