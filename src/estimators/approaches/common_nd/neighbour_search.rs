// SPDX-FileCopyrightText: 2025-2026 Carlson Büth <code@cbueth.de>
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Sorted-order nearest neighbour index for a single scalar variable.
//!
//! The samples are sorted once (ties ordered by original index, so the sort
//! is deterministic). Every query starts at the query's rank and walks the
//! sorted order outwards, independently below and above, stopping in each
//! direction at the first value outside the radius. Distances are either the
//! absolute difference (max-norm) or the squared difference; callers using
//! [`Norm::EuclideanSquared`] pass radii already squared.

use crate::error::{InfoError, Result};

/// Per-dimension distance used by the index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Norm {
    #[default]
    MaxNorm,
    EuclideanSquared,
}

impl Norm {
    #[inline]
    pub fn distance(self, a: f64, b: f64) -> f64 {
        match self {
            Norm::MaxNorm => (a - b).abs(),
            Norm::EuclideanSquared => (a - b) * (a - b),
        }
    }
}

/// A neighbour of a query sample: its original (time) index and distance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbour {
    pub index: usize,
    pub distance: f64,
}

impl Neighbour {
    /// Total order on (distance, index); lower index wins a distance tie.
    pub(crate) fn cmp_key(&self, other: &Self) -> std::cmp::Ordering {
        self.distance
            .total_cmp(&other.distance)
            .then(self.index.cmp(&other.index))
    }
}

#[inline]
fn within(distance: f64, r: f64, inclusive: bool) -> bool {
    if inclusive { distance <= r } else { distance < r }
}

#[inline]
fn in_window(a: usize, b: usize, window: usize) -> bool {
    a.abs_diff(b) <= window
}

/// Read-only index over one scalar series.
#[derive(Debug, Clone)]
pub struct NeighbourSearchIndex {
    values: Vec<f64>,
    /// rank -> original index
    sorted_indices: Vec<usize>,
    /// original index -> rank
    ranks: Vec<usize>,
    sorted_values: Vec<f64>,
    norm: Norm,
}

impl NeighbourSearchIndex {
    /// Build the index in O(n log n). Needs at least two finite samples.
    pub fn new(data: &[f64]) -> Result<Self> {
        let n = data.len();
        if n <= 1 {
            return Err(InfoError::insufficient("nearest neighbour search", 1, n));
        }
        if let Some(pos) = data.iter().position(|v| !v.is_finite()) {
            return Err(InfoError::config("data", format!("non-finite value at sample {pos}")));
        }
        let mut sorted_indices: Vec<usize> = (0..n).collect();
        // Stable sort keeps equal values in original index order.
        sorted_indices.sort_by(|&a, &b| data[a].total_cmp(&data[b]));
        let mut ranks = vec![0usize; n];
        for (rank, &idx) in sorted_indices.iter().enumerate() {
            ranks[idx] = rank;
        }
        let sorted_values = sorted_indices.iter().map(|&idx| data[idx]).collect();
        Ok(Self {
            values: data.to_vec(),
            sorted_indices,
            ranks,
            sorted_values,
            norm: Norm::MaxNorm,
        })
    }

    /// Switch the distance; radii passed to later queries use the same scale.
    pub fn with_norm(mut self, norm: Norm) -> Self {
        self.norm = norm;
        self
    }

    pub fn norm(&self) -> Norm {
        self.norm
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn value(&self, index: usize) -> f64 {
        self.values[index]
    }

    pub fn rank_of(&self, index: usize) -> usize {
        self.ranks[index]
    }

    pub fn index_at_rank(&self, rank: usize) -> usize {
        self.sorted_indices[rank]
    }

    #[inline]
    fn dist(&self, a: usize, b: usize) -> f64 {
        self.norm.distance(self.values[a], self.values[b])
    }

    /// Walk outwards from `index` in both directions, invoking `hit` for each sample
    /// within `r` that passes `accept`. Each direction stops at its first sample
    /// outside the radius; rejected samples inside the radius do not stop the walk.
    fn walk<A, H>(&self, index: usize, r: f64, inclusive: bool, mut accept: A, mut hit: H)
    where
        A: FnMut(usize) -> bool,
        H: FnMut(usize, f64),
    {
        let rank = self.ranks[index];
        for pos in (0..rank).rev() {
            let j = self.sorted_indices[pos];
            let d = self.dist(index, j);
            if !within(d, r, inclusive) {
                break;
            }
            if accept(j) {
                hit(j, d);
            }
        }
        for pos in rank + 1..self.len() {
            let j = self.sorted_indices[pos];
            let d = self.dist(index, j);
            if !within(d, r, inclusive) {
                break;
            }
            if accept(j) {
                hit(j, d);
            }
        }
    }

    /// Single nearest neighbour of `index` (self excluded).
    pub fn find_nearest(&self, index: usize) -> Neighbour {
        let rank = self.ranks[index];
        let below = (rank > 0).then(|| self.sorted_indices[rank - 1]);
        let above = (rank + 1 < self.len()).then(|| self.sorted_indices[rank + 1]);
        let candidate = |j: usize| Neighbour { index: j, distance: self.dist(index, j) };
        match (below, above) {
            (Some(b), Some(a)) => {
                let (nb, na) = (candidate(b), candidate(a));
                if na.cmp_key(&nb).is_lt() { na } else { nb }
            }
            (Some(b), None) => candidate(b),
            (None, Some(a)) => candidate(a),
            // n >= 2 is enforced at construction
            (None, None) => unreachable!("index holds at least two samples"),
        }
    }

    /// The `k` nearest neighbours of `index`, ascending by distance, excluding the
    /// query and every sample within `exclusion_window` time steps of it.
    ///
    /// Two cursors (below and above the query's rank) advance by consuming the
    /// closer candidate. Distance ties are resolved in favour of the lower
    /// original index, including ties across the K-th position.
    pub fn k_nearest(&self, k: usize, index: usize, exclusion_window: usize) -> Result<Vec<Neighbour>> {
        let n = self.len();
        if k == 0 {
            return Err(InfoError::config("k", "neighbour count must be >= 1"));
        }
        if n <= k + 2 * exclusion_window {
            return Err(InfoError::insufficient(
                format!("{k}-nearest-neighbour search with exclusion window {exclusion_window}"),
                k + 2 * exclusion_window,
                n,
            ));
        }
        let rank = self.ranks[index];
        let outside = |pos: usize| !in_window(index, self.sorted_indices[pos], exclusion_window);

        // Cursors hold the next admissible rank on each side, if any.
        let next_lower = |from: Option<usize>| -> Option<usize> {
            let mut pos = from?;
            loop {
                if outside(pos) {
                    return Some(pos);
                }
                if pos == 0 {
                    return None;
                }
                pos -= 1;
            }
        };
        let next_upper = |from: usize| -> Option<usize> { (from..n).find(|&pos| outside(pos)) };

        let mut lower = next_lower(rank.checked_sub(1));
        let mut upper = next_upper(rank + 1);
        let mut found: Vec<Neighbour> = Vec::with_capacity(k + 1);

        let candidate = |pos: Option<usize>| {
            pos.map(|p| {
                let j = self.sorted_indices[p];
                Neighbour { index: j, distance: self.dist(index, j) }
            })
        };

        loop {
            let below = candidate(lower);
            let above = candidate(upper);
            let take_upper = match (below, above) {
                (None, None) => break,
                (Some(_), None) => false,
                (None, Some(_)) => true,
                (Some(b), Some(a)) => a.cmp_key(&b).is_lt(),
            };
            let next = if take_upper { above } else { below };
            let Some(next) = next else { break };

            // Past the K-th neighbour, only keep consuming exact distance ties so
            // the final (distance, index) ordering can decide between them.
            if found.len() >= k && next.distance > found[k - 1].distance {
                break;
            }
            found.push(next);
            if take_upper {
                upper = upper.and_then(|p| next_upper(p + 1));
            } else {
                lower = lower.and_then(|p| next_lower(p.checked_sub(1)));
            }
        }

        found.sort_by(|a, b| a.cmp_key(b));
        found.truncate(k);
        if found.len() < k {
            return Err(InfoError::insufficient(
                format!("{k}-nearest-neighbour search outside exclusion window {exclusion_window}"),
                k,
                found.len(),
            ));
        }
        Ok(found)
    }

    /// Number of samples (self excluded) within `r` of sample `index`.
    pub fn count_within_r(&self, index: usize, r: f64, inclusive: bool) -> usize {
        let mut count = 0;
        self.walk(index, r, inclusive, |_| true, |_, _| count += 1);
        count
    }

    /// As [`count_within_r`](Self::count_within_r), ignoring samples within
    /// `exclusion_window` time steps of the query.
    pub fn count_within_r_excluding(&self, index: usize, r: f64, exclusion_window: usize, inclusive: bool) -> usize {
        let mut count = 0;
        self.walk(
            index,
            r,
            inclusive,
            |j| !in_window(index, j, exclusion_window),
            |_, _| count += 1,
        );
        count
    }

    /// As [`count_within_r_excluding`](Self::count_within_r_excluding),
    /// admitting only samples whose `mask` entry is true.
    pub fn count_within_r_masked(
        &self,
        index: usize,
        r: f64,
        exclusion_window: usize,
        inclusive: bool,
        mask: &[bool],
    ) -> usize {
        let mut count = 0;
        self.walk(
            index,
            r,
            inclusive,
            |j| mask[j] && !in_window(index, j, exclusion_window),
            |_, _| count += 1,
        );
        count
    }

    /// Count samples within `r` of an arbitrary value that need not be in the data.
    pub fn count_within_r_of_value(&self, value: f64, r: f64, inclusive: bool) -> usize {
        // First rank whose value is >= `value`.
        let pivot = self.sorted_values.partition_point(|&v| v < value);
        let mut count = 0;
        for pos in (0..pivot).rev() {
            if !within(self.norm.distance(value, self.sorted_values[pos]), r, inclusive) {
                break;
            }
            count += 1;
        }
        for pos in pivot..self.len() {
            if !within(self.norm.distance(value, self.sorted_values[pos]), r, inclusive) {
                break;
            }
            count += 1;
        }
        count
    }

    /// Original indices of the samples within `r` of `index`, outside the exclusion window.
    pub fn find_within_r(&self, index: usize, r: f64, exclusion_window: usize, inclusive: bool) -> Vec<Neighbour> {
        let mut found = Vec::new();
        self.walk(
            index,
            r,
            inclusive,
            |j| !in_window(index, j, exclusion_window),
            |j, d| found.push(Neighbour { index: j, distance: d }),
        );
        found
    }

    /// Samples below `index` in sorted order within `r`, plus every sample above it.
    pub fn count_within_r_or_larger(&self, index: usize, r: f64, inclusive: bool) -> usize {
        let rank = self.ranks[index];
        let mut count = 0;
        for pos in (0..rank).rev() {
            if !within(self.dist(index, self.sorted_indices[pos]), r, inclusive) {
                break;
            }
            count += 1;
        }
        count + (self.len() - rank - 1)
    }

    /// Samples below `index` in sorted order that lie outside `r`.
    pub fn count_smaller_and_outside_r(&self, index: usize, r: f64, inclusive: bool) -> usize {
        let rank = self.ranks[index];
        let mut pos = rank;
        while pos > 0 && within(self.dist(index, self.sorted_indices[pos - 1]), r, inclusive) {
            pos -= 1;
        }
        pos
    }
}
