// SPDX-FileCopyrightText: 2025-2026 Carlson Büth <code@cbueth.de>
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Selection of embedding history and delay by maximising a bias-corrected
//! measure over a grid of candidates.
//!
//! History 1 is only evaluated with delay 1 (the delay is meaningless
//! without a second element). The destination embedding is chosen first by
//! maximising active information storage; the source embedding of a transfer
//! entropy is then chosen given that destination embedding.

use rand::SeedableRng;
use rand_xoshiro::Xoshiro256PlusPlus;
use tracing::trace;

use crate::config::{BiasCorrection, Embedding};
use crate::error::{InfoError, Result};
use crate::estimators::calculator::Measure;
use crate::estimators::significance::{analytic_test, generate_permutations};

/// Candidate embeddings in evaluation order: `(1, 1)`, then every
/// `history in 2..=max_history` with every `delay in 1..=max_delay`.
pub fn candidate_embeddings(max_history: usize, max_delay: usize) -> Vec<Embedding> {
    let mut candidates = Vec::new();
    if max_history == 0 || max_delay == 0 {
        return candidates;
    }
    candidates.push(Embedding::new(1, 1));
    for history in 2..=max_history {
        for delay in 1..=max_delay {
            candidates.push(Embedding::new(history, delay));
        }
    }
    candidates
}

/// The candidate with the highest score. `score` receives the candidate's
/// position (for seeding) and the candidate; ties keep the earlier one.
pub fn select_embedding<F>(candidates: &[Embedding], mut score: F) -> Result<(Embedding, f64)>
where
    F: FnMut(usize, Embedding) -> Result<f64>,
{
    let mut best: Option<(Embedding, f64)> = None;
    for (index, &candidate) in candidates.iter().enumerate() {
        let value = score(index, candidate)?;
        trace!(history = candidate.history, delay = candidate.delay, score = value, "embedding candidate");
        if best.is_none_or(|(_, best_value)| value > best_value) {
            best = Some((candidate, value));
        }
    }
    best.ok_or_else(|| InfoError::config("auto_embed", "no candidate embeddings to evaluate"))
}

/// Expected bias of `measure` under the null, in nats.
///
/// Surrogate draws come from a generator seeded with `seed`.
pub(crate) fn bias_of(measure: &dyn Measure, bias: BiasCorrection, seed: u64) -> Result<f64> {
    match bias {
        BiasCorrection::None => Ok(0.0),
        BiasCorrection::Analytic => {
            if measure.analytic_bias_removed() {
                return Ok(0.0);
            }
            let analytic = measure.analytic().ok_or(InfoError::Unsupported {
                operation: "analytic bias correction",
                approach: measure.approach_name(),
            })?;
            Ok(analytic_test(analytic)?.mean())
        }
        BiasCorrection::Surrogates(count) => {
            let surrogates = measure.surrogates().ok_or(InfoError::Unsupported {
                operation: "surrogate bias correction",
                approach: measure.approach_name(),
            })?;
            let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);
            let orderings = generate_permutations(surrogates.num_observations(), count, &mut rng);
            let total = orderings
                .iter()
                .map(|ordering| surrogates.with_source_ordering(ordering))
                .sum::<Result<f64>>()?;
            Ok(total / count.max(1) as f64)
        }
    }
}
