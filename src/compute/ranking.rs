//! Rank propagation over the pairwise vote graph.
//!
//! Each vote is an edge from the loser to the winner, weighted by how many
//! times that outcome was recorded. Scores flow along edges by damped power
//! iteration; a node with no outgoing edges (it never lost) is a sink whose
//! damped mass is shared uniformly with every node, together with the
//! undamped remainder of every node. Total mass is conserved by every step.

use std::collections::HashMap;

use log::{debug, warn};

use crate::schema::{IndividualId, RankingConfig, Vote};

/// One damped power-iteration step.
///
/// `edges[i]` lists `(target, weight)` pairs leaving node `i`. The returned
/// scores sum to the same total as `scores`.
pub fn pagerank_step(scores: &[f64], edges: &[Vec<(usize, f64)>], damping: f64) -> Vec<f64> {
    let n = scores.len();
    let mut new_scores = vec![0.0; n];
    if n == 0 {
        return new_scores;
    }

    let mut residual = 0.0;
    for (owner, &score) in scores.iter().enumerate() {
        let damped = score * damping;
        residual += score - damped;

        let links = edges.get(owner).map(Vec::as_slice).unwrap_or_default();
        let total_weight: f64 = links.iter().map(|&(_, w)| w).sum();
        if total_weight > 0.0 {
            for &(target, weight) in links {
                new_scores[target] += weight / total_weight * damped;
            }
        } else {
            // Sink
            residual += damped;
        }
    }

    let share = residual / n as f64;
    for score in &mut new_scores {
        *score += share;
    }
    new_scores
}

/// Squared mean of the square roots of the absolute differences.
pub fn rms_error(old: &[f64], new: &[f64]) -> f64 {
    if old.is_empty() {
        return 0.0;
    }
    let total: f64 = old
        .iter()
        .zip(new)
        .map(|(a, b)| (b - a).abs().sqrt())
        .sum();
    (total / old.len() as f64).powi(2)
}

/// Converged score and position of one individual.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedEntry {
    pub id: IndividualId,
    pub score: f64,
    /// 0 = best.
    pub rank: usize,
}

/// Result of ranking one generation.
#[derive(Debug, Clone, PartialEq)]
pub struct Ranking {
    /// Entries ordered best first.
    pub entries: Vec<RankedEntry>,
    /// Power-iteration steps taken.
    pub iterations: usize,
    /// False when the iteration cap was hit first; scores are then a best
    /// effort rather than a fixed point.
    pub converged: bool,
}

impl Ranking {
    pub fn get(&self, id: IndividualId) -> Option<&RankedEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    /// Sum of all scores.
    pub fn total(&self) -> f64 {
        self.entries.iter().map(|e| e.score).sum()
    }
}

/// Scores a generation from its votes.
#[derive(Debug, Clone, Default)]
pub struct RankingEngine {
    config: RankingConfig,
}

impl RankingEngine {
    pub fn new(config: RankingConfig) -> Self {
        Self { config }
    }

    /// Iterate rank propagation to convergence and order the individuals.
    ///
    /// `scores` gives the starting score of every node in insertion order.
    /// If they carry no mass (a fresh generation) every node starts at 1.
    /// Converged scores are rescaled to sum to the node count. Ties keep
    /// insertion order.
    pub fn rank(&self, scores: &[(IndividualId, f64)], votes: &[Vote]) -> Ranking {
        let n = scores.len();
        let index: HashMap<IndividualId, usize> =
            scores.iter().enumerate().map(|(i, &(id, _))| (id, i)).collect();

        let mut edges: Vec<Vec<(usize, f64)>> = vec![Vec::new(); n];
        for vote in votes {
            match (index.get(&vote.loser), index.get(&vote.winner)) {
                (Some(&loser), Some(&winner)) if vote.count > 0 => {
                    edges[loser].push((winner, vote.count as f64));
                }
                (Some(_), Some(_)) => {}
                _ => warn!(
                    "Ignoring vote {} -> {} outside the ranked population",
                    vote.loser, vote.winner
                ),
            }
        }

        let mut current: Vec<f64> = scores.iter().map(|&(_, s)| s).collect();
        let mass: f64 = current.iter().sum();
        if !(mass > 0.0 && mass.is_finite()) {
            current = vec![1.0; n];
        }

        let damping = self.config.damping;
        let mut next = pagerank_step(&current, &edges, damping);
        let mut iterations = 1;
        let mut converged = true;
        while rms_error(&current, &next) > self.config.error_threshold {
            if let Some(cap) = self.config.max_iterations
                && iterations >= cap
            {
                warn!("Ranking hit the {} iteration cap before converging", cap);
                converged = false;
                break;
            }
            current = next;
            next = pagerank_step(&current, &edges, damping);
            iterations += 1;
        }
        debug!("Scores stabilized after {} steps", iterations);

        let total: f64 = next.iter().sum();
        if total > 0.0 {
            let factor = n as f64 / total;
            next.iter_mut().for_each(|s| *s *= factor);
        }

        let mut order: Vec<usize> = (0..n).collect();
        order.sort_by(|&a, &b| next[b].total_cmp(&next[a]));

        let entries = order
            .into_iter()
            .enumerate()
            .map(|(rank, i)| RankedEntry {
                id: scores[i].0,
                score: next[i],
                rank,
            })
            .collect();

        Ranking {
            entries,
            iterations,
            converged,
        }
    }
}
