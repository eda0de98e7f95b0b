//! Fitness-proportionate parent selection.

use super::genome::GenomeRng;
use super::search::EvolutionError;

/// Cumulative-weight sampler over a fixed population.
#[derive(Debug, Clone)]
pub struct WeightedSampler {
    totals: Vec<f64>,
}

impl WeightedSampler {
    /// Build from non-negative weights. Zero-weight entries are never drawn.
    pub fn new<I>(weights: I) -> Result<Self, EvolutionError>
    where
        I: IntoIterator<Item = f64>,
    {
        let mut running_total = 0.0;
        let mut totals = Vec::new();
        for (index, weight) in weights.into_iter().enumerate() {
            if !(weight >= 0.0 && weight.is_finite()) {
                return Err(EvolutionError::InvalidWeight { index, weight });
            }
            running_total += weight;
            totals.push(running_total);
        }

        if running_total <= 0.0 {
            return Err(EvolutionError::EmptyPopulation);
        }
        Ok(Self { totals })
    }

    /// Total weight.
    pub fn total(&self) -> f64 {
        self.totals.last().copied().unwrap_or_default()
    }

    /// Draw an index with probability proportional to its weight.
    pub fn sample(&self, rng: &mut GenomeRng) -> usize {
        let target = rng.uniform() * self.total();
        self.totals
            .partition_point(|&t| t <= target)
            .min(self.totals.len() - 1)
    }
}
