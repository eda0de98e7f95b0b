//! Generation transitions: weighted parent selection, crossover, mutation
//! and viability filtering.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use log::{debug, info};
use rayon::prelude::*;

use crate::compute::compiler::{compile, is_degenerate};
use crate::compute::render::Renderer;
use crate::schema::{
    ConfigError, EvolutionConfig, Generation, Genome, Individual, IndividualId, MutationConfig,
};

use super::genome::GenomeRng;
use super::sampler::WeightedSampler;
use super::store::StoreError;

/// Evolution failures.
#[derive(Debug, thiserror::Error)]
pub enum EvolutionError {
    #[error("No individual carries positive weight")]
    EmptyPopulation,
    #[error("Weight {weight} at index {index} is negative or not finite")]
    InvalidWeight { index: usize, weight: f64 },
    #[error("Produced {produced} viable children in {attempts} attempts")]
    Exhausted { produced: usize, attempts: usize },
    #[error("Unknown generation {0}")]
    UnknownGeneration(u64),
    #[error("Vote {loser} -> {winner} in generation {generation} rejected: {reason}")]
    InvalidVote {
        winner: IndividualId,
        loser: IndividualId,
        generation: u64,
        reason: &'static str,
    },
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("Storage error: {0}")]
    Store(#[from] StoreError),
}

/// A bred candidate waiting for validation.
struct Candidate {
    genome: Genome,
    parents: [IndividualId; 2],
}

/// Breeds the next generation from a scored one.
pub struct ReproductionScheduler<R> {
    mutation: MutationConfig,
    max_attempts_per_child: usize,
    renderer: R,
    next_id: Arc<AtomicU64>,
}

impl<R: Renderer> ReproductionScheduler<R> {
    pub fn new(config: &EvolutionConfig, renderer: R) -> Self {
        Self {
            mutation: config.mutation.clone(),
            max_attempts_per_child: config.max_attempts_per_child,
            renderer,
            next_id: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Continue id allocation after ids already in use.
    pub fn with_next_id(self, next_id: IndividualId) -> Self {
        self.next_id.store(next_id, Ordering::Relaxed);
        self
    }

    /// Id the next child will receive.
    pub fn next_id(&self) -> IndividualId {
        self.next_id.load(Ordering::Relaxed)
    }

    /// Reserve a fresh individual id.
    pub fn allocate_id(&self) -> IndividualId {
        self.next_id.fetch_add(1, Ordering::Relaxed)
    }

    /// A genome is viable when it compiles to a non-atom expression that
    /// renders.
    pub fn is_viable(&self, genome: &Genome) -> bool {
        let curve = compile(genome);
        if is_degenerate(&curve) {
            debug!("Rejected degenerate candidate [{}]", genome);
            return false;
        }
        match self.renderer.render(&curve) {
            Ok(_) => true,
            Err(e) => {
                debug!("Rejected candidate [{}]: {}", genome, e);
                false
            }
        }
    }

    /// Produce exactly `target_size` viable children of `current`.
    ///
    /// Parents are drawn independently, with replacement, in proportion to
    /// their score. Candidates are bred sequentially from `rng` and
    /// validated in parallel, then accepted in breeding order, so a fixed
    /// seed always yields the same generation.
    pub fn advance(
        &self,
        current: &Generation,
        target_size: usize,
        rng: &mut GenomeRng,
    ) -> Result<Generation, EvolutionError> {
        let sampler = WeightedSampler::new(current.individuals.iter().map(|i| i.score))?;
        let max_attempts = target_size.saturating_mul(self.max_attempts_per_child);
        let number = current.number + 1;

        let mut children = Vec::with_capacity(target_size);
        let mut attempts = 0;
        while children.len() < target_size {
            if attempts >= max_attempts {
                return Err(EvolutionError::Exhausted {
                    produced: children.len(),
                    attempts,
                });
            }

            let wanted = (target_size - children.len()).min(max_attempts - attempts);
            let batch = self.breed(current, &sampler, wanted, rng);
            attempts += batch.len();

            let viable: Vec<bool> = batch
                .par_iter()
                .map(|candidate| self.is_viable(&candidate.genome))
                .collect();

            for (candidate, ok) in batch.into_iter().zip(viable) {
                if ok && children.len() < target_size {
                    children.push(Individual::new(
                        self.allocate_id(),
                        candidate.genome,
                        number,
                        candidate.parents.to_vec(),
                    ));
                }
            }
        }

        info!(
            "Generation {} -> {}: {} children from {} candidates",
            current.number, number, target_size, attempts
        );
        Ok(Generation::new(number, children))
    }

    /// Breed at least `wanted` mutated candidates, two per parent pair.
    fn breed(
        &self,
        current: &Generation,
        sampler: &WeightedSampler,
        wanted: usize,
        rng: &mut GenomeRng,
    ) -> Vec<Candidate> {
        let mut batch = Vec::with_capacity(wanted + 1);
        while batch.len() < wanted {
            let mother = &current.individuals[sampler.sample(rng)];
            let father = &current.individuals[sampler.sample(rng)];
            let parents = [mother.id, father.id];

            let (mut first, mut second) = rng.cut_and_splice(&mother.genome, &father.genome);
            rng.mutate(&mut first, &self.mutation);
            rng.mutate(&mut second, &self.mutation);

            batch.push(Candidate {
                genome: first,
                parents,
            });
            batch.push(Candidate {
                genome: second,
                parents,
            });
        }
        batch
    }
}
