//! The evolution engine ties storage, ranking and reproduction together
//! and owns the state shared between concurrent voters.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use log::{debug, info, warn};

use crate::compute::ranking::{Ranking, RankingEngine};
use crate::compute::render::Renderer;
use crate::schema::{EvolutionConfig, Generation, Individual, IndividualId, initial_genomes};

use super::cache::PopulationCache;
use super::genome::GenomeRng;
use super::search::{EvolutionError, ReproductionScheduler};
use super::store::GenerationStore;

/// Runs the vote-driven generational loop over a store.
pub struct EvolutionEngine<S, R> {
    config: EvolutionConfig,
    store: Mutex<S>,
    scheduler: ReproductionScheduler<R>,
    ranking: RankingEngine,
    cache: PopulationCache,
    /// Held for the whole of a generation transition.
    transition: Mutex<GenomeRng>,
    matchups: Mutex<GenomeRng>,
    votes_cast: AtomicU64,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl<S: GenerationStore, R: Renderer> EvolutionEngine<S, R> {
    /// Create an engine over an existing (possibly empty) store.
    ///
    /// Id allocation continues after the highest stored id, and votes
    /// already recorded for the latest generation count towards advancing.
    pub fn new(config: EvolutionConfig, store: S, renderer: R) -> Result<Self, EvolutionError> {
        config.validate()?;

        let seed = config.random_seed.unwrap_or_else(rand::random);
        let mut rng = GenomeRng::new(seed);
        let matchups = GenomeRng::new(rng.next_seed());

        let next_id = store.max_individual_id().map_or(0, |id| id + 1);
        let votes_cast = match store.latest_generation() {
            Some(latest) => store.votes(latest)?.iter().map(|v| v.count).sum(),
            None => 0,
        };

        Ok(Self {
            scheduler: ReproductionScheduler::new(&config, renderer).with_next_id(next_id),
            ranking: RankingEngine::new(config.ranking.clone()),
            config,
            store: Mutex::new(store),
            cache: PopulationCache::new(),
            transition: Mutex::new(rng),
            matchups: Mutex::new(matchups),
            votes_cast: AtomicU64::new(votes_cast),
        })
    }

    pub fn config(&self) -> &EvolutionConfig {
        &self.config
    }

    /// Run `f` against the store.
    pub fn with_store<T>(&self, f: impl FnOnce(&S) -> T) -> T {
        f(&lock(&self.store))
    }

    /// Consume the engine, returning its store.
    pub fn into_store(self) -> S {
        self.store.into_inner().unwrap_or_else(PoisonError::into_inner)
    }

    /// The active (highest) generation number.
    pub fn current_generation(&self) -> Option<u64> {
        lock(&self.store).latest_generation()
    }

    /// Store generation 0 from the hand-written seed genomes. Does nothing
    /// when it already exists.
    pub fn seed_initial_generation(&self) -> Result<Generation, EvolutionError> {
        let mut store = lock(&self.store);
        if let Some(existing) = store.generation(0)? {
            return Ok(existing);
        }

        let individuals = initial_genomes()
            .into_iter()
            .map(|genome| Individual::new(self.scheduler.allocate_id(), genome, 0, Vec::new()))
            .collect();
        let generation = Generation::new(0, individuals);
        store.put_generation(generation.clone())?;
        info!(
            "Seeded generation 0 with {} individuals",
            generation.num_individuals()
        );
        Ok(generation)
    }

    /// The active generation, seeding generation 0 into an empty store.
    pub fn ensure_seeded(&self) -> Result<u64, EvolutionError> {
        match self.current_generation() {
            Some(latest) => Ok(latest),
            None => self.seed_initial_generation().map(|g| g.number),
        }
    }

    /// Members of a generation, served from the population cache.
    pub fn population(&self, generation: u64) -> Result<Arc<Vec<Individual>>, EvolutionError> {
        self.cache
            .get_or_load(generation, || self.load_individuals(generation))
    }

    fn load_individuals(&self, generation: u64) -> Result<Vec<Individual>, EvolutionError> {
        lock(&self.store)
            .generation(generation)?
            .map(|g| g.individuals)
            .ok_or(EvolutionError::UnknownGeneration(generation))
    }

    /// Two distinct members of the active generation to compare, or
    /// `None` when it has fewer than two.
    pub fn sample_matchup(&self) -> Result<Option<(Individual, Individual)>, EvolutionError> {
        let generation = self.ensure_seeded()?;
        let mut pair = self.cache.sample(
            generation,
            2,
            || self.load_individuals(generation),
            &mut lock(&self.matchups),
        )?;
        Ok(match (pair.pop(), pair.pop()) {
            (Some(a), Some(b)) => Some((b, a)),
            _ => None,
        })
    }

    /// Record that `winner` beat `loser` in `generation`, returning the
    /// aggregated count of that outcome.
    pub fn record_vote(
        &self,
        winner: IndividualId,
        loser: IndividualId,
        generation: u64,
    ) -> Result<u64, EvolutionError> {
        let reject = |reason| {
            warn!(
                "Discarded vote ({} -> {}) in generation {}: {}",
                loser, winner, generation, reason
            );
            EvolutionError::InvalidVote {
                winner,
                loser,
                generation,
                reason,
            }
        };

        if winner == loser {
            return Err(reject("an individual cannot beat itself"));
        }
        let members = self.population(generation)?;
        let is_member = |id| members.iter().any(|i: &Individual| i.id == id);
        if !is_member(winner) || !is_member(loser) {
            return Err(reject("not a member of that generation"));
        }

        let mut store = lock(&self.store);
        let count = store.record_vote(loser, winner, generation)?;
        if store.latest_generation() == Some(generation) {
            self.votes_cast.fetch_add(1, Ordering::Relaxed);
        }
        debug!("Recorded vote {} -> {} (x{})", loser, winner, count);
        Ok(count)
    }

    /// Votes counted towards the active generation.
    pub fn votes_cast(&self) -> u64 {
        self.votes_cast.load(Ordering::Relaxed)
    }

    /// Fraction of the vote threshold reached, capped at 1.
    pub fn progress(&self) -> f64 {
        (self.votes_cast() as f64 / self.config.votes_per_generation as f64).min(1.0)
    }

    /// True once the active generation has received enough votes.
    pub fn should_advance(&self) -> bool {
        self.votes_cast() >= self.config.votes_per_generation
    }

    /// Rank a generation from its votes and store each member's score and
    /// rank.
    pub fn score_generation(&self, number: u64) -> Result<Ranking, EvolutionError> {
        let mut store = lock(&self.store);
        let mut generation = store
            .generation(number)?
            .ok_or(EvolutionError::UnknownGeneration(number))?;
        let votes = store.votes(number)?;

        let scores: Vec<_> = generation
            .individuals
            .iter()
            .map(|i| (i.id, i.score))
            .collect();
        let ranking = self.ranking.rank(&scores, &votes);

        for individual in &mut generation.individuals {
            if let Some(entry) = ranking.get(individual.id) {
                individual.score = entry.score;
                individual.rank = Some(entry.rank);
            }
        }
        store.put_generation(generation)?;

        info!(
            "Scored generation {} from {} vote edges in {} iterations",
            number,
            votes.len(),
            ranking.iterations
        );
        Ok(ranking)
    }

    /// Score the active generation and breed its successor.
    pub fn next_generation(&self) -> Result<Option<Generation>, EvolutionError> {
        let current = self.ensure_seeded()?;
        self.advance_from(current)
    }

    /// Score `current` and breed generation `current + 1`.
    ///
    /// Transitions are serialized; if `current` has already been advanced
    /// past, this returns `Ok(None)` without breeding.
    pub fn advance_from(&self, current: u64) -> Result<Option<Generation>, EvolutionError> {
        let mut rng = lock(&self.transition);

        match self.current_generation() {
            Some(latest) if latest > current => {
                debug!(
                    "Generation {} already advanced to {}, skipping",
                    current, latest
                );
                return Ok(None);
            }
            Some(latest) if latest == current => {}
            _ => return Err(EvolutionError::UnknownGeneration(current)),
        }

        self.score_generation(current)?;
        let scored = self
            .load_individuals(current)
            .map(|individuals| Generation::new(current, individuals))?;

        let next = self
            .scheduler
            .advance(&scored, self.config.population_size, &mut rng)?;
        lock(&self.store).put_generation(next.clone())?;

        if let Some(stale) = self.cache.cached_generation() {
            debug!("Dropping cached population of generation {}", stale);
            self.cache.invalidate();
        }
        self.votes_cast.store(0, Ordering::Relaxed);
        Ok(Some(next))
    }

    /// Up to `count` members of a generation, best first.
    pub fn best(&self, generation: u64, count: usize) -> Result<Vec<Individual>, EvolutionError> {
        let generation = lock(&self.store)
            .generation(generation)?
            .ok_or(EvolutionError::UnknownGeneration(generation))?;
        Ok(generation
            .ranked()
            .into_iter()
            .take(count)
            .cloned()
            .collect())
    }

    /// Individuals bred from `id`.
    pub fn children_of(&self, id: IndividualId) -> Result<Vec<Individual>, EvolutionError> {
        Ok(lock(&self.store).children_of(id)?)
    }
}
