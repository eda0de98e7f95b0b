//! Cache of the active generation's members, shared by request handlers
//! that sample pairwise matchups.

use std::sync::{Arc, Mutex, PoisonError};

use super::genome::GenomeRng;
use crate::schema::Individual;

#[derive(Debug)]
struct CachedPopulation {
    generation: u64,
    individuals: Arc<Vec<Individual>>,
}

/// Holds one generation's members. Check-and-refresh happens under a
/// single lock; moving to another generation replaces the whole entry.
#[derive(Debug, Default)]
pub struct PopulationCache {
    inner: Mutex<Option<CachedPopulation>>,
}

impl PopulationCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Members of `generation`, calling `load` only when the cache holds a
    /// different generation or nothing.
    pub fn get_or_load<F, E>(&self, generation: u64, load: F) -> Result<Arc<Vec<Individual>>, E>
    where
        F: FnOnce() -> Result<Vec<Individual>, E>,
    {
        let mut guard = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(cached) = guard.as_ref()
            && cached.generation == generation
        {
            return Ok(Arc::clone(&cached.individuals));
        }

        let individuals = Arc::new(load()?);
        *guard = Some(CachedPopulation {
            generation,
            individuals: Arc::clone(&individuals),
        });
        Ok(individuals)
    }

    /// Up to `count` distinct members of `generation`, chosen uniformly.
    pub fn sample<F, E>(
        &self,
        generation: u64,
        count: usize,
        load: F,
        rng: &mut GenomeRng,
    ) -> Result<Vec<Individual>, E>
    where
        F: FnOnce() -> Result<Vec<Individual>, E>,
    {
        let individuals = self.get_or_load(generation, load)?;
        Ok(rng
            .sample_indices(individuals.len(), count)
            .into_iter()
            .map(|i| individuals[i].clone())
            .collect())
    }

    /// Drop the cached population.
    pub fn invalidate(&self) {
        *self.inner.lock().unwrap_or_else(PoisonError::into_inner) = None;
    }

    /// Generation currently cached, if any.
    pub fn cached_generation(&self) -> Option<u64> {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .map(|c| c.generation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::convert::Infallible;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use crate::schema::Genome;

    fn population(generation: u64) -> Vec<Individual> {
        (0..3)
            .map(|id| Individual::new(id, Genome::default(), generation, vec![]))
            .collect()
    }

    #[test]
    fn test_loads_once_per_generation() {
        let cache = PopulationCache::new();
        let loads = AtomicUsize::new(0);
        let load = |generation| {
            loads.fetch_add(1, Ordering::Relaxed);
            Ok::<_, Infallible>(population(generation))
        };

        cache.get_or_load(4, || load(4)).unwrap();
        cache.get_or_load(4, || load(4)).unwrap();
        assert_eq!(loads.load(Ordering::Relaxed), 1);

        let fresh = cache.get_or_load(5, || load(5)).unwrap();
        assert_eq!(loads.load(Ordering::Relaxed), 2);
        assert_eq!(fresh[0].generation, 5);
        assert_eq!(cache.cached_generation(), Some(5));
    }

    #[test]
    fn test_sample_distinct_members() {
        let cache = PopulationCache::new();
        let mut rng = GenomeRng::new(7);
        let pair = cache
            .sample(2, 2, || Ok::<_, Infallible>(population(2)), &mut rng)
            .unwrap();
        assert_eq!(pair.len(), 2);
        assert_ne!(pair[0].id, pair[1].id);

        let all = cache
            .sample(2, 10, || Ok::<_, Infallible>(population(2)), &mut rng)
            .unwrap();
        assert_eq!(all.len(), 3);
    }

    #[test]
    fn test_invalidate() {
        let cache = PopulationCache::new();
        cache
            .get_or_load(1, || Ok::<_, Infallible>(population(1)))
            .unwrap();
        cache.invalidate();
        assert_eq!(cache.cached_generation(), None);
    }

    #[test]
    fn test_failed_load_keeps_previous_entry() {
        let cache = PopulationCache::new();
        cache
            .get_or_load(1, || Ok::<_, Infallible>(population(1)))
            .unwrap();
        let result = cache.get_or_load(2, || Err("storage down"));
        assert!(result.is_err());
        assert_eq!(cache.cached_generation(), Some(1));
    }
}
