//! Population storage: the interface the engine persists through, and an
//! in-memory implementation that snapshots to JSON.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::schema::{Generation, Individual, IndividualId, Vote};

/// Storage failures.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Snapshot format error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Persistent home of generations, their individuals, and votes.
pub trait GenerationStore {
    /// Highest stored generation number.
    fn latest_generation(&self) -> Option<u64>;

    /// A stored generation with all its members.
    fn generation(&self, number: u64) -> Result<Option<Generation>, StoreError>;

    /// Insert or replace a generation and its members in one write.
    fn put_generation(&mut self, generation: Generation) -> Result<(), StoreError>;

    /// Aggregated votes cast within a generation.
    fn votes(&self, generation: u64) -> Result<Vec<Vote>, StoreError>;

    /// Increment the `loser -> winner` edge and return its new count.
    fn record_vote(
        &mut self,
        loser: IndividualId,
        winner: IndividualId,
        generation: u64,
    ) -> Result<u64, StoreError>;

    /// Individuals whose parents include `id`.
    fn children_of(&self, id: IndividualId) -> Result<Vec<Individual>, StoreError>;

    /// Highest individual id ever stored.
    fn max_individual_id(&self) -> Option<IndividualId>;
}

/// In-memory store with JSON snapshots.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct MemoryStore {
    generations: BTreeMap<u64, Generation>,
    #[serde(default)]
    votes: BTreeMap<u64, Vec<Vote>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a snapshot written by [`MemoryStore::save`].
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Load a snapshot, or start empty if the file does not exist.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let path = path.as_ref();
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Write the whole store as pretty-printed JSON.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Number of stored generations.
    pub fn len(&self) -> usize {
        self.generations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.generations.is_empty()
    }
}

impl GenerationStore for MemoryStore {
    fn latest_generation(&self) -> Option<u64> {
        self.generations.keys().next_back().copied()
    }

    fn generation(&self, number: u64) -> Result<Option<Generation>, StoreError> {
        Ok(self.generations.get(&number).cloned())
    }

    fn put_generation(&mut self, generation: Generation) -> Result<(), StoreError> {
        self.generations.insert(generation.number, generation);
        Ok(())
    }

    fn votes(&self, generation: u64) -> Result<Vec<Vote>, StoreError> {
        Ok(self.votes.get(&generation).cloned().unwrap_or_default())
    }

    fn record_vote(
        &mut self,
        loser: IndividualId,
        winner: IndividualId,
        generation: u64,
    ) -> Result<u64, StoreError> {
        let votes = self.votes.entry(generation).or_default();
        if let Some(vote) = votes
            .iter_mut()
            .find(|v| v.loser == loser && v.winner == winner)
        {
            vote.count += 1;
            return Ok(vote.count);
        }
        votes.push(Vote {
            loser,
            winner,
            generation,
            count: 1,
        });
        Ok(1)
    }

    fn children_of(&self, id: IndividualId) -> Result<Vec<Individual>, StoreError> {
        Ok(self
            .generations
            .values()
            .flat_map(|g| &g.individuals)
            .filter(|i| i.parents.contains(&id))
            .cloned()
            .collect())
    }

    fn max_individual_id(&self) -> Option<IndividualId> {
        self.generations
            .values()
            .flat_map(|g| &g.individuals)
            .map(|i| i.id)
            .max()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{Atom, Genome, Token};

    fn individual(id: IndividualId, generation: u64, parents: Vec<IndividualId>) -> Individual {
        Individual::new(
            id,
            Genome::new(vec![Token::Atom(Atom::Circle)]),
            generation,
            parents,
        )
    }

    fn sample_store() -> MemoryStore {
        let mut store = MemoryStore::new();
        store
            .put_generation(Generation::new(
                0,
                vec![individual(1, 0, vec![]), individual(2, 0, vec![])],
            ))
            .unwrap();
        store
            .put_generation(Generation::new(1, vec![individual(3, 1, vec![1, 2])]))
            .unwrap();
        store
    }

    #[test]
    fn test_latest_and_lookup() {
        let store = sample_store();
        assert_eq!(store.latest_generation(), Some(1));
        assert_eq!(store.generation(0).unwrap().unwrap().num_individuals(), 2);
        assert!(store.generation(7).unwrap().is_none());
        assert_eq!(store.max_individual_id(), Some(3));
    }

    #[test]
    fn test_vote_counts_aggregate() {
        let mut store = sample_store();
        assert_eq!(store.record_vote(2, 1, 0).unwrap(), 1);
        assert_eq!(store.record_vote(2, 1, 0).unwrap(), 2);
        assert_eq!(store.record_vote(1, 2, 0).unwrap(), 1);

        let votes = store.votes(0).unwrap();
        assert_eq!(votes.len(), 2);
        assert!(store.votes(1).unwrap().is_empty());
    }

    #[test]
    fn test_children_of() {
        let store = sample_store();
        let children = store.children_of(1).unwrap();
        assert_eq!(children.len(), 1);
        assert_eq!(children[0].id, 3);
        assert!(store.children_of(3).unwrap().is_empty());
    }

    #[test]
    fn test_snapshot_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");

        let mut store = sample_store();
        store.record_vote(2, 1, 0).unwrap();
        store.save(&path).unwrap();

        let loaded = MemoryStore::open(&path).unwrap();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded.votes(0).unwrap(), store.votes(0).unwrap());
        assert_eq!(loaded.generation(1).unwrap(), store.generation(1).unwrap());
    }

    #[test]
    fn test_open_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = MemoryStore::open(dir.path().join("missing.json")).unwrap();
        assert!(store.is_empty());
    }
}
