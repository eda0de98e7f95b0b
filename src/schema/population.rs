//! Population types: individuals, votes and generations.

use serde::{Deserialize, Serialize};

use super::Genome;

/// Identifier of an individual, unique across generations.
pub type IndividualId = u64;

/// One evolved curve generator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Individual {
    /// Unique identifier.
    pub id: IndividualId,
    /// The genome.
    pub genome: Genome,
    /// Generation this individual belongs to.
    pub generation: u64,
    /// Parent IDs (empty for hand-written seeds).
    #[serde(default)]
    pub parents: Vec<IndividualId>,
    /// Rank-propagation score, written when the generation is scored.
    #[serde(default)]
    pub score: f64,
    /// Position in the generation's ordering, 0 = best.
    #[serde(default)]
    pub rank: Option<usize>,
}

impl Individual {
    /// Create an unscored individual.
    pub fn new(
        id: IndividualId,
        genome: Genome,
        generation: u64,
        parents: Vec<IndividualId>,
    ) -> Self {
        Self {
            id,
            genome,
            generation,
            parents,
            score: 0.0,
            rank: None,
        }
    }
}

/// Aggregated pairwise outcome: `loser` lost to `winner` `count` times.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vote {
    pub loser: IndividualId,
    pub winner: IndividualId,
    pub generation: u64,
    pub count: u64,
}

/// A population snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Generation {
    /// Monotonically increasing generation number.
    pub number: u64,
    /// Members of this generation.
    pub individuals: Vec<Individual>,
}

impl Generation {
    pub fn new(number: u64, individuals: Vec<Individual>) -> Self {
        Self {
            number,
            individuals,
        }
    }

    /// Member count.
    pub fn num_individuals(&self) -> usize {
        self.individuals.len()
    }

    /// Look up a member by id.
    pub fn get(&self, id: IndividualId) -> Option<&Individual> {
        self.individuals.iter().find(|i| i.id == id)
    }

    /// Members ordered by rank; unranked members come last in storage order.
    pub fn ranked(&self) -> Vec<&Individual> {
        let mut sorted: Vec<_> = self.individuals.iter().collect();
        sorted.sort_by_key(|i| i.rank.unwrap_or(usize::MAX));
        sorted
    }
}
