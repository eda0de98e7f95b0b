//! Interactive evolution of curve genomes.
//!
//! Fitness is not computed: people compare pairs of rendered curves, every
//! vote becomes an edge from loser to winner, and rank propagation over
//! that graph scores the generation once enough votes are in.
//!
//! # Overview
//!
//! - **Genome Operations** (`genome`): random atoms, cut-and-splice crossover, mutation
//! - **Selection** (`sampler`): fitness-proportionate parent sampling
//! - **Reproduction** (`search`): breeding and validating the next generation
//! - **Storage** (`store`): the storage interface and a JSON-snapshot store
//! - **Cache** (`cache`): the active population shared by matchup requests
//! - **Engine** (`engine`): votes, scoring and generation transitions
//!
//! # Example
//!
//! ```rust,no_run
//! use curve_evolve::compute::PathRenderer;
//! use curve_evolve::compute::evolution::{EvolutionEngine, MemoryStore};
//! use curve_evolve::schema::EvolutionConfig;
//!
//! let config = EvolutionConfig::default();
//! let renderer = PathRenderer::new(config.render.clone());
//! let engine = EvolutionEngine::new(config, MemoryStore::new(), renderer).unwrap();
//!
//! if let Some((a, b)) = engine.sample_matchup().unwrap() {
//!     engine.record_vote(a.id, b.id, a.generation).unwrap();
//! }
//! if engine.should_advance() {
//!     let next = engine.next_generation().unwrap();
//!     println!("Advanced: {:?}", next.map(|g| g.number));
//! }
//! ```

mod cache;
mod engine;
mod genome;
mod sampler;
mod search;
mod store;

pub use cache::PopulationCache;
pub use engine::EvolutionEngine;
pub use genome::{GenomeRng, splice_at};
pub use sampler::WeightedSampler;
pub use search::{EvolutionError, ReproductionScheduler};
pub use store::{GenerationStore, MemoryStore, StoreError};
