//! Configuration types for curve evolution.

use serde::{Deserialize, Serialize};

/// Top-level evolution configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvolutionConfig {
    /// Number of viable children produced per generation.
    #[serde(default = "default_population_size")]
    pub population_size: usize,
    /// Votes recorded before a generation is ready to advance.
    #[serde(default = "default_votes_per_generation")]
    pub votes_per_generation: u64,
    /// Candidates tried per requested child before giving up.
    #[serde(default = "default_max_attempts_per_child")]
    pub max_attempts_per_child: usize,
    /// Rank propagation parameters.
    #[serde(default)]
    pub ranking: RankingConfig,
    /// Mutation rates.
    #[serde(default)]
    pub mutation: MutationConfig,
    /// Rendering used to validate candidates.
    #[serde(default)]
    pub render: RenderConfig,
    /// Random seed for reproducibility.
    #[serde(default)]
    pub random_seed: Option<u64>,
}

impl Default for EvolutionConfig {
    fn default() -> Self {
        Self {
            population_size: default_population_size(),
            votes_per_generation: default_votes_per_generation(),
            max_attempts_per_child: default_max_attempts_per_child(),
            ranking: RankingConfig::default(),
            mutation: MutationConfig::default(),
            render: RenderConfig::default(),
            random_seed: None,
        }
    }
}

fn default_population_size() -> usize {
    100
}
fn default_votes_per_generation() -> u64 {
    500
}
fn default_max_attempts_per_child() -> usize {
    1000
}

/// Rank propagation (damped power iteration) parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankingConfig {
    /// Fraction of a node's score passed along its edges each step.
    #[serde(default = "default_damping")]
    pub damping: f64,
    /// Iteration stops once the step-to-step error drops to this value.
    #[serde(default = "default_error_threshold")]
    pub error_threshold: f64,
    /// Iteration cap; `None` iterates until convergence.
    #[serde(default = "default_max_iterations")]
    pub max_iterations: Option<usize>,
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self {
            damping: default_damping(),
            error_threshold: default_error_threshold(),
            max_iterations: default_max_iterations(),
        }
    }
}

fn default_damping() -> f64 {
    0.85
}
fn default_error_threshold() -> f64 {
    0.01
}
fn default_max_iterations() -> Option<usize> {
    Some(1000)
}

/// Per-genome mutation rates, normalized by genome length.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MutationConfig {
    /// Expected atom mutations per genome.
    #[serde(default = "default_atom_rate")]
    pub atom_rate: f64,
    /// Expected operator mutations per genome.
    #[serde(default = "default_op_rate")]
    pub op_rate: f64,
    /// Chance a mutated atom is replaced by a fresh random atom.
    #[serde(default = "default_change_type_probability")]
    pub change_type_probability: f64,
}

impl Default for MutationConfig {
    fn default() -> Self {
        Self {
            atom_rate: default_atom_rate(),
            op_rate: default_op_rate(),
            change_type_probability: default_change_type_probability(),
        }
    }
}

fn default_atom_rate() -> f64 {
    1.0
}
fn default_op_rate() -> f64 {
    0.5
}
fn default_change_type_probability() -> f64 {
    0.1
}

/// Curve sampling parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderConfig {
    /// Number of samples over `t` in `[0, 1)`.
    #[serde(default = "default_points")]
    pub points: usize,
    /// Side of the square the curve is normalized into.
    #[serde(default = "default_size")]
    pub size: f64,
    /// Curves whose bounding box is smaller than this on both axes are rejected.
    #[serde(default = "default_min_extent")]
    pub min_extent: f64,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            points: default_points(),
            size: default_size(),
            min_extent: default_min_extent(),
        }
    }
}

fn default_points() -> usize {
    8192
}
fn default_size() -> f64 {
    800.0
}
fn default_min_extent() -> f64 {
    1e-6
}

impl EvolutionConfig {
    /// Validate configuration parameters.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.population_size < 2 {
            return Err(ConfigError::PopulationTooSmall);
        }
        if self.max_attempts_per_child == 0 {
            return Err(ConfigError::InvalidAttempts);
        }
        if !(self.ranking.damping > 0.0 && self.ranking.damping < 1.0) {
            return Err(ConfigError::InvalidDamping(self.ranking.damping));
        }
        if self.ranking.error_threshold <= 0.0 {
            return Err(ConfigError::InvalidThreshold(self.ranking.error_threshold));
        }
        if self.ranking.max_iterations == Some(0) {
            return Err(ConfigError::InvalidIterations);
        }

        let rates = [
            ("atom_rate", self.mutation.atom_rate),
            ("op_rate", self.mutation.op_rate),
            (
                "change_type_probability",
                self.mutation.change_type_probability,
            ),
        ];
        for (name, rate) in rates {
            if rate < 0.0 || !rate.is_finite() {
                return Err(ConfigError::InvalidRate { name, rate });
            }
        }

        if self.render.points < 2 {
            return Err(ConfigError::InvalidPoints);
        }
        if self.render.size <= 0.0 {
            return Err(ConfigError::InvalidRenderSize);
        }
        Ok(())
    }
}

/// Configuration validation errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Population size must be at least 2")]
    PopulationTooSmall,
    #[error("Attempts per child must be non-zero")]
    InvalidAttempts,
    #[error("Damping factor {0} must lie strictly between 0 and 1")]
    InvalidDamping(f64),
    #[error("Error threshold {0} must be positive")]
    InvalidThreshold(f64),
    #[error("Iteration cap must be non-zero")]
    InvalidIterations,
    #[error("Mutation rate {name} = {rate} must be a non-negative number")]
    InvalidRate { name: &'static str, rate: f64 },
    #[error("Render needs at least 2 sample points")]
    InvalidPoints,
    #[error("Render size must be positive")]
    InvalidRenderSize,
}
