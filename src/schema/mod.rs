//! Schema module - Genome, population and configuration types.

mod config;
mod genome;
mod population;
mod seed;

pub use config::*;
pub use genome::*;
pub use population::*;
pub use seed::*;
