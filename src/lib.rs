//! Curve Evolve - Evolving parametric curve generators from pairwise human
//! preference.
//!
//! Genomes are flat postfix programs over a small curve algebra. They are
//! compiled into expression trees, evaluated over `t ∈ [0, 1)`, compared
//! pairwise by people, ranked by rank propagation over the resulting vote
//! graph, and bred into the next generation by crossover and mutation.
//!
//! # Architecture
//!
//! The crate is split into three modules:
//!
//! - `schema`: Genome, population and configuration types
//! - `compute`: Curve algebra, genome compiler, rendering, ranking and evolution
//! - `plotter`: Sand plotter protocol client and path tracing
//!
//! # Example
//!
//! ```rust
//! use curve_evolve::{
//!     compute::compile,
//!     schema::{Atom, Genome, Operator, Token},
//! };
//!
//! // circle * 0.5 + (1, 0)
//! let genome = Genome::new(vec![
//!     Token::Atom(Atom::Circle),
//!     Token::Atom(Atom::Scalar(0.5)),
//!     Token::Op(Operator::Scale),
//!     Token::Atom(Atom::Point(1.0, 0.0)),
//!     Token::Op(Operator::Translate),
//! ]);
//!
//! let curve = compile(&genome);
//! let p = curve.evaluate(0.0).unwrap();
//! assert!((p.x - 1.0).abs() < 1e-12 && (p.y - 0.5).abs() < 1e-12);
//! ```

pub mod compute;
pub mod plotter;
pub mod schema;

// Re-export commonly used types
pub use compute::{Curve, Point, compile};
pub use compute::evolution::{EvolutionEngine, MemoryStore};
pub use schema::{EvolutionConfig, Genome, Token};
