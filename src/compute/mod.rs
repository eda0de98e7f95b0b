//! Compute module - Curve evaluation, compilation, ranking and evolution.

mod compiler;
mod curve;
mod ranking;
mod render;

pub mod evolution;

pub use compiler::*;
pub use curve::*;
pub use ranking::*;
pub use render::*;
