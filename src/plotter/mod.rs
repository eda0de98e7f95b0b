//! Sand plotter output.
//!
//! A [`SandPlotter`] drives the device over its line protocol; the
//! functions in `trace` turn curves into paths that fit its disk.

mod protocol;
mod trace;

pub use protocol::{PlotterError, SandPlotter};
pub use trace::{curve_path, hypotrochoid, plot_curve, plot_path};
