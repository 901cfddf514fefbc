//! CTMC trajectory sampling and censored-observation recording on the hardcube.
//!
//! - `sampler`: one trajectory from the origin, resolved at two deadlines.
//! - `recorder`: many trajectories on one graph and one stream, streamed to a sink.
//! - `config`: run configuration with layered overlays.
//! - `run`: ties a seeded stream to rate assignment and recording.
//!
//! Everything is single-threaded: reproducibility depends on consuming the
//! stream in a fixed order, first twelve rate draws, then each trajectory in turn.

#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![warn(
    missing_docs,
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used))]

/// Run configuration and overlays.
pub mod config;
/// Multi-trajectory recorder and sinks.
pub mod recorder;
/// Seeded run driver.
pub mod run;
/// Single-trajectory CTMC sampler.
pub mod sampler;

#[cfg(test)]
mod scripted;

pub use config::{ConfigOverlay, SimulationConfig};
pub use recorder::{ObservationRecorder, ObservationSink, RunSummary};
pub use run::Run;
pub use sampler::{StopRule, TrajectoryOutcome, TrajectorySampler};
