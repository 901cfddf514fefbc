// crates/hardcube-sim/src/run.rs

//! One seeded run: rate assignment followed by the recorder, on one stream.

use anyhow::Result;
use hardcube_core::{RandomStream, RatedGraph};
use tracing::info;

use crate::config::SimulationConfig;
use crate::recorder::{ObservationRecorder, ObservationSink, RunSummary};

/// Owns the shared stream for the lifetime of a run.
#[derive(Clone, Debug)]
pub struct Run {
    config: SimulationConfig,
    rng: RandomStream,
}

impl Run {
    /// Validate `config` and seed the stream.
    pub fn new(config: SimulationConfig) -> Result<Self> {
        config.validate()?;
        let rng = RandomStream::seeded(config.generator, config.seed);
        info!(
            seed = config.seed,
            trajectories = config.trajectories,
            generator = config.generator.as_str(),
            stop = config.stop.as_str(),
            "run seeded"
        );
        Ok(Self { config, rng })
    }

    /// Configuration in effect.
    #[must_use]
    pub const fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Draw the twelve edge rates. Call at most once, before [`Run::record`].
    pub fn assign_rates(&mut self) -> RatedGraph {
        RatedGraph::assign(&mut self.rng, self.config.rate_order)
    }

    /// Simulate every trajectory against `graph`, streaming into `sink`.
    pub fn record<S: ObservationSink + ?Sized>(
        &mut self,
        graph: &RatedGraph,
        sink: &mut S,
    ) -> Result<RunSummary> {
        let recorder = ObservationRecorder::new(
            graph,
            self.config.stop,
            self.config.window,
            self.config.trajectories,
        );
        let summary = recorder.run(&mut self.rng, sink)?;
        info!(
            trajectories = summary.trajectories,
            jumps = summary.jumps,
            absorbed_at_t2 = summary.absorbed_at_t2,
            "observations recorded"
        );
        Ok(summary)
    }
}
