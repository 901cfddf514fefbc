// crates/hardcube-sim/src/recorder.rs

//! Runs many independent trajectories against one rated graph and one stream.
//!
//! Trajectories are simulated strictly in index order. Per trajectory the
//! stream yields the two deadline draws, then whatever the sampler consumes;
//! nothing is reseeded between trajectories. Each record is handed to the
//! sink as soon as its trajectory finishes.

use std::io::Write;

use anyhow::{Context, Result};
use hardcube_core::io::ObservationWriter;
use hardcube_core::{CensoredObservation, ObservationWindow, RatedGraph, UnitSource};
use serde::Serialize;
use tracing::{debug, trace_span};

use crate::sampler::{StopRule, TrajectorySampler};

/// Destination for censored observations, in completion order.
pub trait ObservationSink {
    /// Accept one record.
    fn record(&mut self, obs: &CensoredObservation) -> Result<()>;
}

impl<D: Write, T: Write> ObservationSink for ObservationWriter<D, T> {
    fn record(&mut self, obs: &CensoredObservation) -> Result<()> {
        self.write(obs)
    }
}

impl ObservationSink for Vec<CensoredObservation> {
    fn record(&mut self, obs: &CensoredObservation) -> Result<()> {
        self.push(*obs);
        Ok(())
    }
}

/// Aggregate counts over a finished run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct RunSummary {
    /// Trajectories recorded.
    pub trajectories: u64,
    /// Jumps taken across all trajectories.
    pub jumps: u64,
    /// Trajectories whose first observed node is the absorbing node.
    pub absorbed_at_t1: u64,
    /// Trajectories whose second observed node is the absorbing node.
    pub absorbed_at_t2: u64,
    /// Mean of the recorded `t2 - t1`.
    pub mean_elapsed: f64,
}

/// Drives the sampler `trajectories` times and feeds a sink.
#[derive(Clone, Copy, Debug)]
pub struct ObservationRecorder<'g> {
    sampler: TrajectorySampler<'g>,
    window: ObservationWindow,
    trajectories: u32,
}

impl<'g> ObservationRecorder<'g> {
    /// Create a recorder.
    #[must_use]
    pub const fn new(
        graph: &'g RatedGraph,
        stop: StopRule,
        window: ObservationWindow,
        trajectories: u32,
    ) -> Self {
        Self {
            sampler: TrajectorySampler::new(graph, stop),
            window,
            trajectories,
        }
    }

    /// Simulate every trajectory in order, recording each as it completes.
    ///
    /// Stops at the first sink error.
    pub fn run<R, S>(&self, rng: &mut R, sink: &mut S) -> Result<RunSummary>
    where
        R: UnitSource + ?Sized,
        S: ObservationSink + ?Sized,
    {
        let mut summary = RunSummary::default();
        let mut elapsed_sum = 0.0f64;

        for index in 0..self.trajectories {
            let _span = trace_span!("trajectory", index).entered();

            let times = self.window.draw(rng);
            let out = self.sampler.run(times, rng);
            let obs = out.observation;
            debug!(
                index,
                t1 = times.t1,
                t2 = times.t2,
                first = obs.first.index(),
                second = obs.second.index(),
                jumps = out.jumps,
                "trajectory complete"
            );

            sink.record(&obs)
                .with_context(|| format!("recording trajectory {index}"))?;

            summary.trajectories += 1;
            summary.jumps += u64::from(out.jumps);
            summary.absorbed_at_t1 += u64::from(obs.first.is_absorbing());
            summary.absorbed_at_t2 += u64::from(obs.second.is_absorbing());
            elapsed_sum += obs.elapsed;
        }

        if summary.trajectories > 0 {
            #[allow(clippy::cast_precision_loss)]
            let n = summary.trajectories as f64;
            summary.mean_elapsed = elapsed_sum / n;
        }
        Ok(summary)
    }
}
