// crates/hardcube-sim/src/config.rs

//! Run configuration: defaults, partial overlays, validation.
//!
//! Layers apply lowest to highest: [`SimulationConfig::default`], then any
//! number of [`ConfigOverlay`]s (a TOML profile, then command-line flags).

use anyhow::{bail, Result};
use hardcube_core::{GeneratorKind, ObservationWindow, RateOrder};
use serde::{Deserialize, Serialize};

use crate::sampler::StopRule;

/// Seed used when none is given.
pub const DEFAULT_SEED: u64 = 45;

/// Trajectories per run when none is given.
pub const DEFAULT_TRAJECTORIES: u32 = 1000;

/// Everything that determines the bytes a run produces.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Seed of the single shared stream.
    pub seed: u64,
    /// Number of trajectories to record.
    pub trajectories: u32,
    /// Deadline windows.
    #[serde(flatten)]
    pub window: ObservationWindow,
    /// Backing generator.
    pub generator: GeneratorKind,
    /// When a trajectory stops drawing.
    pub stop: StopRule,
    /// Order of the twelve rate draws.
    pub rate_order: RateOrder,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            seed: DEFAULT_SEED,
            trajectories: DEFAULT_TRAJECTORIES,
            window: ObservationWindow::default(),
            generator: GeneratorKind::Std,
            stop: StopRule::Resolved,
            rate_order: RateOrder::Popcount,
        }
    }
}

impl SimulationConfig {
    /// Settings that regenerate the drand48 reference data set.
    #[must_use]
    pub fn reference() -> Self {
        Self {
            generator: GeneratorKind::Drand48,
            stop: StopRule::Absorbed,
            rate_order: RateOrder::Target,
            ..Self::default()
        }
    }

    /// Reject values no run can use.
    pub fn validate(&self) -> Result<()> {
        if self.trajectories == 0 {
            bail!("trajectories must be at least 1");
        }
        self.window.validate()
    }

    /// Apply an overlay; `Some` fields win.
    #[must_use]
    pub fn with(mut self, o: &ConfigOverlay) -> Self {
        if let Some(v) = o.seed {
            self.seed = v;
        }
        if let Some(v) = o.trajectories {
            self.trajectories = v;
        }
        if let Some(v) = o.t1_span {
            self.window.t1_span = v;
        }
        if let Some(v) = o.gap_span {
            self.window.gap_span = v;
        }
        if let Some(v) = o.generator {
            self.generator = v;
        }
        if let Some(v) = o.stop {
            self.stop = v;
        }
        if let Some(v) = o.rate_order {
            self.rate_order = v;
        }
        self
    }
}

/// Partial configuration; every field optional.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigOverlay {
    /// Stream seed.
    pub seed: Option<u64>,
    /// Trajectory count.
    pub trajectories: Option<u32>,
    /// Upper bound of `t1`.
    pub t1_span: Option<f64>,
    /// Upper bound of `t2 - t1`.
    pub gap_span: Option<f64>,
    /// Generator kind.
    pub generator: Option<GeneratorKind>,
    /// Stop rule.
    pub stop: Option<StopRule>,
    /// Rate draw order.
    pub rate_order: Option<RateOrder>,
}
