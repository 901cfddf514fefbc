//! Observation deadlines and the censored record produced per trajectory.

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

use crate::graph::NodeId;
use crate::rng::UnitSource;

/// Widths of the uniform windows the two deadlines are drawn from.
///
/// `t1 ~ Uniform(0, t1_span)`, `t2 = t1 + Uniform(0, gap_span)`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ObservationWindow {
    /// Upper bound of the first deadline.
    pub t1_span: f64,
    /// Upper bound of the gap between the deadlines.
    pub gap_span: f64,
}

impl Default for ObservationWindow {
    fn default() -> Self {
        Self {
            t1_span: 2.0,
            gap_span: 5.0,
        }
    }
}

impl ObservationWindow {
    /// Both spans must be positive and finite.
    pub fn validate(&self) -> Result<()> {
        for (name, v) in [("t1_span", self.t1_span), ("gap_span", self.gap_span)] {
            if !v.is_finite() || v <= 0.0 {
                bail!("{name} must be positive and finite, got {v}");
            }
        }
        Ok(())
    }

    /// Draw `t1` then the gap; two draws from `rng`.
    pub fn draw<R: UnitSource + ?Sized>(&self, rng: &mut R) -> ObservationTimes {
        let t1 = rng.next_open_unit() * self.t1_span;
        let t2 = t1 + rng.next_open_unit() * self.gap_span;
        ObservationTimes { t1, t2 }
    }
}

/// The two deadlines of one trajectory; `t1 < t2`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ObservationTimes {
    /// First observation time.
    pub t1: f64,
    /// Second observation time.
    pub t2: f64,
}

impl ObservationTimes {
    /// `t2 - t1`, computed from the drawn values.
    #[inline]
    #[must_use]
    pub fn elapsed(&self) -> f64 {
        self.t2 - self.t1
    }
}

/// What the observer sees of one trajectory.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CensoredObservation {
    /// Node held just before `t1` was crossed.
    pub first: NodeId,
    /// Node held just before `t2` was crossed.
    pub second: NodeId,
    /// `t2 - t1`.
    pub elapsed: f64,
}
