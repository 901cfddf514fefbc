// crates/hardcube-sim/src/sampler.rs

//! Continuous-time jump process over a [`RatedGraph`], observed at two deadlines.
//!
//! Each step from `(node, now)`:
//! 1. `total = Σ outgoing rates`; if `total == 0` the node is terminal and any
//!    pending deadline resolves to it without drawing.
//! 2. Holding time `τ = -ln(u) / total`, `u ∈ (0, 1)`.
//! 3. Every unresolved deadline `d` with `d < now + τ` resolves to the
//!    *current* node (the one held across the deadline).
//! 4. Next node: first outgoing transition whose normalized cumulative rate
//!    is `>= r`, `r ∈ (0, 1)`, in ascending target order.
//! 5. `now += τ`.
//!
//! The cube is acyclic, so at most three jumps happen before the sink.

use hardcube_core::{
    CensoredObservation, NodeId, ObservationTimes, RatedGraph, Transition, UnitSource, ORIGIN,
};
use serde::{Deserialize, Serialize};
use tracing::trace;

/// When a trajectory stops drawing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StopRule {
    /// Stop as soon as both deadlines are resolved.
    #[default]
    Resolved,
    /// Keep jumping until a terminal node, as drand48-era generators did.
    /// The observation is unchanged; only the stream position afterwards differs.
    Absorbed,
}

impl StopRule {
    /// Lowercase name as used in configs and manifests.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Resolved => "resolved",
            Self::Absorbed => "absorbed",
        }
    }
}

/// Result of one simulated trajectory.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TrajectoryOutcome {
    /// What gets recorded.
    pub observation: CensoredObservation,
    /// Number of jumps taken.
    pub jumps: u32,
    /// Time a terminal node was entered, if the run got that far.
    pub absorbed_at: Option<f64>,
}

/// Exponential holding time with rate `total` from an open-interval draw `u`.
#[inline]
#[must_use]
pub fn holding_time(total: f64, u: f64) -> f64 {
    -u.ln() / total
}

/// Index of the first transition with `cumulative / total >= r`.
///
/// Ties go to the earliest transition. If rounding leaves the last
/// normalized sum just under `r`, the last transition with a positive rate
/// is chosen. `transitions` must be non-empty and `total` positive.
#[must_use]
pub fn select_transition(transitions: &[Transition], total: f64, r: f64) -> usize {
    let mut cumulative = 0.0;
    for (k, t) in transitions.iter().enumerate() {
        cumulative += t.rate;
        if cumulative / total >= r {
            return k;
        }
    }
    transitions
        .iter()
        .rposition(|t| t.rate > 0.0)
        .unwrap_or(transitions.len().saturating_sub(1))
}

/// Samples trajectories on one shared, read-only rated graph.
#[derive(Clone, Copy, Debug)]
pub struct TrajectorySampler<'g> {
    graph: &'g RatedGraph,
    stop: StopRule,
}

impl<'g> TrajectorySampler<'g> {
    /// Create a sampler.
    #[must_use]
    pub const fn new(graph: &'g RatedGraph, stop: StopRule) -> Self {
        Self { graph, stop }
    }

    /// Simulate one trajectory from the origin at time 0.
    ///
    /// Draws one holding time and one categorical value per jump, nothing
    /// at a terminal node.
    pub fn run<R: UnitSource + ?Sized>(
        &self,
        times: ObservationTimes,
        rng: &mut R,
    ) -> TrajectoryOutcome {
        let mut node = ORIGIN;
        let mut now = 0.0f64;
        let mut first: Option<NodeId> = None;
        let mut second: Option<NodeId> = None;
        let mut jumps = 0u32;
        let mut absorbed_at = None;

        let (first, second) = loop {
            let outgoing = self.graph.outgoing(node);
            let total = self.graph.total_rate(node);

            if total <= 0.0 {
                trace!(node = node.index(), now, "terminal");
                absorbed_at = Some(now);
                break (first.unwrap_or(node), second.unwrap_or(node));
            }

            let tau = holding_time(total, rng.next_open_unit());
            let until = now + tau;
            if first.is_none() && times.t1 < until {
                first = Some(node);
            }
            if second.is_none() && times.t2 < until {
                second = Some(node);
            }
            trace!(node = node.index(), tau, "hold");

            if let (StopRule::Resolved, Some(a), Some(b)) = (self.stop, first, second) {
                break (a, b);
            }

            let k = select_transition(outgoing, total, rng.next_open_unit());
            node = outgoing[k].target;
            now = until;
            jumps += 1;
        };

        TrajectoryOutcome {
            observation: CensoredObservation {
                first,
                second,
                elapsed: times.elapsed(),
            },
            jumps,
            absorbed_at,
        }
    }
}
