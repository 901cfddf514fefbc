// crates/hardcube-sim/src/scripted.rs

//! Test fixtures shared by the sampler and recorder unit tests.

use std::collections::VecDeque;

use hardcube_core::{RatedGraph, UnitSource, EDGE_COUNT};

/// Replays a fixed list of draws, panicking if it runs dry.
pub(crate) struct Scripted(pub(crate) VecDeque<f64>);

impl Scripted {
    pub(crate) fn new(draws: &[f64]) -> Self {
        Self(draws.iter().copied().collect())
    }
}

impl UnitSource for Scripted {
    fn next_unit(&mut self) -> f64 {
        self.0.pop_front().expect("script exhausted")
    }
}

/// Single live path 0 -> 1 -> 3 -> 7, all rates 1.
pub(crate) fn forced_chain() -> RatedGraph {
    // canonical: 0-1 0-2 0-4 1-3 1-5 2-3 2-6 4-5 4-6 3-7 5-7 6-7
    let rates: [f64; EDGE_COUNT] = [1.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0];
    RatedGraph::from_edge_rates(&rates).unwrap()
}
