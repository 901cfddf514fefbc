//! Rate assignment over the fixed cube.
//!
//! A [`RatedGraph`] is built once per run and then shared read-only by every
//! trajectory. It stores a per-node adjacency list of `(target, rate)` pairs
//! with targets ascending, which is also the categorical selection order.

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

use crate::graph::{Edge, Hypercube, NodeId, RateOrder, EDGE_COUNT, NODE_COUNT};
use crate::rng::UnitSource;

/// One outgoing transition: target node and its rate.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Transition {
    /// Node entered when this transition fires.
    pub target: NodeId,
    /// Transition rate (`>= 0`).
    pub rate: f64,
}

/// Edge rate paired with its edge, for listings and manifests.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct EdgeRate {
    /// The edge.
    pub edge: Edge,
    /// Its rate.
    pub rate: f64,
}

/// The cube with one rate per edge. Immutable once built.
#[derive(Clone, Debug, PartialEq)]
pub struct RatedGraph {
    outgoing: [Vec<Transition>; NODE_COUNT],
}

impl RatedGraph {
    /// Draw one rate per edge from `Uniform(0, 1)`, in `order`.
    ///
    /// Consumes exactly [`EDGE_COUNT`] draws from `rng`. Draws are open on
    /// both ends, so every edge rate is strictly positive.
    pub fn assign<R: UnitSource + ?Sized>(rng: &mut R, order: RateOrder) -> Self {
        let mut m = [[0.0f64; NODE_COUNT]; NODE_COUNT];
        for e in Hypercube.edges_in(order) {
            m[e.from.index()][e.to.index()] = rng.next_open_unit();
        }
        Self::collect(&m)
    }

    /// Build from explicit rates given in canonical edge order.
    ///
    /// Zero is accepted (a transition that never fires); negative or
    /// non-finite rates are rejected.
    pub fn from_edge_rates(rates: &[f64; EDGE_COUNT]) -> Result<Self> {
        for (edge, &rate) in Hypercube.edges().iter().zip(rates) {
            if !rate.is_finite() || rate < 0.0 {
                bail!("edge {edge}: rate must be finite and non-negative, got {rate}");
            }
        }
        let mut m = [[0.0f64; NODE_COUNT]; NODE_COUNT];
        for (e, &rate) in Hypercube.edges().iter().zip(rates) {
            m[e.from.index()][e.to.index()] = rate;
        }
        Ok(Self::collect(&m))
    }

    /// Build from a dense `from x to` matrix, validating the cube topology.
    ///
    /// Every edge must carry a positive finite rate and every non-edge zero.
    pub fn from_matrix(m: &[[f64; NODE_COUNT]; NODE_COUNT]) -> Result<Self> {
        let g = Hypercube;
        for from in NodeId::all() {
            for to in NodeId::all() {
                let rate = m[from.index()][to.index()];
                if g.is_edge(from, to) {
                    if !rate.is_finite() || rate <= 0.0 {
                        bail!(
                            "edge {}->{}: rate must be positive and finite, got {rate}",
                            from.index(),
                            to.index()
                        );
                    }
                } else if rate != 0.0 {
                    bail!(
                        "{}->{} is not an edge of the cube but has rate {rate}",
                        from.index(),
                        to.index()
                    );
                }
            }
        }
        Ok(Self::collect(m))
    }

    /// Pick the cube's edges out of a dense matrix; entries off the edge set are ignored.
    fn collect(m: &[[f64; NODE_COUNT]; NODE_COUNT]) -> Self {
        let mut outgoing: [Vec<Transition>; NODE_COUNT] = Default::default();
        for e in Hypercube.edges() {
            let rate = m[e.from.index()][e.to.index()];
            outgoing[e.from.index()].push(Transition { target: e.to, rate });
        }
        for list in &mut outgoing {
            list.sort_by_key(|t| t.target);
        }
        Self { outgoing }
    }

    /// Outgoing transitions of `node`, targets ascending.
    #[inline]
    #[must_use]
    pub fn outgoing(&self, node: NodeId) -> &[Transition] {
        &self.outgoing[node.index()]
    }

    /// Sum of outgoing rates, accumulated in target order (0 for the sink).
    #[inline]
    #[must_use]
    pub fn total_rate(&self, node: NodeId) -> f64 {
        self.outgoing(node).iter().fold(0.0, |acc, t| acc + t.rate)
    }

    /// Rate of `from -> to`; 0 for non-edges.
    #[must_use]
    pub fn rate(&self, from: NodeId, to: NodeId) -> f64 {
        self.outgoing(from)
            .iter()
            .find(|t| t.target == to)
            .map_or(0.0, |t| t.rate)
    }

    /// Edges with their rates, canonical order.
    #[must_use]
    pub fn edge_rates(&self) -> Vec<EdgeRate> {
        Hypercube
            .edges()
            .iter()
            .map(|&edge| EdgeRate {
                edge,
                rate: self.rate(edge.from, edge.to),
            })
            .collect()
    }

    /// Dense row-major matrix, zeros off the edge set.
    #[must_use]
    pub fn to_matrix(&self) -> [[f64; NODE_COUNT]; NODE_COUNT] {
        let mut m = [[0.0; NODE_COUNT]; NODE_COUNT];
        for from in NodeId::all() {
            for t in self.outgoing(from) {
                m[from.index()][t.target.index()] = t.rate;
            }
        }
        m
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{ABSORBING, ORIGIN};

    /// Hands out 0.01, 0.02, ... and counts draws.
    struct Ramp(u32);

    impl UnitSource for Ramp {
        fn next_unit(&mut self) -> f64 {
            self.0 += 1;
            f64::from(self.0) / 100.0
        }
    }

    #[test]
    fn assign_consumes_twelve_draws_in_canonical_order() {
        let mut rng = Ramp(0);
        let g = RatedGraph::assign(&mut rng, RateOrder::Popcount);
        assert_eq!(rng.0, 12);
        let rates: Vec<f64> = g.edge_rates().iter().map(|e| e.rate).collect();
        let want: Vec<f64> = (1..=12).map(|i| f64::from(i) / 100.0).collect();
        assert_eq!(rates, want);
    }

    #[test]
    fn target_order_permutes_draws() {
        let mut rng = Ramp(0);
        let g = RatedGraph::assign(&mut rng, RateOrder::Target);
        let n = |i| NodeId::new(i).unwrap();
        // 0->4 is the fifth draw in target order, third in popcount order.
        assert_eq!(g.rate(n(0), n(4)), 0.05);
        assert_eq!(g.rate(n(1), n(3)), 0.03);
        assert_eq!(g.rate(n(6), n(7)), 0.12);
    }

    #[test]
    fn adjacency_is_sorted_and_sink_is_empty() {
        let mut rng = Ramp(0);
        let g = RatedGraph::assign(&mut rng, RateOrder::Popcount);
        let targets: Vec<u8> = g.outgoing(ORIGIN).iter().map(|t| t.target.into()).collect();
        assert_eq!(targets, vec![1, 2, 4]);
        assert!(g.outgoing(ABSORBING).is_empty());
        assert_eq!(g.total_rate(ABSORBING), 0.0);
        assert!((g.total_rate(ORIGIN) - 0.06).abs() < 1e-12);
    }

    #[test]
    fn matrix_rejects_non_edges_and_zero_edges() {
        let mut rng = Ramp(0);
        let g = RatedGraph::assign(&mut rng, RateOrder::Popcount);
        let m = g.to_matrix();
        assert_eq!(RatedGraph::from_matrix(&m).unwrap(), g);

        let mut bad = m;
        bad[0][3] = 0.5;
        assert!(RatedGraph::from_matrix(&bad).is_err());

        let mut zero = m;
        zero[0][1] = 0.0;
        assert!(RatedGraph::from_matrix(&zero).is_err());
    }

    #[test]
    fn explicit_rates_allow_zero_but_not_negative() {
        let mut rates = [1.0; EDGE_COUNT];
        rates[1] = 0.0;
        assert!(RatedGraph::from_edge_rates(&rates).is_ok());
        rates[1] = -0.5;
        assert!(RatedGraph::from_edge_rates(&rates).is_err());
        rates[1] = f64::NAN;
        assert!(RatedGraph::from_edge_rates(&rates).is_err());
    }
}
