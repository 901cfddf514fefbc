//! Fixed 3-cube topology traversed from `000` to `111`.
//!
//! Nodes are the integers `0..8`, read as 3-bit vectors where bit `k` set
//! means coordinate `k` has flipped. Edges only ever add exactly one bit, so
//! the graph is a DAG ordered by popcount with node 7 as its single sink.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of nodes in the cube.
pub const NODE_COUNT: usize = 8;

/// Number of directed edges in the cube.
pub const EDGE_COUNT: usize = 12;

/// The absorbing (all-ones) node.
pub const ABSORBING: NodeId = NodeId(7);

/// Start node of every trajectory.
pub const ORIGIN: NodeId = NodeId(0);

/// Node index in `0..NODE_COUNT`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct NodeId(u8);

impl NodeId {
    /// Build a node id, returning `None` if `index >= NODE_COUNT`.
    #[inline]
    #[must_use]
    pub const fn new(index: u8) -> Option<Self> {
        if (index as usize) < NODE_COUNT {
            Some(Self(index))
        } else {
            None
        }
    }

    /// Raw index.
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Bits as `[bit2, bit1, bit0]`, most significant first.
    #[inline]
    #[must_use]
    pub const fn bits(self) -> [u8; 3] {
        [(self.0 >> 2) & 1, (self.0 >> 1) & 1, self.0 & 1]
    }

    /// Number of flipped coordinates.
    #[inline]
    #[must_use]
    pub const fn popcount(self) -> u32 {
        self.0.count_ones()
    }

    /// `true` for the sink node.
    #[inline]
    #[must_use]
    pub const fn is_absorbing(self) -> bool {
        self.0 as usize == NODE_COUNT - 1
    }

    /// All nodes in index order.
    pub fn all() -> impl Iterator<Item = Self> {
        (0..NODE_COUNT as u8).map(Self)
    }
}

impl TryFrom<u8> for NodeId {
    type Error = String;

    fn try_from(v: u8) -> Result<Self, Self::Error> {
        Self::new(v).ok_or_else(|| format!("node index {v} out of range 0..{NODE_COUNT}"))
    }
}

impl From<NodeId> for u8 {
    #[inline]
    fn from(n: NodeId) -> Self {
        n.0
    }
}

/// Renders as `"b2 b1 b0"`, the observation line format.
impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [b2, b1, b0] = self.bits();
        write!(f, "{b2} {b1} {b0}")
    }
}

/// Directed edge `from -> to`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Edge {
    /// Source node.
    pub from: NodeId,
    /// Target node (one more bit than `from`).
    pub to: NodeId,
}

impl Edge {
    const fn of(from: u8, to: u8) -> Self {
        Self {
            from: NodeId(from),
            to: NodeId(to),
        }
    }
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}->{}", self.from.0, self.to.0)
    }
}

/// Edges grouped by source, sources in popcount order.
const POPCOUNT_ORDER: [Edge; EDGE_COUNT] = [
    Edge::of(0, 1),
    Edge::of(0, 2),
    Edge::of(0, 4),
    Edge::of(1, 3),
    Edge::of(1, 5),
    Edge::of(2, 3),
    Edge::of(2, 6),
    Edge::of(4, 5),
    Edge::of(4, 6),
    Edge::of(3, 7),
    Edge::of(5, 7),
    Edge::of(6, 7),
];

/// Edges grouped by target, targets ascending.
const TARGET_ORDER: [Edge; EDGE_COUNT] = [
    Edge::of(0, 1),
    Edge::of(0, 2),
    Edge::of(1, 3),
    Edge::of(2, 3),
    Edge::of(0, 4),
    Edge::of(1, 5),
    Edge::of(4, 5),
    Edge::of(2, 6),
    Edge::of(4, 6),
    Edge::of(3, 7),
    Edge::of(5, 7),
    Edge::of(6, 7),
];

/// Enumeration order used when drawing one rate per edge.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RateOrder {
    /// Sources by popcount, then targets ascending.
    #[default]
    Popcount,
    /// Targets ascending, then sources ascending.
    Target,
}

/// The fixed hypercube graph. Zero-sized; all queries are pure.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Hypercube;

impl Hypercube {
    /// All 12 edges in the canonical (popcount) enumeration order.
    #[must_use]
    pub const fn edges(self) -> &'static [Edge; EDGE_COUNT] {
        &POPCOUNT_ORDER
    }

    /// All 12 edges in the requested draw order.
    #[must_use]
    pub const fn edges_in(self, order: RateOrder) -> &'static [Edge; EDGE_COUNT] {
        match order {
            RateOrder::Popcount => &POPCOUNT_ORDER,
            RateOrder::Target => &TARGET_ORDER,
        }
    }

    /// `to` has exactly one more bit than `from`, and contains all of `from`'s bits.
    #[must_use]
    pub const fn is_edge(self, from: NodeId, to: NodeId) -> bool {
        let added = to.0 & !from.0;
        from.0 & to.0 == from.0 && added.count_ones() == 1
    }

    /// Successors of `node`, ascending.
    pub fn successors(self, node: NodeId) -> impl Iterator<Item = NodeId> {
        (0..3u8)
            .map(|k| 1u8 << k)
            .filter(move |bit| node.0 & bit == 0)
            .map(move |bit| NodeId(node.0 | bit))
    }

    /// Whether `to` can be reached from `from` along edges (including `from == to`).
    #[must_use]
    pub const fn reachable(self, from: NodeId, to: NodeId) -> bool {
        from.0 & to.0 == from.0
    }
}
