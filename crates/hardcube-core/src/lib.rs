//! hardcube-core: the fixed 3-cube, its edge rates, observation records and I/O.
//!
//! This crate defines the data model shared by the sampler and the CLI:
//! - the immutable cube topology (`graph`),
//! - the rated graph built once per run (`rates`),
//! - observation deadlines and censored records (`observation`),
//! - the uniform random stream abstraction (`rng`), and
//! - the plain-text artifact readers/writers (`io`).
//!
//! ```
//! use hardcube_core::prelude::*;
//!
//! let mut rng = RandomStream::seeded(GeneratorKind::Std, 45);
//! let graph = RatedGraph::assign(&mut rng, RateOrder::Popcount);
//! assert_eq!(graph.outgoing(ORIGIN).len(), 3);
//! assert!(graph.outgoing(ABSORBING).is_empty());
//! ```

#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![deny(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
// Small, explicit allowlist to keep docs readable and APIs ergonomic.
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::module_name_repetitions,
    clippy::doc_markdown
)]

/// Fixed cube topology: nodes, edges, enumeration orders.
pub mod graph;
/// Text artifacts (rate listing, state pairs, elapsed times) and JSON helper.
pub mod io;
/// Observation deadlines and censored records.
pub mod observation;
/// Rated graph: one rate per edge, adjacency lists per node.
pub mod rates;
/// Uniform random sources.
pub mod rng;

pub use graph::*;
pub use observation::*;
pub use rates::*;
pub use rng::*;

/// Commonly-used items for quick imports.
///
/// ```rust
/// use hardcube_core::prelude::*;
/// ```
pub mod prelude {
    pub use crate::graph::{
        Edge, Hypercube, NodeId, RateOrder, ABSORBING, EDGE_COUNT, NODE_COUNT, ORIGIN,
    };
    pub use crate::observation::{CensoredObservation, ObservationTimes, ObservationWindow};
    pub use crate::rates::{EdgeRate, RatedGraph, Transition};
    pub use crate::rng::{Drand48, GeneratorKind, RandomStream, UnitSource};
}
