//! Behavior graph node storage for TLA+ liveness checking
//!
//! Liveness checking explores the product of the state graph and a tableau
//! automaton. That product graph routinely reaches tens of millions of nodes,
//! so each node is stored as a compact record: its identity, a flat array of
//! outgoing transitions, and a bit vector of predicate truth values. Nodes can
//! be paged to disk through a small binary codec.
//!
//! # Modules
//!
//! - [`liveness`] - node representation, predicate checks, persistence
//! - [`bitvec`] - growable bit vector used for predicate checks
//! - [`codec`] - big-endian primitive encoding shared by the on-disk formats
//! - [`config`] - configuration for node files and diagnostics
//! - [`error`] - persistence errors

pub mod bitvec;
pub mod codec;
pub mod config;
pub mod error;
pub mod fingerprint;
pub mod liveness;

pub use bitvec::BitVector;
pub use config::LivenessConfig;
pub use error::{PersistError, PersistResult};
pub use fingerprint::Fingerprint;
pub use liveness::{
    Allocation, BehaviorGraphNode, CheckLayout, NodeChecks, NodeFile, NodeKey, PredicateChecks,
    TableauGraph, Transition, TransitionStore, NO_TABLEAU,
};
