//! Behavior graph storage for liveness checking
//!
//! The behavior graph is the product of the state graph and the tableau automaton.
//! Each node is a `(state, tableau_node)` pair, and transitions follow both:
//! - The state graph (via the Next relation)
//! - The tableau automaton (via tableau node successors)
//!
//! A liveness violation exists iff there is a reachable accepting cycle in this
//! product graph. Finding that cycle is not this module's job; it provides the
//! per-node storage the cycle search reads from.
//!
//! # Layout
//!
//! - [`graph_node`] - [`BehaviorGraphNode`] and its identity [`NodeKey`]
//! - [`transitions`] - packed transition records with pre-allocation
//! - [`checks`] - state/action predicate bits and their [`CheckLayout`]
//! - [`persist`] - binary record codec
//! - [`node_file`] - disk-backed node store
//! - [`tableau`] - lookup of tableau nodes by index
//!
//! # TLC Reference
//!
//! This follows TLC's implementation in:
//! - `tlc2/tool/liveness/GraphNode.java` - Node representation and record format
//! - `tlc2/util/BitVector.java` - Predicate check bits

pub mod checks;
pub mod graph_node;
pub mod node_file;
pub mod persist;
pub mod tableau;
pub mod transitions;

pub use checks::{CheckLayout, NodeChecks, PredicateChecks};
pub use graph_node::{BehaviorGraphNode, NodeKey, NO_TABLEAU};
pub use node_file::NodeFile;
pub use tableau::TableauGraph;
pub use transitions::{Allocation, Transition, TransitionStore};
