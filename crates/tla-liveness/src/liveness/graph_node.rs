//! Behavior graph nodes
//!
//! A [`BehaviorGraphNode`] is one `(state, tableau node)` pair of the product
//! graph together with everything liveness checking needs to know about it:
//! its outgoing transitions and the truth values of the temporal predicates
//! on the node and along each transition.
//!
//! Nodes are built by a single writer during exploration:
//!
//! ```
//! use tla_liveness::{BehaviorGraphNode, Fingerprint};
//!
//! let mut node = BehaviorGraphNode::new(Fingerprint(12345), 0);
//! node.allocate(2);
//! node.add_transition(Fingerprint(999), 1, 2, 1, Some(&[true]));
//! node.add_transition(Fingerprint(888), 2, 2, 1, Some(&[false]));
//! node.realign();
//!
//! assert_eq!(node.succ_size(), 2);
//! assert!(node.get_check_action(2, 1, 0, 0));
//! assert!(!node.get_check_action(2, 1, 1, 0));
//! ```
//!
//! after which they are only read (or paged out, see [`super::persist`]).

use std::fmt;
use std::hash::{Hash, Hasher};

use crate::config::DEFAULT_OVERHEAD_WARNING_RATIO;
use crate::fingerprint::Fingerprint;

use super::checks::{CheckLayout, NodeChecks, PredicateChecks};
use super::tableau::TableauGraph;
use super::transitions::{Allocation, Transition, TransitionStore};

/// Tableau index of nodes checked without a tableau (safety only)
pub const NO_TABLEAU: i32 = -1;

/// Identity of a behavior graph node: (state fingerprint, tableau index)
///
/// Two nodes are equal iff they have the same state fingerprint AND the same
/// tableau index.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeKey {
    pub state_fp: Fingerprint,
    pub tableau_idx: i32,
}

impl NodeKey {
    pub fn new(state_fp: Fingerprint, tableau_idx: i32) -> Self {
        Self {
            state_fp,
            tableau_idx,
        }
    }

    pub fn has_tableau(&self) -> bool {
        self.tableau_idx != NO_TABLEAU
    }
}

impl fmt::Debug for NodeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BG({}, t{})", self.state_fp, self.tableau_idx)
    }
}

impl fmt::Display for NodeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, t{})", self.state_fp, self.tableau_idx)
    }
}

impl From<Transition> for NodeKey {
    fn from(t: Transition) -> Self {
        NodeKey::new(t.fp, t.tidx)
    }
}

/// A node of the behavior graph with its transitions and predicate checks
///
/// Equality and hashing only look at the [`NodeKey`].
#[derive(Clone, Debug)]
pub struct BehaviorGraphNode {
    key: NodeKey,
    transitions: TransitionStore,
    checks: PredicateChecks,
}

impl BehaviorGraphNode {
    /// Create a node with no transitions and no predicate bits set
    pub fn new(state_fp: Fingerprint, tableau_idx: i32) -> Self {
        Self::with_key(NodeKey::new(state_fp, tableau_idx))
    }

    pub fn with_key(key: NodeKey) -> Self {
        Self::from_parts(key, TransitionStore::new(), PredicateChecks::new())
    }

    pub fn from_parts(key: NodeKey, transitions: TransitionStore, checks: PredicateChecks) -> Self {
        Self {
            key,
            transitions,
            checks,
        }
    }

    pub fn key(&self) -> NodeKey {
        self.key
    }

    pub fn state_fp(&self) -> Fingerprint {
        self.key.state_fp
    }

    pub fn tableau_idx(&self) -> i32 {
        self.key.tableau_idx
    }

    /// The tableau node this node is paired with, `None` without a tableau.
    pub fn tableau_node<'g, G>(&self, tableau: &'g G) -> Option<&'g G::Node>
    where
        G: TableauGraph + ?Sized,
    {
        let idx = usize::try_from(self.key.tableau_idx).ok()?;
        tableau.node(idx)
    }

    // ------------------------------------------------------------------
    // Construction
    // ------------------------------------------------------------------

    /// Reserve room for `transitions` upcoming [`add_transition`] calls.
    ///
    /// Worth calling when the branching factor is known (e.g. the number of
    /// enabled actions). Follow up with [`realign`] to give back unused slots.
    /// Calling it again before the first batch is used up adds to the
    /// reservation rather than replacing it.
    ///
    /// TLC's `GraphNode.allocate` moves the cursor to the old array length on
    /// every call, so a second call while slots are still free would leave
    /// those vacant slots counted as transitions. Here the cursor stays where
    /// it is and only committed transitions are ever counted or written.
    ///
    /// [`add_transition`]: Self::add_transition
    /// [`realign`]: Self::realign
    pub fn allocate(&mut self, transitions: usize) {
        self.transitions.allocate(transitions);
    }

    /// Add an edge to `(fp, tidx)`.
    ///
    /// `acts`, when given, holds the action predicate results along this edge;
    /// they are stored at `slen + alen * succ_size() + i`, with `succ_size()`
    /// taken before the edge is counted. No duplicate check is made; use
    /// [`trans_exists`](Self::trans_exists) first when that matters.
    pub fn add_transition(
        &mut self,
        fp: Fingerprint,
        tidx: i32,
        slen: usize,
        alen: usize,
        acts: Option<&[bool]>,
    ) {
        self.add_transition_in(CheckLayout::new(slen, alen), fp, tidx, acts);
    }

    /// [`add_transition`](Self::add_transition) with the layout fixed up front.
    pub fn add_transition_in(
        &mut self,
        layout: CheckLayout,
        fp: Fingerprint,
        tidx: i32,
        acts: Option<&[bool]>,
    ) {
        if let Some(acts) = acts {
            self.checks.set_actions(layout, self.transitions.len(), acts);
        }
        self.transitions.push(fp, tidx);
    }

    /// Discard slots reserved by [`allocate`](Self::allocate) but never used.
    pub fn realign(&mut self) {
        self.transitions.compact();
    }

    /// [`realign`](Self::realign), warning first if less than half of the
    /// `transitions_allocated` reserved slots were used.
    pub fn realign_with(&mut self, transitions_allocated: usize) {
        self.realign_reporting(transitions_allocated, DEFAULT_OVERHEAD_WARNING_RATIO);
    }

    /// [`realign`](Self::realign) with a caller-chosen warning threshold.
    ///
    /// The warning is purely diagnostic. It is skipped when nothing was
    /// allocated or no reservation is pending.
    pub fn realign_reporting(&mut self, transitions_allocated: usize, warn_below: f64) {
        if transitions_allocated > 0 && self.has_pending_allocation() {
            let free = self.transitions.reserved();
            let used = transitions_allocated.saturating_sub(free);
            if (used as f64) / (transitions_allocated as f64) < warn_below {
                tracing::warn!(
                    node = ?self.key,
                    used,
                    free,
                    allocated = transitions_allocated,
                    "transition pre-allocation overhead above threshold"
                );
            }
        }
        self.realign();
    }

    pub fn has_pending_allocation(&self) -> bool {
        matches!(self.transitions.allocation(), Allocation::Pending { .. })
    }

    /// Slots reserved by [`allocate`](Self::allocate) and not yet filled
    pub fn reserved_slots(&self) -> usize {
        self.transitions.reserved()
    }

    // ------------------------------------------------------------------
    // Transition queries
    // ------------------------------------------------------------------

    /// True iff there is an outgoing edge to `(fp, tidx)`. Linear in `succ_size()`.
    pub fn trans_exists(&self, fp: Fingerprint, tidx: i32) -> bool {
        self.transitions.contains(fp, tidx)
    }

    /// Number of committed transitions
    pub fn succ_size(&self) -> usize {
        self.transitions.len()
    }

    /// Target fingerprint of transition `i`. Panics if `i >= succ_size()`.
    pub fn get_state_fp(&self, i: usize) -> Fingerprint {
        self.transitions.get(i).fp
    }

    /// Target tableau index of transition `i`. Panics if `i >= succ_size()`.
    pub fn get_tidx(&self, i: usize) -> i32 {
        self.transitions.get(i).tidx
    }

    pub fn transition(&self, i: usize) -> Transition {
        self.transitions.get(i)
    }

    pub fn transitions(&self) -> &TransitionStore {
        &self.transitions
    }

    /// Keys of all successor nodes, in discovery order
    pub fn successors(&self) -> impl Iterator<Item = NodeKey> + '_ {
        self.transitions.iter().map(|&t| NodeKey::from(t))
    }

    // ------------------------------------------------------------------
    // Predicate checks
    // ------------------------------------------------------------------

    pub fn get_check_state(&self, i: usize) -> bool {
        self.checks.get_state(i)
    }

    /// Record state predicate results; only true entries are written.
    pub fn set_check_state(&mut self, vals: &[bool]) {
        self.checks.set_state(vals);
    }

    /// Action predicate `i` along transition `node_idx`
    pub fn get_check_action(&self, slen: usize, alen: usize, node_idx: usize, i: usize) -> bool {
        let layout = CheckLayout::new(slen, alen);
        debug_assert!(
            layout.action_bit(node_idx, i) < layout.bit_len(self.succ_size()),
            "action bit of transition {} outside {} transitions",
            node_idx,
            self.succ_size()
        );
        self.checks.get_action(layout, node_idx, i)
    }

    /// True iff all listed action predicates hold along transition `node_idx`
    pub fn get_check_action_all(
        &self,
        slen: usize,
        alen: usize,
        node_idx: usize,
        is: &[usize],
    ) -> bool {
        self.checks
            .get_action_all(CheckLayout::new(slen, alen), node_idx, is)
    }

    /// Read view of the predicate checks under `layout`
    pub fn checks(&self, layout: CheckLayout) -> NodeChecks<'_> {
        NodeChecks::new(&self.checks, layout, self.succ_size())
    }

    pub fn predicate_checks(&self) -> &PredicateChecks {
        &self.checks
    }

    pub(crate) fn replace_contents(&mut self, transitions: TransitionStore, checks: PredicateChecks) {
        self.transitions = transitions;
        self.checks = checks;
    }

    // ------------------------------------------------------------------
    // Rendering
    // ------------------------------------------------------------------

    /// GraphViz edge list, one `"<fp3>.<tidx> -> <fp3>.<tidx>"` line per edge.
    ///
    /// `<fp3>` is the first three characters of the fingerprint printed as a
    /// signed decimal, so fingerprints at or above 2^63 start with `-` exactly
    /// as in TLC. The labels collide freely; only meant for eyeballing small
    /// graphs.
    pub fn to_dot_viz(&self) -> String {
        let mut out = String::new();
        let from = fp_prefix(self.key.state_fp);
        for t in &self.transitions {
            out.push_str(&format!(
                "{}.{} -> {}.{}\n",
                from,
                self.key.tableau_idx,
                fp_prefix(t.fp),
                t.tidx
            ));
        }
        out
    }
}

fn fp_prefix(fp: Fingerprint) -> String {
    let mut s = fp.as_signed().to_string();
    s.truncate(3);
    s
}

impl PartialEq for BehaviorGraphNode {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl Eq for BehaviorGraphNode {}

impl Hash for BehaviorGraphNode {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key.hash(state);
    }
}

/// `<fp,tidx> --> <fp,tidx>, <fp,tidx>, ...` with signed decimal fingerprints
impl fmt::Display for BehaviorGraphNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{},{}> --> ", self.key.state_fp.as_signed(), self.key.tableau_idx)?;
        for (i, t) in self.transitions.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "<{},{}>", t.fp.as_signed(), t.tidx)?;
        }
        Ok(())
    }
}
