//! Predicate truth values for a behavior graph node
//!
//! Each node carries one bit vector holding both kinds of predicate results:
//!
//! ```text
//! [0, slen)                                  state predicates of this node
//! [slen + alen*i, slen + alen*(i+1))         action predicates along transition i
//! ```
//!
//! The vector itself does not record `slen` or `alen`. They are fixed per
//! liveness check and supplied by the caller, either as raw parameters or
//! bundled once in a [`CheckLayout`] so writer and reader cannot disagree.

use crate::bitvec::BitVector;

/// Bit layout of a node's predicate checks
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct CheckLayout {
    /// Number of state predicates
    pub slen: usize,
    /// Number of action predicates per transition
    pub alen: usize,
}

impl CheckLayout {
    pub const fn new(slen: usize, alen: usize) -> Self {
        Self { slen, alen }
    }

    #[inline]
    pub fn state_bit(&self, i: usize) -> usize {
        debug_assert!(i < self.slen, "state predicate {} >= slen {}", i, self.slen);
        i
    }

    /// First bit of transition `node_idx`'s action predicates
    #[inline]
    pub fn action_base(&self, node_idx: usize) -> usize {
        self.slen + self.alen * node_idx
    }

    #[inline]
    pub fn action_bit(&self, node_idx: usize, i: usize) -> usize {
        debug_assert!(i < self.alen, "action predicate {} >= alen {}", i, self.alen);
        self.action_base(node_idx) + i
    }

    /// Number of meaningful bits for a node with `succ` transitions
    pub fn bit_len(&self, succ: usize) -> usize {
        self.slen + self.alen * succ
    }
}

/// Monotonic predicate bit vector of one node
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PredicateChecks {
    bits: BitVector,
}

impl PredicateChecks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_bits(bits: BitVector) -> Self {
        Self { bits }
    }

    pub fn bits(&self) -> &BitVector {
        &self.bits
    }

    #[inline]
    pub fn get_state(&self, i: usize) -> bool {
        self.bits.get(i)
    }

    /// Set state predicate `i` for every true entry; false entries are left alone.
    pub fn set_state(&mut self, vals: &[bool]) {
        for (i, _) in vals.iter().enumerate().filter(|&(_, &v)| v) {
            self.bits.set(i);
        }
    }

    #[inline]
    pub fn get_action(&self, layout: CheckLayout, node_idx: usize, i: usize) -> bool {
        self.bits.get(layout.action_bit(node_idx, i))
    }

    /// True iff every listed action predicate holds on transition `node_idx`.
    pub fn get_action_all(&self, layout: CheckLayout, node_idx: usize, is: &[usize]) -> bool {
        is.iter().all(|&i| self.get_action(layout, node_idx, i))
    }

    /// Record the action predicates that hold along transition `node_idx`.
    pub fn set_actions(&mut self, layout: CheckLayout, node_idx: usize, acts: &[bool]) {
        debug_assert!(
            acts.len() <= layout.alen,
            "{} action values for alen {}",
            acts.len(),
            layout.alen
        );
        let base = layout.action_base(node_idx);
        for (i, _) in acts.iter().enumerate().filter(|&(_, &v)| v) {
            self.bits.set(base + i);
        }
    }
}

/// Read-only view of a node's checks under a fixed layout
#[derive(Clone, Copy, Debug)]
pub struct NodeChecks<'a> {
    checks: &'a PredicateChecks,
    layout: CheckLayout,
    succ: usize,
}

impl<'a> NodeChecks<'a> {
    pub(crate) fn new(checks: &'a PredicateChecks, layout: CheckLayout, succ: usize) -> Self {
        Self {
            checks,
            layout,
            succ,
        }
    }

    pub fn layout(&self) -> CheckLayout {
        self.layout
    }

    pub fn state(&self, i: usize) -> bool {
        self.checks.get_state(self.layout.state_bit(i))
    }

    pub fn action(&self, node_idx: usize, i: usize) -> bool {
        debug_assert!(node_idx < self.succ, "transition {} >= {}", node_idx, self.succ);
        self.checks.get_action(self.layout, node_idx, i)
    }

    pub fn action_all(&self, node_idx: usize, is: &[usize]) -> bool {
        debug_assert!(node_idx < self.succ, "transition {} >= {}", node_idx, self.succ);
        self.checks.get_action_all(self.layout, node_idx, is)
    }

    /// Indices of the state predicates that hold
    pub fn true_states(&self) -> impl Iterator<Item = usize> + 'a {
        let checks = self.checks;
        let slen = self.layout.slen;
        checks.bits.iter_ones().take_while(move |&bit| bit < slen)
    }
}
