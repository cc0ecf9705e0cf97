//! Outgoing transitions of a behavior graph node
//!
//! Transitions are stored as a flat `Vec<Transition>` rather than one heap
//! object per edge. Callers that know the branching factor up front can
//! reserve slots with [`TransitionStore::allocate`] and fill them one by one;
//! [`TransitionStore::compact`] drops whatever was reserved but never used.
//!
//! # Allocation cursor
//!
//! | state        | event        | effect                           | next state                 |
//! |--------------|--------------|----------------------------------|----------------------------|
//! | `NoPending`  | `allocate(n)`| grow by `n` slots                | `Pending(old len)`         |
//! | `Pending(c)` | `allocate(n)`| grow by `n` slots                | `Pending(c)`               |
//! | `NoPending`  | `push`       | append one record                | `NoPending`                |
//! | `Pending(c)` | `push`       | write slot `c`                   | `Pending(c+1)` or `NoPending` at the end |
//! | `Pending(c)` | `compact`    | truncate to `c`                  | `NoPending`                |
//! | `NoPending`  | `compact`    | nothing                          | `NoPending`                |
//!
//! Only the records before the cursor are committed. Reserved slots are
//! invisible to every query and are never persisted.

use crate::fingerprint::Fingerprint;

use super::NO_TABLEAU;

/// One outgoing edge: the target node's fingerprint and tableau index
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Transition {
    pub fp: Fingerprint,
    pub tidx: i32,
}

impl Transition {
    /// Placeholder written into reserved slots
    const VACANT: Transition = Transition {
        fp: Fingerprint(0),
        tidx: NO_TABLEAU,
    };

    pub fn new(fp: Fingerprint, tidx: i32) -> Self {
        Self { fp, tidx }
    }
}

/// Pre-allocation state of a [`TransitionStore`]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Allocation {
    /// Every stored record is committed
    #[default]
    NoPending,
    /// Records from `cursor` to the end are reserved, not yet written
    Pending { cursor: usize },
}

/// Ordered transitions with explicit pre-allocation and compaction
#[derive(Clone, Debug, Default)]
pub struct TransitionStore {
    records: Vec<Transition>,
    alloc: Allocation,
}

impl TransitionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap already committed records, e.g. ones just read from disk.
    pub fn from_records(records: Vec<Transition>) -> Self {
        Self {
            records,
            alloc: Allocation::NoPending,
        }
    }

    /// Reserve `n` more slots for upcoming [`push`](Self::push) calls.
    ///
    /// Does not change [`len`](Self::len). Calls accumulate: reserving twice
    /// without filling the first batch leaves room for both batches.
    pub fn allocate(&mut self, n: usize) {
        if n == 0 {
            return;
        }
        let prior = self.records.len();
        self.records.reserve_exact(n);
        self.records.resize(prior + n, Transition::VACANT);
        if self.alloc == Allocation::NoPending {
            self.alloc = Allocation::Pending { cursor: prior };
        }
    }

    /// Commit one transition and return its index.
    pub fn push(&mut self, fp: Fingerprint, tidx: i32) -> usize {
        let record = Transition::new(fp, tidx);
        match self.alloc {
            Allocation::NoPending => {
                self.records.push(record);
                self.records.len() - 1
            }
            Allocation::Pending { cursor } => {
                self.records[cursor] = record;
                let next = cursor + 1;
                self.alloc = if next == self.records.len() {
                    Allocation::NoPending
                } else {
                    Allocation::Pending { cursor: next }
                };
                cursor
            }
        }
    }

    /// Drop reserved but unused slots and return how many were dropped.
    ///
    /// A no-op (returning 0) when nothing is pending.
    pub fn compact(&mut self) -> usize {
        match self.alloc {
            Allocation::NoPending => 0,
            Allocation::Pending { cursor } => {
                let dropped = self.records.len() - cursor;
                self.records.truncate(cursor);
                self.records.shrink_to_fit();
                self.alloc = Allocation::NoPending;
                dropped
            }
        }
    }

    /// Number of committed transitions
    #[inline]
    pub fn len(&self) -> usize {
        match self.alloc {
            Allocation::NoPending => self.records.len(),
            Allocation::Pending { cursor } => cursor,
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Reserved slots not yet filled
    #[inline]
    pub fn reserved(&self) -> usize {
        self.records.len() - self.len()
    }

    #[inline]
    pub fn allocation(&self) -> Allocation {
        self.alloc
    }

    /// Committed transitions in insertion order
    #[inline]
    pub fn as_slice(&self) -> &[Transition] {
        &self.records[..self.len()]
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Transition> {
        self.as_slice().iter()
    }

    /// The `i`th committed transition. Panics if `i >= len()`.
    #[inline]
    pub fn get(&self, i: usize) -> Transition {
        self.as_slice()[i]
    }

    /// Linear scan for an exact `(fp, tidx)` match among committed records.
    pub fn contains(&self, fp: Fingerprint, tidx: i32) -> bool {
        self.iter().any(|t| t.fp == fp && t.tidx == tidx)
    }
}

impl PartialEq for TransitionStore {
    fn eq(&self, other: &Self) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl Eq for TransitionStore {}

impl<'a> IntoIterator for &'a TransitionStore {
    type Item = &'a Transition;
    type IntoIter = std::slice::Iter<'a, Transition>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
