//! Lookup of tableau automaton nodes by index
//!
//! The tableau itself is built by the temporal-logic front end. Behavior graph
//! nodes only hold an `i32` index into it, with [`NO_TABLEAU`](super::NO_TABLEAU)
//! meaning plain safety checking.

/// A tableau automaton whose nodes can be fetched by index
pub trait TableauGraph {
    type Node;

    fn node(&self, idx: usize) -> Option<&Self::Node>;
}

impl<T> TableauGraph for [T] {
    type Node = T;

    fn node(&self, idx: usize) -> Option<&T> {
        self.get(idx)
    }
}

impl<T> TableauGraph for Vec<T> {
    type Node = T;

    fn node(&self, idx: usize) -> Option<&T> {
        self.get(idx)
    }
}
