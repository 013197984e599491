//! LIFO stack of node handles
//!
//! Used to walk a playlist backwards: push every node head-to-tail, then pop.
//! The stack borrows nothing from the store, so it must be rebuilt after any
//! structural change.

use crate::playlist::store::{NodeId, Playlist};

#[derive(Debug, Default)]
pub struct TraversalStack {
    items: Vec<NodeId>,
}

impl TraversalStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stack holding every node of `playlist`, tail on top
    pub fn from_playlist(playlist: &Playlist) -> Self {
        let mut stack = Self::with_capacity(playlist.len());
        for id in playlist.node_ids() {
            stack.push(id);
        }
        stack
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            items: Vec::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, id: NodeId) {
        self.items.push(id);
    }

    /// Pop the most recently pushed handle; `None` when empty
    pub fn pop(&mut self) -> Option<NodeId> {
        self.items.pop()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::playlist::Track;

    #[test]
    fn test_pops_in_reverse_order() {
        let mut list = Playlist::new();
        for name in ["a", "b", "c"] {
            list.insert_back(Track::new(name, "x"));
        }

        let mut stack = TraversalStack::from_playlist(&list);
        assert_eq!(stack.len(), 3);

        let mut popped = Vec::new();
        while let Some(id) = stack.pop() {
            popped.push(list.track(id).source.clone());
        }
        assert_eq!(popped, vec!["c", "b", "a"]);
        assert!(stack.is_empty());
    }

    #[test]
    fn test_pop_empty_is_none() {
        let mut stack = TraversalStack::new();
        assert_eq!(stack.pop(), None);
        let list = Playlist::new();
        assert!(TraversalStack::from_playlist(&list).is_empty());
    }
}
