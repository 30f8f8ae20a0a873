//! Ordered multiset of node handles, used for the parent and child relations of a node
use indexmap::IndexSet;

use crate::metabolic_model::node::NodeId;

/// Insertion ordered multiset of [`NodeId`]s
///
/// Occurrences are kept in the order they were inserted, so an id inserted several times is
/// yielded once per insertion at each of its positions.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NodeMultiset {
    items: Vec<NodeId>,
}

impl NodeMultiset {
    pub fn new() -> Self {
        NodeMultiset { items: Vec::new() }
    }

    /// Append one occurrence of `id`
    pub fn insert(&mut self, id: NodeId) {
        self.items.push(id);
    }

    /// Remove the first occurrence of `id`, returning false if it wasn't present
    pub fn remove_one(&mut self, id: NodeId) -> bool {
        match self.items.iter().position(|item| *item == id) {
            Some(index) => {
                self.items.remove(index);
                true
            }
            None => false,
        }
    }

    /// Remove every occurrence of `id`, returning how many were removed
    pub fn remove_all(&mut self, id: NodeId) -> usize {
        let before = self.items.len();
        self.items.retain(|item| *item != id);
        before - self.items.len()
    }

    /// Number of occurrences of `id`
    pub fn count(&self, id: NodeId) -> usize {
        self.items.iter().filter(|item| **item == id).count()
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.items.contains(&id)
    }

    /// Total number of occurrences
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Iterate over all occurrences in insertion order
    pub fn iter(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.items.iter().copied()
    }

    /// Iterate over the distinct ids, in order of first occurrence
    pub fn distinct(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.items
            .iter()
            .copied()
            .collect::<IndexSet<NodeId>>()
            .into_iter()
    }

    /// Copy of all occurrences, for iterating while the multiset is modified
    pub fn snapshot(&self) -> Vec<NodeId> {
        self.items.clone()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn multiplicity() {
        let mut set = NodeMultiset::new();
        set.insert(NodeId(1));
        set.insert(NodeId(2));
        set.insert(NodeId(1));
        assert_eq!(set.len(), 3);
        assert_eq!(set.count(NodeId(1)), 2);
        assert_eq!(set.snapshot(), vec![NodeId(1), NodeId(2), NodeId(1)]);

        assert!(set.remove_one(NodeId(1)));
        assert_eq!(set.count(NodeId(1)), 1);
        assert_eq!(set.snapshot(), vec![NodeId(2), NodeId(1)]);
        assert!(set.remove_one(NodeId(1)));
        assert!(!set.contains(NodeId(1)));
        assert!(!set.remove_one(NodeId(1)));
    }

    #[test]
    fn remove_all_is_silent_when_absent() {
        let mut set = NodeMultiset::new();
        assert_eq!(set.remove_all(NodeId(3)), 0);
        set.insert(NodeId(3));
        set.insert(NodeId(3));
        assert_eq!(set.remove_all(NodeId(3)), 2);
        assert!(set.is_empty());
    }

    #[test]
    fn removal_keeps_order() {
        let mut set = NodeMultiset::new();
        set.insert(NodeId(1));
        set.insert(NodeId(2));
        set.insert(NodeId(3));
        set.remove_all(NodeId(2));
        assert_eq!(set.distinct().collect::<Vec<_>>(), vec![NodeId(1), NodeId(3)]);
    }

    #[test]
    fn repeated_ids_keep_their_positions() {
        let mut set = NodeMultiset::new();
        set.insert(NodeId(4));
        set.insert(NodeId(5));
        set.insert(NodeId(4));
        assert_eq!(set.iter().collect::<Vec<_>>(), vec![NodeId(4), NodeId(5), NodeId(4)]);
        assert_eq!(set.distinct().collect::<Vec<_>>(), vec![NodeId(4), NodeId(5)]);
    }
}
