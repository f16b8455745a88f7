//! In-order iteration over an [`OrderedMap`](super::OrderedMap).

use smallvec::SmallVec;

use super::node::{NodeArena, NodeId};

/// Inline capacity of traversal stacks.
///
/// An AVL tree holding `n` entries is at most `1.44 * log2(n + 2)` levels
/// deep, so 48 slots hold the path of any map with up to about 2^32
/// entries. Deeper traversals spill to the heap.
pub(crate) const STACK_CAPACITY: usize = 48;

pub(crate) type TraversalStack = SmallVec<[NodeId; STACK_CAPACITY]>;

/// An iterator over the entries of an [`OrderedMap`](super::OrderedMap), in
/// ascending key order.
pub struct OrderedMapIterator<'a, K, V> {
    arena: &'a NodeArena<K, V>,
    stack: TraversalStack,
    remaining: usize,
}

impl<'a, K, V> OrderedMapIterator<'a, K, V> {
    pub(crate) fn new(arena: &'a NodeArena<K, V>, root: Option<NodeId>, length: usize) -> Self {
        let mut iterator = Self {
            arena,
            stack: SmallVec::new(),
            remaining: length,
        };
        iterator.push_left_spine(root);
        iterator
    }

    fn push_left_spine(&mut self, mut current: Option<NodeId>) {
        while let Some(id) = current {
            self.stack.push(id);
            current = self.arena.node(id).left;
        }
    }
}

impl<'a, K, V> Iterator for OrderedMapIterator<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.stack.pop()?;
        let arena = self.arena;
        let node = arena.node(id);
        self.push_left_spine(node.right);
        self.remaining -= 1;
        Some((&node.key, &node.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for OrderedMapIterator<'_, K, V> {
    fn len(&self) -> usize {
        self.remaining
    }
}

impl<K, V> std::iter::FusedIterator for OrderedMapIterator<'_, K, V> {}
