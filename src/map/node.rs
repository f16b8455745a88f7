//! Arena storage for AVL tree nodes.
//!
//! Nodes live in a dense `Vec` and refer to each other through [`NodeId`]
//! handles instead of pointers. Parent, left and right links are plain
//! handle fields, so re-linking during a rotation is O(1) and the tree has
//! no ownership cycles.

/// Handle to a node slot in a [`NodeArena`].
///
/// Handles are only meaningful for the arena that produced them, and only
/// until the next node is released (a release may move the last node into
/// the freed slot).
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, PartialOrd, Ord)]
pub(crate) struct NodeId(usize);

impl NodeId {
    pub(crate) const fn index(self) -> usize {
        self.0
    }
}

/// A single AVL tree node.
#[derive(Debug)]
pub(crate) struct Node<K, V> {
    pub(crate) key: K,
    pub(crate) value: V,
    pub(crate) parent: Option<NodeId>,
    pub(crate) left: Option<NodeId>,
    pub(crate) right: Option<NodeId>,
    /// Cached height of the subtree rooted here. A leaf has height 0.
    pub(crate) height: i32,
}

impl<K, V> Node<K, V> {
    /// Creates a detached leaf.
    const fn leaf(key: K, value: V, parent: Option<NodeId>) -> Self {
        Self {
            key,
            value,
            parent,
            left: None,
            right: None,
            height: 0,
        }
    }
}

/// Dense node storage.
#[derive(Debug)]
pub(crate) struct NodeArena<K, V> {
    nodes: Vec<Node<K, V>>,
}

impl<K, V> NodeArena<K, V> {
    pub(crate) const fn new() -> Self {
        Self { nodes: Vec::new() }
    }

    pub(crate) fn len(&self) -> usize {
        self.nodes.len()
    }

    pub(crate) fn clear(&mut self) {
        self.nodes.clear();
    }

    /// Allocates a leaf and returns its handle.
    pub(crate) fn allocate(&mut self, key: K, value: V, parent: Option<NodeId>) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node::leaf(key, value, parent));
        id
    }

    pub(crate) fn node(&self, id: NodeId) -> &Node<K, V> {
        &self.nodes[id.0]
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut Node<K, V> {
        &mut self.nodes[id.0]
    }

    /// Height of an optional subtree, `-1` when absent.
    pub(crate) fn height(&self, id: Option<NodeId>) -> i32 {
        id.map_or(-1, |id| self.nodes[id.0].height)
    }

    /// Recomputes the cached height of `id` from its children and returns
    /// the resulting balance factor.
    pub(crate) fn refresh_height(&mut self, id: NodeId) -> i32 {
        let (left, right) = {
            let node = &self.nodes[id.0];
            (node.left, node.right)
        };
        let left_height = self.height(left);
        let right_height = self.height(right);
        self.nodes[id.0].height = 1 + left_height.max(right_height);
        left_height - right_height
    }

    /// Balance factor computed from the cached child heights.
    pub(crate) fn balance_factor(&self, id: NodeId) -> i32 {
        let node = &self.nodes[id.0];
        self.height(node.left) - self.height(node.right)
    }

    /// Removes a node that is already unlinked from the tree and returns it.
    ///
    /// The last node of the arena is moved into the freed slot and every
    /// link that pointed at it is rewritten. `root` is updated when the
    /// moved node is the root.
    pub(crate) fn release(&mut self, id: NodeId, root: &mut Option<NodeId>) -> Node<K, V> {
        let last = NodeId(self.nodes.len() - 1);
        let released = self.nodes.swap_remove(id.0);
        if id != last {
            self.relocate(last, id, root);
        }
        released
    }

    /// Rewrites the links around a node that moved from `from` to `to`.
    fn relocate(&mut self, from: NodeId, to: NodeId, root: &mut Option<NodeId>) {
        let (parent, left, right) = {
            let node = &self.nodes[to.0];
            (node.parent, node.left, node.right)
        };
        match parent {
            None => *root = Some(to),
            Some(parent) => {
                let parent = &mut self.nodes[parent.0];
                if parent.left == Some(from) {
                    parent.left = Some(to);
                } else {
                    parent.right = Some(to);
                }
            }
        }
        for child in [left, right].into_iter().flatten() {
            self.nodes[child.0].parent = Some(to);
        }
    }

    /// Mutable access to several distinct nodes at once.
    ///
    /// `ids` must not contain duplicates. The returned references are in the
    /// same order as `ids`. Each node is split off the remaining slice, so
    /// the cost depends on `ids.len()` only.
    pub(crate) fn nodes_mut(&mut self, ids: &[NodeId]) -> Vec<&mut Node<K, V>> {
        let mut wanted: Vec<(usize, usize)> = ids
            .iter()
            .enumerate()
            .map(|(position, id)| (id.0, position))
            .collect();
        wanted.sort_unstable();

        let mut picked: Vec<(usize, &mut Node<K, V>)> = Vec::with_capacity(ids.len());
        let mut rest: &mut [Node<K, V>] = &mut self.nodes;
        let mut offset = 0;
        for (index, position) in wanted {
            let (_, tail) = std::mem::take(&mut rest).split_at_mut(index - offset);
            let Some((node, remaining)) = tail.split_first_mut() else {
                break;
            };
            picked.push((position, node));
            rest = remaining;
            offset = index + 1;
        }

        picked.sort_unstable_by_key(|(position, _)| *position);
        picked.into_iter().map(|(_, node)| node).collect()
    }
}
