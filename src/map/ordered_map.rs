//! Mutable ordered map based on an AVL tree.
//!
//! # Internal Structure
//!
//! The tree maintains the following invariants after every public call:
//! 1. In-order keys are strictly ascending
//! 2. Every node caches `height = 1 + max(height(left), height(right))`,
//!    with an absent child counted as `-1`
//! 3. Every node's balance factor, `height(left) - height(right)`, is in
//!    `-1..=1`
//!
//! Nodes are kept in an arena and linked through handles, so parent links
//! do not create ownership cycles. An absent child is simply `None`; there
//! is no shared sentinel node.

use std::borrow::Borrow;
use std::cmp::Ordering;
use std::fmt;
use std::iter::FromIterator;

use super::error::InvariantViolation;
use super::iter::{OrderedMapIterator, TraversalStack};
use super::node::{Node, NodeArena, NodeId};

/// A mutable ordered map backed by a self-balancing AVL tree.
///
/// Keys must implement `Ord`. Entries are kept in ascending key order and
/// the tree height stays logarithmic in the number of entries.
///
/// References returned by [`get`](Self::get), [`get_mut`](Self::get_mut)
/// and the range queries borrow the map, so the borrow checker rejects any
/// attempt to hold one across a mutating call. Rebalancing and removal may
/// relocate entries between nodes; that can never be observed through a
/// live reference.
///
/// # Time Complexity
///
/// | Operation       | Complexity         |
/// |-----------------|--------------------|
/// | `get`           | O(log N)           |
/// | `contains`      | O(log N)           |
/// | `upsert`        | O(log N)           |
/// | `update`        | O(log N)           |
/// | `remove`        | O(log N)           |
/// | `get_range`     | O(log N + k)       |
/// | `get_range_mut` | O(log N + k log k) |
/// | `min`/`max`     | O(log N)           |
/// | `len`           | O(1)               |
/// | `clear`         | O(N)               |
///
/// # Examples
///
/// ```rust
/// use sparse_raster::map::OrderedMap;
///
/// let mut map = OrderedMap::new();
/// map.upsert(3, "three");
/// map.upsert(1, "one");
/// map.upsert(2, "two");
///
/// let keys: Vec<&i32> = map.keys().collect();
/// assert_eq!(keys, vec![&1, &2, &3]);
///
/// if let Some(value) = map.get_mut(&2) {
///     *value = "TWO";
/// }
/// assert_eq!(map.get(&2), Some(&"TWO"));
/// ```
pub struct OrderedMap<K, V> {
    arena: NodeArena<K, V>,
    root: Option<NodeId>,
    length: usize,
}

impl<K, V> OrderedMap<K, V> {
    /// Creates a new empty map.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use sparse_raster::map::OrderedMap;
    ///
    /// let map: OrderedMap<i32, String> = OrderedMap::new();
    /// assert!(map.is_empty());
    /// ```
    #[must_use]
    pub const fn new() -> Self {
        Self {
            arena: NodeArena::new(),
            root: None,
            length: 0,
        }
    }

    /// Returns the number of entries in the map.
    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.length
    }

    /// Returns `true` if the map contains no entries.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// Returns the height of the tree, `-1` for an empty map and `0` for a
    /// single entry.
    #[must_use]
    pub fn height(&self) -> i32 {
        self.arena.height(self.root)
    }

    /// Removes every entry. Safe to call on an empty map.
    pub fn clear(&mut self) {
        self.arena.clear();
        self.root = None;
        self.length = 0;
    }

    /// Returns an iterator over the entries in ascending key order.
    #[must_use]
    pub fn iter(&self) -> OrderedMapIterator<'_, K, V> {
        OrderedMapIterator::new(&self.arena, self.root, self.length)
    }

    /// Returns an iterator over the keys in ascending order.
    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.iter().map(|(key, _)| key)
    }

    /// Returns an iterator over the values in ascending key order.
    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.iter().map(|(_, value)| value)
    }

    /// Returns the entry with the smallest key.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use sparse_raster::map::OrderedMap;
    ///
    /// let map: OrderedMap<i32, char> = [(5, 'e'), (2, 'b'), (9, 'i')].into_iter().collect();
    /// assert_eq!(map.min(), Some((&2, &'b')));
    /// assert_eq!(map.max(), Some((&9, &'i')));
    /// ```
    #[must_use]
    pub fn min(&self) -> Option<(&K, &V)> {
        let node = self.arena.node(self.leftmost(self.root?));
        Some((&node.key, &node.value))
    }

    /// Returns the entry with the largest key.
    #[must_use]
    pub fn max(&self) -> Option<(&K, &V)> {
        let mut current = self.root?;
        while let Some(right) = self.arena.node(current).right {
            current = right;
        }
        let node = self.arena.node(current);
        Some((&node.key, &node.value))
    }

    /// Renders the tree shape in pre-order, one node per line, as
    /// `(key) -> (left), (right)` with `nil` for an absent child.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use sparse_raster::map::OrderedMap;
    ///
    /// let map: OrderedMap<i32, ()> = [(1, ()), (2, ()), (3, ())].into_iter().collect();
    /// let rendered = map.render_structure(|key| format!("k={key}"));
    /// assert_eq!(
    ///     rendered,
    ///     "(k=2) -> (k=1), (k=3)\n(k=1) -> nil, nil\n(k=3) -> nil, nil\n"
    /// );
    /// ```
    pub fn render_structure<F>(&self, mut render_key: F) -> String
    where
        F: FnMut(&K) -> String,
    {
        let mut output = String::new();
        let mut stack = TraversalStack::new();
        stack.extend(self.root);

        while let Some(id) = stack.pop() {
            let node = self.arena.node(id);
            let mut describe = |child: Option<NodeId>| {
                child.map_or_else(
                    || "nil".to_string(),
                    |child| format!("({})", render_key(&self.arena.node(child).key)),
                )
            };
            let left = describe(node.left);
            let right = describe(node.right);
            output.push_str(&format!("({}) -> {left}, {right}\n", render_key(&node.key)));

            stack.extend(node.right);
            stack.extend(node.left);
        }

        output
    }

    fn leftmost(&self, mut current: NodeId) -> NodeId {
        while let Some(left) = self.arena.node(current).left {
            current = left;
        }
        current
    }

    /// Points `parent`'s link to `old` (or the root, when `parent` is
    /// `None`) at `new`, and fixes `new`'s parent handle.
    fn replace_child(&mut self, parent: Option<NodeId>, old: NodeId, new: Option<NodeId>) {
        match parent {
            None => self.root = new,
            Some(parent) => {
                let parent_node = self.arena.node_mut(parent);
                if parent_node.left == Some(old) {
                    parent_node.left = new;
                } else {
                    parent_node.right = new;
                }
            }
        }
        if let Some(new) = new {
            self.arena.node_mut(new).parent = parent;
        }
    }

    /// Single left rotation around `pivot`. Recomputes the heights of the
    /// two nodes involved only.
    fn rotate_left(&mut self, pivot: NodeId) {
        let Some(heir) = self.arena.node(pivot).right else {
            return;
        };
        let inner = self.arena.node(heir).left;
        let parent = self.arena.node(pivot).parent;

        self.arena.node_mut(pivot).right = inner;
        if let Some(inner) = inner {
            self.arena.node_mut(inner).parent = Some(pivot);
        }
        self.replace_child(parent, pivot, Some(heir));
        self.arena.node_mut(heir).left = Some(pivot);
        self.arena.node_mut(pivot).parent = Some(heir);

        self.arena.refresh_height(pivot);
        self.arena.refresh_height(heir);
    }

    /// Single right rotation around `pivot`. Mirror of [`Self::rotate_left`].
    fn rotate_right(&mut self, pivot: NodeId) {
        let Some(heir) = self.arena.node(pivot).left else {
            return;
        };
        let inner = self.arena.node(heir).right;
        let parent = self.arena.node(pivot).parent;

        self.arena.node_mut(pivot).left = inner;
        if let Some(inner) = inner {
            self.arena.node_mut(inner).parent = Some(pivot);
        }
        self.replace_child(parent, pivot, Some(heir));
        self.arena.node_mut(heir).right = Some(pivot);
        self.arena.node_mut(pivot).parent = Some(heir);

        self.arena.refresh_height(pivot);
        self.arena.refresh_height(heir);
    }

    /// Walks from `start` to the root, refreshing heights and rotating
    /// wherever a balance factor leaves `-1..=1`.
    fn rebalance_from(&mut self, start: Option<NodeId>) {
        let mut current = start;
        while let Some(id) = current {
            let balance_factor = self.arena.refresh_height(id);
            if balance_factor > 1 {
                if let Some(left) = self.arena.node(id).left
                    && self.arena.balance_factor(left) < 0
                {
                    self.rotate_left(left);
                }
                self.rotate_right(id);
            } else if balance_factor < -1 {
                if let Some(right) = self.arena.node(id).right
                    && self.arena.balance_factor(right) > 0
                {
                    self.rotate_right(right);
                }
                self.rotate_left(id);
            }
            current = self.arena.node(id).parent;
        }
    }
}

impl<K: Ord, V> OrderedMap<K, V> {
    fn find<Q>(&self, key: &Q) -> Option<NodeId>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let mut current = self.root;
        while let Some(id) = current {
            let node = self.arena.node(id);
            match key.cmp(node.key.borrow()) {
                Ordering::Equal => return Some(id),
                Ordering::Less => current = node.left,
                Ordering::Greater => current = node.right,
            }
        }
        None
    }

    /// Returns `true` if the map contains `key`.
    #[must_use]
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.find(key).is_some()
    }

    /// Returns a reference to the value stored at `key`.
    #[must_use]
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.find(key).map(|id| &self.arena.node(id).value)
    }

    /// Returns a mutable reference into the storage of the value at `key`.
    ///
    /// The reference is live: writes through it are visible to later reads.
    /// It holds an exclusive borrow of the map, so it cannot outlive the
    /// next mutating call.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use sparse_raster::map::OrderedMap;
    ///
    /// let mut map = OrderedMap::new();
    /// map.upsert(1, 10);
    /// if let Some(value) = map.get_mut(&1) {
    ///     *value += 5;
    /// }
    /// assert_eq!(map.get(&1), Some(&15));
    /// ```
    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let id = self.find(key)?;
        Some(&mut self.arena.node_mut(id).value)
    }

    /// Handles of every node with `lower <= key <= upper`, in ascending key
    /// order.
    ///
    /// The in-order walk skips left subtrees whose keys are all below
    /// `lower` and stops at the first key above `upper`.
    fn range_ids<Q>(&self, lower: &Q, upper: &Q) -> Vec<NodeId>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let mut ids = Vec::new();
        if lower > upper {
            return ids;
        }

        let mut stack = TraversalStack::new();
        let mut current = self.root;
        loop {
            while let Some(id) = current {
                let node = self.arena.node(id);
                let key: &Q = node.key.borrow();
                if key >= lower {
                    stack.push(id);
                    current = node.left;
                } else {
                    current = node.right;
                }
            }

            let Some(id) = stack.pop() else {
                break;
            };
            let node = self.arena.node(id);
            let key: &Q = node.key.borrow();
            if key > upper {
                break;
            }
            ids.push(id);
            current = node.right;
        }

        ids
    }

    /// Returns every entry with `lower <= key <= upper`, in ascending key
    /// order. An inverted range (`lower > upper`) yields no entries.
    ///
    /// # Complexity
    ///
    /// O(log N + k) where k is the number of entries returned
    ///
    /// # Examples
    ///
    /// ```rust
    /// use sparse_raster::map::OrderedMap;
    ///
    /// let map: OrderedMap<i32, char> = (1..=5).zip('a'..='e').collect();
    /// let keys: Vec<i32> = map.get_range(&2, &4).into_iter().map(|(key, _)| *key).collect();
    /// assert_eq!(keys, vec![2, 3, 4]);
    /// assert!(map.get_range(&4, &2).is_empty());
    /// ```
    pub fn get_range<Q>(&self, lower: &Q, upper: &Q) -> Vec<(&K, &V)>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.range_ids(lower, upper)
            .into_iter()
            .map(|id| {
                let node = self.arena.node(id);
                (&node.key, &node.value)
            })
            .collect()
    }

    /// Like [`get_range`](Self::get_range), but yields mutable references
    /// into the value storage.
    ///
    /// # Complexity
    ///
    /// O(log N + k log k) where k is the number of entries returned
    pub fn get_range_mut<Q>(&mut self, lower: &Q, upper: &Q) -> Vec<(&K, &mut V)>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let ids = self.range_ids(lower, upper);
        self.arena
            .nodes_mut(&ids)
            .into_iter()
            .map(split_entry)
            .collect()
    }

    /// Overwrites the value at `key` and returns the previous value. Does
    /// nothing, and returns `None`, when `key` is absent.
    pub fn update<Q>(&mut self, key: &Q, value: V) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let id = self.find(key)?;
        Some(std::mem::replace(&mut self.arena.node_mut(id).value, value))
    }

    /// Inserts `key` with `value`, or overwrites the value when `key` is
    /// already present. Returns the previous value, if any.
    ///
    /// A new entry increases [`len`](Self::len) by one and the tree is
    /// rebalanced from the new leaf's parent up to the root.
    pub fn upsert(&mut self, key: K, value: V) -> Option<V> {
        let mut parent = None;
        let mut attach_left = false;
        let mut current = self.root;

        while let Some(id) = current {
            let node = self.arena.node_mut(id);
            match key.cmp(&node.key) {
                Ordering::Equal => return Some(std::mem::replace(&mut node.value, value)),
                Ordering::Less => {
                    attach_left = true;
                    current = node.left;
                }
                Ordering::Greater => {
                    attach_left = false;
                    current = node.right;
                }
            }
            parent = Some(id);
        }

        let id = self.arena.allocate(key, value, parent);
        match parent {
            None => self.root = Some(id),
            Some(parent) if attach_left => self.arena.node_mut(parent).left = Some(id),
            Some(parent) => self.arena.node_mut(parent).right = Some(id),
        }
        self.length += 1;
        self.rebalance_from(parent);
        None
    }

    /// Removes `key` and returns its value. Does nothing, and returns
    /// `None`, when `key` is absent.
    ///
    /// A node with two children takes over the entry of its in-order
    /// successor, and the successor's node is unlinked instead.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use sparse_raster::map::OrderedMap;
    ///
    /// let mut map: OrderedMap<i32, &str> = [(1, "one"), (2, "two")].into_iter().collect();
    /// assert_eq!(map.remove(&1), Some("one"));
    /// assert_eq!(map.remove(&1), None);
    /// assert_eq!(map.len(), 1);
    /// ```
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let mut target = self.find(key)?;
        let (parent, left, right) = {
            let node = self.arena.node(target);
            (node.parent, node.left, node.right)
        };

        let (unlinked, rebalance_start) = match (left, right) {
            (None, child) | (child, None) => {
                self.replace_child(parent, target, child);
                (target, parent)
            }
            (Some(_), Some(right)) => {
                let successor = self.leftmost(right);
                let (successor_parent, successor_right) = {
                    let node = self.arena.node(successor);
                    (node.parent, node.right)
                };
                self.replace_child(successor_parent, successor, successor_right);
                (successor, successor_parent)
            }
        };

        self.rebalance_from(rebalance_start);
        let released = self.arena.release(unlinked, &mut self.root);
        self.length -= 1;

        if unlinked == target {
            return Some(released.value);
        }
        // The target was the last arena slot and moved into the freed one.
        if target.index() == self.arena.len() {
            target = unlinked;
        }
        let node = self.arena.node_mut(target);
        node.key = released.key;
        Some(std::mem::replace(&mut node.value, released.value))
    }

    /// Verifies ordering, balance, cached heights, parent links and length.
    ///
    /// # Errors
    ///
    /// Returns the first [`InvariantViolation`] found.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use sparse_raster::map::OrderedMap;
    ///
    /// let map: OrderedMap<i32, i32> = (0..100).map(|key| (key, key)).collect();
    /// assert!(map.check_invariants().is_ok());
    /// assert!(map.height() <= 9);
    /// ```
    pub fn check_invariants(&self) -> Result<(), InvariantViolation> {
        let mut walk = InvariantWalk {
            previous: None,
            visited: 0,
        };
        if let Some(root) = self.root {
            self.check_subtree(root, None, &mut walk)?;
        }
        if walk.visited != self.length || self.arena.len() != self.length {
            return Err(InvariantViolation::LengthMismatch {
                expected: self.length,
                actual: walk.visited,
            });
        }
        Ok(())
    }

    /// Returns the actual height of the subtree at `id`.
    fn check_subtree<'a>(
        &'a self,
        id: NodeId,
        expected_parent: Option<NodeId>,
        walk: &mut InvariantWalk<'a, K>,
    ) -> Result<i32, InvariantViolation> {
        let node = self.arena.node(id);
        let left_height = match node.left {
            Some(left) => self.check_subtree(left, Some(id), walk)?,
            None => -1,
        };

        let position = walk.visited;
        walk.visited += 1;
        if node.parent != expected_parent {
            return Err(InvariantViolation::BrokenParentLink { position });
        }
        if walk.previous.is_some_and(|previous| previous >= &node.key) {
            return Err(InvariantViolation::OutOfOrder { position });
        }
        walk.previous = Some(&node.key);

        let right_height = match node.right {
            Some(right) => self.check_subtree(right, Some(id), walk)?,
            None => -1,
        };

        let actual = 1 + left_height.max(right_height);
        if node.height != actual {
            return Err(InvariantViolation::StaleHeight {
                position,
                cached: node.height,
                actual,
            });
        }
        let balance_factor = left_height - right_height;
        if !(-1..=1).contains(&balance_factor) {
            return Err(InvariantViolation::Unbalanced {
                position,
                balance_factor,
            });
        }
        Ok(actual)
    }
}

struct InvariantWalk<'a, K> {
    previous: Option<&'a K>,
    visited: usize,
}

fn split_entry<K, V>(node: &mut Node<K, V>) -> (&K, &mut V) {
    (&node.key, &mut node.value)
}

// =============================================================================
// Trait Implementations
// =============================================================================

impl<K, V> Default for OrderedMap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

/// Deep copy by pre-order re-insertion.
///
/// The copy owns its own nodes and is balanced independently, so its shape
/// may differ from the source while holding identical entries.
impl<K: Ord + Clone, V: Clone> Clone for OrderedMap<K, V> {
    fn clone(&self) -> Self {
        let mut copy = Self::new();
        let mut stack = TraversalStack::new();
        stack.extend(self.root);
        while let Some(id) = stack.pop() {
            let node = self.arena.node(id);
            copy.upsert(node.key.clone(), node.value.clone());
            stack.extend(node.right);
            stack.extend(node.left);
        }
        copy
    }
}

impl<K: Ord, V> FromIterator<(K, V)> for OrderedMap<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        map.extend(iter);
        map
    }
}

impl<K: Ord, V> Extend<(K, V)> for OrderedMap<K, V> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.upsert(key, value);
        }
    }
}

impl<'a, K, V> IntoIterator for &'a OrderedMap<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = OrderedMapIterator<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K: PartialEq, V: PartialEq> PartialEq for OrderedMap<K, V> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<K: Eq, V: Eq> Eq for OrderedMap<K, V> {}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for OrderedMap<K, V> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_map().entries(self.iter()).finish()
    }
}

impl<K: fmt::Display, V: fmt::Display> fmt::Display for OrderedMap<K, V> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{{")?;
        let mut first = true;
        for (key, value) in self {
            if first {
                first = false;
            } else {
                write!(formatter, ", ")?;
            }
            write!(formatter, "{key}: {value}")?;
        }
        write!(formatter, "}}")
    }
}

static_assertions::assert_impl_all!(OrderedMap<i32, i32>: Send, Sync);
static_assertions::assert_impl_all!(OrderedMap<String, Vec<u8>>: Send, Sync, Clone);
