//! An unbalanced BST whose nodes keep a pointer back to their parent. Nodes are heap allocated and
//! linked with raw pointers, similar to the standard library's `BTreeMap` except keeping one key
//! and two children per node.
//!
//! # Examples
//!
//! ```
//! use bstree::{Tree, TreeError};
//!
//! let mut tree = Tree::new();
//!
//! // Nothing in here yet.
//! assert!(tree.is_empty());
//! assert!(tree.search(1).is_none());
//! assert_eq!(tree.min(), None);
//!
//! tree.insert(1).unwrap();
//! assert_eq!(tree.search(1).map(|n| n.key()), Some(1));
//!
//! // Keys are unique.
//! assert_eq!(tree.insert(1), Err(TreeError::DuplicateKey(1)));
//!
//! // Deleting a key that isn't there is fine.
//! tree.delete(2);
//! tree.delete(1);
//! assert!(tree.is_empty());
//! ```

use std::cmp::Ordering;
use std::fmt;
use std::ptr::NonNull;

use crate::error::{Result, TreeError};
use crate::iter::Iter;
use crate::tracing_helpers::{debug_log, trace_log};

/// A Binary Search Tree of unique `i64` keys. This can be used for inserting, searching, and
/// deleting keys, and for walking them in order. It does not balance itself.
pub struct Tree {
    root: Link,
    len: usize,
}

// SAFETY: A `Tree` exclusively owns every `Node` reachable from its root, the same way a
// `Box<Node>` would, and nothing is shared with other trees. All mutation requires `&mut Tree` and
// there is no interior mutability, so handing a `Tree` or a `&Tree` to another thread is sound.
unsafe impl Send for Tree {}
unsafe impl Sync for Tree {}

impl Default for Tree {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Tree {
    fn drop(&mut self) {
        self.clear();
    }
}

impl Clone for Tree {
    /// Deep copies the tree, node for node, so the copy has exactly the same shape.
    fn clone(&self) -> Self {
        let mut cloned = Self::new();
        let Some(root) = self.root.0 else {
            return cloned;
        };

        // SAFETY: `root` is owned by `self` which we're only reading from.
        let new_root = Node::new_leaked(unsafe { root.as_ref() }.data, Link(None));
        cloned.root = Link(Some(new_root));
        cloned.len = self.len;

        // Pairs of (node in `self`, its copy in `cloned`) whose children still need copying.
        let mut stack = vec![(root, new_root)];
        while let Some((original, copy)) = stack.pop() {
            // SAFETY: `original` is owned by `self` and only read. `copy` was just allocated by
            // `Node::new_leaked` and nothing else references it mutably.
            let (original, copy_node) = unsafe { (original.as_ref(), &mut *copy.as_ptr()) };

            if let Some(left) = original.left.0 {
                // SAFETY: see above.
                let new_left = Node::new_leaked(unsafe { left.as_ref() }.data, Link(Some(copy)));
                copy_node.left = Link(Some(new_left));
                stack.push((left, new_left));
            }
            if let Some(right) = original.right.0 {
                // SAFETY: see above.
                let new_right = Node::new_leaked(unsafe { right.as_ref() }.data, Link(Some(copy)));
                copy_node.right = Link(Some(new_right));
                stack.push((right, new_right));
            }
        }

        cloned
    }
}

impl fmt::Debug for Tree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<'a> IntoIterator for &'a Tree {
    type Item = i64;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl Tree {
    /// Generate a new, empty `Tree`.
    pub fn new() -> Self {
        Self {
            root: Link(None),
            len: 0,
        }
    }

    /// Returns `true` if the tree holds no keys.
    pub fn is_empty(&self) -> bool {
        self.root.0.is_none()
    }

    /// The number of keys in the tree.
    pub fn len(&self) -> usize {
        self.len
    }

    /// The root node, if the tree isn't empty.
    pub fn root(&self) -> Option<NodeRef<'_>> {
        self.root.node().map(NodeRef::new)
    }

    /// Inserts `key` into the tree. The new node is always attached as a leaf; nothing is moved
    /// to make room for it.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::DuplicateKey`] if `key` is already in the tree, in which case the
    /// tree is left untouched.
    ///
    /// # Examples
    ///
    /// ```
    /// use bstree::{Tree, TreeError};
    ///
    /// let mut tree = Tree::new();
    ///
    /// assert_eq!(tree.insert(1), Ok(()));
    /// assert_eq!(tree.insert(1), Err(TreeError::DuplicateKey(1)));
    /// assert_eq!(tree.len(), 1);
    /// ```
    pub fn insert(&mut self, key: i64) -> Result<()> {
        let Some(mut current) = self.root.0 else {
            self.root = Link(Some(Node::new_leaked(key, Link(None))));
            self.len = 1;
            trace_log!(key, "inserted root");
            return Ok(());
        };

        loop {
            // SAFETY: `current` is a node owned by this tree and we hold `&mut self` so no other
            // reference into the tree exists.
            let node = unsafe { &mut *current.as_ptr() };
            let child = match key.cmp(&node.data) {
                Ordering::Less => &mut node.left,
                Ordering::Equal => {
                    debug_log!(key, "rejected duplicate key");
                    return Err(TreeError::DuplicateKey(key));
                }
                Ordering::Greater => &mut node.right,
            };

            match child.0 {
                Some(next) => current = next,
                None => {
                    *child = Link(Some(Node::new_leaked(key, Link(Some(current)))));
                    break;
                }
            }
        }

        self.len += 1;
        trace_log!(key, len = self.len, "inserted");
        Ok(())
    }

    /// Deletes `key` from the tree. If the tree does not contain `key`, nothing happens.
    ///
    /// A node with two children is not unlinked. Instead it takes over the key of its in-order
    /// successor and the successor's node is unlinked in its place. That means the node that held
    /// `key` now holds the next larger key:
    ///
    /// ```
    /// use bstree::Tree;
    ///
    /// let mut tree = Tree::new();
    /// for key in [2, 1, 3] {
    ///     tree.insert(key).unwrap();
    /// }
    ///
    /// tree.delete(2);
    ///
    /// let root = tree.root().unwrap();
    /// assert_eq!(root.key(), 3);
    /// assert_eq!(root.left().map(|n| n.key()), Some(1));
    /// assert!(root.right().is_none());
    /// ```
    pub fn delete(&mut self, key: i64) {
        let Some(mut target) = self.find(key) else {
            trace_log!(key, "delete of absent key");
            return;
        };

        // SAFETY: `target` is owned by this tree and we hold `&mut self`.
        let node = unsafe { &mut *target.as_ptr() };
        if let (Some(_), Some(right)) = (node.left.0, node.right.0) {
            let successor = Node::leftmost(right);
            // SAFETY: `successor` is in `node`'s right subtree so it is a different node.
            node.data = unsafe { successor.as_ref() }.data;
            debug_log!(key, successor = node.data, "copied successor key");
            // The successor is the leftmost node of a subtree so it has no left child and can be
            // spliced out directly.
            target = successor;
        }

        self.splice(target);
        self.len -= 1;
    }

    /// Returns the node holding `key`, if any.
    ///
    /// # Examples
    ///
    /// ```
    /// use bstree::Tree;
    ///
    /// let mut tree = Tree::new();
    /// tree.insert(1).unwrap();
    ///
    /// assert_eq!(tree.search(1).map(|n| n.key()), Some(1));
    /// assert!(tree.search(42).is_none());
    /// ```
    pub fn search(&self, key: i64) -> Option<NodeRef<'_>> {
        // SAFETY: The node is owned by `self` and the returned reference borrows `self`.
        self.find(key).map(|ptr| NodeRef::new(unsafe { ptr.as_ref() }))
    }

    /// Returns `true` if `key` is in the tree.
    pub fn contains(&self, key: i64) -> bool {
        self.find(key).is_some()
    }

    /// The smallest key in the tree, or `None` if it's empty.
    pub fn min(&self) -> Option<i64> {
        self.root.0.map(|root| {
            // SAFETY: The node is owned by `self` which we're only reading from.
            unsafe { Node::leftmost(root).as_ref() }.data
        })
    }

    /// The largest key in the tree, or `None` if it's empty.
    pub fn max(&self) -> Option<i64> {
        self.root.0.map(|root| {
            // SAFETY: The node is owned by `self` which we're only reading from.
            unsafe { Node::rightmost(root).as_ref() }.data
        })
    }

    /// The node with the next larger key after `key`. Returns `None` if `key` isn't in the tree
    /// or is the largest key.
    ///
    /// # Examples
    ///
    /// ```
    /// use bstree::Tree;
    ///
    /// let mut tree = Tree::new();
    /// for key in [20, 10, 30] {
    ///     tree.insert(key).unwrap();
    /// }
    ///
    /// assert_eq!(tree.successor(10).map(|n| n.key()), Some(20));
    /// assert!(tree.successor(30).is_none());
    /// assert!(tree.successor(15).is_none());
    /// ```
    pub fn successor(&self, key: i64) -> Option<NodeRef<'_>> {
        self.search(key).and_then(|node| node.node.successor()).map(NodeRef::new)
    }

    /// The node with the next smaller key before `key`. Returns `None` if `key` isn't in the tree
    /// or is the smallest key.
    pub fn predecessor(&self, key: i64) -> Option<NodeRef<'_>> {
        self.search(key).and_then(|node| node.node.predecessor()).map(NodeRef::new)
    }

    /// Calls `visit` with every key in the tree in ascending order.
    ///
    /// # Examples
    ///
    /// ```
    /// use bstree::Tree;
    ///
    /// let mut tree = Tree::new();
    /// for key in [2, 3, 1] {
    ///     tree.insert(key).unwrap();
    /// }
    ///
    /// let mut keys = Vec::new();
    /// tree.in_order_traverse(|key| keys.push(key));
    /// assert_eq!(keys, [1, 2, 3]);
    /// ```
    pub fn in_order_traverse<F>(&self, visit: F)
    where
        F: FnMut(i64),
    {
        self.iter().for_each(visit);
    }

    /// An iterator over the keys in ascending order.
    pub fn iter(&self) -> Iter<'_> {
        Iter::new(self.root.node(), self.len)
    }

    /// The number of nodes on the longest path from the root to a leaf. An empty tree has a depth
    /// of 0 and a lone root has a depth of 1.
    pub fn depth(&self) -> usize {
        let mut deepest = 0;
        let mut stack: Vec<(&Node, usize)> = self.root.node().map(|n| (n, 1)).into_iter().collect();

        while let Some((node, depth)) = stack.pop() {
            deepest = deepest.max(depth);
            stack.extend(node.left().map(|n| (n, depth + 1)));
            stack.extend(node.right().map(|n| (n, depth + 1)));
        }

        deepest
    }

    /// Removes every key from the tree.
    pub fn clear(&mut self) {
        let mut stack: Vec<NonNull<Node>> = self.root.take().0.into_iter().collect();

        while let Some(ptr) = stack.pop() {
            // SAFETY: Every node was allocated with `Box::new` in `Node::new_leaked` and is
            // reachable from exactly one link. The root link was cleared above and each child is
            // pushed only by its (now freed) parent, so every node is reclaimed exactly once.
            let node = unsafe { Box::from_raw(ptr.as_ptr()) };
            stack.extend(node.left.0);
            stack.extend(node.right.0);
        }

        if self.len > 0 {
            trace_log!(len = self.len, "cleared");
        }
        self.len = 0;
    }

    /// Finds the node holding `key`. The pointer is derived from the tree's own links so it may
    /// be written through while `&mut self` is held.
    fn find(&self, key: i64) -> Option<NonNull<Node>> {
        let mut current = self.root.0;

        while let Some(ptr) = current {
            // SAFETY: `ptr` is owned by this tree which we're only reading from.
            let node = unsafe { ptr.as_ref() };
            current = match key.cmp(&node.data) {
                Ordering::Less => node.left.0,
                Ordering::Equal => return Some(ptr),
                Ordering::Greater => node.right.0,
            };
        }

        None
    }

    /// Unlinks `target`, which must have at most one child, by connecting its parent (or the root
    /// link) directly to that child, and frees it.
    fn splice(&mut self, target: NonNull<Node>) {
        // SAFETY: `target` was allocated by `Node::new_leaked` and is owned by this tree. The only
        // links to it are its parent's child link (or the root link) and its child's parent link.
        // Both are rewritten below before anything could follow them.
        let node = unsafe { Box::from_raw(target.as_ptr()) };
        debug_assert!(
            node.left.0.is_none() || node.right.0.is_none(),
            "only nodes with at most one child can be spliced out"
        );

        let child = if node.left.0.is_some() {
            node.left
        } else {
            node.right
        };

        if let Some(child) = child.0 {
            // SAFETY: `child` is owned by this tree and distinct from every other node we hold.
            unsafe { (*child.as_ptr()).parent = node.parent };
        }

        match node.parent.0 {
            None => self.root = child,
            Some(parent) => {
                // SAFETY: `parent` is owned by this tree and we hold `&mut self`.
                let parent = unsafe { &mut *parent.as_ptr() };
                if parent.left.0 == Some(target) {
                    parent.left = child;
                } else {
                    parent.right = child;
                }
            }
        }

        trace_log!(key = node.data, "spliced out");
    }
}

/// A read-only handle to a node in a [`Tree`]. It borrows the tree so the tree can't change while
/// the handle is alive.
#[derive(Clone, Copy)]
pub struct NodeRef<'a> {
    node: &'a Node,
}

impl fmt::Debug for NodeRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeRef").field("key", &self.key()).finish()
    }
}

impl<'a> NodeRef<'a> {
    fn new(node: &'a Node) -> Self {
        Self { node }
    }

    /// The key stored in this node.
    pub fn key(&self) -> i64 {
        self.node.data
    }

    /// This node's parent. `None` for the root.
    pub fn parent(&self) -> Option<NodeRef<'a>> {
        self.node.parent().map(NodeRef::new)
    }

    /// This node's left child.
    pub fn left(&self) -> Option<NodeRef<'a>> {
        self.node.left().map(NodeRef::new)
    }

    /// This node's right child.
    pub fn right(&self) -> Option<NodeRef<'a>> {
        self.node.right().map(NodeRef::new)
    }

    /// Returns `true` if this node has no children.
    pub fn is_leaf(&self) -> bool {
        self.node.left.0.is_none() && self.node.right.0.is_none()
    }

    /// Returns `true` if both handles point at the same node, regardless of the keys they hold.
    pub fn ptr_eq(&self, other: &NodeRef<'_>) -> bool {
        std::ptr::eq(self.node, other.node)
    }
}

/// A possibly empty pointer to a `Node`. Child links own the node they point to. Parent links
/// don't.
#[derive(Clone, Copy, PartialEq, Eq)]
struct Link(Option<NonNull<Node>>);

impl Link {
    fn node(&self) -> Option<&Node> {
        // SAFETY: If the link is not `None` then it points at a valid `Node` owned by the same
        // tree. Mutation requires `&mut Tree`, so while `self` is borrowed nothing can free or
        // write to the node.
        unsafe { self.0.as_ref().map(|ptr| ptr.as_ref()) }
    }

    fn take(&mut self) -> Self {
        Link(self.0.take())
    }

    fn is(&self, node: &Node) -> bool {
        self.0 == Some(NonNull::from(node))
    }
}

pub(crate) struct Node {
    data: i64,
    left: Link,
    right: Link,
    parent: Link,
}

impl Node {
    /// Allocates a childless node and leaks it. Ownership passes to whichever link the returned
    /// pointer is stored in.
    fn new_leaked(data: i64, parent: Link) -> NonNull<Self> {
        NonNull::from(Box::leak(Box::new(Node {
            data,
            left: Link(None),
            right: Link(None),
            parent,
        })))
    }

    pub(crate) fn key(&self) -> i64 {
        self.data
    }

    pub(crate) fn left(&self) -> Option<&Self> {
        self.left.node()
    }

    pub(crate) fn right(&self) -> Option<&Self> {
        self.right.node()
    }

    fn parent(&self) -> Option<&Self> {
        self.parent.node()
    }

    fn leftmost(mut ptr: NonNull<Self>) -> NonNull<Self> {
        // SAFETY: Every node reachable through a child link is valid.
        while let Some(left) = unsafe { ptr.as_ref() }.left.0 {
            ptr = left;
        }
        ptr
    }

    fn rightmost(mut ptr: NonNull<Self>) -> NonNull<Self> {
        // SAFETY: Every node reachable through a child link is valid.
        while let Some(right) = unsafe { ptr.as_ref() }.right.0 {
            ptr = right;
        }
        ptr
    }

    fn successor(&self) -> Option<&Self> {
        if let Some(right) = self.right.0 {
            // SAFETY: The leftmost node of our right subtree lives as long as we do.
            return Some(unsafe { Self::leftmost(right).as_ref() });
        }

        // Climb until we come up out of a left subtree.
        let mut node = self;
        while let Some(parent) = node.parent() {
            if parent.left.is(node) {
                return Some(parent);
            }
            node = parent;
        }
        None
    }

    fn predecessor(&self) -> Option<&Self> {
        if let Some(left) = self.left.0 {
            // SAFETY: The rightmost node of our left subtree lives as long as we do.
            return Some(unsafe { Self::rightmost(left).as_ref() });
        }

        let mut node = self;
        while let Some(parent) = node.parent() {
            if parent.right.is(node) {
                return Some(parent);
            }
            node = parent;
        }
        None
    }
}

#[cfg(test)]
impl Tree {
    /// Walks the whole tree asserting ordering, back-links, and the cached length.
    fn assert_invariants(&self) {
        if let Some(root) = self.root.node() {
            assert!(root.parent.0.is_none(), "root has a parent");
        }

        let mut count = 0;
        // Each entry is a node plus the exclusive bounds its key must fall within.
        let mut stack: Vec<(&Node, Option<i64>, Option<i64>)> =
            self.root.node().map(|n| (n, None, None)).into_iter().collect();
        while let Some((node, low, high)) = stack.pop() {
            count += 1;
            if let Some(low) = low {
                assert!(node.data > low, "{} is not above {}", node.data, low);
            }
            if let Some(high) = high {
                assert!(node.data < high, "{} is not below {}", node.data, high);
            }
            if let Some(left) = node.left() {
                assert!(left.parent.is(node), "{}'s parent is not {}", left.data, node.data);
                stack.push((left, low, Some(node.data)));
            }
            if let Some(right) = node.right() {
                assert!(right.parent.is(node), "{}'s parent is not {}", right.data, node.data);
                stack.push((right, Some(node.data), high));
            }
        }
        assert_eq!(count, self.len);
    }
}


#[cfg(test)]
mod quicktests {
    use std::collections::BTreeSet;

    use super::*;
    use crate::test::quick::Op;

    /// Applies a set of operations to a tree and a `BTreeSet`, checking after every step that
    /// they agree and that the tree's invariants hold.
    fn do_ops(ops: &[Op<i8>], bst: &mut Tree, set: &mut BTreeSet<i64>) {
        for op in ops {
            match *op {
                Op::Insert(k) => {
                    let k = i64::from(k);
                    let expected = if set.insert(k) {
                        Ok(())
                    } else {
                        Err(TreeError::DuplicateKey(k))
                    };
                    assert_eq!(bst.insert(k), expected);
                }
                Op::Delete(k) => {
                    let k = i64::from(k);
                    let len = bst.len();
                    bst.delete(k);
                    let expected_len = if set.remove(&k) { len - 1 } else { len };
                    assert_eq!(bst.len(), expected_len);
                    assert!(bst.search(k).is_none());
                }
                Op::Iter => {
                    assert!(bst.iter().eq(set.iter().copied()));
                }
            }
            bst.assert_invariants();
        }
    }

    quickcheck::quickcheck! {
        fn fuzz_multiple_operations_i8(ops: Vec<Op<i8>>) -> bool {
            let mut tree = Tree::new();
            let mut set = BTreeSet::new();

            do_ops(&ops, &mut tree, &mut set);
            tree.iter().eq(set.iter().copied())
                && tree.min() == set.iter().next().copied()
                && tree.max() == set.iter().next_back().copied()
        }
    }

    quickcheck::quickcheck! {
        fn neighbours_match_sorted_order(xs: Vec<i16>) -> bool {
            let mut tree = Tree::new();
            for x in &xs {
                let _ = tree.insert(i64::from(*x));
            }
            let sorted: Vec<i64> = tree.iter().collect();

            sorted.windows(2).all(|pair| {
                tree.successor(pair[0]).map(|n| n.key()) == Some(pair[1])
                    && tree.predecessor(pair[1]).map(|n| n.key()) == Some(pair[0])
            }) && sorted.first().map_or(true, |&k| tree.predecessor(k).is_none())
                && sorted.last().map_or(true, |&k| tree.successor(k).is_none())
        }
    }
}
