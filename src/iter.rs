//! In-order iteration over a [`Tree`](crate::Tree).

use std::iter::FusedIterator;

use crate::tree::Node;

/// An iterator over the keys of a [`Tree`](crate::Tree) in ascending order.
///
/// Created by [`Tree::iter`](crate::Tree::iter). Pending ancestors are kept on an
/// explicit stack, so iterating a tree of any depth uses no recursion.
#[derive(Clone)]
pub struct Iter<'a> {
    /// Ancestors whose key hasn't been yielded yet, deepest last.
    stack: Vec<&'a Node>,
    /// Root of the next subtree to descend into.
    current: Option<&'a Node>,
    remaining: usize,
}

impl<'a> Iter<'a> {
    pub(crate) fn new(root: Option<&'a Node>, len: usize) -> Self {
        Self {
            stack: Vec::new(),
            current: root,
            remaining: len,
        }
    }
}

impl Iterator for Iter<'_> {
    type Item = i64;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(node) = self.current {
            self.stack.push(node);
            self.current = node.left();
        }

        let node = self.stack.pop()?;
        self.current = node.right();
        self.remaining -= 1;
        Some(node.key())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for Iter<'_> {}

impl FusedIterator for Iter<'_> {}

impl std::fmt::Debug for Iter<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Iter")
            .field("remaining", &self.remaining)
            .finish()
    }
}
