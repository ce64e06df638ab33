//! An in-memory, ordered Binary Search Tree (BST) over `i64` keys.
//!
//! ## Binary Search Tree
//!
//! A Binary Search Tree is a data structure supporting operations to
//! insert, find, and delete stored keys. The tree is made of `Node`s, each
//! holding one key and linking to at most two children and (except for the
//! root) to its parent. The invariants this crate maintains are:
//!
//! 1. For every `Node` in the tree, all the `Node`s in its left subtree have a
//!    key less than its own key.
//! 2. For every `Node` in the tree, all the `Node`s in its right subtree have a
//!    key greater than its own key.
//! 3. Keys are unique. Inserting a key that is already present is an error.
//! 4. If a `Node` is the left or right child of another `Node`, its parent link
//!    points back at that `Node`. The root has no parent.
//!
//! The parent links are what make [`Tree::predecessor`] and [`Tree::successor`]
//! cheap: when a node has no subtree on the relevant side, the answer is found by
//! walking *up* instead of starting over from the root.
//!
//! > This tree does not balance itself. Inserting keys in sorted order produces
//! > a tree shaped like a linked list whose depth equals its size. Every
//! > operation here is written without recursion so such trees are still safe
//! > to traverse, clone, and drop.
//!
//! # Examples
//!
//! ```
//! use bstree::{Tree, TreeError};
//!
//! let mut tree = Tree::new();
//! for key in [50, 30, 70, 20, 40, 60, 80] {
//!     tree.insert(key).unwrap();
//! }
//!
//! assert_eq!(tree.insert(40), Err(TreeError::DuplicateKey(40)));
//! assert_eq!(tree.iter().collect::<Vec<_>>(), [20, 30, 40, 50, 60, 70, 80]);
//! assert_eq!((tree.min(), tree.max()), (Some(20), Some(80)));
//! assert_eq!(tree.depth(), 3);
//! assert_eq!(tree.successor(50).map(|n| n.key()), Some(60));
//! assert_eq!(tree.predecessor(50).map(|n| n.key()), Some(40));
//!
//! tree.delete(50);
//! assert_eq!(tree.root().map(|n| n.key()), Some(60));
//! assert_eq!(tree.iter().collect::<Vec<_>>(), [20, 30, 40, 60, 70, 80]);
//! ```

#![deny(missing_docs, clippy::clone_on_ref_ptr)]

mod tracing_helpers;

pub mod error;
pub mod iter;
pub mod tree;


pub use error::{Result, TreeError};
pub use iter::Iter;
pub use tree::{NodeRef, Tree};
