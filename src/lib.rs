//! This crate implements a self-balancing Binary Search Tree (BST),
//! specifically an AVL tree, maintaining an ordered set of unique keys.
//!
//! ## Binary Search Tree
//!
//! A Binary Search Tree is a data structure supporting operations to
//! insert, find, and delete stored records. BSTs are typically defined
//! recursively using the notion of a `Node`. A `Node` will typically store
//! some sort of key and will sometimes have child `Node`s. The most
//! important invariants of a BST are:
//!
//! 1. For every `Node` in a BST, all the `Node`s in its left subtree have a
//!    key less than its own key.
//! 2. For every `Node` in a BST, all the `Node`s in its right subtree have a
//!    key greater than its own key.
//!
//! > Note that some `Node`s have no children. These `Node`s are called "leaf nodes".
//!
//! The benefits of these invariants are many. For instance, searching for
//! keys in the tree takes `O(height)` (where `height` is defined as the longest
//! path from the root `Node` to a leaf `Node`). BSTs also naturally support
//! sorted iteration by visiting the left subtree, then the subtree root, then
//! the right subtree.
//!
//! ## Self-balancing
//!
//! Nothing in the invariants above stops a tree built from sorted input from
//! degenerating into a linked list with `O(N)` height. An AVL tree
//! additionally records the height of every subtree and keeps the heights of
//! any two sibling subtrees within one of each other by rotating nodes as
//! keys are inserted and removed. That pins the height of the whole tree to
//! `O(lg N)` where `N` is the number of keys, no matter what order they
//! arrive in.

#![deny(missing_docs, clippy::clone_on_ref_ptr)]

pub mod tree;
