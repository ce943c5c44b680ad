//! A self-balancing Binary Search Tree (specifically, an AVL tree) storing a set of unique keys.
//! Similar to the standard library's `BTreeSet` except keeping two children per parent instead of
//! an array based `BTree`.
//!
//! # Examples
//!
//! ```
//! use avl::tree::Tree;
//!
//! let mut tree = Tree::new();
//!
//! // Nothing in here yet.
//! assert!(!tree.contains(&1));
//!
//! assert!(tree.insert(1));
//! assert!(tree.contains(&1));
//!
//! // Inserting an existing key leaves the tree alone.
//! assert!(!tree.insert(1));
//!
//! // Keys come back out in ascending order.
//! tree.insert(3);
//! tree.insert(2);
//! let keys: Vec<_> = tree.iter().copied().collect();
//! assert_eq!(keys, [1, 2, 3]);
//!
//! // Removing a key reports whether it was present.
//! assert!(tree.remove(&1));
//! assert!(!tree.remove(&1));
//! ```

use std::cmp::Ordering;
use std::fmt;
use std::iter::FusedIterator;

/// A self-balancing Binary Search Tree (specifically, an AVL tree) holding a set of unique keys.
/// This can be used for inserting, finding, and removing keys, and for iterating over them in
/// ascending order. Rebalancing keeps every operation `O(lg N)` in the number of stored keys.
#[derive(Clone)]
pub struct Tree<K> {
    root: Link<K>,
    len: usize,
}

impl<K> Default for Tree<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K> fmt::Debug for Tree<K>
where
    K: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<K> PartialEq for Tree<K>
where
    K: PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.len == other.len && self.iter().eq(other.iter())
    }
}

impl<K> Eq for Tree<K> where K: Eq {}

impl<K> Extend<K> for Tree<K>
where
    K: Ord,
{
    fn extend<I: IntoIterator<Item = K>>(&mut self, iter: I) {
        for key in iter {
            self.insert(key);
        }
    }
}

impl<K> std::iter::FromIterator<K> for Tree<K>
where
    K: Ord,
{
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
        let mut tree = Tree::new();
        tree.extend(iter);
        tree
    }
}

impl<'a, K> IntoIterator for &'a Tree<K> {
    type Item = &'a K;
    type IntoIter = Iter<'a, K>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K> IntoIterator for Tree<K> {
    type Item = K;
    type IntoIter = IntoIter<K>;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter::new(self)
    }
}

impl<K> Tree<K> {
    /// Generates a new, empty `Tree`.
    pub fn new() -> Self {
        Self {
            root: Link(None),
            len: 0,
        }
    }

    /// The number of keys stored in the tree.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the tree stores no keys at all.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The number of nodes on the longest path from the root down to a leaf. An empty tree has
    /// height zero. Rebalancing keeps this logarithmic in [`len`](Self::len) no matter what order
    /// the keys were inserted in.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl::tree::Tree;
    ///
    /// // Sorted input would stack a plain BST seven nodes deep.
    /// let tree: Tree<_> = (1..=7).collect();
    ///
    /// assert_eq!(tree.height(), 3);
    /// ```
    pub fn height(&self) -> usize {
        self.root.height()
    }

    /// Removes every key from the tree.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl::tree::Tree;
    ///
    /// let mut tree: Tree<_> = (1..=7).collect();
    /// tree.clear();
    ///
    /// assert!(tree.is_empty());
    /// assert!(!tree.contains(&1));
    /// ```
    pub fn clear(&mut self) {
        self.root = Link(None);
        self.len = 0;
    }

    /// Whether the given key is in the tree.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl::tree::Tree;
    ///
    /// let mut tree = Tree::new();
    /// tree.insert(1);
    ///
    /// assert!(tree.contains(&1));
    /// assert!(!tree.contains(&42));
    /// ```
    pub fn contains(&self, key: &K) -> bool
    where
        K: Ord,
    {
        self.get(key).is_some()
    }

    /// Potentially finds the stored key equal to the given key. If no node has the key, `None`
    /// is returned. With `Ord` implementations that ignore part of the key's data, this exposes
    /// which of two "equal" keys the tree kept.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl::tree::Tree;
    ///
    /// let mut tree = Tree::new();
    /// tree.insert(1);
    ///
    /// assert_eq!(tree.get(&1), Some(&1));
    /// assert_eq!(tree.get(&42), None);
    /// ```
    pub fn get(&self, key: &K) -> Option<&K>
    where
        K: Ord,
    {
        self.root.get(key)
    }

    /// Inserts the given key into the tree, returning whether it was added. Inserting a key that
    /// is already present does nothing and keeps the originally stored key.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl::tree::Tree;
    ///
    /// let mut tree = Tree::new();
    ///
    /// assert!(tree.insert(1));
    /// assert!(!tree.insert(1));
    ///
    /// assert_eq!(tree.len(), 1);
    /// ```
    pub fn insert(&mut self, key: K) -> bool
    where
        K: Ord,
    {
        match self.root.insert(key) {
            InsertResult::Inserted(_) => {
                self.len += 1;
                true
            }
            InsertResult::AlreadyPresent => false,
        }
    }

    /// Removes the given key from the tree, returning whether it was present. If the tree does
    /// not contain the key, nothing happens.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl::tree::Tree;
    ///
    /// let mut tree = Tree::new();
    /// tree.insert(1);
    ///
    /// assert!(tree.remove(&1));
    /// assert!(!tree.remove(&1));
    /// assert!(tree.is_empty());
    /// ```
    pub fn remove(&mut self, key: &K) -> bool
    where
        K: Ord,
    {
        let removed = self.root.remove(key);
        if removed {
            self.len -= 1;
        }
        removed
    }

    /// An in-order iterator over the keys of the tree, ascending.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl::tree::Tree;
    ///
    /// let tree: Tree<_> = vec![2, 3, 1].into_iter().collect();
    /// let keys: Vec<_> = tree.iter().copied().collect();
    ///
    /// assert_eq!(keys, [1, 2, 3]);
    /// ```
    pub fn iter(&self) -> Iter<'_, K> {
        Iter::new(self)
    }

    /// A pre-order iterator over the keys of the tree: each key is yielded before any key in its
    /// subtrees, starting at the root.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl::tree::Tree;
    ///
    /// let tree: Tree<_> = vec![2, 1, 3].into_iter().collect();
    /// let keys: Vec<_> = tree.preorder().copied().collect();
    ///
    /// assert_eq!(keys, [2, 1, 3]);
    /// ```
    pub fn preorder(&self) -> Preorder<'_, K> {
        Preorder::new(self)
    }

    /// A post-order iterator over the keys of the tree: each key is yielded after every key in
    /// its subtrees, so the root comes last.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl::tree::Tree;
    ///
    /// let tree: Tree<_> = vec![2, 1, 3].into_iter().collect();
    /// let keys: Vec<_> = tree.postorder().copied().collect();
    ///
    /// assert_eq!(keys, [1, 3, 2]);
    /// ```
    pub fn postorder(&self) -> Postorder<'_, K> {
        Postorder::new(self)
    }
}

/// A slot that may hold a subtree: the root slot of the whole tree or either child slot of a
/// node. All of the recursive work happens here so that a node can be swapped out of its slot
/// (during rotations and removals) without its parent noticing.
#[derive(Clone)]
struct Link<K>(Option<Box<Node<K>>>);

impl<K> Link<K> {
    fn node(&self) -> Option<&Node<K>> {
        self.0.as_deref()
    }

    fn node_mut(&mut self) -> Option<&mut Node<K>> {
        self.0.as_deref_mut()
    }

    fn take(&mut self) -> Self {
        Link(self.0.take())
    }

    /// The height of the subtree hanging off this link. An empty link has height zero.
    fn height(&self) -> usize {
        self.node().map_or(0, |n| n.height)
    }

    fn get(&self, key: &K) -> Option<&K>
    where
        K: Ord,
    {
        let node = self.node()?;
        match key.cmp(&node.key) {
            Ordering::Less => node.left.get(key),
            Ordering::Equal => Some(&node.key),
            Ordering::Greater => node.right.get(key),
        }
    }

    /// Inserts `key` into this subtree, reporting to the parent whether a new node was created
    /// and how the key compared against this subtree's root.
    fn insert(&mut self, key: K) -> InsertResult
    where
        K: Ord,
    {
        let Some(node) = self.node_mut() else {
            self.0 = Some(Node::new_boxed(key));
            return InsertResult::Inserted(Ordering::Equal);
        };

        let ord = key.cmp(&node.key);
        let result = match ord {
            Ordering::Less => node.left.insert(key),
            Ordering::Greater => node.right.insert(key),
            Ordering::Equal => return InsertResult::AlreadyPresent,
        };

        node.fix_height();
        match result {
            InsertResult::Inserted(new_key_vs_child) => {
                self.rebalance_after_insert(new_key_vs_child);
                InsertResult::Inserted(ord)
            }
            InsertResult::AlreadyPresent => InsertResult::AlreadyPresent,
        }
    }

    /// Removes `key` from this subtree, returning whether it was found.
    fn remove(&mut self, key: &K) -> bool
    where
        K: Ord,
    {
        let Some(node) = self.node_mut() else {
            return false;
        };

        let removed = match key.cmp(&node.key) {
            Ordering::Less => node.left.remove(key),
            Ordering::Greater => node.right.remove(key),
            Ordering::Equal => {
                self.remove_node();
                return true;
            }
        };

        node.fix_height();
        self.rebalance_after_remove();
        removed
    }

    /// Unlinks this link's node and puts whatever remains of its subtrees back in its place. A
    /// node with two children instead keeps its place and takes over its in-order successor's
    /// key, so that only a node with at most one child is ever spliced out.
    fn remove_node(&mut self) {
        let mut node = self.0.take().expect("Removing a node implies a node");
        *self = match (node.left.take(), node.right.take()) {
            (Link(None), child) | (child, Link(None)) => child,
            (left, mut right) => {
                node.key = right.take_smallest();
                node.left = left;
                node.right = right;
                node.fix_height();
                Link(Some(node))
            }
        };
        self.rebalance_after_remove();
    }

    /// Detaches the smallest node of this subtree and hands its key back, rebalancing the path
    /// it walked down on the way back up.
    fn take_smallest(&mut self) -> K {
        let mut node = self.0.take().expect("Taking the smallest key requires a node");
        if node.left.0.is_some() {
            let smallest = node.left.take_smallest();
            node.fix_height();
            self.0 = Some(node);
            self.rebalance_after_remove();
            smallest
        } else {
            *self = node.right.take();
            node.key
        }
    }

    /// Re-applies the AVL balance rule to this link's node after a new key was inserted
    /// somewhere below it. `new_key_vs_child` is how the new key compared against the root of
    /// the child subtree it went into, which picks between the single and double rotations.
    fn rebalance_after_insert(&mut self, new_key_vs_child: Ordering) {
        let Some(node) = self.node() else {
            return;
        };
        match (node.balance_factor(), new_key_vs_child) {
            (2, Ordering::Less) => self.rotate_right(),
            (2, Ordering::Greater) => self.rotate_left_right(),
            (-2, Ordering::Greater) => self.rotate_left(),
            (-2, Ordering::Less) => self.rotate_right_left(),
            _ => {}
        }

        if cfg!(debug_assertions) {
            let Some(node) = self.node() else {
                return;
            };
            let left_height = node.left.height();
            let right_height = node.right.height();
            assert_eq!(node.height, left_height.max(right_height) + 1);
            assert!(left_height.abs_diff(right_height) <= 1);
        }
    }

    /// Re-applies the AVL balance rule to this link's node after a removal somewhere below it.
    /// Unlike insertion, the taller child can itself be evenly balanced here; that tie still
    /// takes the single rotation.
    fn rebalance_after_remove(&mut self) {
        let Some(node) = self.node() else {
            return;
        };
        match (node.balance_factor(), node.left.node(), node.right.node()) {
            (2, Some(left), _) => match left.balance_factor() {
                n if n >= 0 => self.rotate_right(),
                _ => self.rotate_left_right(),
            },
            (-2, _, Some(right)) => match right.balance_factor() {
                n if n <= 0 => self.rotate_left(),
                _ => self.rotate_right_left(),
            },
            _ => {}
        }

        if cfg!(debug_assertions) {
            let Some(node) = self.node() else {
                return;
            };
            let left_height = node.left.height();
            let right_height = node.right.height();
            assert_eq!(node.height, left_height.max(right_height) + 1);
            assert!(left_height.abs_diff(right_height) <= 1);
        }
    }

    /// Rotates this subtree to the right. This moves the left child up vertically and the old
    /// root down vertically. Used to rebalance the tree when the left side is too tall. As such,
    /// it must only be called when there _is_ a left child.
    ///
    /// ## Panics
    ///
    /// When called on an empty link or on a node without a left child.
    ///
    /// # Diagram
    ///
    /// Roughly speaking, we want to perform this transformation:
    ///
    /// ```text
    ///   old_root (i.e. "self")    new_root
    ///    /     \                  /     \
    /// new_root  z     rotate ->  x    old_root
    ///  / \                               /  \
    /// x   y                             y    z
    /// ```
    fn rotate_right(&mut self) {
        let mut old_root = self.0.take().expect("Cannot rotate an empty subtree");
        let mut new_root = old_root.left.0.take().expect("Rotate right => left child");

        old_root.left = new_root.right.take();
        old_root.fix_height();

        new_root.right = Link(Some(old_root));
        new_root.fix_height();
        self.0 = Some(new_root);
    }

    fn rotate_left(&mut self) {
        let mut old_root = self.0.take().expect("Cannot rotate an empty subtree");
        let mut new_root = old_root.right.0.take().expect("Rotate left => right child");

        old_root.right = new_root.left.take();
        old_root.fix_height();

        new_root.left = Link(Some(old_root));
        new_root.fix_height();
        self.0 = Some(new_root);
    }

    fn rotate_right_left(&mut self) {
        self.node_mut()
            .expect("Rotating a tree requires a root")
            .right
            .rotate_right();
        self.rotate_left();
    }

    fn rotate_left_right(&mut self) {
        self.node_mut()
            .expect("Rotating a tree requires a root")
            .left
            .rotate_left();
        self.rotate_right();
    }
}

enum InsertResult {
    /// The key was already in the tree so nothing changed.
    AlreadyPresent,
    /// A new node was created below (or at) the link returning this. The `Ordering` is how the
    /// new key compared against that link's root; a fresh leaf reports `Equal`. The parent needs
    /// this relation to pick its rotation.
    Inserted(Ordering),
}

#[derive(Clone)]
struct Node<K> {
    key: K,
    left: Link<K>,
    right: Link<K>,
    height: usize,
}

impl<K> Node<K> {
    fn new_boxed(key: K) -> Box<Self> {
        Box::new(Node {
            key,
            left: Link(None),
            right: Link(None),
            height: 1,
        })
    }

    /// Adjusts the height of `self` to be the max of its children's heights + 1.
    fn fix_height(&mut self) {
        self.height = self.left.height().max(self.right.height()) + 1;
    }

    /// The difference in height between the left and right subtrees. Positive numbers mean the
    /// left side is taller. See [the Wikipedia page][wiki] for more details.
    ///
    /// [wiki]: https://en.wikipedia.org/wiki/AVL_tree#Balance_factor
    fn balance_factor(&self) -> isize {
        self.left.height() as isize - self.right.height() as isize
    }
}

/// An in-order iterator over the keys of a [`Tree`], ascending. Created by [`Tree::iter`].
pub struct Iter<'a, K> {
    stack: Vec<&'a Node<K>>,
    remaining: usize,
}

impl<'a, K> Iter<'a, K> {
    fn new(tree: &'a Tree<K>) -> Self {
        let mut iter = Iter {
            stack: Vec::new(),
            remaining: tree.len,
        };
        iter.push_left_spine(&tree.root);
        iter
    }

    /// Pushes `link`'s node and every node down its left spine onto the stack. The node on top
    /// afterwards holds the smallest key not yet yielded.
    fn push_left_spine(&mut self, mut link: &'a Link<K>) {
        while let Some(node) = link.node() {
            self.stack.push(node);
            link = &node.left;
        }
    }
}

impl<'a, K> Iterator for Iter<'a, K> {
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.remaining -= 1;
        self.push_left_spine(&node.right);
        Some(&node.key)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K> ExactSizeIterator for Iter<'_, K> {}
impl<K> FusedIterator for Iter<'_, K> {}

/// A pre-order iterator over the keys of a [`Tree`]. Created by [`Tree::preorder`].
pub struct Preorder<'a, K> {
    stack: Vec<&'a Node<K>>,
    remaining: usize,
}

impl<'a, K> Preorder<'a, K> {
    fn new(tree: &'a Tree<K>) -> Self {
        let mut stack = Vec::new();
        if let Some(root) = tree.root.node() {
            stack.push(root);
        }
        Preorder {
            stack,
            remaining: tree.len,
        }
    }
}

impl<'a, K> Iterator for Preorder<'a, K> {
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.remaining -= 1;
        // Right goes on first so the whole left subtree is popped before it.
        if let Some(right) = node.right.node() {
            self.stack.push(right);
        }
        if let Some(left) = node.left.node() {
            self.stack.push(left);
        }
        Some(&node.key)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K> ExactSizeIterator for Preorder<'_, K> {}
impl<K> FusedIterator for Preorder<'_, K> {}

/// A post-order iterator over the keys of a [`Tree`]. Created by [`Tree::postorder`].
pub struct Postorder<'a, K> {
    /// Nodes along with whether their children have already been pushed. A node is only yielded
    /// once it comes back off the stack with the flag set.
    stack: Vec<(&'a Node<K>, bool)>,
    remaining: usize,
}

impl<'a, K> Postorder<'a, K> {
    fn new(tree: &'a Tree<K>) -> Self {
        let mut stack = Vec::new();
        if let Some(root) = tree.root.node() {
            stack.push((root, false));
        }
        Postorder {
            stack,
            remaining: tree.len,
        }
    }
}

impl<'a, K> Iterator for Postorder<'a, K> {
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let (node, expanded) = self.stack.pop()?;
            if expanded {
                self.remaining -= 1;
                return Some(&node.key);
            }
            self.stack.push((node, true));
            if let Some(right) = node.right.node() {
                self.stack.push((right, false));
            }
            if let Some(left) = node.left.node() {
                self.stack.push((left, false));
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K> ExactSizeIterator for Postorder<'_, K> {}
impl<K> FusedIterator for Postorder<'_, K> {}

/// An owning in-order iterator over the keys of a [`Tree`], ascending. Nodes are torn down as
/// their keys are handed out. Created by [`IntoIterator::into_iter`].
pub struct IntoIter<K> {
    stack: Vec<Box<Node<K>>>,
    remaining: usize,
}

impl<K> IntoIter<K> {
    fn new(tree: Tree<K>) -> Self {
        let Tree { root, len } = tree;
        let mut iter = IntoIter {
            stack: Vec::new(),
            remaining: len,
        };
        iter.push_left_spine(root);
        iter
    }

    /// Detaches every node down `link`'s left spine and pushes them onto the stack.
    fn push_left_spine(&mut self, mut link: Link<K>) {
        while let Some(mut node) = link.0 {
            link = node.left.take();
            self.stack.push(node);
        }
    }
}

impl<K> Iterator for IntoIter<K> {
    type Item = K;

    fn next(&mut self) -> Option<Self::Item> {
        let mut node = self.stack.pop()?;
        self.remaining -= 1;
        self.push_left_spine(node.right.take());
        Some(node.key)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K> ExactSizeIterator for IntoIter<K> {}
impl<K> FusedIterator for IntoIter<K> {}
