use avl::tree::Tree;

use std::collections::{BTreeSet, HashSet};

use crate::Op;

/// Applies a set of operations to a tree and a BTreeSet.
/// This way we can ensure that after a random smattering of inserts
/// and deletes we have the same set of keys in both.
fn do_ops<K>(ops: &[Op<K>], tree: &mut Tree<K>, set: &mut BTreeSet<K>)
where
    K: Ord + Clone,
{
    for op in ops {
        match op {
            Op::Insert(k) => {
                assert_eq!(tree.insert(k.clone()), set.insert(k.clone()));
            }
            Op::Remove(k) => {
                assert_eq!(tree.remove(k), set.remove(k));
            }
            Op::Iter => {
                assert!(tree.iter().eq(set.iter()));
            }
        }
    }
}

#[quickcheck]
fn fuzz_multiple_operations_i8(ops: Vec<Op<i8>>) -> bool {
    let mut tree = Tree::new();
    let mut set = BTreeSet::new();

    do_ops(&ops, &mut tree, &mut set);
    tree.len() == set.len() && tree.iter().eq(set.iter())
}

#[quickcheck]
fn contains(xs: Vec<i8>) -> bool {
    let mut tree = Tree::new();
    for x in &xs {
        tree.insert(*x);
    }

    xs.iter().all(|x| tree.contains(x))
}

#[quickcheck]
fn contains_not(xs: Vec<i8>, nots: Vec<i8>) -> bool {
    let mut tree = Tree::new();
    for x in &xs {
        tree.insert(*x);
    }
    let added: HashSet<_> = xs.into_iter().collect();
    let nots: HashSet<_> = nots.into_iter().collect();
    let mut nots = nots.difference(&added);

    nots.all(|x| !tree.contains(x))
}

#[quickcheck]
fn with_deletions(xs: Vec<i8>, deletes: Vec<i8>) -> bool {
    let mut tree = Tree::new();
    for x in &xs {
        tree.insert(*x);
    }
    for delete in &deletes {
        tree.remove(delete);
    }

    let deleted: HashSet<_> = deletes.into_iter().collect();

    deleted.iter().all(|x| !tree.contains(x))
        && xs
            .iter()
            .filter(|x| !deleted.contains(*x))
            .all(|x| tree.contains(x))
}

#[quickcheck]
fn iteration_is_sorted_and_unique(xs: Vec<i32>) -> bool {
    let tree: Tree<i32> = xs.iter().copied().collect();
    let expected: BTreeSet<i32> = xs.into_iter().collect();

    tree.len() == expected.len() && tree.iter().eq(expected.iter())
}

#[quickcheck]
fn traversals_agree_on_the_keys(xs: Vec<i16>) -> bool {
    let tree: Tree<i16> = xs.into_iter().collect();

    let inorder: Vec<_> = tree.iter().collect();
    let mut preorder: Vec<_> = tree.preorder().collect();
    let mut postorder: Vec<_> = tree.postorder().collect();

    // The root leads the pre-order walk and closes the post-order walk.
    let root_agrees = preorder.first() == postorder.last();
    preorder.sort();
    postorder.sort();

    root_agrees && preorder == inorder && postorder == inorder
}

#[quickcheck]
fn height_stays_logarithmic(xs: Vec<u32>) -> bool {
    let tree: Tree<u32> = xs.into_iter().collect();

    // The classic AVL bound: height < 1.4405 * lg(n + 2) - 0.3277.
    let bound = 1.4405 * ((tree.len() + 2) as f64).log2() - 0.3277;
    (tree.height() as f64) < bound
}

#[quickcheck]
fn clones_do_not_share_structure(xs: Vec<i8>, deletes: Vec<i8>) -> bool {
    let original: Tree<i8> = xs.iter().copied().collect();
    let mut copy = original.clone();

    for delete in &deletes {
        copy.remove(delete);
    }

    xs.iter().all(|x| original.contains(x)) && original.iter().count() == original.len()
}
