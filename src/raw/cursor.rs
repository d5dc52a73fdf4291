use smallvec::{SmallVec, smallvec};

use super::handle::Handle;
use super::node::Node;
use super::raw_btree_list::RawBTreeList;

/// Next child to visit at each level; index 0 (the leaf level) is unused.
type Cursors = SmallVec<[usize; 8]>;

/// Walks the leaves of a tree left to right without recursion.
///
/// The cursor descends by following `children[cursors[level]]` and, once a leaf has been
/// handed out, climbs back through parent handles to the first ancestor with an unvisited
/// child.
pub(crate) struct LeafCursor<'a, T> {
    tree: &'a RawBTreeList<T>,
    cursors: Cursors,
    level: usize,
    // `None` once the walk has climbed past the root.
    node: Option<Handle>,
}

impl<'a, T> LeafCursor<'a, T> {
    pub(crate) fn new(tree: &'a RawBTreeList<T>) -> Self {
        let height = tree.height();
        Self {
            tree,
            cursors: smallvec![0; height + 1],
            level: height,
            node: Some(tree.root()),
        }
    }

    /// Returns the next leaf in position order.
    pub(crate) fn next_leaf_handle(&mut self) -> Option<Handle> {
        let tree = self.tree;
        loop {
            let handle = self.node?;
            match tree.node(handle) {
                Node::Leaf(leaf) => {
                    self.climb(leaf.parent());
                    return Some(handle);
                }
                Node::Internal(internal) => {
                    let next = self.cursors[self.level];
                    if next < internal.child_count() {
                        self.node = Some(internal.child(next));
                        self.level -= 1;
                    } else {
                        self.cursors[self.level] = 0;
                        self.climb(internal.parent());
                    }
                }
            }
        }
    }

    /// Returns the values of the next leaf in position order.
    pub(crate) fn next_leaf(&mut self) -> Option<&'a [T]> {
        let tree = self.tree;
        self.next_leaf_handle().map(|handle| tree.node(handle).as_leaf().values())
    }

    fn climb(&mut self, parent: Option<Handle>) {
        self.node = parent;
        self.level += 1;
        if parent.is_some() {
            self.cursors[self.level] += 1;
        }
    }
}

impl<T> Clone for LeafCursor<'_, T> {
    fn clone(&self) -> Self {
        Self {
            tree: self.tree,
            cursors: self.cursors.clone(),
            level: self.level,
            node: self.node,
        }
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use alloc::vec::Vec;

    #[test]
    fn empty_tree_yields_its_empty_root_once() {
        let tree: RawBTreeList<u8> = RawBTreeList::new(4);
        let mut cursor = LeafCursor::new(&tree);
        assert_eq!(cursor.next_leaf(), Some(&[][..]));
        assert_eq!(cursor.next_leaf(), None);
        assert_eq!(cursor.next_leaf(), None);
    }

    #[test]
    fn leaves_come_out_in_position_order() {
        let mut tree = RawBTreeList::new(3);
        tree.append_all(0..1000);
        assert!(tree.height() >= 4);

        let mut cursor = LeafCursor::new(&tree);
        let mut seen = Vec::new();
        let mut leaves = 0;
        while let Some(values) = cursor.next_leaf() {
            assert!(!values.is_empty());
            seen.extend_from_slice(values);
            leaves += 1;
        }
        assert_eq!(seen, (0..1000).collect::<Vec<_>>());
        assert!(leaves >= 1000 / 3);
    }

    #[test]
    fn clone_resumes_independently() {
        let mut tree = RawBTreeList::new(4);
        tree.append_all(0..40);
        let mut cursor = LeafCursor::new(&tree);
        cursor.next_leaf();
        let mut fork = cursor.clone();
        assert_eq!(cursor.next_leaf(), fork.next_leaf());
        assert_eq!(cursor.next_leaf(), fork.next_leaf());
    }
}
