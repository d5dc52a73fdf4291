use alloc::vec::Vec;

use super::handle::Handle;

/// A tree node: a leaf holding values or an internal node holding child handles.
///
/// Both variants keep at most `order` slots. The slot vectors are allocated with capacity
/// `order` and never grow beyond it; a full node splits instead.
pub(crate) enum Node<T> {
    Internal(InternalNode),
    Leaf(LeafNode<T>),
}

pub(crate) struct InternalNode {
    parent: Option<Handle>,
    // One more than the height of every child. Fixed at creation.
    height: usize,
    // Number of values in the subtree rooted at this node.
    size: usize,
    children: Vec<Handle>,
}

pub(crate) struct LeafNode<T> {
    parent: Option<Handle>,
    values: Vec<T>,
}

/// Direction of the cached size adjustment made while descending to a leaf.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Adjust {
    Grow,
    Shrink,
}

/// Inserts `value` at `index` into a full slot vector and splits it.
///
/// The left part keeps `order / 2 + 1` slots and the returned right part receives the
/// remaining `order - order / 2` slots. `value` lands in whichever part covers `index`.
fn split_insert<S>(slots: &mut Vec<S>, index: usize, value: S, order: usize) -> Vec<S> {
    debug_assert_eq!(slots.len(), order, "only full nodes are split");
    let keep = order / 2 + 1;
    let mut right = Vec::with_capacity(order);
    if index < keep {
        right.extend(slots.drain(keep - 1..));
        slots.insert(index, value);
    } else {
        right.extend(slots.drain(keep..));
        right.insert(index - keep, value);
    }
    right
}

impl<T> Node<T> {
    /// Creates a new empty leaf node.
    pub(crate) fn new_leaf(order: usize, parent: Option<Handle>) -> Self {
        Node::Leaf(LeafNode::new(order, parent))
    }

    /// Returns the parent handle, `None` for the root.
    pub(crate) fn parent(&self) -> Option<Handle> {
        match self {
            Node::Internal(internal) => internal.parent,
            Node::Leaf(leaf) => leaf.parent,
        }
    }

    pub(crate) fn set_parent(&mut self, parent: Option<Handle>) {
        match self {
            Node::Internal(internal) => internal.parent = parent,
            Node::Leaf(leaf) => leaf.parent = parent,
        }
    }

    /// Returns 0 for leaves.
    pub(crate) fn height(&self) -> usize {
        match self {
            Node::Internal(internal) => internal.height,
            Node::Leaf(_) => 0,
        }
    }

    /// Returns the number of values in this subtree.
    pub(crate) fn size(&self) -> usize {
        match self {
            Node::Internal(internal) => internal.size,
            Node::Leaf(leaf) => leaf.values.len(),
        }
    }

    /// Returns the number of occupied slots (values or children).
    pub(crate) fn used(&self) -> usize {
        match self {
            Node::Internal(internal) => internal.children.len(),
            Node::Leaf(leaf) => leaf.values.len(),
        }
    }

    /// Returns true if this is a leaf node.
    pub(crate) fn is_leaf(&self) -> bool {
        matches!(self, Node::Leaf(_))
    }

    /// Returns the leaf node, panicking if this is not a leaf.
    pub(crate) fn as_leaf(&self) -> &LeafNode<T> {
        match self {
            Node::Leaf(leaf) => leaf,
            Node::Internal(_) => panic!("expected leaf node"),
        }
    }

    /// Returns the leaf node mutably, panicking if this is not a leaf.
    pub(crate) fn as_leaf_mut(&mut self) -> &mut LeafNode<T> {
        match self {
            Node::Leaf(leaf) => leaf,
            Node::Internal(_) => panic!("expected leaf node"),
        }
    }

    /// Returns the internal node, panicking if this is not internal.
    pub(crate) fn as_internal(&self) -> &InternalNode {
        match self {
            Node::Internal(internal) => internal,
            Node::Leaf(_) => panic!("expected internal node"),
        }
    }

    /// Returns the internal node mutably, panicking if this is not internal.
    pub(crate) fn as_internal_mut(&mut self) -> &mut InternalNode {
        match self {
            Node::Internal(internal) => internal,
            Node::Leaf(_) => panic!("expected internal node"),
        }
    }
}

impl InternalNode {
    /// Creates an internal node one level above its future children.
    pub(crate) fn new(order: usize, height: usize, parent: Option<Handle>) -> Self {
        debug_assert!(height > 0, "internal nodes sit above the leaves");
        Self {
            parent,
            height,
            size: 0,
            children: Vec::with_capacity(order),
        }
    }

    pub(crate) fn parent(&self) -> Option<Handle> {
        self.parent
    }

    pub(crate) fn height(&self) -> usize {
        self.height
    }

    pub(crate) fn size(&self) -> usize {
        self.size
    }

    pub(crate) fn set_size(&mut self, size: usize) {
        self.size = size;
    }

    /// Applies the one-value change of an insertion or removal passing through this node.
    pub(crate) fn adjust(&mut self, adjust: Adjust) {
        match adjust {
            Adjust::Grow => self.size += 1,
            Adjust::Shrink => self.size -= 1,
        }
    }

    pub(crate) fn add_size(&mut self, delta: usize) {
        self.size += delta;
    }

    pub(crate) fn sub_size(&mut self, delta: usize) {
        self.size -= delta;
    }

    #[inline]
    pub(crate) fn child(&self, index: usize) -> Handle {
        self.children[index]
    }

    pub(crate) fn children(&self) -> &[Handle] {
        &self.children
    }

    pub(crate) fn child_count(&self) -> usize {
        self.children.len()
    }

    pub(crate) fn first_child(&self) -> Handle {
        self.children[0]
    }

    pub(crate) fn last_child(&self) -> Handle {
        self.children[self.children.len() - 1]
    }

    /// Returns the position of `child` among this node's children.
    ///
    /// # Panics
    ///
    /// Panics if `child` is not a child of this node. Parent links are maintained by every
    /// structural change, so a miss means the tree is corrupt and the operation must stop.
    pub(crate) fn index_of(&self, child: Handle) -> usize {
        match self.children.iter().position(|&c| c == child) {
            Some(index) => index,
            None => panic!("node {child:?} is not a child of its parent"),
        }
    }

    pub(crate) fn insert_child(&mut self, index: usize, child: Handle) {
        self.children.insert(index, child);
    }

    pub(crate) fn push_child(&mut self, child: Handle) {
        self.children.push(child);
    }

    pub(crate) fn remove_child(&mut self, index: usize) -> Handle {
        self.children.remove(index)
    }

    /// Moves the last `count` children out, in order.
    pub(crate) fn drain_tail(&mut self, count: usize) -> Vec<Handle> {
        let at = self.children.len() - count;
        self.children.drain(at..).collect()
    }

    /// Puts `children` in front of the existing ones.
    pub(crate) fn prepend_children(&mut self, children: &[Handle]) {
        self.children.splice(0..0, children.iter().copied());
    }

    pub(crate) fn append_children(&mut self, children: &[Handle]) {
        self.children.extend_from_slice(children);
    }

    /// Moves the first `count` children out, in order.
    pub(crate) fn drain_head(&mut self, count: usize) -> Vec<Handle> {
        self.children.drain(..count).collect()
    }

    /// Inserts `child` at `index` into this full node and returns the right half as a new
    /// sibling at the same height and under the same parent. Sizes are left to the caller.
    pub(crate) fn split_insert(&mut self, index: usize, child: Handle, order: usize) -> InternalNode {
        let children = split_insert(&mut self.children, index, child, order);
        InternalNode {
            parent: self.parent,
            height: self.height,
            size: 0,
            children,
        }
    }
}

impl<T> LeafNode<T> {
    /// Creates a new empty leaf node.
    pub(crate) fn new(order: usize, parent: Option<Handle>) -> Self {
        Self {
            parent,
            values: Vec::with_capacity(order),
        }
    }

    pub(crate) fn parent(&self) -> Option<Handle> {
        self.parent
    }

    pub(crate) fn len(&self) -> usize {
        self.values.len()
    }

    #[inline]
    pub(crate) fn value(&self, index: usize) -> &T {
        &self.values[index]
    }

    #[inline]
    pub(crate) fn value_mut(&mut self, index: usize) -> &mut T {
        &mut self.values[index]
    }

    pub(crate) fn values(&self) -> &[T] {
        &self.values
    }

    pub(crate) fn first(&self) -> Option<&T> {
        self.values.first()
    }

    pub(crate) fn last(&self) -> Option<&T> {
        self.values.last()
    }

    pub(crate) fn insert(&mut self, index: usize, value: T) {
        self.values.insert(index, value);
    }

    pub(crate) fn remove(&mut self, index: usize) -> T {
        self.values.remove(index)
    }

    /// Appends values from `source` until the leaf holds `order` values.
    /// Returns how many were placed.
    pub(crate) fn fill_from<I: Iterator<Item = T>>(&mut self, source: &mut I, order: usize) -> usize {
        let before = self.values.len();
        self.values.extend(source.by_ref().take(order - before));
        self.values.len() - before
    }

    /// Moves the last `count` values out, in order.
    pub(crate) fn drain_tail(&mut self, count: usize) -> Vec<T> {
        let at = self.values.len() - count;
        self.values.drain(at..).collect()
    }

    /// Puts `values` in front of the existing ones.
    pub(crate) fn prepend(&mut self, values: Vec<T>) {
        self.values.splice(0..0, values);
    }

    pub(crate) fn append(&mut self, mut values: Vec<T>) {
        self.values.append(&mut values);
    }

    /// Moves the first `count` values out, in order.
    pub(crate) fn drain_head(&mut self, count: usize) -> Vec<T> {
        self.values.drain(..count).collect()
    }

    /// Takes all values out, leaving the leaf empty.
    pub(crate) fn take_values(&mut self) -> Vec<T> {
        core::mem::take(&mut self.values)
    }

    /// Inserts `value` at `index` into this full leaf and returns the right half as a new
    /// sibling under the same parent.
    pub(crate) fn split_insert(&mut self, index: usize, value: T, order: usize) -> LeafNode<T> {
        let values = split_insert(&mut self.values, index, value, order);
        LeafNode {
            parent: self.parent,
            values,
        }
    }
}

impl<T: Clone> LeafNode<T> {
    /// Copies this leaf with room for `order` values, attached to `parent`.
    pub(crate) fn duplicate(&self, order: usize, parent: Option<Handle>) -> Self {
        let mut values = Vec::with_capacity(order);
        values.extend_from_slice(&self.values);
        LeafNode { parent, values }
    }
}

impl InternalNode {
    /// Copies this node's height and size with an empty child list, attached to `parent`.
    pub(crate) fn duplicate_shell(&self, order: usize, parent: Option<Handle>) -> Self {
        InternalNode {
            parent,
            height: self.height,
            size: self.size,
            children: Vec::with_capacity(order),
        }
    }
}
