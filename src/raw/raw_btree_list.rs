use alloc::string::String;
use alloc::vec;
use alloc::vec::Vec;

use super::arena::Arena;
use super::cursor::LeafCursor;
use super::handle::Handle;
use super::node::{Adjust, InternalNode, Node};
use crate::Error;

/// The core implicit-key B-tree backing `BTreeList`.
///
/// Positions are never stored. Every node caches the number of values below it and a
/// lookup walks down subtracting child sizes until the remaining offset falls inside one.
pub(crate) struct RawBTreeList<T> {
    /// Arena storing all tree nodes.
    nodes: Arena<Node<T>>,
    /// Handle to the root node. An empty tree is a single empty leaf.
    root: Handle,
    /// Maximum number of slots in any node.
    order: usize,
}

impl<T> RawBTreeList<T> {
    /// Creates a new, empty tree. The caller guarantees `order >= 2`.
    pub(crate) fn new(order: usize) -> Self {
        debug_assert!(order >= 2, "tree order must be at least 2");
        let mut nodes = Arena::new();
        let root = nodes.alloc(Node::new_leaf(order, None));
        Self { nodes, root, order }
    }

    pub(crate) const fn order(&self) -> usize {
        self.order
    }

    /// The fewest slots a non-root node may hold.
    pub(crate) const fn min_occupancy(&self) -> usize {
        self.order.div_ceil(2)
    }

    /// Returns the number of values in the tree.
    pub(crate) fn len(&self) -> usize {
        self.nodes.get(self.root).size()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns 0 while the root is a leaf.
    pub(crate) fn height(&self) -> usize {
        self.nodes.get(self.root).height()
    }

    pub(crate) fn root(&self) -> Handle {
        self.root
    }

    pub(crate) fn node(&self, handle: Handle) -> &Node<T> {
        self.nodes.get(handle)
    }

    /// Drops every node and starts over with a single empty leaf.
    pub(crate) fn clear(&mut self) {
        self.nodes.clear();
        self.root = self.nodes.alloc(Node::new_leaf(self.order, None));
    }

    /// Picks the child of `internal` covering `offset` and the offset inside that child.
    /// The last child takes whatever remains.
    fn locate_child(&self, internal: &InternalNode, mut offset: usize) -> (Handle, usize) {
        let last = internal.child_count() - 1;
        for &child in &internal.children()[..last] {
            let size = self.nodes.get(child).size();
            if offset < size {
                return (child, offset);
            }
            offset -= size;
        }
        (internal.child(last), offset)
    }

    /// Returns the leaf holding position `index` and the offset inside it.
    fn find(&self, index: usize) -> (Handle, usize) {
        let mut current = self.root;
        let mut offset = index;
        while let Node::Internal(internal) = self.nodes.get(current) {
            (current, offset) = self.locate_child(internal, offset);
        }
        (current, offset)
    }

    /// Like [`find`](Self::find), but applies `adjust` to every internal node on the way
    /// down. Only valid when the insertion or removal that follows cannot fail.
    fn find_adjusting(&mut self, index: usize, adjust: Adjust) -> (Handle, usize) {
        let mut current = self.root;
        let mut offset = index;
        loop {
            match self.nodes.get_mut(current) {
                Node::Internal(internal) => internal.adjust(adjust),
                Node::Leaf(_) => return (current, offset),
            }
            (current, offset) = self.locate_child(self.nodes.get(current).as_internal(), offset);
        }
    }

    fn first_leaf(&self) -> Handle {
        let mut current = self.root;
        while let Node::Internal(internal) = self.nodes.get(current) {
            current = internal.first_child();
        }
        current
    }

    fn last_leaf(&self) -> Handle {
        let mut current = self.root;
        while let Node::Internal(internal) = self.nodes.get(current) {
            current = internal.last_child();
        }
        current
    }

    /// Returns the value at `index`.
    pub(crate) fn get(&self, index: usize) -> Option<&T> {
        if index >= self.len() {
            return None;
        }
        let (leaf, offset) = self.find(index);
        Some(self.nodes.get(leaf).as_leaf().value(offset))
    }

    /// Returns the value at `index` mutably.
    pub(crate) fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        if index >= self.len() {
            return None;
        }
        let (leaf, offset) = self.find(index);
        Some(self.nodes.get_mut(leaf).as_leaf_mut().value_mut(offset))
    }

    pub(crate) fn first(&self) -> Option<&T> {
        self.nodes.get(self.first_leaf()).as_leaf().first()
    }

    pub(crate) fn last(&self) -> Option<&T> {
        self.nodes.get(self.last_leaf()).as_leaf().last()
    }

    /// Inserts `value` so that it ends up at position `index`.
    /// The caller guarantees `index <= len`.
    pub(crate) fn insert(&mut self, index: usize, value: T) {
        debug_assert!(index <= self.len(), "insert position out of range");
        let (leaf, offset) = self.find_adjusting(index, Adjust::Grow);
        self.insert_into_leaf(leaf, offset, value);
    }

    /// Appends `value`, walking the right spine instead of searching by position.
    pub(crate) fn push(&mut self, value: T) {
        let mut current = self.root;
        while let Node::Internal(internal) = self.nodes.get_mut(current) {
            internal.adjust(Adjust::Grow);
            current = internal.last_child();
        }
        let offset = self.nodes.get(current).used();
        self.insert_into_leaf(current, offset, value);
    }

    fn insert_into_leaf(&mut self, leaf_handle: Handle, offset: usize, value: T) {
        let order = self.order;
        let leaf = self.nodes.get_mut(leaf_handle).as_leaf_mut();
        if leaf.len() < order {
            leaf.insert(offset, value);
            return;
        }

        let right = leaf.split_insert(offset, value, order);
        let right_handle = self.nodes.alloc(Node::Leaf(right));
        trace_log!(leaf = ?leaf_handle, sibling = ?right_handle, "split full leaf");
        self.propagate_split(leaf_handle, right_handle);
    }

    /// Links `overflow` in as the right sibling of `node`, splitting full ancestors on the
    /// way up. Ancestor sizes already include the inserted value.
    fn propagate_split(&mut self, mut node: Handle, mut overflow: Handle) {
        let order = self.order;
        while let Some(parent_handle) = self.nodes.get(node).parent() {
            let parent = self.nodes.get_mut(parent_handle).as_internal_mut();
            let index = parent.index_of(node) + 1;
            if parent.child_count() < order {
                parent.insert_child(index, overflow);
                self.nodes.get_mut(overflow).set_parent(Some(parent_handle));
                return;
            }

            let right = parent.split_insert(index, overflow, order);
            let right_handle = self.nodes.alloc(Node::Internal(right));
            self.adopt_children(parent_handle);
            self.adopt_children(right_handle);
            trace_log!(node = ?parent_handle, sibling = ?right_handle, "split full internal node");

            node = parent_handle;
            overflow = right_handle;
        }
        self.grow_root(node, overflow);
    }

    /// Creates a new root above `left` and `right`, one level higher.
    fn grow_root(&mut self, left: Handle, right: Handle) {
        let height = self.nodes.get(left).height() + 1;
        let mut root = InternalNode::new(self.order, height, None);
        root.push_child(left);
        root.push_child(right);
        root.set_size(self.nodes.get(left).size() + self.nodes.get(right).size());

        let root_handle = self.nodes.alloc(Node::Internal(root));
        self.nodes.get_mut(left).set_parent(Some(root_handle));
        self.nodes.get_mut(right).set_parent(Some(root_handle));
        self.root = root_handle;
        debug_log!(height, root = ?root_handle, "tree grew a level");
    }

    /// Points every child of `handle` back at it and recomputes its size from theirs.
    fn adopt_children(&mut self, handle: Handle) {
        let count = self.nodes.get(handle).used();
        let mut size = 0;
        for index in 0..count {
            let child = self.nodes.get(handle).as_internal().child(index);
            let node = self.nodes.get_mut(child);
            node.set_parent(Some(handle));
            size += node.size();
        }
        self.nodes.get_mut(handle).as_internal_mut().set_size(size);
    }

    /// Sets the parent of every handle in `children`. Returns their combined size.
    fn reparent(&mut self, children: &[Handle], parent: Handle) -> usize {
        children.iter().fold(0, |size, &child| {
            let node = self.nodes.get_mut(child);
            node.set_parent(Some(parent));
            size + node.size()
        })
    }

    /// Removes and returns the value at `index`. The caller guarantees `index < len`.
    pub(crate) fn remove(&mut self, index: usize) -> T {
        debug_assert!(index < self.len(), "remove index out of range");
        let (leaf, offset) = self.find_adjusting(index, Adjust::Shrink);
        let value = self.nodes.get_mut(leaf).as_leaf_mut().remove(offset);
        self.rebalance(leaf);
        value
    }

    /// Restores minimum occupancy from `node` upward after it lost one slot.
    ///
    /// An underfull node borrows one entry from a sibling that can spare it; otherwise it
    /// is merged into a sibling and its parent, which lost a child, is checked next.
    fn rebalance(&mut self, mut node: Handle) {
        let min = self.min_occupancy();
        loop {
            let current = self.nodes.get(node);
            let Some(parent_handle) = current.parent() else {
                break;
            };
            let used = current.used();
            if used >= min {
                return;
            }

            let parent = self.nodes.get(parent_handle).as_internal();
            let index = parent.index_of(node);
            let left = index.checked_sub(1).map(|i| parent.child(i));
            let right = (index + 1 < parent.child_count()).then(|| parent.child(index + 1));

            if let Some(left) = left
                && self.nodes.get(left).used() > min
            {
                self.shift_right(left, node, 1);
                trace_log!(node = ?node, from = ?left, "borrowed from left sibling");
                return;
            }
            if let Some(right) = right
                && self.nodes.get(right).used() > min
            {
                self.shift_left(right, node, 1);
                trace_log!(node = ?node, from = ?right, "borrowed from right sibling");
                return;
            }

            match (left, right) {
                (Some(left), _) => self.shift_left(node, left, used),
                (None, Some(right)) => self.shift_right(node, right, used),
                // Only child of a one-child parent; possible when `order == 2`.
                (None, None) => debug_assert_eq!(used, 0, "an only child below minimum must be empty"),
            }
            self.nodes.get_mut(parent_handle).as_internal_mut().remove_child(index);
            self.nodes.free(node);
            trace_log!(node = ?node, parent = ?parent_handle, "merged underfull node");
            node = parent_handle;
        }
        self.collapse_root();
    }

    /// Replaces an internal root that has a single child by that child.
    fn collapse_root(&mut self) {
        while let Node::Internal(internal) = self.nodes.get(self.root) {
            if internal.child_count() != 1 {
                break;
            }
            let child = internal.first_child();
            self.nodes.free(self.root);
            self.nodes.get_mut(child).set_parent(None);
            self.root = child;
            debug_log!(height = self.height(), "tree lost a level");
        }
    }

    /// Moves the last `count` entries of `from` to the front of its right neighbour `to`.
    fn shift_right(&mut self, from: Handle, to: Handle, count: usize) {
        debug_assert!(self.nodes.get(to).used() + count <= self.order, "move would overfill node");
        if self.nodes.get(from).is_leaf() {
            let moved = self.nodes.get_mut(from).as_leaf_mut().drain_tail(count);
            self.nodes.get_mut(to).as_leaf_mut().prepend(moved);
        } else {
            let moved = self.nodes.get_mut(from).as_internal_mut().drain_tail(count);
            let size = self.reparent(&moved, to);
            self.nodes.get_mut(from).as_internal_mut().sub_size(size);
            let target = self.nodes.get_mut(to).as_internal_mut();
            target.prepend_children(&moved);
            target.add_size(size);
        }
    }

    /// Moves the first `count` entries of `from` to the back of its left neighbour `to`.
    fn shift_left(&mut self, from: Handle, to: Handle, count: usize) {
        debug_assert!(self.nodes.get(to).used() + count <= self.order, "move would overfill node");
        if self.nodes.get(from).is_leaf() {
            let moved = self.nodes.get_mut(from).as_leaf_mut().drain_head(count);
            self.nodes.get_mut(to).as_leaf_mut().append(moved);
        } else {
            let moved = self.nodes.get_mut(from).as_internal_mut().drain_head(count);
            let size = self.reparent(&moved, to);
            self.nodes.get_mut(from).as_internal_mut().sub_size(size);
            let target = self.nodes.get_mut(to).as_internal_mut();
            target.append_children(&moved);
            target.add_size(size);
        }
    }

    /// Appends every value of `values` at the end.
    ///
    /// Leaves on the right spine are filled to capacity directly and new leaves are linked
    /// without any splitting, which leaves at most the right spine underfull; a final pass
    /// repairs it.
    pub(crate) fn append_all<I: IntoIterator<Item = T>>(&mut self, values: I) {
        let order = self.order;
        let mut values = values.into_iter().peekable();
        let mut leaf = self.last_leaf();
        let mut appended = 0;

        while values.peek().is_some() {
            if self.nodes.get(leaf).used() == order {
                leaf = self.link_leaf_after(leaf);
            }
            let placed = self.nodes.get_mut(leaf).as_leaf_mut().fill_from(&mut values, order);
            self.grow_ancestors(leaf, placed);
            appended += placed;
        }

        if appended > 0 {
            debug_log!(appended, len = self.len(), "bulk append");
            self.repair_right_spine();
        }
    }

    /// Allocates an empty leaf and links it as the new rightmost leaf after `last`.
    ///
    /// The leaf goes under the nearest ancestor on the right spine with a free slot. Every
    /// full ancestor passed on the way gets a fresh single-child parent for the new leaf,
    /// and if the whole spine is full the tree grows a new root.
    fn link_leaf_after(&mut self, last: Handle) -> Handle {
        let order = self.order;
        let leaf = self.nodes.alloc(Node::new_leaf(order, None));
        let mut link = leaf;
        let mut parent = self.nodes.get(last).parent();
        while let Some(handle) = parent {
            if self.nodes.get(handle).used() < order {
                break;
            }
            parent = self.nodes.get(handle).parent();
            link = self.wrap_in_parent(link);
        }

        if let Some(handle) = parent {
            self.nodes.get_mut(handle).as_internal_mut().push_child(link);
            self.nodes.get_mut(link).set_parent(Some(handle));
        } else {
            let root = self.root;
            self.grow_root(root, link);
        }
        leaf
    }

    fn wrap_in_parent(&mut self, child: Handle) -> Handle {
        let node = self.nodes.get(child);
        let mut parent = InternalNode::new(self.order, node.height() + 1, None);
        parent.set_size(node.size());
        parent.push_child(child);
        let handle = self.nodes.alloc(Node::Internal(parent));
        self.nodes.get_mut(child).set_parent(Some(handle));
        handle
    }

    fn grow_ancestors(&mut self, node: Handle, delta: usize) {
        let mut parent = self.nodes.get(node).parent();
        while let Some(handle) = parent {
            let internal = self.nodes.get_mut(handle).as_internal_mut();
            internal.add_size(delta);
            parent = internal.parent();
        }
    }

    /// Tops up every underfull node on the right spine from its left sibling.
    ///
    /// The left sibling of a spine node created by bulk append was full when the node was
    /// linked, so it can always spare the difference.
    fn repair_right_spine(&mut self) {
        let min = self.min_occupancy();
        let mut current = self.root;
        while let Node::Internal(internal) = self.nodes.get(current) {
            let count = internal.child_count();
            let last = internal.last_child();
            let used = self.nodes.get(last).used();
            if used < min {
                debug_assert!(count >= 2, "underfull spine node without a left sibling");
                let before = internal.child(count - 2);
                self.shift_right(before, last, min - used);
                trace_log!(node = ?last, from = ?before, moved = min - used, "repaired right spine");
            }
            current = last;
        }
    }

    /// Calls `f` with the values of every leaf, in position order.
    pub(crate) fn for_each_slice<'a, F: FnMut(&'a [T])>(&'a self, mut f: F) {
        let mut leaves = LeafCursor::new(self);
        while let Some(values) = leaves.next_leaf() {
            f(values);
        }
    }

    /// Moves every value out in position order.
    pub(crate) fn into_vec(mut self) -> Vec<T> {
        let mut leaves = Vec::new();
        let mut cursor = LeafCursor::new(&self);
        while let Some(handle) = cursor.next_leaf_handle() {
            leaves.push(handle);
        }

        let mut values = Vec::with_capacity(self.len());
        for handle in leaves {
            values.append(&mut self.nodes.get_mut(handle).as_leaf_mut().take_values());
        }
        values
    }

    fn duplicate(&self, handle: Handle, parent: Option<Handle>) -> Node<T>
    where
        T: Clone,
    {
        match self.nodes.get(handle) {
            Node::Leaf(leaf) => Node::Leaf(leaf.duplicate(self.order, parent)),
            Node::Internal(internal) => Node::Internal(internal.duplicate_shell(self.order, parent)),
        }
    }

    /// Checks every structural invariant, collecting a description of each violation.
    pub(crate) fn validate(&self) -> Result<(), Error> {
        let mut errors: Vec<String> = Vec::new();
        let min = self.min_occupancy();
        let root = self.nodes.get(self.root);

        if root.parent().is_some() {
            errors.push(alloc::format!("root {:?} has a parent {:?}", self.root, root.parent()));
        }
        if let Node::Internal(internal) = root
            && internal.child_count() < 2
        {
            errors.push(alloc::format!("internal root has {} children, needs at least 2", internal.child_count()));
        }

        let mut reachable = 0;
        let mut values = 0;
        let mut pending = vec![self.root];
        while let Some(handle) = pending.pop() {
            reachable += 1;
            let node = self.nodes.get(handle);
            let used = node.used();
            if used > self.order {
                errors.push(alloc::format!("node {handle:?} holds {used} slots, order is {}", self.order));
            }
            if handle != self.root && used < min {
                errors.push(alloc::format!("node {handle:?} holds {used} slots, minimum is {min}"));
            }

            let internal = match node {
                Node::Leaf(leaf) => {
                    values += leaf.len();
                    continue;
                }
                Node::Internal(internal) => internal,
            };

            let mut size = 0;
            for &child in internal.children() {
                let child_node = self.nodes.get(child);
                if child_node.parent() != Some(handle) {
                    errors.push(alloc::format!(
                        "node {child:?} has parent {:?}, but is a child of {handle:?}",
                        child_node.parent()
                    ));
                }
                if child_node.height() + 1 != internal.height() {
                    errors.push(alloc::format!(
                        "node {child:?} has height {}, but its parent {handle:?} has height {}",
                        child_node.height(),
                        internal.height()
                    ));
                    // Heights must strictly decrease for the walk to terminate.
                    continue;
                }
                size += child_node.size();
                pending.push(child);
            }
            if size != internal.size() {
                errors.push(alloc::format!(
                    "node {handle:?} caches size {}, its children hold {size}",
                    internal.size()
                ));
            }
        }

        if values != self.len() {
            errors.push(alloc::format!("root size is {}, leaves hold {values}", self.len()));
        }
        if reachable != self.nodes.len() {
            errors.push(alloc::format!("{} nodes allocated, {reachable} reachable", self.nodes.len()));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(Error::InvariantViolation(errors.join("\n")))
        }
    }
}

impl<T: Clone> Clone for RawBTreeList<T> {
    /// Copies every node with an explicit stack, so deep trees cannot exhaust the call stack.
    fn clone(&self) -> Self {
        let mut nodes = Arena::with_capacity(self.nodes.len());
        let root = nodes.alloc(self.duplicate(self.root, None));
        let mut pending = vec![(self.root, root)];

        while let Some((source, target)) = pending.pop() {
            let Node::Internal(internal) = self.nodes.get(source) else {
                continue;
            };
            for &child in internal.children() {
                let copy = nodes.alloc(self.duplicate(child, Some(target)));
                nodes.get_mut(target).as_internal_mut().push_child(copy);
                pending.push((child, copy));
            }
        }

        Self {
            nodes,
            root,
            order: self.order,
        }
    }
}
