use crate::{errors::TupleError, handle::Handle, node::Node};
use std::collections::HashMap;
use tracing::trace;

/// A doubly linked chain of [`Node`]s with head/tail anchors.
///
/// Nodes live in an arena keyed by slot id and link to each other by id, so
/// detaching a node can never leave a dangling neighbor behind.
#[derive(Debug)]
pub struct Sequence {
    nodes: HashMap<usize, Node>,
    next_id: usize,
    head: Option<usize>,
    tail: Option<usize>,
    len: usize,
}

/// Iterator over values in order.
pub struct Iter<'a> {
    list: &'a Sequence,
    cursor: Option<usize>,
    remaining: usize,
}

/// Iterator over `(Handle, value)` in order.
pub struct IterHandles<'a> {
    list: &'a Sequence,
    cursor: Option<usize>,
    remaining: usize,
}

impl Default for Sequence {
    fn default() -> Self {
        Self::new()
    }
}

impl Sequence {
    pub fn new() -> Self {
        Self {
            nodes: HashMap::new(),
            next_id: 0,
            head: None,
            tail: None,
            len: 0,
        }
    }

    /// Number of linked nodes.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn front(&self) -> Option<Handle> {
        self.head.map(Handle)
    }

    pub fn back(&self) -> Option<Handle> {
        self.tail.map(Handle)
    }

    /// Resolve a handle to its node (if still linked).
    pub fn get(&self, h: Handle) -> Option<&Node> {
        self.nodes.get(&h.0)
    }

    /// Handle of the node at zero-based `index`, walking forward from head.
    pub fn node_at(&self, index: usize) -> Option<Handle> {
        if index >= self.len {
            return None;
        }
        let mut cur = self.head?;
        for _ in 0..index {
            cur = self.nodes.get(&cur)?.next?;
        }
        Some(Handle(cur))
    }

    /// Append `node` as the new tail.
    pub fn push_back(&mut self, node: Node) -> Handle {
        let id = self.alloc(node);
        match self.tail {
            Some(old_tail) => {
                self.set_next(old_tail, Some(id));
                self.set_prev(id, Some(old_tail));
            }
            None => self.head = Some(id),
        }
        self.tail = Some(id);
        self.len += 1;
        trace!(slot = id, len = self.len, "appended node");
        Handle(id)
    }

    /// Insert `node` so that it ends up at position `index`.
    ///
    /// Valid for `0 <= index <= len`; anything else is rejected without
    /// touching the chain.
    pub fn insert_at(&mut self, node: Node, index: usize) -> Result<Handle, TupleError> {
        if index == self.len {
            return Ok(self.push_back(node));
        }
        let right = self
            .node_at(index)
            .ok_or(TupleError::InvalidIndex {
                index,
                len: self.len,
            })?
            .0;
        let left = self.nodes.get(&right).and_then(|n| n.prev);

        let id = self.alloc(node);
        match left {
            Some(left) => {
                self.set_next(left, Some(id));
                self.set_prev(id, Some(left));
            }
            None => self.head = Some(id),
        }
        self.set_next(id, Some(right));
        self.set_prev(right, Some(id));
        self.len += 1;

        trace!(slot = id, index, len = self.len, "spliced node");
        Ok(Handle(id))
    }

    /// Detach the node at `index` and hand it back unlinked.
    pub fn remove_at(&mut self, index: usize) -> Option<Node> {
        let h = self.node_at(index)?;
        self.detach(h)
    }

    /// Detach a node by handle, splicing its neighbors together.
    pub fn detach(&mut self, h: Handle) -> Option<Node> {
        let mut node = self.nodes.remove(&h.0)?;

        match node.prev {
            Some(p) => self.set_next(p, node.next),
            None => self.head = node.next,
        }
        match node.next {
            Some(n) => self.set_prev(n, node.prev),
            None => self.tail = node.prev,
        }
        node.prev = None;
        node.next = None;
        self.len -= 1;

        debug_assert_eq!(self.head.is_none(), self.tail.is_none());
        debug_assert_eq!(self.head.is_none(), self.len == 0);
        trace!(slot = h.0, len = self.len, "detached node");
        Some(node)
    }

    /// Iterate values from head to tail.
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            list: self,
            cursor: self.head,
            remaining: self.len,
        }
    }

    /// Iterate `(Handle, value)` from head to tail.
    pub fn iter_handles(&self) -> IterHandles<'_> {
        IterHandles {
            list: self,
            cursor: self.head,
            remaining: self.len,
        }
    }

    fn alloc(&mut self, node: Node) -> usize {
        debug_assert!(node.is_detached(), "node is still linked elsewhere");
        let id = self.next_id;
        self.next_id += 1;
        self.nodes.insert(id, node);
        id
    }

    fn set_next(&mut self, id: usize, next: Option<usize>) {
        debug_assert!(self.nodes.contains_key(&id), "linking a missing slot");
        if let Some(node) = self.nodes.get_mut(&id) {
            node.next = next;
        }
    }

    fn set_prev(&mut self, id: usize, prev: Option<usize>) {
        debug_assert!(self.nodes.contains_key(&id), "linking a missing slot");
        if let Some(node) = self.nodes.get_mut(&id) {
            node.prev = prev;
        }
    }

    /// Panics unless every structural invariant of the chain holds.
    #[cfg(test)]
    pub(crate) fn assert_invariants(&self) {
        assert_eq!(self.head.is_none(), self.tail.is_none(), "head/tail agreement");
        assert_eq!(self.head.is_none(), self.len == 0, "empty iff no anchors");
        assert_eq!(self.nodes.len(), self.len, "no leaked slots");

        if let Some(h) = self.head {
            assert_eq!(self.nodes[&h].prev, None, "head has no predecessor");
        }
        if let Some(t) = self.tail {
            assert_eq!(self.nodes[&t].next, None, "tail has no successor");
        }

        let mut forward = Vec::with_capacity(self.len);
        let mut cur = self.head;
        while let Some(id) = cur {
            assert!(forward.len() < self.len, "forward walk longer than len");
            let node = &self.nodes[&id];
            if let Some(n) = node.next {
                assert_eq!(self.nodes[&n].prev, Some(id), "links are symmetric");
            }
            forward.push(id);
            cur = node.next;
        }
        assert_eq!(forward.len(), self.len);
        assert_eq!(forward.last().copied(), self.tail);

        let mut backward = Vec::with_capacity(self.len);
        let mut cur = self.tail;
        while let Some(id) = cur {
            assert!(backward.len() < self.len, "backward walk longer than len");
            backward.push(id);
            cur = self.nodes[&id].prev;
        }
        backward.reverse();
        assert_eq!(forward, backward, "bidirectional traversal symmetry");
    }
}

impl<'a> Iterator for Iter<'a> {
    type Item = i32;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.cursor?;
        let node = self.list.nodes.get(&id)?;
        self.cursor = node.next;
        self.remaining = self.remaining.saturating_sub(1);
        Some(node.value())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for Iter<'_> {}

impl<'a> Iterator for IterHandles<'a> {
    type Item = (Handle, i32);

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.cursor?;
        let node = self.list.nodes.get(&id)?;
        self.cursor = node.next;
        self.remaining = self.remaining.saturating_sub(1);
        Some((Handle(id), node.value()))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for IterHandles<'_> {}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn seq(values: &[i32]) -> Sequence {
        let mut s = Sequence::new();
        for &v in values {
            s.push_back(Node::new(v).unwrap());
        }
        s.assert_invariants();
        s
    }

    fn values(s: &Sequence) -> Vec<i32> {
        s.iter().collect()
    }

    #[test]
    fn node_at_walks_from_head() {
        let s = seq(&[10, 20, 30]);
        let h = s.node_at(2).unwrap();
        assert_eq!(s.get(h).map(Node::value), Some(30));
        assert_eq!(s.node_at(0), s.front());
        assert_eq!(s.node_at(2), s.back());
        assert!(s.node_at(3).is_none());
        assert!(Sequence::new().node_at(0).is_none());
    }

    #[test]
    fn remove_sole_element_empties_chain() {
        let mut s = seq(&[7]);
        let node = s.remove_at(0).unwrap();
        assert_eq!(node.value(), 7);
        assert!(node.is_detached());
        assert!(s.is_empty());
        assert!(s.front().is_none() && s.back().is_none());
        s.assert_invariants();
    }

    #[test]
    fn remove_head_tail_and_interior() {
        let mut s = seq(&[1, 2, 3, 4, 5]);

        assert_eq!(s.remove_at(0).map(|n| n.value()), Some(1));
        s.assert_invariants();
        assert_eq!(values(&s), vec![2, 3, 4, 5]);

        assert_eq!(s.remove_at(3).map(|n| n.value()), Some(5));
        s.assert_invariants();
        assert_eq!(values(&s), vec![2, 3, 4]);

        assert_eq!(s.remove_at(1).map(|n| n.value()), Some(3));
        s.assert_invariants();
        assert_eq!(values(&s), vec![2, 4]);
        assert_eq!(s.len(), 2);
    }

    #[test]
    fn remove_out_of_range_is_noop() {
        let mut s = seq(&[1, 2]);
        assert!(s.remove_at(2).is_none());
        assert!(Sequence::new().remove_at(0).is_none());
        assert_eq!(values(&s), vec![1, 2]);
        s.assert_invariants();
    }

    #[test]
    fn insert_at_head_tail_and_between() {
        let mut s = Sequence::new();
        s.insert_at(Node::new(2).unwrap(), 0).unwrap();
        s.assert_invariants();
        s.insert_at(Node::new(1).unwrap(), 0).unwrap();
        s.assert_invariants();
        s.insert_at(Node::new(4).unwrap(), 2).unwrap();
        s.assert_invariants();
        s.insert_at(Node::new(3).unwrap(), 2).unwrap();
        s.assert_invariants();

        assert_eq!(values(&s), vec![1, 2, 3, 4]);
        assert_eq!(s.get(s.front().unwrap()).map(Node::value), Some(1));
        assert_eq!(s.get(s.back().unwrap()).map(Node::value), Some(4));
    }

    #[test]
    fn insert_past_end_is_rejected() {
        let mut s = seq(&[1, 2]);
        let err = s.insert_at(Node::new(9).unwrap(), 3).unwrap_err();
        assert_eq!(err, TupleError::InvalidIndex { index: 3, len: 2 });
        assert_eq!(values(&s), vec![1, 2]);
        s.assert_invariants();
    }

    #[test]
    fn detached_node_can_be_reinserted() {
        let mut s = seq(&[1, 2, 3]);
        let old = s.node_at(0).unwrap();
        let node = s.remove_at(0).unwrap();
        assert!(s.get(old).is_none());

        let new = s.insert_at(node, 2).unwrap();
        assert_ne!(old.as_raw(), new.as_raw());
        assert_eq!(values(&s), vec![2, 3, 1]);
        s.assert_invariants();
    }

    #[test]
    fn handles_iterate_in_order() {
        let s = seq(&[5, 6]);
        let got: Vec<_> = s.iter_handles().map(|(h, v)| (s.get(h).unwrap().value(), v)).collect();
        assert_eq!(got, vec![(5, 5), (6, 6)]);
        assert_eq!(s.iter().len(), 2);
    }
}
