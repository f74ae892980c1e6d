use crate::errors::TupleError;

/// One element of the chain: a natural number plus links to its neighbors.
///
/// Links are slot ids in the owning [`Sequence`](crate::Sequence) and are only
/// rewritten by it. A node that is not part of a sequence has no links.
#[derive(Debug, PartialEq, Eq)]
pub struct Node {
    value: i32,
    pub(crate) prev: Option<usize>,
    pub(crate) next: Option<usize>,
}

impl Node {
    /// Builds a detached node. Fails for values `<= 0`.
    pub fn new(value: i32) -> Result<Self, TupleError> {
        if value <= 0 {
            return Err(TupleError::InvalidValue(value));
        }
        Ok(Self {
            value,
            prev: None,
            next: None,
        })
    }

    pub fn value(&self) -> i32 {
        self.value
    }

    /// Is this node unlinked on both sides?
    pub(crate) fn is_detached(&self) -> bool {
        self.prev.is_none() && self.next.is_none()
    }
}
