/// Stable id of a node slot inside a [`Sequence`](crate::Sequence).
///
/// A handle stays valid until its node is detached. Re-inserting a detached
/// node allocates a fresh slot, so the old handle is not revived.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Handle(pub(crate) usize);

impl Handle {
    /// Returns the raw numeric identifier for debugging or external maps.
    pub fn as_raw(&self) -> usize {
        self.0
    }
}
