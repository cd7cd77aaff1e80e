/// Data connection between two nodes.
///
/// A connection records a data dependency (which resource feeds which pass
/// input). It never affects the order passes run in. A side whose slot did
/// not resolve is kept as `None` so malformed edges stay visible.

use super::node::NodeKey;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Connection {
    /// Node owning the output slot
    pub left: NodeKey,
    /// Output slot index on `left`
    pub left_slot: Option<usize>,
    /// Node owning the input slot
    pub right: NodeKey,
    /// Input slot index on `right`
    pub right_slot: Option<usize>,
}

impl Connection {
    /// True if both slots resolved and the slots were linked
    pub fn is_linked(&self) -> bool {
        self.left_slot.is_some() && self.right_slot.is_some()
    }
}
