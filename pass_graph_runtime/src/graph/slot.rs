/// Slots: named connection points for data dependencies.
///
/// An output slot fans out to any number of input slots. An input slot
/// has at most one upstream output; connecting it again replaces the
/// previous upstream.

use super::node::NodeKey;

/// Direction of a slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SlotDirection {
    Input,
    Output,
}

/// Kind of value carried by a slot (informational, not checked on connect)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SlotType {
    Texture,
    Material,
}

/// Static slot declaration of a node kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotLayout {
    pub name: &'static str,
    pub direction: SlotDirection,
    pub value_type: SlotType,
}

impl SlotLayout {
    pub const fn input(name: &'static str, value_type: SlotType) -> Self {
        Self { name, direction: SlotDirection::Input, value_type }
    }

    pub const fn output(name: &'static str, value_type: SlotType) -> Self {
        Self { name, direction: SlotDirection::Output, value_type }
    }
}

/// Reference to a slot: owning node + slot index within that node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SlotRef {
    pub node: NodeKey,
    pub slot: usize,
}

/// A slot instance owned by a node of the graph
#[derive(Debug, Clone)]
pub struct Slot {
    owner: NodeKey,
    layout: SlotLayout,
    /// Downstream input slots (output slots only)
    links: Vec<SlotRef>,
    /// Upstream output slot (input slots only)
    upstream: Option<SlotRef>,
}

impl Slot {
    pub(crate) fn new(owner: NodeKey, layout: SlotLayout) -> Self {
        Self {
            owner,
            layout,
            links: Vec::new(),
            upstream: None,
        }
    }

    /// Key of the node owning this slot
    pub fn owner(&self) -> NodeKey {
        self.owner
    }

    pub fn name(&self) -> &'static str {
        self.layout.name
    }

    pub fn direction(&self) -> SlotDirection {
        self.layout.direction
    }

    pub fn value_type(&self) -> SlotType {
        self.layout.value_type
    }

    /// Input slots fed by this output slot, in connection order
    pub fn links(&self) -> &[SlotRef] {
        &self.links
    }

    /// Output slot feeding this input slot
    pub fn upstream(&self) -> Option<SlotRef> {
        self.upstream
    }

    /// Add a downstream input (no-op if already linked)
    pub(crate) fn add_link(&mut self, input: SlotRef) {
        if !self.links.contains(&input) {
            self.links.push(input);
        }
    }

    pub(crate) fn remove_link(&mut self, input: SlotRef) {
        self.links.retain(|link| *link != input);
    }

    /// Set the upstream output, returning the one it replaces
    pub(crate) fn set_upstream(&mut self, output: SlotRef) -> Option<SlotRef> {
        self.upstream.replace(output)
    }
}
