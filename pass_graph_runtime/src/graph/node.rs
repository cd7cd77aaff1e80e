/// Nodes of a pass graph.
///
/// Nodes live in the graph's arena and are addressed by `NodeKey` once the
/// graph is built. The `NodeId` from the description is kept for
/// diagnostics and host-side lookups.

use glam::Vec4;
use slotmap::new_key_type;
use crate::description::NodeId;
use super::registry::NodeKind;
use super::slot::{Slot, SlotDirection};

new_key_type! {
    /// Stable key of a node within a PassGraph.
    pub struct NodeKey;
}

/// Description of a resource provided by a resource node
#[derive(Debug, Clone, PartialEq)]
pub enum ResourceDesc {
    /// Named material asset
    Material { name: String },
    /// Copy of the camera color target taken after opaques
    CameraOpaqueTexture,
    /// The camera's own frame buffer
    FrameBuffer,
    /// Transient render target allocated for the frame
    TemporaryTarget(TemporaryTargetDesc),
}

/// Transient render target request
#[derive(Debug, Clone, PartialEq)]
pub struct TemporaryTargetDesc {
    pub name: String,
    /// None = camera pixel width
    pub width: Option<u32>,
    /// None = camera pixel height
    pub height: Option<u32>,
    pub clear_color: Option<Vec4>,
}

/// Two-way branch selecting one successor per frame
#[derive(Debug, Clone, PartialEq)]
pub struct ConditionalBranch {
    condition: String,
    true_pass: Option<NodeKey>,
    false_pass: Option<NodeKey>,
}

impl ConditionalBranch {
    pub(crate) fn new(condition: String) -> Self {
        Self {
            condition,
            true_pass: None,
            false_pass: None,
        }
    }

    /// Name of the frame condition deciding the branch
    pub fn condition(&self) -> &str {
        &self.condition
    }

    pub fn true_pass(&self) -> Option<NodeKey> {
        self.true_pass
    }

    pub fn false_pass(&self) -> Option<NodeKey> {
        self.false_pass
    }

    /// Successor taken for a given condition value
    pub fn select(&self, value: bool) -> Option<NodeKey> {
        if value { self.true_pass } else { self.false_pass }
    }

    pub(crate) fn set_target(&mut self, value: bool, target: NodeKey) {
        if value {
            self.true_pass = Some(target);
        } else {
            self.false_pass = Some(target);
        }
    }
}

/// Concrete behavior of a node
#[derive(Debug, Clone, PartialEq)]
pub enum NodeVariant {
    /// Traversal start; expanded but never yielded
    Root { next: Vec<NodeKey> },
    /// Unit of rendering work with ordered successors
    Pass { next: Vec<NodeKey> },
    /// Last pass of a control path
    Terminal,
    /// Control construct, replaced by one of its targets during traversal
    ConditionalBranch(ConditionalBranch),
    /// Data-only node
    Resource(ResourceDesc),
}

/// A node of the pass graph
#[derive(Debug, Clone)]
pub struct Node {
    key: NodeKey,
    id: NodeId,
    kind: NodeKind,
    slots: Vec<Slot>,
    variant: NodeVariant,
}

impl Node {
    pub(crate) fn new(key: NodeKey, id: NodeId, kind: NodeKind, variant: NodeVariant) -> Self {
        let slots = kind
            .slot_layout()
            .iter()
            .map(|layout| Slot::new(key, *layout))
            .collect();

        Self { key, id, kind, slots, variant }
    }

    pub fn key(&self) -> NodeKey {
        self.key
    }

    /// ID from the description this node was built from
    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    pub fn variant(&self) -> &NodeVariant {
        &self.variant
    }

    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    pub fn slot(&self, index: usize) -> Option<&Slot> {
        self.slots.get(index)
    }

    pub(crate) fn slot_mut(&mut self, index: usize) -> Option<&mut Slot> {
        self.slots.get_mut(index)
    }

    /// Find a slot by name and direction, returning its index
    pub fn query_slot(&self, name: &str, direction: SlotDirection) -> Option<usize> {
        self.slots
            .iter()
            .position(|slot| slot.name() == name && slot.direction() == direction)
    }

    pub fn is_root(&self) -> bool {
        matches!(self.variant, NodeVariant::Root { .. })
    }

    /// Passes, terminals and branches may be targets of control-flow edges
    pub fn is_pass_like(&self) -> bool {
        matches!(
            self.variant,
            NodeVariant::Pass { .. } | NodeVariant::Terminal | NodeVariant::ConditionalBranch(_)
        )
    }

    /// Root and passes own a successor list; terminals and resources do not
    pub fn has_successor_list(&self) -> bool {
        matches!(self.variant, NodeVariant::Root { .. } | NodeVariant::Pass { .. })
    }

    /// Control-flow successors (empty for nodes without a successor list)
    pub fn next(&self) -> &[NodeKey] {
        match &self.variant {
            NodeVariant::Root { next } | NodeVariant::Pass { next } => next.as_slice(),
            _ => &[],
        }
    }

    pub(crate) fn next_mut(&mut self) -> Option<&mut Vec<NodeKey>> {
        match &mut self.variant {
            NodeVariant::Root { next } | NodeVariant::Pass { next } => Some(next),
            _ => None,
        }
    }

    pub fn branch(&self) -> Option<&ConditionalBranch> {
        match &self.variant {
            NodeVariant::ConditionalBranch(branch) => Some(branch),
            _ => None,
        }
    }

    pub(crate) fn branch_mut(&mut self) -> Option<&mut ConditionalBranch> {
        match &mut self.variant {
            NodeVariant::ConditionalBranch(branch) => Some(branch),
            _ => None,
        }
    }

    pub fn resource(&self) -> Option<&ResourceDesc> {
        match &self.variant {
            NodeVariant::Resource(resource) => Some(resource),
            _ => None,
        }
    }
}
