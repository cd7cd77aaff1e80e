/// Rendering backend seam.
///
/// The executor performs no rendering itself. For every pass of a frame it
/// calls the backend twice: once while preparing the frame (so the backend
/// can allocate the targets the pass declares) and once in pass order to
/// record the work.

use crate::description::NodeId;
use crate::error::PassGraphResult;
use crate::graph::{Node, NodeKind, PassGraph, ResourceDesc, SlotDirection};
use super::frame::FrameData;

/// Backend invoked by the executor for each pass of a frame
pub trait RenderBackend {
    /// Frame payload type this backend consumes
    type Frame: FrameData + ?Sized;

    /// Prepare `pass` (declare or allocate its resources)
    fn setup_pass(&mut self, pass: &PassContext<'_>, frame: &Self::Frame) -> PassGraphResult<()>;

    /// Record the work of `pass`
    fn execute_pass(&mut self, pass: &PassContext<'_>, frame: &Self::Frame) -> PassGraphResult<()>;
}

/// Resource bound to an input slot of a pass
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResourceBinding<'g> {
    /// Input slot name on the pass
    pub slot: &'static str,
    /// Node providing the resource
    pub node: NodeId,
    pub resource: &'g ResourceDesc,
}

/// A pass as seen by the backend
#[derive(Debug, Clone, Copy)]
pub struct PassContext<'g> {
    graph: &'g PassGraph,
    node: &'g Node,
}

impl<'g> PassContext<'g> {
    pub(crate) fn new(graph: &'g PassGraph, node: &'g Node) -> Self {
        Self { graph, node }
    }

    pub fn id(&self) -> NodeId {
        self.node.id()
    }

    pub fn kind(&self) -> NodeKind {
        self.node.kind()
    }

    pub fn node(&self) -> &'g Node {
        self.node
    }

    pub fn graph(&self) -> &'g PassGraph {
        self.graph
    }

    /// Resource feeding the input slot `slot_name`
    ///
    /// None if the slot does not exist, is not connected, or is fed by a
    /// node that is not a resource.
    pub fn input(&self, slot_name: &str) -> Option<ResourceBinding<'g>> {
        let (owner, _) = self.graph.upstream(self.node, slot_name)?;
        let slot = self
            .node
            .slots()
            .iter()
            .find(|slot| slot.name() == slot_name && slot.direction() == SlotDirection::Input)?;

        Some(ResourceBinding {
            slot: slot.name(),
            node: owner.id(),
            resource: owner.resource()?,
        })
    }

    /// Every connected input, in slot order
    pub fn inputs(&self) -> Vec<ResourceBinding<'g>> {
        self.node
            .slots()
            .iter()
            .filter(|slot| slot.direction() == SlotDirection::Input)
            .filter_map(|slot| self.input(slot.name()))
            .collect()
    }
}

#[cfg(test)]
#[path = "backend_tests.rs"]
mod tests;
