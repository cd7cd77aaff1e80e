/// Pass graph: the runtime graph built from a description.
///
/// Owns every node in a slot map arena together with the realized data
/// connections. The graph is immutable once built; the per-frame pass
/// sequence is derived from it by `travel()`.

use rustc_hash::{FxHashMap, FxHashSet};
use slotmap::SlotMap;
use crate::description::NodeId;
use super::connection::Connection;
use super::node::{Node, NodeKey};
use super::slot::{Slot, SlotDirection};
use super::travel::{ConditionEvaluator, Travel};

/// A built pass graph
///
/// Passes can only be added through `GraphBuilder::build()`.
#[derive(Debug, Clone, Default)]
pub struct PassGraph {
    /// Node arena
    pub(crate) nodes: SlotMap<NodeKey, Node>,
    /// Description IDs of the instantiated nodes
    pub(crate) ids: FxHashMap<NodeId, NodeKey>,
    /// Traversal start (None for a graph without ExecRoot)
    pub(crate) root: Option<NodeKey>,
    /// Realized data connections
    pub(crate) connections: FxHashSet<Connection>,
}

impl PassGraph {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Get the root node
    pub fn root(&self) -> Option<&Node> {
        self.root.and_then(|key| self.nodes.get(key))
    }

    /// Get a node by key
    pub fn node(&self, key: NodeKey) -> Option<&Node> {
        self.nodes.get(key)
    }

    /// Get a node by its description ID
    pub fn node_by_id(&self, id: NodeId) -> Option<&Node> {
        self.ids.get(&id).and_then(|key| self.nodes.get(*key))
    }

    /// Iterate over all nodes (arena order)
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    /// Get the number of nodes
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Iterate over the realized data connections
    pub fn connections(&self) -> impl Iterator<Item = &Connection> {
        self.connections.iter()
    }

    /// Get the number of data connections
    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }

    /// Get the output slot feeding the input slot `slot_name` of `node`
    ///
    /// Returns the owning node and the output slot.
    pub fn upstream(&self, node: &Node, slot_name: &str) -> Option<(&Node, &Slot)> {
        let index = node.query_slot(slot_name, SlotDirection::Input)?;
        let upstream = node.slot(index)?.upstream()?;
        let owner = self.nodes.get(upstream.node)?;
        Some((owner, owner.slot(upstream.slot)?))
    }

    /// Get the input slots fed by the output slot `slot_name` of `node`
    pub fn downstream(&self, node: &Node, slot_name: &str) -> Vec<(&Node, &Slot)> {
        let Some(slot) = node
            .query_slot(slot_name, SlotDirection::Output)
            .and_then(|index| node.slot(index))
        else {
            return Vec::new();
        };

        slot.links()
            .iter()
            .filter_map(|link| {
                let owner = self.nodes.get(link.node)?;
                Some((owner, owner.slot(link.slot)?))
            })
            .collect()
    }

    /// Lazily derive this frame's pass sequence
    ///
    /// Conditional branches are resolved through `conditions` as the
    /// traversal reaches them. Each call starts over from the root.
    pub fn travel<'g, 'c, C>(&'g self, conditions: &'c mut C) -> Travel<'g, 'c, C>
    where
        C: ConditionEvaluator + ?Sized,
    {
        Travel::new(self, conditions)
    }

    /// Collect this frame's pass sequence as description IDs
    pub fn pass_ids<C>(&self, conditions: &mut C) -> Vec<NodeId>
    where
        C: ConditionEvaluator + ?Sized,
    {
        self.travel(conditions).map(Node::id).collect()
    }
}
