/// Graph builder: turns a serialized description into a PassGraph.
///
/// The build never fails as a whole. Node descriptors and edges that cannot
/// be resolved are skipped, reported as `GraphDiagnostic`s, and the rest of
/// the graph is wired as far as possible.
///
/// Edges are classified in this order:
/// 1. left node is a conditional branch: sets its true or false target
/// 2. pass to pass through an execution port: appends a control-flow successor
/// 3. anything else: data connection between an output and an input slot

use crate::config::BuildConfig;
use crate::description::{EdgeDescriptor, GraphDescription, NodeDescriptor};
use super::connection::Connection;
use super::diagnostic::GraphDiagnostic;
use super::node::NodeKey;
use super::pass_graph::PassGraph;
use super::registry::NodeKind;
use super::slot::{SlotDirection, SlotRef};

const SOURCE: &str = "pass_graph::GraphBuilder";

/// Result of a build: the best-effort graph and everything that was skipped
#[derive(Debug, Clone)]
pub struct BuildOutput {
    pub graph: PassGraph,
    pub diagnostics: Vec<GraphDiagnostic>,
}

impl BuildOutput {
    /// True if nothing was skipped
    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

/// Builds PassGraphs from descriptions
#[derive(Debug, Clone, Default)]
pub struct GraphBuilder {
    config: BuildConfig,
}

impl GraphBuilder {
    pub fn new(config: BuildConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &BuildConfig {
        &self.config
    }

    /// Build a graph from `description`
    pub fn build(&self, description: &GraphDescription) -> BuildOutput {
        let mut graph = PassGraph::new();
        let mut diagnostics = Vec::new();

        for descriptor in &description.nodes {
            if let Err(diagnostic) = self.instantiate_node(&mut graph, description, descriptor) {
                diagnostic.report(SOURCE);
                diagnostics.push(diagnostic);
            }
        }

        for (index, edge) in description.edges.iter().enumerate() {
            for diagnostic in self.resolve_edge(&mut graph, index, edge) {
                diagnostic.report(SOURCE);
                diagnostics.push(diagnostic);
            }
        }

        if graph.root.is_none() {
            crate::graph_debug!(SOURCE, "Description has no ExecRoot, graph is empty");
        }
        crate::graph_debug!(SOURCE,
            "Built pass graph: {} nodes, {} connections, {} diagnostics",
            graph.node_count(), graph.connection_count(), diagnostics.len());

        BuildOutput { graph, diagnostics }
    }

    fn instantiate_node(
        &self,
        graph: &mut PassGraph,
        description: &GraphDescription,
        descriptor: &NodeDescriptor,
    ) -> Result<(), GraphDiagnostic> {
        let Some(kind) = NodeKind::from_tag(&descriptor.type_tag) else {
            return Err(GraphDiagnostic::UnknownType {
                node: descriptor.id,
                type_tag: descriptor.type_tag.clone(),
            });
        };

        if graph.ids.contains_key(&descriptor.id) {
            return Err(GraphDiagnostic::DuplicateNodeId {
                node: descriptor.id,
                type_tag: descriptor.type_tag.clone(),
            });
        }

        let key = graph
            .nodes
            .try_insert_with_key(|key| kind.instantiate(key, description, descriptor))
            .map_err(|e| GraphDiagnostic::ConstructionFailure {
                node: descriptor.id,
                type_tag: descriptor.type_tag.clone(),
                reason: e.to_string(),
            })?;

        graph.ids.insert(descriptor.id, key);
        if kind == NodeKind::ExecRoot {
            // Last root wins
            graph.root = Some(key);
        }

        Ok(())
    }

    fn resolve_edge(
        &self,
        graph: &mut PassGraph,
        index: usize,
        edge: &EdgeDescriptor,
    ) -> Vec<GraphDiagnostic> {
        let left = graph.ids.get(&edge.left_node_id).copied();
        let right = graph.ids.get(&edge.right_node_id).copied();
        let (Some(left), Some(right)) = (left, right) else {
            let missing = if left.is_none() { edge.left_node_id } else { edge.right_node_id };
            return vec![GraphDiagnostic::DanglingReference { edge: index, node: missing }];
        };

        let (left_is_branch, left_has_next) = match graph.nodes.get(left) {
            Some(node) => (node.branch().is_some(), node.has_successor_list()),
            None => return Vec::new(),
        };
        let right_is_pass = graph.nodes.get(right).is_some_and(|node| node.is_pass_like());

        if left_is_branch {
            return self.link_branch(graph, index, edge, left, right, right_is_pass);
        }

        if left_has_next && right_is_pass && self.config.is_execution_port(&edge.right_slot_name) {
            if let Some(next) = graph.nodes.get_mut(left).and_then(|node| node.next_mut()) {
                next.push(right);
            }
            return Vec::new();
        }

        self.connect_slots(graph, index, edge, left, right)
    }

    fn link_branch(
        &self,
        graph: &mut PassGraph,
        index: usize,
        edge: &EdgeDescriptor,
        branch: NodeKey,
        target: NodeKey,
        target_is_pass: bool,
    ) -> Vec<GraphDiagnostic> {
        if !target_is_pass {
            return vec![GraphDiagnostic::InvalidBranchTarget {
                edge: index,
                branch: edge.left_node_id,
                target: edge.right_node_id,
            }];
        }

        let value = self.config.is_branch_true(&edge.left_slot_name);
        if let Some(branch) = graph.nodes.get_mut(branch).and_then(|node| node.branch_mut()) {
            branch.set_target(value, target);
        }
        Vec::new()
    }

    fn connect_slots(
        &self,
        graph: &mut PassGraph,
        index: usize,
        edge: &EdgeDescriptor,
        left: NodeKey,
        right: NodeKey,
    ) -> Vec<GraphDiagnostic> {
        let mut diagnostics = Vec::new();

        let left_slot = graph
            .nodes
            .get(left)
            .and_then(|node| node.query_slot(&edge.left_slot_name, SlotDirection::Output));
        let right_slot = graph
            .nodes
            .get(right)
            .and_then(|node| node.query_slot(&edge.right_slot_name, SlotDirection::Input));

        if left_slot.is_none() {
            diagnostics.push(GraphDiagnostic::SlotResolutionFailure {
                edge: index,
                node: edge.left_node_id,
                slot: edge.left_slot_name.clone(),
                direction: SlotDirection::Output,
            });
        }
        if right_slot.is_none() {
            diagnostics.push(GraphDiagnostic::SlotResolutionFailure {
                edge: index,
                node: edge.right_node_id,
                slot: edge.right_slot_name.clone(),
                direction: SlotDirection::Input,
            });
        }

        if let (Some(left_slot), Some(right_slot)) = (left_slot, right_slot) {
            let output = SlotRef { node: left, slot: left_slot };
            let input = SlotRef { node: right, slot: right_slot };
            // Unlike a plain overwrite of the upstream, the replaced output
            // also drops its fan-out link, so `downstream` has no stale readers
            Self::link(graph, output, input);
        }

        graph.connections.insert(Connection { left, left_slot, right, right_slot });
        diagnostics
    }

    /// Link `output -> input`; the input's previous upstream loses the link
    ///
    /// The `Connection` set still records both edges.
    fn link(graph: &mut PassGraph, output: SlotRef, input: SlotRef) {
        let replaced = graph
            .nodes
            .get_mut(input.node)
            .and_then(|node| node.slot_mut(input.slot))
            .and_then(|slot| slot.set_upstream(output));

        if let Some(previous) = replaced.filter(|previous| *previous != output) {
            if let Some(slot) = graph.nodes.get_mut(previous.node).and_then(|n| n.slot_mut(previous.slot)) {
                slot.remove_link(input);
            }
        }

        if let Some(slot) = graph.nodes.get_mut(output.node).and_then(|n| n.slot_mut(output.slot)) {
            slot.add_link(input);
        }
    }
}

#[cfg(test)]
#[path = "builder_tests.rs"]
mod tests;
