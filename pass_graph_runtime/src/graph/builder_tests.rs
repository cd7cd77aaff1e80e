/// Tests for GraphBuilder
///
/// These tests validate node instantiation, edge classification, slot
/// linking and the tolerance of malformed descriptions.

use super::*;
use crate::description::NodeId;
use crate::graph::node::NodeVariant;
use serde_json::json;

// ============================================================================
// Helper Functions
// ============================================================================

/// Root -> Blit(2) -> If(3) -True-> Blit(4) / -False-> Blit(5) -> Final(6)
fn branching_description() -> GraphDescription {
    let mut d = GraphDescription::default();
    d.push_node(1, "ExecRootNode");
    d.push_node(2, "BlitPassNode");
    d.push_node(3, "IfStatementNode").with_field("condition", json!("UseBloom"));
    d.push_node(4, "BlitPassNode");
    d.push_node(5, "BlitPassNode");
    d.push_node(6, "FinalNode");

    d.push_edge(1, "Execute", 2, "Execute");
    d.push_edge(2, "Execute", 3, "Execute");
    d.push_edge(3, "True", 4, "Execute");
    d.push_edge(3, "False", 5, "Execute");
    d.push_edge(4, "Execute", 6, "Execute");
    d.push_edge(5, "Execute", 6, "Execute");
    d
}

fn build(description: &GraphDescription) -> BuildOutput {
    GraphBuilder::default().build(description)
}

fn next_ids(graph: &PassGraph, id: NodeId) -> Vec<NodeId> {
    graph
        .node_by_id(id)
        .map(|node| node.next().iter().filter_map(|key| graph.node(*key)).map(|n| n.id()).collect())
        .unwrap_or_default()
}

fn branch_targets(graph: &PassGraph, id: NodeId) -> (Option<NodeId>, Option<NodeId>) {
    let branch = graph.node_by_id(id).and_then(|node| node.branch()).unwrap();
    let to_id = |key: Option<NodeKey>| key.and_then(|k| graph.node(k)).map(|n| n.id());
    (to_id(branch.true_pass()), to_id(branch.false_pass()))
}

fn upstream_id(graph: &PassGraph, id: NodeId, slot: &str) -> Option<NodeId> {
    let node = graph.node_by_id(id)?;
    graph.upstream(node, slot).map(|(owner, _)| owner.id())
}

// ============================================================================
// Tests: Node Instantiation
// ============================================================================

#[test]
fn test_build_branching_description() {
    let output = build(&branching_description());
    assert!(output.is_clean(), "{:?}", output.diagnostics);

    let graph = &output.graph;
    assert_eq!(graph.node_count(), 6);
    assert_eq!(graph.root().map(|n| n.id()), Some(1));
    assert_eq!(next_ids(graph, 1), vec![2]);
    assert_eq!(next_ids(graph, 2), vec![3]);
    assert_eq!(branch_targets(graph, 3), (Some(4), Some(5)));
    assert_eq!(next_ids(graph, 4), vec![6]);
    assert_eq!(next_ids(graph, 5), vec![6]);
    assert_eq!(graph.connection_count(), 0);
}

#[test]
fn test_empty_description() {
    let output = build(&GraphDescription::default());
    assert!(output.is_clean());
    assert!(output.graph.root().is_none());
    assert_eq!(output.graph.node_count(), 0);
}

#[test]
fn test_unknown_type_is_dropped() {
    let mut d = branching_description();
    d.push_node(7, "BloomPassNode");
    d.push_edge(2, "Execute", 7, "Execute");

    let output = build(&d);
    assert_eq!(output.graph.node_count(), 6);
    assert!(output.graph.node_by_id(7).is_none());
    assert_eq!(output.diagnostics, vec![
        GraphDiagnostic::UnknownType { node: 7, type_tag: "BloomPassNode".to_string() },
        GraphDiagnostic::DanglingReference { edge: 6, node: 7 },
    ]);
    assert_eq!(next_ids(&output.graph, 2), vec![3]);
}

#[test]
fn test_construction_failure_is_dropped() {
    let mut d = GraphDescription::default();
    d.push_node(1, "ExecRootNode");
    d.push_node(2, "IfStatementNode");
    d.push_node(3, "FinalNode");
    d.push_edge(1, "Execute", 3, "Execute");

    let output = build(&d);
    assert_eq!(output.graph.node_count(), 2);
    assert!(output.graph.node_by_id(2).is_none());
    assert_eq!(output.diagnostics.len(), 1);
    assert!(matches!(
        &output.diagnostics[0],
        GraphDiagnostic::ConstructionFailure { node: 2, type_tag, .. } if type_tag == "IfStatementNode"
    ));
    assert_eq!(next_ids(&output.graph, 1), vec![3]);
}

#[test]
fn test_duplicate_id_keeps_first_node() {
    let mut d = GraphDescription::default();
    d.push_node(1, "ExecRootNode");
    d.push_node(2, "BlitPassNode");
    d.push_node(2, "FinalNode");

    let output = build(&d);
    assert_eq!(output.graph.node_count(), 2);
    assert_eq!(output.graph.node_by_id(2).map(|n| n.kind()), Some(NodeKind::BlitPass));
    assert_eq!(output.diagnostics, vec![
        GraphDiagnostic::DuplicateNodeId { node: 2, type_tag: "FinalNode".to_string() },
    ]);
}

#[test]
fn test_last_root_wins() {
    let mut d = GraphDescription::default();
    d.push_node(1, "ExecRootNode");
    d.push_node(2, "ExecRootNode");

    let output = build(&d);
    assert_eq!(output.graph.root().map(|n| n.id()), Some(2));
}

// ============================================================================
// Tests: Control-Flow Edges
// ============================================================================

#[test]
fn test_successors_keep_edge_order() {
    let mut d = GraphDescription::default();
    d.push_node(1, "ExecRootNode");
    for id in [10, 11, 12, 13] {
        d.push_node(id, "BlitPassNode");
    }
    d.push_edge(1, "Execute", 12, "Execute");
    d.push_edge(1, "Execute", 10, "ExecuteIn");
    d.push_edge(1, "Execute", 13, "Execute");
    d.push_edge(1, "Execute", 11, "Execute");

    let output = build(&d);
    assert!(output.is_clean());
    assert_eq!(next_ids(&output.graph, 1), vec![12, 10, 13, 11]);
}

#[test]
fn test_pass_edge_without_execution_port_is_data_edge() {
    let mut d = GraphDescription::default();
    d.push_node(2, "BlitPassNode");
    d.push_node(3, "BlitPassNode");
    d.push_edge(2, "Source", 3, "Source");

    let output = build(&d);
    assert!(next_ids(&output.graph, 2).is_empty());
    assert_eq!(output.diagnostics, vec![GraphDiagnostic::SlotResolutionFailure {
        edge: 0,
        node: 2,
        slot: "Source".to_string(),
        direction: SlotDirection::Output,
    }]);

    // Partially resolved connection kept for diagnostics
    let connection = output.graph.connections().next().copied().unwrap();
    assert!(connection.left_slot.is_none());
    assert_eq!(connection.right_slot, Some(0));
    assert!(!connection.is_linked());
}

#[test]
fn test_terminal_has_no_successors() {
    let mut d = GraphDescription::default();
    d.push_node(6, "FinalNode");
    d.push_node(7, "BlitPassNode");
    d.push_edge(6, "Execute", 7, "Execute");

    let output = build(&d);
    assert_eq!(output.graph.node_by_id(6).map(|n| n.variant().clone()), Some(NodeVariant::Terminal));
    assert_eq!(output.diagnostics.len(), 2);
    assert!(output.diagnostics.iter().all(|d| matches!(d, GraphDiagnostic::SlotResolutionFailure { .. })));
}

#[test]
fn test_edge_into_root_is_not_control_flow() {
    let mut d = GraphDescription::default();
    d.push_node(1, "ExecRootNode");
    d.push_node(2, "BlitPassNode");
    d.push_edge(1, "Execute", 2, "Execute");
    d.push_edge(2, "Execute", 1, "Execute");

    let output = build(&d);
    assert_eq!(next_ids(&output.graph, 2), Vec::<NodeId>::new());
    assert_eq!(output.diagnostics.len(), 2);
}

#[test]
fn test_resource_is_never_a_successor() {
    let mut d = GraphDescription::default();
    d.push_node(1, "ExecRootNode");
    d.push_node(2, "FrameBufferNode");
    d.push_edge(1, "Execute", 2, "Execute");

    let output = build(&d);
    assert!(next_ids(&output.graph, 1).is_empty());
    assert!(!output.is_clean());
}

// ============================================================================
// Tests: Dangling References
// ============================================================================

#[test]
fn test_dangling_edges_are_dropped_others_wired() {
    let mut d = branching_description();
    d.edges.insert(0, crate::description::EdgeDescriptor {
        left_node_id: 99,
        left_slot_name: "Execute".to_string(),
        right_node_id: 2,
        right_slot_name: "Execute".to_string(),
    });
    d.push_edge(2, "Execute", 42, "Execute");
    d.push_edge(98, "Texture", 97, "Source");

    let output = build(&d);
    assert_eq!(output.diagnostics, vec![
        GraphDiagnostic::DanglingReference { edge: 0, node: 99 },
        GraphDiagnostic::DanglingReference { edge: 7, node: 42 },
        GraphDiagnostic::DanglingReference { edge: 8, node: 98 },
    ]);

    let graph = &output.graph;
    assert_eq!(next_ids(graph, 1), vec![2]);
    assert_eq!(next_ids(graph, 2), vec![3]);
    assert_eq!(branch_targets(graph, 3), (Some(4), Some(5)));
    assert_eq!(graph.connection_count(), 0);
}

// ============================================================================
// Tests: Branch Edges
// ============================================================================

#[test]
fn test_branch_marker_is_exact() {
    let mut d = GraphDescription::default();
    d.push_node(3, "IfStatementNode").with_field("condition", json!("c"));
    d.push_node(4, "BlitPassNode");
    d.push_edge(3, "true", 4, "Execute");

    let output = build(&d);
    assert_eq!(branch_targets(&output.graph, 3), (None, Some(4)));
}

#[test]
fn test_branch_edge_takes_precedence_over_data_edge() {
    let mut d = GraphDescription::default();
    d.push_node(3, "IfStatementNode").with_field("condition", json!("c"));
    d.push_node(4, "FinalNode");
    // Right slot is a data slot, the edge is still a branch edge
    d.push_edge(3, "True", 4, "Source");

    let output = build(&d);
    assert!(output.is_clean());
    assert_eq!(branch_targets(&output.graph, 3), (Some(4), None));
    assert_eq!(output.graph.connection_count(), 0);
}

#[test]
fn test_branch_to_resource_is_rejected() {
    let mut d = GraphDescription::default();
    d.push_node(3, "IfStatementNode").with_field("condition", json!("c"));
    d.push_node(4, "BlitPassNode");
    d.push_node(8, "CameraOpaqueTextureNode");
    d.push_edge(3, "True", 4, "Execute");
    d.push_edge(3, "True", 8, "Execute");

    let output = build(&d);
    assert_eq!(branch_targets(&output.graph, 3), (Some(4), None));
    assert_eq!(output.diagnostics, vec![
        GraphDiagnostic::InvalidBranchTarget { edge: 1, branch: 3, target: 8 },
    ]);
}

#[test]
fn test_branch_edge_overwrites_previous_target() {
    let mut d = GraphDescription::default();
    d.push_node(3, "IfStatementNode").with_field("condition", json!("c"));
    d.push_node(4, "BlitPassNode");
    d.push_node(5, "BlitPassNode");
    d.push_edge(3, "False", 4, "Execute");
    d.push_edge(3, "Else", 5, "Execute");

    let output = build(&d);
    assert_eq!(branch_targets(&output.graph, 3), (None, Some(5)));
}

#[test]
fn test_custom_markers() {
    let mut d = GraphDescription::default();
    d.push_node(1, "ExecRootNode");
    d.push_node(2, "BlitPassNode");
    d.push_node(3, "IfStatementNode").with_field("condition", json!("c"));
    d.push_node(4, "FinalNode");
    d.push_edge(1, "Out", 2, "Flow");
    d.push_edge(2, "Out", 3, "Flow");
    d.push_edge(3, "Then", 4, "Flow");

    let builder = GraphBuilder::new(BuildConfig {
        execution_port_marker: "Flow".to_string(),
        branch_true_marker: "Then".to_string(),
    });
    let output = builder.build(&d);

    assert!(output.is_clean());
    assert_eq!(next_ids(&output.graph, 1), vec![2]);
    assert_eq!(next_ids(&output.graph, 2), vec![3]);
    assert_eq!(branch_targets(&output.graph, 3), (Some(4), None));
}

// ============================================================================
// Tests: Data Edges
// ============================================================================

#[test]
fn test_data_edge_links_slots() {
    let mut d = GraphDescription::default();
    d.push_node(2, "BlitPassNode");
    d.push_node(7, "GetTemporaryRTNode");
    d.push_node(8, "MaterialResourceNode").with_field("material", json!("Hidden/Copy"));
    d.push_edge(7, "Texture", 2, "Source");
    d.push_edge(8, "Material", 2, "Material");
    d.push_edge(7, "Texture", 2, "Destination");

    let output = build(&d);
    assert!(output.is_clean(), "{:?}", output.diagnostics);

    let graph = &output.graph;
    assert_eq!(graph.connection_count(), 3);
    assert!(graph.connections().all(|c| c.is_linked()));
    assert_eq!(upstream_id(graph, 2, "Source"), Some(7));
    assert_eq!(upstream_id(graph, 2, "Material"), Some(8));
    assert_eq!(upstream_id(graph, 2, "Destination"), Some(7));

    // Output fans out to both inputs, in edge order
    let rt = graph.node_by_id(7).unwrap();
    let fed: Vec<&str> = graph.downstream(rt, "Texture").iter().map(|(_, slot)| slot.name()).collect();
    assert_eq!(fed, vec!["Source", "Destination"]);
}

#[test]
fn test_last_writer_wins_on_input() {
    let mut d = GraphDescription::default();
    d.push_node(2, "BlitPassNode");
    d.push_node(7, "CameraOpaqueTextureNode");
    d.push_node(8, "GetTemporaryRTNode");
    d.push_edge(7, "Texture", 2, "Source");
    d.push_edge(8, "Texture", 2, "Source");

    let output = build(&d);
    let graph = &output.graph;
    assert_eq!(upstream_id(graph, 2, "Source"), Some(8));
    assert_eq!(graph.connection_count(), 2);

    // The replaced upstream no longer feeds the input
    let first = graph.node_by_id(7).unwrap();
    assert!(graph.downstream(first, "Texture").is_empty());
    let second = graph.node_by_id(8).unwrap();
    assert_eq!(graph.downstream(second, "Texture").len(), 1);
}

#[test]
fn test_duplicate_data_edges_collapse() {
    let mut d = GraphDescription::default();
    d.push_node(6, "FinalNode");
    d.push_node(7, "FrameBufferNode");
    d.push_edge(7, "Texture", 6, "Source");
    d.push_edge(7, "Texture", 6, "Source");

    let output = build(&d);
    let graph = &output.graph;
    assert_eq!(graph.connection_count(), 1);
    let fb = graph.node_by_id(7).unwrap();
    assert_eq!(graph.downstream(fb, "Texture").len(), 1);
}

#[test]
fn test_data_edge_wrong_direction_fails_both_sides() {
    let mut d = GraphDescription::default();
    d.push_node(2, "BlitPassNode");
    d.push_node(7, "FrameBufferNode");
    // Reversed: the pass input is not an output, the texture output is not an input
    d.push_edge(2, "Source", 7, "Texture");

    let output = build(&d);
    assert_eq!(output.diagnostics.len(), 2);
    let connection = output.graph.connections().next().copied().unwrap();
    assert!(connection.left_slot.is_none());
    assert!(connection.right_slot.is_none());
}

// ============================================================================
// Tests: Determinism
// ============================================================================

#[test]
fn test_repeated_builds_are_identical() {
    let d = branching_description();
    let first = build(&d);
    let second = build(&d);

    for value in [true, false] {
        let mut conditions = |_: NodeId, _: &str| value;
        let a = first.graph.pass_ids(&mut conditions);
        let b = second.graph.pass_ids(&mut conditions);
        assert_eq!(a, b);
    }
}
