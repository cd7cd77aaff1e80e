/// Non-fatal problems found while building or traversing a pass graph.
///
/// None of these stop a build or a frame: the offending node, edge or path
/// is skipped and the rest of the graph keeps working. Each one is logged at
/// warn level when reported and also returned to the caller.

use std::fmt;
use crate::description::NodeId;
use super::slot::SlotDirection;

#[derive(Debug, Clone, PartialEq)]
pub enum GraphDiagnostic {
    /// Type tag not in the registry; node dropped
    UnknownType { node: NodeId, type_tag: String },

    /// Known type whose construction failed; node dropped
    ConstructionFailure { node: NodeId, type_tag: String, reason: String },

    /// A node ID already used by an earlier descriptor; later node dropped
    DuplicateNodeId { node: NodeId, type_tag: String },

    /// Edge referencing a node that was not instantiated; edge dropped
    DanglingReference { edge: usize, node: NodeId },

    /// Branch edge whose target cannot run as a pass; edge dropped
    InvalidBranchTarget { edge: usize, branch: NodeId, target: NodeId },

    /// Data edge side whose slot does not exist; that side is left unlinked
    SlotResolutionFailure { edge: usize, node: NodeId, slot: String, direction: SlotDirection },

    /// Branch whose chosen side is unset; that path ends
    DanglingBranch { branch: NodeId, condition: String, taken: bool },

    /// Branch whose chosen targets only lead back to branches; that path ends
    BranchCycle { branch: NodeId },
}

impl GraphDiagnostic {
    /// Node the diagnostic is about (the branch for branch diagnostics)
    pub fn node(&self) -> NodeId {
        match self {
            GraphDiagnostic::UnknownType { node, .. }
            | GraphDiagnostic::ConstructionFailure { node, .. }
            | GraphDiagnostic::DuplicateNodeId { node, .. }
            | GraphDiagnostic::DanglingReference { node, .. }
            | GraphDiagnostic::SlotResolutionFailure { node, .. } => *node,
            GraphDiagnostic::InvalidBranchTarget { branch, .. }
            | GraphDiagnostic::DanglingBranch { branch, .. }
            | GraphDiagnostic::BranchCycle { branch } => *branch,
        }
    }

    /// Log at warn level under `source`
    pub(crate) fn report(&self, source: &str) {
        crate::graph_warn!(source, "{}", self);
    }
}

impl fmt::Display for GraphDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GraphDiagnostic::UnknownType { node, type_tag } => {
                write!(f, "Unknown node type '{}' (node {})", type_tag, node)
            }
            GraphDiagnostic::ConstructionFailure { node, type_tag, reason } => {
                write!(f, "Cannot create {} (node {}): {}", type_tag, node, reason)
            }
            GraphDiagnostic::DuplicateNodeId { node, type_tag } => {
                write!(f, "Duplicate node id {} ({} dropped)", node, type_tag)
            }
            GraphDiagnostic::DanglingReference { edge, node } => {
                write!(f, "Node missing: edge {} references unknown node {}", edge, node)
            }
            GraphDiagnostic::InvalidBranchTarget { edge, branch, target } => {
                write!(f, "Edge {}: branch {} target {} is not a pass", edge, branch, target)
            }
            GraphDiagnostic::SlotResolutionFailure { edge, node, slot, direction } => {
                let side = match direction {
                    SlotDirection::Output => "Output",
                    SlotDirection::Input => "Input",
                };
                write!(f, "{} slot missing: edge {} references '{}' on node {}", side, edge, slot, node)
            }
            GraphDiagnostic::DanglingBranch { branch, condition, taken } => {
                write!(f, "Branch {} has no {} pass for condition '{}'",
                    branch, if *taken { "true" } else { "false" }, condition)
            }
            GraphDiagnostic::BranchCycle { branch } => {
                write!(f, "Branch {} only leads to conditional branches, path dropped", branch)
            }
        }
    }
}
