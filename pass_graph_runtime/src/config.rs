/// Build configuration for the pass graph.
///
/// Holds the port-name markers the builder uses to tell control-flow and
/// branch edges apart from data edges. Defaults match the names emitted by
/// the graph editor.

use serde::{Deserialize, Serialize};

/// Edge classification markers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BuildConfig {
    /// An edge whose right slot name contains this marker is a control-flow edge
    pub execution_port_marker: String,
    /// A branch edge whose left slot name equals this marker sets the true pass
    pub branch_true_marker: String,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            execution_port_marker: "Execute".to_string(),
            branch_true_marker: "True".to_string(),
        }
    }
}

impl BuildConfig {
    /// True if `right_slot_name` denotes an execution port
    pub fn is_execution_port(&self, right_slot_name: &str) -> bool {
        right_slot_name.contains(self.execution_port_marker.as_str())
    }

    /// True if `left_slot_name` is the true output of a conditional branch
    pub fn is_branch_true(&self, left_slot_name: &str) -> bool {
        left_slot_name == self.branch_true_marker
    }
}
