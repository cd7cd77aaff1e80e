/// Serialized pass graph description.
///
/// The editor saves a graph as a flat list of node descriptors and a flat
/// list of edges between named slots. Nothing is validated at this level:
/// node types, IDs and slot names are only resolved by the `GraphBuilder`.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use crate::error::PassGraphResult;

/// Integer identity of a node, valid for one load of a description
pub type NodeId = i64;

/// Complete graph description (nodes + edges)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphDescription {
    #[serde(default)]
    pub nodes: Vec<NodeDescriptor>,
    #[serde(default)]
    pub edges: Vec<EdgeDescriptor>,
}

/// One node of the description
///
/// Any field besides `id` and `type` is kept in `fields` and handed to the
/// node's additional initialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeDescriptor {
    pub id: NodeId,
    #[serde(rename = "type")]
    pub type_tag: String,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

/// One edge of the description: `left.slot -> right.slot`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EdgeDescriptor {
    pub left_node_id: NodeId,
    pub left_slot_name: String,
    pub right_node_id: NodeId,
    pub right_slot_name: String,
}

impl GraphDescription {
    /// Decode a description from JSON text
    ///
    /// # Errors
    ///
    /// Returns `PassGraphError::DescriptionParse` if the text is not a valid description.
    pub fn from_json(json: &str) -> PassGraphResult<Self> {
        let description: Self = serde_json::from_str(json).map_err(|e| {
            crate::graph_error!("pass_graph::Description", "Cannot decode description: {}", e);
            e
        })?;
        Ok(description)
    }

    /// Decode a description from an already parsed JSON value
    ///
    /// # Errors
    ///
    /// Returns `PassGraphError::DescriptionParse` if the value does not have the
    /// description layout.
    pub fn from_value(value: Value) -> PassGraphResult<Self> {
        Ok(serde_json::from_value(value)?)
    }

    /// Encode the description back to JSON text
    ///
    /// # Errors
    ///
    /// Returns `PassGraphError::DescriptionParse` if an auxiliary field cannot be encoded.
    pub fn to_json(&self) -> PassGraphResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Find a node descriptor by ID (first match)
    pub fn node(&self, id: NodeId) -> Option<&NodeDescriptor> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// Append a node descriptor without auxiliary fields
    pub fn push_node(&mut self, id: NodeId, type_tag: &str) -> &mut NodeDescriptor {
        self.nodes.push(NodeDescriptor::new(id, type_tag));
        let last = self.nodes.len() - 1;
        &mut self.nodes[last]
    }

    /// Append an edge descriptor
    pub fn push_edge(&mut self, left: NodeId, left_slot: &str, right: NodeId, right_slot: &str) {
        self.edges.push(EdgeDescriptor {
            left_node_id: left,
            left_slot_name: left_slot.to_string(),
            right_node_id: right,
            right_slot_name: right_slot.to_string(),
        });
    }
}

impl NodeDescriptor {
    pub fn new(id: NodeId, type_tag: &str) -> Self {
        Self {
            id,
            type_tag: type_tag.to_string(),
            fields: Map::new(),
        }
    }

    /// Set an auxiliary field (builder style)
    pub fn with_field(&mut self, name: &str, value: Value) -> &mut Self {
        self.fields.insert(name.to_string(), value);
        self
    }

    /// Get an auxiliary field
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }
}

#[cfg(test)]
#[path = "description_tests.rs"]
mod tests;
