/// Node type registry.
///
/// Closed mapping from the editor's type tags to node kinds. Each kind
/// knows its slot layout and how to construct its node, including the
/// additional initialization that captures literal parameters from the
/// node's descriptor.

use glam::Vec4;
use serde_json::Value;
use crate::description::{GraphDescription, NodeDescriptor};
use crate::error::PassGraphResult;
use crate::graph_bail;
use super::node::{ConditionalBranch, Node, NodeKey, NodeVariant, ResourceDesc, TemporaryTargetDesc};
use super::slot::{SlotLayout, SlotType};

const SOURCE: &str = "pass_graph::Registry";

/// Every node kind the builder can instantiate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    ExecRoot,
    BlitPass,
    MaterialResource,
    CameraOpaqueTexture,
    FrameBuffer,
    TemporaryTarget,
    Final,
    IfStatement,
}

const BLIT_PASS_SLOTS: &[SlotLayout] = &[
    SlotLayout::input("Source", SlotType::Texture),
    SlotLayout::input("Material", SlotType::Material),
    SlotLayout::input("Destination", SlotType::Texture),
];
const MATERIAL_SLOTS: &[SlotLayout] = &[SlotLayout::output("Material", SlotType::Material)];
const TEXTURE_SLOTS: &[SlotLayout] = &[SlotLayout::output("Texture", SlotType::Texture)];
const FINAL_SLOTS: &[SlotLayout] = &[SlotLayout::input("Source", SlotType::Texture)];

impl NodeKind {
    /// All kinds, in registry order
    pub const ALL: [NodeKind; 8] = [
        NodeKind::ExecRoot,
        NodeKind::BlitPass,
        NodeKind::MaterialResource,
        NodeKind::CameraOpaqueTexture,
        NodeKind::FrameBuffer,
        NodeKind::TemporaryTarget,
        NodeKind::Final,
        NodeKind::IfStatement,
    ];

    /// Type tag used by the serialized description
    pub fn tag(self) -> &'static str {
        match self {
            NodeKind::ExecRoot => "ExecRootNode",
            NodeKind::BlitPass => "BlitPassNode",
            NodeKind::MaterialResource => "MaterialResourceNode",
            NodeKind::CameraOpaqueTexture => "CameraOpaqueTextureNode",
            NodeKind::FrameBuffer => "FrameBufferNode",
            NodeKind::TemporaryTarget => "GetTemporaryRTNode",
            NodeKind::Final => "FinalNode",
            NodeKind::IfStatement => "IfStatementNode",
        }
    }

    /// Look up a kind by type tag
    pub fn from_tag(tag: &str) -> Option<NodeKind> {
        Self::ALL.into_iter().find(|kind| kind.tag() == tag)
    }

    /// Data slots declared by this kind
    pub fn slot_layout(self) -> &'static [SlotLayout] {
        match self {
            NodeKind::BlitPass => BLIT_PASS_SLOTS,
            NodeKind::MaterialResource => MATERIAL_SLOTS,
            NodeKind::CameraOpaqueTexture
            | NodeKind::FrameBuffer
            | NodeKind::TemporaryTarget => TEXTURE_SLOTS,
            NodeKind::Final => FINAL_SLOTS,
            NodeKind::ExecRoot | NodeKind::IfStatement => &[],
        }
    }

    /// Construct a node of this kind for `descriptor`
    ///
    /// # Errors
    ///
    /// Returns `PassGraphError::InvalidNode` if an auxiliary field required by the kind
    /// is missing or has the wrong type.
    pub(crate) fn instantiate(
        self,
        key: NodeKey,
        description: &GraphDescription,
        descriptor: &NodeDescriptor,
    ) -> PassGraphResult<Node> {
        let variant = match self {
            NodeKind::ExecRoot => NodeVariant::Root { next: Vec::new() },
            NodeKind::BlitPass => NodeVariant::Pass { next: Vec::new() },
            NodeKind::Final => NodeVariant::Terminal,
            NodeKind::IfStatement => {
                NodeVariant::ConditionalBranch(ConditionalBranch::new(read_condition(descriptor)?))
            }
            NodeKind::MaterialResource => NodeVariant::Resource(ResourceDesc::Material {
                name: optional_string(descriptor, "material")?.unwrap_or_default(),
            }),
            NodeKind::CameraOpaqueTexture => NodeVariant::Resource(ResourceDesc::CameraOpaqueTexture),
            NodeKind::FrameBuffer => NodeVariant::Resource(ResourceDesc::FrameBuffer),
            NodeKind::TemporaryTarget => NodeVariant::Resource(ResourceDesc::TemporaryTarget(
                read_temporary_target(description, descriptor)?,
            )),
        };

        Ok(Node::new(key, descriptor.id, self, variant))
    }
}

fn read_condition(descriptor: &NodeDescriptor) -> PassGraphResult<String> {
    match optional_string(descriptor, "condition")? {
        Some(condition) => Ok(condition),
        None => graph_bail!(SOURCE,
            "Node {}: {} requires a 'condition' field", descriptor.id, descriptor.type_tag),
    }
}

fn read_temporary_target(
    description: &GraphDescription,
    descriptor: &NodeDescriptor,
) -> PassGraphResult<TemporaryTargetDesc> {
    let name = match optional_string(descriptor, "name")? {
        Some(name) => name,
        None => {
            // Ordinal among the temporary targets declared before this one
            let ordinal = description
                .nodes
                .iter()
                .take_while(|node| !std::ptr::eq(*node, descriptor))
                .filter(|node| node.type_tag == descriptor.type_tag)
                .count();
            format!("_TempRT{}", ordinal)
        }
    };

    Ok(TemporaryTargetDesc {
        name,
        width: optional_u32(descriptor, "width")?,
        height: optional_u32(descriptor, "height")?,
        clear_color: optional_vec4(descriptor, "clearColor")?,
    })
}

fn optional_string(descriptor: &NodeDescriptor, field: &str) -> PassGraphResult<Option<String>> {
    match descriptor.field(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(value)) => Ok(Some(value.clone())),
        Some(other) => graph_bail!(SOURCE,
            "Node {}: field '{}' must be a string, got {}", descriptor.id, field, other),
    }
}

fn optional_u32(descriptor: &NodeDescriptor, field: &str) -> PassGraphResult<Option<u32>> {
    match descriptor.field(field) {
        None | Some(Value::Null) => Ok(None),
        Some(value) => match value.as_u64().and_then(|v| u32::try_from(v).ok()) {
            Some(v) => Ok(Some(v)),
            None => graph_bail!(SOURCE,
                "Node {}: field '{}' must be an unsigned 32-bit integer, got {}",
                descriptor.id, field, value),
        },
    }
}

fn optional_vec4(descriptor: &NodeDescriptor, field: &str) -> PassGraphResult<Option<Vec4>> {
    let Some(value) = descriptor.field(field) else {
        return Ok(None);
    };
    if value.is_null() {
        return Ok(None);
    }

    let components = value.as_array().and_then(|items| {
        items
            .iter()
            .map(|c| c.as_f64().map(|f| f as f32))
            .collect::<Option<Vec<f32>>>()
    });

    match components.as_deref() {
        Some(&[x, y, z, w]) => Ok(Some(Vec4::new(x, y, z, w))),
        _ => graph_bail!(SOURCE,
            "Node {}: field '{}' must be an array of 4 numbers, got {}",
            descriptor.id, field, value),
    }
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;
