//! Pass graph module
//!
//! Builds the runtime pass graph from a serialized description and derives
//! the pass sequence of each frame from it. Control-flow edges decide the
//! order passes run in; data connections only describe which resource feeds
//! which pass input.

mod builder;
mod connection;
mod diagnostic;
mod node;
mod pass_graph;
mod registry;
mod slot;
mod travel;

pub use builder::{BuildOutput, GraphBuilder};
pub use connection::Connection;
pub use diagnostic::GraphDiagnostic;
pub use node::{ConditionalBranch, Node, NodeKey, NodeVariant, ResourceDesc, TemporaryTargetDesc};
pub use pass_graph::PassGraph;
pub use registry::NodeKind;
pub use slot::{Slot, SlotDirection, SlotLayout, SlotRef, SlotType};
pub use travel::{ConditionEvaluator, Travel};
