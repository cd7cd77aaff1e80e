/// Mock backend for unit tests (no renderer required)
///
/// Records every setup and execute call so tests can check pass order and
/// the resources each pass saw. Can be told to fail a given pass in a given
/// phase.

use std::cell::Cell;
use rustc_hash::FxHashMap;
use crate::description::NodeId;
use crate::error::{PassGraphError, PassGraphResult};
use super::backend::{PassContext, RenderBackend};
use super::executor::FramePhase;
use super::frame::FrameData;

// ============================================================================
// Mock Frame
// ============================================================================

/// Frame with named boolean conditions (unknown names read as false)
#[derive(Debug, Default)]
pub struct MockFrame {
    pub conditions: FxHashMap<String, bool>,
    /// Number of condition reads
    pub reads: Cell<u32>,
    /// Invert every answer after this many reads (None = stable)
    pub flip_after: Option<u32>,
}

impl MockFrame {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: &str, value: bool) -> Self {
        self.conditions.insert(name.to_string(), value);
        self
    }

    pub fn flipping_after(mut self, reads: u32) -> Self {
        self.flip_after = Some(reads);
        self
    }
}

impl FrameData for MockFrame {
    fn condition(&self, name: &str) -> bool {
        let reads = self.reads.get();
        self.reads.set(reads + 1);

        let value = self.conditions.get(name).copied().unwrap_or(false);
        match self.flip_after {
            Some(limit) if reads >= limit => !value,
            _ => value,
        }
    }
}

// ============================================================================
// Mock Backend
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct MockCall {
    pub phase: FramePhase,
    pub node: NodeId,
    /// Nodes feeding the pass inputs, in slot order
    pub inputs: Vec<NodeId>,
}

#[derive(Debug, Default)]
pub struct MockBackend {
    pub calls: Vec<MockCall>,
    pub fail_on: Vec<(NodeId, FramePhase)>,
}

impl MockBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing(mut self, node: NodeId, phase: FramePhase) -> Self {
        self.fail_on.push((node, phase));
        self
    }

    /// Node IDs called in `phase`, in call order
    pub fn calls_in(&self, phase: FramePhase) -> Vec<NodeId> {
        self.calls.iter().filter(|call| call.phase == phase).map(|call| call.node).collect()
    }

    fn record(&mut self, phase: FramePhase, pass: &PassContext<'_>) -> PassGraphResult<()> {
        self.calls.push(MockCall {
            phase,
            node: pass.id(),
            inputs: pass.inputs().iter().map(|binding| binding.node).collect(),
        });

        if self.fail_on.contains(&(pass.id(), phase)) {
            return Err(PassGraphError::Backend(format!("mock {} failure on pass {}", phase, pass.id())));
        }
        Ok(())
    }
}

impl RenderBackend for MockBackend {
    type Frame = MockFrame;

    fn setup_pass(&mut self, pass: &PassContext<'_>, _frame: &MockFrame) -> PassGraphResult<()> {
        self.record(FramePhase::Setup, pass)
    }

    fn execute_pass(&mut self, pass: &PassContext<'_>, _frame: &MockFrame) -> PassGraphResult<()> {
        self.record(FramePhase::Execute, pass)
    }
}
