/// Frame data and the condition sources built on top of it.
///
/// The frame payload belongs to the host. It is borrowed for one call and
/// only read, in particular when a conditional branch asks for the value
/// of a named condition.

use rustc_hash::FxHashMap;
use crate::description::NodeId;
use crate::graph::ConditionEvaluator;

/// Per-frame payload handed to the backend and to branch conditions
///
/// # Example
///
/// ```no_run
/// use pass_graph_runtime::pass_graph::FrameData;
///
/// struct CameraFrame {
///     post_processing: bool,
/// }
///
/// impl FrameData for CameraFrame {
///     fn condition(&self, name: &str) -> bool {
///         name == "PostProcessing" && self.post_processing
///     }
/// }
/// ```
pub trait FrameData {
    /// Current value of the condition `name`
    fn condition(&self, name: &str) -> bool;
}

/// Reads every condition straight from the frame
pub struct LiveConditions<'f, F: FrameData + ?Sized> {
    frame: &'f F,
}

impl<'f, F: FrameData + ?Sized> LiveConditions<'f, F> {
    pub fn new(frame: &'f F) -> Self {
        Self { frame }
    }
}

impl<F: FrameData + ?Sized> ConditionEvaluator for LiveConditions<'_, F> {
    fn evaluate(&mut self, _branch: NodeId, condition: &str) -> bool {
        self.frame.condition(condition)
    }
}

/// Reads each branch's condition once and replays the answer
///
/// Shared by the setup and execute phases of a frame so both follow the
/// same branch decisions.
pub struct CachedConditions<'f, F: FrameData + ?Sized> {
    frame: &'f F,
    decisions: FxHashMap<NodeId, bool>,
}

impl<'f, F: FrameData + ?Sized> CachedConditions<'f, F> {
    pub fn new(frame: &'f F) -> Self {
        Self {
            frame,
            decisions: FxHashMap::default(),
        }
    }

    /// Decision taken for `branch`, if it was reached
    pub fn decision(&self, branch: NodeId) -> Option<bool> {
        self.decisions.get(&branch).copied()
    }

    /// Number of branches decided so far
    pub fn decided_count(&self) -> usize {
        self.decisions.len()
    }
}

impl<F: FrameData + ?Sized> ConditionEvaluator for CachedConditions<'_, F> {
    fn evaluate(&mut self, branch: NodeId, condition: &str) -> bool {
        let frame = self.frame;
        *self
            .decisions
            .entry(branch)
            .or_insert_with(|| frame.condition(condition))
    }
}

/// Any `Fn(&str) -> bool` can serve as frame data
impl<G> FrameData for G
where
    G: Fn(&str) -> bool,
{
    fn condition(&self, name: &str) -> bool {
        self(name)
    }
}

#[cfg(test)]
#[path = "frame_tests.rs"]
mod tests;
