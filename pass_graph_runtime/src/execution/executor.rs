/// Execution driver: runs one frame of a pass graph.
///
/// A frame has two phases, always in this order:
/// 1. setup: every pass that will run this frame is prepared, once
/// 2. execute: the passes are run in traversal order, a join pass once per
///    path reaching it
///
/// Both phases read branch conditions through one `CachedConditions`, so
/// they follow the same path even if the frame's answers change between
/// reads. The graph is rebuilt first when the description was marked as
/// changed.

use std::fmt;
use rustc_hash::FxHashSet;
use crate::config::BuildConfig;
use crate::description::{GraphDescription, NodeId};
use crate::error::{PassGraphError, PassGraphResult};
use crate::graph::{BuildOutput, GraphBuilder, GraphDiagnostic, PassGraph};
use crate::{graph_debug, graph_error, graph_info, graph_trace};
use super::backend::{PassContext, RenderBackend};
use super::frame::CachedConditions;

const SOURCE: &str = "pass_graph::Executor";

/// Phase of a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FramePhase {
    Setup,
    Execute,
}

impl fmt::Display for FramePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FramePhase::Setup => write!(f, "Setup"),
            FramePhase::Execute => write!(f, "Execute"),
        }
    }
}

/// Backend error raised by one pass
#[derive(Debug, Clone, PartialEq)]
pub struct PassFailure {
    pub node: NodeId,
    pub phase: FramePhase,
    pub error: PassGraphError,
}

/// What happened during one `execute` call
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameReport {
    /// The graph was rebuilt before the frame
    pub rebuilt: bool,
    /// Passes whose setup succeeded, in first-visit order
    pub prepared: Vec<NodeId>,
    /// Passes whose execution succeeded, in traversal order
    pub executed: Vec<NodeId>,
    pub failures: Vec<PassFailure>,
    /// Dangling branches and branch cycles met by the traversal
    pub diagnostics: Vec<GraphDiagnostic>,
}

impl FrameReport {
    /// True if no pass failed and no path was cut short
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty() && self.diagnostics.is_empty()
    }

    fn fail(&mut self, node: NodeId, phase: FramePhase, error: PassGraphError) {
        graph_error!(SOURCE, "{} failed for pass {}: {}", phase, node, error);
        self.failures.push(PassFailure { node, phase, error });
    }
}

/// Owns a description and the graph built from it, and runs frames
///
/// # Example
///
/// ```no_run
/// use pass_graph_runtime::pass_graph::{GraphDescription, PassGraphExecutor};
///
/// let description = GraphDescription::from_json(r#"{ "nodes": [], "edges": [] }"#)?;
/// let executor = PassGraphExecutor::new(description);
/// assert!(executor.graph().root().is_none());
/// # Ok::<(), pass_graph_runtime::pass_graph::PassGraphError>(())
/// ```
pub struct PassGraphExecutor {
    builder: GraphBuilder,
    description: GraphDescription,
    graph: PassGraph,
    build_diagnostics: Vec<GraphDiagnostic>,
    requires_update: bool,
}

impl PassGraphExecutor {
    /// Build the graph of `description` with the default configuration
    pub fn new(description: GraphDescription) -> Self {
        Self::with_config(description, BuildConfig::default())
    }

    /// Build the graph of `description` with `config`
    pub fn with_config(description: GraphDescription, config: BuildConfig) -> Self {
        let mut executor = Self {
            builder: GraphBuilder::new(config),
            description,
            graph: PassGraph::default(),
            build_diagnostics: Vec::new(),
            requires_update: true,
        };
        executor.rebuild_if_needed();
        executor
    }

    /// Decode a JSON description and build its graph
    ///
    /// # Errors
    ///
    /// Returns `PassGraphError::DescriptionParse` if the JSON is not a description.
    pub fn from_json(json: &str) -> PassGraphResult<Self> {
        Ok(Self::new(GraphDescription::from_json(json)?))
    }

    pub fn graph(&self) -> &PassGraph {
        &self.graph
    }

    pub fn description(&self) -> &GraphDescription {
        &self.description
    }

    pub fn config(&self) -> &BuildConfig {
        self.builder.config()
    }

    /// Diagnostics of the last build
    pub fn build_diagnostics(&self) -> &[GraphDiagnostic] {
        &self.build_diagnostics
    }

    /// True if the next frame will rebuild the graph first
    pub fn requires_update(&self) -> bool {
        self.requires_update
    }

    /// Replace the description; the graph is rebuilt before the next frame
    pub fn set_description(&mut self, description: GraphDescription) {
        self.description = description;
        self.requires_update = true;
    }

    /// Mark the graph as stale (e.g. after the description was edited in place)
    pub fn request_update(&mut self) {
        self.requires_update = true;
    }

    /// Rebuild the graph if it is stale
    ///
    /// Returns true if a rebuild happened.
    pub fn rebuild_if_needed(&mut self) -> bool {
        if !self.requires_update {
            return false;
        }

        let BuildOutput { graph, diagnostics } = self.builder.build(&self.description);
        graph_info!(SOURCE, "Pass graph built: {} nodes, {} diagnostics",
            graph.node_count(), diagnostics.len());

        self.graph = graph;
        self.build_diagnostics = diagnostics;
        self.requires_update = false;
        true
    }

    /// Run one frame on `backend`
    ///
    /// Pass errors do not stop the frame: they are logged and listed in the
    /// report. A pass whose setup failed is not executed.
    pub fn execute<B: RenderBackend>(&mut self, backend: &mut B, frame: &B::Frame) -> FrameReport {
        let mut report = FrameReport {
            rebuilt: self.rebuild_if_needed(),
            ..FrameReport::default()
        };

        let graph = &self.graph;
        let mut conditions = CachedConditions::new(frame);
        let mut set_up = FxHashSet::default();
        let mut not_ready = FxHashSet::default();

        // Setup; traversal diagnostics are reported by the execute traversal
        for node in graph.travel(&mut conditions).quiet() {
            if !set_up.insert(node.key()) {
                continue;
            }
            let pass = PassContext::new(graph, node);
            graph_trace!(SOURCE, "Setup pass {} ({})", node.id(), node.kind().tag());
            match backend.setup_pass(&pass, frame) {
                Ok(()) => report.prepared.push(node.id()),
                Err(error) => {
                    not_ready.insert(node.key());
                    report.fail(node.id(), FramePhase::Setup, error);
                }
            }
        }

        let mut travel = graph.travel(&mut conditions);
        for node in travel.by_ref() {
            if not_ready.contains(&node.key()) {
                continue;
            }
            let pass = PassContext::new(graph, node);
            graph_trace!(SOURCE, "Execute pass {} ({})", node.id(), node.kind().tag());
            match backend.execute_pass(&pass, frame) {
                Ok(()) => report.executed.push(node.id()),
                Err(error) => report.fail(node.id(), FramePhase::Execute, error),
            }
        }
        report.diagnostics = travel.diagnostics().to_vec();

        graph_debug!(SOURCE, "Frame done: {} prepared, {} executed, {} failures",
            report.prepared.len(), report.executed.len(), report.failures.len());

        report
    }
}

#[cfg(test)]
#[path = "executor_tests.rs"]
mod tests;
