/// Per-frame traversal of a pass graph.
///
/// Breadth-first over the control-flow successors, starting at the root.
/// A conditional branch is never yielded: when the traversal reaches one,
/// its condition is evaluated on the spot and the chosen target takes the
/// branch's place in the sequence. The untaken target is not visited.
///
/// A pass reachable through several paths is yielded once per path, so a
/// join pass also runs after the longest path leading into it. Successors
/// are only enqueued the first time a node is expanded, which bounds the
/// sequence and ends control-flow cycles.

use std::collections::VecDeque;
use rustc_hash::FxHashSet;
use crate::description::NodeId;
use super::diagnostic::GraphDiagnostic;
use super::node::{Node, NodeKey};
use super::pass_graph::PassGraph;

const SOURCE: &str = "pass_graph::Travel";

/// Decides conditional branches during a traversal
///
/// Implemented for any `FnMut(NodeId, &str) -> bool`, which receives the
/// branch node ID and its condition name.
pub trait ConditionEvaluator {
    fn evaluate(&mut self, branch: NodeId, condition: &str) -> bool;
}

impl<F> ConditionEvaluator for F
where
    F: FnMut(NodeId, &str) -> bool,
{
    fn evaluate(&mut self, branch: NodeId, condition: &str) -> bool {
        self(branch, condition)
    }
}

/// Lazy pass sequence of one frame (see `PassGraph::travel`)
pub struct Travel<'g, 'c, C: ConditionEvaluator + ?Sized> {
    graph: &'g PassGraph,
    conditions: &'c mut C,
    queue: VecDeque<NodeKey>,
    expanded: FxHashSet<NodeKey>,
    diagnostics: Vec<GraphDiagnostic>,
    report: bool,
}

impl<'g, 'c, C: ConditionEvaluator + ?Sized> Travel<'g, 'c, C> {
    pub(crate) fn new(graph: &'g PassGraph, conditions: &'c mut C) -> Self {
        let mut queue = VecDeque::new();
        queue.extend(graph.root);

        Self {
            graph,
            conditions,
            queue,
            expanded: FxHashSet::default(),
            diagnostics: Vec::new(),
            report: true,
        }
    }

    /// Do not log traversal diagnostics (they are still collected)
    pub fn quiet(mut self) -> Self {
        self.report = false;
        self
    }

    /// Dangling branches and branch cycles met so far
    pub fn diagnostics(&self) -> &[GraphDiagnostic] {
        &self.diagnostics
    }

    fn record(&mut self, diagnostic: GraphDiagnostic) {
        if self.report {
            diagnostic.report(SOURCE);
        }
        self.diagnostics.push(diagnostic);
    }

    /// Replace a branch (or chain of branches) by the target it selects
    fn resolve(&mut self, start: NodeKey) -> Option<NodeKey> {
        let graph = self.graph;
        let mut key = start;

        // A chain longer than the node count can only be a cycle of branches
        for _ in 0..=graph.node_count() {
            let node = graph.node(key)?;
            let Some(branch) = node.branch() else {
                return Some(key);
            };

            let taken = self.conditions.evaluate(node.id(), branch.condition());
            match branch.select(taken) {
                Some(target) => key = target,
                None => {
                    self.record(GraphDiagnostic::DanglingBranch {
                        branch: node.id(),
                        condition: branch.condition().to_string(),
                        taken,
                    });
                    return None;
                }
            }
        }

        let branch = graph.node(start)?.id();
        self.record(GraphDiagnostic::BranchCycle { branch });
        None
    }
}

impl<'g, 'c, C: ConditionEvaluator + ?Sized> Iterator for Travel<'g, 'c, C> {
    type Item = &'g Node;

    fn next(&mut self) -> Option<&'g Node> {
        let graph = self.graph;

        while let Some(key) = self.queue.pop_front() {
            let Some(key) = self.resolve(key) else {
                continue;
            };
            let Some(node) = graph.node(key) else {
                continue;
            };

            if self.expanded.insert(key) {
                self.queue.extend(node.next().iter().copied());
            }

            if node.is_root() {
                continue;
            }
            return Some(node);
        }

        None
    }
}

#[cfg(test)]
#[path = "travel_tests.rs"]
mod tests;
