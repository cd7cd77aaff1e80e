/*!
# Pass Graph Runtime

Data-driven render pass graph for a rendering pipeline.

A graph editor saves the frame as a flat list of nodes and edges. This
crate turns that description into a runtime graph once, then derives the
ordered list of passes of every frame from it and runs them against a
rendering backend.

## Architecture

- **GraphDescription**: serialized nodes and edges (JSON)
- **GraphBuilder**: resolves type tags and edges into a `PassGraph`, reporting
  everything it skips as `GraphDiagnostic`s
- **PassGraph**: node arena, control-flow successors and data connections
- **Travel**: lazy per-frame pass sequence with conditional branches
- **PassGraphExecutor**: setup then execute phases over a `RenderBackend`

Backends implement `RenderBackend` and receive each pass as a `PassContext`
with its resolved input resources.
*/

// Internal modules
mod config;
mod description;
mod error;
mod execution;
mod graph;
mod log;

// Main pass_graph namespace module
pub mod pass_graph {
    // Error types
    pub use crate::error::{PassGraphError, PassGraphResult};

    // Build configuration
    pub use crate::config::BuildConfig;

    // Serialized description
    pub use crate::description::{EdgeDescriptor, GraphDescription, NodeDescriptor, NodeId};

    // Graph, builder and traversal
    pub use crate::graph::*;

    // Frame execution
    pub use crate::execution::*;

    // Logging sub-module (also the target of the graph_* macros)
    pub mod log {
        pub use crate::log::{
            Logger, LogEntry, LogSeverity, DefaultLogger,
            set_logger, reset_logger, log, log_detailed,
        };
    }
}

// Re-export math library at crate root
pub use glam;
