//! Error types for the pass graph runtime
//!
//! Fatal errors are rare here: only an unreadable description and failing
//! backend calls surface as `PassGraphError`. Everything the builder and the traversal
//! can recover from is reported as a `GraphDiagnostic` instead.

use std::fmt;

/// Result type for pass graph operations
pub type PassGraphResult<T> = std::result::Result<T, PassGraphError>;

/// Pass graph errors
#[derive(Debug, Clone, PartialEq)]
pub enum PassGraphError {
    /// The serialized description could not be decoded
    DescriptionParse(String),

    /// A node descriptor could not be turned into a node
    InvalidNode(String),

    /// Error reported by the rendering backend while preparing or executing a pass
    Backend(String),
}

impl fmt::Display for PassGraphError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PassGraphError::DescriptionParse(msg) => write!(f, "Description parse error: {}", msg),
            PassGraphError::InvalidNode(msg) => write!(f, "Invalid node: {}", msg),
            PassGraphError::Backend(msg) => write!(f, "Backend error: {}", msg),
        }
    }
}

impl std::error::Error for PassGraphError {}

impl From<serde_json::Error> for PassGraphError {
    fn from(e: serde_json::Error) -> Self {
        PassGraphError::DescriptionParse(e.to_string())
    }
}

/// Build a `PassGraphError::InvalidNode`, logging it at error level first
///
/// ```no_run
/// # use pass_graph_runtime::graph_err;
/// let err = graph_err!("pass_graph::Registry", "node {} has no condition", 3);
/// ```
#[macro_export]
macro_rules! graph_err {
    ($source:expr, $($arg:tt)*) => {{
        let message = format!($($arg)*);
        $crate::graph_error!($source, "{}", message);
        $crate::pass_graph::PassGraphError::InvalidNode(message)
    }};
}

/// Return early with a `PassGraphError::InvalidNode` (logged at error level)
#[macro_export]
macro_rules! graph_bail {
    ($source:expr, $($arg:tt)*) => {
        return Err($crate::graph_err!($source, $($arg)*))
    };
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
