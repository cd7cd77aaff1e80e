//! Frame execution module
//!
//! Runs a built pass graph once per frame against a rendering backend:
//! every pass taking part in the frame is set up first, then executed in
//! traversal order.

mod backend;
mod executor;
mod frame;

#[cfg(test)]
pub(crate) mod mock_backend;

pub use backend::{PassContext, RenderBackend, ResourceBinding};
pub use executor::{FramePhase, FrameReport, PassFailure, PassGraphExecutor};
pub use frame::{CachedConditions, FrameData, LiveConditions};
