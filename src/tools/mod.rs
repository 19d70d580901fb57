//! Tools module - tool registration and dispatch
//!
//! Contains the registry that maps tool names to argument schemas,
//! handlers, and dispatch policy. The domain tool sets themselves live
//! in the `domain` module.

pub mod registry;

pub use registry::{RegisteredTool, ToolHandler, ToolRegistry};
