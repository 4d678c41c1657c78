//! MCP server exposing Remotion rendering as tools.
//!
//! - [`dispatch`] - Tool registry and dispatch to the renderer
//! - [`tools`] - Tool parameter types and their JSON schemas
//! - [`transport`] - Line-delimited JSON and rmcp stdio framings

pub mod dispatch;
pub mod tools;
pub mod transport;

pub use dispatch::{Dispatcher, ToolName, ToolResponse, ToolSpec};
pub use transport::TransportKind;
