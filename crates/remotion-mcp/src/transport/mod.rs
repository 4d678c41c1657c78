//! Protocol framings. Both sit on top of the same [`crate::Dispatcher`].

pub mod line;
pub mod sdk;

use clap::ValueEnum;

/// Which framing to speak on stdin/stdout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TransportKind {
    /// Newline-delimited JSON messages (`list_tools` / `call_tool`).
    Line,
    /// Model Context Protocol via the rmcp SDK.
    Mcp,
}
