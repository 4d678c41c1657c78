//! Direct Remotion render invocation, without the MCP server layer.

pub mod cli_args;

pub use cli_args::Cli;

/// Maps the renderer's exit status onto ours. Unavailable or out-of-range
/// statuses become 1.
pub fn exit_status(code: Option<i32>) -> u8 {
    code.and_then(|c| u8::try_from(c).ok()).unwrap_or(1)
}
