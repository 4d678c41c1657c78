//! Error types for the render adapter.

use thiserror::Error;

/// Result type for render adapter operations.
pub type RenderResult<T> = Result<T, RenderError>;

/// Errors that can occur while building or running a renderer invocation.
#[derive(Debug, Error)]
pub enum RenderError {
    /// A required request field was missing or empty.
    #[error("Invalid request: '{field}' {reason}")]
    InvalidRequest { field: &'static str, reason: String },

    /// Inline props could not be serialized to JSON.
    #[error("Failed to serialize props: {0}")]
    SerializeProps(#[source] serde_json::Error),

    /// The renderer process could not be started.
    #[error("Failed to spawn '{program}': {source}")]
    SpawnFailed {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// Waiting on the renderer process failed after it was spawned.
    #[error("Failed to wait for '{program}': {source}")]
    WaitFailed {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The renderer exited with a non-zero status, or was killed by a signal
    /// (`exit_code` is `None`).
    #[error("{tool} failed (code {})\n{stderr}", exit_code_text(.exit_code))]
    ProcessFailed {
        tool: &'static str,
        exit_code: Option<i32>,
        stderr: String,
    },

    /// The renderer ran longer than the configured timeout and was killed.
    #[error("{tool} timed out after {timeout_secs} seconds")]
    Timeout {
        tool: &'static str,
        timeout_secs: u64,
    },
}

fn exit_code_text(code: &Option<i32>) -> String {
    match code {
        Some(code) => code.to_string(),
        None => "null, terminated by signal".to_string(),
    }
}

impl RenderError {
    /// Creates an invalid request error for a wire-level field name.
    pub fn invalid_request(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidRequest {
            field,
            reason: reason.into(),
        }
    }

    /// Creates a new process failed error.
    pub fn process_failed(
        tool: &'static str,
        exit_code: Option<i32>,
        stderr: impl Into<String>,
    ) -> Self {
        Self::ProcessFailed {
            tool,
            exit_code,
            stderr: stderr.into(),
        }
    }

    /// Stable error code, used in logs.
    pub fn code(&self) -> &'static str {
        match self {
            RenderError::InvalidRequest { .. } => "RENDER_001",
            RenderError::SerializeProps(_) => "RENDER_002",
            RenderError::SpawnFailed { .. } => "RENDER_003",
            RenderError::WaitFailed { .. } => "RENDER_004",
            RenderError::ProcessFailed { .. } => "RENDER_005",
            RenderError::Timeout { .. } => "RENDER_006",
        }
    }
}
