//! Remotion render adapter
//!
//! This crate turns structured render requests into command lines for the
//! Remotion CLI and runs them through a package runner (`npx` by default).
//! Rendering itself happens entirely inside the external tool.
//!
//! # Overview
//!
//! ```text
//! RenderRequest ──► args::render_args ──► ProcessRunner::run ──► RenderOutcome
//! ```
//!
//! - [`request`] - Render and listing requests, props
//! - [`args`] - Argument vector construction
//! - [`runner`] - Async subprocess execution and output capture
//! - [`config`] - Renderer configuration and program discovery
//! - [`error`] - Error types
//!
//! # Example
//!
//! ```ignore
//! use remotion_render::{Renderer, RendererConfig, RenderRequest};
//!
//! let renderer = Renderer::with_config(RendererConfig::default().timeout_secs(600));
//! let request = RenderRequest::new("src/index.ts", "SimplePromo", "/tmp/out.mp4");
//! let outcome = renderer.render(&request).await?;
//! println!("Rendered {}", outcome.output_path);
//! ```
//!
//! Each call spawns exactly one child process. A [`Renderer`] keeps no
//! per-request state, so it can be shared behind an `Arc` and called
//! concurrently.

pub mod args;
pub mod config;
pub mod error;
pub mod request;
pub mod runner;

pub use config::{RendererConfig, DEFAULT_ENTRY_POINT, DEFAULT_PACKAGE, DEFAULT_TAIL_CHARS};
pub use error::{RenderError, RenderResult};
pub use request::{ListCompositionsRequest, Props, RenderRequest};
pub use runner::{tail, CommandOutput, ProcessRunner, RunnerConfig};

use std::time::Duration;

use tracing::info;

/// Label used in render failure messages.
pub const RENDER_TOOL: &str = "remotion render";

/// Label used in listing failure messages.
pub const COMPOSITIONS_TOOL: &str = "remotion compositions";

/// Result of a successful render.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderOutcome {
    pub output_path: String,
    /// Trailing slice of the renderer's stdout.
    pub stdout: String,
    pub duration: Duration,
}

/// Result of a successful composition listing.
#[derive(Debug, Clone, PartialEq)]
pub struct CompositionsOutcome {
    pub entry_point: String,
    /// Composition ids recognized in the listing, in output order.
    pub compositions: Vec<String>,
    /// Trailing slice of the renderer's stdout.
    pub stdout: String,
}

/// Runs Remotion CLI commands.
#[derive(Debug, Clone, Default)]
pub struct Renderer {
    config: RendererConfig,
    runner: ProcessRunner,
}

impl Renderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: RendererConfig) -> Self {
        let runner = ProcessRunner::with_config(config.runner.clone());
        Self { config, runner }
    }

    pub fn config(&self) -> &RendererConfig {
        &self.config
    }

    /// The entry point used when a request omits its project path.
    pub fn default_entry_point(&self) -> String {
        self.config.default_entry_point.to_string_lossy().into_owned()
    }

    /// Renders one composition.
    pub async fn render(&self, request: &RenderRequest) -> RenderResult<RenderOutcome> {
        request.validate()?;
        let args = args::render_args(&self.config.package, request)?;
        let program = self.config.resolve_program();

        info!(
            composition = %request.composition_id,
            output = %request.output_path,
            "starting render"
        );
        let out = self.runner.run(RENDER_TOOL, program.as_os_str(), &args).await?;
        if !out.success() {
            return Err(self.failure(RENDER_TOOL, &out));
        }

        info!(
            output = %request.output_path,
            elapsed_ms = out.duration.as_millis() as u64,
            "render finished"
        );
        Ok(RenderOutcome {
            output_path: request.output_path.clone(),
            stdout: out.stdout_tail(self.config.tail_chars).to_string(),
            duration: out.duration,
        })
    }

    /// Lists the compositions exposed by an entry point.
    pub async fn list_compositions(
        &self,
        request: &ListCompositionsRequest,
    ) -> RenderResult<CompositionsOutcome> {
        request.validate()?;
        let args = args::compositions_args(&self.config.package, request)?;
        let program = self.config.resolve_program();

        let out = self
            .runner
            .run(COMPOSITIONS_TOOL, program.as_os_str(), &args)
            .await?;
        if !out.success() {
            return Err(self.failure(COMPOSITIONS_TOOL, &out));
        }

        Ok(CompositionsOutcome {
            entry_point: request.entry_point.clone(),
            compositions: parse_composition_ids(&out.stdout),
            stdout: out.stdout_tail(self.config.tail_chars).to_string(),
        })
    }

    /// Renders one composition with the child's output going straight to ours.
    ///
    /// Returns the renderer's exit code (`None` if it was killed by a signal).
    /// A non-zero exit is not an error here.
    pub async fn render_inherited(&self, request: &RenderRequest) -> RenderResult<Option<i32>> {
        request.validate()?;
        let args = args::render_args(&self.config.package, request)?;
        let program = self.config.resolve_program();
        self.runner
            .run_inherited(RENDER_TOOL, program.as_os_str(), &args)
            .await
    }

    fn failure(&self, tool: &'static str, out: &CommandOutput) -> RenderError {
        RenderError::process_failed(
            tool,
            out.exit_code,
            out.stderr_tail(self.config.tail_chars),
        )
    }
}

/// Extracts composition ids from `remotion compositions` output.
///
/// Listing rows look like `SimplePromo  30  1920x1080  360 (12.00 sec)`:
/// an identifier followed by a numeric fps column. Anything else is skipped.
pub fn parse_composition_ids(stdout: &str) -> Vec<String> {
    stdout
        .lines()
        .filter_map(|line| {
            let mut cols = line.split_whitespace();
            let id = cols.next()?;
            let fps = cols.next()?;
            let is_id = id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
            (is_id && fps.parse::<f64>().is_ok()).then(|| id.to_string())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_composition_ids() {
        let stdout = "\
Bundling 100%
The following compositions are available:

CaptionedClip    30      1080x1920      450 (15.00 sec)
SimplePromo      30      1920x1080      360 (12.00 sec)
";
        assert_eq!(
            parse_composition_ids(stdout),
            vec!["CaptionedClip".to_string(), "SimplePromo".to_string()]
        );
    }

    #[test]
    fn test_parse_composition_ids_unknown_format() {
        assert!(parse_composition_ids("nothing to see here").is_empty());
        assert!(parse_composition_ids("").is_empty());
    }

    #[test]
    fn test_default_entry_point() {
        let renderer = Renderer::with_config(RendererConfig::default().default_entry_point("a/b.ts"));
        assert_eq!(renderer.default_entry_point(), "a/b.ts");
    }

    #[tokio::test]
    async fn test_render_rejects_invalid_request_without_spawning() {
        let renderer =
            Renderer::with_config(RendererConfig::default().program("/nonexistent/npx"));
        let err = renderer
            .render(&RenderRequest::new("src/index.ts", "", "/tmp/out.mp4"))
            .await
            .unwrap_err();
        assert!(matches!(err, RenderError::InvalidRequest { field: "compositionId", .. }));
    }
}
