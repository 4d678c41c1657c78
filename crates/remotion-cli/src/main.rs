//! remotion-render-demo - render one composition without the MCP server.
//!
//! Usage: remotion-render-demo <projectPath> <compositionId> [outputPath]

use std::process::ExitCode;

use clap::Parser;
use remotion_cli::{exit_status, Cli};
use remotion_render::Renderer;
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    // Missing positionals print usage to stderr and exit with status 2.
    let cli = Cli::parse();
    let request = cli.into_request();

    match Renderer::new().render_inherited(&request).await {
        Ok(code) => ExitCode::from(exit_status(code)),
        Err(e) => {
            tracing::error!(code = e.code(), "{e}");
            ExitCode::from(1)
        }
    }
}
