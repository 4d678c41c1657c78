use std::path::PathBuf;

use clap::Parser;
use remotion_mcp::transport::{line, sdk};
use remotion_mcp::{Dispatcher, TransportKind};
use remotion_render::{Renderer, RendererConfig, DEFAULT_ENTRY_POINT};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "remotion-mcp",
    version,
    about = "MCP server for rendering Remotion compositions"
)]
struct Args {
    /// Protocol framing on stdin/stdout
    #[arg(long, value_enum, default_value = "mcp")]
    transport: TransportKind,

    /// Project directory (defaults to current dir)
    #[arg(long, default_value = ".")]
    project_dir: String,

    /// Package runner used to launch the Remotion CLI (defaults to `npx` on PATH)
    #[arg(long, env = "REMOTION_NPX")]
    npx: Option<PathBuf>,

    /// Entry point used when a request omits projectPath
    #[arg(long, env = "REMOTION_DEFAULT_ENTRY", default_value = DEFAULT_ENTRY_POINT)]
    default_entry: PathBuf,

    /// Kill renders that run longer than this many seconds (no limit by default)
    #[arg(long)]
    timeout_secs: Option<u64>,

    /// Maximum number of renderer processes running at once (unbounded by default)
    #[arg(long)]
    max_concurrent: Option<usize>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // stdout carries the protocol; logs go to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    let args = Args::parse();
    std::env::set_current_dir(&args.project_dir)?;

    let mut config = RendererConfig::default().default_entry_point(args.default_entry);
    if let Some(npx) = args.npx {
        config = config.program(npx);
    }
    if let Some(secs) = args.timeout_secs {
        config = config.timeout_secs(secs);
    }

    let mut dispatcher = Dispatcher::new(Renderer::with_config(config));
    if let Some(max) = args.max_concurrent {
        dispatcher = dispatcher.with_max_concurrent(max);
    }

    info!(transport = ?args.transport, "starting remotion-mcp");
    match args.transport {
        TransportKind::Line => line::serve_stdio(dispatcher).await?,
        TransportKind::Mcp => sdk::serve_stdio(dispatcher).await?,
    }
    info!("remotion-mcp stopped");
    Ok(())
}
