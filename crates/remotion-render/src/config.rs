//! Renderer configuration and program discovery.

use std::path::PathBuf;
use std::time::Duration;

use crate::runner::RunnerConfig;

/// Package handed to the package-runner shim.
pub const DEFAULT_PACKAGE: &str = "remotion";

/// Entry point used when a request does not name a project.
pub const DEFAULT_ENTRY_POINT: &str = "remotion-template/src/index.ts";

/// Number of trailing characters kept from captured output.
pub const DEFAULT_TAIL_CHARS: usize = 4000;

/// Environment variable that overrides the package-runner executable.
pub const PROGRAM_ENV: &str = "REMOTION_NPX";

/// Configuration for a [`crate::Renderer`].
#[derive(Debug, Clone)]
pub struct RendererConfig {
    /// Explicit package-runner executable (`npx` when unset).
    pub program: Option<PathBuf>,
    /// Package name passed to the package runner.
    pub package: String,
    /// Entry point substituted when a request omits its project path.
    pub default_entry_point: PathBuf,
    /// Subprocess settings.
    pub runner: RunnerConfig,
    /// Trailing characters kept from stdout/stderr in responses.
    pub tail_chars: usize,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            program: None,
            package: DEFAULT_PACKAGE.to_string(),
            default_entry_point: PathBuf::from(DEFAULT_ENTRY_POINT),
            runner: RunnerConfig::default(),
            tail_chars: DEFAULT_TAIL_CHARS,
        }
    }
}

impl RendererConfig {
    /// Sets the package-runner executable.
    pub fn program(mut self, path: impl Into<PathBuf>) -> Self {
        self.program = Some(path.into());
        self
    }

    /// Sets the package name.
    pub fn package(mut self, package: impl Into<String>) -> Self {
        self.package = package.into();
        self
    }

    /// Sets the default entry point.
    pub fn default_entry_point(mut self, path: impl Into<PathBuf>) -> Self {
        self.default_entry_point = path.into();
        self
    }

    /// Sets the working directory for spawned renderers.
    pub fn working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.runner.working_dir = Some(dir.into());
        self
    }

    /// Kills renderers that run longer than `secs` seconds.
    pub fn timeout_secs(mut self, secs: u64) -> Self {
        self.runner.timeout = Some(Duration::from_secs(secs));
        self
    }

    /// Sets how many trailing characters of output are reported.
    pub fn tail_chars(mut self, n: usize) -> Self {
        self.tail_chars = n;
        self
    }

    /// Resolves the executable used to launch the renderer.
    ///
    /// Order: explicit config, `REMOTION_NPX`, `npx` on `PATH`, then bare
    /// `npx` so a missing tool surfaces as a spawn failure.
    pub fn resolve_program(&self) -> PathBuf {
        if let Some(ref program) = self.program {
            return program.clone();
        }

        if let Some(program) = std::env::var_os(PROGRAM_ENV) {
            if !program.is_empty() {
                return PathBuf::from(program);
            }
        }

        let name = if cfg!(windows) { "npx.cmd" } else { "npx" };
        which::which(name).unwrap_or_else(|_| PathBuf::from(name))
    }
}
