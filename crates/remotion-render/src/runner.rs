//! Async subprocess runner.
//!
//! Spawns one child per call with stdin closed, buffers stdout and stderr in
//! memory, and reports the exit status. There is no retry and no timeout
//! unless one is configured.

use std::ffi::OsStr;
use std::path::PathBuf;
use std::process::{ExitStatus, Stdio};
use std::time::{Duration, Instant};

use tokio::process::Command;
use tracing::debug;

use crate::error::{RenderError, RenderResult};

/// Configuration for the subprocess runner.
#[derive(Debug, Clone, Default)]
pub struct RunnerConfig {
    /// Working directory for the child (inherits ours when unset).
    pub working_dir: Option<PathBuf>,
    /// Wall-clock limit; the child is killed once it elapses.
    pub timeout: Option<Duration>,
}

/// Captured result of one finished child process.
#[derive(Debug, Clone)]
pub struct CommandOutput {
    /// Exit code, `None` when the child was terminated by a signal.
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
    pub duration: Duration,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }

    /// Last `n` characters of stdout.
    pub fn stdout_tail(&self, n: usize) -> &str {
        tail(&self.stdout, n)
    }

    /// Last `n` characters of stderr.
    pub fn stderr_tail(&self, n: usize) -> &str {
        tail(&self.stderr, n)
    }
}

/// Returns the last `n` characters of `text`, split on a char boundary.
pub fn tail(text: &str, n: usize) -> &str {
    if n == 0 {
        return "";
    }
    match text.char_indices().rev().nth(n - 1) {
        Some((idx, _)) => &text[idx..],
        None => text,
    }
}

/// Runs external commands.
#[derive(Debug, Clone, Default)]
pub struct ProcessRunner {
    config: RunnerConfig,
}

impl ProcessRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: RunnerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RunnerConfig {
        &self.config
    }

    /// Runs `program` with `args` and buffers its output.
    ///
    /// `tool` labels timeout errors. A non-zero exit is not an error here;
    /// callers inspect [`CommandOutput::exit_code`].
    pub async fn run<I, S>(
        &self,
        tool: &'static str,
        program: &OsStr,
        args: I,
    ) -> RenderResult<CommandOutput>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let mut cmd = self.command(program, args);
        cmd.stdout(Stdio::piped()).stderr(Stdio::piped());

        let start = Instant::now();
        let child = cmd.spawn().map_err(|source| RenderError::SpawnFailed {
            program: program.to_string_lossy().into_owned(),
            source,
        })?;
        debug!(pid = child.id(), program = %program.to_string_lossy(), "spawned renderer");

        let wait = child.wait_with_output();
        let output = match self.config.timeout {
            Some(limit) => match tokio::time::timeout(limit, wait).await {
                Ok(res) => res,
                // Dropping the future drops the child, which kills it.
                Err(_) => {
                    return Err(RenderError::Timeout {
                        tool,
                        timeout_secs: limit.as_secs(),
                    })
                }
            },
            None => wait.await,
        }
        .map_err(|source| RenderError::WaitFailed {
            program: program.to_string_lossy().into_owned(),
            source,
        })?;

        let duration = start.elapsed();
        debug!(
            status = ?output.status.code(),
            elapsed_ms = duration.as_millis() as u64,
            "renderer exited"
        );

        Ok(CommandOutput {
            exit_code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            duration,
        })
    }

    /// Runs `program` with the child writing straight to our stdout/stderr.
    ///
    /// Returns the exit code, `None` if the child was killed by a signal.
    pub async fn run_inherited<I, S>(
        &self,
        tool: &'static str,
        program: &OsStr,
        args: I,
    ) -> RenderResult<Option<i32>>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let mut cmd = self.command(program, args);
        cmd.stdout(Stdio::inherit()).stderr(Stdio::inherit());

        let mut child = cmd.spawn().map_err(|source| RenderError::SpawnFailed {
            program: program.to_string_lossy().into_owned(),
            source,
        })?;

        let status: ExitStatus = match self.config.timeout {
            Some(limit) => match tokio::time::timeout(limit, child.wait()).await {
                Ok(res) => res,
                Err(_) => {
                    let _ = child.kill().await;
                    return Err(RenderError::Timeout {
                        tool,
                        timeout_secs: limit.as_secs(),
                    });
                }
            },
            None => child.wait().await,
        }
        .map_err(|source| RenderError::WaitFailed {
            program: program.to_string_lossy().into_owned(),
            source,
        })?;

        Ok(status.code())
    }

    fn command<I, S>(&self, program: &OsStr, args: I) -> Command
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let mut cmd = Command::new(program);
        cmd.args(args).stdin(Stdio::null()).kill_on_drop(true);
        if let Some(ref cwd) = self.config.working_dir {
            cmd.current_dir(cwd);
        }
        cmd
    }
}
