//! Subprocess execution with captured output.

use std::{
    io,
    path::{Path, PathBuf},
    process::Stdio,
    time::Duration,
};

use async_trait::async_trait;
use tokio::{process::Command, time};
use tracing::debug;

use crate::{
    env::Environment,
    error::{Error, Result},
};

/// One external command to run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessInvocation {
    /// Executable to launch.
    pub executable: PathBuf,
    /// Arguments, in order.
    pub arguments: Vec<String>,
    /// Complete environment for the child; nothing is inherited.
    pub environment: Environment,
}

/// Captured outcome of a finished process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessResult {
    /// Captured standard output.
    pub stdout: String,
    /// Captured standard error.
    pub stderr: String,
    /// Exit code, or -1 when the process was terminated by a signal.
    pub exit_code: i32,
}

impl ProcessResult {
    /// Convert the result into combined output, or a failure on non-zero exit.
    ///
    /// Success joins stdout and stderr with a newline only when both are non-empty.
    /// Failure carries stderr, falling back to stdout when stderr is empty.
    pub fn into_output(self) -> Result<String> {
        if self.exit_code != 0 {
            let message = if self.stderr.is_empty() {
                self.stdout
            } else {
                self.stderr
            };
            return Err(Error::ProcessFailure {
                exit_code: self.exit_code,
                message,
            });
        }

        Ok(match (self.stdout.is_empty(), self.stderr.is_empty()) {
            (_, true) => self.stdout,
            (true, false) => self.stderr,
            (false, false) => format!("{}\n{}", self.stdout, self.stderr),
        })
    }
}

/// Launches external processes.
#[async_trait]
pub trait ProcessRunner: Send + Sync {
    /// Run the invocation to completion and capture its output.
    ///
    /// Only failures to launch or await the process are errors here; a non-zero
    /// exit is reported through [`ProcessResult::exit_code`].
    async fn execute(&self, invocation: &ProcessInvocation) -> Result<ProcessResult>;
}

/// Run an invocation and map its exit status into output or a [`Error::ProcessFailure`].
pub async fn run<R>(runner: &R, invocation: &ProcessInvocation) -> Result<String>
where
    R: ProcessRunner + ?Sized,
{
    runner.execute(invocation).await?.into_output()
}

/// Runner backed by real operating-system processes.
#[derive(Debug, Clone, Default)]
pub struct SystemRunner {
    /// Optional limit on how long a child may run.
    timeout: Option<Duration>,
}

impl SystemRunner {
    /// Create a runner with an optional timeout.
    pub fn new(timeout: Option<Duration>) -> Self {
        Self { timeout }
    }

    /// Limit applied to each child, if any.
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }
}

#[async_trait]
impl ProcessRunner for SystemRunner {
    async fn execute(&self, invocation: &ProcessInvocation) -> Result<ProcessResult> {
        let program = &invocation.executable;
        debug!(
            program = %program.display(),
            args = invocation.arguments.len(),
            "spawning process"
        );

        let child = Command::new(program)
            .args(&invocation.arguments)
            .env_clear()
            .envs(&invocation.environment)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(self.timeout.is_some())
            .spawn()
            .map_err(|error| spawn_error(program, error))?;

        let output = match self.timeout {
            Some(limit) => time::timeout(limit, child.wait_with_output())
                .await
                .map_err(|_| Error::ProcessTimeout {
                    program: program.clone(),
                    timeout: limit,
                })?,
            None => child.wait_with_output().await,
        }
        .map_err(|error| spawn_error(program, error))?;

        let exit_code = output.status.code().unwrap_or(-1);
        debug!(program = %program.display(), exit_code, "process exited");

        Ok(ProcessResult {
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            exit_code,
        })
    }
}

/// Wrap an IO error for a program.
fn spawn_error(program: &Path, source: io::Error) -> Error {
    Error::ProcessSpawn {
        program: program.to_path_buf(),
        source,
    }
}
