//! Status probing and publishing through the external registry CLI.
//!
//! The worker composes the locator, environment builder, runner, and output
//! sanitizer. Each public operation holds the worker's gate for its whole
//! duration, so one worker never has more than one child process in flight.

use std::path::{Path, PathBuf};

use serde::Serialize;
use tokio::sync::Mutex;
use tracing::debug;

use crate::{
    config::Config,
    env::EnvironmentBuilder,
    error::{Error, Result},
    locator::{ExecutableLocator, Locate},
    runner::{ProcessInvocation, ProcessRunner, SystemRunner, run},
    sanitize::last_meaningful_line,
    version::{PublishBump, next_version},
};

/// Installation and authentication state of the external CLI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CliStatus {
    /// Whether a runner executable was found.
    pub is_installed: bool,
    /// Whether `whoami` reported a user.
    pub is_logged_in: bool,
    /// Reported username, when logged in.
    pub username: Option<String>,
    /// Reason the status is degraded, when there is one to show.
    pub error_message: Option<String>,
}

/// Parameters for one publish action.
#[derive(Debug, Clone)]
pub struct PublishRequest {
    /// Skill directory to publish.
    pub artifact_path: PathBuf,
    /// Last published version, if any.
    pub previous_version: Option<String>,
    /// Increment applied to the previous version.
    pub bump: PublishBump,
    /// Release notes; omitted when blank.
    pub changelog: String,
    /// Tags; blank entries are dropped.
    pub tags: Vec<String>,
}

impl PublishRequest {
    /// Create a request with no changelog or tags.
    pub fn new(
        artifact_path: impl Into<PathBuf>,
        previous_version: Option<String>,
        bump: PublishBump,
    ) -> Self {
        Self {
            artifact_path: artifact_path.into(),
            previous_version,
            bump,
            changelog: String::new(),
            tags: Vec::new(),
        }
    }

    /// Set the changelog text.
    pub fn with_changelog(mut self, changelog: impl Into<String>) -> Self {
        self.changelog = changelog.into();
        self
    }

    /// Set the tag list.
    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = tags;
        self
    }

    /// Version this request will publish.
    pub fn target_version(&self) -> String {
        next_version(self.previous_version.as_deref(), self.bump)
    }

    /// Trimmed, non-blank tags in their original order.
    pub fn cleaned_tags(&self) -> Vec<&str> {
        self.tags
            .iter()
            .map(|tag| tag.trim())
            .filter(|tag| !tag.is_empty())
            .collect()
    }

    /// Arguments for the `publish` subcommand.
    pub fn arguments(&self) -> Vec<String> {
        let mut arguments = vec![
            "publish".to_string(),
            self.artifact_path.display().to_string(),
            "--version".to_string(),
            self.target_version(),
        ];

        if !self.changelog.trim().is_empty() {
            arguments.push("--changelog".to_string());
            arguments.push(self.changelog.clone());
        }

        let tags = self.cleaned_tags();
        if !tags.is_empty() {
            arguments.push("--tags".to_string());
            arguments.push(tags.join(","));
        }

        arguments
    }
}

/// Drives the external registry CLI for one caller.
#[derive(Debug)]
pub struct Worker<L = ExecutableLocator, R = SystemRunner> {
    /// Finds the runner executable.
    locator: L,
    /// Launches child processes.
    runner: R,
    /// Builds the child environment.
    environment: EnvironmentBuilder,
    /// Package specifier placed before every subcommand; empty to call the executable directly.
    package: String,
    /// Tool name used in "not installed" messages.
    tool_name: String,
    /// Serializes operations on this worker.
    gate: Mutex<()>,
}

impl Worker {
    /// Build a worker that runs real processes as described by `config`.
    pub(crate) fn from_config(config: &Config) -> Self {
        Self::new(
            config.locator(),
            config.runner(),
            config.environment(),
            config.package.clone(),
            config.display_name.clone(),
        )
    }
}

impl<L: Locate, R: ProcessRunner> Worker<L, R> {
    /// Create a worker from its collaborators.
    pub fn new(
        locator: L,
        runner: R,
        environment: EnvironmentBuilder,
        package: impl Into<String>,
        tool_name: impl Into<String>,
    ) -> Self {
        Self {
            locator,
            runner,
            environment,
            package: package.into(),
            tool_name: tool_name.into(),
            gate: Mutex::new(()),
        }
    }

    /// Report whether the CLI is installed and which user it is logged in as.
    ///
    /// A failing `whoami` means "not logged in" and is not an error.
    pub async fn fetch_status(&self) -> CliStatus {
        let _guard = self.gate.lock().await;

        let Some(executable) = self.locator.locate().await else {
            return CliStatus {
                is_installed: false,
                is_logged_in: false,
                username: None,
                error_message: Some(self.not_installed().to_string()),
            };
        };

        let invocation = self.invocation(&executable, vec!["whoami".to_string()]);
        match run(&self.runner, &invocation).await {
            Ok(output) => {
                let username = last_meaningful_line(&output);
                CliStatus {
                    is_installed: true,
                    is_logged_in: !username.is_empty(),
                    username: (!username.is_empty()).then_some(username),
                    error_message: None,
                }
            }
            Err(_) => CliStatus {
                is_installed: true,
                is_logged_in: false,
                username: None,
                error_message: None,
            },
        }
    }

    /// Publish a skill, returning the version that was published.
    pub async fn publish_skill(&self, request: &PublishRequest) -> Result<String> {
        let _guard = self.gate.lock().await;

        let executable = self
            .locator
            .locate()
            .await
            .ok_or_else(|| self.not_installed())?;

        let version = request.target_version();
        debug!(
            artifact = %request.artifact_path.display(),
            version = %version,
            "publishing skill"
        );
        let invocation = self.invocation(&executable, request.arguments());
        run(&self.runner, &invocation).await?;
        Ok(version)
    }

    /// Full argument list for a subcommand, including the package prefix.
    pub fn command_line(&self, subcommand: Vec<String>) -> Vec<String> {
        if self.package.is_empty() {
            return subcommand;
        }
        let mut arguments = Vec::with_capacity(subcommand.len() + 1);
        arguments.push(self.package.clone());
        arguments.extend(subcommand);
        arguments
    }

    /// Build an invocation with a fresh environment snapshot.
    fn invocation(&self, executable: &Path, subcommand: Vec<String>) -> ProcessInvocation {
        ProcessInvocation {
            executable: executable.to_path_buf(),
            arguments: self.command_line(subcommand),
            environment: self.environment.build(),
        }
    }

    /// Error for a missing runner.
    fn not_installed(&self) -> Error {
        Error::ToolNotInstalled {
            tool: self.tool_name.clone(),
        }
    }
}
