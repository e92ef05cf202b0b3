#![warn(missing_docs)]
//! Drive an external skill-registry CLI: probe its login state and publish skills.
//!
//! The [`Worker`] locates the package runner, builds a self-sufficient child
//! environment, runs the registry CLI, and maps its output into a [`CliStatus`]
//! or a typed [`Error`].

/// Command-line interface wiring and dispatch.
mod cli;
/// Command implementations.
mod commands;
/// Configuration loading and defaults.
mod config;
/// Child-process environment construction.
mod env;
/// Error handling for the crate.
mod error;
/// Package-runner discovery.
mod locator;
/// Color palette and styling for CLI output.
mod palette;
/// Path expansion and normalization utilities.
mod paths;
/// Platform skill directory conventions.
mod platform;
/// Subprocess execution.
mod runner;
/// ANSI stripping and line extraction.
mod sanitize;
/// Skill artifact validation.
mod skill;
/// Shared test doubles.
#[cfg(test)]
mod testutil;
/// Semantic version bumping.
mod version;
/// Status probe and publish orchestration.
mod worker;

pub use crate::{
    env::{Environment, EnvironmentBuilder},
    error::{Error, Result},
    locator::{ExecutableLocator, Locate},
    runner::{ProcessInvocation, ProcessResult, ProcessRunner, SystemRunner, run as run_process},
    sanitize::{last_meaningful_line, strip_ansi},
    version::{INITIAL_VERSION, PublishBump, SemVer, bump_version, next_version},
    worker::{CliStatus, PublishRequest, Worker},
};

/// Run the CLI, returning a structured error on failure.
pub async fn run() -> Result<()> {
    cli::run().await
}
