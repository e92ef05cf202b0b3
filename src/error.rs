//! Error types for the skillpub worker and CLI.

use std::{
    env::VarError, io, path::PathBuf, process::ExitCode, result::Result as StdResult,
    time::Duration,
};

use thiserror::Error;
use toml::de::Error as TomlError;

/// Result type for skillpub operations.
pub type Result<T> = StdResult<T, Error>;

/// Errors that can occur while probing or publishing.
#[derive(Debug, Error)]
pub enum Error {
    /// No usable package-runner executable was found.
    #[error("{tool} is not installed.")]
    ToolNotInstalled {
        /// Human-readable tool name.
        tool: String,
    },
    /// The external process exited with a non-zero status.
    #[error("{message}")]
    ProcessFailure {
        /// Exit code reported by the process, or -1 when killed by a signal.
        exit_code: i32,
        /// Captured stderr, or stdout when stderr was empty.
        message: String,
    },
    /// The external process could not be started or awaited.
    #[error("Failed to run `{program}`: {source}")]
    ProcessSpawn {
        /// Program that failed to start.
        program: PathBuf,
        /// Underlying IO error.
        source: io::Error,
    },
    /// The external process outlived the configured timeout.
    #[error("`{program}` did not finish within {timeout:?}")]
    ProcessTimeout {
        /// Program that timed out.
        program: PathBuf,
        /// Timeout that elapsed.
        timeout: Duration,
    },
    /// Home directory resolution failed.
    #[error("Failed to resolve the home directory.")]
    HomeDirMissing,
    /// An explicitly requested config file does not exist.
    #[error("Config file not found: {path}")]
    ConfigMissing {
        /// Path to the config file.
        path: PathBuf,
    },
    /// The configuration file could not be read.
    #[error("Failed to read config at {path}: {source}")]
    ConfigRead {
        /// Path to the config file.
        path: PathBuf,
        /// Underlying IO error.
        source: io::Error,
    },
    /// The configuration file could not be parsed.
    #[error("Failed to parse config at {path}: {source}")]
    ConfigParse {
        /// Path to the config file.
        path: PathBuf,
        /// Underlying parse error.
        source: TomlError,
    },
    /// A configured path could not be expanded.
    #[error("Invalid path in config: {path}: {source}")]
    PathExpansion {
        /// Input path that failed to expand.
        path: String,
        /// Underlying expansion error.
        source: shellexpand::LookupError<VarError>,
    },
    /// A skill name could not be found for the selected platform.
    #[error("Skill '{name}' not found in {platform} skill directories")]
    SkillNotFound {
        /// Missing skill name.
        name: String,
        /// Platform that was searched.
        platform: String,
    },
    /// The artifact directory does not exist.
    #[error("Skill directory does not exist: {path}")]
    ArtifactMissing {
        /// Path that does not exist.
        path: PathBuf,
    },
    /// A skill file could not be read.
    #[error("Failed to read skill file at {path}: {source}")]
    SkillRead {
        /// Path that failed to read.
        path: PathBuf,
        /// Underlying IO error.
        source: io::Error,
    },
    /// The skill file is present but malformed.
    #[error("Invalid skill file at {path}: {message}")]
    InvalidSkill {
        /// Path to the skill file.
        path: PathBuf,
        /// Description of the problem.
        message: String,
    },
    /// A version string did not parse as `major.minor.patch`.
    #[error("Not a major.minor.patch version: {version}")]
    InvalidVersion {
        /// Rejected input.
        version: String,
    },
    /// An interactive prompt was interrupted or canceled.
    #[error("Prompt canceled.")]
    PromptCanceled,
    /// An interactive prompt failed.
    #[error("Prompt failed: {message}")]
    PromptFailed {
        /// Error message describing the prompt failure.
        message: String,
    },
    /// Status output could not be serialized.
    #[error("Failed to serialize status: {source}")]
    StatusSerialize {
        /// Underlying serialization error.
        source: serde_json::Error,
    },
}

impl Error {
    /// Map errors to exit codes for CLI termination.
    pub fn exit_code(&self) -> ExitCode {
        match self {
            Self::ToolNotInstalled { .. } => ExitCode::from(3),
            Self::ProcessFailure { .. } | Self::ProcessTimeout { .. } => ExitCode::from(4),
            Self::PromptCanceled => ExitCode::from(130),
            _ => ExitCode::from(1),
        }
    }
}
