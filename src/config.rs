//! Configuration loading and defaults.

use std::{
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
    time::Duration,
};

use serde::Deserialize;

use crate::{
    env::EnvironmentBuilder,
    error::{Error, Result},
    locator::ExecutableLocator,
    paths,
    runner::SystemRunner,
};

/// Package-runner executable name.
const DEFAULT_PROGRAM: &str = "bunx";
/// Publishing CLI package handed to the runner.
const DEFAULT_PACKAGE: &str = "clawhub@latest";
/// Name shown when the runner is missing.
const DEFAULT_DISPLAY_NAME: &str = "Bun";
/// Variable naming the runner's install root.
const DEFAULT_INSTALL_ROOT_VAR: &str = "BUN_INSTALL";
/// Install root relative to the home directory.
const DEFAULT_INSTALL_ROOT_DIR: &str = ".bun";
/// Candidate executables, in probe order.
const DEFAULT_CANDIDATES: [&str; 4] = [
    "~/.bun/bin/bunx",
    "/opt/homebrew/bin/bunx",
    "/usr/local/bin/bunx",
    "/usr/bin/bunx",
];
/// PATH entries guaranteed to the child process.
const DEFAULT_FALLBACK_PATH: [&str; 4] = ["/opt/homebrew/bin", "/usr/local/bin", "/usr/bin", "/bin"];

/// Resolved configuration for the publishing worker.
#[derive(Debug, Clone)]
pub struct Config {
    /// Package-runner executable name, used for the `which` probe.
    pub(crate) program: String,
    /// Package specifier passed as the first runner argument.
    pub(crate) package: String,
    /// Human-readable tool name.
    pub(crate) display_name: String,
    /// Ordered candidate executable paths.
    pub(crate) candidates: Vec<PathBuf>,
    /// Environment variable naming the tool install root.
    pub(crate) install_root_var: String,
    /// Install root directory relative to home.
    pub(crate) install_root_dir: String,
    /// PATH entries appended when missing.
    pub(crate) fallback_path: Vec<String>,
    /// Optional subprocess timeout.
    pub(crate) timeout: Option<Duration>,
    /// Home directory used for expansion and the child environment.
    pub(crate) home: PathBuf,
}

/// Raw config file structure.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawConfig {
    /// Package-runner executable name.
    program: Option<String>,
    /// Package specifier passed to the runner.
    package: Option<String>,
    /// Human-readable tool name.
    display_name: Option<String>,
    /// Candidate executable paths.
    candidates: Option<Vec<String>>,
    /// Install root variable name.
    install_root_var: Option<String>,
    /// Install root directory relative to home.
    install_root_dir: Option<String>,
    /// PATH fallback entries.
    fallback_path: Option<Vec<String>>,
    /// Subprocess timeout in seconds; zero disables it.
    timeout_secs: Option<u64>,
}

impl Config {
    /// Load the config from an explicit path, or the default location when `None`.
    ///
    /// A missing default file yields the built-in defaults.
    pub(crate) fn load(path: Option<&Path>) -> Result<Self> {
        let home = paths::home_dir()?;
        match path {
            Some(path) => Self::load_from(path, home, true),
            None => {
                let path = paths::default_config_path()?;
                Self::load_from(&path, home, false)
            }
        }
    }

    /// Load a config file, expanding paths relative to its directory.
    pub(crate) fn load_from(path: &Path, home: PathBuf, required: bool) -> Result<Self> {
        let raw = match fs::read_to_string(path) {
            Ok(contents) => toml::from_str(&contents).map_err(|error| Error::ConfigParse {
                path: path.to_path_buf(),
                source: error,
            })?,
            Err(error) if error.kind() == ErrorKind::NotFound => {
                if required {
                    return Err(Error::ConfigMissing {
                        path: path.to_path_buf(),
                    });
                }
                RawConfig::default()
            }
            Err(error) => {
                return Err(Error::ConfigRead {
                    path: path.to_path_buf(),
                    source: error,
                });
            }
        };

        let base_dir = path.parent().unwrap_or(Path::new("."));
        Self::from_raw(raw, base_dir, home)
    }

    /// Apply defaults to a raw config.
    fn from_raw(raw: RawConfig, base_dir: &Path, home: PathBuf) -> Result<Self> {
        let candidates = raw
            .candidates
            .unwrap_or_else(|| DEFAULT_CANDIDATES.map(String::from).to_vec())
            .iter()
            .map(|candidate| expand_candidate(candidate, base_dir, &home))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            program: raw.program.unwrap_or_else(|| DEFAULT_PROGRAM.to_string()),
            package: raw.package.unwrap_or_else(|| DEFAULT_PACKAGE.to_string()),
            display_name: raw
                .display_name
                .unwrap_or_else(|| DEFAULT_DISPLAY_NAME.to_string()),
            candidates,
            install_root_var: raw
                .install_root_var
                .unwrap_or_else(|| DEFAULT_INSTALL_ROOT_VAR.to_string()),
            install_root_dir: raw
                .install_root_dir
                .unwrap_or_else(|| DEFAULT_INSTALL_ROOT_DIR.to_string()),
            fallback_path: raw
                .fallback_path
                .unwrap_or_else(|| DEFAULT_FALLBACK_PATH.map(String::from).to_vec()),
            timeout: raw
                .timeout_secs
                .filter(|secs| *secs > 0)
                .map(Duration::from_secs),
            home,
        })
    }

    /// Override the subprocess timeout.
    pub(crate) fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        if timeout.is_some() {
            self.timeout = timeout;
        }
        self
    }

    /// Build the environment builder described by this config.
    pub(crate) fn environment(&self) -> EnvironmentBuilder {
        EnvironmentBuilder::new(
            self.home.clone(),
            self.install_root_var.clone(),
            self.home.join(&self.install_root_dir),
            self.fallback_path.clone(),
        )
    }

    /// Build the executable locator described by this config.
    pub(crate) fn locator(&self) -> ExecutableLocator {
        ExecutableLocator::new(
            self.program.clone(),
            self.candidates.clone(),
            self.environment(),
            self.runner(),
        )
    }

    /// Build the process runner, bounded by the configured timeout.
    pub(crate) fn runner(&self) -> SystemRunner {
        SystemRunner::new(self.timeout)
    }
}

/// Expand a candidate path, treating a leading `~` as the configured home.
fn expand_candidate(raw: &str, base_dir: &Path, home: &Path) -> Result<PathBuf> {
    if raw == "~" {
        return Ok(home.to_path_buf());
    }
    if let Some(rest) = raw.strip_prefix("~/") {
        return Ok(home.join(rest));
    }
    paths::expand_path(raw, base_dir)
}
