//! Child-process environment construction.
//!
//! A launcher that starts us from a desktop session or service manager often
//! provides a minimal environment without the user's interactive `PATH`. The
//! builder fills in the variables the runner needs so the child is
//! self-sufficient.

use std::{
    collections::{BTreeMap, HashSet},
    env,
    path::PathBuf,
};

use tracing::trace;

/// Environment passed to a child process.
pub type Environment = BTreeMap<String, String>;

/// Separator between `PATH` entries.
const PATH_SEPARATOR: &str = ":";

/// Builds sanitized environments for runner invocations.
#[derive(Debug, Clone)]
pub struct EnvironmentBuilder {
    /// Home directory applied when `HOME` is unset or empty.
    home: PathBuf,
    /// Name of the tool install root variable.
    install_root_var: String,
    /// Value applied to the install root variable when unset or empty.
    install_root: PathBuf,
    /// Entries appended to `PATH` when missing.
    fallback_path: Vec<String>,
}

impl EnvironmentBuilder {
    /// Create a builder from resolved settings.
    pub fn new(
        home: PathBuf,
        install_root_var: String,
        install_root: PathBuf,
        fallback_path: Vec<String>,
    ) -> Self {
        Self {
            home,
            install_root_var,
            install_root,
            fallback_path,
        }
    }

    /// Snapshot the current process environment and apply overrides.
    ///
    /// Variables whose name or value is not valid Unicode are dropped.
    pub fn build(&self) -> Environment {
        let base = env::vars_os().filter_map(|(key, value)| {
            Some((key.into_string().ok()?, value.into_string().ok()?))
        });
        self.build_from(base)
    }

    /// Apply overrides to an explicit base environment.
    pub fn build_from(&self, base: impl IntoIterator<Item = (String, String)>) -> Environment {
        let mut environment: Environment = base.into_iter().collect();

        if is_blank(&environment, "HOME") {
            environment.insert("HOME".to_string(), self.home.display().to_string());
        }

        let path = merge_path(
            environment.get("PATH").map(String::as_str).unwrap_or_default(),
            &self.fallback_path,
        );
        environment.insert("PATH".to_string(), path);

        if is_blank(&environment, &self.install_root_var) {
            environment.insert(
                self.install_root_var.clone(),
                self.install_root.display().to_string(),
            );
        }

        trace!(variables = environment.len(), "built child environment");
        environment
    }
}

/// Whether a variable is absent or empty.
fn is_blank(environment: &Environment, key: &str) -> bool {
    environment.get(key).is_none_or(String::is_empty)
}

/// De-duplicate existing `PATH` entries in order, then append missing fallbacks.
fn merge_path(existing: &str, fallback: &[String]) -> String {
    let mut seen = HashSet::new();
    let mut entries = Vec::new();
    let candidates = existing
        .split(PATH_SEPARATOR)
        .filter(|entry| !entry.is_empty())
        .chain(fallback.iter().map(String::as_str));
    for entry in candidates {
        if seen.insert(entry) {
            entries.push(entry);
        }
    }
    entries.join(PATH_SEPARATOR)
}
