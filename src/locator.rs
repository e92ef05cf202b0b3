//! Package-runner executable discovery.

use std::{
    fs,
    path::{Path, PathBuf},
};

use async_trait::async_trait;
use tracing::{debug, trace};

use crate::{
    env::EnvironmentBuilder,
    runner::{ProcessInvocation, ProcessRunner, SystemRunner, run},
};

/// Launcher used for the `which` probe.
const ENV_PROGRAM: &str = "/usr/bin/env";

/// Finds the package-runner executable.
///
/// A missing tool is an expected condition, so implementations return `None`
/// rather than an error.
#[async_trait]
pub trait Locate: Send + Sync {
    /// Return the path of a usable executable, if any.
    async fn locate(&self) -> Option<PathBuf>;
}

/// Locator that checks an ordered candidate list, then asks `which`.
#[derive(Debug, Clone)]
pub struct ExecutableLocator<R = SystemRunner> {
    /// Executable name passed to `which`.
    program: String,
    /// Absolute candidate paths, in priority order.
    candidates: Vec<PathBuf>,
    /// Environment for the `which` probe.
    environment: EnvironmentBuilder,
    /// Runner for the `which` probe; shares the worker's timeout.
    runner: R,
}

impl<R: ProcessRunner> ExecutableLocator<R> {
    /// Create a locator for `program` with explicit candidates.
    pub fn new(
        program: String,
        candidates: Vec<PathBuf>,
        environment: EnvironmentBuilder,
        runner: R,
    ) -> Self {
        Self {
            program,
            candidates,
            environment,
            runner,
        }
    }

    /// Return the first candidate that is an executable file.
    pub fn first_candidate(&self) -> Option<PathBuf> {
        self.candidates
            .iter()
            .find(|candidate| {
                let usable = is_executable_file(candidate);
                trace!(path = %candidate.display(), usable, "checked candidate");
                usable
            })
            .cloned()
    }

    /// Resolve the program through `env which` with the builder's `PATH`.
    async fn which(&self) -> Option<PathBuf> {
        let invocation = ProcessInvocation {
            executable: PathBuf::from(ENV_PROGRAM),
            arguments: vec!["which".to_string(), self.program.clone()],
            environment: self.environment.build(),
        };
        let output = run(&self.runner, &invocation).await.ok()?;
        let resolved = PathBuf::from(output.trim());
        is_executable_file(&resolved).then_some(resolved)
    }
}

#[async_trait]
impl<R: ProcessRunner> Locate for ExecutableLocator<R> {
    async fn locate(&self) -> Option<PathBuf> {
        if let Some(found) = self.first_candidate() {
            debug!(path = %found.display(), "found runner candidate");
            return Some(found);
        }
        let found = self.which().await;
        debug!(program = %self.program, found = ?found, "which probe finished");
        found
    }
}

/// Whether a path is a regular file the current user may execute.
#[cfg(unix)]
fn is_executable_file(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;

    fs::metadata(path)
        .map(|metadata| metadata.is_file() && metadata.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

/// Whether a path is a regular file.
#[cfg(not(unix))]
fn is_executable_file(path: &Path) -> bool {
    fs::metadata(path)
        .map(|metadata| metadata.is_file())
        .unwrap_or(false)
}

#[cfg(all(test, unix))]
mod tests {
    use std::{fs, path::PathBuf};

    use tempfile::TempDir;

    use crate::{
        env::EnvironmentBuilder,
        locator::{ExecutableLocator, Locate},
        runner::SystemRunner,
        testutil::{StubRunner, ok, write_script},
    };

    fn environment(path: &str) -> EnvironmentBuilder {
        EnvironmentBuilder::new(
            PathBuf::from("/nonexistent-home"),
            "BUN_INSTALL".to_string(),
            PathBuf::from("/nonexistent-home/.bun"),
            vec![path.to_string()],
        )
    }

    #[test]
    fn prefers_earliest_executable_candidate() {
        let dir = TempDir::new().expect("tempdir");
        let missing = dir.path().join("missing");
        let plain = dir.path().join("plain");
        fs::write(&plain, "not executable").expect("write file");
        let first = write_script(dir.path(), "first", "exit 0");
        let second = write_script(dir.path(), "second", "exit 0");

        let locator = ExecutableLocator::new(
            "bunx".to_string(),
            vec![missing, plain, first.clone(), second],
            environment("/usr/bin"),
            SystemRunner::default(),
        );
        assert_eq!(locator.first_candidate(), Some(first));
    }

    #[test]
    fn skips_directories() {
        let dir = TempDir::new().expect("tempdir");
        let locator = ExecutableLocator::new(
            "bunx".to_string(),
            vec![dir.path().to_path_buf()],
            environment("/usr/bin"),
            SystemRunner::default(),
        );
        assert_eq!(locator.first_candidate(), None);
    }

    #[tokio::test]
    async fn falls_back_to_which() {
        if !["/usr/bin/which", "/bin/which"]
            .iter()
            .any(|path| PathBuf::from(path).is_file())
        {
            return;
        }
        let dir = TempDir::new().expect("tempdir");
        let tool = write_script(dir.path(), "skillpub-test-runner", "exit 0");
        let search_path = format!("{}:/usr/bin:/bin", dir.path().display());

        let locator = ExecutableLocator::new(
            "skillpub-test-runner".to_string(),
            Vec::new(),
            environment(&search_path),
            SystemRunner::default(),
        );
        assert_eq!(locator.locate().await, Some(tool));
    }

    #[tokio::test]
    async fn returns_none_when_nothing_matches() {
        let dir = TempDir::new().expect("tempdir");
        let locator = ExecutableLocator::new(
            "skillpub-definitely-missing".to_string(),
            vec![dir.path().join("bunx")],
            environment("/usr/bin"),
            SystemRunner::default(),
        );
        assert_eq!(locator.locate().await, None);
    }

    #[tokio::test]
    async fn which_probe_uses_the_given_runner() {
        let dir = TempDir::new().expect("tempdir");
        let tool = write_script(dir.path(), "bunx", "exit 0");
        let runner = StubRunner::new(vec![ok(&format!("{}\n", tool.display()))]);

        let locator = ExecutableLocator::new(
            "bunx".to_string(),
            vec![dir.path().join("missing")],
            environment("/usr/bin"),
            runner.clone(),
        );
        assert_eq!(locator.locate().await, Some(tool));

        let calls = runner.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].executable, PathBuf::from("/usr/bin/env"));
        assert_eq!(calls[0].arguments, vec!["which", "bunx"]);
    }

    #[tokio::test]
    async fn failed_which_probe_means_not_found() {
        let dir = TempDir::new().expect("tempdir");
        let runner = StubRunner::new(vec![StubRunner::exit(1, "", "bunx not found")]);

        let locator = ExecutableLocator::new(
            "bunx".to_string(),
            vec![dir.path().join("missing")],
            environment("/usr/bin"),
            runner,
        );
        assert_eq!(locator.locate().await, None);
    }
}
