//! Test doubles and fixtures for worker tests.
//!
//! `StubRunner` replays scripted process results and records every
//! invocation; `FixedLocator` answers `locate` with a fixed path.

#![allow(dead_code)]

use std::{
    collections::VecDeque,
    fs,
    path::{Path, PathBuf},
    sync::{
        Arc, Mutex,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};

use async_trait::async_trait;

use crate::{
    env::EnvironmentBuilder,
    error::Result,
    locator::Locate,
    runner::{ProcessInvocation, ProcessResult, ProcessRunner},
    skill::SKILL_FILE_NAME,
    worker::Worker,
};

/// Locator returning a preset answer.
#[derive(Debug, Clone)]
pub struct FixedLocator(Option<PathBuf>);

impl FixedLocator {
    /// Locator that reports the tool at `path`.
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self(Some(path.into()))
    }

    /// Locator that reports the tool as missing.
    pub fn missing() -> Self {
        Self(None)
    }
}

#[async_trait]
impl Locate for FixedLocator {
    async fn locate(&self) -> Option<PathBuf> {
        self.0.clone()
    }
}

/// Shared state behind a `StubRunner`.
#[derive(Debug, Default)]
struct StubState {
    /// Results handed out in order.
    responses: Mutex<VecDeque<ProcessResult>>,
    /// Invocations received so far.
    calls: Mutex<Vec<ProcessInvocation>>,
    /// Executions currently running.
    in_flight: AtomicUsize,
    /// Highest observed value of `in_flight`.
    max_in_flight: AtomicUsize,
}

/// Runner that replays scripted results.
///
/// Clones share state, so a test can keep a handle after moving one into a worker.
#[derive(Debug, Clone, Default)]
pub struct StubRunner {
    /// Shared state.
    state: Arc<StubState>,
    /// Simulated execution time.
    delay: Option<Duration>,
}

impl StubRunner {
    /// Runner that returns `responses` in order, then successful empty output.
    pub fn new(responses: Vec<ProcessResult>) -> Self {
        let runner = Self::default();
        runner
            .state
            .responses
            .lock()
            .expect("responses lock")
            .extend(responses);
        runner
    }

    /// Make every execution take `delay`.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Result with the given exit code and output.
    pub fn exit(exit_code: i32, stdout: &str, stderr: &str) -> ProcessResult {
        ProcessResult {
            stdout: stdout.to_string(),
            stderr: stderr.to_string(),
            exit_code,
        }
    }

    /// Invocations received so far.
    pub fn calls(&self) -> Vec<ProcessInvocation> {
        self.state.calls.lock().expect("calls lock").clone()
    }

    /// Highest number of concurrent executions observed.
    pub fn max_in_flight(&self) -> usize {
        self.state.max_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ProcessRunner for StubRunner {
    async fn execute(&self, invocation: &ProcessInvocation) -> Result<ProcessResult> {
        let running = self.state.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.state.max_in_flight.fetch_max(running, Ordering::SeqCst);
        self.state
            .calls
            .lock()
            .expect("calls lock")
            .push(invocation.clone());

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let response = self
            .state
            .responses
            .lock()
            .expect("responses lock")
            .pop_front()
            .unwrap_or_else(|| ok(""));
        self.state.in_flight.fetch_sub(1, Ordering::SeqCst);
        Ok(response)
    }
}

/// Successful result with `stdout`.
pub fn ok(stdout: &str) -> ProcessResult {
    StubRunner::exit(0, stdout, "")
}

/// Environment builder with fixed home and install root.
pub fn test_environment() -> EnvironmentBuilder {
    EnvironmentBuilder::new(
        PathBuf::from("/home/tester"),
        "BUN_INSTALL".to_string(),
        PathBuf::from("/home/tester/.bun"),
        vec!["/usr/bin".to_string(), "/bin".to_string()],
    )
}

/// Worker wired to test doubles with the default package and tool name.
pub fn worker(locator: FixedLocator, runner: StubRunner) -> Worker<FixedLocator, StubRunner> {
    Worker::new(locator, runner, test_environment(), "clawhub@latest", "Bun")
}

/// Write an executable shell script and return its path.
#[cfg(unix)]
pub fn write_script(dir: &Path, name: &str, body: &str) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.join(name);
    fs::write(&path, format!("#!/bin/sh\n{body}\n")).expect("write script");
    let mut permissions = fs::metadata(&path).expect("script metadata").permissions();
    permissions.set_mode(0o755);
    fs::set_permissions(&path, permissions).expect("chmod script");
    path
}

/// Create a skill directory containing `contents` as its skill file.
pub fn write_skill(root: &Path, name: &str, contents: &str) -> PathBuf {
    let skill_dir = root.join(name);
    fs::create_dir_all(&skill_dir).expect("create skill dir");
    fs::write(skill_dir.join(SKILL_FILE_NAME), contents).expect("write skill");
    skill_dir
}

/// Skill file contents with the given name and description.
pub fn skill_content(name: &str, description: &str) -> String {
    format!("---\nname: {name}\ndescription: {description}\n---\n# {name}\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::run;

    #[tokio::test]
    async fn replays_responses_in_order() {
        let runner = StubRunner::new(vec![ok("first"), StubRunner::exit(3, "", "boom")]);
        let invocation = ProcessInvocation {
            executable: PathBuf::from("/bin/true"),
            arguments: Vec::new(),
            environment: Default::default(),
        };

        assert_eq!(run(&runner, &invocation).await.expect("first ok"), "first");
        assert!(run(&runner, &invocation).await.is_err());
        assert_eq!(run(&runner, &invocation).await.expect("default ok"), "");
        assert_eq!(runner.calls().len(), 3);
    }

    #[test]
    fn writes_skill_fixture() {
        let dir = tempfile::tempdir().expect("tempdir");
        let skill_dir = write_skill(dir.path(), "pdf", &skill_content("pdf", "PDF tools"));
        assert!(skill_dir.join(SKILL_FILE_NAME).is_file());
    }
}
