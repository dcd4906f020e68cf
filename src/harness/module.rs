use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use super::{CLEANUP_DIRS, CLEANUP_FILES, OutputLog, RunConfig, TestStep, remove_file_quietly};
use crate::terraform::Executor;

/// One root module under test.
#[derive(Debug, Clone)]
pub struct ModuleTest {
    /// Display name, the directory relative to the working directory.
    pub name: String,
    pub dir: PathBuf,
    /// Explicit steps. When empty a single step named after the module runs.
    pub steps: Vec<TestStep>,

    output: OutputLog,
    state_exists: bool,
    failed: bool,
}

/// Removes terraform working files from a module directory on drop.
struct WorkspaceCleanup(PathBuf);

impl Drop for WorkspaceCleanup {
    fn drop(&mut self) {
        clean_workspace(&self.0);
    }
}

impl ModuleTest {
    pub fn new(name: impl Into<String>, dir: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            dir: dir.into(),
            steps: Vec::new(),
            output: OutputLog::new(),
            state_exists: false,
            failed: false,
        }
    }

    pub fn with_steps(mut self, steps: Vec<TestStep>) -> Self {
        self.steps = steps;
        self
    }

    pub fn output(&self) -> &OutputLog {
        &self.output
    }

    pub fn state_exists(&self) -> bool {
        self.state_exists
    }

    pub fn failed(&self) -> bool {
        self.failed
    }

    /// Runs init, every step, and destroy when anything was applied.
    ///
    /// Outcomes land in [`ModuleTest::failed`] and [`ModuleTest::output`];
    /// terraform working files are removed from the module directory on every
    /// exit path.
    pub async fn test(&mut self, executor: &dyn Executor, config: &RunConfig) {
        let _cleanup = WorkspaceCleanup(self.dir.clone());

        if let Err(err) = executor.init().await {
            self.fail(format!("unable to terraform init: {}", err));
            return;
        }

        let mut state_exists = false;
        let mut failed = false;
        // destroy needs the same variables as the last successful apply
        let mut destroy_var_file = None;

        if self.steps.is_empty() {
            let mut step = TestStep::new(self.name.clone());
            step.test(executor, &config.plan_file).await;

            state_exists = step.state_exists();
            failed = step.failed();
            self.output.absorb(step.into_output());
        } else {
            let total = self.steps.len();
            for (index, step) in self.steps.iter_mut().enumerate() {
                step.test(executor, &config.plan_file).await;

                state_exists |= step.state_exists();
                if step.state_exists() {
                    destroy_var_file = step.var_file.clone();
                }
                if !step.output().is_empty() {
                    self.output
                        .push_section(&format!("step {}:", step.name), step.output());
                }

                if step.failed() {
                    failed = true;
                    tracing::debug!(
                        module = %self.name,
                        step = %step.name,
                        skipped = total - index - 1,
                        "step failed, skipping remaining steps"
                    );
                    break;
                }
            }
        }

        self.state_exists = state_exists;
        self.failed = failed;

        if self.state_exists {
            if let Err(err) = executor.destroy(destroy_var_file.as_deref()).await {
                self.fail(format!("unable to terraform destroy: {}", err));
            }
        }
    }

    fn fail(&mut self, message: String) {
        tracing::debug!(module = %self.name, %message, "module failed");
        self.output.log(message);
        self.failed = true;
    }
}

/// Deletes the terraform cache, state, lock file and crash log from `dir`.
pub fn clean_workspace(dir: &Path) {
    for name in CLEANUP_DIRS {
        let path = dir.join(name);
        match fs::remove_dir_all(&path) {
            Ok(()) => tracing::trace!(path = %path.display(), "removed"),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => tracing::warn!(path = %path.display(), error = %e, "unable to remove directory"),
        }
    }
    for name in CLEANUP_FILES {
        remove_file_quietly(&dir.join(name));
    }
}
