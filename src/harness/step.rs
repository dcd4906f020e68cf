use std::path::{Path, PathBuf};

use super::{OutputLog, remove_file_quietly};
use crate::terraform::{Executor, PlanOptions};

/// One plan → apply cycle.
#[derive(Debug, Clone)]
pub struct TestStep {
    pub name: String,
    /// Passed to `terraform plan -var-file`, relative to the module directory.
    pub var_file: Option<PathBuf>,

    output: OutputLog,
    state_exists: bool,
    failed: bool,
}

/// Removes the plan artifact when the step returns, whatever the outcome.
struct PlanArtifact<'a>(&'a Path);

impl Drop for PlanArtifact<'_> {
    fn drop(&mut self) {
        remove_file_quietly(self.0);
    }
}

impl TestStep {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            var_file: None,
            output: OutputLog::new(),
            state_exists: false,
            failed: false,
        }
    }

    pub fn with_var_file(mut self, var_file: impl Into<PathBuf>) -> Self {
        self.var_file = Some(var_file.into());
        self
    }

    pub fn output(&self) -> &OutputLog {
        &self.output
    }

    pub fn into_output(self) -> OutputLog {
        self.output
    }

    pub fn state_exists(&self) -> bool {
        self.state_exists
    }

    pub fn failed(&self) -> bool {
        self.failed
    }

    pub async fn test(&mut self, executor: &dyn Executor, plan_file: &Path) {
        let _artifact = PlanArtifact(plan_file);

        let options = PlanOptions::new(plan_file).with_var_file(self.var_file.clone());
        let changes = match executor.plan(&options).await {
            Ok(changes) => changes,
            Err(err) => {
                self.fail(format!("unable to terraform plan: {}", err));
                return;
            }
        };
        if !changes {
            self.output.log("no changes detected during initial apply");
        }

        if let Err(err) = executor.apply(plan_file).await {
            self.fail(format!("unable to terraform apply: {}", err));
            return;
        }

        self.state_exists = true;
        tracing::debug!(step = %self.name, changes, "step applied");
    }

    fn fail(&mut self, message: String) {
        tracing::debug!(step = %self.name, %message, "step failed");
        self.output.log(message);
        self.failed = true;
    }
}
