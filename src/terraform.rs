mod binary;
mod exec;

pub use binary::{BINARY_NAME, BinaryConfig, find_terraform, look_path};
pub use exec::Terraform;

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExecError {
    #[error("working directory does not exist: {}", .0.display())]
    NoSuchDir(PathBuf),

    #[error("terraform binary does not exist: {}", .0.display())]
    NoSuchBinary(PathBuf),

    #[error("unable to run terraform {command}: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("terraform {command} failed ({}): {stderr}", exit_label(.code))]
    Failed {
        command: String,
        code: Option<i32>,
        stderr: String,
    },
}

fn exit_label(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exit status {}", code),
        None => "terminated by signal".to_string(),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlanOptions {
    /// Where the plan artifact is written.
    pub out: PathBuf,
    pub var_file: Option<PathBuf>,
}

impl PlanOptions {
    pub fn new(out: impl Into<PathBuf>) -> Self {
        Self {
            out: out.into(),
            var_file: None,
        }
    }

    pub fn with_var_file(mut self, var_file: Option<PathBuf>) -> Self {
        self.var_file = var_file;
        self
    }
}

/// The four Terraform operations the harness drives, bound to one working
/// directory.
#[async_trait]
pub trait Executor: Send + Sync {
    fn working_dir(&self) -> &Path;
    async fn init(&self) -> Result<(), ExecError>;
    /// Returns whether the plan contains changes.
    async fn plan(&self, options: &PlanOptions) -> Result<bool, ExecError>;
    async fn apply(&self, plan_file: &Path) -> Result<(), ExecError>;
    /// `var_file` is the one the last applied step planned with.
    async fn destroy(&self, var_file: Option<&Path>) -> Result<(), ExecError>;
}
