use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::{Output, Stdio};

use async_trait::async_trait;
use tokio::process::Command;

use super::{ExecError, Executor, PlanOptions};

/// Runs the real `terraform` binary inside one module directory.
#[derive(Debug, Clone)]
pub struct Terraform {
    working_dir: PathBuf,
    binary: PathBuf,
}

impl Terraform {
    pub fn new(
        working_dir: impl Into<PathBuf>,
        binary: impl Into<PathBuf>,
    ) -> Result<Self, ExecError> {
        let working_dir = working_dir.into();
        let binary = binary.into();

        if !working_dir.is_dir() {
            return Err(ExecError::NoSuchDir(working_dir));
        }
        if !binary.is_file() {
            return Err(ExecError::NoSuchBinary(binary));
        }

        Ok(Self {
            working_dir,
            binary,
        })
    }

    async fn run(&self, command: &str, args: Vec<OsString>) -> Result<Output, ExecError> {
        tracing::debug!(
            dir = %self.working_dir.display(),
            command,
            args = ?args,
            "running terraform"
        );

        Command::new(&self.binary)
            .arg(command)
            .args(&args)
            .current_dir(&self.working_dir)
            .env("TF_IN_AUTOMATION", "1")
            .env("CHECKPOINT_DISABLE", "1")
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|source| ExecError::Spawn {
                command: command.to_string(),
                source,
            })
    }

    async fn run_checked(&self, command: &str, args: Vec<OsString>) -> Result<(), ExecError> {
        let output = self.run(command, args).await?;
        if output.status.success() {
            Ok(())
        } else {
            Err(failure(command, &output))
        }
    }
}

fn failure(command: &str, output: &Output) -> ExecError {
    let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
    ExecError::Failed {
        command: command.to_string(),
        code: output.status.code(),
        stderr,
    }
}

fn flag(name: &str, value: &Path) -> OsString {
    let mut arg = OsString::from(format!("-{}=", name));
    arg.push(value);
    arg
}

fn base_args(extra: &[&str]) -> Vec<OsString> {
    ["-no-color", "-input=false"]
        .iter()
        .chain(extra)
        .map(OsString::from)
        .collect()
}

#[async_trait]
impl Executor for Terraform {
    fn working_dir(&self) -> &Path {
        &self.working_dir
    }

    async fn init(&self) -> Result<(), ExecError> {
        self.run_checked("init", base_args(&[])).await
    }

    async fn plan(&self, options: &PlanOptions) -> Result<bool, ExecError> {
        let mut args = base_args(&["-detailed-exitcode"]);
        args.push(flag("out", &options.out));
        if let Some(var_file) = &options.var_file {
            args.push(flag("var-file", var_file));
        }

        let output = self.run("plan", args).await?;

        // -detailed-exitcode: 0 = no changes, 2 = changes present
        match output.status.code() {
            Some(0) => Ok(false),
            Some(2) => Ok(true),
            _ => Err(failure("plan", &output)),
        }
    }

    async fn apply(&self, plan_file: &Path) -> Result<(), ExecError> {
        let mut args = base_args(&["-auto-approve"]);
        args.push(plan_file.as_os_str().to_os_string());
        self.run_checked("apply", args).await
    }

    async fn destroy(&self, var_file: Option<&Path>) -> Result<(), ExecError> {
        let mut args = base_args(&["-auto-approve"]);
        if let Some(var_file) = var_file {
            args.push(flag("var-file", var_file));
        }
        self.run_checked("destroy", args).await
    }
}
