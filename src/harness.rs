//! Module and step state machines.
//!
//! A [`ModuleTest`] runs `init`, then one or more [`TestStep`]s (each a
//! `plan` → `apply` cycle), then `destroy` if anything was applied. Failures
//! are recorded on the module rather than returned, so one broken module
//! never stops the run.

mod module;
mod output;
mod step;

pub use module::{ModuleTest, clean_workspace};
pub use output::OutputLog;
pub use step::TestStep;

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

pub const DEFAULT_PLAN_FILE: &str = "testplan.tfplan";

/// Directories terraform leaves in a module directory.
pub const CLEANUP_DIRS: &[&str] = &[".terraform"];

/// Files terraform leaves in a module directory.
pub const CLEANUP_FILES: &[&str] = &[
    "terraform.tfstate",
    "terraform.tfstate.backup",
    ".terraform.lock.hcl",
    "crash.log",
];

#[derive(Debug, Clone, PartialEq)]
pub struct RunConfig {
    /// Absolute path of the plan artifact shared by every step. Runs are
    /// sequential; a parallel runner needs one path per module.
    pub plan_file: PathBuf,
}

impl RunConfig {
    pub fn new(plan_file: impl Into<PathBuf>) -> Self {
        Self {
            plan_file: plan_file.into(),
        }
    }

    /// Plan artifact named `file_name` inside `work_dir`.
    pub fn in_dir(work_dir: &Path, file_name: &str) -> Self {
        Self::new(work_dir.join(file_name))
    }
}

pub(crate) fn remove_file_quietly(path: &Path) {
    match fs::remove_file(path) {
        Ok(()) => tracing::trace!(path = %path.display(), "removed"),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => tracing::warn!(path = %path.display(), error = %e, "unable to remove file"),
    }
}
