//! Run orchestration: binary, module list, sequential execution, verdict.

use std::env;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::TfTestError;
use crate::discovery::{DiscoverConfig, find_root_modules};
use crate::harness::{DEFAULT_PLAN_FILE, ModuleTest, RunConfig};
use crate::report::Reporter;
use crate::terraform::{BinaryConfig, ExecError, Executor, Terraform, find_terraform};

/// Everything a run needs, already resolved from flags and environment.
#[derive(Debug, Clone)]
pub struct Settings {
    pub work_dir: PathBuf,
    /// Explicit module directories. Empty means discover.
    pub dirs: Vec<PathBuf>,
    pub discover: DiscoverConfig,
    pub binary: BinaryConfig,
    pub plan_file: String,
    pub verbose: bool,
}

impl Settings {
    pub fn new(work_dir: impl Into<PathBuf>) -> Self {
        Self {
            work_dir: work_dir.into(),
            dirs: Vec::new(),
            discover: DiscoverConfig::default(),
            binary: BinaryConfig::default(),
            plan_file: DEFAULT_PLAN_FILE.to_string(),
            verbose: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Pass,
    Fail,
}

impl Outcome {
    pub fn exit_code(self) -> u8 {
        match self {
            Outcome::Pass => 0,
            Outcome::Fail => 2,
        }
    }
}

/// `chdir` resolved against the process working directory.
pub fn resolve_work_dir(chdir: Option<&Path>) -> Result<PathBuf, TfTestError> {
    let cwd = env::current_dir().map_err(TfTestError::WorkDir)?;
    let dir = match chdir {
        Some(dir) => cwd.join(dir),
        None => cwd,
    };
    if !dir.is_dir() {
        return Err(TfTestError::WorkDir(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("{} is not a directory", dir.display()),
        )));
    }
    Ok(dir)
}

/// Path of `dir` relative to `work_dir` with `/` separators, or the full
/// path when `dir` lies outside it.
pub fn display_name(work_dir: &Path, dir: &Path) -> String {
    match dir.strip_prefix(work_dir) {
        Ok(rel) if rel.as_os_str().is_empty() => ".".to_string(),
        Ok(rel) => rel
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/"),
        Err(_) => dir.to_string_lossy().replace('\\', "/"),
    }
}

pub fn module_dirs(settings: &Settings) -> Result<Vec<PathBuf>, TfTestError> {
    if settings.dirs.is_empty() {
        return Ok(find_root_modules(&settings.work_dir, &settings.discover)?);
    }
    Ok(settings
        .dirs
        .iter()
        .map(|dir| settings.work_dir.join(dir))
        .collect())
}

pub fn build_modules(work_dir: &Path, dirs: Vec<PathBuf>) -> Vec<ModuleTest> {
    dirs.into_iter()
        .map(|dir| ModuleTest::new(display_name(work_dir, &dir), dir))
        .collect()
}

/// Runs every module in order. A module failure flips the outcome; an
/// executor that cannot be built aborts the run.
pub async fn run_modules<W, F, E>(
    modules: &mut [ModuleTest],
    config: &RunConfig,
    reporter: &mut Reporter<W>,
    mut make_executor: F,
) -> Result<Outcome, TfTestError>
where
    W: Write,
    F: FnMut(&Path) -> Result<E, ExecError>,
    E: Executor,
{
    let mut failed = false;

    for module in modules.iter_mut() {
        let executor = make_executor(&module.dir)?;

        reporter.module_started(module)?;
        module.test(&executor, config).await;
        reporter.module_finished(module)?;

        tracing::info!(
            module = %module.name,
            dir = %executor.working_dir().display(),
            failed = module.failed(),
            "module finished"
        );

        failed |= module.failed();
    }

    reporter.summary(failed)?;

    Ok(if failed { Outcome::Fail } else { Outcome::Pass })
}

/// Full run against the real terraform binary, reporting to `out`.
pub async fn run<W: Write>(settings: &Settings, out: W) -> Result<Outcome, TfTestError> {
    let binary = find_terraform(&settings.binary).await?;

    let dirs = module_dirs(settings)?;
    let mut modules = build_modules(&settings.work_dir, dirs);
    tracing::info!(count = modules.len(), "modules to test");

    let mut reporter = Reporter::new(out, settings.verbose);
    reporter.discovered(&modules)?;

    let config = RunConfig::in_dir(&settings.work_dir, &settings.plan_file);

    run_modules(&mut modules, &config, &mut reporter, |dir| {
        Terraform::new(dir, &binary)
    })
    .await
}
