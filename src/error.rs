use thiserror::Error;

use crate::discovery::DiscoveryError;
use crate::install::InstallError;
use crate::terraform::ExecError;

/// Errors that abort the whole run. Module failures never surface here; they
/// are recorded in the module's output log instead.
#[derive(Debug, Error)]
pub enum TfTestError {
    #[error("unable to find Terraform binary: {0}")]
    BinaryNotFound(String),

    #[error("unable to find Terraform binary: {0}")]
    Install(#[from] InstallError),

    #[error("unable to determine work dir: {0}")]
    WorkDir(#[source] std::io::Error),

    #[error("unable to identify test root modules: {0}")]
    Discovery(#[from] DiscoveryError),

    #[error("unable to create Terraform executor: {0}")]
    Executor(#[from] ExecError),

    #[error("unable to write report: {0}")]
    Report(#[from] std::io::Error),
}
