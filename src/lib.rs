//! tfmoduletest - Terraform root module tests
//!
//! Discovers Terraform root modules under a directory and runs each one
//! through `init`, `plan`, `apply` and `destroy`, reporting pass/fail per
//! module in `go test` style.

pub mod discovery;
pub mod harness;
pub mod install;
pub mod report;
pub mod runner;
pub mod terraform;

mod error;

pub use discovery::{DiscoverConfig, find_root_modules};
pub use error::TfTestError;
pub use harness::{ModuleTest, RunConfig, TestStep};
pub use runner::{Outcome, Settings};
pub use terraform::{ExecError, Executor, PlanOptions, Terraform};
