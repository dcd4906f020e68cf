use std::path::PathBuf;

use clap::Parser;

use tfmoduletest::discovery::DiscoverConfig;
use tfmoduletest::harness::DEFAULT_PLAN_FILE;
use tfmoduletest::terraform::BinaryConfig;

/// Run every Terraform root module under the working directory through
/// init, plan, apply and destroy.
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Module directories to test instead of discovering them
    pub dirs: Vec<PathBuf>,

    /// Working directory to discover modules in
    #[arg(short = 'C', long, value_name = "DIR")]
    pub chdir: Option<PathBuf>,

    /// Terraform binary to use
    #[arg(long, value_name = "PATH", env = "TFMODULETEST_TERRAFORM")]
    pub terraform: Option<PathBuf>,

    /// Never download Terraform when it is not on PATH
    #[arg(long)]
    pub no_install: bool,

    /// Additional directory names to skip during discovery
    #[arg(long = "skip-dir", value_name = "NAME")]
    pub skip_dirs: Vec<String>,

    /// Plan artifact file name, created in the working directory
    #[arg(long, value_name = "NAME", default_value = DEFAULT_PLAN_FILE)]
    pub plan_file: String,

    /// Print module output for passing modules too
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    pub fn discover_config(&self) -> DiscoverConfig {
        DiscoverConfig::with_extra_skip_dirs(self.skip_dirs.iter().cloned())
    }

    pub fn binary_config(&self) -> BinaryConfig {
        BinaryConfig {
            explicit: self.terraform.clone(),
            allow_install: !self.no_install,
        }
    }
}
