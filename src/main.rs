mod cli;

use std::process::ExitCode;

use clap::Parser;
use color_eyre::eyre::Result;
use tracing_subscriber::EnvFilter;

use cli::Cli;
use tfmoduletest::runner::{self, Settings};

#[tokio::main]
async fn main() -> Result<ExitCode> {
    color_eyre::install()?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let work_dir = runner::resolve_work_dir(cli.chdir.as_deref())?;
    let settings = Settings {
        work_dir,
        dirs: cli.dirs.clone(),
        discover: cli.discover_config(),
        binary: cli.binary_config(),
        plan_file: cli.plan_file.clone(),
        verbose: cli.verbose,
    };

    let outcome = runner::run(&settings, std::io::stdout().lock()).await?;
    tracing::debug!(?outcome, "run complete");

    Ok(ExitCode::from(outcome.exit_code()))
}
