use std::io::Write;
use std::process::ExitCode;

use clap::Parser;
use clap::error::ErrorKind as ClapErrorKind;
use pq::cli::{Cli, finish, run};
use pq::config::MountConfig;
use pq::mqueue::LinuxKernel;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn init_tracing(verbose: u8) -> anyhow::Result<()> {
    let default_filter = match verbose {
        0 => "pq=warn",
        1 => "pq=info",
        _ => "pq=debug",
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init()?;

    Ok(())
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err)
            if matches!(err.kind(), ClapErrorKind::DisplayHelp | ClapErrorKind::DisplayVersion) =>
        {
            err.exit()
        }
        Err(err) => {
            err.print()?;
            return Ok(ExitCode::FAILURE);
        }
    };

    init_tracing(cli.verbose)?;

    let mut stdout = std::io::stdout().lock();
    let result = run(&cli, &LinuxKernel::new(), &MountConfig::default(), &mut stdout);
    stdout.flush()?;

    Ok(ExitCode::from(finish(result, &mut std::io::stderr().lock())))
}
