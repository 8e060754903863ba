use std::process::ExitCode;

use clap::Parser;
use polygen::cli::Cli;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cli.log_directive()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    match polygen::ops::run(&cli.into_action()) {
        Ok(outcome) => {
            println!("{outcome}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            report(err);
            ExitCode::FAILURE
        }
    }
}

#[cfg(feature = "rich-errors")]
fn report(err: polygen::PolygenError) {
    eprintln!("{:?}", miette::Report::new(err));
}

#[cfg(not(feature = "rich-errors"))]
fn report(err: polygen::PolygenError) {
    eprintln!("error: {err}");
    if let polygen::PolygenError::UnknownKeys(errors) = &err {
        for e in errors {
            eprintln!("  {e}");
        }
    }
}
