//! assert-that CLI entry point

use assert_that::cli::{Cli, dispatch};
use clap::Parser;
use std::process;
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    process::exit(dispatch(cli));
}

/// `RUST_LOG` wins over `-v`
fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "assert_that=warn",
        1 => "assert_that=debug",
        _ => "assert_that=trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
