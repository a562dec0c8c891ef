//! The `vvjjplot` program.

use clap::Parser;
use std::io;
use std::process::ExitCode;
use vvjjplot_cli::{Opts, Subcommand};

fn main() -> ExitCode {
    let opts = Opts::parse();

    tracing_subscriber::fmt()
        .with_max_level(opts.configuration.log_level)
        .with_target(false)
        .with_writer(io::stderr)
        .init();

    match opts.subcommand.run(&opts.configuration) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("Error: {err:?}");
            ExitCode::FAILURE
        }
    }
}
