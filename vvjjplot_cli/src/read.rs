use super::helpers;
use super::{GlobalConfiguration, Subcommand};
use anyhow::Result;
use clap::{Args, Parser, ValueHint};
use prettytable::{cell, row};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Args)]
#[group(multiple = false)]
struct Group {
    /// Show the names of all branches.
    #[arg(long, short)]
    branches: bool,
    /// Gets an internal key-value pair.
    #[arg(long, num_args = 1, value_name = "KEY")]
    get: Option<String>,
    /// Shows all key-value pairs stored in the file.
    #[arg(long)]
    show: bool,
}

/// Read out information of a histogram file.
#[derive(Parser)]
pub struct Opts {
    /// Path to the input histogram file.
    #[arg(value_hint = ValueHint::FilePath)]
    input: PathBuf,
    #[command(flatten)]
    group: Group,
}

impl Subcommand for Opts {
    fn run(&self, _: &GlobalConfiguration) -> Result<ExitCode> {
        let Some(file) = helpers::open_input(&self.input)? else {
            return Ok(ExitCode::FAILURE);
        };

        if self.group.branches {
            for branch in file.branches() {
                println!("{branch}");
            }
        } else if let Some(key) = &self.group.get {
            if let Some(value) = file.metadata().get(key) {
                println!("{value}");
            }
        } else if self.group.show {
            for (key, value) in file.metadata() {
                println!("{key}: {value}");
            }
        } else {
            let mut table = helpers::create_table();
            table.set_titles(row![c => "path", "bins", "left", "right", "integral"]);

            for (path, histogram) in file.iter() {
                let axis = histogram.axis();

                table.add_row(row![
                    l->path,
                    r->axis.bins(),
                    r->axis.left(),
                    r->axis.right(),
                    r->format!("{:.7e}", histogram.integral())
                ]);
            }

            table.printstd();
        }

        Ok(ExitCode::SUCCESS)
    }
}
