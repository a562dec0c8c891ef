use super::helpers::{self, Output};
use super::{GlobalConfiguration, Subcommand};
use anyhow::Result;
use clap::{Parser, ValueHint};
use std::collections::BTreeSet;
use std::path::PathBuf;
use std::process::ExitCode;
use vvjjplot::figures::DataMcPlot;
use vvjjplot::file::HistFile;
use vvjjplot::labels;
use vvjjplot::plot::PlotConfig;
use vvjjplot::style::Style;
use vvjjplot::systematics;

const SUBDIR: &str = "data_mc";

/// Data compared to simulation with systematic uncertainty bands and a ratio panel.
#[derive(Parser)]
pub struct Opts {
    /// Path to the input histogram file.
    #[arg(value_hint = ValueHint::FilePath)]
    input: PathBuf,
    /// Directory the plots are written into.
    #[arg(value_hint = ValueHint::DirPath)]
    output: PathBuf,
    /// Branch holding the nominal histograms.
    #[arg(default_value = "nominal", long)]
    branch: String,
    /// Name of the data sample.
    #[arg(default_value = "data", long)]
    data: String,
    /// Name of the simulated sample.
    #[arg(default_value = "pythia", long)]
    generator: String,
    /// Label of the simulated sample in the legend.
    #[arg(long)]
    label: Option<String>,
    /// Plot only the given variables instead of all found in the file.
    #[arg(long, num_args = 1.., value_delimiter = ',')]
    variables: Vec<String>,
    /// Scale the simulation to the integral of the data.
    #[arg(long)]
    normalize: bool,
    /// Use a logarithmic y-axis.
    #[arg(long)]
    log_scale: bool,
}

/// Returns the variables for which `branch` holds a histogram of `sample`.
fn variables<'a>(file: &'a HistFile, branch: &str, sample: &str) -> BTreeSet<&'a str> {
    let prefix = format!("{branch}/{sample}/");
    let suffix = format!("_{sample}");

    file.iter()
        .filter_map(|(path, _)| path.strip_prefix(&prefix)?.strip_suffix(&suffix))
        .collect()
}

impl Subcommand for Opts {
    fn run(&self, cfg: &GlobalConfiguration) -> Result<ExitCode> {
        let Some(file) = helpers::open_input(&self.input)? else {
            return Ok(ExitCode::FAILURE);
        };
        let output = Output::new(cfg, &self.output, SUBDIR, Style::sane_defaults(false))?;

        let variables: Vec<&str> = if self.variables.is_empty() {
            variables(&file, &self.branch, &self.data).into_iter().collect()
        } else {
            self.variables.iter().map(String::as_str).collect()
        };

        if variables.is_empty() {
            tracing::warn!(
                "no histograms of `{}` found in branch `{}`",
                self.data,
                self.branch
            );
        }

        for variable in variables {
            let data = file.branch_hist(&self.branch, &self.data, variable)?.clone();
            let prediction = file
                .branch_hist(&self.branch, &self.generator, variable)?
                .clone();
            let variations = systematics::from_file(&file, &self.generator, variable)?;

            let config = output.config(PlotConfig {
                name: variable.to_owned(),
                x_title: labels::axis_title(variable).to_owned(),
                x_units: labels::axis_units(variable).to_owned(),
                log_scale: self.log_scale,
                empty_scale: if self.log_scale { 5.0 } else { 1.5 },
                ..PlotConfig::default()
            });

            let plot = DataMcPlot::new(
                config,
                data,
                prediction,
                variations,
                self.label.as_deref().unwrap_or(&self.generator),
            )
            .normalize(self.normalize);

            output.print(&plot.build(output.style())?)?;
        }

        Ok(ExitCode::SUCCESS)
    }
}
