use super::helpers::{self, Output};
use super::{GlobalConfiguration, Subcommand};
use anyhow::Result;
use clap::{Parser, ValueHint};
use std::path::PathBuf;
use std::process::ExitCode;
use vvjjplot::figures::{EfficiencyPlot, EfficiencySample};
use vvjjplot::file::HistFile;
use vvjjplot::labels;
use vvjjplot::plot::PlotConfig;
use vvjjplot::style::{Color, MarkerShape, SeriesStyle, Style};

const SUBDIR: &str = "quark_gluon_jets_efficiency";

/// Tagger selections and the upper end of the y-axis for the leading jet.
const FIRST_JET: [(&str, f64); 13] = [
    ("partial_ntrk", 0.7),
    ("W_partial_mass", 0.2),
    ("W_partial_D2", 1.5),
    ("W_partial_massD2", 0.1),
    ("W_partial_massNtrk", 0.15),
    ("W_partial_ntrkD2", 0.4),
    ("W_full", 0.04),
    ("Z_partial_mass", 0.2),
    ("Z_partial_D2", 1.5),
    ("Z_partial_massD2", 0.1),
    ("Z_partial_massNtrk", 0.15),
    ("Z_partial_ntrkD2", 0.4),
    ("Z_full", 0.04),
];

/// Tagger selections and the upper end of the y-axis for the subleading jet.
const SECOND_JET: [(&str, f64); 13] = [
    ("partial_ntrk", 0.8),
    ("W_partial_mass", 1.5),
    ("W_partial_D2", 0.4),
    ("W_partial_massD2", 0.1),
    ("W_partial_massNtrk", 0.4),
    ("W_partial_ntrkD2", 0.4),
    ("W_full", 0.06),
    ("Z_partial_mass", 0.5),
    ("Z_partial_D2", 0.4),
    ("Z_partial_massD2", 0.1),
    ("Z_partial_massNtrk", 0.3),
    ("Z_partial_ntrkD2", 0.3),
    ("Z_full", 0.05),
];

/// Selection efficiencies of quark and gluon jets.
#[derive(Parser)]
pub struct Opts {
    /// Path to the input histogram file.
    #[arg(value_hint = ValueHint::FilePath)]
    input: PathBuf,
    /// Directory the plots are written into.
    #[arg(value_hint = ValueHint::DirPath)]
    output: PathBuf,
}

fn sample(
    file: &HistFile,
    num: &str,
    den: &str,
    (label, flavour, style): (&str, &str, SeriesStyle),
) -> Result<EfficiencySample> {
    Ok(EfficiencySample::new(
        label,
        file.get(&format!("{num}_{flavour}"))?.clone(),
        file.get(&format!("{den}_{flavour}"))?.clone(),
        style,
    ))
}

impl Subcommand for Opts {
    fn run(&self, cfg: &GlobalConfiguration) -> Result<ExitCode> {
        let Some(file) = helpers::open_input(&self.input)? else {
            return Ok(ExitCode::FAILURE);
        };
        let output = Output::new(
            cfg,
            &self.output,
            SUBDIR,
            Style::sane_defaults(true).with_max_digits(4),
        )?;

        for (jet, selections) in [("first", FIRST_JET), ("second", SECOND_JET)] {
            for (tag, y_max) in selections {
                let den = format!("{jet}_jet_pt");
                let num = format!("{den}_{tag}");

                let config = output.config(PlotConfig {
                    name: format!("{num}_efficiency"),
                    x_units: labels::axis_units(&num).to_owned(),
                    x_min: Some(500.0),
                    x_max: Some(1500.0),
                    y_min: Some(1e-6),
                    y_max: Some(y_max),
                    extra_legend_lines: helpers::extra_lines(&[
                        helpers::DEFAULT_EXTRA_LINES[0],
                        labels::selection_tex(tag),
                    ]),
                    extra_lines_loc: [0.2, 0.83],
                    legend_loc: [0.72, 0.91, 0.94, 0.77],
                    ..PlotConfig::default()
                });

                let samples = [
                    (
                        "quark jets",
                        "q",
                        SeriesStyle::mc_marker(Color::BLUE, MarkerShape::from_root(22), 0.8),
                    ),
                    (
                        "gluon jets",
                        "g",
                        SeriesStyle::mc_marker(Color::RED, MarkerShape::from_root(23), 0.8),
                    ),
                ]
                .into_iter()
                .map(|flavour| sample(&file, &num, &den, flavour))
                .collect::<Result<_>>()?;

                output.print(&EfficiencyPlot::new(config, samples).build(output.style())?)?;
            }
        }

        Ok(ExitCode::SUCCESS)
    }
}
