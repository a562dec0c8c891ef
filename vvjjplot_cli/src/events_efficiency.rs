use super::helpers::{self, Output};
use super::{GlobalConfiguration, Subcommand};
use anyhow::Result;
use clap::{Parser, ValueHint};
use std::path::PathBuf;
use std::process::ExitCode;
use vvjjplot::figures::{EfficiencyPlot, EfficiencySample};
use vvjjplot::labels;
use vvjjplot::plot::PlotConfig;
use vvjjplot::style::{Color, MarkerShape, SeriesStyle, Style};

const SUBDIR: &str = "qq_qg_gg_events_efficiency";

/// Histogram of all events.
const DENOMINATOR: &str = "dijet_mass";

/// Histograms of the selected events and the upper end of their y-axis.
const SELECTIONS: [(&str, f64); 19] = [
    ("dijet_mass_partial_ntrk", 0.45),
    ("dijet_mass_WW_partial_mass", 0.1),
    ("dijet_mass_WZ_partial_mass", 0.12),
    ("dijet_mass_ZZ_partial_mass", 0.1),
    ("dijet_mass_WW_partial_D2", 0.5),
    ("dijet_mass_WZ_partial_D2", 0.5),
    ("dijet_mass_ZZ_partial_D2", 0.5),
    ("dijet_mass_WW_partial_massD2", 0.005),
    ("dijet_mass_WZ_partial_massD2", 0.005),
    ("dijet_mass_ZZ_partial_massD2", 0.005),
    ("dijet_mass_WW_partial_massNtrk", 0.02),
    ("dijet_mass_WZ_partial_massNtrk", 0.02),
    ("dijet_mass_ZZ_partial_massNtrk", 0.02),
    ("dijet_mass_WW_partial_ntrkD2", 0.05),
    ("dijet_mass_WZ_partial_ntrkD2", 0.05),
    ("dijet_mass_ZZ_partial_ntrkD2", 0.05),
    ("dijet_mass_WW_full", 0.002),
    ("dijet_mass_WZ_full", 0.002),
    ("dijet_mass_ZZ_full", 0.002),
];

/// Selection efficiencies of quark-quark, quark-gluon and gluon-gluon dijet events.
#[derive(Parser)]
pub struct Opts {
    /// Path to the input histogram file.
    #[arg(value_hint = ValueHint::FilePath)]
    input: PathBuf,
    /// Directory the plots are written into.
    #[arg(value_hint = ValueHint::DirPath)]
    output: PathBuf,
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

        for (num, y_max) in SELECTIONS {
            let config = output.config(PlotConfig {
                name: format!("{num}_efficiency"),
                x_title: "m_{JJ}".to_owned(),
                x_units: labels::axis_units(num).to_owned(),
                x_min: Some(1000.0),
                x_max: Some(2500.0),
                y_min: Some(1e-6),
                y_max: Some(y_max),
                extra_legend_lines: helpers::extra_lines(&[
                    helpers::DEFAULT_EXTRA_LINES[0],
                    labels::selection_tex(num),
                ]),
                extra_lines_loc: [0.2, 0.83],
                legend_loc: [0.72, 0.91, 0.94, 0.77],
                ..PlotConfig::default()
            });

            let samples = [
                ("quark-gluon", "qg", Color::BLUE, 23),
                ("quark-quark", "qq", Color::SOFT_GREEN, 22),
                ("gluon-gluon", "gg", Color::RED, 21),
            ]
            .into_iter()
            .map(|(label, suffix, color, shape)| -> Result<_> {
                Ok(EfficiencySample::new(
                    label,
                    file.get(&format!("{num}_{suffix}"))?.clone(),
                    file.get(&format!("{DENOMINATOR}_{suffix}"))?.clone(),
                    SeriesStyle::mc_marker(color, MarkerShape::from_root(shape), 0.8),
                ))
            })
            .collect::<Result<_>>()?;

            // quark-quark events are drawn on top
            let plot = EfficiencyPlot::new(config, samples).draw_order(&[0, 2, 1]);

            output.print(&plot.build(output.style())?)?;
        }

        Ok(ExitCode::SUCCESS)
    }
}
