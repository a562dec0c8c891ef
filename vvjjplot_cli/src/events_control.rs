use super::helpers::{self, Output};
use super::{GlobalConfiguration, Subcommand};
use anyhow::Result;
use clap::{Parser, ValueHint};
use std::path::PathBuf;
use std::process::ExitCode;
use vvjjplot::figures::{ControlPlot, Sample};
use vvjjplot::file::HistFile;
use vvjjplot::labels;
use vvjjplot::plot::{DrawMode, PlotConfig};
use vvjjplot::style::{Color, MarkerShape, SeriesStyle, Style};

const SUBDIR: &str = "qq_qg_gg_events";

/// Variables plotted with area normalization.
const AREA_NORMALIZED: [&str; 20] = [
    "dijet_mass",
    "dijet_mass_WW_full",
    "dijet_mass_WZ_full",
    "dijet_mass_ZZ_full",
    "dijet_mass_partial_ntrk",
    "dijet_mass_WW_partial_mass",
    "dijet_mass_WZ_partial_mass",
    "dijet_mass_ZZ_partial_mass",
    "dijet_mass_WW_partial_massD2",
    "dijet_mass_WZ_partial_massD2",
    "dijet_mass_ZZ_partial_massD2",
    "dijet_mass_WW_partial_massNtrk",
    "dijet_mass_WZ_partial_massNtrk",
    "dijet_mass_ZZ_partial_massNtrk",
    "dijet_mass_WW_partial_ntrkD2",
    "dijet_mass_WZ_partial_ntrkD2",
    "dijet_mass_ZZ_partial_ntrkD2",
    "dijet_mass_WW_partial_D2",
    "dijet_mass_WZ_partial_D2",
    "dijet_mass_ZZ_partial_D2",
];

/// Control plots of quark-quark, quark-gluon and gluon-gluon dijet events.
#[derive(Parser)]
pub struct Opts {
    /// Path to the input histogram file.
    #[arg(value_hint = ValueHint::FilePath)]
    input: PathBuf,
    /// Directory the plots are written into.
    #[arg(value_hint = ValueHint::DirPath)]
    output: PathBuf,
}

/// Quark-gluon, quark-quark and gluon-gluon samples of `variable`, in the order of the legend.
fn samples(file: &HistFile, variable: &str) -> Result<Vec<Sample>> {
    [
        ("quark-gluon", "qg", Color::BLUE, 23),
        ("quark-quark", "qq", Color::GREEN, 22),
        ("gluon-gluon", "gg", Color::RED, 21),
    ]
    .into_iter()
    .map(|(label, suffix, color, shape)| -> Result<_> {
        Ok(Sample::new(
            label,
            file.get(&format!("{variable}_{suffix}"))?.clone(),
            SeriesStyle::mc_marker(color, MarkerShape::from_root(shape), 0.8),
        ))
    })
    .collect()
}

fn plot_config(output: &Output, variable: &str, name: String) -> PlotConfig {
    output.config(PlotConfig {
        name,
        x_title: "m_{JJ}".to_owned(),
        x_units: labels::axis_units(variable).to_owned(),
        x_min: Some(1000.0),
        x_max: Some(3500.0),
        log_scale: true,
        empty_scale: 5.0,
        extra_legend_lines: helpers::extra_lines(&[
            helpers::DEFAULT_EXTRA_LINES[0],
            labels::selection_tex(variable),
        ]),
        extra_lines_loc: [0.2, 0.83],
        legend_loc: [0.74, 0.92, 0.94, 0.80],
        ..PlotConfig::default()
    })
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

        let variable = "dijet_mass";
        let plot = ControlPlot::new(
            plot_config(&output, variable, format!("{variable}_lumi_normalized")),
            samples(&file, variable)?,
        )
        .draw_mode(DrawMode::Outline)
        .draw_order(&[0, 2, 1]);

        output.print(&plot.build(output.style())?)?;

        for variable in AREA_NORMALIZED {
            let plot = ControlPlot::new(
                plot_config(&output, variable, format!("{variable}_area_normalized")),
                samples(&file, variable)?,
            )
            .normalize_to(0)
            .draw_mode(DrawMode::Points);

            output.print(&plot.build(output.style())?)?;
        }

        Ok(ExitCode::SUCCESS)
    }
}
