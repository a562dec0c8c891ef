use super::helpers::{self, Output};
use super::{GlobalConfiguration, Subcommand};
use anyhow::Result;
use clap::{Parser, ValueHint};
use std::path::PathBuf;
use std::process::ExitCode;
use vvjjplot::figures::{ControlPlot, Sample};
use vvjjplot::file::HistFile;
use vvjjplot::hist::Histogram;
use vvjjplot::labels;
use vvjjplot::plot::{DrawMode, PlotConfig};
use vvjjplot::style::{Color, MarkerShape, SeriesStyle, Style};

const SUBDIR: &str = "quark_gluon_jets";

/// Name, histogrammed variable, x-range and head room of every plot.
const PLOTS: [(&str, &str, Option<f64>, Option<f64>, f64); 3] = [
    ("both_jets_mass", "jet_m", Some(50.0), Some(200.0), 1.5),
    ("both_jets_ntrk", "jet_ntrk", None, Some(80.0), 1.6),
    ("both_jets_D2", "jet_D2", None, None, 1.5),
];

/// Control plots of quark and gluon jets.
#[derive(Parser)]
pub struct Opts {
    /// Path to the input histogram file.
    #[arg(value_hint = ValueHint::FilePath)]
    input: PathBuf,
    /// Directory the plots are written into.
    #[arg(value_hint = ValueHint::DirPath)]
    output: PathBuf,
}

/// Sum of the leading and subleading jet histograms of `variable` for `flavour`.
fn both_jets(file: &HistFile, variable: &str, flavour: &str) -> Result<Histogram> {
    let mut sum = file
        .get(&format!("first_{variable}_{flavour}"))?
        .clone_named(&format!("both_{variable}_{flavour}"));
    sum.add(file.get(&format!("second_{variable}_{flavour}"))?)?;

    Ok(sum)
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
            Style::sane_defaults(true).with_max_digits(3),
        )?;

        for normalize in [false, true] {
            for (name, variable, x_min, x_max, empty_scale) in PLOTS {
                let quark = both_jets(&file, variable, "q")?;
                let gluon = both_jets(&file, variable, "g")?;
                let title_key = format!("both_{variable}");

                let config = output.config(PlotConfig {
                    name: if normalize {
                        format!("{name}_normalized")
                    } else {
                        name.to_owned()
                    },
                    x_title: labels::axis_title(&title_key).to_owned(),
                    x_units: labels::axis_units(&title_key).to_owned(),
                    x_min,
                    x_max,
                    empty_scale,
                    extra_legend_lines: helpers::extra_lines(&helpers::DEFAULT_EXTRA_LINES),
                    extra_lines_loc: [0.2, 0.85],
                    legend_loc: [0.74, 0.92, 0.94, 0.82],
                    ..PlotConfig::default()
                });

                let (quark_style, gluon_style) = if normalize {
                    (
                        SeriesStyle::mc_marker(Color::BLUE, MarkerShape::from_root(22), 1.0),
                        SeriesStyle::mc_marker(Color::RED, MarkerShape::from_root(23), 1.0),
                    )
                } else {
                    (
                        SeriesStyle::mc_filled(Color::BLUE),
                        SeriesStyle::mc_filled(Color::RED),
                    )
                };

                let plot = ControlPlot::new(
                    config,
                    vec![
                        Sample::new("quark jets", quark, quark_style),
                        Sample::new("gluon jets", gluon, gluon_style),
                    ],
                );

                // normalized plots show quark before gluon jets, the filled ones the reverse
                let plot = if normalize {
                    plot.normalize_to(0).draw_mode(DrawMode::Points)
                } else {
                    plot.draw_order(&[1, 0])
                };

                output.print(&plot.build(output.style())?)?;
            }
        }

        Ok(ExitCode::SUCCESS)
    }
}
