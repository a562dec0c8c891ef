//! Command-line interface rendering the control and efficiency plots of the VV→JJ analysis.

mod data_mc;
mod events_control;
mod events_efficiency;
mod helpers;
mod jets_control;
mod jets_efficiency;
mod read;

use anyhow::Result;
use clap::{Parser, ValueEnum, ValueHint};
use enum_dispatch::enum_dispatch;
use git_version::git_version;
use std::path::PathBuf;
use std::process::ExitCode;

/// File format of the written plots.
#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum Format {
    /// Portable Document Format.
    Pdf,
    /// Scalable Vector Graphics.
    Svg,
}

impl Format {
    /// File extension of this format.
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Svg => "svg",
        }
    }
}

/// Options shared by all subcommands.
#[derive(Parser)]
pub struct GlobalConfiguration {
    /// Maximum level of the messages logged to stderr.
    #[arg(default_value = "warn", long, value_name = "LEVEL")]
    pub log_level: tracing::Level,
    /// File format of the plots.
    #[arg(default_value = "pdf", long, value_enum)]
    pub format: Format,
    /// YAML file with the style, experiment label and luminosity of all plots.
    #[arg(long, value_hint = ValueHint::FilePath, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

/// A subcommand of the `vvjjplot` program.
#[enum_dispatch]
pub trait Subcommand {
    /// Runs the subcommand with the global options `cfg`.
    ///
    /// # Errors
    ///
    /// Returns an error if reading the input, combining the histograms or writing a plot fails.
    fn run(&self, cfg: &GlobalConfiguration) -> Result<ExitCode>;
}

/// All subcommands.
#[enum_dispatch(Subcommand)]
#[derive(Parser)]
pub enum SubcommandEnum {
    /// Data compared to simulation with systematic uncertainty bands and a ratio panel.
    DataMc(data_mc::Opts),
    /// Control plots of quark-quark, quark-gluon and gluon-gluon dijet events.
    EventsControl(events_control::Opts),
    /// Selection efficiencies of quark-quark, quark-gluon and gluon-gluon dijet events.
    EventsEfficiency(events_efficiency::Opts),
    /// Control plots of quark and gluon jets.
    JetsControl(jets_control::Opts),
    /// Selection efficiencies of quark and gluon jets.
    JetsEfficiency(jets_efficiency::Opts),
    /// Read out information of a histogram file.
    Read(read::Opts),
}

/// Top-level command-line options.
#[derive(Parser)]
#[command(
    arg_required_else_help = true,
    author,
    about,
    disable_help_subcommand = true,
    name = "vvjjplot",
    version = git_version!(
        args = ["--always", "--dirty", "--long", "--tags"],
        cargo_prefix = "",
        fallback = "unknown"
    )
)]
pub struct Opts {
    /// Options shared by all subcommands.
    #[command(flatten)]
    pub configuration: GlobalConfiguration,
    /// Subcommand to run.
    #[command(subcommand)]
    pub subcommand: SubcommandEnum,
}
