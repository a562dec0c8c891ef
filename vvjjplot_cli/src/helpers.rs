use super::{Format, GlobalConfiguration};
use anyhow::{Context, Result};
use prettytable::format::{FormatBuilder, LinePosition, LineSeparator};
use prettytable::Table;
use std::fs::{self, File};
use std::io::BufReader;
use std::path::{Path, PathBuf};
use vvjjplot::error::Error;
use vvjjplot::file::HistFile;
use vvjjplot::plot::{Plot, PlotConfig, RenderSettings};
use vvjjplot::style::Style;

pub const DEFAULT_EXTRA_LINES: [&str; 1] = ["Pythia 8 QCD dijet"];

/// Opens the histogram file `path`. If it can not be opened a message is printed and `None` is
/// returned, other failures are errors.
pub fn open_input(path: &Path) -> Result<Option<HistFile>> {
    match HistFile::open(path) {
        Ok(file) => Ok(Some(file)),
        Err(Error::FileOpen { .. }) => {
            eprintln!("Failed to open raw control plot file: {}", path.display());
            eprintln!("exiting...");
            Ok(None)
        }
        Err(err) => {
            Err(anyhow::Error::new(err).context(format!("could not read `{}`", path.display())))
        }
    }
}

/// Returns the extra lines printed below the experiment label, leaving out empty ones.
pub fn extra_lines(lines: &[&str]) -> Vec<String> {
    lines
        .iter()
        .filter(|line| !line.is_empty())
        .map(|&line| line.to_owned())
        .collect()
}

/// Writes the plots of one subcommand into a common directory.
pub struct Output {
    dir: PathBuf,
    format: Format,
    settings: RenderSettings,
    style: Style,
}

impl Output {
    /// Creates the directory `<root>/<subdir>` and reads the settings given by `cfg`. Plots use
    /// `style` unless the settings override it.
    pub fn new(cfg: &GlobalConfiguration, root: &Path, subdir: &str, style: Style) -> Result<Self> {
        let dir = root.join(subdir);
        fs::create_dir_all(&dir)
            .with_context(|| format!("unable to create directory `{}`", dir.display()))?;

        let settings = if let Some(path) = &cfg.config {
            let reader = BufReader::new(
                File::open(path)
                    .with_context(|| format!("unable to open `{}`", path.display()))?,
            );
            RenderSettings::from_yaml(reader)
                .with_context(|| format!("invalid settings in `{}`", path.display()))?
        } else {
            RenderSettings::default()
        };

        Ok(Self {
            dir,
            format: cfg.format,
            style: settings.style_or(style),
            settings,
        })
    }

    /// Applies the label settings to `config`.
    pub fn config(&self, mut config: PlotConfig) -> PlotConfig {
        self.settings.apply(&mut config);
        config
    }

    /// Returns the style of all plots.
    pub fn style(&self) -> Style {
        self.style.clone()
    }

    /// Writes `plot` into the output directory, naming the file after the plot.
    pub fn print(&self, plot: &Plot) -> Result<()> {
        let path = self
            .dir
            .join(format!("{}.{}", plot.config().name, self.format.extension()));

        plot.print_to_file(&path)
            .with_context(|| format!("unable to write `{}`", path.display()))
    }
}

pub fn create_table() -> Table {
    let mut table = Table::new();
    table.set_format(
        FormatBuilder::new()
            .column_separator(' ')
            .separator(LinePosition::Title, LineSeparator::new('-', '+', ' ', ' '))
            .build(),
    );
    table
}
