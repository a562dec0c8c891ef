use super::Subcommand;
use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, ValueHint};
use clap_mangen::Man;
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::PathBuf;

/// Write a manpage for `vvjjplot` and one for each of its subcommands.
#[derive(Parser)]
pub struct Opts {
    /// Directory the manpages are written into, created if it does not exist.
    #[arg(value_hint = ValueHint::DirPath)]
    directory: PathBuf,
}

impl Opts {
    fn write_page(&self, cmd: &clap::Command, version: &str) -> Result<()> {
        let name = cmd
            .get_bin_name()
            .unwrap_or_else(|| cmd.get_name())
            .replace(' ', "-");
        let path = self.directory.join(format!("{name}.1"));
        let mut writer = BufWriter::new(
            File::create(&path).with_context(|| format!("unable to create `{}`", path.display()))?,
        );

        Man::new(cmd.clone())
            // a blank date keeps the footer identical between builds
            .date(" ")
            .manual("vvjjplot Manual")
            .source(format!("vvjjplot {version}"))
            .title(name.to_ascii_uppercase())
            .render(&mut writer)?;

        println!("{}", path.display());

        Ok(())
    }
}

impl Subcommand for Opts {
    fn run(&self) -> Result<()> {
        let mut cmd = vvjjplot_cli::Opts::command();
        let version = cmd
            .get_version()
            .map_or_else(String::new, |version| {
                version.strip_prefix('v').unwrap_or(version).to_owned()
            });

        // fills in the `bin_name` of every subcommand
        cmd.build();

        fs::create_dir_all(&self.directory)?;

        self.write_page(&cmd, &version)?;

        for subcmd in cmd.get_subcommands() {
            self.write_page(subcmd, &version)?;
        }

        Ok(())
    }
}
