use anyhow::Result;
use clap::Parser;
use enum_dispatch::enum_dispatch;

mod install_manpages;

#[enum_dispatch]
pub trait Subcommand {
    fn run(&self) -> Result<()>;
}

#[enum_dispatch(Subcommand)]
#[derive(Parser)]
enum SubcommandEnum {
    InstallManpages(install_manpages::Opts),
}

/// Cargo applet for vvjjplot specific tasks.
#[derive(Parser)]
#[command(arg_required_else_help = true, disable_help_subcommand = true)]
struct Opts {
    #[command(subcommand)]
    subcommand: SubcommandEnum,
}

fn main() -> Result<()> {
    Opts::parse().subcommand.run()
}
