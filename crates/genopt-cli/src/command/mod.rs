use clap::{Parser, Subcommand};

use self::{default_config::DefaultConfigArg, optimize::OptimizeArg};

mod default_config;
mod optimize;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// What mode to run the program in
    #[command(subcommand)]
    mode: Option<Mode>,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Maximize an objective with the genetic algorithm
    Optimize(#[clap(flatten)] OptimizeArg),
    /// Print the default engine configuration as JSON
    DefaultConfig(#[clap(flatten)] DefaultConfigArg),
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    match args
        .mode
        .unwrap_or(Mode::Optimize(OptimizeArg::default()))
    {
        Mode::Optimize(arg) => optimize::run(&arg)?,
        Mode::DefaultConfig(arg) => default_config::run(&arg)?,
    }
    Ok(())
}
