//! The command line interface for the simulation.
use crate::log;
use crate::model::Model;
use crate::output::{create_output_directory, get_output_dir};
use crate::simulation;
use crate::weather::ConstantWeather;
use ::log::info;
use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};

/// The command line interface for the simulation.
#[derive(Parser)]
#[command(version, about)]
pub struct Cli {
    /// The available commands.
    #[command(subcommand)]
    command: Commands,
}

/// The available commands.
#[derive(Subcommand)]
enum Commands {
    /// Run a scenario.
    Run {
        /// Path to the scenario TOML file.
        scenario_file: PathBuf,
        /// Options for the run command.
        #[command(flatten)]
        opts: RunOpts,
    },
}

/// Options for the run command
#[derive(Args)]
pub struct RunOpts {
    /// Directory for output files
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,
    /// The program log level
    #[arg(long)]
    pub log_level: Option<String>,
}

/// Parse the command line arguments and dispatch to the appropriate handler.
pub fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Run {
            scenario_file,
            opts,
        } => handle_run_command(&scenario_file, &opts),
    }
}

/// Handle the `run` command.
pub fn handle_run_command(scenario_file: &Path, opts: &RunOpts) -> Result<()> {
    log::init(opts.log_level.as_deref()).context("Failed to initialise logging.")?;

    let model = Model::from_path(scenario_file).context("Failed to load scenario.")?;
    info!("Scenario loaded successfully.");

    let output_dir = match &opts.output_dir {
        Some(output_dir) => output_dir.clone(),
        None => get_output_dir(scenario_file)?,
    };
    create_output_directory(&output_dir).context("Failed to create output directory.")?;

    // Stand-in weather source until a real weather service is wired in
    let weather = ConstantWeather::from_parameters(&model.weather);

    simulation::run(&model, &weather, &output_dir)
}
