//! Provides the main entry point to the program.
use anyhow::Result;
use chaproev::cli::{Cli, run};
use clap::Parser;

fn main() -> Result<()> {
    human_panic::setup_panic!();

    run(Cli::parse())
}
