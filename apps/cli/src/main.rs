//! weekmerge CLI: merge weekly lecture notes into a single PDF.
//!
//! Copies the `Week<NN>` directories in a range into one destination,
//! concatenates their Markdown, and renders it with pandoc.

mod commands;

use clap::Parser;
use color_eyre::eyre::Result;

use commands::Cli;

fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    commands::init_tracing(&cli);
    commands::run(cli)
}
