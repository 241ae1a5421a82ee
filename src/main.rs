//! Command line interface for generating OGC API - EDR profiles.

use clap::Parser;

mod cli;

fn main() -> anyhow::Result<()> {
    cli::Cli::parse().run()
}
