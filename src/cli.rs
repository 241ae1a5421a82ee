use std::path::PathBuf;

mod check;
mod generate;
mod init;
mod list;
mod terminal;

use anyhow::Context;
use clap::ArgAction;
use profilegen::ProfileConfig;

#[derive(Debug, clap::Parser)]
#[command(version, about)]
pub struct Cli {
    /// Verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

impl Cli {
    pub fn run(self) -> anyhow::Result<()> {
        Self::setup_logging(self.verbose);

        self.command.run()
    }

    fn setup_logging(verbosity: u8) {
        use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

        let level = match verbosity {
            0 => tracing::Level::WARN,
            1 => tracing::Level::INFO,
            2 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        };

        let filter = tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into());

        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false)
            .with_thread_names(false)
            .with_line_number(false);

        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .init();
    }
}

#[derive(Debug, clap::Subcommand)]
enum Command {
    /// Describe a new profile interactively and save its configuration
    Init(init::Command),

    /// Generate the artifacts of a profile
    ///
    /// Writes requirements, abstract tests, class files and API descriptions
    /// under `<OUTPUT>/<PROFILE_NAME>/`, together with a snapshot of the
    /// configuration that records the generated requirements and tests.
    Generate(generate::Command),

    /// List the requirements of a profile and the tests paired with them
    List(list::Command),

    /// Compare a profile directory with a fresh generation
    ///
    /// Exits with status 2 if files are missing, outdated or stale.
    Check(check::Command),
}

impl Command {
    fn run(self) -> anyhow::Result<()> {
        match self {
            Self::Init(command) => command.run()?,
            Self::Generate(command) => command.run()?,
            Self::List(command) => command.run()?,
            Self::Check(command) => command.run()?,
        }
        Ok(())
    }
}

/// Arguments shared by every command that reads a configuration.
#[derive(Debug, clap::Args)]
struct ConfigArgs {
    /// Path to the profile configuration (YAML, or TOML with a `.toml`
    /// extension)
    config: PathBuf,

    /// Ignore requirements and tests recorded in the configuration and
    /// synthesize them afresh
    #[arg(long)]
    resynthesize: bool,
}

impl ConfigArgs {
    fn load(&self) -> anyhow::Result<ProfileConfig> {
        let mut config = ProfileConfig::load(&self.config)
            .with_context(|| format!("failed to load {}", self.config.display()))?;
        if self.resynthesize {
            config.discard_recorded();
        }
        tracing::info!(
            profile = %config.profile_name,
            collections = config.collections.len(),
            "loaded configuration"
        );
        Ok(config)
    }
}
