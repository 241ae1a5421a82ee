use std::path::PathBuf;

use anyhow::Context;
use profilegen::ProfileDirectory;
use tracing::instrument;

use super::{ConfigArgs, terminal::Colorize};

#[derive(Debug, clap::Parser)]
pub struct Command {
    #[command(flatten)]
    config: ConfigArgs,

    /// Directory the profile directory is created in
    #[arg(short, long, default_value = ".")]
    output: PathBuf,

    /// Remove requirement and test files left over from a previous
    /// generation
    #[arg(long)]
    prune: bool,
}

impl Command {
    #[instrument(level = "debug", skip(self))]
    pub fn run(self) -> anyhow::Result<()> {
        let config = self.config.load()?;
        let bundle = profilegen::generate(&config)?;

        let directory = ProfileDirectory::for_profile(&self.output, bundle.profile());
        directory
            .write(&bundle)
            .with_context(|| format!("failed to write {}", directory.root().display()))?;

        let tick = "✓".success();
        println!("{tick} Created {} requirements", bundle.requirements.len());
        println!("{tick} Created {} abstract tests", bundle.tests.len());
        println!("{tick} Created openapi.yaml");
        if bundle.event_api.is_some() {
            println!("{tick} Created asyncapi.yaml");
        } else {
            println!("{} Skipped asyncapi.yaml (not included)", "-".dim());
        }
        println!(
            "{tick} Saved configuration to {}",
            directory.snapshot_path().display()
        );

        if self.prune {
            let drift = directory.drift(&bundle)?;
            let removed = directory.prune(&drift)?;
            if removed > 0 {
                println!("{tick} Removed {removed} stale files");
            }
        }

        println!();
        println!("Profile created: {}", directory.root().display());
        println!("Fingerprint: {}", bundle.fingerprint().dim());

        Ok(())
    }
}
