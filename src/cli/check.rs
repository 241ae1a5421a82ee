use std::path::PathBuf;

use profilegen::ProfileDirectory;
use tracing::instrument;

use super::{ConfigArgs, terminal::Colorize};

#[derive(Debug, clap::Parser)]
pub struct Command {
    #[command(flatten)]
    config: ConfigArgs,

    /// Directory containing the profile directory
    #[arg(short, long, default_value = ".")]
    output: PathBuf,
}

impl Command {
    #[instrument(level = "debug", skip(self))]
    pub fn run(self) -> anyhow::Result<()> {
        let config = self.config.load()?;
        let bundle = profilegen::generate(&config)?;

        let directory = ProfileDirectory::for_profile(&self.output, bundle.profile());
        let drift = directory.drift(&bundle)?;

        if drift.is_clean() {
            println!(
                "{} {} is up to date",
                "✓".success(),
                directory.root().display()
            );
            return Ok(());
        }

        print_group("Missing", &drift.missing, |s| s.error());
        print_group("Outdated", &drift.outdated, |s| s.warning());
        print_group("Stale", &drift.stale, |s| s.dim());

        std::process::exit(2);
    }
}

fn print_group(heading: &str, paths: &[PathBuf], paint: impl Fn(&str) -> String) {
    if paths.is_empty() {
        return;
    }
    println!("{heading} ({}):", paths.len());
    for path in paths {
        println!("  {}", paint(&path.display().to_string()));
    }
}
