use clap::ValueEnum;
use profilegen::ArtifactBundle;
use serde::Serialize;
use tracing::instrument;

use super::{ConfigArgs, terminal::Colorize};

/// Command arguments for `edr-profile list`.
#[derive(Debug, clap::Parser)]
pub struct Command {
    #[command(flatten)]
    config: ConfigArgs,

    /// Output format
    #[arg(long, value_enum, default_value_t)]
    output: OutputFormat,
}

#[derive(Debug, Clone, Copy, Default, ValueEnum)]
enum OutputFormat {
    #[default]
    Table,
    Json,
}

#[derive(Debug, Serialize)]
struct Listing<'a> {
    profile: &'a str,
    fingerprint: String,
    requirements: Vec<Row<'a>>,
}

#[derive(Debug, Serialize)]
struct Row<'a> {
    id: &'a str,
    statement: &'a str,
    parts: usize,
    test: &'a str,
    steps: usize,
}

impl<'a> Listing<'a> {
    fn new(bundle: &'a ArtifactBundle) -> Self {
        let requirements = bundle
            .requirements
            .iter()
            .zip(&bundle.tests)
            .map(|(requirement, test)| Row {
                id: &requirement.id,
                statement: &requirement.statement,
                parts: requirement.parts.len(),
                test: &test.id,
                steps: test.steps.len(),
            })
            .collect();

        Self {
            profile: bundle.profile().as_str(),
            fingerprint: bundle.fingerprint(),
            requirements,
        }
    }
}

impl Command {
    #[instrument(level = "debug", skip(self))]
    pub fn run(self) -> anyhow::Result<()> {
        let config = self.config.load()?;
        let bundle = profilegen::generate(&config)?;
        let listing = Listing::new(&bundle);

        match self.output {
            OutputFormat::Table => print_table(&listing),
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&listing)?),
        }

        Ok(())
    }
}

fn print_table(listing: &Listing<'_>) {
    let width = listing
        .requirements
        .iter()
        .map(|row| row.id.len())
        .max()
        .unwrap_or(0)
        .max("ID".len());

    println!("{:<width$}  PARTS  STEPS  STATEMENT", "ID");
    for row in &listing.requirements {
        println!(
            "{:<width$}  {:>5}  {:>5}  {}",
            row.id, row.parts, row.steps, row.statement
        );
    }
    println!();
    println!(
        "{} requirements in {}, fingerprint {}",
        listing.requirements.len(),
        listing.profile,
        listing.fingerprint.dim()
    );
}
