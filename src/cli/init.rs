use std::path::{Path, PathBuf};

use anyhow::Context;
use dialoguer::{Confirm, Input};
use profilegen::{
    Collection, Filter, ProfileConfig, ProfileName, rules::query_types, storage::layout::SNAPSHOT_FILE,
};
use tracing::instrument;

use super::terminal::Colorize;

const FORMAT_HINT: &str = "GeoJSON, CoverageJSON, CSV, NetCDF, GRIB, Zarr";

#[derive(Debug, clap::Parser)]
pub struct Command {
    /// Where to save the configuration (defaults to `<PROFILE_NAME>.yml`)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Overwrite an existing configuration file
    #[arg(long)]
    force: bool,
}

impl Command {
    #[instrument(level = "debug", skip(self))]
    pub fn run(self) -> anyhow::Result<()> {
        println!("OGC API - EDR Profile Generator");
        println!();

        let config = ask(&mut Terminal)?;
        config.validate()?;

        let path = self
            .config
            .unwrap_or_else(|| PathBuf::from(format!("{}.yml", config.profile_name)));
        if path.exists() && !self.force {
            anyhow::bail!(
                "{} already exists (use --force to overwrite)",
                path.display()
            );
        }

        config
            .save(&path)
            .with_context(|| format!("failed to save {}", path.display()))?;

        println!();
        println!("{} Saved configuration to {}", "✓".success(), path.display());
        println!();
        println!("Next steps:");
        for step in next_steps(&path, &config.profile_name) {
            println!("  {step}");
        }

        Ok(())
    }
}

/// Follow-up commands, including the route to hand-written requirements and
/// tests: edit the snapshot saved by the first generation and regenerate from
/// it.
fn next_steps(config: &Path, profile: &ProfileName) -> Vec<String> {
    let snapshot = Path::new(profile.as_str()).join(SNAPSHOT_FILE);
    vec![
        format!("edr-profile generate {}", config.display()),
        format!(
            "to customize requirements or test steps, edit {} and run",
            snapshot.display()
        ),
        format!("edr-profile generate {}", snapshot.display()),
    ]
}

/// Source of answers to the configuration questions.
trait Prompt {
    /// Asks for a line of text. An empty answer yields the default, if any.
    fn text(&mut self, message: &str, default: Option<&str>) -> anyhow::Result<String>;

    /// Asks a yes/no question.
    fn confirm(&mut self, message: &str, default: bool) -> anyhow::Result<bool>;

    /// Asks for a comma-separated list, dropping blank entries.
    fn list(&mut self, message: &str, default: &str) -> anyhow::Result<Vec<String>> {
        let answer = self.text(message, Some(default))?;
        Ok(answer
            .split(',')
            .map(str::trim)
            .filter(|item| !item.is_empty())
            .map(ToString::to_string)
            .collect())
    }

    /// Asks for a count.
    fn count(&mut self, message: &str, default: usize) -> anyhow::Result<usize> {
        let default = default.to_string();
        let answer = self.text(message, Some(default.as_str()))?;
        answer
            .trim()
            .parse()
            .with_context(|| format!("'{answer}' is not a number"))
    }
}

struct Terminal;

impl Prompt for Terminal {
    fn text(&mut self, message: &str, default: Option<&str>) -> anyhow::Result<String> {
        let input = Input::<String>::new().with_prompt(message);
        let input = match default {
            Some(default) => input.default(default.to_string()),
            None => input.allow_empty(true),
        };
        Ok(input.interact_text()?.trim().to_string())
    }

    fn confirm(&mut self, message: &str, default: bool) -> anyhow::Result<bool> {
        Ok(Confirm::new()
            .with_prompt(message)
            .default(default)
            .interact()?)
    }
}

fn ask(prompt: &mut impl Prompt) -> anyhow::Result<ProfileConfig> {
    let name = prompt.text("Profile name (e.g., water_gauge)", Some("my_profile"))?;
    let profile_name = ProfileName::try_from(name)?;
    let mut config = ProfileConfig::new(profile_name);

    config.profile_title = prompt.text("Profile title", Some(config.profile_title.as_str()))?;

    let count = prompt.count("Number of collections", 1)?;
    let available = query_types::all()
        .map(|rule| rule.name)
        .collect::<Vec<_>>()
        .join(", ");
    for i in 0..count {
        println!();
        println!("{}", format!("--- Collection {} ---", i + 1).dim());
        let default_name = if i == 0 {
            config.profile_name.to_string()
        } else {
            format!("{}_{}", config.profile_name, i + 1)
        };
        let name = prompt.text("Collection name", Some(default_name.as_str()))?;

        println!("  Available query types: {available}");
        let mut query_types = prompt.list("Query types (comma-separated)", "items")?;
        if query_types.is_empty() {
            query_types.push("items".to_string());
        }

        println!("  Common formats: {FORMAT_HINT}");
        let mut formats = prompt.list("Output formats (comma-separated)", "GeoJSON")?;
        if formats.is_empty() {
            formats.push("GeoJSON".to_string());
        }

        config
            .collections
            .push(Collection::new(name, query_types, formats));
    }

    if config.collections.iter().any(|c| c.supports("items")) {
        println!();
        config.properties = prompt.list(
            "Feature properties (comma-separated, e.g., station_id,value,timestamp)",
            "",
        )?;
    }

    println!();
    config.include_event_api =
        prompt.confirm("Include AsyncAPI/PubSub specification (OGC API - EDR Part 2)?", false)?;

    if config.include_event_api {
        let count = prompt.count("Number of filters", 0)?;
        for i in 0..count {
            println!();
            println!("{}", format!("--- Filter {} ---", i + 1).dim());
            let name = prompt.text("Name", None)?;
            let description = prompt.text("Description", None)?;
            let kind = prompt.text("Type (string/array/number)", Some("string"))?;
            config.filters.push(Filter::new(name, description, kind));
        }
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;

    use super::*;

    /// Replays scripted answers; an empty answer takes the default.
    struct Scripted(VecDeque<&'static str>);

    impl Scripted {
        fn new(answers: &[&'static str]) -> Self {
            Self(answers.iter().copied().collect())
        }

        fn answer(&mut self) -> &'static str {
            self.0.pop_front().expect("ran out of scripted answers")
        }
    }

    impl Prompt for Scripted {
        fn text(&mut self, _message: &str, default: Option<&str>) -> anyhow::Result<String> {
            let answer = self.answer();
            Ok(match (answer, default) {
                ("", Some(default)) => default.to_string(),
                (answer, _) => answer.to_string(),
            })
        }

        fn confirm(&mut self, _message: &str, default: bool) -> anyhow::Result<bool> {
            Ok(match self.answer() {
                "y" => true,
                "n" => false,
                _ => default,
            })
        }
    }

    #[test]
    fn defaults_describe_one_items_collection() {
        let mut prompt = Scripted::new(&["water_gauge", "", "", "", "", "", "station_id, value", ""]);

        let config = ask(&mut prompt).unwrap();

        assert_eq!(config.profile_name.as_str(), "water_gauge");
        assert_eq!(config.profile_title, "Water Gauge");
        assert_eq!(
            config.collections,
            vec![Collection::new("water_gauge", ["items"], ["GeoJSON"])]
        );
        assert_eq!(config.properties, vec!["station_id", "value"]);
        assert!(!config.include_event_api);
        assert!(config.filters.is_empty());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn second_collection_name_defaults_to_numbered_profile_name() {
        let mut prompt = Scripted::new(&[
            "rain", "Rainfall", "2", "", "position", "csv", "", "area,cube", ",", "y", "1",
            "station_id", "Station", "",
        ]);

        let config = ask(&mut prompt).unwrap();

        assert_eq!(config.profile_title, "Rainfall");
        assert_eq!(config.collections[1].name, "rain_2");
        assert_eq!(config.collections[1].query_types, vec!["area", "cube"]);
        assert_eq!(config.collections[1].formats, vec!["GeoJSON"]);
        assert!(config.properties.is_empty());
        assert!(config.include_event_api);
        assert_eq!(
            config.filters,
            vec![Filter::new("station_id", "Station", "string")]
        );
    }

    #[test]
    fn next_steps_point_at_the_editable_snapshot() {
        let profile = ProfileName::try_from("water_gauge").unwrap();

        let steps = next_steps(Path::new("water_gauge.yml"), &profile);

        assert_eq!(steps[0], "edr-profile generate water_gauge.yml");
        assert!(steps[1].contains("water_gauge/profile_config.yml"));
        assert_eq!(
            steps[2],
            "edr-profile generate water_gauge/profile_config.yml"
        );
    }

    #[test]
    fn invalid_profile_name_is_rejected() {
        let mut prompt = Scripted::new(&["water-gauge"]);

        assert!(ask(&mut prompt).is_err());
    }

    #[test]
    fn non_numeric_count_is_rejected() {
        let mut prompt = Scripted::new(&["p", "", "many"]);

        let error = ask(&mut prompt).unwrap_err();

        assert_eq!(error.to_string(), "'many' is not a number");
    }
}
