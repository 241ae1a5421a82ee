use std::{collections::HashSet, fmt, io, path::Path};

use nonempty::NonEmpty;
use serde::{Deserialize, Serialize};

use super::{
    collection::{Collection, Filter},
    ident::{ProfileName, is_valid_name},
    requirement::{AbstractTest, Requirement},
};

/// Declarative description of an EDR profile.
///
/// This is the single input of [`crate::generate`]. It can be written by hand,
/// produced interactively, or loaded from the snapshot saved alongside a
/// previous generation, in which case it also carries the requirements and
/// tests that were generated (and possibly edited) last time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Versions", into = "Versions")]
pub struct ProfileConfig {
    /// Profile name; also the name of the output directory.
    pub profile_name: ProfileName,

    /// Human-readable title of the profile.
    pub profile_title: String,

    /// Collections in declaration order.
    pub collections: Vec<Collection>,

    /// Feature properties shared by every collection's feature schema.
    pub properties: Vec<String>,

    /// Pub/sub subscription filters.
    pub filters: Vec<Filter>,

    /// Whether to describe the pub/sub event API.
    pub include_event_api: bool,

    /// Requirements recorded by a previous generation.
    ///
    /// When present these are used instead of synthesizing requirements.
    pub requirements: Option<Vec<Requirement>>,

    /// Abstract tests recorded by a previous generation.
    ///
    /// When present these are used instead of synthesizing tests.
    pub tests: Option<Vec<AbstractTest>>,
}

impl ProfileConfig {
    /// Creates a configuration with no collections, properties or filters.
    ///
    /// The title defaults to the title-cased profile name.
    #[must_use]
    pub fn new(profile_name: ProfileName) -> Self {
        Self {
            profile_title: profile_name.title(),
            profile_name,
            collections: Vec::new(),
            properties: Vec::new(),
            filters: Vec::new(),
            include_event_api: false,
            requirements: None,
            tests: None,
        }
    }

    /// Loads a configuration file.
    ///
    /// Files ending in `.toml` are parsed as TOML, anything else as YAML.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or does not describe a
    /// configuration. A missing required field is reported here, before any
    /// artifact is produced.
    pub fn load(path: &Path) -> Result<Self, LoadError> {
        let content = std::fs::read_to_string(path)?;
        if is_toml(path) {
            Ok(toml::from_str(&content)?)
        } else {
            Ok(serde_yaml::from_str(&content)?)
        }
    }

    /// Saves the configuration, choosing the format from the file extension
    /// as [`Self::load`] does.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be serialized or the file
    /// cannot be written.
    pub fn save(&self, path: &Path) -> Result<(), SaveError> {
        let content = if is_toml(path) {
            toml::to_string_pretty(self)?
        } else {
            self.to_yaml()?
        };
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Serializes the configuration as YAML.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_yaml(&self) -> Result<String, serde_yaml::Error> {
        serde_yaml::to_string(self)
    }

    /// Forgets any recorded requirements and tests so that the next
    /// generation synthesizes them afresh.
    pub fn discard_recorded(&mut self) {
        self.requirements = None;
        self.tests = None;
    }

    /// Checks the configuration before generation.
    ///
    /// All problems are collected and returned together.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] listing every issue found.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut issues = Vec::new();

        if self.profile_title.trim().is_empty() {
            issues.push(Issue::EmptyTitle);
        }

        self.check_collections(&mut issues);

        if self.properties.iter().any(|p| p.trim().is_empty()) {
            issues.push(Issue::EmptyProperty);
        }

        for filter in &self.filters {
            if filter.name.trim().is_empty() {
                issues.push(Issue::EmptyFilterName);
            } else if filter.kind.trim().is_empty() {
                issues.push(Issue::EmptyFilterType(filter.name.clone()));
            }
        }

        self.check_recorded(&mut issues);

        NonEmpty::from_vec(issues).map_or(Ok(()), |issues| Err(ValidationError { issues }))
    }

    fn check_collections(&self, issues: &mut Vec<Issue>) {
        let mut seen = HashSet::new();
        for collection in &self.collections {
            if !is_valid_name(&collection.name) {
                issues.push(Issue::InvalidCollectionName(collection.name.clone()));
            }
            if !seen.insert(collection.name.as_str()) {
                issues.push(Issue::DuplicateCollection(collection.name.clone()));
            }
            if collection.query_types.iter().any(|qt| qt.trim().is_empty()) {
                issues.push(Issue::EmptyQueryType(collection.name.clone()));
            }
            let mut declared = HashSet::new();
            for query_type in &collection.query_types {
                if !declared.insert(query_type.as_str()) {
                    issues.push(Issue::DuplicateQueryType {
                        collection: collection.name.clone(),
                        query_type: query_type.clone(),
                    });
                }
            }
            if collection.formats.iter().any(|f| f.trim().is_empty()) {
                issues.push(Issue::EmptyFormat(collection.name.clone()));
            }
        }
    }

    /// Recorded requirements and tests must obey the same invariants as
    /// synthesized ones: unique ids usable as file names, and one test per
    /// requirement in the same order, each targeting the requirement with its
    /// own id.
    fn check_recorded(&self, issues: &mut Vec<Issue>) {
        let Some(requirements) = &self.requirements else {
            if self.tests.is_some() {
                issues.push(Issue::TestsWithoutRequirements);
            }
            return;
        };

        let mut seen = HashSet::new();
        for requirement in requirements {
            if !is_valid_record_id(&requirement.id) {
                issues.push(Issue::InvalidRecordId(requirement.id.clone()));
            }
            if !seen.insert(requirement.id.as_str()) {
                issues.push(Issue::DuplicateRequirement(requirement.id.clone()));
            }
        }

        let Some(tests) = &self.tests else {
            return;
        };

        for test in tests {
            if !is_valid_record_id(&test.id) {
                issues.push(Issue::InvalidRecordId(test.id.clone()));
            }
            if test.id != test.target_requirement_id {
                issues.push(Issue::TestTargetMismatch {
                    test: test.id.clone(),
                    target: test.target_requirement_id.clone(),
                });
            }
        }

        for position in 0..requirements.len().max(tests.len()) {
            match (requirements.get(position), tests.get(position)) {
                (Some(requirement), Some(test)) if requirement.id != test.id => {
                    issues.push(Issue::TestOutOfOrder {
                        position,
                        expected: requirement.id.clone(),
                        found: test.id.clone(),
                    });
                }
                (Some(requirement), None) => {
                    issues.push(Issue::UntestedRequirement(requirement.id.clone()));
                }
                (None, Some(test)) => issues.push(Issue::OrphanTest(test.id.clone())),
                _ => {}
            }
        }
    }
}

/// Record ids become file names (`REQ_{id}.adoc`) and URI segments.
fn is_valid_record_id(id: &str) -> bool {
    !id.trim().is_empty() && !id.contains(['/', '\\']) && !id.contains("..")
}

fn is_toml(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "toml")
}

/// Errors that can occur when loading a configuration file.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// The file could not be read.
    #[error("failed to read config file: {0}")]
    Io(#[from] io::Error),
    /// The YAML content is not a valid configuration.
    #[error("failed to parse config file: {0}")]
    Yaml(#[from] serde_yaml::Error),
    /// The TOML content is not a valid configuration.
    #[error("failed to parse config file: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Errors that can occur when saving a configuration file.
#[derive(Debug, thiserror::Error)]
pub enum SaveError {
    /// The file could not be written.
    #[error("failed to write config file: {0}")]
    Io(#[from] io::Error),
    /// The configuration could not be serialized to YAML.
    #[error("failed to serialize config: {0}")]
    Yaml(#[from] serde_yaml::Error),
    /// The configuration could not be serialized to TOML.
    #[error("failed to serialize config: {0}")]
    Toml(#[from] toml::ser::Error),
}

/// A single problem found while validating a configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Issue {
    /// The profile title is blank.
    #[error("profile title is empty")]
    EmptyTitle,
    /// A collection name cannot be embedded in URIs and anchors.
    #[error("collection name '{0}' must contain only letters, digits and underscores")]
    InvalidCollectionName(String),
    /// Two collections share a name.
    #[error("collection '{0}' is declared more than once")]
    DuplicateCollection(String),
    /// A collection lists a blank query type.
    #[error("collection '{0}' has an empty query type")]
    EmptyQueryType(String),
    /// A collection lists the same query type more than once.
    #[error("collection '{collection}' declares query type '{query_type}' more than once")]
    DuplicateQueryType {
        /// The collection name.
        collection: String,
        /// The repeated query type.
        query_type: String,
    },
    /// A collection lists a blank format label.
    #[error("collection '{0}' has an empty format label")]
    EmptyFormat(String),
    /// A feature property is blank.
    #[error("feature property names must not be empty")]
    EmptyProperty,
    /// A filter has no name.
    #[error("filter name must not be empty")]
    EmptyFilterName,
    /// A filter has no value type.
    #[error("filter '{0}' has no type")]
    EmptyFilterType(String),
    /// Tests were recorded without the requirements they validate.
    #[error("recorded tests are present but recorded requirements are not")]
    TestsWithoutRequirements,
    /// A recorded requirement or test id is empty or could escape the
    /// profile directory.
    #[error("record id '{0}' must be non-empty and contain no path separators or '..'")]
    InvalidRecordId(String),
    /// Two recorded requirements share an id.
    #[error("requirement '{0}' is recorded more than once")]
    DuplicateRequirement(String),
    /// A recorded test targets a requirement other than its own id.
    #[error("test '{test}' targets '{target}' but must target its own id")]
    TestTargetMismatch {
        /// The test id.
        test: String,
        /// The requirement it targets.
        target: String,
    },
    /// Recorded tests are not in requirement order.
    #[error("test at position {position} is '{found}' but requirement there is '{expected}'")]
    TestOutOfOrder {
        /// Zero-based position in the lists.
        position: usize,
        /// The requirement id at that position.
        expected: String,
        /// The test id at that position.
        found: String,
    },
    /// A recorded requirement has no test.
    #[error("requirement '{0}' has no abstract test")]
    UntestedRequirement(String),
    /// A recorded test has no requirement.
    #[error("test '{0}' has no matching requirement")]
    OrphanTest(String),
}

/// Returned when a configuration fails validation.
#[derive(Debug, thiserror::Error)]
pub struct ValidationError {
    issues: NonEmpty<Issue>,
}

impl ValidationError {
    /// The issues found, in discovery order.
    #[must_use]
    pub const fn issues(&self) -> &NonEmpty<Issue> {
        &self.issues
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid profile configuration: ")?;
        for (i, issue) in self.issues.iter().enumerate() {
            if i > 0 {
                write!(f, "; ")?;
            }
            write!(f, "{issue}")?;
        }
        Ok(())
    }
}

/// The serialized versions of the configuration.
/// This allows for future changes to the snapshot format and to the domain
/// type without breaking compatibility.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "_version")]
enum Versions {
    #[serde(rename = "1")]
    V1 {
        profile_name: ProfileName,

        /// Defaults to the title-cased profile name.
        #[serde(default)]
        profile_title: Option<String>,

        collections: Vec<Collection>,

        #[serde(default)]
        properties: Vec<String>,

        #[serde(default)]
        filters: Vec<Filter>,

        #[serde(default, alias = "include_asyncapi")]
        include_event_api: bool,

        #[serde(default, skip_serializing_if = "Option::is_none")]
        requirements: Option<Vec<Requirement>>,

        #[serde(default, skip_serializing_if = "Option::is_none")]
        tests: Option<Vec<AbstractTest>>,
    },
}

impl From<Versions> for ProfileConfig {
    fn from(versions: Versions) -> Self {
        match versions {
            Versions::V1 {
                profile_name,
                profile_title,
                collections,
                properties,
                filters,
                include_event_api,
                requirements,
                tests,
            } => Self {
                profile_title: profile_title.unwrap_or_else(|| profile_name.title()),
                profile_name,
                collections,
                properties,
                filters,
                include_event_api,
                requirements,
                tests,
            },
        }
    }
}

impl From<ProfileConfig> for Versions {
    fn from(config: ProfileConfig) -> Self {
        Self::V1 {
            profile_name: config.profile_name,
            profile_title: Some(config.profile_title),
            collections: config.collections,
            properties: config.properties,
            filters: config.filters,
            include_event_api: config.include_event_api,
            requirements: config.requirements,
            tests: config.tests,
        }
    }
}
