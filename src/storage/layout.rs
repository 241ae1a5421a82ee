//! Where each artifact lives inside a profile directory.
//!
//! ```text
//! {profile}/
//! ├── requirements/
//! │   ├── core/REQ_{id}.adoc
//! │   └── requirements_class_core.adoc
//! ├── abstract_tests/
//! │   ├── core/ATS_{id}.adoc
//! │   └── ATS_class_core.adoc
//! ├── openapi.yaml
//! ├── asyncapi.yaml
//! └── profile_config.yml
//! ```
//!
//! Paths returned here are relative to the profile directory.

use std::path::{Component, Path, PathBuf};

/// Directory holding requirements.
pub const REQUIREMENTS_DIR: &str = "requirements";
/// Directory holding abstract tests.
pub const ABSTRACT_TESTS_DIR: &str = "abstract_tests";
/// HTTP API description file.
pub const OPENAPI_FILE: &str = "openapi.yaml";
/// Event API description file.
pub const ASYNCAPI_FILE: &str = "asyncapi.yaml";
/// Configuration snapshot file.
pub const SNAPSHOT_FILE: &str = "profile_config.yml";

const REQUIREMENT_PREFIX: &str = "REQ_";
const TEST_PREFIX: &str = "ATS_";
const EXTENSION: &str = "adoc";

/// The kind of a per-record artifact file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    /// A requirement file.
    Requirement,
    /// An abstract test file.
    AbstractTest,
}

impl ArtifactKind {
    const fn dir(self) -> &'static str {
        match self {
            Self::Requirement => REQUIREMENTS_DIR,
            Self::AbstractTest => ABSTRACT_TESTS_DIR,
        }
    }

    const fn prefix(self) -> &'static str {
        match self {
            Self::Requirement => REQUIREMENT_PREFIX,
            Self::AbstractTest => TEST_PREFIX,
        }
    }
}

/// Path of a requirement file, e.g. `requirements/core/REQ_openapi.adoc`.
#[must_use]
pub fn requirement_path(class_name: &str, id: &str) -> PathBuf {
    record_path(ArtifactKind::Requirement, class_name, id)
}

/// Path of an abstract test file, e.g. `abstract_tests/core/ATS_openapi.adoc`.
#[must_use]
pub fn test_path(class_name: &str, id: &str) -> PathBuf {
    record_path(ArtifactKind::AbstractTest, class_name, id)
}

fn record_path(kind: ArtifactKind, class_name: &str, id: &str) -> PathBuf {
    Path::new(kind.dir())
        .join(class_name)
        .join(format!("{}{id}.{EXTENSION}", kind.prefix()))
}

/// Path of a requirements class file.
#[must_use]
pub fn requirements_class_path(class_name: &str) -> PathBuf {
    Path::new(REQUIREMENTS_DIR).join(format!("requirements_class_{class_name}.{EXTENSION}"))
}

/// Path of a conformance class file.
#[must_use]
pub fn conformance_class_path(class_name: &str) -> PathBuf {
    Path::new(ABSTRACT_TESTS_DIR).join(format!("ATS_class_{class_name}.{EXTENSION}"))
}

/// A per-record artifact identified from its path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordPath {
    /// Whether the file holds a requirement or a test.
    pub kind: ArtifactKind,
    /// The class directory the file sits in.
    pub class_name: String,
    /// The record id encoded in the file name.
    pub id: String,
}

/// Identify a requirement or test file from its path relative to the profile
/// directory.
///
/// # Errors
///
/// Returns an error if the path is not of the form
/// `requirements/{class}/REQ_{id}.adoc` or
/// `abstract_tests/{class}/ATS_{id}.adoc`.
pub fn parse_record_path(relative: &Path) -> Result<RecordPath, ParseError> {
    let components = relative
        .components()
        .map(|component| match component {
            Component::Normal(segment) => segment.to_str().ok_or(ParseError::InvalidPath),
            _ => Err(ParseError::InvalidPath),
        })
        .collect::<Result<Vec<_>, _>>()?;

    let [dir, class_name, file_name] = components.as_slice() else {
        return Err(ParseError::UnexpectedDepth(components.len()));
    };

    let kind = match *dir {
        REQUIREMENTS_DIR => ArtifactKind::Requirement,
        ABSTRACT_TESTS_DIR => ArtifactKind::AbstractTest,
        other => return Err(ParseError::UnknownDirectory(other.to_string())),
    };

    let stem = file_name
        .strip_suffix(EXTENSION)
        .and_then(|s| s.strip_suffix('.'))
        .ok_or(ParseError::WrongExtension)?;

    let id = stem
        .strip_prefix(kind.prefix())
        .filter(|id| !id.is_empty())
        .ok_or_else(|| ParseError::MissingPrefix(kind.prefix()))?;

    Ok(RecordPath {
        kind,
        class_name: (*class_name).to_string(),
        id: id.to_string(),
    })
}

/// Errors that can occur when identifying an artifact from its path.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ParseError {
    /// The path is not a plain relative UTF-8 path.
    #[error("invalid path")]
    InvalidPath,
    /// The path does not have exactly three segments.
    #[error("expected 3 path segments, found {0}")]
    UnexpectedDepth(usize),
    /// The top-level directory is not a record directory.
    #[error("'{0}' is not a requirements or abstract tests directory")]
    UnknownDirectory(String),
    /// The file is not an AsciiDoc file.
    #[error("expected a .adoc file")]
    WrongExtension,
    /// The file name does not carry the prefix of its directory.
    #[error("file name must start with '{0}' followed by an id")]
    MissingPrefix(&'static str),
}
