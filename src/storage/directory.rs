//! A filesystem backed profile directory
//!
//! The [`ProfileDirectory`] writes an [`ArtifactBundle`] to disk and compares
//! what is on disk against a bundle. Every file is rendered up front by
//! [`render`], so writing and checking agree on the exact bytes.

use std::{
    collections::HashSet,
    fs, io,
    path::{Path, PathBuf},
};

use tracing::instrument;
use walkdir::WalkDir;

use super::{
    asciidoc::{ConformanceClassBlock, RequirementBlock, RequirementsClassBlock, TestBlock},
    layout::{self, ASYNCAPI_FILE, OPENAPI_FILE, SNAPSHOT_FILE},
};
use crate::{
    domain::{ProfileConfig, ProfileName, config::LoadError},
    engine::{ArtifactBundle, classes::CORE_CLASS},
};

/// A rendered file, ready to be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    /// Path relative to the profile directory.
    pub path: PathBuf,
    /// File content.
    pub content: String,
}

impl Artifact {
    fn new(path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
        }
    }
}

/// Renders every file of a bundle, in a fixed order.
///
/// # Errors
///
/// Returns an error if an API description or the snapshot cannot be
/// serialized to YAML.
pub fn render(bundle: &ArtifactBundle) -> Result<Vec<Artifact>, serde_yaml::Error> {
    let profile = bundle.profile();
    let mut artifacts = Vec::with_capacity(bundle.requirements.len() + bundle.tests.len() + 5);

    artifacts.extend(bundle.requirements.iter().map(|requirement| {
        Artifact::new(
            layout::requirement_path(CORE_CLASS, &requirement.id),
            RequirementBlock::new(profile, requirement).to_string(),
        )
    }));
    artifacts.push(Artifact::new(
        layout::requirements_class_path(CORE_CLASS),
        RequirementsClassBlock::new(profile, &bundle.requirements_class).to_string(),
    ));

    artifacts.extend(bundle.tests.iter().map(|test| {
        Artifact::new(
            layout::test_path(CORE_CLASS, &test.id),
            TestBlock::new(profile, test).to_string(),
        )
    }));
    artifacts.push(Artifact::new(
        layout::conformance_class_path(CORE_CLASS),
        ConformanceClassBlock::new(profile, &bundle.conformance_class).to_string(),
    ));

    artifacts.push(Artifact::new(
        OPENAPI_FILE,
        serde_yaml::to_string(&bundle.http_api)?,
    ));
    if let Some(event_api) = &bundle.event_api {
        artifacts.push(Artifact::new(
            ASYNCAPI_FILE,
            serde_yaml::to_string(event_api)?,
        ));
    }

    artifacts.push(Artifact::new(SNAPSHOT_FILE, bundle.snapshot().to_yaml()?));

    Ok(artifacts)
}

/// Differences between a profile directory and a bundle.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Drift {
    /// Files the bundle has that are not on disk.
    pub missing: Vec<PathBuf>,
    /// Files on disk whose content differs from the bundle.
    pub outdated: Vec<PathBuf>,
    /// Generated files on disk that the bundle no longer has.
    pub stale: Vec<PathBuf>,
}

impl Drift {
    /// Whether the directory matches the bundle exactly.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.missing.is_empty() && self.outdated.is_empty() && self.stale.is_empty()
    }
}

/// The output directory of one profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileDirectory {
    root: PathBuf,
}

impl ProfileDirectory {
    /// Opens a profile directory at the given path.
    #[must_use]
    pub const fn new(root: PathBuf) -> Self {
        Self { root }
    }

    /// The directory of `profile` inside `output`.
    #[must_use]
    pub fn for_profile(output: &Path, profile: &ProfileName) -> Self {
        Self::new(output.join(profile.as_str()))
    }

    /// The root of the profile directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the configuration snapshot.
    #[must_use]
    pub fn snapshot_path(&self) -> PathBuf {
        self.root.join(SNAPSHOT_FILE)
    }

    /// Loads the configuration snapshot saved by a previous generation.
    ///
    /// # Errors
    ///
    /// Returns an error if the snapshot is missing or cannot be parsed.
    pub fn load_snapshot(&self) -> Result<ProfileConfig, LoadError> {
        ProfileConfig::load(&self.snapshot_path())
    }

    /// Writes every file of the bundle, creating directories as needed.
    ///
    /// Existing files are overwritten. Files the bundle does not produce are
    /// left alone; see [`Self::prune`].
    ///
    /// Returns the number of files written.
    ///
    /// # Errors
    ///
    /// Returns an error if a file cannot be rendered or written.
    #[instrument(skip_all, fields(root = %self.root.display()))]
    pub fn write(&self, bundle: &ArtifactBundle) -> Result<usize, WriteError> {
        let artifacts = render(bundle)?;

        for artifact in &artifacts {
            let path = self.root.join(&artifact.path);
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent).map_err(|source| WriteError::io(parent, source))?;
            }
            fs::write(&path, &artifact.content).map_err(|source| WriteError::io(&path, source))?;
            tracing::debug!(path = %artifact.path.display(), "wrote artifact");
        }

        Ok(artifacts.len())
    }

    /// Compares the directory with the files the bundle would write.
    ///
    /// Requirement and test files, and the event API description, count as
    /// stale when the bundle does not produce them. Any other file is ignored.
    ///
    /// # Errors
    ///
    /// Returns an error if the bundle cannot be rendered or the directory
    /// cannot be read.
    #[instrument(skip_all, fields(root = %self.root.display()))]
    pub fn drift(&self, bundle: &ArtifactBundle) -> Result<Drift, WriteError> {
        let artifacts = render(bundle)?;
        let mut drift = Drift::default();
        let mut present = HashSet::new();

        for path in self.generated_files(&artifacts)? {
            let Some(artifact) = artifacts.iter().find(|a| a.path == path) else {
                drift.stale.push(path);
                continue;
            };
            let full = self.root.join(&path);
            let content = fs::read_to_string(&full).map_err(|source| WriteError::io(&full, source))?;
            if content != artifact.content {
                drift.outdated.push(path.clone());
            }
            present.insert(path);
        }

        drift.missing = artifacts
            .into_iter()
            .map(|artifact| artifact.path)
            .filter(|path| !present.contains(path))
            .collect();

        tracing::debug!(
            missing = drift.missing.len(),
            outdated = drift.outdated.len(),
            stale = drift.stale.len(),
            "compared profile directory"
        );

        Ok(drift)
    }

    /// Removes the stale files listed in `drift`.
    ///
    /// Returns the number of files removed.
    ///
    /// # Errors
    ///
    /// Returns an error if a file cannot be removed.
    pub fn prune(&self, drift: &Drift) -> Result<usize, WriteError> {
        for path in &drift.stale {
            let full = self.root.join(path);
            fs::remove_file(&full).map_err(|source| WriteError::io(&full, source))?;
            tracing::info!(path = %path.display(), "removed stale artifact");
        }
        Ok(drift.stale.len())
    }

    /// Relative paths of files on disk that are either expected or look like
    /// something this tool generates, sorted by path.
    fn generated_files(&self, expected: &[Artifact]) -> Result<Vec<PathBuf>, WriteError> {
        if !self.root.exists() {
            return Ok(Vec::new());
        }

        let mut files = Vec::new();
        for entry in WalkDir::new(&self.root).sort_by_file_name() {
            let entry = entry?;
            if !entry.file_type().is_file() {
                continue;
            }
            let Ok(relative) = entry.path().strip_prefix(&self.root) else {
                continue;
            };
            if expected.iter().any(|a| a.path == relative) || is_generated(relative) {
                files.push(relative.to_path_buf());
            } else {
                tracing::trace!(path = %relative.display(), "ignoring unrecognised file");
            }
        }
        Ok(files)
    }
}

fn is_generated(relative: &Path) -> bool {
    relative == Path::new(ASYNCAPI_FILE) || layout::parse_record_path(relative).is_ok()
}

/// Errors that can occur when writing or inspecting a profile directory.
#[derive(Debug, thiserror::Error)]
pub enum WriteError {
    /// An artifact could not be serialized.
    #[error("failed to render artifact: {0}")]
    Render(#[from] serde_yaml::Error),
    /// The directory could not be traversed.
    #[error("failed to scan profile directory: {0}")]
    Walk(#[from] walkdir::Error),
    /// A file or directory could not be accessed.
    #[error("failed to access {}: {source}", .path.display())]
    Io {
        /// The path being accessed.
        path: PathBuf,
        /// The underlying error.
        source: io::Error,
    },
}

impl WriteError {
    fn io(path: &Path, source: io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{Collection, Filter},
        engine::generate,
    };

    fn bundle(include_event_api: bool) -> ArtifactBundle {
        let mut config = ProfileConfig::new(ProfileName::try_from("water_gauge").unwrap());
        config.collections.push(Collection::new(
            "water_gauge",
            ["items", "position"],
            ["GeoJSON"],
        ));
        config.properties = vec!["station_id".to_string()];
        config.filters = vec![Filter::new("station_id", "Station", "string")];
        config.include_event_api = include_event_api;
        generate(&config).unwrap()
    }

    #[test]
    fn render_lists_every_file_once() {
        let bundle = bundle(true);

        let artifacts = render(&bundle).unwrap();
        let paths: HashSet<_> = artifacts.iter().map(|a| a.path.clone()).collect();

        assert_eq!(paths.len(), artifacts.len());
        assert_eq!(
            artifacts.len(),
            bundle.requirements.len() + bundle.tests.len() + 5
        );
        assert!(paths.contains(Path::new("requirements/core/REQ_openapi.adoc")));
        assert!(paths.contains(Path::new("abstract_tests/core/ATS_filters.adoc")));
        assert!(paths.contains(Path::new("asyncapi.yaml")));
    }

    #[test]
    fn render_omits_event_api_when_disabled() {
        let artifacts = render(&bundle(false)).unwrap();

        assert!(!artifacts.iter().any(|a| a.path == Path::new(ASYNCAPI_FILE)));
    }

    #[test]
    fn write_then_drift_is_clean() {
        let tmp = tempfile::tempdir().unwrap();
        let profile = ProfileName::try_from("water_gauge").unwrap();
        let directory = ProfileDirectory::for_profile(tmp.path(), &profile);
        let bundle = bundle(true);

        let written = directory.write(&bundle).unwrap();

        assert_eq!(written, render(&bundle).unwrap().len());
        assert!(tmp.path().join("water_gauge/openapi.yaml").is_file());
        assert!(directory.drift(&bundle).unwrap().is_clean());
    }

    #[test]
    fn snapshot_round_trips_through_the_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let directory = ProfileDirectory::new(tmp.path().join("water_gauge"));
        let bundle = bundle(true);
        directory.write(&bundle).unwrap();

        let snapshot = directory.load_snapshot().unwrap();
        let regenerated = generate(&snapshot).unwrap();

        assert_eq!(regenerated, bundle);
    }

    #[test]
    fn drift_reports_missing_outdated_and_stale() {
        let tmp = tempfile::tempdir().unwrap();
        let directory = ProfileDirectory::new(tmp.path().to_path_buf());
        directory.write(&bundle(true)).unwrap();

        fs::remove_file(tmp.path().join("requirements/core/REQ_openapi.adoc")).unwrap();
        fs::write(tmp.path().join("abstract_tests/core/ATS_openapi.adoc"), "edited").unwrap();
        fs::write(tmp.path().join("requirements/core/REQ_removed.adoc"), "old").unwrap();
        fs::write(tmp.path().join("notes.txt"), "kept").unwrap();

        let drift = directory.drift(&bundle(false)).unwrap();

        assert_eq!(
            drift.missing,
            vec![PathBuf::from("requirements/core/REQ_openapi.adoc")]
        );
        assert!(drift
            .outdated
            .contains(&PathBuf::from("abstract_tests/core/ATS_openapi.adoc")));
        assert!(drift.outdated.contains(&PathBuf::from(SNAPSHOT_FILE)));
        assert!(drift.stale.contains(&PathBuf::from(ASYNCAPI_FILE)));
        assert!(drift
            .stale
            .contains(&PathBuf::from("requirements/core/REQ_removed.adoc")));
        assert!(drift
            .stale
            .contains(&PathBuf::from("abstract_tests/core/ATS_asyncapi-water-gauge.adoc")));
        assert!(!drift.stale.iter().any(|p| p == Path::new("notes.txt")));
    }

    #[test]
    fn prune_removes_only_stale_files() {
        let tmp = tempfile::tempdir().unwrap();
        let directory = ProfileDirectory::new(tmp.path().to_path_buf());
        directory.write(&bundle(true)).unwrap();
        let smaller = bundle(false);
        directory.write(&smaller).unwrap();

        let drift = directory.drift(&smaller).unwrap();
        let removed = directory.prune(&drift).unwrap();

        assert_eq!(removed, drift.stale.len());
        assert!(removed > 0);
        assert!(!tmp.path().join(ASYNCAPI_FILE).exists());
        assert!(directory.drift(&smaller).unwrap().is_clean());
    }

    #[test]
    fn missing_directory_reports_everything_missing() {
        let tmp = tempfile::tempdir().unwrap();
        let directory = ProfileDirectory::new(tmp.path().join("absent"));
        let bundle = bundle(false);

        let drift = directory.drift(&bundle).unwrap();

        assert_eq!(drift.missing.len(), render(&bundle).unwrap().len());
        assert!(drift.stale.is_empty());
    }
}
