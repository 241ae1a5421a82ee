//! Artifact generation.
//!
//! [`generate`] turns a [`ProfileConfig`] into an [`ArtifactBundle`]: the
//! requirements, abstract tests, class cross-references and API descriptions
//! of a profile. Generation is pure and deterministic; writing the bundle to
//! disk is the job of [`crate::storage`].

pub mod abstract_tests;
pub mod classes;
pub mod event_api;
pub mod http_api;
pub mod requirements;

use tracing::instrument;

pub use event_api::EventApiDescription;
pub use http_api::ApiDescription;

use crate::domain::{
    AbstractTest, ConformanceClass, ProfileConfig, ProfileName, Requirement, RequirementsClass,
    ValidationError, requirement,
};

/// Everything generated for one profile.
#[derive(Debug, Clone, PartialEq)]
pub struct ArtifactBundle {
    /// The configuration the bundle was generated from, without recorded
    /// requirements or tests.
    pub config: ProfileConfig,
    /// Requirements in generation order.
    pub requirements: Vec<Requirement>,
    /// Abstract tests, paired positionally with [`Self::requirements`].
    pub tests: Vec<AbstractTest>,
    /// The requirements class aggregating every requirement.
    pub requirements_class: RequirementsClass,
    /// The conformance class aggregating every test.
    pub conformance_class: ConformanceClass,
    /// HTTP API description.
    pub http_api: ApiDescription,
    /// Event API description, present only when the configuration asks for
    /// it.
    pub event_api: Option<EventApiDescription>,
}

impl ArtifactBundle {
    /// The profile the bundle belongs to.
    #[must_use]
    pub const fn profile(&self) -> &ProfileName {
        &self.config.profile_name
    }

    /// The configuration snapshot to save alongside the artifacts.
    ///
    /// It records the generated requirements and tests, so generating from it
    /// again reproduces this bundle, including any hand edits made to the
    /// snapshot in between.
    #[must_use]
    pub fn snapshot(&self) -> ProfileConfig {
        ProfileConfig {
            requirements: Some(self.requirements.clone()),
            tests: Some(self.tests.clone()),
            ..self.config.clone()
        }
    }

    /// Content fingerprint of the requirements and tests.
    #[must_use]
    pub fn fingerprint(&self) -> String {
        requirement::fingerprint(&self.requirements, &self.tests)
    }
}

/// Generates the artifacts of a profile.
///
/// Recorded requirements and tests in the configuration are used as they are;
/// otherwise they are synthesized from the collections. Recorded requirements
/// without recorded tests get synthesized tests.
///
/// # Errors
///
/// Returns a [`ValidationError`] if the configuration is invalid. Nothing is
/// generated in that case.
#[instrument(skip_all, fields(profile = %config.profile_name))]
pub fn generate(config: &ProfileConfig) -> Result<ArtifactBundle, ValidationError> {
    config.validate()?;

    let profile = &config.profile_name;

    let requirements = config.requirements.clone().unwrap_or_else(|| {
        requirements::synthesize_requirements(
            &config.collections,
            config.include_event_api,
            &config.filters,
        )
    });

    let tests = config
        .tests
        .clone()
        .unwrap_or_else(|| abstract_tests::synthesize_tests(&requirements));

    let requirements_class = classes::requirements_class(profile, &requirements);
    let conformance_class = classes::conformance_class(profile, &tests);

    let http_api = http_api::synthesize_http_api(
        profile,
        &config.collections,
        &config.properties,
        config.include_event_api,
    );

    let event_api = config.include_event_api.then(|| {
        event_api::synthesize_event_api(profile, &config.collections, &config.filters)
    });

    let mut config = config.clone();
    config.discard_recorded();

    tracing::info!(
        requirements = requirements.len(),
        tests = tests.len(),
        event_api = event_api.is_some(),
        "generated profile artifacts"
    );

    Ok(ArtifactBundle {
        config,
        requirements,
        tests,
        requirements_class,
        conformance_class,
        http_api,
        event_api,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Collection, Filter, Issue};

    fn water_gauge() -> ProfileConfig {
        let mut config = ProfileConfig::new(ProfileName::try_from("water_gauge").unwrap());
        config.collections.push(Collection::new(
            "water_gauge",
            ["items", "position"],
            ["GeoJSON"],
        ));
        config.properties = vec!["station_id".to_string()];
        config
    }

    #[test]
    fn water_gauge_example() {
        let bundle = generate(&water_gauge()).unwrap();

        let ids: Vec<_> = bundle.requirements.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(
            ids,
            vec![
                "openapi",
                "collection-water-gauge",
                "data-query-items-water-gauge",
                "data-query-position-water-gauge",
                "output-format-water-gauge",
            ]
        );
        assert_eq!(bundle.tests[2].steps.len(), 5);
        assert_eq!(bundle.tests[3].steps.len(), 3);
        assert!(bundle.event_api.is_none());
        assert_eq!(bundle.requirements_class.member_ids.len(), 5);
        assert_eq!(bundle.conformance_class.member_ids.len(), 5);
    }

    #[test]
    fn generation_is_deterministic() {
        let mut config = water_gauge();
        config.include_event_api = true;
        config.filters = vec![Filter::new("station_id", "Station", "string")];

        let first = generate(&config).unwrap();
        let second = generate(&config).unwrap();

        assert_eq!(first, second);
        assert_eq!(first.fingerprint(), second.fingerprint());
        assert_eq!(
            serde_yaml::to_string(&first.http_api).unwrap(),
            serde_yaml::to_string(&second.http_api).unwrap()
        );
    }

    #[test]
    fn event_api_follows_flag() {
        let mut config = water_gauge();

        let bundle = generate(&config).unwrap();
        assert!(bundle.event_api.is_none());
        assert!(!bundle.requirements.iter().any(|r| r.id.starts_with("asyncapi-")));

        config.include_event_api = true;
        let bundle = generate(&config).unwrap();
        assert!(bundle.event_api.is_some());
        assert!(bundle.requirements.iter().any(|r| r.id == "asyncapi-water-gauge"));
    }

    #[test]
    fn invalid_config_yields_no_bundle() {
        let mut config = water_gauge();
        config.collections.push(Collection::new("water-gauge", ["items"], ["csv"]));

        let error = generate(&config).unwrap_err();

        assert_eq!(
            error.issues().head,
            Issue::InvalidCollectionName("water-gauge".to_string())
        );
    }

    #[test]
    fn snapshot_regenerates_the_same_bundle() {
        let bundle = generate(&water_gauge()).unwrap();

        let snapshot = bundle.snapshot();
        let regenerated = generate(&snapshot).unwrap();

        assert_eq!(regenerated, bundle);
        assert!(bundle.config.requirements.is_none());
    }

    #[test]
    fn repeated_query_type_yields_no_bundle() {
        let mut config = water_gauge();
        config.collections[0].query_types = vec!["items".to_string(), "items".to_string()];

        let error = generate(&config).unwrap_err();

        assert_eq!(
            error.issues().head,
            Issue::DuplicateQueryType {
                collection: "water_gauge".to_string(),
                query_type: "items".to_string(),
            }
        );
    }

    #[test]
    fn saved_snapshot_regenerates_the_same_bundle() {
        let mut config = water_gauge();
        config.collections[0].query_types = crate::rules::query_types::all()
            .map(|rule| rule.name.to_string())
            .collect();
        config.include_event_api = true;
        config.filters = vec![Filter::new("station_id", "Station", "string")];
        let bundle = generate(&config).unwrap();

        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("profile_config.yml");
        bundle.snapshot().save(&path).unwrap();
        let regenerated = generate(&ProfileConfig::load(&path).unwrap()).unwrap();

        assert_eq!(regenerated, bundle);
    }

    #[test]
    fn recorded_id_outside_profile_directory_yields_no_bundle() {
        let mut snapshot = generate(&water_gauge()).unwrap().snapshot();
        snapshot.requirements.as_mut().unwrap()[0].id = "../../escaped".to_string();
        snapshot.tests.as_mut().unwrap()[0] =
            AbstractTest::for_requirement("../../escaped", ["s"]);

        let error = generate(&snapshot).unwrap_err();

        assert_eq!(
            error.issues().head,
            Issue::InvalidRecordId("../../escaped".to_string())
        );
    }

    #[test]
    fn recorded_requirements_are_used_as_is() {
        let mut snapshot = generate(&water_gauge()).unwrap().snapshot();
        let requirements = snapshot.requirements.as_mut().unwrap();
        requirements[0].statement = "Edited by hand".to_string();
        requirements.push(Requirement::new("latency", "Latency", ["fast"]));
        snapshot.tests = None;

        let bundle = generate(&snapshot).unwrap();

        assert_eq!(bundle.requirements[0].statement, "Edited by hand");
        assert_eq!(bundle.tests.len(), 6);
        assert_eq!(bundle.tests[5].id, "latency");
        assert_eq!(bundle.requirements_class.member_ids[5], "latency");
    }

    #[test]
    fn fingerprint_tracks_content() {
        let bundle = generate(&water_gauge()).unwrap();
        let mut edited = bundle.clone();
        edited.tests[0].steps.push("Extra step".to_string());

        assert_ne!(bundle.fingerprint(), edited.fingerprint());
    }
}
