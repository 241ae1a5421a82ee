//! Abstract test synthesis.
//!
//! Every requirement yields exactly one test with the same id. Steps are
//! chosen in this order:
//!
//! 1. query-type requirements use the query-type rule table;
//! 2. otherwise the id's leading token selects a fixed step set;
//! 3. otherwise three generic steps naming the requirement.

use tracing::instrument;

use crate::{
    domain::{
        AbstractTest, Requirement,
        ident::{EVENT_API_KEY, FILTERS_ID, OPENAPI_ID, collection_from_query_id},
    },
    rules::query_types,
};

const OPENAPI_STEPS: &[&str] = &[
    "Send GET request to /openapi",
    "Verify response is valid OpenAPI 3.0 document",
    "Verify all collection endpoints are documented",
    "Verify GeoJSON schemas are defined",
];

const EVENT_API_STEPS: &[&str] = &[
    "Send GET request to /asyncapi.yaml",
    "Verify response is valid AsyncAPI 3.0 document",
    "Verify channels are defined for notifications",
    "Verify AMQP server is configured",
    "Connect to AMQP broker",
    "Subscribe to notification channel",
    "Verify messages are received",
    "Verify messages conform to AsyncAPI schema",
];

const FILTER_STEPS: &[&str] = &[
    "Verify x-ogc-subscription extension exists in AsyncAPI",
    "Verify all filters are documented",
    "Create subscription with filter",
    "Verify only matching messages are received",
];

/// Synthesizes one abstract test per requirement, preserving order.
#[must_use]
#[instrument(level = "debug", skip_all, fields(requirements = requirements.len()))]
pub fn synthesize_tests(requirements: &[Requirement]) -> Vec<AbstractTest> {
    requirements
        .iter()
        .map(|requirement| {
            AbstractTest::for_requirement(&requirement.id, steps_for(&requirement.id))
        })
        .collect()
}

/// The test steps for a requirement id.
#[must_use]
pub fn steps_for(requirement_id: &str) -> Vec<String> {
    if let Some(steps) = query_type_steps(requirement_id) {
        return steps;
    }

    let key = requirement_id
        .split_once('-')
        .map_or(requirement_id, |(head, _)| head);

    fixed_steps(key).map_or_else(
        || generic_steps(requirement_id),
        |steps| steps.iter().map(ToString::to_string).collect(),
    )
}

fn query_type_steps(requirement_id: &str) -> Option<Vec<String>> {
    query_types::all().find_map(|rule| {
        collection_from_query_id(requirement_id, rule.name)
            .map(|collection| rule.steps_for(&collection))
    })
}

fn fixed_steps(key: &str) -> Option<&'static [&'static str]> {
    match key {
        OPENAPI_ID => Some(OPENAPI_STEPS),
        EVENT_API_KEY => Some(EVENT_API_STEPS),
        FILTERS_ID => Some(FILTER_STEPS),
        _ => None,
    }
}

fn generic_steps(requirement_id: &str) -> Vec<String> {
    vec![
        format!("Verify requirement {requirement_id} is implemented"),
        "Test basic functionality".to_string(),
        "Verify conformance".to_string(),
    ]
}

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use super::*;
    use crate::{domain::Collection, engine::requirements::synthesize_requirements};

    #[test]
    fn one_test_per_requirement_with_matching_ids() {
        let collections = [Collection::new(
            "water_gauge",
            ["items", "position", "radius"],
            ["GeoJSON"],
        )];
        let requirements = synthesize_requirements(&collections, true, &[]);

        let tests = synthesize_tests(&requirements);

        assert_eq!(tests.len(), requirements.len());
        for (requirement, test) in requirements.iter().zip(&tests) {
            assert_eq!(test.id, requirement.id);
            assert_eq!(test.target_requirement_id, requirement.id);
        }
    }

    #[test]
    fn query_type_tests_restore_underscores() {
        let steps = steps_for("data-query-items-water-gauge");

        assert_eq!(steps.len(), 5);
        assert_eq!(steps[0], "Send GET request to /collections/water_gauge/items");
        assert_eq!(
            steps[3],
            "Send GET request to /collections/water_gauge/items/{featureId}"
        );
    }

    #[test]
    fn every_registered_query_type_pairs() {
        for rule in query_types::all() {
            let collections = [Collection::new("sea_ice", [rule.name], ["GeoJSON"])];
            let requirements = synthesize_requirements(&collections, false, &[]);
            let tests = synthesize_tests(&requirements);

            let id = format!("data-query-{}-sea-ice", rule.name);
            let test = tests.iter().find(|t| t.id == id).unwrap();
            assert_eq!(test.target_requirement_id, id);
            assert_eq!(test.steps, rule.steps_for("sea_ice"));
        }
    }

    #[test_case("openapi", 4; "openapi")]
    #[test_case("asyncapi-water-gauge", 8; "event api")]
    #[test_case("filters", 4; "filters")]
    #[test_case("collection-water-gauge", 3; "generic")]
    #[test_case("output-format-water-gauge", 3; "format is generic")]
    #[test_case("data-query-radius-water-gauge", 3; "unknown query type")]
    fn step_counts(id: &str, expected: usize) {
        assert_eq!(steps_for(id).len(), expected);
    }

    #[test]
    fn generic_steps_name_the_requirement() {
        assert_eq!(
            steps_for("collection-water-gauge"),
            vec![
                "Verify requirement collection-water-gauge is implemented",
                "Test basic functionality",
                "Verify conformance",
            ]
        );
    }

    #[test]
    fn hand_written_requirement_gets_a_test() {
        let requirements = [Requirement::new("latency", "Latency", ["fast"])];

        let tests = synthesize_tests(&requirements);

        assert_eq!(tests.len(), 1);
        assert_eq!(tests[0].steps[0], "Verify requirement latency is implemented");
    }
}
