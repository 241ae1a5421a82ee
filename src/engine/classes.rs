//! Cross-reference assembly.
//!
//! Builds the requirements class and conformance class that aggregate every
//! requirement and test of a profile.

use crate::domain::{
    AbstractTest, ConformanceClass, ProfileName, Requirement, RequirementsClass,
};

/// Name of the single class generated for a profile.
pub const CORE_CLASS: &str = "core";

/// Builds the requirements class listing every requirement id in order.
#[must_use]
pub fn requirements_class(profile: &ProfileName, requirements: &[Requirement]) -> RequirementsClass {
    RequirementsClass {
        name: CORE_CLASS.to_string(),
        identifier: profile.requirements_class_uri(),
        target_type: format!("{} Profile Standard", profile.title()),
        anchor: profile.requirements_class_anchor(CORE_CLASS),
        member_ids: requirements.iter().map(|r| r.id.clone()).collect(),
    }
}

/// Builds the conformance class listing every test id in order.
#[must_use]
pub fn conformance_class(profile: &ProfileName, tests: &[AbstractTest]) -> ConformanceClass {
    ConformanceClass {
        name: CORE_CLASS.to_string(),
        identifier: profile.conformance_class_uri(),
        target_class: profile.requirements_class_uri(),
        anchor: profile.conformance_class_anchor(CORE_CLASS),
        member_ids: tests.iter().map(|t| t.id.clone()).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::Collection,
        engine::{abstract_tests::synthesize_tests, requirements::synthesize_requirements},
    };

    #[test]
    fn classes_follow_generation_order() {
        let profile = ProfileName::try_from("water_gauge").unwrap();
        let collections = [Collection::new(
            "water_gauge",
            ["items", "position"],
            ["GeoJSON"],
        )];
        let requirements = synthesize_requirements(&collections, false, &[]);
        let tests = synthesize_tests(&requirements);

        let req_class = requirements_class(&profile, &requirements);
        let conf_class = conformance_class(&profile, &tests);

        assert_eq!(req_class.target_type, "Water Gauge Profile Standard");
        assert_eq!(req_class.anchor, "req_class_water_gauge_core");
        assert_eq!(
            req_class.identifier,
            "http://www.opengis.net/spec/ogcapi-edr-3/1.0/req/water_gauge"
        );
        assert_eq!(conf_class.target_class, req_class.identifier);
        assert_eq!(conf_class.anchor, "ats_class-water_gauge_core");
        assert_eq!(req_class.member_ids, conf_class.member_ids);
        assert_eq!(req_class.member_ids[0], "openapi");
        assert_eq!(req_class.member_ids.len(), 5);
    }
}
