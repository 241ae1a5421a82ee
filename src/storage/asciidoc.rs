//! AsciiDoc rendering of requirements, tests and classes.
//!
//! Each record is rendered as an anchored, delimited block with a
//! `[%metadata]` definition list, the form understood by Metanorma's OGC
//! flavour. The types here borrow their record and implement
//! [`fmt::Display`].

use std::fmt;

use crate::domain::{
    AbstractTest, ConformanceClass, ProfileName, Requirement, RequirementsClass,
};

const DELIMITER: &str = "====";

fn open_block(f: &mut fmt::Formatter<'_>, anchor: &str, style: &str) -> fmt::Result {
    writeln!(f, "[[{anchor}]]")?;
    writeln!(f, "[{style}]")?;
    writeln!(f, "{DELIMITER}")?;
    writeln!(f, "[%metadata]")
}

fn close_block(f: &mut fmt::Formatter<'_>) -> fmt::Result {
    writeln!(f, "{DELIMITER}")
}

/// A requirement rendered as a `[requirement]` block.
#[derive(Debug, Clone, Copy)]
pub struct RequirementBlock<'a> {
    profile: &'a ProfileName,
    requirement: &'a Requirement,
}

impl<'a> RequirementBlock<'a> {
    /// Wraps a requirement of the given profile for rendering.
    #[must_use]
    pub const fn new(profile: &'a ProfileName, requirement: &'a Requirement) -> Self {
        Self {
            profile,
            requirement,
        }
    }
}

impl fmt::Display for RequirementBlock<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let id = &self.requirement.id;
        open_block(f, &self.profile.requirement_anchor(id), "requirement")?;
        writeln!(f, "identifier:: {}", self.profile.requirement_uri(id))?;
        writeln!(f, "statement:: {}", self.requirement.statement)?;
        for part in &self.requirement.parts {
            writeln!(f, "part:: {part}")?;
        }
        close_block(f)
    }
}

/// An abstract test rendered as an `[abstract_test]` block.
#[derive(Debug, Clone, Copy)]
pub struct TestBlock<'a> {
    profile: &'a ProfileName,
    test: &'a AbstractTest,
}

impl<'a> TestBlock<'a> {
    /// Wraps a test of the given profile for rendering.
    #[must_use]
    pub const fn new(profile: &'a ProfileName, test: &'a AbstractTest) -> Self {
        Self { profile, test }
    }
}

impl fmt::Display for TestBlock<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let test = self.test;
        open_block(f, &self.profile.test_anchor(&test.id), "abstract_test")?;
        writeln!(f, "identifier:: {}", self.profile.test_uri(&test.id))?;
        writeln!(
            f,
            "target:: {}",
            self.profile.requirement_uri(&test.target_requirement_id)
        )?;
        writeln!(f, "test-purpose:: {}", test.purpose())?;
        writeln!(f, "test-method::")?;
        for step in &test.steps {
            writeln!(f, "step:: {step}")?;
        }
        close_block(f)
    }
}

/// A requirements class rendered as a `[requirements_class]` block.
#[derive(Debug, Clone, Copy)]
pub struct RequirementsClassBlock<'a> {
    profile: &'a ProfileName,
    class: &'a RequirementsClass,
}

impl<'a> RequirementsClassBlock<'a> {
    /// Wraps a requirements class of the given profile for rendering.
    #[must_use]
    pub const fn new(profile: &'a ProfileName, class: &'a RequirementsClass) -> Self {
        Self { profile, class }
    }
}

impl fmt::Display for RequirementsClassBlock<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let class = self.class;
        open_block(f, &class.anchor, "requirements_class")?;
        writeln!(f, "identifier:: {}", class.identifier)?;
        writeln!(f, "target-type:: {}", class.target_type)?;
        for id in &class.member_ids {
            writeln!(f, "requirement:: {}", self.profile.requirement_uri(id))?;
        }
        close_block(f)
    }
}

/// A conformance class rendered as a `[conformance_class]` block.
#[derive(Debug, Clone, Copy)]
pub struct ConformanceClassBlock<'a> {
    profile: &'a ProfileName,
    class: &'a ConformanceClass,
}

impl<'a> ConformanceClassBlock<'a> {
    /// Wraps a conformance class of the given profile for rendering.
    #[must_use]
    pub const fn new(profile: &'a ProfileName, class: &'a ConformanceClass) -> Self {
        Self { profile, class }
    }
}

impl fmt::Display for ConformanceClassBlock<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let class = self.class;
        open_block(f, &class.anchor, "conformance_class")?;
        writeln!(f, "identifier:: {}", class.identifier)?;
        writeln!(f, "target:: {}", class.target_class)?;
        for id in &class.member_ids {
            writeln!(f, "abstract-test:: {}", self.profile.test_uri(id))?;
        }
        close_block(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::classes::{conformance_class, requirements_class};

    fn profile() -> ProfileName {
        ProfileName::try_from("water_gauge").unwrap()
    }

    #[test]
    fn requirement_block() {
        let requirement = Requirement::new(
            "openapi",
            "OpenAPI specification",
            ["The service SHALL provide an OpenAPI 3.0 specification"],
        );

        let rendered = RequirementBlock::new(&profile(), &requirement).to_string();

        assert_eq!(
            rendered,
            "[[req_water_gauge_openapi]]\n\
             [requirement]\n\
             ====\n\
             [%metadata]\n\
             identifier:: /req/water_gauge/openapi\n\
             statement:: OpenAPI specification\n\
             part:: The service SHALL provide an OpenAPI 3.0 specification\n\
             ====\n"
        );
    }

    #[test]
    fn test_block() {
        let test = AbstractTest::for_requirement(
            "collection-water-gauge",
            ["Send GET request", "Verify conformance"],
        );

        let rendered = TestBlock::new(&profile(), &test).to_string();

        assert_eq!(
            rendered,
            "[[ats_water_gauge_collection-water-gauge]]\n\
             [abstract_test]\n\
             ====\n\
             [%metadata]\n\
             identifier:: /conf/water_gauge/collection-water-gauge\n\
             target:: /req/water_gauge/collection-water-gauge\n\
             test-purpose:: Validate that collection water gauge requirement is correctly implemented.\n\
             test-method::\n\
             step:: Send GET request\n\
             step:: Verify conformance\n\
             ====\n"
        );
    }

    #[test]
    fn class_blocks() {
        let profile = profile();
        let requirements = [
            Requirement::new("openapi", "OpenAPI", ["a"]),
            Requirement::new("filters", "Filters", ["b"]),
        ];
        let tests = [
            AbstractTest::for_requirement("openapi", ["s"]),
            AbstractTest::for_requirement("filters", ["s"]),
        ];

        let req_class = requirements_class(&profile, &requirements);
        let conf_class = conformance_class(&profile, &tests);

        assert_eq!(
            RequirementsClassBlock::new(&profile, &req_class).to_string(),
            "[[req_class_water_gauge_core]]\n\
             [requirements_class]\n\
             ====\n\
             [%metadata]\n\
             identifier:: http://www.opengis.net/spec/ogcapi-edr-3/1.0/req/water_gauge\n\
             target-type:: Water Gauge Profile Standard\n\
             requirement:: /req/water_gauge/openapi\n\
             requirement:: /req/water_gauge/filters\n\
             ====\n"
        );
        assert_eq!(
            ConformanceClassBlock::new(&profile, &conf_class).to_string(),
            "[[ats_class-water_gauge_core]]\n\
             [conformance_class]\n\
             ====\n\
             [%metadata]\n\
             identifier:: http://www.opengis.net/spec/ogcapi-edr-3/1.0/conf/water_gauge\n\
             target:: http://www.opengis.net/spec/ogcapi-edr-3/1.0/req/water_gauge\n\
             abstract-test:: /conf/water_gauge/openapi\n\
             abstract-test:: /conf/water_gauge/filters\n\
             ====\n"
        );
    }
}
