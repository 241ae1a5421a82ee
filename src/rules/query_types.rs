//! Query-type rule table.
//!
//! Every template string may contain `{collection}`, which is replaced with the
//! raw collection name. Other braces (`{featureId}`, `{locationId}`) are
//! literal path parameters.

/// Requirement and test templates for one query type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryTypeRule {
    /// The query type name, e.g. `items`.
    pub name: &'static str,
    /// Requirement statement template.
    pub statement: &'static str,
    /// Requirement part templates.
    pub parts: &'static [&'static str],
    /// Abstract test step templates.
    pub test_steps: &'static [&'static str],
}

const PLACEHOLDER: &str = "{collection}";

fn instantiate(template: &str, collection: &str) -> String {
    template.replace(PLACEHOLDER, collection)
}

impl QueryTypeRule {
    /// The requirement statement for the given collection.
    #[must_use]
    pub fn statement_for(&self, collection: &str) -> String {
        instantiate(self.statement, collection)
    }

    /// The requirement parts for the given collection.
    #[must_use]
    pub fn parts_for(&self, collection: &str) -> Vec<String> {
        self.parts
            .iter()
            .map(|part| instantiate(part, collection))
            .collect()
    }

    /// The abstract test steps for the given collection.
    #[must_use]
    pub fn steps_for(&self, collection: &str) -> Vec<String> {
        self.test_steps
            .iter()
            .map(|step| instantiate(step, collection))
            .collect()
    }
}

/// Looks up a query type by exact name.
#[must_use]
pub fn lookup(name: &str) -> Option<&'static QueryTypeRule> {
    QUERY_TYPES.iter().find(|rule| rule.name == name)
}

/// Every registered query type, in table order.
pub fn all() -> impl Iterator<Item = &'static QueryTypeRule> {
    QUERY_TYPES.iter()
}

static QUERY_TYPES: &[QueryTypeRule] = &[
    QueryTypeRule {
        name: "items",
        statement: "{collection} items query support",
        parts: &[
            "The service SHALL provide a /collections/{collection}/items endpoint",
            "The Items query SHALL return GeoJSON FeatureCollection formatted data",
            "The Items query SHALL support GET method",
            "Each Feature SHALL contain the required properties defined in the profile",
            "The service SHALL provide a /collections/{collection}/items/{featureId} endpoint for individual items",
        ],
        test_steps: &[
            "Send GET request to /collections/{collection}/items",
            "Verify response is valid GeoJSON FeatureCollection",
            "Verify response contains required properties",
            "Send GET request to /collections/{collection}/items/{featureId}",
            "Verify response is valid GeoJSON Feature",
        ],
    },
    QueryTypeRule {
        name: "position",
        statement: "{collection} position query support",
        parts: &[
            "The service SHALL provide a /collections/{collection}/position endpoint",
            "The Position query SHALL accept coords parameter with POINT geometry",
            "The Position query SHALL support datetime parameter",
            "The response SHALL return data for the specified position",
        ],
        test_steps: &[
            "Send GET request to /collections/{collection}/position with coords parameter",
            "Verify response contains data for the specified position",
            "Verify datetime parameter is supported",
        ],
    },
    QueryTypeRule {
        name: "area",
        statement: "{collection} area query support",
        parts: &[
            "The service SHALL provide a /collections/{collection}/area endpoint",
            "The Area query SHALL accept coords parameter with POLYGON or MULTIPOLYGON geometry",
            "The Area query SHALL support datetime parameter",
            "The response SHALL return data within the specified area",
        ],
        test_steps: &[
            "Send GET request to /collections/{collection}/area with coords parameter",
            "Verify response contains data within the specified area",
            "Verify POLYGON and MULTIPOLYGON geometries are supported",
        ],
    },
    QueryTypeRule {
        name: "cube",
        statement: "{collection} cube query support",
        parts: &[
            "The service SHALL provide a /collections/{collection}/cube endpoint",
            "The Cube query SHALL accept bbox parameter",
            "The Cube query SHALL support datetime and z parameters",
            "The response SHALL return data within the specified cube",
        ],
        test_steps: &[
            "Send GET request to /collections/{collection}/cube with bbox parameter",
            "Verify response contains data within the specified cube",
            "Verify datetime and z parameters are supported",
        ],
    },
    QueryTypeRule {
        name: "trajectory",
        statement: "{collection} trajectory query support",
        parts: &[
            "The service SHALL provide a /collections/{collection}/trajectory endpoint",
            "The Trajectory query SHALL accept coords parameter with LINESTRING geometry",
            "The Trajectory query SHALL support datetime parameter",
            "The response SHALL return data along the specified trajectory",
        ],
        test_steps: &[
            "Send GET request to /collections/{collection}/trajectory with coords parameter",
            "Verify response contains data along the trajectory",
            "Verify LINESTRING geometry is supported",
        ],
    },
    QueryTypeRule {
        name: "corridor",
        statement: "{collection} corridor query support",
        parts: &[
            "The service SHALL provide a /collections/{collection}/corridor endpoint",
            "The Corridor query SHALL accept coords and corridor-width parameters",
            "The Corridor query SHALL support datetime parameter",
            "The response SHALL return data within the specified corridor",
        ],
        test_steps: &[
            "Send GET request to /collections/{collection}/corridor with coords and corridor-width parameters",
            "Verify response contains data within the corridor",
            "Verify datetime parameter is supported",
        ],
    },
    QueryTypeRule {
        name: "locations",
        statement: "{collection} locations query support",
        parts: &[
            "The service SHALL provide a /collections/{collection}/locations endpoint",
            "The Locations query SHALL accept locationId parameter",
            "The Locations query SHALL support datetime parameter",
            "The response SHALL return data for the specified location",
        ],
        test_steps: &[
            "Send GET request to /collections/{collection}/locations",
            "Verify response lists available locations",
            "Send GET request to /collections/{collection}/locations/{locationId}",
            "Verify response contains data for the specified location",
        ],
    },
    QueryTypeRule {
        name: "instances",
        statement: "{collection} instances query support",
        parts: &[
            "The service SHALL provide a /collections/{collection}/instances endpoint",
            "The Instances endpoint SHALL list available time instances",
            "Each instance SHALL support the same query types as the collection",
        ],
        test_steps: &[
            "Send GET request to /collections/{collection}/instances",
            "Verify response lists available time instances",
            "Verify each instance supports the collection's query types",
        ],
    },
];

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use super::*;

    #[test_case("items", 5, 5)]
    #[test_case("position", 4, 3)]
    #[test_case("area", 4, 3)]
    #[test_case("cube", 4, 3)]
    #[test_case("trajectory", 4, 3)]
    #[test_case("corridor", 4, 3)]
    #[test_case("locations", 4, 4)]
    #[test_case("instances", 3, 3)]
    fn table_shape(name: &str, parts: usize, steps: usize) {
        let rule = lookup(name).unwrap();
        assert_eq!(rule.parts.len(), parts);
        assert_eq!(rule.test_steps.len(), steps);
    }

    #[test]
    fn lookup_is_exact() {
        assert!(lookup("Items").is_none());
        assert!(lookup("radius").is_none());
    }

    #[test]
    fn collection_is_substituted_and_path_parameters_kept() {
        let rule = lookup("items").unwrap();
        let parts = rule.parts_for("water_gauge");
        assert_eq!(
            parts[4],
            "The service SHALL provide a /collections/water_gauge/items/{featureId} endpoint for individual items"
        );
        assert_eq!(rule.statement_for("water_gauge"), "water_gauge items query support");
        assert!(
            rule.steps_for("water_gauge")
                .iter()
                .all(|step| !step.contains("{collection}"))
        );
    }

    #[test]
    fn names_are_unique() {
        let names: std::collections::HashSet<_> = all().map(|rule| rule.name).collect();
        assert_eq!(names.len(), all().count());
    }
}
