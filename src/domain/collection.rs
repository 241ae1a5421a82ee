use serde::{Deserialize, Serialize};

/// A named dataset exposed by the profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Collection {
    /// The collection name.
    ///
    /// Embedded verbatim in URI path segments and anchors, and dash-cased in
    /// requirement ids.
    pub name: String,

    /// Query types supported by the collection (e.g. `items`, `position`).
    ///
    /// Order is significant and duplicates are kept.
    pub query_types: Vec<String>,

    /// Output format labels (e.g. `GeoJSON`, `CoverageJSON`).
    pub formats: Vec<String>,
}

impl Collection {
    /// Creates a collection from its name, query types and formats.
    #[must_use]
    pub fn new<N, Q, F>(name: N, query_types: Q, formats: F) -> Self
    where
        N: Into<String>,
        Q: IntoIterator,
        Q::Item: Into<String>,
        F: IntoIterator,
        F::Item: Into<String>,
    {
        Self {
            name: name.into(),
            query_types: query_types.into_iter().map(Into::into).collect(),
            formats: formats.into_iter().map(Into::into).collect(),
        }
    }

    /// Returns `true` if the collection declares the given query type.
    #[must_use]
    pub fn supports(&self, query_type: &str) -> bool {
        self.query_types.iter().any(|qt| qt == query_type)
    }
}

/// A pub/sub subscription filter, published in the event API description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Filter {
    /// The filter parameter name.
    pub name: String,
    /// Free-text description of the filter.
    pub description: String,
    /// JSON schema type of the filter value (`string`, `array`, `number`).
    #[serde(rename = "type")]
    pub kind: String,
}

impl Filter {
    /// Creates a filter.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        kind: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            kind: kind.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filter_type_is_serialized_as_type() {
        let filter = Filter::new("station_id", "Station identifier", "string");
        let yaml = serde_yaml::to_string(&filter).unwrap();
        assert!(yaml.contains("type: string"));

        let parsed: Filter = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(parsed, filter);
    }

    #[test]
    fn duplicate_query_types_are_kept() {
        let collection = Collection::new("gauge", ["items", "items"], ["GeoJSON"]);
        assert_eq!(collection.query_types, vec!["items", "items"]);
        assert!(collection.supports("items"));
        assert!(!collection.supports("cube"));
    }
}
