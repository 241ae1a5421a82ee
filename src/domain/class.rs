use serde::Serialize;

/// Aggregates every requirement of a profile under one addressable identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RequirementsClass {
    /// Local class name, e.g. `core`.
    pub name: String,
    /// Global identifier of the class.
    pub identifier: String,
    /// The kind of standard the class targets, e.g. `Water Gauge Profile
    /// Standard`.
    pub target_type: String,
    /// Anchor id of the class block.
    pub anchor: String,
    /// Requirement ids in generation order.
    pub member_ids: Vec<String>,
}

/// Aggregates every abstract test of a profile under one addressable
/// identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConformanceClass {
    /// Local class name, e.g. `core`.
    pub name: String,
    /// Global identifier of the class.
    pub identifier: String,
    /// Identifier of the requirements class under test.
    pub target_class: String,
    /// Anchor id of the class block.
    pub anchor: String,
    /// Test ids in generation order.
    pub member_ids: Vec<String>,
}
