//! Requirement synthesis.
//!
//! Expands the collections of a profile against the rule tables into an
//! ordered list of requirements. The order is fixed:
//!
//! 1. `openapi`
//! 2. `collection-{name}` for each collection
//! 3. `data-query-{qt}-{name}` for each collection and query type
//! 4. `output-format-{name}` for each collection
//! 5. `asyncapi-{name}` for each collection, if the event API is included
//! 6. `filters`, if any filters are declared

use tracing::instrument;

use crate::{
    domain::{
        Collection, Filter, Requirement,
        ident::{FILTERS_ID, OPENAPI_ID, collection_id, event_api_id, format_id, query_id},
    },
    rules::{formats, query_types},
};

/// Synthesizes the requirements of a profile.
///
/// A query type missing from the rule table yields no requirement for that
/// collection; the omission is logged but not reported as an error.
#[must_use]
#[instrument(level = "debug", skip_all, fields(collections = collections.len()))]
pub fn synthesize_requirements(
    collections: &[Collection],
    include_event_api: bool,
    filters: &[Filter],
) -> Vec<Requirement> {
    let mut requirements = vec![openapi_requirement()];

    requirements.extend(collections.iter().map(collection_requirement));

    for collection in collections {
        for query_type in &collection.query_types {
            if let Some(requirement) = query_type_requirement(&collection.name, query_type) {
                requirements.push(requirement);
            } else {
                tracing::warn!(
                    collection = %collection.name,
                    query_type = %query_type,
                    "no requirement template for query type; skipping"
                );
            }
        }
    }

    requirements.extend(collections.iter().map(format_requirement));

    if include_event_api {
        requirements.extend(
            collections
                .iter()
                .map(|collection| event_api_requirement(&collection.name)),
        );
    }

    if !filters.is_empty() {
        requirements.push(filters_requirement(filters));
    }

    tracing::debug!("synthesized {} requirements", requirements.len());
    requirements
}

fn openapi_requirement() -> Requirement {
    Requirement::new(
        OPENAPI_ID,
        "OpenAPI specification",
        [
            "The service SHALL provide an OpenAPI 3.0 specification",
            "The OpenAPI SHALL document all collection endpoints",
            "The OpenAPI SHALL include GeoJSON schemas",
        ],
    )
}

fn collection_requirement(collection: &Collection) -> Requirement {
    let name = &collection.name;
    Requirement::new(
        collection_id(name),
        format!("{name} collection metadata"),
        [
            format!("The service SHALL provide a /collections/{name} endpoint"),
            "The endpoint SHALL return collection metadata including extent and available query types"
                .to_string(),
            "The response SHALL conform to OGC API - EDR collection schema".to_string(),
        ],
    )
}

/// The requirement for one query type of a collection, or `None` if the
/// query type is not registered.
#[must_use]
pub fn query_type_requirement(collection: &str, query_type: &str) -> Option<Requirement> {
    let rule = query_types::lookup(query_type)?;
    Some(Requirement::new(
        query_id(rule.name, collection),
        rule.statement_for(collection),
        rule.parts_for(collection),
    ))
}

/// The output format requirement of a collection.
///
/// Registered labels contribute their clauses; anything else contributes a
/// generic clause naming the label.
#[must_use]
pub fn format_requirement(collection: &Collection) -> Requirement {
    let name = &collection.name;
    let mut parts = vec![format!(
        "Collection {name} SHALL support the following formats:"
    )];
    for label in &collection.formats {
        parts.extend(formats::clauses_for(label));
    }
    Requirement::new(
        format_id(name),
        format!("Output format support for {name}"),
        parts,
    )
}

fn event_api_requirement(collection: &str) -> Requirement {
    Requirement::new(
        event_api_id(collection),
        format!("AsyncAPI specification and PubSub messaging for {collection}"),
        [
            "The service SHALL provide an AsyncAPI 3.0 specification".to_string(),
            format!("The AsyncAPI SHALL define {collection} notification channels"),
            "The service SHALL support AMQP protocol".to_string(),
            format!("The service SHALL publish messages to collections/{collection}/items/# channel"),
            "Messages SHALL conform to the AsyncAPI schema".to_string(),
        ],
    )
}

fn filters_requirement(filters: &[Filter]) -> Requirement {
    let names = filters
        .iter()
        .map(|filter| filter.name.as_str())
        .collect::<Vec<_>>()
        .join(", ");
    Requirement::new(
        FILTERS_ID,
        "Filter support",
        [
            "The service SHALL support subscription filters".to_string(),
            format!("The service SHALL support filtering by {names}"),
            "Filters SHALL be defined in x-ogc-subscription extension".to_string(),
        ],
    )
}
