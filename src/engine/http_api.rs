//! HTTP API (OpenAPI 3.0) description synthesis.
//!
//! Derived from the configuration alone. Formats are descriptive metadata and
//! play no part here.

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::{Map, Value, json};
use tracing::instrument;

use crate::domain::{
    Collection, ProfileName,
    ident::{channel_name, pascal_name},
};

/// Version of the OpenAPI document format emitted.
pub const OPENAPI_VERSION: &str = "3.0.3";

/// An OpenAPI document describing the profile's HTTP API.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApiDescription {
    /// OpenAPI document format version.
    pub openapi: String,
    /// Document metadata.
    pub info: Info,
    /// Servers hosting the API.
    pub servers: Vec<Server>,
    /// Path items keyed by path template, in generation order.
    pub paths: IndexMap<String, PathItem>,
    /// Reusable components.
    pub components: Components,
}

/// Document metadata shared by the HTTP and event API descriptions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Info {
    /// Document title.
    pub title: String,
    /// Version of the described API.
    pub version: String,
    /// Free-text description.
    pub description: String,
}

/// A server hosting the HTTP API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Server {
    /// Base URL.
    pub url: String,
    /// Free-text description.
    pub description: String,
}

/// The operations available on one path. Only `GET` is described.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PathItem {
    /// The `GET` operation.
    pub get: Operation,
}

/// A single API operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Operation {
    /// One-line summary.
    pub summary: String,
    /// Parameters, omitted from the document when empty.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<Parameter>,
    /// Responses keyed by status code.
    pub responses: IndexMap<String, Response>,
}

/// An operation parameter. Every parameter is string-typed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Parameter {
    /// Parameter name.
    pub name: String,
    /// Where the parameter appears.
    #[serde(rename = "in")]
    pub location: ParameterLocation,
    /// Whether the parameter is mandatory; omitted from the document when
    /// `false`.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub required: bool,
    /// Parameter value schema.
    pub schema: TypeSchema,
}

impl Parameter {
    fn query(name: &str) -> Self {
        Self {
            name: name.to_string(),
            location: ParameterLocation::Query,
            required: false,
            schema: TypeSchema::string(),
        }
    }

    fn required_query(name: &str) -> Self {
        Self {
            required: true,
            ..Self::query(name)
        }
    }

    fn path(name: &str) -> Self {
        Self {
            name: name.to_string(),
            location: ParameterLocation::Path,
            required: true,
            schema: TypeSchema::string(),
        }
    }
}

/// Location of a parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterLocation {
    /// Query string parameter.
    Query,
    /// Path template parameter.
    Path,
}

/// A schema consisting of a single `type` keyword.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TypeSchema {
    /// JSON schema type name.
    #[serde(rename = "type")]
    pub kind: String,
}

impl TypeSchema {
    /// The `string` schema.
    #[must_use]
    pub fn string() -> Self {
        Self {
            kind: "string".to_string(),
        }
    }
}

/// A response description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Response {
    /// Free-text description.
    pub description: String,
}

/// Reusable document components.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Components {
    /// JSON schemas keyed by name.
    pub schemas: IndexMap<String, Value>,
}

/// Synthesizes the HTTP API description of a profile.
///
/// For each collection a metadata path is always emitted, then per query
/// type:
///
/// - `items`: a list path accepting `datetime` and `bbox`, and a
///   single-feature path keyed by `featureId`;
/// - `locations`: a list path and a by-location path keyed by `locationId`
///   accepting `datetime`;
/// - anything else: `/collections/{name}/{query_type}` requiring `coords` and
///   accepting `datetime`.
///
/// Each collection gets one feature schema with a string field per global
/// property.
#[must_use]
#[instrument(level = "debug", skip_all, fields(profile = %profile))]
pub fn synthesize_http_api(
    profile: &ProfileName,
    collections: &[Collection],
    properties: &[String],
    include_event_api: bool,
) -> ApiDescription {
    let mut paths = IndexMap::new();
    let mut schemas = IndexMap::new();

    for collection in collections {
        let name = &collection.name;

        paths.insert(
            format!("/collections/{name}"),
            path_item(
                format!("Get {name} metadata"),
                Vec::new(),
                "Collection metadata",
            ),
        );

        for query_type in &collection.query_types {
            add_query_paths(&mut paths, name, query_type);
        }

        schemas.insert(
            format!("{}Feature", pascal_name(name)),
            feature_schema(profile, name, properties, include_event_api),
        );
    }

    tracing::debug!(
        "described {} paths and {} schemas",
        paths.len(),
        schemas.len()
    );

    let title = profile.title();
    ApiDescription {
        openapi: OPENAPI_VERSION.to_string(),
        info: Info {
            title: format!("{title} Profile API"),
            version: "1.0.0".to_string(),
            description: format!("OGC API - EDR {title} Profile"),
        },
        servers: vec![Server {
            url: "http://localhost:5000".to_string(),
            description: "Development server".to_string(),
        }],
        paths,
        components: Components { schemas },
    }
}

fn add_query_paths(paths: &mut IndexMap<String, PathItem>, name: &str, query_type: &str) {
    match query_type {
        "items" => {
            paths.insert(
                format!("/collections/{name}/items"),
                path_item(
                    format!("Query {name} items"),
                    vec![Parameter::query("datetime"), Parameter::query("bbox")],
                    "GeoJSON FeatureCollection",
                ),
            );
            paths.insert(
                format!("/collections/{name}/items/{{featureId}}"),
                path_item(
                    format!("Get specific {name} item"),
                    vec![Parameter::path("featureId")],
                    "GeoJSON Feature",
                ),
            );
        }
        "locations" => {
            paths.insert(
                format!("/collections/{name}/locations"),
                path_item(
                    format!("Get available locations for {name}"),
                    Vec::new(),
                    "GeoJSON FeatureCollection of available locations",
                ),
            );
            paths.insert(
                format!("/collections/{name}/locations/{{locationId}}"),
                path_item(
                    format!("Query {name} data by location"),
                    vec![Parameter::path("locationId"), Parameter::query("datetime")],
                    "Query results",
                ),
            );
        }
        other => {
            paths.insert(
                format!("/collections/{name}/{other}"),
                path_item(
                    format!("Query {name} by {other}"),
                    vec![
                        Parameter::required_query("coords"),
                        Parameter::query("datetime"),
                    ],
                    "Query results",
                ),
            );
        }
    }
}

fn path_item(summary: String, parameters: Vec<Parameter>, description: &str) -> PathItem {
    let mut responses = IndexMap::new();
    responses.insert(
        "200".to_string(),
        Response {
            description: description.to_string(),
        },
    );
    PathItem {
        get: Operation {
            summary,
            parameters,
            responses,
        },
    }
}

fn feature_schema(
    profile: &ProfileName,
    collection: &str,
    properties: &[String],
    include_event_api: bool,
) -> Value {
    let fields: Map<String, Value> = properties
        .iter()
        .map(|property| (property.clone(), json!({ "type": "string" })))
        .collect();

    let mut schema = json!({
        "type": "object",
        "properties": {
            "type": { "type": "string", "const": "Feature" },
            "properties": {
                "type": "object",
                "properties": fields,
            },
        },
    });

    if include_event_api {
        if let Value::Object(object) = &mut schema {
            object.insert(
                format!("x-ogc-edr-{profile}-pubsub"),
                json!({
                    "asyncapi": "/asyncapi.yaml",
                    "channel": channel_name(collection),
                }),
            );
        }
    }

    schema
}
