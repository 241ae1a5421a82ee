//! Naming and identifier scheme shared by every generated artifact.
//!
//! Every id, local URI, anchor and schema name in a bundle is a pure function
//! of the profile name, a collection name and a key. Keeping the rules in one
//! place is what makes cross-document links resolve.

use std::{fmt, ops::Deref, str::FromStr, sync::LazyLock};

use non_empty_string::NonEmptyString;
use regex::Regex;

/// Base URI of the normative identifiers published by the profile.
pub const SPEC_BASE_URI: &str = "http://www.opengis.net/spec/ogcapi-edr-3/1.0";

/// Id of the fixed HTTP API description requirement.
pub const OPENAPI_ID: &str = "openapi";

/// Id of the subscription filter requirement.
pub const FILTERS_ID: &str = "filters";

/// Leading token of the per-collection event API requirements.
pub const EVENT_API_KEY: &str = "asyncapi";

/// Prefix shared by every query-type requirement id.
pub const QUERY_ID_PREFIX: &str = "data-query-";

static NAME_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_]+$").expect("name pattern is a valid regex"));

/// Returns `true` if `name` may be embedded verbatim in URI path segments,
/// identifiers and document anchors.
#[must_use]
pub fn is_valid_name(name: &str) -> bool {
    NAME_PATTERN.is_match(name)
}

/// The validated name of a profile.
///
/// Profile names are non-empty and contain only ASCII letters, digits and
/// underscores, e.g. `water_gauge`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct ProfileName(NonEmptyString);

impl ProfileName {
    /// Creates a new `ProfileName`.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidNameError`] if the string is empty or contains
    /// characters outside `[A-Za-z0-9_]`.
    pub fn new(s: String) -> Result<Self, InvalidNameError> {
        if !is_valid_name(&s) {
            return Err(InvalidNameError(s));
        }
        let non_empty = NonEmptyString::new(s).map_err(InvalidNameError)?;
        Ok(Self(non_empty))
    }

    /// Returns the string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Human-readable title derived from the name (`water_gauge` ->
    /// `Water Gauge`).
    #[must_use]
    pub fn title(&self) -> String {
        display_title(self.as_str())
    }

    /// Local URI of a requirement, e.g. `/req/water_gauge/openapi`.
    #[must_use]
    pub fn requirement_uri(&self, id: &str) -> String {
        format!("/req/{self}/{id}")
    }

    /// Local URI of an abstract test, e.g. `/conf/water_gauge/openapi`.
    #[must_use]
    pub fn test_uri(&self, id: &str) -> String {
        format!("/conf/{self}/{id}")
    }

    /// Global identifier of the profile's requirements class.
    #[must_use]
    pub fn requirements_class_uri(&self) -> String {
        format!("{SPEC_BASE_URI}/req/{self}")
    }

    /// Global identifier of the profile's conformance class.
    #[must_use]
    pub fn conformance_class_uri(&self) -> String {
        format!("{SPEC_BASE_URI}/conf/{self}")
    }

    /// Anchor of a requirement block.
    ///
    /// Only path separators are normalised; dashes in the id survive.
    #[must_use]
    pub fn requirement_anchor(&self, id: &str) -> String {
        format!("req_{self}_{id}").replace('/', "_")
    }

    /// Anchor of an abstract test block.
    ///
    /// Only path separators are normalised; dashes in the id survive.
    #[must_use]
    pub fn test_anchor(&self, id: &str) -> String {
        format!("ats_{self}_{id}").replace('/', "_")
    }

    /// Anchor of the requirements class block. Dashes become underscores.
    #[must_use]
    pub fn requirements_class_anchor(&self, class_name: &str) -> String {
        format!("req_class_{self}_{class_name}").replace('-', "_")
    }

    /// Anchor of the conformance class block.
    ///
    /// Dashes become underscores except the one joining the literal `class`
    /// token to what follows it: `ats_class-water_gauge_core`.
    #[must_use]
    pub fn conformance_class_anchor(&self, class_name: &str) -> String {
        format!("ats_class-{self}_{class_name}")
            .replace('-', "_")
            .replace("_class_", "_class-")
    }
}

impl TryFrom<String> for ProfileName {
    type Error = InvalidNameError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<&str> for ProfileName {
    type Error = InvalidNameError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value.to_string())
    }
}

impl From<ProfileName> for String {
    fn from(name: ProfileName) -> Self {
        name.0.as_str().to_owned()
    }
}

impl FromStr for ProfileName {
    type Err = InvalidNameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s.to_string())
    }
}

impl AsRef<str> for ProfileName {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl Deref for ProfileName {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        self.0.as_str()
    }
}

impl fmt::Display for ProfileName {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl serde::Serialize for ProfileName {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> serde::Deserialize<'de> for ProfileName {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::new(s).map_err(serde::de::Error::custom)
    }
}

/// Error returned when a profile or collection name is not `[A-Za-z0-9_]+`.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("Invalid name '{0}': must be non-empty and contain only letters, digits and underscores")]
pub struct InvalidNameError(String);

/// Replaces underscores with dashes, as used when a name is embedded in an id.
#[must_use]
pub fn dash_case(name: &str) -> String {
    name.replace('_', "-")
}

/// Reverses [`dash_case`].
#[must_use]
pub fn undash(id_segment: &str) -> String {
    id_segment.replace('-', "_")
}

/// Title-cases every word: the first letter after a non-letter is upper-cased
/// and the remaining letters lower-cased. Non-letters are copied unchanged.
#[must_use]
pub fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut after_letter = false;
    for c in s.chars() {
        if c.is_alphabetic() {
            if after_letter {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            after_letter = true;
        } else {
            out.push(c);
            after_letter = false;
        }
    }
    out
}

/// Title used in prose: underscores become spaces, then [`title_case`].
#[must_use]
pub fn display_title(name: &str) -> String {
    title_case(&name.replace('_', " "))
}

/// Name used for schema and operation keys (`water_gauge` -> `WaterGauge`).
#[must_use]
pub fn pascal_name(name: &str) -> String {
    title_case(name).replace('_', "")
}

/// Id of a collection metadata requirement.
#[must_use]
pub fn collection_id(collection: &str) -> String {
    format!("collection-{}", dash_case(collection))
}

/// Id of a query-type requirement.
#[must_use]
pub fn query_id(query_type: &str, collection: &str) -> String {
    format!("{QUERY_ID_PREFIX}{query_type}-{}", dash_case(collection))
}

/// Id of an output format requirement.
#[must_use]
pub fn format_id(collection: &str) -> String {
    format!("output-format-{}", dash_case(collection))
}

/// Id of an event API requirement.
#[must_use]
pub fn event_api_id(collection: &str) -> String {
    format!("{EVENT_API_KEY}-{}", dash_case(collection))
}

/// Recovers the collection name from a query-type requirement id.
///
/// Returns `None` unless `id` starts with `data-query-{query_type}-`.
#[must_use]
pub fn collection_from_query_id(id: &str, query_type: &str) -> Option<String> {
    id.strip_prefix(QUERY_ID_PREFIX)?
        .strip_prefix(query_type)?
        .strip_prefix('-')
        .map(undash)
}

/// Name of the event channel that carries a collection's notifications.
#[must_use]
pub fn channel_name(collection: &str) -> String {
    format!("{collection}_notifications")
}
