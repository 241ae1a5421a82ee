use borsh::BorshSerialize;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// A normative statement with sub-parts that an implementation must satisfy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, BorshSerialize)]
pub struct Requirement {
    /// Profile-local id, e.g. `data-query-items-water-gauge`.
    pub id: String,
    /// The requirement statement.
    pub statement: String,
    /// Ordered parts of the requirement.
    pub parts: Vec<String>,
}

impl Requirement {
    /// Creates a requirement.
    #[must_use]
    pub fn new<P>(id: impl Into<String>, statement: impl Into<String>, parts: P) -> Self
    where
        P: IntoIterator,
        P::Item: Into<String>,
    {
        Self {
            id: id.into(),
            statement: statement.into(),
            parts: parts.into_iter().map(Into::into).collect(),
        }
    }
}

/// A procedure that validates exactly one requirement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, BorshSerialize)]
pub struct AbstractTest {
    /// Test id. Always equal to [`Self::target_requirement_id`] for generated
    /// tests.
    pub id: String,
    /// Id of the requirement under test.
    #[serde(alias = "req_id")]
    pub target_requirement_id: String,
    /// Ordered test steps.
    pub steps: Vec<String>,
}

impl AbstractTest {
    /// Creates the test paired with the given requirement id.
    #[must_use]
    pub fn for_requirement<S>(requirement_id: &str, steps: S) -> Self
    where
        S: IntoIterator,
        S::Item: Into<String>,
    {
        Self {
            id: requirement_id.to_string(),
            target_requirement_id: requirement_id.to_string(),
            steps: steps.into_iter().map(Into::into).collect(),
        }
    }

    /// The test purpose line: `Validate that openapi requirement is correctly
    /// implemented.`
    #[must_use]
    pub fn purpose(&self) -> String {
        format!(
            "Validate that {} requirement is correctly implemented.",
            self.id.replace('-', " ")
        )
    }
}

/// Calculate the fingerprint of a requirement/test set.
///
/// The fingerprint is a SHA256 hash of the Borsh-serialized requirements and
/// tests, in order. Two bundles with equal fingerprints render identical
/// requirement and test artifacts.
///
/// # Panics
///
/// Panics if borsh serialization fails (which should never happen for this
/// data structure).
#[must_use]
pub fn fingerprint(requirements: &[Requirement], tests: &[AbstractTest]) -> String {
    #[derive(BorshSerialize)]
    struct FingerprintData<'a> {
        requirements: &'a [Requirement],
        tests: &'a [AbstractTest],
    }

    let data = FingerprintData {
        requirements,
        tests,
    };

    let encoded = borsh::to_vec(&data).expect("this should never fail");
    let hash = Sha256::digest(encoded);
    format!("{hash:x}")
}
