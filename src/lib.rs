//! OGC API - EDR profile generation
//!
//! A profile is described declaratively by a [`ProfileConfig`]: the
//! collections it exposes, the query types and output formats each supports,
//! and whether it offers pub/sub notifications. [`generate`] expands that
//! description into requirements, abstract tests, class cross-references and
//! API descriptions, and a [`ProfileDirectory`] writes them out as AsciiDoc
//! and YAML.

pub mod domain;
pub use domain::{AbstractTest, Collection, Filter, ProfileConfig, ProfileName, Requirement};

pub mod engine;
pub use engine::{ArtifactBundle, generate};

pub mod rules;

/// Filesystem storage of generated artifacts.
pub mod storage;
pub use storage::{Drift, ProfileDirectory};
