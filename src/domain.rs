//! Domain models for profile generation.
//!
//! This module contains the configuration describing a profile, the records
//! generated from it, and the naming scheme that ties them together.

/// Classes aggregating requirements and tests.
pub mod class;
pub use class::{ConformanceClass, RequirementsClass};

/// Collections and subscription filters.
pub mod collection;
pub use collection::{Collection, Filter};

/// Profile configuration, persistence and validation.
pub mod config;
pub use config::{Issue, ProfileConfig, ValidationError};

/// Identifier, URI and anchor naming scheme.
pub mod ident;
pub use ident::ProfileName;

/// Requirement and abstract test records.
pub mod requirement;
pub use requirement::{AbstractTest, Requirement};
