/// AsciiDoc rendering of records and classes.
pub mod asciidoc;
pub mod directory;
/// File layout of a profile directory.
pub mod layout;

pub use directory::{Artifact, Drift, ProfileDirectory, WriteError, render};
pub use layout::{ArtifactKind, ParseError, RecordPath, parse_record_path};
