//! Static rule tables the engine expands configurations against.
//!
//! Both tables are immutable. Consumers decide what to do when a key is
//! missing; see the call sites in [`crate::engine`].

pub mod formats;
pub mod query_types;

pub use formats::FormatRule;
pub use query_types::QueryTypeRule;
