//! SELECT building on top of the SQLMeta metadata registry.
//!
//! `sqlmeta-query` is the **consumer side** of the metadata layer: it accepts
//! logical model and field names, resolves them through
//! [`MetadataRegistry`](sqlmeta_core::MetadataRegistry), and joins relations by
//! probing fields for the [`Joinable`](sqlmeta_core::Joinable) capability.
//! It produces SQL text plus positional parameters and never talks to a database.

pub mod select;

pub use select::{Join, PATH_SEPARATOR, Select};
