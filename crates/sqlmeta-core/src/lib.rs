//! Core types and traits for SQLMeta Rust.
//!
//! `sqlmeta-core` is the **metadata layer** every query and every field goes through.
//! It maps logical model names to their physical storage schema and answers name,
//! field and column questions for the rest of the system.
//!
//! # Role In The Architecture
//!
//! - **Registry**: [`MetadataRegistry`] lazily registers a model the first time it is
//!   asked about, runs the model's schema hook exactly once, and serves the frozen
//!   [`ModelMetadata`] from cache afterwards.
//! - **Field protocol**: [`Field`] is the capability every field kind implements
//!   (`initialize`, `set`, `get`); [`Joinable`] is the optional capability a query
//!   builder probes for when it needs a field to contribute a join.
//! - **Collaborator seams**: [`ClassResolver`] locates model definitions,
//!   [`QueryBuilder`] receives join clauses, [`Instance`] exposes a record's identity.
//!
//! # Who Uses This Crate
//!
//! - `sqlmeta-query` consumes the registry and the `Joinable` capability to build SELECTs.
//! - `sqlmeta` re-exports everything here and owns the process-wide default registry.

pub mod config;
pub mod error;
pub mod field;
pub mod identifiers;
pub mod meta;
pub mod model;
pub mod query;
pub mod registry;
pub mod relationship;
pub mod value;

pub use config::RegistryConfig;
pub use error::{Error, Result};
pub use field::{Field, FieldOptions, FieldValue, File, Integer, Joinable, Primary, Text};
pub use identifiers::is_identifier;
pub use meta::{FieldEntry, MetaBuilder, ModelMetadata, SortOrder};
pub use model::{Class, ClassResolver, ClassTable, Instance, Model, ModelRef};
pub use query::{Condition, JoinType, LazyQuery, QueryBuilder};
pub use registry::MetadataRegistry;
pub use relationship::BelongsTo;
pub use value::Value;
