//! SQLMeta Rust: lazy model metadata, field resolution and relationship joins.
//!
//! This is the facade crate. It re-exports the metadata layer
//! ([`sqlmeta_core`]) and the SELECT builder ([`sqlmeta_query`]), and owns the
//! optional process-wide registry.
//!
//! # Quick Start
//!
//! ```ignore
//! use sqlmeta::prelude::*;
//!
//! let classes = ClassTable::new();
//! classes.register_model("model_post", |meta: &mut MetaBuilder| {
//!     meta.field("id", Primary::new())
//!         .field("title", Text::new())
//!         .field("author", BelongsTo::new());
//! });
//! let registry = MetadataRegistry::new(classes);
//!
//! assert_eq!(registry.resolve_table("post"), "posts");
//! assert_eq!(registry.resolve_column_by_path("post.author", true), "posts.author_id");
//! ```

mod global;

pub use global::{global_registry, set_global_registry, set_global_shared_registry};

pub use sqlmeta_core::{
    BelongsTo, Class, ClassResolver, ClassTable, Condition, Error, Field, FieldEntry,
    FieldOptions, FieldValue, File, Instance, Integer, JoinType, Joinable, LazyQuery,
    MetaBuilder, MetadataRegistry, Model, ModelMetadata, ModelRef, Primary, QueryBuilder,
    RegistryConfig, Result, SortOrder, Text, Value, is_identifier,
};
pub use sqlmeta_query::{Join, Select};

/// Parse a [`RegistryConfig`] from JSON. Missing keys keep their defaults.
pub fn config_from_json(json: &str) -> Result<RegistryConfig> {
    serde_json::from_str(json)
        .map_err(|e| Error::Configuration(format!("invalid registry configuration: {}", e)))
}

/// Build a registry over `resolver` with configuration read from JSON.
pub fn registry_from_json(
    resolver: impl ClassResolver + 'static,
    json: &str,
) -> Result<MetadataRegistry> {
    let config = config_from_json(json)?;
    tracing::debug!(
        class_prefix = %config.class_prefix,
        default_db = %config.default_db,
        "Building registry from JSON configuration"
    );
    Ok(MetadataRegistry::with_config(resolver, config))
}

/// Everything a model definition and a query usually need.
pub mod prelude {
    pub use crate::{
        BelongsTo, ClassResolver, ClassTable, Error, Field, Instance, Integer, Joinable,
        MetaBuilder, MetadataRegistry, ModelRef, Primary, RegistryConfig, Result, Select,
        SortOrder, Text, Value,
    };
}
