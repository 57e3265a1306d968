//! Many-to-one relationships.
//!
//! A [`BelongsTo`] field stores the foreign model's key in a local column and
//! knows how to join the foreign table into a query built for the owning model.
//! It never loads anything itself: reading it yields a [`LazyQuery`] for an
//! executor to run.

use crate::error::Result;
use crate::field::{Field, FieldOptions, FieldValue, Joinable, field_options, option_setters};
use crate::query::{JoinType, LazyQuery, QueryBuilder};
use crate::registry::MetadataRegistry;
use crate::value::Value;

/// Suffix appended to the foreign model name to form the local column.
const FOREIGN_KEY_SUFFIX: &str = "_id";

/// A reference from the owning model to one record of a foreign model.
///
/// Unset parts are derived when the owning model registers:
///
/// - the foreign model defaults to the field name (`author` → model `author`);
/// - the local column defaults to the foreign model plus `_id` (`author_id`);
/// - the foreign column defaults to the foreign model's primary key, looked up
///   when needed, or the registry's primary-key convention while the foreign
///   model cannot be resolved.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BelongsTo {
    options: FieldOptions,
    foreign_model: String,
    foreign_column: Option<String>,
}

impl BelongsTo {
    /// Create a relationship with every part derived from the field name.
    pub fn new() -> Self {
        Default::default()
    }

    /// Set the foreign model.
    pub fn foreign(mut self, model: impl Into<String>) -> Self {
        self.foreign_model = model.into();
        self
    }

    /// Set the foreign field (or alias) the local column refers to.
    pub fn foreign_column(mut self, column: impl Into<String>) -> Self {
        self.foreign_column = Some(column.into());
        self
    }

    option_setters!();

    /// Foreign model name; empty before initialization unless set explicitly.
    pub fn foreign_model(&self) -> &str {
        &self.foreign_model
    }

    /// Foreign field the local column refers to.
    pub fn target_field(&self, registry: &MetadataRegistry) -> String {
        if let Some(column) = &self.foreign_column {
            return column.clone();
        }
        match registry.resolve(self.foreign_model.as_str()) {
            Ok(meta) if !meta.primary_key().is_empty() => meta.primary_key().to_string(),
            _ => registry.config().primary_key_convention.clone(),
        }
    }
}

impl Field for BelongsTo {
    field_options!();

    fn initialize(&mut self, model: &str, name: &str) {
        if self.foreign_model.is_empty() {
            self.foreign_model = name.to_string();
        }
        if self.options.column.is_empty() {
            self.options.column = format!("{}{}", self.foreign_model, FOREIGN_KEY_SUFFIX);
        }
        self.options.initialize(model, name);
    }

    /// Numeric keys become integers, anything else text.
    fn set(&self, value: Value) -> Value {
        value.to_key()
    }

    /// A single-record query over the foreign model, keyed by `value`.
    fn get(&self, registry: &MetadataRegistry, value: Value) -> FieldValue {
        let query = LazyQuery::new(self.foreign_model.clone())
            .limit(1, true)
            .filter(self.target_field(registry), "=", value);
        FieldValue::Query(query)
    }

    fn as_joinable(&self) -> Option<&dyn Joinable> {
        Some(self)
    }
}

impl Joinable for BelongsTo {
    fn target_model(&self) -> &str {
        &self.foreign_model
    }

    fn contribute_join(
        &self,
        builder: &mut dyn QueryBuilder,
        registry: &MetadataRegistry,
        relation: &str,
        target_path: &str,
        parent_path: &str,
    ) -> Result<()> {
        let meta = registry.resolve(self.foreign_model.as_str())?;

        // The target may be an alias or a renamed column of the foreign model.
        let target_column = registry.resolve_column_by_parts(
            self.foreign_model.as_str(),
            &self.target_field(registry),
            false,
        );
        let parent_column = Field::column(self);

        tracing::trace!(
            relation = relation,
            table = meta.table(),
            target = %format_args!("{}.{}", target_path, target_column),
            parent = %format_args!("{}.{}", parent_path, parent_column),
            "Contributing belongs-to join"
        );

        builder.join(meta.table(), target_path, JoinType::Left);
        builder.on(
            &format!("{}.{}", target_path, target_column),
            "=",
            &format!("{}.{}", parent_path, parent_column),
        );
        Ok(())
    }
}
