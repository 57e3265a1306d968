//! Model metadata.
//!
//! A model's schema hook fills in a [`MetaBuilder`]; the registry then runs the
//! freeze pass ([`MetaBuilder::freeze`]) which initializes every field, splits
//! aliases out of the field map, snapshots defaults and builds the reverse
//! column index. The result, [`ModelMetadata`], is immutable and shared.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::config::RegistryConfig;
use crate::error::{Error, Result};
use crate::field::Field;
use crate::identifiers::is_identifier;
use crate::value::Value;

/// Sort direction for a model's default ordering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    pub const fn as_sql(&self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

/// One declared entry in a model's field list.
pub enum FieldEntry {
    /// A real field.
    Field(Box<dyn Field>),
    /// An alternate name for the named field.
    Alias(String),
}

impl fmt::Debug for FieldEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldEntry::Field(field) => f.debug_tuple("Field").field(field).finish(),
            FieldEntry::Alias(target) => f.debug_tuple("Alias").field(target).finish(),
        }
    }
}

impl<F: Field + 'static> From<F> for FieldEntry {
    fn from(field: F) -> Self {
        FieldEntry::Field(Box::new(field))
    }
}

impl From<&str> for FieldEntry {
    fn from(target: &str) -> Self {
        FieldEntry::Alias(target.to_string())
    }
}

/// Working metadata handed to a model's schema hook.
///
/// Fields keep their declaration order; the first one flagged primary becomes
/// the primary key unless the hook names one explicitly.
#[derive(Debug)]
pub struct MetaBuilder {
    model: String,
    table: String,
    db: String,
    primary_key: String,
    name_key: String,
    sorting: Vec<(String, SortOrder)>,
    load_with: Vec<String>,
    validate_on_save: bool,
    input_prefix: String,
    fields: IndexMap<String, FieldEntry>,
}

impl MetaBuilder {
    /// Start metadata for `model` using the registry's naming conventions.
    pub fn new(model: &str, config: &RegistryConfig) -> Self {
        let table = if config.pluralize_tables {
            pluralizer::pluralize(model, 2, false)
        } else {
            model.to_string()
        };

        Self {
            model: model.to_string(),
            table,
            db: config.default_db.clone(),
            primary_key: String::new(),
            name_key: "name".to_string(),
            sorting: Vec::new(),
            load_with: Vec::new(),
            validate_on_save: true,
            input_prefix: "field".to_string(),
            fields: IndexMap::new(),
        }
    }

    /// Model being declared.
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Current table name (defaults to the pluralized model name).
    pub fn table_name(&self) -> &str {
        &self.table
    }

    /// Set the table name.
    pub fn table(&mut self, table: impl Into<String>) -> &mut Self {
        self.table = table.into();
        self
    }

    /// Set the connection identifier.
    pub fn db(&mut self, db: impl Into<String>) -> &mut Self {
        self.db = db.into();
        self
    }

    /// Name the primary key explicitly instead of taking the first primary field.
    pub fn primary_key(&mut self, field: impl Into<String>) -> &mut Self {
        self.primary_key = field.into();
        self
    }

    /// Set the field used as the record's display name.
    pub fn name_key(&mut self, field: impl Into<String>) -> &mut Self {
        self.name_key = field.into();
        self
    }

    /// Append a default ordering term.
    pub fn sort(&mut self, field: impl Into<String>, order: SortOrder) -> &mut Self {
        self.sorting.push((field.into(), order));
        self
    }

    /// Join `relation` on every select of this model.
    pub fn load_with(&mut self, relation: impl Into<String>) -> &mut Self {
        self.load_with.push(relation.into());
        self
    }

    /// Enable/disable validation before save.
    pub fn validate_on_save(&mut self, value: bool) -> &mut Self {
        self.validate_on_save = value;
        self
    }

    /// Set the prefix used when generating form inputs.
    pub fn input_prefix(&mut self, prefix: impl Into<String>) -> &mut Self {
        self.input_prefix = prefix.into();
        self
    }

    /// Declare a field, or an alias when given a `&str` naming another field.
    ///
    /// Redeclaring a name replaces the earlier entry but keeps its position.
    pub fn field(&mut self, name: impl Into<String>, entry: impl Into<FieldEntry>) -> &mut Self {
        self.fields.insert(name.into(), entry.into());
        self
    }

    /// Declare `alias` as another name for `target`.
    pub fn alias(&mut self, alias: impl Into<String>, target: impl Into<String>) -> &mut Self {
        self.fields.insert(alias.into(), FieldEntry::Alias(target.into()));
        self
    }

    /// Run the freeze pass and produce the immutable metadata.
    ///
    /// Walks the declared entries in order: aliases are moved to the alias map,
    /// every real field is initialized with its owner and name, its default is
    /// snapshotted, its column is indexed, and the first primary field becomes
    /// the primary key if none was named. Aliases must point at a real field.
    pub fn freeze(self) -> Result<ModelMetadata> {
        let MetaBuilder {
            model,
            table,
            db,
            mut primary_key,
            name_key,
            sorting,
            load_with,
            validate_on_save,
            input_prefix,
            fields: declared,
        } = self;

        let mut fields: IndexMap<String, Arc<dyn Field>> = IndexMap::with_capacity(declared.len());
        let mut pending_aliases = Vec::new();
        let mut columns: IndexMap<String, Vec<String>> = IndexMap::new();
        let mut defaults = IndexMap::new();

        for (name, entry) in declared {
            if !is_identifier(&name) {
                return Err(Error::invalid_entry(&model, &name, "not a valid identifier"));
            }

            let mut field = match entry {
                FieldEntry::Alias(target) => {
                    pending_aliases.push((name, target));
                    continue;
                }
                FieldEntry::Field(field) => field,
            };

            field.initialize(&model, &name);

            if field.is_primary() && primary_key.is_empty() {
                primary_key.clone_from(&name);
            }

            defaults.insert(name.clone(), field.default_value().clone());
            columns
                .entry(field.column().to_string())
                .or_default()
                .push(name.clone());
            fields.insert(name, Arc::from(field));
        }

        let alias_names: Vec<String> = pending_aliases.iter().map(|(a, _)| a.clone()).collect();
        let mut aliases = HashMap::with_capacity(pending_aliases.len());
        for (alias, target) in pending_aliases {
            if !fields.contains_key(&target) {
                let reason = if alias_names.contains(&target) {
                    format!("alias target `{}` is itself an alias", target)
                } else {
                    format!("alias target `{}` is not a field", target)
                };
                return Err(Error::invalid_entry(&model, &alias, reason));
            }
            aliases.insert(alias, target);
        }

        Ok(ModelMetadata {
            model,
            table,
            db,
            primary_key,
            name_key,
            sorting,
            load_with,
            validate_on_save,
            input_prefix,
            fields,
            aliases,
            columns,
            defaults,
        })
    }
}

/// The frozen description of one model's schema.
pub struct ModelMetadata {
    model: String,
    table: String,
    db: String,
    primary_key: String,
    name_key: String,
    sorting: Vec<(String, SortOrder)>,
    load_with: Vec<String>,
    validate_on_save: bool,
    input_prefix: String,
    fields: IndexMap<String, Arc<dyn Field>>,
    aliases: HashMap<String, String>,
    columns: IndexMap<String, Vec<String>>,
    defaults: IndexMap<String, Value>,
}

impl ModelMetadata {
    /// Canonical (lowercase, unprefixed) model name.
    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    /// Connection identifier.
    pub fn db(&self) -> &str {
        &self.db
    }

    /// Primary-key field name; empty when no field is primary.
    pub fn primary_key(&self) -> &str {
        &self.primary_key
    }

    pub fn name_key(&self) -> &str {
        &self.name_key
    }

    pub fn sorting(&self) -> &[(String, SortOrder)] {
        &self.sorting
    }

    pub fn load_with(&self) -> &[String] {
        &self.load_with
    }

    pub fn validate_on_save(&self) -> bool {
        self.validate_on_save
    }

    pub fn input_prefix(&self) -> &str {
        &self.input_prefix
    }

    /// Real fields in declaration order.
    pub fn fields(&self) -> &IndexMap<String, Arc<dyn Field>> {
        &self.fields
    }

    /// Alias name to field name.
    pub fn aliases(&self) -> &HashMap<String, String> {
        &self.aliases
    }

    /// Physical column to the fields stored in it.
    pub fn columns(&self) -> &IndexMap<String, Vec<String>> {
        &self.columns
    }

    /// Defaults as they were at registration.
    pub fn defaults(&self) -> &IndexMap<String, Value> {
        &self.defaults
    }

    /// Resolve `name` (field or alias) to the real field name.
    pub fn field_name<'a>(&'a self, name: &'a str) -> Option<&'a str> {
        let name = self.aliases.get(name).map_or(name, String::as_str);
        self.fields.get_key_value(name).map(|(key, _)| key.as_str())
    }

    /// Resolve `name` (field or alias) to its field.
    pub fn field(&self, name: &str) -> Option<&Arc<dyn Field>> {
        let name = self.aliases.get(name).map_or(name, String::as_str);
        self.fields.get(name)
    }

    /// Fields stored in `column`.
    pub fn fields_for_column(&self, column: &str) -> &[String] {
        self.columns.get(column).map(Vec::as_slice).unwrap_or_default()
    }

    /// Snapshotted default of `name` (field or alias).
    pub fn default_for(&self, name: &str) -> Option<&Value> {
        self.field_name(name).and_then(|name| self.defaults.get(name))
    }
}

impl fmt::Debug for ModelMetadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelMetadata")
            .field("model", &self.model)
            .field("table", &self.table)
            .field("db", &self.db)
            .field("primary_key", &self.primary_key)
            .field("fields", &self.fields.keys().collect::<Vec<_>>())
            .field("aliases", &self.aliases)
            .finish_non_exhaustive()
    }
}
