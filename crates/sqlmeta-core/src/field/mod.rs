//! Field definitions.
//!
//! A field describes one logical attribute of a model: the physical column it
//! is stored in, its default, whether it is the primary key, and how values are
//! converted on the way in (`set`) and out (`get`). Field kinds are trait
//! objects so new kinds can be added without the registry or the query
//! builder knowing about them.

/// Implements the boilerplate `options`/`options_mut` pair for a field kind
/// whose settings live in an `options` member.
macro_rules! field_options {
    () => {
        fn options(&self) -> &$crate::field::FieldOptions {
            &self.options
        }

        fn options_mut(&mut self) -> &mut $crate::field::FieldOptions {
            &mut self.options
        }
    };
}

/// Builder methods every field kind exposes over its `options`.
macro_rules! option_setters {
    () => {
        /// Set the physical column name.
        pub fn column(mut self, column: impl Into<String>) -> Self {
            self.options.column = column.into();
            self
        }

        /// Set the default value.
        pub fn default(mut self, value: impl Into<$crate::value::Value>) -> Self {
            self.options.default = value.into();
            self
        }

        /// Set the primary-key flag.
        pub fn primary(mut self, value: bool) -> Self {
            self.options.primary = value;
            self
        }

        /// Set whether the field is stored in the table.
        pub fn in_db(mut self, value: bool) -> Self {
            self.options.in_db = value;
            self
        }
    };
}

pub(crate) use field_options;
pub(crate) use option_setters;

mod file;
mod integer;
mod primary;
mod text;

use std::fmt;

pub use file::File;
pub use integer::Integer;
pub use primary::Primary;
pub use text::Text;

use crate::error::Result;
use crate::model::Instance;
use crate::query::{LazyQuery, QueryBuilder};
use crate::registry::MetadataRegistry;
use crate::value::Value;

/// Settings shared by every field kind.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldOptions {
    /// Physical column. Empty until initialization derives it from the field name.
    pub column: String,
    /// Value used when the field is unset.
    pub default: Value,
    /// Whether this field is (part of) the primary key.
    pub primary: bool,
    /// Whether the field is stored in the model's table at all.
    pub in_db: bool,
    model: String,
    name: String,
}

impl Default for FieldOptions {
    fn default() -> Self {
        Self {
            column: String::new(),
            default: Value::Null,
            primary: false,
            in_db: true,
            model: String::new(),
            name: String::new(),
        }
    }
}

impl FieldOptions {
    /// Create options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Owning model name; empty before initialization.
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Logical field name; empty before initialization.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Record the owner and derive the column from the field name if unset.
    pub fn initialize(&mut self, model: &str, name: &str) {
        self.model = model.to_string();
        self.name = name.to_string();
        if self.column.is_empty() {
            self.column = name.to_string();
        }
    }
}

/// What reading a field produces.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// A plain stored value.
    Value(Value),
    /// A deferred query for the related record(s).
    Query(LazyQuery),
}

impl FieldValue {
    /// The plain value, if this is not a query.
    pub fn into_value(self) -> Option<Value> {
        match self {
            FieldValue::Value(v) => Some(v),
            FieldValue::Query(_) => None,
        }
    }

    /// The deferred query, if this is one.
    pub fn into_query(self) -> Option<LazyQuery> {
        match self {
            FieldValue::Query(q) => Some(q),
            FieldValue::Value(_) => None,
        }
    }
}

/// The capability every field kind implements.
pub trait Field: fmt::Debug + Send + Sync {
    /// Shared settings.
    fn options(&self) -> &FieldOptions;

    /// Shared settings, mutably. Only used before the owning model is frozen.
    fn options_mut(&mut self) -> &mut FieldOptions;

    /// Called once by the registry when the owning model registers.
    fn initialize(&mut self, model: &str, name: &str) {
        self.options_mut().initialize(model, name);
    }

    /// Convert an incoming value to its stored form. Must not touch storage.
    fn set(&self, value: Value) -> Value {
        value
    }

    /// Convert a record to the value stored for it; defaults to its identity.
    fn set_instance(&self, instance: &dyn Instance) -> Value {
        self.set(instance.id())
    }

    /// Convert a stored value to what readers see.
    fn get(&self, _registry: &MetadataRegistry, value: Value) -> FieldValue {
        FieldValue::Value(value)
    }

    /// Probe for the join capability.
    fn as_joinable(&self) -> Option<&dyn Joinable> {
        None
    }

    fn column(&self) -> &str {
        &self.options().column
    }

    fn default_value(&self) -> &Value {
        &self.options().default
    }

    fn is_primary(&self) -> bool {
        self.options().primary
    }

    fn name(&self) -> &str {
        self.options().name()
    }

    fn model(&self) -> &str {
        self.options().model()
    }
}

/// Fields that can add their own join clause to a query built for another model.
pub trait Joinable {
    /// Model the join reaches.
    fn target_model(&self) -> &str;

    /// Add the join for `relation` to `builder`.
    ///
    /// `target_path` is the alias the joined table gets; `parent_path` is the
    /// alias under which the owning model's table is already in the query.
    fn contribute_join(
        &self,
        builder: &mut dyn QueryBuilder,
        registry: &MetadataRegistry,
        relation: &str,
        target_path: &str,
        parent_path: &str,
    ) -> Result<()>;
}
