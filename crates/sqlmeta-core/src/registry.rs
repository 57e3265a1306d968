//! The model metadata registry.
//!
//! Maps model names to their frozen [`ModelMetadata`], registering each model
//! lazily on first use, and answers every field, column and table question the
//! rest of the system asks.
//!
//! # Registration
//!
//! Registration of a given name happens at most once per registry. Each model
//! name owns its own compute-once slot; the registry-wide map lock is only held
//! long enough to fetch or insert a slot, never while a schema hook runs. A
//! caller arriving while another is registering the same model blocks on that
//! slot and receives the same `Arc`, and unrelated models register in parallel.
//!
//! # Passthrough
//!
//! [`resolve_column_by_parts`](MetadataRegistry::resolve_column_by_parts),
//! [`resolve_column_by_path`](MetadataRegistry::resolve_column_by_path) and
//! [`resolve_table`](MetadataRegistry::resolve_table) never fail. Anything they
//! cannot map to known metadata is returned as given, so callers can mix real
//! models with raw table and column names.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, OnceLock, PoisonError, RwLock};

use crate::config::RegistryConfig;
use crate::error::{Error, Result};
use crate::field::Field;
use crate::meta::{MetaBuilder, ModelMetadata};
use crate::model::{Class, ClassResolver, Model, ModelRef};

/// Compute-once cell for one model name. A failed freeze pass is kept too:
/// schema hooks are deterministic, so running one again cannot succeed.
type Slot = Arc<OnceLock<Result<Arc<ModelMetadata>>>>;

/// Process-wide cache of model metadata.
pub struct MetadataRegistry {
    resolver: Box<dyn ClassResolver>,
    config: RegistryConfig,
    models: RwLock<HashMap<String, Slot>>,
}

impl MetadataRegistry {
    /// Create a registry with default naming conventions.
    pub fn new(resolver: impl ClassResolver + 'static) -> Self {
        Self::with_config(resolver, RegistryConfig::default())
    }

    /// Create a registry with explicit configuration.
    pub fn with_config(resolver: impl ClassResolver + 'static, config: RegistryConfig) -> Self {
        Self {
            resolver: Box::new(resolver),
            config,
            models: RwLock::new(HashMap::new()),
        }
    }

    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// Canonical model name: lowercase, class prefix stripped.
    ///
    /// `"Model_Post"`, `"model_post"` and `"post"` all name model `post`.
    pub fn model_name<'a>(&self, model: impl Into<ModelRef<'a>>) -> String {
        let raw = model.into().as_str();
        let prefix = self.config.class_prefix.as_str();
        let name = match raw.get(..prefix.len()) {
            Some(head) if !prefix.is_empty() && head.eq_ignore_ascii_case(prefix) => {
                &raw[prefix.len()..]
            }
            _ => raw,
        };
        name.to_lowercase()
    }

    /// Class name the resolver is asked for: prefix plus model name, lowercase.
    pub fn class_name<'a>(&self, model: impl Into<ModelRef<'a>>) -> String {
        format!(
            "{}{}",
            self.config.class_prefix.to_lowercase(),
            self.model_name(model)
        )
    }

    /// Metadata for `model`, registering it on first use.
    ///
    /// Fails with [`Error::ModelNotFound`] when no class exists for the name or
    /// the class is not a model, and with [`Error::InvalidFieldEntry`] when the
    /// model's schema declaration is malformed.
    pub fn resolve<'a>(&self, model: impl Into<ModelRef<'a>>) -> Result<Arc<ModelMetadata>> {
        let model = model.into();
        let name = self.model_name(model);

        if let Some(cached) = self.cached(&name) {
            tracing::trace!(model = %name, "Metadata cache hit");
            return cached;
        }

        let class_name = self.class_name(model);
        let definition = match self.resolver.find(&class_name) {
            Some(Class::Model(definition)) => definition,
            Some(Class::Other(kind)) => {
                tracing::warn!(
                    model = %name,
                    class = %class_name,
                    kind = %kind,
                    "Class exists but is not a model, refusing to register"
                );
                return Err(Error::ModelNotFound { model: name });
            }
            None => return Err(Error::ModelNotFound { model: name }),
        };

        let slot = self.slot(&name);
        slot.get_or_init(|| self.register(&name, definition.as_ref()).map(Arc::new))
            .clone()
    }

    /// Field `field` (or the field it aliases) of `model`.
    ///
    /// `Err(ModelNotFound)` when the model does not resolve, `Ok(None)` when the
    /// model resolves but has no such field or alias.
    pub fn resolve_field<'a>(
        &self,
        model: impl Into<ModelRef<'a>>,
        field: &str,
    ) -> Result<Option<Arc<dyn Field>>> {
        Ok(self.resolve(model)?.field(field).cloned())
    }

    /// Real field name behind `field`, following an alias if it is one.
    pub fn resolve_field_name<'a>(
        &self,
        model: impl Into<ModelRef<'a>>,
        field: &str,
    ) -> Result<Option<String>> {
        Ok(self.resolve(model)?.field_name(field).map(str::to_string))
    }

    /// Physical column for `field` of `model`, optionally qualified with the table.
    ///
    /// Unknown models and unknown fields pass through unchanged, and `*` is
    /// never rewritten.
    pub fn resolve_column_by_parts<'a>(
        &self,
        model: impl Into<ModelRef<'a>>,
        field: &str,
        qualify: bool,
    ) -> String {
        let model = model.into();
        let fallback = self.model_name(model);
        self.rewrite_column(model, fallback, field, qualify)
    }

    /// Physical column for a `"model.field"` path, optionally qualified.
    ///
    /// The path splits on its first `.`; a path without one is returned as is.
    pub fn resolve_column_by_path(&self, path: &str, qualify: bool) -> String {
        match path.split_once('.') {
            Some((model, field)) => {
                self.rewrite_column(ModelRef::Name(model), model.to_string(), field, qualify)
            }
            None => path.to_string(),
        }
    }

    /// Table of `model`, or the reference itself when it is not a model.
    pub fn resolve_table<'a>(&self, model: impl Into<ModelRef<'a>>) -> String {
        let model = model.into();
        match self.resolve(model) {
            Ok(meta) => meta.table().to_string(),
            Err(_) => model.as_str().to_string(),
        }
    }

    /// Names of the models registered successfully so far.
    pub fn registered(&self) -> Vec<String> {
        let models = self.models.read().unwrap_or_else(PoisonError::into_inner);
        let mut names: Vec<String> = models
            .iter()
            .filter(|(_, slot)| matches!(slot.get(), Some(Ok(_))))
            .map(|(name, _)| name.clone())
            .collect();
        names.sort();
        names
    }

    /// Forget every registered model.
    ///
    /// Metadata already handed out stays valid; the next lookup registers afresh.
    pub fn reset(&self) {
        let mut models = self.models.write().unwrap_or_else(PoisonError::into_inner);
        tracing::debug!(models = models.len(), "Resetting metadata registry");
        models.clear();
    }

    fn rewrite_column(
        &self,
        model: ModelRef<'_>,
        fallback_table: String,
        field: &str,
        qualify: bool,
    ) -> String {
        let (table, column) = match self.resolve(model) {
            Ok(meta) => {
                let column = match meta.field(field) {
                    Some(found) if field != "*" => found.column().to_string(),
                    _ => field.to_string(),
                };
                (meta.table().to_string(), column)
            }
            Err(_) => (fallback_table, field.to_string()),
        };

        if qualify {
            format!("{}.{}", table, column)
        } else {
            column
        }
    }

    /// Finished registration result for `name`, if any.
    fn cached(&self, name: &str) -> Option<Result<Arc<ModelMetadata>>> {
        let models = self.models.read().unwrap_or_else(PoisonError::into_inner);
        models.get(name).and_then(|slot| slot.get().cloned())
    }

    fn slot(&self, name: &str) -> Slot {
        if let Some(slot) = self
            .models
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
        {
            return Arc::clone(slot);
        }

        let mut models = self.models.write().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(models.entry(name.to_string()).or_default())
    }

    #[tracing::instrument(level = "debug", skip(self, definition))]
    fn register(&self, model: &str, definition: &dyn Model) -> Result<ModelMetadata> {
        let mut builder = MetaBuilder::new(model, &self.config);
        definition.initialize(&mut builder);

        match builder.freeze() {
            Ok(meta) => {
                tracing::debug!(
                    model = meta.model(),
                    table = meta.table(),
                    primary_key = meta.primary_key(),
                    fields = meta.fields().len(),
                    aliases = meta.aliases().len(),
                    "Registered model"
                );
                Ok(meta)
            }
            Err(e) => {
                tracing::warn!(model = model, error = %e, "Model schema is invalid");
                Err(e)
            }
        }
    }
}

impl fmt::Debug for MetadataRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MetadataRegistry")
            .field("config", &self.config)
            .field("registered", &self.registered())
            .finish_non_exhaustive()
    }
}
