//! Model definitions, model references and the class-resolution seam.
//!
//! A model is declared once, as a schema hook ([`Model::initialize`]), and looked
//! up by class name through a [`ClassResolver`]. The registry never sees concrete
//! model types; it only asks the resolver for a class and checks that the class
//! really is a model.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

use crate::meta::MetaBuilder;
use crate::value::Value;

/// A model's schema declaration.
///
/// `initialize` is called exactly once per registry, during registration, and
/// declares the table, fields, aliases, sorting and so on.
///
/// Closures taking `&mut MetaBuilder` are models too, which keeps ad hoc schemas short:
///
/// ```
/// use sqlmeta_core::{ClassTable, MetaBuilder, Primary, Text};
///
/// let classes = ClassTable::new();
/// classes.register_model("model_post", |meta: &mut MetaBuilder| {
///     meta.field("id", Primary::new())
///         .field("title", Text::new().column("post_title"));
/// });
/// ```
pub trait Model: Send + Sync {
    /// Declare the model's schema.
    fn initialize(&self, meta: &mut MetaBuilder);
}

impl<F> Model for F
where
    F: Fn(&mut MetaBuilder) + Send + Sync,
{
    fn initialize(&self, meta: &mut MetaBuilder) {
        self(meta);
    }
}

/// A loaded record of some model.
pub trait Instance {
    /// Class or model name of the record (e.g. `"Model_Post"` or `"post"`).
    fn model_name(&self) -> &str;

    /// Identity of the record, usually its primary-key value.
    fn id(&self) -> Value;
}

/// Anything the registry accepts as "a model".
#[derive(Clone, Copy)]
pub enum ModelRef<'a> {
    /// A bare or class-prefixed model name.
    Name(&'a str),
    /// A model instance.
    Instance(&'a dyn Instance),
}

impl<'a> ModelRef<'a> {
    /// The reference exactly as the caller supplied it.
    pub fn as_str(&self) -> &'a str {
        match *self {
            ModelRef::Name(name) => name,
            ModelRef::Instance(instance) => instance.model_name(),
        }
    }
}

impl fmt::Debug for ModelRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelRef::Name(name) => f.debug_tuple("Name").field(name).finish(),
            ModelRef::Instance(instance) => f
                .debug_tuple("Instance")
                .field(&instance.model_name())
                .finish(),
        }
    }
}

impl<'a> From<&'a str> for ModelRef<'a> {
    fn from(name: &'a str) -> Self {
        ModelRef::Name(name)
    }
}

impl<'a> From<&'a String> for ModelRef<'a> {
    fn from(name: &'a String) -> Self {
        ModelRef::Name(name)
    }
}

impl<'a> From<&'a dyn Instance> for ModelRef<'a> {
    fn from(instance: &'a dyn Instance) -> Self {
        ModelRef::Instance(instance)
    }
}

/// What a class name resolved to.
#[derive(Clone)]
pub enum Class {
    /// A genuine model definition.
    Model(Arc<dyn Model>),
    /// Some other kind of class sharing the name (e.g. a legacy ORM class).
    Other(String),
}

impl fmt::Debug for Class {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Class::Model(_) => f.write_str("Model(..)"),
            Class::Other(kind) => f.debug_tuple("Other").field(kind).finish(),
        }
    }
}

/// Locates class definitions by (lowercase) class name.
pub trait ClassResolver: Send + Sync {
    /// Find the class registered under `class_name`.
    fn find(&self, class_name: &str) -> Option<Class>;
}

/// In-memory [`ClassResolver`].
///
/// Class names are matched case-insensitively.
#[derive(Default)]
pub struct ClassTable {
    classes: RwLock<HashMap<String, Class>>,
}

impl ClassTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a model definition under `class_name`.
    pub fn register_model(&self, class_name: &str, model: impl Model + 'static) {
        self.insert(class_name, Class::Model(Arc::new(model)));
    }

    /// Register a class that is not a model.
    pub fn register_other(&self, class_name: &str, kind: impl Into<String>) {
        self.insert(class_name, Class::Other(kind.into()));
    }

    /// Number of registered classes.
    pub fn len(&self) -> usize {
        self.classes
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// True if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn insert(&self, class_name: &str, class: Class) {
        self.classes
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(class_name.to_lowercase(), class);
    }
}

impl ClassResolver for ClassTable {
    fn find(&self, class_name: &str) -> Option<Class> {
        self.classes
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&class_name.to_lowercase())
            .cloned()
    }
}

impl<R: ClassResolver + ?Sized> ClassResolver for Arc<R> {
    fn find(&self, class_name: &str) -> Option<Class> {
        (**self).find(class_name)
    }
}

impl fmt::Debug for ClassTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClassTable")
            .field("classes", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Post;

    impl Instance for Post {
        fn model_name(&self) -> &str {
            "Model_Post"
        }

        fn id(&self) -> Value {
            Value::BigInt(1)
        }
    }

    #[test]
    fn test_class_table_is_case_insensitive() {
        let classes = ClassTable::new();
        classes.register_model("Model_Post", |_: &mut MetaBuilder| {});
        classes.register_other("model_legacy", "orm");

        assert!(matches!(classes.find("model_post"), Some(Class::Model(_))));
        assert!(matches!(classes.find("MODEL_LEGACY"), Some(Class::Other(kind)) if kind == "orm"));
        assert!(classes.find("model_missing").is_none());
        assert_eq!(classes.len(), 2);
    }

    #[test]
    fn test_model_ref_as_str() {
        let post = Post;
        assert_eq!(ModelRef::from("post").as_str(), "post");
        assert_eq!(ModelRef::from(&post as &dyn Instance).as_str(), "Model_Post");
    }
}
