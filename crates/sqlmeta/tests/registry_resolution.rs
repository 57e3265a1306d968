use std::sync::Arc;

use sqlmeta::prelude::*;
use sqlmeta::{Class, Model};

struct Post {
    id: i64,
}

impl Instance for Post {
    fn model_name(&self) -> &str {
        "Model_Post"
    }

    fn id(&self) -> Value {
        Value::BigInt(self.id)
    }
}

fn blog() -> MetadataRegistry {
    let classes = ClassTable::new();
    classes.register_model("model_post", |meta: &mut MetaBuilder| {
        meta.table("post")
            .field("id", Primary::new())
            .field("legacy_id", Integer::new().primary(true))
            .field("title", Text::new().column("post_title"))
            .field("headline", "title")
            .field("views", Integer::new().default(0));
    });
    MetadataRegistry::new(classes)
}

#[test]
fn resolve_returns_the_cached_instance() {
    let registry = blog();
    let first = registry.resolve("post").unwrap();
    let second = registry.resolve("post").unwrap();
    let by_class = registry.resolve("MODEL_POST").unwrap();
    let by_instance = registry.resolve(&Post { id: 1 } as &dyn Instance).unwrap();

    assert!(Arc::ptr_eq(&first, &second));
    assert!(Arc::ptr_eq(&first, &by_class));
    assert!(Arc::ptr_eq(&first, &by_instance));
}

#[test]
fn first_primary_field_wins() {
    let registry = blog();
    let meta = registry.resolve("post").unwrap();
    assert_eq!(meta.primary_key(), "id");
    assert!(meta.field("legacy_id").unwrap().is_primary());
}

#[test]
fn alias_resolves_like_its_target() {
    let registry = blog();
    let via_alias = registry.resolve_field("post", "headline").unwrap().unwrap();
    let direct = registry.resolve_field("post", "title").unwrap().unwrap();
    assert!(Arc::ptr_eq(&via_alias, &direct));

    let meta = registry.resolve("post").unwrap();
    assert!(!meta.fields().contains_key("headline"));
    assert_eq!(meta.aliases().get("headline").map(String::as_str), Some("title"));
}

#[test]
fn model_and_field_misses_are_distinct() {
    let registry = blog();
    assert!(matches!(
        registry.resolve_field("comment", "body"),
        Err(Error::ModelNotFound { .. })
    ));
    assert!(registry.resolve_field("post", "body").unwrap().is_none());
}

#[test]
fn column_path_passthrough_then_rewrite() {
    let classes = Arc::new(ClassTable::new());
    let registry = MetadataRegistry::new(Arc::clone(&classes));

    assert_eq!(registry.resolve_column_by_path("posts.title", false), "title");
    assert_eq!(registry.resolve_column_by_path("posts.title", true), "posts.title");

    classes.register_model("model_posts", |meta: &mut MetaBuilder| {
        meta.table("post")
            .field("id", Primary::new())
            .field("title", Text::new().column("post_title"));
    });

    assert_eq!(registry.resolve_column_by_path("posts.title", false), "post_title");
    assert_eq!(registry.resolve_column_by_path("posts.title", true), "post.post_title");
}

#[test]
fn wildcard_is_never_rewritten() {
    let registry = blog();
    assert_eq!(registry.resolve_column_by_parts("post", "*", false), "*");
    assert_eq!(registry.resolve_column_by_parts("unknown", "*", false), "*");
    assert_eq!(registry.resolve_column_by_path("post.*", false), "*");
}

#[test]
fn table_resolution_passes_raw_names_through() {
    let registry = blog();
    assert_eq!(registry.resolve_table("post"), "post");
    assert_eq!(registry.resolve_table("audit_log"), "audit_log");
}

#[test]
fn defaults_are_snapshotted() {
    let registry = blog();
    let meta = registry.resolve("post").unwrap();
    assert_eq!(meta.default_for("views"), Some(&Value::Int(0)));
    assert_eq!(meta.default_for("title"), Some(&Value::Null));
    assert_eq!(meta.db(), "default");
    assert_eq!(meta.fields_for_column("post_title"), ["title".to_string()]);
}

struct Lookalikes;

impl ClassResolver for Lookalikes {
    fn find(&self, class_name: &str) -> Option<Class> {
        match class_name {
            "model_widget" => Some(Class::Other("controller".into())),
            "model_gadget" => {
                let model: Arc<dyn Model> = Arc::new(|meta: &mut MetaBuilder| {
                    meta.field("id", Primary::new());
                });
                Some(Class::Model(model))
            }
            _ => None,
        }
    }
}

#[test]
fn custom_resolver_rejects_non_models() {
    let registry = MetadataRegistry::new(Lookalikes);
    assert!(registry.resolve("widget").unwrap_err().is_not_found());
    assert_eq!(registry.resolve("gadget").unwrap().table(), "gadgets");
    assert_eq!(registry.registered(), vec!["gadget".to_string()]);
}

#[test]
fn invalid_alias_fails_loudly_every_time() {
    let classes = ClassTable::new();
    classes.register_model("model_broken", |meta: &mut MetaBuilder| {
        meta.field("id", Primary::new()).field("nickname", "missing");
    });
    let registry = MetadataRegistry::new(classes);

    let first = registry.resolve("broken").unwrap_err();
    assert!(matches!(first, Error::InvalidFieldEntry { .. }));
    assert_eq!(registry.resolve("broken").unwrap_err(), first);
    assert!(registry.registered().is_empty());
}
