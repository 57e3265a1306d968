use sqlmeta::prelude::*;
use sqlmeta::{JoinType, QueryBuilder};

#[derive(Default)]
struct Recorder {
    joins: Vec<(String, String, JoinType)>,
    ons: Vec<(String, String, String)>,
}

impl QueryBuilder for Recorder {
    fn join(&mut self, table: &str, alias: &str, kind: JoinType) {
        self.joins.push((table.into(), alias.into(), kind));
    }

    fn on(&mut self, left: &str, op: &str, right: &str) {
        self.ons.push((left.into(), op.into(), right.into()));
    }
}

struct Author(i64);

impl Instance for Author {
    fn model_name(&self) -> &str {
        "author"
    }

    fn id(&self) -> Value {
        Value::BigInt(self.0)
    }
}

fn library() -> MetadataRegistry {
    let classes = ClassTable::new();
    classes.register_model("model_author", |meta: &mut MetaBuilder| {
        meta.table("people")
            .field("uid", Primary::new().column("author_pk"))
            .field("name", Text::new());
    });
    classes.register_model("model_post", |meta: &mut MetaBuilder| {
        meta.field("id", Primary::new())
            .field("author", BelongsTo::new())
            .field("editor", BelongsTo::new().foreign("author").column("edited_by"));
    });
    MetadataRegistry::new(classes)
}

#[test]
fn belongs_to_defaults() {
    let registry = library();
    let meta = registry.resolve("post").unwrap();
    let field = meta.field("author").unwrap();
    let joinable = field.as_joinable().unwrap();

    assert_eq!(joinable.target_model(), "author");
    assert_eq!(field.column(), "author_id");
    assert_eq!(meta.fields_for_column("author_id"), ["author".to_string()]);
    assert_eq!(
        registry.resolve_column_by_parts("post", "author", true),
        "posts.author_id"
    );
}

#[test]
fn contribute_join_uses_physical_columns() {
    let registry = library();
    let field = registry.resolve_field("post", "author").unwrap().unwrap();
    let mut recorder = Recorder::default();

    field
        .as_joinable()
        .unwrap()
        .contribute_join(&mut recorder, &registry, "author", "author", "posts")
        .unwrap();

    assert_eq!(
        recorder.joins,
        vec![("people".to_string(), "author".to_string(), JoinType::Left)]
    );
    assert_eq!(
        recorder.ons,
        vec![(
            "author.author_pk".to_string(),
            "=".to_string(),
            "posts.author_id".to_string()
        )]
    );
}

#[test]
fn contribute_join_fails_for_unknown_foreign_model() {
    let classes = ClassTable::new();
    classes.register_model("model_post", |meta: &mut MetaBuilder| {
        meta.field("id", Primary::new()).field("ghost", BelongsTo::new());
    });
    let registry = MetadataRegistry::new(classes);
    let field = registry.resolve_field("post", "ghost").unwrap().unwrap();

    let mut recorder = Recorder::default();
    let err = field
        .as_joinable()
        .unwrap()
        .contribute_join(&mut recorder, &registry, "ghost", "ghost", "posts")
        .unwrap_err();
    assert!(err.is_not_found());
    assert!(recorder.joins.is_empty());
}

#[test]
fn lazy_get_targets_foreign_primary_key() {
    let registry = library();
    let field = registry.resolve_field("post", "editor").unwrap().unwrap();

    let stored = field.set_instance(&Author(42));
    assert_eq!(stored, Value::BigInt(42));

    let query = field.get(&registry, stored).into_query().unwrap();
    assert_eq!(query.model, "author");
    assert_eq!(query.conditions[0].column, "uid");
    assert!(query.unique);

    let (sql, params) = Select::from_lazy(&registry, &query).unwrap().build();
    assert_eq!(
        sql,
        "SELECT people.* FROM people WHERE people.author_pk = $1 LIMIT 1"
    );
    assert_eq!(params, vec![Value::BigInt(42)]);
}

#[test]
fn select_joins_aliased_relation() {
    let registry = library();
    let (sql, _) = Select::model(&registry, "post")
        .unwrap()
        .with("editor")
        .unwrap()
        .columns(&["id"])
        .build();
    assert_eq!(
        sql,
        "SELECT posts.id, editor.author_pk AS \"editor:uid\", editor.name AS \"editor:name\" \
         FROM posts LEFT JOIN people AS editor ON editor.author_pk = posts.edited_by"
    );
}
