//! Metadata-aware SELECT builder.
//!
//! Callers speak in model and field names; [`Select`] turns them into table and
//! column names through the registry when the statement is built. Relations are
//! joined by asking the relationship field itself, through the [`Joinable`]
//! capability, to contribute the join clause.
//!
//! # Example
//!
//! ```ignore
//! let (sql, params) = Select::model(&registry, "post")?
//!     .with("author")?
//!     .filter("title", "=", "Hello")
//!     .build();
//! // SELECT posts.*, author.id AS "author:id", author.name AS "author:name"
//! // FROM posts LEFT JOIN authors AS author ON author.id = posts.author_id
//! // WHERE posts.title = $1
//! ```
//!
//! [`Joinable`]: sqlmeta_core::Joinable

use serde::{Deserialize, Serialize};
use sqlmeta_core::{
    Condition, Error, JoinType, LazyQuery, MetadataRegistry, ModelMetadata, ModelRef,
    QueryBuilder, Result, SortOrder, Value,
};
use std::sync::Arc;

/// Separator between relation names in a nested `with` path (`author:company`).
pub const PATH_SEPARATOR: char = ':';

/// Separator between relation names in the table alias of a nested join.
const ALIAS_SEPARATOR: &str = "__";

/// One JOIN clause.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Join {
    pub kind: JoinType,
    pub table: String,
    pub alias: String,
    /// `(left, op, right)` predicates, ANDed together.
    pub on: Vec<(String, String, String)>,
}

impl Join {
    fn to_sql(&self) -> String {
        let mut sql = format!("{} {}", self.kind.as_sql(), self.table);
        if self.alias != self.table {
            sql.push_str(" AS ");
            sql.push_str(&self.alias);
        }
        if !self.on.is_empty() {
            let predicates: Vec<String> = self
                .on
                .iter()
                .map(|(left, op, right)| format!("{} {} {}", left, op, right))
                .collect();
            sql.push_str(" ON ");
            sql.push_str(&predicates.join(" AND "));
        }
        sql
    }
}

/// A relation joined into the query.
#[derive(Debug, Clone)]
struct Loaded {
    /// `:`-separated relation path as given to `with`.
    path: String,
    /// Table alias the relation was joined under.
    alias: String,
    /// Metadata of the joined model.
    meta: Arc<ModelMetadata>,
}

/// SELECT query builder over one model.
#[derive(Debug)]
pub struct Select<'r> {
    registry: &'r MetadataRegistry,
    meta: Arc<ModelMetadata>,
    columns: Vec<String>,
    joins: Vec<Join>,
    loaded: Vec<Loaded>,
    conditions: Vec<Condition>,
    order_by: Vec<(String, SortOrder)>,
    limit: Option<u64>,
    unique: bool,
}

impl<'r> Select<'r> {
    /// Start a SELECT over `model`.
    ///
    /// The model's default sorting is applied, and every relation it lists in
    /// `load_with` is joined.
    pub fn model<'a>(
        registry: &'r MetadataRegistry,
        model: impl Into<ModelRef<'a>>,
    ) -> Result<Self> {
        let meta = registry.resolve(model)?;
        let order_by = meta.sorting().to_vec();
        let load_with = meta.load_with().to_vec();

        let mut select = Self {
            registry,
            meta,
            columns: Vec::new(),
            joins: Vec::new(),
            loaded: Vec::new(),
            conditions: Vec::new(),
            order_by,
            limit: None,
            unique: false,
        };
        for relation in &load_with {
            select = select.with(relation)?;
        }
        Ok(select)
    }

    /// Start a SELECT from a query a field handed out.
    pub fn from_lazy(registry: &'r MetadataRegistry, query: &LazyQuery) -> Result<Self> {
        let mut select = Self::model(registry, query.model.as_str())?;
        select.conditions.extend(query.conditions.iter().cloned());
        select.limit = query.limit;
        select.unique = query.unique;
        Ok(select)
    }

    /// Select only these fields of the model instead of all of its columns.
    pub fn columns(mut self, fields: &[&str]) -> Self {
        self.columns = fields.iter().map(|f| f.to_string()).collect();
        self
    }

    /// Add a `field op value` predicate.
    pub fn filter(
        mut self,
        field: impl Into<String>,
        op: impl Into<String>,
        value: impl Into<Value>,
    ) -> Self {
        self.conditions.push(Condition::new(field, op, value));
        self
    }

    /// Replace the ordering.
    pub fn order_by(mut self, field: impl Into<String>, order: SortOrder) -> Self {
        self.order_by = vec![(field.into(), order)];
        self
    }

    /// Add an ordering after the existing ones.
    pub fn then_by(mut self, field: impl Into<String>, order: SortOrder) -> Self {
        self.order_by.push((field.into(), order));
        self
    }

    /// Limit the result. With `unique`, a single record is expected.
    pub fn limit(mut self, limit: u64, unique: bool) -> Self {
        self.limit = Some(limit);
        self.unique = unique;
        self
    }

    /// Whether the executor should return a single record.
    pub fn is_unique(&self) -> bool {
        self.unique
    }

    /// Model the query selects from.
    pub fn meta(&self) -> &ModelMetadata {
        &self.meta
    }

    /// Joins added so far.
    pub fn joins(&self) -> &[Join] {
        &self.joins
    }

    /// Join a relation and select its columns.
    ///
    /// `relation` names a joinable field of the model, or a `:`-separated
    /// path through several (`author:company`). Each step is joined at most
    /// once, under an alias made of the path with `__` between names.
    ///
    /// Fails with [`Error::FieldNotFound`] for an unknown field and with
    /// [`Error::NotJoinable`] for a field that cannot contribute a join.
    pub fn with(mut self, relation: &str) -> Result<Self> {
        let registry = self.registry;
        let mut model = self.meta.model().to_string();
        let mut parent_path = self.meta.table().to_string();
        let mut path = String::new();
        let mut alias = String::new();

        for name in relation.split(PATH_SEPARATOR) {
            if !path.is_empty() {
                path.push(PATH_SEPARATOR);
                alias.push_str(ALIAS_SEPARATOR);
            }
            path.push_str(name);
            alias.push_str(name);

            if let Some(loaded) = self.loaded.iter().find(|l| l.path == path) {
                model = loaded.meta.model().to_string();
                parent_path = loaded.alias.clone();
                continue;
            }

            let field = registry
                .resolve_field(model.as_str(), name)?
                .ok_or_else(|| Error::FieldNotFound {
                    model: model.clone(),
                    field: name.to_string(),
                })?;
            let joinable = field.as_joinable().ok_or_else(|| Error::NotJoinable {
                model: model.clone(),
                field: name.to_string(),
            })?;

            joinable.contribute_join(&mut self, registry, name, &alias, &parent_path)?;

            let meta = registry.resolve(joinable.target_model())?;
            tracing::debug!(
                relation = %path,
                alias = %alias,
                table = meta.table(),
                "Joined relation"
            );
            model = meta.model().to_string();
            parent_path = alias.clone();
            self.loaded.push(Loaded {
                path: path.clone(),
                alias: alias.clone(),
                meta,
            });
        }

        Ok(self)
    }

    /// Build the SQL and its positional parameters (`$1`, `$2`, ...).
    pub fn build(&self) -> (String, Vec<Value>) {
        let mut params = Vec::new();
        let mut sql = format!(
            "SELECT {} FROM {}",
            self.select_list().join(", "),
            self.meta.table()
        );

        for join in &self.joins {
            sql.push(' ');
            sql.push_str(&join.to_sql());
        }

        if !self.conditions.is_empty() {
            let predicates: Vec<String> = self
                .conditions
                .iter()
                .map(|condition| self.predicate(condition, &mut params))
                .collect();
            sql.push_str(" WHERE ");
            sql.push_str(&predicates.join(" AND "));
        }

        if !self.order_by.is_empty() {
            let order: Vec<String> = self
                .order_by
                .iter()
                .map(|(field, dir)| format!("{} {}", self.column(field), dir.as_sql()))
                .collect();
            sql.push_str(" ORDER BY ");
            sql.push_str(&order.join(", "));
        }

        if let Some(limit) = self.limit {
            sql.push_str(&format!(" LIMIT {}", limit));
        }

        tracing::trace!(sql = %sql, params = params.len(), "Built SELECT");
        (sql, params)
    }

    fn column(&self, field: &str) -> String {
        self.registry.resolve_column_by_parts(self.meta.model(), field, true)
    }

    fn select_list(&self) -> Vec<String> {
        let mut list = if self.columns.is_empty() {
            vec![format!("{}.*", self.meta.table())]
        } else {
            self.columns.iter().map(|field| self.column(field)).collect()
        };

        for loaded in &self.loaded {
            for (name, field) in loaded.meta.fields() {
                if field.options().in_db {
                    list.push(format!(
                        "{}.{} AS \"{}{}{}\"",
                        loaded.alias,
                        field.column(),
                        loaded.path,
                        PATH_SEPARATOR,
                        name
                    ));
                }
            }
        }
        list
    }

    fn predicate(&self, condition: &Condition, params: &mut Vec<Value>) -> String {
        let column = self.column(&condition.column);
        if condition.value.is_null() {
            match condition.op.as_str() {
                "=" => return format!("{} IS NULL", column),
                "!=" | "<>" => return format!("{} IS NOT NULL", column),
                _ => {}
            }
        }
        params.push(condition.value.clone());
        format!("{} {} ${}", column, condition.op, params.len())
    }
}

impl QueryBuilder for Select<'_> {
    fn join(&mut self, table: &str, alias: &str, kind: JoinType) {
        self.joins.push(Join {
            kind,
            table: table.to_string(),
            alias: alias.to_string(),
            on: Vec::new(),
        });
    }

    fn on(&mut self, left: &str, op: &str, right: &str) {
        match self.joins.last_mut() {
            Some(join) => join.on.push((left.to_string(), op.to_string(), right.to_string())),
            None => {
                tracing::warn!(left = left, right = right, "ON clause without a join, ignored");
            }
        }
    }
}
