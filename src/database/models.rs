//! Data models
//!
//! Each model names its table and declares how it relates to other models.
//! Foreign keys are plain string fields holding the other document's `id`.

use super::memory::MemoryDatabase;
use super::query::Query;
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value as Json;

#[derive(Debug, Copy, Clone, Eq, PartialEq, strum::Display)]
pub enum RelationKind {
    HasMany,
    BelongsTo,
}

/// A relationship from one model to another.
///
/// `left_key` is read on this model, `right_key` on the related one.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct Relation {
    pub kind: RelationKind,
    pub field: &'static str,
    pub table: &'static str,
    pub left_key: &'static str,
    pub right_key: &'static str,
}

impl Relation {
    /// Query for the documents related to a document whose `left_key` is `key`.
    pub fn query_for(&self, key: &str) -> Query {
        Query::table(self.table).filter(self.right_key, key)
    }
}

pub trait Model: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    const TABLE: &'static str;

    fn id(&self) -> &str;

    fn name(&self) -> &str;

    fn relations() -> &'static [Relation] {
        &[]
    }

    fn relation(field: &str) -> Option<&'static Relation> {
        Self::relations().iter().find(|r| r.field == field)
    }

    /// Converts result rows, skipping the ones that do not fit the schema.
    fn from_rows(rows: &[Json]) -> Vec<Self> {
        rows.iter()
            .filter_map(|row| match serde_json::from_value::<Self>(row.clone()) {
                Ok(model) => Some(model),
                Err(e) => {
                    log::warn!("Skipping malformed {} row: {}", Self::TABLE, e);
                    None
                }
            })
            .collect()
    }
}

fn now() -> DateTime<Utc> {
    Utc::now()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Monitor {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    pub name: String,
    #[serde(rename = "createdAt", default = "now")]
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Namespace {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    pub name: String,
    #[serde(rename = "createdAt", default = "now")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "monitorId", default, skip_serializing_if = "Option::is_none")]
    pub monitor_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Variable {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    pub name: String,
    #[serde(rename = "createdAt", default = "now")]
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
}

/// One sample of a variable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Value {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "createdAt", default = "now")]
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub value: Json,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variable: Option<String>,
    /// Milliseconds since the Unix epoch.
    #[serde(default)]
    pub timestamp: f64,
}

impl Value {
    /// The sample as a chart point, if the value is numeric.
    pub fn point(&self) -> Option<(f64, f64)> {
        self.value.as_f64().map(|y| (self.timestamp, y))
    }
}

/// A row of the demo `turtles` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Turtle {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    pub name: String,
}

impl Model for Monitor {
    const TABLE: &'static str = "monitors";

    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn relations() -> &'static [Relation] {
        &[Relation {
            kind: RelationKind::HasMany,
            field: "namespaces",
            table: Namespace::TABLE,
            left_key: "id",
            right_key: "monitorId",
        }]
    }
}

impl Model for Namespace {
    const TABLE: &'static str = "namespaces";

    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl Model for Variable {
    const TABLE: &'static str = "variables";

    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn relations() -> &'static [Relation] {
        &[Relation {
            kind: RelationKind::BelongsTo,
            field: "namespace",
            table: Namespace::TABLE,
            left_key: "namespace",
            right_key: "id",
        }]
    }
}

impl Model for Value {
    const TABLE: &'static str = "values";

    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn relations() -> &'static [Relation] {
        &[Relation {
            kind: RelationKind::BelongsTo,
            field: "variable",
            table: Variable::TABLE,
            left_key: "variable",
            right_key: "id",
        }]
    }
}

impl Model for Turtle {
    const TABLE: &'static str = "turtles";

    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Tables of every declared model.
pub const MODEL_TABLES: [&str; 4] = [
    Monitor::TABLE,
    Namespace::TABLE,
    Variable::TABLE,
    Value::TABLE,
];

/// Creates the tables of every declared model plus `extra` ones.
///
/// Returns the tables that did not exist before.
pub fn ensure_tables(db: &MemoryDatabase, extra: &[String]) -> Vec<String> {
    MODEL_TABLES
        .iter()
        .map(|table| table.to_string())
        .chain(extra.iter().cloned())
        .filter(|table| db.table_create(table))
        .collect()
}
