//! In-process realtime document store
//!
//! Tables are ordered lists of JSON objects keyed by their `id` field. Every
//! write is published on a broadcast channel so live queries can re-run.

use super::error::DatabaseError;
use super::query::{Mutation, Query};
use crate::consts::cli_consts::CHANGEFEED_BUFFER_SIZE;
use serde_json::{Value, json};
use std::collections::BTreeMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tokio::sync::broadcast;

/// One write to a table.
#[derive(Debug, Clone, PartialEq)]
pub struct TableChange {
    pub table: String,
    /// Primary key of the written document.
    pub id: String,
}

#[derive(Debug)]
pub struct MemoryDatabase {
    name: String,
    tables: RwLock<BTreeMap<String, Vec<Value>>>,
    changes: broadcast::Sender<TableChange>,
}

impl Default for MemoryDatabase {
    fn default() -> Self {
        Self::new("test")
    }
}

impl MemoryDatabase {
    pub fn new(name: impl Into<String>) -> Self {
        let (changes, _) = broadcast::channel(CHANGEFEED_BUFFER_SIZE);
        Self {
            name: name.into(),
            tables: RwLock::new(BTreeMap::new()),
            changes,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    fn read(&self) -> RwLockReadGuard<'_, BTreeMap<String, Vec<Value>>> {
        self.tables.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, BTreeMap<String, Vec<Value>>> {
        self.tables.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Creates `table` if missing. Returns whether it was created.
    pub fn table_create(&self, table: &str) -> bool {
        let created = match self.write().entry(table.to_string()) {
            std::collections::btree_map::Entry::Occupied(_) => false,
            std::collections::btree_map::Entry::Vacant(entry) => {
                entry.insert(Vec::new());
                true
            }
        };
        if created {
            log::debug!("Created table {}.{}", self.name, table);
        }
        created
    }

    pub fn table_list(&self) -> Vec<String> {
        self.read().keys().cloned().collect()
    }

    /// Stores `document` in `table` and returns its id.
    ///
    /// Documents without an `id` get a random UUID, documents without a
    /// `createdAt` get the current time.
    pub fn insert(&self, table: &str, document: Value) -> Result<String, DatabaseError> {
        let Value::Object(mut fields) = document else {
            return Err(DatabaseError::InvalidDocument(
                "documents must be JSON objects".to_string(),
            ));
        };

        let id = match fields.get("id") {
            None | Some(Value::Null) => uuid::Uuid::new_v4().to_string(),
            Some(Value::String(id)) => id.clone(),
            Some(other) => {
                return Err(DatabaseError::InvalidDocument(format!(
                    "primary key must be a string, got {}",
                    other
                )));
            }
        };
        fields.insert("id".to_string(), Value::String(id.clone()));
        fields
            .entry("createdAt")
            .or_insert_with(|| json!(chrono::Utc::now().to_rfc3339()));
        let document = Value::Object(fields);

        {
            let mut tables = self.write();
            let rows = tables
                .get_mut(table)
                .ok_or_else(|| DatabaseError::UnknownTable(table.to_string()))?;
            if rows.iter().any(|row| row.get("id").and_then(Value::as_str) == Some(&id)) {
                return Err(DatabaseError::InvalidDocument(format!(
                    "duplicate primary key `{}`",
                    id
                )));
            }
            rows.push(document);
        }

        // Nobody listening is fine.
        let _ = self.changes.send(TableChange {
            table: table.to_string(),
            id: id.clone(),
        });
        Ok(id)
    }

    /// Evaluates `query` against the current contents.
    pub fn run(&self, query: &Query) -> Result<Vec<Value>, DatabaseError> {
        let tables = self.read();
        let rows = tables
            .get(&query.table)
            .ok_or_else(|| DatabaseError::UnknownTable(query.table.clone()))?;
        let joined: &[Value] = match &query.eq_join {
            Some(join) => tables
                .get(&join.table)
                .ok_or_else(|| DatabaseError::UnknownTable(join.table.clone()))?,
            None => &[],
        };
        Ok(query.evaluate(rows, joined))
    }

    /// Applies `mutation`, returning a summary like the database's write result.
    pub fn execute(&self, mutation: &Mutation) -> Result<Value, DatabaseError> {
        match mutation {
            Mutation::Insert { table, document } => {
                let id = self.insert(table, document.clone())?;
                Ok(json!({"inserted": 1, "generated_keys": [id]}))
            }
            Mutation::TableCreate { table } => {
                let created = self.table_create(table);
                Ok(json!({"tables_created": if created { 1 } else { 0 }}))
            }
        }
    }

    /// Stream of every subsequent write.
    pub fn changes(&self) -> broadcast::Receiver<TableChange> {
        self.changes.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_assigns_id_and_created_at() {
        let db = MemoryDatabase::default();
        db.table_create("turtles");
        let id = db.insert("turtles", json!({"name": "Leo"})).unwrap();

        let rows = db.run(&Query::table("turtles")).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["id"], json!(id));
        assert_eq!(rows[0]["name"], json!("Leo"));
        assert!(rows[0]["createdAt"].is_string());
    }

    #[test]
    fn test_insert_keeps_given_id_and_rejects_duplicates() {
        let db = MemoryDatabase::default();
        db.table_create("monitors");
        assert_eq!(db.insert("monitors", json!({"id": "m1"})).unwrap(), "m1");
        assert!(matches!(
            db.insert("monitors", json!({"id": "m1"})),
            Err(DatabaseError::InvalidDocument(_))
        ));
    }

    #[test]
    fn test_unknown_table_and_bad_documents() {
        let db = MemoryDatabase::default();
        assert!(matches!(
            db.insert("nope", json!({})),
            Err(DatabaseError::UnknownTable(t)) if t == "nope"
        ));
        assert!(matches!(
            db.run(&Query::table("nope")),
            Err(DatabaseError::UnknownTable(_))
        ));
        db.table_create("t");
        assert!(db.insert("t", json!([1, 2])).is_err());
        assert!(db.insert("t", json!({"id": 7})).is_err());
    }

    #[test]
    fn test_table_create_is_idempotent() {
        let db = MemoryDatabase::default();
        assert!(db.table_create("values"));
        assert!(!db.table_create("values"));
        assert_eq!(db.table_list(), vec!["values".to_string()]);
        let summary = db.execute(&Mutation::table_create("values")).unwrap();
        assert_eq!(summary["tables_created"], json!(0));
    }

    #[tokio::test]
    async fn test_writes_are_broadcast() {
        let db = MemoryDatabase::default();
        db.table_create("namespaces");
        let mut changes = db.changes();

        db.execute(&Mutation::insert("namespaces", json!({"name": "host"})))
            .unwrap();

        let change = changes.recv().await.unwrap();
        assert_eq!(change.table, "namespaces");
        let rows = db.run(&Query::table("namespaces")).unwrap();
        assert_eq!(change.id, rows[0]["id"].as_str().unwrap());
    }
}
