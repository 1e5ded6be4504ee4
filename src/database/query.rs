//! Structured queries and mutations
//!
//! A query reads one table, optionally keeps only rows that join another
//! table by id, filters on field equality and sorts by one field.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::cmp::Ordering;
use std::collections::HashSet;

/// Keep left rows whose `field` equals the `id` of a row in `table`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EqJoin {
    pub field: String,
    pub table: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Query {
    pub table: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub eq_join: Option<EqJoin>,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub filter: Map<String, Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_by: Option<String>,
}

impl Query {
    /// Every row of `name`, in insertion order.
    pub fn table(name: impl Into<String>) -> Self {
        Self {
            table: name.into(),
            eq_join: None,
            filter: Map::new(),
            order_by: None,
        }
    }

    pub fn eq_join(mut self, field: impl Into<String>, table: impl Into<String>) -> Self {
        self.eq_join = Some(EqJoin {
            field: field.into(),
            table: table.into(),
        });
        self
    }

    pub fn filter(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.filter.insert(field.into(), value.into());
        self
    }

    pub fn order_by(mut self, field: impl Into<String>) -> Self {
        self.order_by = Some(field.into());
        self
    }

    /// Tables whose changes can alter the result of this query.
    pub fn tables(&self) -> Vec<&str> {
        let mut tables = vec![self.table.as_str()];
        if let Some(join) = &self.eq_join {
            if join.table != self.table {
                tables.push(join.table.as_str());
            }
        }
        tables
    }

    /// Whether `row` passes the equality filter.
    pub fn matches(&self, row: &Value) -> bool {
        self.filter
            .iter()
            .all(|(field, expected)| row.get(field) == Some(expected))
    }

    /// Evaluates the query over `rows`, using `joined` as the right side of
    /// the join when there is one.
    pub fn evaluate(&self, rows: &[Value], joined: &[Value]) -> Vec<Value> {
        let join_ids: Option<HashSet<&str>> = self.eq_join.as_ref().map(|_| {
            joined
                .iter()
                .filter_map(|row| row.get("id").and_then(Value::as_str))
                .collect()
        });

        let mut result: Vec<Value> = rows
            .iter()
            .filter(|row| match (&self.eq_join, &join_ids) {
                (Some(join), Some(ids)) => row
                    .get(&join.field)
                    .and_then(Value::as_str)
                    .is_some_and(|key| ids.contains(key)),
                _ => true,
            })
            .filter(|row| self.matches(row))
            .cloned()
            .collect();

        if let Some(field) = &self.order_by {
            result.sort_by(|a, b| compare_fields(a.get(field), b.get(field)));
        }
        result
    }
}

fn rank(value: Option<&Value>) -> u8 {
    match value {
        Some(Value::Number(_)) => 0,
        Some(Value::String(_)) => 1,
        Some(Value::Bool(_)) => 2,
        Some(Value::Null) | Some(Value::Array(_)) | Some(Value::Object(_)) => 3,
        None => 4,
    }
}

/// Ascending order: numbers, then strings, then everything else, missing last.
pub fn compare_fields(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (Some(Value::Number(x)), Some(Value::Number(y))) => {
            let x = x.as_f64().unwrap_or(f64::NAN);
            let y = y.as_f64().unwrap_or(f64::NAN);
            x.partial_cmp(&y).unwrap_or(Ordering::Equal)
        }
        (Some(Value::String(x)), Some(Value::String(y))) => x.cmp(y),
        (Some(Value::Bool(x)), Some(Value::Bool(y))) => x.cmp(y),
        _ => rank(a).cmp(&rank(b)),
    }
}

/// Run-once write operations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Mutation {
    /// Stores a document, assigning an `id` when it has none.
    Insert { table: String, document: Value },
    /// Creates a table if it does not exist yet.
    TableCreate { table: String },
}

impl Mutation {
    pub fn insert(table: impl Into<String>, document: Value) -> Self {
        Mutation::Insert {
            table: table.into(),
            document,
        }
    }

    pub fn table_create(table: impl Into<String>) -> Self {
        Mutation::TableCreate {
            table: table.into(),
        }
    }

    pub fn table(&self) -> &str {
        match self {
            Mutation::Insert { table, .. } | Mutation::TableCreate { table } => table,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn values() -> Vec<Value> {
        vec![
            json!({"id": "v3", "variable": "cpu", "timestamp": 30, "value": 0.3}),
            json!({"id": "v1", "variable": "cpu", "timestamp": 10, "value": 0.1}),
            json!({"id": "v2", "variable": "ram", "timestamp": 20, "value": 512}),
            json!({"id": "v4", "variable": "gone", "timestamp": 5, "value": 1}),
        ]
    }

    fn variables() -> Vec<Value> {
        vec![
            json!({"id": "cpu", "name": "CPU", "namespace": "host"}),
            json!({"id": "ram", "name": "RAM", "namespace": "host"}),
        ]
    }

    fn ids(rows: &[Value]) -> Vec<&str> {
        rows.iter().map(|r| r["id"].as_str().unwrap()).collect()
    }

    #[test]
    fn test_plain_table_keeps_insertion_order() {
        let result = Query::table("values").evaluate(&values(), &[]);
        assert_eq!(ids(&result), vec!["v3", "v1", "v2", "v4"]);
    }

    #[test]
    fn test_filter_on_equality() {
        let query = Query::table("values").filter("variable", "cpu");
        assert_eq!(ids(&query.evaluate(&values(), &[])), vec!["v3", "v1"]);
    }

    #[test]
    fn test_eq_join_drops_orphans_and_orders() {
        let query = Query::table("values")
            .eq_join("variable", "variables")
            .order_by("timestamp");
        let result = query.evaluate(&values(), &variables());
        assert_eq!(ids(&result), vec!["v1", "v2", "v3"]);
        // Rows stay the left side of the join.
        assert_eq!(result[0]["value"], json!(0.1));
    }

    #[test]
    fn test_chart_query_shape() {
        let query = Query::table("values")
            .eq_join("variable", "variables")
            .filter("variable", "cpu")
            .order_by("timestamp");
        assert_eq!(ids(&query.evaluate(&values(), &variables())), vec!["v1", "v3"]);
        assert_eq!(query.tables(), vec!["values", "variables"]);
    }

    #[test]
    fn test_mixed_types_order() {
        let mut rows = vec![
            json!({"k": "b"}),
            json!({}),
            json!({"k": 2}),
            json!({"k": "a"}),
            json!({"k": 1.5}),
        ];
        rows.sort_by(|a, b| compare_fields(a.get("k"), b.get("k")));
        assert_eq!(
            rows,
            vec![
                json!({"k": 1.5}),
                json!({"k": 2}),
                json!({"k": "a"}),
                json!({"k": "b"}),
                json!({}),
            ]
        );
    }

    #[test]
    fn test_query_wire_shape() {
        let query = Query::table("variables").filter("namespace", "host");
        let json = serde_json::to_value(&query).unwrap();
        assert_eq!(json, json!({"table": "variables", "filter": {"namespace": "host"}}));
        let back: Query = serde_json::from_value(json).unwrap();
        assert_eq!(back, query);
    }

    #[test]
    fn test_mutation_tagging() {
        let mutation = Mutation::insert("turtles", json!({"name": "Leo"}));
        assert_eq!(
            serde_json::to_value(&mutation).unwrap(),
            json!({"kind": "insert", "table": "turtles", "document": {"name": "Leo"}})
        );
        assert_eq!(Mutation::table_create("monitors").table(), "monitors");
    }
}
