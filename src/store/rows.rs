//! Row operations over entity tables
//!
//! Rows cross the boundary as JSON objects (column name → value), the
//! same shape the model boundary uses. The id column is resolved by
//! trying a fixed preference order of conventional spellings; operations
//! that need one fail if the table has none.

use rusqlite::Connection;
use rusqlite::types::{Value, ValueRef};
use serde_json::{Map, Value as JsonValue};
use uuid::Uuid;

use super::reconcile::table_columns;
use super::{EntityStore, StoreError};

/// A row as a JSON object in column order.
pub type Row = Map<String, JsonValue>;

/// Conventional id-column spellings, in preference order.
const ID_COLUMNS: &[&str] = &["Id", "id", "ID"];

impl EntityStore {
    /// All rows of an entity table. An absent database is an empty
    /// result, not an error.
    pub fn get_all(&self, entity_name: &str) -> Result<Vec<Row>, StoreError> {
        if !self.db_path(entity_name).exists() {
            return Ok(Vec::new());
        }
        let conn = self.open(entity_name)?;
        let mut stmt = conn.prepare(&format!(r#"SELECT * FROM "{entity_name}""#))?;
        let columns: Vec<String> = stmt.column_names().iter().map(|s| s.to_string()).collect();
        let mut rows = stmt.query([])?;
        let mut out = Vec::new();
        while let Some(row) = rows.next()? {
            let mut object = Row::new();
            for (i, name) in columns.iter().enumerate() {
                object.insert(name.clone(), json_cell(row.get_ref(i)?));
            }
            out.push(object);
        }
        Ok(out)
    }

    /// A single row by id, `None` when no row matches.
    pub fn get_by_id(&self, entity_name: &str, id: &str) -> Result<Option<Row>, StoreError> {
        let conn = self.open(entity_name)?;
        let id_col = id_column(&conn, entity_name)?;
        let mut stmt = conn.prepare(&format!(
            r#"SELECT * FROM "{entity_name}" WHERE "{id_col}" = ?1"#
        ))?;
        let columns: Vec<String> = stmt.column_names().iter().map(|s| s.to_string()).collect();
        let mut rows = stmt.query([id])?;
        match rows.next()? {
            Some(row) => {
                let mut object = Row::new();
                for (i, name) in columns.iter().enumerate() {
                    object.insert(name.clone(), json_cell(row.get_ref(i)?));
                }
                Ok(Some(object))
            }
            None => Ok(None),
        }
    }

    /// Insert a row. A present-but-blank `Id` is filled with a fresh
    /// UUID; the stored row is returned.
    pub fn insert(&self, entity_name: &str, mut data: Row) -> Result<Row, StoreError> {
        let blank_id = match data.get("Id") {
            Some(JsonValue::Null) => true,
            Some(JsonValue::String(s)) => s.is_empty(),
            _ => false,
        };
        if blank_id {
            data.insert(
                "Id".to_string(),
                JsonValue::String(Uuid::new_v4().to_string()),
            );
        }

        let conn = self.open(entity_name)?;
        let names: Vec<&str> = data.keys().map(String::as_str).collect();
        let cols = names
            .iter()
            .map(|n| format!(r#""{n}""#))
            .collect::<Vec<_>>()
            .join(", ");
        let placeholders = vec!["?"; names.len()].join(", ");
        let values: Vec<Value> = data.values().map(to_sql_value).collect();
        conn.execute(
            &format!(r#"INSERT INTO "{entity_name}" ({cols}) VALUES ({placeholders})"#),
            rusqlite::params_from_iter(values),
        )?;
        Ok(data)
    }

    /// Update a row's columns by id. Returns whether a row matched.
    pub fn update(&self, entity_name: &str, id: &str, data: &Row) -> Result<bool, StoreError> {
        if data.is_empty() {
            return Ok(false);
        }
        let conn = self.open(entity_name)?;
        let id_col = id_column(&conn, entity_name)?;
        let assignments = data
            .keys()
            .map(|k| format!(r#""{k}" = ?"#))
            .collect::<Vec<_>>()
            .join(", ");
        let mut values: Vec<Value> = data.values().map(to_sql_value).collect();
        values.push(Value::Text(id.to_string()));
        let changed = conn.execute(
            &format!(r#"UPDATE "{entity_name}" SET {assignments} WHERE "{id_col}" = ?"#),
            rusqlite::params_from_iter(values),
        )?;
        Ok(changed > 0)
    }

    /// Delete a row by id. Returns whether a row matched.
    pub fn delete(&self, entity_name: &str, id: &str) -> Result<bool, StoreError> {
        let conn = self.open(entity_name)?;
        let id_col = id_column(&conn, entity_name)?;
        let changed = conn.execute(
            &format!(r#"DELETE FROM "{entity_name}" WHERE "{id_col}" = ?1"#),
            [id],
        )?;
        Ok(changed > 0)
    }
}

/// Resolve the table's id column: first conventional spelling that
/// exists wins.
fn id_column(conn: &Connection, table: &str) -> Result<String, StoreError> {
    let columns = table_columns(conn, table)?;
    ID_COLUMNS
        .iter()
        .find(|candidate| columns.contains_key(**candidate))
        .map(|c| c.to_string())
        .ok_or_else(|| StoreError::NoIdColumn(table.to_string()))
}

/// JSON value → SQLite parameter.
pub(crate) fn to_sql_value(value: &JsonValue) -> Value {
    match value {
        JsonValue::Null => Value::Null,
        JsonValue::Bool(b) => Value::Integer(*b as i64),
        JsonValue::Number(n) => match n.as_i64() {
            Some(i) => Value::Integer(i),
            None => Value::Real(n.as_f64().unwrap_or(0.0)),
        },
        JsonValue::String(s) => Value::Text(s.clone()),
        // arrays/objects store as their JSON text
        other => Value::Text(other.to_string()),
    }
}

/// SQLite cell → JSON value.
fn json_cell(value: ValueRef<'_>) -> JsonValue {
    match value {
        ValueRef::Null => JsonValue::Null,
        ValueRef::Integer(i) => JsonValue::from(i),
        ValueRef::Real(f) => serde_json::Number::from_f64(f)
            .map(JsonValue::Number)
            .unwrap_or(JsonValue::Null),
        ValueRef::Text(t) => JsonValue::String(String::from_utf8_lossy(t).into_owned()),
        ValueRef::Blob(b) => JsonValue::Array(b.iter().map(|byte| JsonValue::from(*byte)).collect()),
    }
}
