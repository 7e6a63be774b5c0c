//! Schema reconciliation: Entity model → table-definition actions
//!
//! Three paths, decided per call:
//! - **create**: no table yet — one column per property in property
//!   order, then seed synthetic rows;
//! - **additive migrate**: model only adds columns — `ALTER TABLE ... ADD
//!   COLUMN`, no data rewrite;
//! - **rebuild migrate**: *any* stored column is absent from the model —
//!   shadow table, selective copy, drop, rename. SQLite cannot drop a
//!   column in place, so a removal always takes this path, even when
//!   other columns were simultaneously added.
//!
//! Reconciling an unchanged model issues no statements and leaves row
//! identity and data untouched.

use indexmap::IndexMap;
use serde::Serialize;

use super::mapping::sqlite_type;
use super::seed::RowSynthesizer;
use super::{EntityStore, SEED_ROW_COUNT, StoreError};
use crate::model::Entity;

/// What a reconcile call did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ReconcileAction {
    Created,
    Migrated,
    Unchanged,
}

/// Reconcile outcome: the action taken and the column deltas.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReconcileReport {
    pub action: ReconcileAction,
    pub added: Vec<String>,
    pub removed: Vec<String>,
}

impl EntityStore {
    /// Create the entity's table, or migrate it to match the model.
    pub fn create_or_migrate(
        &self,
        entity: &Entity,
        synthesizer: &dyn RowSynthesizer,
    ) -> Result<ReconcileReport, StoreError> {
        let conn = self.open(&entity.name)?;
        let table = entity.name.as_str();

        let model_cols: IndexMap<&str, &'static str> = entity
            .properties
            .iter()
            .map(|p| (p.name.as_str(), sqlite_type(&p.ty)))
            .collect();

        if !table_exists(&conn, table)? {
            conn.execute(&create_table_sql(table, &model_cols), [])?;
            drop(conn);
            let seeded = self.seed_table(entity, synthesizer, SEED_ROW_COUNT)?;
            tracing::debug!(entity = table, rows = seeded, "table created");
            return Ok(ReconcileReport {
                action: ReconcileAction::Created,
                added: Vec::new(),
                removed: Vec::new(),
            });
        }

        let existing = table_columns(&conn, table)?;
        let added: Vec<String> = model_cols
            .keys()
            .filter(|name| !existing.contains_key(**name))
            .map(|name| name.to_string())
            .collect();
        let removed: Vec<String> = existing
            .keys()
            .filter(|name| !model_cols.contains_key(name.as_str()))
            .cloned()
            .collect();

        if !removed.is_empty() {
            // A removal forces the rebuild path even when columns were
            // simultaneously added: shadow table, copy the intersection,
            // drop the old table, rename the shadow into place.
            let shadow = format!("{table}__new");
            conn.execute(&create_table_sql(&shadow, &model_cols), [])?;
            let surviving: Vec<&str> = model_cols
                .keys()
                .copied()
                .filter(|name| existing.contains_key(*name))
                .collect();
            if !surviving.is_empty() {
                let cols = quoted_list(&surviving);
                conn.execute(
                    &format!(r#"INSERT INTO "{shadow}" ({cols}) SELECT {cols} FROM "{table}""#),
                    [],
                )?;
            }
            conn.execute(&format!(r#"DROP TABLE "{table}""#), [])?;
            conn.execute(
                &format!(r#"ALTER TABLE "{shadow}" RENAME TO "{table}""#),
                [],
            )?;
            tracing::debug!(entity = table, ?added, ?removed, "table rebuilt");
        } else if !added.is_empty() {
            for name in &added {
                let col_type = model_cols[name.as_str()];
                conn.execute(
                    &format!(r#"ALTER TABLE "{table}" ADD COLUMN "{name}" {col_type}"#),
                    [],
                )?;
            }
            tracing::debug!(entity = table, ?added, "columns added");
        }

        let action = if added.is_empty() && removed.is_empty() {
            ReconcileAction::Unchanged
        } else {
            ReconcileAction::Migrated
        };
        Ok(ReconcileReport {
            action,
            added,
            removed,
        })
    }

    /// Clear the table and insert `count` synthesized rows.
    ///
    /// Row failures are non-fatal: a value the column rejects skips that
    /// row and the batch continues.
    pub fn seed_table(
        &self,
        entity: &Entity,
        synthesizer: &dyn RowSynthesizer,
        count: usize,
    ) -> Result<usize, StoreError> {
        if entity.properties.is_empty() {
            return Ok(0);
        }
        let conn = self.open(&entity.name)?;
        let table = entity.name.as_str();
        conn.execute(&format!(r#"DELETE FROM "{table}""#), [])?;

        let names: Vec<&str> = entity.properties.iter().map(|p| p.name.as_str()).collect();
        let cols = quoted_list(&names);
        let placeholders = vec!["?"; names.len()].join(", ");
        let sql = format!(r#"INSERT INTO "{table}" ({cols}) VALUES ({placeholders})"#);
        let mut stmt = conn.prepare(&sql)?;

        let mut inserted = 0usize;
        for index in 0..count {
            let values: Vec<rusqlite::types::Value> = entity
                .properties
                .iter()
                .map(|p| super::rows::to_sql_value(&synthesizer.value(&entity.name, p, index)))
                .collect();
            match stmt.execute(rusqlite::params_from_iter(values)) {
                Ok(_) => inserted += 1,
                Err(err) => {
                    tracing::debug!(entity = table, index, %err, "seed row skipped");
                }
            }
        }
        Ok(inserted)
    }

    /// Re-seed an entity table with fresh synthetic rows.
    pub fn reseed(
        &self,
        entity: &Entity,
        synthesizer: &dyn RowSynthesizer,
    ) -> Result<usize, StoreError> {
        self.seed_table(entity, synthesizer, SEED_ROW_COUNT)
    }

    /// The stored `CREATE TABLE` SQL for an entity, empty if absent.
    pub fn schema_sql(&self, entity_name: &str) -> Result<String, StoreError> {
        if !self.db_path(entity_name).exists() {
            return Ok(String::new());
        }
        let conn = self.open(entity_name)?;
        let mut stmt =
            conn.prepare("SELECT sql FROM sqlite_master WHERE type='table' AND name=?1")?;
        let mut rows = stmt.query([entity_name])?;
        match rows.next()? {
            Some(row) => Ok(row.get::<_, Option<String>>(0)?.unwrap_or_default()),
            None => Ok(String::new()),
        }
    }
}

fn table_exists(conn: &rusqlite::Connection, table: &str) -> Result<bool, StoreError> {
    let mut stmt =
        conn.prepare("SELECT name FROM sqlite_master WHERE type='table' AND name=?1")?;
    Ok(stmt.exists([table])?)
}

/// Stored columns in definition order, name → declared type.
pub(crate) fn table_columns(
    conn: &rusqlite::Connection,
    table: &str,
) -> Result<IndexMap<String, String>, StoreError> {
    let mut stmt = conn.prepare(&format!(r#"PRAGMA table_info("{table}")"#))?;
    let mut cols = IndexMap::new();
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let name: String = row.get("name")?;
        let ty: String = row.get("type")?;
        cols.insert(name, ty);
    }
    Ok(cols)
}

fn create_table_sql(table: &str, cols: &IndexMap<&str, &'static str>) -> String {
    let defs: Vec<String> = cols
        .iter()
        .map(|(name, ty)| format!(r#"    "{name}" {ty}"#))
        .collect();
    format!("CREATE TABLE \"{table}\" (\n{}\n)", defs.join(",\n"))
}

fn quoted_list(names: &[&str]) -> String {
    names
        .iter()
        .map(|n| format!(r#""{n}""#))
        .collect::<Vec<_>>()
        .join(", ")
}
