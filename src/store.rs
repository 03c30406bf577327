//! DuckDB-backed store
//!
//! Owns the database connection, bootstraps the target table, writes batches
//! inside explicit transactions, and serves the grouped age count query for
//! the read side.

use crate::batch::BatchSink;
use crate::config::DatabaseConfig;
use crate::error::Result;
use crate::record::NormalizedRow;
use duckdb::types::ToSql;
use duckdb::Connection;
use serde_json::Value;
use std::sync::{Mutex, PoisonError};

/// Persistence handle for one target table.
///
/// The connection sits behind a mutex: every operation acquires it, runs, and
/// releases it on all exit paths. The handle is shared (`Arc<Store>` under
/// the server); concurrent runs against the same table serialize on the
/// connection and are otherwise uncoordinated.
pub struct Store {
    conn: Mutex<Connection>,
    table: String,
}

impl Store {
    /// Open (or create) the database at the configured path and bootstrap
    /// the target table.
    pub fn open(config: &DatabaseConfig) -> Result<Self> {
        let conn = if config.path == ":memory:" {
            Connection::open_in_memory()?
        } else {
            Connection::open(&config.path)?
        };
        let store = Self {
            conn: Mutex::new(conn),
            table: config.table.clone(),
        };
        store.ensure_table()?;
        tracing::info!(path = %config.path, table = %config.table, "store ready");
        Ok(store)
    }

    /// In-memory store with the default table name
    pub fn in_memory() -> Result<Self> {
        Self::open(&DatabaseConfig::default())
    }

    fn ensure_table(&self) -> Result<()> {
        let conn = self.lock();
        conn.execute_batch(&format!(
            "CREATE TABLE IF NOT EXISTS {} (
                name TEXT NOT NULL,
                age INTEGER NOT NULL,
                address JSON,
                additional_info JSON
            );",
            self.table
        ))?;
        Ok(())
    }

    /// Insert one batch as a single multi-row parameterized statement inside
    /// an explicit transaction. Any failure rolls the whole batch back and
    /// propagates; batches committed earlier stay committed.
    pub fn insert_batch(&self, rows: &[NormalizedRow]) -> Result<()> {
        if rows.is_empty() {
            return Ok(());
        }

        let mut conn = self.lock();
        let tx = conn.transaction()?;

        let placeholders = vec!["(?, ?, ?, ?)"; rows.len()].join(", ");
        let sql = format!(
            "INSERT INTO {} (name, age, address, additional_info) VALUES {placeholders}",
            self.table
        );

        let mut values: Vec<Box<dyn ToSql>> = Vec::with_capacity(rows.len() * 4);
        for row in rows {
            values.push(Box::new(row.name.clone()));
            values.push(Box::new(row.age));
            values.push(Box::new(row.address.as_ref().map(Value::to_string)));
            values.push(Box::new(row.additional_info.as_ref().map(Value::to_string)));
        }
        let params: Vec<&dyn ToSql> = values.iter().map(AsRef::as_ref).collect();

        tx.execute(&sql, &params[..])?;
        tx.commit()?;

        tracing::debug!(rows = rows.len(), "batch committed");
        Ok(())
    }

    /// Total persisted rows
    pub fn count(&self) -> Result<u64> {
        let conn = self.lock();
        let total: i64 = conn.query_row(
            &format!("SELECT COUNT(*) FROM {}", self.table),
            [],
            |row| row.get(0),
        )?;
        Ok(total as u64)
    }

    /// Grouped count per exact age value, the aggregation reader's input
    pub fn age_counts(&self) -> Result<Vec<(i64, u64)>> {
        let conn = self.lock();
        let mut stmt = conn.prepare(&format!(
            "SELECT age, COUNT(*) FROM {} GROUP BY age",
            self.table
        ))?;
        let counts = stmt
            .query_map([], |row| {
                let age: i64 = row.get(0)?;
                let count: i64 = row.get(1)?;
                Ok((age, count as u64))
            })?
            .collect::<std::result::Result<Vec<_>, duckdb::Error>>()?;
        Ok(counts)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl BatchSink for Store {
    fn write(&self, rows: &[NormalizedRow]) -> Result<()> {
        self.insert_batch(rows)
    }
}
