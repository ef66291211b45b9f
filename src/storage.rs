//! ==============================================================================
//! storage.rs - append-only sqlite log of light readings
//! ==============================================================================
//!
//! purpose:
//!     owns the single `light_readings` table. every call opens its own
//!     connection and drops it on return: no pool, no transaction spanning
//!     calls. sqlite serializes concurrent single-statement writers.
//!
//! relationships:
//!     - used by: server.rs (ingest/query/stats handlers), main.rs (startup init)
//!     - errors: error.rs (StorageError)
//!
//! calls here are blocking; async callers go through the `*_blocking`
//! wrappers which hop onto tokio's blocking pool.
//!
//! ==============================================================================

use crate::domain::Reading;
use crate::error::StorageError;

use rusqlite::{params, Connection};
use std::path::{Path, PathBuf};

const SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS light_readings (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        light_value REAL NOT NULL,
        timestamp TEXT NOT NULL
    )";

/// handle to the readings database file. cheap to clone, holds only the path.
#[derive(Clone, Debug)]
pub struct Storage {
    path: PathBuf,
}

impl Storage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn connect(&self) -> Result<Connection, StorageError> {
        Ok(Connection::open(&self.path)?)
    }

    /// create the table (and the file, and its parent directory) if missing.
    /// safe to call any number of times.
    pub fn ensure_schema(&self) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let conn = self.connect()?;
        conn.execute(SCHEMA, [])?;
        Ok(())
    }

    /// insert one reading, returning its id
    pub fn append(&self, light_value: f64, timestamp: &str) -> Result<i64, StorageError> {
        let conn = self.connect()?;
        conn.execute(
            "INSERT INTO light_readings (light_value, timestamp) VALUES (?1, ?2)",
            params![light_value, timestamp],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// every reading, ascending by timestamp text; same-minute rows keep insert order
    pub fn list_all(&self) -> Result<Vec<Reading>, StorageError> {
        let conn = self.connect()?;
        let mut stmt = conn.prepare(
            "SELECT id, light_value, timestamp FROM light_readings ORDER BY timestamp ASC, id ASC",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok(Reading { id: row.get(0)?, light_value: row.get(1)?, timestamp: row.get(2)? })
        })?;
        let readings = rows.collect::<Result<Vec<_>, _>>()?;
        Ok(readings)
    }

    pub fn count(&self) -> Result<u64, StorageError> {
        let conn = self.connect()?;
        let n: i64 = conn.query_row("SELECT COUNT(*) FROM light_readings", [], |row| row.get(0))?;
        Ok(n as u64)
    }

    // ==========================================================================
    // async wrappers - offload blocking sqlite io to a dedicated thread
    // ==========================================================================

    pub async fn ensure_schema_blocking(&self) -> Result<(), StorageError> {
        let storage = self.clone();
        tokio::task::spawn_blocking(move || storage.ensure_schema()).await?
    }

    pub async fn append_blocking(&self, light_value: f64, timestamp: String) -> Result<i64, StorageError> {
        let storage = self.clone();
        tokio::task::spawn_blocking(move || storage.append(light_value, &timestamp)).await?
    }

    pub async fn list_all_blocking(&self) -> Result<Vec<Reading>, StorageError> {
        let storage = self.clone();
        tokio::task::spawn_blocking(move || storage.list_all()).await?
    }
}

// ==============================================================================
// tests
// ==============================================================================
#[cfg(test)]
mod tests {
    use super::*;

    fn temp_storage() -> (tempfile::TempDir, Storage) {
        let dir = tempfile::tempdir().unwrap();
        let storage = Storage::new(dir.path().join("light_sensor.db"));
        (dir, storage)
    }

    #[test]
    fn test_ensure_schema_is_idempotent() {
        let (_dir, storage) = temp_storage();
        for _ in 0..5 {
            storage.ensure_schema().unwrap();
        }
        assert!(storage.path().exists());
        assert_eq!(storage.count().unwrap(), 0);
    }

    #[test]
    fn test_ensure_schema_keeps_existing_rows() {
        let (_dir, storage) = temp_storage();
        storage.ensure_schema().unwrap();
        storage.append(1.0, "01/01 00:00").unwrap();
        storage.ensure_schema().unwrap();
        assert_eq!(storage.count().unwrap(), 1);
    }

    #[test]
    fn test_ensure_schema_creates_parent_dir() {
        let dir = tempfile::tempdir().unwrap();
        let storage = Storage::new(dir.path().join("nested").join("data").join("readings.db"));
        storage.ensure_schema().unwrap();
        assert!(storage.path().exists());
    }

    #[test]
    fn test_empty_store_lists_nothing() {
        let (_dir, storage) = temp_storage();
        storage.ensure_schema().unwrap();
        assert!(storage.list_all().unwrap().is_empty());
    }

    #[test]
    fn test_append_assigns_sequential_ids() {
        let (_dir, storage) = temp_storage();
        storage.ensure_schema().unwrap();
        let a = storage.append(10.0, "05/01 12:00").unwrap();
        let b = storage.append(20.0, "05/01 12:01").unwrap();
        assert!(b > a);
    }

    #[test]
    fn test_list_orders_by_timestamp_text_then_id() {
        let (_dir, storage) = temp_storage();
        storage.ensure_schema().unwrap();
        storage.append(3.0, "12/31 23:59").unwrap();
        storage.append(1.0, "01/01 00:00").unwrap();
        storage.append(2.0, "06/15 08:30").unwrap();
        storage.append(2.5, "06/15 08:30").unwrap();

        let readings = storage.list_all().unwrap();
        let labels: Vec<_> = readings.iter().map(|r| r.timestamp.as_str()).collect();
        assert_eq!(labels, ["01/01 00:00", "06/15 08:30", "06/15 08:30", "12/31 23:59"]);

        let values: Vec<_> = readings.iter().map(|r| r.light_value).collect();
        assert_eq!(values, [1.0, 2.0, 2.5, 3.0]);
    }

    #[test]
    fn test_value_round_trips_exactly() {
        let (_dir, storage) = temp_storage();
        storage.ensure_schema().unwrap();
        storage.append(23.5, "07/04 10:10").unwrap();
        storage.append(0.1 + 0.2, "07/04 10:11").unwrap();

        let readings = storage.list_all().unwrap();
        assert_eq!(readings[0].light_value, 23.5);
        assert_eq!(readings[1].light_value, 0.1 + 0.2);
    }

    #[test]
    fn test_append_without_schema_is_operational_error() {
        let (_dir, storage) = temp_storage();
        let err = storage.append(1.0, "01/01 00:00").unwrap_err();
        assert!(err.is_operational());
        assert_eq!(err.to_string(), "no such table: light_readings");
    }

    #[tokio::test]
    async fn test_blocking_wrappers() {
        let (_dir, storage) = temp_storage();
        storage.ensure_schema_blocking().await.unwrap();
        let id = storage.append_blocking(42.0, "02/02 02:02".to_string()).await.unwrap();
        let readings = storage.list_all_blocking().await.unwrap();
        assert_eq!(readings, vec![Reading { id, light_value: 42.0, timestamp: "02/02 02:02".into() }]);
    }
}
