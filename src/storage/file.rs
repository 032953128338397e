//! JSON document backend
//!
//! Layout on disk: one `schema.json` registry document plus one
//! `<table>.json` row-collection document per table, all under the
//! configured data directory. Table names reach this layer as lexer
//! identifiers, so they are safe to use as file stems.

use super::Store;
use crate::config::DbConfig;
use crate::error::{DbError, Result};
use crate::types::{Registry, Row};
use std::fs;
use std::path::{Path, PathBuf};

const SCHEMA_FILE: &str = "schema.json";

/// File-backed `Store` persisting flat JSON documents.
pub struct JsonFileStore {
    data_dir: PathBuf,
    pretty: bool,
}

impl JsonFileStore {
    /// Open (creating the data directory if needed) a store at the
    /// configured location.
    pub fn open(config: &DbConfig) -> Result<Self> {
        fs::create_dir_all(&config.data_dir)?;
        Ok(Self {
            data_dir: config.data_dir.clone(),
            pretty: config.pretty_json,
        })
    }

    fn schema_path(&self) -> PathBuf {
        self.data_dir.join(SCHEMA_FILE)
    }

    fn table_path(&self, name: &str) -> PathBuf {
        self.data_dir.join(format!("{}.json", name))
    }

    /// Write to a sibling temp file, then rename over the target, so a
    /// concurrent reader never observes a partially written document.
    fn write_document<T: serde::Serialize>(&self, path: &Path, value: &T) -> Result<()> {
        let data = if self.pretty {
            serde_json::to_vec_pretty(value)?
        } else {
            serde_json::to_vec(value)?
        };
        let tmp = path.with_extension("tmp");
        fs::write(&tmp, &data)?;
        fs::rename(&tmp, path)?;
        Ok(())
    }
}

impl Store for JsonFileStore {
    fn load_schema(&self) -> Result<Registry> {
        let path = self.schema_path();
        if !path.exists() {
            // First run: no registry document yet.
            return Ok(Registry::new());
        }
        let data = fs::read(&path)?;
        Ok(serde_json::from_slice(&data)?)
    }

    fn save_schema(&self, registry: &Registry) -> Result<()> {
        self.write_document(&self.schema_path(), registry)
    }

    fn create_table(&self, name: &str) -> Result<()> {
        self.write_document(&self.table_path(name), &Vec::<Row>::new())
    }

    fn load_table(&self, name: &str) -> Result<Vec<Row>> {
        let path = self.table_path(name);
        if !path.exists() {
            return Err(DbError::TableNotFound(name.to_string()));
        }
        let data = fs::read(&path)?;
        Ok(serde_json::from_slice(&data)?)
    }

    fn save_table(&self, name: &str, rows: &[Row]) -> Result<()> {
        self.write_document(&self.table_path(name), &rows)
    }

    fn drop_table(&self, name: &str) -> Result<()> {
        let path = self.table_path(name);
        if path.exists() {
            fs::remove_file(path)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ColumnDef, TableDef, Value};

    fn open_store(dir: &Path) -> JsonFileStore {
        JsonFileStore::open(&DbConfig::with_data_dir(dir)).unwrap()
    }

    #[test]
    fn test_first_run_empty_registry() {
        let dir = tempfile::tempdir().unwrap();
        let store = open_store(dir.path());
        assert!(store.load_schema().unwrap().is_empty());
    }

    #[test]
    fn test_schema_persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let mut registry = Registry::new();
        registry.insert(
            "users".to_string(),
            TableDef {
                columns: vec![
                    ColumnDef::new("id", "NUMBER"),
                    ColumnDef::new("name", "TEXT"),
                ],
            },
        );

        open_store(dir.path()).save_schema(&registry).unwrap();
        let reopened = open_store(dir.path());
        assert_eq!(reopened.load_schema().unwrap(), registry);
    }

    #[test]
    fn test_table_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = open_store(dir.path());
        store.create_table("users").unwrap();
        assert!(store.load_table("users").unwrap().is_empty());

        let mut row = Row::new();
        row.insert("id".to_string(), Value::Integer(1));
        row.insert("name".to_string(), Value::Text("Ann".to_string()));
        store.save_table("users", &[row.clone()]).unwrap();
        assert_eq!(store.load_table("users").unwrap(), vec![row]);
    }

    #[test]
    fn test_missing_table() {
        let dir = tempfile::tempdir().unwrap();
        let store = open_store(dir.path());
        assert!(matches!(
            store.load_table("ghost"),
            Err(DbError::TableNotFound(name)) if name == "ghost"
        ));
    }

    #[test]
    fn test_drop_table_removes_document() {
        let dir = tempfile::tempdir().unwrap();
        let store = open_store(dir.path());
        store.create_table("t").unwrap();
        store.drop_table("t").unwrap();
        assert!(store.load_table("t").is_err());
        // Dropping again is not an error at the storage layer.
        store.drop_table("t").unwrap();
    }

    #[test]
    fn test_documents_are_plain_json() {
        let dir = tempfile::tempdir().unwrap();
        let store = open_store(dir.path());
        store.create_table("t").unwrap();

        let mut row = Row::new();
        row.insert("id".to_string(), Value::Integer(7));
        store.save_table("t", &[row]).unwrap();

        let raw = fs::read_to_string(dir.path().join("t.json")).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(parsed[0]["id"], serde_json::json!(7));
    }
}
