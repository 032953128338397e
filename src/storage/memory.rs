//! In-memory backend for tests and embedding

use super::Store;
use crate::error::{DbError, Result};
use crate::types::{Registry, Row};
use ahash::AHashMap;
use parking_lot::RwLock;

/// Volatile `Store` holding everything in process memory. Useful for unit
/// tests and for embedders that do not need durability.
#[derive(Default)]
pub struct MemoryStore {
    schema: RwLock<Registry>,
    tables: RwLock<AHashMap<String, Vec<Row>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Store for MemoryStore {
    fn load_schema(&self) -> Result<Registry> {
        Ok(self.schema.read().clone())
    }

    fn save_schema(&self, registry: &Registry) -> Result<()> {
        *self.schema.write() = registry.clone();
        Ok(())
    }

    fn create_table(&self, name: &str) -> Result<()> {
        self.tables.write().insert(name.to_string(), Vec::new());
        Ok(())
    }

    fn load_table(&self, name: &str) -> Result<Vec<Row>> {
        self.tables
            .read()
            .get(name)
            .cloned()
            .ok_or_else(|| DbError::TableNotFound(name.to_string()))
    }

    fn save_table(&self, name: &str, rows: &[Row]) -> Result<()> {
        self.tables.write().insert(name.to_string(), rows.to_vec());
        Ok(())
    }

    fn drop_table(&self, name: &str) -> Result<()> {
        self.tables.write().remove(name);
        Ok(())
    }
}
