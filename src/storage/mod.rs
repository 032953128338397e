//! Persistence layer: the `Store` seam and its backends
//!
//! Storage and schema are two independently addressable durable resources:
//! a registry document mapping table names to column definitions, and one
//! row-collection document per table. The executor injects a `Store`
//! implementation rather than reaching for a module-level singleton.

mod file;
mod memory;

pub use file::JsonFileStore;
pub use memory::MemoryStore;

use crate::error::Result;
use crate::types::{Registry, Row};

/// Durable mapping from table name to its ordered row collection, plus the
/// schema registry. Implementations are internally consistent per call;
/// the executor serializes whole load-mutate-save sequences on top.
pub trait Store: Send + Sync {
    /// Read the registry. An empty registry on first run.
    fn load_schema(&self) -> Result<Registry>;

    /// Overwrite the registry, atomically from the caller's perspective.
    fn save_schema(&self, registry: &Registry) -> Result<()>;

    /// Materialize an empty row collection for `name`. Side effect only;
    /// the registry is untouched.
    fn create_table(&self, name: &str) -> Result<()>;

    /// Load all rows of `name`. `TableNotFound` if never materialized.
    fn load_table(&self, name: &str) -> Result<Vec<Row>>;

    /// Overwrite the row collection of `name`.
    fn save_table(&self, name: &str, rows: &[Row]) -> Result<()>;

    /// Remove the row collection of `name`, if present.
    fn drop_table(&self, name: &str) -> Result<()>;
}
