//! Statement interpreter - executes parsed statements against a `Store`
//!
//! Each statement reloads from the store, computes the new state in memory,
//! and saves back; no state is cached across calls. Per-table mutexes
//! serialize every load-mutate-save sequence, and a schema-level mutex
//! serializes registry mutations, so concurrent callers through one shared
//! executor cannot lose updates.

use super::ast::*;
use super::lexer::Lexer;
use super::parser::Parser;
use crate::error::{DbError, Result};
use crate::storage::Store;
use crate::types::{ColumnDef, Row, TableDef};
use ahash::AHashMap;
use parking_lot::Mutex;
use std::sync::Arc;

/// Result of one executed statement.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryResult {
    /// SELECT result: surviving rows, projected
    Select { rows: Vec<Row> },

    /// INSERT/UPDATE/DELETE result
    Modification {
        affected_rows: usize,
        message: String,
    },

    /// CREATE/DROP result
    Definition { message: String },

    /// SHOW TABLES result, registry iteration order
    Tables { names: Vec<String> },

    /// DESCRIBE result: the table's ordered column definitions
    Schema { columns: Vec<ColumnDef> },
}

impl QueryResult {
    pub fn affected_rows(&self) -> usize {
        match self {
            QueryResult::Modification { affected_rows, .. } => *affected_rows,
            _ => 0,
        }
    }

    /// Rows of a SELECT result, `None` otherwise.
    pub fn rows(&self) -> Option<&[Row]> {
        match self {
            QueryResult::Select { rows } => Some(rows),
            _ => None,
        }
    }
}

/// The statement interpreter, generic over its storage backend.
pub struct QueryExecutor<S: Store> {
    store: S,

    /// One mutex per table name serializes that table's write sequences.
    table_locks: Mutex<AHashMap<String, Arc<Mutex<()>>>>,

    /// Guards registry mutations (CREATE TABLE, DROP TABLE).
    schema_lock: Mutex<()>,
}

impl<S: Store> QueryExecutor<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            table_locks: Mutex::new(AHashMap::new()),
            schema_lock: Mutex::new(()),
        }
    }

    /// Parse and execute one SQL statement. The single call contract every
    /// surrounding layer (console, embedder) goes through.
    pub fn execute(&self, sql: &str) -> Result<QueryResult> {
        let tokens = Lexer::new(sql).tokenize()?;
        let statement = Parser::new(tokens).parse()?;
        self.execute_statement(statement)
    }

    /// Execute an already-parsed statement.
    pub fn execute_statement(&self, statement: Statement) -> Result<QueryResult> {
        match statement {
            Statement::CreateTable(stmt) => self.create_table(stmt),
            Statement::Insert(stmt) => self.insert(stmt),
            Statement::Select(stmt) => self.select(stmt),
            Statement::Update(stmt) => self.update(stmt),
            Statement::Delete(stmt) => self.delete(stmt),
            Statement::DropTable { table } => self.drop_table(&table),
            Statement::ShowTables => self.show_tables(),
            Statement::Describe { table } => self.describe(&table),
        }
    }

    fn table_lock(&self, name: &str) -> Arc<Mutex<()>> {
        self.table_locks
            .lock()
            .entry(name.to_string())
            .or_default()
            .clone()
    }

    /// Table-exists precondition shared by every row-level command.
    fn require_table(&self, name: &str) -> Result<()> {
        if self.store.load_schema()?.contains_key(name) {
            Ok(())
        } else {
            Err(DbError::TableNotFound(name.to_string()))
        }
    }

    fn create_table(&self, stmt: CreateTableStmt) -> Result<QueryResult> {
        let _guard = self.schema_lock.lock();

        let mut registry = self.store.load_schema()?;
        if registry.contains_key(&stmt.table) {
            return Err(DbError::TableExists(stmt.table));
        }

        // Materialize storage first, register second; if the registry write
        // fails the empty collection is rolled back, so a registry entry can
        // never outlive its backing storage.
        self.store.create_table(&stmt.table)?;
        registry.insert(
            stmt.table.clone(),
            TableDef {
                columns: stmt.columns,
            },
        );
        if let Err(err) = self.store.save_schema(&registry) {
            let _ = self.store.drop_table(&stmt.table);
            return Err(err);
        }

        Ok(QueryResult::Definition {
            message: format!("Table {} created", stmt.table),
        })
    }

    fn insert(&self, stmt: InsertStmt) -> Result<QueryResult> {
        if stmt.columns.len() != stmt.values.len() {
            return Err(DbError::ArityMismatch {
                table: stmt.table,
                columns: stmt.columns.len(),
                values: stmt.values.len(),
            });
        }
        self.require_table(&stmt.table)?;

        let lock = self.table_lock(&stmt.table);
        let _guard = lock.lock();

        let mut rows = self.store.load_table(&stmt.table)?;
        let row: Row = stmt.columns.into_iter().zip(stmt.values).collect();
        rows.push(row);
        self.store.save_table(&stmt.table, &rows)?;

        Ok(QueryResult::Modification {
            affected_rows: 1,
            message: format!("1 row inserted into {}", stmt.table),
        })
    }

    fn select(&self, stmt: SelectStmt) -> Result<QueryResult> {
        self.require_table(&stmt.table)?;

        let mut rows = self.store.load_table(&stmt.table)?;
        if let Some(cond) = &stmt.where_clause {
            rows.retain(|row| matches(row, cond));
        }

        let rows = match &stmt.projection {
            Projection::Star => rows,
            Projection::Columns(names) => rows
                .into_iter()
                .map(|mut row| {
                    // Columns missing from a row stay absent in the
                    // projection rather than becoming null placeholders.
                    names
                        .iter()
                        .filter_map(|name| row.remove(name).map(|v| (name.clone(), v)))
                        .collect()
                })
                .collect(),
        };

        Ok(QueryResult::Select { rows })
    }

    fn update(&self, stmt: UpdateStmt) -> Result<QueryResult> {
        self.require_table(&stmt.table)?;

        let lock = self.table_lock(&stmt.table);
        let _guard = lock.lock();

        let mut rows = self.store.load_table(&stmt.table)?;
        let mut affected_rows = 0;
        for row in rows.iter_mut() {
            if stmt
                .where_clause
                .as_ref()
                .is_none_or(|cond| matches(row, cond))
            {
                // Field-level merge: assigned keys overwrite, others stay.
                for (column, value) in &stmt.assignments {
                    row.insert(column.clone(), value.clone());
                }
                affected_rows += 1;
            }
        }
        self.store.save_table(&stmt.table, &rows)?;

        Ok(QueryResult::Modification {
            affected_rows,
            message: format!("{} row(s) updated", affected_rows),
        })
    }

    fn delete(&self, stmt: DeleteStmt) -> Result<QueryResult> {
        self.require_table(&stmt.table)?;

        let lock = self.table_lock(&stmt.table);
        let _guard = lock.lock();

        let mut rows = self.store.load_table(&stmt.table)?;
        let before = rows.len();
        match &stmt.where_clause {
            // Surviving rows keep their relative order.
            Some(cond) => rows.retain(|row| !matches(row, cond)),
            None => rows.clear(),
        }
        let affected_rows = before - rows.len();
        self.store.save_table(&stmt.table, &rows)?;

        Ok(QueryResult::Modification {
            affected_rows,
            message: format!("{} row(s) deleted", affected_rows),
        })
    }

    fn drop_table(&self, table: &str) -> Result<QueryResult> {
        let _guard = self.schema_lock.lock();
        let lock = self.table_lock(table);
        let _table_guard = lock.lock();

        let mut registry = self.store.load_schema()?;
        if registry.remove(table).is_none() {
            return Err(DbError::TableNotFound(table.to_string()));
        }
        self.store.save_schema(&registry)?;
        self.store.drop_table(table)?;

        Ok(QueryResult::Definition {
            message: format!("Table {} dropped", table),
        })
    }

    fn show_tables(&self) -> Result<QueryResult> {
        let registry = self.store.load_schema()?;
        Ok(QueryResult::Tables {
            names: registry.into_keys().collect(),
        })
    }

    fn describe(&self, table: &str) -> Result<QueryResult> {
        let registry = self.store.load_schema()?;
        let def = registry
            .get(table)
            .ok_or_else(|| DbError::TableNotFound(table.to_string()))?;
        Ok(QueryResult::Schema {
            columns: def.columns.clone(),
        })
    }
}

/// Loose-equality predicate match; a row without the column never matches.
fn matches(row: &Row, cond: &Condition) -> bool {
    row.get(&cond.column)
        .is_some_and(|value| value.loosely_eq(&cond.value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use crate::types::Value;

    fn executor() -> QueryExecutor<MemoryStore> {
        QueryExecutor::new(MemoryStore::new())
    }

    fn users_fixture() -> QueryExecutor<MemoryStore> {
        let db = executor();
        db.execute("CREATE TABLE users (id NUMBER, name TEXT)")
            .unwrap();
        db.execute("INSERT INTO users (id, name) VALUES (1, 'Ann')")
            .unwrap();
        db.execute("INSERT INTO users (id, name) VALUES (2, 'Bo')")
            .unwrap();
        db
    }

    fn row(pairs: &[(&str, Value)]) -> Row {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn test_create_then_describe_round_trip() {
        let db = executor();
        db.execute("CREATE TABLE t (a TEXT, b NUMBER)").unwrap();
        assert_eq!(
            db.execute("DESCRIBE t").unwrap(),
            QueryResult::Schema {
                columns: vec![ColumnDef::new("a", "TEXT"), ColumnDef::new("b", "NUMBER")],
            }
        );
        // DESC is an alias.
        assert_eq!(db.execute("DESC t").unwrap(), db.execute("DESCRIBE t").unwrap());
    }

    #[test]
    fn test_duplicate_create_fails() {
        let db = executor();
        db.execute("CREATE TABLE t (a)").unwrap();
        assert!(matches!(
            db.execute("CREATE TABLE t (b)"),
            Err(DbError::TableExists(name)) if name == "t"
        ));
    }

    #[test]
    fn test_operations_on_missing_table() {
        let db = executor();
        for sql in [
            "INSERT INTO ghost (a) VALUES (1)",
            "SELECT * FROM ghost",
            "UPDATE ghost SET a = 1",
            "DELETE FROM ghost",
            "DESCRIBE ghost",
            "DROP TABLE ghost",
        ] {
            assert!(
                matches!(db.execute(sql), Err(DbError::TableNotFound(_))),
                "expected TableNotFound for {}",
                sql
            );
        }
    }

    #[test]
    fn test_insert_then_select() {
        let db = users_fixture();
        let result = db.execute("SELECT * FROM users").unwrap();
        assert_eq!(
            result.rows().unwrap(),
            &[
                row(&[
                    ("id", Value::Integer(1)),
                    ("name", Value::Text("Ann".to_string()))
                ]),
                row(&[
                    ("id", Value::Integer(2)),
                    ("name", Value::Text("Bo".to_string()))
                ]),
            ]
        );
    }

    #[test]
    fn test_select_is_idempotent() {
        let db = users_fixture();
        let first = db.execute("SELECT * FROM users").unwrap();
        let second = db.execute("SELECT * FROM users").unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_where_filter_and_projection() {
        let db = users_fixture();
        assert_eq!(
            db.execute("SELECT * FROM users WHERE id = 2")
                .unwrap()
                .rows()
                .unwrap(),
            &[row(&[
                ("id", Value::Integer(2)),
                ("name", Value::Text("Bo".to_string()))
            ])]
        );
        assert_eq!(
            db.execute("SELECT name FROM users WHERE id = 2")
                .unwrap()
                .rows()
                .unwrap(),
            &[row(&[("name", Value::Text("Bo".to_string()))])]
        );
    }

    #[test]
    fn test_where_uses_loose_equality() {
        let db = users_fixture();
        // A quoted numeric string still matches the numeric field.
        assert_eq!(
            db.execute("SELECT * FROM users WHERE id = '2'")
                .unwrap()
                .rows()
                .unwrap()
                .len(),
            1
        );
    }

    #[test]
    fn test_projection_of_missing_column_omits_key() {
        let db = users_fixture();
        let result = db.execute("SELECT name, nickname FROM users WHERE id = 1").unwrap();
        assert_eq!(
            result.rows().unwrap(),
            &[row(&[("name", Value::Text("Ann".to_string()))])]
        );
    }

    #[test]
    fn test_insert_arity_mismatch() {
        let db = users_fixture();
        assert!(matches!(
            db.execute("INSERT INTO users (id, name) VALUES (3)"),
            Err(DbError::ArityMismatch {
                columns: 2,
                values: 1,
                ..
            })
        ));
        // Nothing was appended.
        assert_eq!(db.execute("SELECT * FROM users").unwrap().rows().unwrap().len(), 2);
    }

    #[test]
    fn test_update_with_where() {
        let db = users_fixture();
        let result = db
            .execute("UPDATE users SET name = 'Bobby' WHERE id = 2")
            .unwrap();
        assert_eq!(result.affected_rows(), 1);

        assert_eq!(
            db.execute("SELECT name FROM users WHERE id = 2")
                .unwrap()
                .rows()
                .unwrap(),
            &[row(&[("name", Value::Text("Bobby".to_string()))])]
        );
        // The other row is untouched.
        assert_eq!(
            db.execute("SELECT name FROM users WHERE id = 1")
                .unwrap()
                .rows()
                .unwrap(),
            &[row(&[("name", Value::Text("Ann".to_string()))])]
        );
    }

    #[test]
    fn test_update_without_where_touches_every_row() {
        let db = users_fixture();
        let result = db.execute("UPDATE users SET name = 'X'").unwrap();
        assert_eq!(result.affected_rows(), 2);
    }

    #[test]
    fn test_update_merges_new_fields() {
        let db = users_fixture();
        db.execute("UPDATE users SET age = 30 WHERE id = 1").unwrap();
        assert_eq!(
            db.execute("SELECT * FROM users WHERE id = 1")
                .unwrap()
                .rows()
                .unwrap(),
            &[row(&[
                ("age", Value::Integer(30)),
                ("id", Value::Integer(1)),
                ("name", Value::Text("Ann".to_string())),
            ])]
        );
    }

    #[test]
    fn test_delete_with_where_preserves_order() {
        let db = users_fixture();
        db.execute("INSERT INTO users (id, name) VALUES (3, 'Cy')")
            .unwrap();

        let result = db.execute("DELETE FROM users WHERE id = 2").unwrap();
        assert_eq!(result.affected_rows(), 1);

        let rows = db.execute("SELECT id FROM users").unwrap();
        assert_eq!(
            rows.rows().unwrap(),
            &[
                row(&[("id", Value::Integer(1))]),
                row(&[("id", Value::Integer(3))]),
            ]
        );
    }

    #[test]
    fn test_delete_without_where_empties_table() {
        let db = users_fixture();
        let result = db.execute("DELETE FROM users").unwrap();
        assert_eq!(result.affected_rows(), 2);
        assert!(db.execute("SELECT * FROM users").unwrap().rows().unwrap().is_empty());
    }

    #[test]
    fn test_show_tables() {
        let db = executor();
        assert_eq!(
            db.execute("SHOW TABLES").unwrap(),
            QueryResult::Tables { names: vec![] }
        );
        db.execute("CREATE TABLE b (x)").unwrap();
        db.execute("CREATE TABLE a (x)").unwrap();
        assert_eq!(
            db.execute("SHOW TABLES").unwrap(),
            QueryResult::Tables {
                names: vec!["a".to_string(), "b".to_string()]
            }
        );
    }

    #[test]
    fn test_drop_table() {
        let db = users_fixture();
        let result = db.execute("DROP TABLE users").unwrap();
        assert_eq!(
            result,
            QueryResult::Definition {
                message: "Table users dropped".to_string()
            }
        );
        assert!(matches!(
            db.execute("SELECT * FROM users"),
            Err(DbError::TableNotFound(_))
        ));
        // The name is free for reuse.
        db.execute("CREATE TABLE users (id)").unwrap();
        assert!(db.execute("SELECT * FROM users").unwrap().rows().unwrap().is_empty());
    }

    #[test]
    fn test_concurrent_inserts_lose_nothing() {
        use std::thread;

        let db = Arc::new(executor());
        db.execute("CREATE TABLE log (n NUMBER)").unwrap();

        let threads = 8;
        let per_thread = 25;
        let handles: Vec<_> = (0..threads)
            .map(|t| {
                let db = Arc::clone(&db);
                thread::spawn(move || {
                    for i in 0..per_thread {
                        db.execute(&format!(
                            "INSERT INTO log (n) VALUES ({})",
                            t * per_thread + i
                        ))
                        .unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let rows = db.execute("SELECT * FROM log").unwrap();
        assert_eq!(rows.rows().unwrap().len(), threads * per_thread);
    }

    #[test]
    fn test_messages() {
        let db = executor();
        assert_eq!(
            db.execute("CREATE TABLE t (a)").unwrap(),
            QueryResult::Definition {
                message: "Table t created".to_string()
            }
        );
        assert_eq!(
            db.execute("INSERT INTO t (a) VALUES (1)").unwrap(),
            QueryResult::Modification {
                affected_rows: 1,
                message: "1 row inserted into t".to_string()
            }
        );
    }
}
