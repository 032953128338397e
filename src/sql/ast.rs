//! Abstract syntax tree for the supported dialect

use crate::types::{ColumnDef, Value};

/// Top-level statement, carrying validated operands.
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    CreateTable(CreateTableStmt),
    Insert(InsertStmt),
    Select(SelectStmt),
    Update(UpdateStmt),
    Delete(DeleteStmt),
    DropTable { table: String },
    ShowTables,
    Describe { table: String },
}

/// CREATE TABLE name (col [type], ...)
#[derive(Debug, Clone, PartialEq)]
pub struct CreateTableStmt {
    pub table: String,
    pub columns: Vec<ColumnDef>,
}

/// INSERT INTO name (cols) VALUES (literals)
#[derive(Debug, Clone, PartialEq)]
pub struct InsertStmt {
    pub table: String,
    pub columns: Vec<String>,
    pub values: Vec<Value>,
}

/// SELECT projection: `*` or an explicit column list.
#[derive(Debug, Clone, PartialEq)]
pub enum Projection {
    Star,
    Columns(Vec<String>),
}

/// SELECT cols FROM name [WHERE col = literal]
#[derive(Debug, Clone, PartialEq)]
pub struct SelectStmt {
    pub table: String,
    pub projection: Projection,
    pub where_clause: Option<Condition>,
}

/// UPDATE name SET col = literal[, ...] [WHERE col = literal]
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateStmt {
    pub table: String,
    pub assignments: Vec<(String, Value)>,
    pub where_clause: Option<Condition>,
}

/// DELETE FROM name [WHERE col = literal]
#[derive(Debug, Clone, PartialEq)]
pub struct DeleteStmt {
    pub table: String,
    pub where_clause: Option<Condition>,
}

/// The single supported predicate: `column = literal`, matched with loose
/// equality against each row's field.
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    pub column: String,
    pub value: Value,
}
