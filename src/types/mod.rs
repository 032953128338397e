//! Scalar values, rows, and table definitions

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A single cell value.
///
/// Serialized untagged so persisted rows read as plain JSON scalars
/// (`{"id": 1, "name": "Ann"}`). Whole numbers stay integers on disk;
/// the engine's type system is just {text, number}, with the number split
/// into integer and float representations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// Integer value
    Integer(i64),

    /// Floating point value
    Float(f64),

    /// Text string
    Text(String),
}

impl Value {
    /// Numeric view of the value, coercing numeric-looking text.
    fn as_number(&self) -> Option<f64> {
        match self {
            Value::Integer(n) => Some(*n as f64),
            Value::Float(f) => Some(*f),
            Value::Text(s) => s.trim().parse::<f64>().ok().filter(|f| f.is_finite()),
        }
    }

    /// Loose equality: both sides are coerced before comparison, so a
    /// number compares equal to its own string representation. Filtering
    /// (SELECT/UPDATE/DELETE WHERE) uses exactly this rule.
    pub fn loosely_eq(&self, other: &Value) -> bool {
        if let (Some(a), Some(b)) = (self.as_number(), other.as_number()) {
            return a == b;
        }
        match (self, other) {
            (Value::Text(a), Value::Text(b)) => a == b,
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Integer(n) => write!(f, "{}", n),
            Value::Float(v) => write!(f, "{}", v),
            Value::Text(s) => write!(f, "{}", s),
        }
    }
}

/// Turn a raw literal token into a typed scalar.
///
/// Quoted text keeps its inner content verbatim, with exactly one layer of
/// matching single or double quotes stripped and no escape processing.
/// Unquoted numeric text becomes a number; any other bareword is kept as
/// text. The same rule applies wherever a literal appears: INSERT values,
/// WHERE right-hand sides, UPDATE SET right-hand sides.
pub fn coerce(token: &str) -> Value {
    let t = token.trim();
    for quote in ['\'', '"'] {
        if t.len() >= 2 && t.starts_with(quote) && t.ends_with(quote) {
            return Value::Text(t[1..t.len() - 1].to_string());
        }
    }
    if let Ok(n) = t.parse::<i64>() {
        return Value::Integer(n);
    }
    if let Ok(f) = t.parse::<f64>() {
        if f.is_finite() {
            return Value::Float(f);
        }
    }
    Value::Text(t.to_string())
}

/// One record: column name to scalar value. A row need not contain every
/// column the schema defines; absent columns are simply missing keys.
pub type Row = BTreeMap<String, Value>;

/// A single column definition. The type tag is advisory free-form text and
/// is never checked against inserted values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnDef {
    /// Column name
    pub name: String,

    /// Free-form type tag, `TEXT` when omitted at CREATE time
    #[serde(rename = "type")]
    pub type_name: String,
}

impl ColumnDef {
    pub fn new(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
        }
    }
}

/// Ordered column definitions for one table. Created once by CREATE TABLE
/// and never altered afterwards.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TableDef {
    pub columns: Vec<ColumnDef>,
}

impl TableDef {
    pub fn column(&self, name: &str) -> Option<&ColumnDef> {
        self.columns.iter().find(|c| c.name == name)
    }
}

/// The schema registry: table name to definition. Sorted iteration order
/// defines the SHOW TABLES listing.
pub type Registry = BTreeMap<String, TableDef>;
