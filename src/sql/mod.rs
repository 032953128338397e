//! SQL frontend and interpreter
//!
//! Architecture:
//! - Lexer: tokenizes one statement string
//! - Parser: builds a typed `Statement` from tokens
//! - Executor: validates against the schema registry and applies the
//!   statement to the injected store

pub mod ast;
pub mod executor;
pub mod lexer;
pub mod parser;
pub mod token;

pub use ast::{
    Condition, CreateTableStmt, DeleteStmt, InsertStmt, Projection, SelectStmt, Statement,
    UpdateStmt,
};
pub use executor::{QueryExecutor, QueryResult};
pub use lexer::Lexer;
pub use parser::Parser;
pub use token::{Token, TokenType};
