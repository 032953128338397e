//! SQL Parser - converts tokens into an AST
//!
//! Recursive descent over the token stream. Each statement must consume the
//! whole input (an optional trailing semicolon aside), so anything the
//! grammar does not cover - extra WHERE conjuncts, stray tokens - is an
//! explicit syntax error rather than a silent mis-parse.

use super::ast::*;
use super::token::{Token, TokenType};
use crate::error::{DbError, Result};
use crate::types::{coerce, ColumnDef, Value};

/// Column type tag applied when a CREATE TABLE entry names no type.
const DEFAULT_TYPE: &str = "TEXT";

pub struct Parser {
    tokens: Vec<Token>,
    position: usize,
}

impl Parser {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self {
            tokens,
            position: 0,
        }
    }

    /// Parse one SQL statement. The leading keyword picks the grammar;
    /// an unrecognized leading token is `UnknownCommand`.
    pub fn parse(&mut self) -> Result<Statement> {
        let stmt = match &self.current().token_type {
            TokenType::Create => self.parse_create_table()?,
            TokenType::Insert => self.parse_insert()?,
            TokenType::Select => self.parse_select()?,
            TokenType::Update => self.parse_update()?,
            TokenType::Delete => self.parse_delete()?,
            TokenType::Drop => self.parse_drop_table()?,
            TokenType::Show => self.parse_show_tables()?,
            TokenType::Describe | TokenType::Desc => self.parse_describe()?,
            other => return Err(DbError::UnknownCommand(other.describe())),
        };

        // Optional trailing semicolon, then nothing else.
        self.match_token(TokenType::Semicolon);
        if !matches!(self.current().token_type, TokenType::Eof) {
            return Err(self.error("expected end of statement"));
        }

        Ok(stmt)
    }

    /// CREATE TABLE name (col [type] [modifiers...], ...)
    fn parse_create_table(&mut self) -> Result<Statement> {
        self.expect(TokenType::Create)?;
        self.expect(TokenType::Table)?;
        let table = self.next_ident()?;
        self.expect(TokenType::LParen)?;

        let mut columns = Vec::new();
        loop {
            columns.push(self.parse_column_def()?);
            if !self.match_token(TokenType::Comma) {
                break;
            }
        }
        self.expect(TokenType::RParen)?;

        Ok(Statement::CreateTable(CreateTableStmt { table, columns }))
    }

    /// One column entry: a name, an optional free-form type tag (TEXT when
    /// omitted), and any trailing modifier words (PRIMARY KEY, UNIQUE, ...)
    /// which are accepted but not enforced.
    fn parse_column_def(&mut self) -> Result<ColumnDef> {
        let name = self.next_ident()?;

        let type_name = if let TokenType::Ident(word) = &self.current().token_type {
            let word = word.clone();
            self.advance();
            word
        } else {
            DEFAULT_TYPE.to_string()
        };

        while matches!(self.current().token_type, TokenType::Ident(_)) {
            self.advance();
        }

        Ok(ColumnDef::new(name, type_name))
    }

    /// INSERT INTO name (cols) VALUES (literals)
    fn parse_insert(&mut self) -> Result<Statement> {
        self.expect(TokenType::Insert)?;
        self.expect(TokenType::Into)?;
        let table = self.next_ident()?;

        self.expect(TokenType::LParen)?;
        let columns = self.parse_ident_list()?;
        self.expect(TokenType::RParen)?;

        self.expect(TokenType::Values)?;

        self.expect(TokenType::LParen)?;
        let mut values = Vec::new();
        loop {
            values.push(self.parse_literal()?);
            if !self.match_token(TokenType::Comma) {
                break;
            }
        }
        self.expect(TokenType::RParen)?;

        Ok(Statement::Insert(InsertStmt {
            table,
            columns,
            values,
        }))
    }

    /// SELECT cols FROM name [WHERE col = literal]
    fn parse_select(&mut self) -> Result<Statement> {
        self.expect(TokenType::Select)?;

        let projection = if self.match_token(TokenType::Star) {
            Projection::Star
        } else {
            Projection::Columns(self.parse_ident_list()?)
        };

        self.expect(TokenType::From)?;
        let table = self.next_ident()?;
        let where_clause = self.parse_where_clause()?;

        Ok(Statement::Select(SelectStmt {
            table,
            projection,
            where_clause,
        }))
    }

    /// UPDATE name SET col = literal[, ...] [WHERE col = literal]
    fn parse_update(&mut self) -> Result<Statement> {
        self.expect(TokenType::Update)?;
        let table = self.next_ident()?;
        self.expect(TokenType::Set)?;

        let mut assignments: Vec<(String, Value)> = Vec::new();
        loop {
            let column = self.next_ident()?;
            self.expect(TokenType::Eq)?;
            let value = self.parse_literal()?;
            if assignments.iter().any(|(name, _)| name == &column) {
                return Err(DbError::Syntax(format!(
                    "duplicate column {} in SET clause",
                    column
                )));
            }
            assignments.push((column, value));
            if !self.match_token(TokenType::Comma) {
                break;
            }
        }

        Ok(Statement::Update(UpdateStmt {
            table,
            assignments,
            where_clause: self.parse_where_clause()?,
        }))
    }

    /// DELETE FROM name [WHERE col = literal]
    fn parse_delete(&mut self) -> Result<Statement> {
        self.expect(TokenType::Delete)?;
        self.expect(TokenType::From)?;
        let table = self.next_ident()?;

        Ok(Statement::Delete(DeleteStmt {
            table,
            where_clause: self.parse_where_clause()?,
        }))
    }

    /// DROP TABLE name
    fn parse_drop_table(&mut self) -> Result<Statement> {
        self.expect(TokenType::Drop)?;
        self.expect(TokenType::Table)?;
        let table = self.next_ident()?;
        Ok(Statement::DropTable { table })
    }

    /// SHOW TABLES
    fn parse_show_tables(&mut self) -> Result<Statement> {
        self.expect(TokenType::Show)?;
        self.expect(TokenType::Tables)?;
        Ok(Statement::ShowTables)
    }

    /// DESCRIBE name / DESC name
    fn parse_describe(&mut self) -> Result<Statement> {
        self.advance(); // DESCRIBE or DESC
        let table = self.next_ident()?;
        Ok(Statement::Describe { table })
    }

    /// WHERE col = literal, when present. The single-equality micro-grammar:
    /// conjunctions are rejected by the end-of-statement check in `parse`.
    fn parse_where_clause(&mut self) -> Result<Option<Condition>> {
        if !self.match_token(TokenType::Where) {
            return Ok(None);
        }
        let column = self.next_ident()?;
        self.expect(TokenType::Eq)?;
        let value = self.parse_literal()?;
        Ok(Some(Condition { column, value }))
    }

    /// A literal in value position: string contents verbatim, numeric text
    /// as a number, and a bareword identifier as text - mirroring the
    /// coercion rule at the token level.
    fn parse_literal(&mut self) -> Result<Value> {
        let value = match &self.current().token_type {
            TokenType::Str(text) => Value::Text(text.clone()),
            TokenType::Number(text) => coerce(text),
            TokenType::Ident(word) => Value::Text(word.clone()),
            _ => return Err(self.error("expected a literal value")),
        };
        self.advance();
        Ok(value)
    }

    fn parse_ident_list(&mut self) -> Result<Vec<String>> {
        let mut names = Vec::new();
        loop {
            names.push(self.next_ident()?);
            if !self.match_token(TokenType::Comma) {
                break;
            }
        }
        Ok(names)
    }

    fn current(&self) -> &Token {
        &self.tokens[self.position]
    }

    fn advance(&mut self) {
        if self.position < self.tokens.len() - 1 {
            self.position += 1;
        }
    }

    /// Consume the current token if it matches.
    fn match_token(&mut self, token_type: TokenType) -> bool {
        if self.current().token_type == token_type {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, token_type: TokenType) -> Result<()> {
        if self.current().token_type == token_type {
            self.advance();
            Ok(())
        } else {
            Err(self.error(&format!("expected {}", token_type.describe())))
        }
    }

    fn next_ident(&mut self) -> Result<String> {
        if let TokenType::Ident(name) = &self.current().token_type {
            let name = name.clone();
            self.advance();
            Ok(name)
        } else {
            Err(self.error("expected an identifier"))
        }
    }

    fn error(&self, message: &str) -> DbError {
        let token = self.current();
        DbError::Syntax(format!(
            "{}, found {} at {}:{}",
            message,
            token.token_type.describe(),
            token.line,
            token.column
        ))
    }
}
