//! SQL Lexer - converts a statement string into tokens

use super::token::{lookup_keyword, Token, TokenType};
use crate::error::{DbError, Result};

pub struct Lexer {
    input: Vec<char>,
    position: usize,
    line: usize,
    column: usize,
}

impl Lexer {
    pub fn new(input: &str) -> Self {
        Self {
            input: input.chars().collect(),
            position: 0,
            line: 1,
            column: 1,
        }
    }

    pub fn tokenize(&mut self) -> Result<Vec<Token>> {
        let mut tokens = Vec::new();

        loop {
            let token = self.next_token()?;
            let is_eof = matches!(token.token_type, TokenType::Eof);
            tokens.push(token);
            if is_eof {
                break;
            }
        }

        Ok(tokens)
    }

    fn next_token(&mut self) -> Result<Token> {
        self.skip_whitespace();

        let line = self.line;
        let column = self.column;

        if self.is_eof() {
            return Ok(Token::new(TokenType::Eof, line, column));
        }

        let ch = self.current_char();

        // Skip -- line comments
        if ch == '-' && self.peek_char() == Some('-') {
            self.skip_line_comment();
            return self.next_token();
        }

        let token_type = match ch {
            // String literals
            '\'' | '"' => self.read_string(ch)?,

            // Numbers
            '0'..='9' => self.read_number(),

            // Negative number literal
            '-' if matches!(self.peek_char(), Some('0'..='9')) => {
                self.advance();
                match self.read_number() {
                    TokenType::Number(text) => TokenType::Number(format!("-{}", text)),
                    other => other,
                }
            }

            // Identifiers and keywords
            'a'..='z' | 'A'..='Z' | '_' => self.read_identifier(),

            // Operators and delimiters
            '=' => {
                self.advance();
                TokenType::Eq
            }
            '*' => {
                self.advance();
                TokenType::Star
            }
            '(' => {
                self.advance();
                TokenType::LParen
            }
            ')' => {
                self.advance();
                TokenType::RParen
            }
            ',' => {
                self.advance();
                TokenType::Comma
            }
            ';' => {
                self.advance();
                TokenType::Semicolon
            }
            _ => {
                return Err(DbError::Syntax(format!(
                    "unexpected character '{}' at {}:{}",
                    ch, line, column
                )));
            }
        };

        Ok(Token::new(token_type, line, column))
    }

    fn current_char(&self) -> char {
        if self.is_eof() {
            '\0'
        } else {
            self.input[self.position]
        }
    }

    fn peek_char(&self) -> Option<char> {
        self.input.get(self.position + 1).copied()
    }

    fn is_eof(&self) -> bool {
        self.position >= self.input.len()
    }

    fn advance(&mut self) {
        if !self.is_eof() {
            if self.current_char() == '\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
            self.position += 1;
        }
    }

    fn skip_whitespace(&mut self) {
        while !self.is_eof() && self.current_char().is_whitespace() {
            self.advance();
        }
    }

    fn skip_line_comment(&mut self) {
        while !self.is_eof() && self.current_char() != '\n' {
            self.advance();
        }
    }

    /// Read a quoted string. The contents are kept verbatim up to the
    /// matching closing quote; no escape sequences are processed.
    fn read_string(&mut self, quote: char) -> Result<TokenType> {
        let line = self.line;
        let column = self.column;
        self.advance(); // opening quote

        let mut text = String::new();
        while !self.is_eof() && self.current_char() != quote {
            text.push(self.current_char());
            self.advance();
        }

        if self.is_eof() {
            return Err(DbError::Syntax(format!(
                "unterminated string starting at {}:{}",
                line, column
            )));
        }

        self.advance(); // closing quote
        Ok(TokenType::Str(text))
    }

    /// Read a numeric literal: digits, optional fraction, optional exponent.
    fn read_number(&mut self) -> TokenType {
        let mut text = String::new();

        while !self.is_eof() && self.current_char().is_ascii_digit() {
            text.push(self.current_char());
            self.advance();
        }

        if self.current_char() == '.' && matches!(self.peek_char(), Some('0'..='9')) {
            text.push('.');
            self.advance();
            while !self.is_eof() && self.current_char().is_ascii_digit() {
                text.push(self.current_char());
                self.advance();
            }
        }

        if matches!(self.current_char(), 'e' | 'E') {
            let mut lookahead = self.position + 1;
            if matches!(self.input.get(lookahead), Some('+') | Some('-')) {
                lookahead += 1;
            }
            if matches!(self.input.get(lookahead), Some(c) if c.is_ascii_digit()) {
                text.push(self.current_char());
                self.advance();
                if matches!(self.current_char(), '+' | '-') {
                    text.push(self.current_char());
                    self.advance();
                }
                while !self.is_eof() && self.current_char().is_ascii_digit() {
                    text.push(self.current_char());
                    self.advance();
                }
            }
        }

        TokenType::Number(text)
    }

    fn read_identifier(&mut self) -> TokenType {
        let mut word = String::new();

        while !self.is_eof()
            && (self.current_char().is_ascii_alphanumeric() || self.current_char() == '_')
        {
            word.push(self.current_char());
            self.advance();
        }

        lookup_keyword(&word).unwrap_or(TokenType::Ident(word))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token_types(sql: &str) -> Vec<TokenType> {
        Lexer::new(sql)
            .tokenize()
            .unwrap()
            .into_iter()
            .map(|t| t.token_type)
            .collect()
    }

    #[test]
    fn test_tokenize_select() {
        assert_eq!(
            token_types("SELECT * FROM users WHERE id = 2"),
            vec![
                TokenType::Select,
                TokenType::Star,
                TokenType::From,
                TokenType::Ident("users".to_string()),
                TokenType::Where,
                TokenType::Ident("id".to_string()),
                TokenType::Eq,
                TokenType::Number("2".to_string()),
                TokenType::Eof,
            ]
        );
    }

    #[test]
    fn test_keywords_are_case_insensitive() {
        assert_eq!(token_types("select"), token_types("SeLeCt"));
        assert_eq!(token_types("show tables"), token_types("SHOW TABLES"));
    }

    #[test]
    fn test_string_literals_verbatim() {
        assert_eq!(
            token_types("'Ann'"),
            vec![TokenType::Str("Ann".to_string()), TokenType::Eof]
        );
        // Double quotes work too, and the other quote kind stays verbatim.
        assert_eq!(
            token_types(r#""O'Brien""#),
            vec![TokenType::Str("O'Brien".to_string()), TokenType::Eof]
        );
    }

    #[test]
    fn test_unterminated_string() {
        assert!(Lexer::new("'oops").tokenize().is_err());
    }

    #[test]
    fn test_numbers() {
        assert_eq!(
            token_types("1 -2 3.5 1e3"),
            vec![
                TokenType::Number("1".to_string()),
                TokenType::Number("-2".to_string()),
                TokenType::Number("3.5".to_string()),
                TokenType::Number("1e3".to_string()),
                TokenType::Eof,
            ]
        );
    }

    #[test]
    fn test_line_comment_skipped() {
        assert_eq!(
            token_types("select -- trailing note\n*"),
            vec![TokenType::Select, TokenType::Star, TokenType::Eof]
        );
    }

    #[test]
    fn test_unexpected_character() {
        assert!(Lexer::new("select @").tokenize().is_err());
    }
}
