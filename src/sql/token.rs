//! Token types for the SQL lexer

/// Keyword lookup, case-insensitive.
///
/// The keyword set is deliberately small: any other word lexes as an
/// identifier, which doubles as a bareword literal in value positions and
/// as a free-form type tag in column definitions.
pub fn lookup_keyword(word: &str) -> Option<TokenType> {
    let token = match word.to_ascii_lowercase().as_str() {
        "create" => TokenType::Create,
        "table" => TokenType::Table,
        "insert" => TokenType::Insert,
        "into" => TokenType::Into,
        "values" => TokenType::Values,
        "select" => TokenType::Select,
        "from" => TokenType::From,
        "where" => TokenType::Where,
        "update" => TokenType::Update,
        "set" => TokenType::Set,
        "delete" => TokenType::Delete,
        "drop" => TokenType::Drop,
        "show" => TokenType::Show,
        "tables" => TokenType::Tables,
        "describe" => TokenType::Describe,
        "desc" => TokenType::Desc,
        _ => return None,
    };
    Some(token)
}

#[derive(Debug, Clone, PartialEq)]
pub enum TokenType {
    // Keywords
    Create,
    Table,
    Insert,
    Into,
    Values,
    Select,
    From,
    Where,
    Update,
    Set,
    Delete,
    Drop,
    Show,
    Tables,
    Describe,
    Desc,

    // Identifiers and literals
    Ident(String),
    /// Numeric literal, kept as raw text; the parser decides integer vs float
    Number(String),
    /// String literal with the quote layer already stripped, contents verbatim
    Str(String),

    // Punctuation
    Star,
    Comma,
    Eq,
    LParen,
    RParen,
    Semicolon,

    Eof,
}

impl TokenType {
    /// Human-readable name for error messages.
    pub fn describe(&self) -> String {
        match self {
            TokenType::Ident(name) => format!("identifier '{}'", name),
            TokenType::Number(text) => format!("number '{}'", text),
            TokenType::Str(text) => format!("string '{}'", text),
            TokenType::Star => "'*'".to_string(),
            TokenType::Comma => "','".to_string(),
            TokenType::Eq => "'='".to_string(),
            TokenType::LParen => "'('".to_string(),
            TokenType::RParen => "')'".to_string(),
            TokenType::Semicolon => "';'".to_string(),
            TokenType::Eof => "end of input".to_string(),
            keyword => format!("{:?}", keyword).to_uppercase(),
        }
    }
}

/// A token with its position in the input, for error messages.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub token_type: TokenType,
    pub line: usize,
    pub column: usize,
}

impl Token {
    pub fn new(token_type: TokenType, line: usize, column: usize) -> Self {
        Self {
            token_type,
            line,
            column,
        }
    }
}
