//! Token kinds and the keyword table.
//!
//! The token set is a fixed, closed enumeration: there is no extensibility
//! hook here, unlike a production language's token stream. Keeping it a
//! plain `enum` rather than a macro-generated, per-variant struct token is
//! deliberate — this language has no need for per-token spans richer than a
//! line/column pair.

use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Every lexical category this language's lexer can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Eof,
    Illegal,
    Ident,
    Int,
    Float,
    Sum,
    Sub,
    Mul,
    Div,
    Eq,
    Lt,
    Gt,
    EqEq,
    NotEq,
    LtEq,
    GtEq,
    Semicolon,
    Colon,
    Comma,
    LParen,
    RParen,
    LBrace,
    RBrace,
    At,
    PlusPlus,
    MinusMinus,
    Var,
    Fn,
    Return,
    If,
    While,
    For,
    Else,
    True,
    False,
    Type,
}

/// A token's literal payload. The lexer never interprets a numeric literal's
/// value itself (that's the parser's job); it just carries the source text
/// through, except for the lexeme-less tokens where it carries the raw
/// single/double-character spelling for error messages.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Str(String),
    Int(i64),
    Float(f64),
    None,
}

impl Literal {
    pub fn as_str(&self) -> &str {
        match self {
            Literal::Str(s) => s,
            _ => "",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub literal: Literal,
    pub line: usize,
    pub col: usize,
}

impl Token {
    pub fn new(kind: TokenKind, literal: Literal, line: usize, col: usize) -> Self {
        Self {
            kind,
            literal,
            line,
            col,
        }
    }
}

static KEYWORDS: Lazy<HashMap<&'static str, TokenKind>> = Lazy::new(|| {
    let mut m = HashMap::new();
    m.insert("var", TokenKind::Var);
    m.insert("func", TokenKind::Fn);
    m.insert("ret", TokenKind::Return);
    m.insert("if", TokenKind::If);
    m.insert("while", TokenKind::While);
    m.insert("for", TokenKind::For);
    m.insert("else", TokenKind::Else);
    m.insert("true", TokenKind::True);
    m.insert("false", TokenKind::False);
    m
});

static TYPE_KEYWORDS: &[&str] = &["int", "float", "bool"];

/// Classifies an already-read identifier as a keyword, a built-in type name,
/// or a plain identifier.
pub fn lookup_ident(ident: &str) -> TokenKind {
    if let Some(kind) = KEYWORDS.get(ident) {
        *kind
    } else if TYPE_KEYWORDS.contains(&ident) {
        TokenKind::Type
    } else {
        TokenKind::Ident
    }
}
