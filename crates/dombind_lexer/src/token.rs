use std::fmt;

pub use dombind_span::Span;

#[derive(Clone, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Identifier(String),
    StringLiteral(String),
    Number(String),
    Colon,
    Question,
    Semicolon,
    Comma,
    Dot,
    Ellipsis,
    Pipe,
    Ampersand,
    Equals,
    Arrow,
    LParen,
    RParen,
    LBracket,
    RBracket,
    LBrace,
    RBrace,
    Lt,
    Gt,
    Eof,
}

impl TokenKind {
    pub fn name(&self) -> &'static str {
        match self {
            TokenKind::Identifier(_) => "identifier",
            TokenKind::StringLiteral(_) => "string",
            TokenKind::Number(_) => "number",
            TokenKind::Colon => ":",
            TokenKind::Question => "?",
            TokenKind::Semicolon => ";",
            TokenKind::Comma => ",",
            TokenKind::Dot => ".",
            TokenKind::Ellipsis => "...",
            TokenKind::Pipe => "|",
            TokenKind::Ampersand => "&",
            TokenKind::Equals => "=",
            TokenKind::Arrow => "=>",
            TokenKind::LParen => "(",
            TokenKind::RParen => ")",
            TokenKind::LBracket => "[",
            TokenKind::RBracket => "]",
            TokenKind::LBrace => "{",
            TokenKind::RBrace => "}",
            TokenKind::Lt => "<",
            TokenKind::Gt => ">",
            TokenKind::Eof => "eof",
        }
    }

    /// True when this is the identifier `word` (keywords are lexed as identifiers).
    pub fn is_word(&self, word: &str) -> bool {
        matches!(self, TokenKind::Identifier(name) if name == word)
    }

    pub fn identifier(&self) -> Option<&str> {
        match self {
            TokenKind::Identifier(name) => Some(name),
            _ => None,
        }
    }
}

impl fmt::Debug for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Identifier(name) => write!(f, "Identifier({name})"),
            TokenKind::StringLiteral(value) => write!(f, "StringLiteral(\"{value}\")"),
            TokenKind::Number(number) => write!(f, "Number({number})"),
            kind => f.write_str(kind.name()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    pub fn new(kind: TokenKind, span: Span) -> Self {
        Self { kind, span }
    }
}
