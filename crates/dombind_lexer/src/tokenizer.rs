use super::token::{Span, Token, TokenKind};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LexerError {
    #[error("unterminated string literal (line {line}, column {column})")]
    UnterminatedString {
        line: usize,
        column: usize,
        span: Span,
    },
    #[error("unterminated block comment (line {line}, column {column})")]
    UnterminatedComment {
        line: usize,
        column: usize,
        span: Span,
    },
    #[error("unexpected character `{ch}` (line {line}, column {column})")]
    UnexpectedCharacter {
        ch: char,
        line: usize,
        column: usize,
        span: Span,
    },
}

impl LexerError {
    pub fn span(&self) -> Span {
        match self {
            LexerError::UnterminatedString { span, .. }
            | LexerError::UnterminatedComment { span, .. }
            | LexerError::UnexpectedCharacter { span, .. } => *span,
        }
    }
}

pub type LexResult<T> = Result<T, Vec<LexerError>>;

/// Tokenizes declaration text. Comments and whitespace are dropped; keywords come
/// back as identifiers so the parser can treat contextual words uniformly.
pub fn tokenize(source: &str) -> LexResult<Vec<Token>> {
    let bytes = source.as_bytes();
    let mut tokens = Vec::new();
    let mut errors = Vec::new();
    let mut i = 0usize;

    while i < bytes.len() {
        let start = i;
        let single = |kind: TokenKind| Token::new(kind, Span::new(start, start + 1));

        match bytes[i] {
            b' ' | b'\t' | b'\r' | b'\n' => {
                i += 1;
            }
            b'/' if bytes.get(i + 1) == Some(&b'/') => {
                while i < bytes.len() && bytes[i] != b'\n' {
                    i += 1;
                }
            }
            b'/' if bytes.get(i + 1) == Some(&b'*') => match find_comment_end(bytes, i + 2) {
                Some(end) => i = end,
                None => {
                    let (line, column) = line_col(source, start);
                    errors.push(LexerError::UnterminatedComment {
                        line,
                        column,
                        span: Span::new(start, bytes.len()),
                    });
                    i = bytes.len();
                }
            },
            b'(' => {
                tokens.push(single(TokenKind::LParen));
                i += 1;
            }
            b')' => {
                tokens.push(single(TokenKind::RParen));
                i += 1;
            }
            b'[' => {
                tokens.push(single(TokenKind::LBracket));
                i += 1;
            }
            b']' => {
                tokens.push(single(TokenKind::RBracket));
                i += 1;
            }
            b'{' => {
                tokens.push(single(TokenKind::LBrace));
                i += 1;
            }
            b'}' => {
                tokens.push(single(TokenKind::RBrace));
                i += 1;
            }
            b'<' => {
                tokens.push(single(TokenKind::Lt));
                i += 1;
            }
            b'>' => {
                tokens.push(single(TokenKind::Gt));
                i += 1;
            }
            b':' => {
                tokens.push(single(TokenKind::Colon));
                i += 1;
            }
            b'?' => {
                tokens.push(single(TokenKind::Question));
                i += 1;
            }
            b';' => {
                tokens.push(single(TokenKind::Semicolon));
                i += 1;
            }
            b',' => {
                tokens.push(single(TokenKind::Comma));
                i += 1;
            }
            b'|' => {
                tokens.push(single(TokenKind::Pipe));
                i += 1;
            }
            b'&' => {
                tokens.push(single(TokenKind::Ampersand));
                i += 1;
            }
            b'.' if bytes[i..].starts_with(b"...") => {
                tokens.push(Token::new(TokenKind::Ellipsis, Span::new(start, start + 3)));
                i += 3;
            }
            b'.' => {
                tokens.push(single(TokenKind::Dot));
                i += 1;
            }
            b'=' if bytes.get(i + 1) == Some(&b'>') => {
                tokens.push(Token::new(TokenKind::Arrow, Span::new(start, start + 2)));
                i += 2;
            }
            b'=' => {
                tokens.push(single(TokenKind::Equals));
                i += 1;
            }
            quote @ (b'"' | b'\'' | b'`') => {
                i += 1;
                while i < bytes.len() && bytes[i] != quote {
                    if bytes[i] == b'\\' {
                        i += 1;
                    }
                    i += 1;
                }
                if i >= bytes.len() {
                    let (line, column) = line_col(source, start);
                    errors.push(LexerError::UnterminatedString {
                        line,
                        column,
                        span: Span::new(start, bytes.len()),
                    });
                    break;
                }
                let value = &source[start + 1..i];
                i += 1;
                tokens.push(Token::new(
                    TokenKind::StringLiteral(value.to_string()),
                    Span::new(start, i),
                ));
            }
            ch if ch.is_ascii_digit() || (ch == b'-' && next_is_digit(bytes, i)) => {
                i += 1;
                while i < bytes.len() && (bytes[i].is_ascii_alphanumeric() || bytes[i] == b'.') {
                    i += 1;
                }
                tokens.push(Token::new(
                    TokenKind::Number(source[start..i].to_string()),
                    Span::new(start, i),
                ));
            }
            ch if is_identifier_start(ch) && identifier_end(source, i) > start => {
                i = identifier_end(source, i);
                tokens.push(Token::new(
                    TokenKind::Identifier(source[start..i].to_string()),
                    Span::new(start, i),
                ));
            }
            _ => {
                let error = unexpected_character(source, start);
                i += error.span().len().max(1);
                errors.push(error);
            }
        }
    }

    tokens.push(Token::new(
        TokenKind::Eof,
        Span::new(source.len(), source.len()),
    ));

    if errors.is_empty() {
        Ok(tokens)
    } else {
        Err(errors)
    }
}

fn is_identifier_start(byte: u8) -> bool {
    byte.is_ascii_alphabetic() || byte == b'_' || byte == b'$' || byte >= 0x80
}

fn identifier_end(source: &str, start: usize) -> usize {
    source[start..]
        .char_indices()
        .find(|(_, ch)| !(ch.is_alphanumeric() || *ch == '_' || *ch == '$'))
        .map(|(offset, _)| start + offset)
        .unwrap_or(source.len())
}

fn unexpected_character(source: &str, start: usize) -> LexerError {
    let ch = source[start..].chars().next().unwrap_or('\u{fffd}');
    let (line, column) = line_col(source, start);
    LexerError::UnexpectedCharacter {
        ch,
        line,
        column,
        span: Span::new(start, start + ch.len_utf8()),
    }
}

fn next_is_digit(bytes: &[u8], i: usize) -> bool {
    bytes.get(i + 1).is_some_and(u8::is_ascii_digit)
}

fn find_comment_end(bytes: &[u8], from: usize) -> Option<usize> {
    bytes
        .get(from..)?
        .windows(2)
        .position(|pair| pair == b"*/")
        .map(|pos| from + pos + 2)
}

/// One-based line and column of a byte offset.
pub fn line_col(source: &str, offset: usize) -> (usize, usize) {
    let prefix = source.get(..offset).unwrap_or(source);
    let line = prefix.matches('\n').count() + 1;
    let column = prefix.rfind('\n').map_or(prefix.len(), |nl| prefix.len() - nl - 1) + 1;
    (line, column)
}
