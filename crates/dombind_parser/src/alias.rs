use dombind_ast::{AliasDescriptor, AliasKind};
use dombind_lexer::{TokenKind, blank_comments, split_top_level, tokenize};
use dombind_typemap::normalize;

use crate::error::ParseError;
use crate::header::{DeclarationKind, parse_head};

/// Parses `type Name = ...;`. A union made only of string literals becomes a
/// `StringLiterals` alias; any other right-hand side is kept as normalized text.
pub fn parse_alias(raw: &str) -> Result<AliasDescriptor, ParseError> {
    let text = blank_comments(raw);
    let text = text.trim();

    let head = parse_head(text)
        .filter(|head| head.kind == DeclarationKind::Alias)
        .ok_or_else(|| ParseError::NotAnAlias {
            found: first_line(text),
        })?;

    let rhs = text[head.end..]
        .trim_start()
        .strip_prefix('=')
        .ok_or_else(|| ParseError::NotAnAlias {
            found: first_line(text),
        })?;
    let rhs = rhs.trim().trim_end_matches(';').trim();

    let kind = match string_variants(rhs) {
        Some(variants) => AliasKind::StringLiterals { variants },
        None => AliasKind::Type {
            type_name: normalize(rhs),
        },
    };
    Ok(AliasDescriptor {
        name: head.name,
        kind,
    })
}

fn string_variants(rhs: &str) -> Option<Vec<String>> {
    let rhs = rhs.trim_start_matches('|');
    let mut variants = Vec::new();
    for member in split_top_level(rhs, b'|') {
        let tokens = tokenize(member.text).ok()?;
        match tokens.as_slice() {
            [literal, eof] if eof.kind == TokenKind::Eof => match &literal.kind {
                TokenKind::StringLiteral(value) => variants.push(value.clone()),
                _ => return None,
            },
            _ => return None,
        }
    }
    (!variants.is_empty()).then_some(variants)
}

pub(crate) fn first_line(text: &str) -> String {
    text.lines().next().unwrap_or_default().trim().to_string()
}
