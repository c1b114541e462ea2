use dombind_ast::{CallSignature, MethodDescriptor, ParameterDescriptor, PropertyDescriptor};
use dombind_lexer::{
    Segment, Token, TokenKind, depth_after, matching_close, split_top_level, tokenize,
};
use dombind_span::Span;
use dombind_typemap::split_nullable;

use crate::error::SkipReason;
use crate::params::parse_parameters;

/// One recognized member of an interface body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Member {
    Property(PropertyDescriptor),
    Method(MethodDescriptor),
    Call(CallSignature),
}

/// Splits a body into member chunks.
///
/// A member ends at a depth-zero `;` or `,`, or at a line break once its groups
/// are closed and neither it nor the next line continues a type (`|`, `&`, `:`,
/// `=>`). Spans are relative to `body`.
pub fn split_members(body: &str) -> Vec<Segment<'_>> {
    let mut lines = Vec::new();
    let mut offset = 0usize;
    for line in body.split_inclusive('\n') {
        lines.push((offset, line));
        offset += line.len();
    }

    let mut members = Vec::new();
    let mut pending_start: Option<usize> = None;

    for (idx, &(line_start, line)) in lines.iter().enumerate() {
        if pending_start.is_none() && line.trim().is_empty() {
            continue;
        }
        let start = *pending_start.get_or_insert(line_start);
        let end = line_start + line.len();
        let pending = &body[start..end];

        let next_continues = lines
            .get(idx + 1)
            .is_some_and(|(_, next)| starts_continuation(next.trim_start()));
        if depth_after(pending) > 0 || ends_continuation(pending.trim_end()) || next_continues {
            continue;
        }

        push_chunks(body, start, end, &mut members);
        pending_start = None;
    }

    if let Some(start) = pending_start {
        push_chunks(body, start, body.len(), &mut members);
    }
    members
}

fn push_chunks<'a>(body: &'a str, start: usize, end: usize, out: &mut Vec<Segment<'a>>) {
    for statement in split_top_level(&body[start..end], b';') {
        let offset = start + statement.span.start();
        for member in split_top_level(statement.text, b',') {
            out.push(Segment {
                text: member.text,
                span: member.span.shifted(offset),
            });
        }
    }
}

fn ends_continuation(text: &str) -> bool {
    ["|", "&", ":", "=>"]
        .iter()
        .any(|suffix| text.ends_with(suffix))
}

fn starts_continuation(text: &str) -> bool {
    ["|", "&", ":", "=>"]
        .iter()
        .any(|prefix| text.starts_with(prefix))
}

/// Recognizes a member chunk (without its trailing `;`).
pub fn parse_member(text: &str) -> Result<Member, SkipReason> {
    let tokens = tokenize(text).map_err(|errors| {
        SkipReason::Lexing(
            errors
                .first()
                .map(ToString::to_string)
                .unwrap_or_default(),
        )
    })?;

    let mut idx = 0usize;
    if tokens[idx].kind.is_word("readonly") && starts_name(tokens.get(idx + 1)) {
        idx += 1;
    }
    let is_readonly = idx > 0;

    let first = &tokens[idx];
    match &first.kind {
        TokenKind::LParen | TokenKind::Lt => {
            let (parameters, return_type_name, _) = signature_after(text, first.span)?;
            Ok(Member::Call(CallSignature {
                parameters,
                return_type_name,
            }))
        }
        TokenKind::LBracket => Err(SkipReason::IndexSignature),
        TokenKind::Identifier(word)
            if word == "new"
                && matches!(
                    tokens.get(idx + 1).map(|t| &t.kind),
                    Some(TokenKind::LParen | TokenKind::Lt)
                ) =>
        {
            Err(SkipReason::ConstructSignature)
        }
        TokenKind::Identifier(word) if (word == "get" || word == "set") && starts_name(tokens.get(idx + 1)) => {
            Err(SkipReason::Accessor)
        }
        TokenKind::Identifier(name) | TokenKind::StringLiteral(name) => {
            let mut next = idx + 1;
            let optional = tokens[next].kind == TokenKind::Question;
            if optional {
                next += 1;
            }
            let marker = &tokens[next];
            match marker.kind {
                TokenKind::LParen | TokenKind::Lt => {
                    let (parameters, return_type_name, return_is_nullable) =
                        signature_after(text, marker.span)?;
                    Ok(Member::Method(MethodDescriptor {
                        name: name.clone(),
                        parameters,
                        return_type_name,
                        return_is_nullable,
                        javascript: None,
                    }))
                }
                TokenKind::Colon => {
                    let type_text = text[marker.span.end()..].trim();
                    if type_text.is_empty() {
                        return Err(SkipReason::Unrecognized);
                    }
                    let (type_name, nullable_type) = split_nullable(type_text);
                    Ok(Member::Property(PropertyDescriptor {
                        name: name.clone(),
                        type_name,
                        is_nullable: optional || nullable_type,
                        is_readonly,
                    }))
                }
                _ => Err(SkipReason::Unrecognized),
            }
        }
        _ => Err(SkipReason::Unrecognized),
    }
}

/// True when the token can begin a member name (so the word before it was a
/// modifier rather than the name itself).
fn starts_name(token: Option<&Token>) -> bool {
    matches!(
        token.map(|t| &t.kind),
        Some(TokenKind::Identifier(_) | TokenKind::StringLiteral(_) | TokenKind::LBracket)
    )
}

type Signature = (Vec<ParameterDescriptor>, String, bool);

/// Parses `<T>(params): ReturnType` starting at `open` (either the `<` of a type
/// parameter list or the `(` of the parameter list).
fn signature_after(text: &str, open: Span) -> Result<Signature, SkipReason> {
    let mut paren = open.start();
    if text.as_bytes().get(paren) == Some(&b'<') {
        let close = matching_close(text, paren).ok_or(SkipReason::Unrecognized)?;
        paren = close + 1 + leading_whitespace(&text[close + 1..]);
    }
    if text.as_bytes().get(paren) != Some(&b'(') {
        return Err(SkipReason::Unrecognized);
    }

    let close = matching_close(text, paren).ok_or(SkipReason::Unrecognized)?;
    let parameters = parse_parameters(&text[paren + 1..close]);

    let rest = text[close + 1..].trim();
    let return_text = match rest.strip_prefix(':') {
        Some(annotation) => annotation.trim().trim_end_matches(';').trim(),
        None if rest.is_empty() => "any",
        None => return Err(SkipReason::Unrecognized),
    };
    if return_text.is_empty() {
        return Err(SkipReason::Unrecognized);
    }

    let (return_type_name, return_is_nullable) = split_nullable(return_text);
    Ok((parameters, return_type_name, return_is_nullable))
}

fn leading_whitespace(text: &str) -> usize {
    text.len() - text.trim_start().len()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn property(text: &str) -> PropertyDescriptor {
        match parse_member(text) {
            Ok(Member::Property(property)) => property,
            other => panic!("expected property from `{text}`, got {other:?}"),
        }
    }

    fn method(text: &str) -> MethodDescriptor {
        match parse_member(text) {
            Ok(Member::Method(method)) => method,
            other => panic!("expected method from `{text}`, got {other:?}"),
        }
    }

    #[test]
    fn optional_marker_and_null_union_reconcile() {
        let marked = property("foo?: string");
        let unioned = property("foo: string | null");
        assert_eq!((marked.name.as_str(), marked.is_nullable), ("foo", true));
        assert_eq!((unioned.name.as_str(), unioned.is_nullable), ("foo", true));
        assert_eq!(marked.type_name, unioned.type_name);

        let both = property("bar?: number | undefined");
        assert_eq!(both.type_name, "number");
        assert!(both.is_nullable);
    }

    #[test]
    fn readonly_is_a_modifier_unless_it_is_the_name() {
        let coords = property("readonly coords: GeolocationCoordinates");
        assert_eq!(coords.name, "coords");
        assert!(coords.is_readonly);

        let named = property("readonly: boolean");
        assert_eq!(named.name, "readonly");
        assert!(!named.is_readonly);
    }

    #[test]
    fn function_typed_property_is_not_a_method() {
        let handler = property("onchange: ((this: PermissionStatus, ev: Event) => any) | null");
        assert_eq!(handler.type_name, "((this: PermissionStatus, ev: Event) => any)");
        assert!(handler.is_nullable);
    }

    #[test]
    fn methods_keep_parameters_and_return_type() {
        let query = method("query(permissionDesc: PermissionDescriptor): Promise<PermissionStatus>");
        assert_eq!(query.name, "query");
        assert_eq!(query.parameters.len(), 1);
        assert_eq!(query.return_type_name, "Promise<PermissionStatus>");

        let key = method("key(index: number): string | null");
        assert_eq!(key.return_type_name, "string");
        assert!(key.return_is_nullable);

        let generic = method("item<T>(index: number): T");
        assert_eq!(generic.parameters[0].type_name, "number");
    }

    #[test]
    fn call_signatures_and_skips() {
        match parse_member("(position: GeolocationPosition): void") {
            Ok(Member::Call(call)) => {
                assert_eq!(call.parameters[0].type_name, "GeolocationPosition");
                assert_eq!(call.return_type_name, "void");
            }
            other => panic!("expected call signature, got {other:?}"),
        }
        assert_eq!(parse_member("[index: number]: string"), Err(SkipReason::IndexSignature));
        assert_eq!(parse_member("new (): Geolocation"), Err(SkipReason::ConstructSignature));
        assert_eq!(parse_member("get length(): number"), Err(SkipReason::Accessor));
        assert_eq!(parse_member("prototype"), Err(SkipReason::Unrecognized));
        assert!(matches!(parse_member("a: \"open"), Err(SkipReason::Lexing(_))));
    }

    #[test]
    fn members_split_on_semicolons_and_complete_lines() {
        let body = "\n    a: string; b?: number;\n    c(\n        x: number,\n        y: number\n    ): void;\n    d: \"x\"\n        | \"y\";\n    e: boolean\n";
        let texts: Vec<&str> = split_members(body).iter().map(|s| s.text).collect();
        assert_eq!(texts.len(), 5);
        assert_eq!(texts[0], "a: string");
        assert_eq!(texts[1], "b?: number");
        assert!(texts[2].starts_with("c(") && texts[2].ends_with("): void"));
        assert!(texts[3].starts_with("d: \"x\"") && texts[3].ends_with("| \"y\""));
        assert_eq!(texts[4], "e: boolean");

        for segment in split_members(body) {
            assert_eq!(segment.span.slice(body), segment.text);
        }
    }

    #[test]
    fn commas_separate_members_at_depth_zero() {
        let body = "
    a: string,
    b: Map<string, number>, c(x: number, y: number): void
";
        let texts: Vec<&str> = split_members(body).iter().map(|s| s.text).collect();
        assert_eq!(
            texts,
            vec!["a: string", "b: Map<string, number>", "c(x: number, y: number): void"]
        );
        for segment in split_members(body) {
            assert_eq!(segment.span.slice(body), segment.text);
        }
    }

    #[test]
    fn return_annotation_on_its_own_line_stays_with_the_method() {
        let body = "
    foo(a: number)
        : void;
    bar: string;
";
        let members = split_members(body);
        assert_eq!(members.len(), 2);
        match parse_member(members[0].text) {
            Ok(Member::Method(method)) => {
                assert_eq!(method.name, "foo");
                assert_eq!(method.return_type_name, "void");
            }
            other => panic!("expected method, got {other:?}"),
        }
    }
}
