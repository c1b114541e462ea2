//! Helpers over written type text: nullability, arrays, function types and the
//! names a type refers to.

use dombind_lexer::{
    Segment, TokenKind, contains_top_level, depth_after, matching_close, split_top_level,
    tokenize,
};

const NULLISH: [&str; 2] = ["null", "undefined"];

/// Words that can appear in type text without naming a declaration.
const TYPE_KEYWORDS: &[&str] = &[
    "null", "undefined", "void", "any", "unknown", "never", "object", "typeof", "keyof",
    "readonly", "infer", "extends", "is", "asserts", "true", "false", "new", "this", "unique",
    "symbol",
];

/// Collapses whitespace and rewrites unions as `A | B`.
pub fn normalize(text: &str) -> String {
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    let trimmed = collapsed.trim_start_matches('|').trim();
    let members = split_top_level(trimmed, b'|');
    if members.len() <= 1 {
        return trimmed.to_string();
    }
    members
        .iter()
        .map(|member| member.text)
        .collect::<Vec<_>>()
        .join(" | ")
}

/// Splits `null`/`undefined` members out of a union.
///
/// Returns the remaining type and whether any nullish member was present, so that
/// `string | null`, `string | undefined` and `undefined | string` all give
/// `("string", true)`.
pub fn split_nullable(text: &str) -> (String, bool) {
    let normalized = normalize(text);
    let members = split_top_level(&normalized, b'|');
    let (nullish, rest): (Vec<&Segment<'_>>, Vec<&Segment<'_>>) = members
        .iter()
        .partition(|member| NULLISH.contains(&member.text));

    if nullish.is_empty() || rest.is_empty() {
        return (normalized, false);
    }

    let bare = rest
        .iter()
        .map(|member| member.text)
        .collect::<Vec<_>>()
        .join(" | ");
    (bare, true)
}

/// Number of members in a top-level union (1 for a non-union type).
pub fn union_width(text: &str) -> usize {
    split_top_level(text, b'|').len().max(1)
}

/// Element type of `T[]`, `Array<T>` or `ReadonlyArray<T>`.
pub fn array_element(text: &str) -> Option<&str> {
    let text = text.trim();
    if let Some(prefix) = text.strip_suffix("[]") {
        let prefix = prefix.trim_end();
        if !prefix.is_empty() && depth_after(prefix) == 0 {
            return Some(strip_parens(prefix));
        }
        return None;
    }

    for wrapper in ["Array<", "ReadonlyArray<"] {
        if let Some(rest) = text.strip_prefix(wrapper) {
            let open = wrapper.len() - 1;
            if matching_close(text, open) == Some(text.len() - 1) {
                return Some(rest[..rest.len() - 1].trim());
            }
        }
    }
    None
}

/// Splits `Name<A, B>` into `("Name", ["A", "B"])`. Array forms are left to
/// [`array_element`].
pub fn generic_arguments(text: &str) -> Option<(&str, Vec<&str>)> {
    let text = text.trim();
    let open = text.find('<')?;
    let name = text[..open].trim();
    let is_name = !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$' || c == '.');
    if !is_name || matching_close(text, open) != Some(text.len() - 1) {
        return None;
    }
    let arguments: Vec<&str> = split_top_level(&text[open + 1..text.len() - 1], b',')
        .into_iter()
        .map(|segment| segment.text)
        .collect();
    (!arguments.is_empty()).then_some((name, arguments))
}

fn strip_parens(text: &str) -> &str {
    let text = text.trim();
    if text.starts_with('(') && matching_close(text, 0) == Some(text.len() - 1) {
        text[1..text.len() - 1].trim()
    } else {
        text
    }
}

/// True for inline function types such as `(e: Event) => void`.
pub fn is_function_type(text: &str) -> bool {
    let text = strip_parens(text);
    contains_top_level(text, "=>") || text.starts_with("new (") || text.starts_with("new(")
}

/// Declaration names referenced by a type, in first-seen order.
///
/// Parameter names and object-literal keys of inline types are not references,
/// nor are type keywords or the member part of a qualified name.
pub fn referenced_names(text: &str) -> Vec<String> {
    let tokens = match tokenize(text) {
        Ok(tokens) => tokens,
        Err(_) => return Vec::new(),
    };

    let mut names: Vec<String> = Vec::new();
    for (i, token) in tokens.iter().enumerate() {
        let Some(name) = token.kind.identifier() else {
            continue;
        };
        if TYPE_KEYWORDS.contains(&name) {
            continue;
        }
        if i > 0 && tokens[i - 1].kind == TokenKind::Dot {
            continue;
        }
        let next = tokens.get(i + 1).map(|t| &t.kind);
        let after_next = tokens.get(i + 2).map(|t| &t.kind);
        let is_label = matches!(next, Some(TokenKind::Colon))
            || matches!(
                (next, after_next),
                (Some(TokenKind::Question), Some(TokenKind::Colon))
            );
        if is_label {
            continue;
        }
        if !names.iter().any(|seen| seen == name) {
            names.push(name.to_string());
        }
    }
    names
}
