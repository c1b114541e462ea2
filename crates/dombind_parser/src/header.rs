use dombind_lexer::{TokenKind, find_top_level, matching_close, split_top_level, tokenize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeclarationKind {
    Interface,
    Alias,
}

/// The part of a declaration before its body: `interface Name<T> extends A, B`
/// or `type Name<T>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeclarationHead {
    pub kind: DeclarationKind,
    pub name: String,
    pub extends: Vec<String>,
    /// Offset of the first byte after the head (the body `{` or alias `=`).
    pub end: usize,
}

const MODIFIERS: [&str; 3] = ["export", "declare", "default"];

/// Reads a declaration head from the start of `text`, or `None` when the text
/// does not start with an interface or type alias.
pub fn parse_head(text: &str) -> Option<DeclarationHead> {
    let end = [find_top_level(text, b'{'), find_top_level(text, b'=')]
        .into_iter()
        .flatten()
        .min()
        .unwrap_or(text.len());
    let head = &text[..end];
    let tokens = tokenize(head).ok()?;

    let mut idx = 0usize;
    while tokens
        .get(idx)
        .is_some_and(|token| MODIFIERS.iter().any(|word| token.kind.is_word(word)))
    {
        idx += 1;
    }

    let kind = match tokens.get(idx)?.kind.identifier()? {
        "interface" => DeclarationKind::Interface,
        "type" => DeclarationKind::Alias,
        _ => return None,
    };
    idx += 1;

    let name = tokens.get(idx)?.kind.identifier()?.to_string();
    idx += 1;

    let mut extends = Vec::new();
    if kind == DeclarationKind::Interface {
        if let Some(token) = tokens.get(idx).filter(|t| t.kind == TokenKind::Lt) {
            let close = matching_close(head, token.span.start())?;
            idx = tokens
                .iter()
                .position(|t| t.span.start() > close)
                .unwrap_or(tokens.len() - 1);
        }
        if let Some(token) = tokens.get(idx).filter(|t| t.kind.is_word("extends")) {
            extends = split_top_level(&head[token.span.end()..], b',')
                .into_iter()
                .map(|base| base_name(base.text))
                .filter(|base| !base.is_empty())
                .collect();
        }
    }

    Some(DeclarationHead {
        kind,
        name,
        extends,
        end,
    })
}

/// `Base<T>` -> `Base`.
fn base_name(text: &str) -> String {
    text.split('<').next().unwrap_or(text).trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_interface_name_and_bases() {
        let head = parse_head("interface Geolocation {").expect("interface head");
        assert_eq!(head.kind, DeclarationKind::Interface);
        assert_eq!(head.name, "Geolocation");
        assert!(head.extends.is_empty());
        assert_eq!(head.end, 22);

        let head = parse_head("export declare interface HTMLMediaElement<T extends { a: 1 }> extends HTMLElement, EventTarget<T> {")
            .expect("generic interface head");
        assert_eq!(head.name, "HTMLMediaElement");
        assert_eq!(head.extends, vec!["HTMLElement", "EventTarget"]);
    }

    #[test]
    fn reads_alias_name() {
        let head = parse_head("type PermissionState = \"denied\" | \"granted\";").expect("alias head");
        assert_eq!(head.kind, DeclarationKind::Alias);
        assert_eq!(head.name, "PermissionState");
    }

    #[test]
    fn rejects_other_statements() {
        assert_eq!(parse_head("declare var navigator: Navigator;"), None);
        assert_eq!(parse_head("interface {"), None);
    }
}
