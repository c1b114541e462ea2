//! Depth-aware text scanning.
//!
//! Signature text is mostly sliced rather than tokenized, so these helpers find
//! delimiters that sit at nesting depth zero. `()`, `[]`, `{}` and `<>` all count
//! as nesting; the `>` of an arrow (`=>`) does not, and string literals are opaque.

use std::borrow::Cow;

use dombind_span::Span;

/// A trimmed slice of the scanned text and its span relative to that text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment<'a> {
    pub text: &'a str,
    pub span: Span,
}

#[derive(Debug, Default, Clone, Copy)]
struct Nesting {
    depth: usize,
    quote: Option<u8>,
    escaped: bool,
}

impl Nesting {
    /// Feeds one byte and reports whether it sat at depth zero outside a string.
    fn step(&mut self, byte: u8, previous: Option<u8>) -> bool {
        if let Some(quote) = self.quote {
            if self.escaped {
                self.escaped = false;
            } else if byte == b'\\' {
                self.escaped = true;
            } else if byte == quote {
                self.quote = None;
            }
            return false;
        }

        let top_level = self.depth == 0;
        match byte {
            b'"' | b'\'' | b'`' => self.quote = Some(byte),
            b'(' | b'[' | b'{' | b'<' => self.depth += 1,
            b'>' if previous == Some(b'=') => {}
            b')' | b']' | b'}' | b'>' => self.depth = self.depth.saturating_sub(1),
            _ => {}
        }
        top_level
    }
}

/// Splits `text` on `delimiter` wherever it appears at depth zero. Segments are
/// trimmed; empty segments are dropped.
pub fn split_top_level(text: &str, delimiter: u8) -> Vec<Segment<'_>> {
    let bytes = text.as_bytes();
    let mut nesting = Nesting::default();
    let mut segments = Vec::new();
    let mut start = 0usize;

    for (i, &byte) in bytes.iter().enumerate() {
        let previous = i.checked_sub(1).map(|p| bytes[p]);
        if nesting.step(byte, previous) && byte == delimiter {
            push_trimmed(text, start, i, &mut segments);
            start = i + 1;
        }
    }
    push_trimmed(text, start, bytes.len(), &mut segments);
    segments
}

fn push_trimmed<'a>(text: &'a str, start: usize, end: usize, out: &mut Vec<Segment<'a>>) {
    let raw = &text[start..end];
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return;
    }
    let leading = raw.len() - raw.trim_start().len();
    let span = Span::new(start + leading, start + leading + trimmed.len());
    out.push(Segment {
        text: trimmed,
        span,
    });
}

/// Byte offset of the first depth-zero occurrence of `target`.
pub fn find_top_level(text: &str, target: u8) -> Option<usize> {
    let bytes = text.as_bytes();
    let mut nesting = Nesting::default();
    bytes.iter().enumerate().find_map(|(i, &byte)| {
        let previous = i.checked_sub(1).map(|p| bytes[p]);
        let top_level = nesting.step(byte, previous);
        (top_level && byte == target).then_some(i)
    })
}

/// True when `text` contains `needle` at depth zero (e.g. a `=>` outside any group).
pub fn contains_top_level(text: &str, needle: &str) -> bool {
    let bytes = text.as_bytes();
    let first = match needle.as_bytes().first() {
        Some(&byte) => byte,
        None => return false,
    };
    let mut nesting = Nesting::default();
    for (i, &byte) in bytes.iter().enumerate() {
        let previous = i.checked_sub(1).map(|p| bytes[p]);
        if nesting.step(byte, previous) && byte == first && text[i..].starts_with(needle) {
            return true;
        }
    }
    false
}

/// Given the offset of an opening `(`, `[`, `{` or `<`, returns the offset of the
/// byte that closes it.
pub fn matching_close(text: &str, open: usize) -> Option<usize> {
    let bytes = text.as_bytes();
    if !matches!(bytes.get(open), Some(b'(' | b'[' | b'{' | b'<')) {
        return None;
    }

    let mut nesting = Nesting::default();
    for (i, &byte) in bytes.iter().enumerate().skip(open) {
        let previous = i.checked_sub(1).map(|p| bytes[p]);
        let before = nesting.depth;
        nesting.step(byte, previous);
        if nesting.quote.is_none() && before == 1 && nesting.depth == 0 {
            return Some(i);
        }
    }
    None
}

/// Net nesting depth after scanning all of `text`.
pub fn depth_after(text: &str) -> usize {
    let bytes = text.as_bytes();
    let mut nesting = Nesting::default();
    for (i, &byte) in bytes.iter().enumerate() {
        nesting.step(byte, i.checked_sub(1).map(|p| bytes[p]));
    }
    nesting.depth
}

/// Splits a whole declaration file into top-level statements. A statement ends
/// at a depth-zero `;` (excluded) or at the `}` that closes a depth-zero block
/// (included), so `interface X { ... }` comes back as one segment. Once a
/// depth-zero `=` has been seen (`type X = { ... } | null`) only `;` ends it.
pub fn split_statements(text: &str) -> Vec<Segment<'_>> {
    let bytes = text.as_bytes();
    let mut nesting = Nesting::default();
    let mut statements = Vec::new();
    let mut start = 0usize;
    let mut assigned = false;

    for (i, &byte) in bytes.iter().enumerate() {
        let previous = i.checked_sub(1).map(|p| bytes[p]);
        let top_level = nesting.step(byte, previous);
        if top_level && byte == b';' {
            push_trimmed(text, start, i, &mut statements);
            start = i + 1;
            assigned = false;
        } else if top_level && byte == b'=' {
            assigned = true;
        } else if !assigned && byte == b'}' && nesting.depth == 0 && nesting.quote.is_none() {
            push_trimmed(text, start, i + 1, &mut statements);
            start = i + 1;
        }
    }
    push_trimmed(text, start, bytes.len(), &mut statements);
    statements
}

/// Replaces `//` and `/* */` comments with spaces, keeping newlines, so byte
/// offsets into the result match the original text.
pub fn blank_comments(source: &str) -> Cow<'_, str> {
    if !source.contains("//") && !source.contains("/*") {
        return Cow::Borrowed(source);
    }

    let mut bytes = source.as_bytes().to_vec();
    let mut quote: Option<u8> = None;
    let mut i = 0usize;

    while i < bytes.len() {
        let byte = bytes[i];
        if let Some(q) = quote {
            if byte == b'\\' {
                i += 2;
                continue;
            }
            if byte == q || byte == b'\n' {
                quote = None;
            }
            i += 1;
            continue;
        }

        match (byte, bytes.get(i + 1).copied()) {
            (b'"' | b'\'' | b'`', _) => {
                quote = Some(byte);
                i += 1;
            }
            (b'/', Some(b'/')) => {
                while i < bytes.len() && bytes[i] != b'\n' {
                    bytes[i] = b' ';
                    i += 1;
                }
            }
            (b'/', Some(b'*')) => {
                bytes[i] = b' ';
                bytes[i + 1] = b' ';
                i += 2;
                while i < bytes.len() {
                    if bytes[i] == b'*' && bytes.get(i + 1) == Some(&b'/') {
                        bytes[i] = b' ';
                        bytes[i + 1] = b' ';
                        i += 2;
                        break;
                    }
                    if bytes[i] != b'\n' {
                        bytes[i] = b' ';
                    }
                    i += 1;
                }
            }
            _ => i += 1,
        }
    }

    Cow::Owned(String::from_utf8_lossy(&bytes).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_parameters_on_top_level_commas_only() {
        let text = "a: Map<string, number>, cb: (x: number, y: number) => void, opts?: { a: 1, b: 2 }";
        let parts: Vec<&str> = split_top_level(text, b',').iter().map(|s| s.text).collect();
        assert_eq!(
            parts,
            vec![
                "a: Map<string, number>",
                "cb: (x: number, y: number) => void",
                "opts?: { a: 1, b: 2 }",
            ]
        );
    }

    #[test]
    fn segment_spans_point_into_source() {
        let text = "  first ,second";
        let segments = split_top_level(text, b',');
        assert_eq!(segments[0].span.slice(text), "first");
        assert_eq!(segments[1].span.slice(text), "second");
    }

    #[test]
    fn arrow_does_not_close_angle_brackets() {
        let text = "(cb: (e: Event) => void): Promise<void>";
        assert_eq!(matching_close(text, 0), Some(23));
        assert_eq!(find_top_level(text, b':'), Some(24));
        assert!(contains_top_level("(e: Event) => void", "=>"));
        assert!(!contains_top_level("(cb: () => void)", "=>"));
    }

    #[test]
    fn delimiters_inside_strings_are_ignored() {
        let text = "kind: \"a;b\" ; next: string";
        let parts = split_top_level(text, b';');
        assert_eq!(parts.len(), 2);
        assert_eq!(parts[0].text, "kind: \"a;b\"");
    }

    #[test]
    fn comments_are_blanked_in_place() {
        let source = "a: string; // note\n/** doc\n * more */ b: number;";
        let blanked = blank_comments(source);
        assert_eq!(blanked.len(), source.len());
        assert!(!blanked.contains("note"));
        assert!(!blanked.contains("doc"));
        assert_eq!(blanked.matches('\n').count(), 2);
        assert!(blanked.contains("b: number;"));
    }

    #[test]
    fn statements_end_at_semicolons_and_closed_blocks() {
        let text = "interface A {\n    a: string;\n}\ndeclare var a: A;\ntype B = \"x\" | \"y\";\ninterface C extends A { c(): void; }\n";
        let statements: Vec<&str> = split_statements(text).iter().map(|s| s.text).collect();
        assert_eq!(
            statements,
            vec![
                "interface A {\n    a: string;\n}",
                "declare var a: A",
                "type B = \"x\" | \"y\"",
                "interface C extends A { c(): void; }",
            ]
        );
    }

    #[test]
    fn alias_with_object_type_runs_to_semicolon() {
        let text = "type Init = { a: string } | null;\ninterface D { d: Init; }\n";
        let statements: Vec<&str> = split_statements(text).iter().map(|s| s.text).collect();
        assert_eq!(
            statements,
            vec!["type Init = { a: string } | null", "interface D { d: Init; }"]
        );
    }

    #[test]
    fn depth_tracks_open_groups() {
        assert_eq!(depth_after("foo(a: string,"), 1);
        assert_eq!(depth_after("foo(a: () => void): void;"), 0);
    }
}
